//! The selected user and search term, as carried by the location's query
//! string (`?user_id=2&search=qui`).

use crate::models::UserId;
use reqwest::Url;
use serde::Serialize;
use validator::Validate;

pub const USER_ID_PARAM: &str = "user_id";
pub const SEARCH_PARAM: &str = "search";

/// Relative locations are resolved against this origin and the origin is
/// stripped again on output.
const LOCAL_ORIGIN: &str = "http://localhost/";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
pub struct QueryState {
    pub user_id: Option<UserId>,
    #[validate(length(max = 200, message = "Search must be at most 200 characters"))]
    pub search: Option<String>,
}

impl QueryState {
    /// Parses a location such as `/?user_id=2&search=qui`.
    ///
    /// A malformed `user_id` counts as no selection and an empty `search`
    /// as no filter. The first occurrence of a repeated parameter wins.
    pub fn from_location(location: &str) -> Self {
        let Some(url) = resolve(location) else {
            return Self::default();
        };

        let mut state = Self::default();
        let mut seen_user = false;
        let mut seen_search = false;

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                USER_ID_PARAM if !seen_user => {
                    seen_user = true;
                    state.user_id = value.parse().ok();
                }
                SEARCH_PARAM if !seen_search => {
                    seen_search = true;
                    state.search = Some(value.into_owned()).filter(|s| !s.is_empty());
                }
                _ => {}
            }
        }

        state
    }

    /// Parses a bare query string (without the leading `?`).
    pub fn from_query(query: &str) -> Self {
        Self::from_location(&format!("?{query}"))
    }

    pub fn search_term(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }
}

/// Sets `key` to `value` in `location`, keeping every other parameter in
/// place. An absent or empty value removes the key altogether.
pub fn merge_param(location: &str, key: &str, value: Option<&str>) -> String {
    let Some(mut url) = resolve(location) else {
        return location.to_string();
    };

    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    match value.filter(|v| !v.is_empty()) {
        Some(value) => match pairs.iter().position(|(k, _)| k == key) {
            Some(first) => {
                pairs[first].1 = value.to_string();
                let mut index = 0;
                pairs.retain(|(k, _)| {
                    let keep = index <= first || k != key;
                    index += 1;
                    keep
                });
            }
            None => pairs.push((key.to_string(), value.to_string())),
        },
        None => pairs.retain(|(k, _)| k != key),
    }

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut()
            .clear()
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    relative(&url)
}

fn resolve(location: &str) -> Option<Url> {
    Url::parse(LOCAL_ORIGIN).ok()?.join(location).ok()
}

fn relative(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
