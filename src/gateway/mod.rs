//! Read-only client for the remote user/post/comment API.
//!
//! Every call is a single GET against `base_url`. Payloads are decoded into
//! the strict shapes in [`crate::models`]; a missing or mistyped field is a
//! [`FetchError::Decode`].

mod error;

pub use error::{FetchError, FetchResult};

use crate::models::{Comment, Post, PostId, User, UserId};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

#[derive(Debug, Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
}

impl Gateway {
    pub fn new(base_url: impl Into<String>) -> FetchResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("postboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /users
    pub async fn list_users(&self) -> FetchResult<Vec<User>> {
        self.fetch("/users").await
    }

    /// GET /users/{id}
    pub async fn get_user(&self, id: UserId) -> FetchResult<User> {
        self.fetch(&format!("/users/{id}")).await
    }

    /// GET /posts
    pub async fn list_posts(&self) -> FetchResult<Vec<Post>> {
        self.fetch("/posts").await
    }

    /// GET /posts?userId={id}
    pub async fn get_user_posts(&self, user_id: UserId) -> FetchResult<Vec<Post>> {
        self.fetch(&format!("/posts?userId={user_id}")).await
    }

    /// Fetches the candidate posts (one user's, or the whole corpus) and keeps
    /// those whose title or body contains `term`, ignoring case.
    pub async fn search_posts(&self, term: &str, user_id: Option<UserId>) -> FetchResult<Vec<Post>> {
        let candidates = match user_id {
            Some(id) => self.get_user_posts(id).await?,
            None => self.list_posts().await?,
        };

        Ok(filter_posts(candidates, term))
    }

    /// GET /posts/{id}
    pub async fn get_post(&self, id: PostId) -> FetchResult<Post> {
        self.fetch(&format!("/posts/{id}")).await
    }

    /// GET /comments?postId={id}
    pub async fn get_comments_for_post(&self, post_id: PostId) -> FetchResult<Vec<Comment>> {
        self.fetch(&format!("/comments?postId={post_id}")).await
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> FetchResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("GET {} failed: {}", url, e);
            FetchError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("GET {} answered {}", url, status);
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| {
            warn!("GET {} returned an unexpected payload: {}", url, source);
            FetchError::Decode { url, source }
        })
    }
}

/// Empty `term` keeps everything.
pub fn filter_posts(posts: Vec<Post>, term: &str) -> Vec<Post> {
    if term.is_empty() {
        return posts;
    }

    let needle = term.to_lowercase();
    posts.into_iter().filter(|post| post.matches(&needle)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: PostId, title: &str, body: &str) -> Post {
        Post {
            id,
            user_id: 2,
            title: title.into(),
            body: body.into(),
        }
    }

    #[test]
    fn empty_term_keeps_all_posts() {
        let posts = vec![post(1, "a", "b"), post(2, "c", "d")];
        assert_eq!(filter_posts(posts.clone(), ""), posts);
    }

    #[test]
    fn filter_matches_title_or_body_ignoring_case() {
        let posts = vec![
            post(11, "QUIS eius", "x"),
            post(12, "nope", "et aliquid qui"),
            post(13, "nope", "nothing here"),
        ];
        let ids: Vec<_> = filter_posts(posts, "Qui").iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![11, 12]);
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let gateway = Gateway::with_client(Client::new(), "http://localhost:9000/");
        assert_eq!(gateway.base_url(), "http://localhost:9000");
    }
}
