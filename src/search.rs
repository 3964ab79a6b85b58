//! Keeps the location's query string in step with the search field and the
//! user selection.
//!
//! Search edits settle through a [`Debouncer`] and are written with
//! [`Navigator::replace`], so typing never adds history entries. Selecting a
//! user is written at once with [`Navigator::push`].

use crate::debounce::Debouncer;
use crate::models::UserId;
use crate::query::{QueryState, SEARCH_PARAM, USER_ID_PARAM, merge_param};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(600);

/// The page-routing mechanism. Locations are relative, e.g. `/?user_id=2`.
pub trait Navigator: Send + Sync + 'static {
    fn location(&self) -> String;

    /// Navigates to `location`, adding a history entry.
    fn push(&self, location: String);

    /// Navigates to `location` in place of the current history entry.
    fn replace(&self, location: String);
}

/// History stack kept in memory. The last entry is the current location.
#[derive(Debug)]
pub struct MemoryNavigator {
    history: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            history: Mutex::new(vec![initial.into()]),
        }
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Navigator for MemoryNavigator {
    fn location(&self) -> String {
        let history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        history.last().cloned().unwrap_or_else(|| "/".to_string())
    }

    fn push(&self, location: String) {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).push(location);
    }

    fn replace(&self, location: String) {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        match history.last_mut() {
            Some(current) => *current = location,
            None => history.push(location),
        }
    }
}

pub struct SearchBar<N: Navigator> {
    navigator: Arc<N>,
    text: Mutex<String>,
    debouncer: Debouncer<String>,
    sync: JoinHandle<()>,
}

impl<N: Navigator> SearchBar<N> {
    pub fn new(navigator: Arc<N>) -> Self {
        Self::with_delay(navigator, SEARCH_DEBOUNCE)
    }

    /// The field starts with the location's `search` value, read once here.
    pub fn with_delay(navigator: Arc<N>, delay: Duration) -> Self {
        let initial = QueryState::from_location(&navigator.location())
            .search
            .unwrap_or_default();

        let debouncer = Debouncer::new(initial.clone(), delay);
        let mut settled = debouncer.subscribe();
        let target = Arc::clone(&navigator);

        let sync = tokio::spawn(async move {
            while settled.changed().await.is_ok() {
                let term = settled.borrow_and_update().clone();
                let next = merge_param(&target.location(), SEARCH_PARAM, Some(&term));
                debug!("Search settled on {:?}, replacing location with {}", term, next);
                target.replace(next);
            }
        });

        Self {
            navigator,
            text: Mutex::new(initial),
            debouncer,
            sync,
        }
    }

    /// A keystroke: updates the field now and the location once typing pauses.
    pub fn input(&self, text: impl Into<String>) {
        let text = text.into();
        *self.text.lock().unwrap_or_else(PoisonError::into_inner) = text.clone();
        self.debouncer.push(text);
    }

    pub fn clear(&self) {
        self.input(String::new());
    }

    /// What the field currently shows, settled or not.
    pub fn text(&self) -> String {
        self.text.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn select_user(&self, user_id: UserId) {
        let next = merge_param(
            &self.navigator.location(),
            USER_ID_PARAM,
            Some(&user_id.to_string()),
        );
        debug!("User {} selected, pushing {}", user_id, next);
        self.navigator.push(next);
    }

    pub fn query(&self) -> QueryState {
        QueryState::from_location(&self.navigator.location())
    }
}

impl<N: Navigator> Drop for SearchBar<N> {
    fn drop(&mut self) {
        self.debouncer.cancel();
        self.sync.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn bar(initial: &str) -> (Arc<MemoryNavigator>, SearchBar<MemoryNavigator>) {
        let navigator = Arc::new(MemoryNavigator::new(initial));
        let bar = SearchBar::new(Arc::clone(&navigator));
        (navigator, bar)
    }

    #[tokio::test(start_paused = true)]
    async fn field_starts_from_location() {
        let (_, bar) = bar("/?user_id=2&search=qui");
        assert_eq!(bar.text(), "qui");
        assert_eq!(bar.query().user_id, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn typing_settles_into_one_replace() {
        let (navigator, bar) = bar("/?user_id=2");

        for text in ["q", "qu", "qui"] {
            bar.input(text);
            sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(bar.text(), "qui");
        assert_eq!(navigator.location(), "/?user_id=2");

        sleep(SEARCH_DEBOUNCE).await;
        assert_eq!(navigator.history(), vec!["/?user_id=2&search=qui".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_removes_search_param() {
        let (navigator, bar) = bar("/?user_id=2&search=qui");
        bar.clear();
        sleep(SEARCH_DEBOUNCE * 2).await;
        assert_eq!(navigator.location(), "/?user_id=2");
    }

    #[tokio::test(start_paused = true)]
    async fn selecting_a_user_pushes_immediately_and_keeps_search() {
        let (navigator, bar) = bar("/?search=qui");
        bar.select_user(2);
        assert_eq!(
            navigator.history(),
            vec!["/?search=qui".to_string(), "/?search=qui&user_id=2".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn pending_search_keeps_a_later_selection() {
        let (navigator, bar) = bar("/");
        bar.input("qui");
        bar.select_user(3);
        sleep(SEARCH_DEBOUNCE * 2).await;
        assert_eq!(navigator.location(), "/?user_id=3&search=qui");
        assert_eq!(navigator.history().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_bar_discards_pending_search() {
        let (navigator, bar) = bar("/");
        bar.input("qui");
        drop(bar);
        sleep(SEARCH_DEBOUNCE * 2).await;
        assert_eq!(navigator.history(), vec!["/".to_string()]);
    }
}
