use crate::core::search::{PriceFinder, SearchQuery};
use crate::domain::model::GroceryResponse;
use crate::domain::ports::GenerativeModel;
use crate::utils::error::{Result, ShopError};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub last_query: Option<SearchQuery>,
    pub last_result: Option<GroceryResponse>,
    pub last_error: Option<String>,
    pub is_searching: bool,
    pub searched_at: Option<DateTime<Utc>>,
}

/// What the presentation layer should show for the current state.
#[derive(Debug, Clone, Copy)]
pub enum SearchView<'a> {
    Welcome,
    Loading,
    Error(&'a str),
    Results {
        query: &'a SearchQuery,
        response: &'a GroceryResponse,
        searched_at: Option<DateTime<Utc>>,
    },
}

/// Owns the application state and runs searches one at a time.
pub struct SearchSession<M: GenerativeModel> {
    finder: PriceFinder<M>,
    state: AppState,
}

impl<M: GenerativeModel> SearchSession<M> {
    pub fn new(model: M) -> Self {
        Self {
            finder: PriceFinder::new(model),
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> SearchView<'_> {
        if self.state.is_searching {
            return SearchView::Loading;
        }
        if let Some(error) = &self.state.last_error {
            return SearchView::Error(error);
        }
        match (&self.state.last_query, &self.state.last_result) {
            (Some(query), Some(response)) => SearchView::Results {
                query,
                response,
                searched_at: self.state.searched_at,
            },
            _ => SearchView::Welcome,
        }
    }

    /// Validates the selection, then runs one search. A previous result is
    /// kept when validation or the search fails.
    pub async fn search(
        &mut self,
        country: Option<&str>,
        city: Option<&str>,
        grocery_list: Option<&str>,
    ) -> Result<&GroceryResponse> {
        if self.state.is_searching {
            return Err(ShopError::SearchInProgress);
        }

        let query = match SearchQuery::from_selection(country, city, grocery_list) {
            Ok(query) => query,
            Err(e) => {
                self.state.last_error = Some(e.user_friendly_message());
                return Err(e);
            }
        };

        self.state.last_error = None;
        self.state.is_searching = true;
        let outcome = self.finder.find_prices(&query).await;
        self.state.is_searching = false;

        match outcome {
            Ok(response) => {
                self.state.last_query = Some(query);
                self.state.searched_at = Some(Utc::now());
                Ok(&*self.state.last_result.insert(response))
            }
            Err(e) => {
                self.state.last_error = Some(e.user_friendly_message());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{GenerationOutput, GenerationRequest};
    use crate::utils::error::{LIVE_PRICES_UNAVAILABLE, SELECTION_REQUIRED};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedModel {
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GenerativeModel for ScriptedModel {
        async fn generate(&self, _request: &GenerationRequest) -> Result<GenerationOutput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ShopError::ServiceError {
                    status: 500,
                    body: "internal".to_string(),
                });
            }
            Ok(GenerationOutput {
                text: "Cheap week.\n### STORE: Aldi\nBUDGET: Low\n---".to_string(),
                citations: vec![],
            })
        }
    }

    fn session(fail: bool) -> SearchSession<ScriptedModel> {
        SearchSession::new(ScriptedModel {
            fail,
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_new_session_shows_welcome() {
        let session = session(false);
        assert!(matches!(session.view(), SearchView::Welcome));
    }

    #[tokio::test]
    async fn test_missing_selection_never_calls_model() {
        let mut session = session(false);

        let err = session.search(Some("USA"), None, None).await.unwrap_err();

        assert!(matches!(err, ShopError::MissingSelection { .. }));
        assert_eq!(session.finder.model().calls.load(Ordering::SeqCst), 0);
        assert!(matches!(session.view(), SearchView::Error(msg) if msg == SELECTION_REQUIRED));
    }

    #[tokio::test]
    async fn test_successful_search_stores_result() {
        let mut session = session(false);

        let response = session
            .search(Some("Germany"), Some("Berlin"), Some(""))
            .await
            .unwrap();
        assert_eq!(response.stores[0].name, "Aldi");

        assert!(!session.state().is_searching);
        assert!(session.state().searched_at.is_some());
        match session.view() {
            SearchView::Results { query, response, .. } => {
                assert_eq!(query.city(), "Berlin");
                assert_eq!(response.intro, "Cheap week.");
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_search_resets_flag_and_keeps_generic_message() {
        let mut session = session(true);

        assert!(session
            .search(Some("India"), Some("Mumbai"), None)
            .await
            .is_err());

        assert!(!session.state().is_searching);
        assert!(session.state().last_result.is_none());
        assert!(matches!(session.view(), SearchView::Error(msg) if msg == LIVE_PRICES_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_search_rejected_while_in_flight() {
        let mut session = session(false);
        session.state.is_searching = true;

        let err = session
            .search(Some("France"), Some("Paris"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ShopError::SearchInProgress));
        assert!(matches!(session.view(), SearchView::Loading));
    }
}
