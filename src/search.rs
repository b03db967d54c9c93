//! Debounced article search shared by every search surface.
//!
//! The header dropdown, the secondary header and the dedicated search page
//! all use one [`ArticleSearcher`] parameterized by [`SearchBoxConfig`]
//! instead of carrying their own copies of the debounce logic.

use crate::api::{PublicationApi, SearchRequest};
use crate::errors::PublicationError;
use crate::models::Article;
use log::{debug, warn};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SearchBoxConfig {
    pub placeholder: String,
    pub result_limit: usize,
    /// Trimmed queries shorter than this never reach the network.
    pub min_query_len: usize,
    pub debounce: Duration,
}

impl Default for SearchBoxConfig {
    fn default() -> Self {
        Self {
            placeholder: String::from("Search articles..."),
            result_limit: 5,
            min_query_len: 2,
            debounce: Duration::from_millis(300),
        }
    }
}

#[derive(Default)]
struct SearchState {
    /// Bumped on every keystroke; the debounce timer belonging to an older
    /// generation returns without doing anything.
    generation: u64,
    /// Generation of the last applied response. Responses are applied only
    /// if newer, so a slow superseded request cannot overwrite fresh
    /// results.
    applied: u64,
    results: Vec<Article>,
    error: Option<String>,
    searching: bool,
}

/// Debounced query executor. Each keystroke restarts the debounce window;
/// only the last pending timer issues a request. In-flight requests are not
/// cancelled, but their responses are discarded when a newer request has
/// already been applied.
pub struct ArticleSearcher {
    api: Arc<dyn PublicationApi>,
    config: SearchBoxConfig,
    state: Arc<Mutex<SearchState>>,
}

impl ArticleSearcher {
    pub fn new(api: Arc<dyn PublicationApi>, config: SearchBoxConfig) -> Self {
        Self {
            api,
            config,
            state: Arc::new(Mutex::new(SearchState::default())),
        }
    }

    /// Feed one keystroke's worth of input. Queries below the minimum
    /// length clear the result set locally without any network traffic.
    pub fn on_input(&self, query: &str) {
        let trimmed = query.trim().to_string();

        let generation = {
            let mut state = self.state.lock().unwrap();
            state.generation += 1;

            if trimmed.len() < self.config.min_query_len {
                state.results.clear();
                state.error = None;
                state.searching = false;
                // The local clear counts as the latest applied state, so any
                // request still in flight is stale and must not repopulate.
                state.applied = state.generation;
                return;
            }

            state.searching = true;
            state.generation
        };

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let debounce = self.config.debounce;
        let limit = self.config.result_limit;

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            // Superseded by a later keystroke while waiting; that timer owns
            // the search now.
            if state.lock().unwrap().generation != generation {
                return;
            }

            debug!("Issuing debounced search for \"{}\"", trimmed);
            let outcome = api.search(&SearchRequest::new(&trimmed, limit)).await;

            let mut state = state.lock().unwrap();
            if generation <= state.applied {
                debug!("Discarding stale search response for \"{}\"", trimmed);
                return;
            }
            state.applied = generation;
            match outcome {
                Ok(results) => {
                    state.results = results;
                    state.error = None;
                }
                Err(e) => {
                    warn!("Search failed for \"{}\": {}", trimmed, e);
                    state.results.clear();
                    state.error = Some(e.to_string());
                }
            }
            if state.generation == generation {
                state.searching = false;
            }
        });
    }

    /// One-shot filtered search used by the dedicated search page. No
    /// debounce; the short-query rule still applies.
    pub async fn run_search(
        &self,
        request: SearchRequest,
    ) -> Result<Vec<Article>, PublicationError> {
        if request.query.trim().len() < self.config.min_query_len {
            let mut state = self.state.lock().unwrap();
            state.results.clear();
            state.error = None;
            return Ok(Vec::new());
        }

        let outcome = self.api.search(&request).await;
        let mut state = self.state.lock().unwrap();
        state.generation += 1;
        state.applied = state.generation;
        match outcome {
            Ok(results) => {
                state.results = results.clone();
                state.error = None;
                Ok(results)
            }
            Err(e) => {
                state.results.clear();
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn results(&self) -> Vec<Article> {
        self.state.lock().unwrap().results.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().unwrap().error.clone()
    }

    pub fn is_searching(&self) -> bool {
        self.state.lock().unwrap().searching
    }

    pub fn placeholder(&self) -> &str {
        &self.config.placeholder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockPublicationApi;
    use crate::models::{Article, ArticleType, Author, Lifecycle};

    fn published(id: &str, title: &str) -> Article {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            abstract_text: String::from("abstract"),
            keywords: Vec::new(),
            article_type: ArticleType::ResearchArticle,
            lifecycle: Lifecycle::Published,
            author: Author::new("a-1", "A. Okafor", "okafor@uniben.edu"),
            co_authors: Vec::new(),
            volume: None,
            issue: None,
            pages: None,
            publish_date: None,
            doi: None,
            pdf_file: None,
            license: String::from("CC BY 4.0"),
            created_at: None,
        }
    }

    fn searcher_with(api: Arc<MockPublicationApi>, debounce_ms: u64) -> ArticleSearcher {
        ArticleSearcher::new(
            api,
            SearchBoxConfig {
                debounce: Duration::from_millis(debounce_ms),
                ..SearchBoxConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn short_queries_never_reach_the_network() {
        let api = Arc::new(MockPublicationApi::new());
        api.push_article(published("art-1", "Rust in education"));
        let searcher = searcher_with(Arc::clone(&api), 10);

        searcher.on_input("r");
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(api.search_call_count(), 0);
        assert!(searcher.results().is_empty());
        assert!(!searcher.is_searching());
    }

    #[tokio::test]
    async fn rapid_keystrokes_collapse_into_one_request() {
        let api = Arc::new(MockPublicationApi::new());
        api.push_article(published("art-1", "Rust in education"));
        let searcher = searcher_with(Arc::clone(&api), 30);

        searcher.on_input("ru");
        searcher.on_input("rus");
        searcher.on_input("rust");
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(api.search_call_count(), 1);
        let results = searcher.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "art-1");
        assert!(!searcher.is_searching());
    }

    #[tokio::test]
    async fn shrinking_below_minimum_clears_results_locally() {
        let api = Arc::new(MockPublicationApi::new());
        api.push_article(published("art-1", "Rust in education"));
        let searcher = searcher_with(Arc::clone(&api), 10);

        searcher.on_input("rust");
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(searcher.results().len(), 1);

        searcher.on_input("r");
        assert!(searcher.results().is_empty());
        assert_eq!(api.search_call_count(), 1);
    }

    #[tokio::test]
    async fn slow_superseded_response_is_discarded() {
        let api = Arc::new(MockPublicationApi::new());
        api.push_article(published("art-1", "slow network stacks"));
        api.push_article(published("art-2", "fast parsers"));
        api.delay_search("slow", Duration::from_millis(120));
        let searcher = searcher_with(Arc::clone(&api), 10);

        searcher.on_input("slow");
        // Let the slow request get past its debounce and into flight.
        tokio::time::sleep(Duration::from_millis(40)).await;
        searcher.on_input("fast");
        tokio::time::sleep(Duration::from_millis(60)).await;

        // The fast response is already applied.
        assert_eq!(searcher.results()[0].id, "art-2");

        // The slow response resolves afterwards and must not overwrite it.
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(api.search_call_count(), 2);
        assert_eq!(searcher.results()[0].id, "art-2");
    }

    #[tokio::test]
    async fn clearing_below_minimum_outlives_a_slow_in_flight_response() {
        let api = Arc::new(MockPublicationApi::new());
        api.push_article(published("art-1", "slow network stacks"));
        api.delay_search("slow", Duration::from_millis(120));
        let searcher = searcher_with(Arc::clone(&api), 10);

        searcher.on_input("slow");
        // Let the slow request get past its debounce and into flight.
        tokio::time::sleep(Duration::from_millis(40)).await;
        searcher.on_input("s");
        assert!(searcher.results().is_empty());

        // The slow response resolves after the clear and must stay discarded.
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(api.search_call_count(), 1);
        assert!(searcher.results().is_empty());
        assert!(!searcher.is_searching());
    }

    #[tokio::test]
    async fn failures_surface_locally_without_retry() {
        let api = Arc::new(MockPublicationApi::new());
        api.push_article(published("art-1", "Rust in education"));
        api.fail_next_search("backend unavailable");
        let searcher = searcher_with(Arc::clone(&api), 5);

        searcher.on_input("rust");
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(api.search_call_count(), 1);
        assert!(searcher.results().is_empty());
        assert!(searcher.error().unwrap().contains("backend unavailable"));
        assert!(!searcher.is_searching());
    }

    #[tokio::test]
    async fn one_shot_search_applies_filters() {
        let api = Arc::new(MockPublicationApi::new());
        api.push_article(published("art-1", "Microgrids for rural clinics"));
        let searcher = searcher_with(Arc::clone(&api), 5);

        // The only hit is untyped and unassigned, so the filters exclude it.
        let request = SearchRequest::new("microgrids", 10)
            .with_article_type(ArticleType::CaseStudy)
            .with_volume(3)
            .with_issue(1);
        let results = searcher.run_search(request).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(api.search_call_count(), 1);

        let results = searcher
            .run_search(SearchRequest::new("microgrids", 10))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(searcher.results().len(), 1);
    }

    #[tokio::test]
    async fn one_shot_search_respects_minimum_length() {
        let api = Arc::new(MockPublicationApi::new());
        api.push_article(published("art-1", "Rust in education"));
        let searcher = searcher_with(Arc::clone(&api), 5);

        let results = searcher.run_search(SearchRequest::new("r", 10)).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(api.search_call_count(), 0);
    }
}
