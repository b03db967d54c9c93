//! In-memory publication backend for tests.

use crate::api::{
    CurrentIssue, ManualArticlePayload, Pagination, PublicationApi, PublishPayload, SearchRequest,
};
use crate::errors::PublicationError;
use crate::models::{
    ArchiveVolume, Article, Author, Issue, Lifecycle, Volume, DEFAULT_LICENSE,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

#[derive(Default)]
struct MockState {
    volumes: Vec<Volume>,
    issues: Vec<Issue>,
    authors: Vec<Author>,
    articles: Vec<Article>,
    manual_ids: HashSet<String>,
    archives: Vec<ArchiveVolume>,
}

/// Hand-rolled mock implementing [`PublicationApi`].
///
/// Supports call counting, recording of publish payloads, per-query search
/// latency, and one-shot injected failures for the write operations.
#[derive(Default)]
pub struct MockPublicationApi {
    state: Mutex<MockState>,
    search_calls: AtomicUsize,
    publish_calls: Mutex<Vec<(String, PublishPayload)>>,
    search_delays: Mutex<HashMap<String, Duration>>,
    fail_next_search: Mutex<Option<String>>,
    fail_next_publish: Mutex<Option<String>>,
    fail_next_create: Mutex<Option<String>>,
    fail_next_manual_list: Mutex<Option<String>>,
}

impl MockPublicationApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_volume(&self, volume: Volume) {
        self.state.lock().unwrap().volumes.push(volume);
    }

    pub fn push_issue(&self, issue: Issue) {
        self.state.lock().unwrap().issues.push(issue);
    }

    pub fn push_author(&self, author: Author) {
        self.state.lock().unwrap().authors.push(author);
    }

    pub fn push_article(&self, article: Article) {
        self.state.lock().unwrap().articles.push(article);
    }

    pub fn set_archives(&self, archives: Vec<ArchiveVolume>) {
        self.state.lock().unwrap().archives = archives;
    }

    /// How many times `search()` has been invoked, debounced or not.
    pub fn search_call_count(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Every `publish_article` invocation, in order, with its full payload.
    pub fn publish_calls(&self) -> Vec<(String, PublishPayload)> {
        self.publish_calls.lock().unwrap().clone()
    }

    /// Simulate a slow backend for one exact query string.
    pub fn delay_search(&self, query: &str, delay: Duration) {
        self.search_delays
            .lock()
            .unwrap()
            .insert(query.to_string(), delay);
    }

    /// The next `search` call fails with this message.
    pub fn fail_next_search(&self, message: &str) {
        *self.fail_next_search.lock().unwrap() = Some(message.to_string());
    }

    /// The next `publish_article` call fails with this message.
    pub fn fail_next_publish(&self, message: &str) {
        *self.fail_next_publish.lock().unwrap() = Some(message.to_string());
    }

    /// The next `create_manual_article` call fails with this message.
    pub fn fail_next_create(&self, message: &str) {
        *self.fail_next_create.lock().unwrap() = Some(message.to_string());
    }

    /// The next `get_manual_articles` call fails with this message.
    pub fn fail_next_manual_list(&self, message: &str) {
        *self.fail_next_manual_list.lock().unwrap() = Some(message.to_string());
    }

    fn publish_datetime(date: NaiveDate) -> DateTime<Utc> {
        DateTime::<Utc>::from_naive_utc_and_offset(date.and_time(NaiveTime::MIN), Utc)
    }

    fn article_from_manual(
        state: &MockState,
        payload: &ManualArticlePayload,
    ) -> Result<Article, PublicationError> {
        let author = state
            .authors
            .iter()
            .find(|a| a.id == payload.author_id)
            .cloned()
            .ok_or_else(|| PublicationError::NotFound("Author does not exist".to_string()))?;
        let co_authors = state
            .authors
            .iter()
            .filter(|a| payload.co_author_ids.contains(&a.id))
            .cloned()
            .collect();
        let volume = state.volumes.iter().find(|v| v.id == payload.volume_id).cloned();
        let issue = state.issues.iter().find(|i| i.id == payload.issue_id).cloned();

        Ok(Article {
            id: Uuid::new_v4().to_string(),
            title: payload.title.clone(),
            abstract_text: payload.abstract_text.clone(),
            keywords: payload.keywords.clone(),
            article_type: payload.article_type,
            lifecycle: Lifecycle::Published,
            author,
            co_authors,
            volume,
            issue,
            pages: payload.pages,
            publish_date: Some(Self::publish_datetime(payload.publish_date)),
            doi: payload.custom_doi.clone(),
            pdf_file: payload.pdf.as_ref().map(|p| format!("/pdfs/{}", p.filename)),
            license: DEFAULT_LICENSE.to_string(),
            created_at: Some(Utc::now()),
        })
    }
}

#[async_trait]
impl PublicationApi for MockPublicationApi {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Article>, PublicationError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);

        let delay = self
            .search_delays
            .lock()
            .unwrap()
            .get(&request.query)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.fail_next_search.lock().unwrap().take() {
            return Err(PublicationError::Api(message));
        }

        let needle = request.query.to_lowercase();
        let state = self.state.lock().unwrap();
        let mut hits: Vec<Article> = state
            .articles
            .iter()
            .filter(|a| a.lifecycle == Lifecycle::Published)
            .filter(|a| a.title.to_lowercase().contains(&needle))
            .filter(|a| {
                request
                    .article_type
                    .map_or(true, |t| a.article_type == t)
            })
            .filter(|a| {
                request.volume_number.map_or(true, |v| {
                    a.volume.as_ref().is_some_and(|vol| vol.volume_number == v)
                })
            })
            .filter(|a| {
                request.issue_number.map_or(true, |i| {
                    a.issue.as_ref().is_some_and(|iss| iss.issue_number == i)
                })
            })
            .cloned()
            .collect();
        hits.truncate(request.limit);
        Ok(hits)
    }

    async fn get_pending_publications(
        &self,
        _pagination: Option<Pagination>,
    ) -> Result<Vec<Article>, PublicationError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .articles
            .iter()
            .filter(|a| a.lifecycle == Lifecycle::Pending)
            .cloned()
            .collect())
    }

    async fn get_manual_articles(
        &self,
        _pagination: Option<Pagination>,
    ) -> Result<Vec<Article>, PublicationError> {
        if let Some(message) = self.fail_next_manual_list.lock().unwrap().take() {
            return Err(PublicationError::Api(message));
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .articles
            .iter()
            .filter(|a| state.manual_ids.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn get_published_article(
        &self,
        article_id: &str,
    ) -> Result<Article, PublicationError> {
        let state = self.state.lock().unwrap();
        state
            .articles
            .iter()
            .find(|a| a.id == article_id && a.lifecycle == Lifecycle::Published)
            .cloned()
            .ok_or_else(|| {
                PublicationError::NotFound(format!("Article {} not found", article_id))
            })
    }

    async fn publish_article(
        &self,
        article_id: &str,
        payload: &PublishPayload,
    ) -> Result<Article, PublicationError> {
        self.publish_calls
            .lock()
            .unwrap()
            .push((article_id.to_string(), payload.clone()));

        if let Some(message) = self.fail_next_publish.lock().unwrap().take() {
            return Err(PublicationError::Api(message));
        }

        let mut state = self.state.lock().unwrap();
        let volume = state.volumes.iter().find(|v| v.id == payload.volume_id).cloned();
        let issue = state.issues.iter().find(|i| i.id == payload.issue_id).cloned();

        let article = state
            .articles
            .iter_mut()
            .find(|a| a.id == article_id)
            .ok_or_else(|| {
                PublicationError::NotFound(format!("Article {} not found", article_id))
            })?;
        if article.lifecycle == Lifecycle::Published {
            return Err(PublicationError::Validation(
                "Article is already published".to_string(),
            ));
        }

        article.lifecycle = Lifecycle::Published;
        article.article_type = payload.article_type;
        article.volume = volume;
        article.issue = issue;
        article.pages = payload.pages;
        article.publish_date = Some(Self::publish_datetime(payload.publish_date));
        // A supplied DOI wins over generation no matter what doi_enabled says.
        article.doi = match &payload.custom_doi {
            Some(doi) => Some(doi.clone()),
            None if payload.options.doi_enabled => {
                Some(format!("10.5281/jsti.{}", article.id))
            }
            None => None,
        };

        Ok(article.clone())
    }

    async fn create_manual_article(
        &self,
        payload: &ManualArticlePayload,
    ) -> Result<Article, PublicationError> {
        if let Some(message) = self.fail_next_create.lock().unwrap().take() {
            return Err(PublicationError::Api(message));
        }

        let mut state = self.state.lock().unwrap();
        let article = Self::article_from_manual(&state, payload)?;
        state.manual_ids.insert(article.id.clone());
        state.articles.push(article.clone());
        Ok(article)
    }

    async fn update_manual_article(
        &self,
        article_id: &str,
        payload: &ManualArticlePayload,
    ) -> Result<Article, PublicationError> {
        let mut state = self.state.lock().unwrap();
        if !state.manual_ids.contains(article_id) {
            return Err(PublicationError::NotFound(format!(
                "Manual article {} not found",
                article_id
            )));
        }

        let mut updated = Self::article_from_manual(&state, payload)?;
        updated.id = article_id.to_string();
        let slot = state
            .articles
            .iter_mut()
            .find(|a| a.id == article_id)
            .ok_or_else(|| {
                PublicationError::NotFound(format!("Manual article {} not found", article_id))
            })?;
        if payload.pdf.is_none() {
            updated.pdf_file = slot.pdf_file.clone();
        }
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete_manual_article(&self, article_id: &str) -> Result<(), PublicationError> {
        let mut state = self.state.lock().unwrap();
        if !state.manual_ids.remove(article_id) {
            return Err(PublicationError::NotFound(format!(
                "Manual article {} not found",
                article_id
            )));
        }
        state.articles.retain(|a| a.id != article_id);
        Ok(())
    }

    async fn get_volumes(&self) -> Result<Vec<Volume>, PublicationError> {
        Ok(self.state.lock().unwrap().volumes.clone())
    }

    async fn get_issues_by_volume(
        &self,
        volume_id: &str,
    ) -> Result<Vec<Issue>, PublicationError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .issues
            .iter()
            .filter(|i| i.volume_id == volume_id)
            .cloned()
            .collect())
    }

    async fn get_archives(&self) -> Result<Vec<ArchiveVolume>, PublicationError> {
        Ok(self.state.lock().unwrap().archives.clone())
    }

    async fn get_current_issue(&self) -> Result<CurrentIssue, PublicationError> {
        let state = self.state.lock().unwrap();
        let issue = state
            .issues
            .iter()
            .max_by_key(|i| i.publish_date)
            .cloned()
            .ok_or_else(|| PublicationError::NotFound("No issues published yet".to_string()))?;
        let articles = state
            .articles
            .iter()
            .filter(|a| {
                a.lifecycle == Lifecycle::Published
                    && a.issue.as_ref().is_some_and(|i| i.id == issue.id)
            })
            .cloned()
            .collect();
        Ok(CurrentIssue { issue, articles })
    }

    async fn get_articles_by_volume_and_issue(
        &self,
        volume_id: &str,
        issue_id: &str,
    ) -> Result<Vec<Article>, PublicationError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .articles
            .iter()
            .filter(|a| {
                a.lifecycle == Lifecycle::Published
                    && a.volume.as_ref().is_some_and(|v| v.id == volume_id)
                    && a.issue.as_ref().is_some_and(|i| i.id == issue_id)
            })
            .cloned()
            .collect())
    }

    async fn get_authors(&self) -> Result<Vec<Author>, PublicationError> {
        Ok(self.state.lock().unwrap().authors.clone())
    }
}
