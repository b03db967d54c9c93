//! External publication backend, consumed as an opaque collaborator.

pub mod http;
pub mod mock;

use crate::errors::PublicationError;
use crate::models::{
    ArchiveVolume, Article, ArticleType, Author, Issue, Pages, PublicationOptions, Volume,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Free-text article search with optional filters. Result ordering is the
/// backend's relevance ranking and opaque to this layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub article_type: Option<ArticleType>,
    pub volume_number: Option<i32>,
    pub issue_number: Option<i32>,
    pub limit: usize,
}

impl SearchRequest {
    pub fn new(query: &str, limit: usize) -> Self {
        Self {
            query: query.to_string(),
            article_type: None,
            volume_number: None,
            issue_number: None,
            limit,
        }
    }

    pub fn with_article_type(mut self, article_type: ArticleType) -> Self {
        self.article_type = Some(article_type);
        self
    }

    pub fn with_volume(mut self, volume_number: i32) -> Self {
        self.volume_number = Some(volume_number);
        self
    }

    pub fn with_issue(mut self, issue_number: i32) -> Self {
        self.issue_number = Some(issue_number);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

/// Full payload of the irreversible publish commit.
///
/// `custom_doi`, when present, bypasses automatic DOI generation regardless
/// of `options.doi_enabled`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishPayload {
    pub volume_id: String,
    pub issue_id: String,
    pub article_type: ArticleType,
    pub publish_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Pages>,
    #[serde(rename = "customDOI", skip_serializing_if = "Option::is_none")]
    pub custom_doi: Option<String>,
    #[serde(flatten)]
    pub options: PublicationOptions,
}

/// Uploaded PDF contents plus the original filename.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Multipart payload for direct (migration/backfill) article insertion.
/// Co-author ids are expected to be sanitized before this is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualArticlePayload {
    pub title: String,
    pub abstract_text: String,
    pub keywords: Vec<String>,
    pub author_id: String,
    pub co_author_ids: Vec<String>,
    pub volume_id: String,
    pub issue_id: String,
    pub article_type: ArticleType,
    pub publish_date: NaiveDate,
    pub pages: Option<Pages>,
    pub custom_doi: Option<String>,
    pub options: PublicationOptions,
    /// Required on create; `None` on update keeps the stored file.
    pub pdf: Option<PdfUpload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentIssue {
    pub issue: Issue,
    pub articles: Vec<Article>,
}

/// REST-style publication backend. All write endpoints take multipart form
/// data when a file is involved and JSON otherwise; every response uses the
/// `{ success, data, message }` envelope.
#[async_trait]
pub trait PublicationApi: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Article>, PublicationError>;

    async fn get_pending_publications(
        &self,
        pagination: Option<Pagination>,
    ) -> Result<Vec<Article>, PublicationError>;

    async fn get_manual_articles(
        &self,
        pagination: Option<Pagination>,
    ) -> Result<Vec<Article>, PublicationError>;

    async fn get_published_article(&self, article_id: &str)
        -> Result<Article, PublicationError>;

    async fn publish_article(
        &self,
        article_id: &str,
        payload: &PublishPayload,
    ) -> Result<Article, PublicationError>;

    async fn create_manual_article(
        &self,
        payload: &ManualArticlePayload,
    ) -> Result<Article, PublicationError>;

    async fn update_manual_article(
        &self,
        article_id: &str,
        payload: &ManualArticlePayload,
    ) -> Result<Article, PublicationError>;

    async fn delete_manual_article(&self, article_id: &str) -> Result<(), PublicationError>;

    async fn get_volumes(&self) -> Result<Vec<Volume>, PublicationError>;

    async fn get_issues_by_volume(&self, volume_id: &str)
        -> Result<Vec<Issue>, PublicationError>;

    async fn get_archives(&self) -> Result<Vec<ArchiveVolume>, PublicationError>;

    async fn get_current_issue(&self) -> Result<CurrentIssue, PublicationError>;

    async fn get_articles_by_volume_and_issue(
        &self,
        volume_id: &str,
        issue_id: &str,
    ) -> Result<Vec<Article>, PublicationError>;

    async fn get_authors(&self) -> Result<Vec<Author>, PublicationError>;
}
