//! reqwest-backed implementation of [`PublicationApi`].

use crate::api::{
    CurrentIssue, ManualArticlePayload, Pagination, PublicationApi, PublishPayload, SearchRequest,
};
use crate::errors::PublicationError;
use crate::models::{ApiEnvelope, ArchiveVolume, Article, Author, Issue, Volume};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

pub struct HttpPublicationApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPublicationApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, PublicationError> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| PublicationError::Api(e.to_string()))?;
        Self::unwrap_envelope(response).await
    }

    /// Unwraps the `{ success, data, message }` envelope, mapping 404s to the
    /// distinct not-found presentation.
    async fn unwrap_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PublicationError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PublicationError::NotFound(
                "Requested resource does not exist".to_string(),
            ));
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| PublicationError::Api(format!("Malformed response: {}", e)))?;

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| format!("Request failed with status {}", status));
            warn!("Backend reported failure: {}", message);
            return Err(PublicationError::Api(message));
        }

        envelope
            .data
            .ok_or_else(|| PublicationError::Api("Response envelope missing data".to_string()))
    }

    /// Success check for endpoints whose envelope carries no data.
    async fn expect_success(response: reqwest::Response) -> Result<(), PublicationError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PublicationError::NotFound(
                "Requested resource does not exist".to_string(),
            ));
        }

        let envelope: ApiEnvelope<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| PublicationError::Api(format!("Malformed response: {}", e)))?;
        if !envelope.success {
            return Err(PublicationError::Api(envelope.message.unwrap_or_else(
                || format!("Request failed with status {}", status),
            )));
        }
        Ok(())
    }

    fn pagination_query(pagination: Option<Pagination>) -> Vec<(&'static str, String)> {
        match pagination {
            Some(p) => vec![("page", p.page.to_string()), ("limit", p.limit.to_string())],
            None => Vec::new(),
        }
    }

    fn manual_article_form(payload: &ManualArticlePayload) -> Result<Form, PublicationError> {
        let mut form = Form::new()
            .text("title", payload.title.clone())
            .text("abstract", payload.abstract_text.clone())
            .text("keywords", payload.keywords.join(","))
            .text("authorId", payload.author_id.clone())
            .text("volumeId", payload.volume_id.clone())
            .text("issueId", payload.issue_id.clone())
            .text("articleType", payload.article_type.as_str().to_string())
            .text(
                "publishDate",
                payload.publish_date.format("%Y-%m-%d").to_string(),
            )
            .text("doiEnabled", payload.options.doi_enabled.to_string())
            .text(
                "internetArchiveEnabled",
                payload.options.internet_archive_enabled.to_string(),
            )
            .text(
                "emailNotificationEnabled",
                payload.options.email_notification_enabled.to_string(),
            );

        for co_author_id in &payload.co_author_ids {
            form = form.text("coAuthorIds", co_author_id.clone());
        }
        if let Some(pages) = payload.pages {
            form = form
                .text("pages[start]", pages.start.to_string())
                .text("pages[end]", pages.end.to_string());
        }
        if let Some(doi) = &payload.custom_doi {
            form = form.text("customDOI", doi.clone());
        }
        if let Some(pdf) = &payload.pdf {
            let part = Part::bytes(pdf.bytes.clone())
                .file_name(pdf.filename.clone())
                .mime_str("application/pdf")
                .map_err(|e| PublicationError::Internal(e.to_string()))?;
            form = form.part("pdfFile", part);
        }

        Ok(form)
    }
}

#[async_trait]
impl PublicationApi for HttpPublicationApi {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Article>, PublicationError> {
        let mut query = vec![
            ("q", request.query.clone()),
            ("limit", request.limit.to_string()),
        ];
        if let Some(article_type) = request.article_type {
            query.push(("articleType", article_type.as_str().to_string()));
        }
        if let Some(volume) = request.volume_number {
            query.push(("volume", volume.to_string()));
        }
        if let Some(issue) = request.issue_number {
            query.push(("issue", issue.to_string()));
        }

        debug!("Searching articles for query: {}", request.query);
        self.get_json("/api/publications/search", &query).await
    }

    async fn get_pending_publications(
        &self,
        pagination: Option<Pagination>,
    ) -> Result<Vec<Article>, PublicationError> {
        self.get_json(
            "/api/publications/pending",
            &Self::pagination_query(pagination),
        )
        .await
    }

    async fn get_manual_articles(
        &self,
        pagination: Option<Pagination>,
    ) -> Result<Vec<Article>, PublicationError> {
        self.get_json(
            "/api/publications/manual",
            &Self::pagination_query(pagination),
        )
        .await
    }

    async fn get_published_article(
        &self,
        article_id: &str,
    ) -> Result<Article, PublicationError> {
        self.get_json(&format!("/api/publications/{}", article_id), &[])
            .await
    }

    async fn publish_article(
        &self,
        article_id: &str,
        payload: &PublishPayload,
    ) -> Result<Article, PublicationError> {
        debug!("Publishing article {}", article_id);
        let response = self
            .client
            .post(self.url(&format!("/api/publications/{}/publish", article_id)))
            .json(payload)
            .send()
            .await
            .map_err(|e| PublicationError::Api(e.to_string()))?;
        Self::unwrap_envelope(response).await
    }

    async fn create_manual_article(
        &self,
        payload: &ManualArticlePayload,
    ) -> Result<Article, PublicationError> {
        let form = Self::manual_article_form(payload)?;
        let response = self
            .client
            .post(self.url("/api/publications/manual"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| PublicationError::Api(e.to_string()))?;
        Self::unwrap_envelope(response).await
    }

    async fn update_manual_article(
        &self,
        article_id: &str,
        payload: &ManualArticlePayload,
    ) -> Result<Article, PublicationError> {
        let form = Self::manual_article_form(payload)?;
        let response = self
            .client
            .put(self.url(&format!("/api/publications/manual/{}", article_id)))
            .multipart(form)
            .send()
            .await
            .map_err(|e| PublicationError::Api(e.to_string()))?;
        Self::unwrap_envelope(response).await
    }

    async fn delete_manual_article(&self, article_id: &str) -> Result<(), PublicationError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/publications/manual/{}", article_id)))
            .send()
            .await
            .map_err(|e| PublicationError::Api(e.to_string()))?;
        Self::expect_success(response).await
    }

    async fn get_volumes(&self) -> Result<Vec<Volume>, PublicationError> {
        self.get_json("/api/volumes", &[]).await
    }

    async fn get_issues_by_volume(
        &self,
        volume_id: &str,
    ) -> Result<Vec<Issue>, PublicationError> {
        self.get_json(&format!("/api/volumes/{}/issues", volume_id), &[])
            .await
    }

    async fn get_archives(&self) -> Result<Vec<ArchiveVolume>, PublicationError> {
        self.get_json("/api/archives", &[]).await
    }

    async fn get_current_issue(&self) -> Result<CurrentIssue, PublicationError> {
        self.get_json("/api/issues/current", &[]).await
    }

    async fn get_articles_by_volume_and_issue(
        &self,
        volume_id: &str,
        issue_id: &str,
    ) -> Result<Vec<Article>, PublicationError> {
        self.get_json(
            &format!("/api/volumes/{}/issues/{}/articles", volume_id, issue_id),
            &[],
        )
        .await
    }

    async fn get_authors(&self) -> Result<Vec<Author>, PublicationError> {
        self.get_json("/api/authors", &[]).await
    }
}
