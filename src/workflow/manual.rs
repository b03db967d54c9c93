//! Manual article entry: direct insertion of previously published material
//! (migration and backfill), bypassing the confirmation sequence.
//!
//! A manual article is created already published. The form collects the full
//! metadata plus the PDF in one screen; a single review step stands in for
//! the publication wizard's confirmations.

use crate::api::{ManualArticlePayload, PdfUpload, PublicationApi};
use crate::errors::PublicationError;
use crate::models::{
    Article, ArticleType, Author, Issue, Pages, PublicationOptions, ValidationResponse, Volume,
};
use chrono::{NaiveDate, Utc};
use futures::try_join;
use log::{error, info, warn};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualStep {
    Drafting,
    Reviewing,
}

/// One-screen form for a manually entered article. Keywords are kept as the
/// raw comma-separated input and parsed on submission.
#[derive(Debug, Clone)]
pub struct ManualArticleForm {
    pub title: String,
    pub abstract_text: String,
    pub keywords: String,
    pub author_id: String,
    pub co_author_ids: Vec<String>,
    pub volume_id: String,
    pub issue_id: String,
    pub article_type: ArticleType,
    pub publish_date: NaiveDate,
    pub page_start: Option<u32>,
    pub page_end: Option<u32>,
    pub custom_doi: String,
    pub pdf: Option<PdfUpload>,
    pub options: PublicationOptions,
}

impl Default for ManualArticleForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            abstract_text: String::new(),
            keywords: String::new(),
            author_id: String::new(),
            co_author_ids: Vec::new(),
            volume_id: String::new(),
            issue_id: String::new(),
            article_type: ArticleType::default(),
            publish_date: Utc::now().date_naive(),
            page_start: None,
            page_end: None,
            custom_doi: String::new(),
            pdf: None,
            options: PublicationOptions::default(),
        }
    }
}

impl ManualArticleForm {
    /// Splits the raw keyword input on commas, dropping empties.
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect()
    }

    /// Co-author ids actually sent: the primary author is excluded even if
    /// selected, and ids that are unknown or belong to deactivated authors
    /// are dropped.
    pub fn sanitized_co_authors(&self, authors: &[Author]) -> Vec<String> {
        self.co_author_ids
            .iter()
            .filter(|id| **id != self.author_id)
            .filter(|id| authors.iter().any(|a| a.id == **id && a.is_active))
            .cloned()
            .collect()
    }

    /// Required-field check. The PDF is mandatory on create; an update
    /// without a new file keeps the stored one.
    pub fn validate(&self, pdf_required: bool) -> Result<(), Vec<ValidationResponse>> {
        let mut validation_errors = Vec::new();

        if self.title.trim().is_empty() {
            validation_errors.push(ValidationResponse::new("title", "Title is required"));
        }
        if self.abstract_text.trim().is_empty() {
            validation_errors.push(ValidationResponse::new("abstract", "Abstract is required"));
        }
        if self.author_id.is_empty() {
            validation_errors.push(ValidationResponse::new(
                "authorId",
                "A primary author is required",
            ));
        }
        if self.volume_id.is_empty() {
            validation_errors.push(ValidationResponse::new("volumeId", "Volume is required"));
        }
        if self.issue_id.is_empty() {
            validation_errors.push(ValidationResponse::new("issueId", "Issue is required"));
        }
        if pdf_required && self.pdf.is_none() {
            validation_errors.push(ValidationResponse::new("pdfFile", "A PDF file is required"));
        }

        match (self.page_start, self.page_end) {
            (Some(start), Some(end)) => {
                if let Err(e) = Pages::new(start, end) {
                    validation_errors.push(e);
                }
            }
            (None, None) => {}
            _ => validation_errors.push(ValidationResponse::new(
                "pages",
                "Both start and end page are required when a page range is given",
            )),
        }

        if validation_errors.is_empty() {
            Ok(())
        } else {
            Err(validation_errors)
        }
    }

    fn pages(&self) -> Option<Pages> {
        match (self.page_start, self.page_end) {
            (Some(start), Some(end)) => Pages::new(start, end).ok(),
            _ => None,
        }
    }

    /// Builds the submission payload with sanitized co-authors. Assumes
    /// `validate` has passed.
    pub fn payload(&self, authors: &[Author]) -> ManualArticlePayload {
        let doi = self.custom_doi.trim();
        ManualArticlePayload {
            title: self.title.trim().to_string(),
            abstract_text: self.abstract_text.trim().to_string(),
            keywords: self.keyword_list(),
            author_id: self.author_id.clone(),
            co_author_ids: self.sanitized_co_authors(authors),
            volume_id: self.volume_id.clone(),
            issue_id: self.issue_id.clone(),
            article_type: self.article_type,
            publish_date: self.publish_date,
            pages: self.pages(),
            custom_doi: if doi.is_empty() {
                None
            } else {
                Some(doi.to_string())
            },
            options: self.options,
            pdf: self.pdf.clone(),
        }
    }

    /// Prefills the form from an existing manual article for editing. The
    /// PDF slot starts empty; submitting without a new file keeps the
    /// stored one.
    pub fn from_article(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            abstract_text: article.abstract_text.clone(),
            keywords: article.keywords.join(", "),
            author_id: article.author.id.clone(),
            co_author_ids: article.co_authors.iter().map(|a| a.id.clone()).collect(),
            volume_id: article
                .volume
                .as_ref()
                .map(|v| v.id.clone())
                .unwrap_or_default(),
            issue_id: article
                .issue
                .as_ref()
                .map(|i| i.id.clone())
                .unwrap_or_default(),
            article_type: article.article_type,
            publish_date: article
                .publish_date
                .map(|d| d.date_naive())
                .unwrap_or_else(|| Utc::now().date_naive()),
            page_start: article.pages.map(|p| p.start),
            page_end: article.pages.map(|p| p.end),
            custom_doi: article.doi.clone().unwrap_or_default(),
            pdf: None,
            options: PublicationOptions::default(),
        }
    }
}

/// Controller for the manual entry screen: the manual article list, the
/// author/volume/issue choices and a draft-review-submit cycle.
pub struct ManualSubmission {
    api: Arc<dyn PublicationApi>,
    authors: Vec<Author>,
    volumes: Vec<Volume>,
    issues: Vec<Issue>,
    articles: Vec<Article>,
    form: ManualArticleForm,
    editing: Option<String>,
    step: ManualStep,
    error: Option<String>,
}

impl ManualSubmission {
    pub fn new(api: Arc<dyn PublicationApi>) -> Self {
        Self {
            api,
            authors: Vec::new(),
            volumes: Vec::new(),
            issues: Vec::new(),
            articles: Vec::new(),
            form: ManualArticleForm::default(),
            editing: None,
            step: ManualStep::Drafting,
            error: None,
        }
    }

    pub async fn refresh(&mut self) -> Result<(), PublicationError> {
        let (articles, authors, volumes) = try_join!(
            self.api.get_manual_articles(None),
            self.api.get_authors(),
            self.api.get_volumes()
        )?;
        self.articles = articles;
        self.authors = authors;
        self.volumes = volumes;
        Ok(())
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn form(&self) -> &ManualArticleForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> Result<&mut ManualArticleForm, PublicationError> {
        if self.step != ManualStep::Drafting {
            return Err(PublicationError::InvalidTransition(
                "The form is read-only during review".to_string(),
            ));
        }
        Ok(&mut self.form)
    }

    pub fn step(&self) -> ManualStep {
        self.step
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `Some(id)` when editing an existing manual article.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn start_new(&mut self) {
        self.form = ManualArticleForm::default();
        self.editing = None;
        self.step = ManualStep::Drafting;
        self.error = None;
    }

    pub fn start_edit(&mut self, article_id: &str) -> Result<(), PublicationError> {
        let article = self
            .articles
            .iter()
            .find(|a| a.id == article_id)
            .ok_or_else(|| {
                PublicationError::NotFound(format!("No manual article with id {}", article_id))
            })?;
        self.form = ManualArticleForm::from_article(article);
        self.editing = Some(article_id.to_string());
        self.step = ManualStep::Drafting;
        self.error = None;
        Ok(())
    }

    /// Selecting a volume clears the dependent issue choice and loads that
    /// volume's issues.
    pub async fn select_volume(&mut self, volume_id: &str) -> Result<(), PublicationError> {
        self.issues = self.api.get_issues_by_volume(volume_id).await?;
        let form = self.form_mut()?;
        form.volume_id = volume_id.to_string();
        form.issue_id.clear();
        Ok(())
    }

    /// Validates and moves to the review step; the form stays editable only
    /// through `back_to_edit`.
    pub fn begin_review(&mut self) -> Result<(), PublicationError> {
        if self.step != ManualStep::Drafting {
            return Err(PublicationError::InvalidTransition(
                "Review already in progress".to_string(),
            ));
        }
        if let Err(errors) = self.form.validate(self.editing.is_none()) {
            let err = PublicationError::from(errors);
            self.error = Some(err.to_string());
            return Err(err);
        }
        self.error = None;
        self.step = ManualStep::Reviewing;
        Ok(())
    }

    pub fn back_to_edit(&mut self) {
        self.step = ManualStep::Drafting;
    }

    /// Creates or updates the article. On success the manual list is
    /// reloaded and the form reset; on failure the draft reopens with every
    /// entered value intact.
    pub async fn submit(&mut self) -> Result<Article, PublicationError> {
        if self.step != ManualStep::Reviewing {
            return Err(PublicationError::InvalidTransition(
                "Submission requires completing the review step".to_string(),
            ));
        }
        let payload = self.form.payload(&self.authors);

        let outcome = match &self.editing {
            Some(article_id) => self.api.update_manual_article(article_id, &payload).await,
            None => self.api.create_manual_article(&payload).await,
        };

        match outcome {
            Ok(article) => {
                info!("Manual article {} saved", article.id);
                self.start_new();
                match self.api.get_manual_articles(None).await {
                    Ok(articles) => self.articles = articles,
                    Err(e) => {
                        warn!("Saved, but refreshing the manual list failed: {}", e);
                    }
                }
                Ok(article)
            }
            Err(e) => {
                error!("Manual article submission failed: {}", e);
                self.step = ManualStep::Drafting;
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn delete(&mut self, article_id: &str) -> Result<(), PublicationError> {
        self.api.delete_manual_article(article_id).await?;
        info!("Manual article {} deleted", article_id);
        self.articles.retain(|a| a.id != article_id);
        Ok(())
    }
}
