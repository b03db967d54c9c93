//! Publication workflow: the sequential, reversible confirmation sequence
//! that gates turning a pending manuscript into a published article.
//!
//! [`PublicationWizard`] is the pure state machine; [`PublicationDesk`] owns
//! it together with the cached pending/volume/issue lists and performs the
//! actual API calls. No side effect happens before the final commit, so
//! cancelling at any step is always safe.

pub mod manual;

use crate::api::{PublicationApi, PublishPayload};
use crate::errors::PublicationError;
use crate::models::{
    Article, ArticleType, Issue, Pages, PublicationOptions, ValidationResponse, Volume,
};
use chrono::{NaiveDate, Utc};
use futures::try_join;
use log::{error, info, warn};
use regex::Regex;

/// The wizard's position. Committed and cancelled are terminal outcomes
/// handled by the desk (the wizard is dropped), not resting states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    CollectingMetadata,
    ConfirmDoi,
    ConfirmArchive,
    ConfirmEmail,
    ConfirmFinal,
}

/// Operator-supplied publication metadata, editable only while the wizard
/// is collecting metadata.
#[derive(Debug, Clone)]
pub struct PublishForm {
    pub volume_id: String,
    pub issue_id: String,
    pub article_type: ArticleType,
    pub page_start: Option<u32>,
    pub page_end: Option<u32>,
    pub publish_date: NaiveDate,
    /// Non-empty value bypasses automatic DOI generation entirely.
    pub custom_doi: String,
}

impl Default for PublishForm {
    fn default() -> Self {
        Self {
            volume_id: String::new(),
            issue_id: String::new(),
            article_type: ArticleType::default(),
            page_start: None,
            page_end: None,
            publish_date: Utc::now().date_naive(),
            custom_doi: String::new(),
        }
    }
}

impl PublishForm {
    fn is_valid_doi(doi: &str) -> bool {
        let doi_regex = Regex::new(r"^10\.\d{4,9}/\S+$").unwrap();
        doi_regex.is_match(doi)
    }

    pub fn validate(&self) -> Result<(), Vec<ValidationResponse>> {
        let mut validation_errors = Vec::new();

        if self.volume_id.is_empty() {
            validation_errors.push(ValidationResponse::new("volumeId", "Volume is required"));
        }
        if self.issue_id.is_empty() {
            validation_errors.push(ValidationResponse::new("issueId", "Issue is required"));
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

        let doi = self.custom_doi.trim();
        if !doi.is_empty() && !Self::is_valid_doi(doi) {
            validation_errors.push(ValidationResponse::new(
                "customDOI",
                "Custom DOI must look like 10.xxxx/suffix",
            ));
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

    fn custom_doi(&self) -> Option<String> {
        let doi = self.custom_doi.trim();
        if doi.is_empty() {
            None
        } else {
            Some(doi.to_string())
        }
    }
}

/// What a confirmation step shows the operator: the consequence of the
/// boolean fixed before the confirmation sequence started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepNotice {
    pub title: &'static str,
    pub accepted: bool,
    pub consequence: &'static str,
    pub proceed_label: &'static str,
}

/// Consolidated review shown at the final step.
#[derive(Debug, Clone)]
pub struct PublicationSummary {
    pub title: String,
    pub author: String,
    pub volume_number: Option<i32>,
    pub issue_number: Option<i32>,
    pub article_type: &'static str,
    pub publish_date: NaiveDate,
    pub pages: Option<Pages>,
    pub custom_doi: Option<String>,
    pub options: PublicationOptions,
    /// Always on; listed so the operator sees it alongside the toggles.
    pub metadata_generation: bool,
}

/// Sequential confirmation state machine for one pending article.
///
/// Transitions return the new step or a validation error; state is never
/// mutated from outside. The options booleans are fixed while collecting
/// metadata and the confirmation steps only review them.
#[derive(Debug)]
pub struct PublicationWizard {
    article: Article,
    form: PublishForm,
    options: PublicationOptions,
    step: WorkflowStep,
    error: Option<String>,
}

impl PublicationWizard {
    pub fn new(article: Article) -> Result<Self, PublicationError> {
        if !article.is_pending() {
            return Err(PublicationError::Validation(
                "Only pending articles can be published".to_string(),
            ));
        }
        Ok(Self {
            article,
            form: PublishForm::default(),
            options: PublicationOptions::default(),
            step: WorkflowStep::CollectingMetadata,
            error: None,
        })
    }

    pub fn step(&self) -> WorkflowStep {
        self.step
    }

    pub fn article(&self) -> &Article {
        &self.article
    }

    pub fn form(&self) -> &PublishForm {
        &self.form
    }

    /// Metadata is editable only before the confirmation sequence starts.
    pub fn form_mut(&mut self) -> Result<&mut PublishForm, PublicationError> {
        if self.step != WorkflowStep::CollectingMetadata {
            return Err(PublicationError::InvalidTransition(
                "Metadata can only be edited while collecting metadata".to_string(),
            ));
        }
        Ok(&mut self.form)
    }

    pub fn options(&self) -> PublicationOptions {
        self.options
    }

    /// The toggles are fixed once the confirmation sequence starts.
    pub fn set_options(&mut self, options: PublicationOptions) -> Result<(), PublicationError> {
        if self.step != WorkflowStep::CollectingMetadata {
            return Err(PublicationError::InvalidTransition(
                "Publication options are fixed during confirmation".to_string(),
            ));
        }
        self.options = options;
        Ok(())
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validates the metadata and enters the confirmation sequence. On
    /// validation failure the wizard stays at metadata collection with the
    /// aggregated error recorded.
    pub fn begin_confirmation(&mut self) -> Result<WorkflowStep, PublicationError> {
        if self.step != WorkflowStep::CollectingMetadata {
            return Err(PublicationError::InvalidTransition(
                "Confirmation already in progress".to_string(),
            ));
        }
        if let Err(errors) = self.form.validate() {
            let err = PublicationError::from(errors);
            self.error = Some(err.to_string());
            return Err(err);
        }
        self.error = None;
        self.step = WorkflowStep::ConfirmDoi;
        Ok(self.step)
    }

    /// "Next": advances exactly one confirmation step. The final step is
    /// only left through the desk's commit.
    pub fn advance(&mut self) -> Result<WorkflowStep, PublicationError> {
        self.step = match self.step {
            WorkflowStep::ConfirmDoi => WorkflowStep::ConfirmArchive,
            WorkflowStep::ConfirmArchive => WorkflowStep::ConfirmEmail,
            WorkflowStep::ConfirmEmail => WorkflowStep::ConfirmFinal,
            WorkflowStep::ConfirmFinal => {
                return Err(PublicationError::InvalidTransition(
                    "The final step is confirmed through commit".to_string(),
                ))
            }
            WorkflowStep::CollectingMetadata => {
                return Err(PublicationError::InvalidTransition(
                    "Confirmation has not started".to_string(),
                ))
            }
        };
        Ok(self.step)
    }

    /// "Go Back": one step back; from the DOI step this abandons the
    /// confirmation sequence and reopens the metadata form.
    pub fn go_back(&mut self) -> WorkflowStep {
        self.step = match self.step {
            WorkflowStep::ConfirmFinal => WorkflowStep::ConfirmEmail,
            WorkflowStep::ConfirmEmail => WorkflowStep::ConfirmArchive,
            WorkflowStep::ConfirmArchive => WorkflowStep::ConfirmDoi,
            WorkflowStep::ConfirmDoi => WorkflowStep::CollectingMetadata,
            WorkflowStep::CollectingMetadata => WorkflowStep::CollectingMetadata,
        };
        self.step
    }

    /// The consequence text for the current confirmation step; `None` at
    /// metadata collection and the final review.
    pub fn step_notice(&self) -> Option<StepNotice> {
        match self.step {
            WorkflowStep::ConfirmDoi => Some(if self.options.doi_enabled {
                StepNotice {
                    title: "DOI Registration Confirmation",
                    accepted: true,
                    consequence: "A DOI will be registered with Crossref, making this \
                                  article permanently citable and easier to discover.",
                    proceed_label: "Confirm DOI Registration",
                }
            } else {
                StepNotice {
                    title: "DOI Registration Confirmation",
                    accepted: false,
                    consequence: "Without a DOI this article will be harder to cite and \
                                  discover. Not recommended for peer-reviewed research.",
                    proceed_label: "Proceed Without DOI",
                }
            }),
            WorkflowStep::ConfirmArchive => Some(if self.options.internet_archive_enabled {
                StepNotice {
                    title: "Internet Archive Preservation Confirmation",
                    accepted: true,
                    consequence: "The article will be permanently preserved in the \
                                  Internet Archive, ensuring long-term accessibility.",
                    proceed_label: "Confirm Archive Upload",
                }
            } else {
                StepNotice {
                    title: "Internet Archive Preservation Confirmation",
                    accepted: false,
                    consequence: "The article will not be preserved in the Internet \
                                  Archive; the journal remains responsible for \
                                  long-term preservation.",
                    proceed_label: "Proceed Without Archive",
                }
            }),
            WorkflowStep::ConfirmEmail => Some(if self.options.email_notification_enabled {
                StepNotice {
                    title: "Email Notification Confirmation",
                    accepted: true,
                    consequence: "All active subscribers will receive an email \
                                  notification about this new article.",
                    proceed_label: "Confirm Email Notification",
                }
            } else {
                StepNotice {
                    title: "Email Notification Confirmation",
                    accepted: false,
                    consequence: "Subscribers will not be notified; they will have to \
                                  discover the article on the journal website.",
                    proceed_label: "Proceed Without Notification",
                }
            }),
            _ => None,
        }
    }

    /// Builds the commit payload. Only valid at the final review step.
    pub fn commit_payload(&self) -> Result<PublishPayload, PublicationError> {
        if self.step != WorkflowStep::ConfirmFinal {
            return Err(PublicationError::InvalidTransition(
                "Publishing requires completing all confirmation steps".to_string(),
            ));
        }
        Ok(PublishPayload {
            volume_id: self.form.volume_id.clone(),
            issue_id: self.form.issue_id.clone(),
            article_type: self.form.article_type,
            publish_date: self.form.publish_date,
            pages: self.form.pages(),
            custom_doi: self.form.custom_doi(),
            options: self.options,
        })
    }

    /// Commit failed: reopen the metadata form with every entered value
    /// intact and the error surfaced inline.
    fn reopen_with_error(&mut self, error: &PublicationError) {
        self.step = WorkflowStep::CollectingMetadata;
        self.error = Some(error.to_string());
    }
}

/// Admin-side controller: owns the pending list, the volume/issue caches
/// and at most one active wizard, and performs all API calls.
pub struct PublicationDesk {
    api: std::sync::Arc<dyn PublicationApi>,
    pending: Vec<Article>,
    volumes: Vec<Volume>,
    issues: Vec<Issue>,
    wizard: Option<PublicationWizard>,
}

impl PublicationDesk {
    pub fn new(api: std::sync::Arc<dyn PublicationApi>) -> Self {
        Self {
            api,
            pending: Vec::new(),
            volumes: Vec::new(),
            issues: Vec::new(),
            wizard: None,
        }
    }

    /// Reloads pending articles and volumes concurrently, joined before use.
    pub async fn refresh(&mut self) -> Result<(), PublicationError> {
        let (pending, volumes) = try_join!(
            self.api.get_pending_publications(None),
            self.api.get_volumes()
        )?;
        info!(
            "Loaded {} pending article(s) and {} volume(s)",
            pending.len(),
            volumes.len()
        );
        self.pending = pending;
        self.volumes = volumes;
        Ok(())
    }

    pub fn pending(&self) -> &[Article] {
        &self.pending
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn wizard(&self) -> Option<&PublicationWizard> {
        self.wizard.as_ref()
    }

    pub fn wizard_mut(&mut self) -> Option<&mut PublicationWizard> {
        self.wizard.as_mut()
    }

    /// Opens the wizard for a pending article with a fresh form and all
    /// options reset to disabled.
    pub fn open_wizard(&mut self, article_id: &str) -> Result<&PublicationWizard, PublicationError> {
        let article = self
            .pending
            .iter()
            .find(|a| a.id == article_id)
            .cloned()
            .ok_or_else(|| {
                PublicationError::NotFound(format!("No pending article with id {}", article_id))
            })?;
        let wizard = PublicationWizard::new(article)?;
        Ok(self.wizard.insert(wizard))
    }

    /// Selecting a volume clears the dependent issue choice and loads that
    /// volume's issues.
    pub async fn select_volume(&mut self, volume_id: &str) -> Result<(), PublicationError> {
        let issues = self.api.get_issues_by_volume(volume_id).await?;
        self.issues = issues;
        if let Some(wizard) = self.wizard.as_mut() {
            let form = wizard.form_mut()?;
            form.volume_id = volume_id.to_string();
            form.issue_id.clear();
        }
        Ok(())
    }

    /// Discards the wizard and every in-progress choice. No API call is
    /// made; nothing has been committed yet.
    pub fn cancel_wizard(&mut self) {
        if self.wizard.take().is_some() {
            info!("Publication cancelled by operator before commit");
        }
    }

    /// Final-review projection, with volume/issue numbers resolved from the
    /// cached lists.
    pub fn wizard_summary(&self) -> Option<PublicationSummary> {
        let wizard = self.wizard.as_ref()?;
        let form = wizard.form();
        Some(PublicationSummary {
            title: wizard.article().title.clone(),
            author: wizard.article().author.name.clone(),
            volume_number: self
                .volumes
                .iter()
                .find(|v| v.id == form.volume_id)
                .map(|v| v.volume_number),
            issue_number: self
                .issues
                .iter()
                .find(|i| i.id == form.issue_id)
                .map(|i| i.issue_number),
            article_type: form.article_type.label(),
            publish_date: form.publish_date,
            pages: form.pages(),
            custom_doi: form.custom_doi(),
            options: wizard.options(),
            metadata_generation: true,
        })
    }

    /// "Confirm and Publish": the one irreversible call. On success the
    /// pending list is refreshed and the wizard is reset for the next
    /// article; on failure the wizard reopens the metadata form with the
    /// entered values preserved. Never retried silently.
    pub async fn commit(&mut self) -> Result<Article, PublicationError> {
        let (article_id, payload) = {
            let wizard = self.wizard.as_ref().ok_or_else(|| {
                PublicationError::InvalidTransition("No publication in progress".to_string())
            })?;
            (wizard.article().id.clone(), wizard.commit_payload()?)
        };

        match self.api.publish_article(&article_id, &payload).await {
            Ok(published) => {
                info!("Article {} published", article_id);
                self.wizard = None;
                if let Err(e) = self.refresh().await {
                    warn!("Published, but refreshing the pending list failed: {}", e);
                }
                Ok(published)
            }
            Err(e) => {
                error!("Publishing article {} failed: {}", article_id, e);
                if let Some(wizard) = self.wizard.as_mut() {
                    wizard.reopen_with_error(&e);
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, Lifecycle};

    fn pending_article() -> Article {
        Article {
            id: "art-1".to_string(),
            title: "Groundwater Quality in Benin City".to_string(),
            abstract_text: "An assessment of groundwater quality.".to_string(),
            keywords: vec!["water".to_string()],
            article_type: ArticleType::ResearchArticle,
            lifecycle: Lifecycle::Pending,
            author: Author::new("a-1", "A. Okafor", "okafor@uniben.edu"),
            co_authors: Vec::new(),
            volume: None,
            issue: None,
            pages: None,
            publish_date: None,
            doi: None,
            pdf_file: None,
            license: "CC BY 4.0".to_string(),
            created_at: None,
        }
    }

    fn wizard_with_metadata() -> PublicationWizard {
        let mut wizard = PublicationWizard::new(pending_article()).unwrap();
        {
            let form = wizard.form_mut().unwrap();
            form.volume_id = "vol-1".to_string();
            form.issue_id = "iss-1".to_string();
        }
        wizard
    }

    #[test]
    fn published_articles_cannot_enter_the_wizard() {
        let mut article = pending_article();
        article.lifecycle = Lifecycle::Published;
        assert!(PublicationWizard::new(article).is_err());
    }

    #[test]
    fn empty_volume_or_issue_blocks_confirmation() {
        let mut wizard = PublicationWizard::new(pending_article()).unwrap();
        let err = wizard.begin_confirmation().unwrap_err();
        assert!(matches!(err, PublicationError::Validation(_)));
        assert_eq!(wizard.step(), WorkflowStep::CollectingMetadata);
        assert!(wizard.last_error().unwrap().contains("Volume is required"));

        wizard.form_mut().unwrap().volume_id = "vol-1".to_string();
        assert!(wizard.begin_confirmation().is_err());
        assert_eq!(wizard.step(), WorkflowStep::CollectingMetadata);
    }

    #[test]
    fn confirmation_walks_one_step_at_a_time() {
        let mut wizard = wizard_with_metadata();
        assert_eq!(wizard.begin_confirmation().unwrap(), WorkflowStep::ConfirmDoi);
        assert_eq!(wizard.advance().unwrap(), WorkflowStep::ConfirmArchive);
        assert_eq!(wizard.advance().unwrap(), WorkflowStep::ConfirmEmail);
        assert_eq!(wizard.advance().unwrap(), WorkflowStep::ConfirmFinal);
        // The final step is left through commit, not advance.
        assert!(wizard.advance().is_err());
        assert_eq!(wizard.step(), WorkflowStep::ConfirmFinal);
    }

    #[test]
    fn go_back_from_final_returns_to_email_never_skips() {
        let mut wizard = wizard_with_metadata();
        wizard.begin_confirmation().unwrap();
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        assert_eq!(wizard.step(), WorkflowStep::ConfirmFinal);

        assert_eq!(wizard.go_back(), WorkflowStep::ConfirmEmail);
        assert_eq!(wizard.go_back(), WorkflowStep::ConfirmArchive);
        assert_eq!(wizard.go_back(), WorkflowStep::ConfirmDoi);
        // Back from the first confirmation abandons the sequence entirely.
        assert_eq!(wizard.go_back(), WorkflowStep::CollectingMetadata);
    }

    #[test]
    fn options_are_fixed_once_confirmation_starts() {
        let mut wizard = wizard_with_metadata();
        wizard
            .set_options(PublicationOptions {
                doi_enabled: true,
                ..PublicationOptions::default()
            })
            .unwrap();
        wizard.begin_confirmation().unwrap();

        assert!(wizard
            .set_options(PublicationOptions::default())
            .is_err());
        assert!(wizard.form_mut().is_err());
        assert!(wizard.options().doi_enabled);
    }

    #[test]
    fn step_notices_reflect_the_fixed_booleans() {
        let mut wizard = wizard_with_metadata();
        wizard
            .set_options(PublicationOptions {
                doi_enabled: false,
                internet_archive_enabled: true,
                email_notification_enabled: false,
            })
            .unwrap();
        wizard.begin_confirmation().unwrap();

        let doi = wizard.step_notice().unwrap();
        assert!(!doi.accepted);
        assert_eq!(doi.proceed_label, "Proceed Without DOI");

        wizard.advance().unwrap();
        let archive = wizard.step_notice().unwrap();
        assert!(archive.accepted);
        assert_eq!(archive.proceed_label, "Confirm Archive Upload");

        wizard.advance().unwrap();
        wizard.advance().unwrap();
        assert!(wizard.step_notice().is_none());
    }

    #[test]
    fn page_range_must_be_complete_and_ordered() {
        let mut wizard = wizard_with_metadata();
        wizard.form_mut().unwrap().page_start = Some(5);
        assert!(wizard.begin_confirmation().is_err());

        wizard.form_mut().unwrap().page_end = Some(3);
        assert!(wizard.begin_confirmation().is_err());

        wizard.form_mut().unwrap().page_end = Some(12);
        assert!(wizard.begin_confirmation().is_ok());
    }

    #[test]
    fn malformed_custom_doi_is_rejected() {
        let mut wizard = wizard_with_metadata();
        wizard.form_mut().unwrap().custom_doi = "not-a-doi".to_string();
        assert!(wizard.begin_confirmation().is_err());

        wizard.form_mut().unwrap().custom_doi = "10.5281/jsti.2020.14".to_string();
        assert!(wizard.begin_confirmation().is_ok());
    }

    #[test]
    fn commit_payload_only_at_final_step() {
        let mut wizard = wizard_with_metadata();
        wizard.begin_confirmation().unwrap();
        assert!(wizard.commit_payload().is_err());

        wizard.advance().unwrap();
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        let payload = wizard.commit_payload().unwrap();
        assert_eq!(payload.volume_id, "vol-1");
        assert_eq!(payload.issue_id, "iss-1");
        assert_eq!(payload.custom_doi, None);
        assert_eq!(payload.pages, None);
    }

    #[test]
    fn empty_custom_doi_is_omitted_from_payload() {
        let mut wizard = wizard_with_metadata();
        wizard.form_mut().unwrap().custom_doi = "   ".to_string();
        wizard.begin_confirmation().unwrap();
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        assert_eq!(wizard.commit_payload().unwrap().custom_doi, None);
    }
}
