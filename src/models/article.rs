use crate::models::{Author, Issue, ValidationResponse, Volume};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_LICENSE: &str = "CC BY 4.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleType {
    ResearchArticle,
    ReviewArticle,
    CaseStudy,
    BookReview,
    Editorial,
    Commentary,
}

impl ArticleType {
    pub const ALL: [ArticleType; 6] = [
        ArticleType::ResearchArticle,
        ArticleType::ReviewArticle,
        ArticleType::CaseStudy,
        ArticleType::BookReview,
        ArticleType::Editorial,
        ArticleType::Commentary,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ArticleType::ResearchArticle => "Research Article",
            ArticleType::ReviewArticle => "Review Article",
            ArticleType::CaseStudy => "Case Study",
            ArticleType::BookReview => "Book Review",
            ArticleType::Editorial => "Editorial",
            ArticleType::Commentary => "Commentary",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleType::ResearchArticle => "research_article",
            ArticleType::ReviewArticle => "review_article",
            ArticleType::CaseStudy => "case_study",
            ArticleType::BookReview => "book_review",
            ArticleType::Editorial => "editorial",
            ArticleType::Commentary => "commentary",
        }
    }
}

impl Default for ArticleType {
    fn default() -> Self {
        ArticleType::ResearchArticle
    }
}

impl fmt::Display for ArticleType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArticleType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown article type: {}", s))
    }
}

/// Lifecycle state of an article. Pending articles are only visible in the
/// admin panel; published ones appear in public listings. The transition
/// happens exactly once, via the publication workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Pending,
    Published,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pages {
    pub start: u32,
    pub end: u32,
}

impl Pages {
    pub fn new(start: u32, end: u32) -> Result<Self, ValidationResponse> {
        if start == 0 || end == 0 {
            return Err(ValidationResponse::new(
                "pages",
                "Page numbers must be positive",
            ));
        }
        if start > end {
            return Err(ValidationResponse::new(
                "pages",
                "Start page must not exceed end page",
            ));
        }
        Ok(Self { start, end })
    }

    pub fn range_display(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

impl fmt::Display for Pages {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// The three per-publish side-effect toggles. A fourth behavior, metadata
/// generation, is always on and deliberately not represented here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationOptions {
    pub doi_enabled: bool,
    pub internet_archive_enabled: bool,
    pub email_notification_enabled: bool,
}

/// One canonical article shape for pending, manual and published views.
/// Views filter and project from this instead of carrying their own variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub article_type: ArticleType,
    pub lifecycle: Lifecycle,
    pub author: Author,
    #[serde(default)]
    pub co_authors: Vec<Author>,
    /// Set at publish time.
    #[serde(default)]
    pub volume: Option<Volume>,
    /// Set at publish time.
    #[serde(default)]
    pub issue: Option<Issue>,
    #[serde(default)]
    pub pages: Option<Pages>,
    #[serde(default)]
    pub publish_date: Option<DateTime<Utc>>,
    /// Either system-generated at publish time or operator-supplied.
    #[serde(default)]
    pub doi: Option<String>,
    /// Required for public download.
    #[serde(default)]
    pub pdf_file: Option<String>,
    #[serde(default = "default_license")]
    pub license: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_license() -> String {
    DEFAULT_LICENSE.to_string()
}

impl Article {
    /// Primary author followed by co-authors, joined for display.
    pub fn author_names(&self) -> String {
        let mut names = vec![self.author.name.clone()];
        names.extend(self.co_authors.iter().map(|a| a.name.clone()));
        names.join(", ")
    }

    pub fn publication_year(&self) -> Option<i32> {
        self.publish_date.map(|d| d.year())
    }

    pub fn formatted_date(&self) -> Option<String> {
        self.publish_date.map(|d| d.format("%B %d, %Y").to_string())
    }

    pub fn volume_issue_display(&self) -> String {
        match (&self.volume, &self.issue) {
            (Some(v), Some(i)) => format!("Vol. {} No. {}", v.volume_number, i.issue_number),
            (Some(v), None) => format!("Vol. {}", v.volume_number),
            _ => String::from("Unassigned"),
        }
    }

    pub fn doi_url(&self) -> Option<String> {
        self.doi.as_ref().map(|d| format!("https://doi.org/{}", d))
    }

    pub fn is_pending(&self) -> bool {
        self.lifecycle == Lifecycle::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_type_round_trips_wire_names() {
        for t in ArticleType::ALL {
            assert_eq!(t.as_str().parse::<ArticleType>().unwrap(), t);
        }
        assert!("poem".parse::<ArticleType>().is_err());
    }

    #[test]
    fn pages_reject_inverted_range() {
        assert!(Pages::new(10, 1).is_err());
        assert!(Pages::new(0, 5).is_err());
        let p = Pages::new(1, 10).unwrap();
        assert_eq!(p.range_display(), "1-10");
    }

    #[test]
    fn publication_options_default_to_all_disabled() {
        let opts = PublicationOptions::default();
        assert!(!opts.doi_enabled);
        assert!(!opts.internet_archive_enabled);
        assert!(!opts.email_notification_enabled);
    }
}
