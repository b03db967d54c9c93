use crate::config::JournalConfig;
use crate::models::Article;
use std::fmt;
use std::str::FromStr;

/// Bibliographic citation styles offered on the article page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitationStyle {
    Apa,
    Mla,
    Chicago,
    Harvard,
}

impl CitationStyle {
    pub const ALL: [CitationStyle; 4] = [
        CitationStyle::Apa,
        CitationStyle::Mla,
        CitationStyle::Chicago,
        CitationStyle::Harvard,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CitationStyle::Apa => "APA",
            CitationStyle::Mla => "MLA",
            CitationStyle::Chicago => "Chicago",
            CitationStyle::Harvard => "Harvard",
        }
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CitationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CitationStyle::ALL
            .iter()
            .copied()
            .find(|style| style.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown citation style: {}", s))
    }
}

/// Renders one citation string from article metadata. Pure; missing volume
/// or issue numbers render as "?" and a missing publish date as "n.d.".
pub fn format_citation(style: CitationStyle, article: &Article, journal_name: &str) -> String {
    let authors = article.author_names();
    let year = article
        .publication_year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "n.d.".to_string());
    let vol = article
        .volume
        .as_ref()
        .map(|v| v.volume_number.to_string())
        .unwrap_or_else(|| "?".to_string());
    let issue = article
        .issue
        .as_ref()
        .map(|i| i.issue_number.to_string())
        .unwrap_or_else(|| "?".to_string());
    let pages = article.pages.map(|p| p.range_display());
    let doi_link = article.doi_url();

    let citation = match style {
        CitationStyle::Apa => format!(
            "{} ({}). {}. {}, {}({}){}.{}",
            authors,
            year,
            article.title,
            journal_name,
            vol,
            issue,
            pages.map(|p| format!(", {}", p)).unwrap_or_default(),
            doi_link.map(|d| format!(" {}", d)).unwrap_or_default(),
        ),
        CitationStyle::Mla => format!(
            "{}. \"{}.\" {}, vol. {}, no. {}, {}{}.",
            authors,
            article.title,
            journal_name,
            vol,
            issue,
            year,
            pages.map(|p| format!(", pp. {}", p)).unwrap_or_default(),
        ),
        CitationStyle::Chicago => format!(
            "{}. \"{}.\" {} {}, no. {} ({}){}.{}",
            authors,
            article.title,
            journal_name,
            vol,
            issue,
            year,
            pages.map(|p| format!(": {}", p)).unwrap_or_default(),
            doi_link.map(|d| format!(" {}", d)).unwrap_or_default(),
        ),
        CitationStyle::Harvard => format!(
            "{}, {}. {}. {}, {}({}){}.",
            authors,
            year,
            article.title,
            journal_name,
            vol,
            issue,
            pages.map(|p| format!(", pp.{}", p)).unwrap_or_default(),
        ),
    };

    citation.trim_end().to_string()
}

/// Scholarly metadata pairs (Google Scholar `citation_*` plus Dublin Core)
/// for an article page. This is the always-on "metadata generation" half of
/// publication: it is not an operator choice.
pub fn scholar_meta_tags(article: &Article, config: &JournalConfig) -> Vec<(String, String)> {
    let mut tags: Vec<(String, String)> = Vec::new();
    let mut push = |name: &str, content: String| {
        if !content.is_empty() {
            tags.push((name.to_string(), content));
        }
    };

    push("citation_title", article.title.clone());
    push("citation_author", article.author.name.clone());
    for co_author in &article.co_authors {
        push("citation_author", co_author.name.clone());
    }

    if let Some(date) = article.publish_date {
        push(
            "citation_publication_date",
            date.format("%Y-%m-%d").to_string(),
        );
    }
    if let Some(volume) = &article.volume {
        push("citation_volume", volume.volume_number.to_string());
    }
    if let Some(issue) = &article.issue {
        push("citation_issue", issue.issue_number.to_string());
    }
    if let Some(pages) = article.pages {
        push("citation_firstpage", pages.start.to_string());
        push("citation_lastpage", pages.end.to_string());
    }
    if let Some(doi) = &article.doi {
        push("citation_doi", doi.clone());
    }
    if let Some(pdf) = &article.pdf_file {
        push("citation_pdf_url", pdf.clone());
    }
    push("citation_issn", config.issn.clone());
    for keyword in &article.keywords {
        push("citation_keywords", keyword.clone());
    }
    push("citation_abstract", article.abstract_text.clone());

    push("DC.Title", article.title.clone());
    push("DC.Creator", article.author.name.clone());
    if let Some(date) = article.publish_date {
        push("DC.Date", date.format("%Y-%m-%d").to_string());
    }
    push("DC.Description", article.abstract_text.clone());
    push("DC.Type", article.article_type.label().to_string());
    push("DC.Format", "application/pdf".to_string());
    push("DC.Language", "en".to_string());
    push("DC.Rights", article.license.clone());

    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Article, Author, Issue, Lifecycle, Pages, Volume};
    use chrono::{TimeZone, Utc};

    const JOURNAL: &str = "UNIBEN Journal of Science, Technology and Innovation";

    fn published_article() -> Article {
        let publish_date = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        Article {
            id: "art-1".to_string(),
            title: "Solar Microgrids for Rural Clinics".to_string(),
            abstract_text: "We study microgrid deployments.".to_string(),
            keywords: vec!["solar".to_string(), "microgrid".to_string()],
            article_type: Default::default(),
            lifecycle: Lifecycle::Published,
            author: Author::new("a-1", "A. Okafor", "okafor@uniben.edu"),
            co_authors: vec![Author::new("a-2", "B. Eze", "eze@uniben.edu")],
            volume: Some(Volume {
                id: "vol-3".to_string(),
                volume_number: 3,
                year: 2024,
                description: None,
                publish_date,
                cover_image: None,
                cover_image_issue2: None,
            }),
            issue: Some(Issue {
                id: "iss-1".to_string(),
                volume_id: "vol-3".to_string(),
                issue_number: 1,
                publish_date,
                description: None,
                article_count: 8,
            }),
            pages: Some(Pages::new(1, 10).unwrap()),
            publish_date: Some(publish_date),
            doi: Some("10.5281/jsti.2024.001".to_string()),
            pdf_file: Some("/pdfs/art-1.pdf".to_string()),
            license: "CC BY 4.0".to_string(),
            created_at: None,
        }
    }

    #[test]
    fn apa_contains_year_volume_issue_and_pages() {
        let citation = format_citation(CitationStyle::Apa, &published_article(), JOURNAL);
        assert!(citation.contains("(2024)."), "citation: {}", citation);
        assert!(citation.contains("3(1)"), "citation: {}", citation);
        assert!(citation.contains("1-10"), "citation: {}", citation);
        assert!(citation.contains("https://doi.org/10.5281/jsti.2024.001"));
    }

    #[test]
    fn mla_uses_vol_no_form() {
        let citation = format_citation(CitationStyle::Mla, &published_article(), JOURNAL);
        assert!(citation.contains("vol. 3, no. 1, 2024, pp. 1-10."));
        assert!(citation.contains("\"Solar Microgrids for Rural Clinics.\""));
    }

    #[test]
    fn missing_assignment_renders_question_marks() {
        let mut article = published_article();
        article.volume = None;
        article.issue = None;
        article.pages = None;
        let citation = format_citation(CitationStyle::Harvard, &article, JOURNAL);
        assert!(citation.contains("?(?)"), "citation: {}", citation);
    }

    #[test]
    fn meta_tags_cover_scholar_and_dublin_core() {
        let article = published_article();
        let tags = scholar_meta_tags(&article, &JournalConfig::default());

        let authors: Vec<&str> = tags
            .iter()
            .filter(|(n, _)| n == "citation_author")
            .map(|(_, c)| c.as_str())
            .collect();
        assert_eq!(authors, vec!["A. Okafor", "B. Eze"]);

        let get = |name: &str| {
            tags.iter()
                .find(|(n, _)| n == name)
                .map(|(_, c)| c.as_str())
        };
        assert_eq!(get("citation_firstpage"), Some("1"));
        assert_eq!(get("citation_lastpage"), Some("10"));
        assert_eq!(get("citation_issn"), Some("3121-763X"));
        assert_eq!(get("DC.Rights"), Some("CC BY 4.0"));
        assert_eq!(get("citation_publication_date"), Some("2024-06-15"));
    }
}
