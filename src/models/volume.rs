use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A yearly grouping of issues. Cosmetic fields (description, covers) stay
/// editable after issues reference the volume; the rest does not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: String,
    pub volume_number: i32,
    pub year: i32,
    #[serde(default)]
    pub description: Option<String>,
    pub publish_date: DateTime<Utc>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub cover_image_issue2: Option<String>,
}

impl Volume {
    pub fn display_label(&self) -> String {
        format!("Volume {} ({})", self.volume_number, self.year)
    }
}

/// A numbered subdivision of a Volume, the unit articles are published in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub volume_id: String,
    pub issue_number: i32,
    pub publish_date: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
    /// Derived by the backend, not stored on the issue itself.
    #[serde(default)]
    pub article_count: u32,
}

/// Archive listing shape: a volume carrying its nested issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveVolume {
    #[serde(flatten)]
    pub volume: Volume,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl ArchiveVolume {
    pub fn article_count(&self) -> u32 {
        self.issues.iter().map(|i| i.article_count).sum()
    }
}
