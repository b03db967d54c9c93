use crate::models::ArchiveVolume;
use std::collections::BTreeMap;

/// One year of the archive accordion with its aggregate counts.
#[derive(Debug, Clone)]
pub struct YearBucket {
    pub year: i32,
    pub volumes: Vec<ArchiveVolume>,
    pub issue_count: usize,
    pub article_count: u32,
}

/// Groups a flat volume list by year and manages the single-expansion
/// accordion state of the archives page.
///
/// Aggregates are recomputed from the current grouping on every call rather
/// than cached and invalidated incrementally.
#[derive(Debug, Default)]
pub struct ArchiveGrouping {
    volumes: Vec<ArchiveVolume>,
    expanded_year: Option<i32>,
}

impl ArchiveGrouping {
    /// Builds the grouping and auto-expands the most recent year, where
    /// "most recent" means the maximum numeric year.
    pub fn new(volumes: Vec<ArchiveVolume>) -> Self {
        let expanded_year = volumes.iter().map(|v| v.volume.year).max();
        Self {
            volumes,
            expanded_year,
        }
    }

    /// Replaces the volume list, keeping the expanded year if it still
    /// exists and falling back to the most recent one otherwise.
    pub fn reload(&mut self, volumes: Vec<ArchiveVolume>) {
        self.volumes = volumes;
        let still_present = self
            .expanded_year
            .is_some_and(|year| self.volumes.iter().any(|v| v.volume.year == year));
        if !still_present {
            self.expanded_year = self.volumes.iter().map(|v| v.volume.year).max();
        }
    }

    /// Year buckets sorted by year descending; volumes inside a bucket are
    /// ordered by volume number descending.
    pub fn year_buckets(&self) -> Vec<YearBucket> {
        let mut by_year: BTreeMap<i32, Vec<ArchiveVolume>> = BTreeMap::new();
        for volume in &self.volumes {
            by_year
                .entry(volume.volume.year)
                .or_default()
                .push(volume.clone());
        }

        by_year
            .into_iter()
            .rev()
            .map(|(year, mut volumes)| {
                volumes.sort_by(|a, b| b.volume.volume_number.cmp(&a.volume.volume_number));
                let issue_count = volumes.iter().map(|v| v.issues.len()).sum();
                let article_count = volumes.iter().map(|v| v.article_count()).sum();
                YearBucket {
                    year,
                    volumes,
                    issue_count,
                    article_count,
                }
            })
            .collect()
    }

    /// Toggles a year: expanding one collapses whichever was open, and
    /// toggling the open year collapses everything.
    pub fn toggle_year(&mut self, year: i32) {
        self.expanded_year = if self.expanded_year == Some(year) {
            None
        } else {
            Some(year)
        };
    }

    pub fn expanded_year(&self) -> Option<i32> {
        self.expanded_year
    }

    pub fn is_expanded(&self, year: i32) -> bool {
        self.expanded_year == Some(year)
    }

    pub fn total_volumes(&self) -> usize {
        self.volumes.len()
    }

    pub fn total_issues(&self) -> usize {
        self.volumes.iter().map(|v| v.issues.len()).sum()
    }

    pub fn total_articles(&self) -> u32 {
        self.volumes.iter().map(|v| v.article_count()).sum()
    }
}
