/// Journal-wide profile and tuning knobs shared across the public and admin
/// surfaces.
#[derive(Debug, Clone)]
pub struct JournalConfig {
    pub name: String,
    pub issn: String,
    /// Shown when a volume has no usable cover image.
    pub placeholder_cover: String,
    pub search_debounce_ms: u64,
    pub search_min_query_len: usize,
    pub search_result_limit: usize,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            name: String::from("UNIBEN Journal of Science, Technology and Innovation"),
            issn: String::from("3121-763X"),
            placeholder_cover: String::from("/issue-cover.png"),
            search_debounce_ms: 300,
            search_min_query_len: 2,
            search_result_limit: 5,
        }
    }
}

pub fn get_journal_config() -> JournalConfig {
    JournalConfig::default()
}
