//! Core library of the UNIBEN Journal of Science, Technology and Innovation
//! website: publication workflow, article search, archive browsing, citation
//! formatting and cover resolution, all against a REST publication backend
//! reached through the [`api::PublicationApi`] trait.

pub mod api;
pub mod archive;
pub mod citation;
pub mod config;
pub mod covers;
pub mod errors;
pub mod models;
pub mod search;
pub mod workflow;

pub use api::PublicationApi;
pub use config::{get_journal_config, JournalConfig};
pub use errors::PublicationError;
