pub mod article;
pub mod author;
pub mod response;
pub mod volume;

pub use article::{Article, ArticleType, Lifecycle, Pages, PublicationOptions, DEFAULT_LICENSE};
pub use author::Author;
pub use response::{ApiEnvelope, ValidationResponse};
pub use volume::{ArchiveVolume, Issue, Volume};
