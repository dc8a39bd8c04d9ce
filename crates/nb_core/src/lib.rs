pub mod cache;
pub mod config;
pub mod error;
pub mod source;
pub mod summarize;
pub mod types;

pub use cache::{cache_key_interests, NewsCache};
pub use config::Config;
pub use error::Error;
pub use source::ArticleSource;
pub use summarize::{Summarizer, FALLBACK_SUMMARY, MISSING_DATA_SUMMARY};
pub use types::{Article, StreamEvent, SummarizedArticle};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::{Article, Error, Result, StreamEvent, SummarizedArticle};
}
