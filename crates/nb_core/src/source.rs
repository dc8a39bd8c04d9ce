use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

/// A searchable source of news articles.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Fetch up to 10 articles matching the given interests.
    ///
    /// Errors only when every query strategy, including the generic
    /// fallback, yields nothing.
    async fn fetch(&self, interests: &[String]) -> Result<Vec<Article>>;
}
