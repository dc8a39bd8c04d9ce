use async_trait::async_trait;
use crate::types::{Article, SummarizedArticle};
use crate::Result;

/// Sentinel summary for articles whose title or description is missing.
pub const MISSING_DATA_SUMMARY: &str = "Article summary not available due to missing data.";

/// Fallback summary substituted when generation fails for any reason.
pub const FALLBACK_SUMMARY: &str =
    "Unable to generate summary at this time. Please read the full article for details.";

#[async_trait]
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &str;

    /// Generate a synopsis for a single article. May fail; callers that
    /// must not lose articles go through [`summarize_one`] instead.
    ///
    /// [`summarize_one`]: Summarizer::summarize_one
    async fn summarize_article(&self, article: &Article) -> Result<String>;

    /// Summarize one article, degrading to a fixed fallback summary on any
    /// failure. Articles with a blank title or description skip generation
    /// entirely.
    async fn summarize_one(&self, article: &Article) -> SummarizedArticle {
        if article.title.trim().is_empty() || article.description.trim().is_empty() {
            tracing::warn!("skipping article with missing data: {}", article.url);
            return SummarizedArticle::from_article(article, MISSING_DATA_SUMMARY.to_string());
        }
        match self.summarize_article(article).await {
            Ok(summary) => SummarizedArticle::from_article(article, summary),
            Err(err) => {
                tracing::warn!("error summarizing article {}: {}", article.url, err);
                SummarizedArticle::from_article(article, FALLBACK_SUMMARY.to_string())
            }
        }
    }

    /// Summarize a batch, preserving input length and order. Never fails:
    /// per-article errors degrade to the fallback summary.
    async fn summarize_all(&self, articles: &[Article]) -> Vec<SummarizedArticle> {
        let mut summarized = Vec::with_capacity(articles.len());
        for article in articles {
            summarized.push(self.summarize_one(article).await);
        }
        summarized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    /// Fails for any article whose title contains "fail".
    struct FlakyModel;

    #[async_trait]
    impl Summarizer for FlakyModel {
        fn name(&self) -> &str {
            "Flaky"
        }

        async fn summarize_article(&self, article: &Article) -> Result<String> {
            if article.title.contains("fail") {
                return Err(Error::Inference("upstream 500".to_string()));
            }
            Ok(format!("Summary of {}", article.title))
        }
    }

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            description: "Some description.".to_string(),
            category: "General".to_string(),
            url: format!("http://example.com/{}", title),
        }
    }

    #[tokio::test]
    async fn test_batch_preserves_length_and_order() {
        let articles = vec![article("one"), article("two"), article("three")];
        let summarized = FlakyModel.summarize_all(&articles).await;
        assert_eq!(summarized.len(), 3);
        assert_eq!(summarized[0].title, "one");
        assert_eq!(summarized[1].title, "two");
        assert_eq!(summarized[2].title, "three");
    }

    #[tokio::test]
    async fn test_failure_degrades_to_fallback() {
        let articles = vec![article("one"), article("fail-two"), article("three")];
        let summarized = FlakyModel.summarize_all(&articles).await;
        assert_eq!(summarized.len(), 3);
        assert_eq!(summarized[0].summary, "Summary of one");
        assert_eq!(summarized[1].summary, FALLBACK_SUMMARY);
        assert_eq!(summarized[2].summary, "Summary of three");
    }

    #[tokio::test]
    async fn test_missing_data_skips_generation() {
        let mut missing = article("fail-anyway");
        missing.description = String::new();
        let summarized = FlakyModel.summarize_one(&missing).await;
        assert_eq!(summarized.summary, MISSING_DATA_SUMMARY);
    }
}
