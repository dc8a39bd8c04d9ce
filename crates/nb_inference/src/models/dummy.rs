use std::fmt;

use async_trait::async_trait;
use nb_core::{Article, Result, Summarizer};

/// Deterministic stand-in model used in tests.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

#[async_trait]
impl Summarizer for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn summarize_article(&self, article: &Article) -> Result<String> {
        // First 20 words of the description
        let words: Vec<&str> = article.description.split_whitespace().take(20).collect();
        Ok(words.join(" "))
    }
}
