use serde::{Deserialize, Serialize};

/// A raw article as returned by the news search service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub category: String,
    pub url: String,
}

/// An article paired with its generated (or fallback) synopsis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizedArticle {
    pub title: String,
    pub description: String,
    pub category: String,
    pub url: String,
    pub summary: String,
}

impl SummarizedArticle {
    pub fn from_article(article: &Article, summary: String) -> Self {
        Self {
            title: article.title.clone(),
            description: article.description.clone(),
            category: article.category.clone(),
            url: article.url.clone(),
            summary,
        }
    }
}

/// Progress signals sent over the event stream.
///
/// A stream carries at most one `cached` event (always immediately followed
/// by `complete`), and is closed by exactly one `complete` or terminal
/// `error` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StreamEvent {
    Cached {
        articles: Vec<SummarizedArticle>,
    },
    FirstArticle,
    Article {
        article: SummarizedArticle,
        index: usize,
    },
    #[serde(rename_all = "camelCase")]
    Complete {
        total_articles: usize,
        from_cache: bool,
    },
    Error {
        message: String,
    },
}
