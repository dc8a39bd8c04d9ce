use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::next_midnight;
use nb_core::{cache_key_interests, NewsCache, Result, SummarizedArticle};

type CacheKey = (String, Vec<String>);

#[derive(Debug, Clone)]
struct StoredEntry {
    articles: Vec<SummarizedArticle>,
    expires_at: DateTime<Utc>,
}

/// In-process cache used by tests and `--memory-cache` runs.
#[derive(Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<CacheKey, StoredEntry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    async fn insert_with_expiry(
        &self,
        user_id: &str,
        interests: &[String],
        articles: Vec<SummarizedArticle>,
        expires_at: DateTime<Utc>,
    ) {
        let key = (user_id.to_string(), cache_key_interests(interests));
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            StoredEntry {
                articles,
                expires_at,
            },
        );
    }
}

#[async_trait]
impl NewsCache for MemoryCache {
    async fn lookup(
        &self,
        user_id: &str,
        interests: &[String],
    ) -> Result<Option<Vec<SummarizedArticle>>> {
        let key = (user_id.to_string(), cache_key_interests(interests));
        let entries = self.entries.read().await;
        Ok(entries
            .get(&key)
            .filter(|entry| Utc::now() < entry.expires_at)
            .map(|entry| entry.articles.clone()))
    }

    async fn store(
        &self,
        user_id: &str,
        interests: &[String],
        articles: &[SummarizedArticle],
    ) -> Result<()> {
        let key = (user_id.to_string(), cache_key_interests(interests));
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            StoredEntry {
                articles: articles.to_vec(),
                expires_at: next_midnight(Utc::now()),
            },
        );
        Ok(())
    }

    async fn invalidate(&self, user_id: &str, interests: &[String]) -> Result<()> {
        let key = (user_id.to_string(), cache_key_interests(interests));
        let mut entries = self.entries.write().await;
        entries.remove(&key);
        Ok(())
    }

    async fn sweep_expired(&self) -> Result<()> {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| now < entry.expires_at);
        Ok(())
    }
}
