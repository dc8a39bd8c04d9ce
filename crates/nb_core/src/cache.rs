use async_trait::async_trait;
use crate::types::SummarizedArticle;
use crate::Result;

/// Daily cache of summarized articles keyed by (user, interest set).
///
/// Key equality is exact-match on the sorted, deduplicated interest list:
/// an entry stored for `{"Tech"}` is never reused for `{"Tech", "Sports"}`.
#[async_trait]
pub trait NewsCache: Send + Sync {
    /// Return the cached articles for this key, or `None` if no entry
    /// exists or the stored entry has expired.
    async fn lookup(
        &self,
        user_id: &str,
        interests: &[String],
    ) -> Result<Option<Vec<SummarizedArticle>>>;

    /// Upsert the articles under the sorted-interests key, expiring at the
    /// next UTC midnight. Overwrites any existing entry for the exact key.
    async fn store(
        &self,
        user_id: &str,
        interests: &[String],
        articles: &[SummarizedArticle],
    ) -> Result<()>;

    /// Delete the entry for the exact key, if any.
    async fn invalidate(&self, user_id: &str, interests: &[String]) -> Result<()>;

    /// Best-effort deletion of expired entries.
    async fn sweep_expired(&self) -> Result<()>;
}

/// Normalize an interest list into its cache-key form: sorted and
/// deduplicated, so key equality is order-independent.
pub fn cache_key_interests(interests: &[String]) -> Vec<String> {
    let mut sorted = interests.to_vec();
    sorted.sort();
    sorted.dedup();
    sorted
}
