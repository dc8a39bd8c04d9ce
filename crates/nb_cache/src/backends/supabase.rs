use async_trait::async_trait;
use chrono::Utc;
use postgrest::Postgrest;
use serde_json::{json, Value};
use tracing::debug;

use crate::next_midnight;
use nb_core::{cache_key_interests, Error, NewsCache, Result, SummarizedArticle};

const CACHE_TABLE: &str = "cached_news";

/// Supabase-backed cache. The three keyed operations go through stored
/// procedures so the interest-array key is compared server-side.
pub struct SupabaseCache {
    client: Postgrest,
}

impl SupabaseCache {
    pub fn new(url: &str, service_role_key: &str) -> Self {
        let client = Postgrest::new(format!("{}/rest/v1", url.trim_end_matches('/')))
            .insert_header("apikey", service_role_key)
            .insert_header("Authorization", format!("Bearer {}", service_role_key));
        Self { client }
    }

    async fn call_rpc(&self, function: &str, params: Value) -> Result<String> {
        let response = self
            .client
            .rpc(function, params.to_string())
            .execute()
            .await
            .map_err(|err| Error::Cache(format!("{} request failed: {}", function, err)))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Cache(format!("{} failed: {} - {}", function, status, body)));
        }
        response
            .text()
            .await
            .map_err(|err| Error::Cache(format!("{} response unreadable: {}", function, err)))
    }
}

#[async_trait]
impl NewsCache for SupabaseCache {
    async fn lookup(
        &self,
        user_id: &str,
        interests: &[String],
    ) -> Result<Option<Vec<SummarizedArticle>>> {
        let sorted = cache_key_interests(interests);
        debug!("checking cache for user {} interests {:?}", user_id, sorted);

        let body = self
            .call_rpc(
                "get_cached_news",
                json!({
                    "p_user_id": user_id,
                    "p_interests": sorted,
                    "p_current_time": Utc::now().to_rfc3339(),
                }),
            )
            .await?;

        if body.is_empty() {
            return Ok(None);
        }
        let data: Value = serde_json::from_str(&body)?;
        // The procedure may hand back a single row or a one-row set.
        let entry = match &data {
            Value::Null => return Ok(None),
            Value::Array(rows) => match rows.first() {
                Some(row) => row,
                None => return Ok(None),
            },
            _ => &data,
        };
        match entry.get("articles") {
            Some(articles) => Ok(Some(serde_json::from_value(articles.clone())?)),
            None => Ok(None),
        }
    }

    async fn store(
        &self,
        user_id: &str,
        interests: &[String],
        articles: &[SummarizedArticle],
    ) -> Result<()> {
        let sorted = cache_key_interests(interests);
        let expires_at = next_midnight(Utc::now());
        debug!(
            "caching {} articles for user {} until {}",
            articles.len(),
            user_id,
            expires_at
        );

        self.call_rpc(
            "upsert_cached_news",
            json!({
                "p_user_id": user_id,
                "p_interests": sorted,
                "p_articles": articles,
                "p_expires_at": expires_at.to_rfc3339(),
            }),
        )
        .await?;
        Ok(())
    }

    async fn invalidate(&self, user_id: &str, interests: &[String]) -> Result<()> {
        let sorted = cache_key_interests(interests);
        self.call_rpc(
            "delete_cached_news",
            json!({
                "p_user_id": user_id,
                "p_interests": sorted,
            }),
        )
        .await?;
        Ok(())
    }

    async fn sweep_expired(&self) -> Result<()> {
        let response = self
            .client
            .from(CACHE_TABLE)
            .delete()
            .lt("expires_at", Utc::now().to_rfc3339())
            .execute()
            .await
            .map_err(|err| Error::Cache(format!("expired-row sweep failed: {}", err)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Cache(format!("expired-row sweep failed: {}", status)));
        }
        Ok(())
    }
}
