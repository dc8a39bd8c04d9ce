use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, Sse},
    response::{IntoResponse, Response},
    Json,
};
use futures::stream;
use serde::Deserialize;
use serde_json::json;

use crate::pipeline::{run_pipeline, EventSink, StreamParams};
use crate::AppState;

const EVENT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRequest {
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub force_refresh: bool,
}

/// Open an event stream of summarized news for the requested interests.
pub async fn stream_news(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StreamRequest>,
) -> Response {
    let interests: Vec<String> = request
        .interests
        .iter()
        .map(|interest| interest.trim().to_string())
        .filter(|interest| !interest.is_empty())
        .collect();
    let user_id = request.user_id.trim().to_string();

    if interests.is_empty() || user_id.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid interests or user id provided" })),
        )
            .into_response();
    }
    if !state.config.pipeline_ready() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "API keys not configured" })),
        )
            .into_response();
    }

    let params = StreamParams {
        user_id,
        interests,
        force_refresh: request.force_refresh,
    };
    let (sink, rx) = EventSink::channel(EVENT_CHANNEL_CAPACITY);
    tokio::spawn(run_pipeline(state.clone(), params, sink));

    let events = stream::unfold(rx, |mut rx| async move {
        let event = rx.recv().await?;
        Some((Event::default().json_data(&event), rx))
    });
    Sse::new(events).into_response()
}

/// Report which credentials are configured, without exposing values.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "config": {
            "newsApiKey": state.config.news_api_key.is_some(),
            "openaiApiKey": state.config.openai_api_key.is_some(),
            "supabaseUrl": state.config.supabase_url.is_some(),
            "supabaseServiceRoleKey": state.config.supabase_service_role_key.is_some(),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use nb_core::{
        Article, ArticleSource, Config, NewsCache, Result, Summarizer, SummarizedArticle,
    };

    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ArticleSource for CountingSource {
        async fn fetch(&self, _interests: &[String]) -> Result<Vec<Article>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    struct EchoSummarizer;

    #[async_trait]
    impl Summarizer for EchoSummarizer {
        fn name(&self) -> &str {
            "Echo"
        }

        async fn summarize_article(&self, article: &Article) -> Result<String> {
            Ok(article.description.clone())
        }
    }

    struct NoopCache;

    #[async_trait]
    impl NewsCache for NoopCache {
        async fn lookup(
            &self,
            _user_id: &str,
            _interests: &[String],
        ) -> Result<Option<Vec<SummarizedArticle>>> {
            Ok(None)
        }

        async fn store(
            &self,
            _user_id: &str,
            _interests: &[String],
            _articles: &[SummarizedArticle],
        ) -> Result<()> {
            Ok(())
        }

        async fn invalidate(&self, _user_id: &str, _interests: &[String]) -> Result<()> {
            Ok(())
        }

        async fn sweep_expired(&self) -> Result<()> {
            Ok(())
        }
    }

    fn ready_config() -> Config {
        Config {
            news_api_key: Some("news-key".to_string()),
            openai_api_key: Some("openai-key".to_string()),
            ..Config::default()
        }
    }

    fn app_state(config: Config) -> (Arc<AppState>, Arc<CountingSource>) {
        let source = Arc::new(CountingSource::default());
        let state = Arc::new(AppState {
            config,
            source: source.clone(),
            summarizer: Arc::new(EchoSummarizer),
            cache: Arc::new(NoopCache),
        });
        (state, source)
    }

    fn request(interests: &[&str], user_id: &str) -> StreamRequest {
        StreamRequest {
            interests: interests.iter().map(|interest| interest.to_string()).collect(),
            user_id: user_id.to_string(),
            force_refresh: false,
        }
    }

    #[tokio::test]
    async fn test_empty_interests_rejected_before_stream() {
        let (state, source) = app_state(ready_config());
        let response = stream_news(State(state), Json(request(&[], "user-1"))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_interests_rejected_before_stream() {
        let (state, source) = app_state(ready_config());
        let response = stream_news(State(state), Json(request(&["  ", ""], "user-1"))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_user_id_rejected() {
        let (state, source) = app_state(ready_config());
        let response = stream_news(State(state), Json(request(&["Tech"], "  "))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_credentials_rejected_with_500() {
        let (state, source) = app_state(Config::default());
        let response = stream_news(State(state), Json(request(&["Tech"], "user-1"))).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_request_opens_event_stream() {
        let (state, _) = app_state(ready_config());
        let response = stream_news(State(state), Json(request(&["Tech"], "user-1"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        assert!(content_type.starts_with("text/event-stream"));
    }

    #[tokio::test]
    async fn test_health_reports_config_presence() {
        let (state, _) = app_state(ready_config());
        let response = health(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
