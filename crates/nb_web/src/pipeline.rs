use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::AppState;
use nb_core::{StreamEvent, SummarizedArticle};

/// A validated streaming request.
#[derive(Debug, Clone)]
pub struct StreamParams {
    pub user_id: String,
    pub interests: Vec<String>,
    pub force_refresh: bool,
}

/// Write side of the event stream. Once a send fails the client is gone;
/// the closed flag makes every later emit a silent no-op so in-flight work
/// can still finish for cache warming.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::Sender<StreamEvent>,
    closed: Arc<AtomicBool>,
}

impl EventSink {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<StreamEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                tx,
                closed: Arc::new(AtomicBool::new(false)),
            },
            rx,
        )
    }

    pub async fn send(&self, event: StreamEvent) {
        if self.closed.load(Ordering::Relaxed) {
            return;
        }
        if self.tx.send(event).await.is_err() {
            self.closed.store(true, Ordering::Relaxed);
            info!("client disconnected, skipping further stream events");
        }
    }
}

/// The fetch → summarize → stream → cache pipeline for one request.
///
/// Cache hit: emits `cached` then `complete`. Cache miss: fetches once,
/// fans out one summarization task per article, emits `first-article` with
/// the first completion and an `article` event per result, commits the full
/// ordered set to the cache, then emits `complete`. Fetch failure is the
/// only terminal `error`.
pub async fn run_pipeline(state: Arc<AppState>, params: StreamParams, events: EventSink) {
    if params.force_refresh {
        // Clean insert on the subsequent store.
        if let Err(err) = state
            .cache
            .invalidate(&params.user_id, &params.interests)
            .await
        {
            warn!("cache invalidation failed: {}", err);
        }
    } else {
        match state.cache.lookup(&params.user_id, &params.interests).await {
            Ok(Some(articles)) => {
                info!(
                    "serving {} cached articles for user {}",
                    articles.len(),
                    params.user_id
                );
                let total_articles = articles.len();
                events.send(StreamEvent::Cached { articles }).await;
                events
                    .send(StreamEvent::Complete {
                        total_articles,
                        from_cache: true,
                    })
                    .await;
                return;
            }
            Ok(None) => {}
            Err(err) => {
                warn!("cache lookup failed, treating as miss: {}", err);
            }
        }
    }

    let articles = match state.source.fetch(&params.interests).await {
        Ok(articles) => articles,
        Err(err) => {
            events
                .send(StreamEvent::Error {
                    message: err.to_string(),
                })
                .await;
            return;
        }
    };

    let total = articles.len();
    info!("summarizing {} articles for user {}", total, params.user_id);

    // One task per article; completions fan back in over the channel so a
    // single emitter preserves the first-article-before-any-article order.
    let (done_tx, mut done_rx) = mpsc::channel::<(usize, SummarizedArticle)>(total.max(1));
    for (index, article) in articles.into_iter().enumerate() {
        let summarizer = state.summarizer.clone();
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let summarized = summarizer.summarize_one(&article).await;
            let _ = done_tx.send((index, summarized)).await;
        });
    }
    drop(done_tx);

    let mut completed: Vec<(usize, SummarizedArticle)> = Vec::with_capacity(total);
    while let Some((index, summarized)) = done_rx.recv().await {
        if completed.is_empty() {
            events.send(StreamEvent::FirstArticle).await;
        }
        events
            .send(StreamEvent::Article {
                article: summarized.clone(),
                index,
            })
            .await;
        completed.push((index, summarized));
    }

    completed.sort_by_key(|(index, _)| *index);
    let ordered: Vec<SummarizedArticle> = completed
        .into_iter()
        .map(|(_, article)| article)
        .collect();

    if let Err(err) = state
        .cache
        .store(&params.user_id, &params.interests, &ordered)
        .await
    {
        warn!("failed to cache articles: {}", err);
    }

    events
        .send(StreamEvent::Complete {
            total_articles: ordered.len(),
            from_cache: false,
        })
        .await;
}
