use std::sync::Arc;

use nb_core::{ArticleSource, Config, NewsCache, Summarizer};

/// Shared application dependencies, constructed once per process and
/// passed by reference into every request.
pub struct AppState {
    pub config: Config,
    pub source: Arc<dyn ArticleSource>,
    pub summarizer: Arc<dyn Summarizer>,
    pub cache: Arc<dyn NewsCache>,
}
