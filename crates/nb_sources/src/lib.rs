pub mod newsapi;

pub use newsapi::NewsApiClient;

pub mod prelude {
    pub use crate::NewsApiClient;
    pub use nb_core::{Article, ArticleSource, Error, Result};
}
