pub mod models;

pub use models::dummy::DummyModel;
pub use models::openai::OpenAiModel;

pub mod prelude {
    pub use crate::{DummyModel, OpenAiModel};
    pub use nb_core::{Article, Result, Summarizer, SummarizedArticle};
}
