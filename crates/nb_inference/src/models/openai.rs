use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use nb_core::{Article, Error, Result, Summarizer};

const BASE_URL: &str = "https://api.openai.com/v1";
const MODEL: &str = "gpt-4o";
const MAX_TOKENS: u32 = 150;
const TEMPERATURE: f32 = 0.7;
const MIN_SUMMARY_LENGTH: usize = 10;
const SYSTEM_PROMPT: &str = "You are a helpful assistant that creates concise, engaging \
summaries of news articles. Provide clear, informative summaries.";

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

pub struct OpenAiModel {
    client: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiModel {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .ok_or_else(|| Error::Config("OpenAI API key is not configured".to_string()))?;
        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: BASE_URL.to_string(),
        })
    }
}

#[async_trait]
impl Summarizer for OpenAiModel {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn summarize_article(&self, article: &Article) -> Result<String> {
        let prompt = format!(
            "Please provide a concise, engaging summary of the following news article.\n\
             The summary should be 5-10 sentences that capture the key points and main story.\n\
             Focus on the most important information and make it easy to understand.\n\n\
             Article Title: {}\n\
             Article Description: {}\n\
             Category: {}\n\n\
             Summary:",
            article.title, article.description, article.category
        );

        let request = ChatRequest {
            model: MODEL.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("OpenAI API error for article {}: {}", article.url, body);
            return Err(Error::Inference(format!("OpenAI API error: {}", status)));
        }

        let data: ChatResponse = response.json().await?;
        let summary = data
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .unwrap_or_default();

        validate_summary(&summary)?;
        Ok(summary)
    }
}

/// Reject empty, too-short, or refusal-shaped completions so the caller
/// falls back instead of showing them to the user.
fn validate_summary(summary: &str) -> Result<()> {
    if summary.is_empty() || summary.len() < MIN_SUMMARY_LENGTH {
        return Err(Error::Inference("Summary too short or empty".to_string()));
    }
    let lowered = summary.to_lowercase();
    if lowered.contains("apologies") || lowered.contains("couldn't find") {
        return Err(Error::Inference(
            "OpenAI returned an error message instead of summary".to_string(),
        ));
    }
    Ok(())
}
