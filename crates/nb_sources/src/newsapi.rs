use std::fmt;

use async_trait::async_trait;
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use nb_core::{Article, ArticleSource, Error, Result};

const BASE_URL: &str = "https://newsapi.org/v2";
const MAX_ARTICLES: usize = 10;
const EXCLUDED_DOMAINS: &str = "rlsbb.cc";
const SORT_OPTIONS: [&str; 2] = ["popularity", "relevancy"];

#[derive(Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Deserialize)]
struct NewsApiArticle {
    #[serde(default)]
    source: NewsApiSource,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct NewsApiSource {
    name: Option<String>,
}

/// One parameterized query shape tried against the search API.
#[derive(Debug, Clone)]
struct QueryPlan {
    label: &'static str,
    query: String,
    search_in_description: bool,
    exclude_low_quality: bool,
    from_date: String,
    sort_by: &'static str,
    page: u32,
    page_size: u32,
}

/// Outcome of running a single query plan. Failures carry the reason so
/// the caller can log it and move on to the next plan.
enum StrategyOutcome {
    Articles(Vec<Article>),
    Failed(String),
}

pub struct NewsApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl NewsApiClient {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .ok_or_else(|| Error::Config("NewsAPI key is not configured".to_string()))?;
        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: BASE_URL.to_string(),
        })
    }

    async fn run_plan(&self, plan: &QueryPlan) -> StrategyOutcome {
        let mut request = self
            .client
            .get(format!("{}/everything", self.base_url))
            .query(&[
                ("q", plan.query.as_str()),
                ("from", plan.from_date.as_str()),
                ("sortBy", plan.sort_by),
                ("language", "en"),
            ])
            .query(&[("page", plan.page), ("pageSize", plan.page_size)]);
        if plan.search_in_description {
            request = request.query(&[("searchIn", "description")]);
        }
        if plan.exclude_low_quality {
            request = request.query(&[("excludeDomains", EXCLUDED_DOMAINS)]);
        }
        request = request.query(&[("apiKey", self.api_key.as_str())]);

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return StrategyOutcome::Failed(format!("request failed: {}", err)),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return StrategyOutcome::Failed(format!(
                "NewsAPI request failed: {} - {}",
                status, body
            ));
        }

        let data: NewsApiResponse = match response.json().await {
            Ok(data) => data,
            Err(err) => return StrategyOutcome::Failed(format!("invalid response body: {}", err)),
        };

        if data.status != "ok" {
            return StrategyOutcome::Failed(format!("NewsAPI returned status: {}", data.status));
        }
        if data.articles.is_empty() {
            return StrategyOutcome::Failed("no articles found".to_string());
        }

        let mut articles: Vec<Article> = data.articles.into_iter().map(map_article).collect();
        articles.shuffle(&mut rand::thread_rng());
        articles.truncate(MAX_ARTICLES);
        StrategyOutcome::Articles(articles)
    }
}

#[async_trait]
impl ArticleSource for NewsApiClient {
    async fn fetch(&self, interests: &[String]) -> Result<Vec<Article>> {
        let valid: Vec<String> = interests
            .iter()
            .map(|interest| interest.trim().to_string())
            .filter(|interest| !interest.is_empty())
            .collect();
        if valid.is_empty() {
            return Err(Error::Validation(
                "No interests provided for news search".to_string(),
            ));
        }

        info!("searching for news with interests: {:?}", valid);

        // Random params are drawn up front so no RNG lives across an await.
        let plans = build_plans(&valid);
        for plan in &plans {
            debug!(
                "trying {}: q={} from={} sortBy={} page={} pageSize={}",
                plan.label, plan.query, plan.from_date, plan.sort_by, plan.page, plan.page_size
            );
            match self.run_plan(plan).await {
                StrategyOutcome::Articles(articles) => {
                    info!("{} succeeded with {} articles", plan.label, articles.len());
                    return Ok(articles);
                }
                StrategyOutcome::Failed(reason) => {
                    warn!("{} failed: {}", plan.label, reason);
                }
            }
        }

        Err(Error::Fetch(
            "Unable to find news articles. Please try again later or add more diverse interests."
                .to_string(),
        ))
    }
}

/// Ordered query shapes: field-restricted primary, an unrestricted
/// secondary for single-interest requests, then a generic-topic fallback.
fn build_plans(interests: &[String]) -> Vec<QueryPlan> {
    let mut rng = rand::thread_rng();
    let single = interests.len() == 1;
    let or_query = or_query(interests);

    let mut plans = vec![QueryPlan {
        label: "primary strategy",
        query: or_query,
        search_in_description: true,
        exclude_low_quality: true,
        from_date: lookback_date(rng.gen_range(1..=7)),
        sort_by: SORT_OPTIONS[rng.gen_range(0..SORT_OPTIONS.len())],
        page: if single { 1 } else { rng.gen_range(1..=3) },
        page_size: if single { 15 } else { 20 },
    }];

    if single {
        plans.push(QueryPlan {
            label: "broad single-interest strategy",
            query: interests[0].clone(),
            search_in_description: false,
            exclude_low_quality: true,
            from_date: lookback_date(rng.gen_range(1..=7)),
            sort_by: SORT_OPTIONS[rng.gen_range(0..SORT_OPTIONS.len())],
            page: 1,
            page_size: 20,
        });
    }

    plans.push(QueryPlan {
        label: "generic fallback",
        query: "news".to_string(),
        search_in_description: false,
        exclude_low_quality: false,
        from_date: lookback_date(rng.gen_range(1..=7)),
        sort_by: "popularity",
        page: 1,
        page_size: 10,
    });

    plans
}

/// Disjunctive quoted query over all interests: `"a" OR "b"`.
fn or_query(interests: &[String]) -> String {
    interests
        .iter()
        .map(|interest| format!("\"{}\"", interest))
        .collect::<Vec<_>>()
        .join(" OR ")
}

fn lookback_date(days_back: i64) -> String {
    (Utc::now() - chrono::Duration::days(days_back))
        .date_naive()
        .to_string()
}

fn map_article(raw: NewsApiArticle) -> Article {
    let description = raw
        .description
        .filter(|description| !description.trim().is_empty())
        .or_else(|| {
            raw.content.as_deref().map(|content| {
                let head: String = content.chars().take(200).collect();
                format!("{}...", head)
            })
        })
        .unwrap_or_else(|| "No description available".to_string());

    Article {
        title: raw
            .title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| "No title available".to_string()),
        description,
        category: raw
            .source
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "General".to_string()),
        url: raw.url.unwrap_or_else(|| "#".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_query_quotes_each_interest() {
        let query = or_query(&["rust lang".to_string(), "ai".to_string()]);
        assert_eq!(query, "\"rust lang\" OR \"ai\"");
    }

    #[test]
    fn test_plans_for_single_interest() {
        let plans = build_plans(&["Tech".to_string()]);
        assert_eq!(plans.len(), 3);

        assert!(plans[0].search_in_description);
        assert!(plans[0].exclude_low_quality);
        assert_eq!(plans[0].page, 1);
        assert_eq!(plans[0].page_size, 15);

        assert!(!plans[1].search_in_description);
        assert_eq!(plans[1].query, "Tech");
        assert_eq!(plans[1].page, 1);
        assert_eq!(plans[1].page_size, 20);

        assert_eq!(plans[2].query, "news");
        assert_eq!(plans[2].sort_by, "popularity");
        assert!(!plans[2].exclude_low_quality);
    }

    #[test]
    fn test_plans_for_multiple_interests() {
        let plans = build_plans(&["Tech".to_string(), "Sports".to_string()]);
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].query, "\"Tech\" OR \"Sports\"");
        assert_eq!(plans[0].page_size, 20);
        assert!((1..=3).contains(&plans[0].page));
        assert_eq!(plans[1].label, "generic fallback");
    }

    #[test]
    fn test_plan_lookback_window() {
        for _ in 0..20 {
            let plans = build_plans(&["Tech".to_string()]);
            let today = Utc::now().date_naive();
            for plan in plans {
                let from = plan.from_date.parse::<chrono::NaiveDate>().unwrap();
                let age = (today - from).num_days();
                assert!((1..=7).contains(&age), "lookback {} out of range", age);
            }
        }
    }

    #[test]
    fn test_map_article_fills_missing_fields() {
        let raw = NewsApiArticle {
            source: NewsApiSource { name: None },
            title: None,
            description: None,
            url: None,
            content: None,
        };
        let article = map_article(raw);
        assert_eq!(article.title, "No title available");
        assert_eq!(article.description, "No description available");
        assert_eq!(article.category, "General");
        assert_eq!(article.url, "#");
    }

    #[test]
    fn test_map_article_truncates_content_fallback() {
        let raw = NewsApiArticle {
            source: NewsApiSource {
                name: Some("BBC News".to_string()),
            },
            title: Some("A headline".to_string()),
            description: Some("   ".to_string()),
            url: Some("http://example.com/a".to_string()),
            content: Some("x".repeat(300)),
        };
        let article = map_article(raw);
        assert_eq!(article.category, "BBC News");
        assert_eq!(article.description.chars().count(), 203);
        assert!(article.description.ends_with("..."));
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let result = NewsApiClient::new(None);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_blank_interests_rejected() {
        let client = NewsApiClient::new(Some("test-key".to_string())).unwrap();
        let result = client.fetch(&["  ".to_string()]).await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
