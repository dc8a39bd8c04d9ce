use std::env;

const NEWS_API_KEY: &str = "NEWS_API_KEY";
const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
const SUPABASE_URL: &str = "SUPABASE_URL";
const SUPABASE_SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";

/// Credentials for the upstream services, read from the environment.
/// Blank values count as missing.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub news_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_service_role_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            news_api_key: read_var(NEWS_API_KEY),
            openai_api_key: read_var(OPENAI_API_KEY),
            supabase_url: read_var(SUPABASE_URL),
            supabase_service_role_key: read_var(SUPABASE_SERVICE_ROLE_KEY),
        }
    }

    /// True when the fetch and summarization credentials are present.
    pub fn pipeline_ready(&self) -> bool {
        self.news_api_key.is_some() && self.openai_api_key.is_some()
    }

    pub fn supabase_ready(&self) -> bool {
        self.supabase_url.is_some() && self.supabase_service_role_key.is_some()
    }

    /// Names of every required variable that is absent. `need_supabase` is
    /// false when the in-memory cache is selected.
    pub fn missing_required(&self, need_supabase: bool) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.news_api_key.is_none() {
            missing.push(NEWS_API_KEY);
        }
        if self.openai_api_key.is_none() {
            missing.push(OPENAI_API_KEY);
        }
        if need_supabase {
            if self.supabase_url.is_none() {
                missing.push(SUPABASE_URL);
            }
            if self.supabase_service_role_key.is_none() {
                missing.push(SUPABASE_SERVICE_ROLE_KEY);
            }
        }
        missing
    }
}

fn read_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_lists_absent_variables() {
        let config = Config {
            news_api_key: Some("key".to_string()),
            ..Config::default()
        };
        let missing = config.missing_required(true);
        assert_eq!(
            missing,
            vec![OPENAI_API_KEY, SUPABASE_URL, SUPABASE_SERVICE_ROLE_KEY]
        );
        assert!(!config.pipeline_ready());
    }

    #[test]
    fn test_memory_cache_skips_supabase_requirements() {
        let config = Config {
            news_api_key: Some("key".to_string()),
            openai_api_key: Some("key".to_string()),
            ..Config::default()
        };
        assert!(config.missing_required(false).is_empty());
        assert!(config.pipeline_ready());
        assert!(!config.supabase_ready());
    }
}
