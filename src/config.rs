use std::{env, time::Duration};

use crate::{catalog::DEFAULT_PAGE_SIZE, dashboard::DEFAULT_POLL_INTERVAL, search::DEFAULT_DEBOUNCE};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_timeout_secs: u64,
    pub api_token: Option<String>,
    pub host: String,
    pub port: u16,
    pub dashboard_poll_secs: u64,
    pub admin_page_size: usize,
    pub search_debounce_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_base_url = env::var("API_BASE_URL")?;
        let api_token = env::var("API_TOKEN").ok().filter(|t| !t.trim().is_empty());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_var("APP_PORT").unwrap_or(3000);
        Ok(Self {
            api_base_url,
            api_timeout_secs: parse_var("API_TIMEOUT_SECS").unwrap_or(10),
            api_token,
            host,
            port,
            dashboard_poll_secs: parse_var("DASHBOARD_POLL_SECS")
                .unwrap_or(DEFAULT_POLL_INTERVAL.as_secs()),
            admin_page_size: parse_var::<usize>("ADMIN_PAGE_SIZE")
                .filter(|size| *size > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            search_debounce_ms: parse_var("SEARCH_DEBOUNCE_MS")
                .unwrap_or(DEFAULT_DEBOUNCE.as_millis() as u64),
        })
    }

    /// Config pointing at `api_base_url` with every other value at its default.
    pub fn for_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            api_timeout_secs: 10,
            api_token: None,
            host: "127.0.0.1".to_string(),
            port: 3000,
            dashboard_poll_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            admin_page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn dashboard_interval(&self) -> Duration {
        Duration::from_secs(self.dashboard_poll_secs.max(1))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
