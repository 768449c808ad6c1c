//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use board_core::services::{FeedConfig, RecommendationConfig};

#[cfg(feature = "postgres")]
use board_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub feed: FeedConfig,
    pub recommendation: RecommendationConfig,
    pub refresh_job: RefreshJobConfig,
}

/// When and how long the recommended-post refresh runs.
#[derive(Debug, Clone)]
pub struct RefreshJobConfig {
    pub cron: String,
    pub timeout: Duration,
}

impl Default for RefreshJobConfig {
    fn default() -> Self {
        Self {
            cron: "0 0 * * * *".to_string(),
            timeout: Duration::from_secs(300),
        }
    }
}

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

/// A positive whole number of days that fits a `chrono::Duration`.
fn window_days(raw: &str) -> Option<chrono::Duration> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|days| *days > 0)
        .and_then(chrono::Duration::try_days)
}

fn parsed_window(key: &str) -> Option<chrono::Duration> {
    let raw = env::var(key).ok()?;
    let window = window_days(&raw);
    if window.is_none() {
        tracing::warn!(key, value = %raw, "Ignoring invalid day window, keeping default");
    }
    window
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        #[cfg(feature = "postgres")]
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parsed("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parsed("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        let mut feed = FeedConfig::default();
        if let Some(take) = parsed("DEFAULT_PAGE_SIZE") {
            feed.default_page_size = take;
        }
        if let Some(max) = parsed::<u64>("MAX_PAGE_SIZE").filter(|max| *max > 0) {
            feed.max_page_size = max;
        }
        if let Some(window) = parsed_window("POPULAR_WINDOW_DAYS") {
            feed.popular_window = window;
        }

        let mut recommendation = RecommendationConfig::default();
        if let Some(window) = parsed_window("RECOMMENDATION_WINDOW_DAYS") {
            recommendation.candidate_window = window;
        }
        if let Some(cap) = parsed("RECOMMENDATION_REFRESH_CAP") {
            recommendation.refresh_cap = cap;
        }

        let mut refresh_job = RefreshJobConfig::default();
        if let Ok(cron) = env::var("RECOMMENDATION_CRON") {
            refresh_job.cron = cron;
        }
        if let Some(secs) = parsed("RECOMMENDATION_TIMEOUT_SECS") {
            refresh_job.timeout = Duration::from_secs(secs);
        }

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(8080),
            #[cfg(feature = "postgres")]
            database,
            feed,
            recommendation,
            refresh_job,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_days_accepts_only_positive_representable_values() {
        assert_eq!(window_days("7"), Some(chrono::Duration::days(7)));
        assert_eq!(window_days(" 10 "), Some(chrono::Duration::days(10)));
        assert_eq!(window_days("0"), None);
        assert_eq!(window_days("-3"), None);
        assert_eq!(window_days("abc"), None);
        assert_eq!(window_days("9223372036854775807"), None);
    }
}
