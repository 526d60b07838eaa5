//! Frontend Configuration
//!
//! Baked in at build time (`TRIP_API_URL`, `TRIP_LOG_LEVEL`); the trip to
//! open comes from the page URL (`?trip=<id>`).

use std::str::FromStr;

use tracing::Level;
use trip_api::{ApiConfig, ApiResult};

const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    pub log_level: Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            log_level: Level::INFO,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_values(option_env!("TRIP_API_URL"), option_env!("TRIP_LOG_LEVEL"))
    }

    fn from_values(api_url: Option<&str>, log_level: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            api_url: api_url
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .unwrap_or(defaults.api_url),
            log_level: log_level
                .and_then(|level| Level::from_str(level.trim()).ok())
                .unwrap_or(defaults.log_level),
        }
    }

    pub fn api(&self) -> ApiResult<ApiConfig> {
        ApiConfig::new(&self.api_url)
    }
}

/// `trip` query parameter of the current page
pub fn trip_from_location() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    trip_from_query(&search)
}

fn trip_from_query(search: &str) -> Option<String> {
    url::form_urlencoded::parse(search.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == "trip")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_values(None, Some("chatty"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_values_from_env() {
        let config = AppConfig::from_values(Some("https://trips.example.com/api/"), Some("debug"));
        assert_eq!(config.api_url, "https://trips.example.com/api/");
        assert_eq!(config.log_level, Level::DEBUG);
        assert!(config.api().is_ok());
    }

    #[test]
    fn test_trip_query() {
        assert_eq!(trip_from_query("?tab=packing&trip=42"), Some("42".to_string()));
        assert_eq!(trip_from_query("?trip="), None);
        assert_eq!(trip_from_query(""), None);
    }

    #[test]
    fn test_trip_query_is_decoded() {
        assert_eq!(trip_from_query("?trip=a%2Db"), Some("a-b".to_string()));
        assert_eq!(trip_from_query("?trip=summer+trip&x=1"), Some("summer trip".to_string()));
    }
}
