//! API Configuration

use std::time::Duration;

use url::Url;

use crate::error::{ApiError, ApiResult};

/// Default path of the session refresh endpoint
pub const DEFAULT_REFRESH_PATH: &str = "/auth/token/refresh/";

/// Where the API lives and how the client talks to it
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base URL, always ending with `/`
    base_url: Url,
    /// Endpoint called once when a request comes back 401
    pub refresh_path: String,
    /// Request timeout (native transport only, the browser uses fetch defaults)
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let mut url = Url::parse(base_url).map_err(|e| ApiError::Config(format!("{}: {}", base_url, e)))?;
        if url.cannot_be_a_base() {
            return Err(ApiError::Config(format!("{} cannot be used as a base URL", base_url)));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            base_url: url,
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            timeout: Duration::from_secs(30),
        })
    }

    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of an API path (`/trips/1/packing/items/`)
    pub fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Config(format!("{}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let config = ApiConfig::new("https://example.com/api").unwrap();
        let url = config.endpoint("/trips/7/packing/items/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/trips/7/packing/items/");
    }

    #[test]
    fn test_endpoint_with_trailing_slash_base() {
        let config = ApiConfig::new("http://localhost:8000/").unwrap();
        let url = config.endpoint("auth/me/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/auth/me/");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(ApiConfig::new("not a url"), Err(ApiError::Config(_))));
        assert!(matches!(ApiConfig::new("mailto:someone@example.com"), Err(ApiError::Config(_))));
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::new("http://localhost:8000").unwrap();
        assert_eq!(config.refresh_path, DEFAULT_REFRESH_PATH);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
