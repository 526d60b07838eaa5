//! HTTP Transport
//!
//! reqwest-backed [`Transport`]. In the browser it goes through fetch with
//! `credentials: include` so the session cookies travel; natively it keeps
//! its own cookie store.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: Arc<ApiConfig>,
}

impl HttpTransport {
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.cookie_store(true).timeout(config.timeout);
        let client = builder.build().map_err(|e| ApiError::Config(e.to_string()))?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

fn method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
        let url = self.config.endpoint(&request.path)?;
        let mut builder = self.client.request(method(request.method), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        #[cfg(target_arch = "wasm32")]
        {
            builder = builder.fetch_credentials_include();
        }

        tracing::trace!(method = request.method.as_str(), path = %request.path, "sending request");
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        tracing::trace!(status, path = %request.path, "response received");

        Ok(ApiResponse { status, body })
    }
}
