//! API Client
//!
//! Every request goes through [`ApiClient::execute`]: a 401 triggers exactly
//! one session refresh and one retry before giving up with
//! [`ApiError::Unauthorized`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConfig;
use crate::error::{detail_message, ApiError, ApiResult, FieldErrors};
use crate::http::HttpTransport;
use crate::transport::{ApiRequest, ApiResponse, Transport};

const UNAUTHORIZED: u16 = 401;
const BAD_REQUEST: u16 = 400;

pub struct ApiClient<T = HttpTransport> {
    transport: Arc<T>,
    config: Arc<ApiConfig>,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: Arc::clone(&self.config),
        }
    }
}

impl ApiClient<HttpTransport> {
    /// Client talking HTTP to the configured API
    pub fn connect(config: ApiConfig) -> ApiResult<Self> {
        let transport = HttpTransport::new(config.clone())?;
        Ok(Self::new(transport, config))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, config: ApiConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    // ========================
    // Request execution
    // ========================

    /// Send a request, refreshing the session once on 401
    pub async fn execute(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let response = self.transport.send(&request).await?;
        if response.status != UNAUTHORIZED {
            return check(response);
        }

        tracing::debug!(path = %request.path, "unauthorized, refreshing session");
        if !self.refresh().await {
            return Err(ApiError::Unauthorized);
        }

        let retried = self.transport.send(&request).await?;
        check(retried)
    }

    /// Send a request without the refresh cycle (login, logout)
    pub async fn execute_once(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let response = self.transport.send(&request).await?;
        check(response)
    }

    async fn refresh(&self) -> bool {
        let request = ApiRequest::post(self.config.refresh_path.clone());
        match self.transport.send(&request).await {
            Ok(response) if response.is_success() => true,
            Ok(response) => {
                tracing::warn!(status = response.status, "session refresh rejected");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "session refresh failed");
                false
            }
        }
    }

    // ========================
    // Typed helpers
    // ========================

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.execute(ApiRequest::get(path)).await?.json()
    }

    pub async fn get_with_query<R: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> ApiResult<R> {
        self.execute(ApiRequest::get(path).with_query(query)).await?.json()
    }

    pub async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<R> {
        self.execute(ApiRequest::post(path).with_json(body)?).await?.json()
    }

    pub async fn put<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<R> {
        self.execute(ApiRequest::put(path).with_json(body)?).await?.json()
    }

    /// PATCH, discarding the response body
    pub async fn patch<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        self.execute(ApiRequest::patch(path).with_json(body)?).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.execute(ApiRequest::delete(path)).await?;
        Ok(())
    }
}

/// Map a response status onto the error taxonomy
fn check(response: ApiResponse) -> ApiResult<ApiResponse> {
    match response.status {
        _ if response.is_success() => Ok(response),
        UNAUTHORIZED => Err(ApiError::Unauthorized),
        BAD_REQUEST => Err(ApiError::Validation(FieldErrors::from_body(&response.body))),
        status => Err(ApiError::Status {
            status,
            message: detail_message(&response.body),
        }),
    }
}
