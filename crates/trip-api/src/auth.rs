//! Auth Endpoints
//!
//! Cookie-based session: login sets the cookies, refresh renews them,
//! blacklist revokes them.

use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::resources::de_id;
use crate::transport::{ApiRequest, Transport};

const LOGIN_PATH: &str = "/auth/token/";
const LOGOUT_PATH: &str = "/auth/token/blacklist/";
const ME_PATH: &str = "/auth/me/";

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl User {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

impl<T: Transport> ApiClient<T> {
    /// Sign in and return the user the session belongs to
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        let request = ApiRequest::post(LOGIN_PATH).with_json(&Credentials { email, password })?;
        self.execute_once(request).await?;
        tracing::info!(email, "signed in");
        self.me().await
    }

    pub async fn logout(&self) -> ApiResult<()> {
        self.execute_once(ApiRequest::post(LOGOUT_PATH)).await?;
        Ok(())
    }

    pub async fn me(&self) -> ApiResult<User> {
        self.get(ME_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let mut user: User = serde_json::from_str(r#"{"id": 3, "email": "ana@example.com"}"#).unwrap();
        assert_eq!(user.id, "3");
        assert_eq!(user.display_name(), "ana@example.com");

        user.first_name = "Ana".into();
        assert_eq!(user.display_name(), "Ana");
    }
}
