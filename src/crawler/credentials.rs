//! Credentials collaborator
//!
//! Credentials are acquired once at the start of a run and reused for every
//! request in it. Expiry is not detected: a stale session simply yields
//! unauthenticated pages.

use crate::config::AuthConfig;
use crate::crawler::fetcher::RequestHeaders;
use crate::MapsiteError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};

/// Header set and cookie string for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub headers: RequestHeaders,
    pub cookie_header: Option<String>,
}

impl Credentials {
    /// Merges the cookie string into the header map
    pub fn request_headers(&self) -> RequestHeaders {
        let mut headers = self.headers.clone();
        if let Some(cookie) = &self.cookie_header {
            headers.insert("Cookie".to_string(), cookie.clone());
        }
        headers
    }
}

/// Source of the run's credentials
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn acquire(&self) -> Result<Credentials, MapsiteError>;
}

/// Credentials taken verbatim from the `[auth]` configuration section
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    auth: AuthConfig,
    user_agent: String,
}

impl StaticCredentials {
    pub fn new(auth: AuthConfig, user_agent: impl Into<String>) -> Self {
        Self {
            auth,
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn acquire(&self) -> Result<Credentials, MapsiteError> {
        let mut headers = RequestHeaders::new();
        headers.insert("User-Agent".to_string(), self.user_agent.clone());

        match (&self.auth.username, &self.auth.password) {
            (Some(username), Some(password)) => {
                let token = STANDARD.encode(format!("{}:{}", username, password));
                headers.insert("Authorization".to_string(), format!("Basic {}", token));
            }
            (Some(username), None) => {
                return Err(MapsiteError::Credentials(format!(
                    "no password configured for user '{}'",
                    username
                )));
            }
            (None, Some(_)) => {
                return Err(MapsiteError::Credentials(
                    "password configured without a username".to_string(),
                ));
            }
            (None, None) => {}
        }

        let cookie_header = self
            .auth
            .cookie
            .as_ref()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        if cookie_header.is_none() && !headers.contains_key("Authorization") {
            tracing::warn!("No credentials configured; pages will be fetched anonymously");
        }

        Ok(Credentials {
            headers,
            cookie_header,
        })
    }
}
