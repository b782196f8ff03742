//! Remote breach-verification collaborator.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Deserialize;

use crate::error::RemoteError;

/// Response of the remote verification service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteVerdict {
    pub is_breached: bool,
    #[serde(default)]
    pub passwords_checked: Option<u64>,
}

/// Service that knows whether a password appears in breach corpora.
///
/// Failures are expected; the breach checker recovers from every one of
/// them. Implementations own any timeout policy.
#[async_trait]
pub trait RemoteVerifier: Send + Sync {
    async fn verify(&self, password: &SecretString) -> Result<RemoteVerdict, RemoteError>;
}

#[cfg(feature = "http")]
pub use http::HttpVerifier;

#[cfg(feature = "http")]
mod http {
    use super::*;
    use reqwest::StatusCode;
    use secrecy::ExposeSecret;
    use serde::Serialize;

    use crate::config::BreachConfig;

    #[derive(Serialize)]
    struct VerifyRequest<'a> {
        password: &'a str,
    }

    /// JSON-over-HTTPS verifier: POSTs `{"password": ...}` and expects
    /// `{"isBreached": bool, "passwordsChecked"?: int}`.
    #[derive(Debug, Clone)]
    pub struct HttpVerifier {
        client: reqwest::Client,
        endpoint: String,
        api_token: Option<String>,
    }

    impl HttpVerifier {
        pub fn new(endpoint: impl Into<String>) -> Self {
            Self {
                client: reqwest::Client::new(),
                endpoint: endpoint.into(),
                api_token: None,
            }
        }

        /// Verifier for `config.endpoint`, carrying `config.api_token` if set.
        ///
        /// Returns `None` when no endpoint is configured.
        pub fn from_config(config: &BreachConfig) -> Option<Self> {
            let endpoint = config.endpoint.as_deref()?;
            let verifier = Self::new(endpoint);
            Some(match &config.api_token {
                Some(token) => verifier.with_token(token.as_str()),
                None => verifier,
            })
        }

        /// Sends `Authorization: Bearer <token>` with every request.
        pub fn with_token(mut self, token: impl Into<String>) -> Self {
            self.api_token = Some(token.into());
            self
        }

        pub fn endpoint(&self) -> &str {
            &self.endpoint
        }
    }

    #[async_trait]
    impl RemoteVerifier for HttpVerifier {
        async fn verify(&self, password: &SecretString) -> Result<RemoteVerdict, RemoteError> {
            let mut request = self.client.post(&self.endpoint).json(&VerifyRequest {
                password: password.expose_secret(),
            });
            if let Some(token) = &self.api_token {
                request = request.bearer_auth(token);
            }

            let resp = request
                .send()
                .await
                .map_err(|e| RemoteError::Transport(e.to_string()))?;

            match resp.status() {
                status if status.is_success() => {
                    let body = resp
                        .bytes()
                        .await
                        .map_err(|e| RemoteError::Transport(e.to_string()))?;
                    serde_json::from_slice::<RemoteVerdict>(&body)
                        .map_err(|e| RemoteError::Payload(e.to_string()))
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Breach service rate limit reached");
                    Err(RemoteError::Status(StatusCode::TOO_MANY_REQUESTS.as_u16()))
                }
                status => Err(RemoteError::Status(status.as_u16())),
            }
        }
    }
}
