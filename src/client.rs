//! HTTP client used by the module gateway

use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{MlmodError, Result};

/// Error body as sent by the server on failed requests
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Base HTTP client for API operations
#[derive(Debug, Clone)]
pub struct BaseClient {
    client: Client,
    config: ClientConfig,
}

impl BaseClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut client_builder = Client::builder().timeout(Duration::from_secs(config.timeout));

        if !config.use_proxy {
            client_builder = client_builder.no_proxy();
        }

        let client = client_builder.build()?;

        Ok(Self { client, config })
    }

    /// Send a request and decode the JSON response body
    pub async fn request<T, R>(&self, method: Method, endpoint: &str, payload: Option<&T>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let (status, response_text) = self.send(method, endpoint, payload).await?;

        serde_json::from_str::<R>(&response_text).map_err(|e| {
            MlmodError::invalid_response(format!(
                "Invalid API response ({}): {}",
                status.as_u16(),
                e
            ))
        })
    }

    /// Send a request whose response body is ignored
    pub async fn request_empty<T>(&self, method: Method, endpoint: &str, payload: Option<&T>) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.send(method, endpoint, payload).await?;
        Ok(())
    }

    async fn send<T>(&self, method: Method, endpoint: &str, payload: Option<&T>) -> Result<(StatusCode, String)>
    where
        T: Serialize + ?Sized,
    {
        let url = self.config.endpoint_url(endpoint);
        tracing::debug!("{} {}", method, url);

        let mut request_builder = self
            .client
            .request(method, &url)
            .header("Accept", "application/json");

        if let Some(data) = payload {
            request_builder = request_builder.json(data);
        }

        let response = request_builder.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::debug!("{} returned {}", url, status);
            return Err(MlmodError::api(
                status.as_u16(),
                error_message(&response_text).unwrap_or_default(),
            ));
        }

        Ok((status, response_text))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// Pull a human readable message out of an error body
///
/// Prefers the `message` field, then `error`, then the raw text.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<ErrorBody>(trimmed) {
        Ok(parsed) => parsed
            .message
            .or(parsed.error)
            .filter(|m| !m.trim().is_empty()),
        Err(_) => Some(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_message_field() {
        let body = r#"{"error": "Not Found", "message": "Module 3 not found"}"#;
        assert_eq!(error_message(body).as_deref(), Some("Module 3 not found"));
    }

    #[test]
    fn test_error_message_falls_back_to_error_field() {
        let body = r#"{"error": "Bad Request"}"#;
        assert_eq!(error_message(body).as_deref(), Some("Bad Request"));
    }

    #[test]
    fn test_error_message_plain_text() {
        assert_eq!(
            error_message("  upstream timeout \n").as_deref(),
            Some("upstream timeout")
        );
    }

    #[test]
    fn test_error_message_empty_body() {
        assert_eq!(error_message(""), None);
        assert_eq!(error_message(r#"{"status": 500}"#), None);
        assert_eq!(error_message(r#"{"message": " "}"#), None);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ClientConfig {
            base_url: String::new(),
            ..ClientConfig::default()
        };
        assert!(BaseClient::new(config).is_err());
    }
}
