//! Shared HTTP plumbing for upstream provider clients

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ProvidersConfig;
use crate::{MediSnowError, Result};

/// Build the HTTP client used by every provider
pub fn build_client(config: &ProvidersConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| MediSnowError::config(format!("Failed to create HTTP client: {e}")))
}

/// GET `url` and return the body, mapping non-success statuses to API errors
pub async fn get_text(client: &Client, provider: &str, url: &str) -> Result<String> {
    debug!(provider, url, "Requesting upstream resource");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| MediSnowError::api(format!("{provider} request failed: {e}")))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        warn!(provider, %status, "Upstream request returned an error status");

        return Err(match status.as_u16() {
            404 => MediSnowError::api(format!("{provider} resource not found: {url}")),
            429 => MediSnowError::api(format!("{provider} rate limit exceeded")),
            _ => MediSnowError::api(format!("{provider} error {status}: {error_text}")),
        });
    }

    response
        .text()
        .await
        .map_err(|e| MediSnowError::api(format!("Failed to read {provider} response: {e}")))
}

/// GET `url` and decode the JSON body
pub async fn get_json<T: DeserializeOwned>(client: &Client, provider: &str, url: &str) -> Result<T> {
    let body = get_text(client, provider, url).await?;
    decode(provider, &body)
}

/// Decode a JSON payload, reporting failures as malformed provider data
pub fn decode<T: DeserializeOwned>(provider: &str, body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| MediSnowError::malformed(format!("Failed to parse {provider} response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        value: i32,
    }

    #[test]
    fn test_decode_reports_malformed_payload() {
        let result: Result<Sample> = decode("Test", "{\"value\": \"x\"}");
        assert!(matches!(
            result,
            Err(MediSnowError::MalformedProviderResponse { .. })
        ));
    }

    #[test]
    fn test_decode_valid_payload() {
        let sample: Sample = decode("Test", "{\"value\": 3}").unwrap();
        assert_eq!(sample.value, 3);
    }

    #[test]
    fn test_build_client_with_defaults() {
        assert!(build_client(&ProvidersConfig::default()).is_ok());
    }
}
