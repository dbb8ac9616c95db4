use std::time::Duration;

use harvest_core::error::AppError;
use harvest_core::traits::Fetcher;
use reqwest::Client;

const USER_AGENT: &str = concat!("harvest/", env!("CARGO_PKG_VERSION"));

/// HTTP fetcher using reqwest.
///
/// Downloads raw HTML from URLs with a configurable timeout. Non-2xx
/// responses are errors for search and detail pages alike.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let timeout_secs = timeout.as_secs();
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        tracing::debug!(url, "GET");
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpError(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_with_default_timeout() {
        let fetcher = ReqwestFetcher::new().unwrap();
        assert_eq!(fetcher.timeout_secs, 30);
    }

    #[test]
    fn test_with_timeout_records_seconds() {
        let fetcher = ReqwestFetcher::with_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(fetcher.timeout_secs, 5);
    }

    #[tokio::test]
    async fn test_connect_error_maps_to_network_error() {
        let fetcher = ReqwestFetcher::with_timeout(Duration::from_secs(2)).unwrap();
        // Reserved TEST-NET-1 address; nothing listens there.
        let err = fetcher.fetch("http://192.0.2.1:81/").await.unwrap_err();
        assert!(err.is_network(), "expected a network error, got: {err}");
    }
}
