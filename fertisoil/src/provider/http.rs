//! HTTP client abstraction for testability

use std::time::Duration;

use super::types::ProviderError;

/// Default request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The fully built URL, query string included
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with default configuration.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a new ReqwestClient with a custom timeout.
    ///
    /// The timeout bounds the whole request, from connect to the last byte
    /// of the body.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ProviderError::HttpError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(format!("{}", e))
            } else {
                ProviderError::HttpError(format!("Request failed: {}", e))
            }
        })?;

        // Check HTTP status
        if !response.status().is_success() {
            return Err(ProviderError::HttpError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        response.bytes().map(|b| b.to_vec()).map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(format!("{}", e))
            } else {
                ProviderError::HttpError(format!("Failed to read response: {}", e))
            }
        })
    }
}

/// Builds a URL with an encoded query string.
///
/// Repeated keys are allowed and kept in order.
pub(crate) fn build_url(base: &str, params: &[(&str, String)]) -> Result<String, ProviderError> {
    reqwest::Url::parse_with_params(base, params)
        .map(String::from)
        .map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", base, e)))
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock HTTP client for testing.
    ///
    /// Returns a canned response and records every requested URL.
    pub struct MockHttpClient {
        pub response: Result<Vec<u8>, ProviderError>,
        calls: AtomicUsize,
        urls: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        pub fn new(response: Result<Vec<u8>, ProviderError>) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
                urls: Mutex::new(Vec::new()),
            }
        }

        pub fn ok(body: &str) -> Self {
            Self::new(Ok(body.as_bytes().to_vec()))
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_url(&self) -> Option<String> {
            self.urls.lock().unwrap().last().cloned()
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_string());
            self.response.clone()
        }
    }

    #[test]
    fn test_mock_client_success() {
        let mock = MockHttpClient::new(Ok(vec![1, 2, 3, 4]));

        let result = mock.get("http://example.com");
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_mock_client_error() {
        let mock = MockHttpClient::new(Err(ProviderError::HttpError("Test error".to_string())));

        let result = mock.get("http://example.com");
        assert!(result.is_err());
    }

    #[test]
    fn test_build_url_repeats_keys() {
        let url = build_url(
            "https://example.com/query",
            &[
                ("property", "clay".to_string()),
                ("property", "sand".to_string()),
                ("lat", "1.5".to_string()),
            ],
        )
        .unwrap();
        assert_eq!(
            url,
            "https://example.com/query?property=clay&property=sand&lat=1.5"
        );
    }

    #[test]
    fn test_build_url_rejects_garbage_base() {
        let result = build_url("not a url", &[]);
        assert!(matches!(result, Err(ProviderError::InvalidUrl(_))));
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(ReqwestClient::with_timeout(Duration::from_secs(1)).is_ok());
    }
}
