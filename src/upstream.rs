use reqwest::header;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

// User-Agent advertised to the tile provider for attribution and abuse tracking
pub const USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    " MapTilerProxy"
);

/// Why an upstream fetch failed. Variants map onto the generic client-facing
/// responses; the detail stays in the server log.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream api key is not configured")]
    MissingApiKey,

    #[error("upstream returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("upstream request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("upstream body could not be read: {0}")]
    Decode(#[source] reqwest::Error),
}

// What came back from the upstream: decoded json, or an opaque body to pass
// through with its content type (tile images, glyphs, vector payloads)
pub enum UpstreamResponse {
    Json(serde_json::Value),
    Binary { content_type: String, body: Vec<u8> },
}

/// Client for the tile provider. Holds the secret key and injects it into
/// every upstream URL; the key never leaves this module via errors or logs.
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    origin: Option<String>,
}

impl UpstreamClient {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.upstream_timeout))
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            base_url: config.upstream_url.clone(),
            api_key: config.api_key.clone(),
            origin: config.origin.clone(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    // Append the key with '&' when the path already carries a query string
    fn build_url(&self, path: &str) -> Result<String, UpstreamError> {
        let key = self.api_key.as_deref().ok_or(UpstreamError::MissingApiKey)?;
        let separator = if path.contains('?') { '&' } else { '?' };
        Ok(format!("{}{}{}key={}", self.base_url, path, separator, key))
    }

    /// Fetch a validated path from the upstream and classify the response.
    pub async fn fetch(&self, path: &str) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.build_url(path)?;

        let mut request = self.client.get(&url);
        if let Some(origin) = &self.origin {
            request = request.header(header::ORIGIN, origin);
        }

        // without_url: reqwest errors print the full request URL, which
        // carries the key
        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();

        if content_type.contains("application/json") {
            let data = response
                .json()
                .await
                .map_err(|e| UpstreamError::Decode(e.without_url()))?;
            return Ok(UpstreamResponse::Json(data));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Decode(e.without_url()))?
            .to_vec();

        Ok(UpstreamResponse::Binary { content_type, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_key: Option<&str>) -> UpstreamClient {
        UpstreamClient::new(&Config {
            port: 0,
            upstream_url: "https://api.maptiler.com".to_string(),
            rate_limit: 100,
            rate_window: 60,
            block_duration: 300,
            upstream_timeout: 5,
            api_key: api_key.map(String::from),
            origin: None,
        })
    }

    #[test]
    fn build_url_appends_key_with_question_mark() {
        let url = client(Some("abc123")).build_url("/tiles/0/0/0.pbf").unwrap();
        assert_eq!(url, "https://api.maptiler.com/tiles/0/0/0.pbf?key=abc123");
    }

    #[test]
    fn build_url_appends_key_with_ampersand_when_query_present() {
        let url = client(Some("abc123"))
            .build_url("/geocoding/jakarta.json?limit=5")
            .unwrap();
        assert_eq!(
            url,
            "https://api.maptiler.com/geocoding/jakarta.json?limit=5&key=abc123"
        );
    }

    #[test]
    fn build_url_fails_without_a_key() {
        assert!(matches!(
            client(None).build_url("/tiles/0/0/0.pbf"),
            Err(UpstreamError::MissingApiKey)
        ));
    }

    #[test]
    fn error_messages_never_contain_the_key() {
        let err = client(None).build_url("/tiles/0/0/0.pbf").unwrap_err();
        assert!(!err.to_string().contains("key="));
    }

    #[test]
    fn user_agent_identifies_the_proxy() {
        assert!(USER_AGENT.contains("maptiles-gateway"));
        assert!(USER_AGENT.ends_with("MapTilerProxy"));
    }
}
