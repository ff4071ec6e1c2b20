use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::thread;
use std::time::Duration;

use crate::models::annotation::AnnotationRecord;

use super::AnnotationSource;

/// Annotation source backed by the host's HTTP API.
pub struct HttpAnnotationSource {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    max_response_bytes: usize,
    max_retries: usize,
    retry_delay_ms: u64,
}

impl HttpAnnotationSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .context("Failed to build annotation HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None,
            max_response_bytes: 5 * 1024 * 1024,
            max_retries: 2,
            retry_delay_ms: 400,
        })
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_max_response_bytes(mut self, max_response_bytes: usize) -> Self {
        self.max_response_bytes = max_response_bytes;
        self
    }

    pub fn with_retries(mut self, max_retries: usize, retry_delay_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    fn url(&self, path: &str, params: &[(String, String)]) -> String {
        build_url(&self.base_url, path, params)
    }

    fn fetch_once(&self, url: &str) -> Result<Option<Vec<AnnotationRecord>>> {
        let mut request = self.client.get(url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .context("Network error during annotation fetch")?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(anyhow!("Annotation fetch failed with HTTP status {}", status));
        }

        if let Some(content_length) = response.content_length() {
            check_response_size(content_length as usize, self.max_response_bytes)?;
        }

        let bytes = response
            .bytes()
            .context("Failed to read annotation response body")?;
        check_response_size(bytes.len(), self.max_response_bytes)?;

        serde_json::from_slice(&bytes).context("Annotation response is not a valid annotation list")
    }
}

impl AnnotationSource for HttpAnnotationSource {
    fn get(&self, path: &str, params: &[(String, String)]) -> Result<Option<Vec<AnnotationRecord>>> {
        let url = self.url(path, params);
        let mut last_error: Option<anyhow::Error> = None;

        for attempt in 0..=self.max_retries {
            match self.fetch_once(&url) {
                Ok(records) => return Ok(records),
                Err(err) => {
                    if attempt == self.max_retries {
                        last_error = Some(err.context(format!(
                            "Failed to fetch annotations from {} after {} attempts",
                            path,
                            attempt + 1
                        )));
                    } else {
                        log::warn!("Annotation fetch attempt {} failed for {}: {}", attempt + 1, path, err);
                        thread::sleep(Duration::from_millis(self.retry_delay_ms));
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("Unknown annotation fetch error")))
    }
}

fn check_response_size(len: usize, max_response_bytes: usize) -> Result<()> {
    if len > max_response_bytes {
        return Err(anyhow!(
            "Annotation response too large ({} bytes > {} bytes)",
            len,
            max_response_bytes
        ));
    }
    Ok(())
}

fn build_url(base_url: &str, path: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return format!("{}{}", base_url, path);
    }

    let query: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect();
    format!("{}{}?{}", base_url, path, query.join("&"))
}
