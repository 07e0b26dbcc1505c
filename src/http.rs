//! Async HTTP client wrapping reqwest.
//!
//! Not a browser — just HTTP requests. Handles redirects, timeouts, retry
//! on 5xx and transport errors, and backoff on 429. The user-agent is
//! supplied per request rather than at client construction because every
//! voting attempt presents a different fake platform.

use anyhow::Result;
use std::time::Duration;

/// Response from an HTTP request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Original requested URL.
    pub url: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// All response headers. Callers need `set-cookie`, so nothing is filtered.
    pub headers: Vec<(String, String)>,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Look up a response header by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP client for the voting sequence.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout_ms: u64,
}

impl HttpClient {
    /// Create a new HTTP client with the given per-request timeout.
    pub fn new(timeout_ms: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .unwrap_or_default();

        Self { client, timeout_ms }
    }

    /// Perform a single GET request with retry on 5xx and backoff on 429.
    ///
    /// `extra_headers` carries the attempt's user-agent and session cookie.
    pub async fn get(
        &self,
        url: &str,
        extra_headers: &[(String, String)],
    ) -> Result<HttpResponse> {
        let mut retries = 0u32;
        let max_retries = 2;

        loop {
            let mut builder = self
                .client
                .get(url)
                .timeout(Duration::from_millis(self.timeout_ms));
            for (name, value) in extra_headers {
                builder = builder.header(name.as_str(), value.as_str());
            }

            match builder.send().await {
                Ok(r) => {
                    let status = r.status().as_u16();

                    // Retry on 5xx
                    if status >= 500 && retries < max_retries {
                        retries += 1;
                        let delay = Duration::from_millis(500 * 2u64.pow(retries - 1));
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    // Backoff on 429
                    if status == 429 && retries < max_retries {
                        retries += 1;
                        let retry_after = r
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|s| s.parse::<u64>().ok())
                            .unwrap_or(2);
                        let delay = Duration::from_secs(retry_after.min(10));
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    return Ok(Self::into_response(url, r).await);
                }
                Err(e) => {
                    if retries < max_retries {
                        retries += 1;
                        let delay = Duration::from_millis(500 * 2u64.pow(retries - 1));
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }

    /// POST form data (url-encoded) with the attempt's identity headers.
    ///
    /// No automatic retry here: a failed vote submission invalidates the
    /// whole attempt, so the caller restarts the sequence instead.
    pub async fn post_form(
        &self,
        url: &str,
        form_fields: &[(String, String)],
        extra_headers: &[(String, String)],
    ) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .post(url)
            .timeout(Duration::from_millis(self.timeout_ms));

        for (name, value) in extra_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = builder.form(form_fields);

        let r = builder.send().await?;
        Ok(Self::into_response(url, r).await)
    }

    async fn into_response(url: &str, r: reqwest::Response) -> HttpResponse {
        let status = r.status().as_u16();
        let final_url = r.url().to_string();

        let headers: Vec<(String, String)> = r
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body = r.text().await.unwrap_or_default();

        HttpResponse {
            url: url.to_string(),
            final_url,
            status,
            headers,
            body,
        }
    }
}
