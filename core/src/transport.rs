//! Blocking transport backed by `ureq`.
//!
//! Enabled by the `ureq` cargo feature (on by default). The agent is built
//! with status-as-error disabled so that 4xx/5xx responses come back as data
//! and the client applies its own status and header interpretation.

use std::time::Duration;

use ureq::http::HeaderMap;
use ureq::Agent;

use crate::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// `HttpTransport` implementation over a `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    /// `timeout` bounds the whole exchange, connect through body.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Wrap a preconfigured agent. It must have `http_status_as_error`
    /// disabled, otherwise error statuses surface as transport failures.
    pub fn from_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.agent.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let mut response = builder
            .send(request.body.as_bytes())
            .map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status();
        let headers = header_pairs(response.headers());
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::new(e.to_string()))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

/// Header values that are not visible ASCII are decoded lossily rather than
/// dropped, so alert and debug-help text still reaches the client.
fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = match value.to_str() {
                Ok(value) => value.to_string(),
                Err(_) => String::from_utf8_lossy(value.as_bytes()).into_owned(),
            };
            (name.as_str().to_string(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use ureq::http::HeaderValue;

    use super::*;

    #[test]
    fn non_ascii_header_values_are_kept() {
        let mut headers = HeaderMap::new();
        headers.insert("x-akismet-debug-help", HeaderValue::from_bytes("Clé invalide".as_bytes()).unwrap());
        headers.insert("x-akismet-alert-msg", HeaderValue::from_bytes(b"caf\xe9").unwrap());
        headers.insert("content-type", HeaderValue::from_static("text/plain"));

        let mut pairs = header_pairs(&headers);
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("content-type".to_string(), "text/plain".to_string()),
                ("x-akismet-alert-msg".to_string(), "caf\u{FFFD}".to_string()),
                ("x-akismet-debug-help".to_string(), "Clé invalide".to_string()),
            ]
        );
    }
}
