//! # Transport
//!
//! One blocking request to one endpoint. The executor owns failover; a
//! transport only reports how a single attempt went.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use super::errors::TransportError;

/// Single-attempt request sender
pub trait Transport: Send + Sync {
    /// Send `body` as a JSON GET to `url`, returning the response text of a
    /// successful (2xx) response.
    fn send(&self, url: &str, body: &str, timeout: Duration) -> Result<String, TransportError>;
}

/// HTTP transport backed by a blocking reqwest client
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build the client. Must be called outside an async runtime.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, url: &str, body: &str, timeout: Duration) -> Result<String, TransportError> {
        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .timeout(timeout)
            .send()
            .map_err(|err| {
                if err.is_timeout() {
                    TransportError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    TransportError::Connect {
                        url: url.to_string(),
                        message: err.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(|err| TransportError::Body {
            url: url.to_string(),
            message: err.to_string(),
        })
    }
}
