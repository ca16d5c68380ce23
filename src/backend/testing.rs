//! Transport double shared by the executor, service and HTTP tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use super::{Transport, TransportError};

/// Answers by exact URL; unknown URLs refuse the connection
#[derive(Default)]
pub struct CannedTransport {
    routes: HashMap<String, Result<String, TransportError>>,
    pub requests: Mutex<Vec<(String, String)>>,
}

impl CannedTransport {
    pub fn with(self, url: &str, body: Value) -> Self {
        self.with_text(url, &body.to_string())
    }

    pub fn with_text(mut self, url: &str, text: &str) -> Self {
        self.routes.insert(url.to_string(), Ok(text.to_string()));
        self
    }

    pub fn failing(mut self, url: &str, err: TransportError) -> Self {
        self.routes.insert(url.to_string(), Err(err));
        self
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn bodies_sent_to(&self, url: &str) -> Vec<Value> {
        self.sent()
            .into_iter()
            .filter(|(u, _)| u == url)
            .map(|(_, body)| serde_json::from_str(&body).unwrap())
            .collect()
    }
}

pub fn refused(url: &str) -> TransportError {
    TransportError::Connect {
        url: url.to_string(),
        message: "connection refused".to_string(),
    }
}

impl Transport for CannedTransport {
    fn send(&self, url: &str, body: &str, _timeout: Duration) -> Result<String, TransportError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), body.to_string()));
        self.routes.get(url).cloned().unwrap_or_else(|| Err(refused(url)))
    }
}
