//! HTTP transport seam
//!
//! The client talks to the backend through one async trait so tests can
//! substitute a scripted in-memory transport.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::errors::{DashboardError, DashboardResult};

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request ready to be sent.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method:  HttpMethod,
    /// Absolute URL.
    pub url:     String,
    /// Headers, including the custom token header.
    pub headers: Vec<(String, String)>,
    /// JSON body, if any.
    pub body:    Option<serde_json::Value>,
}

/// A received response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body text.
    pub body:   String,
}

impl ApiResponse {
    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> DashboardResult<T> {
        serde_json::from_str(&self.body).map_err(|e| DashboardError::Decode(e.to_string()))
    }
}

/// Async HTTP transport.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends one request and reads the full response body.
    async fn send(&self, request: ApiRequest) -> DashboardResult<ApiResponse>;
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport with the given per-request timeout.
    pub fn new(timeout: Duration) -> DashboardResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> DashboardResult<ApiResponse> {
        let mut builder = self.client.request(request.method.into(), &request.url);
        for (key, value) in request.headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = request.body {
            builder = builder.json(&body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| DashboardError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| DashboardError::Transport(e.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted transport for tests: canned responses, recorded requests.

    use std::{collections::VecDeque, sync::Mutex};

    use super::*;

    /// Transport double replaying queued responses in order.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<ApiResponse, String>>>,
        requests:  Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// Queues a 200 response with the given JSON body.
        pub(crate) fn push_ok(&self, body: serde_json::Value) {
            self.responses
                .lock()
                .expect("responses lock")
                .push_back(Ok(ApiResponse { status: 200, body: body.to_string() }));
        }

        /// Queues a transport-level failure.
        pub(crate) fn push_error(&self, message: &str) {
            self.responses
                .lock()
                .expect("responses lock")
                .push_back(Err(message.to_string()));
        }

        /// Requests seen so far.
        pub(crate) fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().expect("requests lock").clone()
        }

        /// Number of requests seen so far.
        pub(crate) fn call_count(&self) -> usize {
            self.requests.lock().expect("requests lock").len()
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn send(&self, request: ApiRequest) -> DashboardResult<ApiResponse> {
            self.requests.lock().expect("requests lock").push(request);
            match self.responses.lock().expect("responses lock").pop_front() {
                Some(Ok(response)) => Ok(response),
                Some(Err(message)) => Err(DashboardError::Transport(message)),
                None => Err(DashboardError::Transport("no scripted response".to_string())),
            }
        }
    }
}
