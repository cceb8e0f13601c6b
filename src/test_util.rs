//! Test doubles shared by the unit tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Transport double that replays scripted responses in order and captures
/// every request it receives.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Script the next response.
    pub(crate) async fn push_ok(&self, status: u16, body: &str) {
        self.responses.lock().await.push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    /// Script the next call to fail at the transport level.
    pub(crate) async fn push_err(&self, cause: &str) {
        self.responses
            .lock()
            .await
            .push_back(Err(TransportError(cause.to_string())));
    }

    /// Requests captured so far, in call order.
    pub(crate) async fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of calls made so far.
    pub(crate) async fn calls(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().await.push(request);
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted response left".to_string())))
    }
}
