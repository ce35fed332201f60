//! Shared helpers for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use onapp_core::{ApiRequest, ApiResponse, Client, Response, Transport, TransportError};
use wiremock::MockServer;

pub const USERNAME: &str = "admin@example.com";
pub const API_KEY: &str = "secret-key";

/// Transport that records every request and replays canned bodies
#[derive(Clone, Default)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    replies: Arc<Mutex<VecDeque<(u16, String)>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back((status, body.into()));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn client(&self) -> Client {
        Client::new(self.clone())
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let (status, body) = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((200, "[]".to_string()));

        if !(200..300).contains(&status) {
            return Err(TransportError::Status { status, body });
        }
        Ok(ApiResponse {
            meta: Response::new(status),
            body,
        })
    }
}

/// Client pointed at a wiremock server
pub fn mock_client(server: &MockServer) -> Client {
    Client::builder(server.uri())
        .credentials(USERNAME, API_KEY)
        .build()
        .expect("client builds")
}
