//! Scripted transport used by the client tests

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use crate::error::{Result, SdkError};
use crate::transport::{FileResponse, Transport};

/// Replays queued responses and records every request body it was given
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    posts: Arc<Mutex<VecDeque<Result<String>>>>,
    gets: Arc<Mutex<VecDeque<Result<FileResponse>>>>,
    sent: Arc<Mutex<Vec<Value>>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues a `{success: 1, data}` response
    pub(crate) fn ok(self, data: Value) -> Self {
        self.raw(json!({"success": 1, "data": data}).to_string())
    }

    /// Queues a `{success: 0}` response
    pub(crate) fn not_success(self) -> Self {
        self.raw(json!({"success": 0}).to_string())
    }

    pub(crate) fn raw(self, body: impl Into<String>) -> Self {
        self.posts.lock().unwrap().push_back(Ok(body.into()));
        self
    }

    pub(crate) fn fail(self, message: &str) -> Self {
        self.posts
            .lock()
            .unwrap()
            .push_back(Err(SdkError::Transport(message.to_string())));
        self
    }

    pub(crate) fn file(self, status: u16, body: &str) -> Self {
        self.gets.lock().unwrap().push_back(Ok(FileResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    pub(crate) fn fail_get(self, message: &str) -> Self {
        self.gets
            .lock()
            .unwrap()
            .push_back(Err(SdkError::Transport(message.to_string())));
        self
    }

    /// Bodies posted so far, decoded
    pub(crate) fn sent(&self) -> Vec<Value> {
        self.sent.lock().unwrap().clone()
    }

    /// Actions posted so far, in order
    pub(crate) fn actions(&self) -> Vec<String> {
        self.sent()
            .iter()
            .map(|body| body["action"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, _url: &str, body: String) -> Result<String> {
        self.sent
            .lock()
            .unwrap()
            .push(serde_json::from_str(&body).expect("client sent invalid JSON"));
        self.posts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SdkError::Transport("no more mock responses".to_string())))
    }

    async fn get(&self, _url: &str) -> Result<FileResponse> {
        self.gets
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SdkError::Transport("no more mock responses".to_string())))
    }
}
