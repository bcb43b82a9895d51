//! Retry wrapper for read-only operations

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use crate::error::Result;
use crate::protocol::{TaskStatus, TaskUid};
use crate::transport::{HttpTransport, Transport};
use serde_json::Value;
use super::client::Client;

/// Client wrapper that retries transport failures of idempotent queries
///
/// Only network-level errors are retried; protocol errors and anything that
/// changes task state go through once, exactly as with [`Client`].
#[derive(Clone)]
pub struct RetryClient<T = HttpTransport> {
    client: Client<T>,
    max_retries: usize,
    retry_delay: Duration,
}

impl<T: Transport> RetryClient<T> {
    /// Creates a new retry client
    ///
    /// # Arguments
    ///
    /// * `client` - The client to wrap
    /// * `max_retries` - Maximum number of retry attempts
    /// * `retry_delay` - Delay between retry attempts
    ///
    /// # Example
    ///
    /// ```rust
    /// use aparser_sdk::scheduler::{Client, RetryClient};
    /// use std::time::Duration;
    ///
    /// let client = Client::new("http://127.0.0.1", "secret").unwrap();
    /// let retry_client = RetryClient::new(client, 3, Duration::from_secs(1));
    /// ```
    pub fn new(client: Client<T>, max_retries: usize, retry_delay: Duration) -> Self {
        Self {
            client,
            max_retries,
            retry_delay,
        }
    }

    async fn with_retry<R, F, Fut>(&self, what: &str, mut operation: F) -> Result<R>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Err(e) if e.is_transport() && attempt < self.max_retries => {
                    attempt += 1;
                    log::warn!(
                        "{} failed ({}), retry {}/{} in {:?}",
                        what,
                        e,
                        attempt,
                        self.max_retries,
                        self.retry_delay
                    );
                    sleep(self.retry_delay).await;
                }
                result => return result,
            }
        }
    }

    pub async fn ping(&self) -> Result<Value> {
        self.with_retry("ping", || self.client.ping()).await
    }

    pub async fn get_task_state(&self, task_uid: TaskUid) -> Result<TaskStatus> {
        self.with_retry("getTaskState", || self.client.get_task_state(task_uid))
            .await
    }

    pub async fn get_tasks_list(&self, completed: bool) -> Result<Vec<TaskUid>> {
        self.with_retry("getTasksList", || self.client.get_tasks_list(completed))
            .await
    }

    pub async fn get_task_result_file(&self, task_uid: TaskUid) -> Result<String> {
        self.with_retry("getTaskResultsFile", || self.client.get_task_result_file(task_uid))
            .await
    }

    pub async fn load_file(&self, url: &str) -> Result<String> {
        self.with_retry("load_file", || self.client.load_file(url)).await
    }

    /// Get access to the underlying client
    ///
    /// Use it for operations that must not be repeated blindly, such as
    /// `add_task` or `change_task_state`.
    pub fn client(&self) -> &Client<T> {
        &self.client
    }
}
