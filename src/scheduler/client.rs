//! Task lifecycle client

use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use crate::config::Config;
use crate::error::{Result, SdkError};
use crate::protocol::{
    decode_response, BulkRequest, MoveDirection, MoveTask, OneRequest, Payload, Request,
    TaskChangeStatus, TaskConfig, TaskQueue, TaskStatus, TaskUid, TaskUidData, TasksListFilter,
    ToStatus,
};
use crate::transport::{HttpTransport, Transport};

/// Client for a single A-Parser instance
///
/// Holds nothing but immutable connection settings and the transport, so it
/// can be cloned freely and used from many tasks at once.
#[derive(Clone)]
pub struct Client<T = HttpTransport> {
    config: Config,
    endpoint: String,
    transport: T,
}

impl Client<HttpTransport> {
    /// Creates a client for `address` on the default port
    ///
    /// # Example
    ///
    /// ```rust
    /// use aparser_sdk::scheduler::Client;
    ///
    /// let client = Client::new("http://127.0.0.1", "secret").unwrap();
    /// assert_eq!(client.endpoint(), "http://127.0.0.1:9091/API");
    /// ```
    pub fn new(address: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        Self::from_config(Config::new(address, password))
    }

    pub fn from_config(config: Config) -> Result<Self> {
        Self::with_transport(config, HttpTransport::new()?)
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client over a custom [`Transport`]
    pub fn with_transport(config: Config, transport: T) -> Result<Self> {
        config.validate()?;
        let endpoint = config.endpoint();
        Ok(Self {
            config,
            endpoint,
            transport,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one request and returns the `data` field of a successful response
    ///
    /// The payload is validated before anything is sent. Transport failures
    /// come back as [`SdkError::Transport`], `success != 1` as
    /// [`SdkError::Protocol`].
    pub async fn send(&self, payload: Payload) -> Result<Value> {
        let request = Request::new(self.config.password.as_str(), payload)?;
        log::debug!("Sending '{}' to {}", request.action(), self.endpoint);

        let body = request.encode()?;
        let raw = self.transport.post(&self.endpoint, body).await?;
        decode_response(&raw)
    }

    /// Checks that the API is reachable and the password is accepted
    ///
    /// A healthy instance answers with `"pong"`.
    pub async fn ping(&self) -> Result<Value> {
        self.send(Payload::Ping).await
    }

    /// Queues a new task and returns its id
    ///
    /// # Arguments
    ///
    /// * `config` - The job configuration; it is validated before sending
    ///
    /// # Returns
    ///
    /// The id the service assigned to the task. A response that is not an
    /// integer (or a string holding one) is a [`SdkError::Protocol`].
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use aparser_sdk::protocol::TaskConfig;
    /// use aparser_sdk::scheduler::Client;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::new("http://127.0.0.1", "secret")?;
    /// let config = TaskConfig::new(vec![vec!["SE::Google".into()]], "rust");
    /// let task_uid = client.add_task(config).await?;
    /// println!("Task ID: {}", task_uid);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn add_task(&self, config: TaskConfig) -> Result<TaskUid> {
        let data = self.send(Payload::AddTask(config)).await?;
        let task_uid = coerce_task_uid(&data)?;
        log::info!("Added task {}", task_uid);
        Ok(task_uid)
    }

    /// Fetches the current status snapshot of a task
    pub async fn get_task_state(&self, task_uid: TaskUid) -> Result<TaskStatus> {
        let data = self
            .send(Payload::GetTaskState(TaskUidData { task_uid }))
            .await?;

        let status: TaskStatus = serde_json::from_value(data.clone()).map_err(|e| {
            log::error!("Unexpected task state for {}: {}", task_uid, data);
            SdkError::Protocol(format!("invalid task state: {}", e))
        })?;

        log::info!("Got {} for task {}", status.status, task_uid);
        Ok(status)
    }

    /// Asks the service to move a task to another state
    pub async fn change_task_state(&self, task_uid: TaskUid, to_status: TaskChangeStatus) -> Result<()> {
        self.send(Payload::ChangeTaskStatus(ToStatus { task_uid, to_status }))
            .await?;
        Ok(())
    }

    /// Requests deletion of a task, logging instead of returning any failure
    ///
    /// Used as cleanup after another error, which must not be replaced by
    /// whatever goes wrong here.
    pub async fn try_delete_task(&self, task_uid: TaskUid) {
        if let Err(e) = self.change_task_state(task_uid, TaskChangeStatus::Deleting).await {
            log::warn!("Can't delete task {}: {}", task_uid, e);
        }
    }

    /// Ids of the active tasks, or of the finished ones when `completed` is set
    pub async fn get_tasks_list(&self, completed: bool) -> Result<Vec<TaskUid>> {
        let data = self
            .send(Payload::GetTasksList(TasksListFilter { completed }))
            .await?;

        match &data {
            Value::Array(items) => items.iter().map(coerce_task_uid).collect(),
            other => {
                log::error!("Unexpected tasks list: {}", other);
                Err(SdkError::Protocol("tasks list is not an array".to_string()))
            }
        }
    }

    pub async fn move_task(&self, task_uid: TaskUid, to_queue: TaskQueue, direction: MoveDirection) -> Result<()> {
        self.send(Payload::MoveTask(MoveTask {
            task_uid,
            to_queue,
            direction,
        }))
        .await?;
        Ok(())
    }

    /// Runs a single query synchronously and returns the raw result data
    pub async fn one_request(&self, request: OneRequest) -> Result<Value> {
        self.send(Payload::OneRequest(request)).await
    }

    /// Runs a batch of queries synchronously and returns the raw result data
    pub async fn bulk_request(&self, request: BulkRequest) -> Result<Value> {
        self.send(Payload::BulkRequest(request)).await
    }

    /// Returns a one-time download link for the task's result file
    pub async fn get_task_result_file(&self, task_uid: TaskUid) -> Result<String> {
        let data = self
            .send(Payload::GetTaskResultsFile(TaskUidData { task_uid }))
            .await?;

        match &data {
            Value::String(url) => Ok(url.clone()),
            Value::Null => {
                log::error!("Expected a result file URL for task {}, got {}", task_uid, data);
                Err(SdkError::Protocol(format!(
                    "no result file for task {}",
                    task_uid
                )))
            }
            other => Ok(other.to_string()),
        }
    }

    /// Deletes the task's result file on the server
    pub async fn delete_task_result_file(&self, task_uid: TaskUid) -> Result<bool> {
        self.send(Payload::DeleteTaskResultsFile(TaskUidData { task_uid }))
            .await?;
        Ok(true)
    }

    /// Downloads a file by URL
    ///
    /// Any status other than 200 or 201 is a [`SdkError::Transport`], even
    /// though the request itself went through.
    ///
    /// # Arguments
    ///
    /// * `url` - Usually the one-time link from `get_task_result_file`
    ///
    /// # Returns
    ///
    /// The response body as text
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use aparser_sdk::scheduler::Client;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::new("http://127.0.0.1", "secret")?;
    /// let url = client.get_task_result_file(42).await?;
    /// let contents = client.load_file(&url).await?;
    /// println!("{}", contents);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load_file(&self, url: &str) -> Result<String> {
        let response = self.transport.get(url).await?;

        if !matches!(response.status, 200 | 201) {
            return Err(SdkError::Transport(format!(
                "Got error status code from A-Parser: {}",
                response.status
            )));
        }

        Ok(response.body)
    }

    /// Polls a task until it completes
    ///
    /// Returns the final status once the task is `completed`. A task ending in
    /// any status other than `work`, `starting` or `waitSlot` is deleted and
    /// reported as [`SdkError::TaskFailed`].
    ///
    /// Only time spent in `work` or `starting` counts toward `timeout`; queue
    /// wait (`waitSlot`) is free. The deadline is checked before each sleep
    /// against the time accumulated by earlier polls, so the first poll never
    /// times out and the actual wait can overrun by up to one interval. On
    /// timeout the task is deleted and [`SdkError::Timeout`] is returned.
    ///
    /// Dropping the future cancels polling without deleting the task.
    ///
    /// # Arguments
    ///
    /// * `task_uid` - The task to wait for
    /// * `poll_interval` - Delay between status checks
    /// * `timeout` - Maximum working time, `None` to wait forever
    ///
    /// # Returns
    ///
    /// The `completed` status snapshot
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use aparser_sdk::scheduler::Client;
    /// use std::time::Duration;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::new("http://127.0.0.1", "secret")?;
    /// let status = client
    ///     .wait_for_task(42, Duration::from_secs(1), Some(Duration::from_secs(60)))
    ///     .await?;
    /// println!("Done: {}", status);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn wait_for_task(
        &self,
        task_uid: TaskUid,
        poll_interval: Duration,
        timeout: Option<Duration>,
    ) -> Result<TaskStatus> {
        let mut elapsed = Duration::ZERO;

        loop {
            let status = self.get_task_state(task_uid).await?;

            if status.is_completed() {
                return Ok(status);
            }

            if !status.is_active() {
                log::warn!(
                    "Task {} finished with status {}, trying to delete...",
                    task_uid,
                    status.status
                );
                self.try_delete_task(task_uid).await;
                return Err(SdkError::TaskFailed {
                    task_uid,
                    status: status.status,
                });
            }

            if let Some(limit) = timeout {
                if elapsed > limit {
                    log::warn!("Timeout exceeded for task {}, trying to delete...", task_uid);
                    self.try_delete_task(task_uid).await;
                    return Err(SdkError::Timeout {
                        task_uid,
                        timeout: limit,
                    });
                }
            }

            sleep(poll_interval).await;

            if status.is_running() {
                elapsed += poll_interval;
            }
        }
    }

    /// Queues a task and waits for it to complete
    ///
    /// This is a convenience method that combines `add_task` and
    /// `wait_for_task`.
    pub async fn execute_task(
        &self,
        config: TaskConfig,
        poll_interval: Duration,
        timeout: Option<Duration>,
    ) -> Result<TaskUid> {
        let task_uid = self.add_task(config).await?;
        self.wait_for_task(task_uid, poll_interval, timeout).await?;
        Ok(task_uid)
    }

    /// Downloads the result file of a finished task
    pub async fn fetch_results(&self, task_uid: TaskUid) -> Result<String> {
        let url = self.get_task_result_file(task_uid).await?;
        self.load_file(&url).await
    }
}

/// Interprets response data as a task id, accepting numbers and numeric strings
fn coerce_task_uid(data: &Value) -> Result<TaskUid> {
    let parsed = match data {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole_f64_to_u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| {
        log::error!("Expected a task id, got {}", data);
        SdkError::Protocol(format!("expected a task id, got {}", data))
    })
}

/// `u64::MAX as f64` rounds up to 2^64, so the bound has to be exclusive
fn whole_f64_to_u64(f: f64) -> Option<u64> {
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}
