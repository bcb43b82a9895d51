//! # A-Parser Rust SDK
//!
//! Async client for the [A-Parser](https://a-parser.com) HTTP API. It submits
//! parsing tasks, follows them through the remote queue and fetches their
//! result files.
//!
//! ## Features
//!
//! - **Task lifecycle**: add, inspect, pause/stop/delete tasks and wait for them
//! - **Cleanup on failure**: failed or timed-out tasks are deleted before the error is returned
//! - **Validated payloads**: malformed requests are rejected before they are sent
//! - **Proxy checkers**: toggle proxy checkers on and off
//! - **Retry Logic**: opt-in retries for read-only queries
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aparser_sdk::protocol::TaskConfig;
//! use aparser_sdk::scheduler::Client;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("http://127.0.0.1", "secret")?;
//!
//!     let config = TaskConfig::new(vec![vec!["SE::Google".into()]], "rust\nserde");
//!     let task_uid = client.add_task(config).await?;
//!
//!     client
//!         .wait_for_task(task_uid, Duration::from_secs(1), Some(Duration::from_secs(300)))
//!         .await?;
//!
//!     let results = client.fetch_results(task_uid).await?;
//!     println!("{}", results);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod protocol;
pub mod scheduler;
pub mod transport;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{Result, SdkError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Result, SdkError};
    pub use crate::protocol::{TaskChangeStatus, TaskConfig, TaskStatus, TaskUid};
    pub use crate::scheduler::{Client, RetryClient};
    pub use serde_json::{json, Value};
}
