//! Task lifecycle client for the A-Parser API

mod client;
mod proxy;
mod retry_client;

pub use client::Client;
pub use retry_client::RetryClient;
