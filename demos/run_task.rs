//! Runs one task end to end against the instance configured in the environment
//!
//! APARSER_ADDRESS=http://127.0.0.1 APARSER_PASSWORD=secret cargo run --example run_task -- "rust async"

use aparser_sdk::prelude::*;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let queries = std::env::args().skip(1).collect::<Vec<_>>().join("\n");
    if queries.is_empty() {
        anyhow::bail!("pass at least one query");
    }

    let client = Client::from_config(Config::from_env()?)?;
    println!("Ping: {}", client.ping().await?);

    let config = TaskConfig::new(vec![vec!["SE::Google".into()]], queries);
    let task_uid = client.add_task(config).await?;
    println!("Task submitted with ID: {}", task_uid);

    match client
        .wait_for_task(task_uid, Duration::from_secs(2), Some(Duration::from_secs(600)))
        .await
    {
        Ok(status) => println!("Finished: {}", status),
        Err(SdkError::Timeout { .. }) => anyhow::bail!("task {} took too long and was deleted", task_uid),
        Err(e) => return Err(e.into()),
    }

    let results = client.fetch_results(task_uid).await?;
    println!("{}", results);

    client.delete_task_result_file(task_uid).await?;
    Ok(())
}
