//! Task status snapshots and state transition requests

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Task has been accepted and is starting up
pub const TASK_STATUS_STARTING: &str = "starting";
/// Task is queued, waiting for a free slot
pub const TASK_STATUS_WAIT_SLOT: &str = "waitSlot";
/// Task is running
pub const TASK_STATUS_WORK: &str = "work";
/// Task finished successfully
pub const TASK_STATUS_COMPLETED: &str = "completed";

/// Snapshot returned by `getTaskState`
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TaskStatus {
    pub status: String,
    #[serde(default)]
    pub stats: Value,
    pub state: StatusState,
}

impl TaskStatus {
    pub fn is_completed(&self) -> bool {
        self.status == TASK_STATUS_COMPLETED
    }

    /// Queued or running; anything else besides `completed` is a failure
    pub fn is_active(&self) -> bool {
        matches!(
            self.status.as_str(),
            TASK_STATUS_WORK | TASK_STATUS_STARTING | TASK_STATUS_WAIT_SLOT
        )
    }

    /// Running, as opposed to waiting in the queue
    pub fn is_running(&self) -> bool {
        matches!(self.status.as_str(), TASK_STATUS_WORK | TASK_STATUS_STARTING)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}/{} queries, {} results)",
            self.status,
            self.state.queries_done_count,
            self.state.queries_count,
            self.state.results_count
        )
    }
}

/// Counters attached to a [`TaskStatus`]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusState {
    pub total_fail: i64,
    #[serde(default)]
    pub total_wait_proxy_threads: Option<i64>,
    pub minimized: i64,
    pub queries_done_count: i64,
    pub avg_speed: i64,
    #[serde(default)]
    pub active_threads: Option<Counter>,
    pub start_time: i64,
    pub change_time: i64,
    pub queries_count: i64,
    pub log_exists: i64,
    #[serde(default)]
    pub run_time: Option<i64>,
    #[serde(default)]
    pub unique_results_count: Option<Counter>,
    pub requests: i64,
    pub add_time: i64,
    pub additional_count: i64,
    #[serde(default)]
    pub queries_done_count_at_start: Option<i64>,
    pub last_query: String,
    pub cur_speed: i64,
    pub started: i64,
    pub results_count: i64,
}

/// A counter the service reports either as a number or as the literal `"none"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Value(i64),
    None,
}

impl Serialize for Counter {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Counter::Value(v) => s.serialize_i64(*v),
            Counter::None => s.serialize_str("none"),
        }
    }
}

impl<'de> Deserialize<'de> for Counter {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        use serde::de::{Error, Unexpected};

        match Value::deserialize(d)? {
            Value::Number(n) => n
                .as_i64()
                .map(Counter::Value)
                .ok_or_else(|| D::Error::custom(format!("counter out of range: {}", n))),
            Value::String(s) if s == "none" => Ok(Counter::None),
            Value::String(s) => Err(D::Error::invalid_value(Unexpected::Str(&s), &"an integer or \"none\"")),
            other => Err(D::Error::custom(format!("expected an integer or \"none\", got {}", other))),
        }
    }
}

/// Transitions a task can be asked to make via `changeTaskStatus`
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskChangeStatus {
    Starting,
    Pausing,
    Stopping,
    Deleting,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn status_json(status: &str) -> Value {
        json!({
            "status": status,
            "stats": {"success": 0},
            "state": {
                "totalFail": 0,
                "minimized": 0,
                "queriesDoneCount": 3,
                "avgSpeed": 12,
                "activeThreads": "none",
                "startTime": 1700000000,
                "changeTime": 1700000005,
                "queriesCount": 10,
                "logExists": 0,
                "uniqueResultsCount": 4,
                "requests": 3,
                "addTime": 1699999990,
                "additionalCount": 0,
                "lastQuery": "rust",
                "curSpeed": 10,
                "started": 1,
                "resultsCount": 4
            }
        })
    }

    #[test]
    fn test_task_status_deserialization() {
        let status: TaskStatus = serde_json::from_value(status_json("work")).unwrap();
        assert_eq!(status.status, "work");
        assert_eq!(status.state.active_threads, Some(Counter::None));
        assert_eq!(status.state.unique_results_count, Some(Counter::Value(4)));
        assert_eq!(status.state.run_time, None);
        assert_eq!(status.state.last_query, "rust");
        assert!(status.is_running());
        assert_eq!(status.to_string(), "work (3/10 queries, 4 results)");
    }

    #[test]
    fn test_status_classification() {
        let parse = |s: &str| -> TaskStatus { serde_json::from_value(status_json(s)).unwrap() };

        assert!(parse("completed").is_completed());
        assert!(parse("waitSlot").is_active());
        assert!(!parse("waitSlot").is_running());
        assert!(parse("starting").is_running());
        assert!(!parse("error").is_active());
        assert!(!parse("error").is_completed());
    }

    #[test]
    fn test_counter_rejects_other_strings() {
        let result = serde_json::from_value::<Counter>(json!("many"));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_state_is_rejected() {
        let result = serde_json::from_value::<TaskStatus>(json!({"status": "work"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_task_change_status_serialization() {
        assert_eq!(serde_json::to_value(TaskChangeStatus::Deleting).unwrap(), json!("deleting"));
        assert_eq!(serde_json::to_value(TaskChangeStatus::Pausing).unwrap(), json!("pausing"));
    }
}
