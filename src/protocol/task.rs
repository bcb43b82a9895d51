//! Request payloads: job configuration and the smaller per-action shapes

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use crate::error::{Result, SdkError};
use super::status::TaskChangeStatus;

/// Numeric identifier the service assigns to a task
pub type TaskUid = u64;

/// `"yes"`/`"no"` switches used throughout the job configuration
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

/// One element of a parser row: a name (parser, preset) or an option override
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ParserEntry {
    Name(String),
    Override(OverrideOption),
}

impl From<&str> for ParserEntry {
    fn from(s: &str) -> Self {
        ParserEntry::Name(s.to_string())
    }
}

impl From<String> for ParserEntry {
    fn from(s: String) -> Self {
        ParserEntry::Name(s)
    }
}

impl From<OverrideOption> for ParserEntry {
    fn from(o: OverrideOption) -> Self {
        ParserEntry::Override(o)
    }
}

/// Value of an overridden parser option
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum OptionValue {
    Int(i64),
    Bool(bool),
    Str(String),
}

/// Overrides a single option of a parser preset
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct OverrideOption {
    #[serde(rename = "type", default = "default_override_type")]
    pub kind: String,
    pub id: String,
    pub value: OptionValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional: Option<Value>,
}

fn default_override_type() -> String {
    "override".to_string()
}

impl OverrideOption {
    pub fn new(id: impl Into<String>, value: OptionValue) -> Self {
        Self {
            kind: default_override_type(),
            id: id.into(),
            value,
            additional: None,
        }
    }

    pub fn with_additional(mut self, additional: Value) -> Self {
        self.additional = Some(additional);
        self
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct IteratorOptions {
    pub on_all_levels: bool,
    pub query_builders_after_iterator: bool,
    pub query_builders_on_all_levels: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ResultsOptions {
    pub overwrite: bool,
    #[serde(rename = "writeBOM")]
    pub write_bom: bool,
}

/// Job configuration submitted with `addTask`
///
/// Only `parsers` and `queries` have no sensible default:
///
/// ```rust
/// use aparser_sdk::protocol::TaskConfig;
///
/// let config = TaskConfig {
///     prio: 3,
///     ..TaskConfig::new(vec![vec!["SE::Google".into()]], "rust\nserde")
/// };
/// assert_eq!(config.preset, "default");
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskConfig {
    pub preset: String,
    pub config_preset: String,
    pub parsers: Vec<Vec<ParserEntry>>,
    pub results_format: String,
    pub results_save_to: String,
    pub results_file_name: String,
    pub additional_formats: Vec<String>,
    pub results_unique: YesNo,
    pub queries_from: String,
    pub query_format: Vec<String>,
    pub unique_queries: bool,
    pub save_failed_queries: bool,
    pub iterator_options: IteratorOptions,
    pub results_options: ResultsOptions,
    pub do_log: YesNo,
    pub limit_logs_count: String,
    pub keep_unique: YesNo,
    pub more_options: bool,
    pub results_prepend: String,
    pub results_append: String,
    pub query_builders: Vec<String>,
    pub results_builders: Vec<String>,
    pub config_overrides: Vec<String>,
    pub run_task_on_complete: Option<TaskUid>,
    pub use_results_file_as_queries_file: bool,
    pub run_task_on_complete_config: String,
    #[serde(rename = "toolsJS")]
    pub tools_js: String,
    pub prio: u8,
    pub remove_on_complete: bool,
    #[serde(rename = "callURLOnComplete")]
    pub call_url_on_complete: String,
    pub stop_on_error: bool,
    pub queries: String,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            preset: "default".to_string(),
            config_preset: "default".to_string(),
            parsers: Vec::new(),
            results_format: "$p1.preset".to_string(),
            results_save_to: "file".to_string(),
            results_file_name: "$datefile.format().txt".to_string(),
            additional_formats: Vec::new(),
            results_unique: YesNo::No,
            queries_from: "text".to_string(),
            query_format: vec!["$query".to_string()],
            unique_queries: false,
            save_failed_queries: false,
            iterator_options: IteratorOptions::default(),
            results_options: ResultsOptions::default(),
            do_log: YesNo::No,
            limit_logs_count: "0".to_string(),
            keep_unique: YesNo::No,
            more_options: false,
            results_prepend: String::new(),
            results_append: String::new(),
            query_builders: Vec::new(),
            results_builders: Vec::new(),
            config_overrides: Vec::new(),
            run_task_on_complete: None,
            use_results_file_as_queries_file: false,
            run_task_on_complete_config: "default".to_string(),
            tools_js: String::new(),
            prio: 5,
            remove_on_complete: false,
            call_url_on_complete: String::new(),
            stop_on_error: false,
            queries: String::new(),
        }
    }
}

impl TaskConfig {
    /// Creates a configuration with service defaults for everything but parsers and queries
    pub fn new(parsers: Vec<Vec<ParserEntry>>, queries: impl Into<String>) -> Self {
        Self {
            parsers,
            queries: queries.into(),
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.parsers.is_empty() {
            return Err(SdkError::InvalidRequest("at least one parser is required".to_string()));
        }
        for (i, row) in self.parsers.iter().enumerate() {
            match row.first() {
                Some(ParserEntry::Name(name)) if !name.is_empty() => {}
                Some(_) => {
                    return Err(SdkError::InvalidRequest(format!(
                        "parser row {} must start with a parser name",
                        i
                    )))
                }
                None => {
                    return Err(SdkError::InvalidRequest(format!("parser row {} is empty", i)))
                }
            }
        }
        if self.query_format.is_empty() {
            return Err(SdkError::InvalidRequest("queryFormat must not be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskUidData {
    pub task_uid: TaskUid,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToStatus {
    pub task_uid: TaskUid,
    pub to_status: TaskChangeStatus,
}

/// Turns a proxy checker on or off
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ProxyCheckerState {
    pub checker: String,
    #[serde(rename = "state", serialize_with = "bool_as_int")]
    pub enabled: bool,
}

impl ProxyCheckerState {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.checker.trim().is_empty() {
            return Err(SdkError::InvalidRequest("proxy checker name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Filter for `getTasksList`
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TasksListFilter {
    #[serde(serialize_with = "bool_as_int")]
    pub completed: bool,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskQueue {
    Active,
    Completed,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Start,
    End,
    Up,
    Down,
}

/// Reorders a task within a queue
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoveTask {
    pub task_uid: TaskUid,
    pub to_queue: TaskQueue,
    pub direction: MoveDirection,
}

/// Single query run synchronously by one parser
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OneRequest {
    pub parser: String,
    pub preset: String,
    pub config_preset: String,
    pub query: String,
    pub options: Vec<OverrideOption>,
    #[serde(serialize_with = "bool_as_int")]
    pub raw_results: bool,
    #[serde(serialize_with = "bool_as_int")]
    pub do_log: bool,
}

impl OneRequest {
    pub fn new(parser: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            parser: parser.into(),
            preset: "default".to_string(),
            config_preset: "default".to_string(),
            query: query.into(),
            options: Vec::new(),
            raw_results: false,
            do_log: false,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.parser.is_empty() {
            return Err(SdkError::InvalidRequest("parser must not be empty".to_string()));
        }
        if self.query.is_empty() {
            return Err(SdkError::InvalidRequest("query must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Batch of queries run synchronously by one parser
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkRequest {
    pub parser: String,
    pub preset: String,
    pub config_preset: String,
    pub threads: u32,
    pub queries: Vec<String>,
    pub options: Vec<OverrideOption>,
    #[serde(serialize_with = "bool_as_int")]
    pub raw_results: bool,
    #[serde(serialize_with = "bool_as_int")]
    pub do_log: bool,
}

impl BulkRequest {
    pub fn new(parser: impl Into<String>, queries: Vec<String>) -> Self {
        Self {
            parser: parser.into(),
            preset: "default".to_string(),
            config_preset: "default".to_string(),
            threads: 5,
            queries,
            options: Vec::new(),
            raw_results: false,
            do_log: false,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.parser.is_empty() {
            return Err(SdkError::InvalidRequest("parser must not be empty".to_string()));
        }
        if self.queries.is_empty() {
            return Err(SdkError::InvalidRequest("at least one query is required".to_string()));
        }
        if self.threads == 0 {
            return Err(SdkError::InvalidRequest("threads must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn bool_as_int<S: Serializer>(value: &bool, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u8(u8::from(*value))
}
