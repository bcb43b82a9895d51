//! Request/response envelope shared by every A-Parser API call
//!
//! Requests are `{password, action, data?}` objects where the shape of `data`
//! is fixed by `action`. Responses are `{success, data?}`; anything other than
//! `success == 1` is a failure no matter what HTTP status carried it.

mod status;
mod task;

pub use status::{
    Counter, StatusState, TaskChangeStatus, TaskStatus, TASK_STATUS_COMPLETED,
    TASK_STATUS_STARTING, TASK_STATUS_WAIT_SLOT, TASK_STATUS_WORK,
};
pub use task::{
    BulkRequest, IteratorOptions, MoveDirection, MoveTask, OneRequest, OptionValue,
    OverrideOption, ParserEntry, ProxyCheckerState, ResultsOptions, TaskConfig, TaskQueue,
    TaskUid, TaskUidData, TasksListFilter, ToStatus, YesNo,
};

#[cfg(test)]
pub(crate) use status::tests::status_json;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use crate::error::{Result, SdkError};

/// API action names
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Ping,
    OneRequest,
    BulkRequest,
    AddTask,
    GetTaskState,
    GetTaskResultsFile,
    DeleteTaskResultsFile,
    GetTasksList,
    ChangeTaskStatus,
    MoveTask,
    ChangeProxyCheckerState,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Ping => "ping",
            Action::OneRequest => "oneRequest",
            Action::BulkRequest => "bulkRequest",
            Action::AddTask => "addTask",
            Action::GetTaskState => "getTaskState",
            Action::GetTaskResultsFile => "getTaskResultsFile",
            Action::DeleteTaskResultsFile => "deleteTaskResultsFile",
            Action::GetTasksList => "getTasksList",
            Action::ChangeTaskStatus => "changeTaskStatus",
            Action::MoveTask => "moveTask",
            Action::ChangeProxyCheckerState => "changeProxyCheckerState",
        };
        f.write_str(name)
    }
}

/// Action together with the data it requires
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Ping,
    OneRequest(OneRequest),
    BulkRequest(BulkRequest),
    AddTask(TaskConfig),
    GetTaskState(TaskUidData),
    GetTaskResultsFile(TaskUidData),
    DeleteTaskResultsFile(TaskUidData),
    GetTasksList(TasksListFilter),
    ChangeTaskStatus(ToStatus),
    MoveTask(MoveTask),
    ChangeProxyCheckerState(ProxyCheckerState),
}

impl Payload {
    pub fn action(&self) -> Action {
        match self {
            Payload::Ping => Action::Ping,
            Payload::OneRequest(_) => Action::OneRequest,
            Payload::BulkRequest(_) => Action::BulkRequest,
            Payload::AddTask(_) => Action::AddTask,
            Payload::GetTaskState(_) => Action::GetTaskState,
            Payload::GetTaskResultsFile(_) => Action::GetTaskResultsFile,
            Payload::DeleteTaskResultsFile(_) => Action::DeleteTaskResultsFile,
            Payload::GetTasksList(_) => Action::GetTasksList,
            Payload::ChangeTaskStatus(_) => Action::ChangeTaskStatus,
            Payload::MoveTask(_) => Action::MoveTask,
            Payload::ChangeProxyCheckerState(_) => Action::ChangeProxyCheckerState,
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Payload::OneRequest(req) => req.validate(),
            Payload::BulkRequest(req) => req.validate(),
            Payload::AddTask(config) => config.validate(),
            Payload::ChangeProxyCheckerState(state) => state.validate(),
            Payload::Ping
            | Payload::GetTaskState(_)
            | Payload::GetTaskResultsFile(_)
            | Payload::DeleteTaskResultsFile(_)
            | Payload::GetTasksList(_)
            | Payload::ChangeTaskStatus(_)
            | Payload::MoveTask(_) => Ok(()),
        }
    }
}

/// Validated request envelope, ready to be encoded
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    password: String,
    payload: Payload,
}

impl Request {
    /// Builds a request, rejecting malformed payloads before they reach the wire
    pub fn new(password: impl Into<String>, payload: Payload) -> Result<Self> {
        payload.validate()?;
        Ok(Self {
            password: password.into(),
            payload,
        })
    }

    pub fn action(&self) -> Action {
        self.payload.action()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Serializes the envelope to the JSON body that gets posted
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for Request {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("password", &self.password)?;
        map.serialize_entry("action", &self.action())?;
        match &self.payload {
            Payload::Ping => {}
            Payload::OneRequest(data) => map.serialize_entry("data", data)?,
            Payload::BulkRequest(data) => map.serialize_entry("data", data)?,
            Payload::AddTask(data) => map.serialize_entry("data", data)?,
            Payload::GetTaskState(data) => map.serialize_entry("data", data)?,
            Payload::GetTaskResultsFile(data) => map.serialize_entry("data", data)?,
            Payload::DeleteTaskResultsFile(data) => map.serialize_entry("data", data)?,
            Payload::GetTasksList(data) => map.serialize_entry("data", data)?,
            Payload::ChangeTaskStatus(data) => map.serialize_entry("data", data)?,
            Payload::MoveTask(data) => map.serialize_entry("data", data)?,
            Payload::ChangeProxyCheckerState(data) => map.serialize_entry("data", data)?,
        }
        map.end()
    }
}

/// Raw response envelope
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Response {
    pub success: i64,
    #[serde(default)]
    pub data: Value,
}

/// Parses a response body and returns its `data` field untouched
///
/// Fails with [`SdkError::Protocol`] if the body is not JSON, lacks `success`,
/// or reports `success != 1`.
pub fn decode_response(body: &str) -> Result<Value> {
    let response: Response = serde_json::from_str(body).map_err(|e| {
        log::error!("Malformed response from A-Parser: {}", body);
        SdkError::Protocol(format!("malformed response: {}", e))
    })?;

    if response.success != 1 {
        log::error!("A-Parser request failed: {}", body);
        return Err(SdkError::Protocol(format!(
            "request not successful (success = {})",
            response.success
        )));
    }

    Ok(response.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encoded(payload: Payload) -> Value {
        let body = Request::new("secret", payload).unwrap().encode().unwrap();
        serde_json::from_str(&body).unwrap()
    }

    #[test]
    fn test_ping_has_no_data() {
        assert_eq!(encoded(Payload::Ping), json!({"password": "secret", "action": "ping"}));
    }

    #[test]
    fn test_change_task_status_envelope() {
        let value = encoded(Payload::ChangeTaskStatus(ToStatus {
            task_uid: 12,
            to_status: TaskChangeStatus::Deleting,
        }));
        assert_eq!(
            value,
            json!({
                "password": "secret",
                "action": "changeTaskStatus",
                "data": {"taskUid": 12, "toStatus": "deleting"}
            })
        );
    }

    #[test]
    fn test_action_names_match_wire_format() {
        let cases = [
            (Action::GetTaskResultsFile, "getTaskResultsFile"),
            (Action::DeleteTaskResultsFile, "deleteTaskResultsFile"),
            (Action::ChangeProxyCheckerState, "changeProxyCheckerState"),
            (Action::OneRequest, "oneRequest"),
            (Action::GetTasksList, "getTasksList"),
        ];
        for (action, name) in cases {
            assert_eq!(serde_json::to_value(action).unwrap(), json!(name));
            assert_eq!(action.to_string(), name);
        }
    }

    #[test]
    fn test_add_task_envelope_carries_config() {
        let config = TaskConfig::new(vec![vec!["SE::Google".into()]], "rust");
        let value = encoded(Payload::AddTask(config));
        assert_eq!(value["action"], "addTask");
        assert_eq!(value["data"]["queries"], "rust");
        assert_eq!(value["data"]["parsers"], json!([["SE::Google"]]));
    }

    #[test]
    fn test_invalid_payload_rejected_before_encoding() {
        let result = Request::new("secret", Payload::AddTask(TaskConfig::new(vec![], "q")));
        assert!(matches!(result, Err(SdkError::InvalidRequest(_))));

        let result = Request::new(
            "secret",
            Payload::ChangeProxyCheckerState(ProxyCheckerState { checker: String::new(), enabled: true }),
        );
        assert!(matches!(result, Err(SdkError::InvalidRequest(_))));
    }

    #[test]
    fn test_decode_response_returns_data_verbatim() {
        let data = decode_response(r#"{"success": 1, "data": {"nested": [1, "two", null]}}"#).unwrap();
        assert_eq!(data, json!({"nested": [1, "two", null]}));

        let data = decode_response(r#"{"success": 1}"#).unwrap();
        assert_eq!(data, Value::Null);
    }

    #[test]
    fn test_decode_response_failures() {
        assert!(decode_response(r#"{"success": 0, "msg": "bad password"}"#).unwrap_err().is_protocol());
        assert!(decode_response(r#"{"success": 2, "data": 1}"#).unwrap_err().is_protocol());
        assert!(decode_response("<html>oops</html>").unwrap_err().is_protocol());
        assert!(decode_response(r#"{"data": 1}"#).unwrap_err().is_protocol());
    }
}
