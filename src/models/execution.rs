//! Execution models observed from the test runner
//!
//! Defines cursors, execution records and assertion outcomes as they arrive
//! on the runner's event stream.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::debug;

/// Identity of one request execution within a run
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Cursor {
    /// Stable id of the request position, shared across iterations
    #[serde(rename = "ref")]
    pub reference: String,

    /// Iteration index (0-based)
    #[serde(default)]
    pub iteration: u32,

    /// Id of the script that produced the event
    #[serde(rename = "scriptId", default)]
    pub script_id: String,
}

impl Cursor {
    pub fn new(reference: impl Into<String>, iteration: u32) -> Self {
        Self {
            reference: reference.into(),
            iteration,
            script_id: String::new(),
        }
    }

    pub fn with_script_id(mut self, script_id: impl Into<String>) -> Self {
        self.script_id = script_id.into();
        self
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.reference, self.iteration)
    }
}

/// Owning suite of a request, resolved when the record is ingested
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ParentInfo {
    pub id: String,

    /// Names of the folder chain joined with `/`
    #[serde(rename = "fullName", default)]
    pub full_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParentInfo {
    pub fn new(id: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request descriptor together with its parent chain
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ItemInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent: ParentInfo,
}

impl ItemInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent: ParentInfo) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent,
        }
    }

    /// Short `{id, name}` view used by side-channel records
    pub fn reference(&self) -> ItemRef {
        ItemRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ItemRef {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Header {
    pub key: String,
    pub value: String,
}

/// Request as sent by the runner
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RequestInfo {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Response as received by the runner
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResponseInfo {
    pub code: u16,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub headers: Vec<Header>,

    /// Response time in milliseconds
    #[serde(rename = "responseTime", default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,

    /// Response size in bytes
    #[serde(rename = "responseSize", default, skip_serializing_if = "Option::is_none")]
    pub response_size: Option<u64>,

    /// Raw body bytes
    #[serde(
        default,
        deserialize_with = "deserialize_stream",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<StreamForm>")]
    pub stream: Option<Vec<u8>>,
}

/// Shapes the runner uses for a raw body
#[derive(Deserialize, JsonSchema)]
#[serde(untagged)]
enum StreamForm {
    Bytes(Vec<u8>),
    /// `{"type": "Buffer", "data": [...]}`
    Buffer { data: Vec<u8> },
}

impl From<StreamForm> for Vec<u8> {
    fn from(form: StreamForm) -> Self {
        match form {
            StreamForm::Bytes(bytes) | StreamForm::Buffer { data: bytes } => bytes,
        }
    }
}

/// Accept either body shape; anything else leaves the body undecoded
fn deserialize_stream<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };

    match serde_json::from_value::<StreamForm>(value) {
        Ok(form) => Ok(Some(form.into())),
        Err(e) => {
            debug!("Ignoring unrecognized response stream: {}", e);
            Ok(None)
        }
    }
}

impl ResponseInfo {
    pub fn new(code: u16, status: impl Into<String>) -> Self {
        Self {
            code,
            status: status.into(),
            ..Default::default()
        }
    }

    pub fn with_time(mut self, ms: f64) -> Self {
        self.response_time = Some(ms);
        self
    }

    pub fn with_size(mut self, bytes: u64) -> Self {
        self.response_size = Some(bytes);
        self
    }

    pub fn with_stream(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.stream = Some(bytes.into());
        self
    }
}

/// Transport-level failure of a request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RequestError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

/// Error attached to a failed assertion
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssertionError {
    #[serde(default = "default_error_name")]
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,
}

fn default_error_name() -> String {
    "AssertionError".to_string()
}

impl AssertionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            name: default_error_name(),
            message: message.into(),
            test: None,
        }
    }
}

/// How one assertion outcome is counted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Passed,
    Failed,
    Skipped,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Passed => write!(f, "PASS"),
            Verdict::Failed => write!(f, "FAIL"),
            Verdict::Skipped => write!(f, "SKIP"),
        }
    }
}

/// A single assertion judgment attached to an execution
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssertionOutcome {
    pub assertion: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<AssertionError>,

    /// Tri-state: the runner may omit the flag entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<bool>,
}

impl AssertionOutcome {
    pub fn passed(name: impl Into<String>) -> Self {
        Self {
            assertion: name.into(),
            error: None,
            skipped: Some(false),
        }
    }

    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            assertion: name.into(),
            error: Some(AssertionError::new(message)),
            skipped: Some(false),
        }
    }

    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            assertion: name.into(),
            error: None,
            skipped: Some(true),
        }
    }

    /// Classify the outcome.
    ///
    /// Skipped wins over an attached error. An outcome with no error and no
    /// `skipped` flag at all is not counted anywhere and yields `None`.
    pub fn verdict(&self) -> Option<Verdict> {
        match (self.error.is_some(), self.skipped) {
            (_, Some(true)) => Some(Verdict::Skipped),
            (true, _) => Some(Verdict::Failed),
            (false, Some(false)) => Some(Verdict::Passed),
            (false, None) => None,
        }
    }
}

/// One observed request/response cycle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExecutionRecord {
    pub cursor: Cursor,
    pub item: ItemInfo,
    #[serde(default)]
    pub request: RequestInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseInfo>,
    #[serde(rename = "requestError", default, skip_serializing_if = "Option::is_none")]
    pub request_error: Option<RequestError>,
    #[serde(default)]
    pub assertions: Vec<AssertionOutcome>,
}

impl ExecutionRecord {
    pub fn new(cursor: Cursor, item: ItemInfo) -> Self {
        Self {
            cursor,
            item,
            request: RequestInfo::default(),
            response: None,
            request_error: None,
            assertions: Vec::new(),
        }
    }

    pub fn with_request(mut self, request: RequestInfo) -> Self {
        self.request = request;
        self
    }

    pub fn with_response(mut self, response: ResponseInfo) -> Self {
        self.response = Some(response);
        self
    }

    pub fn with_request_error(mut self, error: RequestError) -> Self {
        self.request_error = Some(error);
        self
    }

    pub fn with_assertion(mut self, outcome: AssertionOutcome) -> Self {
        self.assertions.push(outcome);
        self
    }

    /// Response time sample, 0 when the runner recorded none
    pub fn time_sample(&self) -> f64 {
        self.response
            .as_ref()
            .and_then(|r| r.response_time)
            .unwrap_or(0.0)
    }

    /// Response size sample, 0 when the runner recorded none
    pub fn size_sample(&self) -> f64 {
        self.response
            .as_ref()
            .and_then(|r| r.response_size)
            .unwrap_or(0) as f64
    }
}

/// Payload of an `assertion` event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AssertionEvent {
    pub cursor: Cursor,
    pub assertion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<AssertionError>,
    pub item: ItemRef,
}

/// Payload of a `console` event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConsoleEvent {
    pub cursor: Cursor,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub messages: Vec<serde_json::Value>,
}

fn default_level() -> String {
    "log".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_classification() {
        assert_eq!(AssertionOutcome::passed("a").verdict(), Some(Verdict::Passed));
        assert_eq!(
            AssertionOutcome::failed("a", "boom").verdict(),
            Some(Verdict::Failed)
        );
        assert_eq!(AssertionOutcome::skipped("a").verdict(), Some(Verdict::Skipped));
    }

    #[test]
    fn test_skipped_with_error_is_skipped() {
        let outcome = AssertionOutcome {
            assertion: "a".to_string(),
            error: Some(AssertionError::new("ignored")),
            skipped: Some(true),
        };
        assert_eq!(outcome.verdict(), Some(Verdict::Skipped));
    }

    #[test]
    fn test_error_without_flag_is_failed() {
        let outcome = AssertionOutcome {
            assertion: "a".to_string(),
            error: Some(AssertionError::new("boom")),
            skipped: None,
        };
        assert_eq!(outcome.verdict(), Some(Verdict::Failed));
    }

    // Known gap: no error and no flag is counted nowhere.
    #[test]
    fn test_missing_flag_is_unclassified() {
        let outcome = AssertionOutcome {
            assertion: "a".to_string(),
            error: None,
            skipped: None,
        };
        assert_eq!(outcome.verdict(), None);
    }

    #[test]
    fn test_cursor_deserialize() {
        let cursor: Cursor =
            serde_json::from_str(r#"{"ref":"r1","iteration":2,"scriptId":"s"}"#).unwrap();
        assert_eq!(cursor.reference, "r1");
        assert_eq!(cursor.iteration, 2);
        assert_eq!(cursor.script_id, "s");
        assert_eq!(cursor.to_string(), "r1#2");
    }

    #[test]
    fn test_stream_accepts_byte_array() {
        let response: ResponseInfo =
            serde_json::from_str(r#"{"code":200,"stream":[91,93]}"#).unwrap();
        assert_eq!(response.stream.as_deref(), Some(&b"[]"[..]));
    }

    #[test]
    fn test_stream_accepts_buffer_object() {
        let response: ResponseInfo =
            serde_json::from_str(r#"{"code":200,"stream":{"type":"Buffer","data":[91,93]}}"#)
                .unwrap();
        assert_eq!(response.stream.as_deref(), Some(&b"[]"[..]));
    }

    #[test]
    fn test_unrecognized_stream_keeps_response() {
        let response: ResponseInfo =
            serde_json::from_str(r#"{"code":204,"stream":"not bytes"}"#).unwrap();
        assert_eq!(response.code, 204);
        assert!(response.stream.is_none());

        let response: ResponseInfo =
            serde_json::from_str(r#"{"code":204,"stream":null}"#).unwrap();
        assert!(response.stream.is_none());
    }

    #[test]
    fn test_samples_default_to_zero() {
        let record = ExecutionRecord::new(
            Cursor::new("r1", 0),
            ItemInfo::new("i1", "Get", ParentInfo::new("p1", "Suite")),
        );
        assert_eq!(record.time_sample(), 0.0);
        assert_eq!(record.size_sample(), 0.0);

        let record = record.with_response(ResponseInfo::new(200, "OK").with_time(42.0).with_size(7));
        assert_eq!(record.time_sample(), 42.0);
        assert_eq!(record.size_sample(), 7.0);
    }
}
