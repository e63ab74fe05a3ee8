use serde_json::{Map, Value};

use crate::ValidationReport;

/// Result of interpreting one settled HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    Report(ValidationReport),
    Failure(String),
}

/// JSON type label reported when a 2xx body is not JSON at all.
pub const UNPARSABLE_BODY: &str = "unparsable";

/// Interpret a response body (already decoded to text) together with its status.
///
/// An unparsable body is treated as an empty object so that status based
/// branching still applies. On a 2xx it becomes an unrecognized report, never
/// a clean one.
pub fn interpret_response(status: u16, body: &str) -> ResponseOutcome {
    let Ok(payload) = serde_json::from_str::<Value>(body) else {
        if !is_success(status) {
            return ResponseOutcome::Failure(failure_message(status, &empty_object()));
        }
        return ResponseOutcome::Report(ValidationReport::Unrecognized {
            json_type: UNPARSABLE_BODY.to_string(),
        });
    };

    if !is_success(status) {
        return ResponseOutcome::Failure(failure_message(status, &payload));
    }

    ResponseOutcome::Report(ValidationReport::from_json(payload))
}

/// Failure text for a non-2xx reply: `error`, then `detail`, then a generic
/// `server error <status>`. Empty or non-string fields are skipped.
pub fn failure_message(status: u16, payload: &Value) -> String {
    ["error", "detail"]
        .iter()
        .find_map(|field| {
            payload
                .get(field)
                .and_then(Value::as_str)
                .filter(|message| !message.is_empty())
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| format!("server error {status}"))
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}
