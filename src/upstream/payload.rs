//! Shape classification of upstream responses.

use serde_json::Value;

/// A successfully transported upstream payload, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamPayload {
    /// A JSON array of records.
    Sequence(Vec<Value>),
    /// Anything else that is not an error marker (object, scalar, plain text).
    SingleObject(Value),
    /// An object carrying the upstream's own `status: "error"` marker.
    ApplicationError { message: String, raw: Value },
}

impl UpstreamPayload {
    /// Classify a decoded body.
    pub fn parse(value: Value) -> Self {
        if let Some(message) = error_marker(&value) {
            return Self::ApplicationError { message, raw: value };
        }
        match value {
            Value::Array(items) => Self::Sequence(items),
            other => Self::SingleObject(other),
        }
    }

    /// Decode raw body bytes. Non-JSON bodies become a JSON string.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::parse(decode_body(bytes))
    }

    /// Number of records: element count for sequences, otherwise 0.
    pub fn count(&self) -> usize {
        match self {
            Self::Sequence(items) => items.len(),
            _ => 0,
        }
    }

    /// Short label for logs.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Sequence(_) => "sequence",
            Self::SingleObject(_) => "object",
            Self::ApplicationError { .. } => "application_error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::ApplicationError { .. })
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Sequence(items) => Value::Array(items),
            Self::SingleObject(value) => value,
            Self::ApplicationError { raw, .. } => raw,
        }
    }
}

/// Message of an object carrying `status: "error"`, if `value` is one.
fn error_marker(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    if map.get("status").and_then(Value::as_str) != Some("error") {
        return None;
    }
    let message = ["msg", "message", "error"]
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string());
    Some(message)
}

/// Decode a body as JSON, falling back to its text. Empty bodies decode to
/// `Value::Null`.
pub fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sequence_counts_elements() {
        let payload = UpstreamPayload::parse(json!([{"id": 1}, {"id": 2}]));
        assert_eq!(payload.count(), 2);
        assert!(!payload.is_error());
    }

    #[test]
    fn test_object_counts_zero() {
        let payload = UpstreamPayload::parse(json!({"total": 12}));
        assert!(matches!(payload, UpstreamPayload::SingleObject(_)));
        assert_eq!(payload.count(), 0);
    }

    #[test]
    fn test_error_marker_detected() {
        let payload = UpstreamPayload::parse(json!({"status": "error", "msg": "bad token"}));
        match payload {
            UpstreamPayload::ApplicationError { message, .. } => assert_eq!(message, "bad token"),
            other => panic!("expected application error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_marker_without_message_uses_raw_body() {
        let payload = UpstreamPayload::parse(json!({"status": "error"}));
        match payload {
            UpstreamPayload::ApplicationError { message, .. } => {
                assert_eq!(message, r#"{"status":"error"}"#)
            }
            other => panic!("expected application error, got {:?}", other),
        }
    }

    #[test]
    fn test_other_status_values_are_data() {
        let payload = UpstreamPayload::parse(json!({"status": "ok", "data": []}));
        assert!(!payload.is_error());
    }

    #[test]
    fn test_plain_text_body() {
        let payload = UpstreamPayload::from_bytes(b"Access denied");
        assert_eq!(payload, UpstreamPayload::SingleObject(json!("Access denied")));
        assert_eq!(decode_body(b"  "), Value::Null);
    }
}
