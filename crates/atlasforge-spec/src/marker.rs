//! Readiness marker document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Records whether the most recent atlas build is trustworthy for
/// incremental (missing-only) regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessMarker {
    /// True once a build has been promoted to production.
    pub production: bool,
    /// ISO-8601 UTC timestamp of the build that wrote the marker.
    pub generated_at: String,
    /// Descriptor of the input that produced the atlas.
    pub source: String,
}

impl ReadinessMarker {
    /// Create a production marker.
    pub fn production(generated_at: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            production: true,
            generated_at: generated_at.into(),
            source: source.into(),
        }
    }

    /// Serialize with 2-space indent and a trailing newline.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// Whether a marker document carries a truthy `production` field.
///
/// Any JSON value is accepted in `production`; `false`, `null`, `0`, `""`,
/// `[]` and `{}` are falsy. A document that is not a JSON object is not ready.
pub fn production_flag(json: &str) -> bool {
    let Ok(Value::Object(doc)) = serde_json::from_str::<Value>(json) else {
        return false;
    };
    doc.get("production").is_some_and(is_truthy)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
