use serde_json::{Map, Value};

/// The named fields a form is expected to carry. Every field is optional;
/// the form decides what it sends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<String>,
}

impl FormFields {
    /// Pick the known fields out of a raw mapping. Older forms post
    /// `customer_name` / `customer_email`, which fill in for `name` / `email`.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            name: text(map, "name").or_else(|| text(map, "customer_name")),
            email: text(map, "email").or_else(|| text(map, "customer_email")),
            phone: text(map, "phone"),
            message: text(map, "message"),
            timestamp: text(map, "timestamp"),
        }
    }
}

/// Nulls and empty strings count as absent. Other scalars keep their JSON text.
fn text(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
