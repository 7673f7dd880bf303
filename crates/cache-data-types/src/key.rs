//! Region entry keys.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Key of a region entry.
///
/// Serialized untagged, so `1` and `"A"` are the JSON forms of
/// `CacheKey::Int(1)` and `CacheKey::Str("A")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheKey {
    Int(i64),
    Str(String),
}

impl CacheKey {
    /// Build a key from a JSON scalar. Objects, arrays, null, booleans and
    /// non-integral numbers do not make keys.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(CacheKey::Str(s.clone())),
            Value::Number(n) => n.as_i64().map(CacheKey::Int),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            CacheKey::Int(i) => Value::from(*i),
            CacheKey::Str(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Int(i) => write!(f, "{}", i),
            CacheKey::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for CacheKey {
    fn from(value: &str) -> Self {
        CacheKey::Str(value.to_string())
    }
}

impl From<String> for CacheKey {
    fn from(value: String) -> Self {
        CacheKey::Str(value)
    }
}

impl From<i64> for CacheKey {
    fn from(value: i64) -> Self {
        CacheKey::Int(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(CacheKey::from_json(&json!("A")), Some(CacheKey::from("A")));
        assert_eq!(CacheKey::from_json(&json!(42)), Some(CacheKey::Int(42)));
        assert_eq!(CacheKey::from_json(&json!(1.5)), None);
        assert_eq!(CacheKey::from_json(&json!({"id": 1})), None);
        assert_eq!(CacheKey::from_json(&Value::Null), None);
    }

    #[test]
    fn test_untagged_serde() {
        let keys = vec![CacheKey::Int(7), CacheKey::from("seven")];
        let json = serde_json::to_string(&keys).unwrap();
        assert_eq!(json, r#"[7,"seven"]"#);
        let back: Vec<CacheKey> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, keys);
    }
}
