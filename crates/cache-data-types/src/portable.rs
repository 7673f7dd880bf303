//! Portable instances: the grid's self-describing object representation.
//!
//! A [`PortableInstance`] carries a class name and a set of named fields and
//! can be moved between processes without the original Rust type being
//! available. Instances built by parsing JSON that has no `@type` get the
//! [`NO_CLASS_NAME`] sentinel.
//!
//! [`JsonFormatter`] is the grid's own JSON mapping. It reads `@type` and
//! `@identifier` into instance metadata and, like most native formatters,
//! writes only the data fields back out.

use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::key::CacheKey;
use crate::object::{object_fields, CacheObject};

/// Class name of instances that did not originate from a known type.
pub const NO_CLASS_NAME: &str = "__GRID_JSON";

/// Reserved JSON field holding the fully qualified type name.
pub const TYPE_METADATA_FIELD: &str = "@type";

/// Reserved JSON field holding the region key of an exported entry.
pub const IDENTIFIER_METADATA_FIELD: &str = "@identifier";

/// Field used as a key when an instance carries no identifier metadata.
const ID_FIELD: &str = "id";

/// A single field value of a portable instance.
#[derive(Debug, Clone, PartialEq)]
pub enum PortableField {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<PortableField>),
    Instance(PortableInstance),
    /// A value no portable field type can hold, kept in JSON form. Only
    /// instances wrapping a typed object carry these.
    Json(Value),
}

/// Self-describing, type-tagged object.
#[derive(Clone)]
pub struct PortableInstance {
    class_name: String,
    identifier: Option<CacheKey>,
    fields: BTreeMap<String, PortableField>,
    object: Option<Arc<dyn CacheObject>>,
}

impl PortableInstance {
    /// Create an empty instance of the given class.
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            identifier: None,
            fields: BTreeMap::new(),
            object: None,
        }
    }

    /// Create an empty instance with no associated class.
    pub fn generic() -> Self {
        Self::new(NO_CLASS_NAME)
    }

    /// Wrap a typed object, capturing its serialized fields.
    ///
    /// Payloads that are not plain JSON objects are stored under a single
    /// `value` field (see [`object_fields`]).
    pub fn from_object(object: Arc<dyn CacheObject>) -> Result<Self, FormatError> {
        let value = object.to_json_value().map_err(FormatError::Parse)?;
        let mut instance = PortableInstance::generic();
        for (name, value) in object_fields(value) {
            let field = JsonFormatter::field_from_value(&value).unwrap_or(PortableField::Json(value));
            instance.fields.insert(name, field);
        }
        instance.class_name = object.type_name().to_string();
        instance.object = Some(object);
        Ok(instance)
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Whether the instance names a concrete class (not blank, not the sentinel).
    pub fn has_class(&self) -> bool {
        !self.class_name.trim().is_empty() && self.class_name != NO_CLASS_NAME
    }

    pub fn field(&self, name: &str) -> Option<&PortableField> {
        self.fields.get(name)
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: PortableField) {
        self.fields.insert(name.into(), value);
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, PortableField> {
        &self.fields
    }

    pub fn identifier(&self) -> Option<&CacheKey> {
        self.identifier.as_ref()
    }

    pub fn set_identifier(&mut self, identifier: CacheKey) {
        self.identifier = Some(identifier);
    }

    /// Key under which this instance belongs in a region: the identifier
    /// metadata, else an integral or string `id` field.
    pub fn resolve_key(&self) -> Option<CacheKey> {
        if let Some(identifier) = &self.identifier {
            return Some(identifier.clone());
        }
        match self.fields.get(ID_FIELD) {
            Some(PortableField::Int(i)) => Some(CacheKey::Int(*i)),
            Some(PortableField::String(s)) => Some(CacheKey::Str(s.clone())),
            _ => None,
        }
    }

    /// The typed object this instance wraps, if it was built from one.
    pub fn object(&self) -> Option<&Arc<dyn CacheObject>> {
        self.object.as_ref()
    }
}

impl PartialEq for PortableInstance {
    fn eq(&self, other: &Self) -> bool {
        self.class_name == other.class_name
            && self.identifier == other.identifier
            && self.fields == other.fields
    }
}

impl fmt::Debug for PortableInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortableInstance")
            .field("class_name", &self.class_name)
            .field("identifier", &self.identifier)
            .field("fields", &self.fields)
            .field("wraps_object", &self.object.is_some())
            .finish()
    }
}

/// Errors from the native JSON mapping.
#[derive(Debug)]
pub enum FormatError {
    /// JSON could not be parsed or produced.
    Parse(serde_json::Error),
    /// The top-level JSON value is not an object.
    NotAnObject { shape: &'static str },
    /// `@type` is present but not a non-blank string.
    InvalidTypeMetadata,
    /// `@identifier` is present but not a string or integer.
    InvalidIdentifier,
    /// A number cannot be represented as a portable field.
    NumberOutOfRange(String),
    /// Arrays directly nested in arrays have no portable field type.
    NestedArray,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Parse(e) => write!(f, "invalid JSON: {}", e),
            FormatError::NotAnObject { shape } => {
                write!(f, "expected a JSON object but found {}", shape)
            }
            FormatError::InvalidTypeMetadata => {
                write!(f, "{} must be a non-blank string", TYPE_METADATA_FIELD)
            }
            FormatError::InvalidIdentifier => {
                write!(f, "{} must be a string or integer", IDENTIFIER_METADATA_FIELD)
            }
            FormatError::NumberOutOfRange(n) => {
                write!(f, "number {} cannot be stored in a portable field", n)
            }
            FormatError::NestedArray => write!(f, "nested arrays are not supported"),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

/// Name of a JSON value's shape, for diagnostics.
pub fn json_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The grid's native JSON <-> portable instance mapping.
pub struct JsonFormatter;

impl JsonFormatter {
    /// Parse JSON text into a portable instance.
    pub fn from_json(json: &str) -> Result<PortableInstance, FormatError> {
        let value: Value = serde_json::from_str(json).map_err(FormatError::Parse)?;
        Self::from_json_value(&value)
    }

    /// Convert a JSON object into a portable instance.
    pub fn from_json_value(value: &Value) -> Result<PortableInstance, FormatError> {
        match value {
            Value::Object(map) => Self::instance_from_map(map),
            other => Err(FormatError::NotAnObject {
                shape: json_shape(other),
            }),
        }
    }

    /// Render the instance's fields as JSON.
    ///
    /// The instance's own metadata is not written; nested instances keep
    /// their `@identifier`.
    pub fn to_json_value(instance: &PortableInstance) -> Value {
        let map: Map<String, Value> = instance
            .fields
            .iter()
            .map(|(name, field)| (name.clone(), Self::field_to_value(field)))
            .collect();
        Value::Object(map)
    }

    /// Render the instance's fields as pretty-printed JSON text.
    pub fn to_json(instance: &PortableInstance) -> String {
        // Serializing a `Value` cannot fail.
        serde_json::to_string_pretty(&Self::to_json_value(instance)).unwrap_or_default()
    }

    fn instance_from_map(map: &Map<String, Value>) -> Result<PortableInstance, FormatError> {
        let mut instance = PortableInstance::generic();
        for (name, value) in map {
            match name.as_str() {
                TYPE_METADATA_FIELD => match value {
                    Value::String(class_name) if !class_name.trim().is_empty() => {
                        instance.class_name = class_name.clone();
                    }
                    _ => return Err(FormatError::InvalidTypeMetadata),
                },
                IDENTIFIER_METADATA_FIELD => {
                    let key = CacheKey::from_json(value).ok_or(FormatError::InvalidIdentifier)?;
                    instance.identifier = Some(key);
                }
                _ => {
                    instance
                        .fields
                        .insert(name.clone(), Self::field_from_value(value)?);
                }
            }
        }
        Ok(instance)
    }

    fn field_from_value(value: &Value) -> Result<PortableField, FormatError> {
        Ok(match value {
            Value::Null => PortableField::Null,
            Value::Bool(b) => PortableField::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    PortableField::Int(i)
                } else if n.is_u64() {
                    return Err(FormatError::NumberOutOfRange(n.to_string()));
                } else {
                    let f = n
                        .as_f64()
                        .ok_or_else(|| FormatError::NumberOutOfRange(n.to_string()))?;
                    PortableField::Float(f)
                }
            }
            Value::String(s) => PortableField::String(s.clone()),
            Value::Array(items) => {
                if items.iter().any(Value::is_array) {
                    return Err(FormatError::NestedArray);
                }
                PortableField::Array(
                    items
                        .iter()
                        .map(Self::field_from_value)
                        .collect::<Result<_, _>>()?,
                )
            }
            Value::Object(map) => PortableField::Instance(Self::instance_from_map(map)?),
        })
    }

    fn field_to_value(field: &PortableField) -> Value {
        match field {
            PortableField::Null => Value::Null,
            PortableField::Bool(b) => Value::Bool(*b),
            PortableField::Int(i) => Value::from(*i),
            PortableField::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            PortableField::String(s) => Value::String(s.clone()),
            PortableField::Array(items) => {
                Value::Array(items.iter().map(Self::field_to_value).collect())
            }
            PortableField::Instance(nested) => {
                let mut value = Self::to_json_value(nested);
                if let (Value::Object(map), Some(identifier)) = (&mut value, nested.identifier()) {
                    map.insert(IDENTIFIER_METADATA_FIELD.to_string(), identifier.to_json());
                }
                value
            }
            PortableField::Json(value) => value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::SCALAR_VALUE_FIELD;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Debug, Serialize)]
    struct Point {
        x: i64,
        y: i64,
    }

    #[test]
    fn test_from_json_reads_metadata() {
        let instance = JsonFormatter::from_json(
            r#"{"@type":"app::Customer","@identifier":"c1","name":"Jon","age":42}"#,
        )
        .unwrap();
        assert_eq!(instance.class_name(), "app::Customer");
        assert!(instance.has_class());
        assert_eq!(instance.identifier(), Some(&CacheKey::from("c1")));
        assert_eq!(instance.field("age"), Some(&PortableField::Int(42)));
        assert!(!instance.has_field(TYPE_METADATA_FIELD));
        assert!(!instance.has_field(IDENTIFIER_METADATA_FIELD));
    }

    #[test]
    fn test_from_json_without_type_is_generic() {
        let instance = JsonFormatter::from_json(r#"{"a":[1,2.5,null],"b":{"c":true}}"#).unwrap();
        assert_eq!(instance.class_name(), NO_CLASS_NAME);
        assert!(!instance.has_class());
        assert_eq!(
            instance.field("a"),
            Some(&PortableField::Array(vec![
                PortableField::Int(1),
                PortableField::Float(2.5),
                PortableField::Null
            ]))
        );
        match instance.field("b") {
            Some(PortableField::Instance(nested)) => {
                assert_eq!(nested.field("c"), Some(&PortableField::Bool(true)))
            }
            other => panic!("expected nested instance, got {:?}", other),
        }
    }

    #[test]
    fn test_native_failures() {
        assert!(matches!(
            JsonFormatter::from_json("[1,2]"),
            Err(FormatError::NotAnObject { shape: "array" })
        ));
        assert!(matches!(
            JsonFormatter::from_json(r#"{"@type": 5}"#),
            Err(FormatError::InvalidTypeMetadata)
        ));
        assert!(matches!(
            JsonFormatter::from_json(r#"{"big": 18446744073709551615}"#),
            Err(FormatError::NumberOutOfRange(_))
        ));
        assert!(matches!(
            JsonFormatter::from_json(r#"{"grid": [[1, 2], [3, 4]]}"#),
            Err(FormatError::NestedArray)
        ));
        assert!(matches!(
            JsonFormatter::from_json("{not json"),
            Err(FormatError::Parse(_))
        ));
    }

    #[test]
    fn test_to_json_omits_metadata() {
        let instance =
            JsonFormatter::from_json(r#"{"@type":"app::Point","@identifier":1,"x":1,"y":2}"#)
                .unwrap();
        assert_eq!(JsonFormatter::to_json_value(&instance), json!({"x": 1, "y": 2}));
    }

    #[test]
    fn test_nested_identifier_survives_round_trip() {
        let source = json!({
            "@type": "app::Order",
            "@identifier": "o-1",
            "customer": {"@identifier": 7, "name": "Jon"},
            "lines": [{"@identifier": "l-1", "sku": "x"}]
        });
        let instance = JsonFormatter::from_json_value(&source).unwrap();
        assert_eq!(
            JsonFormatter::to_json_value(&instance),
            json!({
                "customer": {"@identifier": 7, "name": "Jon"},
                "lines": [{"@identifier": "l-1", "sku": "x"}]
            })
        );
    }

    #[test]
    fn test_from_object_wraps_struct_and_scalar() {
        let point = PortableInstance::from_object(Arc::new(Point { x: 3, y: 4 })).unwrap();
        assert!(point.class_name().ends_with("::Point"));
        assert_eq!(point.field("x"), Some(&PortableField::Int(3)));
        assert!(point.object().is_some());

        let big = PortableInstance::from_object(Arc::new(u64::MAX)).unwrap();
        assert_eq!(big.field(SCALAR_VALUE_FIELD), Some(&PortableField::Json(json!(u64::MAX))));

        let scalar = PortableInstance::from_object(Arc::new(9i64)).unwrap();
        assert_eq!(scalar.class_name(), "i64");
        assert_eq!(scalar.field(SCALAR_VALUE_FIELD), Some(&PortableField::Int(9)));
    }

    #[test]
    fn test_resolve_key() {
        let mut instance = JsonFormatter::from_json(r#"{"id": 12, "name": "x"}"#).unwrap();
        assert_eq!(instance.resolve_key(), Some(CacheKey::Int(12)));
        instance.set_identifier(CacheKey::from("override"));
        assert_eq!(instance.resolve_key(), Some(CacheKey::from("override")));

        let keyless = JsonFormatter::from_json(r#"{"name": "x"}"#).unwrap();
        assert_eq!(keyless.resolve_key(), None);
    }
}
