//! Typed object to JSON.

use cache_data_types::{object_fields, CacheObject, TYPE_METADATA_FIELD};
use serde_json::Value;

use crate::error::ConversionError;
use crate::JSON;

/// Serializes objects to pretty-printed JSON carrying `@type`.
///
/// Fields come out sorted by name (`serde_json::Map` is key-ordered).
#[derive(Debug, Clone, Default)]
pub struct ObjectToJsonConverter;

impl ObjectToJsonConverter {
    pub fn new() -> Self {
        Self
    }

    pub fn convert(&self, object: &dyn CacheObject) -> Result<String, ConversionError> {
        let value = self.to_json_value(object)?;
        serde_json::to_string_pretty(&value)
            .map_err(|e| ConversionError::failed(object.type_name(), JSON, e))
    }

    /// Serialize to a JSON object tree with `@type` set.
    pub fn to_json_value(&self, object: &dyn CacheObject) -> Result<Value, ConversionError> {
        let value = object
            .to_json_value()
            .map_err(|e| ConversionError::failed(object.type_name(), JSON, e))?;

        let mut map = object_fields(value);
        map.insert(
            TYPE_METADATA_FIELD.to_string(),
            Value::String(object.type_name().to_string()),
        );
        Ok(Value::Object(map))
    }
}
