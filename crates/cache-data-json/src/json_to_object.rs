//! JSON to typed object, driven by `@type`.

use std::sync::Arc;

use cache_data_types::portable::json_shape;
use cache_data_types::{CacheObject, TypeRegistry, IDENTIFIER_METADATA_FIELD, TYPE_METADATA_FIELD};
use serde_json::Value;

use crate::error::ConversionError;
use crate::JSON;

/// A parsed JSON node, or one already bound to a live object.
#[derive(Debug, Clone)]
pub enum JsonNode {
    Value(Value),
    /// Pass-through: the node already wraps the object it describes.
    Bound(Arc<dyn CacheObject>),
}

impl From<Value> for JsonNode {
    fn from(value: Value) -> Self {
        JsonNode::Value(value)
    }
}

/// Rebuilds objects of the type named by their `@type` field.
#[derive(Debug, Clone)]
pub struct JsonToObjectConverter {
    registry: Arc<TypeRegistry>,
}

impl JsonToObjectConverter {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Parse `json` and materialize the object it describes.
    pub fn convert(&self, json: &str) -> Result<Arc<dyn CacheObject>, ConversionError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ConversionError::failed(JSON, "Object", e))?;
        self.convert_value(value)
    }

    pub fn convert_node(&self, node: JsonNode) -> Result<Arc<dyn CacheObject>, ConversionError> {
        match node {
            JsonNode::Bound(object) => Ok(object),
            JsonNode::Value(value) => self.convert_value(value),
        }
    }

    /// Materialize a JSON object. `@identifier` is dropped before deserializing.
    pub fn convert_value(&self, value: Value) -> Result<Arc<dyn CacheObject>, ConversionError> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(ConversionError::UnexpectedJsonShape {
                    shape: json_shape(&other),
                })
            }
        };

        let type_name = match map.remove(TYPE_METADATA_FIELD) {
            Some(Value::String(type_name)) if !type_name.trim().is_empty() => type_name,
            _ => return Err(ConversionError::MissingTypeMetadata),
        };
        map.remove(IDENTIFIER_METADATA_FIELD);

        match self.registry.materialize(&type_name, Value::Object(map)) {
            None => Err(ConversionError::UnknownType { type_name }),
            Some(Err(e)) => Err(ConversionError::failed(JSON, type_name, e)),
            Some(Ok(object)) => {
                tracing::trace!("materialized {} from JSON", type_name);
                Ok(object)
            }
        }
    }
}
