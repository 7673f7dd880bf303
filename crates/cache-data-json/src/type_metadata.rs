//! Restores `@type` on JSON produced by the native formatter.

use cache_data_types::{PortableField, PortableInstance, TYPE_METADATA_FIELD};
use serde_json::Value;

use crate::error::ConversionError;
use crate::JSON;

/// Adds `@type` to rendered JSON objects whose instance names a class.
///
/// Nested instances, including instances inside arrays, are patched too.
/// Objects that already carry `@type` are left alone.
#[derive(Debug, Clone, Default)]
pub struct TypeMetadataDecorator;

impl TypeMetadataDecorator {
    pub fn new() -> Self {
        Self
    }

    /// Parse `json`, patch it, and serialize it again.
    pub fn decorate_json(
        &self,
        instance: &PortableInstance,
        json: &str,
    ) -> Result<String, ConversionError> {
        let mut value: Value =
            serde_json::from_str(json).map_err(|e| ConversionError::failed(JSON, JSON, e))?;
        if !self.decorate(instance, &mut value) {
            return Ok(json.to_string());
        }
        serde_json::to_string_pretty(&value).map_err(|e| ConversionError::failed(JSON, JSON, e))
    }

    /// Patch `value` in place. Returns whether anything changed.
    pub fn decorate(&self, instance: &PortableInstance, value: &mut Value) -> bool {
        let Value::Object(map) = value else {
            return false;
        };

        let mut changed = false;
        if instance.has_class() && !map.contains_key(TYPE_METADATA_FIELD) {
            tracing::trace!("restoring {} on {}", TYPE_METADATA_FIELD, instance.class_name());
            map.insert(
                TYPE_METADATA_FIELD.to_string(),
                Value::String(instance.class_name().to_string()),
            );
            changed = true;
        }

        for (name, field) in instance.fields() {
            if let Some(nested) = map.get_mut(name) {
                changed |= self.decorate_field(field, nested);
            }
        }
        changed
    }

    fn decorate_field(&self, field: &PortableField, value: &mut Value) -> bool {
        match (field, value) {
            (PortableField::Instance(nested), value) => self.decorate(nested, value),
            (PortableField::Array(items), Value::Array(values)) => items
                .iter()
                .zip(values.iter_mut())
                .fold(false, |changed, (item, value)| {
                    self.decorate_field(item, value) | changed
                }),
            _ => false,
        }
    }
}
