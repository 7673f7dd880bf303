//! Region snapshot encoding built from the converters.

use std::sync::Arc;

use cache_data_types::{
    CacheKey, CacheObject, CacheValue, PortableInstance, TypeRegistry, IDENTIFIER_METADATA_FIELD,
};
use serde_json::Value;

use crate::error::ConversionError;
use crate::json_to_object::JsonToObjectConverter;
use crate::json_to_portable::{JsonArrayToPortableConverter, JsonToPortableConverter};
use crate::object_to_json::ObjectToJsonConverter;
use crate::portable_to_json::PortableToJsonConverter;
use crate::JSON;

/// Encodes region entries as a JSON array and decodes them back.
///
/// Each exported element carries `@type` and the entry key as `@identifier`.
#[derive(Debug)]
pub struct JsonCodec {
    registry: Arc<TypeRegistry>,
    objects_to_json: ObjectToJsonConverter,
    json_to_objects: JsonToObjectConverter,
    portables_to_json: PortableToJsonConverter,
    json_to_portables: JsonArrayToPortableConverter,
}

impl JsonCodec {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            objects_to_json: ObjectToJsonConverter::new(),
            json_to_objects: JsonToObjectConverter::new(Arc::clone(&registry)),
            portables_to_json: PortableToJsonConverter::new(),
            json_to_portables: JsonArrayToPortableConverter::new(JsonToPortableConverter::new(
                Arc::clone(&registry),
            )),
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// JSON form of one region value.
    pub fn value_to_json(&self, value: &CacheValue) -> Result<Value, ConversionError> {
        match value {
            CacheValue::Object(object) => self.objects_to_json.to_json_value(&**object),
            CacheValue::Portable(instance) => self.portables_to_json.to_json_value(instance),
        }
    }

    /// Encode entries as a pretty-printed JSON array, tagging each with its key.
    pub fn encode_entries(
        &self,
        entries: &[(CacheKey, CacheValue)],
    ) -> Result<Vec<u8>, ConversionError> {
        let mut elements = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let mut element = self.value_to_json(value)?;
            if let Value::Object(map) = &mut element {
                map.insert(IDENTIFIER_METADATA_FIELD.to_string(), key.to_json());
            }
            elements.push(element);
        }
        serde_json::to_vec_pretty(&Value::Array(elements))
            .map_err(|e| ConversionError::failed("Region", JSON, e))
    }

    /// Encode decoded instances again, keeping any identifier metadata.
    pub fn encode_instances(
        &self,
        instances: &[PortableInstance],
    ) -> Result<Vec<u8>, ConversionError> {
        let mut elements = Vec::with_capacity(instances.len());
        for instance in instances {
            let mut element = self.portables_to_json.to_json_value(instance)?;
            if let (Some(identifier), Value::Object(map)) = (instance.identifier(), &mut element) {
                map.insert(IDENTIFIER_METADATA_FIELD.to_string(), identifier.to_json());
            }
            elements.push(element);
        }
        serde_json::to_vec_pretty(&Value::Array(elements))
            .map_err(|e| ConversionError::failed("PortableInstance[]", JSON, e))
    }

    /// Decode a JSON array (or single object) document.
    pub fn decode_entries(&self, bytes: &[u8]) -> Result<Vec<PortableInstance>, ConversionError> {
        let json = std::str::from_utf8(bytes)
            .map_err(|e| ConversionError::failed("bytes", JSON, e))?;
        self.json_to_portables.convert(json)
    }

    /// The typed object behind an instance, materializing it when needed.
    pub fn to_object(
        &self,
        instance: &PortableInstance,
    ) -> Result<Arc<dyn CacheObject>, ConversionError> {
        if let Some(object) = instance.object() {
            return Ok(Arc::clone(object));
        }
        let value = self.portables_to_json.to_json_value(instance)?;
        self.json_to_objects.convert_value(value)
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new(Arc::new(TypeRegistry::with_defaults()))
    }
}
