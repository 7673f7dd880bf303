//! JSON to portable instances.
//!
//! Single objects go through a chain of stages. The grid's native mapping
//! runs first; when it reports [`ConversionError::NativeUnsupported`] the
//! next stage materializes the typed object named by `@type` and wraps it.
//! Any other error ends the chain.

use std::sync::Arc;

use cache_data_types::portable::json_shape;
use cache_data_types::{
    CacheKey, JsonFormatter, PortableInstance, TypeRegistry, IDENTIFIER_METADATA_FIELD,
    TYPE_METADATA_FIELD,
};
use serde_json::Value;

use crate::error::ConversionError;
use crate::json_to_object::JsonToObjectConverter;
use crate::JSON;

const PORTABLE: &str = "PortableInstance";

/// One way of turning a JSON value into a portable instance.
pub trait JsonToPortableStage: Send + Sync {
    fn name(&self) -> &'static str;

    fn can_handle(&self, value: &Value) -> bool;

    fn convert(&self, value: &Value) -> Result<PortableInstance, ConversionError>;
}

/// The grid's own JSON mapping.
#[derive(Debug, Clone, Default)]
pub struct NativeJsonToPortableStage;

impl JsonToPortableStage for NativeJsonToPortableStage {
    fn name(&self) -> &'static str {
        "native"
    }

    fn can_handle(&self, value: &Value) -> bool {
        value.is_object()
    }

    fn convert(&self, value: &Value) -> Result<PortableInstance, ConversionError> {
        JsonFormatter::from_json_value(value)
            .map_err(|reason| ConversionError::NativeUnsupported { reason })
    }
}

/// Materializes the typed object named by `@type` and wraps it.
#[derive(Debug, Clone)]
pub struct ObjectJsonToPortableStage {
    objects: JsonToObjectConverter,
}

impl ObjectJsonToPortableStage {
    pub fn new(objects: JsonToObjectConverter) -> Self {
        Self { objects }
    }
}

impl JsonToPortableStage for ObjectJsonToPortableStage {
    fn name(&self) -> &'static str {
        "object"
    }

    fn can_handle(&self, value: &Value) -> bool {
        matches!(value.get(TYPE_METADATA_FIELD), Some(Value::String(_)))
    }

    fn convert(&self, value: &Value) -> Result<PortableInstance, ConversionError> {
        let object = self.objects.convert_value(value.clone())?;
        let type_name = object.type_name();
        let mut instance = PortableInstance::from_object(object)
            .map_err(|e| ConversionError::failed(type_name, PORTABLE, e))?;

        if let Some(identifier) = value.get(IDENTIFIER_METADATA_FIELD) {
            let key = CacheKey::from_json(identifier).ok_or_else(|| {
                ConversionError::failed(
                    JSON,
                    PORTABLE,
                    format!("{} must be a string or integer", IDENTIFIER_METADATA_FIELD),
                )
            })?;
            instance.set_identifier(key);
        }
        Ok(instance)
    }
}

/// Converts a single JSON object into a portable instance.
pub struct JsonToPortableConverter {
    stages: Vec<Box<dyn JsonToPortableStage>>,
}

impl JsonToPortableConverter {
    /// Native mapping first, typed-object fallback second.
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_stages(vec![
            Box::new(NativeJsonToPortableStage),
            Box::new(ObjectJsonToPortableStage::new(JsonToObjectConverter::new(
                registry,
            ))),
        ])
    }

    pub fn with_stages(stages: Vec<Box<dyn JsonToPortableStage>>) -> Self {
        Self { stages }
    }

    pub fn convert(&self, json: &str) -> Result<PortableInstance, ConversionError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ConversionError::failed(JSON, PORTABLE, e))?;
        self.convert_value(&value)
    }

    pub fn convert_value(&self, value: &Value) -> Result<PortableInstance, ConversionError> {
        let mut last_error = None;
        for stage in self.stages.iter().filter(|stage| stage.can_handle(value)) {
            match stage.convert(value) {
                Ok(instance) => return Ok(instance),
                Err(ConversionError::NativeUnsupported { reason }) => {
                    tracing::debug!("{} JSON stage declined: {}", stage.name(), reason);
                    last_error = Some(ConversionError::NativeUnsupported { reason });
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_error.unwrap_or(ConversionError::UnexpectedJsonShape {
            shape: json_shape(value),
        }))
    }
}

impl std::fmt::Debug for JsonToPortableConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.stages.iter().map(|stage| stage.name()).collect();
        f.debug_struct("JsonToPortableConverter")
            .field("stages", &names)
            .finish()
    }
}

/// Converts a JSON document holding an array of objects, or one bare object.
#[derive(Debug)]
pub struct JsonArrayToPortableConverter {
    single: JsonToPortableConverter,
}

impl JsonArrayToPortableConverter {
    pub fn new(single: JsonToPortableConverter) -> Self {
        Self { single }
    }

    pub fn convert(&self, json: &str) -> Result<Vec<PortableInstance>, ConversionError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ConversionError::failed(JSON, "PortableInstance[]", e))?;
        self.convert_value(&value)
    }

    pub fn convert_value(&self, value: &Value) -> Result<Vec<PortableInstance>, ConversionError> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| self.single.convert_value(item))
                .collect(),
            Value::Object(_) => Ok(vec![self.single.convert_value(value)?]),
            other => Err(ConversionError::UnexpectedJsonShape {
                shape: json_shape(other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cache_data_types::{PortableField, NO_CLASS_NAME, SCALAR_VALUE_FIELD};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Matrix {
        label: String,
        cells: Vec<Vec<i64>>,
    }

    fn registry() -> Arc<TypeRegistry> {
        let mut registry = TypeRegistry::with_defaults();
        registry.register::<Matrix>();
        Arc::new(registry)
    }

    fn array_converter() -> JsonArrayToPortableConverter {
        JsonArrayToPortableConverter::new(JsonToPortableConverter::new(registry()))
    }

    #[test]
    fn test_native_path_keeps_class_and_identifier() {
        let instance = JsonToPortableConverter::new(registry())
            .convert(r#"{"@type":"app::Customer","@identifier":"c1","name":"Jon"}"#)
            .unwrap();
        assert_eq!(instance.class_name(), "app::Customer");
        assert_eq!(instance.identifier(), Some(&CacheKey::from("c1")));
        assert!(instance.object().is_none());
    }

    #[test]
    fn test_falls_back_to_typed_object() {
        let json = format!(
            r#"{{"@type":"{}","@identifier":7,"label":"id","cells":[[1,0],[0,1]]}}"#,
            std::any::type_name::<Matrix>()
        );
        let instance = JsonToPortableConverter::new(registry()).convert(&json).unwrap();

        assert_eq!(instance.class_name(), std::any::type_name::<Matrix>());
        assert_eq!(instance.identifier(), Some(&CacheKey::Int(7)));
        let matrix = instance
            .object()
            .and_then(|object| object.downcast_ref::<Matrix>())
            .unwrap();
        assert_eq!(matrix.cells, vec![vec![1, 0], vec![0, 1]]);
    }

    #[test]
    fn test_fallback_handles_out_of_range_scalar() {
        let instance = JsonToPortableConverter::new(registry())
            .convert(r#"{"@type":"u64","value":18446744073709551615}"#)
            .unwrap();
        assert_eq!(
            instance.object().and_then(|o| o.downcast_ref::<u64>()),
            Some(&u64::MAX)
        );
        assert!(matches!(
            instance.field(SCALAR_VALUE_FIELD),
            Some(PortableField::Json(_))
        ));
    }

    #[test]
    fn test_native_failure_without_type_is_reported() {
        let err = JsonToPortableConverter::new(registry())
            .convert(r#"{"grid":[[1]]}"#)
            .unwrap_err();
        assert!(matches!(err, ConversionError::NativeUnsupported { .. }));
    }

    #[test]
    fn test_fallback_errors_are_not_swallowed() {
        let err = JsonToPortableConverter::new(registry())
            .convert(r#"{"@type":"app::Unknown","grid":[[1]]}"#)
            .unwrap_err();
        assert!(matches!(err, ConversionError::UnknownType { .. }));
    }

    #[test]
    fn test_array_and_bare_object() {
        let converter = array_converter();
        let many = converter
            .convert(r#"[{"@type":"i64","value":1},{"name":"free"}]"#)
            .unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[0].class_name(), "i64");
        assert_eq!(many[1].class_name(), NO_CLASS_NAME);

        let one = converter.convert(r#"{"@type":"i64","value":2}"#).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].field(SCALAR_VALUE_FIELD), Some(&PortableField::Int(2)));

        assert!(converter.convert("[]").unwrap().is_empty());
    }

    #[test]
    fn test_array_rejects_other_shapes() {
        let converter = array_converter();
        for (json, expected) in [("42", "number"), ("\"text\"", "string"), ("null", "null")] {
            match converter.convert(json) {
                Err(ConversionError::UnexpectedJsonShape { shape }) => assert_eq!(shape, expected),
                other => panic!("expected UnexpectedJsonShape for {}, got {:?}", json, other),
            }
        }
        assert!(matches!(
            converter.convert("[1, 2"),
            Err(ConversionError::Failed { .. })
        ));
    }
}
