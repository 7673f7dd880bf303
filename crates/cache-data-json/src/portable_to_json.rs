//! Portable instance to JSON.

use std::sync::Arc;

use cache_data_types::{CacheObject, JsonFormatter, PortableInstance};
use serde_json::Value;

use crate::error::ConversionError;
use crate::object_to_json::ObjectToJsonConverter;
use crate::type_metadata::TypeMetadataDecorator;
use crate::JSON;

/// Renders portable instances with the native formatter, then restores `@type`.
///
/// An instance that names no class but wraps a typed object is serialized
/// from that object instead.
#[derive(Debug, Clone, Default)]
pub struct PortableToJsonConverter {
    objects: ObjectToJsonConverter,
    decorator: TypeMetadataDecorator,
}

impl PortableToJsonConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn convert(&self, instance: &PortableInstance) -> Result<String, ConversionError> {
        if let Some(object) = self.untyped_object(instance) {
            return self.objects.convert(&**object);
        }
        let json = JsonFormatter::to_json(instance);
        self.decorator.decorate_json(instance, &json)
    }

    pub fn to_json_value(&self, instance: &PortableInstance) -> Result<Value, ConversionError> {
        if let Some(object) = self.untyped_object(instance) {
            return self.objects.to_json_value(&**object);
        }
        let mut value = JsonFormatter::to_json_value(instance);
        self.decorator.decorate(instance, &mut value);
        if !value.is_object() {
            return Err(ConversionError::failed(
                instance.class_name(),
                JSON,
                "native formatter produced a non-object",
            ));
        }
        Ok(value)
    }

    fn untyped_object<'a>(
        &self,
        instance: &'a PortableInstance,
    ) -> Option<&'a Arc<dyn CacheObject>> {
        if instance.has_class() {
            None
        } else {
            instance.object()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_to_portable::{JsonArrayToPortableConverter, JsonToPortableConverter};
    use cache_data_types::{TypeRegistry, TYPE_METADATA_FIELD};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Book {
        title: String,
        pages: u32,
        chapters: Vec<Vec<String>>,
    }

    #[test]
    fn test_object_backed_instance_always_has_type() {
        let book = Book {
            title: "Dune".to_string(),
            pages: 412,
            chapters: vec![vec!["Part One".to_string()]],
        };
        let instance = PortableInstance::from_object(Arc::new(book)).unwrap();

        let value = PortableToJsonConverter::new().to_json_value(&instance).unwrap();
        assert_eq!(value[TYPE_METADATA_FIELD], json!(std::any::type_name::<Book>()));
        assert_eq!(value["chapters"], json!([["Part One"]]));

        let text = PortableToJsonConverter::new().convert(&instance).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_generic_instance_has_no_type() {
        let instance = JsonFormatter::from_json(r#"{"name": "free", "n": 1}"#).unwrap();
        let value = PortableToJsonConverter::new().to_json_value(&instance).unwrap();
        assert_eq!(value, json!({"name": "free", "n": 1}));
    }

    #[test]
    fn test_array_round_trip_through_portable_form() {
        let mut registry = TypeRegistry::with_defaults();
        registry.register::<Book>();
        let arrays = JsonArrayToPortableConverter::new(JsonToPortableConverter::new(Arc::new(
            registry,
        )));

        let document = json!([
            {"@type": "i64", "value": 1},
            {"@type": "app::Customer", "name": "Jon", "address": {"@type": "app::Address", "city": "Portland"}},
            {
                "@type": std::any::type_name::<Book>(),
                "title": "Dune",
                "pages": 412,
                "chapters": [["a", "b"], ["c"]]
            }
        ]);
        let instances = arrays.convert(&document.to_string()).unwrap();
        let converter = PortableToJsonConverter::new();

        for (i, instance) in instances.iter().enumerate() {
            let value = converter.to_json_value(instance).unwrap();
            assert_eq!(value, document[i], "element {}", i);
        }
    }
}
