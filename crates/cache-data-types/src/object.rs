//! Typed cache values and type-name lookup.
//!
//! A [`CacheObject`] is any serde-serializable value stored in a region. Its
//! type name (`std::any::type_name`) is the identity written to the `@type`
//! metadata field; the [`TypeRegistry`] maps such names back to a
//! deserializer so a JSON document can be turned into the same Rust type.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Field holding the payload of a value whose serialized form is not a JSON
/// object (numbers, strings, sequences), e.g. `{"@type":"i64","value":1}`.
pub const SCALAR_VALUE_FIELD: &str = "value";

/// Field map of a serialized object.
///
/// Non-object values, and objects that are exactly `{"value": ..}`, are
/// wrapped in a single [`SCALAR_VALUE_FIELD`] so that a wrapped payload is
/// never mistaken for an object that merely has a `value` field.
pub fn object_fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) if !is_wrapped(&map) => map,
        other => {
            let mut map = Map::new();
            map.insert(SCALAR_VALUE_FIELD.to_string(), other);
            map
        }
    }
}

fn is_wrapped(map: &Map<String, Value>) -> bool {
    map.len() == 1 && map.contains_key(SCALAR_VALUE_FIELD)
}

/// A value that can live in a region and be serialized to JSON.
pub trait CacheObject: Debug + Send + Sync + 'static {
    /// Fully qualified type name of the value.
    fn type_name(&self) -> &'static str;

    /// Serialize the value to a JSON tree.
    fn to_json_value(&self) -> serde_json::Result<Value>;

    fn as_any(&self) -> &dyn Any;
}

impl<T> CacheObject for T
where
    T: Serialize + Debug + Send + Sync + 'static,
{
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn to_json_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn CacheObject {
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

type Materializer = fn(Value) -> serde_json::Result<Arc<dyn CacheObject>>;

/// Registry of types that can be reconstructed from JSON by name.
#[derive(Clone)]
pub struct TypeRegistry {
    types: HashMap<String, Materializer>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Create a registry with the scalar types, `String` and free-form JSON registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register::<bool>()
            .register::<i8>()
            .register::<i16>()
            .register::<i32>()
            .register::<i64>()
            .register::<u8>()
            .register::<u16>()
            .register::<u32>()
            .register::<u64>()
            .register::<f32>()
            .register::<f64>()
            .register::<String>()
            .register::<Value>();
        registry
    }

    /// Register `T` under its own type name.
    pub fn register<T>(&mut self) -> &mut Self
    where
        T: DeserializeOwned + Serialize + Debug + Send + Sync + 'static,
    {
        self.register_as::<T>(std::any::type_name::<T>())
    }

    /// Register `T` under an additional name, e.g. a type name written by
    /// another producer of the same snapshot format.
    pub fn register_as<T>(&mut self, type_name: &str) -> &mut Self
    where
        T: DeserializeOwned + Serialize + Debug + Send + Sync + 'static,
    {
        self.types
            .insert(type_name.to_string(), materialize::<T> as Materializer);
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Deserialize `value` into the type registered as `type_name`.
    ///
    /// Returns `None` when no such type is registered.
    pub fn materialize(
        &self,
        type_name: &str,
        value: Value,
    ) -> Option<serde_json::Result<Arc<dyn CacheObject>>> {
        self.types.get(type_name).map(|materializer| materializer(value))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("TypeRegistry").field("types", &names).finish()
    }
}

fn materialize<T>(value: Value) -> serde_json::Result<Arc<dyn CacheObject>>
where
    T: DeserializeOwned + Serialize + Debug + Send + Sync + 'static,
{
    if let Value::Object(map) = &value {
        if is_wrapped(map) {
            if let Some(inner) = map.get(SCALAR_VALUE_FIELD) {
                if let Ok(object) = serde_json::from_value::<T>(inner.clone()) {
                    return Ok(Arc::new(object));
                }
            }
        }
    }
    Ok(Arc::new(serde_json::from_value::<T>(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Customer {
        id: i64,
        name: String,
    }

    #[test]
    fn test_type_name_is_fully_qualified() {
        let customer = Customer {
            id: 1,
            name: "Jon Doe".to_string(),
        };
        assert!(customer.type_name().ends_with("::Customer"));
        assert_eq!(1i64.type_name(), "i64");
        assert_eq!("x".to_string().type_name(), "alloc::string::String");
    }

    #[test]
    fn test_materialize_struct() {
        let mut registry = TypeRegistry::new();
        registry.register::<Customer>();
        let name = std::any::type_name::<Customer>();

        let object = registry
            .materialize(name, json!({"id": 2, "name": "Jane"}))
            .expect("registered")
            .expect("deserializes");
        assert_eq!(
            object.downcast_ref::<Customer>(),
            Some(&Customer {
                id: 2,
                name: "Jane".to_string()
            })
        );
    }

    #[test]
    fn test_materialize_wrapped_scalar() {
        let registry = TypeRegistry::with_defaults();
        let object = registry
            .materialize("i64", json!({"value": 42}))
            .unwrap()
            .unwrap();
        assert_eq!(object.downcast_ref::<i64>(), Some(&42));

        let object = registry
            .materialize("alloc::string::String", json!({"value": "abc"}))
            .unwrap()
            .unwrap();
        assert_eq!(object.downcast_ref::<String>().map(String::as_str), Some("abc"));
    }

    #[test]
    fn test_unknown_type_and_alias() {
        let mut registry = TypeRegistry::new();
        assert!(registry.materialize("java.lang.Integer", json!(1)).is_none());

        registry.register_as::<i32>("java.lang.Integer");
        assert!(registry.contains("java.lang.Integer"));
        let object = registry
            .materialize("java.lang.Integer", json!({"value": 7}))
            .unwrap()
            .unwrap();
        assert_eq!(object.downcast_ref::<i32>(), Some(&7));
    }

    #[test]
    fn test_object_fields_wraps_ambiguous_payloads() {
        assert_eq!(object_fields(json!(5)), json!({"value": 5}).as_object().cloned().unwrap());
        assert_eq!(
            object_fields(json!({"value": 5})),
            json!({"value": {"value": 5}}).as_object().cloned().unwrap()
        );
        assert_eq!(
            object_fields(json!({"value": 5, "unit": "kg"})),
            json!({"value": 5, "unit": "kg"}).as_object().cloned().unwrap()
        );
    }

    #[test]
    fn test_materialize_free_form_json() {
        let registry = TypeRegistry::with_defaults();
        let name = std::any::type_name::<Value>();
        for original in [json!(5), json!([1, [2, 3]]), json!({"value": 5}), json!({"a": 1})] {
            let wrapped = Value::Object(object_fields(original.clone()));
            let object = registry.materialize(name, wrapped).unwrap().unwrap();
            assert_eq!(object.downcast_ref::<Value>(), Some(&original));
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Measure {
        value: i64,
    }

    #[test]
    fn test_materialize_struct_with_value_field() {
        let mut registry = TypeRegistry::new();
        registry.register::<Measure>();
        let name = std::any::type_name::<Measure>();

        let wrapped = Value::Object(object_fields(json!({"value": 3})));
        let object = registry.materialize(name, wrapped).unwrap().unwrap();
        assert_eq!(object.downcast_ref::<Measure>(), Some(&Measure { value: 3 }));

        let flat = registry.materialize(name, json!({"value": 4})).unwrap().unwrap();
        assert_eq!(flat.downcast_ref::<Measure>(), Some(&Measure { value: 4 }));
    }

    #[test]
    fn test_materialize_type_mismatch_is_error() {
        let registry = TypeRegistry::with_defaults();
        let result = registry.materialize("bool", json!({"value": "not a bool"})).unwrap();
        assert!(result.is_err());
    }
}
