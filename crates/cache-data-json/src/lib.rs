//! Conversions between typed objects, JSON and portable instances.
//!
//! ## Converters
//!
//! - [`ObjectToJsonConverter`] - typed object to JSON, adding `@type`
//! - [`JsonToObjectConverter`] - JSON back to the type named by `@type`
//! - [`JsonToPortableConverter`] - one JSON object to a portable instance,
//!   trying the grid's native mapping first and the typed-object path second
//! - [`JsonArrayToPortableConverter`] - a JSON array (or single object) to portable instances
//! - [`PortableToJsonConverter`] - portable instance to JSON, patched by the
//!   [`TypeMetadataDecorator`] so `@type` is never lost
//!
//! [`JsonCodec`] wires all of them around one [`TypeRegistry`](cache_data_types::TypeRegistry).
//!
//! Any JSON object leaving these converters for a value of a concrete type
//! carries `@type`; free-form grid JSON may omit it.

pub mod codec;
pub mod error;
pub mod json_to_object;
pub mod json_to_portable;
pub mod object_to_json;
pub mod portable_to_json;
pub mod type_metadata;

pub use codec::JsonCodec;
pub use error::ConversionError;
pub use json_to_object::{JsonNode, JsonToObjectConverter};
pub use json_to_portable::{
    JsonArrayToPortableConverter, JsonToPortableConverter, JsonToPortableStage,
    NativeJsonToPortableStage, ObjectJsonToPortableStage,
};
pub use object_to_json::ObjectToJsonConverter;
pub use portable_to_json::PortableToJsonConverter;
pub use type_metadata::TypeMetadataDecorator;

/// Shape name used in errors when the source is JSON text.
pub(crate) const JSON: &str = "JSON";
