//! Shared types for the cache-data workspace.
//!
//! This crate models the parts of the cache runtime that the import/export
//! pipeline consumes, so the other crates never depend on a concrete grid:
//!
//! - [`Region`] / [`InMemoryRegion`] - named key/value containers
//! - [`InMemoryCache`] / [`RegionLifecycleListener`] - region create/destroy notifications
//! - [`PortableInstance`] / [`JsonFormatter`] - the grid's self-describing object form
//! - [`CacheObject`] / [`TypeRegistry`] - typed values and type-name lookup
//! - [`Environment`] - property and profile snapshot used for configuration

pub mod cache;
pub mod env_utils;
pub mod environment;
pub mod key;
pub mod object;
pub mod portable;
pub mod region;

pub use cache::{InMemoryCache, RegionLifecycleListener};
pub use environment::Environment;
pub use key::CacheKey;
pub use object::{object_fields, CacheObject, TypeRegistry, SCALAR_VALUE_FIELD};
pub use portable::{
    FormatError, JsonFormatter, PortableField, PortableInstance, IDENTIFIER_METADATA_FIELD,
    NO_CLASS_NAME, TYPE_METADATA_FIELD,
};
pub use region::{CacheValue, InMemoryRegion, Region, REGION_SEPARATOR};
