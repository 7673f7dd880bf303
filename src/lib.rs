//! Region snapshot import/export for an in-memory data grid
//!
//! Serializes a region's entries to a JSON resource when the region is
//! destroyed, and repopulates an empty region from that resource when it is
//! created:
//!
//! - **Resolution**: per-region resource locations, by convention or from an
//!   override template (see [`resolver`] and [`expression`])
//! - **Gating**: enabled flags, active profiles and region selection (see [`gate`])
//! - **Orchestration**: resolve, read/write, convert, populate (see [`importer`])
//!
//! Byte I/O lives in `cache_data_resource`, the object/JSON/portable
//! converters in `cache_data_json`, and the region model in `cache_data_types`.
//!
//! ```no_run
//! use std::sync::Arc;
//! use cache_data::{CacheDataLifecycleListener, JsonCacheDataImporterExporter};
//! use cache_data_types::{Environment, InMemoryCache};
//!
//! let environment = Arc::new(Environment::from_process());
//! let importer = Arc::new(JsonCacheDataImporterExporter::new(Some(environment)));
//! let cache = InMemoryCache::new();
//! cache.add_listener(Arc::new(CacheDataLifecycleListener::new(importer)));
//! ```

pub mod config;
pub mod error;
pub mod expression;
pub mod gate;
pub mod importer;
pub mod resolver;

pub use error::ImportExportError;
pub use expression::{evaluate_template, Components, EvaluationContext, ExpressionError};
pub use gate::{is_export_enabled, is_import_enabled, ImportExportGate, RegionPredicate};
pub use importer::{CacheDataLifecycleListener, JsonCacheDataImporterExporter};
pub use resolver::{
    CacheResourceResolver, ExportResourceResolver, ImportResourceResolver, ResourceLocation,
};
