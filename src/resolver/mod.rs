//! Per-region resource resolution.
//!
//! Both policies compute a location the same way: a configured override
//! template, evaluated against the region, wins; otherwise the location is
//! the policy's resource path joined with the region's resource name. The
//! location is recomputed on every call.
//!
//! - [`ExportResourceResolver`]: `file://{cwd}/{region}.json`, tolerant of
//!   targets that do not exist yet
//! - [`ImportResourceResolver`]: `classpath:{region}.json`, requires an
//!   existing, readable resource

mod export;
mod import;

pub use export::ExportResourceResolver;
pub use import::ImportResourceResolver;

use std::sync::Arc;

use cache_data_resource::{
    LoaderResourceResolver, Resource, ResourceLoader, ResourceResolver,
};
use cache_data_types::{Environment, Region};

use crate::config;
use crate::error::ImportExportError;
use crate::expression::{evaluate_template, Components, EvaluationContext};

/// Resolves the snapshot resource for a region.
pub trait CacheResourceResolver: Send + Sync {
    /// The resource for `region`, or `None` when no usable resource was
    /// found and the caller should skip the operation.
    fn resolve(&self, region: &dyn Region) -> Result<Option<Arc<dyn Resource>>, ImportExportError>;
}

/// Location computation shared by the export and import policies.
#[derive(Clone)]
pub struct ResourceLocation {
    environment: Option<Arc<Environment>>,
    components: Arc<Components>,
    override_property: &'static str,
    resource_path: String,
}

impl ResourceLocation {
    pub fn new(
        environment: Option<Arc<Environment>>,
        override_property: &'static str,
        resource_path: impl Into<String>,
    ) -> Self {
        Self {
            environment,
            components: Arc::new(Components::new()),
            override_property,
            resource_path: resource_path.into(),
        }
    }

    pub fn with_components(mut self, components: Arc<Components>) -> Self {
        self.components = components;
        self
    }

    pub fn with_resource_path(mut self, resource_path: impl Into<String>) -> Self {
        self.resource_path = resource_path.into();
        self
    }

    pub fn environment(&self) -> Option<&Arc<Environment>> {
        self.environment.as_ref()
    }

    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    /// The location string for `region`. Never blank.
    pub fn location(&self, region: &dyn Region) -> Result<String, ImportExportError> {
        if let Some(environment) = &self.environment {
            if let Some(template) = environment.non_blank_property(self.override_property) {
                let context = EvaluationContext::new(region, environment, &self.components);
                let location = evaluate_template(template, &context).map_err(|source| {
                    ImportExportError::Expression {
                        template: template.to_string(),
                        source,
                    }
                })?;
                if location.trim().is_empty() {
                    return Err(ImportExportError::InvalidArgument(format!(
                        "Resource location for region [{}] evaluated to a blank string",
                        region.full_path()
                    )));
                }
                tracing::debug!(
                    "region [{}] resource location [{}] from {}",
                    region.full_path(),
                    location,
                    self.override_property
                );
                return Ok(location);
            }
        }

        let defaults = Environment::new();
        let environment = self.environment.as_deref().unwrap_or(&defaults);
        Ok(join(&self.resource_path, &config::resource_name(environment, region)))
    }

    /// Loader-backed resolver honouring the configured classpath.
    pub(crate) fn default_resolver(&self) -> Arc<dyn ResourceResolver> {
        let classpath = self
            .environment
            .as_deref()
            .map(config::classpath)
            .unwrap_or_default();
        Arc::new(LoaderResourceResolver::new(ResourceLoader::new(classpath)))
    }
}

impl std::fmt::Debug for ResourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceLocation")
            .field("override_property", &self.override_property)
            .field("resource_path", &self.resource_path)
            .field("has_environment", &self.environment.is_some())
            .finish()
    }
}

/// `path` + `/` + `name`, without doubling separators after a scheme or slash.
fn join(path: &str, name: &str) -> String {
    if path.is_empty() || path.ends_with('/') || path.ends_with(':') {
        format!("{}{}", path, name)
    } else {
        format!("{}/{}", path, name)
    }
}
