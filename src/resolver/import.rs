use std::sync::Arc;

use cache_data_resource::{Resource, ResourceError, ResourceResolver, CLASSPATH_PREFIX};
use cache_data_types::{Environment, Region};

use super::{CacheResourceResolver, ResourceLocation};
use crate::config;
use crate::error::ImportExportError;
use crate::expression::Components;

/// Import-side policy, rooted at the classpath.
///
/// Resolution fails unless the resource exists and is readable.
#[derive(Clone)]
pub struct ImportResourceResolver {
    location: ResourceLocation,
    resolver: Arc<dyn ResourceResolver>,
}

impl ImportResourceResolver {
    pub fn new(environment: Option<Arc<Environment>>) -> Self {
        let location =
            ResourceLocation::new(environment, config::IMPORT_RESOURCE_LOCATION, CLASSPATH_PREFIX);
        let resolver = location.default_resolver();
        Self { location, resolver }
    }

    pub fn with_components(mut self, components: Arc<Components>) -> Self {
        self.location = self.location.with_components(components);
        self
    }

    pub fn with_resource_path(mut self, resource_path: impl Into<String>) -> Self {
        self.location = self.location.with_resource_path(resource_path);
        self
    }

    pub fn with_resource_resolver(mut self, resolver: Arc<dyn ResourceResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn location(&self) -> &ResourceLocation {
        &self.location
    }
}

impl CacheResourceResolver for ImportResourceResolver {
    fn resolve(&self, region: &dyn Region) -> Result<Option<Arc<dyn Resource>>, ImportExportError> {
        let location = self.location.location(region)?;
        let resource = match self.resolver.resolve(&location) {
            Ok(resource) => resource,
            Err(ResourceError::NotFound { location }) => {
                return Err(ImportExportError::ResourceDoesNotExist {
                    location,
                    region: region.full_path(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        if !resource.exists() {
            return Err(ImportExportError::ResourceDoesNotExist {
                location: resource.location().to_string(),
                region: region.full_path(),
            });
        }
        if !resource.is_readable() {
            return Err(ImportExportError::ResourceNotReadable {
                location: resource.location().to_string(),
                region: region.full_path(),
            });
        }
        tracing::debug!(
            "importing region [{}] from {}",
            region.full_path(),
            resource.description()
        );
        Ok(Some(resource))
    }
}

impl std::fmt::Debug for ImportResourceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportResourceResolver")
            .field("location", &self.location)
            .finish()
    }
}
