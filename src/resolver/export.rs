use std::path::PathBuf;
use std::sync::Arc;

use cache_data_resource::{Resource, ResourceError, ResourceResolver};
use cache_data_types::{Environment, Region};

use super::{CacheResourceResolver, ResourceLocation};
use crate::config;
use crate::error::ImportExportError;
use crate::expression::Components;

/// Export-side policy, rooted at the current working directory.
///
/// Missing or read-only targets are returned with a warning; the writer
/// decides whether they can be written.
#[derive(Clone)]
pub struct ExportResourceResolver {
    location: ResourceLocation,
    resolver: Arc<dyn ResourceResolver>,
}

impl ExportResourceResolver {
    pub fn new(environment: Option<Arc<Environment>>) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let location = ResourceLocation::new(
            environment,
            config::EXPORT_RESOURCE_LOCATION,
            format!("file://{}", cwd.display()),
        );
        let resolver = location.default_resolver();
        Self { location, resolver }
    }

    pub fn with_components(mut self, components: Arc<Components>) -> Self {
        self.location = self.location.with_components(components);
        self
    }

    /// Directory (or other location prefix) for convention-named resources.
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

impl CacheResourceResolver for ExportResourceResolver {
    fn resolve(&self, region: &dyn Region) -> Result<Option<Arc<dyn Resource>>, ImportExportError> {
        let location = self.location.location(region)?;
        let resource = match self.resolver.resolve(&location) {
            Ok(resource) => resource,
            Err(ResourceError::NotFound { location }) => {
                tracing::warn!(
                    "no export resource found at [{}] for region [{}]",
                    location,
                    region.full_path()
                );
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if !resource.exists() {
            tracing::warn!(
                "export resource {} for region [{}] does not exist; it will be created",
                resource.description(),
                region.full_path()
            );
        } else if !resource.is_writable() {
            tracing::warn!(
                "export resource {} for region [{}] is not writable",
                resource.description(),
                region.full_path()
            );
        }
        Ok(Some(resource))
    }
}

impl std::fmt::Debug for ExportResourceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportResourceResolver")
            .field("location", &self.location)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cache_data_resource::{ByteArrayResource, SingleResourceResolver};
    use cache_data_types::InMemoryRegion;
    use tempfile::TempDir;

    #[test]
    fn test_default_location_is_cwd_file() {
        let region = InMemoryRegion::new("Example");
        let cwd = std::env::current_dir().unwrap();
        let resolver = ExportResourceResolver::new(None);
        assert_eq!(
            resolver.location().location(&region).unwrap(),
            format!("file://{}/example.json", cwd.display())
        );
    }

    #[test]
    fn test_missing_target_is_returned() {
        let dir = TempDir::new().unwrap();
        let region = InMemoryRegion::new("Example");
        let resolver = ExportResourceResolver::new(None)
            .with_resource_path(format!("file://{}", dir.path().display()));

        let resource = resolver.resolve(&region).unwrap().unwrap();
        assert!(!resource.exists());
        assert!(resource.is_writable());
        assert!(resource.location().ends_with("/example.json"));
    }

    #[test]
    fn test_unsupported_location_yields_none() {
        let env = Environment::new()
            .with_property(config::EXPORT_RESOURCE_LOCATION, "ftp://host/#{#regionName}");
        let resolver = ExportResourceResolver::new(Some(Arc::new(env)));
        assert!(resolver.resolve(&InMemoryRegion::new("Example")).unwrap().is_none());
    }

    #[test]
    fn test_read_only_target_is_still_returned() {
        let fixed: Arc<dyn Resource> = Arc::new(ByteArrayResource::new("mem:fixed", Vec::new()));
        let resolver = ExportResourceResolver::new(None)
            .with_resource_resolver(Arc::new(SingleResourceResolver::new(fixed)));
        let resource = resolver.resolve(&InMemoryRegion::new("Example")).unwrap().unwrap();
        assert_eq!(resource.location(), "mem:fixed");
        assert!(!resource.is_writable());
    }
}
