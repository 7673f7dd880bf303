//! Resource location resolvers.

use std::fmt;
use std::sync::Arc;

use crate::error::ResourceError;
use crate::loader::ResourceLoader;
use crate::resource::Resource;

/// Resolves a location string to a concrete resource.
pub trait ResourceResolver: Send + Sync {
    /// Resolve `location`, failing with [`ResourceError::NotFound`] when no
    /// usable resource exists for it.
    fn resolve(&self, location: &str) -> Result<Arc<dyn Resource>, ResourceError>;
}

/// What a loaded handle must satisfy to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Qualification {
    /// Any handle the loader produces.
    #[default]
    Resolved,
    /// The resource must exist.
    MustExist,
}

impl Qualification {
    fn accepts(self, resource: &dyn Resource) -> bool {
        match self {
            Qualification::Resolved => true,
            Qualification::MustExist => resource.exists(),
        }
    }
}

/// Resolver backed by a [`ResourceLoader`].
///
/// Handles that fail qualification are replaced by the fallback resource when
/// one is configured; otherwise resolution fails with `NotFound`.
#[derive(Clone)]
pub struct LoaderResourceResolver {
    loader: ResourceLoader,
    qualification: Qualification,
    fallback: Option<Arc<dyn Resource>>,
}

impl LoaderResourceResolver {
    pub fn new(loader: ResourceLoader) -> Self {
        Self {
            loader,
            qualification: Qualification::default(),
            fallback: None,
        }
    }

    pub fn with_qualification(mut self, qualification: Qualification) -> Self {
        self.qualification = qualification;
        self
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn Resource>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn loader(&self) -> &ResourceLoader {
        &self.loader
    }

    fn on_missing_resource(&self, location: &str) -> Result<Arc<dyn Resource>, ResourceError> {
        match &self.fallback {
            Some(fallback) => {
                tracing::debug!(
                    "location [{}] not qualified; using {}",
                    location,
                    fallback.description()
                );
                Ok(Arc::clone(fallback))
            }
            None => Err(ResourceError::NotFound {
                location: location.to_string(),
            }),
        }
    }
}

impl Default for LoaderResourceResolver {
    fn default() -> Self {
        Self::new(ResourceLoader::default())
    }
}

impl ResourceResolver for LoaderResourceResolver {
    fn resolve(&self, location: &str) -> Result<Arc<dyn Resource>, ResourceError> {
        if location.trim().is_empty() {
            return Err(ResourceError::InvalidLocation {
                location: location.to_string(),
            });
        }
        match self.loader.get_resource(location) {
            Some(resource) if self.qualification.accepts(resource.as_ref()) => Ok(resource),
            _ => self.on_missing_resource(location),
        }
    }
}

impl fmt::Debug for LoaderResourceResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderResourceResolver")
            .field("loader", &self.loader)
            .field("qualification", &self.qualification)
            .field("fallback", &self.fallback.as_ref().map(|r| r.description()))
            .finish()
    }
}

/// Resolver that always returns one pre-configured resource.
#[derive(Debug, Clone)]
pub struct SingleResourceResolver {
    resource: Arc<dyn Resource>,
}

impl SingleResourceResolver {
    pub fn new(resource: Arc<dyn Resource>) -> Self {
        Self { resource }
    }
}

impl ResourceResolver for SingleResourceResolver {
    fn resolve(&self, _location: &str) -> Result<Arc<dyn Resource>, ResourceError> {
        Ok(Arc::clone(&self.resource))
    }
}
