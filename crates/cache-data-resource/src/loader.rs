//! Scheme-based resource loading.
//!
//! | Location | Resource |
//! |---|---|
//! | `classpath:data/example.json` | [`ClasspathResource`] |
//! | `file:///tmp/example.json`, `file:example.json` | [`FileResource`] |
//! | `http://host/example.json`, `https://...` | [`UrlResource`] |
//! | `data/example.json` (bare) | classpath entry, or a file under a root directory |

use std::path::PathBuf;
use std::sync::Arc;

use crate::classpath::{Classpath, ClasspathResource};
use crate::file::FileResource;
use crate::resource::Resource;
use crate::url::{default_agent, UrlResource};

pub const CLASSPATH_PREFIX: &str = "classpath:";
pub const FILE_PREFIX: &str = "file:";
const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";
const SCHEME_SEPARATOR: &str = "://";

/// How locations without a scheme are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BareLocation {
    /// As classpath entries.
    Classpath,
    /// As file paths relative to the given root directory.
    FileSystem(PathBuf),
}

/// Turns location strings into resource handles.
#[derive(Debug, Clone)]
pub struct ResourceLoader {
    classpath: Classpath,
    bare: BareLocation,
    agent: ureq::Agent,
}

impl ResourceLoader {
    /// Loader treating bare locations as classpath entries.
    pub fn new(classpath: Classpath) -> Self {
        Self {
            classpath,
            bare: BareLocation::Classpath,
            agent: default_agent(),
        }
    }

    /// Loader treating bare locations as files under `root`.
    pub fn file_system(root: impl Into<PathBuf>) -> Self {
        Self {
            classpath: Classpath::default(),
            bare: BareLocation::FileSystem(root.into()),
            agent: default_agent(),
        }
    }

    pub fn with_agent(mut self, agent: ureq::Agent) -> Self {
        self.agent = agent;
        self
    }

    pub fn classpath(&self) -> &Classpath {
        &self.classpath
    }

    pub fn bare_location(&self) -> &BareLocation {
        &self.bare
    }

    /// Resolve a location to a handle. The handle may point at a resource
    /// that does not exist yet; `None` means the location is blank or uses an
    /// unsupported scheme.
    pub fn get_resource(&self, location: &str) -> Option<Arc<dyn Resource>> {
        let trimmed = location.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(entry) = trimmed.strip_prefix(CLASSPATH_PREFIX) {
            return Some(Arc::new(ClasspathResource::new(
                trimmed,
                entry,
                &self.classpath,
            )));
        }

        if let Some(rest) = trimmed.strip_prefix(FILE_PREFIX) {
            let path = rest.strip_prefix("//").unwrap_or(rest);
            if path.is_empty() {
                return None;
            }
            return Some(Arc::new(FileResource::new(trimmed, path)));
        }

        if trimmed.starts_with(HTTP_PREFIX) || trimmed.starts_with(HTTPS_PREFIX) {
            return Some(Arc::new(UrlResource::with_agent(
                trimmed,
                self.agent.clone(),
            )));
        }

        if trimmed.contains(SCHEME_SEPARATOR) {
            tracing::debug!("unsupported resource scheme in location [{}]", trimmed);
            return None;
        }

        let resource: Arc<dyn Resource> = match &self.bare {
            BareLocation::Classpath => {
                Arc::new(ClasspathResource::new(trimmed, trimmed, &self.classpath))
            }
            BareLocation::FileSystem(root) => {
                Arc::new(FileResource::new(trimmed, root.join(trimmed)))
            }
        };
        Some(resource)
    }
}

impl Default for ResourceLoader {
    fn default() -> Self {
        Self::new(Classpath::default())
    }
}
