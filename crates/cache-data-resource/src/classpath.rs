//! Classpath resources: read-only entries looked up across ordered root directories.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::resource::Resource;

/// Root directory used when no classpath is configured.
pub const DEFAULT_CLASSPATH_ROOT: &str = "resources";

/// Ordered list of directories searched for classpath entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classpath {
    roots: Vec<PathBuf>,
}

impl Classpath {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse an OS path list (`:`-separated on Unix, `;` on Windows).
    pub fn parse(path_list: &str) -> Self {
        Self {
            roots: std::env::split_paths(path_list)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// First root that contains `entry`, joined with it.
    pub fn find(&self, entry: &str) -> Option<PathBuf> {
        let entry = entry.trim_start_matches('/');
        self.roots
            .iter()
            .map(|root| root.join(entry))
            .find(|candidate| candidate.is_file())
    }
}

impl Default for Classpath {
    fn default() -> Self {
        Self::new([DEFAULT_CLASSPATH_ROOT])
    }
}

/// A read-only entry on the classpath.
#[derive(Debug, Clone)]
pub struct ClasspathResource {
    location: String,
    entry: String,
    path: Option<PathBuf>,
}

impl ClasspathResource {
    /// Look up `entry` (a classpath-relative path) on `classpath`.
    pub fn new(location: impl Into<String>, entry: impl Into<String>, classpath: &Classpath) -> Self {
        let entry = entry.into();
        let path = classpath.find(&entry);
        Self {
            location: location.into(),
            entry,
            path,
        }
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// File backing the entry, when it was found.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Resource for ClasspathResource {
    fn location(&self) -> &str {
        &self.location
    }

    fn description(&self) -> String {
        format!("class path resource [{}]", self.entry)
    }

    fn exists(&self) -> bool {
        self.path.as_ref().is_some_and(|p| p.exists())
    }

    fn is_readable(&self) -> bool {
        self.path
            .as_ref()
            .is_some_and(|p| p.is_file() && File::open(p).is_ok())
    }

    fn open_read(&self) -> io::Result<Box<dyn Read + '_>> {
        match &self.path {
            Some(path) => Ok(Box::new(File::open(path)?)),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} cannot be opened because it does not exist", self.description()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_searches_roots_in_order() -> anyhow::Result<()> {
        let first = TempDir::new()?;
        let second = TempDir::new()?;
        std::fs::write(second.path().join("example.json"), "[]")?;
        std::fs::create_dir_all(first.path().join("data"))?;
        std::fs::write(first.path().join("data/example.json"), "[1]")?;

        let classpath = Classpath::new([first.path(), second.path()]);
        assert_eq!(
            classpath.find("example.json"),
            Some(second.path().join("example.json"))
        );
        assert_eq!(
            classpath.find("/data/example.json"),
            Some(first.path().join("data/example.json"))
        );
        assert_eq!(classpath.find("missing.json"), None);
        Ok(())
    }

    #[test]
    fn test_resource_is_read_only() -> anyhow::Result<()> {
        let root = TempDir::new()?;
        std::fs::write(root.path().join("example.json"), "[]")?;
        let classpath = Classpath::new([root.path()]);

        let resource = ClasspathResource::new("classpath:example.json", "example.json", &classpath);
        assert!(resource.exists());
        assert!(resource.is_readable());
        assert!(!resource.is_writable());

        let mut text = String::new();
        resource.open_read()?.read_to_string(&mut text)?;
        assert_eq!(text, "[]");

        let missing = ClasspathResource::new("classpath:nope.json", "nope.json", &classpath);
        assert!(!missing.exists());
        assert!(missing.open_read().is_err());
        Ok(())
    }

    #[test]
    fn test_parse_path_list() {
        let joined = std::env::join_paths(["/a", "/b"]).unwrap();
        let classpath = Classpath::parse(joined.to_str().unwrap());
        assert_eq!(classpath.roots(), &[PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(Classpath::default().roots(), &[PathBuf::from("resources")]);
    }
}
