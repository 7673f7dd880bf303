//! File-system resources.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::resource::Resource;

/// A resource backed by a path on the local file system.
#[derive(Debug, Clone)]
pub struct FileResource {
    location: String,
    path: PathBuf,
}

impl FileResource {
    /// Create a file resource; `location` is the string it was resolved from.
    pub fn new(location: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
            path: path.into(),
        }
    }

    /// Create a file resource whose location is its own `file://` URL.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            location: format!("file://{}", path.display()),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Resource for FileResource {
    fn location(&self) -> &str {
        &self.location
    }

    fn description(&self) -> String {
        format!("file [{}]", self.path.display())
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn is_readable(&self) -> bool {
        self.path.is_file() && File::open(&self.path).is_ok()
    }

    fn is_writable(&self) -> bool {
        match std::fs::metadata(&self.path) {
            Ok(meta) => meta.is_file() && !meta.permissions().readonly(),
            // Not created yet: writable if the closest existing ancestor is a writable directory.
            Err(_) => nearest_existing_ancestor(&self.path)
                .and_then(|dir| std::fs::metadata(dir).ok())
                .map(|meta| meta.is_dir() && !meta.permissions().readonly())
                .unwrap_or(false),
        }
    }

    fn open_read(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(File::open(&self.path)?))
    }

    fn open_write(&self) -> io::Result<Box<dyn Write + '_>> {
        ensure_parent_dirs(&self.path)?;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        Ok(Box::new(file))
    }
}

fn nearest_existing_ancestor(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .skip(1)
        // An empty ancestor stands for the current directory of a relative path.
        .map(|p| if p.as_os_str().is_empty() { Path::new(".") } else { p })
        .find(|p| p.exists())
        .map(Path::to_path_buf)
}

/// Ensure all parent directories exist for a path.
fn ensure_parent_dirs(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_writable_in_existing_dir() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let resource = FileResource::from_path(temp_dir.path().join("nested/dir/example.json"));

        assert!(!resource.exists());
        assert!(!resource.is_readable());
        assert!(resource.is_writable());
        assert!(resource.location().starts_with("file://"));
        Ok(())
    }

    #[test]
    fn test_write_truncates_and_reads_back() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("sub/data.json");
        let resource = FileResource::from_path(&path);

        resource.open_write()?.write_all(b"first contents")?;
        resource.open_write()?.write_all(b"second")?;

        let mut text = String::new();
        resource.open_read()?.read_to_string(&mut text)?;
        assert_eq!(text, "second");
        assert!(resource.is_readable());
        Ok(())
    }

    #[test]
    fn test_directory_is_not_readable_or_writable() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let resource = FileResource::from_path(temp_dir.path());
        assert!(resource.exists());
        assert!(!resource.is_readable());
        assert!(!resource.is_writable());
        Ok(())
    }
}
