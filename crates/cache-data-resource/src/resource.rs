//! The resource abstraction.

use std::fmt;
use std::io::{self, Read, Write};
use std::sync::Arc;

use crate::error::ResourceError;

/// An addressable byte source and/or sink.
pub trait Resource: fmt::Debug + Send + Sync {
    /// Location string this resource was resolved from.
    fn location(&self) -> &str;

    /// Human-readable description for diagnostics.
    fn description(&self) -> String {
        self.location().to_string()
    }

    fn exists(&self) -> bool;

    fn is_readable(&self) -> bool {
        self.exists()
    }

    fn is_writable(&self) -> bool {
        false
    }

    /// Open the resource's byte stream.
    fn open_read(&self) -> io::Result<Box<dyn Read + '_>>;

    /// Open the resource for writing from offset zero, creating it if needed.
    fn open_write(&self) -> io::Result<Box<dyn Write + '_>> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("{} does not support writing", self.description()),
        ))
    }
}

/// Require that a resource is writable, failing immediately otherwise.
pub fn writable(resource: Arc<dyn Resource>) -> Result<Arc<dyn Resource>, ResourceError> {
    if resource.is_writable() {
        Ok(resource)
    } else {
        Err(ResourceError::NotWritable {
            location: resource.location().to_string(),
        })
    }
}

/// Require that a resource is readable, failing immediately otherwise.
pub fn readable(resource: Arc<dyn Resource>) -> Result<Arc<dyn Resource>, ResourceError> {
    if resource.is_readable() {
        Ok(resource)
    } else {
        Err(ResourceError::NotReadable {
            location: resource.location().to_string(),
        })
    }
}
