//! Resource error types.

use std::fmt;
use std::io;

/// Errors raised while resolving, reading or writing a resource.
#[derive(Debug)]
pub enum ResourceError {
    /// The location did not resolve to a usable resource.
    NotFound { location: String },

    /// The resource exists but cannot be read.
    NotReadable { location: String },

    /// The resource cannot be written.
    NotWritable { location: String },

    /// The location string is blank or malformed.
    InvalidLocation { location: String },

    /// Reading the resource's bytes failed.
    ReadFailed { location: String, source: io::Error },

    /// Writing bytes to the resource failed.
    WriteFailed {
        location: String,
        bytes: usize,
        source: io::Error,
    },
}

impl ResourceError {
    /// Location of the resource the error refers to.
    pub fn location(&self) -> &str {
        match self {
            ResourceError::NotFound { location }
            | ResourceError::NotReadable { location }
            | ResourceError::NotWritable { location }
            | ResourceError::InvalidLocation { location }
            | ResourceError::ReadFailed { location, .. }
            | ResourceError::WriteFailed { location, .. } => location,
        }
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::NotFound { location } => {
                write!(f, "Resource [{}] not found", location)
            }
            ResourceError::NotReadable { location } => {
                write!(f, "Resource [{}] is not readable", location)
            }
            ResourceError::NotWritable { location } => {
                write!(f, "Resource [{}] is not writable", location)
            }
            ResourceError::InvalidLocation { location } => {
                write!(f, "Resource location [{}] is not valid", location)
            }
            ResourceError::ReadFailed { location, source } => {
                write!(f, "Failed to read from resource [{}]: {}", location, source)
            }
            ResourceError::WriteFailed {
                location,
                bytes,
                source,
            } => write!(
                f,
                "Failed to write {} byte(s) to resource [{}]: {}",
                bytes, location, source
            ),
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::ReadFailed { source, .. } | ResourceError::WriteFailed { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}
