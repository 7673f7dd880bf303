//! Import/export error types.

use std::fmt;

use cache_data_json::ConversionError;
use cache_data_resource::ResourceError;

use crate::expression::ExpressionError;

/// Errors raised by resolvers and the importer/exporter.
#[derive(Debug)]
pub enum ImportExportError {
    Resource(ResourceError),

    Conversion(ConversionError),

    /// A location override template could not be evaluated.
    Expression {
        template: String,
        source: ExpressionError,
    },

    /// The import resource for a region does not exist.
    ResourceDoesNotExist { location: String, region: String },

    /// The import resource for a region exists but cannot be read.
    ResourceNotReadable { location: String, region: String },

    /// An imported element carries neither `@identifier` nor an `id` field.
    UnresolvableKey { region: String, index: usize },

    /// A required argument was blank or otherwise unusable.
    InvalidArgument(String),
}

impl fmt::Display for ImportExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportExportError::Resource(e) => write!(f, "{}", e),
            ImportExportError::Conversion(e) => write!(f, "{}", e),
            ImportExportError::Expression { template, source } => write!(
                f,
                "Failed to evaluate resource location [{}]: {}",
                template, source
            ),
            ImportExportError::ResourceDoesNotExist { location, region } => write!(
                f,
                "Resource [{}] does not exist for region [{}]",
                location, region
            ),
            ImportExportError::ResourceNotReadable { location, region } => write!(
                f,
                "Resource [{}] is not readable for region [{}]",
                location, region
            ),
            ImportExportError::UnresolvableKey { region, index } => write!(
                f,
                "Cannot determine the key of element {} imported into region [{}]",
                index, region
            ),
            ImportExportError::InvalidArgument(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ImportExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportExportError::Resource(e) => Some(e),
            ImportExportError::Conversion(e) => Some(e),
            ImportExportError::Expression { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ResourceError> for ImportExportError {
    fn from(e: ResourceError) -> Self {
        ImportExportError::Resource(e)
    }
}

impl From<ConversionError> for ImportExportError {
    fn from(e: ConversionError) -> Self {
        ImportExportError::Conversion(e)
    }
}
