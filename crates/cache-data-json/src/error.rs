//! Conversion error types.

use cache_data_types::FormatError;
use std::error::Error;
use std::fmt;

/// Errors raised while converting between objects, JSON and portable instances.
#[derive(Debug)]
pub enum ConversionError {
    /// A conversion step failed; wraps the underlying cause.
    Failed {
        source_type: String,
        target_type: String,
        cause: Box<dyn Error + Send + Sync>,
    },

    /// A JSON object had no `@type` field, so its type cannot be reconstructed.
    MissingTypeMetadata,

    /// `@type` names a type that is not registered.
    UnknownType { type_name: String },

    /// The JSON value's top-level shape is not supported here.
    UnexpectedJsonShape { shape: &'static str },

    /// The grid's native mapping cannot materialize this JSON.
    NativeUnsupported { reason: FormatError },
}

impl ConversionError {
    pub fn failed(
        source_type: impl Into<String>,
        target_type: impl Into<String>,
        cause: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        ConversionError::Failed {
            source_type: source_type.into(),
            target_type: target_type.into(),
            cause: cause.into(),
        }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::Failed {
                source_type,
                target_type,
                cause,
            } => write!(
                f,
                "Failed to convert [{}] to [{}]: {}",
                source_type, target_type, cause
            ),
            ConversionError::MissingTypeMetadata => write!(
                f,
                "JSON object is missing the {} metadata field",
                cache_data_types::TYPE_METADATA_FIELD
            ),
            ConversionError::UnknownType { type_name } => {
                write!(f, "Type [{}] is not registered", type_name)
            }
            ConversionError::UnexpectedJsonShape { shape } => {
                write!(f, "Unexpected JSON shape: {}", shape)
            }
            ConversionError::NativeUnsupported { reason } => {
                write!(f, "Native JSON conversion unsupported: {}", reason)
            }
        }
    }
}

impl Error for ConversionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConversionError::Failed { cause, .. } => Some(cause.as_ref()),
            ConversionError::NativeUnsupported { reason } => Some(reason),
            _ => None,
        }
    }
}
