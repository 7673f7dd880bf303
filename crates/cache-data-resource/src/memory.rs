//! In-memory, read-only resource.

use std::io::{self, Read};

use crate::resource::Resource;

/// A read-only resource backed by a byte buffer.
#[derive(Debug, Clone)]
pub struct ByteArrayResource {
    location: String,
    bytes: Vec<u8>,
}

impl ByteArrayResource {
    pub fn new(location: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            location: location.into(),
            bytes,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Resource for ByteArrayResource {
    fn location(&self) -> &str {
        &self.location
    }

    fn description(&self) -> String {
        format!("byte array resource [{}] ({} bytes)", self.location, self.bytes.len())
    }

    fn exists(&self) -> bool {
        true
    }

    fn open_read(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(self.bytes.as_slice()))
    }
}
