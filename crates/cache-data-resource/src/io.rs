//! Byte-level resource I/O.
//!
//! Both directions move data through a fixed-size buffer: the reader drains
//! the stream chunk by chunk, and the writer hands the payload to a
//! `BufWriter` one buffer-sized chunk at a time, so a payload of `n` bytes
//! reaches the underlying stream in `ceil(n / buffer_size)` writes followed
//! by a single flush. Streams are dropped (closed) on every exit path.

use std::io::{BufWriter, ErrorKind, Read, Write};

use crate::error::ResourceError;
use crate::resource::Resource;

/// Default transfer buffer size in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Reads a resource fully into memory.
pub trait ResourceReader: Send + Sync {
    fn read(&self, resource: &dyn Resource) -> Result<Vec<u8>, ResourceError>;
}

/// Writes a byte payload to a resource.
pub trait ResourceWriter: Send + Sync {
    /// Whether this writer can write to `resource`. Callers use this to pick
    /// another writer instead of failing.
    fn is_writable(&self, resource: &dyn Resource) -> bool {
        resource.is_writable()
    }

    fn write(&self, resource: &dyn Resource, bytes: &[u8]) -> Result<(), ResourceError>;
}

/// Reader draining the resource stream through a bounded buffer.
#[derive(Debug, Clone)]
pub struct ByteArrayResourceReader {
    buffer_size: usize,
}

impl ByteArrayResourceReader {
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }
}

impl Default for ByteArrayResourceReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceReader for ByteArrayResourceReader {
    fn read(&self, resource: &dyn Resource) -> Result<Vec<u8>, ResourceError> {
        let read_failed = |source: std::io::Error| ResourceError::ReadFailed {
            location: resource.location().to_string(),
            source,
        };

        let mut stream = resource.open_read().map_err(read_failed)?;
        let mut buffer = vec![0u8; self.buffer_size];
        let mut contents = Vec::new();
        loop {
            match stream.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => contents.extend_from_slice(&buffer[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(read_failed(e)),
            }
        }
        tracing::debug!("read {} byte(s) from {}", contents.len(), resource.description());
        Ok(contents)
    }
}

/// Writer that rewrites the resource from offset zero through a `BufWriter`.
#[derive(Debug, Clone)]
pub struct BufferedResourceWriter {
    buffer_size: usize,
}

impl BufferedResourceWriter {
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }
}

impl Default for BufferedResourceWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceWriter for BufferedResourceWriter {
    fn write(&self, resource: &dyn Resource, bytes: &[u8]) -> Result<(), ResourceError> {
        if bytes.is_empty() {
            return Ok(());
        }
        if !self.is_writable(resource) {
            return Err(ResourceError::NotWritable {
                location: resource.location().to_string(),
            });
        }

        let write_failed = |source: std::io::Error| ResourceError::WriteFailed {
            location: resource.location().to_string(),
            bytes: bytes.len(),
            source,
        };

        let stream = resource.open_write().map_err(write_failed)?;
        let mut out = BufWriter::with_capacity(self.buffer_size, stream);
        for chunk in bytes.chunks(self.buffer_size) {
            out.write_all(chunk).map_err(write_failed)?;
        }
        out.flush().map_err(write_failed)?;
        drop(out);

        tracing::debug!("wrote {} byte(s) to {}", bytes.len(), resource.description());
        Ok(())
    }
}
