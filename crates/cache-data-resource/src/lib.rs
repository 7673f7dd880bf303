//! Resources for cache-data snapshots.
//!
//! This crate provides:
//! - [`Resource`]: an addressable byte source/sink (file, classpath entry, URL, memory)
//! - [`ResourceLoader`]: turns a location string into a resource handle by scheme
//! - [`ResourceResolver`]: resolution with qualification and not-found signalling
//! - [`ResourceReader`] / [`ResourceWriter`]: bounded-buffer byte transfer

pub mod classpath;
pub mod error;
pub mod file;
pub mod io;
pub mod loader;
pub mod memory;
pub mod resolver;
pub mod resource;
pub mod url;

pub use classpath::{Classpath, ClasspathResource};
pub use error::ResourceError;
pub use file::FileResource;
pub use io::{
    BufferedResourceWriter, ByteArrayResourceReader, ResourceReader, ResourceWriter,
    DEFAULT_BUFFER_SIZE,
};
pub use loader::{BareLocation, ResourceLoader, CLASSPATH_PREFIX, FILE_PREFIX};
pub use memory::ByteArrayResource;
pub use resolver::{
    LoaderResourceResolver, Qualification, ResourceResolver, SingleResourceResolver,
};
pub use resource::{readable, writable, Resource};
pub use url::UrlResource;
