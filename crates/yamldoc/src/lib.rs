//! # yamldoc
//!
//! YAML document files for configuration and lock data.
//!
//! A [`FileHandle`] wraps one path and provides:
//! - Reading from local storage or through an injected [`RemoteFetcher`]
//! - Writing with parent directory creation and bounded retries
//! - A schema validation entry point with a pluggable [`SchemaValidator`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use yamldoc::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let handle = FileHandle::new("config/app.yaml")?;
//!
//!     let mut document = handle.read()?.unwrap_or_default();
//!     if let Some(map) = document.as_mapping_mut() {
//!         map.insert("debug".into(), true.into());
//!     }
//!     handle.write(&document)?;
//!
//!     assert!(handle.validate_schema(SchemaMode::Strict, None)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Remote documents
//!
//! http(s) paths need a fetcher at construction time. With the `http`
//! feature, `HttpFetcher` provides a blocking `reqwest` implementation.
//!
//! ```no_run
//! use std::sync::Arc;
//! use yamldoc::prelude::*;
//!
//! struct Mirror;
//!
//! impl RemoteFetcher for Mirror {
//!     fn get_contents(&self, _location: &str) -> std::result::Result<String, FetchError> {
//!         Ok("name: mirrored\n".to_string())
//!     }
//! }
//!
//! # fn example() -> Result<()> {
//! let handle = FileHandle::builder("https://repo.example.org/packages.yaml")
//!     .fetcher(Arc::new(Mirror))
//!     .build()?;
//! let document = handle.read()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Schema validation
//!
//! No JSON Schema engine ships with this crate. The default
//! [`PassThroughValidator`] accepts every document that decodes, so
//! `validate_schema` currently returns `Ok(true)` for any valid YAML.
//! Plug a real engine in with [`FileHandleBuilder::validator`].

pub mod codec;
pub mod fetch;
pub mod handle;
pub mod logging;
pub mod schema;
pub mod writer;

#[cfg(feature = "http")]
pub use fetch::HttpFetcher;
pub use fetch::{FetchError, RemoteFetcher, Source};
pub use handle::{FileHandle, FileHandleBuilder};
pub use logging::{DebugLog, LogFacade};
pub use schema::{
    DEFAULT_SCHEMA_PATH, PassThroughValidator, SchemaDescription, SchemaError, SchemaGate,
    SchemaReference, SchemaValidator,
};
pub use writer::{AtomicFileSink, WriteCoordinator, WriteSink};
pub use yamldoc_core::prelude::*;

pub mod prelude {
    pub use crate::fetch::{FetchError, RemoteFetcher};
    pub use crate::handle::{FileHandle, FileHandleBuilder};
    pub use crate::logging::{DebugLog, LogFacade};
    pub use crate::schema::{SchemaDescription, SchemaError, SchemaReference, SchemaValidator};
    pub use crate::writer::WriteSink;
    pub use serde_yaml::Value;
    pub use yamldoc_core::prelude::*;
}
