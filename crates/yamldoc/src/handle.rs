//! [`FileHandle`]: one YAML document at one path.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use yamldoc_core::{EncodeOptions, Error, HandleConfig, Result, SchemaMode};

use crate::codec;
use crate::fetch::{self, RemoteFetcher, Source};
use crate::logging::DebugLog;
use crate::schema::{
    DEFAULT_SCHEMA_PATH, PassThroughValidator, SchemaGate, SchemaReference, SchemaValidator,
};
use crate::writer::{WriteCoordinator, WriteSink};

/// A YAML document file, local or remote.
///
/// The handle is immutable and keeps no document state: every call goes back
/// to storage.
#[derive(Clone)]
pub struct FileHandle {
    path: String,
    source: Source,
    logger: Option<Arc<dyn DebugLog>>,
    config: HandleConfig,
    writer: WriteCoordinator,
    schema: SchemaGate,
}

impl FileHandle {
    /// Handle for a local path (no fetcher, no logger, default config)
    pub fn new(path: impl Into<String>) -> Result<Self> {
        Self::builder(path).build()
    }

    pub fn builder(path: impl Into<String>) -> FileHandleBuilder {
        FileHandleBuilder::new(path)
    }

    /// Path or URL this handle points at
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the path is an http(s) URL
    pub fn is_remote(&self) -> bool {
        fetch::is_remote(&self.path)
    }

    pub fn config(&self) -> &HandleConfig {
        &self.config
    }

    /// True iff the path is a regular file on local storage
    pub fn exists(&self) -> bool {
        Path::new(&self.path).is_file()
    }

    /// Read and decode the document. Empty content yields `None`.
    pub fn read(&self) -> Result<Option<Value>> {
        let raw = self.source.fetch(&self.path, self.logger.as_deref())?;
        if raw.is_empty() {
            return Ok(None);
        }
        codec::decode(&raw, Some(Path::new(&self.path)))
    }

    /// Read the document into a typed value
    pub fn read_into<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.read()?
            .map(|value| {
                serde_yaml::from_value(value)
                    .map_err(|e| Error::parse_error(self.path.clone(), e.to_string()))
            })
            .transpose()
    }

    /// Encode and write the document using the configured encode options
    pub fn write<T: Serialize + ?Sized>(&self, document: &T) -> Result<()> {
        self.write_with_options(document, self.config.encode)
    }

    pub fn write_with_options<T: Serialize + ?Sized>(
        &self,
        document: &T,
        options: EncodeOptions,
    ) -> Result<()> {
        if self.is_remote() {
            return Err(Error::invalid_argument(format!(
                "cannot write to remote location {}",
                self.path
            )));
        }

        let path = Path::new(&self.path);
        // Directory problems must surface before any encoding work
        self.writer.ensure_parent_dir(path)?;
        let text = codec::encode(document, options)?;
        self.writer.write_contents(path, &text)
    }

    /// Validate the local file against a schema.
    ///
    /// Always reads from local storage, even when a fetcher is configured.
    /// With the default pass-through validator this returns `Ok(true)` for
    /// any document that decodes.
    pub fn validate_schema(&self, mode: SchemaMode, schema: Option<&str>) -> Result<bool> {
        let path = Path::new(&self.path);
        let raw = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let document = codec::decode(&raw, Some(path))?;

        self.schema.check(
            path,
            &raw,
            document.as_ref(),
            mode,
            &SchemaReference::from(schema),
        )
    }

    /// Encode a value as YAML text
    pub fn encode<T: Serialize + ?Sized>(value: &T, options: EncodeOptions) -> Result<String> {
        codec::encode(value, options)
    }

    /// Decode YAML text; `path` is only used in error messages
    pub fn decode(text: &str, path: Option<&Path>) -> Result<Option<Value>> {
        codec::decode(text, path)
    }
}

impl std::fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileHandle")
            .field("path", &self.path)
            .field("source", &self.source)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for FileHandle
pub struct FileHandleBuilder {
    path: String,
    fetcher: Option<Arc<dyn RemoteFetcher>>,
    logger: Option<Arc<dyn DebugLog>>,
    config: HandleConfig,
    sink: Option<Arc<dyn WriteSink>>,
    validator: Option<Arc<dyn SchemaValidator>>,
}

impl FileHandleBuilder {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            fetcher: None,
            logger: None,
            config: HandleConfig::default(),
            sink: None,
            validator: None,
        }
    }

    /// Fetch content through `fetcher` (required for http/https paths)
    pub fn fetcher(mut self, fetcher: Arc<dyn RemoteFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn DebugLog>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn config(mut self, config: HandleConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the default temp-file-and-rename sink
    pub fn sink(mut self, sink: Arc<dyn WriteSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Plug in a schema engine instead of the pass-through validator
    pub fn validator(mut self, validator: Arc<dyn SchemaValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Build the handle; fails for remote paths without a fetcher
    pub fn build(self) -> Result<FileHandle> {
        self.config.validate()?;
        let source = Source::select(&self.path, self.fetcher)?;

        let writer = match self.sink {
            Some(sink) => WriteCoordinator::with_sink(self.config.retry, sink),
            None => WriteCoordinator::new(self.config.retry),
        };

        let validator: Arc<dyn SchemaValidator> = match self.validator {
            Some(validator) => validator,
            None => Arc::new(PassThroughValidator),
        };
        let default_schema = self
            .config
            .default_schema
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_PATH));
        let schema = SchemaGate::new(validator, default_schema);

        Ok(FileHandle {
            path: self.path,
            source,
            logger: self.logger,
            config: self.config,
            writer,
            schema,
        })
    }
}
