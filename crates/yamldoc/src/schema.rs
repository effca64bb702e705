//! Schema validation entry point.
//!
//! [`SchemaGate`] turns a [`SchemaReference`] and a [`SchemaMode`] into a
//! JSON Schema description and hands it, together with the decoded document,
//! to a [`SchemaValidator`]. No JSON Schema engine is wired in yet: the
//! default [`PassThroughValidator`] accepts every document, so validation of
//! a syntactically valid file currently always succeeds.

use serde_json::{Map, Value as JsonValue, json};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error as ThisError;
use yamldoc_core::{Error, Result, SchemaMode};

/// Bundled schema, relative to this crate
pub const DEFAULT_SCHEMA_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/res/document-schema.json");

/// Failure reported by a validation engine
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
#[error("{}", .errors.join("; "))]
pub struct SchemaError {
    pub errors: Vec<String>,
}

impl SchemaError {
    pub fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }
}

/// Pluggable JSON Schema engine
pub trait SchemaValidator: Send + Sync {
    /// Check raw text that decoded to nothing. Accepts everything by default.
    fn check_syntax(&self, _raw: &str) -> std::result::Result<(), SchemaError> {
        Ok(())
    }

    fn validate(
        &self,
        document: &JsonValue,
        schema: &SchemaDescription,
    ) -> std::result::Result<(), SchemaError>;
}

/// Accepts every document
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughValidator;

impl SchemaValidator for PassThroughValidator {
    fn validate(
        &self,
        _document: &JsonValue,
        _schema: &SchemaDescription,
    ) -> std::result::Result<(), SchemaError> {
        Ok(())
    }
}

/// Which schema to validate against
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SchemaReference {
    /// The handle's default schema
    #[default]
    Default,
    /// A local path or an already-schemed URI
    Custom(String),
}

impl SchemaReference {
    /// Normalise to a URI; local paths get a `file://` prefix
    pub fn to_uri(&self, default_schema: &Path) -> String {
        let location = match self {
            Self::Default => default_schema.display().to_string(),
            Self::Custom(location) => location.clone(),
        };

        if location.contains("://") {
            location
        } else {
            format!("file://{}", location)
        }
    }
}

impl From<&str> for SchemaReference {
    fn from(location: &str) -> Self {
        Self::Custom(location.to_string())
    }
}

impl From<Option<&str>> for SchemaReference {
    fn from(location: Option<&str>) -> Self {
        location.map(Self::from).unwrap_or_default()
    }
}

/// Schema document handed to the validator: a `$ref` to the schema URI,
/// relaxed in lax mode
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescription(JsonValue);

impl SchemaDescription {
    pub fn new(uri: &str, mode: SchemaMode) -> Self {
        let mut description = Map::new();
        description.insert("$ref".to_string(), json!(uri));

        if mode == SchemaMode::Lax {
            description.insert("additionalProperties".to_string(), json!(true));
            description.insert("required".to_string(), json!([]));
        }

        Self(JsonValue::Object(description))
    }

    /// URI the description points at
    pub fn uri(&self) -> Option<&str> {
        self.0.get("$ref").and_then(JsonValue::as_str)
    }

    pub fn as_json(&self) -> &JsonValue {
        &self.0
    }
}

/// Builds schema descriptions and runs the validator
#[derive(Clone)]
pub struct SchemaGate {
    validator: Arc<dyn SchemaValidator>,
    default_schema: PathBuf,
}

impl SchemaGate {
    pub fn new(validator: Arc<dyn SchemaValidator>, default_schema: impl Into<PathBuf>) -> Self {
        Self {
            validator,
            default_schema: default_schema.into(),
        }
    }

    pub fn default_schema(&self) -> &Path {
        &self.default_schema
    }

    /// Description for `reference` under `mode`
    pub fn describe(&self, mode: SchemaMode, reference: &SchemaReference) -> SchemaDescription {
        SchemaDescription::new(&reference.to_uri(&self.default_schema), mode)
    }

    /// Validate raw text read from `path`.
    ///
    /// `document` is what the codec decoded from `raw`. Returns `Ok(true)`
    /// when the validator accepts the document.
    pub fn check(
        &self,
        path: &Path,
        raw: &str,
        document: Option<&Value>,
        mode: SchemaMode,
        reference: &SchemaReference,
    ) -> Result<bool> {
        if document.is_none() && raw != "null" {
            self.validator
                .check_syntax(raw)
                .map_err(|e| Error::syntax_error(path, e.to_string()))?;
        }

        let description = self.describe(mode, reference);
        let document = document.map(to_json).unwrap_or(JsonValue::Null);

        self.validator
            .validate(&document, &description)
            .map_err(|e| Error::schema_validation(path, e.errors))?;

        log::debug!(
            "{} passed schema check against {}",
            path.display(),
            description.uri().unwrap_or_default()
        );
        Ok(true)
    }
}

/// JSON view of a decoded document.
///
/// Every YAML document has one: keys that are not strings are rendered as
/// YAML text, tags become single-entry objects keyed by the tag and
/// non-finite floats become `null`.
pub fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::from(i)
            } else if let Some(u) = n.as_u64() {
                JsonValue::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(JsonValue::Null, JsonValue::Number)
            }
        }
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Sequence(items) => JsonValue::Array(items.iter().map(to_json).collect()),
        Value::Mapping(mapping) => JsonValue::Object(
            mapping
                .iter()
                .map(|(key, value)| (key_to_string(key), to_json(value)))
                .collect(),
        ),
        Value::Tagged(tagged) => {
            let mut object = Map::new();
            object.insert(tagged.tag.to_string(), to_json(&tagged.value));
            JsonValue::Object(object)
        }
    }
}

fn key_to_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_else(|_| format!("{:?}", other)),
    }
}

impl Default for SchemaGate {
    fn default() -> Self {
        Self::new(Arc::new(PassThroughValidator), DEFAULT_SCHEMA_PATH)
    }
}

impl std::fmt::Debug for SchemaGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaGate")
            .field("default_schema", &self.default_schema)
            .finish_non_exhaustive()
    }
}
