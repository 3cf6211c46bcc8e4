use std::fmt;

use indexmap::IndexSet;
use jsonschema::{CompilationOptions, JSONSchema};
use serde_json::{Value, json};

use crate::error::SchemaError;

/// Schemas registered under URIs with a `jsonschema` compiler, so that
/// `$ref`s to those URIs resolve without touching the filesystem.
pub struct SchemaStorage {
    options: CompilationOptions,
    uris: IndexSet<String>,
}

impl Default for SchemaStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SchemaStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaStorage")
            .field("uris", &self.uris)
            .finish_non_exhaustive()
    }
}

impl SchemaStorage {
    pub fn new() -> Self {
        Self {
            options: JSONSchema::options(),
            uris: IndexSet::new(),
        }
    }

    /// Register `schema` under `uri`, replacing any schema already there.
    /// A fragment on `uri` is ignored.
    pub fn add_schema(&mut self, uri: impl Into<String>, schema: impl Into<Value>) {
        let mut uri = uri.into();
        if let Some(pos) = uri.find('#') {
            uri.truncate(pos);
        }
        log::debug!("registering schema {}", uri);
        self.options.with_document(uri.clone(), schema.into());
        self.uris.insert(uri);
    }

    /// Compiler options carrying every registered schema.
    pub fn options(&self) -> &CompilationOptions {
        &self.options
    }

    /// Compile a validator for `reference`, a registered URI optionally
    /// followed by a `#/json/pointer` fragment.
    pub fn compile(&self, reference: &str) -> Result<JSONSchema, SchemaError> {
        let root = json!({ "$ref": reference });
        self.options
            .compile(&root)
            .map_err(|err| SchemaError::Compile {
                reference: reference.to_string(),
                message: err.to_string(),
            })
    }

    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.uris.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }
}
