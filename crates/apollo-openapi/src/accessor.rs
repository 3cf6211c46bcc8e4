use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::AccessorConfig;
use crate::document::{self, Mapping, OperationsBlock, SpecDocument, empty_mapping};
use crate::error::{LoadError, ResolveError};
use crate::resolve::ReferenceResolver;
use crate::storage::SchemaStorage;

/// Read-only view over an OpenAPI document loaded from a schema directory.
///
/// Lookups that find nothing return empty values rather than errors; only
/// loading and malformed `$ref`s fail.
#[derive(Debug, Clone)]
pub struct DocumentAccessor {
    schema_dir: PathBuf,
    document: SpecDocument,
    resolver: ReferenceResolver,
    config: AccessorConfig,
}

impl DocumentAccessor {
    /// Load `filename` from `schema_dir` with the default configuration.
    pub fn new(
        schema_dir: impl AsRef<Path>,
        filename: impl AsRef<Path>,
    ) -> Result<Self, LoadError> {
        Self::with_config(schema_dir, filename, AccessorConfig::default())
    }

    pub fn with_config(
        schema_dir: impl AsRef<Path>,
        filename: impl AsRef<Path>,
        config: AccessorConfig,
    ) -> Result<Self, LoadError> {
        let schema_dir = schema_dir.as_ref().to_path_buf();
        let document = document::from_path(&schema_dir.join(filename))?;
        Ok(Self::from_document(schema_dir, document, config))
    }

    /// Wrap an already parsed document.
    pub fn from_document(
        schema_dir: impl Into<PathBuf>,
        document: SpecDocument,
        config: AccessorConfig,
    ) -> Self {
        Self {
            schema_dir: schema_dir.into(),
            document,
            resolver: ReferenceResolver::new(config.default_content_type.clone()),
            config,
        }
    }

    pub fn document(&self) -> &SpecDocument {
        &self.document
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    pub fn config(&self) -> &AccessorConfig {
        &self.config
    }

    /// Endpoint paths such as `/articles`, in document order.
    pub fn paths(&self) -> Vec<&str> {
        self.document.paths.keys().map(String::as_str).collect()
    }

    /// Every path with its operations.
    pub fn paths_with_operations(&self) -> &IndexMap<String, OperationsBlock> {
        &self.document.paths
    }

    /// Operations of `path` keyed by HTTP method, or an empty mapping if the
    /// document has no such path.
    pub fn path_with_operations(&self, path: &str) -> &OperationsBlock {
        self.document.paths.get(path).unwrap_or(empty_mapping())
    }

    /// The `requestBody` of an operation, or an empty mapping if it declares
    /// none.
    pub fn request_body<'m>(&self, operation: &'m Mapping) -> &'m Mapping {
        operation
            .get("requestBody")
            .and_then(Value::as_object)
            .unwrap_or(empty_mapping())
    }

    /// First operation of `path` whose `operationId` is `operation_id`.
    pub fn find_operation(&self, path: &str, operation_id: &str) -> Option<&Mapping> {
        self.path_with_operations(path)
            .iter()
            .filter_map(|(method, operation)| {
                log::trace!("scanning {} {}", method, path);
                operation.as_object()
            })
            .find(|operation| {
                operation.get("operationId").and_then(Value::as_str) == Some(operation_id)
            })
    }

    /// Request body schema of the operation `operation_id` on `path`.
    ///
    /// Returns an empty mapping if the operation doesn't exist or has no
    /// request body reference.
    pub fn definition(&self, path: &str, operation_id: &str) -> Result<&Mapping, ResolveError> {
        let Some(operation) = self.find_operation(path, operation_id) else {
            log::debug!("no operation {} on {}", operation_id, path);
            return Ok(empty_mapping());
        };
        self.resolver
            .resolve(&self.document.components, self.request_body(operation))
    }

    /// URI schemas from this document are registered under. A relative
    /// schema directory is taken from the current working directory.
    pub fn base_uri(&self) -> String {
        let dir = if self.schema_dir.is_absolute() {
            self.schema_dir.clone()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&self.schema_dir))
                .unwrap_or_else(|_| self.schema_dir.clone())
        };
        format!("{}{}", self.config.uri_scheme, dir.display())
    }

    /// A storage holding `schema` under [`base_uri`](Self::base_uri), ready to
    /// be handed to a JSON-Schema validator.
    pub fn schema_storage(&self, schema: impl Into<Value>) -> SchemaStorage {
        let mut storage = SchemaStorage::new();
        storage.add_schema(self.base_uri(), schema);
        storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accessor(yaml: &str) -> DocumentAccessor {
        let document = document::from_yaml(yaml).unwrap();
        DocumentAccessor::from_document("/schemas/", document, AccessorConfig::default())
    }

    #[test]
    fn no_paths_key_yields_no_paths() {
        let accessor = accessor("components: {}\n");
        assert!(accessor.paths().is_empty());
        assert!(accessor.paths_with_operations().is_empty());
        assert!(accessor.path_with_operations("/anything").is_empty());
    }

    #[test]
    fn request_body_defaults_to_empty() {
        let accessor = accessor("paths: {}\n");
        let operation: Mapping =
            serde_json::from_str(r#"{"operationId": "x", "requestBody": "oops"}"#).unwrap();
        assert!(accessor.request_body(&operation).is_empty());
        assert!(accessor.request_body(&Mapping::new()).is_empty());
    }

    #[test]
    fn first_matching_operation_wins() {
        let accessor = accessor(
            r#"
paths:
  /things:
    parameters: []
    put:
      operationId: saveThing
      summary: first
    post:
      operationId: saveThing
      summary: second
"#,
        );
        let operation = accessor.find_operation("/things", "saveThing").unwrap();
        assert_eq!(operation["summary"], "first");
        assert!(accessor.find_operation("/things", "deleteThing").is_none());
        assert!(accessor.find_operation("/others", "saveThing").is_none());
    }

    #[test]
    fn operation_without_request_body_has_empty_definition() {
        let accessor = accessor(
            r#"
paths:
  /things:
    get:
      operationId: listThings
"#,
        );
        assert!(accessor.definition("/things", "listThings").unwrap().is_empty());
    }

    #[test]
    fn base_uri_uses_configured_scheme() {
        let document = SpecDocument::default();
        let config = AccessorConfig {
            uri_scheme: "schema://".to_string(),
            ..AccessorConfig::default()
        };
        let accessor = DocumentAccessor::from_document("/srv/schemas/", document, config);
        assert_eq!(accessor.base_uri(), "schema:///srv/schemas/");
    }

    #[test]
    fn base_uri_of_relative_dir_is_absolute() {
        let accessor = DocumentAccessor::from_document(
            "schemas/",
            SpecDocument::default(),
            AccessorConfig::default(),
        );
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            accessor.base_uri(),
            format!("file://{}", cwd.join("schemas/").display())
        );
        assert!(accessor.base_uri().starts_with("file:///"));
    }
}
