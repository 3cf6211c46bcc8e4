use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("reference target not found: {reference} (no entry in components.{section})")]
    RefTargetNotFound {
        reference: String,
        section: &'static str,
    },

    #[error("request body {reference} has no content for {content_type}")]
    MissingContentType {
        reference: String,
        content_type: String,
    },

    #[error("request body {reference} has no schema $ref for {content_type}")]
    MissingSchemaRef {
        reference: String,
        content_type: String,
    },

    #[error("expected {expected} at {location}, found {found}")]
    UnexpectedType {
        location: String,
        expected: &'static str,
        found: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to compile schema {reference}: {message}")]
    Compile { reference: String, message: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}
