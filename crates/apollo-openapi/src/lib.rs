//! Read-only access to an OpenAPI document's paths and operations, and
//! resolution of an operation's request body down to its JSON-Schema.

pub mod accessor;
pub mod config;
pub mod document;
pub mod error;
pub mod resolve;
pub mod storage;

pub use accessor::DocumentAccessor;
pub use config::AccessorConfig;
pub use document::{Components, Mapping, OperationsBlock, SpecDocument};
pub use error::{ConfigError, LoadError, ResolveError, SchemaError};
pub use resolve::{DEFAULT_CONTENT_TYPE, ReferenceResolver};
pub use storage::SchemaStorage;
