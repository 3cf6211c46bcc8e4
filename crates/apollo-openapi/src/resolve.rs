use std::borrow::Cow;

use serde_json::Value;

use crate::document::{Components, Mapping, empty_mapping, value_kind};
use crate::error::ResolveError;

/// Media type whose schema is used when resolving a request body.
pub const DEFAULT_CONTENT_TYPE: &str = "application/hal+json";

/// Resolves an operation's request body reference to the schema declared for
/// one content type:
///
/// `requestBody.$ref` → `components.requestBodies.<name>`
/// → `content.<content type>.schema.$ref` → `components.schemas.<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceResolver {
    content_type: String,
}

impl Default for ReferenceResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_TYPE)
    }
}

impl ReferenceResolver {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
        }
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Resolve `request_body` against `components`.
    ///
    /// A request body without a `$ref` (missing, null or empty) resolves to an
    /// empty mapping. A reference that names something absent from
    /// `components` is an error.
    pub fn resolve<'a>(
        &self,
        components: &'a Components,
        request_body: &Mapping,
    ) -> Result<&'a Mapping, ResolveError> {
        let reference = match request_body.get("$ref") {
            None | Some(Value::Null) => return Ok(empty_mapping()),
            Some(Value::String(r)) if r.is_empty() => return Ok(empty_mapping()),
            Some(Value::String(r)) => r.as_str(),
            Some(other) => {
                return Err(ResolveError::UnexpectedType {
                    location: "requestBody.$ref".to_string(),
                    expected: "string",
                    found: value_kind(other),
                });
            }
        };

        log::debug!(
            "resolving request body {} for {}",
            reference,
            self.content_type
        );
        let definition = lookup(&components.request_bodies, reference, "requestBodies")?;
        let schema_ref = self.schema_ref(reference, definition)?;
        let schema = lookup(&components.schemas, schema_ref, "schemas")?;

        schema
            .as_object()
            .ok_or_else(|| ResolveError::UnexpectedType {
                location: schema_ref.to_string(),
                expected: "mapping",
                found: value_kind(schema),
            })
    }

    fn schema_ref<'a>(
        &self,
        reference: &str,
        definition: &'a Value,
    ) -> Result<&'a str, ResolveError> {
        let media_type = definition
            .get("content")
            .and_then(|content| content.get(&self.content_type))
            .ok_or_else(|| ResolveError::MissingContentType {
                reference: reference.to_string(),
                content_type: self.content_type.clone(),
            })?;

        media_type
            .get("schema")
            .and_then(|schema| schema.get("$ref"))
            .and_then(Value::as_str)
            .ok_or_else(|| ResolveError::MissingSchemaRef {
                reference: reference.to_string(),
                content_type: self.content_type.clone(),
            })
    }
}

fn lookup<'a>(
    definitions: &'a Mapping,
    reference: &str,
    section: &'static str,
) -> Result<&'a Value, ResolveError> {
    definitions
        .get(ref_name(reference).as_ref())
        .ok_or_else(|| ResolveError::RefTargetNotFound {
            reference: reference.to_string(),
            section,
        })
}

/// Last segment of a `$ref` such as `#/components/schemas/Foo`, with JSON
/// pointer escapes decoded.
fn ref_name(reference: &str) -> Cow<'_, str> {
    let name = reference.rsplit('/').next().unwrap_or(reference);
    if name.contains('~') {
        Cow::Owned(name.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(name)
    }
}
