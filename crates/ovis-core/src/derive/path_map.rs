use crate::error::{DeriveError, Diagnostic, DiagnosticKind};
use crate::model::{
    ARRAY_SCHEMA_NAME, DataPropertyType, HttpMethod, INLINE_SCHEMA_NAME, SchemaRegistry,
    StrucParameter, StrucPath, StrucSchema,
};
use crate::parse::operation::{Operation, Parameter, ParameterLocation};
use crate::parse::schema::SchemaOrRef;

use super::refs::strip_ref;
use super::schema_map::map_schema;

/// Media types accepted for request bodies, in preference order.
pub const REQUEST_CONTENT_TYPES: [&str; 2] = ["application/json", "application/octet-stream"];

/// Media types accepted for 200 responses, in preference order.
pub const RESPONSE_CONTENT_TYPES: [&str; 4] = [
    "*/*",
    "application/json",
    "application/ld+json",
    "application/hal+json",
];

/// Convert one (path, method, operation) triple into a [`StrucPath`].
///
/// Only a malformed `$ref` is fatal; the caller drops the operation then.
/// Anything else degrades to an unset or free schema plus a diagnostic, so
/// one broken operation never hides the rest of the document.
pub fn operation_to_struc_path(
    path: &str,
    method: HttpMethod,
    operation: &Operation,
    registry: &SchemaRegistry,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<StrucPath, DeriveError> {
    log::debug!("mapping operation {method} {path}");
    let mut struc_path = StrucPath::new(path, method);

    for parameter in &operation.parameters {
        match parameter.location {
            ParameterLocation::Query => struc_path.query_params.push(map_parameter(parameter)),
            ParameterLocation::Path => struc_path.path_params.push(map_parameter(parameter)),
            // Header and cookie parameters play no role in the view model.
            ParameterLocation::Header | ParameterLocation::Cookie => {}
        }
    }

    match method {
        HttpMethod::Post | HttpMethod::Put => {
            struc_path.request_struc_schema =
                bind_request_schema(path, operation, registry, diagnostics)?;
        }
        HttpMethod::Get => {
            struc_path.response_struc_schema =
                bind_response_schema(path, operation, registry, diagnostics)?;
        }
        // DELETE carries neither request nor response schema.
        HttpMethod::Delete => {}
    }

    Ok(struc_path)
}

fn map_parameter(parameter: &Parameter) -> StrucParameter {
    let (param_type, format) = match &parameter.schema {
        Some(SchemaOrRef::Schema(schema)) => (
            schema
                .schema_type
                .as_deref()
                .map(DataPropertyType::from_openapi)
                .unwrap_or(DataPropertyType::Free),
            schema.format.clone(),
        ),
        Some(SchemaOrRef::Ref { .. }) | None => (DataPropertyType::Free, None),
    };
    StrucParameter {
        name: parameter.name.clone(),
        param_type,
        format,
        required: parameter.required,
    }
}

fn bind_request_schema(
    path: &str,
    operation: &Operation,
    registry: &SchemaRegistry,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Option<StrucSchema>, DeriveError> {
    let Some(body) = &operation.request_body else {
        return Ok(None);
    };
    if body.content.is_empty() {
        return Ok(None);
    }

    // First preferred media type that actually carries a schema wins.
    let selected = REQUEST_CONTENT_TYPES
        .iter()
        .find_map(|ct| body.content.get(*ct).and_then(|media| media.schema.as_ref()));

    let Some(schema) = selected else {
        if REQUEST_CONTENT_TYPES
            .iter()
            .any(|ct| body.content.contains_key(*ct))
        {
            // Bare binary uploads land here; nothing to model.
            log::debug!("request body of {path} has no schema");
            return Ok(None);
        }
        log::warn!("request body of {path} offers none of {REQUEST_CONTENT_TYPES:?}");
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::UnknownContentType,
            format!("request body of {path} offers none of the supported media types"),
        ));
        return Ok(Some(StrucSchema::free(INLINE_SCHEMA_NAME)));
    };

    match schema {
        SchemaOrRef::Ref { ref_path } => {
            let name = strip_ref(ref_path)?;
            Ok(lookup_registry(registry, name, path, diagnostics))
        }
        inline => Ok(Some(map_schema(INLINE_SCHEMA_NAME, inline, diagnostics))),
    }
}

fn bind_response_schema(
    path: &str,
    operation: &Operation,
    registry: &SchemaRegistry,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Option<StrucSchema>, DeriveError> {
    let Some(response) = operation.responses.get("200") else {
        log::debug!(
            "GET {path} has no 200 response, only {:?}",
            operation.responses.keys().collect::<Vec<_>>()
        );
        return Ok(None);
    };
    if response.content.is_empty() {
        return Ok(None);
    }

    let Some(media) = RESPONSE_CONTENT_TYPES
        .iter()
        .find_map(|ct| response.content.get(*ct))
    else {
        log::warn!("200 response of {path} offers none of {RESPONSE_CONTENT_TYPES:?}");
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::UnknownContentType,
            format!("200 response of {path} offers none of the supported media types"),
        ));
        return Ok(Some(StrucSchema::free(INLINE_SCHEMA_NAME)));
    };
    let Some(schema) = &media.schema else {
        return Ok(None);
    };

    match schema {
        SchemaOrRef::Ref { ref_path } => {
            let name = strip_ref(ref_path)?;
            Ok(lookup_registry(registry, name, path, diagnostics))
        }
        SchemaOrRef::Schema(inline) if inline.schema_type.as_deref() == Some("array") => {
            match inline.items.as_deref() {
                Some(SchemaOrRef::Ref { ref_path }) => {
                    let name = strip_ref(ref_path)?;
                    Ok(lookup_registry(registry, name, path, diagnostics))
                }
                Some(items @ SchemaOrRef::Schema(_)) => {
                    Ok(Some(map_schema(ARRAY_SCHEMA_NAME, items, diagnostics)))
                }
                None => Ok(Some(map_schema(ARRAY_SCHEMA_NAME, schema, diagnostics))),
            }
        }
        inline => Ok(Some(map_schema(ARRAY_SCHEMA_NAME, inline, diagnostics))),
    }
}

fn lookup_registry(
    registry: &SchemaRegistry,
    name: &str,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<StrucSchema> {
    match registry.get(name) {
        Some(schema) => Some(schema.clone()),
        None => {
            log::warn!("schema {name} referenced by {path} is not in the registry");
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::MissingSchema,
                format!("schema {name} referenced by {path} is missing from the registry"),
            ));
            None
        }
    }
}
