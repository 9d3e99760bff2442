use indexmap::IndexMap;

use crate::config::{DeriveConfig, PAGED_MARKER_MIN};
use crate::error::{Diagnostic, DiagnosticKind};
use crate::model::{
    ARRAY_SCHEMA_NAME, DataPropertyType, StrucItems, StrucProperty, StrucSchema, StrucSchemaKind,
};
use crate::parse::schema::{Schema, SchemaOrRef};

use super::refs::strip_ref;

/// Nesting depth at which inline mapping is cut off and the subtree replaced
/// by a free node. A parsed document is a finite tree, so only pathological
/// input gets anywhere near this.
const MAX_INLINE_DEPTH: usize = 32;

/// Convert one OpenAPI schema node into a derived schema tree.
///
/// References become [`StrucSchemaKind::Ref`] leaves; the target is linked
/// by registry name, never expanded, so cyclic component graphs stay
/// representable.
pub fn map_schema(name: &str, node: &SchemaOrRef, diagnostics: &mut Vec<Diagnostic>) -> StrucSchema {
    map_schema_at(name, node, 0, diagnostics)
}

fn map_schema_at(
    name: &str,
    node: &SchemaOrRef,
    depth: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> StrucSchema {
    if depth > MAX_INLINE_DEPTH {
        log::warn!("inline schema {name} nested past {MAX_INLINE_DEPTH} levels, treating as free");
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::CycleInInlineSchema,
            format!("inline schema {name} nested past {MAX_INLINE_DEPTH} levels"),
        ));
        return StrucSchema::free(name);
    }

    match node {
        SchemaOrRef::Ref { ref_path } => match strip_ref(ref_path) {
            Ok(target) => StrucSchema {
                name: name.to_string(),
                kind: StrucSchemaKind::Ref {
                    target: target.to_string(),
                },
            },
            Err(err) => {
                log::warn!("schema {name}: {err}");
                diagnostics.push(Diagnostic::new(DiagnosticKind::UnsupportedRef, err.to_string()));
                StrucSchema::free(name)
            }
        },
        SchemaOrRef::Schema(schema) => map_inline(name, schema, depth, diagnostics),
    }
}

fn map_inline(
    name: &str,
    schema: &Schema,
    depth: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> StrucSchema {
    let type_name = schema.schema_type.as_deref();

    if type_name == Some("object") || !schema.properties.is_empty() {
        let mut properties = IndexMap::new();
        for (prop_name, prop_node) in &schema.properties {
            let required = schema.required.iter().any(|r| r == prop_name);
            properties.insert(
                prop_name.clone(),
                map_property(prop_name, prop_node, required, depth + 1, diagnostics),
            );
        }
        return StrucSchema {
            name: name.to_string(),
            kind: StrucSchemaKind::Object { properties },
        };
    }

    if type_name == Some("array") {
        let items = match schema.items.as_deref() {
            Some(SchemaOrRef::Ref { ref_path }) => match strip_ref(ref_path) {
                Ok(target) => StrucItems::Named(target.to_string()),
                Err(err) => {
                    log::warn!("array schema {name}: {err}");
                    diagnostics
                        .push(Diagnostic::new(DiagnosticKind::UnsupportedRef, err.to_string()));
                    return StrucSchema::free(name);
                }
            },
            Some(inline @ SchemaOrRef::Schema(_)) => StrucItems::Inline(Box::new(map_schema_at(
                ARRAY_SCHEMA_NAME,
                inline,
                depth + 1,
                diagnostics,
            ))),
            None => StrucItems::Inline(Box::new(StrucSchema::free(ARRAY_SCHEMA_NAME))),
        };
        return StrucSchema {
            name: name.to_string(),
            kind: StrucSchemaKind::Array { items },
        };
    }

    if !schema.enum_values.is_empty() {
        return StrucSchema {
            name: name.to_string(),
            kind: StrucSchemaKind::Enum {
                values: schema.enum_values.clone(),
            },
        };
    }

    if let Some(type_name) = type_name {
        let prop_type = DataPropertyType::from_openapi(type_name);
        if prop_type != DataPropertyType::Free {
            return StrucSchema {
                name: name.to_string(),
                kind: StrucSchemaKind::Primitive {
                    prop_type,
                    format: schema.format.clone(),
                },
            };
        }
    }

    // Empty schema, or only `additionalProperties: true`: accepts any JSON.
    StrucSchema::free(name)
}

fn map_property(
    name: &str,
    node: &SchemaOrRef,
    required: bool,
    depth: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> StrucProperty {
    if let SchemaOrRef::Ref { ref_path } = node {
        return match strip_ref(ref_path) {
            Ok(target) => StrucProperty {
                name: name.to_string(),
                prop_type: DataPropertyType::Ref,
                format: None,
                required,
                nested: None,
                ref_target: Some(target.to_string()),
            },
            Err(err) => {
                log::warn!("property {name}: {err}");
                diagnostics.push(Diagnostic::new(DiagnosticKind::UnsupportedRef, err.to_string()));
                StrucProperty {
                    name: name.to_string(),
                    prop_type: DataPropertyType::Free,
                    format: None,
                    required,
                    nested: None,
                    ref_target: None,
                }
            }
        };
    }

    let mapped = map_schema_at(name, node, depth, diagnostics);
    let prop_type = mapped.prop_type();
    let (format, nested) = match &mapped.kind {
        StrucSchemaKind::Primitive { format, .. } => (format.clone(), None),
        StrucSchemaKind::Object { .. }
        | StrucSchemaKind::Array { .. }
        | StrucSchemaKind::Enum { .. } => (None, Some(Box::new(mapped))),
        StrucSchemaKind::Ref { .. } | StrucSchemaKind::Free => (None, None),
    };

    StrucProperty {
        name: name.to_string(),
        prop_type,
        format,
        required,
        nested,
        ref_target: None,
    }
}

/// True when the schema is a pagination envelope: an object carrying an
/// array-of-refs property plus at least [`PAGED_MARKER_MIN`] of the
/// configured marker keys.
pub fn is_paged_schema(schema: &StrucSchema, config: &DeriveConfig) -> bool {
    paged_schema_name(schema).is_some() && marker_count(schema, config) >= PAGED_MARKER_MIN
}

/// Registry name of the rows inside a pagination envelope: the ref target
/// of the envelope's array property.
pub fn paged_schema_name(schema: &StrucSchema) -> Option<&str> {
    let properties = schema.properties()?;
    properties.values().find_map(|property| {
        let nested = property.nested.as_deref()?;
        match &nested.kind {
            StrucSchemaKind::Array {
                items: StrucItems::Named(target),
            } => Some(target.as_str()),
            _ => None,
        }
    })
}

fn marker_count(schema: &StrucSchema, config: &DeriveConfig) -> usize {
    let Some(properties) = schema.properties() else {
        return 0;
    };
    config
        .paged_marker_keys
        .iter()
        .filter(|key| properties.contains_key(key.as_str()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline(yaml: &str) -> SchemaOrRef {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    fn map(name: &str, yaml: &str) -> StrucSchema {
        let mut diagnostics = Vec::new();
        let schema = map_schema(name, &inline(yaml), &mut diagnostics);
        assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
        schema
    }

    #[test]
    fn maps_object_with_required_flags() {
        let schema = map(
            "Pet",
            r#"
type: object
required: [name]
properties:
  id:
    type: integer
    format: int64
  name:
    type: string
"#,
        );
        let properties = schema.properties().unwrap();
        assert_eq!(
            properties.keys().collect::<Vec<_>>(),
            ["id", "name"],
            "declaration order preserved"
        );
        assert!(!properties["id"].required);
        assert_eq!(properties["id"].format.as_deref(), Some("int64"));
        assert!(properties["name"].required);
        assert_eq!(properties["name"].prop_type, DataPropertyType::String);
    }

    #[test]
    fn maps_ref_without_recursing() {
        let schema = map("owner", "$ref: \"#/components/schemas/Owner\"");
        assert_eq!(schema.ref_target(), Some("Owner"));
    }

    #[test]
    fn maps_array_of_refs_by_name() {
        let schema = map(
            "pets",
            r##"
type: array
items:
  $ref: "#/components/schemas/Pet"
"##,
        );
        match schema.kind {
            StrucSchemaKind::Array {
                items: StrucItems::Named(target),
            } => assert_eq!(target, "Pet"),
            other => panic!("expected named array items, got {other:?}"),
        }
    }

    #[test]
    fn maps_enum_preserving_value_order() {
        let schema = map("status", "type: string\nenum: [available, pending, sold]");
        match &schema.kind {
            StrucSchemaKind::Enum { values } => {
                let names: Vec<_> = values.iter().map(|v| v.as_str().unwrap()).collect();
                assert_eq!(names, ["available", "pending", "sold"]);
            }
            other => panic!("expected enum, got {other:?}"),
        }
    }

    #[test]
    fn number_maps_to_double() {
        let schema = map("price", "type: number");
        assert_eq!(schema.prop_type(), DataPropertyType::Double);
    }

    #[test]
    fn unconstrained_schema_is_free() {
        assert!(map("anything", "{}").is_free());
        assert!(map("anything", "additionalProperties: true").is_free());
    }

    #[test]
    fn foreign_ref_degrades_to_free_with_diagnostic() {
        let mut diagnostics = Vec::new();
        let schema = map_schema(
            "legacy",
            &inline("$ref: \"#/definitions/Pet\""),
            &mut diagnostics,
        );
        assert!(schema.is_free());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UnsupportedRef);
    }

    fn page_schema(markers: &str) -> StrucSchema {
        map(
            "PageArtifact",
            &format!(
                r##"
type: object
properties:
  content:
    type: array
    items:
      $ref: "#/components/schemas/Artifact"
{markers}
"##
            ),
        )
    }

    #[test]
    fn two_markers_make_a_paged_schema() {
        let config = DeriveConfig::default();
        let paged = page_schema("  totalElements: {type: integer}\n  size: {type: integer}");
        assert!(is_paged_schema(&paged, &config));
        assert_eq!(paged_schema_name(&paged), Some("Artifact"));
    }

    #[test]
    fn one_marker_is_not_enough() {
        let config = DeriveConfig::default();
        let not_paged = page_schema("  totalElements: {type: integer}");
        assert!(!is_paged_schema(&not_paged, &config));
    }

    #[test]
    fn marker_keys_are_configurable() {
        let config = DeriveConfig {
            paged_marker_keys: vec!["count".to_string(), "pages".to_string()],
            ..DeriveConfig::default()
        };
        let paged = page_schema("  count: {type: integer}\n  pages: {type: integer}");
        assert!(is_paged_schema(&paged, &config));
        assert!(!is_paged_schema(
            &page_schema("  totalElements: {type: integer}\n  size: {type: integer}"),
            &config
        ));
    }

    #[test]
    fn paged_detection_requires_an_array_of_refs() {
        let config = DeriveConfig::default();
        let schema = map(
            "NotPaged",
            r#"
type: object
properties:
  content:
    type: array
    items:
      type: string
  totalElements: {type: integer}
  size: {type: integer}
"#,
        );
        assert!(!is_paged_schema(&schema, &config));
    }
}
