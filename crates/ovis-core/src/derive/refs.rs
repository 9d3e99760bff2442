use std::collections::HashSet;

use crate::error::DeriveError;
use crate::model::{SchemaRegistry, StrucItems, StrucSchema, StrucSchemaKind};

/// Prefix required on local schema references.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Extract the schema name from a `$ref` pointer.
///
/// Accepts `#/components/schemas/Name` pointers and bare names that were
/// stripped already (which makes the function idempotent). Any other
/// pointer-shaped input is rejected: only local component schemas can be
/// linked by name.
pub fn strip_ref(ref_path: &str) -> Result<&str, DeriveError> {
    if let Some(name) = ref_path.strip_prefix(SCHEMA_REF_PREFIX) {
        if name.is_empty() || name.contains('/') {
            return Err(DeriveError::UnsupportedRef(ref_path.to_string()));
        }
        return Ok(name);
    }
    if ref_path.contains('/') || ref_path.starts_with('#') {
        return Err(DeriveError::UnsupportedRef(ref_path.to_string()));
    }
    Ok(ref_path)
}

/// Collect the registry slice reachable from the given root schemas,
/// preserving registry order. Cycles terminate because each name is
/// expanded at most once.
pub fn reachable_schemas<'a, I>(registry: &SchemaRegistry, roots: I) -> SchemaRegistry
where
    I: IntoIterator<Item = &'a StrucSchema>,
{
    fn enqueue(name: &str, seen: &mut HashSet<String>, queue: &mut Vec<String>) {
        if seen.insert(name.to_string()) {
            queue.push(name.to_string());
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: Vec<String> = Vec::new();

    for root in roots {
        if registry.contains_key(&root.name) {
            enqueue(&root.name, &mut seen, &mut queue);
        }
        collect_ref_names(root, &mut |name| enqueue(name, &mut seen, &mut queue));
    }

    while let Some(name) = queue.pop() {
        if let Some(schema) = registry.get(&name) {
            let mut found = Vec::new();
            collect_ref_names(schema, &mut |n| found.push(n.to_string()));
            for n in found {
                if seen.insert(n.clone()) {
                    queue.push(n);
                }
            }
        }
    }

    registry
        .iter()
        .filter(|(name, _)| seen.contains(name.as_str()))
        .map(|(name, schema)| (name.clone(), schema.clone()))
        .collect()
}

/// Walk one schema tree and report every registry name it mentions.
/// Stops at references; targets are reported, never expanded.
fn collect_ref_names(schema: &StrucSchema, sink: &mut impl FnMut(&str)) {
    match &schema.kind {
        StrucSchemaKind::Ref { target } => sink(target),
        StrucSchemaKind::Object { properties } => {
            for property in properties.values() {
                if let Some(target) = &property.ref_target {
                    sink(target);
                }
                if let Some(nested) = &property.nested {
                    collect_ref_names(nested, sink);
                }
            }
        }
        StrucSchemaKind::Array { items } => match items {
            StrucItems::Named(name) => sink(name),
            StrucItems::Inline(inner) => collect_ref_names(inner, sink),
        },
        StrucSchemaKind::Enum { .. } | StrucSchemaKind::Primitive { .. } | StrucSchemaKind::Free => {
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use crate::model::{DataPropertyType, StrucProperty};

    #[test]
    fn strips_component_schema_refs() {
        assert_eq!(strip_ref("#/components/schemas/Pet").unwrap(), "Pet");
    }

    #[test]
    fn bare_names_pass_through() {
        assert_eq!(strip_ref("Pet").unwrap(), "Pet");
    }

    #[test]
    fn stripping_is_idempotent() {
        let once = strip_ref("#/components/schemas/Order").unwrap();
        assert_eq!(strip_ref(once).unwrap(), once);
    }

    #[test]
    fn rejects_foreign_pointers() {
        for bad in [
            "#/definitions/Pet",
            "#/components/responses/NotFound",
            "other.yaml#/components/schemas/Pet",
            "#Pet",
        ] {
            assert!(strip_ref(bad).is_err(), "{bad} should be rejected");
        }
    }

    fn ref_schema(name: &str, target: &str) -> StrucSchema {
        StrucSchema {
            name: name.to_string(),
            kind: StrucSchemaKind::Ref {
                target: target.to_string(),
            },
        }
    }

    #[test]
    fn reachability_follows_property_refs_transitively() {
        let mut registry = SchemaRegistry::new();
        let mut properties = IndexMap::new();
        properties.insert(
            "owner".to_string(),
            StrucProperty {
                name: "owner".to_string(),
                prop_type: DataPropertyType::Ref,
                format: None,
                required: false,
                nested: None,
                ref_target: Some("Owner".to_string()),
            },
        );
        registry.insert(
            "Pet".to_string(),
            StrucSchema {
                name: "Pet".to_string(),
                kind: StrucSchemaKind::Object { properties },
            },
        );
        registry.insert("Owner".to_string(), StrucSchema::free("Owner"));
        registry.insert("Unrelated".to_string(), StrucSchema::free("Unrelated"));

        let root = ref_schema("noName", "Pet");
        let slice = reachable_schemas(&registry, [&root]);
        assert!(slice.contains_key("Pet"));
        assert!(slice.contains_key("Owner"));
        assert!(!slice.contains_key("Unrelated"));
    }

    #[test]
    fn reachability_terminates_on_cycles() {
        let mut registry = SchemaRegistry::new();
        registry.insert("A".to_string(), ref_schema("A", "B"));
        registry.insert("B".to_string(), ref_schema("B", "A"));

        let root = ref_schema("noName", "A");
        let slice = reachable_schemas(&registry, [&root]);
        assert_eq!(slice.len(), 2);
    }
}
