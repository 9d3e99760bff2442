use indexmap::IndexMap;
use regex::Regex;

use crate::error::{Diagnostic, DiagnosticKind};
use crate::model::{HttpMethod, PathMap, SchemaRegistry};
use crate::parse::operation::{Operation, PathItem};

use super::path_map::operation_to_struc_path;

/// Collect every operation carrying `tag` into a path → method map.
pub fn paths_for_tag(
    tag: &str,
    paths: &IndexMap<String, PathItem>,
    registry: &SchemaRegistry,
    diagnostics: &mut Vec<Diagnostic>,
) -> PathMap {
    collect_paths(paths, registry, diagnostics, |operation| {
        operation.tags.iter().any(|t| t == tag)
    })
}

/// Collect every operation that declares no tag at all.
pub fn paths_without_tag(
    paths: &IndexMap<String, PathItem>,
    registry: &SchemaRegistry,
    diagnostics: &mut Vec<Diagnostic>,
) -> PathMap {
    collect_paths(paths, registry, diagnostics, |operation| {
        operation.tags.is_empty()
    })
}

fn collect_paths(
    paths: &IndexMap<String, PathItem>,
    registry: &SchemaRegistry,
    diagnostics: &mut Vec<Diagnostic>,
    mut keep: impl FnMut(&Operation) -> bool,
) -> PathMap {
    let mut path_map = PathMap::new();
    for (path, item) in paths {
        let mut method_map = IndexMap::new();
        for (method, operation) in declared_operations(item) {
            if !keep(operation) {
                continue;
            }
            match operation_to_struc_path(path, method, operation, registry, diagnostics) {
                Ok(struc_path) => {
                    method_map.insert(method, struc_path);
                }
                Err(err) => {
                    log::warn!("dropping {method} {path}: {err}");
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::UnsupportedRef,
                        format!("dropping {method} {path}: {err}"),
                    ));
                }
            }
        }
        if !method_map.is_empty() {
            path_map.insert(path.clone(), method_map);
        }
    }
    path_map
}

fn declared_operations(item: &PathItem) -> impl Iterator<Item = (HttpMethod, &Operation)> {
    [
        (HttpMethod::Get, item.get.as_ref()),
        (HttpMethod::Post, item.post.as_ref()),
        (HttpMethod::Put, item.put.as_ref()),
        (HttpMethod::Delete, item.delete.as_ref()),
    ]
    .into_iter()
    .filter_map(|(method, operation)| operation.map(|operation| (method, operation)))
}

/// Paths that can anchor a master view: no `{…}` segment, GET defined, and
/// the GET has a response schema.
pub fn primary_paths(path_map: &PathMap) -> Vec<String> {
    let mut primaries = Vec::new();
    for (path, methods) in path_map {
        if path.contains('{') {
            continue;
        }
        let Some(get) = methods.get(&HttpMethod::Get) else {
            continue;
        };
        if get.response_struc_schema.is_some() {
            log::debug!("detected primary path {path}");
            primaries.push(path.clone());
        }
    }
    primaries
}

/// The single-item detail endpoint for each primary: the primary template
/// plus exactly one `{…}` segment, optionally a trailing slash. The first
/// candidate wins; further ones are reported as ambiguous.
pub fn secondary_paths(
    path_map: &PathMap,
    primaries: &[String],
    diagnostics: &mut Vec<Diagnostic>,
) -> IndexMap<String, String> {
    let mut secondaries: IndexMap<String, String> = IndexMap::new();
    for primary in primaries {
        let pattern = detail_pattern(primary);
        for path in path_map.keys() {
            if !pattern.is_match(path) {
                continue;
            }
            match secondaries.get(primary) {
                Some(existing) => {
                    log::warn!(
                        "primary {primary} has detail candidates {existing} and {path}, keeping {existing}"
                    );
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::AmbiguousSecondary,
                        format!(
                            "primary {primary} has detail candidates {existing} and {path}, keeping {existing}"
                        ),
                    ));
                }
                None => {
                    log::debug!("detail path {path} found for primary {primary}");
                    secondaries.insert(primary.clone(), path.clone());
                }
            }
        }
    }
    secondaries
}

/// Sub-resource endpoints with a GET under a primary's item segment, keyed
/// by primary.
pub fn relation_paths(path_map: &PathMap, primaries: &[String]) -> IndexMap<String, Vec<String>> {
    let mut relations: IndexMap<String, Vec<String>> = IndexMap::new();
    for primary in primaries {
        let pattern = relation_pattern(primary);
        for (path, methods) in path_map {
            if pattern.is_match(path) && methods.contains_key(&HttpMethod::Get) {
                log::debug!("relation path {path} found for primary {primary}");
                relations.entry(primary.clone()).or_default().push(path.clone());
            }
        }
    }
    relations
}

/// Relation paths that qualify as primaries in their own right: their GET
/// carries a response schema and no parameter follows the sub-resource
/// segment. These seed nested master-detail views.
pub fn internal_primary_paths(
    path_map: &PathMap,
    relations: &IndexMap<String, Vec<String>>,
) -> IndexMap<String, Vec<String>> {
    let mut internal: IndexMap<String, Vec<String>> = IndexMap::new();
    for (primary, paths) in relations {
        for path in paths {
            let Some(get) = path_map.get(path).and_then(|m| m.get(&HttpMethod::Get)) else {
                continue;
            };
            if get.response_struc_schema.is_some() {
                internal.entry(primary.clone()).or_default().push(path.clone());
            }
        }
    }
    internal
}

fn detail_pattern(primary: &str) -> Regex {
    let base = regex::escape(primary.trim_end_matches('/'));
    Regex::new(&format!(r"^{base}/\{{\w+\}}/?$")).expect("detail pattern is valid")
}

fn relation_pattern(primary: &str) -> Regex {
    let base = regex::escape(primary.trim_end_matches('/'));
    Regex::new(&format!(r"^{base}/\{{\w+\}}/\w+/?$")).expect("relation pattern is valid")
}
