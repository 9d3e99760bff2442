use indexmap::IndexMap;

/// Name given to inline schemas that have no registry entry.
pub const INLINE_SCHEMA_NAME: &str = "noName";

/// Name given to synthesized wrappers around inline response elements.
pub const ARRAY_SCHEMA_NAME: &str = "Array";

/// Schema name → derived schema, insertion order = declaration order.
/// Populated once per document, before any path is mapped.
pub type SchemaRegistry = IndexMap<String, StrucSchema>;

/// Classification of a schema node or property, as handed to the renderer.
/// Widget selection from it is the renderer's problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataPropertyType {
    Object,
    Array,
    String,
    Integer,
    Double,
    Boolean,
    Enum,
    Ref,
    Free,
}

impl DataPropertyType {
    /// Map an OpenAPI `type` keyword onto the renderer classification.
    /// Unknown keywords fall back to [`DataPropertyType::Free`].
    pub fn from_openapi(type_name: &str) -> Self {
        match type_name {
            "object" => Self::Object,
            "array" => Self::Array,
            "string" => Self::String,
            "integer" => Self::Integer,
            "number" => Self::Double,
            "boolean" => Self::Boolean,
            _ => Self::Free,
        }
    }
}

/// A node in the derived schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct StrucSchema {
    pub name: String,
    pub kind: StrucSchemaKind,
}

/// What a schema node is. One shape per node; references stay references
/// (the schema graph may be cyclic, so walkers stop at [`StrucSchemaKind::Ref`]
/// and look the target up by name instead of expanding it).
#[derive(Debug, Clone, PartialEq)]
pub enum StrucSchemaKind {
    Object {
        properties: IndexMap<String, StrucProperty>,
    },
    Array {
        items: StrucItems,
    },
    Enum {
        /// Declared values, order preserved.
        values: Vec<serde_json::Value>,
    },
    Primitive {
        prop_type: DataPropertyType,
        format: Option<String>,
    },
    Ref {
        target: String,
    },
    /// Unconstrained: accepts any JSON.
    Free,
}

/// Array element: a registry name or an inline element schema.
#[derive(Debug, Clone, PartialEq)]
pub enum StrucItems {
    Named(String),
    Inline(Box<StrucSchema>),
}

/// One property of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct StrucProperty {
    pub name: String,
    pub prop_type: DataPropertyType,
    pub format: Option<String>,
    pub required: bool,
    /// Inline object, array, or enum schema backing this property.
    pub nested: Option<Box<StrucSchema>>,
    /// Registry name for reference-typed properties.
    pub ref_target: Option<String>,
}

impl StrucSchema {
    /// An unconstrained schema under the given name.
    pub fn free(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StrucSchemaKind::Free,
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self.kind, StrucSchemaKind::Free)
    }

    /// The property map, for object schemas.
    pub fn properties(&self) -> Option<&IndexMap<String, StrucProperty>> {
        match &self.kind {
            StrucSchemaKind::Object { properties } => Some(properties),
            _ => None,
        }
    }

    /// The registry name this node points at, for reference schemas.
    pub fn ref_target(&self) -> Option<&str> {
        match &self.kind {
            StrucSchemaKind::Ref { target } => Some(target),
            _ => None,
        }
    }

    /// The renderer classification of this node.
    pub fn prop_type(&self) -> DataPropertyType {
        match &self.kind {
            StrucSchemaKind::Object { .. } => DataPropertyType::Object,
            StrucSchemaKind::Array { .. } => DataPropertyType::Array,
            StrucSchemaKind::Enum { .. } => DataPropertyType::Enum,
            StrucSchemaKind::Primitive { prop_type, .. } => *prop_type,
            StrucSchemaKind::Ref { .. } => DataPropertyType::Ref,
            StrucSchemaKind::Free => DataPropertyType::Free,
        }
    }
}
