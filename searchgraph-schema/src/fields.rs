//! Declarative field instances, document schemas and type declarations.
//!
//! The original design stamped metadata onto live classes; here every piece
//! of metadata is an explicit, builder-constructed value: a
//! [`DocumentSchema`] holds the declared field mapping, a [`TypeDecl`]
//! holds the caller's annotations and custom-field side-table, and
//! [`merge_fields`] overlays the two at schema-build time instead of
//! mutating anything.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::dsl::{DslBackend, FieldClass};
use crate::types::GraphType;

/// A declarative field instance: a primitive class plus its options.
///
/// Options are an open map because they come from whichever backend
/// package is in use; the well-known flags have a public name and a
/// backend-internal fallback name read in that order.
#[derive(Debug, Clone)]
pub struct DslField {
    pub class: FieldClass,
    pub options: Map<String, Value>,
    /// Sub-schema for object/nested fields.
    pub properties: Option<BTreeMap<String, DslField>>,
}

impl DslField {
    pub fn new(class: FieldClass) -> Self {
        Self {
            class,
            options: Map::new(),
            properties: None,
        }
    }

    pub fn multi(mut self, multi: bool) -> Self {
        self.options.insert("multi".to_string(), Value::Bool(multi));
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.options
            .insert("required".to_string(), Value::Bool(required));
        self
    }

    pub fn with_option(mut self, key: &str, value: Value) -> Self {
        self.options.insert(key.to_string(), value);
        self
    }

    pub fn with_properties(mut self, properties: BTreeMap<String, DslField>) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Whether the field is multi-valued; `multi` first, then the
    /// backend-internal `_multi`.
    pub fn is_multi(&self) -> bool {
        self.bool_option("multi", "_multi")
    }

    /// Whether the field must be present; `required` first, then the
    /// backend-internal `_required`.
    pub fn is_required(&self) -> bool {
        self.bool_option("required", "_required")
    }

    fn bool_option(&self, primary: &str, fallback: &str) -> bool {
        self.options
            .get(primary)
            .or_else(|| self.options.get(fallback))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// A declared document class: name, owning backend, optional index name,
/// and the field mapping.
#[derive(Debug, Clone)]
pub struct DocumentSchema {
    pub name: String,
    pub backend: DslBackend,
    pub index: Option<String>,
    pub mapping: BTreeMap<String, DslField>,
}

impl DocumentSchema {
    pub fn builder(name: &str, backend: DslBackend) -> DocumentSchemaBuilder {
        DocumentSchemaBuilder {
            name: name.to_string(),
            backend,
            index: None,
            mapping: BTreeMap::new(),
        }
    }
}

pub struct DocumentSchemaBuilder {
    name: String,
    backend: DslBackend,
    index: Option<String>,
    mapping: BTreeMap<String, DslField>,
}

impl DocumentSchemaBuilder {
    pub fn index(mut self, index: &str) -> Self {
        self.index = Some(index.to_string());
        self
    }

    pub fn field(mut self, name: &str, field: DslField) -> Self {
        self.mapping.insert(name.to_string(), field);
        self
    }

    pub fn build(self) -> Arc<DocumentSchema> {
        Arc::new(DocumentSchema {
            name: self.name,
            backend: self.backend,
            index: self.index,
            mapping: self.mapping,
        })
    }
}

/// How a custom field is backed on the declaring type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomFieldKind {
    Method,
    Property,
}

/// A caller-declared, non-generated field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomField {
    pub kind: CustomFieldKind,
}

/// A type declaration under inspection: optionally backed by a document
/// schema, with caller annotations and explicitly registered custom
/// fields. Immutable once built.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    pub document: Option<Arc<DocumentSchema>>,
    pub annotations: BTreeMap<String, GraphType>,
    pub custom_fields: BTreeMap<String, CustomField>,
}

impl TypeDecl {
    pub fn builder(name: &str) -> TypeDeclBuilder {
        TypeDeclBuilder {
            name: name.to_string(),
            document: None,
            annotations: BTreeMap::new(),
            custom_fields: BTreeMap::new(),
        }
    }
}

pub struct TypeDeclBuilder {
    name: String,
    document: Option<Arc<DocumentSchema>>,
    annotations: BTreeMap<String, GraphType>,
    custom_fields: BTreeMap<String, CustomField>,
}

impl TypeDeclBuilder {
    pub fn document(mut self, document: Arc<DocumentSchema>) -> Self {
        self.document = Some(document);
        self
    }

    pub fn annotate(mut self, name: &str, graph_type: GraphType) -> Self {
        self.annotations.insert(name.to_string(), graph_type);
        self
    }

    pub fn custom_field(mut self, name: &str, kind: CustomFieldKind) -> Self {
        self.custom_fields
            .insert(name.to_string(), CustomField { kind });
        self
    }

    pub fn build(self) -> TypeDecl {
        TypeDecl {
            name: self.name,
            document: self.document,
            annotations: self.annotations,
            custom_fields: self.custom_fields,
        }
    }
}

/// Overlay generated field types with the caller's declared ones.
///
/// Declared entries win, so a caller can override one generated field's
/// shape without losing the rest. Returns a new map; nothing is mutated.
pub fn merge_fields(
    generated: BTreeMap<String, GraphType>,
    declared: &BTreeMap<String, GraphType>,
) -> BTreeMap<String, GraphType> {
    let mut merged = generated;
    for (name, graph_type) in declared {
        merged.insert(name.clone(), *graph_type);
    }
    merged
}
