//! Per-backend binding tables for document/field primitives.

use std::collections::BTreeMap;

use crate::error::{Result, SchemaError};
use crate::fields::DslField;

use super::DslBackend;

/// Identity of a primitive class within its namespace.
pub type ClassId = u32;

/// Handle to a document/field primitive class resolved from a namespace.
///
/// Equality is full identity (backend + id + name); the name alone is kept
/// for the string-table fallback used when an identity lookup misses (e.g.
/// a wrapping subclass).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldClass {
    pub backend: DslBackend,
    pub id: ClassId,
    pub name: String,
}

/// Uniform attribute surface over one resolved backend.
///
/// Each backend family gets an explicit binding table instead of dynamic
/// attribute forwarding: the primary table holds the document-module
/// members; for the family that keeps field primitives in a separate
/// sub-module (OpenSearch), lookups fall back to a secondary table before
/// failing with a typed error.
#[derive(Debug, Clone)]
pub struct DslNamespace {
    backend: DslBackend,
    primary: BTreeMap<String, FieldClass>,
    secondary: BTreeMap<String, FieldClass>,
}

impl DslNamespace {
    pub(crate) fn bind(
        backend: DslBackend,
        primary_members: &[&str],
        secondary_members: &[&str],
    ) -> Self {
        let mut next_id: ClassId = 0;
        let mut assign = |names: &[&str]| {
            names
                .iter()
                .map(|name| {
                    let class = FieldClass {
                        backend,
                        id: next_id,
                        name: (*name).to_string(),
                    };
                    next_id += 1;
                    ((*name).to_string(), class)
                })
                .collect::<BTreeMap<_, _>>()
        };
        let primary = assign(primary_members);
        let secondary = assign(secondary_members);
        Self {
            backend,
            primary,
            secondary,
        }
    }

    pub fn backend(&self) -> DslBackend {
        self.backend
    }

    /// Resolve a primitive by name, primary table first.
    pub fn lookup(&self, name: &str) -> Result<FieldClass> {
        self.primary
            .get(name)
            .or_else(|| self.secondary.get(name))
            .cloned()
            .ok_or_else(|| SchemaError::UnknownPrimitive {
                backend: self.backend,
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.primary.contains_key(name) || self.secondary.contains_key(name)
    }

    /// The Document base class.
    pub fn document_class(&self) -> Result<FieldClass> {
        self.lookup("Document")
    }

    /// The base class for embedding one document inside another.
    ///
    /// Named differently across backend families; the documented alternate
    /// name is tried before failing.
    pub fn inner_doc_class(&self) -> Result<FieldClass> {
        self.lookup("InnerDoc").or_else(|_| self.lookup("InnerObject"))
    }

    /// Construct a declarative field instance of the named primitive.
    pub fn field(&self, name: &str) -> Result<DslField> {
        Ok(DslField::new(self.lookup(name)?))
    }
}
