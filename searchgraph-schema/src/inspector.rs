//! Classifies type declarations by their field-generation strategy.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::dsl::DslResolver;
use crate::fields::{DocumentSchema, TypeDecl};

/// Primary source of a declared type's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSource {
    /// Backed by a recognized document class; fields come from its mapping.
    Document,
    /// No static information; fields come from live index introspection.
    Mapping,
    /// Fields come from the caller's own type annotations.
    Hints,
    /// A document class carrying extra annotations or custom fields.
    Hybrid,
}

/// Per-inspection record for one declared type.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub source: TypeSource,
    pub document: Option<Arc<DocumentSchema>>,
    pub index_name: Option<String>,
    pub has_type_hints: bool,
    /// Names of caller-marked custom fields. `None` when nothing is
    /// marked, distinct from an empty set, so callers can tell "none
    /// declared" apart from "declared but filtered out".
    pub custom_fields: Option<BTreeSet<String>>,
}

/// Determines how fields should be generated for a declared type.
///
/// Every inspection is computed fresh from the declaration passed in;
/// nothing is cached across calls, since declarations can be rebuilt
/// between schema constructions.
pub struct TypeInspector<'a> {
    resolver: &'a DslResolver,
}

impl<'a> TypeInspector<'a> {
    pub fn new(resolver: &'a DslResolver) -> Self {
        Self { resolver }
    }

    pub fn inspect(&self, decl: &TypeDecl) -> TypeInfo {
        let has_hints = has_type_hints(decl);
        let custom = custom_field_names(decl);

        if let Some(document) = self.recognized_document(decl) {
            let source = if has_hints || custom.is_some() {
                TypeSource::Hybrid
            } else {
                TypeSource::Document
            };
            return TypeInfo {
                source,
                index_name: document.index.clone(),
                document: Some(document),
                has_type_hints: has_hints,
                custom_fields: custom,
            };
        }

        if has_hints {
            return TypeInfo {
                source: TypeSource::Hints,
                document: None,
                index_name: None,
                has_type_hints: true,
                custom_fields: custom,
            };
        }

        TypeInfo {
            source: TypeSource::Mapping,
            document: None,
            index_name: None,
            has_type_hints: false,
            custom_fields: custom,
        }
    }

    /// The declaration's document schema, if one is attached and belongs
    /// to the resolved backend. A schema from a different backend family
    /// is not recognized and the declaration falls through to the
    /// hints/mapping paths.
    fn recognized_document(&self, decl: &TypeDecl) -> Option<Arc<DocumentSchema>> {
        let document = decl.document.as_ref()?;
        if self.resolver.backend() != Some(document.backend) {
            return None;
        }
        Some(Arc::clone(document))
    }
}

fn has_type_hints(decl: &TypeDecl) -> bool {
    decl.annotations.keys().any(|name| !name.starts_with('_'))
}

fn custom_field_names(decl: &TypeDecl) -> Option<BTreeSet<String>> {
    let names: BTreeSet<String> = decl
        .custom_fields
        .keys()
        .filter(|name| !name.starts_with('_'))
        .cloned()
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::{DslBackend, ProviderCandidate};
    use crate::fields::CustomFieldKind;
    use crate::types::{GraphScalar, GraphType};

    fn resolver() -> DslResolver {
        DslResolver::with_candidates(vec![ProviderCandidate {
            backend: DslBackend::ElasticsearchDsl,
            available: true,
        }])
    }

    fn document(resolver: &DslResolver) -> Arc<DocumentSchema> {
        let namespace = resolver.namespace().unwrap();
        DocumentSchema::builder("Article", namespace.backend())
            .index("articles")
            .field("title", namespace.field("Text").unwrap())
            .build()
    }

    #[test]
    fn test_plain_class_classifies_as_mapping() {
        let resolver = resolver();
        let inspector = TypeInspector::new(&resolver);
        let info = inspector.inspect(&TypeDecl::builder("Opaque").build());
        assert_eq!(info.source, TypeSource::Mapping);
        assert!(info.document.is_none());
        assert!(!info.has_type_hints);
        assert!(info.custom_fields.is_none());
    }

    #[test]
    fn test_one_annotation_reclassifies_as_hints() {
        let resolver = resolver();
        let inspector = TypeInspector::new(&resolver);
        let decl = TypeDecl::builder("Annotated")
            .annotate("title", GraphType::scalar(GraphScalar::String))
            .build();
        let info = inspector.inspect(&decl);
        assert_eq!(info.source, TypeSource::Hints);
        assert!(info.has_type_hints);
    }

    #[test]
    fn test_reserved_prefix_annotations_do_not_count_as_hints() {
        let resolver = resolver();
        let inspector = TypeInspector::new(&resolver);
        let decl = TypeDecl::builder("Internal")
            .annotate("_state", GraphType::scalar(GraphScalar::Json))
            .build();
        let info = inspector.inspect(&decl);
        assert_eq!(info.source, TypeSource::Mapping);
        assert!(!info.has_type_hints);
    }

    #[test]
    fn test_bare_document_classifies_as_document() {
        let resolver = resolver();
        let inspector = TypeInspector::new(&resolver);
        let decl = TypeDecl::builder("Article")
            .document(document(&resolver))
            .build();
        let info = inspector.inspect(&decl);
        assert_eq!(info.source, TypeSource::Document);
        assert_eq!(info.index_name.as_deref(), Some("articles"));
        assert!(info.document.is_some());
        assert!(info.custom_fields.is_none());
    }

    #[test]
    fn test_document_with_annotation_is_hybrid() {
        let resolver = resolver();
        let inspector = TypeInspector::new(&resolver);
        let decl = TypeDecl::builder("Article")
            .document(document(&resolver))
            .annotate("score", GraphType::scalar(GraphScalar::Float))
            .build();
        let info = inspector.inspect(&decl);
        assert_eq!(info.source, TypeSource::Hybrid);
        assert!(info.has_type_hints);
    }

    #[test]
    fn test_document_with_custom_field_is_hybrid() {
        let resolver = resolver();
        let inspector = TypeInspector::new(&resolver);
        let decl = TypeDecl::builder("Article")
            .document(document(&resolver))
            .custom_field("display_title", CustomFieldKind::Method)
            .build();
        let info = inspector.inspect(&decl);
        assert_eq!(info.source, TypeSource::Hybrid);
        let custom = info.custom_fields.unwrap();
        assert!(custom.contains("display_title"));
    }

    #[test]
    fn test_reserved_prefix_custom_fields_are_excluded() {
        let resolver = resolver();
        let inspector = TypeInspector::new(&resolver);
        let decl = TypeDecl::builder("Article")
            .custom_field("_hidden", CustomFieldKind::Property)
            .build();
        let info = inspector.inspect(&decl);
        // Only reserved names were marked, so the record stays absent.
        assert!(info.custom_fields.is_none());
        assert_eq!(info.source, TypeSource::Mapping);
    }

    #[test]
    fn test_foreign_backend_document_is_not_recognized() {
        let resolver = resolver();
        let inspector = TypeInspector::new(&resolver);
        let foreign = DocumentSchema::builder("Article", DslBackend::OpenSearchDsl)
            .index("articles")
            .build();
        let decl = TypeDecl::builder("Article").document(foreign).build();
        let info = inspector.inspect(&decl);
        assert_eq!(info.source, TypeSource::Mapping);
        assert!(info.document.is_none());
        assert!(info.index_name.is_none());
    }

    #[test]
    fn test_no_backend_means_no_document_recognition() {
        let resolver = DslResolver::with_candidates(Vec::new());
        let inspector = TypeInspector::new(&resolver);
        let doc = DocumentSchema::builder("Article", DslBackend::ElasticsearchDsl).build();
        let decl = TypeDecl::builder("Article")
            .document(doc)
            .annotate("title", GraphType::scalar(GraphScalar::String))
            .build();
        let info = inspector.inspect(&decl);
        assert_eq!(info.source, TypeSource::Hints);
    }
}
