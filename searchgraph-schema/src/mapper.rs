//! Field mapping engine: document fields to output type descriptors.
//!
//! Two entry paths:
//! - raw mapping dictionaries fetched from a live index (string type tags),
//! - declarative field instances from a document class.
//!
//! The tag table is total: unknown tags map to `String` rather than
//! failing, so schema evolution on the backend side never breaks callers.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

use crate::dsl::{DslNamespace, DslResolver, FieldClass};
use crate::error::{Result, SchemaError};
use crate::fields::{DocumentSchema, DslField};
use crate::types::{GraphScalar, GraphType};

/// Class-name to output-type table shared by the dynamic (identity) and
/// static (name fallback) lookups. `Object` and `Nested` appear only in
/// the name fallback, mirroring that the identity table is built from
/// leaf field primitives.
const CLASS_TYPES: &[(&str, GraphType)] = &[
    ("Text", GraphType::scalar(GraphScalar::String)),
    ("Keyword", GraphType::scalar(GraphScalar::String)),
    ("MatchOnlyText", GraphType::scalar(GraphScalar::String)),
    ("ConstantKeyword", GraphType::scalar(GraphScalar::String)),
    ("Wildcard", GraphType::scalar(GraphScalar::String)),
    ("Binary", GraphType::scalar(GraphScalar::String)),
    ("Percolator", GraphType::scalar(GraphScalar::String)),
    ("Join", GraphType::scalar(GraphScalar::String)),
    ("SearchAsYouType", GraphType::scalar(GraphScalar::String)),
    ("Integer", GraphType::scalar(GraphScalar::Int)),
    ("Long", GraphType::scalar(GraphScalar::Int)),
    ("Short", GraphType::scalar(GraphScalar::Int)),
    ("Byte", GraphType::scalar(GraphScalar::Int)),
    ("Double", GraphType::scalar(GraphScalar::Float)),
    ("Float", GraphType::scalar(GraphScalar::Float)),
    ("HalfFloat", GraphType::scalar(GraphScalar::Float)),
    ("ScaledFloat", GraphType::scalar(GraphScalar::Float)),
    ("RankFeature", GraphType::scalar(GraphScalar::Float)),
    ("Boolean", GraphType::scalar(GraphScalar::Boolean)),
    ("Date", GraphType::scalar(GraphScalar::DateTime)),
    ("Ip", GraphType::scalar(GraphScalar::Ip)),
    ("Completion", GraphType::scalar(GraphScalar::Completion)),
    ("GeoPoint", GraphType::scalar(GraphScalar::GeoPoint)),
    ("GeoShape", GraphType::scalar(GraphScalar::GeoShape)),
    ("TokenCount", GraphType::scalar(GraphScalar::TokenCount)),
    ("IntegerRange", GraphType::scalar(GraphScalar::Json)),
    ("FloatRange", GraphType::scalar(GraphScalar::Json)),
    ("LongRange", GraphType::scalar(GraphScalar::Json)),
    ("DoubleRange", GraphType::scalar(GraphScalar::Json)),
    ("DateRange", GraphType::scalar(GraphScalar::Json)),
    ("IpRange", GraphType::scalar(GraphScalar::Json)),
    ("RankFeatures", GraphType::scalar(GraphScalar::Json)),
    ("DenseVector", GraphType::list_of(GraphScalar::Float)),
];

/// Maps Elasticsearch/OpenSearch field declarations to output types.
pub struct FieldMapper<'a> {
    resolver: &'a DslResolver,
}

impl<'a> FieldMapper<'a> {
    pub fn new(resolver: &'a DslResolver) -> Self {
        Self { resolver }
    }

    /// Map a raw mapping entry (runtime introspection path).
    ///
    /// The type tag defaults to `text` when absent. Object/nested fields,
    /// and any field carrying a `properties` sub-schema, map to the
    /// generic structured type and are expanded by nested-type generation.
    /// Unless `required`, the result is wrapped as optional.
    pub fn map_field(
        &self,
        field_name: &str,
        field_def: &Map<String, Value>,
        required: bool,
    ) -> GraphType {
        let tag = field_def
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("text");

        let base = if tag == "object" || tag == "nested" || field_def.contains_key("properties") {
            GraphType::scalar(GraphScalar::Json)
        } else {
            match tag_type(tag) {
                Some(graph_type) => graph_type,
                None => {
                    tracing::warn!(
                        field = field_name,
                        tag,
                        "unknown field type tag, mapping to String"
                    );
                    GraphType::scalar(GraphScalar::String)
                }
            }
        };

        if required {
            base
        } else {
            base.as_optional()
        }
    }

    /// Map a declarative field instance (document class path).
    ///
    /// Lookup order: class identity against the resolved namespace, class
    /// name against the static table, then `String` as the safe default.
    /// Multiplicity wraps before optionality, so an optional multi-valued
    /// field comes out as an optional list of the base type.
    pub fn map_document_field(&self, field: &DslField) -> Result<GraphType> {
        let namespace = self.resolver.namespace()?;

        if field.class.backend != namespace.backend() {
            return Err(SchemaError::UnmappableField {
                class: field.class.name.clone(),
                reason: format!(
                    "field belongs to {} but {} is resolved",
                    field.class.backend,
                    namespace.backend()
                ),
            });
        }

        let identity_table = document_type_map(namespace);
        let mut graph_type = identity_table
            .get(&field.class)
            .copied()
            .or_else(|| class_name_type(&field.class.name))
            .unwrap_or(GraphType::scalar(GraphScalar::String));

        if field.is_multi() {
            graph_type = graph_type.as_list();
        }
        if !field.is_required() && !graph_type.is_optional() {
            graph_type = graph_type.as_optional();
        }

        Ok(graph_type)
    }

    /// Generate the full name-to-type mapping for a document class.
    ///
    /// Excluded names and names with the implementation-reserved `_`
    /// prefix are skipped; a field that fails to map is skipped rather
    /// than aborting generation for the whole document.
    pub fn generate_fields_from_document(
        &self,
        document: &DocumentSchema,
        exclude: &[&str],
    ) -> Result<BTreeMap<String, GraphType>> {
        self.resolver.ensure_available()?;

        let mut fields = BTreeMap::new();
        for (name, field) in &document.mapping {
            if exclude.contains(&name.as_str()) || name.starts_with('_') {
                continue;
            }
            match self.map_document_field(field) {
                Ok(graph_type) => {
                    fields.insert(name.clone(), graph_type);
                }
                Err(err) => {
                    tracing::debug!(field = %name, error = %err, "skipping unmappable field");
                }
            }
        }
        Ok(fields)
    }

    /// Generate the name-to-type mapping for an object/nested field's
    /// sub-schema, recursively applying the declarative-field mapping.
    pub fn generate_nested_type(&self, field: &DslField) -> Result<BTreeMap<String, GraphType>> {
        self.resolver.ensure_available()?;

        let mut nested = BTreeMap::new();
        let Some(properties) = &field.properties else {
            return Ok(nested);
        };

        for (name, property) in properties {
            if name.starts_with('_') {
                continue;
            }
            match self.map_document_field(property) {
                Ok(graph_type) => {
                    nested.insert(name.clone(), graph_type);
                }
                Err(err) => {
                    tracing::debug!(field = %name, error = %err, "skipping unmappable property");
                }
            }
        }
        Ok(nested)
    }
}

/// Identity table built from whichever backend is resolved, so its keys
/// are the actual classes in use. Classes the backend lacks are skipped.
fn document_type_map(namespace: &DslNamespace) -> HashMap<FieldClass, GraphType> {
    let mut table = HashMap::with_capacity(CLASS_TYPES.len());
    for (name, graph_type) in CLASS_TYPES {
        if let Ok(class) = namespace.lookup(name) {
            table.insert(class, *graph_type);
        }
    }
    table
}

/// Static name-string fallback for classes that miss the identity lookup
/// (wrapping subclasses, proxies).
fn class_name_type(name: &str) -> Option<GraphType> {
    match name {
        "Object" | "Nested" => Some(GraphType::scalar(GraphScalar::Json)),
        _ => CLASS_TYPES
            .iter()
            .find(|(class_name, _)| *class_name == name)
            .map(|(_, graph_type)| *graph_type),
    }
}

/// Total tag table for raw mapping introspection.
fn tag_type(tag: &str) -> Option<GraphType> {
    let graph_type = match tag {
        // Text-like
        "text" | "keyword" | "match_only_text" | "wildcard" | "constant_keyword"
        | "search_as_you_type" | "percolator" | "join" | "alias" | "binary" => {
            GraphType::scalar(GraphScalar::String)
        }
        // Integer-like
        "long" | "integer" | "short" | "byte" | "unsigned_long" => {
            GraphType::scalar(GraphScalar::Int)
        }
        // Floating-point-like
        "double" | "float" | "half_float" | "scaled_float" | "rank_feature" => {
            GraphType::scalar(GraphScalar::Float)
        }
        "boolean" => GraphType::scalar(GraphScalar::Boolean),
        "date" | "date_nanos" => GraphType::scalar(GraphScalar::DateTime),
        // Structural and range shapes stay generic
        "flattened" | "integer_range" | "float_range" | "long_range" | "double_range"
        | "date_range" | "ip_range" | "rank_features" | "sparse_vector" | "histogram"
        | "aggregate_metric_double" => GraphType::scalar(GraphScalar::Json),
        // Custom scalars
        "geo_point" => GraphType::scalar(GraphScalar::GeoPoint),
        "geo_shape" => GraphType::scalar(GraphScalar::GeoShape),
        "ip" => GraphType::scalar(GraphScalar::Ip),
        "completion" => GraphType::scalar(GraphScalar::Completion),
        "token_count" => GraphType::scalar(GraphScalar::TokenCount),
        "dense_vector" => GraphType::list_of(GraphScalar::Float),
        _ => return None,
    };
    Some(graph_type)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;
    use crate::dsl::{DslBackend, ProviderCandidate};
    use crate::fields::DocumentSchema;

    fn resolver() -> DslResolver {
        DslResolver::with_candidates(vec![ProviderCandidate {
            backend: DslBackend::ElasticsearchDsl,
            available: true,
        }])
    }

    fn empty_resolver() -> DslResolver {
        DslResolver::with_candidates(Vec::new())
    }

    fn field_def(value: serde_json::Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_map_field_required_and_optional() {
        let resolver = resolver();
        let mapper = FieldMapper::new(&resolver);

        let optional = mapper.map_field("title", &field_def(json!({"type": "text"})), false);
        assert_eq!(optional.base, GraphScalar::String);
        assert!(optional.optional);

        let required = mapper.map_field("title", &field_def(json!({"type": "text"})), true);
        assert!(!required.optional);
        assert_eq!(required, GraphType::scalar(GraphScalar::String));
    }

    #[test]
    fn test_map_field_missing_type_defaults_to_text() {
        let resolver = resolver();
        let mapper = FieldMapper::new(&resolver);
        let implicit = mapper.map_field("title", &field_def(json!({})), false);
        let explicit = mapper.map_field("title", &field_def(json!({"type": "text"})), false);
        assert_eq!(implicit, explicit);
    }

    #[test]
    fn test_map_field_unknown_tag_never_fails() {
        let resolver = resolver();
        let mapper = FieldMapper::new(&resolver);
        let mapped = mapper.map_field("f", &field_def(json!({"type": "some_future_type"})), false);
        assert_eq!(mapped.base, GraphScalar::String);
        assert!(mapped.optional);
    }

    #[test]
    fn test_map_field_tag_table() {
        let resolver = resolver();
        let mapper = FieldMapper::new(&resolver);
        let cases = [
            ("keyword", GraphScalar::String),
            ("long", GraphScalar::Int),
            ("unsigned_long", GraphScalar::Int),
            ("scaled_float", GraphScalar::Float),
            ("boolean", GraphScalar::Boolean),
            ("date_nanos", GraphScalar::DateTime),
            ("geo_point", GraphScalar::GeoPoint),
            ("geo_shape", GraphScalar::GeoShape),
            ("ip", GraphScalar::Ip),
            ("completion", GraphScalar::Completion),
            ("token_count", GraphScalar::TokenCount),
            ("integer_range", GraphScalar::Json),
            ("flattened", GraphScalar::Json),
        ];
        for (tag, base) in cases {
            let mapped = mapper.map_field("f", &field_def(json!({"type": tag})), true);
            assert_eq!(mapped.base, base, "tag {tag}");
            assert!(!mapped.optional);
        }
    }

    #[test]
    fn test_map_field_nested_shapes_stay_generic() {
        let resolver = resolver();
        let mapper = FieldMapper::new(&resolver);

        for def in [
            json!({"type": "object"}),
            json!({"type": "nested"}),
            json!({"properties": {"name": {"type": "text"}}}),
        ] {
            let mapped = mapper.map_field("author", &field_def(def), true);
            assert_eq!(mapped.base, GraphScalar::Json);
        }
    }

    #[test]
    fn test_map_field_dense_vector_is_float_list() {
        let resolver = resolver();
        let mapper = FieldMapper::new(&resolver);
        let mapped = mapper.map_field("embedding", &field_def(json!({"type": "dense_vector"})), true);
        assert_eq!(mapped.base, GraphScalar::Float);
        assert!(mapped.list);
    }

    #[test]
    fn test_map_document_field_by_identity() {
        let resolver = resolver();
        let mapper = FieldMapper::new(&resolver);
        let namespace = resolver.namespace().unwrap();

        let field = namespace.field("Integer").unwrap();
        let mapped = mapper.map_document_field(&field).unwrap();
        assert_eq!(mapped.base, GraphScalar::Int);
        assert!(mapped.optional);
    }

    #[test]
    fn test_map_document_field_name_fallback_for_subclass() {
        let resolver = resolver();
        let mapper = FieldMapper::new(&resolver);

        // A wrapping subclass: right name, foreign identity.
        let class = FieldClass {
            backend: DslBackend::ElasticsearchDsl,
            id: 9999,
            name: "Keyword".to_string(),
        };
        let mapped = mapper.map_document_field(&DslField::new(class)).unwrap();
        assert_eq!(mapped.base, GraphScalar::String);
    }

    #[test]
    fn test_map_document_field_unknown_class_defaults_to_string() {
        let resolver = resolver();
        let mapper = FieldMapper::new(&resolver);
        let class = FieldClass {
            backend: DslBackend::ElasticsearchDsl,
            id: 9999,
            name: "SomethingNew".to_string(),
        };
        let mapped = mapper.map_document_field(&DslField::new(class)).unwrap();
        assert_eq!(mapped.base, GraphScalar::String);
        assert!(mapped.optional);
    }

    #[test]
    fn test_multi_required_is_nonoptional_list() {
        let resolver = resolver();
        let mapper = FieldMapper::new(&resolver);
        let namespace = resolver.namespace().unwrap();

        let field = namespace.field("Keyword").unwrap().multi(true).required(true);
        let mapped = mapper.map_document_field(&field).unwrap();
        assert!(mapped.list);
        assert!(!mapped.optional);
    }

    #[test]
    fn test_optional_multi_is_optional_list() {
        let resolver = resolver();
        let mapper = FieldMapper::new(&resolver);
        let namespace = resolver.namespace().unwrap();

        let field = namespace.field("Keyword").unwrap().multi(true);
        let mapped = mapper.map_document_field(&field).unwrap();
        assert!(mapped.list);
        assert!(mapped.optional);
    }

    #[test]
    fn test_map_document_field_without_backend_fails() {
        let resolver = empty_resolver();
        let mapper = FieldMapper::new(&resolver);
        let class = FieldClass {
            backend: DslBackend::ElasticsearchDsl,
            id: 0,
            name: "Text".to_string(),
        };
        let err = mapper.map_document_field(&DslField::new(class)).unwrap_err();
        assert!(matches!(err, SchemaError::DslUnavailable));
    }

    #[test]
    fn test_map_document_field_foreign_backend_fails() {
        let resolver = resolver();
        let mapper = FieldMapper::new(&resolver);
        let class = FieldClass {
            backend: DslBackend::OpenSearchDsl,
            id: 3,
            name: "Text".to_string(),
        };
        let err = mapper.map_document_field(&DslField::new(class)).unwrap_err();
        assert!(matches!(err, SchemaError::UnmappableField { .. }));
    }

    fn sample_document(resolver: &DslResolver) -> std::sync::Arc<DocumentSchema> {
        let namespace = resolver.namespace().unwrap();
        DocumentSchema::builder("Article", namespace.backend())
            .index("articles")
            .field("title", namespace.field("Text").unwrap())
            .field("views", namespace.field("Integer").unwrap())
            .field("published", namespace.field("Date").unwrap().required(true))
            .field("_internal", namespace.field("Keyword").unwrap())
            .build()
    }

    #[test]
    fn test_generate_fields_skips_excluded_and_reserved() {
        let resolver = resolver();
        let mapper = FieldMapper::new(&resolver);
        let document = sample_document(&resolver);

        let fields = mapper
            .generate_fields_from_document(&document, &["views"])
            .unwrap();
        assert_eq!(
            fields.keys().collect::<Vec<_>>(),
            vec!["published", "title"]
        );
        assert!(!fields["published"].optional);
        assert!(fields["title"].optional);
    }

    #[test]
    fn test_generated_fields_yield_to_caller_override() {
        let resolver = resolver();
        let mapper = FieldMapper::new(&resolver);
        let document = sample_document(&resolver);

        let generated = mapper
            .generate_fields_from_document(&document, &["views"])
            .unwrap();
        assert!(generated["title"].optional);

        let mut declared = BTreeMap::new();
        declared.insert("title".to_string(), GraphType::scalar(GraphScalar::String));

        let merged = crate::fields::merge_fields(generated, &declared);
        // The override replaces the generated shape for title; the rest of
        // the generated mapping survives untouched.
        assert_eq!(merged["title"], GraphType::scalar(GraphScalar::String));
        assert!(!merged["title"].optional);
        assert!(!merged["published"].optional);
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["published", "title"]);
    }

    #[test]
    fn test_generate_fields_skips_unmappable_field() {
        let resolver = resolver();
        let mapper = FieldMapper::new(&resolver);
        let namespace = resolver.namespace().unwrap();

        let foreign = DslField::new(FieldClass {
            backend: DslBackend::OpenSearchDsl,
            id: 3,
            name: "Text".to_string(),
        });
        let document = DocumentSchema::builder("Mixed", namespace.backend())
            .field("title", namespace.field("Text").unwrap())
            .field("stray", foreign)
            .build();

        let fields = mapper.generate_fields_from_document(&document, &[]).unwrap();
        assert!(fields.contains_key("title"));
        assert!(!fields.contains_key("stray"));
    }

    #[test]
    fn test_generate_fields_without_backend_fails() {
        let resolver = empty_resolver();
        let mapper = FieldMapper::new(&resolver);
        let document = DocumentSchema::builder("Article", DslBackend::ElasticsearchDsl).build();
        assert!(matches!(
            mapper.generate_fields_from_document(&document, &[]),
            Err(SchemaError::DslUnavailable)
        ));
    }

    #[test]
    fn test_generate_nested_type() {
        let resolver = resolver();
        let mapper = FieldMapper::new(&resolver);
        let namespace = resolver.namespace().unwrap();

        let mut properties = BTreeMap::new();
        properties.insert("name".to_string(), namespace.field("Text").unwrap());
        properties.insert(
            "age".to_string(),
            namespace.field("Integer").unwrap().required(true),
        );
        properties.insert("_hidden".to_string(), namespace.field("Keyword").unwrap());

        let author = namespace
            .field("Object")
            .unwrap()
            .with_properties(properties);

        let nested = mapper.generate_nested_type(&author).unwrap();
        assert_eq!(nested.keys().collect::<Vec<_>>(), vec!["age", "name"]);
        assert!(!nested["age"].optional);
        assert_eq!(nested["age"].base, GraphScalar::Int);
    }

    #[test]
    fn test_generate_nested_type_without_properties_is_empty() {
        let resolver = resolver();
        let mapper = FieldMapper::new(&resolver);
        let namespace = resolver.namespace().unwrap();
        let field = namespace.field("Object").unwrap();
        assert!(mapper.generate_nested_type(&field).unwrap().is_empty());
    }
}
