//! Output type descriptors consumed by the schema-declaration layer.

use std::fmt;

use serde::Serialize;

/// Base output types a document field can map to.
///
/// The non-primitive variants (geo point/shape, IP, completion, token
/// count) are custom scalars; their value-level handling lives in
/// [`crate::scalars`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GraphScalar {
    String,
    Int,
    Float,
    Boolean,
    DateTime,
    /// Generic structured value; object/nested shapes are expanded
    /// separately via nested-type generation.
    Json,
    GeoPoint,
    GeoShape,
    Ip,
    Completion,
    TokenCount,
}

impl GraphScalar {
    pub fn name(&self) -> &'static str {
        match self {
            GraphScalar::String => "String",
            GraphScalar::Int => "Int",
            GraphScalar::Float => "Float",
            GraphScalar::Boolean => "Boolean",
            GraphScalar::DateTime => "DateTime",
            GraphScalar::Json => "JSON",
            GraphScalar::GeoPoint => "GeoPoint",
            GraphScalar::GeoShape => "GeoShape",
            GraphScalar::Ip => "IP",
            GraphScalar::Completion => "Completion",
            GraphScalar::TokenCount => "TokenCount",
        }
    }
}

/// One field's output type: base scalar, multiplicity, optionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GraphType {
    pub base: GraphScalar,
    pub list: bool,
    pub optional: bool,
}

impl GraphType {
    pub const fn scalar(base: GraphScalar) -> Self {
        Self {
            base,
            list: false,
            optional: false,
        }
    }

    pub const fn list_of(base: GraphScalar) -> Self {
        Self {
            base,
            list: true,
            optional: false,
        }
    }

    /// Wrap as a list. Multiplicity wrapping happens before optionality
    /// wrapping, so an optional multi-valued field reads as an optional
    /// list of the base type.
    pub fn as_list(self) -> Self {
        Self { list: true, ..self }
    }

    /// Wrap as optional. A no-op on an already-optional type.
    pub fn as_optional(self) -> Self {
        Self {
            optional: true,
            ..self
        }
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

impl fmt::Display for GraphType {
    /// GraphQL-style notation: `String!`, `[Int!]!`, `[Float!]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.list {
            write!(f, "[{}!]", self.base.name())?;
        } else {
            write!(f, "{}", self.base.name())?;
        }
        if !self.optional {
            write!(f, "!")?;
        }
        Ok(())
    }
}
