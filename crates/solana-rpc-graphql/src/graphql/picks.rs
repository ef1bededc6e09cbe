//! Shorthand for declaring output fields.
//!
//! A [`Shape`] says what a field holds. [`object`] turns a list of named
//! shapes into an object type whose fields read same-named properties from a
//! JSON parent, which is how parsed account data is exposed.

use std::rc::Rc;

use async_graphql::Value;

use super::registry::{FieldDef, FieldSet, FieldType, TypeNode, TypeRegistry};
use super::resolvers::{self, Transcode};
use crate::error::SchemaBuildError;

/// Name of the arbitrary-precision integer scalar.
pub const BIGINT: &str = "BigInt";

/// The scalars a field can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Boolean,
    BigInt,
}

impl ScalarKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarKind::String => "String",
            ScalarKind::Int => "Int",
            ScalarKind::Float => "Float",
            ScalarKind::Boolean => "Boolean",
            ScalarKind::BigInt => BIGINT,
        }
    }
}

/// What a field holds.
#[derive(Clone, Debug)]
pub enum Shape {
    Scalar(ScalarKind),
    List(Box<Shape>),
    Object(Rc<TypeNode>),
}

impl Shape {
    /// Declared type of a field with this shape. Nullable at every level.
    pub fn field_type(&self, registry: &TypeRegistry) -> Result<FieldType, SchemaBuildError> {
        Ok(match self {
            Shape::Scalar(kind) => FieldType::named(&scalar(registry, *kind)?),
            Shape::List(inner) => inner.field_type(registry)?.list(),
            Shape::Object(node) => FieldType::named(node),
        })
    }

    /// How a JSON property with this shape becomes a field value.
    pub fn transcode(&self) -> Transcode {
        match self {
            Shape::Scalar(kind) => Transcode::Scalar(*kind),
            Shape::List(inner) => Transcode::List(Box::new(inner.transcode())),
            Shape::Object(_) => Transcode::Object,
        }
    }
}

pub fn string() -> Shape {
    Shape::Scalar(ScalarKind::String)
}

/// A 32-bit integer.
pub fn number() -> Shape {
    Shape::Scalar(ScalarKind::Int)
}

pub fn float() -> Shape {
    Shape::Scalar(ScalarKind::Float)
}

pub fn bigint() -> Shape {
    Shape::Scalar(ScalarKind::BigInt)
}

pub fn boolean() -> Shape {
    Shape::Scalar(ScalarKind::Boolean)
}

pub fn list(inner: Shape) -> Shape {
    Shape::List(Box::new(inner))
}

/// A field of an already registered type.
pub fn type_ref(node: &Rc<TypeNode>) -> Shape {
    Shape::Object(node.clone())
}

/// The node for a scalar, registering the custom ones on first use.
pub fn scalar(registry: &TypeRegistry, kind: ScalarKind) -> Result<Rc<TypeNode>, SchemaBuildError> {
    match kind {
        ScalarKind::BigInt => registry.get_or_create(BIGINT, |_| {
            Ok(TypeNode::scalar(BIGINT, Some(is_bigint)).with_description(
                "An unsigned or signed integer of arbitrary size. Serialized as a \
                 number when it fits in 64 bits, otherwise as a decimal string.",
            ))
        }),
        builtin => registry.get_or_create(builtin.type_name(), |_| {
            Ok(TypeNode::builtin_scalar(builtin.type_name()))
        }),
    }
}

/// A field that reads property `name` from a JSON parent.
pub fn property_field(
    registry: &TypeRegistry,
    name: &'static str,
    shape: &Shape,
) -> Result<FieldDef, SchemaBuildError> {
    Ok(FieldDef::new(name, shape.field_type(registry)?)
        .resolver(resolvers::property(name, shape.transcode())))
}

/// Build (but do not register) an object type over JSON properties.
pub fn object_node(
    registry: &TypeRegistry,
    name: impl Into<String>,
    fields: Vec<(&'static str, Shape)>,
) -> Result<TypeNode, SchemaBuildError> {
    let fields = fields
        .iter()
        .map(|(field, shape)| property_field(registry, *field, shape))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TypeNode::object(name, FieldSet::ready(fields)))
}

/// Define an object type over JSON properties. The name must be new.
pub fn object(
    registry: &TypeRegistry,
    name: impl Into<String>,
    fields: Vec<(&'static str, Shape)>,
) -> Result<Shape, SchemaBuildError> {
    let node = registry.define(object_node(registry, name, fields)?)?;
    Ok(Shape::Object(node))
}

/// Whether `s` is a base-10 integer literal with an optional leading minus.
pub(crate) fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_bigint(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        Value::String(s) => is_integer_literal(s),
        _ => false,
    }
}
