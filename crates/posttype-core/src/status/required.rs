use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Primitive kinds a required-shape leaf can demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    #[serde(alias = "String")]
    String,
    #[serde(alias = "Number")]
    Number,
    #[serde(alias = "Integer")]
    Integer,
    #[serde(alias = "Boolean")]
    Boolean,
    #[serde(alias = "Object")]
    Object,
    #[serde(alias = "Array")]
    Array,
}

impl PrimitiveType {
    fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            // An empty string never counts as present
            (PrimitiveType::String, Value::String(s)) => !s.is_empty(),
            (PrimitiveType::Number, Value::Number(_)) => true,
            (PrimitiveType::Integer, Value::Number(n)) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            (PrimitiveType::Boolean, Value::Bool(_)) => true,
            (PrimitiveType::Object, Value::Object(_)) => true,
            (PrimitiveType::Array, Value::Array(_)) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypeLeaf {
    #[serde(rename = "type")]
    kind: PrimitiveType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ValueLeaf {
    value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum ShapeNode {
    Type(TypeLeaf),
    Value(ValueLeaf),
    Nested(RequiredShape),
}

/// Nested description of what a record must contain to be data complete
///
/// ```json
/// { "title": { "type": "string" },
///   "kind":  { "value": "article" },
///   "address": { "city": { "type": "string" } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequiredShape(BTreeMap<String, ShapeNode>);

impl RequiredShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_type(mut self, field: impl Into<String>, kind: PrimitiveType) -> Self {
        self.0.insert(field.into(), ShapeNode::Type(TypeLeaf { kind }));
        self
    }

    pub fn require_value(mut self, field: impl Into<String>, value: Value) -> Self {
        self.0.insert(field.into(), ShapeNode::Value(ValueLeaf { value }));
        self
    }

    pub fn require_nested(mut self, field: impl Into<String>, shape: RequiredShape) -> Self {
        self.0.insert(field.into(), ShapeNode::Nested(shape));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every leaf of the shape is satisfied by `data`
    ///
    /// An absent record never satisfies a shape, not even an empty one.
    pub fn is_satisfied_by(&self, data: Option<&Map<String, Value>>) -> bool {
        match data {
            Some(map) => self.check(map),
            None => false,
        }
    }

    fn check(&self, data: &Map<String, Value>) -> bool {
        self.0.iter().all(|(key, node)| {
            let value = data.get(key);
            match node {
                ShapeNode::Type(leaf) => value.is_some_and(|v| leaf.kind.matches(v)),
                ShapeNode::Value(leaf) => value == Some(&leaf.value),
                ShapeNode::Nested(shape) => match value {
                    Some(Value::Object(inner)) => shape.check(inner),
                    _ => false,
                },
            }
        })
    }
}
