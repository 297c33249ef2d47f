use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Value type of a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    /// RFC 3339 string or integer milliseconds since the epoch
    Date,
    /// Non-empty string identifier, typically a reference to another record
    Id,
}

impl ValueType {
    /// Type check used by input sanitation. Arrays only check the container.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueType::String, Value::String(_)) => true,
            (ValueType::Number, Value::Number(_)) => true,
            (ValueType::Integer, Value::Number(n)) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            (ValueType::Boolean, Value::Bool(_)) => true,
            (ValueType::Object, Value::Object(_)) => true,
            (ValueType::Array, Value::Array(_)) => true,
            (ValueType::Date, Value::String(s)) => chrono::DateTime::parse_from_rfc3339(s).is_ok(),
            (ValueType::Date, Value::Number(n)) => n.is_i64(),
            (ValueType::Id, Value::String(s)) => !s.is_empty(),
            _ => false,
        }
    }

    pub fn default_invalid_message(&self) -> &'static str {
        match self {
            ValueType::String => "must be a string",
            ValueType::Number => "must be a number",
            ValueType::Integer => "must be an integer",
            ValueType::Boolean => "must be a boolean",
            ValueType::Object => "must be an object",
            ValueType::Array => "must be an array",
            ValueType::Date => "must be a date",
            ValueType::Id => "must be an id",
        }
    }

    /// Placeholder used when a required field is hidden from output
    pub fn empty_value(&self) -> Value {
        match self {
            ValueType::String | ValueType::Date | ValueType::Id => Value::String(String::new()),
            ValueType::Number | ValueType::Integer => Value::from(0),
            ValueType::Boolean => Value::Bool(false),
            ValueType::Object => Value::Object(Map::new()),
            ValueType::Array => Value::Array(Vec::new()),
        }
    }
}

/// What a callback sees about the field it is asked about
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    /// The enclosing object of the field (the record at top level)
    pub record: &'a Map<String, Value>,
    pub key: &'a str,
    pub value: Option<&'a Value>,
}

/// Who may read a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    #[default]
    Everyone,
    Admin,
    #[serde(alias = "author")]
    AuthorOrAdmin,
}

type VisibilityFn = dyn Fn(&FieldContext<'_>) -> Visibility + Send + Sync;
type ValidatorFn = dyn Fn(&FieldContext<'_>) -> bool + Send + Sync;

/// Visibility tag of a field, fixed or computed from the record
#[derive(Clone)]
pub enum VisibilityRule {
    Static(Visibility),
    Computed(Arc<VisibilityFn>),
}

impl VisibilityRule {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&FieldContext<'_>) -> Visibility + Send + Sync + 'static,
    {
        VisibilityRule::Computed(Arc::new(f))
    }

    pub fn resolve(&self, ctx: &FieldContext<'_>) -> Visibility {
        match self {
            VisibilityRule::Static(visibility) => *visibility,
            VisibilityRule::Computed(f) => f(ctx),
        }
    }
}

impl Default for VisibilityRule {
    fn default() -> Self {
        VisibilityRule::Static(Visibility::Everyone)
    }
}

impl fmt::Debug for VisibilityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisibilityRule::Static(v) => f.debug_tuple("Static").field(v).finish(),
            VisibilityRule::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Custom acceptance check run after the type check
#[derive(Clone)]
pub struct Validator(Arc<ValidatorFn>);

impl Validator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&FieldContext<'_>) -> bool + Send + Sync + 'static,
    {
        Validator(Arc::new(f))
    }

    pub fn check(&self, ctx: &FieldContext<'_>) -> bool {
        (self.0)(ctx)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// Who may write a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WriteCondition {
    #[default]
    Everyone,
    #[serde(alias = "author")]
    AuthorOrAdmin,
    Admin,
}

/// Per-field descriptor attributes
#[derive(Debug, Clone, Default)]
pub struct FieldMeta {
    pub required: bool,
    pub read_only: bool,
    pub disabled: bool,
    pub pattern: Option<Regex>,
    pub validator: Option<Validator>,
    pub validation_message: Option<String>,
    pub visibility: VisibilityRule,
    pub write: WriteCondition,
    /// Name of the post type this field points at
    pub reference: Option<String>,
}

/// One node of a post type schema
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub value_type: ValueType,
    pub properties: BTreeMap<String, FieldSchema>,
    pub items: Option<Box<FieldSchema>>,
    pub meta: FieldMeta,
}

impl FieldSchema {
    pub fn of(value_type: ValueType) -> Self {
        Self {
            value_type,
            properties: BTreeMap::new(),
            items: None,
            meta: FieldMeta::default(),
        }
    }

    pub fn string() -> Self {
        Self::of(ValueType::String)
    }

    pub fn number() -> Self {
        Self::of(ValueType::Number)
    }

    pub fn integer() -> Self {
        Self::of(ValueType::Integer)
    }

    pub fn boolean() -> Self {
        Self::of(ValueType::Boolean)
    }

    pub fn date() -> Self {
        Self::of(ValueType::Date)
    }

    pub fn id() -> Self {
        Self::of(ValueType::Id)
    }

    pub fn object() -> Self {
        Self::of(ValueType::Object)
    }

    pub fn array(items: FieldSchema) -> Self {
        let mut schema = Self::of(ValueType::Array);
        schema.items = Some(Box::new(items));
        schema
    }

    pub fn property(mut self, key: impl Into<String>, schema: FieldSchema) -> Self {
        self.properties.insert(key.into(), schema);
        self
    }

    pub fn required(mut self) -> Self {
        self.meta.required = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.meta.read_only = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.meta.disabled = true;
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.meta.pattern = Some(pattern);
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.meta.validator = Some(validator);
        self
    }

    pub fn validation_message(mut self, message: impl Into<String>) -> Self {
        self.meta.validation_message = Some(message.into());
        self
    }

    pub fn visible_to(mut self, visibility: Visibility) -> Self {
        self.meta.visibility = VisibilityRule::Static(visibility);
        self
    }

    pub fn visibility(mut self, rule: VisibilityRule) -> Self {
        self.meta.visibility = rule;
        self
    }

    pub fn writable_by(mut self, write: WriteCondition) -> Self {
        self.meta.write = write;
        self
    }

    pub fn reference(mut self, post_type: impl Into<String>) -> Self {
        self.meta.reference = Some(post_type.into());
        self.value_type = ValueType::Id;
        self
    }

    /// Object node with child properties
    pub fn is_nested(&self) -> bool {
        self.value_type == ValueType::Object && !self.properties.is_empty()
    }

    /// Required itself, or (for nested objects) through any descendant
    pub fn requires_anything(&self) -> bool {
        self.meta.required || self.properties.values().any(FieldSchema::requires_anything)
    }

    pub fn depth(&self) -> usize {
        let children = self
            .properties
            .values()
            .map(FieldSchema::depth)
            .chain(self.items.iter().map(|items| items.depth()))
            .max()
            .unwrap_or(0);
        children + 1
    }
}
