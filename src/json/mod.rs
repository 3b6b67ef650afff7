//! JSON serializer for documentation records and directory indexes.
//!
//! Records are lowered into a small closed set of [`Value`] variants when the
//! model is built; [`encode`] then dispatches on the variant alone. The output
//! layout is fixed: objects put one member per line when pretty, arrays always
//! stay on a single line.

mod writer;

pub use writer::{encode, write_file};

use std::collections::BTreeMap;

/// Encodable value. The discriminant is chosen at model-construction time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Enumerated constant, written as its tag name.
    Symbol(&'static str),
    Sequence(Vec<Value>),
    /// Text-keyed mapping, written in the order held here.
    Mapping(Vec<(String, Value)>),
    /// Composite record, written with its fields in declared order.
    Record(Vec<(&'static str, Value)>),
    Index(IndexView),
}

/// Derived view of a directory index: `package` (when set), `files`,
/// `subdirectories`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexView {
    pub package: Option<Box<Value>>,
    pub files: Vec<Value>,
    pub subdirectories: Vec<Value>,
}

/// Conversion into an encodable [`Value`].
pub trait ToJson {
    fn to_json(&self) -> Value;
}

impl ToJson for Value {
    fn to_json(&self) -> Value {
        self.clone()
    }
}

impl ToJson for str {
    fn to_json(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToJson for String {
    fn to_json(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl ToJson for char {
    fn to_json(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToJson for bool {
    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToJson for i64 {
    fn to_json(&self) -> Value {
        Value::Int(*self)
    }
}

impl ToJson for f64 {
    fn to_json(&self) -> Value {
        Value::Float(*self)
    }
}

impl<T: ToJson> ToJson for Option<T> {
    fn to_json(&self) -> Value {
        match self {
            Some(v) => v.to_json(),
            None => Value::Null,
        }
    }
}

impl<T: ToJson> ToJson for Vec<T> {
    fn to_json(&self) -> Value {
        self.as_slice().to_json()
    }
}

impl<T: ToJson> ToJson for [T] {
    fn to_json(&self) -> Value {
        Value::Sequence(self.iter().map(ToJson::to_json).collect())
    }
}

impl<V: ToJson> ToJson for BTreeMap<String, V> {
    fn to_json(&self) -> Value {
        Value::Mapping(self.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
    }
}
