//! Documentation records, one per documented symbol.
//!
//! Records are immutable snapshots built once by [`crate::builder`] and only
//! ever read by the serializer. Each lowers itself into a [`Value::Record`]
//! whose field order is the JSON key order.

use crate::json::{ToJson, Value};
use crate::symbols::{ElementKind, Modifier};
use std::collections::BTreeMap;

impl ToJson for ElementKind {
    fn to_json(&self) -> Value {
        Value::Symbol(self.as_str())
    }
}

impl ToJson for Modifier {
    fn to_json(&self) -> Value {
        Value::Symbol(self.as_str())
    }
}

/// Package summary, embedded in the directory index.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDoc {
    pub name: String,
    pub qualified_name: String,
    pub documentation: Option<String>,
}

impl ToJson for PackageDoc {
    fn to_json(&self) -> Value {
        Value::Record(vec![
            ("name", self.name.to_json()),
            ("qualifiedName", self.qualified_name.to_json()),
            ("documentation", self.documentation.to_json()),
        ])
    }
}

/// Full documentation of a class, interface, enum, annotation or record.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDoc {
    pub name: String,
    pub qualified_name: String,
    pub binary_name: String,
    pub package_name: String,
    pub kind: ElementKind,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<AnnotationDoc>,
    pub documentation: Option<String>,
    pub type_parameters: Vec<String>,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<FieldDoc>,
    pub constructors: Vec<ConstructorDoc>,
    pub methods: Vec<MethodDoc>,
    /// Set for enums only.
    pub enum_constants: Option<Vec<EnumConstantDoc>>,
    /// Set for records only.
    pub record_components: Option<Vec<RecordComponentDoc>>,
    pub nested_types: Vec<NestedTypeDoc>,
}

impl ToJson for TypeDoc {
    fn to_json(&self) -> Value {
        Value::Record(vec![
            ("name", self.name.to_json()),
            ("qualifiedName", self.qualified_name.to_json()),
            ("binaryName", self.binary_name.to_json()),
            ("packageName", self.package_name.to_json()),
            ("kind", self.kind.to_json()),
            ("modifiers", self.modifiers.to_json()),
            ("annotations", self.annotations.to_json()),
            ("documentation", self.documentation.to_json()),
            ("typeParameters", self.type_parameters.to_json()),
            ("superClass", self.super_class.to_json()),
            ("interfaces", self.interfaces.to_json()),
            ("fields", self.fields.to_json()),
            ("constructors", self.constructors.to_json()),
            ("methods", self.methods.to_json()),
            ("enumConstants", self.enum_constants.to_json()),
            ("recordComponents", self.record_components.to_json()),
            ("nestedTypes", self.nested_types.to_json()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDoc {
    pub name: String,
    pub qualified_name: String,
    pub type_name: String,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<AnnotationDoc>,
    pub documentation: Option<String>,
    pub constant_value: Option<ConstantDoc>,
}

impl ToJson for FieldDoc {
    fn to_json(&self) -> Value {
        Value::Record(vec![
            ("name", self.name.to_json()),
            ("qualifiedName", self.qualified_name.to_json()),
            ("type", self.type_name.to_json()),
            ("modifiers", self.modifiers.to_json()),
            ("annotations", self.annotations.to_json()),
            ("documentation", self.documentation.to_json()),
            ("constantValue", self.constant_value.to_json()),
        ])
    }
}

/// A field's compile-time constant, already in its output form.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantDoc {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ToJson for ConstantDoc {
    fn to_json(&self) -> Value {
        match self {
            ConstantDoc::Bool(b) => Value::Bool(*b),
            ConstantDoc::Int(n) => Value::Int(*n),
            ConstantDoc::Float(x) => Value::Float(*x),
            ConstantDoc::Text(s) => Value::Text(s.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDoc {
    pub name: String,
    pub qualified_name: String,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<AnnotationDoc>,
    pub type_parameters: Vec<String>,
    pub parameters: Vec<ParameterDoc>,
    pub thrown_types: Vec<String>,
    pub var_args: bool,
    pub documentation: Option<String>,
}

impl ToJson for ConstructorDoc {
    fn to_json(&self) -> Value {
        Value::Record(vec![
            ("name", self.name.to_json()),
            ("qualifiedName", self.qualified_name.to_json()),
            ("modifiers", self.modifiers.to_json()),
            ("annotations", self.annotations.to_json()),
            ("typeParameters", self.type_parameters.to_json()),
            ("parameters", self.parameters.to_json()),
            ("thrownTypes", self.thrown_types.to_json()),
            ("varArgs", self.var_args.to_json()),
            ("documentation", self.documentation.to_json()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDoc {
    pub name: String,
    pub qualified_name: String,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<AnnotationDoc>,
    pub type_parameters: Vec<String>,
    pub return_type: String,
    pub parameters: Vec<ParameterDoc>,
    pub thrown_types: Vec<String>,
    pub var_args: bool,
    pub documentation: Option<String>,
}

impl ToJson for MethodDoc {
    fn to_json(&self) -> Value {
        Value::Record(vec![
            ("name", self.name.to_json()),
            ("qualifiedName", self.qualified_name.to_json()),
            ("modifiers", self.modifiers.to_json()),
            ("annotations", self.annotations.to_json()),
            ("typeParameters", self.type_parameters.to_json()),
            ("returnType", self.return_type.to_json()),
            ("parameters", self.parameters.to_json()),
            ("thrownTypes", self.thrown_types.to_json()),
            ("varArgs", self.var_args.to_json()),
            ("documentation", self.documentation.to_json()),
        ])
    }
}

/// Method or constructor parameter, kept in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDoc {
    pub name: String,
    pub type_name: String,
    pub var_args: bool,
    pub annotations: Vec<AnnotationDoc>,
}

impl ToJson for ParameterDoc {
    fn to_json(&self) -> Value {
        Value::Record(vec![
            ("name", self.name.to_json()),
            ("type", self.type_name.to_json()),
            ("varArgs", self.var_args.to_json()),
            ("annotations", self.annotations.to_json()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstantDoc {
    pub name: String,
    pub qualified_name: String,
    pub annotations: Vec<AnnotationDoc>,
    pub documentation: Option<String>,
}

impl ToJson for EnumConstantDoc {
    fn to_json(&self) -> Value {
        Value::Record(vec![
            ("name", self.name.to_json()),
            ("qualifiedName", self.qualified_name.to_json()),
            ("annotations", self.annotations.to_json()),
            ("documentation", self.documentation.to_json()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordComponentDoc {
    pub name: String,
    pub type_name: String,
    pub annotations: Vec<AnnotationDoc>,
    pub documentation: Option<String>,
}

impl ToJson for RecordComponentDoc {
    fn to_json(&self) -> Value {
        Value::Record(vec![
            ("name", self.name.to_json()),
            ("type", self.type_name.to_json()),
            ("annotations", self.annotations.to_json()),
            ("documentation", self.documentation.to_json()),
        ])
    }
}

/// Summary of a directly nested type. The full body lives in its own file.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedTypeDoc {
    pub name: String,
    pub qualified_name: String,
    pub kind: ElementKind,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<AnnotationDoc>,
}

impl ToJson for NestedTypeDoc {
    fn to_json(&self) -> Value {
        Value::Record(vec![
            ("name", self.name.to_json()),
            ("qualifiedName", self.qualified_name.to_json()),
            ("kind", self.kind.to_json()),
            ("modifiers", self.modifiers.to_json()),
            ("annotations", self.annotations.to_json()),
        ])
    }
}

/// Applied annotation with every attribute rendered as display text.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDoc {
    pub annotation_type: String,
    pub values: BTreeMap<String, String>,
}

impl ToJson for AnnotationDoc {
    fn to_json(&self) -> Value {
        Value::Record(vec![
            ("annotationType", self.annotation_type.to_json()),
            ("values", self.values.to_json()),
        ])
    }
}
