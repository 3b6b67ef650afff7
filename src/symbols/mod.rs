//! Resolved symbol model consumed by the generator.
//!
//! [`SymbolSource`] is the read-only view of packages, types and members that
//! an upstream front end has already parsed and resolved. [`SymbolGraph`] is
//! the in-memory implementation loaded from symbol-graph JSON files.

pub mod graph;

pub use graph::SymbolGraph;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Handle to an element owned by a [`SymbolSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub usize);

/// Syntactic kind of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Package,
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
    Field,
    EnumConstant,
    Method,
    Constructor,
    RecordComponent,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Package => "package",
            ElementKind::Class => "class",
            ElementKind::Interface => "interface",
            ElementKind::Enum => "enum",
            ElementKind::Annotation => "annotation",
            ElementKind::Record => "record",
            ElementKind::Field => "field",
            ElementKind::EnumConstant => "enum_constant",
            ElementKind::Method => "method",
            ElementKind::Constructor => "constructor",
            ElementKind::RecordComponent => "record_component",
        }
    }

    /// Class, interface, enum, annotation or record.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            ElementKind::Class
                | ElementKind::Interface
                | ElementKind::Enum
                | ElementKind::Annotation
                | ElementKind::Record
        )
    }

    /// Kinds that never have a superclass.
    pub fn is_interface_like(self) -> bool {
        matches!(self, ElementKind::Interface | ElementKind::Annotation)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Default,
    Static,
    Sealed,
    NonSealed,
    Final,
    Transient,
    Volatile,
    Synchronized,
    Native,
    Strictfp,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Default => "default",
            Modifier::Static => "static",
            Modifier::Sealed => "sealed",
            Modifier::NonSealed => "non-sealed",
            Modifier::Final => "final",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Strictfp => "strictfp",
        }
    }
}

/// An annotation applied to an element.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnnotationMirror {
    #[serde(rename = "type")]
    pub annotation_type: String,
    /// Declared attributes; `None` when the attribute has no value.
    #[serde(default)]
    pub values: BTreeMap<String, Option<AnnotationLiteral>>,
}

/// Attribute value of an annotation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AnnotationLiteral {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<AnnotationLiteral>),
}

impl fmt::Display for AnnotationLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationLiteral::Bool(b) => write!(f, "{b}"),
            AnnotationLiteral::Int(n) => write!(f, "{n}"),
            AnnotationLiteral::Float(x) => write!(f, "{x:?}"),
            AnnotationLiteral::Text(s) => f.write_str(s),
            AnnotationLiteral::List(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Compile-time constant value of a field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConstantValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// A declared parameter of a method or constructor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub annotations: Vec<AnnotationMirror>,
}

/// Declaration details beyond names and modifiers. Fields that do not apply
/// to an element's kind are left empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Signature {
    pub type_parameters: Vec<String>,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    /// Declared type of a field or record component.
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub return_type: Option<String>,
    pub parameters: Vec<ParameterInfo>,
    pub thrown_types: Vec<String>,
    pub var_args: bool,
    pub constant_value: Option<ConstantValue>,
}

/// Read-only access to a resolved element graph.
pub trait SymbolSource {
    /// Root set of included elements, in no particular order.
    fn included_elements(&self) -> Vec<ElementId>;

    fn kind_of(&self, id: ElementId) -> ElementKind;

    fn simple_name_of(&self, id: ElementId) -> &str;

    /// Canonical dotted name; members are qualified by their owner.
    fn qualified_name_of(&self, id: ElementId) -> &str;

    /// Like the qualified name, but nested types are joined with `$`.
    fn binary_name_of(&self, id: ElementId) -> &str;

    fn modifiers_of(&self, id: ElementId) -> &[Modifier];

    fn annotations_of(&self, id: ElementId) -> &[AnnotationMirror];

    fn doc_comment_of(&self, id: ElementId) -> Option<&str>;

    /// Enclosing package or type; `None` for packages.
    fn enclosing_of(&self, id: ElementId) -> Option<ElementId>;

    /// Directly declared members in declaration order.
    fn members_of(&self, id: ElementId) -> &[ElementId];

    fn signature_of(&self, id: ElementId) -> &Signature;

    /// The package an element is declared in, found by walking enclosing
    /// scopes.
    fn package_of(&self, id: ElementId) -> Option<ElementId> {
        let mut current = id;
        loop {
            if self.kind_of(current) == ElementKind::Package {
                return Some(current);
            }
            current = self.enclosing_of(current)?;
        }
    }
}
