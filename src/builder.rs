//! Builds documentation records from symbol-source elements.
//!
//! Builders are pure: they read the source and return a fresh record. All
//! ordering is decided here by explicit sort keys, never by the order the
//! source happens to enumerate members in.

use crate::config::GeneratorConfig;
use crate::model::*;
use crate::symbols::{
    AnnotationMirror, ConstantValue, ElementId, ElementKind, Modifier, SymbolSource,
};
use std::cmp::Ordering;

/// Record builder bound to one source and one visibility policy.
pub struct Builder<'a, S: SymbolSource + ?Sized> {
    source: &'a S,
    config: &'a GeneratorConfig,
}

impl<'a, S: SymbolSource + ?Sized> Builder<'a, S> {
    pub fn new(source: &'a S, config: &'a GeneratorConfig) -> Self {
        Self { source, config }
    }

    /// Private members are dropped unless the configuration includes them;
    /// types matching an exclusion pattern are always dropped.
    pub fn is_visible(&self, id: ElementId) -> bool {
        let src = self.source;
        if !self.config.includes_private() && src.modifiers_of(id).contains(&Modifier::Private) {
            return false;
        }
        !(src.kind_of(id).is_type() && self.config.is_excluded(src.qualified_name_of(id)))
    }

    pub fn package(&self, pkg: ElementId) -> PackageDoc {
        let src = self.source;
        PackageDoc {
            name: src.simple_name_of(pkg).to_string(),
            qualified_name: src.qualified_name_of(pkg).to_string(),
            documentation: src.doc_comment_of(pkg).map(str::to_string),
        }
    }

    /// Qualified name of the package a type is declared in; empty for the
    /// unnamed package.
    pub fn package_name(&self, ty: ElementId) -> String {
        self.source
            .package_of(ty)
            .map(|pkg| self.source.qualified_name_of(pkg).to_string())
            .unwrap_or_default()
    }

    pub fn type_doc(&self, ty: ElementId) -> TypeDoc {
        let src = self.source;
        let kind = src.kind_of(ty);
        let signature = src.signature_of(ty);
        let members = self.visible_members(ty);
        let of_kind = |wanted: ElementKind| {
            members
                .iter()
                .copied()
                .filter(move |&m| src.kind_of(m) == wanted)
        };

        let mut fields: Vec<FieldDoc> = of_kind(ElementKind::Field).map(|m| self.field(m)).collect();
        fields.sort_by(|a, b| by_name(&a.name, &a.qualified_name, &b.name, &b.qualified_name));

        let mut constructors: Vec<(String, ConstructorDoc)> = of_kind(ElementKind::Constructor)
            .map(|m| (self.parameter_signature(m), self.constructor(m)))
            .collect();
        constructors.sort_by(|(sa, a), (sb, b)| a.name.cmp(&b.name).then_with(|| sa.cmp(sb)));

        let mut methods: Vec<(String, MethodDoc)> = of_kind(ElementKind::Method)
            .map(|m| (self.parameter_signature(m), self.method(m)))
            .collect();
        methods.sort_by(|(sa, a), (sb, b)| a.name.cmp(&b.name).then_with(|| sa.cmp(sb)));

        let enum_constants = (kind == ElementKind::Enum).then(|| {
            let mut constants: Vec<EnumConstantDoc> = of_kind(ElementKind::EnumConstant)
                .map(|m| self.enum_constant(m))
                .collect();
            constants.sort_by(|a, b| by_name(&a.name, &a.qualified_name, &b.name, &b.qualified_name));
            constants
        });

        let record_components = (kind == ElementKind::Record).then(|| {
            let mut components: Vec<RecordComponentDoc> = of_kind(ElementKind::RecordComponent)
                .map(|m| self.record_component(m))
                .collect();
            components.sort_by(|a, b| a.name.cmp(&b.name));
            components
        });

        let nested_types = self
            .nested_types(ty)
            .into_iter()
            .map(|n| self.nested_summary(n))
            .collect();

        let mut interfaces = signature.interfaces.clone();
        interfaces.sort();

        TypeDoc {
            name: src.simple_name_of(ty).to_string(),
            qualified_name: src.qualified_name_of(ty).to_string(),
            binary_name: src.binary_name_of(ty).to_string(),
            package_name: self.package_name(ty),
            kind,
            modifiers: sorted_modifiers(src.modifiers_of(ty)),
            annotations: self.annotations(ty),
            documentation: self.documentation(ty),
            type_parameters: signature.type_parameters.clone(),
            super_class: if kind.is_interface_like() {
                None
            } else {
                signature.superclass.clone()
            },
            interfaces,
            fields,
            constructors: constructors.into_iter().map(|(_, c)| c).collect(),
            methods: methods.into_iter().map(|(_, m)| m).collect(),
            enum_constants,
            record_components,
            nested_types,
        }
    }

    /// Visible types declared directly inside `ty`, sorted by qualified name.
    pub fn nested_types(&self, ty: ElementId) -> Vec<ElementId> {
        let src = self.source;
        let mut nested: Vec<ElementId> = self
            .visible_members(ty)
            .into_iter()
            .filter(|&m| src.kind_of(m).is_type())
            .collect();
        nested.sort_by(|&a, &b| {
            src.qualified_name_of(a)
                .cmp(src.qualified_name_of(b))
                .then(a.cmp(&b))
        });
        nested.dedup();
        nested
    }

    /// Output file name: the simple names from the outermost enclosing type
    /// down to `ty`, joined with dots. `Outer.Inner` lands in `Outer.Inner.json`.
    pub fn file_name(&self, ty: ElementId) -> String {
        let src = self.source;
        let mut chain = vec![src.simple_name_of(ty)];
        let mut current = ty;
        while let Some(parent) = src.enclosing_of(current) {
            if !src.kind_of(parent).is_type() {
                break;
            }
            chain.push(src.simple_name_of(parent));
            current = parent;
        }
        chain.reverse();
        format!("{}.json", chain.join("."))
    }

    fn visible_members(&self, ty: ElementId) -> Vec<ElementId> {
        self.source
            .members_of(ty)
            .iter()
            .copied()
            .filter(|&m| self.is_visible(m))
            .collect()
    }

    fn documentation(&self, id: ElementId) -> Option<String> {
        self.source.doc_comment_of(id).map(str::to_string)
    }

    fn annotations(&self, id: ElementId) -> Vec<AnnotationDoc> {
        self.source
            .annotations_of(id)
            .iter()
            .map(annotation_doc)
            .collect()
    }

    /// Qualified name of the element's owner, falling back to its own.
    fn owner_name(&self, id: ElementId) -> &str {
        let src = self.source;
        match src.enclosing_of(id) {
            Some(owner) => src.qualified_name_of(owner),
            None => src.qualified_name_of(id),
        }
    }

    /// Comma-joined parameter types, the secondary sort key of executables.
    fn parameter_signature(&self, id: ElementId) -> String {
        self.source
            .signature_of(id)
            .parameters
            .iter()
            .map(|p| p.type_name.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn parameters(&self, id: ElementId) -> Vec<ParameterDoc> {
        let signature = self.source.signature_of(id);
        let last = signature.parameters.len().saturating_sub(1);
        signature
            .parameters
            .iter()
            .enumerate()
            .map(|(i, p)| ParameterDoc {
                name: p.name.clone(),
                type_name: p.type_name.clone(),
                var_args: signature.var_args && i == last,
                annotations: p.annotations.iter().map(annotation_doc).collect(),
            })
            .collect()
    }

    fn thrown_types(&self, id: ElementId) -> Vec<String> {
        let mut thrown = self.source.signature_of(id).thrown_types.clone();
        thrown.sort();
        thrown
    }

    fn field(&self, id: ElementId) -> FieldDoc {
        let src = self.source;
        let signature = src.signature_of(id);
        FieldDoc {
            name: src.simple_name_of(id).to_string(),
            qualified_name: format!("{}.{}", self.owner_name(id), src.simple_name_of(id)),
            type_name: signature.type_name.clone().unwrap_or_default(),
            modifiers: sorted_modifiers(src.modifiers_of(id)),
            annotations: self.annotations(id),
            documentation: self.documentation(id),
            constant_value: signature.constant_value.as_ref().map(constant_doc),
        }
    }

    fn constructor(&self, id: ElementId) -> ConstructorDoc {
        let src = self.source;
        let owner = src.enclosing_of(id);
        let name = match owner {
            Some(owner) => src.simple_name_of(owner).to_string(),
            None => src.simple_name_of(id).to_string(),
        };
        let signature = src.signature_of(id);
        ConstructorDoc {
            qualified_name: format!("{}({})", self.owner_name(id), self.parameter_signature(id)),
            name,
            modifiers: sorted_modifiers(src.modifiers_of(id)),
            annotations: self.annotations(id),
            type_parameters: signature.type_parameters.clone(),
            parameters: self.parameters(id),
            thrown_types: self.thrown_types(id),
            var_args: signature.var_args,
            documentation: self.documentation(id),
        }
    }

    fn method(&self, id: ElementId) -> MethodDoc {
        let src = self.source;
        let signature = src.signature_of(id);
        MethodDoc {
            name: src.simple_name_of(id).to_string(),
            qualified_name: format!(
                "{}.{}({})",
                self.owner_name(id),
                src.simple_name_of(id),
                self.parameter_signature(id)
            ),
            modifiers: sorted_modifiers(src.modifiers_of(id)),
            annotations: self.annotations(id),
            type_parameters: signature.type_parameters.clone(),
            return_type: signature
                .return_type
                .clone()
                .unwrap_or_else(|| "void".to_string()),
            parameters: self.parameters(id),
            thrown_types: self.thrown_types(id),
            var_args: signature.var_args,
            documentation: self.documentation(id),
        }
    }

    fn enum_constant(&self, id: ElementId) -> EnumConstantDoc {
        let src = self.source;
        EnumConstantDoc {
            name: src.simple_name_of(id).to_string(),
            qualified_name: format!("{}.{}", self.owner_name(id), src.simple_name_of(id)),
            annotations: self.annotations(id),
            documentation: self.documentation(id),
        }
    }

    fn record_component(&self, id: ElementId) -> RecordComponentDoc {
        let src = self.source;
        RecordComponentDoc {
            name: src.simple_name_of(id).to_string(),
            type_name: src.signature_of(id).type_name.clone().unwrap_or_default(),
            annotations: self.annotations(id),
            documentation: self.documentation(id),
        }
    }

    fn nested_summary(&self, id: ElementId) -> NestedTypeDoc {
        let src = self.source;
        NestedTypeDoc {
            name: src.simple_name_of(id).to_string(),
            qualified_name: src.qualified_name_of(id).to_string(),
            kind: src.kind_of(id),
            modifiers: sorted_modifiers(src.modifiers_of(id)),
            annotations: self.annotations(id),
        }
    }
}

/// Format an annotation; attributes without a value render as `"null"`.
pub fn annotation_doc(mirror: &AnnotationMirror) -> AnnotationDoc {
    AnnotationDoc {
        annotation_type: mirror.annotation_type.clone(),
        values: mirror
            .values
            .iter()
            .map(|(attr, value)| {
                let text = match value {
                    Some(literal) => literal.to_string(),
                    None => "null".to_string(),
                };
                (attr.clone(), text)
            })
            .collect(),
    }
}

/// Qualified name with the package prefix removed: `Outer.Inner` for
/// `com.example.Outer.Inner` in `com.example`.
pub fn display_name(qualified_name: &str, package_name: &str) -> String {
    if package_name.is_empty() {
        return qualified_name.to_string();
    }
    qualified_name
        .strip_prefix(package_name)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(qualified_name)
        .to_string()
}

fn sorted_modifiers(modifiers: &[Modifier]) -> Vec<Modifier> {
    let mut sorted = modifiers.to_vec();
    sorted.sort_by_key(|m| m.as_str());
    sorted.dedup();
    sorted
}

fn by_name(a_name: &str, a_qualified: &str, b_name: &str, b_qualified: &str) -> Ordering {
    a_name.cmp(b_name).then_with(|| a_qualified.cmp(b_qualified))
}

/// Non-finite floats have no JSON number form and become display text.
fn constant_doc(value: &ConstantValue) -> ConstantDoc {
    match value {
        ConstantValue::Bool(b) => ConstantDoc::Bool(*b),
        ConstantValue::Int(n) => ConstantDoc::Int(*n),
        ConstantValue::Float(x) if x.is_nan() => ConstantDoc::Text("NaN".to_string()),
        ConstantValue::Float(x) if x.is_infinite() => ConstantDoc::Text(
            if *x > 0.0 { "Infinity" } else { "-Infinity" }.to_string(),
        ),
        ConstantValue::Float(x) => ConstantDoc::Float(*x),
        ConstantValue::Text(s) => ConstantDoc::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolGraph;

    const SHAPES: &str = r#"{
        "packages": [{
            "name": "com.example.shapes",
            "types": [{
                "kind": "class",
                "name": "Canvas",
                "modifiers": ["public", "final"],
                "superclass": "java.lang.Object",
                "interfaces": ["java.lang.Runnable", "java.io.Closeable"],
                "annotations": [{ "type": "java.lang.Deprecated",
                                  "values": { "since": "9", "forRemoval": null } }],
                "members": [
                    { "kind": "method", "name": "draw", "returnType": "void",
                      "parameters": [{ "name": "shapes", "type": "Shape..." }], "varArgs": true },
                    { "kind": "method", "name": "draw", "returnType": "void",
                      "parameters": [{ "name": "a", "type": "int" }, { "name": "b", "type": "int" }],
                      "thrownTypes": ["java.io.IOException", "java.awt.AWTException"] },
                    { "kind": "constructor", "name": "<init>", "modifiers": ["public"] },
                    { "kind": "field", "name": "width", "type": "int", "modifiers": ["public"] },
                    { "kind": "field", "name": "SCALE", "type": "double",
                      "modifiers": ["static", "public", "final"], "constantValue": 1.5 },
                    { "kind": "field", "name": "secret", "type": "int", "modifiers": ["private"] },
                    { "kind": "enum", "name": "Mode", "modifiers": ["public", "static"],
                      "members": [
                        { "kind": "enum_constant", "name": "STROKE" },
                        { "kind": "enum_constant", "name": "FILL" },
                        { "kind": "field", "name": "label", "type": "java.lang.String" }
                      ] },
                    { "kind": "record", "name": "Point", "modifiers": ["public"],
                      "members": [
                        { "kind": "record_component", "name": "y", "type": "int" },
                        { "kind": "record_component", "name": "x", "type": "int" }
                      ] },
                    { "kind": "interface", "name": "Hidden", "modifiers": ["private"],
                      "superclass": "ignored" }
                ]
            }]
        }]
    }"#;

    fn find(graph: &SymbolGraph, qualified: &str) -> ElementId {
        graph
            .included_elements()
            .into_iter()
            .find(|&id| graph.qualified_name_of(id) == qualified)
            .unwrap()
    }

    fn canvas(config: &GeneratorConfig) -> TypeDoc {
        let graph = SymbolGraph::from_json(SHAPES).unwrap();
        let id = find(&graph, "com.example.shapes.Canvas");
        Builder::new(&graph, config).type_doc(id)
    }

    #[test]
    fn type_header() {
        let doc = canvas(&GeneratorConfig::default());
        assert_eq!(doc.name, "Canvas");
        assert_eq!(doc.package_name, "com.example.shapes");
        assert_eq!(doc.kind, ElementKind::Class);
        assert_eq!(doc.modifiers, vec![Modifier::Final, Modifier::Public]);
        assert_eq!(doc.super_class.as_deref(), Some("java.lang.Object"));
        assert_eq!(doc.interfaces, vec!["java.io.Closeable", "java.lang.Runnable"]);
        assert_eq!(doc.enum_constants, None);
        assert_eq!(doc.record_components, None);
    }

    #[test]
    fn annotation_values_render_as_text() {
        let doc = canvas(&GeneratorConfig::default());
        let annotation = &doc.annotations[0];
        assert_eq!(annotation.annotation_type, "java.lang.Deprecated");
        let values: Vec<_> = annotation.values.iter().collect();
        assert_eq!(
            values,
            vec![
                (&"forRemoval".to_string(), &"null".to_string()),
                (&"since".to_string(), &"9".to_string())
            ]
        );
    }

    #[test]
    fn fields_sorted_and_private_hidden_by_default() {
        let doc = canvas(&GeneratorConfig::default());
        let names: Vec<_> = doc.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["SCALE", "width"]);
        assert_eq!(doc.fields[0].qualified_name, "com.example.shapes.Canvas.SCALE");
        assert_eq!(doc.fields[0].constant_value, Some(ConstantDoc::Float(1.5)));
        assert_eq!(
            doc.fields[0].modifiers,
            vec![Modifier::Final, Modifier::Public, Modifier::Static]
        );
    }

    #[test]
    fn include_private_keeps_private_members() {
        let doc = canvas(&GeneratorConfig::default().include_private(true));
        assert_eq!(doc.fields.len(), 3);
        let hidden = doc.nested_types.iter().find(|n| n.name == "Hidden").unwrap();
        assert_eq!(hidden.kind, ElementKind::Interface);
    }

    #[test]
    fn methods_sorted_by_name_then_parameter_types() {
        let doc = canvas(&GeneratorConfig::default());
        let keys: Vec<_> = doc.methods.iter().map(|m| m.qualified_name.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "com.example.shapes.Canvas.draw(Shape...)",
                "com.example.shapes.Canvas.draw(int,int)"
            ]
        );
        assert!(doc.methods[0].var_args);
        assert!(doc.methods[0].parameters[0].var_args);
        assert!(!doc.methods[1].parameters[1].var_args);
        assert_eq!(
            doc.methods[1].thrown_types,
            vec!["java.awt.AWTException", "java.io.IOException"]
        );
    }

    #[test]
    fn constructor_named_after_owner() {
        let doc = canvas(&GeneratorConfig::default());
        assert_eq!(doc.constructors.len(), 1);
        assert_eq!(doc.constructors[0].name, "Canvas");
        assert_eq!(doc.constructors[0].qualified_name, "com.example.shapes.Canvas()");
    }

    #[test]
    fn nested_summaries_sorted_without_members() {
        let doc = canvas(&GeneratorConfig::default());
        let names: Vec<_> = doc.nested_types.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Mode", "Point"]);
        assert_eq!(doc.nested_types[0].qualified_name, "com.example.shapes.Canvas.Mode");
    }

    #[test]
    fn enum_constants_listed_separately_from_fields() {
        let graph = SymbolGraph::from_json(SHAPES).unwrap();
        let config = GeneratorConfig::default();
        let mode = find(&graph, "com.example.shapes.Canvas.Mode");
        let doc = Builder::new(&graph, &config).type_doc(mode);
        let constants: Vec<_> = doc
            .enum_constants
            .as_ref()
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(constants, vec!["FILL", "STROKE"]);
        assert_eq!(doc.fields.len(), 1);
        assert_eq!(doc.binary_name, "com.example.shapes.Canvas$Mode");
    }

    #[test]
    fn record_components_sorted() {
        let graph = SymbolGraph::from_json(SHAPES).unwrap();
        let config = GeneratorConfig::default();
        let point = find(&graph, "com.example.shapes.Canvas.Point");
        let doc = Builder::new(&graph, &config).type_doc(point);
        let names: Vec<_> = doc
            .record_components
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn interfaces_have_no_superclass() {
        let graph = SymbolGraph::from_json(SHAPES).unwrap();
        let config = GeneratorConfig::default().include_private(true);
        let hidden = find(&graph, "com.example.shapes.Canvas.Hidden");
        let doc = Builder::new(&graph, &config).type_doc(hidden);
        assert_eq!(doc.super_class, None);
    }

    #[test]
    fn file_name_joins_enclosing_chain() {
        let graph = SymbolGraph::from_json(SHAPES).unwrap();
        let config = GeneratorConfig::default();
        let builder = Builder::new(&graph, &config);
        assert_eq!(
            builder.file_name(find(&graph, "com.example.shapes.Canvas.Mode")),
            "Canvas.Mode.json"
        );
        assert_eq!(
            builder.file_name(find(&graph, "com.example.shapes.Canvas")),
            "Canvas.json"
        );
    }

    #[test]
    fn excluded_nested_types_are_not_summarized() {
        let graph = SymbolGraph::from_json(SHAPES).unwrap();
        let config = GeneratorConfig::default().exclude(&["\\.Point$"]).unwrap();
        let canvas = find(&graph, "com.example.shapes.Canvas");
        let nested = Builder::new(&graph, &config).nested_types(canvas);
        assert_eq!(nested.len(), 1);
    }

    #[test]
    fn display_name_strips_package() {
        assert_eq!(display_name("com.example.Outer.Inner", "com.example"), "Outer.Inner");
        assert_eq!(display_name("Point", ""), "Point");
        assert_eq!(display_name("com.examples.X", "com.example"), "com.examples.X");
    }

    #[test]
    fn non_finite_constants_become_text() {
        assert_eq!(
            constant_doc(&ConstantValue::Float(f64::NEG_INFINITY)),
            ConstantDoc::Text("-Infinity".into())
        );
        assert_eq!(
            constant_doc(&ConstantValue::Float(f64::NAN)),
            ConstantDoc::Text("NaN".into())
        );
    }
}
