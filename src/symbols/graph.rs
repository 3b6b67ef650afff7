//! In-memory symbol graph loaded from symbol-graph JSON files.
//!
//! A file describes packages, the types declared in them and their members
//! as a tree. Loading flattens the tree into an arena and computes every
//! qualified and binary name once, up front.

use super::{
    AnnotationMirror, ElementId, ElementKind, Modifier, Signature, SymbolSource,
};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct GraphFile {
    #[serde(default)]
    packages: Vec<PackageNode>,
}

#[derive(Debug, Deserialize)]
struct PackageNode {
    #[serde(default)]
    name: String,
    #[serde(default)]
    doc: Option<String>,
    #[serde(default)]
    types: Vec<ElementNode>,
}

/// A type or member declaration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElementNode {
    kind: ElementKind,
    name: String,
    #[serde(default)]
    modifiers: Vec<Modifier>,
    #[serde(default)]
    annotations: Vec<AnnotationMirror>,
    #[serde(default)]
    doc: Option<String>,
    #[serde(default)]
    members: Vec<ElementNode>,
    #[serde(flatten)]
    signature: Signature,
}

#[derive(Debug)]
struct Element {
    kind: ElementKind,
    simple_name: String,
    qualified_name: String,
    binary_name: String,
    modifiers: Vec<Modifier>,
    annotations: Vec<AnnotationMirror>,
    doc: Option<String>,
    enclosing: Option<ElementId>,
    members: Vec<ElementId>,
    signature: Signature,
}

/// Arena-backed [`SymbolSource`].
#[derive(Debug, Default)]
pub struct SymbolGraph {
    elements: Vec<Element>,
    included: Vec<ElementId>,
    packages: HashMap<String, ElementId>,
    types: HashSet<String>,
}

impl SymbolGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and merge several symbol-graph files, in the given order.
    pub fn load(paths: &[impl AsRef<Path>]) -> Result<Self> {
        let mut graph = Self::new();
        for path in paths {
            graph.merge_file(path.as_ref())?;
        }
        Ok(graph)
    }

    /// Parse a single symbol-graph document.
    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        let mut graph = Self::new();
        graph.merge_json(text)?;
        Ok(graph)
    }

    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let text =
            fs::read_to_string(path).map_err(|e| Error::io("failed to read", path, e))?;
        debug!(path = %path.display(), "loading symbol graph");
        self.merge_json(&text).map_err(|source| Error::SymbolGraph {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Merge another document into this graph.
    ///
    /// Packages sharing a qualified name become one element; the first
    /// non-empty doc comment wins. A type whose qualified name is already
    /// present is skipped together with its members.
    pub fn merge_json(&mut self, text: &str) -> std::result::Result<(), serde_json::Error> {
        let file: GraphFile = serde_json::from_str(text)?;
        for package in file.packages {
            let pkg_id = self.package(package.name, package.doc);
            for node in package.types {
                self.add_type(node, pkg_id);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn package(&mut self, name: String, doc: Option<String>) -> ElementId {
        if let Some(&id) = self.packages.get(&name) {
            let existing = &mut self.elements[id.0];
            if existing.doc.as_deref().map_or(true, str::is_empty) {
                if let Some(doc) = doc.filter(|d| !d.is_empty()) {
                    existing.doc = Some(doc);
                }
            }
            return id;
        }
        let simple_name = name.rsplit('.').next().unwrap_or_default().to_string();
        let id = self.push(Element {
            kind: ElementKind::Package,
            simple_name,
            qualified_name: name.clone(),
            binary_name: name.clone(),
            modifiers: Vec::new(),
            annotations: Vec::new(),
            doc,
            enclosing: None,
            members: Vec::new(),
            signature: Signature::default(),
        });
        self.packages.insert(name, id);
        self.included.push(id);
        id
    }

    fn add_type(&mut self, node: ElementNode, enclosing: ElementId) {
        let parent = &self.elements[enclosing.0];
        let (qualified_name, binary_name) = match parent.kind {
            ElementKind::Package if parent.qualified_name.is_empty() => {
                (node.name.clone(), node.name.clone())
            }
            ElementKind::Package => {
                let name = format!("{}.{}", parent.qualified_name, node.name);
                (name.clone(), name)
            }
            _ => (
                format!("{}.{}", parent.qualified_name, node.name),
                format!("{}${}", parent.binary_name, node.name),
            ),
        };
        if !self.types.insert(qualified_name.clone()) {
            warn!(qualified_name = %qualified_name, "duplicate type declaration skipped");
            return;
        }

        let id = self.push(Element {
            kind: node.kind,
            simple_name: node.name,
            qualified_name,
            binary_name,
            modifiers: node.modifiers,
            annotations: node.annotations,
            doc: node.doc,
            enclosing: Some(enclosing),
            members: Vec::new(),
            signature: node.signature,
        });
        self.elements[enclosing.0].members.push(id);
        self.included.push(id);

        for member in node.members {
            if member.kind.is_type() {
                self.add_type(member, id);
            } else {
                self.add_member(member, id);
            }
        }
    }

    fn add_member(&mut self, node: ElementNode, owner: ElementId) {
        let owner_element = &self.elements[owner.0];
        let qualified_name = format!("{}.{}", owner_element.qualified_name, node.name);
        let binary_name = format!("{}.{}", owner_element.binary_name, node.name);
        let id = self.push(Element {
            kind: node.kind,
            simple_name: node.name,
            qualified_name,
            binary_name,
            modifiers: node.modifiers,
            annotations: node.annotations,
            doc: node.doc,
            enclosing: Some(owner),
            members: Vec::new(),
            signature: node.signature,
        });
        self.elements[owner.0].members.push(id);
    }

    fn push(&mut self, element: Element) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(element);
        id
    }

    fn get(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }
}

impl SymbolSource for SymbolGraph {
    fn included_elements(&self) -> Vec<ElementId> {
        self.included.clone()
    }

    fn kind_of(&self, id: ElementId) -> ElementKind {
        self.get(id).kind
    }

    fn simple_name_of(&self, id: ElementId) -> &str {
        &self.get(id).simple_name
    }

    fn qualified_name_of(&self, id: ElementId) -> &str {
        &self.get(id).qualified_name
    }

    fn binary_name_of(&self, id: ElementId) -> &str {
        &self.get(id).binary_name
    }

    fn modifiers_of(&self, id: ElementId) -> &[Modifier] {
        &self.get(id).modifiers
    }

    fn annotations_of(&self, id: ElementId) -> &[AnnotationMirror] {
        &self.get(id).annotations
    }

    fn doc_comment_of(&self, id: ElementId) -> Option<&str> {
        self.get(id).doc.as_deref()
    }

    fn enclosing_of(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).enclosing
    }

    fn members_of(&self, id: ElementId) -> &[ElementId] {
        &self.get(id).members
    }

    fn signature_of(&self, id: ElementId) -> &Signature {
        &self.get(id).signature
    }
}
