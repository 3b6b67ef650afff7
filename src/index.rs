//! Per-directory `index.json` manifests.
//!
//! Every output directory that receives a file or a package summary gets an
//! index listing its files and subdirectories. Registering content in a
//! directory also registers that directory with each ancestor up to the
//! output root, so the whole tree is reachable from the root index.

use crate::error::Error;
use crate::json::{self, IndexView, ToJson, Value};
use crate::model::PackageDoc;
use crate::symbols::ElementKind;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

pub const INDEX_FILE_NAME: &str = "index.json";

/// A generated JSON artifact in the index's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub file: String,
    /// Qualified name with the package prefix stripped.
    pub name: String,
    pub qualified_name: String,
    pub kind: ElementKind,
}

impl ToJson for FileEntry {
    fn to_json(&self) -> Value {
        Value::Record(vec![
            ("file", self.file.to_json()),
            ("name", self.name.to_json()),
            ("qualifiedName", self.qualified_name.to_json()),
            ("kind", self.kind.to_json()),
        ])
    }
}

/// Pointer to a child directory holding its own index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdirectoryEntry {
    pub name: String,
    /// Path of the child relative to this directory.
    pub path: String,
}

impl ToJson for SubdirectoryEntry {
    fn to_json(&self) -> Value {
        Value::Record(vec![
            ("name", self.name.to_json()),
            ("path", self.path.to_json()),
        ])
    }
}

/// Index of one output directory. Entries keep first-registration order and
/// registering an equal entry again is a no-op.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DirectoryIndex {
    package: Option<PackageDoc>,
    files: Vec<FileEntry>,
    subdirectories: Vec<SubdirectoryEntry>,
}

impl DirectoryIndex {
    pub fn add_file(&mut self, entry: FileEntry) {
        if !self.files.contains(&entry) {
            self.files.push(entry);
        }
    }

    pub fn add_subdirectory(&mut self, entry: SubdirectoryEntry) {
        if !self.subdirectories.contains(&entry) {
            self.subdirectories.push(entry);
        }
    }

    /// Replace the package summary of this directory.
    pub fn set_package(&mut self, package: PackageDoc) {
        self.package = Some(package);
    }

    pub fn package(&self) -> Option<&PackageDoc> {
        self.package.as_ref()
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn subdirectories(&self) -> &[SubdirectoryEntry] {
        &self.subdirectories
    }
}

impl ToJson for DirectoryIndex {
    fn to_json(&self) -> Value {
        Value::Index(IndexView {
            package: self.package.as_ref().map(|p| Box::new(p.to_json())),
            files: self.files.iter().map(ToJson::to_json).collect(),
            subdirectories: self.subdirectories.iter().map(ToJson::to_json).collect(),
        })
    }
}

/// Outcome of writing every index to disk.
#[derive(Debug, Default)]
pub struct IndexFlush {
    pub written: usize,
    pub failures: Vec<(PathBuf, Error)>,
}

/// All directory indexes of a run, keyed by directory path.
///
/// Owned by the traversal driver; nothing else mutates it.
#[derive(Debug)]
pub struct IndexTable {
    root: PathBuf,
    indexes: BTreeMap<PathBuf, DirectoryIndex>,
}

impl IndexTable {
    /// `root` bounds ancestor propagation and should already be canonical.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            indexes: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get_or_create(&mut self, dir: &Path) -> &mut DirectoryIndex {
        self.indexes.entry(dir.to_path_buf()).or_default()
    }

    pub fn get(&self, dir: &Path) -> Option<&DirectoryIndex> {
        self.indexes.get(dir)
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    pub fn add_file(&mut self, dir: &Path, entry: FileEntry) {
        self.get_or_create(dir).add_file(entry);
    }

    pub fn add_subdirectory(&mut self, dir: &Path, entry: SubdirectoryEntry) {
        self.get_or_create(dir).add_subdirectory(entry);
    }

    pub fn set_package_summary(&mut self, dir: &Path, summary: PackageDoc) {
        self.get_or_create(dir).set_package(summary);
    }

    /// Register `dir` with its parent, the parent with its own parent, and
    /// so on, stopping at the output root.
    ///
    /// Containment is tested per path component, so a sibling such as
    /// `out-old` is never treated as lying inside `out`.
    pub fn propagate_ancestors(&mut self, dir: &Path) {
        let mut current = dir.to_path_buf();
        while let Some(parent) = current.parent() {
            if !parent.starts_with(&self.root) {
                break;
            }
            let parent = parent.to_path_buf();
            let name = match current.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => current.to_string_lossy().into_owned(),
            };
            let path = match current.strip_prefix(&parent) {
                Ok(relative) => relative.to_string_lossy().into_owned(),
                Err(_) => name.clone(),
            };
            self.add_subdirectory(&parent, SubdirectoryEntry { name, path });
            current = parent;
        }
    }

    /// Write `<dir>/index.json` for every registered directory.
    ///
    /// A failing directory is recorded and the remaining ones are still
    /// attempted.
    pub fn flush(&self, pretty: bool) -> IndexFlush {
        let mut outcome = IndexFlush::default();
        for (dir, index) in &self.indexes {
            let path = dir.join(INDEX_FILE_NAME);
            match json::write_file(&path, &index.to_json(), pretty) {
                Ok(()) => {
                    debug!(path = %path.display(), "wrote index");
                    outcome.written += 1;
                }
                Err(e) => {
                    error!("failed to write index {}: {}", path.display(), e);
                    outcome.failures.push((dir.clone(), e));
                }
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(file: &str) -> FileEntry {
        FileEntry {
            file: file.to_string(),
            name: file.trim_end_matches(".json").to_string(),
            qualified_name: format!("com.example.{}", file.trim_end_matches(".json")),
            kind: ElementKind::Class,
        }
    }

    #[test]
    fn duplicate_entries_are_ignored() {
        let mut index = DirectoryIndex::default();
        index.add_file(entry("A.json"));
        index.add_file(entry("A.json"));
        index.add_file(entry("B.json"));
        let sub = SubdirectoryEntry {
            name: "x".into(),
            path: "x".into(),
        };
        index.add_subdirectory(sub.clone());
        index.add_subdirectory(sub);
        assert_eq!(index.files().len(), 2);
        assert_eq!(index.subdirectories().len(), 1);
    }

    #[test]
    fn entries_differing_in_kind_are_distinct() {
        let mut index = DirectoryIndex::default();
        index.add_file(entry("A.json"));
        let mut other = entry("A.json");
        other.kind = ElementKind::Interface;
        index.add_file(other);
        assert_eq!(index.files().len(), 2);
    }

    #[test]
    fn package_summary_is_replaced() {
        let mut table = IndexTable::new("/out");
        let dir = Path::new("/out/p");
        for doc in ["first", "second"] {
            table.set_package_summary(
                dir,
                PackageDoc {
                    name: "p".into(),
                    qualified_name: "p".into(),
                    documentation: Some(doc.into()),
                },
            );
        }
        let summary = table.get(dir).unwrap().package().unwrap();
        assert_eq!(summary.documentation.as_deref(), Some("second"));
    }

    #[test]
    fn propagation_registers_every_ancestor_up_to_root() {
        let mut table = IndexTable::new("/out");
        table.propagate_ancestors(Path::new("/out/com/example/util"));

        let root = table.get(Path::new("/out")).unwrap();
        assert_eq!(
            root.subdirectories(),
            &[SubdirectoryEntry {
                name: "com".into(),
                path: "com".into()
            }]
        );
        let com = table.get(Path::new("/out/com")).unwrap();
        assert_eq!(com.subdirectories()[0].name, "example");
        let example = table.get(Path::new("/out/com/example")).unwrap();
        assert_eq!(example.subdirectories()[0].path, "util");
        assert!(table.get(Path::new("/")).is_none());
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn propagation_from_root_registers_nothing() {
        let mut table = IndexTable::new("/out");
        table.propagate_ancestors(Path::new("/out"));
        assert!(table.is_empty());
    }

    #[test]
    fn propagation_ignores_sibling_with_shared_prefix() {
        let mut table = IndexTable::new("/out");
        table.propagate_ancestors(Path::new("/out-old/com"));
        assert!(table.is_empty());
    }

    #[test]
    fn flush_writes_only_touched_directories() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().to_path_buf();
        let pkg = root.join("com").join("example");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::create_dir_all(root.join("untouched")).unwrap();

        let mut table = IndexTable::new(&root);
        table.add_file(&pkg, entry("Greeter.json"));
        table.propagate_ancestors(&pkg);
        let outcome = table.flush(false);

        assert_eq!(outcome.written, 3);
        assert!(outcome.failures.is_empty());
        assert!(!root.join("untouched").join(INDEX_FILE_NAME).exists());
        assert_eq!(
            std::fs::read_to_string(root.join(INDEX_FILE_NAME)).unwrap(),
            "{\"files\":[],\"subdirectories\":[{\"name\":\"com\",\"path\":\"com\"}]}\n"
        );
        assert_eq!(
            std::fs::read_to_string(pkg.join(INDEX_FILE_NAME)).unwrap(),
            "{\"files\":[{\"file\":\"Greeter.json\",\"name\":\"Greeter\",\"qualifiedName\":\"com.example.Greeter\",\"kind\":\"class\"}],\"subdirectories\":[]}\n"
        );
    }

    #[test]
    fn flush_continues_past_failures() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().to_path_buf();
        let missing = root.join("missing");
        let present = root.join("present");
        std::fs::create_dir_all(&present).unwrap();

        let mut table = IndexTable::new(&root);
        table.add_file(&missing, entry("A.json"));
        table.add_file(&present, entry("B.json"));
        let outcome = table.flush(true);

        assert_eq!(outcome.written, 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].0, missing);
        assert!(present.join(INDEX_FILE_NAME).exists());
    }
}
