//! Traversal driver: walks the symbol source and writes the JSON tree.
//!
//! Packages and top-level types are sorted by qualified name and processed
//! depth-first. Each type is written to its package directory and registered
//! in that directory's index; nested types follow their parent as separate
//! files. Indexes are flushed once, after every item has been attempted.

use crate::builder::{display_name, Builder};
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::index::{FileEntry, IndexTable};
use crate::json::{self, ToJson};
use crate::symbols::{ElementId, ElementKind, SymbolSource};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// A package, type or index that could not be written.
#[derive(Debug)]
pub struct Failure {
    /// Qualified name of the item, or the directory of a failed index.
    pub subject: String,
    pub error: Error,
}

/// Summary of one generation run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub packages: usize,
    pub type_files: usize,
    pub index_files: usize,
    pub failures: Vec<Failure>,
    pub elapsed: Duration,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Output directory of a package: the root joined with the dotted name as
/// path segments. The unnamed package maps to the root itself.
pub fn package_directory(root: &Path, package_name: &str) -> PathBuf {
    if package_name.is_empty() {
        return root.to_path_buf();
    }
    package_name
        .split('.')
        .fold(root.to_path_buf(), |dir, segment| dir.join(segment))
}

/// Generate the full documentation tree for `source`.
///
/// Only a failure to create the output root is returned as an error.
/// Per-item and index failures are collected in the report while the
/// remaining items are still processed; whatever was written stays on disk.
pub fn generate<S: SymbolSource + ?Sized>(
    source: &S,
    config: &GeneratorConfig,
) -> Result<GenerationReport> {
    let start = Instant::now();
    let output = config.output_dir();
    fs::create_dir_all(output)
        .map_err(|e| Error::io("unable to create output directory", output, e))?;
    let root = fs::canonicalize(output)
        .map_err(|e| Error::io("unable to resolve output directory", output, e))?;

    info!("output directory: {}", root.display());
    info!(
        "pretty print: {}, include private: {}",
        config.is_pretty(),
        config.includes_private()
    );

    let (packages, types) = collect_roots(source);
    let mut run = Generator {
        source,
        config,
        builder: Builder::new(source, config),
        root: root.clone(),
        indexes: IndexTable::new(root),
        report: GenerationReport::default(),
    };

    for pkg in packages {
        let name = source.qualified_name_of(pkg);
        if config.is_excluded(name) {
            debug!("excluded package {}", name);
            continue;
        }
        if let Err(e) = run.process_package(pkg) {
            run.fail(name.to_string(), e);
        }
    }

    for ty in types {
        if !run.builder.is_visible(ty) {
            debug!("skipped type {}", source.qualified_name_of(ty));
            continue;
        }
        if let Err(e) = run.process_type(ty) {
            run.fail(source.qualified_name_of(ty).to_string(), e);
        }
    }

    let flush = run.indexes.flush(config.is_pretty());
    run.report.index_files = flush.written;
    for (dir, e) in flush.failures {
        run.report.failures.push(Failure {
            subject: dir.display().to_string(),
            error: e,
        });
    }

    let mut report = run.report;
    report.elapsed = start.elapsed();
    if report.is_success() {
        info!(
            "wrote {} type files and {} indexes for {} packages in {} ms",
            report.type_files,
            report.index_files,
            report.packages,
            report.elapsed.as_millis()
        );
    } else {
        error!(
            "completed with {} failures in {} ms",
            report.failures.len(),
            report.elapsed.as_millis()
        );
    }
    Ok(report)
}

/// Root packages and root types (enclosed by a package), each sorted by
/// qualified name with duplicates removed.
fn collect_roots<S: SymbolSource + ?Sized>(source: &S) -> (Vec<ElementId>, Vec<ElementId>) {
    let mut packages = Vec::new();
    let mut types = Vec::new();
    for id in source.included_elements() {
        let kind = source.kind_of(id);
        if kind == ElementKind::Package {
            packages.push(id);
        } else if kind.is_type() {
            let top_level = match source.enclosing_of(id) {
                Some(enclosing) => source.kind_of(enclosing) == ElementKind::Package,
                None => true,
            };
            if top_level {
                types.push(id);
            }
        }
    }
    let by_name = |a: &ElementId, b: &ElementId| {
        source
            .qualified_name_of(*a)
            .cmp(source.qualified_name_of(*b))
            .then(a.cmp(b))
    };
    packages.sort_by(by_name);
    packages.dedup();
    types.sort_by(by_name);
    types.dedup();
    (packages, types)
}

struct Generator<'a, S: SymbolSource + ?Sized> {
    source: &'a S,
    config: &'a GeneratorConfig,
    builder: Builder<'a, S>,
    root: PathBuf,
    indexes: IndexTable,
    report: GenerationReport,
}

impl<S: SymbolSource + ?Sized> Generator<'_, S> {
    fn fail(&mut self, subject: String, error: Error) {
        error!("{}: {}", subject, error);
        self.report.failures.push(Failure { subject, error });
    }

    fn create_dir(dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| Error::io("unable to create directory", dir, e))
    }

    fn process_package(&mut self, pkg: ElementId) -> Result<()> {
        let dir = package_directory(&self.root, self.source.qualified_name_of(pkg));
        Self::create_dir(&dir)?;
        let summary = self.builder.package(pkg);
        self.indexes.set_package_summary(&dir, summary);
        self.indexes.propagate_ancestors(&dir);
        self.report.packages += 1;
        Ok(())
    }

    /// Write `ty`, then recurse into its nested types. An error aborts the
    /// rest of this subtree.
    fn process_type(&mut self, ty: ElementId) -> Result<()> {
        let package_name = self.builder.package_name(ty);
        let dir = package_directory(&self.root, &package_name);
        Self::create_dir(&dir)?;

        let doc = self.builder.type_doc(ty);
        let file = self.builder.file_name(ty);
        let path = dir.join(&file);
        json::write_file(&path, &doc.to_json(), self.config.is_pretty())?;
        debug!(path = %path.display(), "wrote type");
        self.report.type_files += 1;

        self.indexes.add_file(
            &dir,
            FileEntry {
                file,
                name: display_name(&doc.qualified_name, &package_name),
                qualified_name: doc.qualified_name.clone(),
                kind: doc.kind,
            },
        );
        self.indexes.propagate_ancestors(&dir);

        for nested in self.builder.nested_types(ty) {
            self.process_type(nested)?;
        }
        Ok(())
    }
}
