//! Generator configuration.

use crate::error::Result;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Default output root, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "build/json-doclet";

/// Immutable settings for one generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    output_dir: PathBuf,
    pretty: bool,
    include_private: bool,
    exclude: Vec<Regex>,
}

impl GeneratorConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            pretty: false,
            include_private: false,
            exclude: Vec::new(),
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn include_private(mut self, include_private: bool) -> Self {
        self.include_private = include_private;
        self
    }

    /// Compile and add qualified-name exclusion patterns.
    pub fn exclude<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for pattern in patterns {
            self.exclude.push(Regex::new(pattern.as_ref())?);
        }
        Ok(self)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    pub fn includes_private(&self) -> bool {
        self.include_private
    }

    /// True when a package or type with this qualified name must be skipped.
    pub fn is_excluded(&self, qualified_name: &str) -> bool {
        self.exclude.iter().any(|re| re.is_match(qualified_name))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}
