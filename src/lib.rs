//! jsondoc: write a browsable tree of JSON documentation files from a
//! resolved symbol graph.
//!
//! One file per package-level or nested type, grouped into directories that
//! follow the package names, plus an `index.json` per directory listing its
//! files, its subdirectories and the package summary.

pub mod builder;
pub mod config;
pub mod error;
pub mod generate;
pub mod index;
pub mod json;
pub mod model;
pub mod symbols;

pub use config::GeneratorConfig;
pub use error::{Error, Result};
pub use generate::{generate, GenerationReport};
pub use symbols::{SymbolGraph, SymbolSource};
