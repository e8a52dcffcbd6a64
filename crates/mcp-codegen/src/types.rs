//! In-memory file sets produced by code generation.
//!
//! # Examples
//!
//! ```
//! use mcp_codegen::{GeneratedCode, GeneratedFile};
//!
//! let mut code = GeneratedCode::new();
//! code.add_file(GeneratedFile::new("runs/getRun.ts", "export {};\n"));
//!
//! assert_eq!(code.file_count(), 1);
//! assert!(code.get("runs/getRun.ts").is_some());
//! ```

use serde::{Deserialize, Serialize};

/// A set of generated files, in generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCode {
    /// Files with paths relative to the package root
    pub files: Vec<GeneratedFile>,
}

impl GeneratedCode {
    /// Creates an empty file set.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Appends a file.
    pub fn add_file(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    /// Returns the number of files.
    #[inline]
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Iterates the files in generation order.
    #[inline]
    pub fn files(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files.iter()
    }

    /// Finds a file by its relative path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }
}

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Path relative to the package root, `/`-separated
    pub path: String,
    /// Full file contents
    pub content: String,
}

impl GeneratedFile {
    /// Creates a file.
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Returns the relative path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the contents.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}
