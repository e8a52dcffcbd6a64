//! Writing a generated package to disk.
//!
//! Directories are created first, then every file is written through a
//! temporary file in its target directory and renamed into place, so a
//! crash never leaves a half-written file behind.
//!
//! # Examples
//!
//! ```
//! use mcp_codegen::{GeneratedCode, GeneratedFile};
//! use mcp_skill_generator::write_package;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let mut code = GeneratedCode::new();
//! code.add_file(GeneratedFile::new("runs/getRun.ts", "export {};\n"));
//!
//! write_package(&code, temp.path()).unwrap();
//! assert!(temp.path().join("runs/getRun.ts").exists());
//! ```

use mcp_codegen::GeneratedCode;
use mcp_core::{Error, Result};
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Writes every file of `code` below `output_dir`, creating directories as
/// needed and replacing existing files.
///
/// # Errors
///
/// Returns `Error::ValidationError` if a file path is absolute or escapes
/// the output directory, and `Error::IoError` if a directory or file cannot
/// be written.
pub fn write_package(code: &GeneratedCode, output_dir: &Path) -> Result<()> {
    let targets: Vec<(PathBuf, &str)> = code
        .files()
        .map(|file| Ok((resolve(output_dir, file.path())?, file.content())))
        .collect::<Result<_>>()?;

    let mut dirs: BTreeSet<&Path> = BTreeSet::new();
    dirs.insert(output_dir);
    for (path, _) in &targets {
        if let Some(parent) = path.parent() {
            dirs.insert(parent);
        }
    }
    for dir in dirs {
        fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
    }

    for (path, content) in &targets {
        write_atomic(path, content)?;
        debug!("Wrote {}", path.display());
    }

    info!(
        "Wrote {} files to {}",
        targets.len(),
        output_dir.display()
    );
    Ok(())
}

/// Joins a package-relative path onto the output directory.
fn resolve(output_dir: &Path, relative: &str) -> Result<PathBuf> {
    let relative_path = Path::new(relative);
    let safe = !relative.is_empty()
        && relative_path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !safe {
        return Err(Error::ValidationError {
            field: "file path".to_string(),
            reason: format!("'{relative}' is not a relative path inside the package"),
        });
    }
    Ok(output_dir.join(relative_path))
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| io_error(dir, e))?;
    temp.write_all(content.as_bytes())
        .map_err(|e| io_error(temp.path(), e))?;
    temp.as_file().sync_all().map_err(|e| io_error(temp.path(), e))?;
    temp.persist(path).map_err(|e| io_error(path, e.error))?;

    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::IoError {
        path: path.display().to_string(),
        source,
    }
}
