use anyhow::Result;
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name suffixes identifying type catalog files
const CATALOG_SUFFIXES: &[&str] = &[".types.yaml", ".types.yml", ".types.json"];

/// File scanner for collecting model inputs.
///
/// The `FileScanner` recursively walks a directory to find Rust source files and type
/// catalog files (`*.types.yaml`, `*.types.yml`, `*.types.json`). It skips the `target`
/// directory and hidden directories (those starting with `.`).
///
/// # Example
///
/// ```no_run
/// use model_doclet::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-project"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} Rust files", result.rust_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Result of a directory scan.
pub struct ScanResult {
    /// Paths of all discovered `.rs` files
    pub rust_files: Vec<PathBuf>,
    /// Paths of all discovered type catalog files
    pub catalog_files: Vec<PathBuf>,
    /// Warnings for entries that could not be accessed
    pub warnings: Vec<String>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.rust_files.is_empty() && self.catalog_files.is_empty()
    }
}

/// Whether `path` names a type catalog file
pub fn is_catalog_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| CATALOG_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)))
}

/// Whether `path` names a Rust source file
pub fn is_rust_file(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("rs")
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects Rust and catalog files, in walk order.
    ///
    /// Inaccessible entries are recorded as warnings and scanning continues.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut rust_files = Vec::new();
        let mut catalog_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.path() == self.root_path {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_target = file_name == "target";

                !is_hidden && !is_target
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if !path.is_file() {
                        continue;
                    }

                    if is_rust_file(path) {
                        rust_files.push(path.to_path_buf());
                    } else if is_catalog_file(path) {
                        catalog_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        Ok(ScanResult {
            rust_files,
            catalog_files,
            warnings,
        })
    }
}
