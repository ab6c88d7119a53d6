// src/tools/scanner.rs

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::{PkgdagError, Result};
use crate::fs::FileSystem;
use crate::tools::RepositoryScanner;

/// Default suffix of the artifacts that stand for a built package.
pub const SOURCE_ARTIFACT_SUFFIX: &str = ".src.rpm";

/// Finds artifacts by walking the repository through a [`FileSystem`].
///
/// Every regular file whose name ends with `suffix` counts, at any depth.
/// Symlinked directories below the root are not entered. Results are sorted
/// by path.
#[derive(Debug, Clone)]
pub struct FsRepositoryScanner<F: FileSystem> {
    fs: F,
    suffix: String,
}

impl<F: FileSystem> FsRepositoryScanner<F> {
    pub fn new(fs: F, suffix: impl Into<String>) -> Self {
        Self {
            fs,
            suffix: suffix.into(),
        }
    }
}

impl<F: FileSystem> RepositoryScanner for FsRepositoryScanner<F> {
    fn scan(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let problem = if !self.fs.exists(root) {
            Some("repository root does not exist")
        } else if !self.fs.is_dir(root) {
            Some("repository root is not a directory")
        } else {
            None
        };
        if let Some(reason) = problem {
            return Err(PkgdagError::Scan {
                path: root.to_path_buf(),
                reason: reason.to_string(),
            });
        }

        let mut found = Vec::new();
        let mut stack = vec![root.to_path_buf()];

        while let Some(dir) = stack.pop() {
            let entries = self.fs.read_dir(&dir).map_err(|e| PkgdagError::Scan {
                path: dir.clone(),
                reason: format!("{e:#}"),
            })?;

            for entry in entries {
                if self.fs.is_symlink(&entry) && self.fs.is_dir(&entry) {
                    debug!(path = ?entry, "skipping symlinked directory");
                } else if self.fs.is_dir(&entry) {
                    stack.push(entry);
                } else if self.fs.is_file(&entry)
                    && entry
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.ends_with(&self.suffix))
                {
                    debug!(artifact = ?entry, "found artifact");
                    found.push(entry);
                }
            }
        }

        found.sort();
        info!(root = ?root, artifacts = found.len(), "repository scanned");
        Ok(found)
    }
}
