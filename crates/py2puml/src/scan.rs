//! Source discovery
//!
//! Finds `*.py` files below a root in a stable order, skipping hidden entries
//! and anything matched by a `.gitignore` on the way down.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::{debug, trace, warn};
use walkdir::{DirEntry, WalkDir};

use crate::core::{Py2PumlError, ScanOptions};

/// Collects Python source files below a root directory
#[derive(Debug, Clone, Default)]
pub struct SourceScanner {
    options: ScanOptions,
}

impl SourceScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Collect all `*.py` files below `root`, sorted by path.
    ///
    /// Fails only when `root` itself cannot be read. Unreadable entries
    /// further down are logged and skipped.
    pub fn collect(&self, root: impl AsRef<Path>) -> Result<Vec<PathBuf>, Py2PumlError> {
        let root = root.as_ref();
        debug!("Collecting Python files from: {}", root.display());

        fs::metadata(root).map_err(|e| Py2PumlError::scan_error(root, e.to_string()))?;

        let use_gitignore = self.options.use_gitignore;
        let mut ignores: Vec<IgnoreFile> = Vec::new();
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() > 0 && is_hidden(entry) {
                    return false;
                }
                if ignores.iter().any(|ignore| ignore.is_ignored(entry.path())) {
                    trace!("Ignored: {}", entry.path().display());
                    return false;
                }
                if use_gitignore && entry.file_type().is_dir() {
                    if let Some(ignore) = IgnoreFile::load(entry.path()) {
                        ignores.push(ignore);
                    }
                }
                true
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(Py2PumlError::scan_error(root, err.to_string()));
                }
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };
            if entry.file_type().is_file() && is_python(entry.path()) {
                trace!("Found file: {}", entry.path().display());
                files.push(entry.into_path());
            }
        }

        debug!("Collected {} files for processing", files.len());
        Ok(files)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn is_python(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "py")
        .unwrap_or(false)
}

/// Compiled patterns of one `.gitignore`, relative to its directory
#[derive(Debug)]
struct IgnoreFile {
    base: PathBuf,
    globs: GlobSet,
}

impl IgnoreFile {
    fn load(dir: &Path) -> Option<Self> {
        let path = dir.join(".gitignore");
        let text = fs::read_to_string(&path).ok()?;
        match Self::parse(dir, &text) {
            Ok(ignore) => {
                debug!("Loaded ignore file: {}", path.display());
                Some(ignore)
            }
            Err(err) => {
                warn!("Skipping {}: {}", path.display(), err);
                None
            }
        }
    }

    /// Negated patterns (`!pattern`) are not supported and are skipped
    fn parse(base: &Path, text: &str) -> Result<Self, globset::Error> {
        let mut builder = GlobSetBuilder::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let pattern = line.trim_end_matches('/');
            if pattern.is_empty() {
                continue;
            }
            let anchored = pattern.contains('/');
            let pattern = pattern.trim_start_matches('/');
            let globs = if anchored {
                [pattern.to_string(), format!("{}/**", pattern)]
            } else {
                [format!("**/{}", pattern), format!("**/{}/**", pattern)]
            };
            for glob in globs {
                builder.add(GlobBuilder::new(&glob).literal_separator(true).build()?);
            }
        }
        Ok(Self {
            base: base.to_path_buf(),
            globs: builder.build()?,
        })
    }

    fn is_ignored(&self, path: &Path) -> bool {
        match path.strip_prefix(&self.base) {
            Ok(relative) if !relative.as_os_str().is_empty() => self.globs.is_match(relative),
            _ => false,
        }
    }
}
