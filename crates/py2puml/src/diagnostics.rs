//! Per-file failure records
//!
//! [`annotate`] maps a failure to a human-readable [`ErrorRecord`]; an
//! [`ErrorLog`] collects the records of one run in arrival order.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::Py2PumlError;

/// Category of a recorded failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Syntax,
    Permission,
    Encoding,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "syntax"),
            ErrorKind::Permission => write!(f, "permission"),
            ErrorKind::Encoding => write!(f, "encoding"),
            ErrorKind::Other => write!(f, "other"),
        }
    }
}

/// Messages recorded against one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    path: PathBuf,
    messages: Vec<String>,
    kind: ErrorKind,
}

impl ErrorRecord {
    pub fn new(path: impl Into<PathBuf>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            messages: vec![message.into()],
            kind,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Build the record for a failure while processing `path`
///
/// # Example
/// ```
/// use std::path::Path;
/// use py2puml::core::Py2PumlError;
/// use py2puml::diagnostics::{annotate, ErrorKind};
///
/// let err = Py2PumlError::syntax_error("invalid syntax", 3, 7);
/// let record = annotate(Path::new("pkg/bad.py"), &err);
/// assert_eq!(record.kind(), ErrorKind::Syntax);
/// assert_eq!(
///     record.messages()[0],
///     "Syntax error in pkg/bad.py: invalid syntax (line 3, column 7)"
/// );
/// ```
pub fn annotate(path: &Path, error: &Py2PumlError) -> ErrorRecord {
    let shown = path.display();
    match error {
        Py2PumlError::Syntax { .. } => ErrorRecord::new(
            path,
            ErrorKind::Syntax,
            format!("Syntax error in {}: {}", shown, error),
        ),
        err if err.is_permission_denied() => ErrorRecord::new(
            path,
            ErrorKind::Permission,
            format!("Permission denied reading file: {}", shown),
        ),
        Py2PumlError::Encoding { message } => ErrorRecord::new(
            path,
            ErrorKind::Encoding,
            format!("Encoding error in {}: {}", shown, message),
        ),
        Py2PumlError::Io { source } => ErrorRecord::new(
            path,
            ErrorKind::Other,
            format!("Unexpected error reading {}: {}", shown, source),
        ),
        other => ErrorRecord::new(
            path,
            ErrorKind::Other,
            format!("Unexpected error reading {}: {}", shown, other),
        ),
    }
}

/// Ordered failure log owned by a single run
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    records: Vec<ErrorRecord>,
    index: HashMap<PathBuf, usize>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. A second record for the same path adds its messages
    /// to the existing entry.
    pub fn record(&mut self, record: ErrorRecord) {
        match self.index.get(&record.path).copied() {
            Some(slot) => self.records[slot].messages.extend(record.messages),
            None => {
                self.index.insert(record.path.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, path: &Path) -> Option<&ErrorRecord> {
        self.index.get(path).map(|&slot| &self.records[slot])
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.index.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ErrorRecord> {
        self.records.iter()
    }

    /// Every message of every record, in order
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .flat_map(|r| r.messages.iter().map(String::as_str))
    }

    /// Total number of messages
    pub fn len(&self) -> usize {
        self.records.iter().map(|r| r.messages.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
