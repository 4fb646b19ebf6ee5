//! The document — an ordered sequence of rows plus file I/O.
//!
//! A document always holds at least one row, possibly empty; rendering
//! and cursor arithmetic never have to handle "no rows at all". Loading
//! splits on `\n` and strips a `\r` before it, so LF and CRLF files
//! both load; saving joins with `\n`. A file with a trailing newline
//! loads to a trailing empty row, which makes load → save byte-exact
//! for LF input.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::row::Row;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures from document file I/O.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Save was requested but the document has no file path.
    #[error("no file name")]
    Untitled,
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Rows of text and the path they came from.
#[derive(Debug)]
pub struct Document {
    rows: Vec<Row>,
    filepath: Option<PathBuf>,
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

impl Document {
    /// A new document: one empty row, no path.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rows: vec![Row::new()],
            filepath: None,
        }
    }

    /// Build a document from raw file content.
    #[must_use]
    pub fn from_bytes(content: &[u8]) -> Self {
        let rows = content.split(|&b| b == b'\n').map(Row::from_line).collect();
        Self {
            rows,
            filepath: None,
        }
    }

    /// Load a document from a file.
    ///
    /// A missing file is not an error: editing a new file starts from
    /// an empty document that will be created on first save.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Read`] for any failure other than the
    /// file not existing.
    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        let content = match fs::read(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("new file: {}", path.display());
                Vec::new()
            }
            Err(source) => {
                return Err(DocumentError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut document = Self::from_bytes(&content);
        document.filepath = Some(path.to_path_buf());
        Ok(document)
    }

    /// Write the document back to its file.
    ///
    /// Truncates and rewrites the whole file. Returns the number of
    /// bytes written, for the status line.
    ///
    /// # Errors
    ///
    /// [`DocumentError::Untitled`] when the document has no path,
    /// [`DocumentError::Write`] when the write fails.
    pub fn save(&self) -> Result<usize, DocumentError> {
        let path = self.filepath.as_ref().ok_or(DocumentError::Untitled)?;
        let content = self.to_bytes();
        fs::write(path, &content).map_err(|source| DocumentError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(content.len())
    }

    /// Serialize the rows, joined with `\n`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut content = Vec::new();
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                content.push(b'\n');
            }
            content.extend_from_slice(row.as_bytes());
        }
        content
    }

    #[must_use]
    pub fn filepath(&self) -> Option<&Path> {
        self.filepath.as_deref()
    }

    /// The file name for the status line, or a placeholder.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.filepath
            .as_deref()
            .and_then(Path::file_name)
            .map_or_else(|| String::from("[untitled]"), |name| name.to_string_lossy().into_owned())
    }

    /// Number of rows. Always at least 1.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    /// Insert a row at an index. Clamped to the end.
    pub fn insert_row(&mut self, index: usize, row: Row) {
        let index = index.min(self.rows.len());
        self.rows.insert(index, row);
    }

    /// Remove and return the row at an index.
    ///
    /// Out-of-bounds indices and the last remaining row are refused;
    /// a document never has zero rows.
    pub fn remove_row(&mut self, index: usize) -> Option<Row> {
        if index < self.rows.len() && self.rows.len() > 1 {
            Some(self.rows.remove(index))
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
