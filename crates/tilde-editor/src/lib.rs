//! tilde-editor — editor core for the tilde editor.
//!
//! Owns the text model and everything that mutates it: rows, documents
//! and their file I/O, the View/Edit mode pair, and the cursor/scroll
//! engine that turns key events into state changes and state into
//! per-frame render commands. Terminal I/O stays out of this crate;
//! the engine speaks only `tilde-term` events and commands.

pub mod document;
pub mod editor;
pub mod mode;
pub mod row;

pub use document::{Document, DocumentError};
pub use editor::Editor;
pub use mode::Mode;
pub use row::Row;
