//! The two-state editing mode.
//!
//! The editor is always in exactly one [`Mode`]. View is for reading
//! and navigation; Edit is the only mode where keys mutate the
//! document. This is a pure data type — key dispatch and the
//! transitions between modes live in the editor.

use std::fmt;

/// The current editing mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Read-only navigation. The startup mode.
    #[default]
    View,
    /// Text entry. Keys produce characters in the document.
    Edit,
}

impl Mode {
    /// Human-readable name for the status line.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::View => "VIEW",
            Self::Edit => "EDIT",
        }
    }

    /// True if this mode accepts text input.
    #[inline]
    #[must_use]
    pub const fn is_input(self) -> bool {
        matches!(self, Self::Edit)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(Mode::View.display_name(), "VIEW");
        assert_eq!(Mode::Edit.display_name(), "EDIT");
        assert_eq!(format!("{}", Mode::Edit), "EDIT");
    }

    #[test]
    fn only_edit_accepts_input() {
        assert!(Mode::Edit.is_input());
        assert!(!Mode::View.is_input());
    }

    #[test]
    fn default_is_view() {
        assert_eq!(Mode::default(), Mode::View);
    }
}
