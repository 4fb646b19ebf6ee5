// SPDX-License-Identifier: MIT
//
// Input event types.
//
// The decoder turns raw terminal bytes into these structured values.
// `Event` is an enum with a single variant today; keeping it an enum
// means resize or mouse kinds can be added later without touching the
// match sites that already exist.

use bitflags::bitflags;

/// A decoded terminal input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),
}

/// A key press with identity and modifier flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A key press with the given modifiers.
    #[must_use]
    pub const fn with(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }
}

/// Identity of a key.
///
/// Printable (single-byte) characters use [`Char`](KeyCode::Char);
/// function keys carry their index in [`Function`](KeyCode::Function).
/// All other keys have dedicated variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A literal byte from the printable / control range.
    Char(u8),
    /// A function key, by index.
    Function(u8),
    Tab,
    Enter,
    Escape,
    Insert,
    Delete,
    PageUp,
    PageDown,
    Up,
    Down,
    Right,
    Left,
    Home,
    End,
    Backspace,
}

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// Matches the xterm CSI modifier encoding, where the numeric
    /// parameter is `1 + bitmask`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT   = 0b0000_0001;
        const ALT     = 0b0000_0010;
        const CONTROL = 0b0000_0100;
    }
}

impl Modifiers {
    /// Decode an xterm numeric modifier parameter.
    ///
    /// The wire encoding is `1 + bitmask`; a parameter of 0 or 1 means
    /// no modifiers. Bits above Control are not part of this protocol
    /// subset and are dropped.
    #[must_use]
    pub const fn from_encoded(param: u8) -> Self {
        Self::from_bits_truncate(param.saturating_sub(1) & 0b111)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
