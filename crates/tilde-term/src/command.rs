// SPDX-License-Identifier: MIT
//
// Render commands and the per-frame command queue.
//
// The editor never writes to the terminal directly. It enqueues these
// primitives while composing a frame; the writer drains the queue into
// one buffer and hands the terminal a single write. That keeps frame
// composition and terminal I/O decoupled and makes the output stream
// testable byte for byte.

use std::collections::VecDeque;

/// Region selector for clear operations.
///
/// The ordinal doubles as the ANSI parameter (`ESC [ {n} J` / `K`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearMode {
    /// From the cursor to the end of the screen or line.
    ToEnd = 0,
    /// From the cursor to the beginning of the screen or line.
    ToBeginning = 1,
    /// The entire screen or line.
    Entire = 2,
}

impl ClearMode {
    /// The ANSI numeric parameter for this mode.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }
}

/// A terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// The terminal's configured default.
    Reset,
    /// A 256-palette index.
    Ansi(u8),
    /// A 24-bit true color.
    Rgb(u8, u8, u8),
}

/// A single render primitive.
///
/// Coordinates are 1-based, column before row, matching the cursor
/// addressing the rest of the crate uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write literal bytes at the cursor.
    Print(Vec<u8>),
    /// Move the cursor to 1-based (column, row).
    MoveCursor { x: u16, y: u16 },
    /// Show or hide the cursor.
    SetCursorVisibility(bool),
    /// Clear a region of the screen relative to the cursor.
    ClearScreen(ClearMode),
    /// Clear a region of the current line relative to the cursor.
    ClearLine(ClearMode),
    /// Set the foreground color for subsequent prints.
    SetForeground(Color),
    /// Set the background color for subsequent prints.
    SetBackground(Color),
}

/// FIFO of render commands for one frame.
///
/// Plain wrapper over `VecDeque`; the convenience methods keep call
/// sites in the editor from constructing variants inline everywhere.
#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: VecDeque<Command>,
}

impl CommandQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    pub fn pop(&mut self) -> Option<Command> {
        self.commands.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn print(&mut self, bytes: impl Into<Vec<u8>>) {
        self.push(Command::Print(bytes.into()));
    }

    pub fn move_cursor(&mut self, x: u16, y: u16) {
        self.push(Command::MoveCursor { x, y });
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.push(Command::SetCursorVisibility(visible));
    }

    pub fn clear_screen(&mut self, mode: ClearMode) {
        self.push(Command::ClearScreen(mode));
    }

    pub fn clear_line(&mut self, mode: ClearMode) {
        self.push(Command::ClearLine(mode));
    }

    pub fn set_foreground(&mut self, color: Color) {
        self.push(Command::SetForeground(color));
    }

    pub fn set_background(&mut self, color: Color) {
        self.push(Command::SetBackground(color));
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn clear_mode_ordinals() {
        assert_eq!(ClearMode::ToEnd.ordinal(), 0);
        assert_eq!(ClearMode::ToBeginning.ordinal(), 1);
        assert_eq!(ClearMode::Entire.ordinal(), 2);
    }

    #[test]
    fn queue_preserves_order() {
        let mut queue = CommandQueue::new();
        queue.move_cursor(1, 1);
        queue.print(*b"hi");
        queue.set_cursor_visible(true);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(Command::MoveCursor { x: 1, y: 1 }));
        assert_eq!(queue.pop(), Some(Command::Print(b"hi".to_vec())));
        assert_eq!(queue.pop(), Some(Command::SetCursorVisibility(true)));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn clear_empties_the_queue() {
        let mut queue = CommandQueue::new();
        queue.clear_screen(ClearMode::Entire);
        queue.clear_line(ClearMode::ToEnd);
        queue.clear();
        assert!(queue.is_empty());
    }
}
