//! The editor engine — cursor arithmetic, edits, and frame production.
//!
//! The cursor is two values, not one. `cursor_x`/`cursor_y` are the
//! user's intent: 1-based, viewport-relative, and deliberately allowed
//! to point past the end of a short row so that moving vertically
//! through it and back restores the original column. The fixed cursor
//! is that intent clamped to the row actually under it, recomputed
//! every frame; it is what gets drawn and what edits apply to.
//!
//! Movement consumes in-viewport room first, then scroll offsets, and
//! horizontal movement carries residual steps across row boundaries.
//! The carry runs as a loop with a residual count; each wrap consumes
//! one step, so it terminates on any finite document.
//!
//! The engine never touches the terminal. It consumes decoded key
//! events and enqueues render commands; the binary owns the I/O.

use tilde_term::command::{ClearMode, Color, CommandQueue};
use tilde_term::event::{Event, KeyCode, KeyEvent, Modifiers};
use tilde_term::terminal::Size;

use crate::document::Document;
use crate::mode::Mode;

/// Spaces per tab stop.
const TAB_STOP: usize = 4;

/// How many idle ticks a status message stays visible (~3 s at the
/// 100 ms read timeout).
const STATUS_TICKS: u8 = 30;

// ---------------------------------------------------------------------------
// StatusMessage
// ---------------------------------------------------------------------------

/// A transient message shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    text: String,
    ticks_left: u8,
}

impl StatusMessage {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ticks_left: STATUS_TICKS,
        }
    }
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

/// Editor state: document, viewport, cursor, mode.
#[derive(Debug)]
pub struct Editor {
    document: Document,

    /// Viewport width in columns.
    width: u16,
    /// Viewport height in text rows (the status bar is not included).
    height: u16,

    /// 1-based viewport cursor, carrying user intent. `cursor_x` may
    /// exceed the current row's length; it never exceeds the width.
    cursor_x: u16,
    cursor_y: u16,

    /// The cursor clamped to the row under it. Recomputed per frame.
    fixed_cursor_x: u16,
    fixed_cursor_y: u16,

    /// 0-based scroll origin.
    offset_x: usize,
    offset_y: usize,

    mode: Mode,
    status: Option<StatusMessage>,
    running: bool,
}

impl Editor {
    /// Build an editor over a document.
    ///
    /// `size` is the full terminal size; the bottom row is reserved for
    /// the status bar. Callers guarantee at least 1 column and 2 rows.
    #[must_use]
    pub fn new(document: Document, size: Size) -> Self {
        let mut editor = Self {
            document,
            width: size.cols.max(1),
            height: size.rows.saturating_sub(1).max(1),
            cursor_x: 1,
            cursor_y: 1,
            fixed_cursor_x: 1,
            fixed_cursor_y: 1,
            offset_x: 0,
            offset_y: 0,
            mode: Mode::View,
            status: None,
            running: true,
        };
        editor.set_status("Ctrl-E to edit | Ctrl-S to save | Ctrl-Q to quit");
        editor
    }

    // -- Accessors ----------------------------------------------------------

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// The viewport cursor (intent, unclamped), 1-based.
    #[must_use]
    pub const fn cursor(&self) -> (u16, u16) {
        (self.cursor_x, self.cursor_y)
    }

    /// The fixed cursor as of the last [`fix_cursor`](Self::fix_cursor).
    #[must_use]
    pub const fn fixed_cursor(&self) -> (u16, u16) {
        (self.fixed_cursor_x, self.fixed_cursor_y)
    }

    /// The scroll origin, 0-based.
    #[must_use]
    pub const fn offsets(&self) -> (usize, usize) {
        (self.offset_x, self.offset_y)
    }

    /// 0-based index of the document row under the cursor.
    #[must_use]
    pub fn absolute_row(&self) -> usize {
        self.offset_y + usize::from(self.cursor_y) - 1
    }

    /// Length of the row under the cursor.
    fn current_row_len(&self) -> usize {
        self.document
            .row(self.absolute_row())
            .map_or(0, crate::row::Row::len)
    }

    /// `cursor_x` clamped to the current row: at most one past its last
    /// character, at least column 1.
    fn clamped_x(&self) -> u16 {
        let limit = self.current_row_len().saturating_sub(self.offset_x) + 1;
        let limit = u16::try_from(limit).unwrap_or(u16::MAX);
        self.cursor_x.min(limit).max(1)
    }

    /// 0-based absolute column of the clamped cursor.
    fn absolute_col(&self) -> usize {
        self.offset_x + usize::from(self.clamped_x()) - 1
    }

    /// Pull `offset_x` back when it points past the current row's end.
    ///
    /// A long row can scroll the viewport further right than a short
    /// row reached afterwards extends. Left uncorrected, the clamped
    /// cursor would draw at viewport column 1 while the edit position
    /// stayed out past the row; snapping the offset keeps both on the
    /// same absolute column.
    fn snap_offset(&mut self) {
        self.offset_x = self.offset_x.min(self.current_row_len());
    }

    /// Snap the offset and collapse `cursor_x` to its clamped value.
    /// Movement and edits start here so intent and motion agree.
    fn snap_to_row(&mut self) {
        self.snap_offset();
        self.cursor_x = self.clamped_x();
    }

    /// Recompute the fixed cursor. Called once per frame before render;
    /// idempotent until the next move or edit. `cursor_x` itself is
    /// left untouched so vertical moves through short rows keep the
    /// intended column.
    pub fn fix_cursor(&mut self) {
        self.snap_offset();
        self.fixed_cursor_x = self.clamped_x();
        self.fixed_cursor_y = self.cursor_y;
    }

    // -- Movement -----------------------------------------------------------

    /// Move up `n` rows: viewport room first, then scroll.
    pub fn move_up(&mut self, n: usize) {
        let in_view = n.min(usize::from(self.cursor_y) - 1);
        self.cursor_y -= u16::try_from(in_view).unwrap_or(u16::MAX);
        self.offset_y = self.offset_y.saturating_sub(n - in_view);
    }

    /// Move down `n` rows: viewport room first, then scroll, never past
    /// the last document row.
    pub fn move_down(&mut self, n: usize) {
        let visible_rows = self.document.row_count().saturating_sub(self.offset_y);
        let max_y = usize::from(self.height).min(visible_rows);
        let in_view = n.min(max_y.saturating_sub(usize::from(self.cursor_y)));
        self.cursor_y += u16::try_from(in_view).unwrap_or(u16::MAX);

        let rest = n - in_view;
        self.offset_y = (self.offset_y + rest).min(
            self.document
                .row_count()
                .saturating_sub(usize::from(self.cursor_y)),
        );
    }

    /// Move left `n` columns, wrapping to the end of the previous row
    /// when the start of a row is crossed.
    pub fn move_left(&mut self, n: usize) {
        self.snap_to_row();
        let mut rest = n;

        while rest > 0 {
            let col = self.offset_x + usize::from(self.cursor_x) - 1;
            let take = rest.min(col);
            let in_view = take.min(usize::from(self.cursor_x) - 1);
            self.cursor_x -= u16::try_from(in_view).unwrap_or(u16::MAX);
            self.offset_x -= take - in_view;
            rest -= take;

            if rest == 0 || self.absolute_row() == 0 {
                break;
            }
            // Wrap: one step lands on the end of the previous row.
            let prev_len = self
                .document
                .row(self.absolute_row() - 1)
                .map_or(0, crate::row::Row::len);
            self.move_up(1);
            self.place_at_column(prev_len);
            rest -= 1;
        }
    }

    /// Move right `n` columns, wrapping to the start of the next row
    /// when the end of a row is crossed.
    pub fn move_right(&mut self, n: usize) {
        self.snap_to_row();
        let mut rest = n;

        while rest > 0 {
            let row_len = self.current_row_len();
            let col = self.offset_x + usize::from(self.cursor_x) - 1;
            let room = rest.min(row_len.saturating_sub(col));
            let in_view = room.min(usize::from(self.width - self.cursor_x));
            self.cursor_x += u16::try_from(in_view).unwrap_or(u16::MAX);
            self.offset_x += room - in_view;
            rest -= room;

            if rest == 0 || self.absolute_row() + 1 >= self.document.row_count() {
                break;
            }
            // Wrap: one step lands on the start of the next row.
            self.move_down(1);
            self.cursor_x = 1;
            self.offset_x = 0;
            rest -= 1;
        }
    }

    /// Park the cursor on a 0-based column of the current row, scrolling
    /// horizontally if it lies beyond the viewport.
    fn place_at_column(&mut self, col: usize) {
        let col_1 = col + 1;
        if col_1 <= usize::from(self.width) {
            self.cursor_x = u16::try_from(col_1).unwrap_or(u16::MAX);
            self.offset_x = 0;
        } else {
            self.cursor_x = self.width;
            self.offset_x = col_1 - usize::from(self.width);
        }
    }

    /// Jump to the start of the current row.
    pub fn move_line_start(&mut self) {
        self.cursor_x = 1;
        self.offset_x = 0;
    }

    /// Jump past the last character of the current row.
    pub fn move_line_end(&mut self) {
        let len = self.current_row_len();
        self.place_at_column(len);
    }

    // -- Edits --------------------------------------------------------------

    /// Insert one byte at the cursor and step right.
    pub fn insert_char(&mut self, byte: u8) {
        self.snap_to_row();
        let col = self.absolute_col();
        let row = self.absolute_row();
        if let Some(row) = self.document.row_mut(row) {
            row.insert(col, byte);
        }
        self.move_right(1);
    }

    /// Insert spaces up to the next `TAB_STOP`-column stop.
    pub fn insert_tab(&mut self) {
        self.snap_to_row();
        let col = self.absolute_col();
        let count = TAB_STOP - (col % TAB_STOP);
        let row = self.absolute_row();
        if let Some(row) = self.document.row_mut(row) {
            row.insert_spaces(col, count);
        }
        self.move_right(count);
    }

    /// Split the current row at the cursor; the tail becomes a new row
    /// and the cursor moves to its first column.
    pub fn insert_newline(&mut self) {
        self.snap_to_row();
        let col = self.absolute_col();
        let row = self.absolute_row();
        if let Some(current) = self.document.row_mut(row) {
            let tail = current.split_off(col);
            self.document.insert_row(row + 1, tail);
        }
        self.move_line_start();
        self.move_down(1);
    }

    /// Delete the character left of the cursor.
    ///
    /// At column 1 of a non-first row this joins the row onto the
    /// previous one instead, with the cursor at the seam. At the very
    /// start of the document it is a no-op.
    pub fn delete_char(&mut self) {
        self.snap_to_row();
        let col = self.absolute_col();
        let row = self.absolute_row();

        if col > 0 {
            self.move_left(1);
            if let Some(row) = self.document.row_mut(row) {
                row.remove(col - 1);
            }
        } else if row > 0 {
            // move_left wraps onto the end of the previous row, which
            // is exactly where the joined text will split.
            self.move_left(1);
            if let Some(removed) = self.document.remove_row(row) {
                if let Some(prev) = self.document.row_mut(row - 1) {
                    prev.append(removed);
                }
            }
        }
    }

    /// Delete the character under the cursor. No-op at document end.
    pub fn delete_forward(&mut self) {
        self.snap_to_row();
        let at_last_row = self.absolute_row() + 1 >= self.document.row_count();
        if at_last_row && self.absolute_col() >= self.current_row_len() {
            return;
        }
        self.move_right(1);
        self.delete_char();
    }

    // -- Status / lifecycle -------------------------------------------------

    /// Show a transient status message.
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage::new(text));
    }

    /// One idle tick: age the status message. Runs every loop pass,
    /// including passes where the read timed out, so the countdown is
    /// independent of keystrokes.
    pub fn tick(&mut self) {
        if let Some(ref mut status) = self.status {
            status.ticks_left = status.ticks_left.saturating_sub(1);
            if status.ticks_left == 0 {
                self.status = None;
            }
        }
    }

    /// Adopt a new terminal size and pull the cursor back in bounds.
    pub fn resize(&mut self, size: Size) {
        self.width = size.cols.max(1);
        self.height = size.rows.saturating_sub(1).max(1);
        self.cursor_x = self.cursor_x.min(self.width);
        self.cursor_y = self.cursor_y.min(self.height);
        let max_offset = self
            .document
            .row_count()
            .saturating_sub(usize::from(self.cursor_y));
        self.offset_y = self.offset_y.min(max_offset);
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    // -- Event handling -----------------------------------------------------

    /// Apply one decoded input event.
    pub fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event;
        self.handle_key(key);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(Modifiers::CONTROL);

        match key.code {
            KeyCode::Char(b'Q') if ctrl => self.quit(),
            KeyCode::Char(b'E') if ctrl => self.mode = Mode::Edit,
            KeyCode::Char(b'S') if ctrl => self.save(),
            KeyCode::Escape => self.mode = Mode::View,

            KeyCode::Up => self.move_up(1),
            KeyCode::Down => self.move_down(1),
            KeyCode::Left => self.move_left(1),
            KeyCode::Right => self.move_right(1),
            KeyCode::PageUp => self.move_up(usize::from(self.height)),
            KeyCode::PageDown => self.move_down(usize::from(self.height)),
            KeyCode::Home => self.move_line_start(),
            KeyCode::End => self.move_line_end(),

            KeyCode::Char(byte) if self.mode.is_input() && !ctrl => self.insert_char(byte),
            KeyCode::Tab if self.mode.is_input() => self.insert_tab(),
            KeyCode::Enter if self.mode.is_input() => self.insert_newline(),
            KeyCode::Backspace if self.mode.is_input() => self.delete_char(),
            KeyCode::Delete if self.mode.is_input() => self.delete_forward(),

            _ => {}
        }
    }

    fn save(&mut self) {
        match self.document.save() {
            Ok(bytes) => self.set_status(format!("wrote {bytes} bytes")),
            Err(err) => {
                log::error!("save failed: {err}");
                self.set_status(format!("save failed: {err}"));
            }
        }
    }

    // -- Rendering ----------------------------------------------------------

    /// Enqueue the commands for one full frame.
    ///
    /// Frame order: hide cursor, home, every text row (document content
    /// or a `~` fringe line) with the line remainder cleared, the status
    /// bar, then the cursor parked at its fixed position and shown.
    pub fn render(&mut self, queue: &mut CommandQueue) {
        self.fix_cursor();

        queue.set_cursor_visible(false);
        queue.move_cursor(1, 1);

        for y in 0..usize::from(self.height) {
            match self.document.row(self.offset_y + y) {
                Some(row) => {
                    queue.print(row.visible(self.offset_x, usize::from(self.width)).to_vec());
                }
                None => queue.print(*b"~"),
            }
            queue.clear_line(ClearMode::ToEnd);
            queue.print(*b"\r\n");
        }

        self.render_status_bar(queue);

        queue.move_cursor(self.fixed_cursor_x, self.fixed_cursor_y);
        queue.set_cursor_visible(true);
    }

    /// The inverse-video bottom row: file name and mode on the left,
    /// the status message or cursor position on the right.
    fn render_status_bar(&self, queue: &mut CommandQueue) {
        let width = usize::from(self.width);

        let left = format!(" {} - {}", self.document.display_name(), self.mode);
        let right = self.status.as_ref().map_or_else(
            || {
                format!(
                    "{}:{} ",
                    self.offset_y + usize::from(self.fixed_cursor_y),
                    self.offset_x + usize::from(self.fixed_cursor_x),
                )
            },
            |status| format!("{} ", status.text),
        );

        let mut line = left.into_bytes();
        line.truncate(width);
        let right = right.as_bytes();
        if line.len() + right.len() <= width {
            line.resize(width - right.len(), b' ');
            line.extend_from_slice(right);
        } else {
            line.resize(width, b' ');
        }

        queue.set_background(Color::Ansi(7));
        queue.set_foreground(Color::Ansi(0));
        queue.print(line);
        queue.set_foreground(Color::Reset);
        queue.set_background(Color::Reset);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tilde_term::command::Command;

    use super::*;

    const SIZE: Size = Size { cols: 10, rows: 6 }; // 5 text rows + status

    fn editor_with(content: &[u8]) -> Editor {
        Editor::new(Document::from_bytes(content), SIZE)
    }

    fn ctrl(byte: u8) -> Event {
        Event::Key(KeyEvent::with(KeyCode::Char(byte), Modifiers::CONTROL))
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::plain(code))
    }

    fn rows(editor: &Editor) -> Vec<&[u8]> {
        (0..editor.document().row_count())
            .map(|i| editor.document().row(i).unwrap().as_bytes())
            .collect()
    }

    // -- Bounded movement ---------------------------------------------------

    #[test]
    fn right_on_empty_row_stays_at_column_one() {
        let mut editor = editor_with(b"");
        editor.move_right(1);
        editor.move_right(1);
        editor.move_right(1);
        assert_eq!(editor.cursor(), (1, 1));
        assert_eq!(editor.offsets(), (0, 0));
    }

    #[test]
    fn right_wraps_to_next_row() {
        let mut editor = editor_with(b"ab\ncd");
        editor.move_right(2); // end of "ab", cursor_x = 3
        assert_eq!(editor.cursor(), (3, 1));
        editor.move_right(1);
        assert_eq!(editor.cursor(), (1, 2));
    }

    #[test]
    fn left_wraps_to_previous_row_end() {
        let mut editor = editor_with(b"ab\ncd");
        editor.move_down(1);
        editor.move_left(1);
        // Lands one past 'b', the seam position.
        assert_eq!(editor.cursor(), (3, 1));
    }

    #[test]
    fn left_at_document_start_is_bounded() {
        let mut editor = editor_with(b"ab");
        editor.move_left(5);
        assert_eq!(editor.cursor(), (1, 1));
        assert_eq!(editor.offsets(), (0, 0));
    }

    #[test]
    fn right_carries_across_multiple_rows() {
        let mut editor = editor_with(b"ab\ncd\nef");
        // 2 into "ab", wrap (1), 2 across "cd", wrap (1), 1 into "ef".
        editor.move_right(7);
        assert_eq!(editor.cursor(), (2, 3));
    }

    #[test]
    fn down_stops_at_last_row() {
        let mut editor = editor_with(b"a\nb\nc");
        editor.move_down(99);
        assert_eq!(editor.absolute_row(), 2);
    }

    #[test]
    fn up_stops_at_first_row() {
        let mut editor = editor_with(b"a\nb\nc");
        editor.move_down(2);
        editor.move_up(99);
        assert_eq!(editor.absolute_row(), 0);
        assert_eq!(editor.offsets(), (0, 0));
    }

    // -- Scrolling ----------------------------------------------------------

    #[test]
    fn down_past_viewport_scrolls() {
        let mut editor = editor_with(b"0\n1\n2\n3\n4\n5\n6\n7");
        editor.move_down(6); // height is 5
        assert_eq!(editor.cursor().1, 5);
        assert_eq!(editor.offsets().1, 2);
        assert_eq!(editor.absolute_row(), 6);
    }

    #[test]
    fn up_unscrolls_before_moving_cursor_row() {
        let mut editor = editor_with(b"0\n1\n2\n3\n4\n5\n6\n7");
        editor.move_down(7);
        editor.move_up(7);
        assert_eq!(editor.absolute_row(), 0);
    }

    #[test]
    fn long_row_scrolls_horizontally() {
        let mut editor = editor_with(b"abcdefghijklmnop");
        editor.move_right(12); // width is 10
        assert_eq!(editor.cursor().0, 10);
        assert_eq!(editor.offsets().0, 3);
    }

    // -- Cursor fixing ------------------------------------------------------

    #[test]
    fn vertical_move_through_short_row_keeps_intent() {
        let mut editor = editor_with(b"abcdef\nab\nabcdef");
        editor.move_right(5); // cursor_x = 6
        editor.move_down(1);
        editor.fix_cursor();
        // Drawn clamped to the short row, intent preserved.
        assert_eq!(editor.fixed_cursor(), (3, 2));
        assert_eq!(editor.cursor().0, 6);

        editor.move_down(1);
        editor.fix_cursor();
        assert_eq!(editor.fixed_cursor(), (6, 3));
    }

    #[test]
    fn fix_cursor_is_idempotent() {
        let mut editor = editor_with(b"abc\na");
        editor.move_right(3);
        editor.move_down(1);
        editor.fix_cursor();
        let first = editor.fixed_cursor();
        editor.fix_cursor();
        assert_eq!(editor.fixed_cursor(), first);
    }

    // -- Edits --------------------------------------------------------------

    #[test]
    fn insert_advances_cursor() {
        let mut editor = editor_with(b"");
        editor.insert_char(b'h');
        editor.insert_char(b'i');
        assert_eq!(rows(&editor), [&b"hi"[..]]);
        assert_eq!(editor.cursor(), (3, 1));
    }

    #[test]
    fn enter_splits_row_at_cursor() {
        let mut editor = editor_with(b"hello");
        editor.move_right(2); // column 3
        editor.insert_newline();
        assert_eq!(rows(&editor), [&b"he"[..], b"llo"]);
        assert_eq!(editor.cursor(), (1, 2));
    }

    #[test]
    fn enter_at_row_start_inserts_empty_row_above() {
        let mut editor = editor_with(b"abc");
        editor.insert_newline();
        assert_eq!(rows(&editor), [&b""[..], b"abc"]);
        assert_eq!(editor.cursor(), (1, 2));
    }

    #[test]
    fn tab_advances_to_next_stop() {
        let mut editor = editor_with(b"");
        editor.insert_char(b'a');
        editor.insert_tab();
        assert_eq!(rows(&editor), [&b"a   "[..]]);
        assert_eq!(editor.cursor(), (5, 1));

        editor.insert_tab();
        assert_eq!(rows(&editor), [&b"a       "[..]]);
    }

    #[test]
    fn backspace_removes_left_of_cursor() {
        let mut editor = editor_with(b"abc");
        editor.move_right(2);
        editor.delete_char();
        assert_eq!(rows(&editor), [&b"ac"[..]]);
        assert_eq!(editor.cursor(), (2, 1));
    }

    #[test]
    fn backspace_at_row_start_joins_rows() {
        let mut editor = editor_with(b"ab\ncd");
        editor.move_down(1);
        editor.delete_char();
        assert_eq!(rows(&editor), [&b"abcd"[..]]);
        // Cursor sits at the seam.
        assert_eq!(editor.cursor(), (3, 1));
    }

    #[test]
    fn backspace_at_document_start_is_a_no_op() {
        let mut editor = editor_with(b"ab");
        editor.delete_char();
        assert_eq!(rows(&editor), [&b"ab"[..]]);
        assert_eq!(editor.cursor(), (1, 1));
    }

    #[test]
    fn delete_removes_under_cursor() {
        let mut editor = editor_with(b"abc");
        editor.move_right(1);
        editor.delete_forward();
        assert_eq!(rows(&editor), [&b"ac"[..]]);
        assert_eq!(editor.cursor(), (2, 1));
    }

    #[test]
    fn delete_at_row_end_joins_with_next() {
        let mut editor = editor_with(b"ab\ncd");
        editor.move_right(2);
        editor.delete_forward();
        assert_eq!(rows(&editor), [&b"abcd"[..]]);
    }

    #[test]
    fn delete_at_document_end_is_a_no_op() {
        let mut editor = editor_with(b"ab");
        editor.move_right(2);
        editor.delete_forward();
        assert_eq!(rows(&editor), [&b"ab"[..]]);
    }

    #[test]
    fn edit_through_stale_intent_clamps_first() {
        let mut editor = editor_with(b"abcdef\nab");
        editor.move_right(5);
        editor.move_down(1); // intent column 6, row is "ab"
        editor.insert_char(b'X');
        assert_eq!(rows(&editor), [&b"abcdef"[..], b"abX"]);
    }

    #[test]
    fn backspace_after_scrolling_past_a_short_row() {
        let mut editor = editor_with(b"abcdefghijklmnop\nab");
        editor.move_right(12); // offset_x = 3, beyond the next row
        editor.move_down(1);
        editor.delete_char();
        // The offset snaps back to the short row before the edit, so
        // the deletion lands on its last character.
        assert_eq!(rows(&editor), [&b"abcdefghijklmnop"[..], b"a"]);
    }

    #[test]
    fn fix_cursor_reins_in_a_stale_horizontal_offset() {
        let mut editor = editor_with(b"abcdefghijklmnop\nab");
        editor.move_right(12);
        editor.move_down(1);
        editor.fix_cursor();
        // Offset pulled back to the row end; drawn cursor and edit
        // position agree on absolute column 2.
        assert_eq!(editor.offsets().0, 2);
        assert_eq!(editor.fixed_cursor(), (1, 2));
    }

    #[test]
    fn edit_at_document_end_survives_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        std::fs::write(&path, b"alpha\nbeta").unwrap();

        let mut editor = Editor::new(Document::open(&path).unwrap(), SIZE);
        editor.move_down(1);
        editor.move_line_end();
        editor.insert_char(b'!');
        editor.document().save().unwrap();

        let reloaded = Document::open(&path).unwrap();
        assert_eq!(reloaded.to_bytes(), b"alpha\nbeta!");
        assert_eq!(std::fs::read(&path).unwrap(), b"alpha\nbeta!");
    }

    // -- Event dispatch and modes -------------------------------------------

    #[test]
    fn starts_in_view_mode() {
        let editor = editor_with(b"");
        assert_eq!(editor.mode(), Mode::View);
    }

    #[test]
    fn text_keys_are_ignored_in_view_mode() {
        let mut editor = editor_with(b"ab");
        editor.handle_event(press(KeyCode::Char(b'x')));
        editor.handle_event(press(KeyCode::Enter));
        editor.handle_event(press(KeyCode::Backspace));
        assert_eq!(rows(&editor), [&b"ab"[..]]);
    }

    #[test]
    fn ctrl_e_enters_edit_escape_returns_to_view() {
        let mut editor = editor_with(b"");
        editor.handle_event(ctrl(b'E'));
        assert_eq!(editor.mode(), Mode::Edit);

        editor.handle_event(press(KeyCode::Char(b'x')));
        assert_eq!(rows(&editor), [&b"x"[..]]);

        editor.handle_event(press(KeyCode::Escape));
        assert_eq!(editor.mode(), Mode::View);
    }

    #[test]
    fn arrows_navigate_in_both_modes() {
        let mut editor = editor_with(b"ab\ncd");
        editor.handle_event(press(KeyCode::Down));
        assert_eq!(editor.absolute_row(), 1);

        editor.handle_event(ctrl(b'E'));
        editor.handle_event(press(KeyCode::Up));
        assert_eq!(editor.absolute_row(), 0);
    }

    #[test]
    fn home_and_end_jump_within_the_row() {
        let mut editor = editor_with(b"abcdef");
        editor.handle_event(press(KeyCode::End));
        assert_eq!(editor.cursor(), (7, 1));
        editor.handle_event(press(KeyCode::Home));
        assert_eq!(editor.cursor(), (1, 1));
    }

    #[test]
    fn page_keys_move_by_viewport_height() {
        let mut editor = editor_with(b"0\n1\n2\n3\n4\n5\n6\n7\n8\n9");
        editor.handle_event(press(KeyCode::PageDown));
        assert_eq!(editor.absolute_row(), 5);
        editor.handle_event(press(KeyCode::PageUp));
        assert_eq!(editor.absolute_row(), 0);
    }

    #[test]
    fn ctrl_q_stops_the_editor() {
        let mut editor = editor_with(b"");
        assert!(editor.is_running());
        editor.handle_event(ctrl(b'Q'));
        assert!(!editor.is_running());
    }

    // -- Status message -----------------------------------------------------

    #[test]
    fn status_message_expires_after_its_ticks() {
        let mut editor = editor_with(b"");
        editor.set_status("hello");
        for _ in 0..STATUS_TICKS - 1 {
            editor.tick();
        }
        assert!(editor.status.is_some());
        editor.tick();
        assert!(editor.status.is_none());
    }

    // -- Resize -------------------------------------------------------------

    #[test]
    fn resize_pulls_cursor_back_in_bounds() {
        let mut editor = editor_with(b"0\n1\n2\n3\n4\n5");
        editor.move_down(4);
        editor.resize(Size { cols: 10, rows: 3 }); // 2 text rows now
        assert_eq!(editor.cursor().1, 2);
        assert!(editor.absolute_row() < editor.document().row_count());
    }

    // -- Rendering ----------------------------------------------------------

    /// Drain a queue into the raw command list.
    fn drain(queue: &mut CommandQueue) -> Vec<Command> {
        std::iter::from_fn(|| queue.pop()).collect()
    }

    #[test]
    fn frame_shape_is_stable() {
        let mut editor = editor_with(b"ab");
        editor.status = None;

        let mut queue = CommandQueue::new();
        editor.render(&mut queue);
        let commands = drain(&mut queue);

        assert_eq!(commands[0], Command::SetCursorVisibility(false));
        assert_eq!(commands[1], Command::MoveCursor { x: 1, y: 1 });
        // First text row is the document content.
        assert_eq!(commands[2], Command::Print(b"ab".to_vec()));
        // Cursor parked and shown last.
        assert_eq!(
            commands[commands.len() - 2],
            Command::MoveCursor { x: 1, y: 1 }
        );
        assert_eq!(
            commands[commands.len() - 1],
            Command::SetCursorVisibility(true)
        );
    }

    #[test]
    fn rows_past_the_document_render_as_fringe() {
        let mut editor = editor_with(b"ab");
        let mut queue = CommandQueue::new();
        editor.render(&mut queue);
        let commands = drain(&mut queue);

        let fringe = commands
            .iter()
            .filter(|c| **c == Command::Print(b"~".to_vec()))
            .count();
        // 5 text rows, 1 document row.
        assert_eq!(fringe, 4);
    }

    #[test]
    fn status_bar_is_inverse_video_and_full_width() {
        let mut editor = editor_with(b"ab");
        editor.status = None;

        let mut queue = CommandQueue::new();
        editor.render(&mut queue);
        let commands = drain(&mut queue);

        let bg = commands
            .iter()
            .position(|c| *c == Command::SetBackground(Color::Ansi(7)))
            .unwrap();
        assert_eq!(commands[bg + 1], Command::SetForeground(Color::Ansi(0)));
        let Command::Print(ref line) = commands[bg + 2] else {
            panic!("expected the status line print");
        };
        assert_eq!(line.len(), usize::from(SIZE.cols));
        assert_eq!(commands[bg + 3], Command::SetForeground(Color::Reset));
        assert_eq!(commands[bg + 4], Command::SetBackground(Color::Reset));
    }

    #[test]
    fn render_fixes_the_cursor() {
        let mut editor = editor_with(b"abcdef\nab");
        editor.move_right(5);
        editor.move_down(1);

        let mut queue = CommandQueue::new();
        editor.render(&mut queue);
        let commands = drain(&mut queue);

        // The parked position is the clamped one.
        assert_eq!(
            commands[commands.len() - 2],
            Command::MoveCursor { x: 3, y: 2 }
        );
    }

    #[test]
    fn viewport_render_respects_offsets() {
        let mut editor = editor_with(b"0\n1\n2\n3\n4\n5\n6\n7");
        editor.move_down(6); // offset_y = 2
        let mut queue = CommandQueue::new();
        editor.render(&mut queue);
        let commands = drain(&mut queue);

        assert_eq!(commands[2], Command::Print(b"2".to_vec()));
    }
}
