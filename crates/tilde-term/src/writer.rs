// SPDX-License-Identifier: MIT
//
// Command encoding and the batched frame writer.
//
// `encode` maps one render command to its escape bytes. `CommandWriter`
// drains a whole frame's queue into a reusable buffer and writes it
// with a single syscall, so the terminal never sees a half-composed
// frame and never flickers from incremental updates.

use std::io::{self, Write};

use crate::command::{ClearMode, Color, Command, CommandQueue};

/// Encode one command as escape bytes into `out`.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn encode(out: &mut impl Write, command: &Command) -> io::Result<()> {
    match command {
        Command::Print(bytes) => out.write_all(bytes),
        // Cursor addressing is row-first on the wire.
        Command::MoveCursor { x, y } => write!(out, "\x1b[{y};{x}H"),
        Command::SetCursorVisibility(true) => out.write_all(b"\x1b[?25h"),
        Command::SetCursorVisibility(false) => out.write_all(b"\x1b[?25l"),
        Command::ClearScreen(mode) => write!(out, "\x1b[{}J", mode.ordinal()),
        Command::ClearLine(mode) => write!(out, "\x1b[{}K", mode.ordinal()),
        Command::SetForeground(color) => encode_color(out, *color, 3),
        Command::SetBackground(color) => encode_color(out, *color, 4),
    }
}

/// SGR color encoding. `plane` is 3 for foreground, 4 for background.
fn encode_color(out: &mut impl Write, color: Color, plane: u8) -> io::Result<()> {
    match color {
        Color::Reset => write!(out, "\x1b[{plane}9m"),
        Color::Ansi(index) => write!(out, "\x1b[{plane}8;5;{index}m"),
        Color::Rgb(r, g, b) => write!(out, "\x1b[{plane}8;2;{r};{g};{b}m"),
    }
}

/// Drains command queues into single batched writes.
///
/// Owns a scratch buffer that is reused across frames; the allocation
/// settles at the size of the largest frame seen.
#[derive(Debug, Default)]
pub struct CommandWriter {
    buf: Vec<u8>,
}

impl CommandWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode every queued command and write the result in one call.
    ///
    /// The queue is left empty. Nothing is written for an empty queue.
    ///
    /// # Errors
    ///
    /// Propagates write and flush failures from `out`.
    pub fn flush(&mut self, queue: &mut CommandQueue, out: &mut impl Write) -> io::Result<()> {
        if queue.is_empty() {
            return Ok(());
        }

        self.buf.clear();
        while let Some(command) = queue.pop() {
            encode(&mut self.buf, &command)?;
        }

        out.write_all(&self.buf)?;
        out.flush()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
