// SPDX-License-Identifier: MIT
//
// tilde-term — Terminal codec for the tilde editor.
//
// One side decodes: raw bytes from a terminal in raw mode become
// structured key events, one escape family at a time, with no
// lookahead and no global state. The other side encodes: render
// commands queue up per frame and leave as a single batched write.
//
// This crate intentionally avoids external TUI frameworks (ratatui,
// crossterm) in favor of direct terminal control via ANSI escape
// sequences and raw termios. Every byte read is committed to a branch;
// every byte written is part of exactly one frame.

pub mod command;
pub mod event;
pub mod input;
pub mod terminal;
pub mod writer;

pub use command::{ClearMode, Color, Command, CommandQueue};
pub use event::{Event, KeyCode, KeyEvent, Modifiers};
pub use input::{ByteSource, Decoder, SliceInput};
#[cfg(unix)]
pub use input::TtyInput;
pub use terminal::{Size, Terminal};
pub use writer::CommandWriter;
