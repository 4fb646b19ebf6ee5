// SPDX-License-Identifier: MIT
//
// Terminal input decoder.
//
// Turns the raw byte stream from a terminal in raw mode into structured
// key events. Escape sequences are not prefix-free and their length is
// not known up front, so the decoder works the only way the protocol
// allows: read one byte, commit to a branch, read exactly the bytes
// that branch needs. No lookahead, no backtracking, no buffer.
//
// Families handled:
//
// - Plain bytes (printable ASCII, control range, DEL)
// - SS3 sequences (`ESC O`, arrows and F1-F4 on some terminals)
// - CSI xterm letters (`ESC [ A`, with optional modifier parameters)
// - Legacy VT tilde codes (`ESC [ 3 ~`, editing and paging keys)
// - VT two-digit function-key codes (`ESC [ 1 7 ~` and friends)
// - `ESC b` / `ESC f` word-jump shortcuts
//
// The ambiguity that shapes everything: `ESC [ 1 ;` can still become
// either a `~`-terminated VT code or a letter-terminated xterm code.
// The decoder consumes the shared prefix and commits only when it sees
// the terminator.
//
// A read that times out mid-sequence, or a byte no branch recognizes,
// aborts that one decode: the caller gets `Ok(None)`, the unrecognized
// bytes are logged at debug level, and the next call starts fresh from
// the next leading byte. Nothing is carried over between calls.

use std::io;

use crate::event::{Event, KeyCode, KeyEvent, Modifiers};

const ESC: u8 = 0x1B;

// ─── Byte Sources ───────────────────────────────────────────────────────────

/// One byte at a time from the terminal, or `None` on timeout.
///
/// The decoder is generic over its byte source so the same state machine
/// runs against a real TTY (where the termios `VTIME` read timeout
/// produces the `None`s) and against byte slices in tests (where
/// exhaustion does).
pub trait ByteSource {
    /// Read the next byte.
    ///
    /// `Ok(None)` means the read timed out with nothing available —
    /// "no input this tick", never an error.
    ///
    /// # Errors
    ///
    /// Propagates real I/O failures from the underlying descriptor.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// Byte source over an in-memory slice. Exhaustion acts as a timeout.
#[derive(Debug)]
pub struct SliceInput<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SliceInput<'a> {
    /// Wrap a byte slice.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Bytes not yet consumed by the decoder.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}

impl ByteSource for SliceInput<'_> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let Some(&byte) = self.bytes.get(self.pos) else {
            return Ok(None);
        };
        self.pos += 1;
        Ok(Some(byte))
    }
}

/// Byte source over standard input.
///
/// Relies on the terminal being in raw mode with `VMIN=0, VTIME=1`
/// (see `terminal::Terminal::enter_raw`): `read` then returns after at
/// most a tenth of a second with zero bytes when nothing was typed,
/// which is what lets a lone ESC be told apart from a sequence prefix.
#[cfg(unix)]
#[derive(Debug, Default)]
pub struct TtyInput;

#[cfg(unix)]
impl TtyInput {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl ByteSource for TtyInput {
    #[allow(unsafe_code)]
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte: u8 = 0;
        // Single-byte read on fd 0; VTIME bounds how long it can block.
        let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };
        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted
                    || err.raw_os_error() == Some(libc::EAGAIN)
                {
                    Ok(None)
                } else {
                    Err(err)
                }
            }
        }
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// The escape-family input decoder.
///
/// [`read_event`](Self::read_event) reads exactly one event's worth of
/// bytes from the source, or nothing at all if the leading read times
/// out. All scratch state lives here; there are no globals.
#[derive(Debug)]
pub struct Decoder<S> {
    source: S,
}

impl<S: ByteSource> Decoder<S> {
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Consume the decoder and return the underlying source.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Decode the next input event.
    ///
    /// Returns `Ok(None)` when the leading read yields no byte (nothing
    /// typed this tick) and when a sequence cannot be classified; an
    /// unclassifiable sequence is logged and dropped, never fatal.
    ///
    /// # Errors
    ///
    /// Propagates real I/O failures from the byte source.
    pub fn read_event(&mut self) -> io::Result<Option<Event>> {
        let Some(lead) = self.source.read_byte()? else {
            return Ok(None);
        };

        if lead == ESC {
            return self.escape();
        }

        Ok(Some(Event::Key(classify_plain(lead))))
    }

    /// Dispatch on the byte after ESC.
    fn escape(&mut self) -> io::Result<Option<Event>> {
        let Some(second) = self.source.read_byte()? else {
            // Timed out: a real Escape key press.
            return Ok(Some(Event::Key(KeyEvent::plain(KeyCode::Escape))));
        };

        match second {
            ESC => Ok(Some(Event::Key(KeyEvent::plain(KeyCode::Escape)))),
            b'O' => self.ss3(),
            b'[' => self.csi(),
            // readline-style word jumps from Alt-b / Alt-f.
            b'b' => Ok(Some(Event::Key(KeyEvent::with(
                KeyCode::Left,
                Modifiers::CONTROL,
            )))),
            b'f' => Ok(Some(Event::Key(KeyEvent::with(
                KeyCode::Right,
                Modifiers::CONTROL,
            )))),
            other => {
                log::debug!("unknown escape introducer: {other:#04x}");
                Ok(None)
            }
        }
    }

    /// SS3 family: `ESC O <letter>`, optionally `ESC O 1 ; <mods> <letter>`.
    fn ss3(&mut self) -> io::Result<Option<Event>> {
        let Some(mut final_byte) = self.source.read_byte()? else {
            return Ok(None);
        };

        let mut modifiers = Modifiers::empty();
        if final_byte == b'1' {
            let Some(sep) = self.source.read_byte()? else {
                return Ok(None);
            };
            if sep != b';' {
                log::debug!("unknown SS3 continuation: {sep:#04x}");
                return Ok(None);
            }
            let Some((mods, terminator)) = self.modifier_suffix()? else {
                return Ok(None);
            };
            modifiers = mods;
            final_byte = terminator;
        }

        match xterm_code(final_byte) {
            Some(code) => Ok(Some(Event::Key(KeyEvent::with(code, modifiers)))),
            None => {
                log::debug!("unknown SS3 code: {final_byte:#04x}");
                Ok(None)
            }
        }
    }

    /// CSI family: the most branching case.
    ///
    /// Mirrors the real protocol overlap: a leading digit can still turn
    /// into a VT `~` code, a VT function-key code, or a modifier prefix
    /// for an xterm letter. Each arm consumes exactly what it needs.
    fn csi(&mut self) -> io::Result<Option<Event>> {
        let Some(b0) = self.source.read_byte()? else {
            return Ok(None);
        };

        if b0.is_ascii_uppercase() {
            return Ok(xterm_event(b0, Modifiers::empty()));
        }
        if !b0.is_ascii_digit() {
            log::debug!("unknown CSI code: {b0:#04x}");
            return Ok(None);
        }

        let Some(b1) = self.source.read_byte()? else {
            return Ok(None);
        };

        if b1 == b'~' {
            return Ok(vt_event(b0, Modifiers::empty()));
        }

        if b1 == b';' {
            let Some((modifiers, terminator)) = self.modifier_suffix()? else {
                return Ok(None);
            };
            if terminator == b'~' {
                return Ok(vt_event(b0, modifiers));
            }
            if terminator.is_ascii_uppercase() && b0 == b'1' {
                return Ok(xterm_event(terminator, modifiers));
            }
            log::debug!("unknown CSI code: {terminator:#04x}");
            return Ok(None);
        }

        if b1.is_ascii_digit() {
            let Some(b2) = self.source.read_byte()? else {
                return Ok(None);
            };
            if b2 == b'~' {
                return Ok(vt_function_event(b0, b1, Modifiers::empty()));
            }
            if b2 == b';' {
                let Some((modifiers, terminator)) = self.modifier_suffix()? else {
                    return Ok(None);
                };
                if terminator == b'~' {
                    return Ok(vt_function_event(b0, b1, modifiers));
                }
                log::debug!("unknown CSI code: {terminator:#04x}");
                return Ok(None);
            }
            if b2.is_ascii_uppercase() {
                // Pre-tilde xterm form: the two digits are an encoded
                // modifier prefix for the final letter.
                let modifiers = Modifiers::from_encoded((b0 - b'0') * 10 + (b1 - b'0'));
                return Ok(xterm_event(b2, modifiers));
            }
            log::debug!("unknown CSI code: {b2:#04x}");
            return Ok(None);
        }

        if b1.is_ascii_uppercase() {
            let modifiers = Modifiers::from_encoded(b0 - b'0');
            return Ok(xterm_event(b1, modifiers));
        }

        log::debug!("unknown CSI code: {b1:#04x}");
        Ok(None)
    }

    /// Read a numeric modifier parameter (one or two decimal digits)
    /// plus the byte that terminates it.
    fn modifier_suffix(&mut self) -> io::Result<Option<(Modifiers, u8)>> {
        let Some(first) = self.source.read_byte()? else {
            return Ok(None);
        };
        if !first.is_ascii_digit() {
            log::debug!("malformed modifier suffix: {first:#04x}");
            return Ok(None);
        }
        let mut value = first - b'0';

        let Some(mut terminator) = self.source.read_byte()? else {
            return Ok(None);
        };
        if terminator.is_ascii_digit() {
            value = value * 10 + (terminator - b'0');
            let Some(next) = self.source.read_byte()? else {
                return Ok(None);
            };
            terminator = next;
        }

        Ok(Some((Modifiers::from_encoded(value), terminator)))
    }
}

// ─── Classification Tables ──────────────────────────────────────────────────

/// Classify a single non-ESC byte.
///
/// Control bytes map back to their letter (`Ctrl-A` is 0x01, XOR 64
/// recovers `A`) with the Control flag; uppercase ASCII carries Shift.
const fn classify_plain(byte: u8) -> KeyEvent {
    match byte {
        0x0D => KeyEvent::plain(KeyCode::Enter),
        0x09 => KeyEvent::plain(KeyCode::Tab),
        0x7F => KeyEvent::plain(KeyCode::Backspace),
        b @ 0x01..=0x1F => KeyEvent::with(KeyCode::Char(b ^ 64), Modifiers::CONTROL),
        b @ b'A'..=b'Z' => KeyEvent::with(KeyCode::Char(b), Modifiers::SHIFT),
        b => KeyEvent::plain(KeyCode::Char(b)),
    }
}

/// The xterm / SS3 final-letter mapping shared by several families.
const fn xterm_code(letter: u8) -> Option<KeyCode> {
    Some(match letter {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'F' => KeyCode::End,
        b'H' => KeyCode::Home,
        b'P' => KeyCode::Function(1),
        b'Q' => KeyCode::Function(2),
        b'R' => KeyCode::Function(3),
        b'S' => KeyCode::Function(4),
        _ => return None,
    })
}

/// CSI letter dispatch: the xterm table plus `Z` (back-tab).
fn xterm_event(letter: u8, modifiers: Modifiers) -> Option<Event> {
    if letter == b'Z' {
        return Some(Event::Key(KeyEvent::with(
            KeyCode::Tab,
            modifiers | Modifiers::SHIFT,
        )));
    }
    match xterm_code(letter) {
        Some(code) => Some(Event::Key(KeyEvent::with(code, modifiers))),
        None => {
            log::debug!("unknown xterm code: {letter:#04x}");
            None
        }
    }
}

/// Legacy VT single-digit `~` codes.
fn vt_event(digit: u8, modifiers: Modifiers) -> Option<Event> {
    let code = match digit {
        b'1' | b'7' => KeyCode::Home,
        b'2' => KeyCode::Insert,
        b'3' => KeyCode::Delete,
        b'4' | b'8' => KeyCode::End,
        b'5' => KeyCode::PageUp,
        b'6' => KeyCode::PageDown,
        _ => {
            log::debug!("unknown VT code: {digit:#04x}");
            return None;
        }
    };
    Some(Event::Key(KeyEvent::with(code, modifiers)))
}

/// Extended VT two-digit function-key codes.
///
/// Each (decade, digit) pair is an explicit case; the gaps in the
/// numbering are real gaps in the VT assignment, not omissions.
fn vt_function_event(decade: u8, digit: u8, modifiers: Modifiers) -> Option<Event> {
    let index: u8 = match (decade, digit) {
        (b'1', b'0') => 0,
        (b'1', b'1') => 1,
        (b'1', b'2') => 2,
        (b'1', b'3') => 3,
        (b'1', b'4') => 4,
        (b'1', b'5') => 5,
        (b'1', b'7') => 6,
        (b'1', b'8') => 7,
        (b'1', b'9') => 8,
        (b'2', b'0') => 9,
        (b'2', b'1') => 10,
        (b'2', b'3') => 11,
        (b'2', b'4') => 12,
        (b'2', b'5') => 13,
        (b'2', b'6') => 14,
        (b'2', b'8') => 15,
        (b'2', b'9') => 16,
        (b'3', b'1') => 17,
        (b'3', b'2') => 18,
        (b'3', b'3') => 19,
        (b'3', b'4') => 20,
        _ => {
            log::debug!("unknown VT function code: {decade:#04x} {digit:#04x}");
            return None;
        }
    };
    Some(Event::Key(KeyEvent::with(KeyCode::Function(index), modifiers)))
}

// ─── Tests ──────────────────────────────────────────────────────────────────
