// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, TTY detection, size queries, RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd reads/writes. These
// are the standard POSIX interfaces for terminal control — there is no
// safe alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// Raw mode here is the non-blocking variant: `VMIN=0, VTIME=1` makes
// every single-byte read return within a tenth of a second. That one
// setting is what the input decoder builds its escape-versus-ESC-key
// disambiguation on, and it is also what paces the editor's idle ticks.
//
// The original termios state is saved before the first modification and
// restored on `leave_raw` or drop, whichever comes first. A panic hook
// restores from a global backup so a panic mid-frame still leaves the
// user with a working shell.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Check whether both stdin and stdout are connected to a terminal.
///
/// The editor needs both: it reads key bytes from stdin and paints
/// frames to stdout, and neither side works piped.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 && libc::isatty(libc::STDOUT_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

/// Query the terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if the query fails or reports a zero dimension.
#[cfg(unix)]
#[must_use]
pub fn ioctl_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn ioctl_size() -> Option<Size> {
    None
}

/// Determine the terminal size, falling back to cursor interrogation.
///
/// Tries the ioctl first. If that fails (some terminals and pseudo-TTY
/// layers do not implement it), parks the cursor at the far corner with
/// `ESC [ 999 C` / `ESC [ 999 B`, asks for its position with a DSR
/// query, and reads the `ESC [ {row} ; {col} R` reply off stdin. The
/// fallback requires raw mode to be active, since the reply arrives as
/// unechoed input bytes.
#[cfg(unix)]
pub fn window_size() -> io::Result<Size> {
    if let Some(size) = ioctl_size() {
        return Ok(size);
    }
    dsr_size()
}

#[cfg(not(unix))]
pub fn window_size() -> io::Result<Size> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "terminal size queries are unix-only",
    ))
}

/// DSR cursor-position fallback for `window_size`.
#[cfg(unix)]
fn dsr_size() -> io::Result<Size> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(b"\x1b[999C\x1b[999B\x1b[6n")?;
    stdout.flush()?;
    drop(stdout);

    // The reply is short; 32 bytes is more than any row;col pair needs.
    let mut reply = [0u8; 32];
    let mut len = 0;
    while len < reply.len() {
        let mut byte: u8 = 0;
        let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };
        if n != 1 {
            break;
        }
        reply[len] = byte;
        len += 1;
        if byte == b'R' {
            break;
        }
    }

    parse_dsr_reply(&reply[..len]).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            "malformed cursor position report",
        )
    })
}

/// Parse a `ESC [ {row} ; {col} R` cursor position report.
///
/// Returns `(cols, rows)` as a [`Size`], or `None` if the reply is not
/// in the expected shape or either dimension is zero.
#[must_use]
pub fn parse_dsr_reply(reply: &[u8]) -> Option<Size> {
    let body = reply.strip_prefix(b"\x1b[")?.strip_suffix(b"R")?;
    let sep = body.iter().position(|&b| b == b';')?;

    let rows = parse_u16(&body[..sep])?;
    let cols = parse_u16(&body[sep + 1..])?;
    if rows == 0 || cols == 0 {
        return None;
    }
    Some(Size { cols, rows })
}

fn parse_u16(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() {
        return None;
    }
    let mut value: u16 = 0;
    for &byte in digits {
        if !byte.is_ascii_digit() {
            return None;
        }
        value = value
            .checked_mul(10)?
            .checked_add(u16::from(byte - b'0'))?;
    }
    Some(value)
}

// ─── Panic-Safe Restore ─────────────────────────────────────────────────────

/// Global backup of original termios for panic recovery.
///
/// The [`Terminal`] struct owns its own copy, but the panic hook can't
/// access it. This backup — behind a [`Mutex`], not `static mut` —
/// lets the hook restore raw mode without the struct.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

/// Restore sequence for emergency use: default colors, visible cursor.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[39m\x1b[49m\x1b[?25h";

/// Panic hook guard — the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing.
///
/// Without this, a panic in raw mode leaves the user's terminal broken:
/// no echo, no line editing, no way to read the error message. The hook
/// writes [`EMERGENCY_RESTORE`] directly to fd 1 (bypassing Rust's
/// stdout lock to avoid deadlock), restores termios, then delegates to
/// the original panic handler.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write the restore sequence directly to stdout's file descriptor.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Terminal handle with RAII cleanup.
///
/// Call [`enter_raw`](Self::enter_raw) before reading input. The
/// original mode is restored by [`leave_raw`](Self::leave_raw) or
/// automatically on drop — even on panic.
#[derive(Debug, Default)]
pub struct Terminal {
    /// Original termios saved before entering raw mode.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,
}

impl Terminal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether raw mode is currently active.
    #[cfg(unix)]
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        self.original_termios.is_some()
    }

    #[cfg(not(unix))]
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        false
    }

    /// Enter raw mode.
    ///
    /// Disables echo and canonical line processing, and sets
    /// `VMIN=0, VTIME=1` so reads return after at most 100 ms with
    /// nothing available. Idempotent: a second call is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the termios calls fail.
    #[cfg(unix)]
    pub fn enter_raw(&mut self) -> io::Result<()> {
        if self.original_termios.is_some() {
            return Ok(());
        }

        install_panic_hook();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            // Save original for restore.
            self.original_termios = Some(termios);

            // Also save to the global backup for the panic hook.
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            // cfmakeraw equivalent: disable all line processing.
            termios.c_iflag &= !(libc::IGNBRK
                | libc::BRKINT
                | libc::PARMRK
                | libc::ISTRIP
                | libc::INLCR
                | libc::IGNCR
                | libc::ICRNL
                | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_lflag &=
                !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
            termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
            termios.c_cflag |= libc::CS8;

            // VMIN=0, VTIME=1: read() returns within 100 ms even with
            // no input. The decoder and the idle tick depend on this.
            termios.c_cc[libc::VMIN] = 0;
            termios.c_cc[libc::VTIME] = 1;

            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const termios) != 0 {
                self.original_termios = None;
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    pub fn enter_raw(&mut self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "raw mode is unix-only",
        ))
    }

    /// Restore the terminal mode saved by `enter_raw`.
    ///
    /// Idempotent: a no-op when raw mode is not active.
    ///
    /// # Errors
    ///
    /// Returns an error if the termios restore fails.
    #[cfg(unix)]
    pub fn leave_raw(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original_termios {
            unsafe {
                if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }

            // Restored successfully; the panic hook no longer needs it.
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }

            self.original_termios = None;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    pub fn leave_raw(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave_raw();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
