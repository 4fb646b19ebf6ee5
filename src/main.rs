// SPDX-License-Identifier: MIT
//
// tilde — a kilo-class terminal text editor.
//
// The binary wires the two crates together and owns all the I/O: it
// checks the startup preconditions, puts the terminal in raw mode, and
// drives the single-threaded run loop — render a frame, flush it in one
// write, block (briefly) for one input event, apply it, tick. Everything
// interesting lives in tilde-term (the codec) and tilde-editor (the
// engine).

use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use tilde_editor::{Document, Editor};
use tilde_term::command::{ClearMode, CommandQueue};
use tilde_term::input::{Decoder, TtyInput};
use tilde_term::terminal::{self, Terminal};
use tilde_term::writer::CommandWriter;

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let path = args.next().map(PathBuf::from);
    if args.next().is_some() {
        eprintln!("usage: tilde [file]");
        return ExitCode::FAILURE;
    }

    // This one goes to stdout: with no terminal attached there is no
    // screen to protect, and stdout is where a piped caller looks.
    if !terminal::is_tty() {
        println!("tilde: stdin and stdout must be a terminal");
        return ExitCode::FAILURE;
    }

    match run(path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("tilde: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: Option<PathBuf>) -> anyhow::Result<()> {
    // An unreadable file should not keep the editor from starting; the
    // failure is reported in the status bar instead.
    let mut load_error = None;
    let document = match path {
        Some(ref path) => Document::open(path).unwrap_or_else(|err| {
            load_error = Some(err.to_string());
            Document::empty()
        }),
        None => Document::empty(),
    };

    let mut term = Terminal::new();
    term.enter_raw().context("entering raw mode")?;

    // Size comes after raw mode: the DSR fallback reads its reply off
    // stdin, which only works unechoed and uncooked.
    let size = terminal::window_size().context("querying terminal size")?;
    anyhow::ensure!(
        size.cols >= 1 && size.rows >= 2,
        "terminal too small: need at least 1 column and 2 rows"
    );

    let mut editor = Editor::new(document, size);
    if let Some(message) = load_error {
        editor.set_status(message);
    }

    let mut queue = CommandQueue::new();
    let mut writer = CommandWriter::new();
    let mut decoder = Decoder::new(TtyInput::new());
    let mut stdout = io::stdout();

    while editor.is_running() {
        editor.render(&mut queue);
        writer.flush(&mut queue, &mut stdout).context("writing frame")?;

        // VMIN=0/VTIME=1 bounds this read to ~100 ms; a timeout is just
        // an extra pass, which is what ages the status message.
        if let Some(event) = decoder.read_event().context("reading input")? {
            editor.handle_event(event);
        }
        editor.tick();

        // Picks up window resizes between frames.
        if let Some(size) = terminal::ioctl_size() {
            editor.resize(size);
        }
    }

    // Leave the user's shell on a clean screen.
    queue.clear_screen(ClearMode::Entire);
    queue.move_cursor(1, 1);
    writer
        .flush(&mut queue, &mut stdout)
        .context("clearing screen")?;
    term.leave_raw().context("restoring terminal mode")?;

    Ok(())
}
