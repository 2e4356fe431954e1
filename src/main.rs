// SPDX-License-Identifier: MIT
//
// rawterm — paints the 16-color palette through a raw-mode session.
//
// This is the smallest program that exercises the whole session: enter raw
// mode, clear, hide the cursor, position and color every swatch, print the
// cached terminal size, flush once, hold the frame, and restore.
//
//   rawterm [--config <path>] [--hold <seconds>]
//
// Logs go to $RAWTERM_LOG (default: rawterm.log in the temp dir) so they
// never scribble over the screen while it is raw.

use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process;
use std::thread;
use std::time::Duration;

use rawterm_core::{printf, Color, Config, Device, Session, Tty};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Width of one palette swatch in columns.
const SWATCH_WIDTH: i32 = 14;

// ─── Arguments ──────────────────────────────────────────────────────────────

struct Args {
    config: Option<PathBuf>,
    hold: Duration,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: None,
        hold: Duration::from_secs(2),
    };
    let mut it = env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = it.next().ok_or("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--hold" => {
                let secs = it.next().ok_or("--hold needs a number of seconds")?;
                let secs: u64 = secs
                    .parse()
                    .map_err(|_| format!("--hold: not a number: {secs}"))?;
                args.hold = Duration::from_secs(secs);
            }
            "--help" | "-h" => {
                println!("usage: rawterm [--config <path>] [--hold <seconds>]");
                process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

// ─── Logging ────────────────────────────────────────────────────────────────

fn init_logging() {
    let path = env::var_os("RAWTERM_LOG")
        .map_or_else(|| env::temp_dir().join("rawterm.log"), PathBuf::from);

    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

// ─── Fatal errors ───────────────────────────────────────────────────────────

/// Report a fatal error and exit.
///
/// `process::exit` skips destructors, so an active session is cleaned up
/// first; the message then lands on a terminal that is back to normal.
fn die<D: Device>(session: Option<&mut Session<D>>, msg: &str) -> ! {
    if let Some(s) = session {
        s.cleanup();
    }
    error!("{msg}");
    eprintln!("rawterm: {msg}");
    process::exit(1);
}

// ─── Drawing ────────────────────────────────────────────────────────────────

fn paint<D: Device>(term: &mut Session<D>) {
    term.hide_cursor();
    term.color(Color::Gray.into(), Color::Black.into());
    term.clear();

    let rows = i32::from(term.rows());
    let cols = i32::from(term.cols());

    term.locate(1, 2);
    term.set_colors(Color::White, Color::Black);
    printf!(term, "rawterm palette - {rows} rows x {cols} cols");

    for color in Color::ALL {
        let i = i32::from(color.index());
        let row = 3 + i % 8;
        let col = 2 + (i / 8) * (SWATCH_WIDTH + 2);
        let fg = if color.is_bright() || color == Color::Gray {
            Color::Black
        } else {
            Color::White
        };
        term.locate(row, col);
        term.set_colors(fg, color);
        printf!(term, " {:>2} {:<10}", i, color.name());
    }

    term.set_colors(Color::DarkGray, Color::Black);
    term.locate(rows, 2);
    term.print("restoring terminal shortly");
    term.flush();
}

fn run(args: &Args) {
    let config = match &args.config {
        Some(path) => Config::load(path).unwrap_or_else(|e| die::<Tty>(None, &e.to_string())),
        None => Config::default(),
    };

    let mut term = Session::new(Tty::new(config.fd), config);
    if let Err(e) = term.initialize() {
        die(Some(&mut term), &e.to_string());
    }
    info!(rows = term.rows(), cols = term.cols(), "session started");

    paint(&mut term);
    thread::sleep(args.hold);

    term.color(Color::Gray.into(), Color::Black.into());
    term.clear();
    term.show_cursor();
    term.flush();
    term.cleanup();
    info!("session finished");
}

fn main() {
    init_logging();
    let args = parse_args().unwrap_or_else(|e| {
        eprintln!("rawterm: {e}");
        eprintln!("Use --help for usage information");
        process::exit(2);
    });
    run(&args);
}
