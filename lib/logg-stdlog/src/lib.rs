/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::thread::JoinHandle;

use anstyle::{AnsiColor, Color, Style};
use flume::Receiver;
use slog::Level;

mod async_log;
pub use async_log::{AsyncLogConfig, AsyncLogFormatter, AsyncLogger};

mod stats;
pub use stats::{LogSnapshot, LogStats};

mod filter;
pub use filter::{LevelSwitch, SharedLevel};

mod pattern;
pub use pattern::{DEFAULT_PATTERN, LogPattern, PatternInput, level_name};

mod format;
pub use format::{SharedPattern, StdLogFormatter, StdLogValue};

pub type StdLogDrain = AsyncLogger<StdLogValue, StdLogFormatter>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StdLogTarget {
    #[default]
    Stdout,
    Stderr,
    Discard,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// color only when the target is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorMode::Auto => is_terminal,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Create a console drain backed by its own io thread.
///
/// The thread exits once every clone of the returned drain has been dropped
/// and the pending lines have been written.
pub fn new_async_logger(
    async_conf: &AsyncLogConfig,
    formatter: StdLogFormatter,
    target: StdLogTarget,
    color: ColorMode,
) -> io::Result<(StdLogDrain, JoinHandle<()>)> {
    let (drain, receiver) = AsyncLogger::bounded(async_conf.channel_capacity, formatter);
    let io_thread = AsyncIoThread {
        receiver,
        stats: Arc::clone(drain.stats()),
    };

    let handle = std::thread::Builder::new()
        .name(async_conf.thread_name.clone())
        .spawn(move || io_thread.run(target, color))?;
    Ok((drain, handle))
}

struct AsyncIoThread {
    receiver: Receiver<StdLogValue>,
    stats: Arc<LogStats>,
}

impl AsyncIoThread {
    fn run(self, target: StdLogTarget, color: ColorMode) {
        match target {
            StdLogTarget::Stdout => {
                let stdout = io::stdout();
                let use_color = color.enabled(stdout.is_terminal());
                self.run_with(stdout, use_color)
            }
            StdLogTarget::Stderr => {
                let stderr = io::stderr();
                let use_color = color.enabled(stderr.is_terminal());
                self.run_with(stderr, use_color)
            }
            StdLogTarget::Discard => self.run_with(io::sink(), false),
        }
    }

    fn run_with<IO: Write>(&self, mut io: IO, use_color: bool) {
        let mut buf: Vec<u8> = Vec::with_capacity(1024);
        while let Ok(v) = self.receiver.recv() {
            buf.clear();
            let _ = write_value(&mut buf, &v, use_color);
            self.write_buf(&mut io, &buf);

            while let Ok(v) = self.receiver.try_recv() {
                buf.clear();
                let _ = write_value(&mut buf, &v, use_color);
                self.write_buf(&mut io, &buf);
            }

            let _ = io.flush();
        }
    }

    fn write_buf<IO: Write>(&self, io: &mut IO, buf: &[u8]) {
        match io.write_all(buf) {
            Ok(_) => self.stats.add_written(buf.len()),
            Err(_) => self.stats.add_write_failed(),
        }
    }
}

fn level_style(level: Level) -> Style {
    const COLOR_MAGENTA: Style = Style::new()
        .fg_color(Some(Color::Ansi(AnsiColor::Magenta)))
        .bold();
    const COLOR_RED: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));
    const COLOR_YELLOW: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
    const COLOR_GREEN: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
    const COLOR_CYAN: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));
    const COLOR_WHITE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::White)));

    match level {
        Level::Critical => COLOR_MAGENTA,
        Level::Error => COLOR_RED,
        Level::Warning => COLOR_YELLOW,
        Level::Info => COLOR_GREEN,
        Level::Debug => COLOR_CYAN,
        Level::Trace => COLOR_WHITE,
    }
}

fn write_value<IO: Write>(io: &mut IO, v: &StdLogValue, use_color: bool) -> io::Result<()> {
    match &v.color {
        Some(range) if use_color => {
            let style = level_style(v.level);
            io.write_all(&v.line.as_bytes()[..range.start])?;
            write!(
                io,
                "{}{}{}",
                style.render(),
                &v.line[range.clone()],
                style.render_reset()
            )?;
            io.write_all(&v.line.as_bytes()[range.end..])?;
        }
        _ => io.write_all(v.line.as_bytes())?,
    }
    writeln!(io)
}
