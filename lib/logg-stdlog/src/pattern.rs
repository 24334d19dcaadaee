/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt::{self, Write};
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local};
use slog::Level;

pub const DEFAULT_PATTERN: &str = "[%Y-%m-%d %H:%M:%S.%e] [%n] [%^%l%$] %v";

#[derive(Clone, Debug, PartialEq, Eq)]
enum PatternItem {
    Literal(String),
    /// chrono strftime specifier
    Time(String),
    Message,
    LoggerName,
    Level,
    ShortLevel,
    Thread,
    Pid,
    ColorStart,
    ColorEnd,
    Location,
    FileName,
    FilePath,
    Line,
    Module,
}

pub struct PatternInput<'a> {
    pub time: DateTime<Local>,
    pub logger_name: &'a str,
    pub level: Level,
    pub message: fmt::Arguments<'a>,
    pub file: &'static str,
    pub line: u32,
    pub module: &'static str,
}

pub fn level_name(level: Level) -> &'static str {
    match level {
        Level::Critical => "critical",
        Level::Error => "error",
        Level::Warning => "warning",
        Level::Info => "info",
        Level::Debug => "debug",
        Level::Trace => "trace",
    }
}

fn short_level_name(level: Level) -> &'static str {
    match level {
        Level::Critical => "C",
        Level::Error => "E",
        Level::Warning => "W",
        Level::Info => "I",
        Level::Debug => "D",
        Level::Trace => "T",
    }
}

/// Numeric id of the calling thread, assigned in first use order from 1.
fn current_thread_id() -> u64 {
    static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);
    thread_local! {
        static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
    }
    THREAD_ID.with(|id| *id)
}

fn time_spec(flag: char) -> Option<&'static str> {
    let spec = match flag {
        'Y' => "%Y",
        'y' => "%y",
        'm' => "%m",
        'd' => "%d",
        'H' => "%H",
        'M' => "%M",
        'S' => "%S",
        'e' => "%3f",
        'f' => "%6f",
        'F' => "%9f",
        'I' => "%I",
        'p' => "%p",
        'a' => "%a",
        'A' => "%A",
        'b' => "%b",
        'B' => "%B",
        'D' => "%m/%d/%y",
        'T' => "%H:%M:%S",
        'z' => "%:z",
        'E' => "%s",
        _ => return None,
    };
    Some(spec)
}

/// A parsed output pattern, using the flag set of spdlog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogPattern {
    raw: String,
    items: Vec<PatternItem>,
}

impl Default for LogPattern {
    fn default() -> Self {
        LogPattern::parse(DEFAULT_PATTERN)
    }
}

impl LogPattern {
    /// Parse a pattern string. Unknown flags are kept verbatim.
    pub fn parse(raw: &str) -> Self {
        let mut items: Vec<PatternItem> = Vec::new();
        let mut literal = String::new();

        let mut chars = raw.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            let Some(flag) = chars.next() else {
                literal.push('%');
                break;
            };

            let item = match flag {
                '%' => {
                    literal.push('%');
                    continue;
                }
                'v' => PatternItem::Message,
                'n' => PatternItem::LoggerName,
                'l' => PatternItem::Level,
                'L' => PatternItem::ShortLevel,
                't' => PatternItem::Thread,
                'P' => PatternItem::Pid,
                '^' => PatternItem::ColorStart,
                '$' => PatternItem::ColorEnd,
                '@' => PatternItem::Location,
                's' => PatternItem::FileName,
                'g' => PatternItem::FilePath,
                '#' => PatternItem::Line,
                '!' => PatternItem::Module,
                _ => match time_spec(flag) {
                    Some(spec) => PatternItem::Time(spec.to_string()),
                    None => {
                        literal.push('%');
                        literal.push(flag);
                        continue;
                    }
                },
            };

            if !literal.is_empty() {
                items.push(PatternItem::Literal(std::mem::take(&mut literal)));
            }
            match (items.last_mut(), item) {
                (Some(PatternItem::Time(prev)), PatternItem::Time(spec)) => prev.push_str(&spec),
                (_, item) => items.push(item),
            }
        }
        if !literal.is_empty() {
            items.push(PatternItem::Literal(literal));
        }

        LogPattern {
            raw: raw.to_string(),
            items,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Render one line into `buf`, without the trailing newline.
    ///
    /// Returns the byte range of `buf` enclosed by `%^` and `%$`, if any.
    pub fn render(
        &self,
        input: &PatternInput<'_>,
        buf: &mut String,
    ) -> Result<Option<Range<usize>>, fmt::Error> {
        let mut color_start = None;
        let mut color_end = None;

        for item in &self.items {
            match item {
                PatternItem::Literal(s) => buf.push_str(s),
                PatternItem::Time(spec) => write!(buf, "{}", input.time.format(spec))?,
                PatternItem::Message => buf.write_fmt(input.message)?,
                PatternItem::LoggerName => buf.push_str(input.logger_name),
                PatternItem::Level => buf.push_str(level_name(input.level)),
                PatternItem::ShortLevel => buf.push_str(short_level_name(input.level)),
                PatternItem::Thread => write!(buf, "{}", current_thread_id())?,
                PatternItem::Pid => write!(buf, "{}", std::process::id())?,
                PatternItem::ColorStart => color_start = Some(buf.len()),
                PatternItem::ColorEnd => color_end = Some(buf.len()),
                PatternItem::Location => write!(buf, "{}:{}", input.file, input.line)?,
                PatternItem::FileName => {
                    let name = input
                        .file
                        .rsplit_once(&['/', '\\'][..])
                        .map(|x| x.1)
                        .unwrap_or(input.file);
                    buf.push_str(name);
                }
                PatternItem::FilePath => buf.push_str(input.file),
                PatternItem::Line => write!(buf, "{}", input.line)?,
                PatternItem::Module => buf.push_str(input.module),
            }
        }

        let range = match (color_start, color_end) {
            (Some(start), Some(end)) if start <= end => Some(start..end),
            (Some(start), None) => Some(start..buf.len()),
            _ => None,
        };
        Ok(range)
    }
}
