/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::str::FromStr;

use crate::LevelParseError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Level {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Critical,
    Off,
}

impl Level {
    /// The matching slog level, `None` for `Off`.
    pub const fn as_slog(self) -> Option<slog::Level> {
        match self {
            Level::Trace => Some(slog::Level::Trace),
            Level::Debug => Some(slog::Level::Debug),
            Level::Info => Some(slog::Level::Info),
            Level::Warn => Some(slog::Level::Warning),
            Level::Error => Some(slog::Level::Error),
            Level::Critical => Some(slog::Level::Critical),
            Level::Off => None,
        }
    }

    pub const fn from_slog(level: Option<slog::Level>) -> Self {
        match level {
            Some(slog::Level::Trace) => Level::Trace,
            Some(slog::Level::Debug) => Level::Debug,
            Some(slog::Level::Info) => Level::Info,
            Some(slog::Level::Warning) => Level::Warn,
            Some(slog::Level::Error) => Level::Error,
            Some(slog::Level::Critical) => Level::Critical,
            None => Level::Off,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Critical => "critical",
            Level::Off => "off",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, LevelParseError> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "err" | "error" => Ok(Level::Error),
            "critical" | "crit" => Ok(Level::Critical),
            "off" | "none" => Ok(Level::Off),
            _ => Err(LevelParseError(s.to_string())),
        }
    }
}
