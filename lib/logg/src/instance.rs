/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::sync::Arc;
use std::thread::JoinHandle;

use slog::{Record, RecordLocation, RecordStatic, o};

use logg_stdlog::{
    AsyncLogConfig, LevelSwitch, LogPattern, LogSnapshot, LogStats, SharedLevel, SharedPattern,
    StdLogFormatter,
};

use crate::report::ReportLogIoError;
use crate::{Level, LogSystemError, LoggerSettings, registry};

/// Longest accepted logger name, in bytes.
pub const MAX_NAME_LENGTH: usize = 63;

static UNKNOWN_LOCATION: RecordLocation = RecordLocation {
    file: "",
    line: 0,
    column: 0,
    function: "",
    module: "",
};

/// A named console logger, the object a `Logger` slot binds to.
///
/// Instances are registered by name while alive, and two live instances
/// never share a name.
pub struct LogInstance {
    name: String,
    level: SharedLevel,
    pattern: SharedPattern,
    stats: Arc<LogStats>,
    logger: slog::Logger,
    io_thread: Option<JoinHandle<()>>,
}

impl LogInstance {
    pub(crate) fn new(
        name: &str,
        settings: &LoggerSettings,
    ) -> Result<Arc<LogInstance>, LogSystemError> {
        if name.len() > MAX_NAME_LENGTH {
            return Err(LogSystemError::NameTooLong {
                max: MAX_NAME_LENGTH,
            });
        }
        if name.contains('\0') {
            return Err(LogSystemError::InvalidName);
        }
        if registry::contains(name) {
            return Err(LogSystemError::NameConflict(name.to_string()));
        }

        let level = SharedLevel::new(settings.level.as_slog());
        let pattern = SharedPattern::new(LogPattern::parse(&settings.pattern));
        let async_conf =
            AsyncLogConfig::new(&format!("log-{name}"), settings.async_channel_size);
        let formatter = StdLogFormatter::new(name, pattern.clone());
        let (drain, io_thread) = logg_stdlog::new_async_logger(
            &async_conf,
            formatter,
            settings.target,
            settings.color,
        )
        .map_err(LogSystemError::SpawnFailed)?;
        let stats = Arc::clone(drain.stats());
        let drain = ReportLogIoError::new(drain, name, settings.io_err_sampling_mask);
        let drain = LevelSwitch::new(drain, level.clone());

        let instance = Arc::new(LogInstance {
            name: name.to_string(),
            level,
            pattern,
            stats,
            logger: slog::Logger::root(drain, o!()),
            io_thread: Some(io_thread),
        });
        if !registry::add(&instance) {
            return Err(LogSystemError::NameConflict(name.to_string()));
        }
        Ok(instance)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        Level::from_slog(self.level.get())
    }

    pub fn set_level(&self, level: Level) {
        self.level.set(level.as_slog());
    }

    pub fn pattern(&self) -> String {
        self.pattern.get().as_str().to_string()
    }

    pub fn set_pattern(&self, pattern: &str) {
        self.pattern.set(LogPattern::parse(pattern));
    }

    /// Whether a message at `level` would pass the current threshold.
    pub fn should_log(&self, level: Level) -> bool {
        level.as_slog().is_some_and(|l| self.level.allows(l))
    }

    pub fn stats(&self) -> LogSnapshot {
        self.stats.snapshot()
    }

    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        self.log_at(&UNKNOWN_LOCATION, level, args)
    }

    #[doc(hidden)]
    pub fn log_at(&self, location: &'static RecordLocation, level: Level, args: fmt::Arguments<'_>) {
        let Some(level) = level.as_slog() else {
            return;
        };
        if !self.level.allows(level) {
            return;
        }
        let record_static = RecordStatic {
            location,
            level,
            tag: "",
        };
        self.logger
            .log(&Record::new(&record_static, &args, slog::b!()));
    }
}

impl fmt::Debug for LogInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogInstance")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("pattern", &self.pattern())
            .finish()
    }
}

impl Drop for LogInstance {
    fn drop(&mut self) {
        registry::remove_dead(&self.name);
        // closing the channel lets the io thread write what is queued and exit
        self.logger = slog::Logger::root(slog::Discard, o!());
        if let Some(handle) = self.io_thread.take() {
            let _ = handle.join();
        }
    }
}
