/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::ops::Range;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Local;
use slog::{Level, OwnedKVList, Record};

use super::{AsyncLogFormatter, LogPattern, PatternInput};

/// One rendered line waiting for the io thread.
pub struct StdLogValue {
    pub(crate) level: Level,
    pub(crate) line: String,
    pub(crate) color: Option<Range<usize>>,
}

/// Pattern shared between a formatter and the handle that may replace it.
#[derive(Clone, Default)]
pub struct SharedPattern {
    inner: Arc<RwLock<Arc<LogPattern>>>,
}

impl SharedPattern {
    pub fn new(pattern: LogPattern) -> Self {
        SharedPattern {
            inner: Arc::new(RwLock::new(Arc::new(pattern))),
        }
    }

    pub fn get(&self) -> Arc<LogPattern> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn set(&self, pattern: LogPattern) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(pattern);
    }
}

pub struct StdLogFormatter {
    logger_name: String,
    pattern: SharedPattern,
}

impl StdLogFormatter {
    pub fn new(logger_name: &str, pattern: SharedPattern) -> Self {
        StdLogFormatter {
            logger_name: logger_name.to_string(),
            pattern,
        }
    }
}

impl AsyncLogFormatter<StdLogValue> for StdLogFormatter {
    fn format_slog(
        &self,
        record: &Record,
        _logger_values: &OwnedKVList,
    ) -> Result<StdLogValue, slog::Error> {
        let pattern = self.pattern.get();
        let mut line = String::with_capacity(128);
        let color = pattern.render(
            &PatternInput {
                time: Local::now(),
                logger_name: &self.logger_name,
                level: record.level(),
                message: *record.msg(),
                file: record.file(),
                line: record.line(),
                module: record.module(),
            },
            &mut line,
        )?;

        Ok(StdLogValue {
            level: record.level(),
            line,
            color,
        })
    }
}
