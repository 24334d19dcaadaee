/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use flume::{Receiver, Sender, TrySendError};
use slog::{Drain, OwnedKVList, Record};

use super::LogStats;

const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Queue size and io thread name of one console logger.
#[derive(Clone, Debug)]
pub struct AsyncLogConfig {
    pub channel_capacity: usize,
    pub thread_name: String,
}

impl AsyncLogConfig {
    pub fn new(thread_name: &str, channel_capacity: usize) -> Self {
        AsyncLogConfig {
            channel_capacity: channel_capacity.max(1),
            thread_name: thread_name.to_string(),
        }
    }

    pub fn with_name(thread_name: &str) -> Self {
        AsyncLogConfig::new(thread_name, DEFAULT_CHANNEL_CAPACITY)
    }
}

impl Default for AsyncLogConfig {
    fn default() -> Self {
        AsyncLogConfig::with_name("log-async")
    }
}

/// Turns a slog record into the value handed over to the io thread.
///
/// Formatting happens on the logging thread, so time stamps and thread names
/// reflect the call site rather than the io thread.
pub trait AsyncLogFormatter<T> {
    fn format_slog(&self, record: &Record, logger_values: &OwnedKVList) -> Result<T, slog::Error>;
}

/// Drain that never blocks: a full queue drops the record and counts it.
pub struct AsyncLogger<T, F> {
    queue: Sender<T>,
    formatter: F,
    stats: Arc<LogStats>,
}

impl<T, F> AsyncLogger<T, F>
where
    F: AsyncLogFormatter<T>,
{
    /// Build the drain together with the receiving end of its queue.
    pub fn bounded(capacity: usize, formatter: F) -> (Self, Receiver<T>) {
        let (queue, receiver) = flume::bounded(capacity);
        let drain = AsyncLogger {
            queue,
            formatter,
            stats: Arc::new(LogStats::default()),
        };
        (drain, receiver)
    }

    pub fn stats(&self) -> &Arc<LogStats> {
        &self.stats
    }

    fn enqueue(&self, value: T) {
        match self.queue.try_send(value) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => self.stats.add_channel_overflow(),
            Err(TrySendError::Disconnected(_)) => self.stats.add_channel_closed(),
        }
    }
}

impl<T, F> Drain for AsyncLogger<T, F>
where
    F: AsyncLogFormatter<T>,
{
    type Ok = ();
    type Err = slog::Error;

    fn log(&self, record: &Record, logger_values: &OwnedKVList) -> Result<(), slog::Error> {
        self.stats.add_total();
        let value = self
            .formatter
            .format_slog(record, logger_values)
            .inspect_err(|_| self.stats.add_format_failed())?;
        self.enqueue(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slog::{Logger, o};

    struct MsgFormatter;

    impl AsyncLogFormatter<String> for MsgFormatter {
        fn format_slog(&self, record: &Record, _values: &OwnedKVList) -> Result<String, slog::Error> {
            Ok(record.msg().to_string())
        }
    }

    struct BrokenFormatter;

    impl AsyncLogFormatter<String> for BrokenFormatter {
        fn format_slog(&self, _record: &Record, _values: &OwnedKVList) -> Result<String, slog::Error> {
            Err(slog::Error::Fmt(std::fmt::Error))
        }
    }

    #[test]
    fn channel_overflow() {
        let (drain, receiver) = AsyncLogger::<String, _>::bounded(1, MsgFormatter);
        let stats = Arc::clone(drain.stats());
        let logger = Logger::root(drain.ignore_res(), o!());

        slog::info!(logger, "first");
        slog::info!(logger, "second");

        let snap = stats.snapshot();
        assert_eq!(snap.total, 2);
        assert_eq!(snap.channel_overflow, 1);
        assert_eq!(receiver.try_recv().unwrap(), "first");
    }

    #[test]
    fn channel_closed() {
        let (drain, receiver) = AsyncLogger::<String, _>::bounded(4, MsgFormatter);
        drop(receiver);
        let stats = Arc::clone(drain.stats());
        let logger = Logger::root(drain.ignore_res(), o!());

        slog::warn!(logger, "lost");
        assert_eq!(stats.snapshot().channel_closed, 1);
    }

    #[test]
    fn format_failed() {
        let (drain, receiver) = AsyncLogger::<String, _>::bounded(4, BrokenFormatter);
        let stats = Arc::clone(drain.stats());
        let logger = Logger::root(drain.ignore_res(), o!());

        slog::error!(logger, "unformattable");
        let snap = stats.snapshot();
        assert_eq!(snap.total, 1);
        assert_eq!(snap.format_failed, 1);
        assert!(receiver.is_empty());
    }

    #[test]
    fn zero_capacity_config() {
        let conf = AsyncLogConfig::new("log-zero", 0);
        assert_eq!(conf.channel_capacity, 1);
        assert_eq!(AsyncLogConfig::default().channel_capacity, DEFAULT_CHANNEL_CAPACITY);
    }
}
