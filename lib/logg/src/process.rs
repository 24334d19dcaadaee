/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::Context;
use slog::{Drain, o};
use slog_scope::GlobalLoggerGuard;

use logg_stdlog::{
    AsyncLogConfig, ColorMode, LogPattern, LogSnapshot, LogStats, SharedPattern,
    StdLogFormatter, StdLogTarget,
};

const PROCESS_LOG_THREAD_NAME: &str = "log-process";
const PROCESS_LOG_PATTERN: &str = "%Y-%m-%d %H:%M:%S.%e %^%l%$ %v <%!(%s:%#)>";

/// Keeps the process logger installed.
///
/// Dropping it uninstalls the logger and waits for the io thread to write
/// what is still queued.
pub struct ProcessLogGuard {
    scope_guard: Option<GlobalLoggerGuard>,
    io_thread: Option<JoinHandle<()>>,
    stats: Arc<LogStats>,
}

impl ProcessLogGuard {
    pub fn stats(&self) -> LogSnapshot {
        self.stats.snapshot()
    }

    /// Uninstall the logger now and return the final stats.
    pub fn finish(mut self) -> LogSnapshot {
        self.close();
        self.stats.snapshot()
    }

    fn close(&mut self) {
        // the global logger holds the only drain, dropping it closes the channel
        drop(self.scope_guard.take());
        if let Some(handle) = self.io_thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ProcessLogGuard {
    fn drop(&mut self) {
        self.close();
    }
}

/// Route the `log` macros of the whole process to stderr.
///
/// Verbosity 0 keeps warnings and above, each extra level adds one more.
pub fn setup(verbose_level: u8) -> anyhow::Result<ProcessLogGuard> {
    let async_conf = AsyncLogConfig::with_name(PROCESS_LOG_THREAD_NAME);
    let formatter = StdLogFormatter::new(
        "process",
        SharedPattern::new(LogPattern::parse(PROCESS_LOG_PATTERN)),
    );
    let (drain, io_thread) = logg_stdlog::new_async_logger(
        &async_conf,
        formatter,
        StdLogTarget::Stderr,
        ColorMode::Auto,
    )
    .context("failed to spawn process log thread")?;
    let stats = Arc::clone(drain.stats());
    let logger = slog::Logger::root(drain.fuse(), o!());

    let scope_guard = slog_scope::set_global_logger(logger);
    let guard = ProcessLogGuard {
        scope_guard: Some(scope_guard),
        io_thread: Some(io_thread),
        stats,
    };

    let log_level = match verbose_level {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    };

    slog_stdlog::init_with_level(log_level).context("failed to install log bridge")?;
    Ok(guard)
}
