/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::{AtomicUsize, Ordering};

use log::{info, warn};
use slog::{Drain, Level, Never, OwnedKVList, Record};

/// Counts consecutive failures and decides which of them get reported.
///
/// The first two failures of a streak are always reported, later ones only
/// when the streak length has all `mask` bits clear.
struct FailureSampler {
    streak: AtomicUsize,
    mask: usize,
}

impl FailureSampler {
    fn new(mask: usize) -> Self {
        FailureSampler {
            streak: AtomicUsize::new(0),
            mask,
        }
    }

    /// Returns the streak length before this failure, if it should be reported.
    fn fail(&self) -> Option<usize> {
        let prev = self.streak.fetch_add(1, Ordering::Relaxed);
        (prev < 2 || prev & self.mask == 0).then_some(prev)
    }

    /// Ends the current streak, returning how many failures it had.
    fn recover(&self) -> usize {
        self.streak.swap(0, Ordering::Relaxed)
    }
}

/// Reports emission failures of a named logger to the process log,
/// and never fails itself.
pub(crate) struct ReportLogIoError<D> {
    logger_name: String,
    sampler: FailureSampler,
    inner: D,
}

impl<D> ReportLogIoError<D>
where
    D: Drain<Ok = (), Err = slog::Error>,
{
    pub(crate) fn new(inner: D, logger_name: &str, sampling_mask: usize) -> Self {
        ReportLogIoError {
            logger_name: logger_name.to_string(),
            sampler: FailureSampler::new(sampling_mask),
            inner,
        }
    }
}

impl<D> Drain for ReportLogIoError<D>
where
    D: Drain<Ok = (), Err = slog::Error>,
{
    type Ok = ();
    type Err = Never;

    fn log(&self, record: &Record, logger_values: &OwnedKVList) -> Result<(), Never> {
        if let Err(e) = self.inner.log(record, logger_values) {
            match self.sampler.fail() {
                Some(0) => warn!("logger {} failed to emit a record: {e}", self.logger_name),
                Some(n) => warn!(
                    "logger {} failed {} records in a row, latest error: {e}",
                    self.logger_name,
                    n + 1
                ),
                None => {}
            }
            return Ok(());
        }

        let lost = self.sampler.recover();
        if lost > 0 {
            info!("logger {} recovered after losing {lost} records", self.logger_name);
        }
        Ok(())
    }

    #[inline]
    fn is_enabled(&self, level: Level) -> bool {
        self.inner.is_enabled(level)
    }
}
