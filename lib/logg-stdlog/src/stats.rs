/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone, Copy, Default, Debug, Eq, PartialEq)]
pub struct LogSnapshot {
    /// records accepted by the drain, after level filtering
    pub total: u64,
    /// records written by the io thread
    pub passed: u64,
    /// bytes written by the io thread
    pub size: u64,
    pub format_failed: u64,
    pub channel_closed: u64,
    pub channel_overflow: u64,
    pub write_failed: u64,
}

impl LogSnapshot {
    pub fn dropped(&self) -> u64 {
        self.format_failed + self.channel_closed + self.channel_overflow + self.write_failed
    }

    /// Records accepted but neither written nor dropped yet.
    pub fn pending(&self) -> u64 {
        self.total.saturating_sub(self.passed + self.dropped())
    }
}

#[derive(Default)]
pub struct LogStats {
    total: AtomicU64,
    passed: AtomicU64,
    size: AtomicU64,
    format_failed: AtomicU64,
    channel_closed: AtomicU64,
    channel_overflow: AtomicU64,
    write_failed: AtomicU64,
}

impl LogStats {
    pub fn snapshot(&self) -> LogSnapshot {
        LogSnapshot {
            total: self.total.load(Ordering::Relaxed),
            passed: self.passed.load(Ordering::Relaxed),
            size: self.size.load(Ordering::Relaxed),
            format_failed: self.format_failed.load(Ordering::Relaxed),
            channel_closed: self.channel_closed.load(Ordering::Relaxed),
            channel_overflow: self.channel_overflow.load(Ordering::Relaxed),
            write_failed: self.write_failed.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn add_total(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_written(&self, size: usize) {
        self.passed.fetch_add(1, Ordering::Relaxed);
        self.size.fetch_add(size as u64, Ordering::Relaxed);
    }

    pub(crate) fn add_format_failed(&self) {
        self.format_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_channel_closed(&self) {
        self.channel_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_channel_overflow(&self) {
        self.channel_overflow.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_write_failed(&self) {
        self.write_failed.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_snapshot() {
        let stats = LogStats::default();
        stats.add_total();
        stats.add_total();
        stats.add_total();
        stats.add_written(64);
        stats.add_channel_overflow();

        let snap = stats.snapshot();
        assert_eq!(snap.total, 3);
        assert_eq!(snap.passed, 1);
        assert_eq!(snap.size, 64);
        assert_eq!(snap.dropped(), 1);
        assert_eq!(snap.pending(), 1);
    }

    #[test]
    fn t_drop_counters() {
        let stats = LogStats::default();
        stats.add_format_failed();
        stats.add_channel_closed();
        stats.add_write_failed();
        assert_eq!(
            stats.snapshot(),
            LogSnapshot {
                format_failed: 1,
                channel_closed: 1,
                write_failed: 1,
                ..Default::default()
            }
        );
    }
}
