/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use slog::{Drain, Level, Never, OwnedKVList, Record};

const LEVEL_OFF: usize = 0;

/// Runtime adjustable level threshold, shared between a drain and its owner.
///
/// The threshold uses the slog level order, `Critical` (1) to `Trace` (6),
/// with 0 meaning nothing passes.
#[derive(Clone, Debug)]
pub struct SharedLevel {
    inner: Arc<AtomicUsize>,
}

impl SharedLevel {
    pub fn new(level: Option<Level>) -> Self {
        SharedLevel {
            inner: Arc::new(AtomicUsize::new(Self::encode(level))),
        }
    }

    fn encode(level: Option<Level>) -> usize {
        level.map(|l| l.as_usize()).unwrap_or(LEVEL_OFF)
    }

    /// `None` means the filter is off.
    pub fn get(&self) -> Option<Level> {
        Level::from_usize(self.inner.load(Ordering::Relaxed))
    }

    pub fn set(&self, level: Option<Level>) {
        self.inner.store(Self::encode(level), Ordering::Relaxed);
    }

    #[inline]
    pub fn allows(&self, level: Level) -> bool {
        level.as_usize() <= self.inner.load(Ordering::Relaxed)
    }
}

pub struct LevelSwitch<D: Drain<Ok = (), Err = Never>> {
    level: SharedLevel,
    inner: D,
}

impl<D: Drain<Ok = (), Err = Never>> LevelSwitch<D> {
    pub fn new(drain: D, level: SharedLevel) -> Self {
        LevelSwitch {
            level,
            inner: drain,
        }
    }
}

impl<D: Drain<Ok = (), Err = Never>> Drain for LevelSwitch<D> {
    type Ok = ();
    type Err = Never;

    fn log(&self, record: &Record, logger_values: &OwnedKVList) -> Result<(), Never> {
        if self.level.allows(record.level()) {
            self.inner.log(record, logger_values)
        } else {
            Ok(())
        }
    }

    #[inline]
    fn is_enabled(&self, level: Level) -> bool {
        self.level.allows(level) && self.inner.is_enabled(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold() {
        let level = SharedLevel::new(Some(Level::Warning));
        assert!(level.allows(Level::Critical));
        assert!(level.allows(Level::Warning));
        assert!(!level.allows(Level::Info));
        assert_eq!(level.get(), Some(Level::Warning));

        level.set(Some(Level::Trace));
        assert!(level.allows(Level::Trace));
    }

    #[test]
    fn off() {
        let level = SharedLevel::new(None);
        assert!(!level.allows(Level::Critical));
        assert_eq!(level.get(), None);
    }

    #[test]
    fn shared_between_clones() {
        let level = SharedLevel::new(Some(Level::Info));
        let other = level.clone();
        other.set(Some(Level::Error));
        assert!(!level.allows(Level::Warning));
    }
}
