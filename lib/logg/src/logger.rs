/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::sync::{Arc, Weak};

use slog::RecordLocation;

use crate::{Level, LogInstance, LogSystemError, LoggerSettings};

pub(crate) const INVALID_INDEX: usize = usize::MAX;

#[derive(Debug, Default)]
enum Binding {
    #[default]
    Unbound,
    /// held by a slot, which keeps the instance alive
    Owner(Arc<LogInstance>),
    /// taken by cloning, lives only as long as the owning slot binding
    Follower(Weak<LogInstance>),
}

impl Binding {
    fn is_alive(&self) -> bool {
        match self {
            Binding::Unbound => false,
            Binding::Owner(_) => true,
            Binding::Follower(weak) => weak.strong_count() > 0,
        }
    }

    fn as_ptr(&self) -> Option<*const LogInstance> {
        match self {
            Binding::Unbound => None,
            Binding::Owner(instance) => Some(Arc::as_ptr(instance)),
            Binding::Follower(weak) => Some(weak.as_ptr()),
        }
    }
}

/// Handle to a logger slot of a [`LogSystem`](crate::LogSystem).
///
/// A handle is valid while it is bound to a logging instance and carries a
/// slot index. Clones follow the slot they were taken from: once the slot is
/// destroyed, or its system terminated, every clone becomes invalid.
#[derive(Debug)]
pub struct Logger {
    binding: Binding,
    index: usize,
}

impl Default for Logger {
    fn default() -> Self {
        Logger {
            binding: Binding::Unbound,
            index: INVALID_INDEX,
        }
    }
}

impl Clone for Logger {
    fn clone(&self) -> Self {
        let binding = match &self.binding {
            Binding::Unbound => Binding::Unbound,
            Binding::Owner(instance) => Binding::Follower(Arc::downgrade(instance)),
            Binding::Follower(weak) => Binding::Follower(Weak::clone(weak)),
        };
        Logger {
            binding,
            index: self.index,
        }
    }
}

impl Logger {
    pub fn is_valid(&self) -> bool {
        self.index != INVALID_INDEX && self.binding.is_alive()
    }

    fn with_instance<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&LogInstance) -> R,
    {
        if self.index == INVALID_INDEX {
            return None;
        }
        match &self.binding {
            Binding::Unbound => None,
            Binding::Owner(instance) => Some(f(instance)),
            Binding::Follower(weak) => weak.upgrade().map(|instance| f(&instance)),
        }
    }

    /// A shared handle to the bound instance, only if this handle is valid.
    ///
    /// The returned instance stays alive as long as it is held, even if the
    /// slot is destroyed meanwhile.
    pub fn instance(&self) -> Option<Arc<LogInstance>> {
        if self.index == INVALID_INDEX {
            return None;
        }
        match &self.binding {
            Binding::Unbound => None,
            Binding::Owner(instance) => Some(Arc::clone(instance)),
            Binding::Follower(weak) => weak.upgrade(),
        }
    }

    pub fn name(&self) -> Option<String> {
        self.with_instance(|i| i.name().to_string())
    }

    pub fn level(&self) -> Option<Level> {
        self.with_instance(|i| i.level())
    }

    pub fn set_pattern(&self, pattern: &str) {
        self.with_instance(|i| i.set_pattern(pattern));
    }

    pub fn set_level(&self, level: Level) {
        self.with_instance(|i| i.set_level(level));
    }

    pub fn should_log(&self, level: Level) -> bool {
        self.with_instance(|i| i.should_log(level)).unwrap_or(false)
    }

    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        debug_assert!(self.index != INVALID_INDEX, "log through an unbound logger");
        self.with_instance(|i| i.log(level, args));
    }

    #[doc(hidden)]
    pub fn log_at(&self, location: &'static RecordLocation, level: Level, args: fmt::Arguments<'_>) {
        debug_assert!(self.index != INVALID_INDEX, "log through an unbound logger");
        self.with_instance(|i| i.log_at(location, level, args));
    }

    pub fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Trace, args)
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args)
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args)
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args)
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args)
    }

    pub fn critical(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Critical, args)
    }

    /// Bind to a new instance named `name`, unless already bound.
    ///
    /// The handle becomes the owner of the instance.
    pub(crate) fn create(
        &mut self,
        name: &str,
        settings: &LoggerSettings,
    ) -> Result<(), LogSystemError> {
        if self.is_valid() {
            return Ok(());
        }
        debug_assert_ne!(self.index, INVALID_INDEX);
        self.binding = Binding::Owner(LogInstance::new(name, settings)?);
        Ok(())
    }

    pub(crate) fn destroy(&mut self) {
        self.binding = Binding::Unbound;
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn invalidate_index(&mut self) {
        self.index = INVALID_INDEX;
    }

    /// Whether both handles refer to the same slot and instance.
    pub(crate) fn same_binding(&self, other: &Logger) -> bool {
        if self.index != other.index {
            return false;
        }
        match (self.binding.as_ptr(), other.binding.as_ptr()) {
            (Some(a), Some(b)) => std::ptr::eq(a, b),
            _ => false,
        }
    }
}
