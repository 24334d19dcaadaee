/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::any::type_name;
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, error};

use crate::{LogSystemConfig, LogSystemError, Logger, tag};

/// Number of logger slots, one per distinct tag type.
pub const MAX_LOGGERS_COUNT: usize = 32;

/// Fixed capacity registry of loggers, addressed by tag type.
///
/// Applications may own a `LogSystem` directly, or use the process wide one
/// managed by [`init_log_system`] and [`terminate_log_system`].
#[derive(Debug, Default)]
pub struct LogSystem {
    slots: Vec<Logger>,
    config: LogSystemConfig,
    initialized: bool,
}

impl LogSystem {
    /// Create an uninitialized system, call [`LogSystem::init`] before use.
    pub fn new(config: LogSystemConfig) -> Self {
        LogSystem {
            slots: Vec::new(),
            config,
            initialized: false,
        }
    }

    pub fn init(&mut self) -> bool {
        if self.initialized {
            return true;
        }
        self.slots.resize_with(MAX_LOGGERS_COUNT, Logger::default);
        self.initialized = true;
        true
    }

    /// Drop all slots. Loggers still bound are destroyed.
    pub fn terminate(&mut self) {
        self.slots.clear();
        self.initialized = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &LogSystemConfig {
        &self.config
    }

    /// Bind the slot of tag `T` to a new logging instance named `name`.
    ///
    /// A slot that is already bound is returned as is, whatever `name` says.
    /// On failure the slot is left unbound.
    pub fn create_logger<T: ?Sized + 'static>(
        &mut self,
        name: &str,
    ) -> Result<&Logger, LogSystemError> {
        if !self.initialized {
            return Err(LogSystemError::NotInitialized);
        }

        let index = tag::tag_index::<T>();
        let capacity = self.slots.len();
        let Some(logger) = self.slots.get_mut(index) else {
            error!(
                "no logger slot left for tag {} (index {index}, capacity {capacity})",
                type_name::<T>()
            );
            return Err(LogSystemError::SlotsExhausted { index, capacity });
        };

        logger.set_index(index);
        let settings = self.config.settings_for(name);
        if let Err(e) = logger.create(name, &settings) {
            logger.destroy();
            logger.invalidate_index();
            debug!("failed to create logger {name} for tag {}: {e}", type_name::<T>());
            return Err(e);
        }
        Ok(logger)
    }

    /// The slot of tag `T`, which should have been created before.
    ///
    /// # Panics
    ///
    /// Panics if the system is not initialized or the tag has no slot. Debug
    /// builds also panic if the slot is not bound.
    pub fn get_logger<T: ?Sized + 'static>(&self) -> &Logger {
        let index = tag::tag_index::<T>();
        assert!(
            index < self.slots.len(),
            "no logger slot for tag {}",
            type_name::<T>()
        );
        let logger = &self.slots[index];
        debug_assert!(
            logger.is_valid(),
            "logger for tag {} is not created",
            type_name::<T>()
        );
        logger
    }

    /// The slot of tag `T`, if it is bound.
    pub fn try_get_logger<T: ?Sized + 'static>(&self) -> Option<&Logger> {
        let index = tag::lookup_tag_index::<T>()?;
        self.slots.get(index).filter(|logger| logger.is_valid())
    }

    /// Unbind the slot `logger` was taken from, and `logger` itself.
    ///
    /// `logger` is usually a clone of a slot of this system. Other clones of
    /// the same slot become invalid as well.
    pub fn destroy_logger(&mut self, logger: &mut Logger) {
        if !self.initialized || !logger.is_valid() {
            return;
        }

        let index = logger.index();
        let Some(slot) = self.slots.get_mut(index) else {
            debug_assert!(false, "logger index {index} is out of range");
            return;
        };
        debug_assert!(
            slot.same_binding(logger),
            "logger does not belong to slot {index}"
        );
        if slot.same_binding(logger) {
            slot.destroy();
            slot.invalidate_index();
        }
        logger.destroy();
        logger.invalidate_index();
    }

    /// Unbind the slot of tag `T`. Does nothing if it is not bound.
    pub fn destroy_tag_logger<T: ?Sized + 'static>(&mut self) {
        if !self.initialized {
            return;
        }
        let Some(index) = tag::lookup_tag_index::<T>() else {
            return;
        };
        if let Some(slot) = self.slots.get_mut(index) {
            slot.destroy();
            slot.invalidate_index();
        }
    }

    /// Iterate over bound slots.
    pub fn loggers(&self) -> impl Iterator<Item = &Logger> {
        self.slots.iter().filter(|logger| logger.is_valid())
    }
}

static LOG_SYSTEM: Mutex<Option<LogSystem>> = Mutex::new(None);

fn lock_log_system() -> MutexGuard<'static, Option<LogSystem>> {
    LOG_SYSTEM.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive access to the process wide log system.
///
/// Dereferencing panics if the log system is not initialized.
pub struct LogSystemGuard {
    inner: MutexGuard<'static, Option<LogSystem>>,
}

impl Deref for LogSystemGuard {
    type Target = LogSystem;

    fn deref(&self) -> &LogSystem {
        match self.inner.as_ref() {
            Some(system) => system,
            None => panic!("log system is not initialized"),
        }
    }
}

impl DerefMut for LogSystemGuard {
    fn deref_mut(&mut self) -> &mut LogSystem {
        match self.inner.as_mut() {
            Some(system) => system,
            None => panic!("log system is not initialized"),
        }
    }
}

/// Lock the process wide log system. Do not call again while holding a guard.
pub fn log_system() -> LogSystemGuard {
    LogSystemGuard {
        inner: lock_log_system(),
    }
}

pub fn init_log_system() -> bool {
    init_log_system_with_config(LogSystemConfig::default())
}

/// Set up the process wide log system. Does nothing if it is already set up.
pub fn init_log_system_with_config(config: LogSystemConfig) -> bool {
    let mut guard = lock_log_system();
    if guard.as_ref().is_some_and(|s| s.is_initialized()) {
        return true;
    }
    let mut system = LogSystem::new(config);
    let ok = system.init();
    *guard = Some(system);
    ok
}

pub fn terminate_log_system() {
    let system = lock_log_system().take();
    // io threads are joined here, outside of the lock
    drop(system);
}

pub fn is_log_system_initialized() -> bool {
    lock_log_system()
        .as_ref()
        .is_some_and(|s| s.is_initialized())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;
    use logg_stdlog::StdLogTarget;

    struct NetworkTag;
    struct StorageTag;
    struct ControlTag;
    struct ReuseTag;
    struct UnusedTag;
    struct DestroyByTag;
    struct MismatchTag;
    struct FailTag;
    struct StaleTag;
    struct TerminateTag;

    fn discard_system() -> LogSystem {
        let mut config = LogSystemConfig::default();
        config.defaults_mut().target = StdLogTarget::Discard;
        let mut system = LogSystem::new(config);
        assert!(system.init());
        system
    }

    #[test]
    fn not_initialized() {
        let mut system = LogSystem::default();
        assert!(!system.is_initialized());
        assert!(matches!(
            system.create_logger::<NetworkTag>("sys-uninit"),
            Err(LogSystemError::NotInitialized)
        ));

        // destroy on an uninitialized system is a no-op
        let mut logger = Logger::default();
        system.destroy_logger(&mut logger);
    }

    #[test]
    fn init_idempotent() {
        let mut system = discard_system();
        assert!(system.init());
        assert_eq!(system.slots.len(), MAX_LOGGERS_COUNT);
        system.terminate();
        assert!(!system.is_initialized());
        assert!(system.slots.is_empty());
    }

    #[test]
    fn create_then_get() {
        let mut system = discard_system();
        let created: *const Logger = system.create_logger::<NetworkTag>("sys-net").unwrap();
        let fetched = system.get_logger::<NetworkTag>();
        assert!(std::ptr::eq(created, fetched));
        assert!(fetched.is_valid());
        assert_eq!(fetched.name().as_deref(), Some("sys-net"));
        assert_eq!(fetched.index(), tag::tag_index::<NetworkTag>());
    }

    #[test]
    fn create_twice_same_slot() {
        let mut system = discard_system();
        let first: *const Logger = system.create_logger::<StorageTag>("sys-storage").unwrap();
        let second: *const Logger = system
            .create_logger::<StorageTag>("sys-storage-again")
            .unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(system.loggers().count(), 1);
        assert_eq!(
            system.get_logger::<StorageTag>().name().as_deref(),
            Some("sys-storage")
        );
    }

    #[test]
    fn destroy_and_reuse_slot() {
        let mut system = discard_system();
        let mut logger = system.create_logger::<ReuseTag>("sys-reuse").unwrap().clone();
        let index = logger.index();

        system.destroy_logger(&mut logger);
        assert!(!logger.is_valid());
        assert!(system.try_get_logger::<ReuseTag>().is_none());

        // a second destroy on the now invalid handle is a no-op
        system.destroy_logger(&mut logger);
        system.destroy_logger(&mut logger);

        let again = system.create_logger::<ReuseTag>("sys-reuse-2").unwrap();
        assert_eq!(again.index(), index);
        assert_eq!(again.name().as_deref(), Some("sys-reuse-2"));
    }

    #[test]
    fn level_threshold() {
        let mut system = discard_system();
        let logger = system.create_logger::<ControlTag>("sys-control").unwrap().clone();
        logger.set_level(Level::Warn);
        logger.info(format_args!("below threshold"));
        crate::logg_debug!(logger, "below threshold too");
        let stats = logger.instance().unwrap().stats();
        assert_eq!(stats.total, 0);

        crate::logg_warn!(logger, "at threshold {}", 1);
        assert_eq!(logger.instance().unwrap().stats().total, 1);

        let mut logger = logger;
        system.destroy_logger(&mut logger);
        assert!(!logger.is_valid());
    }

    #[test]
    fn destroy_by_tag() {
        let mut system = discard_system();
        system.create_logger::<DestroyByTag>("sys-by-tag").unwrap();
        system.destroy_tag_logger::<DestroyByTag>();
        assert!(system.try_get_logger::<DestroyByTag>().is_none());
        assert!(crate::registry::get("sys-by-tag").is_none());
        system.destroy_tag_logger::<DestroyByTag>();
    }

    #[test]
    fn clone_invalid_after_tag_destroy() {
        let mut system = discard_system();
        let mut stale = system.create_logger::<StaleTag>("sys-stale").unwrap().clone();
        stale.info(format_args!("bound"));
        assert_eq!(stale.instance().unwrap().stats().total, 1);

        system.destroy_tag_logger::<StaleTag>();
        assert!(!stale.is_valid());
        assert!(stale.instance().is_none());
        assert!(crate::registry::get("sys-stale").is_none());

        // destroying a handle whose slot is already gone is a no-op
        system.destroy_logger(&mut stale);
        system.create_logger::<StaleTag>("sys-stale").unwrap();
        assert!(!stale.is_valid());
        assert!(system.try_get_logger::<StaleTag>().is_some());
    }

    #[test]
    fn clone_invalid_after_terminate() {
        let mut system = discard_system();
        let clone = system
            .create_logger::<TerminateTag>("sys-terminate")
            .unwrap()
            .clone();
        assert!(clone.is_valid());

        system.terminate();
        assert!(!clone.is_valid());
        assert!(clone.level().is_none());
        assert!(crate::registry::get("sys-terminate").is_none());
    }

    #[test]
    fn failed_create_leaves_slot_unbound() {
        let mut system = discard_system();
        let name = "z".repeat(crate::MAX_NAME_LENGTH + 1);
        assert!(matches!(
            system.create_logger::<FailTag>(&name),
            Err(LogSystemError::NameTooLong { .. })
        ));
        assert!(system.try_get_logger::<FailTag>().is_none());
        let index = tag::tag_index::<FailTag>();
        assert!(!system.slots[index].is_valid());
        assert_eq!(system.slots[index].index(), crate::logger::INVALID_INDEX);
    }

    #[test]
    fn try_get_unknown_tag() {
        let system = discard_system();
        assert!(system.try_get_logger::<UnusedTag>().is_none());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "is not created")]
    fn get_before_create() {
        let system = discard_system();
        let _ = system.get_logger::<UnusedTag>();
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "does not belong")]
    fn destroy_foreign_logger() {
        let mut system = discard_system();
        system.create_logger::<MismatchTag>("sys-mismatch-a").unwrap();
        let mut other = discard_system();
        let mut foreign = other
            .create_logger::<MismatchTag>("sys-mismatch-b")
            .unwrap()
            .clone();
        system.destroy_logger(&mut foreign);
    }
}
