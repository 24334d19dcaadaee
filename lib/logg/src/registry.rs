/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use foldhash::fast::FixedState;

use crate::LogInstance;

// Entries are weak, an instance lives as long as some Logger handle holds it.
static NAMED_LOGGER_REGISTRY: Mutex<HashMap<String, Weak<LogInstance>, FixedState>> =
    Mutex::new(HashMap::with_hasher(FixedState::with_seed(0)));

/// Whether an instance with this name is still alive.
pub(crate) fn contains(name: &str) -> bool {
    let ht = NAMED_LOGGER_REGISTRY
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    ht.get(name).is_some_and(|w| w.strong_count() > 0)
}

/// Register the instance under its name, failing if a live one already exists.
pub(crate) fn add(instance: &Arc<LogInstance>) -> bool {
    let mut ht = NAMED_LOGGER_REGISTRY
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if ht
        .get(instance.name())
        .is_some_and(|w| w.strong_count() > 0)
    {
        return false;
    }
    ht.insert(instance.name().to_string(), Arc::downgrade(instance));
    true
}

/// Drop the entry for this name if its instance is gone.
pub(crate) fn remove_dead(name: &str) {
    let mut ht = NAMED_LOGGER_REGISTRY
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if ht.get(name).is_some_and(|w| w.strong_count() == 0) {
        ht.remove(name);
    }
}

/// Find a live logging instance by name.
pub fn get(name: &str) -> Option<Arc<LogInstance>> {
    let ht = NAMED_LOGGER_REGISTRY
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    ht.get(name).and_then(Weak::upgrade)
}

/// Visit every live logging instance, in no particular order.
pub fn foreach<F>(mut f: F)
where
    F: FnMut(&Arc<LogInstance>),
{
    let live: Vec<Arc<LogInstance>> = {
        let ht = NAMED_LOGGER_REGISTRY
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        ht.values().filter_map(Weak::upgrade).collect()
    };
    // instances may be dropped here, keep the lock released
    for instance in &live {
        f(instance)
    }
}
