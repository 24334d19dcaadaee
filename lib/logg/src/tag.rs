/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use foldhash::fast::FixedState;

struct TagIndexAllocator {
    indexes: HashMap<TypeId, usize, FixedState>,
    next: usize,
}

// Indexes are handed out once per tag type and never reused, even across
// log system restarts.
static TAG_INDEX_ALLOCATOR: Mutex<TagIndexAllocator> = Mutex::new(TagIndexAllocator {
    indexes: HashMap::with_hasher(FixedState::with_seed(0)),
    next: 0,
});

/// Slot index of the tag type `T`, assigned on first use.
///
/// Calling this for every tag at startup fixes the slot layout up front.
pub fn tag_index<T: ?Sized + 'static>() -> usize {
    let mut allocator = TAG_INDEX_ALLOCATOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let next = allocator.next;
    let index = *allocator.indexes.entry(TypeId::of::<T>()).or_insert(next);
    if index == next {
        allocator.next += 1;
    }
    index
}

/// Slot index of the tag type `T` if one has been assigned.
pub fn lookup_tag_index<T: ?Sized + 'static>() -> Option<usize> {
    let allocator = TAG_INDEX_ALLOCATOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    allocator.indexes.get(&TypeId::of::<T>()).copied()
}
