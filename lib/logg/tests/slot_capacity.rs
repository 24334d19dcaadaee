/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use logg::{LogSystem, LogSystemConfig, LogSystemError, MAX_LOGGERS_COUNT, StdLogTarget};

macro_rules! create_all {
    ($system:expr, $results:expr, $($tag:ident),+ $(,)?) => {
        $(
            struct $tag;
            $results.push(
                $system
                    .create_logger::<$tag>(concat!("cap-", stringify!($tag)))
                    .map(|_| ()),
            );
        )+
    };
}

#[test]
fn fail_loudly_beyond_capacity() {
    let mut config = LogSystemConfig::default();
    config.defaults_mut().target = StdLogTarget::Discard;
    let mut system = LogSystem::new(config);
    assert!(system.init());

    let mut results: Vec<Result<(), LogSystemError>> = Vec::new();
    create_all!(
        system, results, T00, T01, T02, T03, T04, T05, T06, T07, T08, T09, T10, T11, T12, T13,
        T14, T15, T16, T17, T18, T19, T20, T21, T22, T23, T24, T25, T26, T27, T28, T29, T30,
        T31, T32, T33,
    );

    assert_eq!(results.len(), MAX_LOGGERS_COUNT + 2);
    assert!(results[..MAX_LOGGERS_COUNT].iter().all(|r| r.is_ok()));
    assert!(matches!(
        results[MAX_LOGGERS_COUNT],
        Err(LogSystemError::SlotsExhausted {
            index: 32,
            capacity: 32
        })
    ));
    assert!(matches!(
        results[MAX_LOGGERS_COUNT + 1],
        Err(LogSystemError::SlotsExhausted { index: 33, .. })
    ));
    assert_eq!(system.loggers().count(), MAX_LOGGERS_COUNT);
}
