/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

/// Log through a [`Logger`](crate::Logger) or
/// [`LogInstance`](crate::LogInstance), recording the call site.
#[macro_export]
macro_rules! logg_log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        static LOCATION: $crate::__private::RecordLocation = $crate::__private::RecordLocation {
            file: file!(),
            line: line!(),
            column: column!(),
            function: "",
            module: module_path!(),
        };
        $logger.log_at(&LOCATION, $level, format_args!($($arg)+))
    }};
}

#[macro_export]
macro_rules! logg_trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logg_log!($logger, $crate::Level::Trace, $($arg)+)
    };
}

#[macro_export]
macro_rules! logg_debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logg_log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! logg_info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logg_log!($logger, $crate::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! logg_warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logg_log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! logg_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logg_log!($logger, $crate::Level::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! logg_critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logg_log!($logger, $crate::Level::Critical, $($arg)+)
    };
}
