/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

//! Tag indexed registry of named console loggers.
//!
//! Every tag type owns one slot of a [`LogSystem`]. A slot is bound to a named
//! [`LogInstance`] with [`LogSystem::create_logger`] and looked up again with
//! [`LogSystem::get_logger`].

#[macro_use]
mod macros;

mod error;
pub use error::{LevelParseError, LogSystemError};

mod level;
pub use level::Level;

pub mod registry;

mod report;

mod instance;
pub use instance::{LogInstance, MAX_NAME_LENGTH};

mod logger;
pub use logger::Logger;

mod tag;
pub use tag::{lookup_tag_index, tag_index};

mod system;
pub use system::{
    LogSystem, LogSystemGuard, MAX_LOGGERS_COUNT, init_log_system, init_log_system_with_config,
    is_log_system_initialized, log_system, terminate_log_system,
};

pub mod config;
pub use config::{LogSystemConfig, LoggerSettings};

pub mod process;

pub use logg_stdlog::{ColorMode, LogSnapshot, StdLogTarget};

#[doc(hidden)]
pub mod __private {
    pub use slog::RecordLocation;
}
