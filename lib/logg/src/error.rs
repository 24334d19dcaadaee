/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogSystemError {
    #[error("log system is not initialized")]
    NotInitialized,
    #[error("no logger slot for tag index {index}, capacity is {capacity}")]
    SlotsExhausted { index: usize, capacity: usize },
    #[error("logger name is longer than {max} bytes")]
    NameTooLong { max: usize },
    #[error("logger name contains a nul byte")]
    InvalidName,
    #[error("logger with name {0} already exists")]
    NameConflict(String),
    #[error("failed to spawn log io thread: {0}")]
    SpawnFailed(io::Error),
}

#[derive(Debug, Error)]
#[error("invalid log level {0}")]
pub struct LevelParseError(pub(crate) String);
