/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::anyhow;
use clap::{Arg, ArgAction, Command, ValueHint, value_parser};

use logg::Level;

const ARGS_VERBOSE: &str = "verbose";
const ARGS_CONFIG_FILE: &str = "config-file";
const ARGS_LEVEL: &str = "level";
const ARGS_COUNT: &str = "count";

#[derive(Debug)]
pub struct ProcArgs {
    pub verbose_level: u8,
    pub config_file: Option<PathBuf>,
    pub level: Option<Level>,
    pub count: usize,
}

impl Default for ProcArgs {
    fn default() -> Self {
        ProcArgs {
            verbose_level: 0,
            config_file: None,
            level: None,
            count: 1,
        }
    }
}

fn build_cli_args() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new(ARGS_VERBOSE)
                .help("Show verbose output of the process logger")
                .num_args(0)
                .action(ArgAction::Count)
                .short('v')
                .long(ARGS_VERBOSE),
        )
        .arg(
            Arg::new(ARGS_CONFIG_FILE)
                .help("Log config file in yaml")
                .num_args(1)
                .value_name("CONFIG FILE")
                .value_hint(ValueHint::FilePath)
                .value_parser(value_parser!(PathBuf))
                .short('c')
                .long(ARGS_CONFIG_FILE),
        )
        .arg(
            Arg::new(ARGS_LEVEL)
                .help("Override the default level of all loggers")
                .num_args(1)
                .value_name("LEVEL")
                .short('l')
                .long(ARGS_LEVEL),
        )
        .arg(
            Arg::new(ARGS_COUNT)
                .help("Number of messages to emit at each level")
                .num_args(1)
                .value_name("COUNT")
                .value_parser(value_parser!(usize))
                .default_value("1")
                .short('n')
                .long(ARGS_COUNT),
        )
}

pub fn parse_clap() -> anyhow::Result<ProcArgs> {
    let args_parser = build_cli_args();
    let args = args_parser.get_matches();

    let mut proc_args = ProcArgs::default();
    if let Some(verbose_level) = args.get_one::<u8>(ARGS_VERBOSE) {
        proc_args.verbose_level = *verbose_level;
    }
    if let Some(config_file) = args.get_one::<PathBuf>(ARGS_CONFIG_FILE) {
        proc_args.config_file = Some(config_file.to_path_buf());
    }
    if let Some(level) = args.get_one::<String>(ARGS_LEVEL) {
        let level = Level::from_str(level).map_err(|e| anyhow!("invalid level: {e}"))?;
        proc_args.level = Some(level);
    }
    if let Some(count) = args.get_one::<usize>(ARGS_COUNT) {
        proc_args.count = *count;
    }
    Ok(proc_args)
}
