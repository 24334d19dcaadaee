/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use anyhow::{Context, anyhow};
use log::{debug, info};

use logg::{
    Level, LogSystemConfig, logg_critical, logg_debug, logg_error, logg_info, logg_trace,
    logg_warn,
};

mod opts;
use opts::ProcArgs;

struct NetworkTag;
struct StorageTag;
struct ControlTag;

fn main() -> anyhow::Result<()> {
    let proc_args = opts::parse_clap().context("failed to parse command line options")?;

    // set up process logger early, only proc args is used inside
    let _log_guard =
        logg::process::setup(proc_args.verbose_level).context("failed to setup logger")?;

    let mut config = match &proc_args.config_file {
        Some(path) => LogSystemConfig::load(path)?,
        None => LogSystemConfig::default(),
    };
    if let Some(level) = proc_args.level {
        config.defaults_mut().level = level;
    }
    debug!("log config: {config:?}");

    if !logg::init_log_system_with_config(config) {
        return Err(anyhow!("failed to init log system"));
    }

    let ret = run(&proc_args);

    logg::terminate_log_system();
    info!("log system terminated");
    ret
}

fn run(args: &ProcArgs) -> anyhow::Result<()> {
    let (net, storage, control) = {
        let mut system = logg::log_system();
        let net = system
            .create_logger::<NetworkTag>("net")
            .context("failed to create network logger")?
            .clone();
        let storage = system
            .create_logger::<StorageTag>("storage")
            .context("failed to create storage logger")?
            .clone();
        let control = system
            .create_logger::<ControlTag>("control")
            .context("failed to create control logger")?
            .clone();
        (net, storage, control)
    };

    for i in 0..args.count {
        logg_trace!(net, "poll round {i}");
        logg_debug!(net, "{} sockets ready", i * 2);
        logg_info!(storage, "flushed segment {i}");
        logg_warn!(storage, "segment {i} is {}% full", 80 + i % 20);
        logg_error!(control, "control request {i} rejected");
        logg_critical!(control, "control channel {i} lost");
    }

    net.set_level(Level::Warn);
    net.set_pattern("%H:%M:%S %n %^%L%$ %v");
    logg_info!(net, "hidden at warn level");
    logg_warn!(net, "pattern and level changed at runtime");

    let mut net = net;
    logg::log_system().destroy_logger(&mut net);
    info!("network logger destroyed");

    let net = logg::log_system()
        .create_logger::<NetworkTag>("net")
        .context("failed to re-create network logger")?
        .clone();
    logg_info!(net, "network logger re-created in the same slot");

    logg::registry::foreach(|instance| {
        let stats = instance.stats();
        info!(
            "logger {}: {} accepted, {} dropped",
            instance.name(),
            stats.total,
            stats.dropped()
        );
    });
    Ok(())
}
