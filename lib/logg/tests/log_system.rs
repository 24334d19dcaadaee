/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use logg::{
    Level, LogSystemConfig, Logger, StdLogTarget, init_log_system, init_log_system_with_config,
    is_log_system_initialized, log_system, logg_critical, logg_info, logg_warn, registry,
    terminate_log_system,
};

struct NetworkTag;
struct StorageTag;

fn discard_config() -> LogSystemConfig {
    let mut config = LogSystemConfig::default();
    config.defaults_mut().target = StdLogTarget::Discard;
    config.set_logger_level("it-storage", Level::Error);
    config
}

// The process wide system is shared by every test of this binary, so the
// whole lifecycle runs in one test.
#[test]
fn process_wide_lifecycle() {
    assert!(!is_log_system_initialized());

    assert!(init_log_system_with_config(discard_config()));
    assert!(init_log_system());
    assert!(is_log_system_initialized());
    assert_eq!(
        log_system().config().defaults().target,
        StdLogTarget::Discard
    );

    let net_index = logg::tag_index::<NetworkTag>();
    {
        let mut system = log_system();
        let created: *const Logger = system.create_logger::<NetworkTag>("it-net").unwrap();
        assert!(std::ptr::eq(created, system.get_logger::<NetworkTag>()));
    }

    let net = log_system().get_logger::<NetworkTag>().clone();
    assert!(net.is_valid());
    assert_eq!(net.level(), Some(Level::Info));
    net.set_level(Level::Warn);
    logg_info!(net, "not observable at warn");
    assert_eq!(net.instance().unwrap().stats().total, 0);
    logg_warn!(net, "observable");
    logg_critical!(net, "observable {}", "too");
    assert_eq!(net.instance().unwrap().stats().total, 2);

    let storage = log_system()
        .create_logger::<StorageTag>("it-storage")
        .unwrap()
        .clone();
    assert_eq!(storage.level(), Some(Level::Error));
    assert_eq!(log_system().loggers().count(), 2);

    let mut net = net;
    log_system().destroy_logger(&mut net);
    assert!(!net.is_valid());
    assert!(registry::get("it-net").is_none());
    log_system().destroy_logger(&mut net);

    let recreated = log_system()
        .create_logger::<NetworkTag>("it-net-2")
        .unwrap()
        .clone();
    assert_eq!(recreated.name().as_deref(), Some("it-net-2"));
    drop(recreated);

    terminate_log_system();
    assert!(!is_log_system_initialized());
    // handles taken from the registry do not outlive it
    assert!(!storage.is_valid());
    storage.error(format_args!("nowhere"));
    assert!(registry::get("it-storage").is_none());
    assert!(registry::get("it-net-2").is_none());

    assert!(init_log_system_with_config(discard_config()));
    assert!(log_system().try_get_logger::<NetworkTag>().is_none());
    assert_eq!(logg::tag_index::<NetworkTag>(), net_index);
    terminate_log_system();
}
