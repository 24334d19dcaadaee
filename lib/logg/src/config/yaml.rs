/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, yaml};

use logg_stdlog::{ColorMode, StdLogTarget};

use crate::Level;

pub(super) fn normalize_key(raw: &str) -> String {
    raw.to_lowercase().replace('-', "_")
}

pub(super) fn foreach_kv<F>(table: &yaml::Hash, mut f: F) -> anyhow::Result<()>
where
    F: FnMut(&str, &Yaml) -> anyhow::Result<()>,
{
    for (k, v) in table.iter() {
        if let Yaml::String(key) = k {
            f(key, v).context(format!("failed to parse value of key {key}"))?;
        } else {
            return Err(anyhow!("key in hash should be string"));
        }
    }
    Ok(())
}

pub(super) fn as_usize(v: &Yaml) -> anyhow::Result<usize> {
    match v {
        Yaml::String(s) => Ok(usize::from_str(s)?),
        Yaml::Integer(i) => Ok(usize::try_from(*i)?),
        _ => Err(anyhow!(
            "yaml value type for 'usize' should be 'string' or 'integer'"
        )),
    }
}

pub(super) fn as_string(v: &Yaml) -> anyhow::Result<String> {
    match v {
        Yaml::String(s) => Ok(s.to_string()),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Real(s) => Ok(s.to_string()),
        _ => Err(anyhow!(
            "yaml value type for string should be 'string' / 'integer' / 'real'"
        )),
    }
}

pub(super) fn as_level(v: &Yaml) -> anyhow::Result<Level> {
    match v {
        Yaml::String(s) => Ok(Level::from_str(s)?),
        // a bare `off` is read as a boolean by yaml 1.1 parsers
        Yaml::Boolean(false) => Ok(Level::Off),
        _ => Err(anyhow!("yaml value type for 'log level' should be 'string'")),
    }
}

pub(super) fn as_target(v: &Yaml) -> anyhow::Result<StdLogTarget> {
    if let Yaml::String(s) = v {
        match normalize_key(s).as_str() {
            "stdout" => Ok(StdLogTarget::Stdout),
            "stderr" => Ok(StdLogTarget::Stderr),
            "discard" | "null" => Ok(StdLogTarget::Discard),
            _ => Err(anyhow!("invalid log target {s}")),
        }
    } else {
        Err(anyhow!("yaml value type for 'log target' should be 'string'"))
    }
}

pub(super) fn as_color_mode(v: &Yaml) -> anyhow::Result<ColorMode> {
    match v {
        Yaml::String(s) => match normalize_key(s).as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            _ => Err(anyhow!("invalid color mode {s}")),
        },
        Yaml::Boolean(true) => Ok(ColorMode::Always),
        Yaml::Boolean(false) => Ok(ColorMode::Never),
        _ => Err(anyhow!(
            "yaml value type for 'color mode' should be 'string' or 'boolean'"
        )),
    }
}
