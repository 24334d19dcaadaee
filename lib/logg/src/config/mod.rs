/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, YamlLoader};

use logg_stdlog::{ColorMode, DEFAULT_PATTERN, StdLogTarget};

use crate::Level;

mod yaml;

const DEFAULT_CHANNEL_SIZE: usize = 1024;
const IO_ERROR_SAMPLING_OFFSET_MAX: usize = 16;
const IO_ERROR_SAMPLING_OFFSET_DEFAULT: usize = 10;

/// Settings used to build one logging instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggerSettings {
    pub level: Level,
    pub pattern: String,
    pub target: StdLogTarget,
    pub color: ColorMode,
    pub async_channel_size: usize,
    pub io_err_sampling_mask: usize,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        LoggerSettings {
            level: Level::Info,
            pattern: DEFAULT_PATTERN.to_string(),
            target: StdLogTarget::Stdout,
            color: ColorMode::Auto,
            async_channel_size: DEFAULT_CHANNEL_SIZE,
            io_err_sampling_mask: (1 << IO_ERROR_SAMPLING_OFFSET_DEFAULT) - 1,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct LoggerOverride {
    level: Option<Level>,
    pattern: Option<String>,
    target: Option<StdLogTarget>,
    color: Option<ColorMode>,
}

impl LoggerOverride {
    fn parse(v: &Yaml) -> anyhow::Result<Self> {
        let Yaml::Hash(map) = v else {
            return Err(anyhow!("yaml value type for logger config should be 'map'"));
        };
        let mut config = LoggerOverride::default();
        yaml::foreach_kv(map, |k, v| match yaml::normalize_key(k).as_str() {
            "level" => {
                config.level = Some(yaml::as_level(v)?);
                Ok(())
            }
            "pattern" => {
                config.pattern = Some(yaml::as_string(v)?);
                Ok(())
            }
            "target" => {
                config.target = Some(yaml::as_target(v)?);
                Ok(())
            }
            "color" => {
                config.color = Some(yaml::as_color_mode(v)?);
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        })?;
        Ok(config)
    }

    fn apply(&self, settings: &mut LoggerSettings) {
        if let Some(level) = self.level {
            settings.level = level;
        }
        if let Some(pattern) = &self.pattern {
            settings.pattern.clone_from(pattern);
        }
        if let Some(target) = self.target {
            settings.target = target;
        }
        if let Some(color) = self.color {
            settings.color = color;
        }
    }
}

/// Defaults for new logging instances, plus per-name overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogSystemConfig {
    defaults: LoggerSettings,
    overrides: HashMap<String, LoggerOverride>,
}

impl LogSystemConfig {
    pub fn with_defaults(defaults: LoggerSettings) -> Self {
        LogSystemConfig {
            defaults,
            overrides: HashMap::new(),
        }
    }

    pub fn defaults(&self) -> &LoggerSettings {
        &self.defaults
    }

    pub fn defaults_mut(&mut self) -> &mut LoggerSettings {
        &mut self.defaults
    }

    pub fn set_logger_level(&mut self, name: &str, level: Level) {
        self.overrides.entry(name.to_string()).or_default().level = Some(level);
    }

    /// The settings a logger named `name` is built with.
    pub fn settings_for(&self, name: &str) -> LoggerSettings {
        let mut settings = self.defaults.clone();
        if let Some(o) = self.overrides.get(name) {
            o.apply(&mut settings);
        }
        settings
    }

    pub fn parse(v: &Yaml) -> anyhow::Result<Self> {
        let Yaml::Hash(map) = v else {
            return Err(anyhow!("yaml value type for log config should be 'map'"));
        };

        let mut config = LogSystemConfig::default();
        yaml::foreach_kv(map, |k, v| match yaml::normalize_key(k).as_str() {
            "default_level" | "level" => {
                config.defaults.level = yaml::as_level(v)?;
                Ok(())
            }
            "default_pattern" | "pattern" => {
                config.defaults.pattern = yaml::as_string(v)?;
                Ok(())
            }
            "target" => {
                config.defaults.target = yaml::as_target(v)?;
                Ok(())
            }
            "color" => {
                config.defaults.color = yaml::as_color_mode(v)?;
                Ok(())
            }
            "async_channel_size" | "channel_size" => {
                let channel_size =
                    yaml::as_usize(v).context(format!("invalid usize value for key {k}"))?;
                if channel_size == 0 {
                    return Err(anyhow!("value for {k} should not be zero"));
                }
                config.defaults.async_channel_size = channel_size;
                Ok(())
            }
            "io_error_sampling_offset" => {
                let offset = yaml::as_usize(v).context(format!("invalid value for key {k}"))?;
                if offset > IO_ERROR_SAMPLING_OFFSET_MAX {
                    Err(anyhow!(
                        "value for {k} should be less than {IO_ERROR_SAMPLING_OFFSET_MAX}"
                    ))
                } else {
                    config.defaults.io_err_sampling_mask = (1 << offset) - 1;
                    Ok(())
                }
            }
            "loggers" => {
                let Yaml::Hash(loggers) = v else {
                    return Err(anyhow!("yaml value type for key {k} should be 'map'"));
                };
                yaml::foreach_kv(loggers, |name, v| {
                    let o = LoggerOverride::parse(v)?;
                    config.overrides.insert(name.to_string(), o);
                    Ok(())
                })
            }
            _ => Err(anyhow!("invalid key {k}")),
        })?;
        Ok(config)
    }

    /// Load the config from the first yaml document in `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read config file {}: {e}", path.display()))?;
        let docs = YamlLoader::load_from_str(&content)
            .map_err(|e| anyhow!("failed to parse config file {}: {e}", path.display()))?;
        match docs.first() {
            Some(doc) => LogSystemConfig::parse(doc)
                .context(format!("invalid log config in file {}", path.display())),
            None => Ok(LogSystemConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(s: &str) -> Yaml {
        YamlLoader::load_from_str(s).unwrap().remove(0)
    }

    #[test]
    fn defaults() {
        let config = LogSystemConfig::default();
        let settings = config.settings_for("anything");
        assert_eq!(settings.level, Level::Info);
        assert_eq!(settings.pattern, DEFAULT_PATTERN);
        assert_eq!(settings.target, StdLogTarget::Stdout);
        assert_eq!(settings.io_err_sampling_mask, 1023);
    }

    #[test]
    fn parse_full() {
        let yaml = doc(
            r#"
default-level: debug
default_pattern: "[%n] %v"
target: stderr
color: never
async_channel_size: 64
io_error_sampling_offset: 4
loggers:
  net:
    level: warn
    pattern: "%n: %v"
  disk:
    target: discard
"#,
        );
        let config = LogSystemConfig::parse(&yaml).unwrap();

        let other = config.settings_for("other");
        assert_eq!(other.level, Level::Debug);
        assert_eq!(other.pattern, "[%n] %v");
        assert_eq!(other.target, StdLogTarget::Stderr);
        assert_eq!(other.color, ColorMode::Never);
        assert_eq!(other.async_channel_size, 64);
        assert_eq!(other.io_err_sampling_mask, 0xF);

        let net = config.settings_for("net");
        assert_eq!(net.level, Level::Warn);
        assert_eq!(net.pattern, "%n: %v");
        assert_eq!(net.target, StdLogTarget::Stderr);

        let disk = config.settings_for("disk");
        assert_eq!(disk.level, Level::Debug);
        assert_eq!(disk.target, StdLogTarget::Discard);
    }

    #[test]
    fn parse_errors() {
        assert!(LogSystemConfig::parse(&doc("[]")).is_err());
        assert!(LogSystemConfig::parse(&doc("unknown: 1")).is_err());
        assert!(LogSystemConfig::parse(&doc("io_error_sampling_offset: 17")).is_err());
        assert!(LogSystemConfig::parse(&doc("async_channel_size: 0")).is_err());
        assert!(LogSystemConfig::parse(&doc("loggers: [net]")).is_err());
        assert!(LogSystemConfig::parse(&doc("loggers: {net: {size: 1}}")).is_err());
    }

    #[test]
    fn programmatic_override() {
        let mut config = LogSystemConfig::default();
        config.defaults_mut().target = StdLogTarget::Discard;
        config.set_logger_level("quiet", Level::Off);
        assert_eq!(config.settings_for("quiet").level, Level::Off);
        assert_eq!(config.settings_for("quiet").target, StdLogTarget::Discard);
        assert_eq!(config.settings_for("loud").level, Level::Info);
    }
}
