//! Configuration management for `pprof_compare`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI flags
//! 2. Environment variables (`PPROF_COMPARE_*`)
//! 3. Project config (`./.pprof-compare.yaml`, or `--config <path>`)
//! 4. User config (`~/.config/pprof-compare/config.yaml`)
//! 5. Defaults
//!
//! Scalar keys are overridden by higher layers. Exclude patterns accumulate:
//! every layer's patterns are kept, lowest layer first.
//!
//! The merged result is resolved once into an immutable [`CompareConfig`]
//! that is passed explicitly into the diff engine and renderer.

use crate::classify::DEFAULT_OWN_PREFIX;
use crate::error::{CompareError, Result};
use crate::format::DEFAULT_MAX_NAME_LEN;
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Project config filename looked up in the working directory.
pub const PROJECT_CONFIG_FILENAME: &str = ".pprof-compare.yaml";
/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "PPROF_COMPARE_";

pub const DEFAULT_THRESHOLD_PCT: f64 = 30.0;
pub const DEFAULT_MIN_DELTA_MS: f64 = 50.0;
pub const DEFAULT_TOP: usize = 20;
pub const DEFAULT_NODECOUNT: usize = 300;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_GO_BINARY: &str = "go";

const KEY_THRESHOLD: &str = "threshold";
const KEY_MIN_DELTA: &str = "min-delta";
const KEY_TOP: &str = "top";
const KEY_NODECOUNT: &str = "nodecount";
const KEY_TIMEOUT: &str = "timeout";
const KEY_GO: &str = "go";
const KEY_MAX_NAME_LEN: &str = "max-name-len";
const KEY_OWN_PREFIX: &str = "own-prefix";
const KEY_EXCLUDE: &str = "exclude";

const KNOWN_KEYS: &[&str] = &[
    KEY_THRESHOLD,
    KEY_MIN_DELTA,
    KEY_TOP,
    KEY_NODECOUNT,
    KEY_TIMEOUT,
    KEY_GO,
    KEY_MAX_NAME_LEN,
    KEY_OWN_PREFIX,
    KEY_EXCLUDE,
];

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareConfig {
    pub threshold_pct: f64,
    pub min_delta_ms: f64,
    pub exclude: Vec<String>,
    pub top: usize,
    pub nodecount: usize,
    #[serde(rename = "timeout_secs", serialize_with = "serialize_secs")]
    pub timeout: Duration,
    pub go_binary: PathBuf,
    pub max_name_len: usize,
    pub own_prefix: String,
}

fn serialize_secs<S: serde::Serializer>(
    value: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_secs())
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            threshold_pct: DEFAULT_THRESHOLD_PCT,
            min_delta_ms: DEFAULT_MIN_DELTA_MS,
            exclude: Vec::new(),
            top: DEFAULT_TOP,
            nodecount: DEFAULT_NODECOUNT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            go_binary: PathBuf::from(DEFAULT_GO_BINARY),
            max_name_len: DEFAULT_MAX_NAME_LEN,
            own_prefix: DEFAULT_OWN_PREFIX.to_string(),
        }
    }
}

impl CompareConfig {
    /// Resolve a merged layer on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a value does not parse or is out
    /// of range.
    pub fn from_layer(layer: &ConfigLayer) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = parse_value::<f64>(layer, KEY_THRESHOLD)? {
            config.threshold_pct = non_negative(KEY_THRESHOLD, v)?;
        }
        if let Some(v) = parse_value::<f64>(layer, KEY_MIN_DELTA)? {
            config.min_delta_ms = non_negative(KEY_MIN_DELTA, v)?;
        }
        if let Some(v) = parse_value::<usize>(layer, KEY_TOP)? {
            config.top = v;
        }
        if let Some(v) = parse_value::<usize>(layer, KEY_NODECOUNT)? {
            if v == 0 {
                return Err(CompareError::config("nodecount must be at least 1"));
            }
            config.nodecount = v;
        }
        if let Some(v) = parse_value::<u64>(layer, KEY_TIMEOUT)? {
            if v == 0 {
                return Err(CompareError::config("timeout must be at least 1 second"));
            }
            config.timeout = Duration::from_secs(v);
        }
        if let Some(v) = layer.get(KEY_GO) {
            config.go_binary = PathBuf::from(v);
        }
        if let Some(v) = parse_value::<usize>(layer, KEY_MAX_NAME_LEN)? {
            config.max_name_len = v;
        }
        if let Some(v) = layer.get(KEY_OWN_PREFIX) {
            config.own_prefix = v.to_string();
        }
        config.exclude.clone_from(&layer.exclude);

        Ok(config)
    }
}

fn parse_value<T: FromStr>(layer: &ConfigLayer, key: &str) -> Result<Option<T>> {
    layer
        .get(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|_| {
                CompareError::config(format!("invalid value for '{key}': '{raw}'"))
            })
        })
        .transpose()
}

fn non_negative(key: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CompareError::config(format!(
            "'{key}' must be a non-negative number, got {value}"
        )))
    }
}

/// One configuration source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
    pub exclude: Vec<String>,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
        self.exclude.extend(other.exclude.iter().cloned());
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&contents)?;
        let layer = layer_from_yaml_value(&value)?;
        debug!(path = %path.display(), keys = layer.values.len(), "Loaded config file");
        Ok(layer)
    }

    /// Build a layer from `PPROF_COMPARE_*` variables.
    ///
    /// `PPROF_COMPARE_MIN_DELTA=80` sets `min-delta`. Exclude patterns are not
    /// read from the environment since regexes cannot be split reliably.
    #[must_use]
    pub fn from_env_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut layer = Self::default();
        for (key, value) in vars {
            let Some(stripped) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let normalized = normalize_key(stripped);
            if normalized == KEY_EXCLUDE || !KNOWN_KEYS.contains(&normalized.as_str()) {
                continue;
            }
            layer.values.insert(normalized, value.into());
        }
        layer
    }

    /// Build a layer from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_vars(env::vars())
    }
}

/// CLI flags that override configuration.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub threshold: Option<f64>,
    pub min_delta: Option<f64>,
    pub exclude: Vec<String>,
    pub top: Option<usize>,
    pub nodecount: Option<usize>,
    pub timeout: Option<u64>,
    pub go: Option<PathBuf>,
    pub max_name_len: Option<usize>,
    pub own_prefix: Option<String>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();
        let values = &mut layer.values;

        if let Some(v) = self.threshold {
            values.insert(KEY_THRESHOLD.to_string(), v.to_string());
        }
        if let Some(v) = self.min_delta {
            values.insert(KEY_MIN_DELTA.to_string(), v.to_string());
        }
        if let Some(v) = self.top {
            values.insert(KEY_TOP.to_string(), v.to_string());
        }
        if let Some(v) = self.nodecount {
            values.insert(KEY_NODECOUNT.to_string(), v.to_string());
        }
        if let Some(v) = self.timeout {
            values.insert(KEY_TIMEOUT.to_string(), v.to_string());
        }
        if let Some(v) = &self.go {
            values.insert(KEY_GO.to_string(), v.to_string_lossy().to_string());
        }
        if let Some(v) = self.max_name_len {
            values.insert(KEY_MAX_NAME_LEN.to_string(), v.to_string());
        }
        if let Some(v) = &self.own_prefix {
            values.insert(KEY_OWN_PREFIX.to_string(), v.clone());
        }
        layer.exclude.clone_from(&self.exclude);

        layer
    }
}

/// Load user config (`~/.config/pprof-compare/config.yaml`).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<ConfigLayer> {
    let Ok(home) = env::var("HOME") else {
        return Ok(ConfigLayer::default());
    };
    let path = Path::new(&home)
        .join(".config")
        .join("pprof-compare")
        .join("config.yaml");
    ConfigLayer::from_yaml(&path)
}

/// Load the project config.
///
/// An explicit path must exist; the implicit `.pprof-compare.yaml` in
/// `project_dir` is optional.
///
/// # Errors
///
/// Returns an error if an explicit file is missing or any file fails to parse.
pub fn load_project_config(project_dir: &Path, explicit: Option<&Path>) -> Result<ConfigLayer> {
    match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(CompareError::config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            ConfigLayer::from_yaml(path)
        }
        None => ConfigLayer::from_yaml(&project_dir.join(PROJECT_CONFIG_FILENAME)),
    }
}

/// Load configuration with the full precedence chain.
///
/// # Errors
///
/// Returns an error if any config file cannot be read or parsed, or a
/// resolved value is invalid.
pub fn load_config(
    project_dir: &Path,
    explicit: Option<&Path>,
    cli: &CliOverrides,
) -> Result<CompareConfig> {
    let user = load_user_config()?;
    let project = load_project_config(project_dir, explicit)?;
    let env_layer = ConfigLayer::from_env();
    let cli_layer = cli.as_layer();

    let merged = ConfigLayer::merge_layers(&[user, project, env_layer, cli_layer]);
    let config = CompareConfig::from_layer(&merged)?;
    debug!(config = ?config, "Resolved configuration");
    Ok(config)
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

fn layer_from_yaml_value(value: &serde_yaml::Value) -> Result<ConfigLayer> {
    let mut layer = ConfigLayer::default();
    let serde_yaml::Value::Mapping(map) = value else {
        if value.is_null() {
            return Ok(layer);
        }
        return Err(CompareError::config("config file must be a mapping"));
    };

    for (key, value) in map {
        let Some(key) = key.as_str() else {
            continue;
        };
        let key = normalize_key(key);
        if !KNOWN_KEYS.contains(&key.as_str()) {
            debug!(%key, "Ignoring unknown config key");
            continue;
        }

        if key == KEY_EXCLUDE {
            match value {
                serde_yaml::Value::Sequence(items) => {
                    layer
                        .exclude
                        .extend(items.iter().filter_map(yaml_scalar_to_string));
                }
                other => layer.exclude.extend(yaml_scalar_to_string(other)),
            }
        } else if let Some(scalar) = yaml_scalar_to_string(value) {
            layer.values.insert(key, scalar);
        }
    }

    Ok(layer)
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
