// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, PynamConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "pynam_configuration.toml";

/// Find the PyNAM configuration file
///
/// Search order:
/// 1. `PYNAM_CONFIG_PATH` environment variable
/// 2. Current working directory: `./pynam_configuration.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("PYNAM_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by PYNAM_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd;
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent.to_path_buf();
                }
                None => break,
            }
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "PyNAM configuration file '{}' not found in any of these locations:\n{}\n\nSet PYNAM_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML.
/// Validation is left to [`crate::validate_config`].
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<PynamConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: PynamConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `PYNAM_SEED` -> `experiment.seed` and `data.seed`
/// - `PYNAM_N_SAMPLES` -> `data.n_samples`
/// - `PYNAM_MULTIPLICITY` -> `topology.multiplicity`
/// - `PYNAM_TIME_OFFSET` -> `experiment.time_offset`
/// - `PYNAM_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut PynamConfig) {
    let vars: HashMap<String, String> = [
        ("PYNAM_SEED", "seed"),
        ("PYNAM_N_SAMPLES", "n_samples"),
        ("PYNAM_MULTIPLICITY", "multiplicity"),
        ("PYNAM_TIME_OFFSET", "time_offset"),
        ("PYNAM_LOG_LEVEL", "log_level"),
    ]
    .into_iter()
    .filter_map(|(var, key)| env::var(var).ok().map(|value| (key.to_string(), value)))
    .collect();

    apply_overrides(config, &vars);
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"seed": "42", "multiplicity": "3"}`)
pub fn apply_cli_overrides(config: &mut PynamConfig, cli_args: &HashMap<String, String>) {
    apply_overrides(config, cli_args);
}

fn apply_overrides(config: &mut PynamConfig, values: &HashMap<String, String>) {
    if let Some(seed) = values.get("seed").and_then(|v| v.parse::<u64>().ok()) {
        config.experiment.seed = Some(seed);
        config.data.seed = Some(seed);
    }
    if let Some(value) = values.get("n_samples") {
        // "optimal" or "auto" restores the computed default
        if value == "optimal" || value == "auto" {
            config.data.n_samples = None;
        } else if let Ok(n) = value.parse::<usize>() {
            config.data.n_samples = Some(n);
        }
    }
    if let Some(s) = values.get("multiplicity").and_then(|v| v.parse::<usize>().ok()) {
        config.topology.multiplicity = s;
    }
    if let Some(t) = values.get("time_offset").and_then(|v| v.parse::<f64>().ok()) {
        config.experiment.time_offset = t;
    }
    if let Some(level) = values.get("log_level") {
        config.logging.level = level.to_lowercase();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_config.toml");
        File::create(&config_path).unwrap();

        env::set_var("PYNAM_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("PYNAM_CONFIG_PATH");

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::set_var("PYNAM_CONFIG_PATH", "/definitely/not/here.toml");
        let result = find_config_file();
        env::remove_var("PYNAM_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_parameter_sweep() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[data]").unwrap();
        writeln!(file, "n_bits_in = 16").unwrap();
        writeln!(file, "n_samples = 40").unwrap();
        writeln!(file, "strategy = \"naive\"").unwrap();
        writeln!(file, "[[input]]").unwrap();
        writeln!(file, "burst_size = 1").unwrap();
        writeln!(file, "[[input]]").unwrap();
        writeln!(file, "burst_size = 3").unwrap();
        writeln!(file, "sigma_t = 2.0").unwrap();
        writeln!(file, "[experiment]").unwrap();
        writeln!(file, "threshold = {{ kind = \"fixed\", value = 4 }}").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.data.n_bits_in, 16);
        assert_eq!(config.data.n_bits_out, 96);
        assert_eq!(config.data.n_samples, Some(40));
        assert_eq!(config.data.strategy, crate::GeneratorKind::Naive);
        assert_eq!(config.input.len(), 2);
        assert_eq!(config.input[1].burst_size, 3);
        assert_eq!(config.input[1].sigma_t, 2.0);
        assert_eq!(config.input[1].time_window, 100.0);
        assert_eq!(config.experiment.threshold, crate::ThresholdKind::Fixed(4));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = PynamConfig::default();

        env::set_var("PYNAM_SEED", "1234");
        env::set_var("PYNAM_MULTIPLICITY", "3");

        apply_environment_overrides(&mut config);

        env::remove_var("PYNAM_SEED");
        env::remove_var("PYNAM_MULTIPLICITY");

        assert_eq!(config.experiment.seed, Some(1234));
        assert_eq!(config.data.seed, Some(1234));
        assert_eq!(config.topology.multiplicity, 3);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = PynamConfig::default();
        config.data.n_samples = Some(10);
        let mut cli_args = HashMap::new();
        cli_args.insert("n_samples".to_string(), "optimal".to_string());
        cli_args.insert("log_level".to_string(), "DEBUG".to_string());
        cli_args.insert("multiplicity".to_string(), "not-a-number".to_string());

        apply_cli_overrides(&mut config, &cli_args);

        assert_eq!(config.data.n_samples, None);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.topology.multiplicity, 1);
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[experiment]").unwrap();
        writeln!(file, "time_offset = 5.0").unwrap();
        writeln!(file, "[topology]").unwrap();
        writeln!(file, "multiplicity = 2").unwrap();

        env::set_var("PYNAM_TIME_OFFSET", "10.0");
        env::set_var("PYNAM_MULTIPLICITY", "4");

        let mut cli_args = HashMap::new();
        cli_args.insert("time_offset".to_string(), "20.0".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();

        env::remove_var("PYNAM_TIME_OFFSET");
        env::remove_var("PYNAM_MULTIPLICITY");

        // CLI wins for time offset, env wins for multiplicity (no CLI override)
        assert_eq!(config.experiment.time_offset, 20.0);
        assert_eq!(config.topology.multiplicity, 4);
    }
}
