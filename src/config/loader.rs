// src/config/loader.rs
//! Layered TOML configuration loader with environment overrides

use crate::config::{constants::paths, AnalysisConfig};
use crate::error::{EmgError, EmgResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration loader
///
/// Files are merged table by table in the order of `config_paths`, on top of
/// the built-in defaults. Environment variables of the form
/// `EMG_<SECTION>__<KEY>` are applied last.
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    use_environment: bool,
}

impl ConfigLoader {
    /// Create loader over the standard search path
    pub fn new() -> Self {
        Self {
            config_paths: Self::discover_config_paths(),
            use_environment: true,
        }
    }

    /// Create loader with custom paths
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            use_environment: true,
        }
    }

    /// Append a file with the highest file precedence
    pub fn add_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config_paths.push(path.into());
        self
    }

    /// Skip `EMG_*` environment overrides
    pub fn without_environment(mut self) -> Self {
        self.use_environment = false;
        self
    }

    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    /// Load, merge and validate
    pub fn load(&self) -> EmgResult<AnalysisConfig> {
        let mut merged = toml::Value::try_from(AnalysisConfig::default())?;

        for config_path in &self.config_paths {
            if !config_path.exists() {
                continue;
            }
            debug!(path = %config_path.display(), "merging configuration file");
            let overlay = Self::load_config_file(config_path)?;
            merge_toml_values(&mut merged, overlay);
        }

        if self.use_environment {
            apply_environment_overrides(&mut merged, std::env::vars());
        }

        let config = merged.try_into::<AnalysisConfig>()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate a single file against the defaults without loading the search path
    pub fn validate_config_file<P: AsRef<Path>>(path: P) -> EmgResult<AnalysisConfig> {
        let mut merged = toml::Value::try_from(AnalysisConfig::default())?;
        merge_toml_values(&mut merged, Self::load_config_file(path.as_ref())?);
        let config = merged.try_into::<AnalysisConfig>()?;
        config.validate()?;
        Ok(config)
    }

    /// Write a configuration as pretty TOML
    pub fn export_config<P: AsRef<Path>>(config: &AnalysisConfig, path: P) -> EmgResult<()> {
        let path = path.as_ref();
        let toml_content = toml::to_string_pretty(config)?;
        std::fs::write(path, toml_content).map_err(|e| EmgError::io(path, e))
    }

    fn load_config_file(path: &Path) -> EmgResult<toml::Value> {
        let content = std::fs::read_to_string(path).map_err(|e| EmgError::io(path, e))?;
        let value: toml::Value = toml::from_str(&content)?;
        Ok(value)
    }

    fn discover_config_paths() -> Vec<PathBuf> {
        let mut config_paths = vec![PathBuf::from(paths::SYSTEM_CONFIG_PATH)];

        if let Some(home_dir) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
            config_paths.push(PathBuf::from(home_dir).join(paths::USER_CONFIG_DIR).join("config.toml"));
        }

        config_paths.push(PathBuf::from(paths::DEFAULT_CONFIG_FILE));
        config_paths.push(PathBuf::from(paths::LOCAL_CONFIG_FILE));
        config_paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_toml_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml_values(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

fn apply_environment_overrides<I>(config: &mut toml::Value, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, value) in vars {
        let Some(rest) = key.strip_prefix(paths::ENV_PREFIX) else {
            continue;
        };
        let Some((section, field)) = rest.split_once(paths::ENV_SECTION_SEPARATOR) else {
            continue;
        };
        let section = section.to_lowercase();
        let field = field.to_lowercase();

        let Some(toml::Value::Table(table)) = config.get_mut(section.as_str()) else {
            debug!(variable = %key, "ignoring override for unknown section");
            continue;
        };
        let parsed = parse_env_value(&value, table.get(field.as_str()));
        debug!(variable = %key, "applying environment override");
        table.insert(field, parsed);
    }
}

/// Parse an override, keeping the type of the value it replaces where possible
fn parse_env_value(value: &str, current: Option<&toml::Value>) -> toml::Value {
    match current {
        Some(toml::Value::Float(_)) => {
            if let Ok(float_val) = value.parse::<f64>() {
                return toml::Value::Float(float_val);
            }
        }
        Some(toml::Value::Array(_)) => {
            return toml::Value::Array(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(|item| toml::Value::String(item.to_string()))
                    .collect(),
            );
        }
        _ => {}
    }

    if let Ok(int_val) = value.parse::<i64>() {
        toml::Value::Integer(int_val)
    } else if let Ok(float_val) = value.parse::<f64>() {
        toml::Value::Float(float_val)
    } else if let Ok(bool_val) = value.parse::<bool>() {
        toml::Value::Boolean(bool_val)
    } else {
        toml::Value::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_defaults_without_files() {
        let loader = ConfigLoader::with_paths(vec![PathBuf::from("/nonexistent/emg.toml")])
            .without_environment();
        let config = loader.load().unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_file_overlay_merges_sections() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[filter]
high_hz = 499.0

[movement]
start_ms = 500
"#
        )
        .unwrap();

        let config = ConfigLoader::with_paths(vec![file.path().to_path_buf()])
            .without_environment()
            .load()
            .unwrap();

        assert_eq!(config.filter.high_hz, 499.0);
        assert_eq!(config.filter.low_hz, 20.0);
        assert_eq!(config.movement.start_ms, 500);
        assert_eq!(config.movement.end_ms, 4000);
    }

    #[test]
    fn test_later_files_take_precedence() {
        let mut base = NamedTempFile::new().unwrap();
        writeln!(base, "[envelope]\nwindow_ms = 100.0").unwrap();
        let mut local = NamedTempFile::new().unwrap();
        writeln!(local, "[envelope]\nwindow_ms = 50.0").unwrap();

        let config = ConfigLoader::with_paths(vec![base.path().to_path_buf()])
            .add_path(local.path())
            .without_environment()
            .load()
            .unwrap();

        assert_eq!(config.envelope.window_ms, 50.0);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[filter]\nhigh_hz = 900.0").unwrap();

        let result = ConfigLoader::validate_config_file(file.path());
        assert!(matches!(result, Err(EmgError::InvalidFilterSpec { .. })));
    }

    #[test]
    fn test_environment_overrides_keep_types() {
        let mut config = toml::Value::try_from(AnalysisConfig::default()).unwrap();
        apply_environment_overrides(
            &mut config,
            vec![
                ("EMG_FILTER__HIGH_HZ".to_string(), "499".to_string()),
                ("EMG_SCORING__POLICY".to_string(), "dominance".to_string()),
                ("EMG_MUSCLES__NAMES".to_string(), "soleus, gastrocnemius".to_string()),
                ("EMG_UNKNOWN__KEY".to_string(), "1".to_string()),
                ("PATH".to_string(), "/usr/bin".to_string()),
            ],
        );

        let config = config.try_into::<AnalysisConfig>().unwrap();
        assert_eq!(config.filter.high_hz, 499.0);
        assert_eq!(config.scoring.policy, PolicyKind::Dominance);
        assert_eq!(config.muscles.names, vec!["soleus", "gastrocnemius"]);
    }

    #[test]
    fn test_config_export_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let config = AnalysisConfig::lower_limb_panel();

        ConfigLoader::export_config(&config, file.path()).unwrap();
        let loaded = ConfigLoader::validate_config_file(file.path()).unwrap();

        assert_eq!(loaded, config);
    }
}
