pub mod params;
pub mod upgrade;

pub use upgrade::{upgrade_config, upgrade_config_file, upgrade_config_str};

use crate::domain::RibovizError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A single workflow parameter value as it appears in YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ParamValue>),
    Map(IndexMap<String, ParamValue>),
}

impl ParamValue {
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "mapping",
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{} does not exist or is not a file", path.display())]
    InputNotAFile { path: PathBuf },
    #[error("failed to read configuration '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("configuration {origin} must be a YAML mapping, found {found}")]
    NotAMapping { origin: String, found: &'static str },
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[source] serde_yaml::Error),
    #[error("failed to write configuration '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("missing required parameter '{key}'")]
    MissingParameter { key: String },
    #[error("parameter '{key}' expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl From<ConfigError> for RibovizError {
    fn from(error: ConfigError) -> Self {
        let message = error.to_string();
        match error {
            ConfigError::InputNotAFile { .. } => {
                RibovizError::input_validation("INPUT.CONFIG_FILE", message)
            }
            ConfigError::Read { .. } | ConfigError::Write { .. } => {
                RibovizError::io_system("IO.CONFIG_FILE", message)
            }
            ConfigError::Parse { .. } | ConfigError::NotAMapping { .. } => {
                RibovizError::input_validation("INPUT.CONFIG_PARSE", message)
            }
            ConfigError::Serialize(_) => RibovizError::internal("SYS.CONFIG_SERIALIZE", message),
            ConfigError::MissingParameter { .. } => {
                RibovizError::input_validation("INPUT.CONFIG_MISSING", message)
            }
            ConfigError::TypeMismatch { .. } => {
                RibovizError::input_validation("INPUT.CONFIG_TYPE", message)
            }
        }
    }
}

/// Workflow configuration: an ordered mapping from parameter names to values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowConfig {
    params: IndexMap<String, ParamValue>,
}

impl WorkflowConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, format!("'{}'", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "document".to_string())
    }

    fn parse(content: &str, origin: String) -> Result<Self, ConfigError> {
        let root: ParamValue =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                origin: origin.clone(),
                source,
            })?;
        match root {
            ParamValue::Map(params) => Ok(Self { params }),
            other => Err(ConfigError::NotAMapping {
                origin,
                found: other.type_name(),
            }),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(&self.params).map_err(ConfigError::Serialize)
    }

    pub fn write_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        let yaml = self.to_yaml_string()?;
        fs::write(path, yaml).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.params.insert(key.into(), value.into());
    }

    /// Removes `key` keeping the order of the remaining parameters.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.params.shift_remove(key)
    }

    /// Moves the value of `from` to `to` at the position `from` held.
    ///
    /// Any value already under `to` is discarded. Returns `false` and leaves
    /// the configuration untouched when `from` is absent.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if !self.params.contains_key(from) {
            return false;
        }
        if from != to {
            self.params.shift_remove(to);
        }
        if let Some((index, _, value)) = self.params.shift_remove_full(from) {
            self.params.shift_insert(index, to.to_string(), value);
        }
        true
    }

    pub fn bool_param(&self, key: &str) -> Result<bool, ConfigError> {
        match self.non_null(key) {
            Some(ParamValue::Bool(value)) => Ok(*value),
            Some(other) => Err(type_mismatch(key, "a boolean", other)),
            None => Err(missing(key)),
        }
    }

    /// Absent and null values fall back to `default`.
    pub fn bool_param_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.non_null(key) {
            Some(ParamValue::Bool(value)) => Ok(*value),
            Some(other) => Err(type_mismatch(key, "a boolean", other)),
            None => Ok(default),
        }
    }

    pub fn str_param(&self, key: &str) -> Result<&str, ConfigError> {
        self.opt_str_param(key)?.ok_or_else(|| missing(key))
    }

    pub fn opt_str_param(&self, key: &str) -> Result<Option<&str>, ConfigError> {
        match self.non_null(key) {
            Some(ParamValue::String(value)) => Ok(Some(value)),
            Some(other) => Err(type_mismatch(key, "a string", other)),
            None => Ok(None),
        }
    }

    pub fn int_param(&self, key: &str) -> Result<i64, ConfigError> {
        match self.non_null(key) {
            Some(ParamValue::Integer(value)) => Ok(*value),
            Some(other) => Err(type_mismatch(key, "an integer", other)),
            None => Err(missing(key)),
        }
    }

    pub fn map_param(
        &self,
        key: &str,
    ) -> Result<Option<&IndexMap<String, ParamValue>>, ConfigError> {
        match self.non_null(key) {
            Some(ParamValue::Map(value)) => Ok(Some(value)),
            Some(other) => Err(type_mismatch(key, "a mapping", other)),
            None => Ok(None),
        }
    }

    fn non_null(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key).filter(|value| !value.is_null())
    }
}

fn missing(key: &str) -> ConfigError {
    ConfigError::MissingParameter {
        key: key.to_string(),
    }
}

fn type_mismatch(key: &str, expected: &'static str, found: &ParamValue) -> ConfigError {
    ConfigError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ParamValue, WorkflowConfig};
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE_CONFIG: &str = r#"
dir_in: vignette/input
dir_tmp: vignette/tmp
count_threshold: 64
dedup_umis: false
fq_files:
  WTnone: SRR1042855_s1mi.fastq.gz
  WT3AT: SRR1042864_s1mi.fastq.gz
min_read_length: 10
buffer: 250
job_runtime: '48:00:00'
t_rna_file: null
"#;

    #[test]
    fn yaml_values_map_onto_param_variants() {
        let config = WorkflowConfig::from_yaml_str(SAMPLE_CONFIG).expect("config should parse");

        assert_eq!(config.str_param("dir_in").expect("dir_in"), "vignette/input");
        assert_eq!(config.int_param("count_threshold").expect("threshold"), 64);
        assert!(!config.bool_param("dedup_umis").expect("dedup_umis"));
        assert_eq!(config.str_param("job_runtime").expect("runtime"), "48:00:00");
        assert_eq!(config.get("t_rna_file"), Some(&ParamValue::Null));

        let samples = config
            .map_param("fq_files")
            .expect("fq_files should be a mapping")
            .expect("fq_files should be present");
        let names = samples.keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(names, vec!["WTnone", "WT3AT"]);
    }

    #[test]
    fn wrong_types_are_reported_with_key_and_found_type() {
        let config = WorkflowConfig::from_yaml_str("dedup_umis: 'yes'\ncount_threshold: 1.5\n")
            .expect("config should parse");

        let error = config
            .bool_param_or("dedup_umis", false)
            .expect_err("string flag should be rejected");
        assert!(matches!(
            error,
            ConfigError::TypeMismatch {
                expected: "a boolean",
                found: "string",
                ..
            }
        ));
        assert_eq!(
            error.to_string(),
            "parameter 'dedup_umis' expected a boolean, found string"
        );
        assert!(config.int_param("count_threshold").is_err());
    }

    #[test]
    fn null_and_absent_values_use_defaults_for_flags() {
        let config =
            WorkflowConfig::from_yaml_str("group_umis: null\n").expect("config should parse");

        assert!(config.bool_param_or("group_umis", true).expect("null flag"));
        assert!(!config.bool_param_or("dedup_stats", false).expect("absent flag"));
        assert!(matches!(
            config.str_param("dir_out"),
            Err(ConfigError::MissingParameter { .. })
        ));
        assert_eq!(config.opt_str_param("group_umis").expect("null"), None);
    }

    #[test]
    fn non_mapping_document_is_rejected() {
        let error = WorkflowConfig::from_yaml_str("- a\n- b\n").expect_err("list root");
        assert!(matches!(error, ConfigError::NotAMapping { found: "list", .. }));
    }

    #[test]
    fn remove_preserves_remaining_order_and_round_trips_through_files() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("config.yaml");
        let mut config = WorkflowConfig::from_yaml_str(SAMPLE_CONFIG).expect("config should parse");

        assert!(config.remove("count_threshold").is_some());
        config.write_to_path(&path).expect("config should be written");

        let reloaded = WorkflowConfig::from_path(&path).expect("config should reload");
        assert_eq!(reloaded, config);
        assert_eq!(
            reloaded.keys().take(3).collect::<Vec<_>>(),
            vec!["dir_in", "dir_tmp", "dedup_umis"]
        );

        let written = fs::read_to_string(&path).expect("config should be readable");
        assert!(written.contains("WTnone: SRR1042855_s1mi.fastq.gz"));
    }

    #[test]
    fn rename_takes_the_old_position_and_drops_the_target() {
        let mut config = WorkflowConfig::from_yaml_str("buffer: 100\ndir_in: input\nBuffer: 250\n")
            .expect("config should parse");

        assert!(config.rename("Buffer", "buffer"));
        assert_eq!(config.keys().collect::<Vec<_>>(), ["dir_in", "buffer"]);
        assert_eq!(config.get("buffer"), Some(&ParamValue::Integer(250)));
        assert!(!config.rename("Buffer", "buffer"));
    }
}
