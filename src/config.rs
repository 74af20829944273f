//! Run configuration.
//!
//! Settings come from an optional JSON file and the command line, the latter
//! winning:
//!
//! ```json
//! {
//!   "data_folder": "sweeps/LED1_P1N2",
//!   "important_currents": [0.001, 0.005, 0.01, 0.02, 0.05, 0.1, 0.2, 0.5],
//!   "write_csv": true
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::data::loader::ErrorPolicy;

/// Everything a run can be told, each field optional so layers can merge.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Folder holding one sweep of `.ISD` files.
    pub data_folder: Option<PathBuf>,
    /// Drive currents (mA) for the "Chosen Spectra" sheet and the plot.
    pub important_currents: Option<Vec<f64>>,
    /// Where outputs go; defaults to the data folder.
    pub save_folder: Option<PathBuf>,
    /// Output base name without extension.
    pub save_filename: Option<String>,
    pub skip_invalid: Option<bool>,
    pub write_csv: Option<bool>,
    pub write_parquet: Option<bool>,
    pub plot: Option<bool>,
}

impl RunConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse JSON configuration")
    }

    /// Fields set in `overrides` replace ours.
    pub fn merge(self, overrides: RunConfig) -> Self {
        RunConfig {
            data_folder: overrides.data_folder.or(self.data_folder),
            important_currents: overrides.important_currents.or(self.important_currents),
            save_folder: overrides.save_folder.or(self.save_folder),
            save_filename: overrides.save_filename.or(self.save_filename),
            skip_invalid: overrides.skip_invalid.or(self.skip_invalid),
            write_csv: overrides.write_csv.or(self.write_csv),
            write_parquet: overrides.write_parquet.or(self.write_parquet),
            plot: overrides.plot.or(self.plot),
        }
    }

    /// Fill in defaults. Fails if no data folder was given.
    pub fn into_settings(self) -> Result<Settings> {
        let Some(data_folder) = self.data_folder else {
            bail!("no data folder given");
        };

        let save_folder = self.save_folder.unwrap_or_else(|| data_folder.clone());
        let save_filename = match self.save_filename {
            Some(name) => name,
            None => default_save_filename(&data_folder)?,
        };
        let important_currents = self.important_currents.unwrap_or_default();
        if let Some(bad) = important_currents.iter().find(|c| !c.is_finite()) {
            bail!("important current must be a finite number, got {bad}");
        }

        Ok(Settings {
            data_folder,
            important_currents,
            save_folder,
            save_filename,
            policy: if self.skip_invalid.unwrap_or(false) {
                ErrorPolicy::Skip
            } else {
                ErrorPolicy::Abort
            },
            write_csv: self.write_csv.unwrap_or(false),
            write_parquet: self.write_parquet.unwrap_or(false),
            plot: self.plot.unwrap_or(true),
        })
    }
}

/// `<innermost folder name> Spectra`, e.g. `LED1_P1N2 Spectra`.
///
/// Paths ending in `.` or `..` are resolved against the filesystem first, so
/// running from inside the sweep folder still names the output after it.
pub fn default_save_filename(data_folder: &Path) -> Result<String> {
    let resolved = match data_folder.file_name() {
        Some(_) => data_folder.to_path_buf(),
        None => std::fs::canonicalize(data_folder)
            .with_context(|| format!("resolving folder {}", data_folder.display()))?,
    };
    let name = resolved
        .file_name()
        .with_context(|| format!("cannot name output after folder {}", data_folder.display()))?;
    Ok(format!("{} Spectra", name.to_string_lossy()))
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_folder: PathBuf,
    /// Empty means "use the default column subset".
    pub important_currents: Vec<f64>,
    pub save_folder: PathBuf,
    pub save_filename: String,
    pub policy: ErrorPolicy,
    pub write_csv: bool,
    pub write_parquet: bool,
    pub plot: bool,
}

impl Settings {
    pub fn with_defaults(data_folder: impl Into<PathBuf>) -> Result<Self> {
        RunConfig {
            data_folder: Some(data_folder.into()),
            ..RunConfig::default()
        }
        .into_settings()
    }

    pub fn workbook_path(&self) -> PathBuf {
        self.output_path(".xlsx")
    }

    /// `<save folder>/<save filename><suffix>`.
    pub fn output_path(&self, suffix: &str) -> PathBuf {
        self.save_folder.join(format!("{}{suffix}", self.save_filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "data_folder": "sweeps/LED1_P1N2",
            "important_currents": [0.1, 0.5],
            "save_filename": "run 7",
            "skip_invalid": true
        }"#;

        let config = RunConfig::from_json(json).unwrap();
        assert_eq!(config.data_folder, Some(PathBuf::from("sweeps/LED1_P1N2")));
        assert_eq!(config.important_currents, Some(vec![0.1, 0.5]));
        assert_eq!(config.save_filename.as_deref(), Some("run 7"));
        assert_eq!(config.skip_invalid, Some(true));
        assert_eq!(config.plot, None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(RunConfig::from_json(r#"{ "data_dir": "x" }"#).is_err());
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(RunConfig::from_json("{}").unwrap(), RunConfig::default());
    }

    #[test]
    fn test_overrides_win() {
        let file = RunConfig {
            data_folder: Some("a".into()),
            important_currents: Some(vec![1.0]),
            write_csv: Some(true),
            ..RunConfig::default()
        };
        let cli = RunConfig {
            data_folder: Some("b".into()),
            ..RunConfig::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.data_folder, Some(PathBuf::from("b")));
        assert_eq!(merged.important_currents, Some(vec![1.0]));
        assert_eq!(merged.write_csv, Some(true));
    }

    #[test]
    fn test_defaults_follow_data_folder() {
        let settings = Settings::with_defaults("data/B2-10um/LED1_P1N2").unwrap();
        assert_eq!(settings.save_folder, PathBuf::from("data/B2-10um/LED1_P1N2"));
        assert_eq!(settings.save_filename, "LED1_P1N2 Spectra");
        assert_eq!(
            settings.workbook_path(),
            PathBuf::from("data/B2-10um/LED1_P1N2/LED1_P1N2 Spectra.xlsx")
        );
        assert_eq!(settings.policy, ErrorPolicy::Abort);
        assert!(settings.important_currents.is_empty());
        assert!(settings.plot);
        assert!(!settings.write_csv);
    }

    #[test]
    fn test_defaults_for_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        let expected = format!("{} Spectra", cwd.file_name().unwrap().to_string_lossy());

        let settings = Settings::with_defaults(".").unwrap();
        assert_eq!(settings.save_filename, expected);
        assert_eq!(settings.save_folder, PathBuf::from("."));
    }

    #[test]
    fn test_defaults_for_parent_component() {
        let root = tempfile::tempdir().unwrap();
        let sweep = root.path().join("LED1_P1N2");
        std::fs::create_dir_all(sweep.join("raw")).unwrap();

        let settings = Settings::with_defaults(sweep.join("raw").join("..")).unwrap();
        assert_eq!(settings.save_filename, "LED1_P1N2 Spectra");
    }

    #[test]
    fn test_missing_data_folder() {
        assert!(RunConfig::default().into_settings().is_err());
    }

    #[test]
    fn test_non_finite_current_rejected() {
        let config = RunConfig {
            data_folder: Some("a".into()),
            important_currents: Some(vec![0.1, f64::NAN]),
            ..RunConfig::default()
        };
        assert!(config.into_settings().is_err());
    }
}
