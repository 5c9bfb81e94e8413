//! Generator configuration.
//!
//! Values are layered: built-in defaults, then the TOML file given with
//! `--config`, then the `FORM_ID` environment variable, then command line
//! flags. Every layer only overrides what it sets.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use formgen_ingest::InputFiles;
use formgen_report::{AreaTitles, DEFAULT_FATHER_ID, ReportOptions};

/// Environment variable overriding the detected form id.
pub const FORM_ID_ENV: &str = "FORM_ID";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub input_dir: Option<PathBuf>,
    /// Root of the generated tree; `<input_dir>/output` when unset.
    pub output_dir: Option<PathBuf>,
    pub files: InputFiles,
    pub father_id: String,
    /// Enables the screen descriptor.
    pub function_name: Option<String>,
    /// Form to generate instead of the first one of the field document.
    pub form_id: Option<String>,
    pub link_bean_id: Option<String>,
    pub area_titles: AreaTitles,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            input_dir: None,
            output_dir: None,
            files: InputFiles::default(),
            father_id: DEFAULT_FATHER_ID.to_string(),
            function_name: None,
            form_id: None,
            link_bean_id: None,
            area_titles: AreaTitles::default(),
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub form_id: Option<String>,
    pub function_name: Option<String>,
    pub father_id: Option<String>,
}

impl GeneratorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("parse generator configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("load configuration {}", path.display()))?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Builds the effective configuration from every layer.
    pub fn resolve(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.apply_overrides(overrides);
        Ok(config)
    }

    /// Applies environment values read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(form_id) = non_blank(lookup(FORM_ID_ENV)) {
            debug!(form_id = %form_id, "form id taken from the environment");
            self.form_id = Some(form_id);
        }
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(input_dir) = &overrides.input_dir {
            self.input_dir = Some(input_dir.clone());
        }
        if let Some(output_dir) = &overrides.output_dir {
            self.output_dir = Some(output_dir.clone());
        }
        if let Some(form_id) = non_blank(overrides.form_id.clone()) {
            self.form_id = Some(form_id);
        }
        if let Some(function_name) = non_blank(overrides.function_name.clone()) {
            self.function_name = Some(function_name);
        }
        if let Some(father_id) = non_blank(overrides.father_id.clone()) {
            self.father_id = father_id;
        }
    }

    pub fn input_dir(&self) -> Result<&Path> {
        match self.input_dir.as_deref() {
            Some(path) => Ok(path),
            None => bail!("no input directory given on the command line or in the configuration"),
        }
    }

    pub fn output_dir(&self) -> Result<PathBuf> {
        match &self.output_dir {
            Some(path) => Ok(path.clone()),
            None => Ok(self.input_dir()?.join("output")),
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            father_id: self.father_id.clone(),
            function_name: non_blank(self.function_name.clone()),
            link_bean_id: non_blank(self.link_bean_id.clone()),
            area_titles: self.area_titles.clone(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = GeneratorConfig::default();
        assert_eq!(config.father_id, "LotIntervallePortefeuille");
        assert_eq!(config.files.fields, "transformed_result.json");
        assert!(config.report_options().function_name.is_none());
        assert!(config.input_dir().is_err());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = GeneratorConfig::from_toml_str(
            r#"
            function_name = "Aini"

            [files]
            area_map = "placements.json"

            [area_titles]
            area2 = "Avances"
            "#,
        )
        .unwrap();
        assert_eq!(config.function_name.as_deref(), Some("Aini"));
        assert_eq!(config.files.area_map, "placements.json");
        assert_eq!(config.files.fields, "transformed_result.json");
        assert_eq!(config.area_titles.area2, "Avances");
        assert_eq!(config.area_titles.area1, "Criteres de lancement");
        assert_eq!(config.father_id, "LotIntervallePortefeuille");
    }

    #[test]
    fn flags_override_environment_over_file() {
        let mut config =
            GeneratorConfig::from_toml_str("form_id = \"from_file\"\ninput_dir = \"in\"").unwrap();
        config.apply_env(|key| (key == FORM_ID_ENV).then(|| "from_env".to_string()));
        assert_eq!(config.form_id.as_deref(), Some("from_env"));

        config.apply_overrides(&ConfigOverrides {
            form_id: Some("from_flag".to_string()),
            father_id: Some("  ".to_string()),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.form_id.as_deref(), Some("from_flag"));
        assert_eq!(config.father_id, "LotIntervallePortefeuille");
        assert_eq!(config.output_dir().unwrap(), PathBuf::from("in").join("output"));
    }

    #[test]
    fn blank_environment_is_ignored() {
        let mut config = GeneratorConfig::default();
        config.apply_env(|_| Some(" ".to_string()));
        assert!(config.form_id.is_none());
    }
}
