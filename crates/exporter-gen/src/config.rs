//! Generator settings

use anyhow::{Context, Result};
use exporter_lib::generator::{CONTAINER_FILE_NAME, NATIVE_FILE_NAME};
use exporter_lib::{ArtifactPaths, ExporterDefaults, LogLevel};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable prefix, e.g. `EXPORTER_GEN_OUTPUT_DIR`
const ENV_PREFIX: &str = "EXPORTER_GEN";

/// Settings file looked up in the working directory when none is given
const DEFAULT_SETTINGS_NAME: &str = "exporter-gen";

/// Generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Directory the artifacts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File name of the native agent artifact
    #[serde(default = "default_native_file")]
    pub native_file: String,

    /// File name of the container artifact
    #[serde(default = "default_container_file")]
    pub container_file: String,

    /// Host name override; resolved from the OS when unset
    #[serde(default)]
    pub hostname: Option<String>,

    /// Overrides applied on top of the built-in exporter defaults
    #[serde(default)]
    pub defaults: DefaultOverrides,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("config/node_exporter")
}

fn default_native_file() -> String {
    NATIVE_FILE_NAME.to_string()
}

fn default_container_file() -> String {
    CONTAINER_FILE_NAME.to_string()
}

/// Optional replacements for individual default values
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultOverrides {
    pub collectors: Option<String>,
    pub log_level: Option<LogLevel>,
    pub timeout_margin: Option<f64>,
    pub telemetry_path: Option<String>,
    pub max_requests: Option<u32>,
    pub image: Option<String>,
    pub container_name: Option<String>,
    pub volumes: Option<Vec<String>>,
    pub restart: Option<String>,
}

impl DefaultOverrides {
    pub fn apply(&self, defaults: &mut ExporterDefaults) {
        let native = &mut defaults.native;
        if let Some(collectors) = &self.collectors {
            native.collectors.enabled = collectors.clone();
        }
        if let Some(level) = self.log_level {
            native.log.level = level;
        }
        if let Some(margin) = self.timeout_margin {
            native.scrape.timeout_margin = margin;
        }
        if let Some(path) = &self.telemetry_path {
            native.telemetry.path = path.clone();
        }
        if let Some(max) = self.max_requests {
            native.telemetry.max_requests = max;
        }

        let service = &mut defaults.container.services.node_exporter;
        if let Some(image) = &self.image {
            service.image = image.clone();
        }
        if let Some(name) = &self.container_name {
            service.container_name = name.clone();
        }
        if let Some(volumes) = &self.volumes {
            service.volumes = volumes.clone();
        }
        if let Some(restart) = &self.restart {
            service.restart = restart.clone();
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from an optional settings file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file_source = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_SETTINGS_NAME).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("defaults.volumes")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read generator settings")?;

        settings
            .try_deserialize()
            .context("Failed to parse generator settings")
    }

    pub fn exporter_defaults(&self) -> ExporterDefaults {
        let mut defaults = ExporterDefaults::default();
        self.defaults.apply(&mut defaults);
        defaults
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::with_file_names(&self.output_dir, &self.native_file, &self.container_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.yaml");
        fs::write(
            &path,
            "output_dir: /srv/exporter\n\
             hostname: web-01\n\
             defaults:\n  \
               log_level: info\n  \
               image: prom/node-exporter:v1.8.1\n  \
               volumes:\n    - /proc:/host/proc:ro\n",
        )
        .unwrap();

        let config = GeneratorConfig::load(Some(&path)).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/srv/exporter"));
        assert_eq!(config.hostname.as_deref(), Some("web-01"));
        assert_eq!(config.native_file, NATIVE_FILE_NAME);

        let defaults = config.exporter_defaults();
        assert_eq!(defaults.native.log.level, LogLevel::Info);
        assert_eq!(defaults.container.service().image, "prom/node-exporter:v1.8.1");
        assert_eq!(defaults.container.service().volumes, vec!["/proc:/host/proc:ro"]);
    }

    #[test]
    fn test_missing_settings_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = GeneratorConfig::load(Some(&dir.path().join("absent.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_leave_unset_values() {
        let mut defaults = ExporterDefaults::default();
        let overrides = DefaultOverrides {
            max_requests: Some(10),
            restart: Some("unless-stopped".to_string()),
            ..Default::default()
        };
        overrides.apply(&mut defaults);

        assert_eq!(defaults.native.telemetry.max_requests, 10);
        assert_eq!(defaults.native.telemetry.path, "/metrics");
        assert_eq!(defaults.container.service().restart, "unless-stopped");
        assert_eq!(defaults.container.service().image, ExporterDefaults::default().container.service().image);
    }

    #[test]
    fn test_artifact_paths_use_configured_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            "output_dir = \"out\"\nnative_file = \"native.yml\"\ncontainer_file = \"compose.yml\"\n",
        )
        .unwrap();

        let paths = GeneratorConfig::load(Some(&path)).unwrap().artifact_paths();
        assert_eq!(paths.native, PathBuf::from("out/native.yml"));
        assert_eq!(paths.container, PathBuf::from("out/compose.yml"));
    }
}
