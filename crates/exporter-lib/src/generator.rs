//! Top-level generation entry point
//!
//! One call to [`Generator::generate`] owns its models for the duration of
//! the run: synthesize, encode both artifacts in memory, then persist them.
//! Nothing is written unless both artifacts encoded successfully.

use crate::codec;
use crate::error::ExportResult;
use crate::exporter::{ConfigModels, ExporterDefaults};
use crate::host::HostIdentity;
use crate::models::ServiceDescriptor;
use crate::store::ArtifactStore;
use crate::synth::{ConfigSynthesizer, Synthesis};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File name of the native host agent artifact
pub const NATIVE_FILE_NAME: &str = "windows_config.yml";

/// File name of the container deployment artifact
pub const CONTAINER_FILE_NAME: &str = "docker-compose.yml";

/// Destination of each artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub native: PathBuf,
    pub container: PathBuf,
}

impl ArtifactPaths {
    /// Default file names under `base`
    pub fn in_dir(base: impl AsRef<Path>) -> Self {
        Self::with_file_names(base, NATIVE_FILE_NAME, CONTAINER_FILE_NAME)
    }

    pub fn with_file_names(base: impl AsRef<Path>, native: &str, container: &str) -> Self {
        let base = base.as_ref();
        Self {
            native: base.join(native),
            container: base.join(container),
        }
    }
}

/// Outcome of a successful generation run
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub hostname: String,
    /// Distinct ports in first-seen order
    pub ports: Vec<u16>,
    /// Port bound to the telemetry address and container command
    pub bound_port: Option<u16>,
    pub paths: ArtifactPaths,
    pub models: ConfigModels,
}

/// Drives synthesis, encoding and persistence of both artifacts
#[derive(Debug, Clone)]
pub struct Generator {
    synthesizer: ConfigSynthesizer,
    store: ArtifactStore,
    paths: ArtifactPaths,
}

impl Generator {
    pub fn new(defaults: ExporterDefaults, paths: ArtifactPaths) -> Self {
        Self {
            synthesizer: ConfigSynthesizer::new(defaults),
            store: ArtifactStore::new(),
            paths,
        }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Synthesize models and encode both artifacts without persisting them
    pub fn render(
        &self,
        services: &[ServiceDescriptor],
        host: &dyn HostIdentity,
    ) -> ExportResult<(Vec<u8>, Vec<u8>)> {
        let synthesis = self.synthesizer.run(services, host)?;
        Self::encode_pair(&synthesis.models)
    }

    /// Synthesize, encode and write both artifacts
    ///
    /// Either both artifacts are replaced or neither is.
    pub fn generate(
        &self,
        services: &[ServiceDescriptor],
        host: &dyn HostIdentity,
    ) -> ExportResult<GenerationReport> {
        let Synthesis {
            hostname,
            ports,
            bound_port,
            models,
        } = self.synthesizer.run(services, host)?;

        let (native, container) = Self::encode_pair(&models)?;

        let staged_native = self.store.stage(&self.paths.native, &native)?;
        let staged_container = match self.store.stage(&self.paths.container, &container) {
            Ok(staged) => staged,
            Err(e) => {
                self.store.discard(vec![staged_native]);
                return Err(e);
            }
        };
        self.store.commit(vec![staged_native, staged_container])?;

        info!(
            native = %self.paths.native.display(),
            container = %self.paths.container.display(),
            "Wrote exporter configs"
        );

        Ok(GenerationReport {
            hostname,
            ports,
            bound_port,
            paths: self.paths.clone(),
            models,
        })
    }

    /// Read both artifacts back and decode them onto fresh defaults
    pub fn read_back(&self) -> ExportResult<ConfigModels> {
        let mut models = self.synthesizer.defaults().instantiate();

        let native = self.store.read(&self.paths.native)?;
        codec::decode(&native, &mut models.native)?;

        let container = self.store.read(&self.paths.container)?;
        codec::decode(&container, &mut models.container)?;

        Ok(models)
    }

    /// Check that the persisted artifacts decode to `expected`
    pub fn verify(&self, expected: &ConfigModels) -> ExportResult<bool> {
        let actual = self.read_back()?;

        let native_ok = actual.native == expected.native;
        let container_ok = actual.container == expected.container;
        if !native_ok {
            warn!(path = %self.paths.native.display(), "Native artifact differs from generated model");
        }
        if !container_ok {
            warn!(path = %self.paths.container.display(), "Container artifact differs from generated model");
        }

        Ok(native_ok && container_ok)
    }

    fn encode_pair(models: &ConfigModels) -> ExportResult<(Vec<u8>, Vec<u8>)> {
        Ok((
            codec::encode(&models.native)?,
            codec::encode_compose(&models.container)?,
        ))
    }
}
