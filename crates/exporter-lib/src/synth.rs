//! Configuration synthesis
//!
//! Maps a set of discovered services onto the fixed exporter schemas. The
//! native and container models are updated independently from the same
//! deduplicated port list.

use crate::error::ExportResult;
use crate::exporter::{ConfigModels, ExporterDefaults};
use crate::host::HostIdentity;
use crate::models::ServiceDescriptor;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Distinct service ports in first-seen order
pub fn distinct_ports(services: &[ServiceDescriptor]) -> Vec<u16> {
    let mut seen = HashSet::new();
    services
        .iter()
        .map(|service| service.port)
        .filter(|port| seen.insert(*port))
        .collect()
}

/// Result of one synthesis run
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub hostname: String,
    /// Distinct ports in first-seen order
    pub ports: Vec<u16>,
    /// Port bound to the telemetry address and container command
    pub bound_port: Option<u16>,
    pub models: ConfigModels,
}

/// Builds exporter configuration models from discovered services
#[derive(Debug, Clone, Default)]
pub struct ConfigSynthesizer {
    defaults: ExporterDefaults,
}

impl ConfigSynthesizer {
    pub fn new(defaults: ExporterDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ExporterDefaults {
        &self.defaults
    }

    /// Resolve the host identity and build a fresh pair of models for `services`
    pub fn synthesize(
        &self,
        services: &[ServiceDescriptor],
        host: &dyn HostIdentity,
    ) -> ExportResult<ConfigModels> {
        self.run(services, host).map(|synthesis| synthesis.models)
    }

    /// Like [`ConfigSynthesizer::synthesize`], also reporting the host and port bindings
    pub fn run(
        &self,
        services: &[ServiceDescriptor],
        host: &dyn HostIdentity,
    ) -> ExportResult<Synthesis> {
        let hostname = host.hostname()?;
        let ports = distinct_ports(services);
        let mut models = self.defaults.instantiate();
        let bound_port = Self::apply_ports(&mut models, &ports, &hostname);

        Ok(Synthesis {
            hostname,
            ports,
            bound_port,
            models,
        })
    }

    /// Apply `services` and `host_identity` to `models` in place
    ///
    /// With several distinct ports, the last one in input order is bound to
    /// the telemetry address and the container command, while every port
    /// gets a mapping. Returns the bound port, if any.
    pub fn apply(
        models: &mut ConfigModels,
        services: &[ServiceDescriptor],
        host_identity: &str,
    ) -> Option<u16> {
        Self::apply_ports(models, &distinct_ports(services), host_identity)
    }

    fn apply_ports(models: &mut ConfigModels, ports: &[u16], host_identity: &str) -> Option<u16> {
        models.native.scope_to_host(host_identity);
        models.container.set_hostname(host_identity);

        for port in ports {
            models.container.map_port(*port);
        }

        let bound = *ports.last()?;
        if ports.len() > 1 {
            warn!(
                ports = ?ports,
                bound = bound,
                "Multiple distinct service ports; telemetry is bound to the last one"
            );
        }

        models.native.bind_telemetry(bound);
        models.container.bind_listen_address(bound);

        debug!(
            host = %host_identity,
            bound = bound,
            mappings = models.container.service().ports.len(),
            "Synthesized exporter configuration"
        );

        Some(bound)
    }
}
