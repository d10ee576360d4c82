//! Exporter configuration models
//!
//! Two deployment targets are described here: the exporter running natively
//! on the host, and the exporter running as a container described by a
//! compose manifest. Both are populated from the same discovered services.

mod container;
mod defaults;
mod native;

pub use container::{ComposeServices, ContainerAgentConfig, NodeExporterService};
pub use defaults::{
    ExporterDefaults, DEFAULT_COLLECTORS, DEFAULT_CONTAINER_NAME, DEFAULT_IMAGE,
    DEFAULT_LISTEN_PORT, DEFAULT_TELEMETRY_ADDR,
};
pub use native::{
    CollectorSettings, Collectors, LogLevel, LogSettings, NativeAgentConfig, ScrapeSettings,
    ServiceCollector, Telemetry,
};

use serde::{Deserialize, Serialize};

/// Command-line flag the containerized exporter uses for its bind address
pub const LISTEN_ADDRESS_FLAG: &str = "--web.listen-address";

/// Format a bind address listening on all interfaces for `port`
pub fn bind_address(port: u16) -> String {
    format!(":{}", port)
}

/// Both configuration models produced by one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigModels {
    pub native: NativeAgentConfig,
    pub container: ContainerAgentConfig,
}

impl ConfigModels {
    /// Port currently bound by the native telemetry endpoint, if any
    pub fn bound_port(&self) -> Option<u16> {
        self.native.telemetry.addr.strip_prefix(':')?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        assert_eq!(bind_address(9100), ":9100");
    }

    #[test]
    fn test_bound_port_reads_telemetry_addr() {
        let models = ExporterDefaults::default().instantiate();
        assert_eq!(models.bound_port(), Some(9200));
    }
}
