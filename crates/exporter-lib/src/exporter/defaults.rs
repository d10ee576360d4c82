//! Default configuration templates
//!
//! Every generation run starts from a fresh copy of these templates. The
//! templates themselves are never mutated by synthesis.

use super::{
    bind_address, CollectorSettings, Collectors, ComposeServices, ConfigModels,
    ContainerAgentConfig, LogLevel, LogSettings, NativeAgentConfig, NodeExporterService,
    ScrapeSettings, ServiceCollector, Telemetry, LISTEN_ADDRESS_FLAG,
};

/// Collectors enabled on native hosts
pub const DEFAULT_COLLECTORS: &str = "cpu,cs,logical_disk,net,os,service,system";

/// Telemetry bind address used until a service port is discovered
pub const DEFAULT_TELEMETRY_ADDR: &str = ":9200";

/// Listen port of the containerized exporter before discovery
pub const DEFAULT_LISTEN_PORT: u16 = 9100;

pub const DEFAULT_IMAGE: &str = "prom/node-exporter:latest";

pub const DEFAULT_CONTAINER_NAME: &str = "node_exporter";

const DEFAULT_SERVICES_WHERE: &str = "default name";
const DEFAULT_TIMEOUT_MARGIN: f64 = 0.5;
const DEFAULT_TELEMETRY_PATH: &str = "/metrics";
const DEFAULT_MAX_REQUESTS: u32 = 5;
const DEFAULT_COMPOSE_VERSION: &str = "3";
const DEFAULT_CONTAINER_HOSTNAME: &str = "node-exporter";
const DEFAULT_RESTART_POLICY: &str = "always";
const DEFAULT_VOLUMES: &[&str] = &["/proc:/host/proc:ro", "/sys:/host/sys:ro", "/:/rootfs:ro"];

/// Named default configuration passed into the synthesizer
#[derive(Debug, Clone, PartialEq)]
pub struct ExporterDefaults {
    pub native: NativeAgentConfig,
    pub container: ContainerAgentConfig,
}

impl Default for ExporterDefaults {
    fn default() -> Self {
        Self {
            native: NativeAgentConfig {
                collectors: Collectors {
                    enabled: DEFAULT_COLLECTORS.to_string(),
                },
                collector: CollectorSettings {
                    service: ServiceCollector {
                        services_where: DEFAULT_SERVICES_WHERE.to_string(),
                    },
                },
                log: LogSettings {
                    level: LogLevel::Debug,
                },
                scrape: ScrapeSettings {
                    timeout_margin: DEFAULT_TIMEOUT_MARGIN,
                },
                telemetry: Telemetry {
                    addr: DEFAULT_TELEMETRY_ADDR.to_string(),
                    path: DEFAULT_TELEMETRY_PATH.to_string(),
                    max_requests: DEFAULT_MAX_REQUESTS,
                },
            },
            container: ContainerAgentConfig {
                version: DEFAULT_COMPOSE_VERSION.to_string(),
                services: ComposeServices {
                    node_exporter: NodeExporterService {
                        image: DEFAULT_IMAGE.to_string(),
                        container_name: DEFAULT_CONTAINER_NAME.to_string(),
                        command: format!("{}={}", LISTEN_ADDRESS_FLAG, bind_address(DEFAULT_LISTEN_PORT)),
                        volumes: DEFAULT_VOLUMES.iter().map(|v| v.to_string()).collect(),
                        hostname: DEFAULT_CONTAINER_HOSTNAME.to_string(),
                        restart: DEFAULT_RESTART_POLICY.to_string(),
                        ports: Vec::new(),
                    },
                },
            },
        }
    }
}

impl ExporterDefaults {
    /// Fresh, independently owned models populated with these defaults
    pub fn instantiate(&self) -> ConfigModels {
        ConfigModels {
            native: self.native.clone(),
            container: self.container.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_native_values() {
        let native = ExporterDefaults::default().native;
        assert_eq!(native.collectors.enabled, DEFAULT_COLLECTORS);
        assert_eq!(native.collector.service.services_where, "default name");
        assert_eq!(native.log.level, LogLevel::Debug);
        assert_eq!(native.scrape.timeout_margin, 0.5);
        assert_eq!(native.telemetry.addr, ":9200");
        assert_eq!(native.telemetry.path, "/metrics");
        assert_eq!(native.telemetry.max_requests, 5);
    }

    #[test]
    fn test_default_container_values() {
        let container = ExporterDefaults::default().container;
        let service = container.service();
        assert_eq!(container.version, "3");
        assert_eq!(service.image, DEFAULT_IMAGE);
        assert_eq!(service.command, "--web.listen-address=:9100");
        assert_eq!(service.volumes.len(), 3);
        assert_eq!(service.restart, "always");
        assert!(service.ports.is_empty());
    }

    #[test]
    fn test_instantiate_does_not_share_state() {
        let defaults = ExporterDefaults::default();
        let mut first = defaults.instantiate();
        first.container.map_port(9100);
        first.native.bind_telemetry(9100);

        let second = defaults.instantiate();
        assert!(second.container.service().ports.is_empty());
        assert_eq!(second.native.telemetry.addr, DEFAULT_TELEMETRY_ADDR);
        assert_eq!(defaults.instantiate(), second);
    }
}
