//! Compose manifest for the containerized exporter

use super::{bind_address, LISTEN_ADDRESS_FLAG};
use serde::{Deserialize, Serialize};

/// Container deployment configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerAgentConfig {
    /// Compose schema version
    pub version: String,
    pub services: ComposeServices,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeServices {
    #[serde(rename = "node-exporter")]
    pub node_exporter: NodeExporterService,
}

/// The node exporter service entry of the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeExporterService {
    pub image: String,
    pub container_name: String,
    pub command: String,
    #[serde(default)]
    pub volumes: Vec<String>,
    pub hostname: String,
    pub restart: String,
    /// `<host>:<container>` port mappings, one per distinct port
    #[serde(default)]
    pub ports: Vec<String>,
}

impl ContainerAgentConfig {
    pub fn service(&self) -> &NodeExporterService {
        &self.services.node_exporter
    }

    pub fn set_hostname(&mut self, host_identity: &str) {
        self.services.node_exporter.hostname = host_identity.to_string();
    }

    /// Point the exporter command line at `port`
    pub fn bind_listen_address(&mut self, port: u16) {
        self.services.node_exporter.command =
            format!("{}={}", LISTEN_ADDRESS_FLAG, bind_address(port));
    }

    /// Publish `port` on the host. Returns false if the mapping already exists.
    pub fn map_port(&mut self, port: u16) -> bool {
        let mapping = format!("{}:{}", port, port);
        let ports = &mut self.services.node_exporter.ports;
        if ports.contains(&mapping) {
            return false;
        }
        ports.push(mapping);
        true
    }
}
