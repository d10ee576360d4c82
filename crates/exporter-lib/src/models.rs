//! Core data models consumed by the generator

use crate::error::{ExportError, ExportResult};
use serde::{de, Deserialize, Deserializer, Serialize};

/// A discovered service endpoint to be monitored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Optional service name, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Network port of the service
    #[serde(
        alias = "node_port",
        alias = "nodePort",
        deserialize_with = "deserialize_port"
    )]
    pub port: u16,
}

impl ServiceDescriptor {
    pub fn new(port: u16) -> Self {
        Self { name: None, port }
    }
}

/// Parse a service port given as text, e.g. on the command line
///
/// Surrounding whitespace is ignored. Port 0 is rejected since it does not
/// identify a listening service.
pub fn parse_port(raw: &str) -> ExportResult<u16> {
    let text = raw.trim();
    match text.parse::<u16>() {
        Ok(0) => Err(ExportError::InvalidPort(format!("{:?} is not a service port", raw))),
        Ok(port) => Ok(port),
        Err(e) => Err(ExportError::InvalidPort(format!("{:?}: {}", raw, e))),
    }
}

/// Accepts either a string or an integer port
fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPort {
        Number(i64),
        Text(String),
    }

    match RawPort::deserialize(deserializer)? {
        RawPort::Number(n) => parse_port(&n.to_string()).map_err(de::Error::custom),
        RawPort::Text(s) => parse_port(&s).map_err(de::Error::custom),
    }
}
