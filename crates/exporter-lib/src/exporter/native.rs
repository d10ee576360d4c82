//! Configuration for the exporter running directly on the host

use serde::{Deserialize, Serialize};
use std::fmt;

/// Native host agent configuration
///
/// Serialized as a nested document with the keys `collectors`, `collector`,
/// `log`, `scrape` and `telemetry`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeAgentConfig {
    pub collectors: Collectors,
    pub collector: CollectorSettings,
    pub log: LogSettings,
    pub scrape: ScrapeSettings,
    pub telemetry: Telemetry,
}

/// Enabled collector selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collectors {
    /// Comma-joined collector names
    pub enabled: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorSettings {
    pub service: ServiceCollector,
}

/// Settings for the OS service collector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServiceCollector {
    /// Predicate selecting which OS services are watched
    pub services_where: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    pub level: LogLevel,
}

/// Exporter log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScrapeSettings {
    /// Seconds subtracted from the scrape timeout
    pub timeout_margin: f64,
}

/// Metrics endpoint served by the exporter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Telemetry {
    /// Bind address in the form `:<port>`
    pub addr: String,
    pub path: String,
    pub max_requests: u32,
}

impl NativeAgentConfig {
    /// Restrict the service collector to services named after `host_identity`
    pub fn scope_to_host(&mut self, host_identity: &str) {
        self.collector.service.services_where = format!("Name='{}'", host_identity);
    }

    /// Serve telemetry on `port`
    pub fn bind_telemetry(&mut self, port: u16) {
        self.telemetry.addr = super::bind_address(port);
    }
}
