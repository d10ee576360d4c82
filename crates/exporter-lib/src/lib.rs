//! Node exporter configuration synthesis
//!
//! This crate provides the core functionality for:
//! - Modelling native (host agent) and containerized exporter configurations
//! - Binding the exporter's telemetry endpoint to discovered service ports
//! - YAML encoding and in-place decoding of configuration artifacts
//! - Persisting artifacts and reading them back for verification

pub mod codec;
pub mod error;
pub mod exporter;
pub mod generator;
pub mod host;
pub mod models;
pub mod store;
pub mod synth;

pub use error::{ExportError, ExportResult};
pub use exporter::{ConfigModels, ContainerAgentConfig, ExporterDefaults, LogLevel, NativeAgentConfig};
pub use generator::{ArtifactPaths, GenerationReport, Generator};
pub use host::{HostIdentity, StaticHostname, SystemHostname};
pub use models::*;
pub use store::ArtifactStore;
pub use synth::{distinct_ports, ConfigSynthesizer, Synthesis};
