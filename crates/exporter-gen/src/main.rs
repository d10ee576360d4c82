//! exporter-gen - node exporter configuration generator
//!
//! Writes a native host agent config and a container compose manifest for
//! the services discovered on this host, binding the exporter's telemetry
//! endpoint to the service port.

mod config;
mod services;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use exporter_lib::{
    ConfigModels, Generator, HostIdentity, ServiceDescriptor, StaticHostname, SystemHostname,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Node exporter configuration generator
#[derive(Parser)]
#[command(name = "exporter-gen")]
#[command(author, version, about = "Node exporter configuration generator", long_about = None)]
pub struct Cli {
    /// Settings file (YAML, TOML or JSON)
    #[arg(long, short, env = "EXPORTER_GEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory the artifacts are written to (overrides settings)
    #[arg(long, short)]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate both exporter artifacts
    Generate {
        /// Services file listing discovered service ports
        #[arg(long = "services", short)]
        services_file: Option<PathBuf>,

        /// Service port, may be repeated
        #[arg(long = "port", short, value_parser = parse_port_arg)]
        ports: Vec<u16>,

        /// Host name to use instead of the operating system's
        #[arg(long)]
        hostname: Option<String>,

        /// Print the artifacts instead of writing them
        #[arg(long)]
        dry_run: bool,

        /// Read the artifacts back after writing and compare them
        #[arg(long)]
        verify: bool,
    },

    /// Read back previously generated artifacts
    Verify,
}

fn parse_port_arg(raw: &str) -> Result<u16, String> {
    exporter_lib::parse_port(raw).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut settings = config::GeneratorConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.output_dir {
        settings.output_dir = dir;
    }

    match cli.command {
        Commands::Generate {
            services_file,
            ports,
            hostname,
            dry_run,
            verify,
        } => {
            let mut descriptors = match &services_file {
                Some(path) => services::load_services(path)?,
                None => Vec::new(),
            };
            descriptors.extend(services::from_ports(&ports));

            let host: Box<dyn HostIdentity> = match hostname.or_else(|| settings.hostname.clone()) {
                Some(name) => Box::new(StaticHostname::new(name)),
                None => Box::new(SystemHostname),
            };

            generate(&settings, &descriptors, host.as_ref(), dry_run, verify)?;
        }
        Commands::Verify => {
            show(&settings)?;
        }
    }

    Ok(())
}

fn generate(
    settings: &config::GeneratorConfig,
    services: &[ServiceDescriptor],
    host: &dyn HostIdentity,
    dry_run: bool,
    verify: bool,
) -> Result<()> {
    if services.is_empty() {
        warn!("No services supplied, artifacts keep their default bindings");
    }

    let generator = Generator::new(settings.exporter_defaults(), settings.artifact_paths());

    if dry_run {
        let (native, container) = generator
            .render(services, host)
            .context("Failed to render exporter artifacts")?;
        println!("# {}", generator.paths().native.display());
        print!("{}", String::from_utf8_lossy(&native));
        println!("# {}", generator.paths().container.display());
        print!("{}", String::from_utf8_lossy(&container));
        return Ok(());
    }

    let report = generator
        .generate(services, host)
        .context("Failed to generate exporter configuration")?;

    info!(
        hostname = %report.hostname,
        ports = ?report.ports,
        bound_port = ?report.bound_port,
        native = %report.paths.native.display(),
        container = %report.paths.container.display(),
        "Generated exporter configuration"
    );

    if verify {
        match generator.verify(&report.models) {
            Ok(true) => info!("Verified written artifacts"),
            Ok(false) => warn!("Written artifacts do not match the generated configuration"),
            Err(e) => warn!(error = %e, "Could not verify written artifacts"),
        }
    }

    Ok(())
}

fn show(settings: &config::GeneratorConfig) -> Result<()> {
    let generator = Generator::new(settings.exporter_defaults(), settings.artifact_paths());
    let models = generator
        .read_back()
        .context("Failed to read back exporter artifacts")?;

    print_summary(&models);
    Ok(())
}

fn print_summary(models: &ConfigModels) {
    let native = &models.native;
    let service = models.container.service();

    println!("native:");
    println!("  services-where: {}", native.collector.service.services_where);
    println!("  telemetry.addr: {}", native.telemetry.addr);
    println!("  log.level: {}", native.log.level);
    println!("container:");
    println!("  hostname: {}", service.hostname);
    println!("  command: {}", service.command);
    println!("  ports: {}", service.ports.join(", "));
}
