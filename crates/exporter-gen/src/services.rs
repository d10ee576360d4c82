//! Service descriptor input

use anyhow::{Context, Result};
use exporter_lib::ServiceDescriptor;
use serde::Deserialize;
use std::path::Path;

/// Accepted shapes of a services file
#[derive(Deserialize)]
#[serde(untagged)]
enum ServicesFile {
    List(Vec<ServiceDescriptor>),
    Wrapped { services: Vec<ServiceDescriptor> },
}

impl From<ServicesFile> for Vec<ServiceDescriptor> {
    fn from(file: ServicesFile) -> Self {
        match file {
            ServicesFile::List(services) | ServicesFile::Wrapped { services } => services,
        }
    }
}

/// Load service descriptors from a JSON (`.json`) or YAML file
pub fn load_services(path: &Path) -> Result<Vec<ServiceDescriptor>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read services file {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let file: ServicesFile = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse services file {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse services file {}", path.display()))?
    };

    Ok(file.into())
}

/// Descriptors for ports given on the command line
pub fn from_ports(ports: &[u16]) -> Vec<ServiceDescriptor> {
    ports.iter().copied().map(ServiceDescriptor::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_yaml_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("services.yml");
        fs::write(&path, "- name: api\n  port: 9100\n- port: \"9200\"\n").unwrap();

        let services = load_services(&path).unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].name.as_deref(), Some("api"));
        assert_eq!(services[1].port, 9200);
    }

    #[test]
    fn test_invalid_port_in_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("services.yml");
        fs::write(&path, "- port: \"70000\"\n- port: abc\n").unwrap();

        assert!(load_services(&path).is_err());
    }

    #[test]
    fn test_load_wrapped_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("services.json");
        fs::write(&path, r#"{"services": [{"nodePort": "9100"}, {"port": 9100}]}"#).unwrap();

        let services = load_services(&path).unwrap();
        assert_eq!(services, vec![ServiceDescriptor::new(9100), ServiceDescriptor::new(9100)]);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("services.json");
        fs::write(&path, "not json").unwrap();

        let err = load_services(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("services.json"));
    }

    #[test]
    fn test_from_ports() {
        let services = from_ports(&[9100, 9200]);
        assert_eq!(services[1].port, 9200);
    }
}
