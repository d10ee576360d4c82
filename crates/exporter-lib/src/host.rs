//! Host identity lookup

use crate::error::{ExportError, ExportResult};

/// Source of the name identifying this host
pub trait HostIdentity {
    /// Resolve the host name
    fn hostname(&self) -> ExportResult<String>;
}

/// Resolves the host name from the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHostname;

impl HostIdentity for SystemHostname {
    fn hostname(&self) -> ExportResult<String> {
        let name = hostname::get()
            .map_err(|e| ExportError::HostIdentityUnavailable(e.to_string()))?
            .into_string()
            .map_err(|raw| {
                ExportError::HostIdentityUnavailable(format!(
                    "host name is not valid UTF-8: {:?}",
                    raw
                ))
            })?;

        if name.trim().is_empty() {
            return Err(ExportError::HostIdentityUnavailable(
                "operating system returned an empty host name".to_string(),
            ));
        }
        Ok(name)
    }
}

/// A fixed host name, e.g. supplied by an operator override
#[derive(Debug, Clone)]
pub struct StaticHostname(String);

impl StaticHostname {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl HostIdentity for StaticHostname {
    fn hostname(&self) -> ExportResult<String> {
        let name = self.0.trim();
        if name.is_empty() {
            return Err(ExportError::HostIdentityUnavailable(
                "configured host name is empty".to_string(),
            ));
        }
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_hostname() {
        assert_eq!(StaticHostname::new(" web-01 ").hostname().unwrap(), "web-01");
    }

    #[test]
    fn test_empty_static_hostname_unavailable() {
        let err = StaticHostname::new("  ").hostname().unwrap_err();
        assert!(matches!(err, ExportError::HostIdentityUnavailable(_)));
    }

    #[test]
    fn test_system_hostname_resolves() {
        // Every test environment has some host name
        assert!(!SystemHostname.hostname().unwrap().is_empty());
    }
}
