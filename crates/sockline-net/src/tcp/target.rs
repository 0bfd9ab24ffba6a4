//! Connection identity: the host and port a client connects to.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SocketError};

/// The remote endpoint a client targets.
///
/// Host and port are always replaced together.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionTarget {
    /// Hostname or textual address of the remote endpoint.
    pub host: String,
    /// Remote port, 1 to 65535.
    pub port: u16,
}

impl ConnectionTarget {
    /// Create a target, validating the host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let target = Self {
            host: host.into(),
            port,
        };
        target.validate()?;
        Ok(target)
    }

    /// Target derived from a socket address.
    pub fn from_endpoint(endpoint: SocketAddr) -> Self {
        Self::from_address(endpoint.ip(), endpoint.port())
    }

    /// Target derived from an IP address and port.
    pub fn from_address(address: IpAddr, port: u16) -> Self {
        Self {
            host: address.to_string(),
            port,
        }
    }

    /// Whether both host and port are set to usable values.
    pub fn is_complete(&self) -> bool {
        !self.host.trim().is_empty() && self.port != 0
    }

    /// Check the target before a connect attempt.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(SocketError::InvalidArgument("host"));
        }
        if self.port == 0 {
            return Err(SocketError::InvalidArgument("port"));
        }
        Ok(())
    }

    /// The `host:port` form, bracketing IPv6 literals.
    pub fn address(&self) -> String {
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(ip)) => format!("[{}]:{}", ip, self.port),
            _ => format!("{}:{}", self.host, self.port),
        }
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv6Addr;

    #[test]
    fn test_new_validates() {
        assert!(ConnectionTarget::new("example.com", 80).is_ok());
        assert!(matches!(
            ConnectionTarget::new("", 80),
            Err(SocketError::InvalidArgument("host"))
        ));
        assert!(matches!(
            ConnectionTarget::new("example.com", 0),
            Err(SocketError::InvalidArgument("port"))
        ));
    }

    #[test]
    fn test_default_is_incomplete() {
        assert!(!ConnectionTarget::default().is_complete());
    }

    #[test]
    fn test_from_endpoint() {
        let target = ConnectionTarget::from_endpoint("10.0.0.7:8080".parse().unwrap());
        assert_eq!(target.host, "10.0.0.7");
        assert_eq!(target.port, 8080);
        assert_eq!(target.address(), "10.0.0.7:8080");
    }

    #[test]
    fn test_ipv6_address_is_bracketed() {
        let target = ConnectionTarget::from_address(IpAddr::V6(Ipv6Addr::LOCALHOST), 443);
        assert_eq!(target.host, "::1");
        assert_eq!(target.to_string(), "[::1]:443");
    }
}
