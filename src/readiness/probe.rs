//! Reachability probes.

use std::fmt;
use std::future::Future;
use std::io;

use tokio::net::TcpStream;

use crate::config::{DatabaseConfig, ServiceConfig};

/// A named `(host, port)` pair to wait for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub host: String,
    pub port: u16,
}

impl Target {
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
        }
    }

    /// The database target, named after its kind.
    pub fn database(config: &DatabaseConfig) -> Self {
        Self::new(config.kind.to_string(), config.host.clone(), config.port)
    }
}

impl From<&ServiceConfig> for Target {
    fn from(service: &ServiceConfig) -> Self {
        Self::new(service.name.clone(), service.host.clone(), service.port)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// One reachability attempt against a target.
pub trait Probe {
    fn probe(&self, target: &Target) -> impl Future<Output = io::Result<()>>;
}

impl<P: Probe + ?Sized> Probe for &P {
    fn probe(&self, target: &Target) -> impl Future<Output = io::Result<()>> {
        (**self).probe(target)
    }
}

/// Succeeds when a TCP connection can be established.
///
/// The connection is closed immediately; no bytes are exchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProbe;

impl Probe for TcpProbe {
    async fn probe(&self, target: &Target) -> io::Result<()> {
        let stream = TcpStream::connect((target.host.as_str(), target.port)).await?;
        drop(stream);
        Ok(())
    }
}
