//! DNS resolution behind a trait seam.

use crate::error::{LookupError, LookupResult};
use async_trait::async_trait;
use std::net::IpAddr;

/// Resolves a bare hostname to one IP address.
///
/// The orchestrator takes this as a trait object so tests can swap in
/// a fixed resolver without touching the network.
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Resolve a hostname to its first address.
    async fn resolve(&self, host: &str) -> LookupResult<IpAddr>;
}

/// System resolver using `tokio::net::lookup_host`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

#[async_trait]
impl HostResolver for SystemResolver {
    async fn resolve(&self, host: &str) -> LookupResult<IpAddr> {
        // Port 0 satisfies the socket-address form lookup_host wants
        let addr_str = format!("{host}:0");
        let mut addrs = tokio::net::lookup_host(&addr_str)
            .await
            .map_err(|e| LookupError::Dns(format!("{host}: {e}")))?;

        addrs
            .next()
            .map(|a| a.ip())
            .ok_or_else(|| LookupError::Dns(format!("no addresses for {host}")))
    }
}
