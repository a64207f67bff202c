//! dossier - domain intelligence gatherer
//!
//! Gathers OSINT about a domain, caches it, and renders an HTML report.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dossier_cli::run().await
}
