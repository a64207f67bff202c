//! The orchestrated run: twelve lookups, one document.
//!
//! Steps execute strictly in order and write into the document as they
//! go, so later steps can read earlier results (the map step consumes
//! the WHOIS and geolocation fields). Failure policy is per step: only
//! an unresolvable host aborts the run; everything from the
//! estimated-size scrape onward degrades to an absent marker and the
//! run continues.

use crate::cache::ReportStore;
use crate::dns::{HostResolver, SystemResolver};
use crate::error::LookupError;
use crate::fetch::{FetchRequest, FetchResponse, Fetcher};
use crate::whois::{parse_whois, WhoisClient, WhoisProvider};
use crate::{geo, maps, robots, search, tech};
use dossier_core::{
    normalize_to_host, DossierError, Estimate, GeoMaps, ReportDocument, Result, WhoisMap,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Delay before the single map-tile retry
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Gathers the full intelligence document for one domain.
pub struct InfoGatherer {
    url: String,
    host: String,
    store: ReportStore,
    fetcher: Fetcher,
    resolver: Box<dyn HostResolver>,
    whois: Option<Box<dyn WhoisProvider>>,
    search_base: String,
    geo_base: String,
    site_base: String,
    retry_delay: Duration,
}

impl std::fmt::Debug for InfoGatherer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfoGatherer")
            .field("url", &self.url)
            .field("host", &self.host)
            .field("store", &self.store)
            .field("search_base", &self.search_base)
            .field("geo_base", &self.geo_base)
            .field("site_base", &self.site_base)
            .field("retry_delay", &self.retry_delay)
            .finish_non_exhaustive()
    }
}

impl InfoGatherer {
    /// Start building a gatherer for the given URL.
    #[must_use]
    pub fn builder(url: impl Into<String>) -> InfoGathererBuilder {
        InfoGathererBuilder::new(url)
    }

    /// The URL this gatherer was created with.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The per-domain cache directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        self.store.directory()
    }

    /// True when a cached document was loaded at construction.
    #[must_use]
    pub const fn cached(&self) -> bool {
        self.store.loaded()
    }

    /// Run all lookups and persist the document.
    ///
    /// On a loaded cache this returns the cached document unchanged
    /// with zero network I/O; calling it again returns the same value.
    pub async fn run(&mut self) -> Result<ReportDocument> {
        if let Some(cached) = self.store.document() {
            debug!(url = %self.url, "cache hit, skipping all lookups");
            return Ok(cached.clone());
        }

        let mut doc = ReportDocument::new(self.url.clone());
        info!(host = %self.host, "gathering report");

        // The one fatal lookup: a host that does not resolve means a
        // bad or unreachable domain, and nothing gets cached.
        let ip = self
            .resolver
            .resolve(&self.host)
            .await
            .map_err(|e| DossierError::UnresolvableHost(format!("{}: {e}", self.host)))?;
        let ip = ip.to_string();
        doc.ip = Some(ip.clone());

        // Homepage fetch feeds both the title and the tech fingerprint;
        // its failure propagates, it is expected to work once the host
        // resolved.
        let homepage = self
            .fetcher
            .get(&FetchRequest::new(self.site_base.clone()))
            .await
            .map_err(DossierError::from)?;
        doc.title = search::extract_title(&homepage.text());

        doc.estimated = Some(self.estimated_step().await);
        doc.potential_api = self.potential_api_step().await;
        doc.news_url = Some(search::news_query_url(&self.search_base, &self.host));
        doc.whois = self.whois_step(&ip).await;
        doc.geo_location = self.geo_step(&ip).await;

        let geo_maps = self
            .maps_step(doc.whois.as_ref(), doc.geo_location.as_ref())
            .await;
        doc.geo_maps = Some(geo_maps);

        doc.builtwith = Some(self.tech_step(&homepage));
        doc.robots = self.robots_step().await;
        doc.sitemap =
            robots::discover_sitemap(&self.fetcher, &self.site_base, doc.robots.as_deref()).await;
        doc.wiki = self.wiki_step().await;

        self.store.persist(&doc)?;
        info!(path = %self.store.directory().display(), "report persisted");
        Ok(doc)
    }

    /// Result-count estimate; any failure is recorded in the document
    /// instead of aborting.
    async fn estimated_step(&self) -> Estimate {
        let query_url = search::size_query_url(&self.search_base, &self.host);
        let result = match self.fetcher.get(&FetchRequest::new(query_url.clone())).await {
            Ok(page) => search::extract_result_count(&page.text()),
            Err(e) => Err(e),
        };

        match result {
            Ok(count) => Estimate::Hits { query_url, count },
            Err(e) => {
                let error =
                    format!("Possible Google structure change: estimated size lookup failed: {e}");
                warn!("{error}");
                Estimate::Error { error }
            }
        }
    }

    /// First result for "api <host>", kept only when it shares the
    /// domain. Empty or broken results both degrade to absent.
    async fn potential_api_step(&self) -> Option<String> {
        let query_url = search::api_query_url(&self.search_base, &self.host);
        let page = match self.fetcher.get(&FetchRequest::new(query_url)).await {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "potential-API search failed");
                return None;
            }
        };

        match search::extract_first_cite(&page.text()) {
            Ok(cite) if cite.contains(&self.host) => Some(cite),
            Ok(_) => {
                debug!(host = %self.host, "first API result is off-domain, treating as none");
                None
            }
            Err(e) => {
                warn!(error = %e, "potential-API scrape failed");
                None
            }
        }
    }

    /// WHOIS on the host, retried once against the resolved IP.
    async fn whois_step(&self, ip: &str) -> Option<WhoisMap> {
        let provider = self.whois.as_ref()?;

        match provider.lookup(&self.host).await {
            Ok(raw) => Some(parse_whois(&raw)),
            Err(e) => {
                debug!(error = %e, "WHOIS on host failed, retrying against IP");
                match provider.lookup(ip).await {
                    Ok(raw) => Some(parse_whois(&raw)),
                    Err(e) => {
                        debug!(error = %e, "WHOIS on IP failed too");
                        None
                    }
                }
            }
        }
    }

    /// Geolocation; an explicit upstream "fail" is a quiet absence, a
    /// contract violation is warned about and still leaves the field
    /// unset.
    async fn geo_step(&self, ip: &str) -> Option<serde_json::Map<String, serde_json::Value>> {
        match geo::lookup(&self.fetcher, &self.geo_base, ip).await {
            Ok(Some(map)) => Some(map),
            Ok(None) => {
                debug!(ip = %ip, "geo API has no data for this address");
                None
            }
            Err(e) => {
                warn!(error = %e, "geolocation API may have changed contract or is down");
                None
            }
        }
    }

    /// Map links, with the single fixed-delay retry on a tile-marker
    /// hiccup.
    async fn maps_step(
        &self,
        whois: Option<&WhoisMap>,
        geo_location: Option<&serde_json::Map<String, serde_json::Value>>,
    ) -> GeoMaps {
        let attempt = || {
            maps::gather_geo_maps(
                &self.fetcher,
                &self.search_base,
                whois,
                geo_location,
                self.store.directory(),
            )
        };

        match attempt().await {
            Ok(maps) => maps,
            Err(LookupError::Hiccup) => {
                debug!(delay = ?self.retry_delay, "map tile marker missing, retrying once");
                tokio::time::sleep(self.retry_delay).await;
                match attempt().await {
                    Ok(maps) => maps,
                    Err(e) => {
                        warn!(error = %e, "map lookup failed twice, recording no maps");
                        GeoMaps::default()
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "map lookup failed, recording no maps");
                GeoMaps::default()
            }
        }
    }

    fn tech_step(&self, homepage: &FetchResponse) -> std::collections::BTreeMap<String, Vec<String>> {
        let found = tech::detect(homepage);
        debug!(categories = found.len(), "technology fingerprint complete");
        found
    }

    async fn robots_step(&self) -> Option<String> {
        match robots::fetch_robots(&self.fetcher, &self.site_base).await {
            Ok(text) => Some(text),
            Err(e) => {
                debug!(error = %e, "no robots.txt");
                None
            }
        }
    }

    /// First Wikipedia result link, absent when there is none.
    async fn wiki_step(&self) -> Option<String> {
        let query_url = search::wiki_query_url(&self.search_base, &self.host);
        let page = match self.fetcher.get(&FetchRequest::new(query_url)).await {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "wiki search failed");
                return None;
            }
        };

        match search::extract_first_link(&page.text()) {
            Ok(link) => link,
            Err(e) => {
                warn!(error = %e, "wiki scrape failed");
                None
            }
        }
    }
}

/// Builder for an [`InfoGatherer`].
///
/// The base-URL overrides and the resolver/WHOIS seams exist for
/// testing against local servers; defaults hit the real upstreams.
pub struct InfoGathererBuilder {
    url: String,
    output_root: Option<PathBuf>,
    search_base: String,
    geo_base: String,
    site_base: Option<String>,
    retry_delay: Duration,
    resolver: Option<Box<dyn HostResolver>>,
    whois: Option<Box<dyn WhoisProvider>>,
}

impl InfoGathererBuilder {
    /// Create a builder for the given URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            output_root: None,
            search_base: search::DEFAULT_BASE_URL.to_string(),
            geo_base: geo::DEFAULT_BASE_URL.to_string(),
            site_base: None,
            retry_delay: DEFAULT_RETRY_DELAY,
            resolver: None,
            whois: None,
        }
    }

    /// Use an existing directory as the output root instead of
    /// `./output`.
    #[must_use]
    pub fn output_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_root = Some(path.into());
        self
    }

    /// Override the search-engine base URL.
    #[must_use]
    pub fn search_base_url(mut self, url: impl Into<String>) -> Self {
        self.search_base = url.into();
        self
    }

    /// Override the geo-IP API base URL.
    #[must_use]
    pub fn geo_base_url(mut self, url: impl Into<String>) -> Self {
        self.geo_base = url.into();
        self
    }

    /// Override the target-site base URL (defaults to `http://<host>`).
    #[must_use]
    pub fn site_base_url(mut self, url: impl Into<String>) -> Self {
        self.site_base = Some(url.into());
        self
    }

    /// Override the delay before the single map-tile retry.
    #[must_use]
    pub const fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Swap in a custom host resolver.
    #[must_use]
    pub fn resolver(mut self, resolver: Box<dyn HostResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Swap in a custom WHOIS provider.
    #[must_use]
    pub fn whois_provider(mut self, provider: Box<dyn WhoisProvider>) -> Self {
        self.whois = Some(provider);
        self
    }

    /// Open the cache store and finish the gatherer. Setup errors
    /// (invalid output path, corrupt cache) surface here, before any
    /// lookup runs.
    pub fn build(self) -> Result<InfoGatherer> {
        let store = ReportStore::open(&self.url, self.output_root.as_deref())?;
        let fetcher = Fetcher::new().map_err(DossierError::from)?;
        let host = normalize_to_host(&self.url);
        let site_base = self
            .site_base
            .unwrap_or_else(|| format!("http://{host}"));

        let whois = match self.whois {
            Some(provider) => Some(provider),
            None => match WhoisClient::new() {
                Ok(client) => Some(Box::new(client) as Box<dyn WhoisProvider>),
                Err(e) => {
                    warn!(error = %e, "WHOIS client unavailable, lookups will record no data");
                    None
                }
            },
        };

        Ok(InfoGatherer {
            url: self.url,
            host,
            store,
            fetcher,
            resolver: self.resolver.unwrap_or_else(|| Box::new(SystemResolver)),
            whois,
            search_base: self.search_base,
            geo_base: self.geo_base,
            site_base,
            retry_delay: self.retry_delay,
        })
    }
}
