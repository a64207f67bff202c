use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::whois::WhoisMap;

/// Aggregate intelligence gathered for one domain.
///
/// Every field except `url` starts out absent and is filled in by the
/// orchestrated run. None of the fields use `skip_serializing_if`: a
/// persisted document always carries every key, with explicit `null`
/// for values the run could not obtain. The persisted JSON is the
/// durable representation; a cache hit re-loads it byte-for-byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    /// The URL the run was started with, as given
    pub url: String,

    /// Resolved IPv4/IPv6 literal
    #[serde(default)]
    pub ip: Option<String>,

    /// Homepage `<title>` text
    #[serde(default)]
    pub title: Option<String>,

    /// Search-engine `site:` result-count estimate
    #[serde(default)]
    pub estimated: Option<Estimate>,

    /// First search result for "api <host>" when it shares the domain
    #[serde(default)]
    pub potential_api: Option<String>,

    /// Templated news search URL (never fetched)
    #[serde(default)]
    pub news_url: Option<String>,

    /// Flattened WHOIS record
    #[serde(default)]
    pub whois: Option<WhoisMap>,

    /// Raw geo-IP API response object
    #[serde(default)]
    pub geo_location: Option<serde_json::Map<String, serde_json::Value>>,

    /// Map links derived from WHOIS and geolocation data
    #[serde(default)]
    pub geo_maps: Option<GeoMaps>,

    /// Technology fingerprint: category to detected technologies
    #[serde(default)]
    pub builtwith: Option<BTreeMap<String, Vec<String>>>,

    /// Raw robots.txt text
    #[serde(default)]
    pub robots: Option<String>,

    /// Declared or guessed sitemap URL, validated for reachability
    #[serde(default)]
    pub sitemap: Option<String>,

    /// First Wikipedia search result link
    #[serde(default)]
    pub wiki: Option<String>,
}

impl ReportDocument {
    /// Create an empty document for the given URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ip: None,
            title: None,
            estimated: None,
            potential_api: None,
            news_url: None,
            whois: None,
            geo_location: None,
            geo_maps: None,
            builtwith: None,
            robots: None,
            sitemap: None,
            wiki: None,
        }
    }
}

/// Outcome of the estimated-size scrape.
///
/// Scrape failures are recorded in the document rather than aborting
/// the run, so "the scraper broke" stays distinguishable from "no
/// data" when re-reading a cached report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Estimate {
    /// The result count reported for the `site:` query
    Hits {
        /// The exact query URL the count came from
        query_url: String,
        /// Parsed result count
        count: u64,
    },
    /// The scrape failed; the message explains how
    Error {
        /// Failure description
        error: String,
    },
}

/// Map links for the two location sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoMaps {
    /// Static-map embed URL composed from the WHOIS address fields
    #[serde(default)]
    pub whois_map_embed_url: Option<String>,

    /// Interactive map URL centered on the geolocated coordinates
    #[serde(default)]
    pub geo_map_url: Option<String>,
}
