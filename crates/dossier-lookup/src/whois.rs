//! WHOIS lookup and response normalization.
//!
//! The raw response is a line-based `key: value` text. [`parse_whois`]
//! folds it into a [`WhoisMap`]: keys lowercased and underscored,
//! repeated keys promoted to lists, datetime-shaped values rewritten
//! to one canonical string form.

use crate::error::{LookupError, LookupResult};
use async_trait::async_trait;
use dossier_core::{WhoisMap, WhoisValue};
use std::collections::btree_map::Entry;

/// Issues a WHOIS query and returns the raw response text.
///
/// Trait seam: the orchestrator retries a failed host query against
/// the resolved IP, and tests script both outcomes.
#[async_trait]
pub trait WhoisProvider: Send + Sync {
    /// Query WHOIS for a domain or IP address.
    async fn lookup(&self, target: &str) -> LookupResult<String>;
}

/// WHOIS client backed by whois-rs with an embedded server list.
pub struct WhoisClient {
    whois: whois_rs::WhoIs,
}

impl WhoisClient {
    /// Create a client from the embedded TLD-to-server list.
    pub fn new() -> LookupResult<Self> {
        let whois = whois_rs::WhoIs::from_string(include_str!("whois_servers.json"))
            .map_err(|e| LookupError::Whois(e.to_string()))?;
        Ok(Self { whois })
    }
}

#[async_trait]
impl WhoisProvider for WhoisClient {
    async fn lookup(&self, target: &str) -> LookupResult<String> {
        let options = whois_rs::WhoIsLookupOptions::from_string(target)
            .map_err(|e| LookupError::Whois(e.to_string()))?;
        self.whois
            .lookup(options)
            .map_err(|e| LookupError::Whois(e.to_string()))
    }
}

/// Parse a raw WHOIS response into a normalized map.
///
/// Comment and disclaimer lines are skipped; everything else with a
/// `key: value` shape is kept.
#[must_use]
pub fn parse_whois(raw: &str) -> WhoisMap {
    let mut map = WhoisMap::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty()
            || line.starts_with('%')
            || line.starts_with('#')
            || line.starts_with(">>>")
        {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        let key = key.trim().to_lowercase().replace(' ', "_");
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        let value = normalize_datetime(value);

        match map.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(WhoisValue::Scalar(value));
            }
            Entry::Occupied(mut slot) => slot.get_mut().push(value),
        }
    }

    map
}

/// Rewrite datetime-shaped values to `YYYY-MM-DD HH:MM:SS`; anything
/// unrecognized passes through untouched.
fn normalize_datetime(value: &str) -> String {
    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return dt.naive_utc().format(FORMAT).to_string();
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return dt.format(FORMAT).to_string();
    }
    // Legacy registries: "14-aug-1995"
    if let Ok(date) = chrono::NaiveDate::parse_from_str(value, "%d-%b-%Y") {
        return date
            .and_hms_opt(0, 0, 0)
            .map_or_else(|| value.to_string(), |dt| dt.format(FORMAT).to_string());
    }

    value.to_string()
}

/// First scalar found under any of the candidate keys.
#[must_use]
pub fn whois_field<'a>(map: &'a WhoisMap, candidates: &[&str]) -> Option<&'a str> {
    candidates
        .iter()
        .find_map(|key| map.get(*key).and_then(WhoisValue::as_scalar))
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "\
% IANA WHOIS server
Domain Name: EXAMPLE.COM
Registrar: Example Registrar, LLC
Updated Date: 2024-08-14T07:01:44Z
Creation Date: 1995-08-14T04:00:00Z
Name Server: A.IANA-SERVERS.NET
Name Server: B.IANA-SERVERS.NET
Name Server: A.IANA-SERVERS.NET
Domain Status: clientDeleteProhibited
Domain Status: clientTransferProhibited
>>> Last update of whois database: 2024-08-20T04:00:00Z <<<
";

    #[test]
    fn keys_are_lowercased_and_underscored() {
        let map = parse_whois(RAW);
        assert_eq!(
            Some("EXAMPLE.COM"),
            whois_field(&map, &["domain_name"]),
        );
        assert_eq!(
            Some("Example Registrar, LLC"),
            whois_field(&map, &["registrar"]),
        );
    }

    #[test]
    fn repeated_keys_fold_into_deduplicated_lists() {
        let map = parse_whois(RAW);
        let servers = map.get("name_server").unwrap();
        assert_eq!(
            &WhoisValue::List(vec![
                WhoisValue::from("A.IANA-SERVERS.NET"),
                WhoisValue::from("B.IANA-SERVERS.NET"),
            ]),
            servers
        );
    }

    #[test]
    fn datetimes_are_normalized() {
        let map = parse_whois(RAW);
        assert_eq!(
            Some("1995-08-14 04:00:00"),
            whois_field(&map, &["creation_date"]),
        );
    }

    #[test]
    fn legacy_date_form_is_normalized() {
        assert_eq!("1995-08-14 00:00:00", normalize_datetime("14-aug-1995"));
    }

    #[test]
    fn non_dates_pass_through() {
        assert_eq!("whois.iana.org", normalize_datetime("whois.iana.org"));
    }

    #[test]
    fn comment_and_marker_lines_are_skipped() {
        let map = parse_whois(RAW);
        assert!(map.keys().all(|k| !k.contains("last_update")));
        assert!(map.keys().all(|k| !k.starts_with('%')));
    }

    #[test]
    fn field_lookup_tries_candidates_in_order() {
        let mut map = WhoisMap::new();
        map.insert("registrant_city".to_string(), WhoisValue::from("Reykjavik"));
        assert_eq!(
            Some("Reykjavik"),
            whois_field(&map, &["city", "registrant_city"]),
        );
        assert_eq!(None, whois_field(&map, &["state", "registrant_state"]));
    }
}
