//! Map links and thumbnail derived from WHOIS and geolocation data.
//!
//! Two independent halves: an embed URL composed from the WHOIS
//! address fields, and an interactive map URL plus a downloaded tile
//! thumbnail from the geolocated coordinates. The tile path is scraped
//! out of a search-result page; when the marker is missing the step
//! fails with [`LookupError::Hiccup`] and the orchestrator retries
//! once.

use crate::error::{LookupError, LookupResult};
use crate::fetch::{FetchRequest, Fetcher};
use crate::geo;
use crate::whois::whois_field;
use dossier_core::{GeoMaps, WhoisMap};
use regex::Regex;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Filename of the downloaded map thumbnail inside the cache directory
pub const THUMBNAIL_NAME: &str = "location.jpg";

fn tile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"/maps/vt[^"\\]*"#).expect("static regex"))
}

/// Compose a postal search string from WHOIS address fields.
///
/// `address + zipcode` when both are present; otherwise a comma-join
/// of whichever of city/state/country exist.
#[must_use]
pub fn compose_whois_address(whois: &WhoisMap) -> Option<String> {
    let address = whois_field(whois, &["address", "registrant_street"]);
    let zipcode = whois_field(whois, &["zipcode", "registrant_postal_code"]);

    if let (Some(address), Some(zipcode)) = (address, zipcode) {
        return Some(format!("{address} {zipcode}"));
    }

    let parts: Vec<&str> = [
        whois_field(whois, &["city", "registrant_city"]),
        whois_field(whois, &["state", "registrant_state_province", "registrant_state"]),
        whois_field(whois, &["country", "registrant_country"]),
    ]
    .into_iter()
    .flatten()
    .collect();

    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Static-map embed URL for a composed address.
#[must_use]
pub fn whois_embed_url(address: &str) -> String {
    format!(
        "https://maps.google.com/maps?width=100%&height=600&q={address}&ie=UTF8&t=&z=7&iwloc=B&output=embed"
    )
}

/// Interactive map URL centered on coordinates.
#[must_use]
pub fn geo_map_url(lat: &str, lon: &str) -> String {
    format!("https://www.google.com/maps/@?api=1&map_action=map&center={lat}, {lon}&zoom=13")
}

/// Build both map links, downloading the coordinate tile thumbnail
/// into `directory` when geolocation data is available.
///
/// The WHOIS half never touches the network. The geo half scrapes the
/// search page for a `/maps/vt...` tile path; an absent marker is a
/// [`LookupError::Hiccup`].
pub async fn gather_geo_maps(
    fetcher: &Fetcher,
    search_base: &str,
    whois: Option<&WhoisMap>,
    geo_location: Option<&Map<String, Value>>,
    directory: &Path,
) -> LookupResult<GeoMaps> {
    let mut maps = GeoMaps::default();

    if let Some(whois) = whois {
        if let Some(address) = compose_whois_address(whois) {
            maps.whois_map_embed_url = Some(whois_embed_url(&address));
        }
    }

    if let Some(geo) = geo_location {
        let (Some(lat), Some(lon)) = (geo::coordinate(geo, "lat"), geo::coordinate(geo, "lon"))
        else {
            debug!("geolocation data has no usable coordinates, skipping map tile");
            return Ok(maps);
        };

        let query = FetchRequest::new(format!("{search_base}/search?q={lat},{lon}"));
        let page = fetcher.get(&query).await?;

        let tile_path = tile_pattern()
            .find(&page.text())
            .ok_or(LookupError::Hiccup)?
            .as_str()
            .to_string();

        let tile = fetcher
            .get(&FetchRequest::new(format!("{search_base}{tile_path}")))
            .await?;
        std::fs::write(directory.join(THUMBNAIL_NAME), &tile.bytes)?;

        maps.geo_map_url = Some(geo_map_url(&lat, &lon));
    }

    Ok(maps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_core::WhoisValue;

    fn whois_of(pairs: &[(&str, &str)]) -> WhoisMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), WhoisValue::from(*v)))
            .collect()
    }

    #[test]
    fn address_prefers_street_plus_zipcode() {
        let whois = whois_of(&[
            ("address", "4676 Admiralty Way"),
            ("zipcode", "90292"),
            ("city", "Marina del Rey"),
            ("country", "US"),
        ]);
        assert_eq!(
            Some("4676 Admiralty Way 90292".to_string()),
            compose_whois_address(&whois)
        );
    }

    #[test]
    fn address_falls_back_to_city_state_country() {
        let whois = whois_of(&[
            ("city", "Marina del Rey"),
            ("state", "CA"),
            ("country", "US"),
        ]);
        assert_eq!(
            Some("Marina del Rey, CA, US".to_string()),
            compose_whois_address(&whois)
        );
    }

    #[test]
    fn absent_parts_are_skipped_in_the_join() {
        let whois = whois_of(&[("city", "Reykjavik"), ("country", "IS")]);
        assert_eq!(
            Some("Reykjavik, IS".to_string()),
            compose_whois_address(&whois)
        );

        let country_only = whois_of(&[("country", "IS")]);
        assert_eq!(Some("IS".to_string()), compose_whois_address(&country_only));
    }

    #[test]
    fn no_address_data_composes_nothing() {
        assert_eq!(None, compose_whois_address(&whois_of(&[("registrar", "X")])));
    }

    #[test]
    fn registrant_prefixed_fields_are_recognized() {
        let whois = whois_of(&[
            ("registrant_city", "Los Angeles"),
            ("registrant_country", "US"),
        ]);
        assert_eq!(
            Some("Los Angeles, US".to_string()),
            compose_whois_address(&whois)
        );
    }

    #[test]
    fn tile_pattern_stops_at_quotes() {
        let html = r#"<img src="/maps/vt/pb=!1m4!2m1" alt="">"#;
        assert_eq!("/maps/vt/pb=!1m4!2m1", tile_pattern().find(html).unwrap().as_str());
    }
}
