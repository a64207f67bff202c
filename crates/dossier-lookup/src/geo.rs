//! Geo-IP lookup.
//!
//! The upstream API reports its own failures in-band with a `status`
//! field. That gives three distinct outcomes: located, explicitly not
//! found, and "the response no longer looks like the API we know" —
//! the last one is an error so the caller can warn about it instead of
//! silently recording an absence.

use crate::error::{LookupError, LookupResult};
use crate::fetch::{FetchRequest, Fetcher};
use serde_json::{Map, Value};

/// Default geo-IP API base URL
pub const DEFAULT_BASE_URL: &str = "http://extreme-ip-lookup.com";

/// Look up geolocation data for an IP.
///
/// Returns `Ok(None)` when the API reports `status: fail` for the
/// address, `Err(ApiContract)` when the response is not the shape the
/// API documents.
pub async fn lookup(
    fetcher: &Fetcher,
    base_url: &str,
    ip: &str,
) -> LookupResult<Option<Map<String, Value>>> {
    let request = FetchRequest::new(format!("{base_url}/json/{ip}"));
    let response = fetcher.get(&request).await?;

    let value: Value = serde_json::from_str(&response.text())
        .map_err(|e| LookupError::ApiContract(format!("geo response is not JSON: {e}")))?;
    let Value::Object(map) = value else {
        return Err(LookupError::ApiContract(
            "geo response is not a JSON object".to_string(),
        ));
    };

    match map.get("status").and_then(Value::as_str) {
        Some("fail") => Ok(None),
        Some(_) => Ok(Some(map)),
        None => Err(LookupError::ApiContract(
            "geo response has no status field".to_string(),
        )),
    }
}

/// Stringified coordinate field (`lat`/`lon`) from a geo response.
/// The API has served both string and numeric forms.
#[must_use]
pub fn coordinate(geo: &Map<String, Value>, key: &str) -> Option<String> {
    match geo.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn success_status_returns_the_object() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/93.184.216.34"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"status":"success","lat":"34.05223","lon":"-118.24368","country":"United States"}"#,
            ))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let geo = lookup(&fetcher, &server.uri(), "93.184.216.34")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(Some("34.05223".to_string()), coordinate(&geo, "lat"));
    }

    #[tokio::test]
    async fn fail_status_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"status":"fail"}"#),
            )
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let geo = lookup(&fetcher, &server.uri(), "0.0.0.0").await.unwrap();
        assert!(geo.is_none());
    }

    #[tokio::test]
    async fn missing_status_is_a_contract_violation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"lat":"1"}"#))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let err = lookup(&fetcher, &server.uri(), "1.2.3.4").await.unwrap_err();
        assert!(matches!(err, LookupError::ApiContract(_)));
    }

    #[tokio::test]
    async fn non_json_body_is_a_contract_violation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let err = lookup(&fetcher, &server.uri(), "1.2.3.4").await.unwrap_err();
        assert!(matches!(err, LookupError::ApiContract(_)));
    }

    #[test]
    fn numeric_coordinates_are_stringified() {
        let map: Map<String, Value> =
            serde_json::from_str(r#"{"lat":34.05,"lon":"-118.24","empty":""}"#).unwrap();
        assert_eq!(Some("34.05".to_string()), coordinate(&map, "lat"));
        assert_eq!(Some("-118.24".to_string()), coordinate(&map, "lon"));
        assert_eq!(None, coordinate(&map, "empty"));
        assert_eq!(None, coordinate(&map, "missing"));
    }
}
