//! robots.txt retrieval and sitemap discovery.

use crate::error::LookupResult;
use crate::fetch::{FetchRequest, Fetcher};
use tracing::debug;

/// Fetch the raw robots.txt of a site.
pub async fn fetch_robots(fetcher: &Fetcher, site_base: &str) -> LookupResult<String> {
    let request = FetchRequest::new(format!("{site_base}/robots.txt"));
    Ok(fetcher.get(&request).await?.text())
}

/// First `Sitemap:` directive from robots.txt text, trimmed.
///
/// The directive value almost always contains `:` itself (it is a
/// URL), so only the first colon splits key from value.
#[must_use]
pub fn sitemap_directive(robots: &str) -> Option<String> {
    robots.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim().eq_ignore_ascii_case("sitemap") {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}

/// Resolve the sitemap URL: the robots.txt declaration when present,
/// otherwise the conventional `/sitemap.xml` guess. Either way the
/// candidate is validated with a GET before being reported.
pub async fn discover_sitemap(
    fetcher: &Fetcher,
    site_base: &str,
    robots: Option<&str>,
) -> Option<String> {
    let candidate = robots
        .and_then(sitemap_directive)
        .unwrap_or_else(|| format!("{site_base}/sitemap.xml"));

    match fetcher.get(&FetchRequest::new(candidate.clone())).await {
        Ok(_) => Some(candidate),
        Err(e) => {
            debug!(url = %candidate, error = %e, "sitemap candidate unreachable");
            None
        }
    }
}
