//! Search-engine query building and result-page scraping.
//!
//! Brittle by construction: these extractors depend on the result
//! page's markup. A missing marker is reported as
//! [`LookupError::StructureChanged`] naming the marker, never
//! swallowed, so a scraper break stays distinguishable from an empty
//! result.

use crate::error::{LookupError, LookupResult};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

/// Default search-engine base URL
pub const DEFAULT_BASE_URL: &str = "https://www.google.com";

/// `site:` query used for the result-count estimate.
#[must_use]
pub fn size_query_url(base_url: &str, host: &str) -> String {
    format!("{base_url}/search?q=site:{host}")
}

/// Query for a potential API host.
#[must_use]
pub fn api_query_url(base_url: &str, host: &str) -> String {
    format!("{base_url}/search?q=api+{host}")
}

/// News search link; templated only, never fetched.
#[must_use]
pub fn news_query_url(base_url: &str, host: &str) -> String {
    format!("{base_url}/search?tbm=nws&q=\"{host}\"")
}

/// Query restricted to Wikipedia.
#[must_use]
pub fn wiki_query_url(base_url: &str, host: &str) -> String {
    format!("{base_url}/search?q={host}+site:wikipedia.org")
}

fn selector(css: &str) -> Selector {
    // All inputs are static, known-good selectors
    Selector::parse(css).expect("static selector")
}

fn count_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9][0-9,]*").expect("static regex"))
}

/// Extract the `<title>` text from a homepage.
#[must_use]
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let title = document
        .select(&selector("title"))
        .next()?
        .text()
        .collect::<String>()
        .trim()
        .to_string();

    (!title.is_empty()).then_some(title)
}

/// Parse the result count out of the result-stats marker.
pub fn extract_result_count(html: &str) -> LookupResult<u64> {
    let document = Html::parse_document(html);
    let stats = document
        .select(&selector("#result-stats"))
        .next()
        .ok_or_else(|| LookupError::StructureChanged("result-stats".to_string()))?
        .text()
        .collect::<String>();

    let digits = count_pattern()
        .find(&stats)
        .ok_or_else(|| LookupError::StructureChanged("result-stats count".to_string()))?
        .as_str()
        .replace(',', "");

    digits
        .parse()
        .map_err(|_| LookupError::StructureChanged("result-stats count".to_string()))
}

/// Direct text of the first `cite` element in the results block.
pub fn extract_first_cite(html: &str) -> LookupResult<String> {
    let document = Html::parse_document(html);
    let results = document
        .select(&selector("#search"))
        .next()
        .ok_or_else(|| LookupError::StructureChanged("search results block".to_string()))?;

    let cite = results
        .select(&selector("cite"))
        .next()
        .ok_or_else(|| LookupError::StructureChanged("result cite".to_string()))?;

    // Direct text children only; nested spans carry breadcrumb noise
    let text: String = cite
        .children()
        .filter_map(|node| node.value().as_text().map(|t| t.to_string()))
        .collect();

    Ok(text.trim().to_string())
}

/// `href` of the first result link, if any.
///
/// `Ok(None)` means the results block is there but empty — a domain
/// with no hits, not a scraper break.
pub fn extract_first_link(html: &str) -> LookupResult<Option<String>> {
    let document = Html::parse_document(html);
    let results = document
        .select(&selector("#search"))
        .next()
        .ok_or_else(|| LookupError::StructureChanged("search results block".to_string()))?;

    Ok(results
        .select(&selector("a[href]"))
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(ToString::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_urls_embed_the_host() {
        assert_eq!(
            "https://www.google.com/search?q=site:example.com",
            size_query_url(DEFAULT_BASE_URL, "example.com")
        );
        assert_eq!(
            "https://www.google.com/search?tbm=nws&q=\"example.com\"",
            news_query_url(DEFAULT_BASE_URL, "example.com")
        );
        assert_eq!(
            "https://www.google.com/search?q=example.com+site:wikipedia.org",
            wiki_query_url(DEFAULT_BASE_URL, "example.com")
        );
    }

    #[test]
    fn title_is_extracted_and_trimmed() {
        let html = "<html><head><title>\n  Example Domain </title></head></html>";
        assert_eq!(Some("Example Domain".to_string()), extract_title(html));
    }

    #[test]
    fn missing_or_empty_title_is_none() {
        assert_eq!(None, extract_title("<html><body><p>no title</p></body></html>"));
        assert_eq!(None, extract_title("<html><head><title> </title></head></html>"));
    }

    #[test]
    fn result_count_strips_thousands_separators() {
        let html = r#"<div id="result-stats">About 1,230,000 results (0.42 seconds)</div>"#;
        assert_eq!(1_230_000, extract_result_count(html).unwrap());
    }

    #[test]
    fn missing_result_stats_is_structure_change() {
        let err = extract_result_count("<html><body></body></html>").unwrap_err();
        assert!(matches!(err, LookupError::StructureChanged(_)));
    }

    #[test]
    fn first_cite_takes_direct_text_only() {
        let html = r#"
            <div id="search">
              <cite>developer.example.com<span> › docs › api</span></cite>
              <cite>other.example.com</cite>
            </div>"#;
        assert_eq!("developer.example.com", extract_first_cite(html).unwrap());
    }

    #[test]
    fn missing_cite_is_structure_change() {
        let err = extract_first_cite(r#"<div id="search"></div>"#).unwrap_err();
        assert!(matches!(err, LookupError::StructureChanged(_)));
    }

    #[test]
    fn first_link_href_is_returned() {
        let html = r##"
            <div id="search">
              <a href="https://en.wikipedia.org/wiki/Example.com">Example</a>
              <a href="https://en.wikipedia.org/wiki/Other">Other</a>
            </div>"##;
        assert_eq!(
            Some("https://en.wikipedia.org/wiki/Example.com".to_string()),
            extract_first_link(html).unwrap()
        );
    }

    #[test]
    fn empty_results_block_is_no_link_not_an_error() {
        assert_eq!(None, extract_first_link(r#"<div id="search"></div>"#).unwrap());
    }

    #[test]
    fn missing_results_block_is_structure_change() {
        let err = extract_first_link("<html></html>").unwrap_err();
        assert!(matches!(err, LookupError::StructureChanged(_)));
    }
}
