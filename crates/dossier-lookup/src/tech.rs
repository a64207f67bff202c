//! Technology fingerprinting from response headers and page markup.
//!
//! Table-driven: each signature names a category, a technology, and
//! either a header substring or an HTML substring to look for. Matches
//! are aggregated into a category-to-technologies map; no match at all
//! yields an empty map, which is a normal answer rather than an error.

use crate::fetch::FetchResponse;
use std::collections::BTreeMap;

/// Where a signature looks for its pattern.
enum Probe {
    /// Case-insensitive substring of the named header's value
    Header(&'static str, &'static str),
    /// Case-insensitive substring of the HTML body
    Html(&'static str),
}

struct Signature {
    category: &'static str,
    name: &'static str,
    probe: Probe,
}

const SIGNATURES: &[Signature] = &[
    // Web servers
    Signature { category: "web-servers", name: "Nginx", probe: Probe::Header("server", "nginx") },
    Signature { category: "web-servers", name: "Apache", probe: Probe::Header("server", "apache") },
    Signature { category: "web-servers", name: "Microsoft IIS", probe: Probe::Header("server", "microsoft-iis") },
    Signature { category: "web-servers", name: "LiteSpeed", probe: Probe::Header("server", "litespeed") },
    // CDN
    Signature { category: "cdn", name: "Cloudflare", probe: Probe::Header("server", "cloudflare") },
    Signature { category: "cdn", name: "EdgeCast", probe: Probe::Header("server", "ecs (") },
    Signature { category: "cdn", name: "Amazon CloudFront", probe: Probe::Header("via", "cloudfront") },
    Signature { category: "cdn", name: "Fastly", probe: Probe::Header("x-served-by", "cache-") },
    Signature { category: "cdn", name: "Akamai", probe: Probe::Header("server", "akamaighost") },
    // Languages
    Signature { category: "programming-languages", name: "PHP", probe: Probe::Header("x-powered-by", "php") },
    Signature { category: "programming-languages", name: "PHP", probe: Probe::Header("set-cookie", "phpsessid") },
    Signature { category: "programming-languages", name: "Java", probe: Probe::Header("set-cookie", "jsessionid") },
    Signature { category: "programming-languages", name: "Python", probe: Probe::Header("x-powered-by", "python") },
    // Web frameworks
    Signature { category: "web-frameworks", name: "Express", probe: Probe::Header("x-powered-by", "express") },
    Signature { category: "web-frameworks", name: "ASP.NET", probe: Probe::Header("x-powered-by", "asp.net") },
    Signature { category: "web-frameworks", name: "Django", probe: Probe::Header("set-cookie", "csrftoken") },
    Signature { category: "web-frameworks", name: "Laravel", probe: Probe::Header("set-cookie", "laravel_session") },
    Signature { category: "web-frameworks", name: "Ruby on Rails", probe: Probe::Header("set-cookie", "_rails_session") },
    // CMS
    Signature { category: "cms", name: "WordPress", probe: Probe::Html("wp-content") },
    Signature { category: "cms", name: "WordPress", probe: Probe::Html(r#"content="wordpress"#) },
    Signature { category: "cms", name: "Drupal", probe: Probe::Html("drupal.settings") },
    Signature { category: "cms", name: "Drupal", probe: Probe::Html("/sites/default/files") },
    Signature { category: "cms", name: "Joomla", probe: Probe::Html(r#"content="joomla"#) },
    // Blogs
    Signature { category: "blogs", name: "Ghost", probe: Probe::Html(r#"content="ghost"#) },
    // JavaScript
    Signature { category: "javascript-frameworks", name: "React", probe: Probe::Html("data-reactroot") },
    Signature { category: "javascript-frameworks", name: "Next.js", probe: Probe::Html("__next_data__") },
    Signature { category: "javascript-frameworks", name: "Angular", probe: Probe::Html("ng-app") },
    Signature { category: "javascript-frameworks", name: "Vue.js", probe: Probe::Html("data-v-app") },
    Signature { category: "javascript-frameworks", name: "jQuery", probe: Probe::Html("jquery") },
    // Analytics
    Signature { category: "analytics", name: "Google Analytics", probe: Probe::Html("google-analytics.com") },
    Signature { category: "analytics", name: "Google Analytics", probe: Probe::Html("gtag(") },
    // Ecommerce
    Signature { category: "ecommerce", name: "Shopify", probe: Probe::Html("cdn.shopify.com") },
    Signature { category: "ecommerce", name: "Magento", probe: Probe::Html("mage/cookies") },
];

/// Fingerprint the technologies behind a homepage response.
#[must_use]
pub fn detect(response: &FetchResponse) -> BTreeMap<String, Vec<String>> {
    let html_lower = response.text().to_lowercase();
    let mut found: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for signature in SIGNATURES {
        let hit = match &signature.probe {
            Probe::Header(name, pattern) => response
                .header(name)
                .is_some_and(|v| v.to_lowercase().contains(pattern)),
            Probe::Html(pattern) => html_lower.contains(pattern),
        };

        if hit {
            let techs = found.entry(signature.category.to_string()).or_default();
            if !techs.iter().any(|t| t == signature.name) {
                techs.push(signature.name.to_string());
            }
        }
    }

    found
}
