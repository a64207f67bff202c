//! Static HTML report rendering.
//!
//! Consumes a finished [`ReportDocument`] plus the cache directory and
//! writes `output.html` next to the persisted data. The map thumbnail
//! is referenced relatively and is not required to exist.

use dossier_core::{Estimate, ReportDocument, WhoisValue};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Report filename inside the cache directory
pub const REPORT_FILE: &str = "output.html";

const SECTIONS: &[&str] = &[
    "main",
    "whois",
    "geolocation",
    "builtwith",
    "robots",
    "sitemap",
    "wiki",
];

const CSS: &str = "\
body { color: #333333; background-color: #dddddd; font-family: Georgia; }
h1 { text-align: center; }
.elem {
    background-color: white;
    width: 850px;
    margin: 20px auto;
    border-radius: 10px;
    padding: 20px 40px;
}
.aligncenter { text-align: center; }
";

/// Render the report and write it into the cache directory.
///
/// Returns the path of the written file.
pub fn write_report(document: &ReportDocument, directory: &Path) -> std::io::Result<PathBuf> {
    let path = directory.join(REPORT_FILE);
    std::fs::write(&path, html_report(document))?;
    Ok(path)
}

/// Build the full HTML page for a document.
#[must_use]
pub fn html_report(document: &ReportDocument) -> String {
    let mut page = String::with_capacity(8 * 1024);
    let url = escape(&document.url);

    let _ = write!(
        page,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Report on: {url}</title>\n<style>\n{CSS}</style>\n</head>\n<body>\n"
    );

    // Header with section links
    page.push_str("<div class=\"elem\">\n");
    let _ = write!(page, "<h1>Report on {url}</h1>\n<p class=\"aligncenter\">");
    for section in SECTIONS {
        let _ = write!(page, "<a href=\"#{section}\">{section}</a> | ");
    }
    page.push_str("</p>\n</div>\n");

    render_main(&mut page, document);
    render_whois(&mut page, document);
    render_geolocation(&mut page, document);
    render_builtwith(&mut page, document);
    render_robots(&mut page, document);
    render_iframe_section(&mut page, "sitemap", "Sitemap", document.sitemap.as_deref());
    render_iframe_section(&mut page, "wiki", "Wiki", document.wiki.as_deref());

    page.push_str("</body>\n</html>\n");
    page
}

fn section_open(page: &mut String, anchor: &str, heading: &str) {
    let _ = write!(
        page,
        "<a name=\"{anchor}\"></a>\n<div class=\"elem\">\n<h2><b><u>{heading}:</u></b></h2>\n"
    );
}

fn render_main(page: &mut String, document: &ReportDocument) {
    section_open(page, "main", "Main");

    let _ = write!(page, "<b>URL:</b> {}\n", escape(&document.url));
    let _ = write!(page, "<br><b>IP:</b> {}\n", opt(document.ip.as_deref()));
    let _ = write!(
        page,
        "<br><b>TITLE:</b> {}\n",
        opt(document.title.as_deref())
    );

    match &document.estimated {
        Some(Estimate::Hits { query_url, count }) => {
            let _ = write!(
                page,
                "<br><b>ESTIMATED SIZE:</b> <a href=\"{}\">{count}</a>\n",
                escape(query_url)
            );
        }
        Some(Estimate::Error { error }) => {
            let _ = write!(page, "<br><b>ESTIMATED SIZE:</b> {}\n", escape(error));
        }
        None => page.push_str("<br><b>ESTIMATED SIZE:</b> -\n"),
    }

    match &document.potential_api {
        Some(api) => {
            let api = escape(api);
            let _ = write!(page, "<br><b>POTENTIAL API:</b> <a href=\"http://{api}\">{api}</a>\n");
        }
        None => page.push_str("<br><b>POTENTIAL API:</b> -\n"),
    }

    match &document.news_url {
        Some(news) => {
            let news = escape(news);
            let _ = write!(
                page,
                "<br><b>LINK TO LATEST NEWS:</b> <a href=\"{news}\">{news}</a>\n"
            );
        }
        None => page.push_str("<br><b>LINK TO LATEST NEWS:</b> -\n"),
    }

    page.push_str("</div>\n");
}

fn render_whois(page: &mut String, document: &ReportDocument) {
    section_open(page, "whois", "Whois");

    if let Some(whois) = &document.whois {
        page.push_str("<ul>\n");
        for (key, value) in whois {
            render_whois_value(page, key, value);
        }
        page.push_str("</ul>\n");

        if let Some(embed) = document
            .geo_maps
            .as_ref()
            .and_then(|m| m.whois_map_embed_url.as_deref())
        {
            let embed = escape(embed);
            let _ = write!(
                page,
                "<p class=\"aligncenter\"><a href=\"{embed}\"><iframe height=\"300\" width=\"300\" \
                 src=\"{embed}\" frameborder=\"0\" scrolling=\"no\"></iframe></a></p>\n"
            );
        }
    }

    page.push_str("</div>\n");
}

fn render_whois_value(page: &mut String, key: &str, value: &WhoisValue) {
    match value {
        WhoisValue::Scalar(scalar) => {
            let _ = write!(
                page,
                "<li><b>{}:</b> {}</li>\n",
                escape(key),
                escape(scalar)
            );
        }
        WhoisValue::List(items) => {
            let _ = write!(page, "<li><b>{}</b>\n<ul>\n", escape(key));
            for item in items {
                if let Some(scalar) = item.as_scalar() {
                    let _ = write!(page, "<li>{}</li>\n", escape(scalar));
                }
            }
            page.push_str("</ul></li>\n");
        }
    }
}

fn render_geolocation(page: &mut String, document: &ReportDocument) {
    section_open(page, "geolocation", "Geolocation");

    if let Some(geo) = &document.geo_location {
        page.push_str("<ul>\n");
        for (key, value) in geo {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let _ = write!(
                page,
                "<li><b>{}:</b> {}</li>\n",
                escape(key),
                escape(&rendered)
            );
        }
        page.push_str("</ul>\n");

        if let Some(map_url) = document
            .geo_maps
            .as_ref()
            .and_then(|m| m.geo_map_url.as_deref())
        {
            let _ = write!(
                page,
                "<p class=\"aligncenter\"><a href=\"{}\">\
                 <img width=\"300\" height=\"300\" src=\"location.jpg\" alt=\"location\"></a></p>\n",
                escape(map_url)
            );
        }
    }

    page.push_str("</div>\n");
}

fn render_builtwith(page: &mut String, document: &ReportDocument) {
    section_open(page, "builtwith", "Builtwith");

    if let Some(builtwith) = &document.builtwith {
        page.push_str("<ul>\n");
        for (category, technologies) in builtwith {
            let _ = write!(
                page,
                "<li><b>{}:</b> {}</li>\n",
                escape(category),
                escape(&technologies.join(", "))
            );
        }
        page.push_str("</ul>\n");
    }

    page.push_str("</div>\n");
}

fn render_robots(page: &mut String, document: &ReportDocument) {
    section_open(page, "robots", "Robots");

    if let Some(robots) = &document.robots {
        page.push_str("<ul>\n");
        for line in robots.lines().filter(|l| !l.trim().is_empty()) {
            let _ = write!(page, "<li><b>{}</b></li>\n", escape(line));
        }
        page.push_str("</ul>\n");
    }

    page.push_str("</div>\n");
}

fn render_iframe_section(page: &mut String, anchor: &str, heading: &str, url: Option<&str>) {
    section_open(page, anchor, heading);

    if let Some(url) = url {
        let _ = write!(
            page,
            "<br><iframe width=\"850\" height=\"800\" src=\"{}\"></iframe>\n",
            escape(url)
        );
    }

    page.push_str("</div>\n");
}

fn opt(value: Option<&str>) -> String {
    value.map_or_else(|| "-".to_string(), escape)
}

/// Minimal HTML escaping for text and attribute values.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
