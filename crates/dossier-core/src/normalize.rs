//! URL canonicalization helpers.
//!
//! Every lookup and the on-disk cache key go through these two
//! functions, so scheme/`www.`/path variants of the same domain always
//! land on the same host string and the same cache directory.

/// Characters that never survive into a cache directory name.
const INVALID_FILENAME_CHARS: &[char] =
    &['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>', '.'];

/// Reduce a URL to its bare host: scheme and `www.` stripped, path cut
/// at the first `/`.
///
/// Idempotent: feeding the output back in returns it unchanged.
#[must_use]
pub fn normalize_to_host(url: &str) -> String {
    let stripped = url
        .trim()
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .trim_start_matches("www.");

    stripped
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Turn a URL into a filesystem-safe directory name.
///
/// The host's dots become ` - ` separators, then anything from the
/// invalid-character blacklist is dropped. Collision-resistant for
/// typical domains, not globally unique.
#[must_use]
pub fn to_directory_name(url: &str) -> String {
    let spaced = normalize_to_host(url).replace('.', " - ");
    spaced
        .chars()
        .filter(|c| !INVALID_FILENAME_CHARS.contains(c))
        .collect()
}
