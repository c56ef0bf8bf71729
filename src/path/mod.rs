//! Path utilities for normalization, joining, and name-key transforms
//!
//! All functions are **pure**: given the same input, they always produce the
//! same output with no side effects. `normalize_path` uses `Cow<'_, str>` so
//! already-canonical paths are returned without allocating.

use std::borrow::Cow;

use crate::{Query, QueryValue};

/// Validates that a path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//`
/// - Must not end with `/` (except root `/`)
/// - Must not be empty
///
/// # Examples
///
/// ```
/// use locale_router::path::is_canonical_path;
///
/// assert!(is_canonical_path("/"));
/// assert!(is_canonical_path("/de/about"));
///
/// assert!(!is_canonical_path(""));
/// assert!(!is_canonical_path("about"));
/// assert!(!is_canonical_path("/about/"));
/// assert!(!is_canonical_path("//about"));
/// ```
pub fn is_canonical_path(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }
    if path.contains("//") {
        return false;
    }
    if path == "/" {
        return true;
    }
    !path.ends_with('/')
}

/// Normalizes a path to canonical form
///
/// Collapses repeated slashes, guarantees a leading slash, and strips a
/// single trailing slash unless the result is the root. A protocol scheme
/// (`scheme://`) is preserved; slash collapsing resumes after it, and full
/// URLs keep their scheme instead of gaining a leading slash.
///
/// Idempotent: `normalize_path(normalize_path(p)) == normalize_path(p)`.
///
/// Returns `Cow::Borrowed` when the input is already canonical.
///
/// # Examples
///
/// ```
/// use locale_router::path::normalize_path;
///
/// assert_eq!(normalize_path("//foo///bar/"), "/foo/bar");
/// assert_eq!(normalize_path(""), "/");
/// assert_eq!(normalize_path("about"), "/about");
/// assert_eq!(normalize_path("https://example.com//de//about/"), "https://example.com/de/about");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if let Some(idx) = path.find("://") {
        let (scheme, rest) = path.split_at(idx + 3);
        if !rest.contains("//") && !rest.ends_with('/') && !rest.is_empty() {
            return Cow::Borrowed(path);
        }
        let tail = rest
            .split('/')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        return Cow::Owned(format!("{scheme}{tail}"));
    }

    // Fast path: canonical input is returned borrowed
    if is_canonical_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{normalized}"))
    }
}

/// Joins segments with single slashes
///
/// Empty segments are skipped. The result carries a leading slash unless it
/// is a full URL with a scheme, in which case the scheme boundary survives
/// the join untouched.
///
/// # Examples
///
/// ```
/// use locale_router::path::join_url;
///
/// assert_eq!(join_url(&["de", "/about"]), "/de/about");
/// assert_eq!(join_url(&["", "/", "about"]), "/about");
/// assert_eq!(join_url(&["https://example.com", "de", "about"]), "https://example.com/de/about");
/// ```
pub fn join_url(segments: &[&str]) -> String {
    let joined = segments
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");
    normalize_path(&joined).into_owned()
}

/// Returns the path with any `?query` and `#hash` suffix removed
///
/// Truncates at whichever separator appears first.
pub fn clean_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// Splits a path string into its path, raw query string, and hash fragment
///
/// The hash is located first; the query separator is only searched for in
/// the part preceding the hash, so a `?` inside a fragment stays in the
/// fragment. The returned hash includes its leading `#`; the query string
/// excludes its leading `?`.
pub fn split_query_hash(input: &str) -> (&str, Option<&str>, Option<&str>) {
    let (before_hash, hash) = match input.find('#') {
        Some(i) => (&input[..i], Some(&input[i..])),
        None => (input, None),
    };
    let (path, query) = match before_hash.find('?') {
        Some(i) => (&before_hash[..i], Some(&before_hash[i + 1..])),
        None => (before_hash, None),
    };
    (path, query, hash)
}

/// Reattaches a query and hash fragment to a path
///
/// Query pairs keep their insertion order and list values expand to repeated
/// `key=value` pairs. Keys and values are percent-encoded. A hash gains a
/// leading `#` if it is missing one. An empty query and hash leave the path
/// unchanged.
///
/// # Examples
///
/// ```
/// use locale_router::{path::build_url, QueryValue};
///
/// let query = vec![
///     ("a".to_string(), QueryValue::Single("b".to_string())),
///     ("t".to_string(), QueryValue::List(vec!["1".to_string(), "2".to_string()])),
/// ];
/// assert_eq!(build_url("/about", &query, Some("#team")), "/about?a=b&t=1&t=2#team");
/// assert_eq!(build_url("/about", &[], None), "/about");
/// ```
pub fn build_url(path: &str, query: &[(String, QueryValue)], hash: Option<&str>) -> String {
    let mut url = path.to_string();

    if !query.is_empty() {
        let mut pairs = Vec::new();
        for (key, value) in query {
            match value {
                QueryValue::Single(v) => pairs.push(encode_pair(key, v)),
                QueryValue::List(vs) => pairs.extend(vs.iter().map(|v| encode_pair(key, v))),
            }
        }
        url.push('?');
        url.push_str(&pairs.join("&"));
    }

    if let Some(hash) = hash {
        if !hash.is_empty() {
            if !hash.starts_with('#') {
                url.push('#');
            }
            url.push_str(hash);
        }
    }

    url
}

fn encode_pair(key: &str, value: &str) -> String {
    format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
}

/// Parses a raw query string into ordered key/value pairs
///
/// Repeated keys fold into a [`QueryValue::List`] in first-seen position.
/// Percent-encoded keys and values are decoded.
pub fn parse_query(raw: &str) -> Query {
    let mut query: Query = Vec::new();
    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        };
        let key = decode(key);
        let value = decode(value);
        match query.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => {
                let previous = std::mem::replace(slot, QueryValue::Single(String::new()));
                *slot = match previous {
                    QueryValue::Single(first) => QueryValue::List(vec![first, value]),
                    QueryValue::List(mut values) => {
                        values.push(value);
                        QueryValue::List(values)
                    }
                };
            }
            None => query.push((key, QueryValue::Single(value))),
        }
    }
    query
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// Non-empty `/`-delimited segments of a path
///
/// Query and hash suffixes are ignored.
pub fn path_segments(path: &str) -> Vec<&str> {
    clean_path(path).split('/').filter(|s| !s.is_empty()).collect()
}

/// Replaces every hyphen in a route-name key with a slash
///
/// `parent-child` → `parent/child`
pub fn to_path_form(name: &str) -> String {
    name.replace('-', "/")
}

/// Replaces only the first hyphen with a slash
///
/// Probes one of the two nesting interpretations of an ambiguous name:
/// `blog-post-id` → `blog/post-id`.
pub fn first_hyphen_to_slash(name: &str) -> String {
    name.replacen('-', "/", 1)
}

/// Replaces only the last hyphen with a slash
///
/// `blog-post-id` → `blog-post/id`.
pub fn last_hyphen_to_slash(name: &str) -> String {
    match name.rfind('-') {
        Some(i) => format!("{}/{}", &name[..i], &name[i + 1..]),
        None => name.to_string(),
    }
}

/// Reverses a slash-form key one level up into hyphen form
///
/// `parent/child/leaf` → `parent-child`; a single-segment key has no parent
/// and yields an empty string.
pub fn parent_key_from_slash_form(key: &str) -> String {
    match key.rfind('/') {
        Some(i) => key[..i].replace('/', "-"),
        None => String::new(),
    }
}
