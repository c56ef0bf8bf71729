//! Locale configuration and path-prefix extraction
//!
//! A [`Locale`] describes one configured language; [`strip_locale`] decides
//! whether the first path segment names one of them. Matching is an exact
//! string comparison against the configured codes, never a longest-prefix or
//! language-tag comparison.

use serde::{Deserialize, Serialize};

use crate::path::{clean_path, normalize_path};

/// One configured locale
///
/// `base_url` points a locale at its own host (multi-domain setups);
/// `base_default` marks that locale as the default for that host, which the
/// `prefix_except_default` strategy treats like the global default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    /// Unique locale code, e.g. `en` or `en-US`
    pub code: String,
    /// Human-readable name for locale switchers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Separate host serving this locale, e.g. `https://example.de`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Whether this locale is the unprefixed default on its `base_url` host
    #[serde(default)]
    pub base_default: bool,
}

impl Locale {
    /// Creates a locale from its code
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display_name: None,
            base_url: None,
            base_default: false,
        }
    }

    /// Sets the display name
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Points this locale at its own host
    pub fn with_base_url(mut self, base_url: impl Into<String>, base_default: bool) -> Self {
        self.base_url = Some(base_url.into());
        self.base_default = base_default;
        self
    }
}

/// Result of stripping a locale prefix off a path
///
/// Both fields exclude query and hash. Redirect logic downstream compares
/// only path shape, so carrying non-path parts here would reintroduce the
/// redirect loops this type exists to prevent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrippedPath {
    /// The path with any leading locale segment removed, normalized
    pub path_without_locale: String,
    /// The matched locale code, if the first segment was one
    pub locale: Option<String>,
}

/// Strips a leading locale segment from a path
///
/// Query and hash are dropped first. The root path carries no locale. Only
/// the first segment is inspected, and only an exact match against one of
/// `codes` counts.
///
/// # Examples
///
/// ```
/// use locale_router::locale::strip_locale;
///
/// let stripped = strip_locale("/de/about?x=1", &["en", "de"]);
/// assert_eq!(stripped.locale.as_deref(), Some("de"));
/// assert_eq!(stripped.path_without_locale, "/about");
///
/// let stripped = strip_locale("/design/about", &["de"]);
/// assert_eq!(stripped.locale, None);
/// assert_eq!(stripped.path_without_locale, "/design/about");
/// ```
pub fn strip_locale(path: &str, codes: &[&str]) -> StrippedPath {
    let cleaned = normalize_path(clean_path(path));

    if cleaned == "/" {
        return StrippedPath {
            path_without_locale: "/".to_string(),
            locale: None,
        };
    }

    let mut segments = cleaned[1..].split('/');
    let first = segments.next().unwrap_or("");

    if let Some(code) = codes.iter().find(|code| **code == first) {
        let rest = segments.collect::<Vec<_>>().join("/");
        let path_without_locale = if rest.is_empty() {
            "/".to_string()
        } else {
            normalize_path(&format!("/{rest}")).into_owned()
        };
        return StrippedPath {
            path_without_locale,
            locale: Some((*code).to_string()),
        };
    }

    StrippedPath {
        path_without_locale: cleaned.into_owned(),
        locale: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODES: &[&str] = &["en", "en-US", "de"];

    #[test]
    fn strips_matching_first_segment() {
        let stripped = strip_locale("/de/about", CODES);
        assert_eq!(stripped.locale.as_deref(), Some("de"));
        assert_eq!(stripped.path_without_locale, "/about");
    }

    #[test]
    fn locale_only_path_becomes_root() {
        let stripped = strip_locale("/en-US", CODES);
        assert_eq!(stripped.locale.as_deref(), Some("en-US"));
        assert_eq!(stripped.path_without_locale, "/");
    }

    #[test]
    fn root_has_no_locale() {
        let stripped = strip_locale("/", CODES);
        assert_eq!(stripped.locale, None);
        assert_eq!(stripped.path_without_locale, "/");
    }

    #[test]
    fn empty_input_treated_as_root() {
        let stripped = strip_locale("", CODES);
        assert_eq!(stripped.locale, None);
        assert_eq!(stripped.path_without_locale, "/");
    }

    #[test]
    fn partial_segment_does_not_match() {
        // "design" starts with "de" but is not an exact match
        let stripped = strip_locale("/design/about", CODES);
        assert_eq!(stripped.locale, None);
        assert_eq!(stripped.path_without_locale, "/design/about");
    }

    #[test]
    fn query_and_hash_are_excluded() {
        let stripped = strip_locale("/de/about?page=2#top", CODES);
        assert_eq!(stripped.locale.as_deref(), Some("de"));
        assert_eq!(stripped.path_without_locale, "/about");
    }

    #[test]
    fn unlisted_code_passes_through() {
        let stripped = strip_locale("/fr/about", CODES);
        assert_eq!(stripped.locale, None);
        assert_eq!(stripped.path_without_locale, "/fr/about");
    }

    #[test]
    fn round_trip_any_prefixed_path() {
        for code in CODES {
            for path in ["/", "/about", "/a/b/c"] {
                let prefixed = crate::path::join_url(&[code, path]);
                let stripped = strip_locale(&prefixed, CODES);
                assert_eq!(stripped.locale.as_deref(), Some(*code));
                assert_eq!(
                    stripped.path_without_locale,
                    crate::path::normalize_path(path)
                );
            }
        }
    }
}
