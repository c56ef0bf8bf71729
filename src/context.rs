//! Static routing configuration
//!
//! [`RoutingContext`] is the read-only aggregate handed to the resolver and
//! the strategy hooks: the strategy kind, the locale list with its default,
//! the per-route custom path table, locale restrictions, and the restriction
//! links that let several route keys share one restriction entry. It is
//! constructed once by the host integration and never mutated by a
//! resolution call.

use std::collections::HashMap;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::locale::Locale;
use crate::strategy::PrefixStrategy;

/// Default prefix carried by generated localized route names
pub const DEFAULT_ROUTE_NAME_PREFIX: &str = "localized-";

/// Per-route custom path entry
///
/// `Localized` maps locale codes to path templates; `Disabled` is the
/// permanent sentinel meaning the route is never locale-prefixed, regardless
/// of strategy. In serialized form the sentinel is the literal `false`, so a
/// JSON/TOML table like `{ "/about": { "de": "/ueber-uns" }, "static": false }`
/// deserializes directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomRoutePaths {
    /// Locale code to path template
    Localized(HashMap<String, String>),
    /// Never localize this route
    Disabled,
}

impl Serialize for CustomRoutePaths {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Localized(paths) => paths.serialize(serializer),
            Self::Disabled => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for CustomRoutePaths {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Localized(HashMap<String, String>),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Flag(false) => Ok(Self::Disabled),
            Raw::Flag(true) => Err(D::Error::custom(
                "only `false` disables localization for a route",
            )),
            Raw::Localized(paths) => Ok(Self::Localized(paths)),
        }
    }
}

/// Route key to custom path entry
pub type CustomRouteMap = HashMap<String, CustomRoutePaths>;
/// Route key to the ordered locale codes allowed for it
pub type LocaleRestrictions = HashMap<String, Vec<String>>;
/// Route key to the canonical route key holding its restriction entry
pub type RestrictionLinks = HashMap<String, String>;

/// The immutable configuration aggregate read by every resolution call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingContext {
    strategy: PrefixStrategy,
    locales: Vec<Locale>,
    default_locale: String,
    #[serde(default = "default_route_name_prefix")]
    route_name_prefix: String,
    #[serde(default)]
    custom_paths: CustomRouteMap,
    #[serde(default)]
    locale_restrictions: LocaleRestrictions,
    #[serde(default)]
    restriction_links: RestrictionLinks,
    #[serde(default)]
    no_prefix_redirect: bool,
}

fn default_route_name_prefix() -> String {
    DEFAULT_ROUTE_NAME_PREFIX.to_string()
}

impl RoutingContext {
    /// Creates a context with empty tables
    pub fn new(
        strategy: PrefixStrategy,
        locales: Vec<Locale>,
        default_locale: impl Into<String>,
    ) -> Self {
        Self {
            strategy,
            locales,
            default_locale: default_locale.into(),
            route_name_prefix: default_route_name_prefix(),
            custom_paths: CustomRouteMap::new(),
            locale_restrictions: LocaleRestrictions::new(),
            restriction_links: RestrictionLinks::new(),
            no_prefix_redirect: false,
        }
    }

    /// Overrides the localized route-name prefix
    pub fn with_route_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.route_name_prefix = prefix.into();
        self
    }

    /// Sets the custom path table
    pub fn with_custom_paths(mut self, custom_paths: CustomRouteMap) -> Self {
        self.custom_paths = custom_paths;
        self
    }

    /// Sets the per-route locale restrictions
    pub fn with_locale_restrictions(mut self, restrictions: LocaleRestrictions) -> Self {
        self.locale_restrictions = restrictions;
        self
    }

    /// Sets the restriction link table
    pub fn with_restriction_links(mut self, links: RestrictionLinks) -> Self {
        self.restriction_links = links;
        self
    }

    /// Enables stripping accidental locale segments under the no-prefix strategy
    pub fn with_no_prefix_redirect(mut self, enabled: bool) -> Self {
        self.no_prefix_redirect = enabled;
        self
    }

    /// The active prefixing strategy
    pub fn strategy(&self) -> PrefixStrategy {
        self.strategy
    }

    /// All configured locales
    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    /// The configured locale codes, in configuration order
    pub fn locale_codes(&self) -> Vec<&str> {
        self.locales.iter().map(|l| l.code.as_str()).collect()
    }

    /// Looks up one locale by code
    pub fn locale(&self, code: &str) -> Option<&Locale> {
        self.locales.iter().find(|l| l.code == code)
    }

    /// The default locale code
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// The localized route-name prefix
    pub fn route_name_prefix(&self) -> &str {
        &self.route_name_prefix
    }

    /// The custom path table
    pub fn custom_paths(&self) -> &CustomRouteMap {
        &self.custom_paths
    }

    /// The locale restriction table
    pub fn locale_restrictions(&self) -> &LocaleRestrictions {
        &self.locale_restrictions
    }

    /// The restriction link table
    pub fn restriction_links(&self) -> &RestrictionLinks {
        &self.restriction_links
    }

    /// Whether accidental locale prefixes redirect under the no-prefix strategy
    pub fn no_prefix_redirect(&self) -> bool {
        self.no_prefix_redirect
    }

    /// Custom path entry for a lookup key, lenient about a leading slash
    ///
    /// Keys in the table may be path-shaped (`/about`) or name-shaped
    /// (`about`, `parent/child`); a probe matches either spelling.
    pub fn custom_entry(&self, key: &str) -> Option<&CustomRoutePaths> {
        lenient_get(&self.custom_paths, key)
    }

    /// Restriction entry for a lookup key, lenient about a leading slash
    pub fn restriction_entry(&self, key: &str) -> Option<&Vec<String>> {
        lenient_get(&self.locale_restrictions, key)
    }

    /// Restriction link for a lookup key, lenient about a leading slash
    pub fn restriction_link(&self, key: &str) -> Option<&String> {
        lenient_get(&self.restriction_links, key)
    }
}

fn lenient_get<'a, V>(map: &'a HashMap<String, V>, key: &str) -> Option<&'a V> {
    if let Some(value) = map.get(key) {
        return Some(value);
    }
    match key.strip_prefix('/') {
        Some(stripped) => map.get(stripped),
        None => map.get(&format!("/{key}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locales() -> Vec<Locale> {
        vec![Locale::new("en"), Locale::new("de")]
    }

    #[test]
    fn lenient_probe_matches_either_slash_spelling() {
        let mut custom = CustomRouteMap::new();
        custom.insert(
            "/about".to_string(),
            CustomRoutePaths::Localized(HashMap::from([(
                "de".to_string(),
                "/ueber-uns".to_string(),
            )])),
        );
        custom.insert("static".to_string(), CustomRoutePaths::Disabled);

        let ctx = RoutingContext::new(PrefixStrategy::Prefix, locales(), "en")
            .with_custom_paths(custom);

        assert!(ctx.custom_entry("/about").is_some());
        assert!(ctx.custom_entry("about").is_some());
        assert!(ctx.custom_entry("/static").is_some());
        assert!(ctx.custom_entry("static").is_some());
        assert!(ctx.custom_entry("/missing").is_none());
    }

    #[test]
    fn disabled_sentinel_deserializes_from_false() {
        let map: CustomRouteMap = serde_json::from_str(
            r#"{"/about": {"en": "/about-us", "de": "/ueber-uns"}, "static": false}"#,
        )
        .unwrap();
        assert_eq!(map.get("static"), Some(&CustomRoutePaths::Disabled));
        assert!(matches!(
            map.get("/about"),
            Some(CustomRoutePaths::Localized(_))
        ));
    }

    #[test]
    fn true_is_rejected() {
        let result: Result<CustomRoutePaths, _> = serde_json::from_str("true");
        assert!(result.is_err());
    }

    #[test]
    fn context_serde_round_trip() {
        let ctx = RoutingContext::new(PrefixStrategy::PrefixExceptDefault, locales(), "en")
            .with_no_prefix_redirect(true)
            .with_locale_restrictions(LocaleRestrictions::from([(
                "about".to_string(),
                vec!["en".to_string()],
            )]));
        let json = serde_json::to_string(&ctx).unwrap();
        let back: RoutingContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ctx);
    }
}
