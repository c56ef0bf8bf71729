//! # locale-router
//!
//! Locale-aware route resolution for web applications with multiple locales.
//! Given a target locale and a logical route reference, the engine computes
//! the physical URL under the configured localization policy, and performs
//! the inverse operations: extracting a locale from an observed URL and
//! deciding whether an observed URL must redirect to its canonical form.
//!
//! The engine is framework-agnostic. The host's routing table is consumed
//! only through the two-method [`RouterAdapter`] trait; everything else is
//! pure, synchronous computation over the read-only [`RoutingContext`].
//! No input is ever mutated and no call memoizes anything: every resolution
//! recomputes fully from its arguments.
//!
//! ## Example
//!
//! ```
//! use locale_router::{
//!     Locale, LocaleRouter, PrefixStrategy, RoutingContext, StaticRouter,
//! };
//!
//! let context = RoutingContext::new(
//!     PrefixStrategy::PrefixExceptDefault,
//!     vec![Locale::new("en"), Locale::new("de")],
//!     "en",
//! );
//! let router = StaticRouter::new()
//!     .with_route("localized-about-en", "/about")
//!     .with_route("localized-about-de", "/de/about");
//! let routes = LocaleRouter::new(context, router);
//!
//! assert_eq!(routes.locale_route("de", "/about").path, "/de/about");
//! assert_eq!(routes.locale_route("en", "/about").path, "/about");
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod adapter;
pub mod context;
pub mod locale;
pub mod path;
pub mod resolver;
pub mod strategy;

pub use adapter::{RouterAdapter, RouterError, StaticRouter};
pub use context::{
    CustomRouteMap, CustomRoutePaths, LocaleRestrictions, RestrictionLinks, RoutingContext,
    DEFAULT_ROUTE_NAME_PREFIX,
};
pub use locale::{strip_locale, Locale, StrippedPath};
pub use resolver::RouteResolver;
pub use strategy::PrefixStrategy;

use crate::path::{
    build_url, clean_path, join_url, normalize_path, parse_query, path_segments, split_query_hash,
};
use crate::resolver::{name_segments, substitute_params, synthesize_template};

/// A route parameter value
///
/// List values join with `/` when substituted into a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A single value
    Single(String),
    /// A multi-segment value, e.g. a catch-all capture
    List(Vec<String>),
}

impl ParamValue {
    /// The value as it appears in a path
    pub fn as_path_value(&self) -> String {
        match self {
            Self::Single(value) => value.clone(),
            Self::List(values) => values.join("/"),
        }
    }

    /// Whether the value is empty (and placeholders stay untouched)
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(value) => value.is_empty(),
            Self::List(values) => values.is_empty(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

/// Route parameters by name
pub type Params = HashMap<String, ParamValue>;

/// A query parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// A single value
    Single(String),
    /// Repeated `key=value` pairs
    List(Vec<String>),
}

/// Query pairs in insertion order
pub type Query = Vec<(String, QueryValue)>;

/// A logical route reference: any subset of the fields may be present
///
/// A `&str` converts directly: strings starting with `/` become path
/// references, anything else a name reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteRef {
    /// Route name
    pub name: Option<String>,
    /// Route path (may still carry a query/hash suffix)
    pub path: Option<String>,
    /// Parameters for path templates
    pub params: Params,
    /// Query pairs
    pub query: Query,
    /// Hash fragment
    pub hash: Option<String>,
    /// Full path including query and hash
    pub full_path: Option<String>,
}

impl RouteRef {
    /// A reference by route name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Adds one parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Replaces the parameter set
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Adds one query pair
    pub fn with_query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .push((key.into(), QueryValue::Single(value.into())));
        self
    }

    /// Replaces the query
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Sets the hash fragment
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }
}

impl From<&str> for RouteRef {
    fn from(value: &str) -> Self {
        if value.starts_with('/') {
            Self::default().with_path(value)
        } else {
            Self::named(value)
        }
    }
}

impl From<String> for RouteRef {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&ResolvedRoute> for RouteRef {
    fn from(route: &ResolvedRoute) -> Self {
        Self {
            name: route.name.clone(),
            path: Some(route.path.clone()),
            params: route.params.clone(),
            query: route.query.clone(),
            hash: route.hash.clone(),
            full_path: Some(route.full_path.clone()),
        }
    }
}

/// A fully-formed route: what the host router and this engine return
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    /// Route name, if one applies
    pub name: Option<String>,
    /// The physical path, without query or hash
    pub path: String,
    /// The path with query and hash reattached
    pub full_path: String,
    /// Parameters
    pub params: Params,
    /// Query pairs
    pub query: Query,
    /// Hash fragment
    pub hash: Option<String>,
}

/// One alternate-language link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HreflangEntry {
    /// Locale code the entry targets
    pub code: String,
    /// The localized href, absolute when the locale has its own host
    pub href: String,
}

/// Canonical and alternate-language attributes for a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeoAttributes {
    /// The page's own prefixed custom path, if one is configured
    pub canonical: Option<String>,
    /// One entry per allowed locale
    pub hreflangs: Vec<HreflangEntry>,
}

/// Overrides applied while switching a route to another locale
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwitchOptions {
    /// Parameters merged over the route's own
    pub params: Params,
    /// Query replacing the route's own when non-empty
    pub query: Query,
}

/// The resolution façade tying strategies, the resolver, and the host
/// router together
///
/// Holds the read-only [`RoutingContext`] and the host's [`RouterAdapter`].
/// Every operation recomputes from its inputs; the context is never
/// mutated, and the adapter may be swapped at any time with
/// [`Self::set_router`].
pub struct LocaleRouter {
    context: RoutingContext,
    router: Box<dyn RouterAdapter + Send + Sync>,
}

impl LocaleRouter {
    /// Creates the façade over a context and a host router adapter
    pub fn new(
        context: RoutingContext,
        router: impl RouterAdapter + Send + Sync + 'static,
    ) -> Self {
        Self {
            context,
            router: Box::new(router),
        }
    }

    /// The static configuration
    pub fn context(&self) -> &RoutingContext {
        &self.context
    }

    /// Replaces the router adapter, effective on the next call
    pub fn set_router(&mut self, router: impl RouterAdapter + Send + Sync + 'static) {
        self.router = Box::new(router);
    }

    /// Resolves a route reference under a target locale
    ///
    /// Never fails: in the worst case the reference comes back normalized
    /// but otherwise unchanged.
    pub fn locale_route(&self, target_locale: &str, target: impl Into<RouteRef>) -> ResolvedRoute {
        self.locale_route_from(target_locale, target, None)
    }

    /// [`Self::locale_route`] with the currently displayed route available
    /// as context for nested custom-path composition
    ///
    /// The chain is an ordered list of rules; the first one to produce a
    /// route wins, and the terminal synthesis rule always produces one.
    pub fn locale_route_from(
        &self,
        target_locale: &str,
        target: impl Into<RouteRef>,
        current: Option<&ResolvedRoute>,
    ) -> ResolvedRoute {
        let target = lift_query_hash(target.into());
        let resolver = RouteResolver::new(&self.context);

        if let Some(route) = self.try_never_localized(&resolver, &target) {
            return route;
        }
        if let Some(resolved) = self.resolve_by_localized_name(&resolver, target_locale, &target) {
            return self.merge(resolved, &target);
        }

        // Resolve through the host router; a throw is a miss and the
        // reference is used as given.
        let (resolved, router_hit) = match self.router.resolve(&target) {
            Ok(resolved) => (resolved, true),
            Err(error) => {
                debug!(%error, "router miss, using reference as given");
                (resolved_from_ref(&target), false)
            }
        };

        if let Some(route) = self.try_resolved_never_localized(&resolver, &target, &resolved) {
            return route;
        }
        if let Some(route) =
            self.try_custom_path(&resolver, target_locale, &target, &resolved, current)
        {
            return route;
        }
        if let Some(route) = self.try_concrete_path(target_locale, &target, &resolved, router_hit) {
            return route;
        }
        self.synthesize(&resolver, target_locale, &target, &resolved)
    }

    /// Re-targets a resolved route at another locale
    ///
    /// Only name-driven resolution applies here; the terminal fallback is
    /// the original route with the target locale's name, or the original
    /// route untouched under the no-prefix strategy, which never
    /// materializes locale-suffixed names.
    pub fn switch_locale_route(
        &self,
        from_locale: &str,
        to_locale: &str,
        route: &ResolvedRoute,
        options: &SwitchOptions,
    ) -> ResolvedRoute {
        debug!(from = %from_locale, to = %to_locale, "switching locale");
        let strategy = self.context.strategy();
        if strategy == PrefixStrategy::NoPrefix {
            return route.clone();
        }
        let Some(name) = &route.name else {
            return route.clone();
        };

        let resolver = RouteResolver::new(&self.context);
        let mut params = route.params.clone();
        params.extend(options.params.clone());
        let query = if options.query.is_empty() {
            route.query.clone()
        } else {
            options.query.clone()
        };
        let target = RouteRef {
            name: Some(name.clone()),
            path: None,
            params,
            query,
            hash: route.hash.clone(),
            full_path: None,
        };

        if let Some(resolved) = self.resolve_by_localized_name(&resolver, to_locale, &target) {
            return self.merge(resolved, &target);
        }

        let base = resolver.route_base_name(name);
        let target_name = strategy.localized_route_name(&base, to_locale, &self.context);
        let mut out = route.clone();
        out.name = Some(target_name);
        out.params = target.params;
        out.query = target.query;
        out.full_path = build_url(&out.path, &out.query, out.hash.as_deref());
        out
    }

    /// The canonical localized form an observed path must redirect to, if any
    pub fn get_redirect(&self, current_path: &str, target_locale: &str) -> Option<String> {
        let resolver = RouteResolver::new(&self.context);
        let (path, query, hash) = split_query_hash(current_path);
        let stripped = strip_locale(path, &self.context.locale_codes());

        // A "never localize" route only ever sheds an accidental prefix.
        let probe = resolved_from_ref(&RouteRef::default().with_path(path));
        if resolver.unlocalized_path(&probe).is_some() {
            return stripped.locale.map(|_| {
                let mut out = stripped.path_without_locale;
                if let Some(query) = query {
                    out.push('?');
                    out.push_str(query);
                }
                if let Some(hash) = hash {
                    out.push_str(hash);
                }
                out
            });
        }

        self.context
            .strategy()
            .redirect(current_path, target_locale, &self.context)
    }

    /// The locale an observed path belongs to, under the active strategy
    pub fn resolve_locale_from_path(&self, path: &str) -> Option<String> {
        self.context
            .strategy()
            .locale_from_path(path, &self.context)
    }

    /// The raw locale prefix of a path, strategy-independent
    pub fn get_locale_from_path(&self, path: &str) -> Option<String> {
        strip_locale(path, &self.context.locale_codes()).locale
    }

    /// The page's own prefixed custom path under a target locale
    ///
    /// `None` when no custom path is configured for the route; the
    /// unprefixed path when the route is marked "never localize".
    pub fn canonical_path(&self, route: &ResolvedRoute, target_locale: &str) -> Option<String> {
        let resolver = RouteResolver::new(&self.context);
        if let Some(path) = resolver.unlocalized_path(route) {
            return Some(path);
        }
        let custom = resolver.resolve_custom_path(route, target_locale)?;
        Some(
            self.context
                .strategy()
                .localize_path(&custom, target_locale, &self.context),
        )
    }

    /// Canonical and hreflang attributes for the current page
    pub fn seo_attributes(&self, route: &ResolvedRoute) -> SeoAttributes {
        let current_locale = self
            .resolve_locale_from_path(&route.path)
            .unwrap_or_else(|| self.context.default_locale().to_string());
        let canonical = self.canonical_path(route, &current_locale);

        let mut hreflangs = Vec::new();
        for code in self.allowed_locales_for_route(route) {
            let mut target = RouteRef::from(route);
            target.query = Query::new();
            target.hash = None;
            let resolved = self.locale_route_from(&code, target, Some(route));
            let href = match self.context.locale(&code).and_then(|l| l.base_url.as_deref()) {
                Some(base) => join_url(&[base, &resolved.path]),
                None => resolved.path,
            };
            hreflangs.push(HreflangEntry { code, href });
        }

        // x-default mirrors the default locale's entry when it is allowed.
        let default = self.context.default_locale();
        if let Some(entry) = hreflangs.iter().find(|e| e.code == default) {
            let href = entry.href.clone();
            hreflangs.push(HreflangEntry {
                code: "x-default".to_string(),
                href,
            });
        }

        SeoAttributes {
            canonical,
            hreflangs,
        }
    }

    /// The locales a route may resolve under
    pub fn allowed_locales_for_route(&self, route: &ResolvedRoute) -> Vec<String> {
        RouteResolver::new(&self.context).allowed_locales(route)
    }

    // A name the custom path table marks "never localize" short-circuits
    // everything.
    fn try_never_localized(
        &self,
        resolver: &RouteResolver<'_>,
        target: &RouteRef,
    ) -> Option<ResolvedRoute> {
        let name = target.name.as_deref()?;
        let path = resolver.unlocalized_path_by_name(name)?;
        debug!(name = %name, "route is never localized");
        Some(self.finish(Some(name.to_string()), path, target, None))
    }

    // The sentinel re-checked against the resolved route, whose path may
    // expose a key the bare reference did not.
    fn try_resolved_never_localized(
        &self,
        resolver: &RouteResolver<'_>,
        target: &RouteRef,
        resolved: &ResolvedRoute,
    ) -> Option<ResolvedRoute> {
        let path = resolver.unlocalized_path(resolved)?;
        debug!(path = %path, "resolved route is never localized");
        Some(self.finish(resolved.name.clone(), path, target, None))
    }

    // A locale-specific custom path, composed with its parent when the
    // route is a nested override.
    fn try_custom_path(
        &self,
        resolver: &RouteResolver<'_>,
        target_locale: &str,
        target: &RouteRef,
        resolved: &ResolvedRoute,
        current: Option<&ResolvedRoute>,
    ) -> Option<ResolvedRoute> {
        let custom = resolver.resolve_custom_path(resolved, target_locale)?;
        let path = self
            .compose_nested(resolver, resolved, &custom, target_locale, current)
            .unwrap_or(custom);
        let localized = self
            .context
            .strategy()
            .localize_path(&path, target_locale, &self.context);
        Some(self.finish(resolved.name.clone(), localized, target, Some(resolved)))
    }

    // A concrete resolved path is re-prefixed as-is; only a reference the
    // router never saw falls through to name synthesis.
    fn try_concrete_path(
        &self,
        target_locale: &str,
        target: &RouteRef,
        resolved: &ResolvedRoute,
        router_hit: bool,
    ) -> Option<ResolvedRoute> {
        if !router_hit && (resolved.path.is_empty() || resolved.path == "/") {
            return None;
        }
        let stripped = strip_locale(&resolved.path, &self.context.locale_codes());
        let localized = self.context.strategy().localize_path(
            &stripped.path_without_locale,
            target_locale,
            &self.context,
        );
        Some(self.finish(resolved.name.clone(), localized, target, Some(resolved)))
    }

    // Name-driven resolution: the localized-name attempts shared by
    // `locale_route` and `switch_locale_route`.
    fn resolve_by_localized_name(
        &self,
        resolver: &RouteResolver<'_>,
        locale: &str,
        target: &RouteRef,
    ) -> Option<ResolvedRoute> {
        let name = target.name.as_deref()?;
        let strategy = self.context.strategy();
        let base = resolver.route_base_name(name);

        if !target.params.is_empty() {
            let localized = strategy.localized_route_name(&base, locale, &self.context);
            if self.router.has_route(&localized) {
                let attempt = RouteRef {
                    name: Some(localized),
                    path: None,
                    params: target.params.clone(),
                    query: target.query.clone(),
                    hash: target.hash.clone(),
                    full_path: None,
                };
                if let Ok(resolved) = self.router.resolve(&attempt) {
                    return Some(resolved);
                }
            }

            // Only the suffix-less localized name exists; it expects the
            // locale as a route parameter instead.
            let unsuffixed = format!("{}{}", self.context.route_name_prefix(), base);
            if self.router.has_route(&unsuffixed) {
                let mut params = target.params.clone();
                params
                    .entry("locale".to_string())
                    .or_insert_with(|| ParamValue::Single(locale.to_string()));
                let attempt = RouteRef {
                    name: Some(unsuffixed),
                    path: None,
                    params,
                    query: target.query.clone(),
                    hash: target.hash.clone(),
                    full_path: None,
                };
                if let Ok(resolved) = self.router.resolve(&attempt) {
                    return Some(resolved);
                }
            }
            return None;
        }

        // Without parameters: the name as given first, then the derived
        // base when the name itself looked like an already-localized name.
        let mut candidates = vec![name.to_string()];
        if base != name {
            candidates.push(base);
        }
        for candidate in candidates {
            let localized = strategy.localized_route_name(&candidate, locale, &self.context);
            if self.router.has_route(&localized) {
                let attempt = RouteRef {
                    name: Some(localized),
                    path: None,
                    params: Params::new(),
                    query: target.query.clone(),
                    hash: target.hash.clone(),
                    full_path: None,
                };
                if let Ok(resolved) = self.router.resolve(&attempt) {
                    return Some(resolved);
                }
            }
        }
        None
    }

    // Nested custom-path composition: parent localized path + the child's
    // own custom segment.
    fn compose_nested(
        &self,
        resolver: &RouteResolver<'_>,
        resolved: &ResolvedRoute,
        custom: &str,
        locale: &str,
        current: Option<&ResolvedRoute>,
    ) -> Option<String> {
        let name = resolved.name.as_deref()?;
        let base = resolver.route_base_name(name);
        let parent_segments = resolver.nested_parent_segments(&base)?;
        let segment_refs: Vec<&str> = parent_segments.iter().map(String::as_str).collect();

        let parent_path = resolver
            .parent_custom_path(&segment_refs, locale)
            .or_else(|| {
                current.map(|route| {
                    strip_locale(&route.path, &self.context.locale_codes()).path_without_locale
                })
            })
            .unwrap_or_else(|| join_url(&[&parent_segments.join("/")]));

        let child_segment = path_segments(custom).last().map(|s| s.to_string())?;
        Some(join_url(&[&parent_path, &child_segment]))
    }

    // Terminal synthesis from the base name's segments.
    fn synthesize(
        &self,
        resolver: &RouteResolver<'_>,
        locale: &str,
        target: &RouteRef,
        resolved: &ResolvedRoute,
    ) -> ResolvedRoute {
        let strategy = self.context.strategy();
        let name = resolved.name.clone().or_else(|| target.name.clone());
        let base = name
            .as_deref()
            .map(|n| resolver.route_base_name(n))
            .unwrap_or_default();
        let segments = name_segments(&base);
        let template = synthesize_template(&segments, &target.params);
        let path = substitute_params(&template, &target.params);

        if !base.is_empty() {
            let localized_name = strategy.localized_route_name(&base, locale, &self.context);
            if self.router.has_route(&localized_name) {
                let attempt = RouteRef {
                    name: Some(localized_name.clone()),
                    path: None,
                    params: target.params.clone(),
                    query: target.query.clone(),
                    hash: target.hash.clone(),
                    full_path: None,
                };
                if let Ok(routed) = self.router.resolve(&attempt) {
                    let stripped = strip_locale(&routed.path, &self.context.locale_codes());
                    let localized = strategy.localize_path(
                        &stripped.path_without_locale,
                        locale,
                        &self.context,
                    );
                    return self.finish(Some(localized_name), localized, target, Some(&routed));
                }
            }
            debug!(template = %template, "synthesized path from route name");
            let localized = strategy.localize_path(&path, locale, &self.context);
            return self.finish(Some(localized_name), localized, target, None);
        }

        let localized = strategy.localize_path(&path, locale, &self.context);
        self.finish(name, localized, target, None)
    }

    // Builds the final route. The caller's query and hash always win over
    // anything intermediate resolution produced; full_path is recomputed.
    fn finish(
        &self,
        name: Option<String>,
        path: String,
        target: &RouteRef,
        resolved: Option<&ResolvedRoute>,
    ) -> ResolvedRoute {
        let path = normalize_path(&path).into_owned();
        let query = if !target.query.is_empty() {
            target.query.clone()
        } else {
            resolved.map(|r| r.query.clone()).unwrap_or_default()
        };
        let hash = target
            .hash
            .clone()
            .or_else(|| resolved.and_then(|r| r.hash.clone()));
        let mut params = resolved.map(|r| r.params.clone()).unwrap_or_default();
        params.extend(target.params.clone());
        let full_path = build_url(&path, &query, hash.as_deref());
        ResolvedRoute {
            name,
            path,
            full_path,
            params,
            query,
            hash,
        }
    }

    fn merge(&self, mut resolved: ResolvedRoute, target: &RouteRef) -> ResolvedRoute {
        if !target.query.is_empty() {
            resolved.query = target.query.clone();
        }
        if target.hash.is_some() {
            resolved.hash = target.hash.clone();
        }
        resolved.full_path = build_url(&resolved.path, &resolved.query, resolved.hash.as_deref());
        resolved
    }
}

// A reference used as-is when the router cannot resolve it.
fn resolved_from_ref(target: &RouteRef) -> ResolvedRoute {
    let path = target
        .path
        .as_deref()
        .map(|p| normalize_path(clean_path(p)).into_owned())
        .unwrap_or_else(|| "/".to_string());
    let full_path = build_url(&path, &target.query, target.hash.as_deref());
    ResolvedRoute {
        name: target.name.clone(),
        path,
        full_path,
        params: target.params.clone(),
        query: target.query.clone(),
        hash: target.hash.clone(),
    }
}

// Lifts a query/hash suffix off the path field into the reference's own
// query and hash, which otherwise take precedence.
fn lift_query_hash(mut target: RouteRef) -> RouteRef {
    let source = target.path.clone().or_else(|| target.full_path.clone());
    if let Some(source) = source {
        let (path, query, hash) = split_query_hash(&source);
        if target.query.is_empty() {
            if let Some(raw) = query {
                target.query = parse_query(raw);
            }
        }
        if target.hash.is_none() {
            if let Some(hash) = hash {
                target.hash = Some(hash.to_string());
            }
        }
        target.path = Some(path.to_string());
    }
    target
}
