//! Custom-path lookup and route-key derivation
//!
//! [`RouteResolver`] answers the table-driven questions about a resolved
//! route: what its base name is, which keys may index it in the custom path
//! table, whether a locale-specific override or a "never localize" sentinel
//! applies, which locales are allowed for it, and how nested overrides
//! compose with their parent paths.

use tracing::trace;

use crate::context::{CustomRoutePaths, RoutingContext};
use crate::locale::strip_locale;
use crate::path::{
    first_hyphen_to_slash, join_url, last_hyphen_to_slash, normalize_path, to_path_form,
};
use crate::{Params, ResolvedRoute};

/// How a lookup key was derived, deciding which unprefixed path a
/// `Disabled` sentinel match falls back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyShape {
    Path,
    Name,
}

#[derive(Debug)]
struct LookupKey {
    key: String,
    shape: KeyShape,
}

/// Table-lookup logic over a [`RoutingContext`]
#[derive(Debug, Clone, Copy)]
pub struct RouteResolver<'a> {
    ctx: &'a RoutingContext,
}

impl<'a> RouteResolver<'a> {
    /// Creates a resolver reading from the given context
    pub fn new(ctx: &'a RoutingContext) -> Self {
        Self { ctx }
    }

    /// Extracts a route's base name
    ///
    /// Strips the configured name prefix if present, then a trailing
    /// `-{localeCode}` suffix. The longest configured code wins, so
    /// `blog-en-US` under locales `en` and `en-US` strips to `blog`, and the
    /// hyphen must be a real segment boundary: `product-screen` under
    /// locale `en` stays whole.
    pub fn route_base_name(&self, name: &str) -> String {
        let base = name
            .strip_prefix(self.ctx.route_name_prefix())
            .unwrap_or(name);

        let mut codes = self.ctx.locale_codes();
        codes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        for code in codes {
            let suffix = format!("-{code}");
            if let Some(stripped) = base.strip_suffix(suffix.as_str()) {
                if !stripped.is_empty() {
                    return stripped.to_string();
                }
            }
        }
        base.to_string()
    }

    /// The ordered candidate keys probed against the custom path table
    ///
    /// First key with a matching entry wins; callers must preserve this
    /// order.
    pub fn lookup_keys(&self, route: &ResolvedRoute) -> Vec<String> {
        self.tagged_lookup_keys(route)
            .into_iter()
            .map(|k| k.key)
            .collect()
    }

    fn tagged_lookup_keys(&self, route: &ResolvedRoute) -> Vec<LookupKey> {
        let stripped = strip_locale(&route.path, &self.ctx.locale_codes());
        let path_without_locale = stripped.path_without_locale;

        let mut keys: Vec<LookupKey> = Vec::new();
        let push = |key: String, shape: KeyShape, keys: &mut Vec<LookupKey>| {
            if !keys.iter().any(|k| k.key == key) {
                keys.push(LookupKey { key, shape });
            }
        };

        push(path_without_locale.clone(), KeyShape::Path, &mut keys);
        if let Some(bare) = path_without_locale.strip_prefix('/') {
            if !bare.is_empty() {
                push(bare.to_string(), KeyShape::Path, &mut keys);
            }
        }
        if path_without_locale == "/" {
            push(String::new(), KeyShape::Path, &mut keys);
        }

        if let Some(name) = &route.name {
            let base = self.route_base_name(name);
            if !base.is_empty() {
                for key in self.name_shaped_keys(&base) {
                    push(key, KeyShape::Name, &mut keys);
                }
            }
        }

        keys
    }

    fn name_shaped_keys(&self, base: &str) -> Vec<String> {
        let mut keys = vec![format!("/{base}"), base.to_string()];
        let path_form = to_path_form(base);
        if path_form != base {
            keys.push(path_form);
        }
        if base.contains('-') {
            keys.push(first_hyphen_to_slash(base));
            keys.push(last_hyphen_to_slash(base));
        }
        keys.dedup();
        keys
    }

    /// Resolves the locale-specific custom path for a route
    ///
    /// Walks the lookup keys; the first key holding a locale table decides.
    /// Returns `None` when no key matches, or when the winning table has no
    /// entry for `locale`. Parameters are substituted into the template.
    pub fn resolve_custom_path(&self, route: &ResolvedRoute, locale: &str) -> Option<String> {
        for key in self.lookup_keys(route) {
            match self.ctx.custom_entry(&key) {
                Some(CustomRoutePaths::Localized(paths)) => {
                    trace!(key = %key, locale = %locale, "custom path table hit");
                    return paths
                        .get(locale)
                        .map(|template| substitute_params(template, &route.params));
                }
                // The sentinel is not a locale table; keep walking.
                Some(CustomRoutePaths::Disabled) | None => continue,
            }
        }
        None
    }

    /// The unprefixed path for a route marked "never localize", if any
    ///
    /// A match on a name-shaped key yields the transformed base name as
    /// path; a match on a path-shaped key yields the path itself, locale
    /// stripped.
    pub fn unlocalized_path(&self, route: &ResolvedRoute) -> Option<String> {
        let stripped = strip_locale(&route.path, &self.ctx.locale_codes());
        for key in self.tagged_lookup_keys(route) {
            if matches!(self.ctx.custom_entry(&key.key), Some(CustomRoutePaths::Disabled)) {
                let path = match key.shape {
                    KeyShape::Name => {
                        let base = self.route_base_name(route.name.as_deref().unwrap_or(""));
                        normalize_path(&to_path_form(&base)).into_owned()
                    }
                    KeyShape::Path => stripped.path_without_locale.clone(),
                };
                return Some(path);
            }
        }
        None
    }

    /// Name-only variant of [`Self::unlocalized_path`]
    pub fn unlocalized_path_by_name(&self, name: &str) -> Option<String> {
        let base = self.route_base_name(name);
        if base.is_empty() {
            return None;
        }
        for key in self.name_shaped_keys(&base) {
            if matches!(self.ctx.custom_entry(&key), Some(CustomRoutePaths::Disabled)) {
                return Some(normalize_path(&to_path_form(&base)).into_owned());
            }
        }
        None
    }

    /// The locales a route may resolve under
    ///
    /// A restriction link on the base name is tried first, then the regular
    /// lookup keys. A found list is filtered to configured codes; no entry
    /// anywhere means every configured locale is allowed.
    pub fn allowed_locales(&self, route: &ResolvedRoute) -> Vec<String> {
        let configured = self.ctx.locale_codes();

        let mut keys: Vec<String> = Vec::new();
        if let Some(name) = &route.name {
            let base = self.route_base_name(name);
            if let Some(linked) = self.ctx.restriction_link(&base) {
                keys.push(linked.clone());
            }
        }
        keys.extend(self.lookup_keys(route));

        for key in keys {
            if let Some(list) = self.ctx.restriction_entry(&key) {
                return list
                    .iter()
                    .filter(|code| configured.contains(&code.as_str()))
                    .cloned()
                    .collect();
            }
        }

        configured.into_iter().map(str::to_string).collect()
    }

    /// The localized path of a nested route's parent
    ///
    /// `segments` are the parent's name segments. The parent's own custom
    /// entry for `locale` wins; otherwise the segments join back into a
    /// plain path.
    pub fn parent_path_for_nested(&self, segments: &[&str], locale: &str) -> String {
        self.parent_custom_path(segments, locale)
            .unwrap_or_else(|| join_url(&[&segments.join("/")]))
    }

    /// The parent's own custom path for `locale`, if one is configured
    ///
    /// Probes the slash-joined key first, then the hyphen-joined one.
    pub fn parent_custom_path(&self, segments: &[&str], locale: &str) -> Option<String> {
        let slash_key = segments.join("/");
        let hyphen_key = segments.join("-");
        for key in [slash_key.as_str(), hyphen_key.as_str()] {
            if let Some(CustomRoutePaths::Localized(paths)) = self.ctx.custom_entry(key) {
                if let Some(path) = paths.get(locale) {
                    return Some(normalize_path(path).into_owned());
                }
            }
        }
        None
    }

    /// Whether the base name's parent exists in the custom path table
    ///
    /// Tries the last-hyphen and first-hyphen slash interpretations of the
    /// name, in that order, and returns the parent's name segments for the
    /// first interpretation whose parent key is present.
    pub fn nested_parent_segments(&self, base: &str) -> Option<Vec<String>> {
        if !base.contains('-') {
            return None;
        }
        for slash_form in [last_hyphen_to_slash(base), first_hyphen_to_slash(base)] {
            let parent_hyphen = crate::path::parent_key_from_slash_form(&slash_form);
            if parent_hyphen.is_empty() {
                continue;
            }
            let parent_slash = to_path_form(&parent_hyphen);
            if self.ctx.custom_entry(&parent_slash).is_some()
                || self.ctx.custom_entry(&parent_hyphen).is_some()
            {
                return Some(
                    parent_slash
                        .split('/')
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect(),
                );
            }
        }
        None
    }
}

/// Substitutes parameters into a path template
///
/// Recognizes `:key`, `:key()`, and `[...key]` placeholders. Array values
/// join with `/`. A placeholder whose parameter is missing or empty is left
/// untouched.
///
/// # Examples
///
/// ```
/// use locale_router::resolver::substitute_params;
/// use locale_router::{ParamValue, Params};
///
/// let mut params = Params::new();
/// params.insert("id".to_string(), ParamValue::Single("7".to_string()));
/// params.insert(
///     "slug".to_string(),
///     ParamValue::List(vec!["a".to_string(), "b".to_string()]),
/// );
///
/// assert_eq!(substitute_params("/post/:id", &params), "/post/7");
/// assert_eq!(substitute_params("/docs/[...slug]", &params), "/docs/a/b");
/// assert_eq!(substitute_params("/post/:missing", &params), "/post/:missing");
/// ```
pub fn substitute_params(template: &str, params: &Params) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find([':', '[']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix("[...") {
            if let Some(end) = after.find(']') {
                let key = &after[..end];
                match param_value(params, key) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(&tail[..end + 5]),
                }
                rest = &after[end + 1..];
                continue;
            }
        }

        if let Some(after) = tail.strip_prefix(':') {
            let key_len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            if key_len > 0 {
                let key = &after[..key_len];
                let mut consumed = 1 + key_len;
                if tail[consumed..].starts_with("()") {
                    consumed += 2;
                }
                match param_value(params, key) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(&tail[..consumed]),
                }
                rest = &tail[consumed..];
                continue;
            }
        }

        // Lone ':' or '[' with no placeholder behind it
        out.push_str(&tail[..1]);
        rest = &tail[1..];
    }

    out.push_str(rest);
    out
}

fn param_value(params: &Params, key: &str) -> Option<String> {
    let value = params.get(key)?;
    if value.is_empty() {
        return None;
    }
    Some(value.as_path_value())
}

/// Builds a synthesized path template from base-name segments and params
///
/// When exactly the last segment names a provided parameter, it substitutes
/// in place (`test-id` with `{id}` becomes `/test/:id`); otherwise the last
/// *N* segments are replaced by the *N* provided parameter keys, in sorted
/// key order for determinism.
pub fn synthesize_template(segments: &[&str], params: &Params) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }

    let mut parts: Vec<String> = segments.iter().map(|s| (*s).to_string()).collect();

    let last_matches = segments
        .last()
        .map(|last| params.contains_key(*last))
        .unwrap_or(false);

    if last_matches {
        let last = parts.len() - 1;
        parts[last] = format!(":{}", segments[segments.len() - 1]);
    } else if !params.is_empty() {
        let mut keys: Vec<&String> = params.keys().collect();
        keys.sort();
        let n = keys.len().min(parts.len());
        let offset = parts.len() - n;
        for (slot, key) in parts[offset..].iter_mut().zip(keys) {
            *slot = format!(":{key}");
        }
    }

    format!("/{}", parts.join("/"))
}

/// Splits a base name into its hyphen segments
pub fn name_segments(base: &str) -> Vec<&str> {
    base.split('-').filter(|s| !s.is_empty()).collect()
}
