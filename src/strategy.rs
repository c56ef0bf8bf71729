//! Locale prefixing strategies
//!
//! A strategy decides whether and where a locale code appears in a path: how
//! paths are prefixed, how localized route names are built, how a locale is
//! detected from an observed path, and when an observed path must redirect
//! to its canonical form. The four variants share one shape; the resolution
//! flow in [`crate::LocaleRouter`] calls these hooks through the active
//! variant.

use serde::{Deserialize, Serialize};

use crate::context::RoutingContext;
use crate::locale::strip_locale;
use crate::path::{join_url, normalize_path, split_query_hash};

/// Policy controlling whether a locale code prefixes URL paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixStrategy {
    /// No locale ever appears in the path
    NoPrefix,
    /// Every locale is prefixed, the default included
    Prefix,
    /// Every locale except the default is prefixed
    PrefixExceptDefault,
    /// Every locale is prefixed, but unprefixed paths stay valid
    PrefixAndDefault,
}

impl PrefixStrategy {
    /// Whether paths for this locale carry a `/{locale}` prefix
    ///
    /// Under `prefix_except_default`, a locale serving from its own host as
    /// that host's default is treated like the global default.
    pub fn should_prefix(self, locale: &str, ctx: &RoutingContext) -> bool {
        match self {
            Self::NoPrefix => false,
            Self::Prefix | Self::PrefixAndDefault => true,
            Self::PrefixExceptDefault => {
                if locale == ctx.default_locale() {
                    return false;
                }
                match ctx.locale(locale) {
                    Some(entry) => !(entry.base_url.is_some() && entry.base_default),
                    None => true,
                }
            }
        }
    }

    /// Applies this strategy's prefix rule to a path
    pub fn localize_path(self, path: &str, locale: &str, ctx: &RoutingContext) -> String {
        if self.should_prefix(locale, ctx) {
            join_url(&[locale, path])
        } else {
            normalize_path(path).into_owned()
        }
    }

    /// Builds the localized route name for a base name
    ///
    /// The generated table names localized routes `{prefix}{base}-{locale}`.
    /// The no-prefix strategy keeps a single route per page, so the base
    /// name is returned unchanged.
    pub fn localized_route_name(self, base: &str, locale: &str, ctx: &RoutingContext) -> String {
        match self {
            Self::NoPrefix => base.to_string(),
            _ => format!("{}{}-{}", ctx.route_name_prefix(), base, locale),
        }
    }

    /// Detects the locale an observed path belongs to
    pub fn locale_from_path(self, path: &str, ctx: &RoutingContext) -> Option<String> {
        match self {
            Self::NoPrefix => None,
            Self::Prefix | Self::PrefixAndDefault => {
                strip_locale(path, &ctx.locale_codes()).locale
            }
            Self::PrefixExceptDefault => strip_locale(path, &ctx.locale_codes())
                .locale
                .or_else(|| Some(ctx.default_locale().to_string())),
        }
    }

    /// Computes the canonical redirect for an observed path, if one is due
    ///
    /// Only the path shape is compared; the original query and hash are
    /// carried over onto the redirect target unchanged. The result is a
    /// fixed point: redirecting the returned path again yields `None`.
    pub fn redirect(
        self,
        current_path: &str,
        target_locale: &str,
        ctx: &RoutingContext,
    ) -> Option<String> {
        let (path, query, hash) = split_query_hash(current_path);
        let stripped = strip_locale(path, &ctx.locale_codes());

        let target = match self {
            Self::NoPrefix => {
                if ctx.no_prefix_redirect() && stripped.locale.is_some() {
                    Some(stripped.path_without_locale)
                } else {
                    None
                }
            }
            Self::Prefix => match stripped.locale {
                None => Some(self.localize_path(&stripped.path_without_locale, target_locale, ctx)),
                Some(_) => None,
            },
            Self::PrefixExceptDefault => match stripped.locale {
                // A stray default prefix always canonicalizes, re-prefixed
                // for a non-default target so one hop settles.
                Some(found) if found == ctx.default_locale() => {
                    Some(self.localize_path(&stripped.path_without_locale, target_locale, ctx))
                }
                None if self.should_prefix(target_locale, ctx) => {
                    Some(self.localize_path(&stripped.path_without_locale, target_locale, ctx))
                }
                _ => None,
            },
            Self::PrefixAndDefault => match stripped.locale {
                Some(found) if found != target_locale => {
                    Some(self.localize_path(&stripped.path_without_locale, target_locale, ctx))
                }
                _ => None,
            },
        };

        target.map(|path| reattach(path, query, hash))
    }
}

fn reattach(path: String, query: Option<&str>, hash: Option<&str>) -> String {
    let mut out = path;
    if let Some(query) = query {
        out.push('?');
        out.push_str(query);
    }
    if let Some(hash) = hash {
        out.push_str(hash);
    }
    out
}
