//! The two-method seam between this engine and the host's router
//!
//! The engine never inspects a host routing table directly; everything it
//! needs is `has_route` and `resolve`. Each host framework supplies one
//! [`RouterAdapter`] implementation. [`StaticRouter`] is the bundled
//! reference implementation backed by a plain named-route table, enough for
//! hosts without a dynamic router and for tests.

use std::collections::HashMap;

use thiserror::Error;

use crate::path::{build_url, normalize_path, path_segments};
use crate::{ParamValue, ResolvedRoute, RouteRef};

/// Adapter failure reported by [`RouterAdapter::resolve`]
///
/// The resolution engine treats every variant as "not found" and advances
/// its fallback chain; nothing here ever reaches the engine's callers.
#[derive(Debug, Error)]
pub enum RouterError {
    /// No route is registered under this name
    #[error("no route named `{name}`")]
    NotFound {
        /// The name that was looked up
        name: String,
    },
    /// The route reference cannot be resolved as given
    #[error("malformed route reference: {reason}")]
    Malformed {
        /// What was wrong with the reference
        reason: String,
    },
}

/// Minimal contract this engine requires from a host's routing table
///
/// `resolve` must not fail for names `has_route` reports as present, but may
/// fail for absent or malformed input; the engine treats a failure exactly
/// like a miss.
pub trait RouterAdapter {
    /// Whether a route with this exact name exists
    fn has_route(&self, name: &str) -> bool;

    /// Resolves a route reference into a concrete route
    fn resolve(&self, target: &RouteRef) -> Result<ResolvedRoute, RouterError>;
}

/// In-memory named-route table implementing [`RouterAdapter`]
///
/// Patterns use `:param` placeholders, e.g. `/users/:id`. Resolution by name
/// substitutes the reference's parameters into the pattern; resolution by
/// path matches patterns segment-wise and captures parameters.
///
/// # Examples
///
/// ```
/// use locale_router::adapter::{RouterAdapter, StaticRouter};
/// use locale_router::RouteRef;
///
/// let router = StaticRouter::new()
///     .with_route("about", "/about")
///     .with_route("user-id", "/user/:id");
///
/// assert!(router.has_route("about"));
/// let resolved = router.resolve(&RouteRef::from("/user/7")).unwrap();
/// assert_eq!(resolved.name.as_deref(), Some("user-id"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticRouter {
    routes: Vec<TableRoute>,
    by_name: HashMap<String, usize>,
}

#[derive(Debug, Clone)]
struct TableRoute {
    name: String,
    pattern: String,
}

impl StaticRouter {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named route pattern
    pub fn with_route(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        let name = name.into();
        let pattern = normalize_path(&pattern.into()).into_owned();
        self.by_name.insert(name.clone(), self.routes.len());
        self.routes.push(TableRoute { name, pattern });
        self
    }

    fn resolve_by_name(
        &self,
        name: &str,
        target: &RouteRef,
    ) -> Result<ResolvedRoute, RouterError> {
        let route = self
            .by_name
            .get(name)
            .map(|&i| &self.routes[i])
            .ok_or_else(|| RouterError::NotFound {
                name: name.to_string(),
            })?;

        let mut out = Vec::new();
        for segment in path_segments(&route.pattern) {
            match segment.strip_prefix(':') {
                Some(param) => match target.params.get(param) {
                    Some(value) => out.push(value.as_path_value()),
                    None => {
                        return Err(RouterError::Malformed {
                            reason: format!("missing parameter `{param}` for route `{name}`"),
                        })
                    }
                },
                None => out.push(segment.to_string()),
            }
        }
        let path = if out.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", out.join("/"))
        };

        Ok(self.finish(Some(route.name.clone()), path, target))
    }

    fn resolve_by_path(&self, path: &str) -> Option<(String, HashMap<String, ParamValue>)> {
        let segments = path_segments(path);
        self.routes.iter().find_map(|route| {
            let pattern_segments = path_segments(&route.pattern);
            if pattern_segments.len() != segments.len() {
                return None;
            }
            let mut params = HashMap::new();
            for (pattern_segment, segment) in pattern_segments.iter().zip(&segments) {
                match pattern_segment.strip_prefix(':') {
                    Some(param) => {
                        params.insert(
                            param.to_string(),
                            ParamValue::Single((*segment).to_string()),
                        );
                    }
                    None if pattern_segment == segment => {}
                    None => return None,
                }
            }
            Some((route.name.clone(), params))
        })
    }

    fn finish(&self, name: Option<String>, path: String, target: &RouteRef) -> ResolvedRoute {
        let full_path = build_url(&path, &target.query, target.hash.as_deref());
        ResolvedRoute {
            name,
            path,
            full_path,
            params: target.params.clone(),
            query: target.query.clone(),
            hash: target.hash.clone(),
        }
    }
}

impl RouterAdapter for StaticRouter {
    fn has_route(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    fn resolve(&self, target: &RouteRef) -> Result<ResolvedRoute, RouterError> {
        if let Some(name) = &target.name {
            return self.resolve_by_name(name, target);
        }

        let path = target
            .path
            .as_deref()
            .or(target.full_path.as_deref())
            .ok_or_else(|| RouterError::Malformed {
                reason: "route reference has neither name nor path".to_string(),
            })?;
        let normalized = normalize_path(crate::path::clean_path(path)).into_owned();

        match self.resolve_by_path(&normalized) {
            Some((name, mut captured)) => {
                for (key, value) in &target.params {
                    captured.insert(key.clone(), value.clone());
                }
                let mut resolved = self.finish(Some(name), normalized, target);
                resolved.params = captured;
                Ok(resolved)
            }
            // Unmatched paths still resolve, the way host routers return an
            // unnamed catch-all match rather than failing.
            None => Ok(self.finish(None, normalized, target)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> StaticRouter {
        StaticRouter::new()
            .with_route("index", "/")
            .with_route("about", "/about")
            .with_route("user-id", "/user/:id")
    }

    #[test]
    fn has_route_is_exact() {
        let router = router();
        assert!(router.has_route("about"));
        assert!(!router.has_route("abou"));
        assert!(!router.has_route("localized-about"));
    }

    #[test]
    fn resolve_by_name_substitutes_params() {
        let router = router();
        let target = RouteRef::named("user-id").with_param("id", "42");
        let resolved = router.resolve(&target).unwrap();
        assert_eq!(resolved.path, "/user/42");
        assert_eq!(resolved.name.as_deref(), Some("user-id"));
    }

    #[test]
    fn resolve_by_name_missing_param_fails() {
        let router = router();
        let result = router.resolve(&RouteRef::named("user-id"));
        assert!(matches!(result, Err(RouterError::Malformed { .. })));
    }

    #[test]
    fn resolve_unknown_name_fails() {
        let router = router();
        let result = router.resolve(&RouteRef::named("missing"));
        assert!(matches!(result, Err(RouterError::NotFound { .. })));
    }

    #[test]
    fn resolve_by_path_captures_params() {
        let router = router();
        let resolved = router.resolve(&RouteRef::from("/user/7")).unwrap();
        assert_eq!(resolved.name.as_deref(), Some("user-id"));
        assert_eq!(
            resolved.params.get("id"),
            Some(&ParamValue::Single("7".to_string()))
        );
    }

    #[test]
    fn unmatched_path_resolves_unnamed() {
        let router = router();
        let resolved = router.resolve(&RouteRef::from("/nowhere/else")).unwrap();
        assert_eq!(resolved.name, None);
        assert_eq!(resolved.path, "/nowhere/else");
    }
}
