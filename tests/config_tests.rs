//! Configuration loading: the serde surface of the routing context and how
//! deserialized configuration drives resolution.

use pretty_assertions::assert_eq;

use locale_router::{
    CustomRoutePaths, LocaleRouter, PrefixStrategy, RouteRef, RoutingContext, StaticRouter,
    DEFAULT_ROUTE_NAME_PREFIX,
};

#[test]
fn context_deserializes_from_json() {
    let ctx: RoutingContext = serde_json::from_str(
        r#"{
            "strategy": "prefix_except_default",
            "locales": [
                {"code": "en"},
                {"code": "de", "display_name": "Deutsch"},
                {"code": "fr", "base_url": "https://example.fr", "base_default": true}
            ],
            "default_locale": "en",
            "custom_paths": {
                "/about": {"de": "/ueber-uns"},
                "static": false
            },
            "locale_restrictions": {"/about": ["en", "de"]},
            "no_prefix_redirect": true
        }"#,
    )
    .unwrap();

    assert_eq!(ctx.strategy(), PrefixStrategy::PrefixExceptDefault);
    assert_eq!(ctx.default_locale(), "en");
    assert_eq!(ctx.locale_codes(), vec!["en", "de", "fr"]);
    assert_eq!(
        ctx.locale("de").and_then(|l| l.display_name.as_deref()),
        Some("Deutsch")
    );
    assert_eq!(
        ctx.locale("fr").and_then(|l| l.base_url.as_deref()),
        Some("https://example.fr")
    );
    assert!(ctx.locale("fr").map(|l| l.base_default).unwrap_or(false));
    assert_eq!(
        ctx.custom_entry("static"),
        Some(&CustomRoutePaths::Disabled)
    );
    assert!(ctx.custom_entry("/about").is_some());
    assert!(ctx.no_prefix_redirect());
}

#[test]
fn optional_tables_default_to_empty() {
    let ctx: RoutingContext = serde_json::from_str(
        r#"{
            "strategy": "prefix",
            "locales": [{"code": "en"}],
            "default_locale": "en"
        }"#,
    )
    .unwrap();

    assert!(ctx.custom_paths().is_empty());
    assert!(ctx.locale_restrictions().is_empty());
    assert!(ctx.restriction_links().is_empty());
    assert!(!ctx.no_prefix_redirect());
    assert_eq!(ctx.route_name_prefix(), DEFAULT_ROUTE_NAME_PREFIX);
}

#[test]
fn strategy_names_are_snake_case() {
    for (name, strategy) in [
        ("no_prefix", PrefixStrategy::NoPrefix),
        ("prefix", PrefixStrategy::Prefix),
        ("prefix_except_default", PrefixStrategy::PrefixExceptDefault),
        ("prefix_and_default", PrefixStrategy::PrefixAndDefault),
    ] {
        let parsed: PrefixStrategy = serde_json::from_str(&format!("\"{name}\"")).unwrap();
        assert_eq!(parsed, strategy);
        assert_eq!(serde_json::to_string(&strategy).unwrap(), format!("\"{name}\""));
    }
}

#[test]
fn context_round_trips_with_sentinel_entries() {
    let ctx: RoutingContext = serde_json::from_str(
        r#"{
            "strategy": "prefix",
            "locales": [{"code": "en"}, {"code": "de"}],
            "default_locale": "en",
            "custom_paths": {"/about": {"de": "/ueber-uns"}, "legal": false}
        }"#,
    )
    .unwrap();

    let json = serde_json::to_string(&ctx).unwrap();
    let back: RoutingContext = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ctx);
}

#[test]
fn deserialized_config_drives_resolution() {
    let ctx: RoutingContext = serde_json::from_str(
        r#"{
            "strategy": "prefix_except_default",
            "locales": [{"code": "en"}, {"code": "de"}],
            "default_locale": "en",
            "custom_paths": {"/about": {"en": "/about", "de": "/ueber-uns"}, "static": false}
        }"#,
    )
    .unwrap();
    let routes = LocaleRouter::new(ctx, StaticRouter::new());

    assert_eq!(routes.locale_route("de", "/about").path, "/de/ueber-uns");
    assert_eq!(routes.locale_route("de", "/static").path, "/static");
    // Redirects compare path shape only; the custom path is not rewritten
    assert_eq!(
        routes.get_redirect("/about", "de").as_deref(),
        Some("/de/about")
    );
}

#[test]
fn custom_route_name_prefix_is_honored() {
    let ctx = RoutingContext::new(
        PrefixStrategy::PrefixExceptDefault,
        vec![
            locale_router::Locale::new("en"),
            locale_router::Locale::new("de"),
        ],
        "en",
    )
    .with_route_name_prefix("i18n-");
    let router = StaticRouter::new().with_route("i18n-about-de", "/de/about");
    let routes = LocaleRouter::new(ctx, router);

    let resolved = routes.locale_route("de", RouteRef::named("about"));
    assert_eq!(resolved.name.as_deref(), Some("i18n-about-de"));
    assert_eq!(resolved.path, "/de/about");
}
