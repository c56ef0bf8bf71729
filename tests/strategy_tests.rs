//! Redirect and locale-detection behavior through the façade, across the
//! four prefixing strategies.

use pretty_assertions::assert_eq;
use rstest::rstest;

use locale_router::{
    CustomRouteMap, CustomRoutePaths, Locale, LocaleRouter, PrefixStrategy, RoutingContext,
    StaticRouter,
};

fn locales() -> Vec<Locale> {
    vec![Locale::new("en"), Locale::new("de")]
}

fn facade(ctx: RoutingContext) -> LocaleRouter {
    LocaleRouter::new(ctx, StaticRouter::new())
}

fn ctx(strategy: PrefixStrategy) -> RoutingContext {
    RoutingContext::new(strategy, locales(), "en")
}

#[test]
fn prefix_redirects_every_unprefixed_path() {
    let routes = facade(ctx(PrefixStrategy::Prefix));
    assert_eq!(routes.get_redirect("/", "en").as_deref(), Some("/en"));
    assert_eq!(routes.get_redirect("/en", "en"), None);
    assert_eq!(
        routes.get_redirect("/about", "de").as_deref(),
        Some("/de/about")
    );
    assert_eq!(routes.get_redirect("/de/about", "de"), None);
}

#[test]
fn prefix_except_default_sheds_the_default_prefix() {
    let routes = facade(ctx(PrefixStrategy::PrefixExceptDefault));
    assert_eq!(
        routes.get_redirect("/en/about", "en").as_deref(),
        Some("/about")
    );
    assert_eq!(
        routes.get_redirect("/about", "de").as_deref(),
        Some("/de/about")
    );
    assert_eq!(routes.get_redirect("/about", "en"), None);
    assert_eq!(routes.get_redirect("/de/about", "de"), None);
}

#[test]
fn prefix_and_default_keeps_unprefixed_paths() {
    let routes = facade(ctx(PrefixStrategy::PrefixAndDefault));
    assert_eq!(routes.get_redirect("/about", "de"), None);
    assert_eq!(
        routes.get_redirect("/en/about", "de").as_deref(),
        Some("/de/about")
    );
}

#[test]
fn no_prefix_redirects_only_when_flagged() {
    let routes = facade(ctx(PrefixStrategy::NoPrefix));
    assert_eq!(routes.get_redirect("/de/about", "en"), None);

    let routes = facade(ctx(PrefixStrategy::NoPrefix).with_no_prefix_redirect(true));
    assert_eq!(
        routes.get_redirect("/de/about", "en").as_deref(),
        Some("/about")
    );
    assert_eq!(routes.get_redirect("/about", "en"), None);
}

#[test]
fn redirect_preserves_query_and_hash() {
    let routes = facade(ctx(PrefixStrategy::Prefix));
    assert_eq!(
        routes.get_redirect("/about?p=1#s", "de").as_deref(),
        Some("/de/about?p=1#s")
    );
}

#[test]
fn disabled_route_never_gains_a_prefix() {
    let custom = CustomRouteMap::from([("static".to_string(), CustomRoutePaths::Disabled)]);
    let routes = facade(ctx(PrefixStrategy::Prefix).with_custom_paths(custom));

    assert_eq!(routes.get_redirect("/static", "en"), None);
    assert_eq!(
        routes.get_redirect("/de/static", "en").as_deref(),
        Some("/static")
    );
    assert_eq!(
        routes.get_redirect("/de/static?x=1#y", "en").as_deref(),
        Some("/static?x=1#y")
    );
}

#[rstest]
#[case(PrefixStrategy::Prefix)]
#[case(PrefixStrategy::PrefixExceptDefault)]
#[case(PrefixStrategy::PrefixAndDefault)]
fn redirect_settles_in_one_hop(#[case] strategy: PrefixStrategy) {
    let routes = facade(ctx(strategy));
    for path in ["/", "/about", "/en/about", "/de/about", "/de", "/en"] {
        for locale in ["en", "de"] {
            let settled = routes
                .get_redirect(path, locale)
                .unwrap_or_else(|| path.to_string());
            assert_eq!(
                routes.get_redirect(&settled, locale),
                None,
                "get_redirect({path:?}, {locale}) did not settle"
            );
        }
    }
}

#[test]
fn resolve_locale_follows_strategy_policy() {
    let routes = facade(ctx(PrefixStrategy::PrefixExceptDefault));
    assert_eq!(
        routes.resolve_locale_from_path("/de/about").as_deref(),
        Some("de")
    );
    // Unprefixed paths belong to the default under this strategy
    assert_eq!(
        routes.resolve_locale_from_path("/about").as_deref(),
        Some("en")
    );

    let routes = facade(ctx(PrefixStrategy::Prefix));
    assert_eq!(routes.resolve_locale_from_path("/about"), None);
}

#[test]
fn raw_locale_extraction_ignores_strategy() {
    let routes = facade(ctx(PrefixStrategy::NoPrefix));
    assert_eq!(routes.resolve_locale_from_path("/de/about"), None);
    assert_eq!(
        routes.get_locale_from_path("/de/about").as_deref(),
        Some("de")
    );
    assert_eq!(routes.get_locale_from_path("/about"), None);
}

#[test]
fn host_default_locale_stays_unprefixed() {
    let ctx = RoutingContext::new(
        PrefixStrategy::PrefixExceptDefault,
        vec![
            Locale::new("en"),
            Locale::new("de").with_base_url("https://example.de", true),
        ],
        "en",
    );
    let routes = facade(ctx);
    assert_eq!(routes.locale_route("de", "/about").path, "/about");
    assert_eq!(routes.get_redirect("/about", "de"), None);
}
