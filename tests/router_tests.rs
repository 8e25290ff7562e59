#![allow(clippy::unwrap_used, clippy::expect_used)]

use brrtrie::{
    DuplicatePolicy, MatchStatus, RouteError, Router, RouterConfig, TrailingSlash,
};
use http::Method;
use std::sync::Arc;

type Handler = fn(&[(Arc<str>, String)]) -> String;

fn zoo_router() -> Router<&'static str> {
    let mut router = Router::new();
    for (method, path, handler) in [
        ("GET", "/", "root_handler"),
        ("GET", "/zoo/animals", "get_animals"),
        ("POST", "/zoo/animals", "create_animal"),
        ("GET", "/zoo/animals/:id", "get_animal"),
        ("PUT", "/zoo/animals/:id", "update_animal"),
        ("PATCH", "/zoo/animals/:id", "patch_animal"),
        ("DELETE", "/zoo/animals/:id", "delete_animal"),
        ("GET", "/zoo/animals/new", "new_animal_form"),
        ("GET", "/zoo/animals/:id/toys/:toy_id", "animal_toy"),
        ("HEAD", "/zoo/health", "health_check"),
        ("OPTIONS", "/zoo/health", "supported_ops"),
        ("TRACE", "/zoo/health", "trace_route"),
        ("GET", "/static/*filepath", "static_files"),
    ] {
        router.add(method, path, handler).unwrap();
    }
    router
}

fn assert_route_match(router: &Router<&'static str>, method: &str, path: &str, expected: &str) {
    let result = router.find(method, path);
    assert_eq!(
        result.status,
        MatchStatus::Matched,
        "{method} {path} should match {expected}"
    );
    assert_eq!(result.handler, Some(&expected), "{method} {path}");
}

#[test]
fn test_verb_routes() {
    let router = zoo_router();
    assert_route_match(&router, "GET", "/", "root_handler");
    assert_route_match(&router, "GET", "/zoo/animals", "get_animals");
    assert_route_match(&router, "POST", "/zoo/animals", "create_animal");
    assert_route_match(&router, "GET", "/zoo/animals/123", "get_animal");
    assert_route_match(&router, "PUT", "/zoo/animals/123", "update_animal");
    assert_route_match(&router, "PATCH", "/zoo/animals/123", "patch_animal");
    assert_route_match(&router, "DELETE", "/zoo/animals/123", "delete_animal");
    assert_route_match(&router, "HEAD", "/zoo/health", "health_check");
    assert_route_match(&router, "OPTIONS", "/zoo/health", "supported_ops");
    assert_route_match(&router, "TRACE", "/zoo/health", "trace_route");
}

#[test]
fn test_static_match_has_no_params() {
    let router = zoo_router();
    let result = router.find("GET", "/zoo/animals");
    assert!(result.is_matched());
    assert!(result.params.is_empty());
    assert_eq!(result.pattern, Some("/zoo/animals"));
}

#[test]
fn test_param_match_and_deeper_path_not_found() {
    let router = zoo_router();

    let result = router.find("GET", "/zoo/animals/42");
    assert_eq!(result.handler, Some(&"get_animal"));
    assert_eq!(result.params.len(), 1);
    assert_eq!(result.params[0].0.as_ref(), "id");
    assert_eq!(result.params[0].1, "42");

    let result = router.find("GET", "/zoo/animals/42/cages");
    assert_eq!(result.status, MatchStatus::NotFound);
    assert!(result.handler.is_none());
    assert!(result.params.is_empty());
}

#[test]
fn test_static_beats_param_regardless_of_order() {
    let router = zoo_router();
    assert_route_match(&router, "GET", "/zoo/animals/new", "new_animal_form");

    let mut reversed = Router::new();
    reversed.get("/users/new", "static").unwrap();
    reversed.get("/users/:id", "param").unwrap();
    assert_eq!(reversed.find("GET", "/users/new").handler, Some(&"static"));
    assert_eq!(reversed.find("GET", "/users/news").handler, Some(&"param"));
    assert_eq!(reversed.find("GET", "/users/ne").handler, Some(&"param"));
}

#[test]
fn test_nested_params_in_order() {
    let router = zoo_router();
    let result = router.find("GET", "/zoo/animals/7/toys/ball");
    assert_eq!(result.handler, Some(&"animal_toy"));
    let names: Vec<&str> = result.params.iter().map(|(k, _)| k.as_ref()).collect();
    let values: Vec<&str> = result.params.iter().map(|(_, v)| v.as_str()).collect();
    assert_eq!(names, ["id", "toy_id"]);
    assert_eq!(values, ["7", "ball"]);
}

#[test]
fn test_catch_all_with_embedded_slashes() {
    let router = zoo_router();
    let result = router.find("GET", "/static/css/site/main.css");
    assert_eq!(result.handler, Some(&"static_files"));
    assert_eq!(result.param("filepath"), Some("css/site/main.css"));

    let result = router.find("GET", "/static/");
    assert_eq!(result.handler, Some(&"static_files"));
    assert_eq!(result.param("filepath"), Some(""));
}

#[test]
fn test_method_not_allowed_lists_methods() {
    let router = zoo_router();
    let result = router.find("POST", "/zoo/animals/5");
    assert_eq!(result.status, MatchStatus::MethodNotAllowed);
    assert!(result.handler.is_none());
    assert_eq!(
        result.allow_header().as_deref(),
        Some("GET, PUT, PATCH, DELETE")
    );
    assert_eq!(
        result.allowed_methods(),
        [&Method::GET, &Method::PUT, &Method::PATCH, &Method::DELETE]
    );

    let result = router.find("GET", "/zoo/health");
    assert_eq!(result.status, MatchStatus::MethodNotAllowed);
    assert_eq!(result.allow_header().as_deref(), Some("HEAD, OPTIONS, TRACE"));
}

#[test]
fn test_not_found_has_no_allow_header() {
    let router = zoo_router();
    let result = router.find("GET", "/aquarium");
    assert_eq!(result.status, MatchStatus::NotFound);
    assert_eq!(result.allow_header(), None);
    assert!(result.allowed_methods().is_empty());
}

#[test]
fn test_param_name_conflict() {
    let mut router = Router::new();
    router.get("/a/:x", 1).unwrap();
    let err = router.get("/a/:y", 2).unwrap_err();
    assert!(matches!(err, RouteError::ParamConflict { .. }));
    assert_eq!(router.find("GET", "/a/v").param("x"), Some("v"));

    let err = router.get("/a/:y/deeper", 3).unwrap_err();
    assert!(matches!(err, RouteError::ParamConflict { .. }));
    assert_eq!(router.len(), 1);
}

#[test]
fn test_invalid_patterns_rejected() {
    let mut router = Router::new();
    assert!(matches!(
        router.get("users", ()),
        Err(RouteError::MissingLeadingSlash(_))
    ));
    assert!(matches!(
        router.get("/foo:bar", ()),
        Err(RouteError::PartialSegment { .. })
    ));
    assert!(matches!(
        router.get("/foo*", ()),
        Err(RouteError::PartialSegment { .. })
    ));
    assert!(matches!(
        router.get("/a/:", ()),
        Err(RouteError::EmptyParamName(_))
    ));
    assert!(matches!(
        router.get("/a/*rest/b", ()),
        Err(RouteError::CatchAllNotLast(_))
    ));
    assert!(matches!(
        router.get("/a/:id/b/:id", ()),
        Err(RouteError::DuplicateParamName { .. })
    ));
    assert!(matches!(
        router.add("", "/a", ()),
        Err(RouteError::InvalidMethod(_))
    ));
    assert!(router.is_empty());
}

#[test]
fn test_duplicate_policies() {
    let mut router = Router::new();
    router.get("/dup", "first").unwrap();
    assert!(matches!(
        router.get("/dup", "second"),
        Err(RouteError::DuplicateRoute { .. })
    ));
    assert_eq!(router.find("GET", "/dup").handler, Some(&"first"));

    let mut router = Router::with_config(RouterConfig {
        on_duplicate: DuplicatePolicy::Replace,
        ..RouterConfig::default()
    });
    let first = router.get("/dup", "first").unwrap();
    let second = router.get("/dup", "second").unwrap();
    assert_eq!(first.id(), second.id());
    assert_eq!(router.find("GET", "/dup").handler, Some(&"second"));
    assert_eq!(router.len(), 1);
}

#[test]
fn test_trailing_slash_policies() {
    let routes = [("GET", "/dir/"), ("GET", "/file")];
    let build = |policy| {
        let mut router = Router::with_config(RouterConfig {
            trailing_slash: policy,
            ..RouterConfig::default()
        });
        for (method, path) in routes {
            router.add(method, path, path).unwrap();
        }
        router
    };

    let strict = build(TrailingSlash::Strict);
    assert_eq!(strict.find("GET", "/dir").status, MatchStatus::NotFound);
    assert_eq!(strict.find("GET", "/file/").status, MatchStatus::NotFound);

    let redirect = build(TrailingSlash::Redirect);
    let result = redirect.find("GET", "/dir");
    assert_eq!(result.status, MatchStatus::RedirectTrailingSlash);
    assert_eq!(result.redirect_to.as_deref(), Some("/dir/"));
    assert!(result.handler.is_none());
    let result = redirect.find("GET", "/file/");
    assert_eq!(result.redirect_to.as_deref(), Some("/file"));

    let relaxed = build(TrailingSlash::Relaxed);
    let result = relaxed.find("GET", "/dir");
    assert_eq!(result.status, MatchStatus::Matched);
    assert_eq!(result.handler, Some(&"/dir/"));
}

#[test]
fn test_trailing_slash_never_serves_wrong_handler() {
    let mut router = Router::with_config(RouterConfig {
        trailing_slash: TrailingSlash::Relaxed,
        ..RouterConfig::default()
    });
    router.get("/x", "no_slash").unwrap();
    router.get("/x/", "slash").unwrap();
    router.post("/only-post/", "post").unwrap();

    assert_eq!(router.find("GET", "/x").handler, Some(&"no_slash"));
    assert_eq!(router.find("GET", "/x/").handler, Some(&"slash"));

    // The slash variant exists only for POST; a GET must not be served by it.
    let result = router.find("GET", "/only-post");
    assert_eq!(result.status, MatchStatus::MethodNotAllowed);
    assert!(result.handler.is_none());
    assert_eq!(result.allow_header().as_deref(), Some("POST"));
}

#[test]
fn test_method_not_allowed_wins_over_slash_variant() {
    let mut router = Router::new();
    router.post("/login", "post_login").unwrap();
    router.get("/login/", "login_page").unwrap();

    let result = router.find("GET", "/login");
    assert_eq!(result.status, MatchStatus::MethodNotAllowed);
    assert_eq!(result.allow_header().as_deref(), Some("POST"));
}

#[test]
fn test_function_handlers_are_returned_not_invoked() {
    fn show(params: &[(Arc<str>, String)]) -> String {
        params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    let mut router: Router<Handler> = Router::new();
    router.get("/users/:id/posts/:post", show).unwrap();

    let result = router.find("GET", "/users/3/posts/9");
    let handler = result.handler.unwrap();
    assert_eq!(handler(&result.params), "id=3&post=9");
}

#[test]
fn test_concurrent_lookups_are_idempotent() {
    let router = zoo_router();
    let before = router.dump_tree();

    let requests = [
        ("GET", "/zoo/animals/1", MatchStatus::Matched),
        ("POST", "/zoo/animals/1", MatchStatus::MethodNotAllowed),
        ("GET", "/zoo/animals/1/", MatchStatus::RedirectTrailingSlash),
        ("GET", "/static/a/b", MatchStatus::Matched),
        ("GET", "/nope", MatchStatus::NotFound),
    ];

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..500 {
                    for (method, path, status) in requests {
                        assert_eq!(router.find(method, path).status, status);
                    }
                }
            });
        }
    });

    assert_eq!(router.dump_tree(), before);
    let first = router.find("GET", "/zoo/animals/77/toys/x");
    let second = router.find("GET", "/zoo/animals/77/toys/x");
    assert_eq!(first.params, second.params);
    assert_eq!(first.handler, second.handler);
}

#[test]
fn test_arbitrary_input_never_panics() {
    let router = zoo_router();
    let inputs = [
        "",
        "/",
        "//",
        "///zoo",
        "/zoo/animals/\u{1F600}",
        "/zoo/animals/%ZZ",
        "/static",
        "/\u{0}/\u{7f}",
        "zoo/animals",
        "/zoo/animals/1/toys/",
    ];
    for method in ["GET", "", "G ET", "get", "PROPFIND"] {
        for path in inputs {
            let result = router.find(method, path);
            if result.status != MatchStatus::Matched {
                assert!(result.handler.is_none());
            }
        }
    }
}
