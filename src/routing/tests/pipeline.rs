//! Synchronous request pipelines.

use super::{
    CallLog, api_router, foo_route, get_request, not_found, passthrough, recorder,
    reject_non_standard_verbs, request, terminal,
};
use crate::{BodyEncoding, Handler, Router};

#[test]
fn test_prefixed_index_route() {
    let mut router = api_router("GET", "/api/foo");
    router.mount(&foo_route());

    let data = router.response().unwrap().ready().unwrap();
    assert_eq!(data.status, Some(200));
    assert_eq!(data.body.as_deref(), Some("foo:index"));
    assert_eq!(data.body_encoding, Some(BodyEncoding::Text));
    assert_eq!(data.headers["content-type"][0].value, "text/html");
}

#[test]
fn test_submit_maps_to_post() {
    let mut router = api_router("POST", "/api/foo");
    router.mount(&foo_route());

    let data = router.response().unwrap().ready().unwrap();
    assert_eq!(data.status, Some(201));
    assert_eq!(data.body, None);
}

#[test]
fn test_connect_is_rejected_by_middleware() {
    let log = CallLog::default();
    let mut router = api_router("CONNECT", "/api/foo");
    router
        .use_middleware(reject_non_standard_verbs())
        .mount(&foo_route())
        .default(terminal(&log, "fallback"));

    let data = router.response().unwrap().ready().unwrap();
    assert_eq!(data.status, Some(405));
    assert_eq!(data.body, None);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_unmatched_request_without_fallback() {
    let mut router = api_router("GET", "/api/nothing-here");
    router.mount(&foo_route()).get("/other", passthrough());

    let data = router.response().unwrap().ready().unwrap();
    assert_eq!(data.status, None);
    assert_eq!(data.body, None);
}

#[test]
fn test_unmatched_request_hits_fallback() {
    let mut router = api_router("GET", "/api/nothing-here");
    router
        .use_middleware(reject_non_standard_verbs())
        .mount(&foo_route())
        .default(not_found());

    let data = router.response().unwrap().ready().unwrap();
    assert_eq!(data.status, Some(404));
}

#[test]
fn test_route_runs_once_for_its_method_only() {
    for (method, expected) in [("GET", 1), ("POST", 0), ("DELETE", 0)] {
        let log = CallLog::default();
        let mut router = Router::new(request(method, "/x"), None);
        router.get("/x", terminal(&log, "x"));
        router.response().unwrap();
        assert_eq!(log.lock().unwrap().len(), expected, "method {method}");
    }
}

#[test]
fn test_priority_ignores_registration_order() {
    let log = CallLog::default();
    let mut router = Router::new(get_request("/x"), None);
    router
        .default(recorder(&log, "fallback"))
        .get("/x", recorder(&log, "route"))
        .use_path("/x", recorder(&log, "scoped"))
        .use_middleware(recorder(&log, "global"));

    router.response().unwrap();
    assert_eq!(*log.lock().unwrap(), ["scoped", "global", "route", "fallback"]);
}

#[test]
fn test_middleware_without_next_stops_route() {
    let log = CallLog::default();
    let mut router = Router::new(get_request("/x"), None);
    router
        .use_middleware(Handler::middleware(|_, res, _next| {
            res.set_header("X-Stopped", "yes");
            Ok(())
        }))
        .get("/x", terminal(&log, "route"));

    let data = router.response().unwrap().ready().unwrap();
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(data.headers["x-stopped"][0].value, "yes");
}

#[test]
fn test_fallback_next_at_end_is_noop() {
    let mut router = Router::new(get_request("/missing"), None);
    router.default(Handler::middleware(|_, res, next| {
        res.status(404).send("not found");
        next.proceed();
        Ok(())
    }));

    let data = router.response().unwrap().ready().unwrap();
    assert_eq!(data.status, Some(404));
    assert_eq!(data.body.as_deref(), Some("not found"));
}

#[test]
fn test_root_route_with_prefix() {
    let mut router = api_router("GET", "/api/");
    router.get("/", Handler::route(|_, res| {
        res.status(501).send(());
        Ok(())
    }));

    let data = router.response().unwrap().ready().unwrap();
    assert_eq!(data.status, Some(501));
}

#[test]
fn test_handlers_read_request_params() {
    let mut router = Router::new(
        request("POST", "/form").with_body("Zm9vPWJhciZiaXo9YmF6=="),
        None,
    );
    router.post("/form", Handler::route(|req, res| {
        let foo = req.param("foo");
        res.status(200).send(foo);
        Ok(())
    }));

    let data = router.response().unwrap().ready().unwrap();
    assert_eq!(data.body.as_deref(), Some("bar"));
}
