//! Pipelines with asynchronous handlers.

use super::{CallLog, api_router, get_request, recorder, terminal};
use crate::{Error, ErrorKind, Flow, Handler, RouteDescriptor, Router};
use std::{sync::Arc, time::Duration};

fn slow_middleware(log: &CallLog, name: &'static str) -> Handler {
    let log = Arc::clone(log);
    Handler::middleware_async(move |_, res, _next| {
        let log = Arc::clone(&log);
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            log.lock().unwrap().push(name.to_string());
            res.set_header("X-Async", name);
            Ok(Flow::Continue)
        })
    })
}

#[tokio::test]
async fn test_async_route_returns_pending_outcome() {
    let mut router = api_router("GET", "/api/foo");
    router.mount(&RouteDescriptor::new("/foo").index(Handler::route_async(|_, res| {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            res.status(200).send("foo:index");
            Ok(())
        })
    })));

    let outcome = router.response().unwrap();
    assert!(outcome.is_pending());

    let data = outcome.await.unwrap();
    assert_eq!(data.status, Some(200));
    assert_eq!(data.body.as_deref(), Some("foo:index"));
}

#[tokio::test]
async fn test_async_route_that_never_suspends_is_ready() {
    let mut router = Router::new(get_request("/x"), None);
    router.get(
        "/x",
        Handler::route_async(|_, res| {
            Box::pin(async move {
                res.status(200).send("x");
                Ok(())
            })
        }),
    );

    let outcome = router.response().unwrap();
    assert!(outcome.is_ready());
    assert_eq!(outcome.await.unwrap().body.as_deref(), Some("x"));
}

#[tokio::test]
async fn test_async_stages_run_in_order() {
    let log = CallLog::default();
    let mut router = Router::new(get_request("/x"), None);
    router
        .use_middleware(recorder(&log, "sync"))
        .use_middleware(slow_middleware(&log, "first"))
        .use_middleware(slow_middleware(&log, "second"))
        .get("/x", terminal(&log, "route"))
        .default(terminal(&log, "fallback"));

    let data = router.response().unwrap().await.unwrap();
    assert_eq!(*log.lock().unwrap(), ["sync", "first", "second", "route"]);
    assert_eq!(data.headers["x-async"][0].value, "second");
}

#[tokio::test]
async fn test_async_middleware_can_halt() {
    let log = CallLog::default();
    let mut router = Router::new(get_request("/x"), None);
    router
        .use_middleware(Handler::middleware_async(|_, res, _next| {
            Box::pin(async move {
                tokio::task::yield_now().await;
                res.status(403).send(());
                Ok(Flow::Halt)
            })
        }))
        .get("/x", terminal(&log, "route"));

    let data = router.response().unwrap().await.unwrap();
    assert_eq!(data.status, Some(403));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_next_inside_async_handler_rejects() {
    let log = CallLog::default();
    let mut router = Router::new(get_request("/x"), None);
    router
        .use_middleware(Handler::middleware_async(|_, _, next| {
            Box::pin(async move {
                tokio::task::yield_now().await;
                next.proceed();
                Ok(Flow::Continue)
            })
        }))
        .get("/x", terminal(&log, "route"));

    let outcome = router.response().unwrap();
    assert!(outcome.is_pending());
    let err = outcome.await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ControlFlow);
    assert!(err.to_string().contains("middleware"));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_async_rejection_surfaces_from_future() {
    let mut router = Router::new(get_request("/x"), None);
    router
        .use_middleware(Handler::middleware(|_, res, next| {
            res.set_header("X-Before", "1");
            next.proceed();
            Ok(())
        }))
        .get(
            "/x",
            Handler::route_async(|_, _| {
                Box::pin(async move {
                    tokio::task::yield_now().await;
                    Err(Error::handler("upstream unavailable"))
                })
            }),
        );

    let outcome = router.response().unwrap();
    let err = outcome.await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Handler);
}

#[tokio::test]
async fn test_async_resource_receives_id() {
    let route = RouteDescriptor::new("/items").resource(true).get(Handler::resource_async(
        |_, res, id| {
            Box::pin(async move {
                tokio::task::yield_now().await;
                res.status(200).text(format!("item {id}"));
                Ok(())
            })
        },
    ));

    let mut router = Router::new(get_request("/items/42"), None);
    router.mount(&route);
    let data = router.response().unwrap().await.unwrap();
    assert_eq!(data.body.as_deref(), Some("item 42"));
}
