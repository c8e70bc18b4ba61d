//! Scenario tests for the routing pipeline.
//!
//! Unit tests for the individual pieces live beside them. The tests here drive
//! whole requests through a `Router` the way a host adapter would.
//!
//! ## Available Helpers
//!
//! - Request builders: `get_request()`, `request()`
//! - Handlers: `recorder()`, `passthrough()`, `reject_non_standard_verbs()`
//! - Routes: `foo_route()`, `qux_resource_route()`

use crate::{Handler, RequestDescriptor, RouteDescriptor, Router};
use serde_json::json;
use std::sync::{Arc, Mutex};

#[cfg(test)]
pub(crate) mod asynchronous;
#[cfg(test)]
pub(crate) mod pipeline;

// ============================================================================
// Request Helpers
// ============================================================================

pub(crate) fn request(method: &str, uri: &str) -> RequestDescriptor {
    RequestDescriptor::new(method, uri).with_header("Host", "d111111abcdef8.cloudfront.net")
}

pub(crate) fn get_request(uri: &str) -> RequestDescriptor {
    request("GET", uri)
}

/// Router with the `/api` prefix most scenarios use.
pub(crate) fn api_router(method: &str, uri: &str) -> Router {
    let mut router = Router::new(request(method, uri), None);
    router.set_prefix("/api");
    router
}

// ============================================================================
// Handler Helpers
// ============================================================================

pub(crate) type CallLog = Arc<Mutex<Vec<String>>>;

/// Middleware that records its name and continues.
pub(crate) fn recorder(log: &CallLog, name: &str) -> Handler {
    let log = Arc::clone(log);
    let name = name.to_string();
    Handler::middleware(move |_, _, next| {
        log.lock().unwrap().push(name.clone());
        next.proceed();
        Ok(())
    })
}

/// Route that records its name and halts.
pub(crate) fn terminal(log: &CallLog, name: &str) -> Handler {
    let log = Arc::clone(log);
    let name = name.to_string();
    Handler::route(move |_, _| {
        log.lock().unwrap().push(name.clone());
        Ok(())
    })
}

pub(crate) fn passthrough() -> Handler {
    Handler::middleware(|_, _, next| {
        next.proceed();
        Ok(())
    })
}

/// Answers 405 to anything outside the five supported verbs.
pub(crate) fn reject_non_standard_verbs() -> Handler {
    Handler::middleware(|req, res, next| {
        if matches!(req.method(), "GET" | "POST" | "PUT" | "PATCH" | "DELETE") {
            next.proceed();
        } else {
            res.status(405).send(());
        }
        Ok(())
    })
}

pub(crate) fn not_found() -> Handler {
    Handler::route(|_, res| {
        res.status(404).send(());
        Ok(())
    })
}

// ============================================================================
// Route Helpers
// ============================================================================

pub(crate) fn foo_route() -> RouteDescriptor {
    RouteDescriptor::new("/foo")
        .index(Handler::route(|_, res| {
            res.set_header("Content-Type", "text/html");
            res.status(200).send("foo:index");
            Ok(())
        }))
        .submit(Handler::route(|_, res| {
            res.status(201).send(());
            Ok(())
        }))
}

pub(crate) fn qux_resource_route() -> RouteDescriptor {
    RouteDescriptor::new("/foo/bar/baz/qux")
        .resource_actions(["get", "put", "patch", "delete"])
        .get(Handler::resource(|_, res, id| {
            res.status(200).json(&json!({ "get": true, "id": id }))
        }))
        .put(Handler::resource(|_, res, id| {
            res.status(201).json(&json!({ "put": true, "id": id }))
        }))
        .patch(Handler::resource(|_, res, id| {
            res.status(200).json(&json!({ "patch": true, "id": id }))
        }))
        .delete(Handler::resource(|_, res, _id| {
            res.status(204).send(());
            Ok(())
        }))
        .post(Handler::route(|_, res| {
            res.status(201).json(&json!({ "post": true }))
        }))
}
