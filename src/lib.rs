//! # edge-router
//!
//! A small request router for edge functions that receive one request
//! descriptor per invocation (Lambda@Edge style origin-request events) and
//! must hand back one response descriptor.
//!
//! A [`Router`] is built per request. Registrations that do not match the
//! request are dropped on the spot, so the handler [`Stack`] only ever holds
//! what is relevant to this one request. The stack runs middleware first, then
//! routes, then resources, then the fallback, stopping as soon as a handler
//! does not continue.
//!
//! # Quick Start
//!
//! ```rust
//! use edge_router::{Handler, OriginRequestEvent, Result, RouteDescriptor};
//!
//! fn handle(event_json: &str) -> Result<edge_router::ResponseDescriptor> {
//!     let mut router = OriginRequestEvent::from_json(event_json)?.into_router()?;
//!     router.set_prefix("/api");
//!
//!     router
//!         .use_middleware(Handler::middleware(|req, res, next| {
//!             if req.method() == "CONNECT" {
//!                 res.status(405).send(());
//!             } else {
//!                 next.proceed();
//!             }
//!             Ok(())
//!         }))
//!         .mount(&RouteDescriptor::new("/foo").index(Handler::route(|_, res| {
//!             res.set_header("Content-Type", "text/html");
//!             res.status(200).send("foo:index");
//!             Ok(())
//!         })))
//!         .default(Handler::route(|_, res| {
//!             res.status(404).send(());
//!             Ok(())
//!         }));
//!
//!     Ok(router.response()?.ready().unwrap_or_default())
//! }
//!
//! let data = handle(r#"{"Records":[{"cf":{"request":{"method":"GET","uri":"/api/foo"}}}]}"#).unwrap();
//! assert_eq!(data.status, Some(200));
//! assert_eq!(data.body.as_deref(), Some("foo:index"));
//! ```
//!
//! # Asynchronous handlers
//!
//! Handlers built with the `*_async` constructors return a boxed future. A
//! pipeline that suspends in one of them comes back from [`Router::response`]
//! as [`Outcome::Pending`]; awaiting the outcome finishes it. Asynchronous
//! middleware continue by resolving to [`Flow::Continue`], never by calling
//! [`Next::proceed`].
//!
//! ```rust
//! # use edge_router::{Handler, RequestDescriptor, Router};
//! # async fn run() -> edge_router::Result<()> {
//! let mut router = Router::new(RequestDescriptor::new("GET", "/items/42"), None);
//! router.get("/items", Handler::route_async(|req, res| {
//!     Box::pin(async move {
//!         res.status(200).text(format!("item for {}", req.uri()));
//!         Ok(())
//!     })
//! }));
//! let data = router.response()?.await?;
//! # let _ = data;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```rust
//! use edge_router::{Config, RequestDescriptor, Router};
//!
//! let config: Config = r#"
//!     [router]
//!     prefix = "/api"
//!
//!     [logging]
//!     format = "json"
//! "#.parse().unwrap();
//!
//! config.setup_tracing();
//! let router = Router::with_config(RequestDescriptor::new("GET", "/api/foo"), None, &config).unwrap();
//! assert_eq!(router.prefix(), "/api");
//! ```
//!
//! # Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | Configuration loading and validation ([`Config`]) |
//! | `routing` | Router, stack, handlers, request and response ([`Router`]) |
//! | `event` | Origin-request envelope ([`OriginRequestEvent`]) |
//! | `error` | Error types ([`Error`]) |
//! | `utils` | Environment substitution and base64 helpers |
mod config;
mod error;
mod event;
mod routing;
mod utils;

pub use config::*;
pub use error::*;
pub use event::*;
pub use routing::*;
pub use utils::*;

pub use futures_util::future::BoxFuture;

pub type Result<T> = std::result::Result<T, Error>;
