//! Handlers, their classification tags and the stack continuation.
//!
//! A [`Handler`] is a shared callable plus two pieces of metadata: the number of
//! parameters it declares and an optional [`HandlerKind`] tag. The tag is assigned
//! at registration time and is the only thing the [`Stack`](super::Stack) looks at
//! when it buckets a handler.
//!
//! Synchronous handlers continue the pipeline by calling [`Next::proceed`].
//! Asynchronous middleware answer with a [`Flow`] instead: `proceed()` is an
//! inline-only primitive and calling it from an awaited stage fails the execution
//! with [`ErrorKind::ControlFlow`](crate::ErrorKind::ControlFlow).

use {
    super::{request::Request, response::Response},
    crate::{Error, Result},
    futures_util::future::{BoxFuture, FutureExt},
    std::{fmt, sync::Arc},
};

type BlockingFn = dyn Fn(&Request, &mut Response, &mut Next) -> Result<()> + Send + Sync;

type DeferredFn = dyn for<'a> Fn(&'a Request, &'a mut Response, &'a mut Next) -> BoxFuture<'a, Result<Flow>>
    + Send
    + Sync;

type BlockingResourceFn = dyn Fn(&Request, &mut Response, &str) -> Result<()> + Send + Sync;

type DeferredResourceFn =
    dyn for<'a> Fn(&'a Request, &'a mut Response, &'a str) -> BoxFuture<'a, Result<()>> + Send + Sync;

/// Whether the stack should move on to its next entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

/// Classification tag carried by a registered handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerKind {
    /// Runs before routes. `path` is `None` for global middleware.
    Middleware { path: Option<String> },
    /// A collection route, matched against its exact path.
    Route { name: String },
    /// A route bound to the resource id found in the request URI.
    Resource { name: String },
    /// The single handler run after everything else.
    Fallback,
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerKind::Middleware { path: None } => write!(f, "middleware"),
            HandlerKind::Middleware { path: Some(path) } => write!(f, "middleware:{path}"),
            HandlerKind::Route { name } => write!(f, "route:{name}"),
            HandlerKind::Resource { name } => write!(f, "resource:{name}"),
            HandlerKind::Fallback => write!(f, "fallback"),
        }
    }
}

/// Continuation handed to every stage of the stack.
///
/// ```
/// use edge_router::Handler;
///
/// let reject_connect = Handler::middleware(|req, res, next| {
///     if req.method() == "CONNECT" {
///         res.status(405).send(());
///     } else {
///         next.proceed();
///     }
///     Ok(())
/// });
/// ```
#[derive(Debug)]
pub struct Next {
    proceeded: bool,
    deferred: bool,
    violated: bool,
}

impl Next {
    pub(crate) fn inline() -> Self {
        Self {
            proceeded: false,
            deferred: false,
            violated: false,
        }
    }

    pub(crate) fn deferred() -> Self {
        Self {
            proceeded: false,
            deferred: true,
            violated: false,
        }
    }

    /// Lets the stack continue with its next entry once this handler returns.
    ///
    /// Inside an asynchronous handler this records a control-flow violation;
    /// such handlers return [`Flow::Continue`] instead.
    pub fn proceed(&mut self) {
        if self.deferred {
            self.violated = true;
        } else {
            self.proceeded = true;
        }
    }

    fn flow(&self) -> Flow {
        if self.proceeded {
            Flow::Continue
        } else {
            Flow::Halt
        }
    }
}

#[derive(Clone)]
enum Callable {
    Blocking(Arc<BlockingFn>),
    Deferred(Arc<DeferredFn>),
    BlockingResource(Arc<BlockingResourceFn>),
    DeferredResource(Arc<DeferredResourceFn>),
}

/// A route, resource, middleware or fallback function.
///
/// Handlers are cheap to clone; clones share the underlying callable.
///
/// ```
/// use edge_router::Handler;
///
/// let index = Handler::route(|_req, res| {
///     res.set_header("Content-Type", "text/html");
///     res.status(200).send("foo:index");
///     Ok(())
/// });
///
/// let show = Handler::resource(|_req, res, id| {
///     res.status(200).json(&serde_json::json!({ "id": id }))
/// });
///
/// let lookup = Handler::route_async(|_req, res| {
///     Box::pin(async move {
///         res.status(200).send("looked up");
///         Ok(())
///     })
/// });
/// # let _ = (index, show, lookup);
/// ```
#[derive(Clone)]
pub struct Handler {
    callable: Callable,
    arity: u8,
    kind: Option<HandlerKind>,
}

impl Handler {
    /// A handler that only looks at the request. The stack stops after it.
    pub fn inspect<F>(f: F) -> Self
    where
        F: Fn(&Request) -> Result<()> + Send + Sync + 'static,
    {
        Self::new(
            Callable::Blocking(blocking(move |req, _res, _next| f(req))),
            1,
        )
    }

    /// A terminal handler taking `(request, response)`. The stack stops after it.
    pub fn route<F>(f: F) -> Self
    where
        F: Fn(&Request, &mut Response) -> Result<()> + Send + Sync + 'static,
    {
        Self::new(
            Callable::Blocking(blocking(move |req, res, _next| f(req, res))),
            2,
        )
    }

    /// A pass-through handler taking `(request, response, next)`.
    pub fn middleware<F>(f: F) -> Self
    where
        F: Fn(&Request, &mut Response, &mut Next) -> Result<()> + Send + Sync + 'static,
    {
        Self::new(Callable::Blocking(Arc::new(f)), 3)
    }

    /// A handler taking `(request, response, resource_id)`.
    ///
    /// The id is the trailing URI segment found by the route binder. When the
    /// handler answers a bare collection request the id is empty.
    pub fn resource<F>(f: F) -> Self
    where
        F: Fn(&Request, &mut Response, &str) -> Result<()> + Send + Sync + 'static,
    {
        Self::new(Callable::BlockingResource(Arc::new(f)), 3)
    }

    /// Asynchronous counterpart of [`Handler::route`].
    pub fn route_async<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a Request, &'a mut Response) -> BoxFuture<'a, Result<()>>
            + Send
            + Sync
            + 'static,
    {
        Self::new(
            Callable::Deferred(deferred(move |req, res, _next| {
                f(req, res).map(|result| result.map(|()| Flow::Halt)).boxed()
            })),
            2,
        )
    }

    /// Asynchronous counterpart of [`Handler::middleware`]. The returned future
    /// resolves to the [`Flow`] the stack should follow.
    pub fn middleware_async<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a Request, &'a mut Response, &'a mut Next) -> BoxFuture<'a, Result<Flow>>
            + Send
            + Sync
            + 'static,
    {
        Self::new(Callable::Deferred(Arc::new(f)), 3)
    }

    /// Asynchronous counterpart of [`Handler::resource`].
    pub fn resource_async<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a Request, &'a mut Response, &'a str) -> BoxFuture<'a, Result<()>>
            + Send
            + Sync
            + 'static,
    {
        Self::new(Callable::DeferredResource(Arc::new(f)), 3)
    }

    fn new(callable: Callable, arity: u8) -> Self {
        Self {
            callable,
            arity,
            kind: None,
        }
    }

    /// Number of parameters the handler declares.
    pub fn arity(&self) -> u8 {
        self.arity
    }

    /// The classification tag, if one has been assigned.
    pub fn kind(&self) -> Option<&HandlerKind> {
        self.kind.as_ref()
    }

    /// Returns true if the handler was registered with an async body.
    pub fn is_async(&self) -> bool {
        matches!(
            self.callable,
            Callable::Deferred(_) | Callable::DeferredResource(_)
        )
    }

    /// Tags the handler, replacing any previous tag.
    #[must_use]
    pub fn with_kind(mut self, kind: HandlerKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Tags the handler unless it already carries a tag.
    #[must_use]
    pub fn or_kind(mut self, kind: HandlerKind) -> Self {
        if self.kind.is_none() {
            self.kind = Some(kind);
        }
        self
    }

    /// Wraps a resource handler so that it is always invoked with `id`.
    ///
    /// Handlers that do not take a resource id are returned unchanged.
    #[must_use]
    pub fn bind_resource(&self, id: &str) -> Self {
        let id = id.to_string();
        let callable = match &self.callable {
            Callable::BlockingResource(f) => {
                let f = Arc::clone(f);
                Callable::Blocking(blocking(move |req, res, _next| f(req, res, &id)))
            }
            Callable::DeferredResource(f) => {
                let f = Arc::clone(f);
                Callable::Deferred(deferred(move |req, res, _next| {
                    let f = Arc::clone(&f);
                    let id = id.clone();
                    async move { f(req, res, &id).await.map(|()| Flow::Halt) }.boxed()
                }))
            }
            other => other.clone(),
        };

        Self {
            callable,
            arity: self.arity,
            kind: self.kind.clone(),
        }
    }

    /// Runs the handler once and reports whether the stack may continue.
    pub(crate) async fn invoke(&self, req: &Request, res: &mut Response) -> Result<Flow> {
        match &self.callable {
            Callable::Blocking(f) => {
                let mut next = Next::inline();
                f(req, res, &mut next)?;
                Ok(next.flow())
            }
            Callable::Deferred(f) => {
                let mut next = Next::deferred();
                let result = f(req, res, &mut next).await;
                if next.violated {
                    return Err(Error::control_flow(format!(
                        "next() called from asynchronous handler '{}'",
                        self.label()
                    )));
                }
                result
            }
            Callable::BlockingResource(f) => {
                f(req, res, "")?;
                Ok(Flow::Halt)
            }
            Callable::DeferredResource(f) => {
                f(req, res, "").await?;
                Ok(Flow::Halt)
            }
        }
    }

    pub(crate) fn label(&self) -> String {
        self.kind
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "untagged".to_string())
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("kind", &self.kind)
            .field("arity", &self.arity)
            .field("async", &self.is_async())
            .finish()
    }
}

fn blocking<F>(f: F) -> Arc<BlockingFn>
where
    F: Fn(&Request, &mut Response, &mut Next) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Pins the higher-ranked signature of an async stage closure.
fn deferred<F>(f: F) -> Arc<DeferredFn>
where
    F: for<'a> Fn(&'a Request, &'a mut Response, &'a mut Next) -> BoxFuture<'a, Result<Flow>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}
