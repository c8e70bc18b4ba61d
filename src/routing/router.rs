//! The per-request router façade.

use {
    super::{
        common::{is_valid_path, is_valid_route},
        handler::{Handler, HandlerKind},
        loader::RouteLoader,
        request::{Request, RequestDescriptor},
        response::{Response, ResponseDescriptor},
        route::{RouteDescriptor, bind_route},
        stack::Stack,
    },
    crate::{Config, Result},
    futures_util::{
        future::{self, BoxFuture, FutureExt},
        task::noop_waker_ref,
    },
    http::Method,
    std::{
        fmt,
        future::IntoFuture,
        mem,
        task::{Context, Poll},
    },
    tracing::debug,
};

///
/// Result of [`Router::response`].
///
/// A pipeline made only of synchronous handlers is already `Ready`. One that
/// suspended inside an asynchronous handler is `Pending` and finishes when
/// awaited. Either way the outcome can be awaited directly.
///
pub enum Outcome {
    Ready(ResponseDescriptor),
    Pending(BoxFuture<'static, Result<ResponseDescriptor>>),
}

impl Outcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending(_))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Outcome::Ready(_))
    }

    /// The descriptor, if the pipeline already finished.
    pub fn ready(self) -> Option<ResponseDescriptor> {
        match self {
            Outcome::Ready(data) => Some(data),
            Outcome::Pending(_) => None,
        }
    }
}

impl IntoFuture for Outcome {
    type Output = Result<ResponseDescriptor>;
    type IntoFuture = BoxFuture<'static, Result<ResponseDescriptor>>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Outcome::Ready(data) => future::ready(Ok(data)).boxed(),
            Outcome::Pending(pending) => pending,
        }
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ready(data) => f.debug_tuple("Ready").field(data).finish(),
            Outcome::Pending(_) => f.write_str("Pending"),
        }
    }
}

///
/// Routes a single request.
///
/// A router is built for one request, collects only the handlers that match
/// that request and is consumed by [`Router::response`].
///
/// ```
/// use edge_router::{Handler, RequestDescriptor, Router};
///
/// let mut router = Router::new(RequestDescriptor::new("GET", "/api/test"), None);
///
/// router
///     .use_middleware(Handler::middleware(|req, res, next| {
///         if req.method() == "POST" {
///             res.status(405).send(());
///         } else {
///             next.proceed();
///         }
///         Ok(())
///     }))
///     .get("/api/test", Handler::route(|_, res| {
///         res.set_header("Content-Type", "text/html");
///         res.status(200).send("Hello World");
///         Ok(())
///     }));
///
/// let data = router.response().unwrap().ready().unwrap();
/// assert_eq!(data.status, Some(200));
/// assert_eq!(data.body.as_deref(), Some("Hello World"));
/// ```
///
pub struct Router {
    req: Request,
    res: Response,
    stack: Stack,
    prefix: String,
    loaders: Vec<Box<dyn RouteLoader>>,
}

impl Router {
    pub fn new(request: RequestDescriptor, response: Option<ResponseDescriptor>) -> Self {
        Self {
            req: Request::new(request),
            res: Response::new(response),
            stack: Stack::new(),
            prefix: String::new(),
            loaders: Vec::new(),
        }
    }

    /// Builds a router and applies the configured prefix.
    pub fn with_config(
        request: RequestDescriptor,
        response: Option<ResponseDescriptor>,
        config: &Config,
    ) -> Result<Self> {
        config.validate()?;
        let mut router = Self::new(request, response);
        if let Some(prefix) = &config.router.prefix {
            router.set_prefix(prefix);
        }
        Ok(router)
    }

    pub fn request(&self) -> &Request {
        &self.req
    }

    /// The response as written so far.
    pub fn response_builder(&self) -> &Response {
        &self.res
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Sets the prefix prepended to subsequently registered paths. Invalid
    /// paths and the bare root are ignored.
    pub fn set_prefix(&mut self, value: &str) -> &mut Self {
        if is_valid_path(value) && value != "/" {
            self.prefix = value.to_string();
        }
        self
    }

    ///
    /// Registers `handler` under the prefixed `path` if it matches the current
    /// request. Untagged handlers are tagged as routes named after the path.
    ///
    pub fn handle(&mut self, path: &str, handler: Handler) -> &mut Self {
        let path = format!("{}{}", self.prefix, path);
        if is_valid_path(&path) && is_valid_route(self.req.uri(), &path, &handler) {
            self.stack.add(handler.or_kind(HandlerKind::Route { name: path }));
        }
        self
    }

    /// Registers middleware scoped to `path` and the resources below it.
    pub fn use_path(&mut self, path: &str, handler: Handler) -> &mut Self {
        if is_valid_path(path) {
            let kind = HandlerKind::Middleware {
                path: Some(path.to_string()),
            };
            self.handle(path, handler.with_kind(kind));
        }
        self
    }

    /// Registers middleware that runs for every request.
    pub fn use_middleware(&mut self, handler: Handler) -> &mut Self {
        self.stack
            .add(handler.or_kind(HandlerKind::Middleware { path: None }));
        self
    }

    /// Registers the fallback, replacing any earlier one.
    pub fn default(&mut self, handler: Handler) -> &mut Self {
        self.stack.add(handler.with_kind(HandlerKind::Fallback));
        self
    }

    /// Registers `handler` for `path` if the request method is `method`.
    pub fn verb(&mut self, method: &Method, path: &str, handler: Handler) -> &mut Self {
        if self.req.method() == method.as_str() {
            self.handle(path, handler);
        }
        self
    }

    pub fn get(&mut self, path: &str, handler: Handler) -> &mut Self {
        self.verb(&Method::GET, path, handler)
    }

    pub fn post(&mut self, path: &str, handler: Handler) -> &mut Self {
        self.verb(&Method::POST, path, handler)
    }

    pub fn put(&mut self, path: &str, handler: Handler) -> &mut Self {
        self.verb(&Method::PUT, path, handler)
    }

    pub fn patch(&mut self, path: &str, handler: Handler) -> &mut Self {
        self.verb(&Method::PATCH, path, handler)
    }

    pub fn delete(&mut self, path: &str, handler: Handler) -> &mut Self {
        self.verb(&Method::DELETE, path, handler)
    }

    /// Binds a route descriptor right away.
    pub fn mount(&mut self, route: &RouteDescriptor) -> &mut Self {
        bind_route(self, route);
        self
    }

    /// Adds a loader whose routes are bound when the response is requested.
    pub fn with_loader(&mut self, loader: impl RouteLoader + 'static) -> &mut Self {
        self.loaders.push(Box::new(loader));
        self
    }

    fn load_routes(&mut self) -> Result<()> {
        for loader in mem::take(&mut self.loaders) {
            for route in loader.load()? {
                bind_route(self, &route);
            }
        }
        Ok(())
    }

    ///
    /// Binds the loaded routes, runs the stack and returns the response.
    ///
    /// The stack is polled once right away. If every stage completed, the
    /// descriptor is returned as [`Outcome::Ready`] and errors are returned
    /// directly. Otherwise the remaining work is handed back as
    /// [`Outcome::Pending`]; asynchronous handlers that rely on a runtime must
    /// therefore be registered only when `response()` is called from within it.
    ///
    pub fn response(mut self) -> Result<Outcome> {
        self.load_routes()?;

        let Router {
            req, mut res, stack, ..
        } = self;

        debug!(
            method = req.method(),
            uri = req.uri(),
            middleware = stack.middleware().len(),
            routes = stack.routes().len(),
            resources = stack.resources().len(),
            fallback = stack.fallback().is_some(),
            "building response"
        );

        let mut pending = async move {
            stack.exec(&req, &mut res).await?;
            Ok(res.into_descriptor())
        }
        .boxed();

        let mut cx = Context::from_waker(noop_waker_ref());
        match pending.poll_unpin(&mut cx) {
            Poll::Ready(result) => {
                let data = result?;
                debug!(status = ?data.status, "response ready");
                Ok(Outcome::Ready(data))
            }
            Poll::Pending => {
                debug!("response pending on asynchronous handler");
                Ok(Outcome::Pending(pending))
            }
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("request", self.req.data())
            .field("prefix", &self.prefix)
            .field("stack", &self.stack)
            .field("loaders", &self.loaders.len())
            .finish()
    }
}
