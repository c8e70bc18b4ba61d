//! Per-request ordered collection of handlers and the driver that walks it.

use {
    super::{
        common::is_valid_func,
        handler::{Flow, Handler, HandlerKind},
        request::Request,
        response::Response,
    },
    crate::Result,
    tracing::{debug, trace},
};

///
/// Handlers bucketed by kind. Execution order is always middleware, routes,
/// resources and finally the fallback, whatever order they were added in.
///
#[derive(Debug, Clone, Default)]
pub struct Stack {
    middleware: Vec<Handler>,
    routes: Vec<Handler>,
    resources: Vec<Handler>,
    fallback: Option<Handler>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buckets `handler` by its tag. Untagged handlers replace the fallback.
    /// Handlers with an unsupported arity are ignored; the [`Handler`]
    /// constructors never produce one.
    pub fn add(&mut self, handler: Handler) -> &mut Self {
        if !is_valid_func(&handler) {
            return self;
        }

        match handler.kind() {
            Some(HandlerKind::Middleware { .. }) => self.middleware.push(handler),
            Some(HandlerKind::Route { .. }) => self.routes.push(handler),
            Some(HandlerKind::Resource { .. }) => self.resources.push(handler),
            Some(HandlerKind::Fallback) | None => self.fallback = Some(handler),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.middleware.len()
            + self.routes.len()
            + self.resources.len()
            + usize::from(self.fallback.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn middleware(&self) -> &[Handler] {
        &self.middleware
    }

    pub fn routes(&self) -> &[Handler] {
        &self.routes
    }

    pub fn resources(&self) -> &[Handler] {
        &self.resources
    }

    pub fn fallback(&self) -> Option<&Handler> {
        self.fallback.as_ref()
    }

    /// Handlers in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &Handler> {
        self.middleware
            .iter()
            .chain(&self.routes)
            .chain(&self.resources)
            .chain(&self.fallback)
    }

    ///
    /// Runs the handlers in order until one of them halts.
    ///
    /// Synchronous stages complete without suspending, so a stack made only of
    /// synchronous handlers resolves on its first poll. Errors stop the walk and
    /// are returned as they are; whatever earlier stages wrote to `res` stays.
    ///
    pub async fn exec(&self, req: &Request, res: &mut Response) -> Result<()> {
        debug!(
            method = req.method(),
            uri = req.uri(),
            stages = self.len(),
            "executing stack"
        );

        for (index, handler) in self.iter().enumerate() {
            trace!(stage = index, handler = %handler.label(), "running stage");
            match handler.invoke(req, res).await? {
                Flow::Continue => continue,
                Flow::Halt => {
                    debug!(stage = index, handler = %handler.label(), "stack halted");
                    break;
                }
            }
        }
        Ok(())
    }
}
