//! Declarative route descriptors and the binder that registers them with a router.

use {
    super::{
        common::get_resource_id,
        handler::{Handler, HandlerKind},
        router::Router,
    },
    http::Method,
};

/// Which actions of a route are served as resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResourceActions {
    #[default]
    None,
    All,
    Only(Vec<String>),
}

impl ResourceActions {
    pub fn covers(&self, action: &str) -> bool {
        match self {
            ResourceActions::None => false,
            ResourceActions::All => true,
            ResourceActions::Only(actions) => actions.iter().any(|a| a == action),
        }
    }
}

///
/// A route module: a path, optional middleware and named actions.
///
/// Actions keep their declaration order.
///
/// ```
/// use edge_router::{Handler, RouteDescriptor};
///
/// let route = RouteDescriptor::new("/foo/bar/baz/qux")
///     .resource_actions(["put"])
///     .put(Handler::resource(|_req, res, id| {
///         res.status(201).json(&serde_json::json!({ "put": true, "id": id }))
///     }));
///
/// assert_eq!(route.actions().count(), 1);
/// ```
///
#[derive(Debug, Clone, Default)]
pub struct RouteDescriptor {
    pub path: String,
    pub middleware: Vec<Handler>,
    pub resource: ResourceActions,
    actions: Vec<(String, Handler)>,
}

impl RouteDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Adds route-scoped middleware. May be called repeatedly.
    pub fn middleware(mut self, handler: Handler) -> Self {
        self.middleware.push(handler);
        self
    }

    /// Serves every action as a resource when `enabled`.
    pub fn resource(mut self, enabled: bool) -> Self {
        self.resource = if enabled {
            ResourceActions::All
        } else {
            ResourceActions::None
        };
        self
    }

    /// Serves only the named actions as resources.
    pub fn resource_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resource = ResourceActions::Only(actions.into_iter().map(Into::into).collect());
        self
    }

    /// Declares an action under an arbitrary key. Keys without a verb mapping
    /// are kept but never registered.
    pub fn action(mut self, name: impl Into<String>, handler: Handler) -> Self {
        self.actions.push((name.into(), handler));
        self
    }

    pub fn index(self, handler: Handler) -> Self {
        self.action("index", handler)
    }

    pub fn create(self, handler: Handler) -> Self {
        self.action("create", handler)
    }

    pub fn update(self, handler: Handler) -> Self {
        self.action("update", handler)
    }

    pub fn delete(self, handler: Handler) -> Self {
        self.action("delete", handler)
    }

    pub fn submit(self, handler: Handler) -> Self {
        self.action("submit", handler)
    }

    pub fn get(self, handler: Handler) -> Self {
        self.action("get", handler)
    }

    pub fn put(self, handler: Handler) -> Self {
        self.action("put", handler)
    }

    pub fn patch(self, handler: Handler) -> Self {
        self.action("patch", handler)
    }

    pub fn post(self, handler: Handler) -> Self {
        self.action("post", handler)
    }

    /// Declared actions in declaration order.
    pub fn actions(&self) -> impl Iterator<Item = (&str, &Handler)> {
        self.actions.iter().map(|(name, handler)| (name.as_str(), handler))
    }
}

/// Maps an action key to the HTTP verb it is served under.
///
/// ```
/// use edge_router::action_verb;
/// use http::Method;
///
/// assert_eq!(action_verb("index"), Some(Method::GET));
/// assert_eq!(action_verb("create"), Some(Method::PUT));
/// assert_eq!(action_verb("post"), Some(Method::POST));
/// assert_eq!(action_verb("options"), None);
/// ```
pub fn action_verb(action: &str) -> Option<Method> {
    match action {
        "index" | "get" => Some(Method::GET),
        "create" | "put" => Some(Method::PUT),
        "update" | "patch" => Some(Method::PATCH),
        "delete" => Some(Method::DELETE),
        "submit" | "post" => Some(Method::POST),
        _ => None,
    }
}

///
/// Registers a route descriptor with `router`.
///
/// Middleware is registered under the route path. Each action is registered
/// under its verb: resource actions requested with a trailing id are bound to
/// that id and tagged as resources, everything else is tagged as a plain route.
/// The router only keeps the registrations that match the current request.
///
pub fn bind_route(router: &mut Router, route: &RouteDescriptor) {
    for handler in &route.middleware {
        router.use_path(&route.path, handler.clone());
    }

    let full_path = format!("{}{}", router.prefix(), route.path);
    let resource_id = get_resource_id(router.request().uri(), &full_path).map(str::to_string);

    for (action, handler) in route.actions() {
        let Some(verb) = action_verb(action) else {
            continue;
        };

        let bound = match &resource_id {
            Some(id) if route.resource.covers(action) => handler.bind_resource(id).with_kind(
                HandlerKind::Resource {
                    name: action.to_string(),
                },
            ),
            _ => handler.clone().with_kind(HandlerKind::Route {
                name: action.to_string(),
            }),
        };

        router.verb(&verb, &route.path, bound);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestDescriptor;

    fn ok_route() -> Handler {
        Handler::route(|_, _| Ok(()))
    }

    #[test]
    fn test_action_verb_table() {
        assert_eq!(action_verb("index"), Some(Method::GET));
        assert_eq!(action_verb("create"), Some(Method::PUT));
        assert_eq!(action_verb("update"), Some(Method::PATCH));
        assert_eq!(action_verb("delete"), Some(Method::DELETE));
        assert_eq!(action_verb("submit"), Some(Method::POST));
        for verb in ["get", "put", "patch", "post"] {
            assert_eq!(action_verb(verb).map(|m| m.as_str().to_lowercase()), Some(verb.into()));
        }
        assert_eq!(action_verb("head"), None);
        assert_eq!(action_verb("GET"), None);
    }

    #[test]
    fn test_resource_actions_covers() {
        assert!(!ResourceActions::None.covers("get"));
        assert!(ResourceActions::All.covers("anything"));
        let only = ResourceActions::Only(vec!["put".into()]);
        assert!(only.covers("put"));
        assert!(!only.covers("get"));
    }

    #[test]
    fn test_descriptor_keeps_declaration_order() {
        let route = RouteDescriptor::new("/foo")
            .post(ok_route())
            .index(ok_route())
            .action("custom", ok_route());
        let names: Vec<_> = route.actions().map(|(name, _)| name).collect();
        assert_eq!(names, ["post", "index", "custom"]);
    }

    #[test]
    fn test_bind_collection_request() {
        let mut router = Router::new(RequestDescriptor::new("GET", "/foo"), None);
        let route = RouteDescriptor::new("/foo")
            .resource(true)
            .index(ok_route())
            .get(ok_route())
            .post(ok_route());
        bind_route(&mut router, &route);

        let stack = router.stack();
        assert_eq!(stack.routes().len(), 2);
        assert!(stack.resources().is_empty());
        assert_eq!(
            stack.routes()[0].kind(),
            Some(&HandlerKind::Route { name: "index".into() })
        );
    }

    #[test]
    fn test_bind_resource_request() {
        let mut router = Router::new(RequestDescriptor::new("GET", "/foo/abc123"), None);
        let route = RouteDescriptor::new("/foo")
            .resource_actions(["get"])
            .middleware(Handler::middleware(|_, _, next| {
                next.proceed();
                Ok(())
            }))
            .index(ok_route())
            .get(Handler::resource(|_, _, _| Ok(())));
        bind_route(&mut router, &route);

        let stack = router.stack();
        assert_eq!(stack.middleware().len(), 1);
        assert!(stack.routes().is_empty());
        assert_eq!(
            stack.resources()[0].kind(),
            Some(&HandlerKind::Resource { name: "get".into() })
        );
    }

    #[test]
    fn test_bind_respects_prefix() {
        let mut router = Router::new(RequestDescriptor::new("PUT", "/api/foo/uuid-1"), None);
        router.set_prefix("/api");
        let route = RouteDescriptor::new("/foo")
            .resource(true)
            .create(Handler::resource(|_, _, _| Ok(())));
        bind_route(&mut router, &route);
        assert_eq!(router.stack().resources().len(), 1);
    }
}
