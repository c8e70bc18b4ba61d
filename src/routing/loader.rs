//! Route discovery, injected into the router instead of read from disk.

use {
    super::{common::route_path, route::RouteDescriptor},
    crate::Result,
};

///
/// Supplies the route descriptors a router binds when its response is requested.
///
/// ```
/// use edge_router::{Handler, RouteDescriptor, RouteLoader, RouteModules};
///
/// let modules = RouteModules::new()
///     .module("foo.rs", RouteDescriptor::default().index(Handler::route(|_, _| Ok(()))))
///     .module("foo/bar/baz/Qux.rs", RouteDescriptor::default());
///
/// let routes = modules.load().unwrap();
/// assert_eq!(routes[0].path, "/foo");
/// assert_eq!(routes[1].path, "/foo/bar/baz/qux");
/// ```
///
pub trait RouteLoader: Send + Sync {
    fn load(&self) -> Result<Vec<RouteDescriptor>>;
}

impl RouteLoader for Vec<RouteDescriptor> {
    fn load(&self) -> Result<Vec<RouteDescriptor>> {
        Ok(self.clone())
    }
}

/// Route modules keyed by their file path relative to the routes root.
/// Each module's route path is derived from that file path.
#[derive(Debug, Clone, Default)]
pub struct RouteModules {
    modules: Vec<(String, RouteDescriptor)>,
}

impl RouteModules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module(mut self, file: impl Into<String>, route: RouteDescriptor) -> Self {
        self.modules.push((file.into(), route));
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl RouteLoader for RouteModules {
    fn load(&self) -> Result<Vec<RouteDescriptor>> {
        Ok(self
            .modules
            .iter()
            .map(|(file, route)| route.clone().with_path(route_path(file)))
            .collect())
    }
}
