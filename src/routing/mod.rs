//!
//! Request dispatch: path predicates, the request and response views, the
//! per-request handler stack, route descriptors and the router tying them
//! together.
//!
mod common;
mod handler;
mod loader;
mod request;
mod response;
mod route;
mod router;
mod stack;

#[cfg(test)]
mod tests;

pub use common::*;
pub use handler::*;
pub use loader::*;
pub use request::*;
pub use response::*;
pub use route::*;
pub use router::*;
pub use stack::*;
