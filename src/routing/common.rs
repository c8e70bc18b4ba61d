//! Path and handler predicates shared by the router, the stack and the route binder.
//!
//! Route paths are deliberately restricted: a leading slash followed by letters,
//! digits, `-`, `_` and `/`. A resource route may be extended by exactly one
//! trailing identifier segment (`[A-Za-z0-9_-]+`), which is what
//! [`get_resource_id`] extracts.

use {
    super::handler::{Handler, HandlerKind},
    regex::Regex,
    std::sync::LazyLock,
};

static ROUTE_PATH_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^/([a-z0-9_/-]+)?$").unwrap());

/// Returns true if `value` is a legal route path.
///
/// ```
/// use edge_router::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/foo_bar/biz-baz"));
/// assert!(!is_valid_path("/foo_bar/biz-baz/qux*"));
/// assert!(!is_valid_path("/foo?name=value"));
/// assert!(!is_valid_path("foo_bar"));
/// ```
pub fn is_valid_path(value: &str) -> bool {
    ROUTE_PATH_REGEXP.is_match(value)
}

/// Returns true if the handler declares between one and three parameters
/// (request, response and an optional continuation or resource id).
///
/// Every [`Handler`] constructor fixes the arity inside that range, so this
/// holds for any handler the public API can build. It stays as the guard
/// [`Stack::add`](crate::Stack::add) and [`is_valid_route`] check before
/// bucketing or matching.
pub fn is_valid_func(handler: &Handler) -> bool {
    (1..=3).contains(&handler.arity())
}

/// Returns true if a request for `uri` should reach `handler` registered at `path`.
///
/// Handlers tagged as plain routes only match their exact path. Everything else
/// (middleware, resources, untagged handlers) also matches the path extended by
/// one trailing segment, so that it covers the resource URIs below it.
pub fn is_valid_route(uri: &str, path: &str, handler: &Handler) -> bool {
    if !is_valid_func(handler) {
        return false;
    }

    match handler.kind() {
        Some(HandlerKind::Route { .. }) => uri == path,
        _ => split_resource(uri, path).is_some(),
    }
}

/// Returns the trailing resource identifier of `uri` relative to `path`, if the
/// URI extends the path by exactly one segment.
///
/// ```
/// use edge_router::get_resource_id;
///
/// assert_eq!(get_resource_id("/foo/bar/abc123", "/foo/bar"), Some("abc123"));
/// assert_eq!(get_resource_id("/foo/bar/abc123", "/foo/bar/biz"), None);
/// assert_eq!(get_resource_id("/foo/bar", "/foo/bar"), None);
/// ```
pub fn get_resource_id<'u>(uri: &'u str, path: &str) -> Option<&'u str> {
    split_resource(uri, path).flatten()
}

/// Derives the route path of a route module from its file path relative to the
/// routes root: the extension is dropped, the result is lowercased and rooted.
///
/// ```
/// use edge_router::route_path;
///
/// assert_eq!(route_path("foo/bar/baz/Qux.js"), "/foo/bar/baz/qux");
/// assert_eq!(route_path("/Foo"), "/foo");
/// ```
pub fn route_path(module_path: &str) -> String {
    let normalized = module_path.replace('\\', "/");
    let stem = match normalized.rsplit_once('/') {
        Some((dir, file)) => match file.rsplit_once('.') {
            Some((name, _)) if !name.is_empty() => format!("{dir}/{name}"),
            _ => normalized.clone(),
        },
        None => match normalized.rsplit_once('.') {
            Some((name, _)) if !name.is_empty() => name.to_string(),
            _ => normalized.clone(),
        },
    };

    let lowered = stem.to_lowercase();
    if lowered.starts_with('/') {
        lowered
    } else {
        format!("/{lowered}")
    }
}

/// Matches `uri` against `path` followed by an optional single segment.
///
/// Returns `None` when the URI does not match, `Some(None)` for an exact match and
/// `Some(Some(segment))` when a trailing resource segment is present. The path
/// comparison ignores ASCII case.
fn split_resource<'u>(uri: &'u str, path: &str) -> Option<Option<&'u str>> {
    let head = uri.get(..path.len())?;
    if !head.eq_ignore_ascii_case(path) {
        return None;
    }

    let rest = &uri[path.len()..];
    if rest.is_empty() {
        return Some(None);
    }

    let segment = rest.strip_prefix('/')?;
    let valid = !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

    valid.then_some(Some(segment))
}
