//! Route registration and lookup.
//!
//! [`Router`] owns the route tree. Patterns are decomposed into segments and
//! inserted one segment at a time; lookups walk the tree from the root,
//! recording parameters into a caller-supplied [`ParamList`].

use crate::error::RouteError;
use crate::method::{Method, MethodSet};
use crate::node::{Node, NodeId, NodeKind, Tree};
use crate::params::{ParamList, CATCH_ALL_PARAM};
use crate::pattern::{self, Segment};

/// Outcome classification of a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A value was registered for the method at this path.
    Ok,
    /// No route matches the path.
    NotFound,
    /// The path matches but the method is not registered there.
    MethodNotAllowed,
}

/// The result of [`Router::find`].
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup<'a, T> {
    /// The value registered for the method and path.
    Found(&'a T),
    /// No route matches the path.
    NotFound,
    /// The path exists; these methods are registered for it.
    MethodNotAllowed(MethodSet),
}

impl<'a, T> Lookup<'a, T> {
    /// Returns the status code for this outcome.
    #[must_use]
    pub const fn status(&self) -> Status {
        match self {
            Self::Found(_) => Status::Ok,
            Self::NotFound => Status::NotFound,
            Self::MethodNotAllowed(_) => Status::MethodNotAllowed,
        }
    }

    /// Returns the matched value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&'a T> {
        match self {
            Self::Found(value) => Some(*value),
            Self::NotFound | Self::MethodNotAllowed(_) => None,
        }
    }

    /// Returns true for [`Lookup::Found`].
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl<T> Clone for Lookup<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Lookup<'_, T> {}

/// A compressed prefix tree router.
///
/// Values of type `T` are stored per method at the node reached by the
/// final segment of a pattern. In Switchyard `T` is a handler chain, but the
/// router itself does not care.
///
/// # Example
///
/// ```rust
/// use switchyard_router::{Lookup, Method, ParamList, Router};
///
/// let mut router = Router::new();
/// router.add(Method::Get, "/users", "list_users").unwrap();
/// router.add(Method::Get, "/users/:id", "get_user").unwrap();
/// router.add(Method::Get, "/files/*", "serve_file").unwrap();
///
/// let mut params = ParamList::new();
/// assert_eq!(router.find(Method::Get, "/users/42", &mut params), Lookup::Found(&"get_user"));
/// assert_eq!(params.get("id"), Some("42"));
///
/// router.find(Method::Get, "/files/css/site.css", &mut params);
/// assert_eq!(params.get("*"), Some("css/site.css"));
/// ```
///
/// # Route Priority
///
/// Among the children of a node, a static child is tried first, then the
/// parameter child, then the catch-all child. A branch that does not end in a
/// match is abandoned and the next one is tried, so `/users/me` wins over
/// `/users/:id` for the path `/users/me`, while `/users/mel` still reaches
/// `/users/:id`.
#[derive(Debug, Clone)]
pub struct Router<T> {
    tree: Tree<T>,
    route_count: usize,
    max_params: usize,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: Tree::new(),
            route_count: 0,
            max_params: 0,
        }
    }

    /// Registers `value` for `method` at `pattern`.
    ///
    /// Registering the same method and pattern again replaces the previous
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] if the pattern is malformed or declares a
    /// parameter name that differs from one already registered at the same
    /// position.
    pub fn add(&mut self, method: Method, pattern: &str, value: T) -> Result<(), RouteError> {
        let segments = pattern::parse(pattern)?;

        let mut current = NodeId::ROOT;
        let mut param_count = 0;
        for (i, segment) in segments.iter().enumerate() {
            current = match *segment {
                Segment::Static(text) if i == 0 => self.tree.insert_root_static(text),
                Segment::Static(text) => self.tree.insert_static_under(current, text),
                Segment::Param(name) => {
                    param_count += 1;
                    self.tree
                        .insert_param(current, name)
                        .map_err(|existing| RouteError::ConflictingParam {
                            pattern: pattern.to_string(),
                            existing,
                            new: name.to_string(),
                        })?
                }
                Segment::CatchAll => {
                    param_count += 1;
                    self.tree.insert_catch_all(current)
                }
            };
        }

        if self
            .tree
            .node_mut(current)
            .handlers_mut()
            .insert(method, value)
            .is_none()
        {
            self.route_count += 1;
        }
        self.max_params = self.max_params.max(param_count);
        Ok(())
    }

    /// Looks up the value registered for `method` at `path`.
    ///
    /// `params` is cleared and then receives the parameters bound along the
    /// matching branch. Pass `None` as the method for request methods
    /// outside the recognized set; such lookups never return
    /// [`Lookup::Found`].
    pub fn find(
        &self,
        method: impl Into<Option<Method>>,
        path: &str,
        params: &mut ParamList,
    ) -> Lookup<'_, T> {
        params.clear();
        self.walk(NodeId::ROOT, path, method.into(), params)
    }

    /// Convenience wrapper over [`find`](Self::find) for an [`http::Method`].
    pub fn find_http(
        &self,
        method: &http::Method,
        path: &str,
        params: &mut ParamList,
    ) -> Lookup<'_, T> {
        self.find(Method::from_http(method), path, params)
    }

    fn walk(
        &self,
        id: NodeId,
        search: &str,
        method: Option<Method>,
        params: &mut ParamList,
    ) -> Lookup<'_, T> {
        let node = self.tree.node(id);

        let rest = match node.kind() {
            NodeKind::Static => match search.strip_prefix(node.prefix()) {
                Some(rest) => rest,
                None => return Lookup::NotFound,
            },
            NodeKind::Param => {
                let end = search.find('/').unwrap_or(search.len());
                if end == 0 {
                    return Lookup::NotFound;
                }
                params.push(node.param_name().unwrap_or_default(), &search[..end]);
                &search[end..]
            }
            NodeKind::CatchAll => {
                params.push(CATCH_ALL_PARAM, search);
                return Self::resolve(node, method);
            }
        };

        if rest.is_empty() {
            let outcome = Self::resolve(node, method);
            if outcome.is_found() {
                return outcome;
            }
            // A catch-all may match an empty remainder.
            return match self.tree.catch_all_child(id) {
                Some(child) => self.try_branch(child, rest, method, params, outcome),
                None => outcome,
            };
        }

        let candidates = [
            rest.chars().next().and_then(|c| self.tree.static_child(id, c)),
            self.tree.param_child(id),
            self.tree.catch_all_child(id),
        ];

        let mut best = Lookup::NotFound;
        for child in candidates.into_iter().flatten() {
            best = self.try_branch(child, rest, method, params, best);
            if best.is_found() {
                break;
            }
        }
        best
    }

    /// Walks one branch, keeping its params only when it matches. Returns
    /// the better of the branch outcome and `best`.
    fn try_branch<'a>(
        &'a self,
        child: NodeId,
        search: &str,
        method: Option<Method>,
        params: &mut ParamList,
        best: Lookup<'a, T>,
    ) -> Lookup<'a, T> {
        let mark = params.len();
        let outcome = self.walk(child, search, method, params);
        if outcome.is_found() {
            return outcome;
        }
        params.truncate(mark);
        match (best, outcome) {
            (Lookup::NotFound, other) => other,
            (kept, _) => kept,
        }
    }

    fn resolve(node: &Node<T>, method: Option<Method>) -> Lookup<'_, T> {
        let handlers = node.handlers();
        if handlers.is_empty() {
            return Lookup::NotFound;
        }
        match method.and_then(|m| handlers.get(m)) {
            Some(value) => Lookup::Found(value),
            None => Lookup::MethodNotAllowed(handlers.methods()),
        }
    }

    /// Number of registered (method, pattern) pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.route_count
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.route_count == 0
    }

    /// Largest number of parameters bound by any registered pattern.
    #[must_use]
    pub const fn max_params(&self) -> usize {
        self.max_params
    }

    /// Number of nodes in the tree, including the root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.tree.len()
    }

    /// Returns a node of the tree for inspection.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this router.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node<T> {
        self.tree.node(id)
    }

    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> &Node<T> {
        self.tree.node(NodeId::ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found<'a>(router: &'a Router<&'static str>, method: Method, path: &str) -> Option<&'a str> {
        let mut params = ParamList::new();
        router.find(method, path, &mut params).value().copied()
    }

    #[test]
    fn test_router_new() {
        let router: Router<()> = Router::new();
        assert!(router.is_empty());
        assert_eq!(router.len(), 0);
        assert_eq!(router.node_count(), 1);
        assert_eq!(router.root().prefix(), "");
    }

    #[test]
    fn test_router_default() {
        let router: Router<()> = Router::default();
        assert!(router.is_empty());
    }

    #[test]
    fn test_router_match_static() {
        let mut router = Router::new();
        router.add(Method::Get, "/ping", "ping").unwrap();
        router.add(Method::Get, "/", "index").unwrap();

        assert_eq!(found(&router, Method::Get, "/ping"), Some("ping"));
        assert_eq!(found(&router, Method::Get, "/"), Some("index"));
        assert_eq!(found(&router, Method::Get, "/pingx"), None);
        assert_eq!(found(&router, Method::Get, "/pin"), None);
    }

    #[test]
    fn test_router_match_param() {
        let mut router = Router::new();
        router.add(Method::Get, "/users/:id", "get_user").unwrap();

        let mut params = ParamList::new();
        let lookup = router.find(Method::Get, "/users/123", &mut params);
        assert_eq!(lookup, Lookup::Found(&"get_user"));
        assert_eq!(params.get("id"), Some("123"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_router_params_in_path_order() {
        let mut router = Router::new();
        router.add(Method::Get, "/a/:b/c/:d", "h").unwrap();

        let mut params = ParamList::new();
        assert!(router.find(Method::Get, "/a/1/c/2", &mut params).is_found());
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("b", "1"), ("d", "2")]);
    }

    #[test]
    fn test_router_match_catch_all() {
        let mut router = Router::new();
        router.add(Method::Get, "/files/*", "files").unwrap();

        let mut params = ParamList::new();
        assert!(router.find(Method::Get, "/files/a/b/c.txt", &mut params).is_found());
        assert_eq!(params.get(CATCH_ALL_PARAM), Some("a/b/c.txt"));

        assert!(router.find(Method::Get, "/files/", &mut params).is_found());
        assert_eq!(params.get(CATCH_ALL_PARAM), Some(""));

        assert_eq!(found(&router, Method::Get, "/files"), None);
    }

    #[test]
    fn test_router_method_not_allowed() {
        let mut router = Router::new();
        router.add(Method::Get, "/ping", "ping").unwrap();
        router.add(Method::Put, "/ping", "put_ping").unwrap();

        let mut params = ParamList::new();
        let lookup = router.find(Method::Post, "/ping", &mut params);
        assert_eq!(lookup.status(), Status::MethodNotAllowed);
        match lookup {
            Lookup::MethodNotAllowed(allowed) => {
                assert_eq!(allowed.to_header_value(), "GET, PUT");
            }
            other => panic!("unexpected lookup: {other:?}"),
        }
    }

    #[test]
    fn test_router_unknown_method() {
        let mut router = Router::new();
        router.add(Method::Get, "/ping", "ping").unwrap();

        let purge = http::Method::from_bytes(b"PURGE").unwrap();
        let mut params = ParamList::new();
        assert_eq!(
            router.find_http(&purge, "/ping", &mut params).status(),
            Status::MethodNotAllowed
        );
        assert_eq!(
            router.find_http(&purge, "/nope", &mut params).status(),
            Status::NotFound
        );
    }

    #[test]
    fn test_router_not_found() {
        let mut router = Router::new();
        router.add(Method::Get, "/users", "users").unwrap();

        let mut params = ParamList::new();
        assert_eq!(
            router.find(Method::Get, "/posts", &mut params).status(),
            Status::NotFound
        );
        assert_eq!(
            router.find(Method::Get, "", &mut params).status(),
            Status::NotFound
        );
    }

    #[test]
    fn test_router_empty_router() {
        let router: Router<()> = Router::new();
        let mut params = ParamList::new();
        assert_eq!(router.find(Method::Get, "/", &mut params), Lookup::NotFound);
    }

    #[test]
    fn test_router_intermediate_node_has_no_handler() {
        let mut router = Router::new();
        router.add(Method::Get, "/users/:id/posts", "posts").unwrap();

        assert_eq!(found(&router, Method::Get, "/users/"), None);
        assert_eq!(found(&router, Method::Get, "/users/1"), None);
        assert_eq!(found(&router, Method::Get, "/users/1/posts"), Some("posts"));

        let mut params = ParamList::new();
        assert_eq!(
            router.find(Method::Get, "/users/1", &mut params).status(),
            Status::NotFound
        );
    }

    #[test]
    fn test_router_split_keeps_routes_disjoint() {
        let mut router = Router::new();
        router.add(Method::Get, "/users/a/b", "ab").unwrap();
        router.add(Method::Get, "/users", "users").unwrap();
        router.add(Method::Get, "/users/a/c", "ac").unwrap();

        assert_eq!(found(&router, Method::Get, "/users/a/b"), Some("ab"));
        assert_eq!(found(&router, Method::Get, "/users"), Some("users"));
        assert_eq!(found(&router, Method::Get, "/users/a/c"), Some("ac"));
        assert_eq!(found(&router, Method::Get, "/users/a/"), None);
        assert_eq!(router.len(), 3);
    }

    #[test]
    fn test_router_overwrite() {
        let mut router = Router::new();
        router.add(Method::Get, "/ping", "first").unwrap();
        router.add(Method::Get, "/ping", "second").unwrap();

        assert_eq!(found(&router, Method::Get, "/ping"), Some("second"));
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn test_router_static_vs_param_priority() {
        let mut router = Router::new();
        router.add(Method::Get, "/users/:id", "by_id").unwrap();
        router.add(Method::Get, "/users/me", "me").unwrap();

        assert_eq!(found(&router, Method::Get, "/users/me"), Some("me"));
        assert_eq!(found(&router, Method::Get, "/users/mel"), Some("by_id"));
        assert_eq!(found(&router, Method::Get, "/users/42"), Some("by_id"));
    }

    #[test]
    fn test_router_param_vs_catch_all_priority() {
        let mut router = Router::new();
        router.add(Method::Get, "/static/:file", "file").unwrap();
        router.add(Method::Get, "/static/*", "tree").unwrap();

        assert_eq!(found(&router, Method::Get, "/static/app.js"), Some("file"));
        assert_eq!(found(&router, Method::Get, "/static/js/app.js"), Some("tree"));
    }

    #[test]
    fn test_router_backtracking_drops_params() {
        let mut router = Router::new();
        router.add(Method::Get, "/:org/settings", "settings").unwrap();
        router.add(Method::Get, "/*", "fallback").unwrap();

        let mut params = ParamList::new();
        let lookup = router.find(Method::Get, "/acme/billing", &mut params);
        assert_eq!(lookup, Lookup::Found(&"fallback"));
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("org"), None);
        assert_eq!(params.get(CATCH_ALL_PARAM), Some("acme/billing"));
    }

    #[test]
    fn test_router_method_not_allowed_outranks_not_found() {
        let mut router = Router::new();
        router.add(Method::Post, "/items/new", "create").unwrap();
        router.add(Method::Get, "/items/:id", "show").unwrap();

        let mut params = ParamList::new();
        // Static branch yields 405, param branch yields a match for GET.
        assert_eq!(found(&router, Method::Get, "/items/new"), Some("show"));
        // For DELETE both branches miss; the 405 is kept.
        let lookup = router.find(Method::Delete, "/items/new", &mut params);
        assert_eq!(lookup.status(), Status::MethodNotAllowed);
        assert!(params.is_empty());
    }

    #[test]
    fn test_router_empty_param_segment() {
        let mut router = Router::new();
        router.add(Method::Get, "/users/:id", "user").unwrap();
        assert_eq!(found(&router, Method::Get, "/users/"), None);
        assert_eq!(found(&router, Method::Get, "/users//x"), None);
    }

    #[test]
    fn test_router_trailing_slash_is_distinct() {
        let mut router = Router::new();
        router.add(Method::Get, "/users", "users").unwrap();
        assert_eq!(found(&router, Method::Get, "/users/"), None);

        router.add(Method::Get, "/users/", "users_slash").unwrap();
        assert_eq!(found(&router, Method::Get, "/users/"), Some("users_slash"));
        assert_eq!(found(&router, Method::Get, "/users"), Some("users"));
    }

    #[test]
    fn test_router_rejects_malformed_patterns() {
        let mut router = Router::new();
        assert!(matches!(
            router.add(Method::Get, "users", "x"),
            Err(RouteError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            router.add(Method::Get, "/users/:", "x"),
            Err(RouteError::EmptyParamName { .. })
        ));
        assert!(matches!(
            router.add(Method::Get, "/a/*/b", "x"),
            Err(RouteError::CatchAllNotLast(_))
        ));
        assert!(router.is_empty());
    }

    #[test]
    fn test_router_rejects_conflicting_param_names() {
        let mut router = Router::new();
        router.add(Method::Get, "/users/:id", "x").unwrap();
        let err = router.add(Method::Get, "/users/:name/posts", "y").unwrap_err();
        assert_eq!(
            err,
            RouteError::ConflictingParam {
                pattern: "/users/:name/posts".to_string(),
                existing: "id".to_string(),
                new: "name".to_string(),
            }
        );
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn test_router_max_params() {
        let mut router = Router::new();
        router.add(Method::Get, "/a/:b", ()).unwrap();
        assert_eq!(router.max_params(), 1);
        router.add(Method::Get, "/x/:y/z/:w/*", ()).unwrap();
        assert_eq!(router.max_params(), 3);
        router.add(Method::Get, "/plain", ()).unwrap();
        assert_eq!(router.max_params(), 3);
    }

    #[test]
    fn test_router_find_clears_stale_params() {
        let mut router = Router::new();
        router.add(Method::Get, "/a/:x/:y", "two").unwrap();
        router.add(Method::Get, "/b/:x", "one").unwrap();

        let mut params = ParamList::new();
        router.find(Method::Get, "/a/1/2", &mut params);
        assert_eq!(params.len(), 2);

        router.find(Method::Get, "/b/3", &mut params);
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("x"), Some("3"));
        assert_eq!(params.get("y"), None);
    }

    #[test]
    fn test_router_multibyte_paths() {
        let mut router = Router::new();
        router.add(Method::Get, "/café", "cafe").unwrap();
        router.add(Method::Get, "/cafè", "cafe_grave").unwrap();
        router.add(Method::Get, "/tag/:name", "tag").unwrap();

        assert_eq!(found(&router, Method::Get, "/café"), Some("cafe"));
        assert_eq!(found(&router, Method::Get, "/cafè"), Some("cafe_grave"));

        let mut params = ParamList::new();
        router.find(Method::Get, "/tag/日本", &mut params);
        assert_eq!(params.get("name"), Some("日本"));
    }

    #[test]
    fn test_router_root_param() {
        let mut router = Router::new();
        router.add(Method::Get, "/:x", "x").unwrap();
        router.add(Method::Get, "/health", "health").unwrap();

        let mut params = ParamList::new();
        assert_eq!(router.find(Method::Get, "/value", &mut params), Lookup::Found(&"x"));
        assert_eq!(params.get("x"), Some("value"));
        assert_eq!(found(&router, Method::Get, "/health"), Some("health"));
    }
}
