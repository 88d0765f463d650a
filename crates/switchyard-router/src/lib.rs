//! Compressed prefix tree router for Switchyard.
//!
//! Routes are registered per HTTP method against patterns made of literal
//! text, `:name` parameters that match one path segment, and a trailing `*`
//! that matches the rest of the path. Lookups walk the tree once from the
//! root and write bound parameters into a reusable [`ParamList`].
//!
//! # Example
//!
//! ```rust
//! use switchyard_router::{Method, ParamList, Router, Status};
//!
//! let mut router = Router::new();
//! router.add(Method::Get, "/authors/:name/books/:id", "get_book").unwrap();
//! router.add(Method::Post, "/authors/:name/books", "add_book").unwrap();
//!
//! let mut params = ParamList::with_capacity(router.max_params());
//! let lookup = router.find(Method::Get, "/authors/ursula/books/7", &mut params);
//! assert_eq!(lookup.value(), Some(&"get_book"));
//! assert_eq!(params.get("name"), Some("ursula"));
//!
//! let lookup = router.find(Method::Get, "/authors/ursula/books", &mut params);
//! assert_eq!(lookup.status(), Status::MethodNotAllowed);
//! ```
//!
//! # Architecture
//!
//! Nodes live in an arena and are split as patterns diverge. After
//! registering `/authors/:name/books`, `/authors/:name/books/:id` and
//! `/assets/*` the tree looks like this:
//!
//! ```text
//!               "/a"
//!            ┌───┴────┐
//!       "uthors/"  "ssets/"
//!            │        │
//!         ":name"    "*"
//!            │
//!        "/books"  [POST]
//!            │
//!           "/"
//!            │
//!          ":id"   [GET]
//! ```

#![doc(html_root_url = "https://docs.rs/switchyard-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod method;
mod node;
mod params;
mod pattern;
mod router;

pub use error::RouteError;
pub use method::{Method, MethodSet, MethodTable, METHOD_COUNT};
pub use node::{Node, NodeId, NodeKind};
pub use params::{ParamList, RouteParam, CATCH_ALL_PARAM};
pub use router::{Lookup, Router, Status};
