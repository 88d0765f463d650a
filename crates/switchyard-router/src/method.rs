//! HTTP method slots for the route table.
//!
//! Routing only recognizes a closed set of nine methods. Each one maps to a
//! fixed slot in a [`MethodTable`], so resolving a handler for a matched node
//! is a single array index rather than a map lookup.

use std::fmt;
use std::str::FromStr;

use crate::error::RouteError;

/// Number of recognized HTTP methods.
pub const METHOD_COUNT: usize = 9;

/// A recognized HTTP method.
///
/// # Example
///
/// ```rust
/// use switchyard_router::Method;
///
/// let method: Method = "GET".parse().unwrap();
/// assert_eq!(method, Method::Get);
/// assert_eq!(method.as_str(), "GET");
/// assert_eq!(Method::from_http(&http::Method::PATCH), Some(Method::Patch));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    /// CONNECT
    Connect,
    /// DELETE
    Delete,
    /// GET
    Get,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
    /// PATCH
    Patch,
    /// POST
    Post,
    /// PUT
    Put,
    /// TRACE
    Trace,
}

impl Method {
    /// All recognized methods, in slot order.
    pub const ALL: [Method; METHOD_COUNT] = [
        Method::Connect,
        Method::Delete,
        Method::Get,
        Method::Head,
        Method::Options,
        Method::Patch,
        Method::Post,
        Method::Put,
        Method::Trace,
    ];

    /// Returns the slot index of this method in a [`MethodTable`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the canonical upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Delete => "DELETE",
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Trace => "TRACE",
        }
    }

    /// Converts an [`http::Method`], returning `None` for extension methods.
    #[must_use]
    pub fn from_http(method: &http::Method) -> Option<Self> {
        match *method {
            http::Method::CONNECT => Some(Self::Connect),
            http::Method::DELETE => Some(Self::Delete),
            http::Method::GET => Some(Self::Get),
            http::Method::HEAD => Some(Self::Head),
            http::Method::OPTIONS => Some(Self::Options),
            http::Method::PATCH => Some(Self::Patch),
            http::Method::POST => Some(Self::Post),
            http::Method::PUT => Some(Self::Put),
            http::Method::TRACE => Some(Self::Trace),
            _ => None,
        }
    }

    /// Converts into the equivalent [`http::Method`].
    #[must_use]
    pub fn to_http(self) -> http::Method {
        match self {
            Self::Connect => http::Method::CONNECT,
            Self::Delete => http::Method::DELETE,
            Self::Get => http::Method::GET,
            Self::Head => http::Method::HEAD,
            Self::Options => http::Method::OPTIONS,
            Self::Patch => http::Method::PATCH,
            Self::Post => http::Method::POST,
            Self::Put => http::Method::PUT,
            Self::Trace => http::Method::TRACE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| RouteError::UnsupportedMethod(s.to_string()))
    }
}

impl TryFrom<&http::Method> for Method {
    type Error = RouteError;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        Self::from_http(method).ok_or_else(|| RouteError::UnsupportedMethod(method.to_string()))
    }
}

/// A fixed-size table holding at most one value per [`Method`].
#[derive(Debug, Clone)]
pub struct MethodTable<T> {
    slots: [Option<T>; METHOD_COUNT],
}

impl<T> Default for MethodTable<T> {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }
}

impl<T> MethodTable<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` for `method`, returning the value it replaced.
    pub fn insert(&mut self, method: Method, value: T) -> Option<T> {
        self.slots[method.index()].replace(value)
    }

    /// Returns the value registered for `method`.
    #[must_use]
    pub fn get(&self, method: Method) -> Option<&T> {
        self.slots[method.index()].as_ref()
    }

    /// Returns true if no method has a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Returns the set of methods that have a value.
    #[must_use]
    pub fn methods(&self) -> MethodSet {
        Method::ALL
            .into_iter()
            .filter(|m| self.slots[m.index()].is_some())
            .collect()
    }
}

/// A compact set of [`Method`]s, used to report what a path allows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MethodSet(u16);

impl MethodSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Adds a method to the set.
    pub fn insert(&mut self, method: Method) {
        self.0 |= 1 << method.index();
    }

    /// Returns true if the set contains `method`.
    #[must_use]
    pub const fn contains(self, method: Method) -> bool {
        self.0 & (1 << method.index()) != 0
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the contained methods in slot order.
    pub fn iter(self) -> impl Iterator<Item = Method> {
        Method::ALL.into_iter().filter(move |m| self.contains(*m))
    }

    /// Renders the set as an `Allow` header value, e.g. `GET, POST`.
    #[must_use]
    pub fn to_header_value(self) -> String {
        self.iter().map(Method::as_str).collect::<Vec<_>>().join(", ")
    }
}

impl FromIterator<Method> for MethodSet {
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        let mut set = Self::new();
        for method in iter {
            set.insert(method);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_index_is_distinct() {
        let mut seen = [false; METHOD_COUNT];
        for method in Method::ALL {
            assert!(!seen[method.index()]);
            seen[method.index()] = true;
        }
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("DELETE".parse::<Method>().unwrap(), Method::Delete);
        assert!("get".parse::<Method>().is_err());
        assert!("PURGE".parse::<Method>().is_err());
    }

    #[test]
    fn test_method_http_round_trip() {
        for method in Method::ALL {
            assert_eq!(Method::from_http(&method.to_http()), Some(method));
        }
        let purge = http::Method::from_bytes(b"PURGE").unwrap();
        assert_eq!(Method::from_http(&purge), None);
        assert!(Method::try_from(&purge).is_err());
    }

    #[test]
    fn test_method_table_insert_overwrites() {
        let mut table = MethodTable::new();
        assert!(table.is_empty());
        assert_eq!(table.insert(Method::Get, "first"), None);
        assert_eq!(table.insert(Method::Get, "second"), Some("first"));
        assert_eq!(table.get(Method::Get), Some(&"second"));
        assert_eq!(table.get(Method::Post), None);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_method_table_methods() {
        let mut table = MethodTable::new();
        table.insert(Method::Post, 1);
        table.insert(Method::Get, 2);

        let set = table.methods();
        assert!(set.contains(Method::Get));
        assert!(set.contains(Method::Post));
        assert!(!set.contains(Method::Put));
        assert_eq!(set.to_header_value(), "GET, POST");
    }

    #[test]
    fn test_method_set_empty() {
        let set = MethodSet::new();
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
        assert_eq!(set.to_header_value(), "");
    }
}
