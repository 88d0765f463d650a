//! Path parameter storage.
//!
//! A [`ParamList`] is written during traversal and reused across requests.
//! Slots are never freed: clearing only resets the live length, and a later
//! write into an old slot overwrites its strings in place so their buffers
//! are recycled. Only the first [`ParamList::len`] slots are ever visible.

use smallvec::SmallVec;

/// Parameter name bound by a trailing catch-all (`*`) segment.
pub const CATCH_ALL_PARAM: &str = "*";

/// Maximum number of parameter slots stored inline.
const INLINE_PARAMS: usize = 4;

/// A single extracted path parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParam {
    name: String,
    value: String,
}

impl RouteParam {
    /// Creates a parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The parameter name declared by the route pattern.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The path substring bound to this parameter.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    fn overwrite(&mut self, name: &str, value: &str) {
        self.name.clear();
        self.name.push_str(name);
        self.value.clear();
        self.value.push_str(value);
    }
}

/// Ordered, reusable list of path parameters.
///
/// Parameters appear in extraction order (left to right along the path).
/// Lookup by name is last-write-wins.
///
/// # Example
///
/// ```rust
/// use switchyard_router::ParamList;
///
/// let mut params = ParamList::with_capacity(2);
/// params.push("org", "acme");
/// params.push("id", "7");
/// assert_eq!(params.get("id"), Some("7"));
///
/// params.clear();
/// params.push("id", "8");
/// assert_eq!(params.len(), 1);
/// assert_eq!(params.get("org"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParamList {
    slots: SmallVec<[RouteParam; INLINE_PARAMS]>,
    len: usize,
}

impl ParamList {
    /// Creates an empty list with no preallocated slots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list with `capacity` preallocated slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = SmallVec::with_capacity(capacity);
        slots.resize_with(capacity, RouteParam::default);
        Self { slots, len: 0 }
    }

    /// Appends a parameter, reusing a stale slot when one is available.
    pub fn push(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.slots.get_mut(self.len) {
            slot.overwrite(name, value);
        } else {
            self.slots.push(RouteParam::new(name, value));
        }
        self.len += 1;
    }

    /// Returns the value bound to `name`, preferring the latest write.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.as_slice()
            .iter()
            .rev()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Returns the live parameters.
    #[must_use]
    pub fn as_slice(&self) -> &[RouteParam] {
        &self.slots[..self.len]
    }

    /// Returns an iterator over live `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.as_slice()
            .iter()
            .map(|p| (p.name.as_str(), p.value.as_str()))
    }

    /// Number of live parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no parameter is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots, live or stale.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Grows the slot count to at least `capacity`.
    pub fn reserve_slots(&mut self, capacity: usize) {
        if self.slots.len() < capacity {
            self.slots.resize_with(capacity, RouteParam::default);
        }
    }

    /// Logically truncates to `len` live parameters.
    pub fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    /// Logically clears the list; slot buffers are kept for reuse.
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl PartialEq for ParamList {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for ParamList {}

impl<'a> IntoIterator for &'a ParamList {
    type Item = &'a RouteParam;
    type IntoIter = std::slice::Iter<'a, RouteParam>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for ParamList {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.push(name, value);
        }
        params
    }
}
