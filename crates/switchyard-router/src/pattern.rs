//! Route pattern decomposition.
//!
//! A pattern such as `/authors/:name/books/*` is split into the literal,
//! parameter and catch-all pieces that the tree inserts one at a time:
//!
//! ```text
//! "/authors/:name/books/*"
//!   Static("/authors/")  Param("name")  Static("/books/")  CatchAll
//! ```

use crate::error::RouteError;

/// One piece of a decomposed route pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// Literal text matched byte for byte.
    Static(&'a str),
    /// A named parameter matching one path segment.
    Param(&'a str),
    /// Trailing catch-all matching the rest of the path.
    CatchAll,
}

/// Splits `pattern` into segments, rejecting malformed patterns.
pub(crate) fn parse(pattern: &str) -> Result<Vec<Segment<'_>>, RouteError> {
    if !pattern.starts_with('/') {
        return Err(RouteError::MissingLeadingSlash(pattern.to_string()));
    }

    let bytes = pattern.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b':' => {
                if start < i {
                    segments.push(Segment::Static(&pattern[start..i]));
                }
                let end = pattern[i..].find('/').map_or(bytes.len(), |off| i + off);
                if end == i + 1 {
                    return Err(RouteError::EmptyParamName {
                        pattern: pattern.to_string(),
                        position: i,
                    });
                }
                segments.push(Segment::Param(&pattern[i + 1..end]));
                start = end;
                i = end;
            }
            b'*' => {
                if i + 1 != bytes.len() {
                    return Err(RouteError::CatchAllNotLast(pattern.to_string()));
                }
                if start < i {
                    segments.push(Segment::Static(&pattern[start..i]));
                }
                segments.push(Segment::CatchAll);
                return Ok(segments);
            }
            _ => i += 1,
        }
    }

    if start < bytes.len() {
        segments.push(Segment::Static(&pattern[start..]));
    }
    Ok(segments)
}
