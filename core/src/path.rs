//! Request path construction.
//!
//! Segments are joined with `/`. Absent segments are skipped, nested lists are
//! flattened in order, and any `/` already present inside a token is treated
//! as a separator, so joining an already-joined path yields it unchanged.
//! A non-empty result always starts with exactly one `/` and never ends with
//! one.
//!
//! Caller-supplied identifiers (index, type, document id, alias and template
//! names) go through [`escaped`] first, which percent-encodes every byte that
//! would otherwise be read as URL syntax, `/` included. Commas and `*` are
//! left alone so index lists and wildcards keep working.

use std::fmt::Display;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Bytes encoded inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// One piece of a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Absent,
    Token(String),
    List(Vec<Segment>),
}

impl From<&str> for Segment {
    fn from(token: &str) -> Self {
        Segment::Token(token.to_string())
    }
}

impl From<String> for Segment {
    fn from(token: String) -> Self {
        Segment::Token(token)
    }
}

impl From<&String> for Segment {
    fn from(token: &String) -> Self {
        Segment::Token(token.clone())
    }
}

impl<T: Into<Segment>> From<Option<T>> for Segment {
    fn from(segment: Option<T>) -> Self {
        segment.map_or(Segment::Absent, Into::into)
    }
}

impl<T: Into<Segment>> From<Vec<T>> for Segment {
    fn from(items: Vec<T>) -> Self {
        Segment::List(items.into_iter().map(Into::into).collect())
    }
}

/// A single identifier segment, percent-encoded so it can never split into
/// several segments or leak into the query string.
pub fn escaped(token: impl Display) -> Segment {
    Segment::Token(utf8_percent_encode(&token.to_string(), SEGMENT).to_string())
}

/// Join path segments into a canonical request path.
pub fn join<I>(segments: I) -> String
where
    I: IntoIterator,
    I::Item: Into<Segment>,
{
    let mut parts = Vec::new();
    for segment in segments {
        flatten(segment.into(), &mut parts);
    }
    if parts.is_empty() {
        return String::new();
    }
    let mut path = String::new();
    for part in parts {
        path.push('/');
        path.push_str(&part);
    }
    path
}

fn flatten(segment: Segment, parts: &mut Vec<String>) {
    match segment {
        Segment::Absent => {}
        Segment::Token(token) => parts.extend(
            token
                .split('/')
                .filter(|piece| !piece.is_empty())
                .map(str::to_string),
        ),
        Segment::List(items) => {
            for item in items {
                flatten(item, parts);
            }
        }
    }
}

/// Build a path from heterogeneous segments: `path!(index, "_doc", id)`.
#[macro_export]
macro_rules! path {
    ($($segment:expr),+ $(,)?) => {
        $crate::path::join([$($crate::path::Segment::from($segment)),+])
    };
}
