//! Method name compilation.
//!
//! # Responsibilities
//! - Recognise handler names: `<Verb><Segments>(By<Param>)?`
//! - Recognise mount names: `Mount<Segments>`
//! - Produce the HTTP verb and path pattern (or mount prefix) for a name
//!
//! # Design Decisions
//! - Pure string → struct functions, no hidden state
//! - Names outside the grammar are rejected with `None`, never an error,
//!   so helper members can live next to routed ones
//! - The two grammars are disjoint: `Mount` is not a verb

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::routing::segment::{segments, strip_root};

static HANDLER_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(Get|Put|Post|Patch|Delete|Trace|Options|Connect|Head|Handle)",
        r"([a-zA-Z][a-zA-Z0-9]*?)(?:By([a-zA-Z][a-zA-Z0-9]*))?$",
    ))
    .expect("handler name grammar is a valid regex")
});

static MOUNT_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Mount([a-zA-Z][a-zA-Z0-9]*)$").expect("mount name grammar is a valid regex")
});

/// The verb prefix of a handler name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Put,
    Post,
    Patch,
    Delete,
    Trace,
    Options,
    Connect,
    Head,
    /// Matches any HTTP method.
    Handle,
}

impl Verb {
    /// Every verb with a concrete HTTP method, in slot order.
    pub const METHODS: [Verb; 9] = [
        Verb::Get,
        Verb::Put,
        Verb::Post,
        Verb::Patch,
        Verb::Delete,
        Verb::Trace,
        Verb::Options,
        Verb::Connect,
        Verb::Head,
    ];

    fn from_prefix(prefix: &str) -> Option<Self> {
        Some(match prefix {
            "Get" => Verb::Get,
            "Put" => Verb::Put,
            "Post" => Verb::Post,
            "Patch" => Verb::Patch,
            "Delete" => Verb::Delete,
            "Trace" => Verb::Trace,
            "Options" => Verb::Options,
            "Connect" => Verb::Connect,
            "Head" => Verb::Head,
            "Handle" => Verb::Handle,
            _ => return None,
        })
    }

    /// Upper-case method name; `HANDLE` for [`Verb::Handle`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Put => "PUT",
            Verb::Post => "POST",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
            Verb::Trace => "TRACE",
            Verb::Options => "OPTIONS",
            Verb::Connect => "CONNECT",
            Verb::Head => "HEAD",
            Verb::Handle => "HANDLE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One segment of a path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Literal(String),
    Param(String),
}

/// A path pattern such as `/other/{id}`.
///
/// Holds at most one parameter segment, always the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Name of the trailing parameter, if any.
    pub fn param(&self) -> Option<&str> {
        match self.segments.last() {
            Some(Segment::Param(name)) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => write!(f, "/{}", s)?,
                Segment::Param(p) => write!(f, "/{{{}}}", p)?,
            }
        }
        Ok(())
    }
}

fn literal_pattern(spec: &str) -> PathPattern {
    PathPattern {
        segments: segments(strip_root(spec))
            .into_iter()
            .map(Segment::Literal)
            .collect(),
    }
}

/// Compiles a handler name into its verb and path pattern.
///
/// ```
/// use wish::routing::compiler::{parse_handler, Verb};
///
/// let (verb, pattern) = parse_handler("GetOtherByName").unwrap();
/// assert_eq!(verb, Verb::Get);
/// assert_eq!(pattern.to_string(), "/other/{name}");
/// ```
pub fn parse_handler(name: &str) -> Option<(Verb, PathPattern)> {
    let caps = HANDLER_RX.captures(name)?;
    let verb = Verb::from_prefix(caps.get(1)?.as_str())?;
    let mut pattern = literal_pattern(caps.get(2)?.as_str());

    if let Some(param) = caps.get(3) {
        pattern
            .segments
            .push(Segment::Param(param.as_str().to_ascii_lowercase()));
    }

    Some((verb, pattern))
}

/// Compiles a mount name into its path prefix.
///
/// Mounts never take a parameter, so `MountWebByParam` is `/web/by/param`.
pub fn parse_mount(name: &str) -> Option<PathPattern> {
    let caps = MOUNT_RX.captures(name)?;
    Some(literal_pattern(caps.get(1)?.as_str()))
}
