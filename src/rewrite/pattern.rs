//! Wildcard path patterns.
//!
//! # Responsibilities
//! - Parse a pattern such as `/users/*/orders/*` into segments
//! - Match a request path segment by segment
//! - Capture wildcard segments left to right
//!
//! # Design Decisions
//! - `*` matches exactly one non-empty segment, never a run of segments
//! - Literal segments compare byte-for-byte (case-sensitive)
//! - Malformed patterns are rejected at parse time, never at match time

use std::fmt;
use std::str::FromStr;

/// Wildcard token inside a pattern.
pub const WILDCARD: &str = "*";

/// Error returned when a pattern cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("pattern must start with '/'")]
    MissingLeadingSlash,

    #[error("empty segment at position {position}")]
    EmptySegment { position: usize },

    #[error("segment '{segment}' mixes '*' with literal text; a wildcard must be a whole segment")]
    PartialWildcard { segment: String },
}

/// A single pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Wildcard,
}

/// A compiled wildcard pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    segments: Vec<Segment>,
    wildcards: usize,
}

impl Pattern {
    /// Compile a pattern.
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        if source.is_empty() {
            return Err(PatternError::Empty);
        }
        let rest = source
            .strip_prefix('/')
            .ok_or(PatternError::MissingLeadingSlash)?;

        let parts: Vec<&str> = rest.split('/').collect();
        let last = parts.len() - 1;
        let mut segments = Vec::with_capacity(parts.len());
        let mut wildcards = 0;

        for (position, part) in parts.into_iter().enumerate() {
            if part == WILDCARD {
                wildcards += 1;
                segments.push(Segment::Wildcard);
            } else if part.contains('*') {
                return Err(PatternError::PartialWildcard {
                    segment: part.to_string(),
                });
            } else if part.is_empty() && position != last {
                // "/" alone and a trailing slash are fine, "//" is not.
                return Err(PatternError::EmptySegment { position });
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        Ok(Self {
            source: source.to_string(),
            segments,
            wildcards,
        })
    }

    /// The pattern as written in configuration.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of wildcard segments, i.e. captures produced by a match.
    pub fn wildcard_count(&self) -> usize {
        self.wildcards
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Match `path` and return the captured wildcard segments, in order.
    ///
    /// Returns `None` when the segment count differs, a literal segment
    /// differs, or a wildcard would capture an empty segment.
    pub fn captures<'p>(&self, path: &'p str) -> Option<Vec<&'p str>> {
        let rest = path.strip_prefix('/')?;
        let mut captures = Vec::with_capacity(self.wildcards);
        let mut parts = rest.split('/');

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(literal) => {
                    if literal != part {
                        return None;
                    }
                }
                Segment::Wildcard => {
                    if part.is_empty() {
                        return None;
                    }
                    captures.push(part);
                }
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(captures)
    }

    /// Returns true if `path` matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.captures(path).is_some()
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
