//! Replacement templates with positional capture tokens.

use std::fmt;

use axum::http::uri::PathAndQuery;

/// Error returned when a replacement template cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("replacement must start with '/'")]
    MissingLeadingSlash,

    #[error("replacement contains '{ch}', which cannot appear in a URI path")]
    InvalidChar { ch: char },

    #[error("capture index $0 is invalid; captures are numbered from $1")]
    ZeroIndex,

    #[error("capture index ${index} is too large")]
    IndexOverflow { index: String },

    #[error("replacement references ${index} but the pattern only has {available} wildcard(s)")]
    CaptureOutOfRange { index: usize, available: usize },
}

/// A piece of a compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Literal(String),
    /// 1-based capture index.
    Capture(usize),
}

/// A compiled replacement template, e.g. `/user/$1/order/$2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    pieces: Vec<Piece>,
    max_index: usize,
}

impl Template {
    /// Compile a replacement.
    ///
    /// `$` followed by ASCII digits is a capture token (digits are read
    /// greedily). A `$` not followed by a digit is kept as literal text.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        if !source.starts_with('/') {
            return Err(TemplateError::MissingLeadingSlash);
        }

        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut max_index = 0;
        let mut chars = source.char_indices().peekable();

        while let Some((start, c)) = chars.next() {
            if !is_path_char(c) {
                return Err(TemplateError::InvalidChar { ch: c });
            }
            let has_digit = matches!(chars.peek(), Some((_, d)) if d.is_ascii_digit());
            if c != '$' || !has_digit {
                literal.push(c);
                continue;
            }

            let digits_start = start + 1;
            let mut digits_end = digits_start;
            while let Some(&(i, d)) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                digits_end = i + d.len_utf8();
                chars.next();
            }

            let digits = &source[digits_start..digits_end];
            let index: usize = digits.parse().map_err(|_| TemplateError::IndexOverflow {
                index: digits.to_string(),
            })?;
            if index == 0 {
                return Err(TemplateError::ZeroIndex);
            }

            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(Piece::Capture(index));
            max_index = max_index.max(index);
        }

        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            pieces,
            max_index,
        })
    }

    /// Check that every capture token has a corresponding wildcard.
    pub fn check_captures(&self, available: usize) -> Result<(), TemplateError> {
        if self.max_index > available {
            return Err(TemplateError::CaptureOutOfRange {
                index: self.max_index,
                available,
            });
        }
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Highest capture index referenced, 0 when the template has none.
    pub fn max_index(&self) -> usize {
        self.max_index
    }

    /// Substitute `captures` into the template.
    ///
    /// Callers validate with [`Template::check_captures`] first; a token
    /// without a capture renders as its literal `$N` text.
    pub fn render(&self, captures: &[&str]) -> String {
        let mut out = String::with_capacity(self.source.len() + 16);
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Capture(index) => match captures.get(index - 1) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('$');
                        out.push_str(&index.to_string());
                    }
                },
            }
        }
        out
    }
}

/// True if `c` may appear literally in a URI path.
fn is_path_char(c: char) -> bool {
    match c {
        '?' | '#' => false,
        c if c.is_whitespace() || c.is_control() => false,
        c if c.is_ascii_alphanumeric() || "/-._~$".contains(c) => true,
        c => PathAndQuery::try_from(format!("/{}", c)).is_ok(),
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
