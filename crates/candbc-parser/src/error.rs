//! Parse error with positional information.

use std::fmt::{self, Display};
use std::path::PathBuf;

use crate::source::Source;

/// Position of an error within a source: optional file path plus the
/// 1-based line and column of the cursor when the error surfaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    /// File path of the source, when it came from a file.
    pub path: Option<PathBuf>,
    /// 1-based line (0 for empty content).
    pub line: usize,
    /// 1-based column with tabs expanded to multiples of four.
    pub column: usize,
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{}", path.display())?;
        }
        write!(f, "[{}, {}]", self.line, self.column)
    }
}

/// A DBC parse failure.
///
/// The message is rendered once, at construction, from a `%N` template:
/// `%1`, `%2`, ... substitute the 1-based argument; a `%` followed by
/// anything else emits that character (so `%%` is a literal `%`); an
/// out-of-range index emits `<unknown>`.
///
/// The location is attached later, by whoever holds the source; the
/// first attachment wins, so the position closest to the failure is the
/// one reported.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{}{}", fmt_location(.location), .message)]
pub struct DbcError {
    /// Where the error surfaced, once a source has been attached.
    pub location: Option<Location>,
    /// Rendered message.
    pub message: String,
}

fn fmt_location(location: &Option<Location>) -> String {
    match location {
        Some(location) => format!("{location}: "),
        None => String::new(),
    }
}

impl DbcError {
    /// Error with a plain message and no location.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            location: None,
            message: reason.into(),
        }
    }

    /// Error with a `%N` template message and no location.
    pub fn with_args(reason: &str, args: &[&dyn Display]) -> Self {
        Self {
            location: None,
            message: render_template(reason, args),
        }
    }

    /// Attach the position of a source's cursor, unless a location is
    /// already present.
    pub fn attach_source(&mut self, source: &Source) {
        if self.location.is_none() {
            self.location = Some(source.location());
        }
    }

    /// Consuming variant of [`attach_source`](Self::attach_source).
    pub fn with_source(mut self, source: &Source) -> Self {
        self.attach_source(source);
        self
    }
}

fn render_template(reason: &str, args: &[&dyn Display]) -> String {
    let mut message = String::with_capacity(reason.len());
    let mut chars = reason.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            message.push(c);
            continue;
        }
        let mut index = 0usize;
        let mut digits = false;
        let mut trailer = None;
        for c in chars.by_ref() {
            if let Some(digit) = c.to_digit(10) {
                index = index * 10 + digit as usize;
                digits = true;
            } else {
                trailer = Some(c);
                break;
            }
        }
        if digits {
            match index.checked_sub(1).and_then(|n| args.get(n)) {
                Some(arg) => message.push_str(&arg.to_string()),
                None => message.push_str("<unknown>"),
            }
        }
        if let Some(c) = trailer {
            message.push(c);
        }
    }
    message
}
