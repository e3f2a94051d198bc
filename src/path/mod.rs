//! Dotted path expressions into JSON documents.
//!
//! A path is `segment(.segment)*` where each segment is a field name,
//! optionally followed by one `[N]` array index. A leading `$.` (JSONPath
//! root) is accepted and ignored. Indices above [`MAX_INDEX`] are
//! rejected, since writing through a path pads arrays up to the index.
//!
//! ```text
//! name
//! user.address.city
//! items[2].id
//! $.data.users[0].email
//! ```

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Largest array index a path may name.
pub const MAX_INDEX: usize = 10_000;

/// Errors produced while parsing a path expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Path is empty or only a root marker
    #[error("Empty path expression")]
    Empty,

    /// A segment is empty (e.g. `a..b` or trailing `.`)
    #[error("Empty segment at position {position} in '{path}'")]
    EmptySegment { path: String, position: usize },

    /// A `[...]` suffix is malformed
    #[error("Invalid index in segment '{segment}': {reason}")]
    InvalidIndex { segment: String, reason: String },
}

/// One step of a path: a field name and an optional array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Field name on the enclosing object
    pub name: String,

    /// Array index applied to the field's value, if any
    pub index: Option<usize>,
}

impl Segment {
    /// Creates a plain field segment.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
        }
    }

    /// Creates an indexed field segment.
    pub fn indexed(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index: Some(index),
        }
    }

    /// Parses a single segment such as `items[3]` or `name`.
    fn parse(raw: &str) -> Result<Self, PathError> {
        let Some(open) = raw.find('[') else {
            if raw.contains(']') {
                return Err(PathError::InvalidIndex {
                    segment: raw.to_string(),
                    reason: "unmatched ']'".to_string(),
                });
            }
            return Ok(Segment::field(raw));
        };

        let name = &raw[..open];
        if name.is_empty() {
            return Err(PathError::InvalidIndex {
                segment: raw.to_string(),
                reason: "index without a field name".to_string(),
            });
        }

        let rest = &raw[open + 1..];
        let close = rest.find(']').ok_or_else(|| PathError::InvalidIndex {
            segment: raw.to_string(),
            reason: "missing ']'".to_string(),
        })?;

        if close + 1 != rest.len() {
            return Err(PathError::InvalidIndex {
                segment: raw.to_string(),
                reason: "unexpected text after ']'".to_string(),
            });
        }

        let digits = &rest[..close];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PathError::InvalidIndex {
                segment: raw.to_string(),
                reason: format!("'{}' is not a non-negative integer", digits),
            });
        }

        let index = digits
            .parse::<usize>()
            .ok()
            .filter(|i| *i <= MAX_INDEX)
            .ok_or_else(|| PathError::InvalidIndex {
                segment: raw.to_string(),
                reason: format!("index exceeds the maximum of {}", MAX_INDEX),
            })?;

        Ok(Segment::indexed(name, index))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}[{}]", self.name, i),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    raw: String,
    segments: Vec<Segment>,
}

impl PathExpression {
    /// Parses a path expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use request_composer::path::{PathExpression, Segment};
    ///
    /// let path = PathExpression::parse("data.users[2].email").unwrap();
    /// assert_eq!(path.segments().len(), 3);
    /// assert_eq!(path.segments()[1], Segment::indexed("users", 2));
    /// ```
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let body = raw.strip_prefix("$.").unwrap_or(raw);
        if body.is_empty() || body == "$" {
            return Err(PathError::Empty);
        }

        let segments = body
            .split('.')
            .enumerate()
            .map(|(position, part)| {
                if part.is_empty() {
                    Err(PathError::EmptySegment {
                        path: raw.to_string(),
                        position,
                    })
                } else {
                    Segment::parse(part)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Returns the original text of the expression.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed segments, never empty.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Splits the path into its intermediate segments and the final one.
    pub fn split_leaf(&self) -> (&[Segment], &Segment) {
        let (leaf, parents) = self
            .segments
            .split_last()
            .expect("parsed paths always have at least one segment");
        (parents, leaf)
    }

    /// Reads the value at this path, or `None` when any step is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use request_composer::path::PathExpression;
    /// use serde_json::json;
    ///
    /// let doc = json!({"items": [{"id": 1}, {"id": 2}]});
    /// let path = PathExpression::parse("items[1].id").unwrap();
    /// assert_eq!(path.lookup(&doc), Some(&json!(2)));
    /// ```
    pub fn lookup<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        self.segments.iter().try_fold(doc, |current, segment| {
            let field = current.get(&segment.name)?;
            match segment.index {
                Some(i) => field.get(i),
                None => Some(field),
            }
        })
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
