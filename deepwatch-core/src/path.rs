//! Access paths
//!
//! Dotted paths such as `bar[0].zoo.cat` address a position inside a view
//! or a monitor. Purely numeric dotted segments (`bar.0.zoo`) are read as
//! indices.

use crate::error::{Result, WatchError};
use std::fmt;
use std::str::FromStr;

/// One step of an [`AccessPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key
    Key(String),

    /// List position
    Index(usize),
}

impl PathSegment {
    fn from_key(key: String) -> Self {
        if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = key.parse() {
                return PathSegment::Index(index);
            }
        }
        PathSegment::Key(key)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// A sequence of keys and indices
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AccessPath {
    segments: Vec<PathSegment>,
}

impl AccessPath {
    /// The empty path, addressing the root
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extend with an object key
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        AccessPath { segments }
    }

    /// Extend with a list index
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        AccessPath { segments }
    }
}

impl FromStr for AccessPath {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(WatchError::invalid_path(s, "empty path"));
        }

        let mut segments = Vec::new();
        let mut current = String::new();
        let mut after_bracket = false;
        let mut chars = s.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::from_key(std::mem::take(&mut current)));
                    } else if !after_bracket {
                        return Err(WatchError::invalid_path(s, "empty segment"));
                    }
                    if chars.peek().is_none() {
                        return Err(WatchError::invalid_path(s, "trailing `.`"));
                    }
                    after_bracket = false;
                }
                '[' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::from_key(std::mem::take(&mut current)));
                    }
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(d) => digits.push(d),
                            None => return Err(WatchError::invalid_path(s, "unclosed `[`")),
                        }
                    }
                    let index = digits.trim().parse::<usize>().map_err(|_| {
                        WatchError::invalid_path(s, format!("`{}` is not a list index", digits))
                    })?;
                    segments.push(PathSegment::Index(index));
                    after_bracket = true;
                }
                ']' => return Err(WatchError::invalid_path(s, "unexpected `]`")),
                c => {
                    if after_bracket {
                        return Err(WatchError::invalid_path(s, "expected `.` or `[` after `]`"));
                    }
                    current.push(c);
                }
            }
        }

        if !current.is_empty() {
            segments.push(PathSegment::from_key(current));
        }

        Ok(AccessPath { segments })
    }
}

impl fmt::Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i > 0 => write!(f, ".{}", key)?,
                segment => write!(f, "{}", segment)?,
            }
        }
        Ok(())
    }
}
