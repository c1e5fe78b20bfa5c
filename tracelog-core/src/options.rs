//! Level-tagged log attributes.
//!
//! A [`LogValueOption`] pairs one attribute with the severity it should be
//! emitted at. [`LogValuesOptions`] is an ordered list of them that can be
//! grouped into a [`LogValuesBuilder`](crate::LogValuesBuilder).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity an attribute is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Debug,
    Info,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Error => "error",
        };
        f.write_str(s)
    }
}

/// A single attribute tagged with at most one level.
///
/// Options without a level are ignored when grouped.
#[derive(Debug, Clone, PartialEq)]
pub struct LogValueOption<T> {
    value: T,
    level: Option<Level>,
}

impl<T> LogValueOption<T> {
    /// Wrap an attribute with no level set.
    pub fn new(value: T) -> Self {
        Self { value, level: None }
    }

    /// Tag the attribute for debug output.
    pub fn with_debug(self) -> Self {
        self.with_level(Level::Debug)
    }

    /// Tag the attribute for info output.
    pub fn with_info(self) -> Self {
        self.with_level(Level::Info)
    }

    /// Tag the attribute for error output.
    pub fn with_error(self) -> Self {
        self.with_level(Level::Error)
    }

    /// Tag the attribute with `level`, replacing any previous level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn level(&self) -> Option<Level> {
        self.level
    }

    pub fn into_parts(self) -> (T, Option<Level>) {
        (self.value, self.level)
    }
}

/// Ordered collection of [`LogValueOption`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct LogValuesOptions<T>(Vec<LogValueOption<T>>);

impl<T> LogValuesOptions<T> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an option.
    pub fn add_option(&mut self, option: LogValueOption<T>) -> &mut Self {
        self.0.push(option);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogValueOption<T>> {
        self.0.iter()
    }
}

impl<T> Default for LogValuesOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<LogValueOption<T>> for LogValuesOptions<T> {
    fn from_iter<I: IntoIterator<Item = LogValueOption<T>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T> Extend<LogValueOption<T>> for LogValuesOptions<T> {
    fn extend<I: IntoIterator<Item = LogValueOption<T>>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<T> IntoIterator for LogValuesOptions<T> {
    type Item = LogValueOption<T>;
    type IntoIter = std::vec::IntoIter<LogValueOption<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a LogValuesOptions<T> {
    type Item = &'a LogValueOption<T>;
    type IntoIter = std::slice::Iter<'a, LogValueOption<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
