//! Log payloads and their builder.

use std::error::Error;
use std::sync::Arc;

use crate::options::{Level, LogValuesOptions};

/// Error carried by a [`LogValues`]; shared so snapshots stay cheap to clone.
pub type SharedError = Arc<dyn Error + Send + Sync + 'static>;

/// Immutable log payload handed to an [`ObservabilityLogger`](crate::ObservabilityLogger).
///
/// Only [`LogValuesBuilder::build`] creates one.
#[derive(Debug, Clone)]
pub struct LogValues<T> {
    msg: String,
    err: Option<SharedError>,
    debug_values: Vec<T>,
    info_values: Vec<T>,
    error_values: Vec<T>,
}

impl<T> LogValues<T> {
    pub fn msg(&self) -> &str {
        &self.msg
    }

    pub fn err(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.err.as_deref()
    }

    pub fn debug_values(&self) -> &[T] {
        &self.debug_values
    }

    pub fn info_values(&self) -> &[T] {
        &self.info_values
    }

    pub fn error_values(&self) -> &[T] {
        &self.error_values
    }

    /// Values attached to `level`.
    pub fn values_for(&self, level: Level) -> &[T] {
        match level {
            Level::Debug => &self.debug_values,
            Level::Info => &self.info_values,
            Level::Error => &self.error_values,
        }
    }
}

/// Mutable accumulator for a [`LogValues`].
///
/// Setters mutate in place and return `&mut Self` so calls chain. The
/// builder stays usable after [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct LogValuesBuilder<T> {
    msg: String,
    err: Option<SharedError>,
    debug_values: Vec<T>,
    info_values: Vec<T>,
    error_values: Vec<T>,
}

impl<T> LogValuesBuilder<T> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            msg: String::new(),
            err: None,
            debug_values: Vec::new(),
            info_values: Vec::new(),
            error_values: Vec::new(),
        }
    }

    /// Create a builder with the options grouped by level.
    ///
    /// Options without a level are dropped.
    pub fn from_options(options: LogValuesOptions<T>) -> Self {
        let mut builder = Self::new();
        builder.extend_options(options);
        builder
    }

    pub(crate) fn extend_options(&mut self, options: LogValuesOptions<T>) {
        for option in options {
            let (value, level) = option.into_parts();
            if let Some(level) = level {
                self.with_value(level, value);
            }
        }
    }

    pub fn with_msg(&mut self, msg: impl Into<String>) -> &mut Self {
        self.msg = msg.into();
        self
    }

    pub fn with_err<E>(&mut self, err: E) -> &mut Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.err = Some(Arc::new(err));
        self
    }

    /// Set an already shared error.
    pub fn with_shared_err(&mut self, err: SharedError) -> &mut Self {
        self.err = Some(err);
        self
    }

    pub fn with_debug_value(&mut self, value: T) -> &mut Self {
        self.debug_values.push(value);
        self
    }

    pub fn with_info_value(&mut self, value: T) -> &mut Self {
        self.info_values.push(value);
        self
    }

    pub fn with_error_value(&mut self, value: T) -> &mut Self {
        self.error_values.push(value);
        self
    }

    /// Append `value` to the list for `level`.
    pub fn with_value(&mut self, level: Level, value: T) -> &mut Self {
        match level {
            Level::Debug => self.with_debug_value(value),
            Level::Info => self.with_info_value(value),
            Level::Error => self.with_error_value(value),
        }
    }
}

impl<T: Clone> LogValuesBuilder<T> {
    /// Snapshot the current state.
    pub fn build(&self) -> LogValues<T> {
        LogValues {
            msg: self.msg.clone(),
            err: self.err.clone(),
            debug_values: self.debug_values.clone(),
            info_values: self.info_values.clone(),
            error_values: self.error_values.clone(),
        }
    }
}

impl<T> Default for LogValuesBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::LogValueOption;

    #[derive(Debug, thiserror::Error)]
    #[error("oops")]
    struct Oops;

    #[test]
    fn new_builder_is_empty() {
        let lv = LogValuesBuilder::<String>::new().build();
        assert!(lv.msg().is_empty());
        assert!(lv.err().is_none());
        assert!(lv.debug_values().is_empty());
        assert!(lv.info_values().is_empty());
        assert!(lv.error_values().is_empty());
    }

    #[test]
    fn setters_chain_and_accumulate_in_order() {
        let lv = LogValuesBuilder::new()
            .with_msg("hello")
            .with_info_value("corge")
            .with_info_value("grault")
            .with_debug_value("foo")
            .with_error_value("baz")
            .build();

        assert_eq!(lv.msg(), "hello");
        assert_eq!(lv.info_values(), ["corge", "grault"]);
        assert_eq!(lv.debug_values(), ["foo"]);
        assert_eq!(lv.error_values(), ["baz"]);
    }

    #[test]
    fn with_err_is_last_write_wins() {
        #[derive(Debug, thiserror::Error)]
        #[error("second")]
        struct Second;

        let lv = LogValuesBuilder::<String>::new()
            .with_err(Oops)
            .with_err(Second)
            .build();

        assert_eq!(lv.err().map(ToString::to_string).as_deref(), Some("second"));
    }

    #[test]
    fn build_is_a_snapshot() {
        let mut builder = LogValuesBuilder::new();
        builder.with_msg("first").with_info_value("a");
        let first = builder.build();

        builder.with_msg("second").with_info_value("b");
        let second = builder.build();

        assert_eq!(first.msg(), "first");
        assert_eq!(first.info_values(), ["a"]);
        assert_eq!(second.msg(), "second");
        assert_eq!(second.info_values(), ["a", "b"]);
    }

    #[test]
    fn from_options_groups_by_level() {
        let options: LogValuesOptions<&str> = [
            LogValueOption::new("a").with_debug(),
            LogValueOption::new("b").with_error(),
            LogValueOption::new("c").with_info(),
            LogValueOption::new("d"),
            LogValueOption::new("e").with_debug(),
        ]
        .into_iter()
        .collect();

        let lv = LogValuesBuilder::from_options(options).build();
        assert_eq!(lv.debug_values(), ["a", "e"]);
        assert_eq!(lv.error_values(), ["b"]);
        assert_eq!(lv.info_values(), ["c"]);
    }

    #[test]
    fn shared_error_is_reused() {
        let err: SharedError = Arc::new(Oops);
        let lv = LogValuesBuilder::<String>::new()
            .with_shared_err(Arc::clone(&err))
            .build();

        assert_eq!(Arc::strong_count(&err), 2);
        assert_eq!(lv.err().map(ToString::to_string).as_deref(), Some("oops"));
    }

    #[test]
    fn values_for_selects_list() {
        let lv = LogValuesBuilder::new()
            .with_value(Level::Debug, 1)
            .with_value(Level::Info, 2)
            .with_value(Level::Error, 3)
            .build();

        assert_eq!(lv.values_for(Level::Debug), [1]);
        assert_eq!(lv.values_for(Level::Info), [2]);
        assert_eq!(lv.values_for(Level::Error), [3]);
    }
}
