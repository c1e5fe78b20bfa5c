//! Factory for options and value builders of one attribute type.

use crate::options::{LogValueOption, LogValuesOptions};
use crate::values::LogValuesBuilder;

/// Produces [`LogValueOption`]s, [`LogValuesOptions`] and
/// [`LogValuesBuilder`]s for attribute type `T`.
///
/// A seeded factory (see [`ObservabilityContext::create_log_builder`](crate::ObservabilityContext))
/// places its seed first in all three level lists of every value builder
/// it hands out.
#[derive(Debug, Clone)]
pub struct LogBuilder<T> {
    seed: Option<T>,
}

impl<T> LogBuilder<T> {
    /// Create an unseeded factory.
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Create a factory whose value builders start with `seed` at every level.
    pub fn with_seed(seed: T) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn seed(&self) -> Option<&T> {
        self.seed.as_ref()
    }

    pub fn create_log_value_option(&self, attr: T) -> LogValueOption<T> {
        LogValueOption::new(attr)
    }

    pub fn create_log_values_options(&self) -> LogValuesOptions<T> {
        LogValuesOptions::new()
    }

    pub fn create_log_values_options_with(
        &self,
        options: impl IntoIterator<Item = LogValueOption<T>>,
    ) -> LogValuesOptions<T> {
        options.into_iter().collect()
    }
}

impl<T: Clone> LogBuilder<T> {
    /// Group `options` by level into a value builder.
    pub fn factory_log_values_builder(&self, options: LogValuesOptions<T>) -> LogValuesBuilder<T> {
        let mut builder = self.create_log_values_builder();
        builder.extend_options(options);
        builder
    }

    pub fn create_log_values_builder(&self) -> LogValuesBuilder<T> {
        let mut builder = LogValuesBuilder::new();
        if let Some(seed) = &self.seed {
            builder
                .with_debug_value(seed.clone())
                .with_error_value(seed.clone())
                .with_info_value(seed.clone());
        }
        builder
    }
}

impl<T> Default for LogBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_log_value_option_wraps_attr_without_level() {
        let lb = LogBuilder::new();
        let option = lb.create_log_value_option("foo");
        assert_eq!(*option.value(), "foo");
        assert_eq!(option.level(), None);
    }

    #[test]
    fn create_log_values_options_is_empty() {
        let lb = LogBuilder::<String>::new();
        assert!(lb.create_log_values_options().is_empty());
    }

    #[test]
    fn create_log_values_options_with_keeps_argument_order() {
        let lb = LogBuilder::new();
        let foo = lb.create_log_value_option("foo");
        let bar = lb.create_log_value_option("bar");

        let options = lb.create_log_values_options_with([foo.clone(), bar.clone()]);
        let collected: Vec<_> = options.into_iter().collect();
        assert_eq!(collected, vec![foo, bar]);
    }

    #[test]
    fn factory_log_values_builder_groups_options() {
        let lb = LogBuilder::new();
        let options = lb.create_log_values_options_with([
            lb.create_log_value_option("a").with_debug(),
            lb.create_log_value_option("b").with_error(),
            lb.create_log_value_option("c").with_info(),
        ]);

        let lv = lb.factory_log_values_builder(options).build();
        assert_eq!(lv.debug_values(), ["a"]);
        assert_eq!(lv.error_values(), ["b"]);
        assert_eq!(lv.info_values(), ["c"]);
    }

    #[test]
    fn unseeded_values_builder_is_empty() {
        let lv = LogBuilder::<String>::new().create_log_values_builder().build();
        assert!(lv.debug_values().is_empty());
        assert!(lv.info_values().is_empty());
        assert!(lv.error_values().is_empty());
    }

    #[test]
    fn seeded_values_builder_starts_with_seed() {
        let lb = LogBuilder::with_seed("tracing");
        let lv = lb
            .create_log_values_builder()
            .with_info_value("f1")
            .build();

        assert_eq!(lv.info_values(), ["tracing", "f1"]);
        assert_eq!(lv.debug_values(), ["tracing"]);
        assert_eq!(lv.error_values(), ["tracing"]);
    }

    #[test]
    fn seeded_factory_puts_seed_before_grouped_options() {
        let lb = LogBuilder::with_seed("tracing");
        let mut options = lb.create_log_values_options();
        options.add_option(lb.create_log_value_option("x").with_error());

        let lv = lb.factory_log_values_builder(options).build();
        assert_eq!(lv.error_values(), ["tracing", "x"]);
        assert_eq!(lv.info_values(), ["tracing"]);
    }
}
