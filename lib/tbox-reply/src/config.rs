//! Handler configuration types.

use tbox_reply_core::TextMode;

/// Configuration shared by the response handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerConfig {
    /// How invalid UTF-8 in report payloads is treated.
    pub text_mode: TextMode,
    /// Whether to log per-invocation item counts at debug level.
    pub log_item_counts: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            text_mode: TextMode::Lenient,
            log_item_counts: false,
        }
    }
}

impl HandlerConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> HandlerConfigBuilder {
        HandlerConfigBuilder::default()
    }
}

/// Builder for [`HandlerConfig`].
#[derive(Debug, Clone, Default)]
pub struct HandlerConfigBuilder {
    text_mode: Option<TextMode>,
    log_item_counts: Option<bool>,
}

impl HandlerConfigBuilder {
    /// Set the text decoding mode.
    #[must_use]
    pub const fn text_mode(mut self, mode: TextMode) -> Self {
        self.text_mode = Some(mode);
        self
    }

    /// Reject invalid UTF-8 instead of replacing it.
    #[must_use]
    pub const fn strict_text(self) -> Self {
        self.text_mode(TextMode::Strict)
    }

    /// Set whether item counts are logged.
    #[must_use]
    pub const fn log_item_counts(mut self, enabled: bool) -> Self {
        self.log_item_counts = Some(enabled);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> HandlerConfig {
        let defaults = HandlerConfig::default();
        HandlerConfig {
            text_mode: self.text_mode.unwrap_or(defaults.text_mode),
            log_item_counts: self.log_item_counts.unwrap_or(defaults.log_item_counts),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[test]
    fn default_config() {
        let config = HandlerConfig::default();
        check!(config.text_mode == TextMode::Lenient);
        check!(!config.log_item_counts);
    }

    #[test]
    fn builder_overrides() {
        let config = HandlerConfig::builder()
            .strict_text()
            .log_item_counts(true)
            .build();

        check!(config.text_mode == TextMode::Strict);
        check!(config.log_item_counts);
    }

    #[test]
    fn builder_keeps_defaults() {
        check!(HandlerConfig::builder().build() == HandlerConfig::default());
    }
}
