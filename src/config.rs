//! Parse-time limits.
//!
//! Mirrors `netflow_parser::variable_versions::Config`'s role: a small
//! struct of bounds that guard against pathological wire input, built
//! with the same default-then-builder layering as
//! `NetflowParser`/`NetflowParserBuilder`.

/// Limits applied while parsing a Template or Options Template record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Maximum number of field specifiers accepted in a single template.
    ///
    /// `field_count` is a 16-bit wire value, so this can never need to
    /// exceed `u16::MAX`; the default is unbounded within that range.
    /// Lowering it bounds the size of the allocation `parse` performs
    /// before it has validated a single field specifier.
    pub max_field_count: u16,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_field_count: u16::MAX,
        }
    }
}

impl ParseLimits {
    /// Creates a new builder for configuring [`ParseLimits`].
    pub fn builder() -> ParseLimitsBuilder {
        ParseLimitsBuilder::default()
    }
}

/// Builder for [`ParseLimits`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseLimitsBuilder {
    limits: ParseLimits,
}

impl ParseLimitsBuilder {
    /// Sets the maximum accepted field count.
    #[must_use = "builder methods consume self and return a new builder; the return value must be used"]
    pub fn with_max_field_count(mut self, max_field_count: u16) -> Self {
        self.limits.max_field_count = max_field_count;
        self
    }

    /// Builds the configured [`ParseLimits`].
    pub fn build(self) -> ParseLimits {
        self.limits
    }
}
