//! Error types returned by the template parser and analyzer.

use std::fmt;

/// Why a [`crate::TemplateError::Format`] was raised.
///
/// Kept as a nested enum (rather than a formatted string) so callers can
/// `match` on the specific cause instead of parsing messages, while
/// [`fmt::Display`] still renders a human-readable sentence for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatReason {
    /// Fewer than 4 bytes remain — not even a Data template header fits.
    HeaderTooShort { available: usize },
    /// `template_id` read from the header is below 256.
    TemplateIdReserved { template_id: u16 },
    /// Options Template header claims `field_count != 0` but fewer than
    /// 6 bytes are available for `scope_field_count`.
    OptionsHeaderTooShort { available: usize },
    /// `scope_field_count` is zero or exceeds `field_count`.
    InvalidScopeFieldCount {
        scope_field_count: u16,
        field_count: u16,
    },
    /// Fewer than 4 bytes remain for the next field specifier.
    FieldSpecifierTruncated { field_index: u16, available: usize },
    /// The enterprise bit was set but fewer than 4 bytes remain for the
    /// enterprise number.
    EnterpriseNumberTruncated { field_index: u16, available: usize },
    /// The data record length implied by the template's fields exceeds
    /// what can fit in an IPFIX message alongside its headers.
    DataRecordTooLong { data_length: u32, max_allowed: u32 },
    /// A flow-key bitmap's highest set bit falls beyond `fields_total`.
    FlowKeyMaskTooWide { highest_bit: u32, fields_total: u16 },
}

impl fmt::Display for FormatReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatReason::HeaderTooShort { available } => {
                write!(f, "template header truncated ({available} bytes available, need at least 4)")
            }
            FormatReason::TemplateIdReserved { template_id } => {
                write!(f, "template id {template_id} is reserved for sets (must be >= 256)")
            }
            FormatReason::OptionsHeaderTooShort { available } => {
                write!(
                    f,
                    "options template header truncated ({available} bytes available, need at least 6)"
                )
            }
            FormatReason::InvalidScopeFieldCount {
                scope_field_count,
                field_count,
            } => write!(
                f,
                "invalid scope_field_count {scope_field_count} for field_count {field_count}"
            ),
            FormatReason::FieldSpecifierTruncated {
                field_index,
                available,
            } => write!(
                f,
                "field specifier {field_index} truncated ({available} bytes available, need at least 4)"
            ),
            FormatReason::EnterpriseNumberTruncated {
                field_index,
                available,
            } => write!(
                f,
                "enterprise number for field {field_index} truncated ({available} bytes available, need at least 4)"
            ),
            FormatReason::DataRecordTooLong {
                data_length,
                max_allowed,
            } => write!(
                f,
                "data record length {data_length} exceeds maximum {max_allowed}"
            ),
            FormatReason::FlowKeyMaskTooWide {
                highest_bit,
                fields_total,
            } => write!(
                f,
                "flow key mask's highest bit ({highest_bit}) exceeds field count ({fields_total})"
            ),
        }
    }
}

/// Errors produced while parsing or analyzing a Template / Options
/// Template record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Malformed input. See [`FormatReason`] for the specific cause.
    Format {
        reason: FormatReason,
        offset: usize,
    },
    /// The declared field count exceeds the configured
    /// [`crate::config::ParseLimits::max_field_count`]. Realizes the
    /// spec's NOMEM path as a checkable error instead of an aborting
    /// allocation (see DESIGN.md).
    FieldCountExceeded { found: u16, limit: u16 },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::Format { reason, offset } => {
                write!(f, "malformed template at offset {offset}: {reason}")
            }
            TemplateError::FieldCountExceeded { found, limit } => {
                write!(f, "template declares {found} fields, exceeding the configured limit of {limit}")
            }
        }
    }
}

impl std::error::Error for TemplateError {}
