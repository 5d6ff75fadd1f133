//! C1 — Header parser (spec.md §4.1).

use nom::number::complete::be_u16;

use crate::config::ParseLimits;
use crate::error::{FormatReason, TemplateError};
use crate::template::{Template, TemplateKind};

/// Minimum reserved template id: values below this are reserved for Sets.
const MIN_TEMPLATE_ID: u16 = 256;

/// `field_count(2) + scope_field_count(2)` on top of the shared 4-byte
/// `template_id(2) + count(2)` prefix.
const DATA_HEADER_LEN: usize = 4;
const OPTIONS_HEADER_LEN: usize = 6;

/// Parses a Template or Options Template header.
///
/// Returns the parsed (but not yet field-populated) [`Template`] and the
/// number of header bytes consumed (4 or 6).
pub(crate) fn parse_header(
    kind: TemplateKind,
    bytes: &[u8],
    limits: &ParseLimits,
) -> Result<(Template, usize), TemplateError> {
    if bytes.len() < DATA_HEADER_LEN {
        return Err(TemplateError::Format {
            reason: FormatReason::HeaderTooShort {
                available: bytes.len(),
            },
            offset: 0,
        });
    }

    let (rest, template_id) =
        be_u16::<_, nom::error::Error<&[u8]>>(bytes).expect("length checked above");
    if template_id < MIN_TEMPLATE_ID {
        return Err(TemplateError::Format {
            reason: FormatReason::TemplateIdReserved { template_id },
            offset: 0,
        });
    }

    let (rest, fields_total) =
        be_u16::<_, nom::error::Error<&[u8]>>(rest).expect("length checked above");

    let (fields_scope, header_len) = if kind == TemplateKind::Options && fields_total != 0 {
        if bytes.len() < OPTIONS_HEADER_LEN {
            return Err(TemplateError::Format {
                reason: FormatReason::OptionsHeaderTooShort {
                    available: bytes.len(),
                },
                offset: 0,
            });
        }
        let (_, scope_field_count) =
            be_u16::<_, nom::error::Error<&[u8]>>(rest).expect("length checked above");
        if scope_field_count == 0 || scope_field_count > fields_total {
            return Err(TemplateError::Format {
                reason: FormatReason::InvalidScopeFieldCount {
                    scope_field_count,
                    field_count: fields_total,
                },
                offset: 4,
            });
        }
        (scope_field_count, OPTIONS_HEADER_LEN)
    } else {
        (0, DATA_HEADER_LEN)
    };

    if fields_total > limits.max_field_count {
        return Err(TemplateError::FieldCountExceeded {
            found: fields_total,
            limit: limits.max_field_count,
        });
    }

    Ok((
        Template::new_empty(kind, template_id, fields_total, fields_scope),
        header_len,
    ))
}
