//! C2 — Field specifier parser (spec.md §4.2).

use nom::number::complete::{be_u16, be_u32};

use crate::error::{FormatReason, TemplateError};
use crate::field::FieldSpec;
use crate::template::Template;

/// Enterprise bit: high bit of the 16-bit Information Element id.
const ENTERPRISE_BIT: u16 = 0x8000;
const ID_MASK: u16 = 0x7FFF;

/// Parses `template.fields_total` field specifiers out of `bytes`,
/// pushing them onto `template.fields` in order, and returns the number
/// of bytes consumed.
pub(crate) fn parse_fields(template: &mut Template, bytes: &[u8]) -> Result<usize, TemplateError> {
    let mut consumed = 0usize;

    for field_index in 0..template.fields_total {
        let remaining = &bytes[consumed..];
        if remaining.len() < 4 {
            return Err(TemplateError::Format {
                reason: FormatReason::FieldSpecifierTruncated {
                    field_index,
                    available: remaining.len(),
                },
                offset: consumed,
            });
        }

        let (rest, id16) =
            be_u16::<_, nom::error::Error<&[u8]>>(remaining).expect("length checked above");
        let (_, length) = be_u16::<_, nom::error::Error<&[u8]>>(rest).expect("length checked above");
        consumed += 4;

        let id = id16 & ID_MASK;
        let mut en = 0u32;

        if id16 & ENTERPRISE_BIT != 0 {
            let remaining = &bytes[consumed..];
            if remaining.len() < 4 {
                return Err(TemplateError::Format {
                    reason: FormatReason::EnterpriseNumberTruncated {
                        field_index,
                        available: remaining.len(),
                    },
                    offset: consumed,
                });
            }
            let (_, en_value) =
                be_u32::<_, nom::error::Error<&[u8]>>(remaining).expect("length checked above");
            en = en_value;
            consumed += 4;
        }

        template.fields.push(FieldSpec::new(id, en, length));
    }

    Ok(consumed)
}
