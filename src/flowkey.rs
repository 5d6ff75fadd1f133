//! C6 — Flow-key binder (spec.md §4.6).

use crate::error::{FormatReason, TemplateError};
use crate::field::FieldFlags;
use crate::template::{Template, TemplateFlags};

/// Position (from the low bit) of the highest set bit in `mask`, or 0
/// if `mask` is zero.
fn highest_set_bit(mask: u64) -> u32 {
    u64::BITS - mask.leading_zeros()
}

/// Whether `flowkey`'s highest set bit still falls within
/// `template.fields_total` (spec.md §4.6: a flow-key bitmap cannot name
/// a field position past the end of the template).
pub fn flowkey_applicable(template: &Template, flowkey: u64) -> Result<(), TemplateError> {
    let highest_bit = highest_set_bit(flowkey);
    if highest_bit as u16 > template.fields_total {
        return Err(TemplateError::Format {
            reason: FormatReason::FlowKeyMaskTooWide {
                highest_bit,
                fields_total: template.fields_total,
            },
            offset: 0,
        });
    }
    Ok(())
}

/// Applies `flowkey` as a per-field bitmap: bit `i` set marks
/// `template.fields[i]` as a flow-key field. Also sets or clears the
/// template-global [`TemplateFlags::HAS_FKEY`] flag.
pub fn flowkey_define(template: &mut Template, flowkey: u64) -> Result<(), TemplateError> {
    flowkey_applicable(template, flowkey)?;

    template.flags.set(TemplateFlags::HAS_FKEY, flowkey != 0);

    for (i, field) in template.fields.iter_mut().enumerate() {
        field.flags.set(FieldFlags::FLOW_KEY, (flowkey >> i) & 1 != 0);
    }

    Ok(())
}

/// Compares a candidate bitmap against the flow-key flags currently
/// bound on `template`. `true` means they match exactly.
pub fn flowkey_cmp(template: &Template, flowkey: u64) -> bool {
    let expected_nonzero = flowkey != 0;
    let actual_nonzero = template.flags.contains(TemplateFlags::HAS_FKEY);
    if expected_nonzero != actual_nonzero {
        return false;
    }
    if !expected_nonzero {
        return true;
    }

    if highest_set_bit(flowkey) as u16 > template.fields_total {
        return false;
    }

    template
        .fields
        .iter()
        .enumerate()
        .all(|(i, field)| ((flowkey >> i) & 1 != 0) == field.flags.contains(FieldFlags::FLOW_KEY))
}
