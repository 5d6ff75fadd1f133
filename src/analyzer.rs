//! C3 — Structural analyzer (spec.md §4.3).

use crate::error::{FormatReason, TemplateError};
use crate::field::{FieldFlags, VAR_IE_LENGTH};
use crate::template::{Template, TemplateFlags};

/// `sizeof(struct ipfix_header)`: version(2) + length(2) + export_time(4)
/// + sequence_number(4) + observation_domain_id(4).
const IPFIX_HEADER_LEN: u32 = 16;
/// `sizeof(struct ipfix_set_header)`: id(2) + length(2).
const SET_HEADER_LEN: u32 = 4;
/// Largest data-record length that can possibly fit inside an IPFIX
/// message alongside its message and set headers.
const MAX_DATA_LENGTH: u32 = u16::MAX as u32 - IPFIX_HEADER_LEN - SET_HEADER_LEN;

/// Runs the structural analysis pass over a template whose fields have
/// already been parsed by C2: scope/multi/last field flags, per-field
/// offsets, `data_length`, and the template-global `HAS_MULTI_IE` /
/// `HAS_DYNAMIC` flags.
pub(crate) fn analyze(template: &mut Template) -> Result<(), TemplateError> {
    mark_scope_fields(template);
    mark_multi_and_last(template);
    compute_offsets_and_length(template)?;

    let has_multi_ie = template.fields.iter().any(|f| f.flags.contains(FieldFlags::MULTI_IE));
    template.flags.set(TemplateFlags::HAS_MULTI_IE, has_multi_ie);

    Ok(())
}

fn mark_scope_fields(template: &mut Template) {
    let fields_scope = template.fields_scope as usize;
    for field in template.fields.iter_mut().take(fields_scope) {
        field.flags |= FieldFlags::SCOPE;
    }
}

/// Classifies duplicate `(en, id)` occurrences, walking right to left.
///
/// Uses the `id % 64` bit as an acceleration hint exactly as the
/// original implementation does (spec.md §4.3, §9): when the bit is
/// already set we fall back to an explicit forward scan to confirm a
/// true duplicate rather than a hash collision. The hash is keyed on
/// `id` alone (not `(en, id)`) — an implementation quirk carried over
/// unchanged since it is not observable (a forward scan always
/// confirms the real key before any flag is set).
fn mark_multi_and_last(template: &mut Template) {
    let fields_total = template.fields.len();
    let mut seen_hash: u64 = 0;

    for i in (0..fields_total).rev() {
        let id = template.fields[i].id;
        let bit = 1u64 << (id % 64);

        if seen_hash & bit == 0 {
            template.fields[i].flags |= FieldFlags::LAST_IE;
            seen_hash |= bit;
            continue;
        }

        let key = template.fields[i].key();
        let mut found_match = false;
        for j in (i + 1)..fields_total {
            if template.fields[j].key() == key {
                template.fields[i].flags |= FieldFlags::MULTI_IE;
                template.fields[j].flags |= FieldFlags::MULTI_IE;
                found_match = true;
                break;
            }
        }

        if !found_match {
            template.fields[i].flags |= FieldFlags::LAST_IE;
        }
    }
}

fn compute_offsets_and_length(template: &mut Template) -> Result<(), TemplateError> {
    let mut running_offset: u16 = 0;
    let mut data_length: u32 = 0;

    for field in template.fields.iter_mut() {
        field.offset = running_offset;

        if field.length == VAR_IE_LENGTH {
            template.flags |= TemplateFlags::HAS_DYNAMIC;
            data_length += 1;
            running_offset = VAR_IE_LENGTH;
        } else {
            data_length += field.length as u32;
            if running_offset != VAR_IE_LENGTH {
                running_offset = running_offset.saturating_add(field.length);
            }
        }
    }

    if data_length > MAX_DATA_LENGTH {
        return Err(TemplateError::Format {
            reason: FormatReason::DataRecordTooLong {
                data_length,
                max_allowed: MAX_DATA_LENGTH,
            },
            offset: 0,
        });
    }

    template.data_length = data_length;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldSpec;
    use crate::template::TemplateKind;

    fn template_with_fields(fields_scope: u16, fields: Vec<FieldSpec>) -> Template {
        let mut template =
            Template::new_empty(TemplateKind::Data, 256, fields.len() as u16, fields_scope);
        template.fields = fields;
        template
    }

    #[test]
    fn single_field_gets_last_ie_and_zero_offset() {
        let mut template = template_with_fields(0, vec![FieldSpec::new(8, 0, 4)]);
        analyze(&mut template).unwrap();
        assert_eq!(template.fields[0].offset, 0);
        assert!(template.fields[0].flags.contains(FieldFlags::LAST_IE));
        assert!(!template.fields[0].flags.contains(FieldFlags::MULTI_IE));
        assert_eq!(template.data_length, 4);
        assert!(!template.flags.contains(TemplateFlags::HAS_DYNAMIC));
    }

    #[test]
    fn variable_length_field_sets_dynamic_and_sentinel_offsets() {
        let mut template = template_with_fields(
            0,
            vec![
                FieldSpec::new(10, 42, 4),
                FieldSpec::new(27, 0, VAR_IE_LENGTH),
            ],
        );
        analyze(&mut template).unwrap();
        assert_eq!(template.fields[0].offset, 0);
        assert_eq!(template.fields[1].offset, VAR_IE_LENGTH);
        assert_eq!(template.data_length, 5);
        assert!(template.flags.contains(TemplateFlags::HAS_DYNAMIC));
    }

    #[test]
    fn duplicate_fields_are_flagged_multi_with_last_on_final_occurrence() {
        let mut template = template_with_fields(
            0,
            vec![
                FieldSpec::new(8, 0, 4),
                FieldSpec::new(8, 0, 4),
                FieldSpec::new(8, 0, 4),
            ],
        );
        analyze(&mut template).unwrap();
        assert!(template.fields[0].flags.contains(FieldFlags::MULTI_IE));
        assert!(!template.fields[0].flags.contains(FieldFlags::LAST_IE));
        assert!(template.fields[1].flags.contains(FieldFlags::MULTI_IE));
        assert!(!template.fields[1].flags.contains(FieldFlags::LAST_IE));
        assert!(template.fields[2].flags.contains(FieldFlags::MULTI_IE));
        assert!(template.fields[2].flags.contains(FieldFlags::LAST_IE));
        assert!(template.flags.contains(TemplateFlags::HAS_MULTI_IE));
        assert_eq!(template.data_length, 12);
    }

    #[test]
    fn distinct_enterprise_numbers_are_not_duplicates() {
        let mut template = template_with_fields(
            0,
            vec![FieldSpec::new(8, 0, 4), FieldSpec::new(8, 1, 4)],
        );
        analyze(&mut template).unwrap();
        assert!(!template.flags.contains(TemplateFlags::HAS_MULTI_IE));
        assert!(template.fields[0].flags.contains(FieldFlags::LAST_IE));
        assert!(template.fields[1].flags.contains(FieldFlags::LAST_IE));
    }

    #[test]
    fn rejects_data_record_exceeding_max_length() {
        let fields = vec![FieldSpec::new(1, 0, u16::MAX); 3];
        let mut template = template_with_fields(0, fields);
        let err = analyze(&mut template).unwrap_err();
        assert!(matches!(
            err,
            TemplateError::Format {
                reason: FormatReason::DataRecordTooLong { .. },
                ..
            }
        ));
    }

    #[test]
    fn scope_prefix_is_marked() {
        let mut template = template_with_fields(
            2,
            vec![
                FieldSpec::new(149, 0, 4),
                FieldSpec::new(1, 0, 4),
                FieldSpec::new(2, 0, 4),
            ],
        );
        analyze(&mut template).unwrap();
        assert!(template.fields[0].flags.contains(FieldFlags::SCOPE));
        assert!(template.fields[1].flags.contains(FieldFlags::SCOPE));
        assert!(!template.fields[2].flags.contains(FieldFlags::SCOPE));
    }
}
