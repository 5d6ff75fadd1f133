//! Invariant checks for the template parsing pipeline (property-style,
//! hand-picked witnesses rather than a fuzzer harness).

use std::sync::Arc;

use ipfix_template::{
    flowkey_cmp, flowkey_define, ies_define, parse, FieldFlags, IeDefinition, IeManager,
    TemplateFlags, TemplateKind, VAR_IE_LENGTH,
};

fn data_template(fields: &[u8]) -> (ipfix_template::Template, usize) {
    let mut bytes = vec![0x01, 0x00, 0x00, (fields.len() as u16 / 4) as u8];
    bytes.extend_from_slice(fields);
    parse(TemplateKind::Data, &bytes).unwrap()
}

#[test]
fn invariant_1_field_count_matches_declared_total() {
    let (template, _) = data_template(&[0x00, 0x08, 0x00, 0x04, 0x00, 0x09, 0x00, 0x04]);
    assert_eq!(template.fields.len(), template.fields_total as usize);
}

#[test]
fn invariant_2_reparse_of_raw_bytes_reproduces_equal_template() {
    let (template, _) = data_template(&[0x00, 0x08, 0x00, 0x04, 0x80, 0x0A, 0x00, 0x04, 0x00, 0x00, 0x00, 0x2A]);
    let (reparsed, _) = parse(template.kind, &template.raw.bytes).unwrap();

    assert_eq!(template.compare(&reparsed), std::cmp::Ordering::Equal);
    assert_eq!(template.flags, reparsed.flags);
    assert_eq!(template.data_length, reparsed.data_length);
    assert_eq!(template.opts_types, reparsed.opts_types);
    for (a, b) in template.fields.iter().zip(reparsed.fields.iter()) {
        assert_eq!(a.offset, b.offset);
        assert_eq!(a.flags, b.flags);
    }
}

#[test]
fn invariant_3_last_ie_iff_no_later_occurrence_of_same_key() {
    let (template, _) = data_template(&[
        0x00, 0x08, 0x00, 0x04, 0x00, 0x09, 0x00, 0x04, 0x00, 0x08, 0x00, 0x04,
    ]);
    for i in 0..template.fields.len() {
        let has_later_match = ((i + 1)..template.fields.len())
            .any(|j| template.fields[j].key() == template.fields[i].key());
        assert_eq!(
            template.fields[i].flags.contains(FieldFlags::LAST_IE),
            !has_later_match
        );
    }
}

#[test]
fn invariant_4_multi_ie_iff_any_other_occurrence_of_same_key() {
    let (template, _) = data_template(&[
        0x00, 0x08, 0x00, 0x04, 0x00, 0x09, 0x00, 0x04, 0x00, 0x08, 0x00, 0x04,
    ]);
    for i in 0..template.fields.len() {
        let has_other_match = (0..template.fields.len())
            .any(|j| j != i && template.fields[j].key() == template.fields[i].key());
        assert_eq!(
            template.fields[i].flags.contains(FieldFlags::MULTI_IE),
            has_other_match
        );
    }
}

#[test]
fn invariant_5_offsets_undefined_from_first_variable_length_field_onward() {
    let (template, _) = data_template(&[
        0x00, 0x08, 0x00, 0x04, 0x00, 0x1B, 0xFF, 0xFF, 0x00, 0x09, 0x00, 0x04,
    ]);
    let first_var = template
        .fields
        .iter()
        .position(|f| f.length == VAR_IE_LENGTH)
        .unwrap();

    let mut expected_offset: u16 = 0;
    for (i, field) in template.fields.iter().enumerate() {
        if i >= first_var {
            assert_eq!(field.offset, VAR_IE_LENGTH);
        } else {
            assert_eq!(field.offset, expected_offset);
            expected_offset += field.length;
        }
    }
}

#[test]
fn invariant_6_has_dynamic_iff_any_variable_length_field() {
    let (with_dynamic, _) = data_template(&[0x00, 0x1B, 0xFF, 0xFF]);
    assert!(with_dynamic.flags.contains(TemplateFlags::HAS_DYNAMIC));

    let (without_dynamic, _) = data_template(&[0x00, 0x08, 0x00, 0x04]);
    assert!(!without_dynamic.flags.contains(TemplateFlags::HAS_DYNAMIC));
}

#[test]
fn invariant_7_flowkey_define_then_cmp_is_exact() {
    let (mut template, _) = data_template(&[
        0x00, 0x08, 0x00, 0x04, 0x00, 0x09, 0x00, 0x04, 0x00, 0x0A, 0x00, 0x04,
    ]);
    flowkey_define(&mut template, 0b101).unwrap();
    assert!(flowkey_cmp(&template, 0b101));
    for other in [0b000u64, 0b001, 0b010, 0b011, 0b111] {
        assert!(!flowkey_cmp(&template, other));
    }
}

struct EmptyManager;
impl IeManager for EmptyManager {
    fn find_by_id(&self, _en: u32, _id: u16) -> Option<Arc<IeDefinition>> {
        None
    }
}

#[test]
fn invariant_8_copy_is_equal_and_independent() {
    let (mut template, _) = data_template(&[0x00, 0x08, 0x00, 0x04]);
    ies_define(&mut template, Some(&EmptyManager), false);

    let mut copy = template.copy();
    assert_eq!(template.compare(&copy), std::cmp::Ordering::Equal);

    copy.flags.insert(TemplateFlags::HAS_FKEY);
    assert!(!template.flags.contains(TemplateFlags::HAS_FKEY));
    assert!(copy.flags.contains(TemplateFlags::HAS_FKEY));
}

#[test]
fn unresolved_ie_definitions_are_not_an_error() {
    let (mut template, _) = data_template(&[0x00, 0x08, 0x00, 0x04]);
    ies_define(&mut template, Some(&EmptyManager), false);
    assert!(template.fields[0].def.is_none());
}
