//! C5 — Information Element definition binder (spec.md §4.5).

use crate::field::FieldFlags;
use crate::ie::IeManager;
use crate::template::{Template, TemplateFlags};

/// Looks up and (re)binds `def` on every field from `manager`, then
/// recomputes `HAS_REVERSE`/`HAS_STRUCT` and the biflow key flags.
///
/// When `preserve` is `true`, fields that already carry a `def` keep it
/// unchanged (only their contribution to the template-global flags is
/// re-examined); fields with no `def` are looked up as usual. Passing
/// `manager: None` together with `preserve: true` is a no-op.
pub fn ies_define(template: &mut Template, manager: Option<&dyn IeManager>, preserve: bool) {
    if manager.is_none() && preserve {
        return;
    }

    let mut has_reverse = false;
    let mut has_struct = false;

    for field in template.fields.iter_mut() {
        field
            .flags
            .remove(FieldFlags::BKEY_SRC | FieldFlags::BKEY_DST | FieldFlags::BKEY_COM);

        if preserve && field.def.is_some() {
            has_reverse |= field.flags.contains(FieldFlags::REVERSE);
            has_struct |= field.flags.contains(FieldFlags::STRUCTURED);
            continue;
        }

        field.flags.remove(FieldFlags::REVERSE | FieldFlags::STRUCTURED);

        let def = manager.and_then(|m| m.find_by_id(field.en, field.id));
        let Some(def) = def else {
            field.def = None;
            continue;
        };

        if def.is_reverse {
            field.flags.insert(FieldFlags::REVERSE);
            has_reverse = true;
        }
        if def.data_type.is_structured() {
            field.flags.insert(FieldFlags::STRUCTURED);
            has_struct = true;
        }

        field.def = Some(def);
    }

    template.flags.set(TemplateFlags::HAS_REVERSE, has_reverse);
    template.flags.set(TemplateFlags::HAS_STRUCT, has_struct);

    if has_reverse {
        recompute_biflow_keys(template);
    }
}

/// Classifies every field as a biflow common/source/destination key field
/// (RFC 5103). Only meaningful once at least one field is reverse;
/// callers must have set [`TemplateFlags::HAS_REVERSE`] first.
fn recompute_biflow_keys(template: &mut Template) {
    let fields_total = template.fields.len();

    for i in 0..fields_total {
        let def = template.fields[i].def.clone();

        if let Some(def) = &def {
            if def.is_reverse {
                continue;
            }

            if let Some(reverse_elem) = &def.reverse_elem {
                if template.find(reverse_elem.pen, reverse_elem.id).is_some() {
                    continue;
                }
            }
        }

        template.fields[i].flags |= FieldFlags::BKEY_COM;

        let Some(def) = &def else { continue };
        let Some(name) = &def.name else { continue };

        if name.len() >= 6 && name[..6].eq_ignore_ascii_case("source") {
            template.fields[i].flags |= FieldFlags::BKEY_SRC;
        } else if name.len() >= 11 && name[..11].eq_ignore_ascii_case("destination") {
            template.fields[i].flags |= FieldFlags::BKEY_DST;
        }
    }
}
