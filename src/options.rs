//! C4 — Options-type detector (spec.md §4.4).
//!
//! Runs only for `TemplateKind::Options` templates, after C3. Never
//! errors: an unrecognized Options Template simply keeps `opts_types`
//! empty.

use crate::field::FieldFlags;
use crate::template::{OptsTypes, Template, TemplateKind};

/// `(id, en)` pairs observationTimeSeconds/Milliseconds/Microseconds/Nanoseconds.
const OBS_TIME_IDS: [u16; 4] = [322, 323, 324, 325];

/// Runs every detection rule and ORs any matched bits into
/// `template.opts_types`. No-op for `TemplateKind::Data`.
pub(crate) fn detect(template: &mut Template) {
    if template.kind != TemplateKind::Options {
        return;
    }

    detect_mproc(template);
    detect_eproc(template);
    detect_flowkey(template);
    detect_ie_type(template);
}

/// Every `(id, en)` in `reqs` appears among fields with index >=
/// `fields_scope` (scope fields are excluded).
fn non_scope_has_all(template: &Template, reqs: &[(u16, u32)]) -> bool {
    let non_scope = &template.fields[template.fields_scope as usize..];
    reqs.iter()
        .all(|(id, en)| non_scope.iter().any(|f| f.id == *id && f.en == *en))
}

/// Exactly two distinct non-scope fields with `en == 0` and
/// `id` in `{322, 323, 324, 325}`. Three or more is a non-match.
fn has_obs_time_pair(template: &Template) -> bool {
    let non_scope = &template.fields[template.fields_scope as usize..];
    let matches = non_scope
        .iter()
        .filter(|f| f.en == 0 && OBS_TIME_IDS.contains(&f.id))
        .count();
    matches == 2
}

/// RFC 7011 §4.1–4.2: Metering Process (Reliability) Statistics.
fn detect_mproc(template: &mut Template) {
    const OBSERVATION_DOMAIN_ID: u16 = 149;
    const METERING_PROCESS_ID: u16 = 143;

    let odid = template.find(0, OBSERVATION_DOMAIN_ID).cloned();
    let mpid = template.find(0, METERING_PROCESS_ID).cloned();
    if odid.is_none() && mpid.is_none() {
        return;
    }

    for candidate in [&odid, &mpid].into_iter().flatten() {
        if !candidate.flags.contains(FieldFlags::SCOPE) || candidate.flags.contains(FieldFlags::MULTI_IE) {
            return;
        }
    }

    const MPROC_STAT_IDS: [(u16, u32); 3] = [(40, 0), (41, 0), (42, 0)];
    if non_scope_has_all(template, &MPROC_STAT_IDS) {
        template.opts_types |= OptsTypes::MPROC_STAT;
    }

    // Evaluated independently of MPROC_STAT above — see spec.md §9.
    const MPROC_RELIABILITY_IDS: [(u16, u32); 2] = [(164, 0), (165, 0)];
    if non_scope_has_all(template, &MPROC_RELIABILITY_IDS) && has_obs_time_pair(template) {
        template.opts_types |= OptsTypes::MPROC_RELIABILITY_STAT;
    }
}

/// RFC 7011 §4.3: Exporting Process Reliability Statistics.
fn detect_eproc(template: &mut Template) {
    const EXPORTER_IPV4: u16 = 130;
    const EXPORTER_IPV6: u16 = 131;
    const EXPORTING_PROCESS_ID: u16 = 144;

    let eid_found = [EXPORTER_IPV4, EXPORTER_IPV6, EXPORTING_PROCESS_ID]
        .into_iter()
        .filter_map(|id| template.find(0, id))
        .any(|f| f.flags.contains(FieldFlags::SCOPE) && f.flags.contains(FieldFlags::LAST_IE));

    if !eid_found {
        return;
    }

    const EPROC_IDS: [(u16, u32); 3] = [(166, 0), (167, 0), (168, 0)];
    if !non_scope_has_all(template, &EPROC_IDS) {
        return;
    }

    if has_obs_time_pair(template) {
        template.opts_types |= OptsTypes::EPROC_RELIABILITY_STAT;
    }
}

/// RFC 7011 §4.4: Flow Keys.
fn detect_flowkey(template: &mut Template) {
    const TEMPLATE_ID_IE: u16 = 145;
    const FLOW_KEY_INDICATOR: u16 = 173;

    let Some(id_field) = template.find(0, TEMPLATE_ID_IE) else {
        return;
    };
    if !id_field.flags.contains(FieldFlags::SCOPE) || id_field.flags.contains(FieldFlags::MULTI_IE) {
        return;
    }

    if non_scope_has_all(template, &[(FLOW_KEY_INDICATOR, 0)]) {
        template.opts_types |= OptsTypes::FKEYS;
    }
}

/// RFC 5610 §3.9: Information Element Type.
fn detect_ie_type(template: &mut Template) {
    const IE_ID: u16 = 303;
    const PRIVATE_ENTERPRISE_NUMBER: u16 = 346;

    let ie_id = template.find(0, IE_ID).cloned();
    let pen = template.find(0, PRIVATE_ENTERPRISE_NUMBER).cloned();

    for candidate in [&ie_id, &pen] {
        match candidate {
            None => return,
            Some(f) => {
                if !f.flags.contains(FieldFlags::SCOPE) || f.flags.contains(FieldFlags::MULTI_IE) {
                    return;
                }
            }
        }
    }

    const IE_TYPE_IDS: [(u16, u32); 3] = [(339, 0), (344, 0), (341, 0)];
    if non_scope_has_all(template, &IE_TYPE_IDS) {
        template.opts_types |= OptsTypes::IE_TYPE;
    }
}
