//! Parses IPFIX (RFC 7011) Template and Options Template records and
//! derives everything a collector needs to decode the data records that
//! follow them: per-field byte offsets, a fixed-vs-variable data record
//! length, recognized Options Template shapes (RFC 7011 §4, RFC 5610
//! §3.9), bound Information Element definitions (including RFC 5103
//! biflow classification), and an optional flow-key bitmap.
//!
//! The pipeline runs in six stages, each in its own module:
//!
//! 1. [`header`] — reads `template_id`/`field_count`(/`scope_field_count`
//!    for Options Templates) and validates them.
//! 2. [`fields_parser`] — reads the field specifier array into
//!    [`field::FieldSpec`] values.
//! 3. [`analyzer`] — computes per-field offsets, the template's
//!    `data_length`, and scope/multi/last field flags.
//! 4. [`options`] — recognizes known Options Template shapes.
//! 5. [`ie_binder`] — binds Information Element definitions via an
//!    external [`ie::IeManager`] and derives biflow key flags.
//! 6. [`flowkey`] — applies and compares flow-key bitmaps.
//!
//! [`parse`] runs stages 1-4 (the self-contained, always-available part
//! of the pipeline); [`ie_binder::ies_define`] and
//! [`flowkey::flowkey_define`] are called separately once a caller has
//! an [`ie::IeManager`] and/or a flow-key bitmap to apply.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod events;
pub mod field;
pub mod fields_parser;
pub mod flowkey;
pub mod header;
pub mod ie;
pub mod ie_binder;
pub mod options;
pub mod template;

pub use config::{ParseLimits, ParseLimitsBuilder};
pub use error::{FormatReason, TemplateError};
pub use events::{AnalysisHook, AnalysisHooks, OptsType, TemplateAnalysisEvent};
pub use field::{FieldFlags, FieldSpec, VAR_IE_LENGTH};
pub use flowkey::{flowkey_applicable, flowkey_cmp, flowkey_define};
pub use ie::{IeDataType, IeDefinition, IeManager};
pub use ie_binder::ies_define;
pub use template::{OptsTypes, RawTemplate, Template, TemplateFlags, TemplateKind};

/// Parses one Template or Options Template record starting at the front
/// of `bytes`, using [`ParseLimits::default`].
///
/// Returns the analyzed [`Template`] and the number of bytes consumed
/// from `bytes` (header + field specifiers only — `bytes` may contain
/// trailing records, which are left untouched).
///
/// A zero-field record (a withdrawal, see [`Template::is_withdrawal`])
/// is returned without running the C3/C4 analysis passes: there are no
/// fields to analyze and no Options Template shape to recognize.
pub fn parse(kind: TemplateKind, bytes: &[u8]) -> Result<(Template, usize), TemplateError> {
    parse_with_limits(kind, bytes, &ParseLimits::default())
}

/// Like [`parse`], but with caller-supplied [`ParseLimits`].
pub fn parse_with_limits(
    kind: TemplateKind,
    bytes: &[u8],
    limits: &ParseLimits,
) -> Result<(Template, usize), TemplateError> {
    let (mut template, header_len) = header::parse_header(kind, bytes, limits)?;

    if template.is_withdrawal() {
        template.raw = RawTemplate::new(bytes[..header_len].to_vec());
        return Ok((template, header_len));
    }

    let fields_len = fields_parser::parse_fields(&mut template, &bytes[header_len..])?;
    let total_len = header_len + fields_len;

    analyzer::analyze(&mut template)?;
    options::detect(&mut template);

    template.raw = RawTemplate::new(bytes[..total_len].to_vec());
    Ok((template, total_len))
}

/// Like [`parse_with_limits`], additionally firing `hooks` around the
/// parse. Fires [`TemplateAnalysisEvent::Parsed`] or `Withdrawn` on
/// success (`Rejected` on failure), followed by one
/// [`TemplateAnalysisEvent::OptionsTypeDetected`] per Options Template
/// shape the template matched (zero, one, or several).
pub fn parse_with_hooks(
    kind: TemplateKind,
    bytes: &[u8],
    limits: &ParseLimits,
    hooks: &AnalysisHooks,
) -> Result<(Template, usize), TemplateError> {
    match parse_with_limits(kind, bytes, limits) {
        Ok((template, consumed)) => {
            let event = if template.is_withdrawal() {
                TemplateAnalysisEvent::Withdrawn {
                    template_id: template.id,
                    kind: template.kind,
                }
            } else {
                TemplateAnalysisEvent::Parsed {
                    template_id: template.id,
                    kind: template.kind,
                    field_count: template.fields_total,
                }
            };
            hooks.trigger(&event);

            if template.kind == TemplateKind::Options {
                for (flag, opts_type) in OptsType::ALL {
                    if template.opts_types.contains(flag) {
                        hooks.trigger(&TemplateAnalysisEvent::OptionsTypeDetected {
                            template_id: template.id,
                            opts_type,
                        });
                    }
                }
            }

            Ok((template, consumed))
        }
        Err(error) => {
            hooks.trigger(&TemplateAnalysisEvent::Rejected { error: error.clone() });
            Err(error)
        }
    }
}
