//! The template object itself (spec.md §3).

use std::cmp::Ordering;

use bitflags::bitflags;
use serde::Serialize;

use crate::field::FieldSpec;

/// Template record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TemplateKind {
    /// Plain Template Record (Set ID 2).
    Data,
    /// Options Template Record (Set ID 3), carries a leading scope prefix.
    Options,
}

bitflags! {
    /// Template-global feature flags (spec.md §3, `Template.flags`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(transparent)]
    pub struct TemplateFlags: u8 {
        /// At least one field has [`crate::field::FieldFlags::MULTI_IE`] set.
        const HAS_MULTI_IE = 0b0000_0001;
        /// At least one field has `length == VAR_IE_LENGTH`.
        const HAS_DYNAMIC = 0b0000_0010;
        /// At least one bound field declares itself reverse (RFC 5103).
        const HAS_REVERSE = 0b0000_0100;
        /// At least one bound field is a structured type (RFC 6313).
        const HAS_STRUCT = 0b0000_1000;
        /// A non-zero flow-key bitmap has been applied via `flowkey_define`.
        const HAS_FKEY = 0b0001_0000;
    }
}

bitflags! {
    /// Recognized Options Template shapes (spec.md §4.4). Meaningful
    /// only when `kind == TemplateKind::Options`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(transparent)]
    pub struct OptsTypes: u8 {
        /// RFC 7011 §4.1: Metering Process Statistics.
        const MPROC_STAT = 0b0000_0001;
        /// RFC 7011 §4.2: Metering Process Reliability Statistics.
        const MPROC_RELIABILITY_STAT = 0b0000_0010;
        /// RFC 7011 §4.3: Exporting Process Reliability Statistics.
        const EPROC_RELIABILITY_STAT = 0b0000_0100;
        /// RFC 7011 §4.4: Flow Keys.
        const FKEYS = 0b0000_1000;
        /// RFC 5610 §3.9: Information Element Type.
        const IE_TYPE = 0b0001_0000;
    }
}

/// The exact bytes consumed while parsing a template (header + field
/// specifiers), kept for fast byte-identity comparison (spec.md §4.7).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawTemplate {
    pub bytes: Vec<u8>,
}

impl RawTemplate {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A parsed, analyzed IPFIX Template or Options Template.
///
/// Immutable except for the rebindable metadata applied later by
/// [`crate::ie_binder::ies_define`] and [`crate::flowkey::flowkey_define`]
/// (spec.md §3 "Lifecycle"). `Clone` realizes the spec's `copy()`
/// operation: fields and `raw` are deep-duplicated, while each field's
/// `def` (an `Arc`) is cheaply shared rather than duplicated.
#[derive(Debug, Clone, Serialize)]
pub struct Template {
    pub kind: TemplateKind,
    pub id: u16,
    pub fields_total: u16,
    pub fields_scope: u16,
    pub flags: TemplateFlags,
    pub opts_types: OptsTypes,
    pub data_length: u32,
    pub raw: RawTemplate,
    pub fields: Vec<FieldSpec>,
}

impl Template {
    pub(crate) fn new_empty(kind: TemplateKind, id: u16, fields_total: u16, fields_scope: u16) -> Self {
        Self {
            kind,
            id,
            fields_total,
            fields_scope,
            flags: TemplateFlags::empty(),
            opts_types: OptsTypes::empty(),
            data_length: 0,
            raw: RawTemplate::new(Vec::new()),
            fields: Vec::with_capacity(fields_total as usize),
        }
    }

    /// Whether this is a withdrawal (a zero-field template record).
    pub fn is_withdrawal(&self) -> bool {
        self.fields_total == 0
    }

    /// Finds the first field matching `(en, id)` in insertion order
    /// (spec.md §4.7 `find`). O(N), acceptable for N <= 2^16.
    pub fn find(&self, en: u32, id: u16) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.en == en && f.id == id)
    }

    /// Deep copy: fields and raw bytes are duplicated, `def` back
    /// references are shared (spec.md §4.7 `copy`). Equivalent to
    /// `Clone::clone` — kept as a named method for readers coming from
    /// the spec's operation list.
    pub fn copy(&self) -> Template {
        self.clone()
    }

    /// Raw-byte comparison (spec.md §4.7 `compare`): sign of
    /// `raw.len() - other.raw.len()`, else lexicographic byte compare.
    /// Equivalent to this type's `Ord` impl.
    pub fn compare(&self, other: &Template) -> Ordering {
        self.cmp(other)
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Template {}

impl PartialOrd for Template {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Template {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw
            .len()
            .cmp(&other.raw.len())
            .then_with(|| self.raw.bytes.cmp(&other.raw.bytes))
    }
}
