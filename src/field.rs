//! Field specifiers: the per-field part of a parsed template (spec.md §3).

use std::sync::Arc;

use bitflags::bitflags;
use serde::Serialize;

use crate::ie::IeDefinition;

/// Sentinel wire value `0xFFFF`: marks a variable-length field's
/// declared `length`, and — once it has propagated — a field's
/// undefined `offset`.
pub const VAR_IE_LENGTH: u16 = 0xFFFF;

bitflags! {
    /// Per-field feature flags (spec.md §3, "Field specifier" / `flags`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(transparent)]
    pub struct FieldFlags: u16 {
        /// Field lies within the template's leading scope prefix.
        const SCOPE = 0b0000_0001;
        /// The same `(en, id)` pair appears more than once in this template.
        const MULTI_IE = 0b0000_0010;
        /// This occurrence is the last (highest-index) one of its `(en, id)` pair.
        const LAST_IE = 0b0000_0100;
        /// The bound IE definition declares itself a reverse (RFC 5103) element.
        const REVERSE = 0b0000_1000;
        /// The bound IE definition is a structured type (RFC 6313).
        const STRUCTURED = 0b0001_0000;
        /// Field is part of the configured flow-key bitmap.
        const FLOW_KEY = 0b0010_0000;
        /// Biflow: common (direction-neutral) key field.
        const BKEY_COM = 0b0100_0000;
        /// Biflow: forward/"source" half of a direction pair.
        const BKEY_SRC = 0b1000_0000;
        /// Biflow: reverse/"destination" half of a direction pair.
        const BKEY_DST = 0b0001_0000_0000;
    }
}

/// One parsed field specifier.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    /// 15-bit Information Element id (enterprise bit already stripped).
    pub id: u16,
    /// Enterprise number; 0 for IANA-registered elements.
    pub en: u32,
    /// Declared length; [`VAR_IE_LENGTH`] denotes variable length.
    pub length: u16,
    /// Byte offset of this field within a data record, or
    /// [`VAR_IE_LENGTH`] if this or a preceding field is variable-length.
    pub offset: u16,
    /// Feature flags (see [`FieldFlags`]).
    pub flags: FieldFlags,
    /// Bound IE definition, once [`crate::ie_binder::ies_define`] has run.
    #[serde(skip)]
    pub def: Option<Arc<IeDefinition>>,
}

impl FieldSpec {
    pub(crate) fn new(id: u16, en: u32, length: u16) -> Self {
        Self {
            id,
            en,
            length,
            offset: 0,
            flags: FieldFlags::empty(),
            def: None,
        }
    }

    /// `(en, id)` as a single comparable key — used throughout duplicate
    /// detection and required-field lookups.
    pub fn key(&self) -> (u32, u16) {
        (self.en, self.id)
    }

    /// Whether `length == VAR_IE_LENGTH`.
    pub fn is_variable_length(&self) -> bool {
        self.length == VAR_IE_LENGTH
    }
}

// `PartialEq`/`Eq` deliberately ignore `def`: two fields with the same
// wire-visible shape are equal regardless of which IE registry (or none)
// bound them, mirroring the C struct's plain field-by-field layout where
// `def` is a pointer used for classification, not identity.
impl PartialEq for FieldSpec {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.en == other.en
            && self.length == other.length
            && self.offset == other.offset
            && self.flags == other.flags
    }
}

impl Eq for FieldSpec {}
