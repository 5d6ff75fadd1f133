//! The Information Element registry contract consumed by [`crate::ie_binder`].
//!
//! The registry itself (resolving `(enterprise_number, element_id)` pairs
//! to definitions) lives outside this crate — this module only describes
//! the shape the core expects, the same way `enterprise_registry.rs`
//! describes `EnterpriseFieldDef`/`EnterpriseFieldRegistry` as a plain
//! data contract for the caller to populate.

use std::sync::Arc;

/// Data type of an Information Element, as relevant to this subsystem.
///
/// Only the three "structured" types named in spec.md §4.5 are broken
/// out explicitly (RFC 6313); everything else collapses to `Other`,
/// since the analyzer never needs to distinguish further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum IeDataType {
    BasicList,
    SubTemplateList,
    SubTemplateMultiList,
    Other,
}

impl IeDataType {
    /// Whether this data type is one of the three structured kinds.
    pub fn is_structured(self) -> bool {
        matches!(
            self,
            IeDataType::BasicList | IeDataType::SubTemplateList | IeDataType::SubTemplateMultiList
        )
    }
}

/// A resolved Information Element definition, as returned by an
/// [`IeManager`] lookup.
///
/// The core never constructs one of these itself; it only reads the
/// fields back off whatever the registry returns.
#[derive(Debug, Clone, PartialEq)]
pub struct IeDefinition {
    /// Enterprise number this element belongs to (0 for IANA).
    pub pen: u32,
    /// Information Element identifier within `pen`.
    pub id: u16,
    /// Human-readable name, used for biflow "source"/"destination"
    /// prefix classification. `None` if the registry has no name on
    /// file for this element.
    pub name: Option<String>,
    /// The element's data type.
    pub data_type: IeDataType,
    /// Whether this element is itself the reverse counterpart of
    /// another (RFC 5103 biflow).
    pub is_reverse: bool,
    /// The forward element this one is the reverse of, if any.
    pub reverse_elem: Option<Arc<IeDefinition>>,
}

/// External collaborator contract: resolves `(enterprise_number, id)`
/// pairs to [`IeDefinition`]s.
///
/// Implementations own the registry's storage; the core only ever reads
/// through `&dyn IeManager`, never mutates it.
pub trait IeManager {
    /// Synchronous lookup by enterprise number and element id.
    ///
    /// Returns `None` on a miss — an unresolved field is not an error
    /// (spec.md §4.5, §7: "IE binding never errors").
    fn find_by_id(&self, en: u32, id: u16) -> Option<Arc<IeDefinition>>;
}
