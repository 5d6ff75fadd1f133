//! Observability hooks for the template pipeline (spec.md §4, ambient).
//!
//! Narrowed from a cache-lifecycle event system to the operations this
//! crate actually performs: header parsing, structural analysis, and
//! rejection. There is no cache here, so there are no `Learned`/`Evicted`/
//! `Expired` events — only what `parse`/`parse_with_limits` themselves do.

use std::sync::Arc;

use crate::error::TemplateError;
use crate::template::{OptsTypes, TemplateKind};

/// A single recognized Options Template shape (spec.md §4.4), drawn from
/// one set bit of [`OptsTypes`].
///
/// Exists so [`TemplateAnalysisEvent::OptionsTypeDetected`] can report one
/// event per matched shape instead of handing back the whole bitset at
/// once — a collector watching for "this template turned out to be a Flow
/// Keys template" gets exactly that event, even when the same template
/// also matches another shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptsType {
    MprocStat,
    MprocReliabilityStat,
    EprocReliabilityStat,
    Fkeys,
    IeType,
}

impl OptsType {
    /// Every variant paired with the single-bit [`OptsTypes`] flag it
    /// corresponds to, in the same order `options::detect` runs its
    /// detection rules.
    pub(crate) const ALL: [(OptsTypes, OptsType); 5] = [
        (OptsTypes::MPROC_STAT, OptsType::MprocStat),
        (OptsTypes::MPROC_RELIABILITY_STAT, OptsType::MprocReliabilityStat),
        (OptsTypes::EPROC_RELIABILITY_STAT, OptsType::EprocReliabilityStat),
        (OptsTypes::FKEYS, OptsType::Fkeys),
        (OptsTypes::IE_TYPE, OptsType::IeType),
    ];
}

/// Emitted at points in [`crate::parse`]/[`crate::parse_with_limits`].
#[derive(Debug, Clone)]
pub enum TemplateAnalysisEvent {
    /// A template record was fully parsed and analyzed.
    Parsed {
        template_id: u16,
        kind: TemplateKind,
        field_count: u16,
    },
    /// A zero-field template record was parsed (a withdrawal).
    Withdrawn { template_id: u16, kind: TemplateKind },
    /// An Options Template was recognized as one known shape. Fired once
    /// per set bit in `opts_types` — a template matching two shapes fires
    /// two of these, one for each.
    OptionsTypeDetected { template_id: u16, opts_type: OptsType },
    /// Parsing or analysis failed.
    Rejected { error: TemplateError },
}

/// A registered observer of [`TemplateAnalysisEvent`]s.
///
/// Must be `Send + Sync + 'static` so it can be stored and shared freely
/// by callers running parsing on multiple threads.
pub type AnalysisHook = Arc<dyn Fn(&TemplateAnalysisEvent) + Send + Sync + 'static>;

/// A container of registered [`AnalysisHook`]s, fired in registration
/// order by the parsing entry points.
#[derive(Clone, Default)]
pub struct AnalysisHooks {
    hooks: Vec<AnalysisHook>,
}

impl std::fmt::Debug for AnalysisHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisHooks")
            .field("hook_count", &self.hooks.len())
            .finish()
    }
}

impl AnalysisHooks {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    pub fn register<F>(&mut self, hook: F)
    where
        F: Fn(&TemplateAnalysisEvent) + Send + Sync + 'static,
    {
        self.hooks.push(Arc::new(hook));
    }

    pub(crate) fn trigger(&self, event: &TemplateAnalysisEvent) {
        for hook in &self.hooks {
            hook(event);
        }
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
