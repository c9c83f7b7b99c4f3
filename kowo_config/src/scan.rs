//! Partitions marked declarations into those ready for generation and those
//! waiting on unresolved types.

use std::collections::BTreeSet;

use crate::collect::nest_target;
use crate::symbols::{Annotated, DeclarationId, Markers, SymbolSource};

/// Result of scanning a symbol source for one marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Fully resolved declarations, in frontend order.
    pub ready: Vec<DeclarationId>,
    /// Declarations to resubmit on a later round.
    pub deferred: Vec<DeclarationId>,
}

/// Splits the class-like declarations carrying the config marker by
/// resolution state.
///
/// A model is ready only when it and every declaration reachable through
/// nest-marked properties are fully resolved. Markers on non-class
/// declarations are ignored.
pub fn scan<S>(source: &S, markers: &Markers) -> ScanResult
where
    S: SymbolSource + ?Sized,
{
    let mut result = ScanResult::default();
    for id in source.find_marked(&markers.config) {
        let Some(info) = source.declaration(id) else {
            continue;
        };
        if !info.kind.is_class_like() {
            tracing::debug!(symbol = %info.name, kind = ?info.kind, "ignoring marker on non-class declaration");
            continue;
        }
        if nests_resolved(source, id, &markers.nest) {
            result.ready.push(id);
        } else {
            result.deferred.push(id);
        }
    }
    tracing::info!(
        ready = result.ready.len(),
        deferred = result.deferred.len(),
        "scanned config models"
    );
    result
}

/// Whether `root` and every nested section it reaches are fully resolved.
fn nests_resolved<S>(source: &S, root: DeclarationId, nest_marker: &str) -> bool
where
    S: SymbolSource + ?Sized,
{
    let mut seen = BTreeSet::from([root]);
    let mut pending = vec![root];
    while let Some(id) = pending.pop() {
        if !source.is_fully_resolved(id) {
            return false;
        }
        let targets = source
            .list_properties(id)
            .into_iter()
            .filter(|property| source.has_annotation(Annotated::Property(*property), nest_marker))
            .filter_map(|property| nest_target(source, &source.resolve_type(property)));
        for target in targets {
            if seen.insert(target) {
                pending.push(target);
            }
        }
    }
    true
}
