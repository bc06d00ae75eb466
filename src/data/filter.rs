use std::collections::BTreeSet;

use super::model::Variant;

// ---------------------------------------------------------------------------
// View selection: which parameters and variants a rendering pass shows
// ---------------------------------------------------------------------------

/// Selected K values. An empty set means nothing is shown.
pub type ParameterFilter = BTreeSet<u32>;

/// Initialise a [`ParameterFilter`] with every parameter selected.
pub fn init_filter_state<'a>(parameters: impl IntoIterator<Item = &'a u32>) -> ParameterFilter {
    parameters.into_iter().copied().collect()
}

/// Variants kept by a pass that excludes `exclude`, in canonical order.
pub fn included_variants(exclude: &BTreeSet<Variant>) -> Vec<Variant> {
    Variant::ALL
        .into_iter()
        .filter(|v| !exclude.contains(v))
        .collect()
}

/// Parameters from `available` that pass `filter`, ascending.
pub fn visible_parameters(available: &[u32], filter: &ParameterFilter) -> Vec<u32> {
    available
        .iter()
        .copied()
        .filter(|k| filter.contains(k))
        .collect()
}
