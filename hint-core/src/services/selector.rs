use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

use crate::model::hint::{HintCatalog, HintRecord, SelectMode};

/// Picks one record. Never fails: a loaded catalog always has at least one.
pub fn select_hint(catalog: &HintCatalog, mode: SelectMode) -> &HintRecord {
    select_hint_with(catalog, mode, &mut thread_rng())
}

/// `select_hint` with a caller-supplied entropy source.
pub fn select_hint_with<'a, R: Rng + ?Sized>(
    catalog: &'a HintCatalog,
    mode: SelectMode,
    rng: &mut R,
) -> &'a HintRecord {
    let records = catalog.records();

    match mode {
        SelectMode::Sequential(index) => &records[index % records.len()],
        SelectMode::Random => records.choose(rng).unwrap_or(&records[0]),
    }
}
