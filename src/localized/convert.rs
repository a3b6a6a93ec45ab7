//! Single-locale source → localized dataset.

use super::types::{CityTable, LocaleTable, RawTimezones, TimezoneData, DEFAULT_LOCALE};
use std::sync::Arc;
use tracing::debug;

/// Reshape a region → city → value source into region → `"en"` → city → value.
///
/// Every source region appears in the output, including regions with no
/// cities (they get an empty `"en"` table). City order is preserved and
/// values are shared with `raw`, not copied.
pub fn convert_original_to_localized(raw: &RawTimezones) -> TimezoneData {
    let data: TimezoneData = raw
        .iter()
        .map(|(region, cities)| {
            let table: CityTable = cities
                .iter()
                .map(|(id, value)| (id.clone(), Arc::clone(value)))
                .collect();
            let mut locales = LocaleTable::with_capacity(1);
            locales.insert(DEFAULT_LOCALE.to_string(), Arc::new(table));
            (region.clone(), locales)
        })
        .collect();

    debug!(
        regions = data.len(),
        cities = raw.values().map(|c| c.len()).sum::<usize>(),
        "converted single-locale dataset"
    );
    data
}
