//! Locale-aware queries over a [`TimezoneData`].
//!
//! Locale availability is sampled from the first region and assumed to
//! hold for the whole dataset (see [`TimezoneData::check_uniform_locales`]).
//! Requested locales that are unavailable fall back once; unknown cities
//! resolve to `None`.

use super::types::{LocaleTable, LookupError, TimezoneData, TimezoneValue, DEFAULT_LOCALE};
use std::sync::Arc;
use tracing::{debug, warn};

// ─── Locale resolution ──────────────────────────────────────────

/// `locale` when the first region has it, otherwise `fallback_locale`
/// (used as given, without checking it in turn).
fn resolve_target_locale<'a>(
    locale: &'a str,
    fallback_locale: &'a str,
    data: &TimezoneData,
) -> Result<&'a str, LookupError> {
    let (_, sample) = data.first_region().ok_or(LookupError::EmptyDataset)?;
    if sample.contains_key(locale) {
        return Ok(locale);
    }
    debug!(requested = locale, fallback = fallback_locale, "locale unavailable, using fallback");
    Ok(fallback_locale)
}

// ─── Single value ───────────────────────────────────────────────

/// Look up one city's display strings in the requested locale.
///
/// Regions are scanned in order and the first match wins, so a city id
/// present in several regions resolves to the earliest region.
pub fn timezone_value_for_city(
    locale: &str,
    city: &str,
    fallback_locale: &str,
    data: &TimezoneData,
) -> Result<Option<Arc<TimezoneValue>>, LookupError> {
    let target = resolve_target_locale(locale, fallback_locale, data)?;

    Ok(data
        .region_names()
        .find_map(|region| data.city(region, target, city))
        .cloned())
}

// ─── Locale enumeration ─────────────────────────────────────────

/// Locale keys of the first region, in their stored order.
pub fn available_locales(data: &TimezoneData) -> Result<Vec<String>, LookupError> {
    let (_, sample) = data.first_region().ok_or(LookupError::EmptyDataset)?;
    Ok(sample.keys().cloned().collect())
}

// ─── Filtered views ─────────────────────────────────────────────

/// Restrict every region to a single locale.
///
/// Each output region holds exactly one key, the resolved target locale.
/// Its table is the region's own table for that locale, or the region's
/// `fallback_locale` table when it lacks one. A region with neither is
/// kept with no table at all rather than an empty one.
pub fn timezone_data_for_locale(
    locale: &str,
    fallback_locale: &str,
    data: &TimezoneData,
) -> Result<TimezoneData, LookupError> {
    let target = resolve_target_locale(locale, fallback_locale, data)?;

    Ok(data
        .regions()
        .map(|(region, locales)| {
            let mut filtered = LocaleTable::with_capacity(1);
            match locales.get(target).or_else(|| locales.get(fallback_locale)) {
                Some(table) => {
                    filtered.insert(target.to_string(), Arc::clone(table));
                }
                None => warn!(
                    region = %region,
                    locale = target,
                    fallback = fallback_locale,
                    "region has neither the requested nor the fallback locale"
                ),
            }
            (region.clone(), filtered)
        })
        .collect())
}

/// Restrict every region to the requested locales it actually has.
///
/// Locales are kept in request order; duplicates are ignored. A region
/// left with nothing falls back to [`DEFAULT_LOCALE`] when it has it.
/// Regions are never dropped: one with neither a requested locale nor
/// the default ends up empty, which is logged.
pub fn timezone_data_for_locales<S: AsRef<str>>(locales: &[S], data: &TimezoneData) -> TimezoneData {
    data.regions()
        .map(|(region, available)| {
            let mut filtered = LocaleTable::new();
            for locale in locales {
                let locale: &str = locale.as_ref();
                if filtered.contains_key(locale) {
                    continue;
                }
                if let Some(table) = available.get(locale) {
                    filtered.insert(locale.to_string(), Arc::clone(table));
                }
            }

            if filtered.is_empty() {
                match available.get(DEFAULT_LOCALE) {
                    Some(table) => {
                        filtered.insert(DEFAULT_LOCALE.to_string(), Arc::clone(table));
                    }
                    None => warn!(
                        region = %region,
                        requested = ?locales.iter().map(|l| l.as_ref()).collect::<Vec<&str>>(),
                        "no requested locale and no default locale for region; leaving it empty"
                    ),
                }
            }

            (region.clone(), filtered)
        })
        .collect()
}
