//! tz_locale: locale-aware timezone display data.
//!
//! Converts a single-locale timezone dataset into a region → locale →
//! city structure, looks up individual cities with locale fallback, and
//! builds locale-restricted views for one or several locales.

pub mod localized;
pub mod server;

pub use localized::{
    available_locales, convert_original_to_localized, timezone_data_for_locale, timezone_data_for_locales,
    timezone_value_for_city, LookupError, TimezoneData, TimezoneValue, DEFAULT_LOCALE,
};
