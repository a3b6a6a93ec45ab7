//! Locale-aware timezone display dataset.
//!
//! Data is organised region → locale → city → [`TimezoneValue`]. This
//! module converts single-locale sources into that shape and answers
//! locale queries over it with a single fallback step.

pub mod convert;
pub mod loader;
pub mod query;
pub mod types;

pub use convert::convert_original_to_localized;
pub use loader::{default_data_path, load_any, load_localized, load_raw, write_json, DatasetError};
pub use query::{available_locales, timezone_data_for_locale, timezone_data_for_locales, timezone_value_for_city};
pub use types::{
    CityTable, LocaleMismatch, LocaleTable, LookupError, RawTimezones, TimezoneData, TimezoneValue,
    DEFAULT_LOCALE,
};
