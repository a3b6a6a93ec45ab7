//! Core types for the localized timezone dataset.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Locale used when nothing else is available.
pub const DEFAULT_LOCALE: &str = "en";

/// Display strings for one timezone: city name, standard-time label,
/// daylight-time label.
///
/// Serialised as a three-element JSON array, e.g. `["Rome", "CET", "CEST"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimezoneValue(String, String, String);

impl TimezoneValue {
    pub fn new(
        city: impl Into<String>,
        standard_time: impl Into<String>,
        daylight_time: impl Into<String>,
    ) -> Self {
        Self(city.into(), standard_time.into(), daylight_time.into())
    }

    pub fn city(&self) -> &str {
        &self.0
    }

    pub fn standard_time(&self) -> &str {
        &self.1
    }

    pub fn daylight_time(&self) -> &str {
        &self.2
    }
}

impl fmt::Display for TimezoneValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} / {})", self.0, self.1, self.2)
    }
}

/// City id → shared value.
pub type CityTable = IndexMap<String, Arc<TimezoneValue>>;

/// Locale → shared city table.
pub type LocaleTable = IndexMap<String, Arc<CityTable>>;

/// Single-locale source shape: region → city id → value.
pub type RawTimezones = IndexMap<String, IndexMap<String, Arc<TimezoneValue>>>;

/// Region → locale → city → value.
///
/// Key order is insertion order. "The first region" is the first one
/// inserted (or the first one in the JSON object it was loaded from).
/// Cloning is shallow: city tables and values are shared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimezoneData {
    regions: IndexMap<String, LocaleTable>,
}

impl TimezoneData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a whole region.
    pub fn insert_region(&mut self, region: impl Into<String>, locales: LocaleTable) {
        self.regions.insert(region.into(), locales);
    }

    pub fn regions(&self) -> impl Iterator<Item = (&String, &LocaleTable)> {
        self.regions.iter()
    }

    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn region(&self, region: &str) -> Option<&LocaleTable> {
        self.regions.get(region)
    }

    pub fn first_region(&self) -> Option<(&String, &LocaleTable)> {
        self.regions.first()
    }

    pub fn locale(&self, region: &str, locale: &str) -> Option<&Arc<CityTable>> {
        self.region(region)?.get(locale)
    }

    pub fn city(&self, region: &str, locale: &str, city: &str) -> Option<&Arc<TimezoneValue>> {
        self.locale(region, locale)?.get(city)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Compare every region's locale set against the first region's.
    ///
    /// The query functions assume all regions share one locale set; this
    /// reports the regions that don't. An empty result means the dataset
    /// is uniform.
    pub fn check_uniform_locales(&self) -> Vec<LocaleMismatch> {
        let Some((_, reference)) = self.first_region() else {
            return Vec::new();
        };

        self.regions
            .iter()
            .skip(1)
            .filter_map(|(region, locales)| {
                let missing: Vec<String> = reference
                    .keys()
                    .filter(|l| !locales.contains_key(*l))
                    .cloned()
                    .collect();
                let extra: Vec<String> = locales
                    .keys()
                    .filter(|l| !reference.contains_key(*l))
                    .cloned()
                    .collect();
                if missing.is_empty() && extra.is_empty() {
                    None
                } else {
                    Some(LocaleMismatch {
                        region: region.clone(),
                        missing,
                        extra,
                    })
                }
            })
            .collect()
    }
}

impl FromIterator<(String, LocaleTable)> for TimezoneData {
    fn from_iter<I: IntoIterator<Item = (String, LocaleTable)>>(iter: I) -> Self {
        Self {
            regions: iter.into_iter().collect(),
        }
    }
}

/// A region whose locale set differs from the first region's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleMismatch {
    pub region: String,
    /// Locales the first region has and this one lacks.
    pub missing: Vec<String>,
    /// Locales this region has and the first one lacks.
    pub extra: Vec<String>,
}

impl fmt::Display for LocaleMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region '{}'", self.region)?;
        if !self.missing.is_empty() {
            write!(f, " missing [{}]", self.missing.join(", "))?;
        }
        if !self.extra.is_empty() {
            write!(f, " extra [{}]", self.extra.join(", "))?;
        }
        Ok(())
    }
}

/// Query errors.
///
/// Unknown locales and cities are not errors: they resolve through the
/// fallback locale or to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The dataset has no regions, so there is no locale set to sample.
    EmptyDataset,
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDataset => write!(f, "Timezone dataset has no regions"),
        }
    }
}

impl std::error::Error for LookupError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str, &str, &str)]) -> Arc<CityTable> {
        Arc::new(
            entries
                .iter()
                .map(|(id, city, standard, daylight)| {
                    (id.to_string(), Arc::new(TimezoneValue::new(*city, *standard, *daylight)))
                })
                .collect(),
        )
    }

    #[test]
    fn test_value_serializes_as_array() {
        let v = TimezoneValue::new("Rome", "CET", "CEST");
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"["Rome","CET","CEST"]"#);
        assert_eq!(v.city(), "Rome");
        assert_eq!(v.standard_time(), "CET");
        assert_eq!(v.daylight_time(), "CEST");
    }

    #[test]
    fn test_value_rejects_partial_triple() {
        assert!(serde_json::from_str::<TimezoneValue>(r#"["Rome","CET"]"#).is_err());
        assert!(serde_json::from_str::<TimezoneValue>(r#"["Rome","CET","CEST","x"]"#).is_err());
    }

    #[test]
    fn test_data_preserves_json_order() {
        let json = r#"{
            "Pacific": {"en": {}},
            "Africa": {"en": {}},
            "Europe": {"en": {}}
        }"#;
        let data: TimezoneData = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = data.region_names().collect();
        assert_eq!(names, vec!["Pacific", "Africa", "Europe"]);
        assert_eq!(data.first_region().unwrap().0, "Pacific");
    }

    #[test]
    fn test_nested_accessors() {
        let mut data = TimezoneData::new();
        let mut locales = LocaleTable::new();
        locales.insert("en".into(), table(&[("Europe/Rome", "Rome", "CET", "CEST")]));
        data.insert_region("Europe", locales);

        assert!(data.city("Europe", "en", "Europe/Rome").is_some());
        assert!(data.city("Europe", "it", "Europe/Rome").is_none());
        assert!(data.city("Asia", "en", "Europe/Rome").is_none());
        assert!(data.locale("Europe", "en").is_some());
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_uniform_locales_report() {
        let mut data = TimezoneData::new();
        let mut eu = LocaleTable::new();
        eu.insert("en".into(), table(&[]));
        eu.insert("it".into(), table(&[]));
        data.insert_region("Europe", eu);

        let mut asia = LocaleTable::new();
        asia.insert("en".into(), table(&[]));
        asia.insert("ja".into(), table(&[]));
        data.insert_region("Asia", asia);

        let report = data.check_uniform_locales();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].region, "Asia");
        assert_eq!(report[0].missing, vec!["it".to_string()]);
        assert_eq!(report[0].extra, vec!["ja".to_string()]);
        assert_eq!(report[0].to_string(), "region 'Asia' missing [it] extra [ja]");
    }

    #[test]
    fn test_uniform_locales_empty_dataset() {
        assert!(TimezoneData::new().check_uniform_locales().is_empty());
    }
}
