//! JSON dataset files.
//!
//! Two shapes are understood:
//!   raw:       { region: { city_id: [city, std, dst] } }
//!   localized: { region: { locale: { city_id: [city, std, dst] } } }
//! Object order is preserved. Default location: ~/.tz-locale/timezones.json.

use super::convert::convert_original_to_localized;
use super::types::{RawTimezones, TimezoneData};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Dataset loading errors.
#[derive(Debug)]
pub enum DatasetError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, message: String },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "Cannot access '{}': {}", path.display(), source),
            Self::Parse { path, message } => write!(f, "Invalid dataset '{}': {}", path.display(), message),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}

/// Which of the two file shapes a document has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetShape {
    Raw,
    Localized,
}

/// Default dataset path (~/.tz-locale/timezones.json).
pub fn default_data_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tz-locale")
        .join("timezones.json")
}

fn read_file(path: &Path) -> Result<String, DatasetError> {
    fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_error(path: &Path, e: impl fmt::Display) -> DatasetError {
    DatasetError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Load a raw single-locale file.
pub fn load_raw(path: &Path) -> Result<RawTimezones, DatasetError> {
    let data = read_file(path)?;
    serde_json::from_str(&data).map_err(|e| parse_error(path, e))
}

/// Load a localized file.
pub fn load_localized(path: &Path) -> Result<TimezoneData, DatasetError> {
    let data = read_file(path)?;
    serde_json::from_str(&data).map_err(|e| parse_error(path, e))
}

/// Load either shape, converting raw files to the localized one.
pub fn load_any(path: &Path) -> Result<TimezoneData, DatasetError> {
    let text = read_file(path)?;
    let doc: Value = serde_json::from_str(&text).map_err(|e| parse_error(path, e))?;

    let shape = detect_shape(&doc).ok_or_else(|| {
        parse_error(path, "expected an object of regions holding either locales or [city, std, dst] triples")
    })?;
    debug!(path = %path.display(), ?shape, "detected dataset shape");

    let data = match shape {
        DatasetShape::Localized => {
            serde_json::from_value::<TimezoneData>(doc).map_err(|e| parse_error(path, e))?
        }
        DatasetShape::Raw => {
            let raw: RawTimezones = serde_json::from_value(doc).map_err(|e| parse_error(path, e))?;
            convert_original_to_localized(&raw)
        }
    };

    info!(path = %path.display(), regions = data.len(), "loaded timezone dataset");
    Ok(data)
}

/// Classify a document by its first non-empty region.
///
/// Region members that are arrays mean raw, objects mean localized. A
/// document with regions that are all empty is raw: a localized region
/// without locales carries nothing, while a raw one still becomes an
/// empty `"en"` table. `{}` is an empty localized dataset.
pub fn detect_shape(doc: &Value) -> Option<DatasetShape> {
    let regions = doc.as_object()?;
    if regions.is_empty() {
        return Some(DatasetShape::Localized);
    }

    let mut first_member = None;
    for region in regions.values() {
        if let Some(member) = region.as_object()?.values().next() {
            first_member = Some(member);
            break;
        }
    }

    match first_member {
        None => Some(DatasetShape::Raw),
        Some(Value::Array(_)) => Some(DatasetShape::Raw),
        Some(Value::Object(_)) => Some(DatasetShape::Localized),
        Some(_) => None,
    }
}

/// Write any dataset as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| DatasetError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    let json = serde_json::to_string_pretty(data).map_err(|e| parse_error(path, e))?;
    fs::write(path, json).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}
