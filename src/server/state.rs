use crate::localized::TimezoneData;

/// Shared, read-only server state.
pub struct AppState {
    pub data: TimezoneData,
}
