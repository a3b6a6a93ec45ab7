use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::localized::{
    available_locales, timezone_data_for_locale, timezone_data_for_locales, timezone_value_for_city,
    LookupError, TimezoneData, DEFAULT_LOCALE,
};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

impl From<LookupError> for ApiError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::EmptyDataset => api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        }
    }
}

// ─── GET /api/health ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub regions: usize,
    pub locales: Vec<String>,
}

pub(super) async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        regions: state.data.len(),
        locales: available_locales(&state.data).unwrap_or_default(),
    })
}

// ─── GET /api/locales ────────────────────────────────────────────

pub(super) async fn locales(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(available_locales(&state.data)?))
}

// ─── GET /api/timezones ──────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct TimezonesQuery {
    pub locale: Option<String>,
    /// Comma-separated; takes precedence over `locale`.
    pub locales: Option<String>,
    pub fallback: Option<String>,
}

pub(super) async fn timezones(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TimezonesQuery>,
) -> Result<Json<TimezoneData>, ApiError> {
    let start = Instant::now();

    let data = if let Some(list) = params.locales.as_deref() {
        let requested = split_locales(list);
        if requested.is_empty() {
            return Err(api_error(StatusCode::BAD_REQUEST, "'locales' must name at least one locale"));
        }
        timezone_data_for_locales(&requested, &state.data)
    } else if let Some(locale) = params.locale.as_deref() {
        let fallback = params.fallback.as_deref().unwrap_or(DEFAULT_LOCALE);
        timezone_data_for_locale(locale, fallback, &state.data)?
    } else {
        state.data.clone()
    };

    info!(
        locale = params.locale.as_deref().unwrap_or("-"),
        locales = params.locales.as_deref().unwrap_or("-"),
        regions = data.len(),
        "GET /api/timezones ({:.1}ms)",
        start.elapsed().as_secs_f64() * 1000.0,
    );
    Ok(Json(data))
}

// ─── GET /api/timezone ───────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct TimezoneQuery {
    pub city: Option<String>,
    pub locale: Option<String>,
    pub fallback: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TimezoneResponse {
    pub id: String,
    pub city: String,
    pub standard_time: String,
    pub daylight_time: String,
}

pub(super) async fn timezone(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TimezoneQuery>,
) -> Result<Json<TimezoneResponse>, ApiError> {
    let city = params.city.as_deref().unwrap_or("").trim();
    if city.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'city' parameter"));
    }
    let locale = params.locale.as_deref().unwrap_or(DEFAULT_LOCALE);
    let fallback = params.fallback.as_deref().unwrap_or(DEFAULT_LOCALE);

    let value = timezone_value_for_city(locale, city, fallback, &state.data)?
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Timezone not found: '{}'", city)))?;
    debug!(city, locale, resolved = %value, "GET /api/timezone");

    Ok(Json(TimezoneResponse {
        id: city.to_string(),
        city: value.city().to_string(),
        standard_time: value.standard_time().to_string(),
        daylight_time: value.daylight_time().to_string(),
    }))
}

// ─── Helpers ─────────────────────────────────────────────────────

fn split_locales(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}
