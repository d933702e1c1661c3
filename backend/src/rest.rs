use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use shared::{HistoryRequest, VerifyRequest};
use tracing::info;

use crate::domain::calendar::CalendarService;
use crate::domain::news::NewsService;
use crate::domain::validation;
use crate::domain::verification::VerificationService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub verification: VerificationService,
    pub calendar: CalendarService,
    pub news: NewsService,
}

impl AppState {
    /// Wire every service to the same snapshot path.
    pub fn new(db_path: &str) -> Self {
        Self {
            verification: VerificationService::new(db_path),
            calendar: CalendarService::new(db_path),
            news: NewsService::new(db_path),
        }
    }
}

/// Axum handler for POST /api/verify.
///
/// Validation failures come back as a 422 with the aggregated message list;
/// the match outcome itself is always a 200 (absence and mismatch are data).
/// The current period and nothing else is read from the clock here, in UTC.
pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> impl IntoResponse {
    info!("POST /api/verify - unit: {}", request.unit_number);

    let record = match validation::to_identity_record(&request) {
        Ok(record) => record,
        Err(errors) => {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(messages)).into_response();
        }
    };

    let now = Utc::now();
    match state.verification.verify(&record, (now.year(), now.month())).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            tracing::error!("Error verifying tenant: {:?}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Store unavailable").into_response()
        }
    }
}

/// Query parameters for the history endpoint.
#[derive(Deserialize, Debug)]
pub struct HistoryQueryParams {
    pub unit_number: String,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Axum handler for GET /api/history.
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQueryParams>,
) -> impl IntoResponse {
    info!("GET /api/history - query: {:?}", params);

    if params.unit_number.trim().is_empty() {
        return (StatusCode::UNPROCESSABLE_ENTITY, "Unit number is required").into_response();
    }
    let request = HistoryRequest {
        unit_number: params.unit_number.trim().to_string(),
        from: params.from,
        to: params.to,
    };

    match state.verification.history(&request).await {
        Ok(payments) => (StatusCode::OK, Json(payments)).into_response(),
        Err(e) => {
            tracing::error!("Error loading history: {:?}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Store unavailable").into_response()
        }
    }
}

/// Query parameters for the calendar endpoint.
#[derive(Deserialize, Debug)]
pub struct CalendarQueryParams {
    pub year: i32,
    /// 1-based month
    pub month: u32,
}

/// Axum handler for GET /api/calendar. "Today" is read here, in UTC, and
/// injected into the layout.
pub async fn calendar_month(
    State(state): State<AppState>,
    Query(params): Query<CalendarQueryParams>,
) -> impl IntoResponse {
    info!("GET /api/calendar - {}/{}", params.month, params.year);

    if !(1..=12).contains(&params.month) {
        return (StatusCode::BAD_REQUEST, "month must be between 1 and 12").into_response();
    }

    let now = Utc::now();
    let today = (now.year(), now.month(), now.day());
    match state.calendar.month_view(params.year, params.month, Some(today)).await {
        Ok(grid) => (StatusCode::OK, Json(grid)).into_response(),
        Err(e) => {
            tracing::error!("Error building calendar: {:?}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Store unavailable").into_response()
        }
    }
}

/// Axum handler for GET /api/news.
pub async fn news(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/news");

    match state.news.latest().await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => {
            tracing::error!("Error loading news: {:?}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Store unavailable").into_response()
        }
    }
}
