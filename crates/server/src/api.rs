//! Health and manual report trigger endpoints.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vigil_core::UptimeReport;
use vigil_notify::{EmailReportSink, ReportSink};
use vigil_report::compute_report;

use crate::state::AppState;

// ── Shared types ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ApiErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiErrorResponse {
            error: message.into(),
        }),
    )
}

fn bad_gateway(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_GATEWAY,
        Json(ApiErrorResponse {
            error: message.into(),
        }),
    )
}

// ── Handlers ─────────────────────────────────────────────────────

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Parameters for a manually triggered report.
#[derive(Debug, Deserialize)]
pub struct ReportParams {
    /// Window start, RFC 3339.
    pub start_time: String,
    /// Window end, RFC 3339. Defaults to now.
    pub end_time: Option<String>,
    /// Recipient address for the report email.
    pub email: String,
}

/// Run the report pipeline over a caller-chosen window and email the
/// result, returning the report as JSON.
pub async fn trigger_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Result<Json<UptimeReport>, ApiError> {
    let start = parse_timestamp(&params.start_time)
        .ok_or_else(|| bad_request("start_time must be an RFC 3339 timestamp"))?;

    let end = match &params.end_time {
        Some(raw) => parse_timestamp(raw)
            .ok_or_else(|| bad_request("end_time must be an RFC 3339 timestamp"))?,
        None => Utc::now(),
    };

    if start >= end {
        return Err(bad_request("start_time must be before end_time"));
    }

    // Built per request: the recipient is caller-supplied. An invalid
    // address surfaces here as a config error, before any query runs.
    let sink = EmailReportSink::from_config(&state.smtp, &params.email)
        .map_err(|e| bad_request(e.to_string()))?;

    let report = compute_report(&*state.store, &*state.registry, start, end)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "manual report computation failed");
            bad_gateway(e.to_string())
        })?;

    sink.deliver(&report).await.map_err(|e| {
        tracing::error!(error = %e, "manual report delivery failed");
        bad_gateway(e.to_string())
    })?;

    Ok(Json(report))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_with_offset() {
        let t = parse_timestamp("2024-01-01T07:00:00+07:00").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn rejects_bare_dates() {
        assert!(parse_timestamp("2024-01-01").is_none());
    }
}
