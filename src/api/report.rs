use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::str::FromStr;

use crate::api::AppState;
use crate::domain::Snapshot;
use crate::engine::{build_report, check_chain_consistency, AnnualizationMethod, PerformanceReport};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    /// Overrides the configured method for this request only.
    pub annualization_method: Option<String>,
}

/// Reject duplicate ids and log chain inconsistencies; the numbers are
/// computed either way.
pub(crate) fn accept_snapshot(snapshot: &Snapshot) -> Result<(), AppError> {
    snapshot.validate()?;
    for issue in check_chain_consistency(snapshot) {
        tracing::warn!(%issue, "Chain inconsistency in snapshot");
    }
    Ok(())
}

fn parse_method(input: &str) -> Result<AnnualizationMethod, AppError> {
    AnnualizationMethod::from_str(input).map_err(|_| {
        AppError::BadRequest(
            "Invalid annualizationMethod: expected time_period or trade_weighted".to_string(),
        )
    })
}

pub async fn post_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<PerformanceReport>, AppError> {
    let mut settings = state.config.engine_settings();
    if let Some(raw) = request.annualization_method.as_deref() {
        settings = settings.with_annualization(parse_method(raw)?);
    }

    let snapshot = request.snapshot;
    accept_snapshot(&snapshot)?;

    let clock = state.clock.clone();
    let report = tokio::task::spawn_blocking(move || build_report(&snapshot, &settings, &*clock))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(report))
}
