use axum::extract::State;
use axum::Json;

use crate::api::report::accept_snapshot;
use crate::api::AppState;
use crate::domain::Snapshot;
use crate::engine::{transaction_metrics, TransactionMetrics};
use crate::error::AppError;

pub async fn post_transaction_metrics(
    State(state): State<AppState>,
    Json(snapshot): Json<Snapshot>,
) -> Result<Json<Vec<TransactionMetrics>>, AppError> {
    accept_snapshot(&snapshot)?;
    Ok(Json(transaction_metrics(&snapshot, state.clock.as_ref())))
}
