use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::api::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

/// Readiness plus the engine settings requests will run with by default.
pub async fn ready(State(state): State<AppState>) -> Json<serde_json::Value> {
    let settings = state.config.engine_settings();
    Json(json!({
        "status": "ready",
        "annualizationMethod": settings.annualization,
        "topTickerLimit": settings.top_ticker_limit,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_health_returns_ok() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_ready_reports_default_settings() {
        let Json(body) = ready(State(AppState::new(Config::default()))).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["annualizationMethod"], "timePeriod");
        assert_eq!(body["topTickerLimit"], 5);
    }
}
