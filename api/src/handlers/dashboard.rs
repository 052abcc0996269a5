//! Dashboard handler

use axum::{extract::State, Json};

use crate::app::DashboardSummary;
use crate::domain::ports::ProducerRepository;
use crate::error::AppError;
use crate::AppState;

/// GET /producers/dashboard
///
/// Aggregated farm, area, state and crop statistics.
pub async fn get_dashboard<R: ProducerRepository + 'static>(
    State(state): State<AppState<R>>,
) -> Result<Json<DashboardSummary>, AppError> {
    let summary = state.dashboard_service.get_dashboard().await?;
    Ok(Json(summary))
}
