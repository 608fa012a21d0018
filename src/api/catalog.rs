//! Catalog home page

use axum::extract::State;

use super::View;
use crate::{error::AppResult, services::books::DashboardCounts, AppState};

/// Catalog home page with record counts
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "catalog",
    responses(
        (status = 200, description = "Title and catalog counts", body = DashboardCounts),
        (status = 500, description = "A count failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn index(State(state): State<AppState>) -> AppResult<View<DashboardCounts>> {
    let counts = state.services.books.dashboard_counts().await?;
    Ok(View::new("Local Library Home", counts))
}
