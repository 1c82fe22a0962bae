use crate::api::{ApiResponse, AppError, AppState};
use crate::tracker::model::{Domain, Project};
use axum::extract::{Path, State};

pub async fn list_domains(
    State(app_state): State<AppState>,
) -> Result<ApiResponse<Vec<Domain>>, AppError> {
    ApiResponse::from(app_state.tracker.list_active_domains().await)
}

/// Projects of a domain that can receive imports.
pub async fn list_projects(
    Path(domain_id): Path<i64>,
    State(app_state): State<AppState>,
) -> Result<ApiResponse<Vec<Project>>, AppError> {
    let result = app_state
        .tracker
        .list_projects_by_domain(domain_id)
        .await
        .map(|projects| projects.into_iter().filter(Project::is_active).collect::<Vec<_>>());
    ApiResponse::from(result)
}
