use crate::api::{ApiResponse, AppError, AppState};
use crate::tracker::service::TrackerService;
use crate::upload::model::{
    ImportOutcome, ImportTarget, UploadError, UploadFile, ACCEPTED_MIME_TYPES, MAX_FILE_SIZE, XLSX_MIME_TYPE,
};
use crate::upload::service::{run_bulk_upload, BulkUploadCommand};
use crate::upload::template::{build_template, template_file_name};
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

fn parse_id(field: &str, raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{} must be a number", field)))
}

fn map_multipart_error(error: MultipartError) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return UploadError::FileTooLarge(MAX_FILE_SIZE + 1).into();
    }
    AppError::Validation(error.body_text())
}

/// Reads the file field chunk by chunk, stopping as soon as it outgrows the size limit.
async fn read_file(mut field: Field<'_>) -> Result<UploadFile, AppError> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();
    if !ACCEPTED_MIME_TYPES.contains(&content_type.as_str()) {
        return Err(UploadError::InvalidFileType(content_type).into());
    }
    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(map_multipart_error)? {
        data.extend_from_slice(&chunk);
        if data.len() > MAX_FILE_SIZE {
            return Err(UploadError::FileTooLarge(data.len()).into());
        }
    }
    Ok(UploadFile {
        file_name,
        content_type,
        data,
    })
}

pub async fn bulk_upload(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<ApiResponse<ImportOutcome>, AppError> {
    let mut provided_file: Option<UploadFile> = None;
    let mut project_id: Option<i64> = None;
    let mut default_tester_id: Option<i64> = None;
    let mut domain_id: Option<i64> = None;

    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => provided_file = Some(read_file(field).await?),
            "projectId" | "defaultTesterId" | "domainId" => {
                let text = field.text().await.map_err(map_multipart_error)?;
                let id = parse_id(&name, &text)?;
                match name.as_str() {
                    "projectId" => project_id = Some(id),
                    "defaultTesterId" => default_tester_id = Some(id),
                    _ => domain_id = Some(id),
                }
            }
            _ => {}
        }
    }

    let file = provided_file.ok_or_else(|| AppError::Validation("file is required".to_string()))?;
    let target = ImportTarget::builder()
        .project_id(project_id.ok_or_else(|| AppError::Validation("projectId is required".to_string()))?)
        .default_tester_id(
            default_tester_id
                .ok_or_else(|| AppError::Validation("defaultTesterId is required".to_string()))?,
        )
        .maybe_domain_id(domain_id)
        .build();

    let result = run_bulk_upload(app_state.tracker, BulkUploadCommand { file, target }).await;
    ApiResponse::from(result)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateParams {
    pub domain_id: Option<i64>,
    pub project_id: Option<i64>,
}

async fn selection_names(
    tracker: &dyn TrackerService,
    params: &TemplateParams,
) -> (Option<String>, Option<String>) {
    let Some(domain_id) = params.domain_id else {
        return (None, None);
    };
    let domain = match tracker.list_active_domains().await {
        Ok(domains) => domains.into_iter().find(|d| d.id == domain_id).map(|d| d.name),
        Err(error) => {
            warn!("domain lookup failed: {}", error);
            None
        }
    };
    let project = match params.project_id {
        None => None,
        Some(project_id) => match tracker.list_projects_by_domain(domain_id).await {
            Ok(projects) => projects.into_iter().find(|p| p.id == project_id).map(|p| p.name),
            Err(error) => {
                warn!("project lookup failed: {}", error);
                None
            }
        },
    };
    (domain, project)
}

pub async fn download_template(
    State(app_state): State<AppState>,
    Query(params): Query<TemplateParams>,
) -> Result<impl IntoResponse, AppError> {
    let (domain, project) = selection_names(app_state.tracker.as_ref(), &params).await;
    let file_name = template_file_name(
        domain.as_deref(),
        project.as_deref(),
        Utc::now().date_naive(),
    );
    let data = build_template().map_err(|e| AppError::Internal(e.to_string()))?;
    Ok((
        [
            (CONTENT_TYPE, XLSX_MIME_TYPE.to_string()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file_name)),
        ],
        data,
    ))
}
