//! Project handlers

use actix_web::{HttpRequest, HttpResponse, web};
use tracing::debug;

use super::list_response;
use crate::AppState;
use crate::error::AppError;
use crate::models::{ProjectQuery, StepQuery};

/// GET /api/projects
pub async fn list_projects(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ProjectQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let projects = state.data_source.projects(req.query_string()).await?;

    Ok(list_response(projects, query.filters(), query.page, query.limit))
}

/// GET /api/projects/{id}
pub async fn get_project(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    match state.data_source.project(&id).await? {
        Some(project) => Ok(HttpResponse::Ok().json(project)),
        None => {
            debug!(id, "Project not found");
            Err(AppError::NotFound("Project not found".to_string()))
        }
    }
}

/// GET /api/projects/{id}/steps/{stepName}
///
/// `stepName` matches a step name or step id, ignoring case.
pub async fn get_project_step(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    query: web::Query<StepQuery>,
) -> Result<HttpResponse, AppError> {
    let (project_id, step_name) = path.into_inner();

    state
        .data_source
        .project_step(&project_id, &step_name, query.change_id.as_deref())
        .await?
        .map(|step| HttpResponse::Ok().json(step))
        .ok_or_else(|| AppError::NotFound("Step not found".to_string()))
}

/// GET /api/projects/{id}/steps/{stepName}/job
pub async fn get_project_step_job(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (project_id, step_name) = path.into_inner();

    state
        .data_source
        .project_step_job(&project_id, &step_name)
        .await?
        .map(|job| HttpResponse::Ok().json(job))
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))
}

/// Configure project routes
pub fn configure_project_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/projects")
            .route("", web::get().to(list_projects))
            .route("/{id}", web::get().to(get_project))
            .route("/{id}/steps/{stepName}", web::get().to(get_project_step))
            .route("/{id}/steps/{stepName}/job", web::get().to(get_project_step_job)),
    );
}
