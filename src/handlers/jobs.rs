//! Job handlers
//!
//! Jobs are addressed either by job id or by job name plus build number.

use actix_web::{HttpRequest, HttpResponse, web};
use tracing::debug;

use super::list_response;
use crate::AppState;
use crate::error::AppError;
use crate::models::{BuildQuery, JobQuery};

/// GET /api/jobs
///
/// Query Parameters:
/// - page, limit: pagination, default 1 and 10
/// - status, projectId, jobType, buildType, changeNumber: exact match
/// - search: case-insensitive match on job id, job name, project name or commit
pub async fn list_jobs(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<JobQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let jobs = state.data_source.jobs(req.query_string()).await?;

    Ok(list_response(jobs, query.filters(), query.page, query.limit))
}

/// GET /api/jobs/by-id/{id}
pub async fn get_job_by_id(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    match state.data_source.job(&id).await? {
        Some(job) => Ok(HttpResponse::Ok().json(job)),
        None => {
            debug!(id, "Job not found");
            Err(AppError::NotFound("Job not found".to_string()))
        }
    }
}

/// GET /api/jobs/by-name/{jobName}/builds
///
/// Builds of one job, newest first. Only `status` filters.
pub async fn list_builds(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<BuildQuery>,
) -> Result<HttpResponse, AppError> {
    let job_name = path.into_inner();
    let query = query.into_inner();
    let builds = state
        .data_source
        .builds(&job_name, req.query_string())
        .await?;

    Ok(list_response(builds, query.filters(), query.page, query.limit))
}

/// GET /api/jobs/by-name/{jobName}/builds/{buildNum}
pub async fn get_build(
    state: web::Data<AppState>,
    path: web::Path<(String, u32)>,
) -> Result<HttpResponse, AppError> {
    let (job_name, build_num) = path.into_inner();

    state
        .data_source
        .build(&job_name, build_num)
        .await?
        .map(|build| HttpResponse::Ok().json(build))
        .ok_or_else(|| AppError::NotFound("Build not found".to_string()))
}

/// GET /api/jobs/by-name/{jobName}/builds/{buildNum}/stages/{stageName}
pub async fn get_stage(
    state: web::Data<AppState>,
    path: web::Path<(String, u32, String)>,
) -> Result<HttpResponse, AppError> {
    let (job_name, build_num, stage_name) = path.into_inner();

    state
        .data_source
        .stage(&job_name, build_num, &stage_name)
        .await?
        .map(|stage| HttpResponse::Ok().json(stage))
        .ok_or_else(|| AppError::NotFound("Stage not found".to_string()))
}

/// Configure job routes
pub fn configure_job_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/jobs")
            .route("", web::get().to(list_jobs))
            .route("/by-id/{id}", web::get().to(get_job_by_id))
            .route("/by-name/{jobName}/builds", web::get().to(list_builds))
            .route("/by-name/{jobName}/builds/{buildNum}", web::get().to(get_build))
            .route(
                "/by-name/{jobName}/builds/{buildNum}/stages/{stageName}",
                web::get().to(get_stage),
            ),
    );
}
