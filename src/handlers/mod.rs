pub mod change_documents;
pub mod jobs;
pub mod projects;


#[cfg(test)]
mod jobs_http_tests;


use actix_web::{HttpRequest, HttpResponse, error, web};
use serde::Serialize;
use tracing::debug;

use crate::AppState;
use crate::error::AppError;
use crate::models::{DEFAULT_LIMIT, DEFAULT_PAGE, ListResponse};
use crate::services::{Predicate, filter, paginate};

pub use change_documents::configure_change_document_routes;
pub use jobs::configure_job_routes;
pub use projects::configure_project_routes;

/// Filter `items`, cut out the requested page and wrap it with the echoed filters
fn list_response<T, F>(items: Vec<T>, filters: F, page: Option<u32>, limit: Option<u32>) -> HttpResponse
where
    T: Clone + Serialize,
    F: Predicate<T> + Serialize,
{
    let matched = filter(&items, &filters);
    let page = paginate(
        &matched,
        page.unwrap_or(DEFAULT_PAGE),
        limit.unwrap_or(DEFAULT_LIMIT),
    );
    debug!(
        fetched = items.len(),
        matched = page.pagination.total,
        returned = page.data.len(),
        "Served list page"
    );

    HttpResponse::Ok().json(ListResponse::new(page, filters))
}

fn query_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = req.path(), error = %err, "Rejected malformed query string");
    AppError::Validation(format!("Invalid query parameter: {err}")).into()
}

fn path_error(err: error::PathError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = req.path(), error = %err, "Rejected malformed path parameter");
    AppError::Validation(format!("Invalid path parameter: {err}")).into()
}

/// GET /health
///
/// Liveness probe reporting the active data mode.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "ci-monitor",
        "mode": state.data_source.mode().as_str(),
    }))
}

/// Configure every `/api` route group along with JSON extractor errors
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .configure(configure_change_document_routes)
        .configure(configure_job_routes)
        .configure(configure_project_routes);
}
