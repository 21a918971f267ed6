//! Change document handlers

use actix_web::{HttpRequest, HttpResponse, web};
use tracing::debug;

use super::list_response;
use crate::AppState;
use crate::error::AppError;
use crate::models::ChangeDocumentQuery;

/// GET /api/change-documents
///
/// Query Parameters:
/// - page, limit: pagination, default 1 and 10
/// - status, ciType, repository, ciStatus: exact match
/// - search: case-insensitive match on id, change number, title or owner
pub async fn list_change_documents(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ChangeDocumentQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let docs = state
        .data_source
        .change_documents(req.query_string())
        .await?;

    Ok(list_response(docs, query.filters(), query.page, query.limit))
}

/// GET /api/change-documents/{id}
///
/// Accepts either the document `_id` or its change number.
pub async fn get_change_document(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    match state.data_source.change_document(&id).await? {
        Some(doc) => Ok(HttpResponse::Ok().json(doc)),
        None => {
            debug!(id, "Change document not found");
            Err(AppError::NotFound("Change document not found".to_string()))
        }
    }
}

/// GET /api/change-documents/{id}/projects
pub async fn get_change_document_projects(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let change_id = path.into_inner();

    state
        .data_source
        .change_document_projects(&change_id)
        .await?
        .map(|projects| HttpResponse::Ok().json(projects))
        .ok_or_else(|| AppError::NotFound("Projects not found".to_string()))
}

/// Configure change document routes
pub fn configure_change_document_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/change-documents")
            .route("", web::get().to(list_change_documents))
            .route("/{id}", web::get().to(get_change_document))
            .route("/{id}/projects", web::get().to(get_change_document_projects)),
    );
}
