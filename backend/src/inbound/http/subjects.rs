//! Subjects API handlers.
//!
//! ```text
//! POST /api/v1/subjects {"name":"Math"}
//! GET /api/v1/subjects?keyword=mat
//! GET /api/v1/subjects/{id}
//! PUT /api/v1/subjects/{id} {"name":"Mathematics"}
//! DELETE /api/v1/subjects/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Error, SubjectId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{SubjectRequest, SubjectResponse, collect};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_id;

/// Optional name filter for the subject listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubjectSearchQuery {
    /// Case-insensitive substring of the subject name.
    pub keyword: Option<String>,
}

/// Create a subject.
#[utoipa::path(
    post,
    path = "/api/v1/subjects",
    request_body = SubjectRequest,
    responses(
        (status = 201, description = "Subject created", body = SubjectResponse),
        (status = 400, description = "Invalid or duplicate name", body = Error),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["subjects"],
    operation_id = "createSubject"
)]
#[post("/subjects")]
pub async fn create_subject(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubjectRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(&state.identity).await?;
    let subject = state
        .subjects
        .create(&payload.name, caller)
        .await?;
    Ok(HttpResponse::Created().json(SubjectResponse::from(&subject)))
}

/// List subjects, optionally filtered by name.
#[utoipa::path(
    get,
    path = "/api/v1/subjects",
    params(SubjectSearchQuery),
    responses((status = 200, description = "Subjects", body = [SubjectResponse])),
    tags = ["subjects"],
    operation_id = "listSubjects",
    security([])
)]
#[get("/subjects")]
pub async fn list_subjects(
    state: web::Data<HttpState>,
    query: web::Query<SubjectSearchQuery>,
) -> ApiResult<web::Json<Vec<SubjectResponse>>> {
    let subjects = state.subjects.search(query.keyword.as_deref()).await?;
    Ok(web::Json(collect(&subjects)))
}

/// Fetch one subject.
#[utoipa::path(
    get,
    path = "/api/v1/subjects/{id}",
    params(("id" = String, Path, description = "Subject id")),
    responses(
        (status = 200, description = "Subject", body = SubjectResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["subjects"],
    operation_id = "getSubject",
    security([])
)]
#[get("/subjects/{id}")]
pub async fn get_subject(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<SubjectResponse>> {
    let id: SubjectId = parse_id("id", &path)?;
    let subject = state.subjects.get_by_id(&id).await?;
    Ok(web::Json(SubjectResponse::from(&subject)))
}

/// Rename a subject.
#[utoipa::path(
    put,
    path = "/api/v1/subjects/{id}",
    params(("id" = String, Path, description = "Subject id")),
    request_body = SubjectRequest,
    responses(
        (status = 200, description = "Renamed subject", body = SubjectResponse),
        (status = 400, description = "Invalid or duplicate name", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["subjects"],
    operation_id = "updateSubject"
)]
#[put("/subjects/{id}")]
pub async fn update_subject(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<SubjectRequest>,
) -> ApiResult<web::Json<SubjectResponse>> {
    let id: SubjectId = parse_id("id", &path)?;
    let caller = session.caller(&state.identity).await?;
    let subject = state
        .subjects
        .update(&id, &payload.name, caller)
        .await?;
    Ok(web::Json(SubjectResponse::from(&subject)))
}

/// Delete a subject together with its materials and their ratings.
#[utoipa::path(
    delete,
    path = "/api/v1/subjects/{id}",
    params(("id" = String, Path, description = "Subject id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["subjects"],
    operation_id = "deleteSubject"
)]
#[delete("/subjects/{id}")]
pub async fn delete_subject(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: SubjectId = parse_id("id", &path)?;
    let caller = session.caller(&state.identity).await?;
    state.subjects.delete(&id, caller).await?;
    Ok(HttpResponse::NoContent().finish())
}
