//! Materials API handlers, including the per-material ratings collection.
//!
//! ```text
//! POST /api/v1/materials {"title":"Intro to Graphs","url":"https://…","type":"WEBSITE","subjectId":"…"}
//! GET /api/v1/materials?type=WEBSITE | ?subjectId=… | ?uploaderId=… | ?title=intro | ?uploader=ada
//! GET /api/v1/materials/{id}
//! GET /api/v1/materials/{id}/summary
//! PUT /api/v1/materials/{id}
//! DELETE /api/v1/materials/{id}
//! GET /api/v1/materials/{id}/ratings
//! POST /api/v1/materials/{id}/ratings {"score":4}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::{
    Error, Material, MaterialCatalogService, MaterialId, MaterialType, SubjectId, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    MaterialRequest, MaterialResponse, MaterialSummaryResponse, RatingResponse, ScoreRequest,
    collect,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_id;

/// Listing filters. At most one may be supplied.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MaterialListQuery {
    /// Exact material type, e.g. `WEBSITE`.
    #[serde(rename = "type")]
    pub material_type: Option<String>,
    /// Materials filed under this subject id.
    pub subject_id: Option<String>,
    /// Materials published by this user id.
    pub uploader_id: Option<String>,
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Case-insensitive substring of the uploader's username.
    pub uploader: Option<String>,
}

impl MaterialListQuery {
    fn supplied(&self) -> Vec<&'static str> {
        [
            ("type", self.material_type.is_some()),
            ("subjectId", self.subject_id.is_some()),
            ("uploaderId", self.uploader_id.is_some()),
            ("title", self.title.is_some()),
            ("uploader", self.uploader.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }

    async fn run(self, service: &MaterialCatalogService) -> ApiResult<Vec<Material>> {
        let supplied = self.supplied();
        if supplied.len() > 1 {
            return Err(
                Error::invalid_request("at most one material filter may be supplied")
                    .with_details(json!({"fields": supplied, "code": "conflicting_filters"})),
            );
        }

        if let Some(raw) = self.material_type {
            let material_type: MaterialType = raw.parse()?;
            return service.list_by_type(material_type).await;
        }
        if let Some(raw) = self.subject_id {
            let subject_id: SubjectId = parse_id("subjectId", &raw)?;
            return service.list_by_subject(&subject_id).await;
        }
        if let Some(raw) = self.uploader_id {
            let uploader_id: UserId = parse_id("uploaderId", &raw)?;
            return service.list_by_uploader(&uploader_id).await;
        }
        if let Some(needle) = self.title {
            return service.search_by_title(&needle).await;
        }
        if let Some(needle) = self.uploader {
            return service.search_by_uploader_username(&needle).await;
        }
        service.list().await
    }
}

/// Publish a material as the logged-in user.
#[utoipa::path(
    post,
    path = "/api/v1/materials",
    request_body = MaterialRequest,
    responses(
        (status = 201, description = "Material published", body = MaterialResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Subject not found", body = Error)
    ),
    tags = ["materials"],
    operation_id = "createMaterial"
)]
#[post("/materials")]
pub async fn create_material(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<MaterialRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(&state.identity).await?;
    let material = state
        .materials
        .create(payload.into_inner().into(), caller)
        .await?;
    Ok(HttpResponse::Created().json(MaterialResponse::from(&material)))
}

/// List materials, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/materials",
    params(MaterialListQuery),
    responses(
        (status = 200, description = "Materials", body = [MaterialResponse]),
        (status = 400, description = "Malformed or conflicting filters", body = Error)
    ),
    tags = ["materials"],
    operation_id = "listMaterials",
    security([])
)]
#[get("/materials")]
pub async fn list_materials(
    state: web::Data<HttpState>,
    query: web::Query<MaterialListQuery>,
) -> ApiResult<web::Json<Vec<MaterialResponse>>> {
    let materials = query.into_inner().run(&state.materials).await?;
    Ok(web::Json(collect(&materials)))
}

/// Fetch one material.
#[utoipa::path(
    get,
    path = "/api/v1/materials/{id}",
    params(("id" = String, Path, description = "Material id")),
    responses(
        (status = 200, description = "Material", body = MaterialResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["materials"],
    operation_id = "getMaterial",
    security([])
)]
#[get("/materials/{id}")]
pub async fn get_material(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MaterialResponse>> {
    let id: MaterialId = parse_id("id", &path)?;
    let material = state.materials.get_by_id(&id).await?;
    Ok(web::Json(MaterialResponse::from(&material)))
}

/// Material with its rating count and average score.
#[utoipa::path(
    get,
    path = "/api/v1/materials/{id}/summary",
    params(("id" = String, Path, description = "Material id")),
    responses(
        (status = 200, description = "Summary", body = MaterialSummaryResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["materials"],
    operation_id = "getMaterialSummary",
    security([])
)]
#[get("/materials/{id}/summary")]
pub async fn material_summary(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MaterialSummaryResponse>> {
    let id: MaterialId = parse_id("id", &path)?;
    let summary = state.materials.summary(&id).await?;
    Ok(web::Json(MaterialSummaryResponse::from(&summary)))
}

/// Replace a material the caller uploaded.
#[utoipa::path(
    put,
    path = "/api/v1/materials/{id}",
    params(("id" = String, Path, description = "Material id")),
    request_body = MaterialRequest,
    responses(
        (status = 200, description = "Updated material", body = MaterialResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the uploader", body = Error),
        (status = 404, description = "Material or subject not found", body = Error)
    ),
    tags = ["materials"],
    operation_id = "updateMaterial"
)]
#[put("/materials/{id}")]
pub async fn update_material(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<MaterialRequest>,
) -> ApiResult<web::Json<MaterialResponse>> {
    let id: MaterialId = parse_id("id", &path)?;
    let caller = session.caller(&state.identity).await?;
    let material = state
        .materials
        .update(&id, payload.into_inner().into(), caller)
        .await?;
    Ok(web::Json(MaterialResponse::from(&material)))
}

/// Delete a material the caller uploaded, with its ratings.
#[utoipa::path(
    delete,
    path = "/api/v1/materials/{id}",
    params(("id" = String, Path, description = "Material id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the uploader", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["materials"],
    operation_id = "deleteMaterial"
)]
#[delete("/materials/{id}")]
pub async fn delete_material(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: MaterialId = parse_id("id", &path)?;
    let caller = session.caller(&state.identity).await?;
    state.materials.delete(&id, caller).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Ratings given to one material, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/materials/{id}/ratings",
    params(("id" = String, Path, description = "Material id")),
    responses(
        (status = 200, description = "Ratings", body = [RatingResponse]),
        (status = 404, description = "Material not found", body = Error)
    ),
    tags = ["materials", "ratings"],
    operation_id = "listMaterialRatings",
    security([])
)]
#[get("/materials/{id}/ratings")]
pub async fn list_material_ratings(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<RatingResponse>>> {
    let id: MaterialId = parse_id("id", &path)?;
    let ratings = state.ratings.list_by_material(&id).await?;
    Ok(web::Json(collect(&ratings)))
}

/// Rate a material as the logged-in user.
#[utoipa::path(
    post,
    path = "/api/v1/materials/{id}/ratings",
    params(("id" = String, Path, description = "Material id")),
    request_body = ScoreRequest,
    responses(
        (status = 201, description = "Rating recorded", body = RatingResponse),
        (status = 400, description = "Score outside 1..=5", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Material not found", body = Error)
    ),
    tags = ["materials", "ratings"],
    operation_id = "rateMaterial"
)]
#[post("/materials/{id}/ratings")]
pub async fn rate_material(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ScoreRequest>,
) -> ApiResult<HttpResponse> {
    let id: MaterialId = parse_id("id", &path)?;
    let caller = session.caller(&state.identity).await?;
    let rating = state
        .ratings
        .create(&id, payload.score, caller)
        .await?;
    Ok(HttpResponse::Created().json(RatingResponse::from(&rating)))
}
