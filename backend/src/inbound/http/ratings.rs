//! Ratings API handlers.
//!
//! ```text
//! POST /api/v1/ratings {"materialId":"…","score":4}
//! GET /api/v1/ratings/{id}
//! PUT /api/v1/ratings/{id} {"score":5}
//! DELETE /api/v1/ratings/{id}
//! GET /api/v1/users/{id}/ratings
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{Error, MaterialId, RatingId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{CreateRatingRequest, RatingResponse, ScoreRequest, collect};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_id;

/// Rate a material as the logged-in user.
#[utoipa::path(
    post,
    path = "/api/v1/ratings",
    request_body = CreateRatingRequest,
    responses(
        (status = 201, description = "Rating recorded", body = RatingResponse),
        (status = 400, description = "Score outside 1..=5", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Material not found", body = Error)
    ),
    tags = ["ratings"],
    operation_id = "createRating"
)]
#[post("/ratings")]
pub async fn create_rating(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateRatingRequest>,
) -> ApiResult<HttpResponse> {
    let material_id: MaterialId = parse_id("materialId", &payload.material_id)?;
    let caller = session.caller(&state.identity).await?;
    let rating = state
        .ratings
        .create(&material_id, payload.score, caller)
        .await?;
    Ok(HttpResponse::Created().json(RatingResponse::from(&rating)))
}

/// Fetch one rating.
#[utoipa::path(
    get,
    path = "/api/v1/ratings/{id}",
    params(("id" = String, Path, description = "Rating id")),
    responses(
        (status = 200, description = "Rating", body = RatingResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["ratings"],
    operation_id = "getRating",
    security([])
)]
#[get("/ratings/{id}")]
pub async fn get_rating(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<RatingResponse>> {
    let id: RatingId = parse_id("id", &path)?;
    let rating = state.ratings.get_by_id(&id).await?;
    Ok(web::Json(RatingResponse::from(&rating)))
}

/// Change the score of a rating the caller gave.
#[utoipa::path(
    put,
    path = "/api/v1/ratings/{id}",
    params(("id" = String, Path, description = "Rating id")),
    request_body = ScoreRequest,
    responses(
        (status = 200, description = "Updated rating", body = RatingResponse),
        (status = 400, description = "Score outside 1..=5", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the rater", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["ratings"],
    operation_id = "updateRating"
)]
#[put("/ratings/{id}")]
pub async fn update_rating(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ScoreRequest>,
) -> ApiResult<web::Json<RatingResponse>> {
    let id: RatingId = parse_id("id", &path)?;
    let caller = session.caller(&state.identity).await?;
    let rating = state
        .ratings
        .update_score(&id, payload.score, caller)
        .await?;
    Ok(web::Json(RatingResponse::from(&rating)))
}

/// Withdraw a rating the caller gave.
#[utoipa::path(
    delete,
    path = "/api/v1/ratings/{id}",
    params(("id" = String, Path, description = "Rating id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the rater", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["ratings"],
    operation_id = "deleteRating"
)]
#[delete("/ratings/{id}")]
pub async fn delete_rating(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: RatingId = parse_id("id", &path)?;
    let caller = session.caller(&state.identity).await?;
    state.ratings.delete(&id, caller).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Ratings a user has given, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/ratings",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Ratings", body = [RatingResponse]),
        (status = 400, description = "Malformed id", body = Error)
    ),
    tags = ["ratings", "users"],
    operation_id = "listUserRatings",
    security([])
)]
#[get("/users/{id}/ratings")]
pub async fn list_user_ratings(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<RatingResponse>>> {
    let id: UserId = parse_id("id", &path)?;
    let ratings = state.ratings.list_by_user(&id).await?;
    Ok(web::Json(collect(&ratings)))
}
