//! Users API handlers.
//!
//! ```text
//! GET /api/v1/users
//! GET /api/v1/users/{id}
//! GET /api/v1/users/by-username/{username}
//! GET /api/v1/users/by-email/{email}
//! GET /api/v1/users/exists/username/{username}
//! GET /api/v1/users/exists/email/{email}
//! PUT /api/v1/users/{id} {"username":"ada","email":"ada@example.com"}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, put, web};

use crate::domain::{Error, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{ExistsResponse, UpdateUserRequest, UserResponse, collect};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_id;

fn found(user: Option<User>, what: &str) -> ApiResult<web::Json<UserResponse>> {
    user.map(|user| web::Json(UserResponse::from(&user)))
        .ok_or_else(|| Error::not_found(format!("user {what} not found")))
}

/// List every registered user.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.identity.list().await?;
    Ok(web::Json(collect(&users)))
}

/// Fetch one user by id.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id: UserId = parse_id("id", &path)?;
    found(state.identity.get_by_id(&id).await?, &id.to_string())
}

/// Fetch one user by username.
#[utoipa::path(
    get,
    path = "/api/v1/users/by-username/{username}",
    params(("username" = String, Path, description = "Exact username")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUserByUsername",
    security([])
)]
#[get("/users/by-username/{username}")]
pub async fn get_user_by_username(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    found(state.identity.get_by_username(&path).await?, &path)
}

/// Fetch one user by email.
#[utoipa::path(
    get,
    path = "/api/v1/users/by-email/{email}",
    params(("email" = String, Path, description = "Exact email address")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUserByEmail",
    security([])
)]
#[get("/users/by-email/{email}")]
pub async fn get_user_by_email(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    found(state.identity.get_by_email(&path).await?, &path)
}

/// Whether a username is taken.
#[utoipa::path(
    get,
    path = "/api/v1/users/exists/username/{username}",
    params(("username" = String, Path, description = "Username to check")),
    responses((status = 200, description = "Existence flag", body = ExistsResponse)),
    tags = ["users"],
    operation_id = "usernameExists",
    security([])
)]
#[get("/users/exists/username/{username}")]
pub async fn username_exists(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ExistsResponse>> {
    let exists = state.identity.exists_by_username(&path).await?;
    Ok(web::Json(ExistsResponse { exists }))
}

/// Whether an email is taken.
#[utoipa::path(
    get,
    path = "/api/v1/users/exists/email/{email}",
    params(("email" = String, Path, description = "Email to check")),
    responses((status = 200, description = "Existence flag", body = ExistsResponse)),
    tags = ["users"],
    operation_id = "emailExists",
    security([])
)]
#[get("/users/exists/email/{email}")]
pub async fn email_exists(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ExistsResponse>> {
    let exists = state.identity.exists_by_email(&path).await?;
    Ok(web::Json(ExistsResponse { exists }))
}

/// Change the caller's own username and email.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request or username/email taken", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the account owner", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let id: UserId = parse_id("id", &path)?;
    let caller = session.caller(&state.identity).await?;
    let user = state
        .identity
        .update(&id, payload.into_inner().into(), caller)
        .await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Delete the caller's account with everything it published or rated.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the account owner", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: UserId = parse_id("id", &path)?;
    let caller = session.caller(&state.identity).await?;
    state.identity.delete(&id, caller).await?;
    session.clear();
    Ok(HttpResponse::NoContent().finish())
}
