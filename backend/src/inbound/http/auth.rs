//! Registration and session handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"username":"ada","email":"ada@example.com","password":"pw","role":"STUDENT"}
//! POST /api/v1/auth/login {"username":"ada","password":"pw"}
//! POST /api/v1/auth/logout
//! GET /api/v1/auth/status
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{Error, LoginCredentials};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{AuthStatusResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Create an account. The new user is not logged in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid request or username/email taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let user = state.identity.register(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { username, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&username, &password)?;
    let user = state.identity.authenticate(&credentials).await?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

/// Drop the session. Succeeds for anonymous callers too.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Report who the session belongs to.
#[utoipa::path(
    get,
    path = "/api/v1/auth/status",
    responses(
        (status = 200, description = "Session identity", body = AuthStatusResponse),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "authStatus",
    security([])
)]
#[get("/auth/status")]
pub async fn status(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AuthStatusResponse>> {
    // A session may outlive its account; report that as logged out.
    let user = match session.user_id() {
        Some(id) => state.identity.get_by_id(&id).await?,
        None => None,
    };
    Ok(web::Json(AuthStatusResponse {
        authenticated: user.is_some(),
        user: user.as_ref().map(UserResponse::from),
    }))
}
