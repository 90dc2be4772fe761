//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};

use crate::domain::ports::FixtureCredentialHasher;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryCatalogStore;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Services over a fresh in-memory store with the fixture hasher.
pub fn memory_state() -> web::Data<HttpState> {
    let store = Arc::new(InMemoryCatalogStore::new());
    web::Data::new(HttpState::new(HttpStatePorts {
        users: store.clone(),
        subjects: store.clone(),
        materials: store.clone(),
        ratings: store,
        hasher: Arc::new(FixtureCredentialHasher),
        clock: Arc::new(DefaultClock),
    }))
}

/// Full `/api/v1` surface over [`memory_state`].
pub fn api_test_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(memory_state()).service(
        web::scope("/api/v1")
            .wrap(test_session_middleware())
            .configure(crate::inbound::http::configure_api),
    )
}

/// Register `username` as a student and return the login cookie.
pub async fn register_and_login<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let register = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "password",
            "role": "STUDENT",
        }))
        .to_request();
    let res = test::call_service(app, register).await;
    assert!(res.status().is_success(), "register {username}: {}", res.status());

    let login = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"username": username, "password": "password"}))
        .to_request();
    let res = test::call_service(app, login).await;
    assert!(res.status().is_success(), "login {username}: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Read a JSON response body.
pub async fn json_body(res: ServiceResponse) -> Value {
    let body = test::read_body(res).await;
    serde_json::from_slice(&body).expect("JSON body")
}

/// Extract a string field from a JSON object.
pub fn field(value: &Value, name: &str) -> String {
    value
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("missing string field {name} in {value}"))
        .to_owned()
}
