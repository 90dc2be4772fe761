//! HTTP inbound adapter exposing the catalog as a REST API.

pub mod auth;
pub mod dto;
pub mod error;
pub mod health;
pub mod materials;
pub mod ratings;
pub mod request_trace;
pub mod session;
pub mod session_config;
pub mod state;
pub mod subjects;
#[cfg(test)]
pub mod test_utils;
pub mod users;
mod validation;

use actix_web::web;

use crate::domain::Error;

pub use error::ApiResult;

/// Register every `/api/v1` handler on a scope or app.
///
/// Malformed JSON bodies and query strings are reported with the same error
/// envelope as domain failures.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed request body: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed query string: {err}")).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed path: {err}")).into()
    }))
    .service(auth::register)
    .service(auth::login)
    .service(auth::logout)
    .service(auth::status)
    .service(users::list_users)
    .service(users::get_user_by_username)
    .service(users::get_user_by_email)
    .service(users::username_exists)
    .service(users::email_exists)
    .service(users::get_user)
    .service(users::update_user)
    .service(users::delete_user)
    .service(ratings::list_user_ratings)
    .service(subjects::create_subject)
    .service(subjects::list_subjects)
    .service(subjects::get_subject)
    .service(subjects::update_subject)
    .service(subjects::delete_subject)
    .service(materials::create_material)
    .service(materials::list_materials)
    .service(materials::get_material)
    .service(materials::material_summary)
    .service(materials::update_material)
    .service(materials::delete_material)
    .service(materials::list_material_ratings)
    .service(materials::rate_material)
    .service(ratings::create_rating)
    .service(ratings::get_rating)
    .service(ratings::update_rating)
    .service(ratings::delete_rating);
}
