//! Domain primitives, aggregates and services.
//!
//! Purpose: define the catalog's entities, their validation rules and the
//! services that apply ownership and lifecycle rules on top of the driven
//! ports. Nothing here knows about HTTP, sessions or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Subject, Material, Rating: aggregates referenced by id newtypes.
//! - Caller: the explicit identity attached to every inbound operation.
//! - IdentityService, SubjectCatalogService, MaterialCatalogService,
//!   RatingLedgerService: the driving surface.

pub mod auth;
pub mod cascade;
pub mod error;
pub mod identity_service;
pub mod ids;
pub mod material;
pub mod material_service;
pub mod ports;
pub mod rating;
pub mod rating_service;
pub mod subject;
pub mod subject_service;
pub mod user;

pub use self::auth::{Caller, LoginCredentials, LoginValidationError};
pub use self::cascade::CascadeReport;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity_service::IdentityService;
pub use self::ids::{InvalidIdError, MaterialId, RatingId, SubjectId, UserId};
pub use self::material::{
    Material, MaterialContent, MaterialDraft, MaterialSummary, MaterialType, MaterialUrl,
    MaterialValidationError, Title,
};
pub use self::material_service::MaterialCatalogService;
pub use self::rating::{Rating, Score, ScoreOutOfRange};
pub use self::rating_service::RatingLedgerService;
pub use self::subject::{Subject, SubjectName, SubjectValidationError};
pub use self::subject_service::SubjectCatalogService;
pub use self::user::{
    Email, PasswordDigest, RegistrationRequest, Role, User, UserProfileUpdate, UserValidationError,
    Username,
};
