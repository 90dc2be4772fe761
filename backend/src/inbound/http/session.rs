//! Cookie session access for handlers.
//!
//! The cookie only ever holds the logged-in [`UserId`]. Handlers extract a
//! [`SessionContext`] and hand services the [`Caller`] it resolves to.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Caller, Error, IdentityService, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Extractor over the request's cookie session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Log `user_id` in, rotating the session first so a pre-login cookie
    /// is never upgraded in place.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id)
            .map_err(|error| Error::internal(format!("session write failed: {error}")))
    }

    /// Log out: drop all state and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// The logged-in user, if any. Unreadable values count as logged out.
    pub fn user_id(&self) -> Option<UserId> {
        self.0.get::<UserId>(USER_ID_KEY).unwrap_or_else(|error| {
            warn!(%error, "ignoring unreadable user id in session cookie");
            None
        })
    }

    /// Identity handed to the domain services. A cookie whose account has
    /// since been deleted resolves to [`Caller::Anonymous`].
    pub async fn caller(&self, identity: &IdentityService) -> Result<Caller, Error> {
        identity.resolve_caller(self.user_id()).await
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = Session::from_request(req, payload);
        Box::pin(async move { session.await.map(Self) })
    }
}
