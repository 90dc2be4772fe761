//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` and only ever talk to
//! the domain services, so they stay testable against the in-memory store.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    CredentialHasher, MaterialRepository, RatingRepository, SubjectRepository, UserRepository,
};
use crate::domain::{
    IdentityService, MaterialCatalogService, RatingLedgerService, SubjectCatalogService,
};

/// Parameter object bundling the driven ports the services are built from.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserRepository>,
    pub subjects: Arc<dyn SubjectRepository>,
    pub materials: Arc<dyn MaterialRepository>,
    pub ratings: Arc<dyn RatingRepository>,
    pub hasher: Arc<dyn CredentialHasher>,
    pub clock: Arc<dyn Clock>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<IdentityService>,
    pub subjects: Arc<SubjectCatalogService>,
    pub materials: Arc<MaterialCatalogService>,
    pub ratings: Arc<RatingLedgerService>,
}

impl HttpState {
    /// Wire the four services over one set of ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use study_materials::domain::ports::FixtureCredentialHasher;
    /// use study_materials::inbound::http::state::{HttpState, HttpStatePorts};
    /// use study_materials::outbound::memory::InMemoryCatalogStore;
    ///
    /// let store = Arc::new(InMemoryCatalogStore::new());
    /// let state = HttpState::new(HttpStatePorts {
    ///     users: store.clone(),
    ///     subjects: store.clone(),
    ///     materials: store.clone(),
    ///     ratings: store,
    ///     hasher: Arc::new(FixtureCredentialHasher),
    ///     clock: Arc::new(DefaultClock),
    /// });
    /// let _identity = state.identity.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            subjects,
            materials,
            ratings,
            hasher,
            clock,
        } = ports;
        Self {
            identity: Arc::new(IdentityService::new(users, hasher)),
            subjects: Arc::new(SubjectCatalogService::new(subjects.clone())),
            materials: Arc::new(MaterialCatalogService::new(
                materials.clone(),
                subjects,
                ratings.clone(),
                clock.clone(),
            )),
            ratings: Arc::new(RatingLedgerService::new(ratings, materials, clock)),
        }
    }
}
