//! Shared fixtures for catalog behaviour tests.
//!
//! A [`Catalog`] wires the four services over one store: a fresh in-memory
//! store, or the Diesel repositories over an embedded PostgreSQL database.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use mockable::DefaultClock;
use study_materials::domain::ports::FixtureCredentialHasher;
use study_materials::domain::{
    Caller, Material, MaterialDraft, MaterialType, RegistrationRequest, Role, Subject, SubjectId,
};
use study_materials::inbound::http::state::{HttpState, HttpStatePorts};
use study_materials::outbound::memory::InMemoryCatalogStore;
use study_materials::outbound::persistence::{
    DbPool, DieselMaterialRepository, DieselRatingRepository, DieselSubjectRepository,
    DieselUserRepository,
};

pub mod embedded_postgres;
pub mod records;

/// Services sharing one store.
pub struct Catalog {
    pub state: HttpState,
}

impl Catalog {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryCatalogStore::new());
        let state = HttpState::new(HttpStatePorts {
            users: store.clone(),
            subjects: store.clone(),
            materials: store.clone(),
            ratings: store,
            hasher: Arc::new(FixtureCredentialHasher),
            clock: Arc::new(DefaultClock),
        });
        Self { state }
    }

    /// Services over the Diesel repositories sharing `pool`.
    pub fn over_postgres(pool: &DbPool) -> Self {
        let state = HttpState::new(HttpStatePorts {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            subjects: Arc::new(DieselSubjectRepository::new(pool.clone())),
            materials: Arc::new(DieselMaterialRepository::new(pool.clone())),
            ratings: Arc::new(DieselRatingRepository::new(pool.clone())),
            hasher: Arc::new(FixtureCredentialHasher),
            clock: Arc::new(DefaultClock),
        });
        Self { state }
    }

    /// Register `username` and return a caller acting as that user.
    pub async fn user(&self, username: &str) -> Caller {
        let user = self
            .state
            .identity
            .register(RegistrationRequest {
                username: username.to_owned(),
                email: format!("{username}@example.com"),
                password: "password".to_owned(),
                role: Role::Student,
            })
            .await
            .expect("registration succeeds");
        Caller::authenticated(*user.id())
    }

    pub async fn subject(&self, name: &str, caller: Caller) -> Subject {
        self.state
            .subjects
            .create(name, caller)
            .await
            .expect("subject created")
    }

    pub async fn material(&self, title: &str, subject: &SubjectId, caller: Caller) -> Material {
        self.state
            .materials
            .create(draft(title, subject), caller)
            .await
            .expect("material created")
    }
}

/// A website draft with a fixed URL.
pub fn draft(title: &str, subject: &SubjectId) -> MaterialDraft {
    MaterialDraft {
        title: title.to_owned(),
        description: None,
        url: "https://example.com/notes".to_owned(),
        material_type: MaterialType::Website,
        subject_id: *subject,
    }
}
