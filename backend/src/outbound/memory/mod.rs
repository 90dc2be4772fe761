//! In-memory catalog store.
//!
//! One mutex guards every table, so each port call (cascading deletes
//! included) is a single critical section and either applies fully or not at
//! all. Used by tests and when the server runs without a database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    MaterialFilter, MaterialRepository, MaterialRepositoryError, RatingRepository,
    RatingRepositoryError, SubjectRepository, SubjectRepositoryError, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    CascadeReport, Material, MaterialId, Rating, RatingId, Subject, SubjectId, User, UserId,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    subjects: HashMap<SubjectId, Subject>,
    materials: HashMap<MaterialId, Material>,
    ratings: HashMap<RatingId, Rating>,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl Tables {
    fn username_holder(&self, username: &str) -> Option<&User> {
        self.users
            .values()
            .find(|user| user.username().as_ref() == username)
    }

    fn email_holder(&self, email: &str) -> Option<&User> {
        self.users.values().find(|user| user.email().as_ref() == email)
    }

    fn check_user_unique(&self, user: &User) -> Result<(), UserPersistenceError> {
        if self
            .username_holder(user.username().as_ref())
            .is_some_and(|holder| holder.id() != user.id())
        {
            return Err(UserPersistenceError::duplicate_username(
                user.username().as_ref(),
            ));
        }
        if self
            .email_holder(user.email().as_ref())
            .is_some_and(|holder| holder.id() != user.id())
        {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        Ok(())
    }

    fn name_taken(&self, subject: &Subject) -> bool {
        self.subjects
            .values()
            .any(|other| other.name() == subject.name() && other.id() != subject.id())
    }

    fn remove_material(&mut self, id: &MaterialId) -> Option<usize> {
        self.materials.remove(id)?;
        let before = self.ratings.len();
        self.ratings.retain(|_, rating| rating.material_id() != id);
        Some(before - self.ratings.len())
    }

    fn remove_materials_where(&mut self, predicate: impl Fn(&Material) -> bool) -> CascadeReport {
        let doomed: Vec<MaterialId> = self
            .materials
            .values()
            .filter(|material| predicate(material))
            .map(|material| *material.id())
            .collect();
        doomed
            .iter()
            .filter_map(|id| self.remove_material(id))
            .fold(CascadeReport::default(), |report, ratings_removed| {
                report.merge(CascadeReport {
                    materials_removed: 1,
                    ratings_removed,
                })
            })
    }

    fn matches(&self, material: &Material, filter: &MaterialFilter) -> bool {
        match filter {
            MaterialFilter::All => true,
            MaterialFilter::ByType(material_type) => material.material_type() == *material_type,
            MaterialFilter::BySubject(subject_id) => material.subject_id() == subject_id,
            MaterialFilter::ByUploader(user_id) => material.uploader_id() == user_id,
            MaterialFilter::TitleContains(needle) => {
                contains_ignore_case(material.title().as_ref(), needle)
            }
            MaterialFilter::UploaderUsernameContains(needle) => self
                .users
                .get(material.uploader_id())
                .is_some_and(|user| contains_ignore_case(user.username().as_ref(), needle)),
        }
    }

    fn sorted_ratings(&self, predicate: impl Fn(&Rating) -> bool) -> Vec<Rating> {
        let mut ratings: Vec<Rating> = self
            .ratings
            .values()
            .filter(|rating| predicate(rating))
            .cloned()
            .collect();
        ratings.sort_by_key(|rating| (rating.created_at(), *rating.id()));
        ratings
    }
}

/// Shared in-memory backing for every repository port.
///
/// Clones share the same tables.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryCatalogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, String> {
        self.tables
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

#[async_trait]
impl UserRepository for InMemoryCatalogStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        tables.check_user_unique(user)?;
        tables.users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables.users.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables.username_holder(username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables.email_holder(email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| a.username().as_ref().cmp(b.username().as_ref()));
        Ok(users)
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        if !tables.users.contains_key(user.id()) {
            return Ok(false);
        }
        tables.check_user_unique(user)?;
        tables.users.insert(*user.id(), user.clone());
        Ok(true)
    }

    async fn delete(&self, id: &UserId) -> Result<Option<CascadeReport>, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        if tables.users.remove(id).is_none() {
            return Ok(None);
        }
        let report = tables.remove_materials_where(|material| material.uploader_id() == id);
        let before = tables.ratings.len();
        tables.ratings.retain(|_, rating| rating.user_id() != id);
        let own_ratings = before - tables.ratings.len();
        Ok(Some(report.merge(CascadeReport {
            materials_removed: 0,
            ratings_removed: own_ratings,
        })))
    }
}

#[async_trait]
impl SubjectRepository for InMemoryCatalogStore {
    async fn insert(&self, subject: &Subject) -> Result<(), SubjectRepositoryError> {
        let mut tables = self.lock().map_err(SubjectRepositoryError::query)?;
        if tables.name_taken(subject) {
            return Err(SubjectRepositoryError::duplicate_name(subject.name().as_ref()));
        }
        tables.subjects.insert(*subject.id(), subject.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SubjectId) -> Result<Option<Subject>, SubjectRepositoryError> {
        let tables = self.lock().map_err(SubjectRepositoryError::query)?;
        Ok(tables.subjects.get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Subject>, SubjectRepositoryError> {
        let tables = self.lock().map_err(SubjectRepositoryError::query)?;
        Ok(tables
            .subjects
            .values()
            .find(|subject| subject.name().as_ref() == name)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Subject>, SubjectRepositoryError> {
        SubjectRepository::search(self, "").await
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Subject>, SubjectRepositoryError> {
        let tables = self.lock().map_err(SubjectRepositoryError::query)?;
        let mut subjects: Vec<Subject> = tables
            .subjects
            .values()
            .filter(|subject| contains_ignore_case(subject.name().as_ref(), keyword))
            .cloned()
            .collect();
        subjects.sort_by(|a, b| a.name().as_ref().cmp(b.name().as_ref()));
        Ok(subjects)
    }

    async fn update(&self, subject: &Subject) -> Result<bool, SubjectRepositoryError> {
        let mut tables = self.lock().map_err(SubjectRepositoryError::query)?;
        if !tables.subjects.contains_key(subject.id()) {
            return Ok(false);
        }
        if tables.name_taken(subject) {
            return Err(SubjectRepositoryError::duplicate_name(subject.name().as_ref()));
        }
        tables.subjects.insert(*subject.id(), subject.clone());
        Ok(true)
    }

    async fn delete(
        &self,
        id: &SubjectId,
    ) -> Result<Option<CascadeReport>, SubjectRepositoryError> {
        let mut tables = self.lock().map_err(SubjectRepositoryError::query)?;
        if tables.subjects.remove(id).is_none() {
            return Ok(None);
        }
        Ok(Some(
            tables.remove_materials_where(|material| material.subject_id() == id),
        ))
    }
}

#[async_trait]
impl MaterialRepository for InMemoryCatalogStore {
    async fn insert(&self, material: &Material) -> Result<(), MaterialRepositoryError> {
        let mut tables = self.lock().map_err(MaterialRepositoryError::query)?;
        if !tables.subjects.contains_key(material.subject_id()) {
            return Err(MaterialRepositoryError::subject_not_found(
                *material.subject_id(),
            ));
        }
        if !tables.users.contains_key(material.uploader_id()) {
            return Err(MaterialRepositoryError::uploader_not_found(
                *material.uploader_id(),
            ));
        }
        tables.materials.insert(*material.id(), material.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &MaterialId,
    ) -> Result<Option<Material>, MaterialRepositoryError> {
        let tables = self.lock().map_err(MaterialRepositoryError::query)?;
        Ok(tables.materials.get(id).cloned())
    }

    async fn list(&self, filter: &MaterialFilter) -> Result<Vec<Material>, MaterialRepositoryError> {
        let tables = self.lock().map_err(MaterialRepositoryError::query)?;
        let mut materials: Vec<Material> = tables
            .materials
            .values()
            .filter(|material| tables.matches(material, filter))
            .cloned()
            .collect();
        materials.sort_by_key(|material| (material.created_at(), *material.id()));
        Ok(materials)
    }

    async fn update(&self, material: &Material) -> Result<bool, MaterialRepositoryError> {
        let mut tables = self.lock().map_err(MaterialRepositoryError::query)?;
        if !tables.materials.contains_key(material.id()) {
            return Ok(false);
        }
        if !tables.subjects.contains_key(material.subject_id()) {
            return Err(MaterialRepositoryError::subject_not_found(
                *material.subject_id(),
            ));
        }
        tables.materials.insert(*material.id(), material.clone());
        Ok(true)
    }

    async fn delete(&self, id: &MaterialId) -> Result<Option<usize>, MaterialRepositoryError> {
        let mut tables = self.lock().map_err(MaterialRepositoryError::query)?;
        Ok(tables.remove_material(id))
    }
}

#[async_trait]
impl RatingRepository for InMemoryCatalogStore {
    async fn insert(&self, rating: &Rating) -> Result<(), RatingRepositoryError> {
        let mut tables = self.lock().map_err(RatingRepositoryError::query)?;
        if !tables.materials.contains_key(rating.material_id()) {
            return Err(RatingRepositoryError::material_not_found(
                *rating.material_id(),
            ));
        }
        if !tables.users.contains_key(rating.user_id()) {
            return Err(RatingRepositoryError::user_not_found(*rating.user_id()));
        }
        tables.ratings.insert(*rating.id(), rating.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &RatingId) -> Result<Option<Rating>, RatingRepositoryError> {
        let tables = self.lock().map_err(RatingRepositoryError::query)?;
        Ok(tables.ratings.get(id).cloned())
    }

    async fn list_by_material(
        &self,
        material_id: &MaterialId,
    ) -> Result<Vec<Rating>, RatingRepositoryError> {
        let tables = self.lock().map_err(RatingRepositoryError::query)?;
        Ok(tables.sorted_ratings(|rating| rating.material_id() == material_id))
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Rating>, RatingRepositoryError> {
        let tables = self.lock().map_err(RatingRepositoryError::query)?;
        Ok(tables.sorted_ratings(|rating| rating.user_id() == user_id))
    }

    async fn update(&self, rating: &Rating) -> Result<bool, RatingRepositoryError> {
        let mut tables = self.lock().map_err(RatingRepositoryError::query)?;
        match tables.ratings.get_mut(rating.id()) {
            Some(stored) => {
                *stored = rating.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &RatingId) -> Result<bool, RatingRepositoryError> {
        let mut tables = self.lock().map_err(RatingRepositoryError::query)?;
        Ok(tables.ratings.remove(id).is_some())
    }
}
