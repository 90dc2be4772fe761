//! Tests for `DieselUserRepository`.

use rstest::{fixture, rstest};
use study_materials::domain::ports::{
    MaterialRepository, RatingRepository, SubjectRepository, UserPersistenceError,
    UserRepository,
};
use study_materials::domain::{CascadeReport, Email, Username};
use study_materials::outbound::persistence::{
    DieselMaterialRepository, DieselRatingRepository, DieselSubjectRepository,
    DieselUserRepository,
};

use crate::support::embedded_postgres::{PgCatalog, pg_catalog};
use crate::support::records::{material_record, rating_record, subject_record, user_record};

#[fixture]
fn pg() -> Option<PgCatalog> {
    pg_catalog()
}

#[rstest]
fn stored_user_is_found_by_every_key(pg: Option<PgCatalog>) {
    let Some(pg) = pg else { return };
    let repo = DieselUserRepository::new(pg.pool.clone());
    let ada = user_record("ada");

    pg.block_on(async {
        repo.insert(&ada).await.expect("insert");

        assert_eq!(repo.find_by_id(ada.id()).await.expect("by id"), Some(ada.clone()));
        assert_eq!(
            repo.find_by_username("ada").await.expect("by username"),
            Some(ada.clone())
        );
        assert_eq!(
            repo.find_by_email("ada@example.com").await.expect("by email"),
            Some(ada.clone())
        );
        assert_eq!(repo.find_by_username("grace").await.expect("by username"), None);
    });
}

#[rstest]
fn racing_registrations_keep_one_username(pg: Option<PgCatalog>) {
    let Some(pg) = pg else { return };
    let repo = DieselUserRepository::new(pg.pool.clone());
    let first = user_record("ada");
    let second = user_record("ada").with_profile(
        Username::new("ada").expect("valid username"),
        Email::new("other@example.com").expect("valid email"),
    );

    pg.block_on(async {
        let (a, b) = tokio::join!(repo.insert(&first), repo.insert(&second));
        let mut outcomes = [a, b];
        outcomes.sort_by_key(Result::is_err);
        let [won, lost] = outcomes;
        assert_eq!(won, Ok(()));
        assert_eq!(
            lost,
            Err(UserPersistenceError::duplicate_username("ada"))
        );
        assert_eq!(repo.list().await.expect("list").len(), 1);
    });
}

#[rstest]
fn taken_email_is_reported_on_insert_and_update(pg: Option<PgCatalog>) {
    let Some(pg) = pg else { return };
    let repo = DieselUserRepository::new(pg.pool.clone());
    let ada = user_record("ada");
    let grace = user_record("grace");
    let taken = Email::new("ada@example.com").expect("valid email");

    pg.block_on(async {
        repo.insert(&ada).await.expect("insert ada");
        let impostor = user_record("grace").with_profile(
            Username::new("grace").expect("valid username"),
            taken.clone(),
        );
        assert_eq!(
            repo.insert(&impostor).await,
            Err(UserPersistenceError::duplicate_email("ada@example.com"))
        );

        repo.insert(&grace).await.expect("insert grace");
        let moved = grace
            .clone()
            .with_profile(Username::new("grace").expect("valid username"), taken);
        assert_eq!(
            repo.update(&moved).await,
            Err(UserPersistenceError::duplicate_email("ada@example.com"))
        );
        assert_eq!(repo.find_by_id(grace.id()).await.expect("lookup"), Some(grace));
        assert!(!repo.update(&user_record("nobody")).await.expect("update runs"));
    });
}

#[rstest]
fn delete_removes_uploads_and_every_rating_in_one_go(pg: Option<PgCatalog>) {
    let Some(pg) = pg else { return };
    let users = DieselUserRepository::new(pg.pool.clone());
    let subjects = DieselSubjectRepository::new(pg.pool.clone());
    let materials = DieselMaterialRepository::new(pg.pool.clone());
    let ratings = DieselRatingRepository::new(pg.pool.clone());
    let ada = user_record("ada");
    let bob = user_record("bob");
    let math = subject_record("Math");
    let bobs = material_record("Bob's proofs", math.id(), bob.id(), 0);
    let adas = material_record("Ada's algebra", math.id(), ada.id(), 1);
    let kept = rating_record(3, adas.id(), ada.id(), 4);

    pg.block_on(async {
        users.insert(&ada).await.expect("insert ada");
        users.insert(&bob).await.expect("insert bob");
        subjects.insert(&math).await.expect("insert subject");
        materials.insert(&bobs).await.expect("insert bob's material");
        materials.insert(&adas).await.expect("insert ada's material");
        for rating in [
            rating_record(5, bobs.id(), ada.id(), 2),
            rating_record(2, adas.id(), bob.id(), 3),
            kept.clone(),
        ] {
            ratings.insert(&rating).await.expect("insert rating");
        }

        let report = users.delete(bob.id()).await.expect("delete runs");

        assert_eq!(
            report,
            Some(CascadeReport {
                materials_removed: 1,
                ratings_removed: 2,
            })
        );
        assert_eq!(materials.find_by_id(bobs.id()).await.expect("lookup"), None);
        assert_eq!(
            ratings.list_by_material(adas.id()).await.expect("ratings"),
            [kept]
        );
        assert_eq!(users.find_by_id(bob.id()).await.expect("lookup"), None);
        assert_eq!(users.delete(bob.id()).await.expect("delete runs"), None);
    });
}
