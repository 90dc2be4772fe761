//! Tests for `DieselMaterialRepository`.

use rstest::{fixture, rstest};
use study_materials::domain::ports::{
    MaterialFilter, MaterialRepository, MaterialRepositoryError, RatingRepository,
    SubjectRepository, UserRepository,
};
use study_materials::domain::{
    Material, MaterialContent, MaterialType, MaterialUrl, Subject, SubjectId, User,
};
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

/// Two uploaders and two subjects, already stored.
struct Shelf {
    materials: DieselMaterialRepository,
    ratings: DieselRatingRepository,
    ada: User,
    bob: User,
    math: Subject,
    physics: Subject,
}

async fn stock_shelf(pg: &PgCatalog) -> Shelf {
    let users = DieselUserRepository::new(pg.pool.clone());
    let subjects = DieselSubjectRepository::new(pg.pool.clone());
    let shelf = Shelf {
        materials: DieselMaterialRepository::new(pg.pool.clone()),
        ratings: DieselRatingRepository::new(pg.pool.clone()),
        ada: user_record("ada"),
        bob: user_record("bob_the_builder"),
        math: subject_record("Math"),
        physics: subject_record("Physics"),
    };
    for user in [&shelf.ada, &shelf.bob] {
        users.insert(user).await.expect("insert user");
    }
    for subject in [&shelf.math, &shelf.physics] {
        subjects.insert(subject).await.expect("insert subject");
    }
    shelf
}

fn retyped(material: Material, material_type: MaterialType, subject_id: SubjectId) -> Material {
    let content = MaterialContent {
        title: material.title().clone(),
        description: Some("Worked examples".to_owned()),
        url: MaterialUrl::new("https://example.com/sets.pdf").expect("valid url"),
        material_type,
        subject_id,
    };
    material.with_content(content)
}

fn titles(materials: &[Material]) -> Vec<&str> {
    materials.iter().map(|m| m.title().as_ref()).collect()
}

#[rstest]
fn insert_names_the_missing_parent(pg: Option<PgCatalog>) {
    let Some(pg) = pg else { return };

    pg.block_on(async {
        let shelf = stock_shelf(&pg).await;
        let orphan_subject = subject_record("Unfiled");
        let stranger = user_record("stranger");

        let no_subject = material_record("Orphan", orphan_subject.id(), shelf.ada.id(), 0);
        assert_eq!(
            shelf.materials.insert(&no_subject).await,
            Err(MaterialRepositoryError::subject_not_found(*orphan_subject.id()))
        );
        let no_uploader = material_record("Orphan", shelf.math.id(), stranger.id(), 0);
        assert_eq!(
            shelf.materials.insert(&no_uploader).await,
            Err(MaterialRepositoryError::uploader_not_found(*stranger.id()))
        );
        assert!(
            shelf
                .materials
                .list(&MaterialFilter::All)
                .await
                .expect("list")
                .is_empty()
        );
    });
}

#[rstest]
fn filters_select_and_order_by_creation(pg: Option<PgCatalog>) {
    let Some(pg) = pg else { return };

    pg.block_on(async {
        let shelf = stock_shelf(&pg).await;
        let graphs = material_record("Intro to Graphs", shelf.math.id(), shelf.ada.id(), 1);
        let sets = retyped(
            material_record("INTRO to Sets", shelf.math.id(), shelf.bob.id(), 2),
            MaterialType::PdfLink,
            *shelf.math.id(),
        );
        let outline = material_record("Outline", shelf.physics.id(), shelf.bob.id(), 0);
        for material in [&graphs, &sets, &outline] {
            shelf.materials.insert(material).await.expect("insert");
        }

        assert_eq!(
            shelf.materials.find_by_id(sets.id()).await.expect("lookup"),
            Some(sets.clone())
        );
        let cases = [
            (MaterialFilter::All, vec!["Outline", "Intro to Graphs", "INTRO to Sets"]),
            (
                MaterialFilter::TitleContains("intro".to_owned()),
                vec!["Intro to Graphs", "INTRO to Sets"],
            ),
            (
                MaterialFilter::UploaderUsernameContains("BOB".to_owned()),
                vec!["Outline", "INTRO to Sets"],
            ),
            (
                MaterialFilter::UploaderUsernameContains("_the_".to_owned()),
                vec!["Outline", "INTRO to Sets"],
            ),
            (MaterialFilter::ByType(MaterialType::PdfLink), vec!["INTRO to Sets"]),
            (MaterialFilter::BySubject(*shelf.physics.id()), vec!["Outline"]),
            (MaterialFilter::ByUploader(*shelf.ada.id()), vec!["Intro to Graphs"]),
            (MaterialFilter::TitleContains("%".to_owned()), vec![]),
        ];
        for (filter, expected) in cases {
            let found = shelf.materials.list(&filter).await.expect("list");
            assert_eq!(titles(&found), expected, "{filter:?}");
        }
    });
}

#[rstest]
fn update_rewrites_content_and_checks_the_subject(pg: Option<PgCatalog>) {
    let Some(pg) = pg else { return };

    pg.block_on(async {
        let shelf = stock_shelf(&pg).await;
        let notes = material_record("Kinematics Notes", shelf.physics.id(), shelf.ada.id(), 0);
        shelf.materials.insert(&notes).await.expect("insert");

        let moved = retyped(notes.clone(), MaterialType::PdfLink, *shelf.math.id());
        assert!(shelf.materials.update(&moved).await.expect("update"));
        let stored = shelf
            .materials
            .find_by_id(notes.id())
            .await
            .expect("lookup")
            .expect("still stored");
        assert_eq!(stored, moved);
        assert_eq!(stored.created_at(), notes.created_at());

        let gone = subject_record("Gone");
        let dangling = retyped(notes.clone(), MaterialType::Other, *gone.id());
        assert_eq!(
            shelf.materials.update(&dangling).await,
            Err(MaterialRepositoryError::subject_not_found(*gone.id()))
        );

        let unsaved = material_record("Never stored", shelf.math.id(), shelf.ada.id(), 5);
        assert!(!shelf.materials.update(&unsaved).await.expect("update runs"));
    });
}

#[rstest]
fn delete_reports_the_ratings_it_removed(pg: Option<PgCatalog>) {
    let Some(pg) = pg else { return };

    pg.block_on(async {
        let shelf = stock_shelf(&pg).await;
        let doomed = material_record("Doomed", shelf.math.id(), shelf.ada.id(), 0);
        let other = material_record("Other", shelf.math.id(), shelf.ada.id(), 1);
        for material in [&doomed, &other] {
            shelf.materials.insert(material).await.expect("insert");
        }
        for rating in [
            rating_record(4, doomed.id(), shelf.bob.id(), 2),
            rating_record(2, doomed.id(), shelf.bob.id(), 3),
            rating_record(5, other.id(), shelf.bob.id(), 4),
        ] {
            shelf.ratings.insert(&rating).await.expect("insert rating");
        }

        assert_eq!(shelf.materials.delete(doomed.id()).await, Ok(Some(2)));
        assert_eq!(shelf.materials.delete(doomed.id()).await, Ok(None));
        let left = shelf
            .ratings
            .list_by_user(shelf.bob.id())
            .await
            .expect("ratings");
        assert_eq!(left.len(), 1);
        assert!(left.iter().all(|rating| rating.material_id() == other.id()));
    });
}
