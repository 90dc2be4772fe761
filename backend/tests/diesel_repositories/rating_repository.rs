//! Tests for `DieselRatingRepository`.

use rstest::{fixture, rstest};
use study_materials::domain::ports::{
    MaterialRepository, RatingRepository, RatingRepositoryError, SubjectRepository,
    UserRepository,
};
use study_materials::domain::{Material, Score, User};
use study_materials::outbound::persistence::{
    DieselMaterialRepository, DieselRatingRepository, DieselSubjectRepository,
    DieselUserRepository,
};

use crate::support::Catalog;
use crate::support::embedded_postgres::{PgCatalog, pg_catalog};
use crate::support::records::{material_record, rating_record, subject_record, user_record};

#[fixture]
fn pg() -> Option<PgCatalog> {
    pg_catalog()
}

/// One material by ada, with bob as the usual rater.
async fn rateable(pg: &PgCatalog) -> (DieselRatingRepository, Material, User, User) {
    let users = DieselUserRepository::new(pg.pool.clone());
    let subjects = DieselSubjectRepository::new(pg.pool.clone());
    let materials = DieselMaterialRepository::new(pg.pool.clone());
    let ada = user_record("ada");
    let bob = user_record("bob");
    let math = subject_record("Math");
    let graphs = material_record("Graphs", math.id(), ada.id(), 0);
    users.insert(&ada).await.expect("insert ada");
    users.insert(&bob).await.expect("insert bob");
    subjects.insert(&math).await.expect("insert subject");
    materials.insert(&graphs).await.expect("insert material");
    (DieselRatingRepository::new(pg.pool.clone()), graphs, ada, bob)
}

#[rstest]
fn insert_names_the_missing_parent(pg: Option<PgCatalog>) {
    let Some(pg) = pg else { return };

    pg.block_on(async {
        let (ratings, graphs, _ada, bob) = rateable(&pg).await;
        let math = subject_record("Elsewhere");
        let unstored = material_record("Unstored", math.id(), bob.id(), 0);
        let stranger = user_record("stranger");

        assert_eq!(
            ratings
                .insert(&rating_record(3, unstored.id(), bob.id(), 1))
                .await,
            Err(RatingRepositoryError::material_not_found(*unstored.id()))
        );
        assert_eq!(
            ratings
                .insert(&rating_record(3, graphs.id(), stranger.id(), 1))
                .await,
            Err(RatingRepositoryError::user_not_found(*stranger.id()))
        );
        assert!(
            ratings
                .list_by_material(graphs.id())
                .await
                .expect("list")
                .is_empty()
        );
    });
}

#[rstest]
fn repeat_ratings_are_kept_in_creation_order(pg: Option<PgCatalog>) {
    let Some(pg) = pg else { return };

    pg.block_on(async {
        let (ratings, graphs, ada, bob) = rateable(&pg).await;
        let later = rating_record(2, graphs.id(), bob.id(), 2);
        let earlier = rating_record(4, graphs.id(), bob.id(), 1);
        let own = rating_record(5, graphs.id(), ada.id(), 3);
        for rating in [&later, &earlier, &own] {
            ratings.insert(rating).await.expect("insert");
        }

        assert_eq!(
            ratings.list_by_material(graphs.id()).await.expect("by material"),
            [earlier.clone(), later.clone(), own]
        );
        assert_eq!(
            ratings.list_by_user(bob.id()).await.expect("by user"),
            [earlier, later]
        );
    });
}

#[rstest]
fn update_and_delete_report_missing_rows(pg: Option<PgCatalog>) {
    let Some(pg) = pg else { return };

    pg.block_on(async {
        let (ratings, graphs, _ada, bob) = rateable(&pg).await;
        let rating = rating_record(1, graphs.id(), bob.id(), 1);
        ratings.insert(&rating).await.expect("insert");

        let rescored = rating.clone().with_score(Score::new(5).expect("in range"));
        assert_eq!(ratings.update(&rescored).await, Ok(true));
        assert_eq!(
            ratings.find_by_id(rating.id()).await.expect("lookup"),
            Some(rescored.clone())
        );

        assert_eq!(ratings.delete(rating.id()).await, Ok(true));
        assert_eq!(ratings.delete(rating.id()).await, Ok(false));
        assert_eq!(ratings.update(&rescored).await, Ok(false));
    });
}

#[rstest]
fn summary_averages_stored_scores(pg: Option<PgCatalog>) {
    let Some(pg) = pg else { return };
    let catalog = Catalog::over_postgres(&pg.pool);

    pg.block_on(async {
        let ada = catalog.user("ada").await;
        let bob = catalog.user("bob").await;
        let math = catalog.subject("Math", ada).await;
        let graphs = catalog.material("Graphs", math.id(), ada).await;
        for score in [2, 4] {
            catalog
                .state
                .ratings
                .create(graphs.id(), score, bob)
                .await
                .expect("rating recorded");
        }

        let summary = catalog
            .state
            .materials
            .summary(graphs.id())
            .await
            .expect("summary");
        assert_eq!(summary.rating_count, 2);
        assert_eq!(summary.average_score, Some(3.0));
    });
}
