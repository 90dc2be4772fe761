//! Tests for `DieselSubjectRepository`.

use rstest::{fixture, rstest};
use study_materials::domain::ports::{
    MaterialFilter, MaterialRepository, RatingRepository, SubjectRepository,
    SubjectRepositoryError,
};
use study_materials::domain::{CascadeReport, SubjectName};
use study_materials::outbound::persistence::{
    DieselMaterialRepository, DieselRatingRepository, DieselSubjectRepository,
};

use crate::support::Catalog;
use crate::support::embedded_postgres::{PgCatalog, pg_catalog};
use crate::support::records::subject_record;

#[fixture]
fn pg() -> Option<PgCatalog> {
    pg_catalog()
}

#[rstest]
fn subject_delete_counts_exactly_what_it_removes(pg: Option<PgCatalog>) {
    let Some(pg) = pg else { return };
    let catalog = Catalog::over_postgres(&pg.pool);
    let materials = DieselMaterialRepository::new(pg.pool.clone());
    let ratings = DieselRatingRepository::new(pg.pool.clone());

    pg.block_on(async {
        let ada = catalog.user("ada").await;
        let bob = catalog.user("bob").await;
        let doomed = catalog.subject("Chemistry", ada).await;
        let kept = catalog.subject("Biology", ada).await;

        let mut expected_ratings = 0;
        for (index, rating_count) in [0_usize, 1, 3].into_iter().enumerate() {
            let material = catalog
                .material(&format!("Chem {index}"), doomed.id(), ada)
                .await;
            for _ in 0..rating_count {
                catalog
                    .state
                    .ratings
                    .create(material.id(), 4, bob)
                    .await
                    .expect("rating recorded");
            }
            expected_ratings += rating_count;
        }
        let survivor = catalog.material("Cells", kept.id(), ada).await;
        catalog
            .state
            .ratings
            .create(survivor.id(), 5, bob)
            .await
            .expect("rating recorded");

        let report = catalog
            .state
            .subjects
            .delete(doomed.id(), ada)
            .await
            .expect("subject deleted");

        assert_eq!(
            report,
            CascadeReport {
                materials_removed: 3,
                ratings_removed: expected_ratings,
            }
        );
        let remaining = materials
            .list(&MaterialFilter::All)
            .await
            .expect("list materials");
        assert_eq!(
            remaining.iter().map(|m| *m.id()).collect::<Vec<_>>(),
            [*survivor.id()]
        );
        let bob_id = bob.user_id().expect("authenticated");
        assert_eq!(ratings.list_by_user(bob_id).await.expect("ratings").len(), 1);
    });
}

#[rstest]
fn deleting_a_missing_subject_reports_nothing(pg: Option<PgCatalog>) {
    let Some(pg) = pg else { return };
    let repo = DieselSubjectRepository::new(pg.pool.clone());

    pg.block_on(async {
        let ghost = subject_record("Ghost");
        assert_eq!(repo.delete(ghost.id()).await.expect("delete runs"), None);
    });
}

#[rstest]
fn racing_creations_keep_one_name(pg: Option<PgCatalog>) {
    let Some(pg) = pg else { return };
    let repo = DieselSubjectRepository::new(pg.pool.clone());
    let first = subject_record("Physics");
    let second = subject_record("Physics");

    pg.block_on(async {
        let (a, b) = tokio::join!(repo.insert(&first), repo.insert(&second));
        let mut outcomes = [a, b];
        outcomes.sort_by_key(Result::is_err);
        let [won, lost] = outcomes;
        assert_eq!(won, Ok(()));
        assert_eq!(
            lost,
            Err(SubjectRepositoryError::duplicate_name("Physics"))
        );
        assert_eq!(repo.list().await.expect("list").len(), 1);
    });
}

#[rstest]
fn rename_onto_a_taken_name_conflicts(pg: Option<PgCatalog>) {
    let Some(pg) = pg else { return };
    let repo = DieselSubjectRepository::new(pg.pool.clone());
    let physics = subject_record("Physics");
    let chemistry = subject_record("Chemistry");

    pg.block_on(async {
        repo.insert(&physics).await.expect("insert physics");
        repo.insert(&chemistry).await.expect("insert chemistry");

        let clash = chemistry
            .clone()
            .renamed(SubjectName::new("Physics").expect("valid name"));
        assert_eq!(
            repo.update(&clash).await,
            Err(SubjectRepositoryError::duplicate_name("Physics"))
        );
        let stored = repo.find_by_id(chemistry.id()).await.expect("lookup");
        assert_eq!(stored, Some(chemistry));

        let unsaved = subject_record("Astronomy");
        assert!(!repo.update(&unsaved).await.expect("update runs"));
    });
}

#[rstest]
#[case("maths", &["Discrete Maths", "MATHS 101", "Maths_2"])]
#[case("%", &["100% Theory"])]
#[case("_", &["Maths_2"])]
#[case("chemistry", &[])]
fn search_ignores_case_and_treats_wildcards_literally(
    pg: Option<PgCatalog>,
    #[case] keyword: &str,
    #[case] expected: &[&str],
) {
    let Some(pg) = pg else { return };
    let repo = DieselSubjectRepository::new(pg.pool.clone());

    pg.block_on(async {
        for name in ["Discrete Maths", "MATHS 101", "Art", "100% Theory", "Maths_2"] {
            repo.insert(&subject_record(name)).await.expect("insert");
        }

        let mut names: Vec<String> = repo
            .search(keyword)
            .await
            .expect("search")
            .iter()
            .map(|subject| subject.name().as_ref().to_owned())
            .collect();
        names.sort();
        assert_eq!(names, expected);
    });
}
