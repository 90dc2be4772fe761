//! Internal Diesel row structs.
//!
//! These never leave the persistence module; repositories convert them to
//! domain types and surface malformed rows as query errors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Email, Material, MaterialContent, MaterialId, MaterialType, MaterialUrl, PasswordDigest,
    Rating, RatingId, Role, Score, Subject, SubjectId, SubjectName, Title, User, UserId,
    Username,
};

use super::schema::{materials, ratings, subjects, users};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::new(&row.username).map_err(|err| err.to_string())?;
        let email = Email::new(&row.email).map_err(|err| err.to_string())?;
        let role = row
            .role
            .parse::<Role>()
            .map_err(|err| err.to_string())?;
        Ok(Self::new(
            UserId::from_uuid(row.id),
            username,
            email,
            PasswordDigest::new(row.password_hash),
            role,
        ))
    }
}

/// Insertable `users` row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            username: user.username().as_ref(),
            email: user.email().as_ref(),
            password_hash: user.password().as_str(),
            role: user.role().as_str(),
        }
    }
}

/// Profile fields a user may change.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileChangeset<'a> {
    pub username: &'a str,
    pub email: &'a str,
}

/// Row read from and written to `subjects`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = subjects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SubjectRow {
    pub id: Uuid,
    pub name: String,
}

impl From<&Subject> for SubjectRow {
    fn from(subject: &Subject) -> Self {
        Self {
            id: *subject.id().as_uuid(),
            name: subject.name().to_string(),
        }
    }
}

impl TryFrom<SubjectRow> for Subject {
    type Error = String;

    fn try_from(row: SubjectRow) -> Result<Self, Self::Error> {
        let name = SubjectName::new(&row.name).map_err(|err| err.to_string())?;
        Ok(Self::new(SubjectId::from_uuid(row.id), name))
    }
}

/// Row read from and written to `materials`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = materials)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MaterialRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub material_type: String,
    pub subject_id: Uuid,
    pub uploader_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&Material> for MaterialRow {
    fn from(material: &Material) -> Self {
        Self {
            id: *material.id().as_uuid(),
            title: material.title().as_ref().to_owned(),
            description: material.description().map(str::to_owned),
            url: material.url().as_ref().to_owned(),
            material_type: material.material_type().as_str().to_owned(),
            subject_id: *material.subject_id().as_uuid(),
            uploader_id: *material.uploader_id().as_uuid(),
            created_at: material.created_at(),
        }
    }
}

impl TryFrom<MaterialRow> for Material {
    type Error = String;

    fn try_from(row: MaterialRow) -> Result<Self, Self::Error> {
        let material_type = row
            .material_type
            .parse::<MaterialType>()
            .map_err(|err| err.to_string())?;
        let content = MaterialContent {
            title: Title::new(row.title).map_err(|err| err.to_string())?,
            description: row.description,
            url: MaterialUrl::new(row.url).map_err(|err| err.to_string())?,
            material_type,
            subject_id: SubjectId::from_uuid(row.subject_id),
        };
        Ok(Self::new(
            MaterialId::from_uuid(row.id),
            content,
            UserId::from_uuid(row.uploader_id),
            row.created_at,
        ))
    }
}

/// Editable `materials` columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = materials)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct MaterialChangeset<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub url: &'a str,
    pub material_type: &'a str,
    pub subject_id: Uuid,
}

impl<'a> From<&'a Material> for MaterialChangeset<'a> {
    fn from(material: &'a Material) -> Self {
        Self {
            title: material.title().as_ref(),
            description: material.description(),
            url: material.url().as_ref(),
            material_type: material.material_type().as_str(),
            subject_id: *material.subject_id().as_uuid(),
        }
    }
}

/// Row read from and written to `ratings`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = ratings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RatingRow {
    pub id: Uuid,
    pub score: i16,
    pub material_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&Rating> for RatingRow {
    fn from(rating: &Rating) -> Self {
        Self {
            id: *rating.id().as_uuid(),
            score: i16::from(rating.score().get()),
            material_id: *rating.material_id().as_uuid(),
            user_id: *rating.user_id().as_uuid(),
            created_at: rating.created_at(),
        }
    }
}

impl TryFrom<RatingRow> for Rating {
    type Error = String;

    fn try_from(row: RatingRow) -> Result<Self, Self::Error> {
        let score = Score::new(i64::from(row.score)).map_err(|err| err.to_string())?;
        Ok(Self::new(
            RatingId::from_uuid(row.id),
            score,
            MaterialId::from_uuid(row.material_id),
            UserId::from_uuid(row.user_id),
            row.created_at,
        ))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversions.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn material_rows_round_trip_through_the_domain() {
        let row = MaterialRow {
            id: Uuid::new_v4(),
            title: "Intro to Graphs".into(),
            description: None,
            url: "https://example.com".into(),
            material_type: "WEBSITE".into(),
            subject_id: Uuid::new_v4(),
            uploader_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        let material = Material::try_from(row.clone()).expect("valid row");
        let back = MaterialRow::from(&material);

        assert_eq!(back.id, row.id);
        assert_eq!(back.material_type, "WEBSITE");
        assert_eq!(back.created_at, row.created_at);
    }

    #[rstest]
    #[case("ADMIN")]
    #[case("student")]
    fn unknown_roles_are_rejected(#[case] role: &str) {
        let row = UserRow {
            id: Uuid::new_v4(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            password_hash: "x".into(),
            role: role.into(),
        };
        assert!(User::try_from(row).is_err());
    }

    #[rstest]
    fn out_of_range_scores_are_rejected() {
        let row = RatingRow {
            id: Uuid::new_v4(),
            score: 7,
            material_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        assert!(Rating::try_from(row).is_err());
    }
}
