//! Valid domain records with fixed timestamps.
//!
//! PostgreSQL keeps microseconds, so records written straight through a
//! repository use whole-minute timestamps and compare equal after a read.

use chrono::{DateTime, Duration, TimeZone, Utc};
use study_materials::domain::{
    Email, Material, MaterialContent, MaterialId, MaterialType, MaterialUrl, PasswordDigest,
    Rating, RatingId, Role, Score, Subject, SubjectId, SubjectName, Title, User, UserId, Username,
};

/// `minute` minutes past a fixed epoch.
pub fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid epoch")
        + Duration::minutes(minute)
}

pub fn user_record(username: &str) -> User {
    User::new(
        UserId::random(),
        Username::new(username).expect("valid username"),
        Email::new(format!("{username}@example.com")).expect("valid email"),
        PasswordDigest::new(format!("fixture${username}")),
        Role::Student,
    )
}

pub fn subject_record(name: &str) -> Subject {
    Subject::new(
        SubjectId::random(),
        SubjectName::new(name).expect("valid subject name"),
    )
}

pub fn material_record(title: &str, subject: &SubjectId, uploader: &UserId, minute: i64) -> Material {
    Material::new(
        MaterialId::random(),
        MaterialContent {
            title: Title::new(title).expect("valid title"),
            description: None,
            url: MaterialUrl::new("https://example.com/notes").expect("valid url"),
            material_type: MaterialType::Website,
            subject_id: *subject,
        },
        *uploader,
        at(minute),
    )
}

pub fn rating_record(score: i64, material: &MaterialId, rater: &UserId, minute: i64) -> Rating {
    Rating::new(
        RatingId::random(),
        Score::new(score).expect("score in range"),
        *material,
        *rater,
        at(minute),
    )
}
