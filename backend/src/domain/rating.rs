//! Rating data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{Error, field_error};
use super::{MaterialId, RatingId, UserId};

/// Lowest accepted score.
pub const SCORE_MIN: i64 = 1;
/// Highest accepted score.
pub const SCORE_MAX: i64 = 5;

/// Error returned when a score falls outside `SCORE_MIN..=SCORE_MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("score must be between 1 and 5")]
pub struct ScoreOutOfRange;

impl From<ScoreOutOfRange> for Error {
    fn from(value: ScoreOutOfRange) -> Self {
        field_error("score", "out_of_range", value.to_string())
    }
}

/// Integer score from 1 to 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Score(u8);

impl Score {
    /// Validate a raw score.
    pub fn new(raw: i64) -> Result<Self, ScoreOutOfRange> {
        if !(SCORE_MIN..=SCORE_MAX).contains(&raw) {
            return Err(ScoreOutOfRange);
        }
        u8::try_from(raw).map(Self).map_err(|_| ScoreOutOfRange)
    }

    /// Numeric value.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = ScoreOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for i64 {
    fn from(value: Score) -> Self {
        i64::from(value.0)
    }
}

/// One user's score for one material.
///
/// A user may rate the same material more than once; each rating is
/// independent and counts toward the material's summary. Listings are ordered
/// by `(created_at, id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rating {
    id: RatingId,
    score: Score,
    material_id: MaterialId,
    user_id: UserId,
    created_at: DateTime<Utc>,
}

impl Rating {
    pub fn new(
        id: RatingId,
        score: Score,
        material_id: MaterialId,
        user_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            score,
            material_id,
            user_id,
            created_at,
        }
    }

    pub fn id(&self) -> &RatingId {
        &self.id
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn material_id(&self) -> &MaterialId {
        &self.material_id
    }

    /// The rater.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn with_score(self, score: Score) -> Self {
        Self { score, ..self }
    }
}

/// Count and mean score of `ratings`; the mean is `None` when empty.
pub fn average_score<'a>(ratings: impl IntoIterator<Item = &'a Rating>) -> (usize, Option<f64>) {
    let (count, total) = ratings
        .into_iter()
        .fold((0_usize, 0_u64), |(count, total), rating| {
            (count + 1, total + u64::from(rating.score().get()))
        });
    if count == 0 {
        (0, None)
    } else {
        #[expect(
            clippy::cast_precision_loss,
            reason = "rating counts stay far below f64 mantissa precision"
        )]
        let average = total as f64 / count as f64;
        (count, Some(average))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn rating(score: i64) -> Rating {
        Rating::new(
            RatingId::random(),
            Score::new(score).expect("valid score"),
            MaterialId::random(),
            UserId::random(),
            Utc::now(),
        )
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-1)]
    #[case(i64::MAX)]
    fn rejects_out_of_range_scores(#[case] raw: i64) {
        assert_eq!(Score::new(raw), Err(ScoreOutOfRange));
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(5)]
    fn accepts_scores_in_range(#[case] raw: i64) {
        let score = Score::new(raw).expect("in range");
        assert_eq!(i64::from(score), raw);
    }

    #[rstest]
    fn out_of_range_maps_to_invalid_request() {
        let err = Error::from(ScoreOutOfRange);
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn deserialising_rejects_out_of_range() {
        assert!(serde_json::from_str::<Score>("6").is_err());
        assert_eq!(
            serde_json::from_str::<Score>("4").expect("valid score").get(),
            4
        );
    }

    #[rstest]
    fn average_of_no_ratings_is_absent() {
        assert_eq!(average_score(&[]), (0, None));
    }

    #[rstest]
    fn average_counts_every_rating() {
        let ratings = [rating(5), rating(4), rating(4)];
        let (count, average) = average_score(&ratings);
        assert_eq!(count, 3);
        let average = average.expect("average present");
        assert!((average - 13.0 / 3.0).abs() < f64::EPSILON);
    }
}
