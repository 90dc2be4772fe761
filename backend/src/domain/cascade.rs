//! Outcome of cascading deletes.

use serde::Serialize;

/// Dependent records removed alongside a deleted entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    /// Materials removed because they belonged to the deleted entity.
    pub materials_removed: usize,
    /// Ratings removed, including those attached to removed materials.
    pub ratings_removed: usize,
}

impl CascadeReport {
    /// Fold another report into this one.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            materials_removed: self.materials_removed + other.materials_removed,
            ratings_removed: self.ratings_removed + other.ratings_removed,
        }
    }
}
