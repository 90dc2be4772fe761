//! Diesel table definitions mirroring `backend/migrations`.
//!
//! Kept in step with the migrations by hand; regenerate with
//! `diesel print-schema` after changing them.

diesel::table! {
    /// Registered accounts. `username` and `email` carry unique constraints.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// `STUDENT` or `TEACHER`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Subjects with unique names.
    subjects (id) {
        id -> Uuid,
        name -> Varchar,
    }
}

diesel::table! {
    /// Published materials. Rows vanish with their subject or uploader.
    materials (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        url -> Text,
        material_type -> Varchar,
        subject_id -> Uuid,
        uploader_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Scores from 1 to 5. Rows vanish with their material or rater.
    ratings (id) {
        id -> Uuid,
        score -> Int2,
        material_id -> Uuid,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(materials -> subjects (subject_id));
diesel::joinable!(materials -> users (uploader_id));
diesel::joinable!(ratings -> materials (material_id));
diesel::joinable!(ratings -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, subjects, materials, ratings);
