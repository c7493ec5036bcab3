use crate::db::{
    errors::Result,
    models::teachers::{TeacherProfileCreateDBRequest, TeacherProfileDBResponse},
};
use crate::types::{TeacherId, UserId};
use sqlx::PgConnection;
use sqlx::types::Json;

const COLUMNS: &str = "id, user_id, subjects, languages, is_approved, created_at";

pub struct TeacherProfiles<'c> {
    db: &'c mut PgConnection,
}

impl<'c> TeacherProfiles<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    pub async fn create(&mut self, request: &TeacherProfileCreateDBRequest) -> Result<TeacherProfileDBResponse> {
        let profile = sqlx::query_as::<_, TeacherProfileDBResponse>(&format!(
            r#"
            INSERT INTO teacher_profiles (user_id, subjects, languages)
            VALUES ($1, $2, $3)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.user_id)
        .bind(Json(&request.subjects))
        .bind(&request.languages)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(profile)
    }

    pub async fn get_by_id(&mut self, id: TeacherId) -> Result<Option<TeacherProfileDBResponse>> {
        let profile = sqlx::query_as::<_, TeacherProfileDBResponse>(&format!("SELECT {COLUMNS} FROM teacher_profiles WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(profile)
    }

    pub async fn get_by_user(&mut self, user_id: UserId) -> Result<Option<TeacherProfileDBResponse>> {
        let profile = sqlx::query_as::<_, TeacherProfileDBResponse>(&format!("SELECT {COLUMNS} FROM teacher_profiles WHERE user_id = $1"))
            .bind(user_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(profile)
    }

    /// Moderation switch; approval gates both contact initiation and applying
    pub async fn set_approval(&mut self, id: TeacherId, is_approved: bool) -> Result<TeacherProfileDBResponse> {
        let profile = sqlx::query_as::<_, TeacherProfileDBResponse>(&format!(
            "UPDATE teacher_profiles SET is_approved = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(is_approved)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(profile)
    }
}
