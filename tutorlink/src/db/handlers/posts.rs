use crate::db::{
    errors::Result,
    models::posts::{PostCreateDBRequest, PostDBResponse},
};
use crate::types::PostId;
use sqlx::PgConnection;
use sqlx::types::Json;

const COLUMNS: &str = "id, user_id, description, subjects, languages, location, phone, created_at";

pub struct Posts<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Posts<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    pub async fn create(&mut self, request: &PostCreateDBRequest) -> Result<PostDBResponse> {
        let post = sqlx::query_as::<_, PostDBResponse>(&format!(
            r#"
            INSERT INTO posts (user_id, description, subjects, languages, location, phone)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.user_id)
        .bind(&request.description)
        .bind(Json(&request.subjects))
        .bind(&request.languages)
        .bind(&request.location)
        .bind(&request.phone)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(post)
    }

    pub async fn get_by_id(&mut self, id: PostId) -> Result<Option<PostDBResponse>> {
        let post = sqlx::query_as::<_, PostDBResponse>(&format!("SELECT {COLUMNS} FROM posts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(post)
    }
}
