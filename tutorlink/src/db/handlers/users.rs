use crate::db::{
    errors::Result,
    models::users::{UserCreateDBRequest, UserDBResponse},
};
use crate::types::UserId;
use sqlx::PgConnection;

pub struct Users<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    pub async fn create(&mut self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let user = sqlx::query_as::<_, UserDBResponse>(
            r#"
            INSERT INTO users (name, email, phone, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, phone, role, created_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(request.role)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(user)
    }

    pub async fn get_by_id(&mut self, id: UserId) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, UserDBResponse>("SELECT id, name, email, phone, role, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user)
    }

    pub async fn get_by_email(&mut self, email: &str) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, UserDBResponse>("SELECT id, name, email, phone, role, created_at FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user)
    }
}
