use crate::db::{
    errors::Result,
    models::contacts::{ContactCreateDBRequest, ContactDBResponse, ContactWithStudentDBResponse},
};
use crate::types::{TeacherId, UserId};
use sqlx::PgConnection;

const COLUMNS: &str = "id, student_id, teacher_id, status, contact_cost, message, initiated_at, contacted_at";

pub struct Contacts<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Contacts<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Insert the contact record with status `contacted` and a fresh
    /// `contacted_at` stamp. The (student, teacher) unique index converts a
    /// creation race into a UniqueViolation the caller rolls back on.
    pub async fn create(&mut self, request: &ContactCreateDBRequest) -> Result<ContactDBResponse> {
        let contact = sqlx::query_as::<_, ContactDBResponse>(&format!(
            r#"
            INSERT INTO contacts (student_id, teacher_id, status, contact_cost, message, contacted_at)
            VALUES ($1, $2, 'contacted', $3, $4, NOW())
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.student_id)
        .bind(request.teacher_id)
        .bind(request.contact_cost)
        .bind(&request.message)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(contact)
    }

    pub async fn get_by_pair(&mut self, student_id: UserId, teacher_id: TeacherId) -> Result<Option<ContactDBResponse>> {
        let contact = sqlx::query_as::<_, ContactDBResponse>(&format!(
            "SELECT {COLUMNS} FROM contacts WHERE student_id = $1 AND teacher_id = $2"
        ))
        .bind(student_id)
        .bind(teacher_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(contact)
    }

    /// Contacts received by a tutor, newest first, with student details
    pub async fn list_for_teacher(&mut self, teacher_id: TeacherId) -> Result<Vec<ContactWithStudentDBResponse>> {
        let contacts = sqlx::query_as::<_, ContactWithStudentDBResponse>(
            r#"
            SELECT c.id, c.student_id, c.teacher_id, c.status, c.contact_cost, c.message,
                   c.initiated_at, c.contacted_at,
                   u.name AS student_name, u.email AS student_email
            FROM contacts c
            INNER JOIN users u ON c.student_id = u.id
            WHERE c.teacher_id = $1
            ORDER BY c.initiated_at DESC
            "#,
        )
        .bind(teacher_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(contacts)
    }
}
