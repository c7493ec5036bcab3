use crate::db::{
    errors::Result,
    models::applications::{
        ApplicationCreateDBRequest, ApplicationDBResponse, ApplicationStatus, ApplicationWithStudentDBResponse,
    },
};
use crate::types::{ApplicationId, PostId, TeacherId};
use sqlx::PgConnection;

const COLUMNS: &str = "id, teacher_id, post_id, status, application_cost, applied_at, contacted_at";

pub struct Applications<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Applications<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Insert the application (status defaults to `accepted`; the recorded
    /// cost is immutable thereafter). The (teacher, post) unique index is the
    /// backstop against duplicate-application races.
    pub async fn create(&mut self, request: &ApplicationCreateDBRequest) -> Result<ApplicationDBResponse> {
        let application = sqlx::query_as::<_, ApplicationDBResponse>(&format!(
            r#"
            INSERT INTO applications (teacher_id, post_id, application_cost)
            VALUES ($1, $2, $3)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.teacher_id)
        .bind(request.post_id)
        .bind(request.application_cost)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(application)
    }

    pub async fn get_by_pair(&mut self, teacher_id: TeacherId, post_id: PostId) -> Result<Option<ApplicationDBResponse>> {
        let application = sqlx::query_as::<_, ApplicationDBResponse>(&format!(
            "SELECT {COLUMNS} FROM applications WHERE teacher_id = $1 AND post_id = $2"
        ))
        .bind(teacher_id)
        .bind(post_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(application)
    }

    /// Load an application joined with the post owner's contact details and
    /// the owning tutor's user id (for the authorization check)
    pub async fn get_with_student(&mut self, id: ApplicationId) -> Result<Option<ApplicationWithStudentDBResponse>> {
        let application = sqlx::query_as::<_, ApplicationWithStudentDBResponse>(
            r#"
            SELECT a.id, a.teacher_id, a.post_id, a.status, a.application_cost, a.applied_at, a.contacted_at,
                   tp.user_id AS teacher_user_id,
                   u.name AS student_name, u.email AS student_email, u.phone AS student_phone,
                   p.phone AS post_phone
            FROM applications a
            INNER JOIN teacher_profiles tp ON a.teacher_id = tp.id
            INNER JOIN posts p ON a.post_id = p.id
            INNER JOIN users u ON p.user_id = u.id
            WHERE a.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(application)
    }

    /// Transition accepted -> contacted and stamp `contacted_at`. Returns
    /// false when the application was not in `accepted` (already contacted:
    /// the caller treats the reveal as an idempotent read).
    pub async fn mark_contacted(&mut self, id: ApplicationId) -> Result<bool> {
        let result = sqlx::query("UPDATE applications SET status = 'contacted', contacted_at = NOW() WHERE id = $1 AND status = 'accepted'")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Moderation overwrite of the status
    pub async fn set_status(&mut self, id: ApplicationId, status: ApplicationStatus) -> Result<ApplicationDBResponse> {
        let application =
            sqlx::query_as::<_, ApplicationDBResponse>(&format!("UPDATE applications SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"))
                .bind(id)
                .bind(status)
                .fetch_one(&mut *self.db)
                .await?;

        Ok(application)
    }

    /// A tutor's applications, newest first
    pub async fn list_for_teacher(&mut self, teacher_id: TeacherId) -> Result<Vec<ApplicationDBResponse>> {
        let applications =
            sqlx::query_as::<_, ApplicationDBResponse>(&format!("SELECT {COLUMNS} FROM applications WHERE teacher_id = $1 ORDER BY applied_at DESC"))
                .bind(teacher_id)
                .fetch_all(&mut *self.db)
                .await?;

        Ok(applications)
    }
}
