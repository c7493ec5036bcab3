//! Repository for the per-(subject, course, exam board) resource documents.
//!
//! Writes follow load -> mutate in memory -> write back. The write-back is
//! guarded by the `revision` column: `save` only applies when the stored
//! revision still matches the one that was loaded, surfacing a concurrent
//! write as [`DbError::StaleRevision`] so the caller can reload and retry.
//! The unique index on the triple backstops create races.

use crate::db::{
    errors::{DbError, Result},
    models::resources::ResourceDoc,
};
use crate::types::{ResourceId, UserId};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

const COLUMNS: &str = "id, subject_id, course_id, exam_board, resources, revision, created_by, created_at, updated_at";

/// Database row for a resource document
#[derive(Debug, Clone, FromRow)]
pub struct SubjectResourcesDBResponse {
    pub id: ResourceId,
    pub subject_id: Uuid,
    pub course_id: Uuid,
    pub exam_board: String,
    pub resources: Json<ResourceDoc>,
    pub revision: i64,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct SubjectResources<'c> {
    db: &'c mut PgConnection,
}

impl<'c> SubjectResources<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    pub async fn get(&mut self, subject_id: Uuid, course_id: Uuid, exam_board: &str) -> Result<Option<SubjectResourcesDBResponse>> {
        let row = sqlx::query_as::<_, SubjectResourcesDBResponse>(&format!(
            "SELECT {COLUMNS} FROM subject_resources WHERE subject_id = $1 AND course_id = $2 AND exam_board = $3"
        ))
        .bind(subject_id)
        .bind(course_id)
        .bind(exam_board)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(row)
    }

    /// All documents attached to one course
    pub async fn list_by_course(&mut self, course_id: Uuid) -> Result<Vec<SubjectResourcesDBResponse>> {
        let rows = sqlx::query_as::<_, SubjectResourcesDBResponse>(&format!(
            "SELECT {COLUMNS} FROM subject_resources WHERE course_id = $1 ORDER BY exam_board, subject_id"
        ))
        .bind(course_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows)
    }

    /// Create the row for a triple. A concurrent create surfaces as
    /// UniqueViolation; callers reload and fall through to the update path.
    pub async fn create(
        &mut self,
        subject_id: Uuid,
        course_id: Uuid,
        exam_board: &str,
        doc: &ResourceDoc,
        created_by: Option<UserId>,
    ) -> Result<SubjectResourcesDBResponse> {
        let row = sqlx::query_as::<_, SubjectResourcesDBResponse>(&format!(
            r#"
            INSERT INTO subject_resources (subject_id, course_id, exam_board, resources, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(subject_id)
        .bind(course_id)
        .bind(exam_board)
        .bind(Json(doc))
        .bind(created_by)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(row)
    }

    /// Atomic upsert of the whole document, keyed by the triple
    pub async fn upsert(
        &mut self,
        subject_id: Uuid,
        course_id: Uuid,
        exam_board: &str,
        doc: &ResourceDoc,
        created_by: Option<UserId>,
    ) -> Result<SubjectResourcesDBResponse> {
        let row = sqlx::query_as::<_, SubjectResourcesDBResponse>(&format!(
            r#"
            INSERT INTO subject_resources (subject_id, course_id, exam_board, resources, created_by)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (subject_id, course_id, exam_board)
            DO UPDATE SET resources = EXCLUDED.resources, revision = subject_resources.revision + 1, updated_at = NOW()
            RETURNING {COLUMNS}
            "#
        ))
        .bind(subject_id)
        .bind(course_id)
        .bind(exam_board)
        .bind(Json(doc))
        .bind(created_by)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(row)
    }

    /// Write a mutated document back, bumping the revision. Fails with
    /// [`DbError::StaleRevision`] when someone else wrote in between.
    pub async fn save(&mut self, id: ResourceId, doc: &ResourceDoc, expected_revision: i64) -> Result<SubjectResourcesDBResponse> {
        let row = sqlx::query_as::<_, SubjectResourcesDBResponse>(&format!(
            r#"
            UPDATE subject_resources
            SET resources = $2, revision = revision + 1, updated_at = NOW()
            WHERE id = $1 AND revision = $3
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(Json(doc))
        .bind(expected_revision)
        .fetch_optional(&mut *self.db)
        .await?;

        row.ok_or(DbError::StaleRevision {
            entity: "subject_resources".to_string(),
        })
    }
}
