//! API models for the content resource tree.

use crate::db::handlers::resources::SubjectResourcesDBResponse;
use crate::db::models::resources::{Difficulty, Mcq, NoteTopic, PastPaper, ResourceDoc, ResourceKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

/// Request body for adding or replacing a single MCQ (topic and sub-section
/// come from the path)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct McqCreate {
    pub question: String,
    pub options: Vec<String>,
    pub correct_option: u8,
    #[serde(default)]
    pub explanation: Option<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub marks: Option<i32>,
}

impl McqCreate {
    /// Validate and convert into the stored MCQ form
    pub fn into_mcq(self, topic: &str, sub_topic: &str) -> Result<Mcq, String> {
        let question = self.question.trim().to_string();
        if question.is_empty() {
            return Err("question must not be empty".to_string());
        }
        if self.options.len() < 2 {
            return Err("at least two options are required".to_string());
        }
        if usize::from(self.correct_option) >= self.options.len() {
            return Err(format!("correct_option {} is out of range", self.correct_option));
        }
        let marks = self.marks.unwrap_or(1);
        if marks < 1 {
            return Err("marks must be at least 1".to_string());
        }
        let now = Utc::now();
        Ok(Mcq {
            question,
            options: self.options.into_iter().map(|o| o.trim().to_string()).collect(),
            correct_option: self.correct_option,
            explanation: self.explanation.map(|e| e.trim().to_string()).unwrap_or_default(),
            difficulty: self.difficulty,
            marks,
            topic: topic.to_string(),
            sub_topic: sub_topic.to_string(),
            created_at: now,
            updated_at: now,
        })
    }
}

/// One item of a bulk import. Every field is optional at the wire level so a
/// malformed item is skipped and recorded instead of failing the whole batch.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BulkMcqItem {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub sub_topic: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub correct_option: Option<u8>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub marks: Option<i32>,
}

impl BulkMcqItem {
    /// Short label for error reporting
    pub fn label(&self) -> String {
        self.question
            .as_deref()
            .map(|q| q.chars().take(50).collect())
            .unwrap_or_else(|| "Unknown question".to_string())
    }

    /// Validate into (topic, sub_topic, mcq); Err carries the reason the item
    /// is skipped
    pub fn into_grouped_mcq(self) -> Result<(String, String, Mcq), String> {
        let label = self.label();
        let (Some(topic), Some(sub_topic)) = (self.topic.clone(), self.sub_topic.clone()) else {
            return Err(format!("Missing topic or sub_topic for question: {label}"));
        };
        let (Some(question), Some(options), Some(correct_option), Some(difficulty)) =
            (self.question, self.options, self.correct_option, self.difficulty)
        else {
            return Err(format!("Missing required fields for question: {label}"));
        };

        let mcq = McqCreate {
            question,
            options,
            correct_option,
            explanation: self.explanation,
            difficulty,
            marks: self.marks,
        }
        .into_mcq(topic.trim(), sub_topic.trim())
        .map_err(|e| format!("{e} for question: {label}"))?;

        Ok((topic.trim().to_string(), sub_topic.trim().to_string(), mcq))
    }
}

/// Request body for appending several MCQs to one topic/sub-section
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct McqBatchCreate {
    pub mcqs: Vec<McqCreate>,
}

/// Summary returned after a batch append
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct McqBatchResult {
    pub added_count: usize,
    pub total_in_sub_section: usize,
    pub total_in_topic: usize,
}

/// Request body for the bulk import
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BulkImportRequest {
    pub mcqs: Vec<BulkMcqItem>,
}

/// Outcome of the PDF render/upload for one (topic, sub-topic) group
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PdfOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcq_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-topic breakdown of a bulk import
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TopicBreakdown {
    pub added: usize,
    pub sub_topics: BTreeMap<String, usize>,
}

/// Structured result of a bulk import. Per-item failures are accumulated
/// here, never raised.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BulkImportResult {
    pub added: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
    pub by_topic: BTreeMap<String, TopicBreakdown>,
    pub pdfs_generated: BTreeMap<String, BTreeMap<String, PdfOutcome>>,
}

/// Request body for the resource-type toggle
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ToggleRequest {
    pub is_enabled: bool,
}

/// Request body for the whole-document upsert
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResourceUpsert {
    pub resources: ResourceDoc,
}

/// Path-addressable resource kinds use their snake_case names; this wrapper
/// keeps unknown names a 400 rather than a panic
pub fn parse_resource_kind(raw: &str) -> Option<ResourceKind> {
    serde_json::from_value(serde_json::Value::String(raw.to_string())).ok()
}

/// Request body for adding/replacing a revision note
pub type RevisionNoteCreate = NoteTopic;

/// Request body for adding/replacing a past paper
pub type PastPaperCreate = PastPaper;

/// The full document with its identity, as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResourceDocResponse {
    pub subject_id: Uuid,
    pub course_id: Uuid,
    pub exam_board: String,
    pub resources: ResourceDoc,
    pub is_empty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ResourceDocResponse {
    /// The empty structure returned for a triple with no stored document
    pub fn empty(subject_id: Uuid, course_id: Uuid, exam_board: &str) -> Self {
        Self {
            subject_id,
            course_id,
            exam_board: exam_board.to_string(),
            resources: ResourceDoc::default(),
            is_empty: true,
            created_at: None,
            updated_at: None,
        }
    }
}

impl From<SubjectResourcesDBResponse> for ResourceDocResponse {
    fn from(row: SubjectResourcesDBResponse) -> Self {
        Self {
            subject_id: row.subject_id,
            course_id: row.course_id,
            exam_board: row.exam_board,
            resources: row.resources.0,
            is_empty: false,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mcq_create_validates_bounds() {
        let base = McqCreate {
            question: "  What is 2+2?  ".to_string(),
            options: vec!["3".into(), "4".into(), "5".into(), "6".into()],
            correct_option: 1,
            explanation: None,
            difficulty: Difficulty::Easy,
            marks: None,
        };

        let mcq = base.clone().into_mcq("Arithmetic", "Addition").unwrap();
        assert_eq!(mcq.question, "What is 2+2?");
        assert_eq!(mcq.marks, 1);
        assert_eq!(mcq.topic, "Arithmetic");

        let mut bad = base.clone();
        bad.correct_option = 4;
        assert!(bad.into_mcq("t", "s").is_err());

        let mut bad = base.clone();
        bad.question = "   ".to_string();
        assert!(bad.into_mcq("t", "s").is_err());

        let mut bad = base;
        bad.marks = Some(0);
        assert!(bad.into_mcq("t", "s").is_err());
    }

    #[test]
    fn bulk_item_missing_fields_reports_and_skips() {
        let item = BulkMcqItem {
            topic: Some("Mechanics".into()),
            sub_topic: None,
            question: Some("A question that is quite long".into()),
            options: Some(vec!["a".into(), "b".into()]),
            correct_option: Some(0),
            explanation: None,
            difficulty: Some(Difficulty::Hard),
            marks: None,
        };
        let err = item.into_grouped_mcq().unwrap_err();
        assert!(err.contains("Missing topic or sub_topic"));
    }

    #[test]
    fn bulk_item_valid_groups_by_trimmed_names() {
        let item = BulkMcqItem {
            topic: Some(" Mechanics ".into()),
            sub_topic: Some("Kinematics".into()),
            question: Some("q".into()),
            options: Some(vec!["a".into(), "b".into()]),
            correct_option: Some(1),
            explanation: Some("why".into()),
            difficulty: Some(Difficulty::Medium),
            marks: Some(2),
        };
        let (topic, sub_topic, mcq) = item.into_grouped_mcq().unwrap();
        assert_eq!(topic, "Mechanics");
        assert_eq!(sub_topic, "Kinematics");
        assert_eq!(mcq.marks, 2);
    }

    #[test]
    fn resource_kind_parses_snake_case_names_only() {
        assert_eq!(parse_resource_kind("exam_questions"), Some(ResourceKind::ExamQuestions));
        assert_eq!(parse_resource_kind("past_papers"), Some(ResourceKind::PastPapers));
        assert_eq!(parse_resource_kind("examQuestions"), None);
        assert_eq!(parse_resource_kind("bogus"), None);
    }
}
