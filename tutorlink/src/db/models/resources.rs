//! The nested learning-resource document stored per (subject, course, exam board).
//!
//! The document is persisted as a single JSONB value and mutated in memory:
//! load, apply one of the methods below, write back (the repository guards
//! the write-back with an optimistic revision check). All aggregate counters
//! are recomputed from the source lists on every mutation rather than
//! incremented, so a stale stored counter can never survive a write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Errors from in-memory document mutations
#[derive(Debug, Error, PartialEq)]
pub enum ResourceDocError {
    #[error("Topic '{name}' not found")]
    TopicNotFound { name: String },

    #[error("Sub-section '{name}' not found")]
    SubSectionNotFound { name: String },

    #[error("MCQ at index {index} not found")]
    McqNotFound { index: usize },

    #[error("Revision note at index {index} not found")]
    NoteNotFound { index: usize },

    #[error("Past paper at index {index} not found")]
    PaperNotFound { index: usize },

    #[error("Order {order} already exists (used by '{existing_title}')")]
    DuplicateOrder { order: i32, existing_title: String },
}

impl From<ResourceDocError> for crate::errors::Error {
    fn from(err: ResourceDocError) -> Self {
        match err {
            ResourceDocError::DuplicateOrder { order, existing_title } => crate::errors::Error::Conflict {
                message: format!("Order {order} already exists (used by '{existing_title}'). Please use a different order number."),
            },
            ResourceDocError::TopicNotFound { name } => crate::errors::Error::not_found("Topic", name),
            ResourceDocError::SubSectionNotFound { name } => crate::errors::Error::not_found("Sub-section", name),
            ResourceDocError::McqNotFound { index } => crate::errors::Error::not_found("MCQ", index),
            ResourceDocError::NoteNotFound { index } => crate::errors::Error::not_found("Revision note", index),
            ResourceDocError::PaperNotFound { index } => crate::errors::Error::not_found("Past paper", index),
        }
    }
}

/// MCQ difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A single multiple-choice question
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Mcq {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`, 0..=3
    pub correct_option: u8,
    #[serde(default)]
    pub explanation: String,
    pub difficulty: Difficulty,
    #[serde(default = "default_marks")]
    pub marks: i32,
    pub topic: String,
    pub sub_topic: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_marks() -> i32 {
    1
}

/// A sub-section of an exam-question topic, holding its MCQs and the
/// generated summary PDF reference
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SubSection {
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mcqs: Vec<Mcq>,
    #[serde(default)]
    pub total_questions: usize,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub pdf_key: Option<String>,
}

/// An exam-question topic
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ExamTopic {
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sub_sections: Vec<SubSection>,
    #[serde(default)]
    pub total_questions: usize,
}

/// An image attached to a revision note
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NoteImage {
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// A sub-topic within a revision-note topic
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NoteSubTopic {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub image: Option<NoteImage>,
}

/// A revision-note topic. `order` must be unique within the document's
/// revision notes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NoteTopic {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub images: Vec<NoteImage>,
    pub order: i32,
    #[serde(default)]
    pub sub_topics: Vec<NoteSubTopic>,
}

/// A flashcard
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

/// A targeted practice test definition
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TargetTest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub time_limit: Option<i32>,
    #[serde(default)]
    pub total_marks: Option<i32>,
}

/// A past paper (also used for mock exams)
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PastPaper {
    pub year: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub paper_number: Option<String>,
    pub pdf_url: String,
    #[serde(default)]
    pub pdf_key: Option<String>,
    #[serde(default)]
    pub file_size: Option<String>,
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub total_marks: Option<i32>,
}

/// A free-form extra resource (worksheet, video link, ...)
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AdditionalResource {
    pub name: String,
    #[serde(rename = "type", default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// A resource collection with its enablement flag
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Section<T> {
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub items: Vec<T>,
}

/// Which resource collection an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    ExamQuestions,
    RevisionNotes,
    Flashcards,
    TargetTests,
    MockExams,
    PastPapers,
    AdditionalResources,
}

/// The full nested resource document
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ResourceDoc {
    #[serde(default)]
    pub exam_questions: Section<ExamTopic>,
    #[serde(default)]
    pub revision_notes: Section<NoteTopic>,
    #[serde(default)]
    pub flashcards: Section<Flashcard>,
    #[serde(default)]
    pub target_tests: Section<TargetTest>,
    #[serde(default)]
    pub mock_exams: Section<PastPaper>,
    #[serde(default)]
    pub past_papers: Section<PastPaper>,
    #[serde(default)]
    pub additional_resources: Section<AdditionalResource>,
}

impl ResourceDoc {
    /// Recompute every aggregate counter from the underlying lists.
    ///
    /// Invariants restored: `sub_section.total_questions == mcqs.len()` and
    /// `topic.total_questions == Σ sub_section.total_questions`.
    pub fn recompute_totals(&mut self) {
        for topic in &mut self.exam_questions.items {
            for sub in &mut topic.sub_sections {
                sub.total_questions = sub.mcqs.len();
            }
            topic.total_questions = topic.sub_sections.iter().map(|s| s.total_questions).sum();
        }
    }

    fn find_or_create_topic(&mut self, name: &str) -> &mut ExamTopic {
        // Positional lookup to satisfy the borrow checker on the create path
        if let Some(idx) = self.exam_questions.items.iter().position(|t| t.name == name) {
            &mut self.exam_questions.items[idx]
        } else {
            self.exam_questions.items.push(ExamTopic {
                name: name.to_string(),
                code: name.to_string(),
                ..Default::default()
            });
            self.exam_questions.items.last_mut().expect("just pushed")
        }
    }

    fn topic_mut(&mut self, name: &str) -> Result<&mut ExamTopic, ResourceDocError> {
        self.exam_questions
            .items
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| ResourceDocError::TopicNotFound { name: name.to_string() })
    }

    /// Append an MCQ, creating the topic and sub-section when absent.
    /// Enables exam questions as a side effect of the first write.
    pub fn add_mcq(&mut self, topic_name: &str, sub_section_name: &str, mcq: Mcq) {
        self.exam_questions.is_enabled = true;
        let topic = self.find_or_create_topic(topic_name);
        let sub = find_or_create_sub_section(topic, sub_section_name);
        sub.mcqs.push(mcq);
        self.recompute_totals();
    }

    /// Replace the MCQ at a positional index
    pub fn update_mcq(&mut self, topic_name: &str, sub_section_name: &str, index: usize, mcq: Mcq) -> Result<(), ResourceDocError> {
        let topic = self.topic_mut(topic_name)?;
        let sub = sub_section_mut(topic, sub_section_name)?;
        if index >= sub.mcqs.len() {
            return Err(ResourceDocError::McqNotFound { index });
        }
        sub.mcqs[index] = mcq;
        self.recompute_totals();
        Ok(())
    }

    /// Remove the MCQ at a positional index
    pub fn delete_mcq(&mut self, topic_name: &str, sub_section_name: &str, index: usize) -> Result<(), ResourceDocError> {
        let topic = self.topic_mut(topic_name)?;
        let sub = sub_section_mut(topic, sub_section_name)?;
        if index >= sub.mcqs.len() {
            return Err(ResourceDocError::McqNotFound { index });
        }
        sub.mcqs.remove(index);
        self.recompute_totals();
        Ok(())
    }

    /// Record the generated summary PDF for a sub-section. Returns false when
    /// the (topic, sub-section) pair does not exist.
    pub fn set_sub_section_pdf(&mut self, topic_name: &str, sub_section_name: &str, url: String, key: String) -> bool {
        let Some(topic) = self.exam_questions.items.iter_mut().find(|t| t.name == topic_name) else {
            return false;
        };
        let Some(sub) = topic.sub_sections.iter_mut().find(|s| s.name == sub_section_name) else {
            return false;
        };
        sub.pdf_url = Some(url);
        sub.pdf_key = Some(key);
        true
    }

    /// Add a revision-note topic. Rejects a duplicate `order` value without
    /// mutating the document.
    pub fn add_revision_note(&mut self, note: NoteTopic) -> Result<(), ResourceDocError> {
        if let Some(existing) = self.revision_notes.items.iter().find(|t| t.order == note.order) {
            return Err(ResourceDocError::DuplicateOrder {
                order: note.order,
                existing_title: existing.title.clone(),
            });
        }
        self.revision_notes.is_enabled = true;
        self.revision_notes.items.push(note);
        Ok(())
    }

    /// Replace the revision note at a positional index. The duplicate-order
    /// check excludes the index being replaced.
    pub fn update_revision_note(&mut self, index: usize, note: NoteTopic) -> Result<(), ResourceDocError> {
        if index >= self.revision_notes.items.len() {
            return Err(ResourceDocError::NoteNotFound { index });
        }
        if let Some(existing) = self
            .revision_notes
            .items
            .iter()
            .enumerate()
            .find(|(i, t)| t.order == note.order && *i != index)
            .map(|(_, t)| t)
        {
            return Err(ResourceDocError::DuplicateOrder {
                order: note.order,
                existing_title: existing.title.clone(),
            });
        }
        self.revision_notes.items[index] = note;
        Ok(())
    }

    /// Remove the revision note at a positional index
    pub fn delete_revision_note(&mut self, index: usize) -> Result<(), ResourceDocError> {
        if index >= self.revision_notes.items.len() {
            return Err(ResourceDocError::NoteNotFound { index });
        }
        self.revision_notes.items.remove(index);
        Ok(())
    }

    /// Set a resource collection's enablement flag. Idempotent.
    pub fn toggle(&mut self, kind: ResourceKind, is_enabled: bool) {
        match kind {
            ResourceKind::ExamQuestions => self.exam_questions.is_enabled = is_enabled,
            ResourceKind::RevisionNotes => self.revision_notes.is_enabled = is_enabled,
            ResourceKind::Flashcards => self.flashcards.is_enabled = is_enabled,
            ResourceKind::TargetTests => self.target_tests.is_enabled = is_enabled,
            ResourceKind::MockExams => self.mock_exams.is_enabled = is_enabled,
            ResourceKind::PastPapers => self.past_papers.is_enabled = is_enabled,
            ResourceKind::AdditionalResources => self.additional_resources.is_enabled = is_enabled,
        }
    }

    /// Append a past paper
    pub fn add_past_paper(&mut self, paper: PastPaper) {
        self.past_papers.is_enabled = true;
        self.past_papers.items.push(paper);
    }

    /// Replace the past paper at a positional index
    pub fn update_past_paper(&mut self, index: usize, paper: PastPaper) -> Result<(), ResourceDocError> {
        if index >= self.past_papers.items.len() {
            return Err(ResourceDocError::PaperNotFound { index });
        }
        self.past_papers.items[index] = paper;
        Ok(())
    }

    /// Remove the past paper at a positional index
    pub fn delete_past_paper(&mut self, index: usize) -> Result<(), ResourceDocError> {
        if index >= self.past_papers.items.len() {
            return Err(ResourceDocError::PaperNotFound { index });
        }
        self.past_papers.items.remove(index);
        Ok(())
    }
}

fn find_or_create_sub_section<'t>(topic: &'t mut ExamTopic, name: &str) -> &'t mut SubSection {
    if let Some(idx) = topic.sub_sections.iter().position(|s| s.name == name) {
        &mut topic.sub_sections[idx]
    } else {
        topic.sub_sections.push(SubSection {
            name: name.to_string(),
            code: name.to_string(),
            ..Default::default()
        });
        topic.sub_sections.last_mut().expect("just pushed")
    }
}

fn sub_section_mut<'t>(topic: &'t mut ExamTopic, name: &str) -> Result<&'t mut SubSection, ResourceDocError> {
    topic
        .sub_sections
        .iter_mut()
        .find(|s| s.name == name)
        .ok_or_else(|| ResourceDocError::SubSectionNotFound { name: name.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mcq(topic: &str, sub_topic: &str, question: &str) -> Mcq {
        Mcq {
            question: question.to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_option: 1,
            explanation: "because".to_string(),
            difficulty: Difficulty::Medium,
            marks: 1,
            topic: topic.to_string(),
            sub_topic: sub_topic.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn note(title: &str, order: i32) -> NoteTopic {
        NoteTopic {
            title: title.to_string(),
            content: "content".to_string(),
            order,
            ..Default::default()
        }
    }

    #[test]
    fn counters_track_additions_across_sub_sections() {
        let mut doc = ResourceDoc::default();
        for i in 0..3 {
            doc.add_mcq("Mechanics", "Kinematics", mcq("Mechanics", "Kinematics", &format!("q{i}")));
        }

        let topic = &doc.exam_questions.items[0];
        assert_eq!(topic.sub_sections[0].total_questions, 3);
        assert_eq!(topic.total_questions, 3);

        for i in 0..2 {
            doc.add_mcq("Mechanics", "Dynamics", mcq("Mechanics", "Dynamics", &format!("d{i}")));
        }

        let topic = &doc.exam_questions.items[0];
        assert_eq!(topic.sub_sections.len(), 2);
        assert_eq!(topic.sub_sections[0].total_questions, 3);
        assert_eq!(topic.sub_sections[1].total_questions, 2);
        assert_eq!(topic.total_questions, 5);
        assert!(doc.exam_questions.is_enabled);
    }

    #[test]
    fn counters_track_deletion_and_update() {
        let mut doc = ResourceDoc::default();
        for i in 0..4 {
            doc.add_mcq("Waves", "Sound", mcq("Waves", "Sound", &format!("q{i}")));
        }

        doc.delete_mcq("Waves", "Sound", 1).unwrap();
        assert_eq!(doc.exam_questions.items[0].sub_sections[0].total_questions, 3);
        assert_eq!(doc.exam_questions.items[0].total_questions, 3);

        doc.update_mcq("Waves", "Sound", 0, mcq("Waves", "Sound", "replaced")).unwrap();
        assert_eq!(doc.exam_questions.items[0].sub_sections[0].mcqs[0].question, "replaced");
        assert_eq!(doc.exam_questions.items[0].total_questions, 3);
    }

    #[test]
    fn positional_index_out_of_range_is_not_found() {
        let mut doc = ResourceDoc::default();
        doc.add_mcq("Waves", "Sound", mcq("Waves", "Sound", "q0"));

        assert_eq!(
            doc.delete_mcq("Waves", "Sound", 5),
            Err(ResourceDocError::McqNotFound { index: 5 })
        );
        assert_eq!(
            doc.update_mcq("Waves", "Light", 0, mcq("Waves", "Light", "x")),
            Err(ResourceDocError::SubSectionNotFound { name: "Light".to_string() })
        );
        assert_eq!(
            doc.delete_mcq("Optics", "Sound", 0),
            Err(ResourceDocError::TopicNotFound {
                name: "Optics".to_string()
            })
        );
        // Failed operations leave the counters untouched
        assert_eq!(doc.exam_questions.items[0].total_questions, 1);
    }

    #[test]
    fn recompute_totals_overrides_stale_stored_counters() {
        // Simulates a document whose stored counters drifted (e.g. written by
        // an older revision): recompute must trust the lists, not the numbers
        let mut doc = ResourceDoc::default();
        doc.add_mcq("Algebra", "Linear", mcq("Algebra", "Linear", "q0"));
        doc.exam_questions.items[0].total_questions = 99;
        doc.exam_questions.items[0].sub_sections[0].total_questions = 42;

        doc.recompute_totals();

        assert_eq!(doc.exam_questions.items[0].sub_sections[0].total_questions, 1);
        assert_eq!(doc.exam_questions.items[0].total_questions, 1);
    }

    #[test]
    fn duplicate_note_order_is_rejected_without_mutation() {
        let mut doc = ResourceDoc::default();
        doc.add_revision_note(note("Forces", 1)).unwrap();

        let err = doc.add_revision_note(note("Energy", 1)).unwrap_err();
        assert_eq!(
            err,
            ResourceDocError::DuplicateOrder {
                order: 1,
                existing_title: "Forces".to_string()
            }
        );
        assert_eq!(doc.revision_notes.items.len(), 1);

        doc.add_revision_note(note("Energy", 2)).unwrap();
        assert_eq!(doc.revision_notes.items.len(), 2);
    }

    #[test]
    fn note_update_excludes_its_own_index_from_the_order_check() {
        let mut doc = ResourceDoc::default();
        doc.add_revision_note(note("Forces", 1)).unwrap();
        doc.add_revision_note(note("Energy", 2)).unwrap();

        // Keeping its own order is fine
        doc.update_revision_note(0, note("Forces v2", 1)).unwrap();
        assert_eq!(doc.revision_notes.items[0].title, "Forces v2");

        // Stealing another note's order is not
        let err = doc.update_revision_note(0, note("Forces v3", 2)).unwrap_err();
        assert_eq!(
            err,
            ResourceDocError::DuplicateOrder {
                order: 2,
                existing_title: "Energy".to_string()
            }
        );
        assert_eq!(doc.revision_notes.items[0].title, "Forces v2");
    }

    #[test]
    fn note_delete_out_of_range() {
        let mut doc = ResourceDoc::default();
        assert_eq!(doc.delete_revision_note(0), Err(ResourceDocError::NoteNotFound { index: 0 }));
    }

    #[test]
    fn toggle_is_idempotent() {
        let mut doc = ResourceDoc::default();
        doc.toggle(ResourceKind::Flashcards, true);
        doc.toggle(ResourceKind::Flashcards, true);
        assert!(doc.flashcards.is_enabled);
        doc.toggle(ResourceKind::Flashcards, false);
        assert!(!doc.flashcards.is_enabled);
    }

    #[test]
    fn set_sub_section_pdf_targets_the_right_node() {
        let mut doc = ResourceDoc::default();
        doc.add_mcq("Mechanics", "Kinematics", mcq("Mechanics", "Kinematics", "q0"));
        doc.add_mcq("Mechanics", "Dynamics", mcq("Mechanics", "Dynamics", "q1"));

        assert!(doc.set_sub_section_pdf("Mechanics", "Dynamics", "https://u".to_string(), "k".to_string()));
        assert!(doc.exam_questions.items[0].sub_sections[0].pdf_url.is_none());
        assert_eq!(doc.exam_questions.items[0].sub_sections[1].pdf_url.as_deref(), Some("https://u"));

        assert!(!doc.set_sub_section_pdf("Mechanics", "Statics", "u".to_string(), "k".to_string()));
    }

    #[test]
    fn empty_document_round_trips_through_json() {
        let doc = ResourceDoc::default();
        let json = serde_json::to_value(&doc).unwrap();
        let back: ResourceDoc = serde_json::from_value(json).unwrap();
        assert!(!back.exam_questions.is_enabled);
        assert!(back.exam_questions.items.is_empty());
    }

    #[test]
    fn partial_document_deserializes_with_defaults() {
        // Documents written before a section existed must still load
        let json = serde_json::json!({
            "past_papers": { "is_enabled": true, "items": [{ "year": "2023", "title": "Paper 1", "pdf_url": "https://x/p.pdf" }] }
        });
        let doc: ResourceDoc = serde_json::from_value(json).unwrap();
        assert!(doc.past_papers.is_enabled);
        assert_eq!(doc.past_papers.items.len(), 1);
        assert!(doc.exam_questions.items.is_empty());
    }
}
