//! HTTP handlers for the content resource tree.
//!
//! All writes follow the same shape: load the document for the
//! (subject, course, exam board) triple (or start from the empty one),
//! mutate the typed structure in memory, write back under the optimistic
//! revision guard, retrying a couple of times when a concurrent writer got
//! there first. Reads re-sign every stored URL that points at our own
//! bucket and pass external URLs through untouched.

use crate::{
    AppState,
    api::models::{
        ApiResponse,
        resources::{
            BulkImportRequest, BulkImportResult, McqBatchCreate, McqBatchResult, McqCreate, PastPaperCreate, PdfOutcome,
            ResourceDocResponse, ResourceUpsert, RevisionNoteCreate, ToggleRequest, TopicBreakdown, parse_resource_kind,
        },
        users::CurrentUser,
    },
    auth,
    db::{
        errors::DbError,
        handlers::{SubjectResources, resources::SubjectResourcesDBResponse},
        models::resources::{Mcq, ResourceDoc},
    },
    errors::{Error, Result},
    pdf,
    storage::{ObjectStorage, key_segment},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

/// Attempts for the optimistic load-mutate-save loop
const WRITE_ATTEMPTS: u32 = 3;

/// Load-mutate-save with optimistic retry. The closure may run more than
/// once (when the revision check fails), so it must be repeatable.
async fn with_doc<F>(state: &AppState, subject_id: Uuid, course_id: Uuid, exam_board: &str, user: &CurrentUser, mutate: F) -> Result<SubjectResourcesDBResponse>
where
    F: Fn(&mut ResourceDoc) -> Result<()>,
{
    for attempt in 1..=WRITE_ATTEMPTS {
        let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
        let mut repo = SubjectResources::new(&mut conn);

        match repo.get(subject_id, course_id, exam_board).await? {
            Some(row) => {
                let mut doc = row.resources.0.clone();
                mutate(&mut doc)?;
                match repo.save(row.id, &doc, row.revision).await {
                    Ok(saved) => return Ok(saved),
                    Err(DbError::StaleRevision { .. }) if attempt < WRITE_ATTEMPTS => {
                        tracing::debug!("Lost resource write race (attempt {attempt}), reloading");
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            None => {
                let mut doc = ResourceDoc::default();
                mutate(&mut doc)?;
                match repo.create(subject_id, course_id, exam_board, &doc, Some(user.id)).await {
                    Ok(saved) => return Ok(saved),
                    // Lost the create race; reload and go through the update path
                    Err(DbError::UniqueViolation { .. }) if attempt < WRITE_ATTEMPTS => continue,
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    Err(Error::Database(DbError::StaleRevision {
        entity: "subject_resources".to_string(),
    }))
}

/// Replace a stored URL with a fresh signed one when it points at our bucket
async fn sign_in_place(storage: &dyn ObjectStorage, ttl: Duration, url: &mut String) {
    if let Some(key) = storage.own_object_key(url) {
        match storage.signed_url(&key, ttl).await {
            Ok(Some(signed)) => *url = signed,
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to sign URL for key {key}: {e}"),
        }
    }
}

async fn sign_opt(storage: &dyn ObjectStorage, ttl: Duration, url: &mut Option<String>) {
    if let Some(url) = url.as_mut() {
        sign_in_place(storage, ttl, url).await;
    }
}

/// Walk the document and re-sign every own-bucket blob reference
async fn sign_resource_doc(storage: &dyn ObjectStorage, ttl: Duration, doc: &mut ResourceDoc) {
    for topic in &mut doc.exam_questions.items {
        for sub in &mut topic.sub_sections {
            sign_opt(storage, ttl, &mut sub.pdf_url).await;
        }
    }
    for topic in &mut doc.revision_notes.items {
        for image in &mut topic.images {
            sign_in_place(storage, ttl, &mut image.url).await;
        }
        for sub in &mut topic.sub_topics {
            if let Some(image) = sub.image.as_mut() {
                sign_in_place(storage, ttl, &mut image.url).await;
            }
        }
    }
    for paper in doc.past_papers.items.iter_mut().chain(doc.mock_exams.items.iter_mut()) {
        sign_in_place(storage, ttl, &mut paper.pdf_url).await;
    }
    for resource in &mut doc.additional_resources.items {
        sign_opt(storage, ttl, &mut resource.file_url).await;
        sign_opt(storage, ttl, &mut resource.thumbnail_url).await;
    }
}

/// Full document for a triple, with fresh signed URLs. An absent triple
/// returns the empty structure rather than a 404.
#[utoipa::path(
    get,
    path = "/resources/{subject_id}/{course_id}/{exam_board}",
    tag = "resources",
    summary = "Get the resource tree for a subject/course/exam board",
    responses((status = 200, description = "The document (empty structure when nothing is stored yet)"))
)]
#[tracing::instrument(skip_all, fields(subject_id = %subject_id, course_id = %course_id, exam_board = %exam_board))]
pub async fn get_resources(
    State(state): State<AppState>,
    Path((subject_id, course_id, exam_board)): Path<(Uuid, Uuid, String)>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<ResourceDocResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let row = SubjectResources::new(&mut conn).get(subject_id, course_id, &exam_board).await?;

    let mut response = match row {
        Some(row) => ResourceDocResponse::from(row),
        None => ResourceDocResponse::empty(subject_id, course_id, &exam_board),
    };

    let ttl = state.config.storage.signed_url_ttl();
    sign_resource_doc(state.storage.as_ref(), ttl, &mut response.resources).await;

    Ok(Json(ApiResponse::new(response)))
}

/// All resource documents attached to a course.
#[utoipa::path(
    get,
    path = "/resources/course/{course_id}",
    tag = "resources",
    summary = "Get every resource document for a course",
    responses((status = 200, description = "Documents for the course"))
)]
#[tracing::instrument(skip_all, fields(course_id = %course_id))]
pub async fn get_course_resources(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<ResourceDocResponse>>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let rows = SubjectResources::new(&mut conn).list_by_course(course_id).await?;

    let ttl = state.config.storage.signed_url_ttl();
    let mut documents = Vec::with_capacity(rows.len());
    for row in rows {
        let mut response = ResourceDocResponse::from(row);
        sign_resource_doc(state.storage.as_ref(), ttl, &mut response.resources).await;
        documents.push(response);
    }

    Ok(Json(ApiResponse::new(documents)))
}

/// Create or replace the whole document for a triple.
#[utoipa::path(
    put,
    path = "/resources/{subject_id}/{course_id}/{exam_board}",
    tag = "resources",
    summary = "Upsert the resource tree (admin)",
    responses(
        (status = 200, description = "Document stored"),
        (status = 403, description = "Admin role required"),
    )
)]
#[tracing::instrument(skip_all, fields(subject_id = %subject_id, course_id = %course_id, exam_board = %exam_board))]
pub async fn upsert_resources(
    State(state): State<AppState>,
    Path((subject_id, course_id, exam_board)): Path<(Uuid, Uuid, String)>,
    user: CurrentUser,
    Json(body): Json<ResourceUpsert>,
) -> Result<Json<ApiResponse<ResourceDocResponse>>> {
    auth::require_admin(&user)?;

    let mut doc = body.resources;
    doc.recompute_totals();

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let row = SubjectResources::new(&mut conn)
        .upsert(subject_id, course_id, &exam_board, &doc, Some(user.id))
        .await?;

    Ok(Json(ApiResponse::new(ResourceDocResponse::from(row))))
}

/// Add one MCQ, creating the topic and sub-section on first use.
#[utoipa::path(
    post,
    path = "/resources/{subject_id}/{course_id}/{exam_board}/mcqs/{topic}/{sub_section}",
    tag = "resources",
    summary = "Add an MCQ (admin)",
    responses(
        (status = 201, description = "MCQ added, counters recomputed"),
        (status = 400, description = "Invalid MCQ"),
        (status = 403, description = "Admin role required"),
    )
)]
#[tracing::instrument(skip_all, fields(topic = %topic, sub_section = %sub_section))]
pub async fn add_mcq(
    State(state): State<AppState>,
    Path((subject_id, course_id, exam_board, topic, sub_section)): Path<(Uuid, Uuid, String, String, String)>,
    user: CurrentUser,
    Json(body): Json<McqCreate>,
) -> Result<(StatusCode, Json<ApiResponse<ResourceDocResponse>>)> {
    auth::require_admin(&user)?;

    let mcq = body.into_mcq(&topic, &sub_section).map_err(Error::bad_request)?;

    let row = with_doc(&state, subject_id, course_id, &exam_board, &user, |doc| {
        doc.add_mcq(&topic, &sub_section, mcq.clone());
        Ok(())
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(ResourceDocResponse::from(row), "MCQ added successfully")),
    ))
}

/// Replace the MCQ at a positional index.
#[utoipa::path(
    put,
    path = "/resources/{subject_id}/{course_id}/{exam_board}/mcqs/{topic}/{sub_section}/{index}",
    tag = "resources",
    summary = "Update an MCQ by index (admin)",
    responses(
        (status = 200, description = "MCQ replaced, counters recomputed"),
        (status = 404, description = "Topic, sub-section or index not found"),
    )
)]
#[tracing::instrument(skip_all, fields(topic = %topic, sub_section = %sub_section, index = index))]
pub async fn update_mcq(
    State(state): State<AppState>,
    Path((subject_id, course_id, exam_board, topic, sub_section, index)): Path<(Uuid, Uuid, String, String, String, usize)>,
    user: CurrentUser,
    Json(body): Json<McqCreate>,
) -> Result<Json<ApiResponse<ResourceDocResponse>>> {
    auth::require_admin(&user)?;

    let mcq = body.into_mcq(&topic, &sub_section).map_err(Error::bad_request)?;

    let row = with_doc(&state, subject_id, course_id, &exam_board, &user, |doc| {
        doc.update_mcq(&topic, &sub_section, index, mcq.clone())?;
        Ok(())
    })
    .await?;

    Ok(Json(ApiResponse::with_message(
        ResourceDocResponse::from(row),
        "MCQ updated successfully",
    )))
}

/// Remove the MCQ at a positional index.
#[utoipa::path(
    delete,
    path = "/resources/{subject_id}/{course_id}/{exam_board}/mcqs/{topic}/{sub_section}/{index}",
    tag = "resources",
    summary = "Delete an MCQ by index (admin)",
    responses(
        (status = 200, description = "MCQ removed, counters recomputed"),
        (status = 404, description = "Topic, sub-section or index not found"),
    )
)]
#[tracing::instrument(skip_all, fields(topic = %topic, sub_section = %sub_section, index = index))]
pub async fn delete_mcq(
    State(state): State<AppState>,
    Path((subject_id, course_id, exam_board, topic, sub_section, index)): Path<(Uuid, Uuid, String, String, String, usize)>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<ResourceDocResponse>>> {
    auth::require_admin(&user)?;

    let row = with_doc(&state, subject_id, course_id, &exam_board, &user, |doc| {
        doc.delete_mcq(&topic, &sub_section, index)?;
        Ok(())
    })
    .await?;

    Ok(Json(ApiResponse::with_message(
        ResourceDocResponse::from(row),
        "MCQ deleted successfully",
    )))
}

/// Append several MCQs to one topic/sub-section in a single write.
#[utoipa::path(
    post,
    path = "/resources/{subject_id}/{course_id}/{exam_board}/mcqs/{topic}/{sub_section}/batch",
    tag = "resources",
    summary = "Add several MCQs to one sub-section (admin)",
    responses(
        (status = 201, description = "MCQs added, counters recomputed"),
        (status = 400, description = "Empty batch or invalid MCQ"),
        (status = 403, description = "Admin role required"),
    )
)]
#[tracing::instrument(skip_all, fields(topic = %topic, sub_section = %sub_section))]
pub async fn add_mcqs(
    State(state): State<AppState>,
    Path((subject_id, course_id, exam_board, topic, sub_section)): Path<(Uuid, Uuid, String, String, String)>,
    user: CurrentUser,
    Json(body): Json<McqBatchCreate>,
) -> Result<(StatusCode, Json<ApiResponse<McqBatchResult>>)> {
    auth::require_admin(&user)?;

    if body.mcqs.is_empty() {
        return Err(Error::bad_request("MCQs array is required and cannot be empty"));
    }

    let mut mcqs = Vec::with_capacity(body.mcqs.len());
    for item in body.mcqs {
        mcqs.push(item.into_mcq(&topic, &sub_section).map_err(Error::bad_request)?);
    }
    let added_count = mcqs.len();

    let row = with_doc(&state, subject_id, course_id, &exam_board, &user, |doc| {
        for mcq in &mcqs {
            doc.add_mcq(&topic, &sub_section, mcq.clone());
        }
        Ok(())
    })
    .await?;

    let doc = &row.resources.0;
    let topic_node = doc.exam_questions.items.iter().find(|t| t.name == topic);
    let result = McqBatchResult {
        added_count,
        total_in_sub_section: topic_node
            .and_then(|t| t.sub_sections.iter().find(|s| s.name == sub_section))
            .map(|s| s.total_questions)
            .unwrap_or(0),
        total_in_topic: topic_node.map(|t| t.total_questions).unwrap_or(0),
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            result,
            format!("{added_count} MCQs added successfully to {topic} - {sub_section}"),
        )),
    ))
}

/// Bulk-import MCQs grouped by (topic, sub-topic).
///
/// Malformed items are skipped and recorded, never aborting the batch. Each
/// group gets a summary PDF rendered and uploaded; a PDF failure for one
/// group is recorded in the result and the rest proceed.
#[utoipa::path(
    post,
    path = "/resources/{subject_id}/{course_id}/{exam_board}/mcqs/bulk",
    tag = "resources",
    summary = "Bulk-import MCQs (admin)",
    responses(
        (status = 201, description = "Structured import result"),
        (status = 403, description = "Admin role required"),
    )
)]
#[tracing::instrument(skip_all, fields(subject_id = %subject_id, course_id = %course_id))]
pub async fn bulk_import_mcqs(
    State(state): State<AppState>,
    Path((subject_id, course_id, exam_board)): Path<(Uuid, Uuid, String)>,
    user: CurrentUser,
    Json(body): Json<BulkImportRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BulkImportResult>>)> {
    auth::require_admin(&user)?;

    let mut results = BulkImportResult::default();

    // Validate and group; skipped items never abort the batch
    let mut grouped: BTreeMap<String, BTreeMap<String, Vec<Mcq>>> = BTreeMap::new();
    for item in body.mcqs {
        match item.into_grouped_mcq() {
            Ok((topic, sub_topic, mcq)) => {
                grouped.entry(topic).or_default().entry(sub_topic).or_default().push(mcq);
                results.added += 1;
            }
            Err(reason) => {
                results.skipped += 1;
                results.errors.push(reason);
            }
        }
    }

    for (topic, sub_topics) in &grouped {
        let breakdown = results.by_topic.entry(topic.clone()).or_insert_with(TopicBreakdown::default);
        for (sub_topic, mcqs) in sub_topics {
            breakdown.added += mcqs.len();
            breakdown.sub_topics.insert(sub_topic.clone(), mcqs.len());
        }
    }

    // Render and upload one summary PDF per group before touching the
    // document; failures are per-group outcomes, not batch failures
    let ttl = state.config.storage.signed_url_ttl();
    let mut pdf_refs: Vec<(String, String, String, String)> = Vec::new();
    for (topic, sub_topics) in &grouped {
        for (sub_topic, mcqs) in sub_topics {
            let outcome = match generate_group_pdf(state.storage.as_ref(), ttl, topic, sub_topic, mcqs).await {
                Ok((url, key)) => {
                    pdf_refs.push((topic.clone(), sub_topic.clone(), url.clone(), key));
                    PdfOutcome {
                        success: true,
                        pdf_url: Some(url),
                        mcq_count: Some(mcqs.len()),
                        error: None,
                    }
                }
                Err(e) => {
                    tracing::warn!("PDF generation failed for {topic}/{sub_topic}: {e}");
                    PdfOutcome {
                        success: false,
                        pdf_url: None,
                        mcq_count: None,
                        error: Some(e),
                    }
                }
            };
            results.pdfs_generated.entry(topic.clone()).or_default().insert(sub_topic.clone(), outcome);
        }
    }

    if results.added > 0 {
        with_doc(&state, subject_id, course_id, &exam_board, &user, |doc| {
            for (topic, sub_topics) in &grouped {
                for (sub_topic, mcqs) in sub_topics {
                    for mcq in mcqs {
                        doc.add_mcq(topic, sub_topic, mcq.clone());
                    }
                }
            }
            for (topic, sub_topic, url, key) in &pdf_refs {
                doc.set_sub_section_pdf(topic, sub_topic, url.clone(), key.clone());
            }
            Ok(())
        })
        .await?;
    }

    let pdf_successes = results
        .pdfs_generated
        .values()
        .flat_map(|t| t.values())
        .filter(|p| p.success)
        .count();
    let message = format!(
        "Bulk import completed. Added: {}, Skipped: {}, PDFs generated: {pdf_successes}",
        results.added, results.skipped
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::with_message(results, message))))
}

async fn generate_group_pdf(
    storage: &dyn ObjectStorage,
    ttl: Duration,
    topic: &str,
    sub_topic: &str,
    mcqs: &[Mcq],
) -> std::result::Result<(String, String), String> {
    let bytes = pdf::render_sub_topic_pdf(topic, sub_topic, mcqs).map_err(|e| e.to_string())?;

    let key = format!("mcqs/{}_{}_MCQs.pdf", key_segment(topic), key_segment(sub_topic));
    storage.put(&key, "application/pdf", bytes).await.map_err(|e| e.to_string())?;

    let url = storage
        .signed_url(&key, ttl)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "storage backend cannot sign URLs".to_string())?;

    Ok((url, key))
}

/// Add a revision note; duplicate `order` values are rejected.
#[utoipa::path(
    post,
    path = "/resources/{subject_id}/{course_id}/{exam_board}/revision-notes",
    tag = "resources",
    summary = "Add a revision note (admin)",
    responses(
        (status = 201, description = "Note added"),
        (status = 400, description = "Duplicate order value"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn add_revision_note(
    State(state): State<AppState>,
    Path((subject_id, course_id, exam_board)): Path<(Uuid, Uuid, String)>,
    user: CurrentUser,
    Json(note): Json<RevisionNoteCreate>,
) -> Result<(StatusCode, Json<ApiResponse<ResourceDocResponse>>)> {
    auth::require_admin(&user)?;

    let row = with_doc(&state, subject_id, course_id, &exam_board, &user, |doc| {
        doc.add_revision_note(note.clone())?;
        Ok(())
    })
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(ResourceDocResponse::from(row)))))
}

/// Replace the revision note at a positional index (order re-checked,
/// excluding this index).
#[utoipa::path(
    put,
    path = "/resources/{subject_id}/{course_id}/{exam_board}/revision-notes/{index}",
    tag = "resources",
    summary = "Update a revision note by index (admin)",
    responses(
        (status = 200, description = "Note replaced"),
        (status = 400, description = "Duplicate order value"),
        (status = 404, description = "Index not found"),
    )
)]
#[tracing::instrument(skip_all, fields(index = index))]
pub async fn update_revision_note(
    State(state): State<AppState>,
    Path((subject_id, course_id, exam_board, index)): Path<(Uuid, Uuid, String, usize)>,
    user: CurrentUser,
    Json(note): Json<RevisionNoteCreate>,
) -> Result<Json<ApiResponse<ResourceDocResponse>>> {
    auth::require_admin(&user)?;

    let row = with_doc(&state, subject_id, course_id, &exam_board, &user, |doc| {
        doc.update_revision_note(index, note.clone())?;
        Ok(())
    })
    .await?;

    Ok(Json(ApiResponse::new(ResourceDocResponse::from(row))))
}

/// Remove the revision note at a positional index.
#[utoipa::path(
    delete,
    path = "/resources/{subject_id}/{course_id}/{exam_board}/revision-notes/{index}",
    tag = "resources",
    summary = "Delete a revision note by index (admin)",
    responses(
        (status = 200, description = "Note removed"),
        (status = 404, description = "Index not found"),
    )
)]
#[tracing::instrument(skip_all, fields(index = index))]
pub async fn delete_revision_note(
    State(state): State<AppState>,
    Path((subject_id, course_id, exam_board, index)): Path<(Uuid, Uuid, String, usize)>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<ResourceDocResponse>>> {
    auth::require_admin(&user)?;

    let row = with_doc(&state, subject_id, course_id, &exam_board, &user, |doc| {
        doc.delete_revision_note(index)?;
        Ok(())
    })
    .await?;

    Ok(Json(ApiResponse::new(ResourceDocResponse::from(row))))
}

/// Enable or disable a resource type. Creates the document on first touch.
#[utoipa::path(
    patch,
    path = "/resources/{subject_id}/{course_id}/{exam_board}/{resource_type}/toggle",
    tag = "resources",
    summary = "Toggle a resource type (admin)",
    responses(
        (status = 200, description = "Flag updated"),
        (status = 400, description = "Unknown resource type"),
    )
)]
#[tracing::instrument(skip_all, fields(resource_type = %resource_type))]
pub async fn toggle_resource_type(
    State(state): State<AppState>,
    Path((subject_id, course_id, exam_board, resource_type)): Path<(Uuid, Uuid, String, String)>,
    user: CurrentUser,
    Json(body): Json<ToggleRequest>,
) -> Result<Json<ApiResponse<ResourceDocResponse>>> {
    auth::require_admin(&user)?;

    let kind =
        parse_resource_kind(&resource_type).ok_or_else(|| Error::bad_request(format!("Unknown resource type '{resource_type}'")))?;

    let row = with_doc(&state, subject_id, course_id, &exam_board, &user, |doc| {
        doc.toggle(kind, body.is_enabled);
        Ok(())
    })
    .await?;

    Ok(Json(ApiResponse::with_message(
        ResourceDocResponse::from(row),
        "Subject resource toggled successfully",
    )))
}

/// Add a past paper.
#[utoipa::path(
    post,
    path = "/resources/{subject_id}/{course_id}/{exam_board}/past-papers",
    tag = "resources",
    summary = "Add a past paper (admin)",
    responses((status = 201, description = "Past paper added"))
)]
#[tracing::instrument(skip_all)]
pub async fn add_past_paper(
    State(state): State<AppState>,
    Path((subject_id, course_id, exam_board)): Path<(Uuid, Uuid, String)>,
    user: CurrentUser,
    Json(paper): Json<PastPaperCreate>,
) -> Result<(StatusCode, Json<ApiResponse<ResourceDocResponse>>)> {
    auth::require_admin(&user)?;

    let row = with_doc(&state, subject_id, course_id, &exam_board, &user, |doc| {
        doc.add_past_paper(paper.clone());
        Ok(())
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            ResourceDocResponse::from(row),
            "Past paper added successfully",
        )),
    ))
}

/// Replace the past paper at a positional index.
#[utoipa::path(
    put,
    path = "/resources/{subject_id}/{course_id}/{exam_board}/past-papers/{index}",
    tag = "resources",
    summary = "Update a past paper by index (admin)",
    responses(
        (status = 200, description = "Past paper replaced"),
        (status = 404, description = "Index not found"),
    )
)]
#[tracing::instrument(skip_all, fields(index = index))]
pub async fn update_past_paper(
    State(state): State<AppState>,
    Path((subject_id, course_id, exam_board, index)): Path<(Uuid, Uuid, String, usize)>,
    user: CurrentUser,
    Json(paper): Json<PastPaperCreate>,
) -> Result<Json<ApiResponse<ResourceDocResponse>>> {
    auth::require_admin(&user)?;

    let row = with_doc(&state, subject_id, course_id, &exam_board, &user, |doc| {
        doc.update_past_paper(index, paper.clone())?;
        Ok(())
    })
    .await?;

    Ok(Json(ApiResponse::with_message(
        ResourceDocResponse::from(row),
        "Past paper updated successfully",
    )))
}

/// Remove the past paper at a positional index.
#[utoipa::path(
    delete,
    path = "/resources/{subject_id}/{course_id}/{exam_board}/past-papers/{index}",
    tag = "resources",
    summary = "Delete a past paper by index (admin)",
    responses(
        (status = 200, description = "Past paper removed"),
        (status = 404, description = "Index not found"),
    )
)]
#[tracing::instrument(skip_all, fields(index = index))]
pub async fn delete_past_paper(
    State(state): State<AppState>,
    Path((subject_id, course_id, exam_board, index)): Path<(Uuid, Uuid, String, usize)>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<ResourceDocResponse>>> {
    auth::require_admin(&user)?;

    let row = with_doc(&state, subject_id, course_id, &exam_board, &user, |doc| {
        doc.delete_past_paper(index)?;
        Ok(())
    })
    .await?;

    Ok(Json(ApiResponse::with_message(
        ResourceDocResponse::from(row),
        "Past paper deleted successfully",
    )))
}
