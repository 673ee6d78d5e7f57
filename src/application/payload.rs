//! Flattening a draft into the persistence payload
//!
//! The payload is what the course store receives on submission. File contents
//! are not part of it: [`Submission::uploads`] hands the binary handles over to
//! the upload side separately.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PayloadConfig;
use crate::domain::{BinaryHandle, Category, CourseDraftTree, MediaType, NodeId, QuestionKind};

/// The author submitting the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitter {
    pub owner_id: String,
    pub display_name: Option<String>,
}

impl Submitter {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Review state of a stored course. New submissions always start out pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoursePayload {
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub duration: String,
    pub instructor: String,
    pub owner_id: String,
    pub status: CourseStatus,
    pub expiry_date: Option<NaiveDate>,
    pub category: Option<Category>,
    /// Description of the evaluative activity, present only when enabled
    pub evaluative_activity: Option<String>,
    pub modules: Vec<ModulePayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulePayload {
    pub id: NodeId,
    pub title: String,
    pub description: String,
    pub lessons: Vec<LessonPayload>,
    pub assessment: Option<AssessmentPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonPayload {
    pub id: NodeId,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub video_url: String,
    pub content: String,
    pub files: Vec<FileManifest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileManifest {
    pub id: NodeId,
    pub name: String,
    pub media_type: MediaType,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentPayload {
    pub title: String,
    pub description: String,
    pub passing_score: i32,
    pub questions: Vec<QuestionPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPayload {
    pub id: NodeId,
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// One binary waiting for the upload collaborator.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub lesson_id: NodeId,
    pub file_id: NodeId,
    pub handle: BinaryHandle,
}

/// Payload plus the file contents it references.
#[derive(Debug, Clone)]
pub struct Submission {
    pub payload: CoursePayload,
    pub uploads: Vec<PendingUpload>,
}

impl CoursePayload {
    /// Flatten `tree`, filling empty course fields from `defaults`.
    ///
    /// The tree is expected to have passed validation; nothing is checked here.
    pub fn build(tree: &CourseDraftTree, submitter: &Submitter, defaults: &PayloadConfig) -> Self {
        Submission::build(tree, submitter, defaults).payload
    }
}

impl Submission {
    pub fn build(tree: &CourseDraftTree, submitter: &Submitter, defaults: &PayloadConfig) -> Self {
        let course = tree.course();
        let mut uploads = Vec::new();
        let mut modules = Vec::new();

        for (module_id, module) in tree.modules() {
            let mut lessons = Vec::new();
            for (lesson_id, lesson) in tree.lessons(module_id).unwrap_or_default() {
                let mut files = Vec::new();
                for (file_id, file) in tree.files(module_id, lesson_id).unwrap_or_default() {
                    files.push(FileManifest {
                        id: file_id.clone(),
                        name: file.name.clone(),
                        media_type: file.media_type,
                        size: file.size,
                    });
                    uploads.push(PendingUpload {
                        lesson_id: lesson_id.clone(),
                        file_id: file_id.clone(),
                        handle: file.handle.clone(),
                    });
                }
                lessons.push(LessonPayload {
                    id: lesson_id.clone(),
                    title: lesson.title.clone(),
                    description: lesson.description.clone(),
                    duration: lesson.duration.clone(),
                    video_url: lesson.video_url.clone(),
                    content: lesson.content.clone(),
                    files,
                });
            }

            let assessment = module.has_assessment.then(|| AssessmentPayload {
                title: module.assessment.title.clone(),
                description: module.assessment.description.clone(),
                passing_score: module.assessment.passing_score,
                questions: tree
                    .questions(module_id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(id, q)| QuestionPayload {
                        id: id.clone(),
                        question: q.prompt.clone(),
                        kind: q.kind,
                        options: q.options.clone(),
                        correct_answer: q.correct_answer.clone(),
                    })
                    .collect(),
            });

            modules.push(ModulePayload {
                id: module_id.clone(),
                title: module.title.clone(),
                description: module.description.clone(),
                lessons,
                assessment,
            });
        }

        let instructor = submitter
            .display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&defaults.default_instructor)
            .to_string();

        let payload = CoursePayload {
            title: course.title.clone(),
            description: course.description.clone(),
            thumbnail: or_default(&course.thumbnail, &defaults.placeholder_thumbnail),
            duration: or_default(&course.duration, &defaults.default_duration),
            instructor,
            owner_id: submitter.owner_id.clone(),
            status: CourseStatus::Pending,
            expiry_date: course.expiration_date,
            category: course.category,
            evaluative_activity: course
                .has_evaluative_activity
                .then(|| course.evaluative_activity_description.clone()),
            modules,
        };
        debug!(
            "built payload with {} module(s), {} upload(s)",
            payload.modules.len(),
            uploads.len()
        );
        Self { payload, uploads }
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
