//! Draft documents: the serialized record shape of a course draft
//!
//! A [`DraftDocument`] is what the course store hands back for duplication and
//! what the CLI keeps on disk between invocations. Conversion to and from
//! [`CourseDraftTree`] keeps ids and sibling order.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::error_ext::{DocumentResultExt, IoResultExt};
use crate::application::payload::CoursePayload;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    Assessment, BinaryHandle, Category, CourseDraftTree, CourseFields, DomainResult, FileData,
    IdGenerator, LessonData, MediaType, ModuleData, NodeId, QuestionData, QuestionKind,
    DEFAULT_PASSING_SCORE,
};

/// On-disk encoding, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> ApplicationResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(DocumentFormat::Toml),
            Some("json") => Ok(DocumentFormat::Json),
            _ => Err(ApplicationError::Document {
                path: path.to_path_buf(),
                message: "expected a .toml or .json extension".to_string(),
            }),
        }
    }
}

// Scalar fields come before nested arrays so the TOML encoding stays valid.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftDocument {
    pub id: NodeId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub has_evaluative_activity: bool,
    #[serde(default)]
    pub evaluative_activity_description: String,
    #[serde(default)]
    pub modules: Vec<ModuleRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    pub id: NodeId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub has_assessment: bool,
    #[serde(default)]
    pub assessment_title: String,
    #[serde(default)]
    pub assessment_description: String,
    #[serde(default = "default_passing_score")]
    pub assessment_passing_score: i32,
    #[serde(default)]
    pub lessons: Vec<LessonRecord>,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
}

fn default_passing_score() -> i32 {
    DEFAULT_PASSING_SCORE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRecord {
    pub id: NodeId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: NodeId,
    pub name: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub size: u64,
    /// Where the content lives; absent for backend-held files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: NodeId,
    #[serde(default)]
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl DraftDocument {
    /// Empty document for a new course.
    pub fn empty(id: NodeId) -> Self {
        Self {
            id,
            title: String::new(),
            description: String::new(),
            duration: String::new(),
            thumbnail: String::new(),
            category: None,
            expiration_date: None,
            has_evaluative_activity: false,
            evaluative_activity_description: String::new(),
            modules: Vec::new(),
        }
    }

    /// Snapshot a tree. File content is not serialized: only path handles keep
    /// a reference, in-memory bytes are dropped and reload as detached.
    pub fn from_tree(tree: &CourseDraftTree) -> Self {
        let course = tree.course();
        let modules = tree
            .modules()
            .map(|(module_id, module)| ModuleRecord {
                id: module_id.clone(),
                title: module.title.clone(),
                description: module.description.clone(),
                has_assessment: module.has_assessment,
                assessment_title: module.assessment.title.clone(),
                assessment_description: module.assessment.description.clone(),
                assessment_passing_score: module.assessment.passing_score,
                lessons: lesson_records(tree, module_id),
                questions: tree
                    .questions(module_id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(id, q)| QuestionRecord {
                        id: id.clone(),
                        question: q.prompt.clone(),
                        kind: q.kind,
                        correct_answer: q.correct_answer.clone(),
                        options: q.options.clone(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            id: tree.id().clone(),
            title: course.title.clone(),
            description: course.description.clone(),
            duration: course.duration.clone(),
            thumbnail: course.thumbnail.clone(),
            category: course.category,
            expiration_date: course.expiration_date,
            has_evaluative_activity: course.has_evaluative_activity,
            evaluative_activity_description: course.evaluative_activity_description.clone(),
            modules,
        }
    }

    /// Record of a submitted course as the store keeps it.
    ///
    /// File contents stay with the upload side, so files come back detached.
    pub fn from_payload(id: NodeId, payload: &CoursePayload) -> Self {
        let modules = payload
            .modules
            .iter()
            .map(|m| {
                let assessment = m.assessment.as_ref();
                ModuleRecord {
                    id: m.id.clone(),
                    title: m.title.clone(),
                    description: m.description.clone(),
                    has_assessment: assessment.is_some(),
                    assessment_title: assessment.map(|a| a.title.clone()).unwrap_or_default(),
                    assessment_description: assessment
                        .map(|a| a.description.clone())
                        .unwrap_or_default(),
                    assessment_passing_score: assessment
                        .map_or(DEFAULT_PASSING_SCORE, |a| a.passing_score),
                    lessons: m
                        .lessons
                        .iter()
                        .map(|l| LessonRecord {
                            id: l.id.clone(),
                            title: l.title.clone(),
                            description: l.description.clone(),
                            duration: l.duration.clone(),
                            video_url: l.video_url.clone(),
                            content: l.content.clone(),
                            files: l
                                .files
                                .iter()
                                .map(|f| FileRecord {
                                    id: f.id.clone(),
                                    name: f.name.clone(),
                                    media_type: f.media_type,
                                    size: f.size,
                                    path: None,
                                })
                                .collect(),
                        })
                        .collect(),
                    questions: assessment
                        .map(|a| {
                            a.questions
                                .iter()
                                .map(|q| QuestionRecord {
                                    id: q.id.clone(),
                                    question: q.question.clone(),
                                    kind: q.kind,
                                    correct_answer: q.correct_answer.clone(),
                                    options: q.options.clone(),
                                })
                                .collect()
                        })
                        .unwrap_or_default(),
                }
            })
            .collect();

        Self {
            id,
            title: payload.title.clone(),
            description: payload.description.clone(),
            duration: payload.duration.clone(),
            thumbnail: payload.thumbnail.clone(),
            category: payload.category,
            expiration_date: payload.expiry_date,
            has_evaluative_activity: payload.evaluative_activity.is_some(),
            evaluative_activity_description: payload
                .evaluative_activity
                .clone()
                .unwrap_or_default(),
            modules,
        }
    }

    /// Rebuild a tree, keeping every id from the document.
    ///
    /// Fails on duplicate ids and on questions whose option count breaks the
    /// multiple choice / true-false bounds.
    #[instrument(level = "debug", skip(self, ids), fields(course = %self.id))]
    pub fn into_tree(self, ids: Arc<dyn IdGenerator>) -> DomainResult<CourseDraftTree> {
        let mut tree = CourseDraftTree::with_id(self.id, ids);
        tree.set_course(CourseFields {
            title: self.title,
            description: self.description,
            duration: self.duration,
            thumbnail: self.thumbnail,
            category: self.category,
            expiration_date: self.expiration_date,
            has_evaluative_activity: self.has_evaluative_activity,
            evaluative_activity_description: self.evaluative_activity_description,
        });

        for module in self.modules {
            let module_id = module.id;
            tree.restore_module(
                module_id.clone(),
                ModuleData {
                    title: module.title,
                    description: module.description,
                    has_assessment: module.has_assessment,
                    assessment: Assessment {
                        title: module.assessment_title,
                        description: module.assessment_description,
                        passing_score: module.assessment_passing_score,
                    },
                },
            )?;

            for lesson in module.lessons {
                let lesson_id = lesson.id;
                tree.restore_lesson(
                    &module_id,
                    lesson_id.clone(),
                    LessonData {
                        title: lesson.title,
                        description: lesson.description,
                        duration: lesson.duration,
                        video_url: lesson.video_url,
                        content: lesson.content,
                    },
                )?;
                for file in lesson.files {
                    let handle = file
                        .path
                        .map(BinaryHandle::Path)
                        .unwrap_or(BinaryHandle::Detached);
                    tree.restore_file(
                        &module_id,
                        &lesson_id,
                        file.id,
                        FileData {
                            name: file.name,
                            media_type: file.media_type,
                            size: file.size,
                            handle,
                        },
                    )?;
                }
            }

            for question in module.questions {
                tree.restore_question(
                    &module_id,
                    question.id,
                    QuestionData {
                        prompt: question.question,
                        kind: question.kind,
                        options: question.options,
                        correct_answer: question.correct_answer,
                    },
                )?;
            }
        }

        debug!("restored draft with {} nodes", tree.node_count());
        Ok(tree)
    }

    pub fn parse(content: &str, format: DocumentFormat) -> Result<Self, String> {
        match format {
            DocumentFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }

    pub fn render(&self, format: DocumentFormat) -> Result<String, String> {
        match format {
            DocumentFormat::Toml => toml::to_string_pretty(self).map_err(|e| e.to_string()),
            DocumentFormat::Json => serde_json::to_string_pretty(self).map_err(|e| e.to_string()),
        }
    }

    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let format = DocumentFormat::from_path(path)?;
        let content = fs::read_to_string(path).with_path_context("read draft", path)?;
        Self::parse(&content, format).with_document_context(path)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn save(&self, path: &Path) -> ApplicationResult<()> {
        let format = DocumentFormat::from_path(path)?;
        let content = self.render(format).with_document_context(path)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_path_context("create directory", parent)?;
        }
        fs::write(path, content).with_path_context("write draft", path)
    }
}

fn lesson_records(tree: &CourseDraftTree, module_id: &NodeId) -> Vec<LessonRecord> {
    tree.lessons(module_id)
        .unwrap_or_default()
        .into_iter()
        .map(|(lesson_id, lesson)| LessonRecord {
            id: lesson_id.clone(),
            title: lesson.title.clone(),
            description: lesson.description.clone(),
            duration: lesson.duration.clone(),
            video_url: lesson.video_url.clone(),
            content: lesson.content.clone(),
            files: tree
                .files(module_id, lesson_id)
                .unwrap_or_default()
                .into_iter()
                .map(|(id, f)| FileRecord {
                    id: id.clone(),
                    name: f.name.clone(),
                    media_type: f.media_type,
                    size: f.size,
                    path: f.handle.path().map(Path::to_path_buf),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SequentialIds;

    const SAMPLE: &str = r#"
id = "course-1"
title = "Rust 101"
category = "programming"
expirationDate = "2031-06-30"

[[modules]]
id = "m-1"
title = "Ownership"
hasAssessment = true

[[modules.lessons]]
id = "l-1"
title = "Borrowing"

[[modules.lessons.files]]
id = "f-1"
name = "slides.pdf"
type = "application/pdf"
size = 1024

[[modules.questions]]
id = "q-1"
question = "Is this safe?"
type = "true_false"
correctAnswer = "true"
"#;

    #[test]
    fn given_toml_document_when_parsing_then_defaults_fill_missing_fields() {
        let doc = DraftDocument::parse(SAMPLE, DocumentFormat::Toml).unwrap();

        assert_eq!(doc.category, Some(Category::Programming));
        assert_eq!(doc.modules[0].assessment_passing_score, 70);
        assert_eq!(doc.modules[0].lessons[0].files[0].media_type, MediaType::Pdf);
        assert!(doc.modules[0].lessons[0].files[0].path.is_none());
        assert_eq!(doc.modules[0].questions[0].kind, QuestionKind::TrueFalse);
    }

    #[test]
    fn given_document_when_converting_to_tree_and_back_then_identical() {
        let doc = DraftDocument::parse(SAMPLE, DocumentFormat::Toml).unwrap();

        let tree = doc.clone().into_tree(Arc::new(SequentialIds::new("x"))).unwrap();

        assert_eq!(tree.node_count(), 4);
        assert_eq!(DraftDocument::from_tree(&tree), doc);
    }

    #[test]
    fn given_in_memory_file_when_round_tripping_then_metadata_kept_and_handle_detached() {
        // Arrange
        let mut tree = CourseDraftTree::with_id("c".into(), Arc::new(SequentialIds::new("n")));
        let module = tree.add_module().unwrap();
        let lesson = tree.add_lesson(&module).unwrap();
        tree.add_complementary_files(
            &module,
            &lesson,
            vec![crate::domain::FileDescriptor::from_bytes(
                "notes.pdf",
                "application/pdf",
                bytes::Bytes::from_static(b"%PDF"),
            )],
        )
        .unwrap();

        // Act
        let doc = DraftDocument::from_tree(&tree);
        let restored = doc
            .clone()
            .into_tree(Arc::new(SequentialIds::new("z")))
            .unwrap();

        // Assert
        let record = &doc.modules[0].lessons[0].files[0];
        assert!(record.path.is_none());
        let files = restored.files(&module, &lesson).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].1.name, "notes.pdf");
        assert_eq!(files[0].1.size, 4);
        assert!(matches!(files[0].1.handle, BinaryHandle::Detached));
    }

    #[test]
    fn given_unknown_extension_when_picking_format_then_document_error() {
        let err = DocumentFormat::from_path(Path::new("draft.yaml")).unwrap_err();
        assert!(matches!(err, ApplicationError::Document { .. }));
    }
}
