//! Course draft tree manager
//!
//! `CourseDraftTree` owns the course fields plus a [`DraftArena`] holding modules,
//! lessons, questions and files. Every edit resolves its target by id, checks all
//! preconditions, and only then mutates. A rejected edit leaves the tree exactly
//! as it was. [`CourseDraftTree::apply`] offers the same edits as pure
//! old-tree-to-new-tree transformations.

use std::sync::Arc;

use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::domain::arena::{DraftArena, DraftNode, NodePayload};
use crate::domain::entities::{
    CourseFields, FileData, LessonData, ModuleData, QuestionData, QuestionKind,
    DEFAULT_PASSING_SCORE, MAX_OPTIONS, MIN_OPTIONS,
};
use crate::domain::error::{DomainError, DomainResult, NodeKind};
use crate::domain::files::{FileBatchReport, FileDescriptor, FilePolicy, FileRejection};
use crate::domain::grading::{self, GradeReport, QuizResponse};
use crate::domain::ids::{IdGenerator, IdPolicy, NodeId};
use crate::domain::path::{
    CourseField, FieldPath, FieldValue, LessonField, ModuleField, QuestionField,
};

/// One structural edit, for callers that prefer the pure form.
#[derive(Debug, Clone)]
pub enum Edit {
    SetField { path: FieldPath, value: FieldValue },
    AddModule,
    RemoveModule { module: NodeId },
    AddLesson { module: NodeId },
    RemoveLesson { module: NodeId, lesson: NodeId },
    AddQuestion { module: NodeId },
    RemoveQuestion { module: NodeId, question: NodeId },
    AddOption { module: NodeId, question: NodeId },
    RemoveOption { module: NodeId, question: NodeId, index: usize },
    UpdateOption { module: NodeId, question: NodeId, index: usize, value: String },
    AddFiles { module: NodeId, lesson: NodeId, files: Vec<FileDescriptor> },
    RemoveFile { module: NodeId, lesson: NodeId, file: NodeId },
}

/// What an applied edit produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Updated,
    Added(NodeId),
    /// Number of nodes dropped, descendants included
    Removed(usize),
    OptionAdded { count: usize },
    OptionRemoved(String),
    Files(FileBatchReport),
}

/// In-memory course draft being authored.
#[derive(Debug, Clone)]
pub struct CourseDraftTree {
    id: NodeId,
    course: CourseFields,
    arena: DraftArena,
    ids: Arc<dyn IdGenerator>,
    file_policy: FilePolicy,
    default_passing_score: i32,
}

impl CourseDraftTree {
    /// Empty draft with a fresh course id.
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        let id = ids.next_id();
        Self::with_id(id, ids)
    }

    /// Empty draft keeping a known course id (e.g. a stored draft document).
    pub fn with_id(id: NodeId, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            id,
            course: CourseFields::default(),
            arena: DraftArena::new(),
            ids,
            file_policy: FilePolicy::default(),
            default_passing_score: DEFAULT_PASSING_SCORE,
        }
    }

    pub fn with_file_policy(mut self, policy: FilePolicy) -> Self {
        self.file_policy = policy;
        self
    }

    /// Passing score given to modules added from now on.
    pub fn with_default_passing_score(mut self, score: i32) -> Self {
        self.default_passing_score = score;
        self
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn course(&self) -> &CourseFields {
        &self.course
    }

    pub fn file_policy(&self) -> &FilePolicy {
        &self.file_policy
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.arena.contains(id)
    }

    /// Number of module/lesson/question/file nodes.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn arena(&self) -> &DraftArena {
        &self.arena
    }

    pub fn modules(&self) -> impl Iterator<Item = (&NodeId, &ModuleData)> + '_ {
        self.arena
            .roots()
            .iter()
            .filter_map(move |&idx| self.arena.get_node(idx))
            .filter_map(|node| match &node.payload {
                NodePayload::Module(m) => Some((&node.id, m)),
                _ => None,
            })
    }

    pub fn module_ids(&self) -> Vec<NodeId> {
        self.modules().map(|(id, _)| id.clone()).collect()
    }

    pub fn module(&self, module: &NodeId) -> DomainResult<&ModuleData> {
        let idx = self.module_idx(module)?;
        match self.payload(idx) {
            Some(NodePayload::Module(m)) => Ok(m),
            _ => Err(not_found(NodeKind::Module, module)),
        }
    }

    pub fn lessons(&self, module: &NodeId) -> DomainResult<Vec<(&NodeId, &LessonData)>> {
        let idx = self.module_idx(module)?;
        Ok(self
            .children(idx)
            .filter_map(|node| match &node.payload {
                NodePayload::Lesson(l) => Some((&node.id, l)),
                _ => None,
            })
            .collect())
    }

    pub fn lesson(&self, module: &NodeId, lesson: &NodeId) -> DomainResult<&LessonData> {
        let idx = self.lesson_idx(module, lesson)?;
        match self.payload(idx) {
            Some(NodePayload::Lesson(l)) => Ok(l),
            _ => Err(not_found(NodeKind::Lesson, lesson)),
        }
    }

    pub fn questions(&self, module: &NodeId) -> DomainResult<Vec<(&NodeId, &QuestionData)>> {
        let idx = self.module_idx(module)?;
        Ok(self
            .children(idx)
            .filter_map(|node| match &node.payload {
                NodePayload::Question(q) => Some((&node.id, q)),
                _ => None,
            })
            .collect())
    }

    pub fn question(&self, module: &NodeId, question: &NodeId) -> DomainResult<&QuestionData> {
        let idx = self.question_idx(module, question)?;
        match self.payload(idx) {
            Some(NodePayload::Question(q)) => Ok(q),
            _ => Err(not_found(NodeKind::Question, question)),
        }
    }

    pub fn files(
        &self,
        module: &NodeId,
        lesson: &NodeId,
    ) -> DomainResult<Vec<(&NodeId, &FileData)>> {
        let idx = self.lesson_idx(module, lesson)?;
        Ok(self
            .children(idx)
            .filter_map(|node| match &node.payload {
                NodePayload::File(f) => Some((&node.id, f)),
                _ => None,
            })
            .collect())
    }

    // ------------------------------------------------------------------
    // Structural edits
    // ------------------------------------------------------------------

    #[instrument(level = "debug", skip(self))]
    pub fn add_module(&mut self) -> DomainResult<NodeId> {
        let id = self.ids.next_id();
        let payload = NodePayload::Module(ModuleData::with_passing_score(
            self.default_passing_score,
        ));
        self.arena.insert_node(id.clone(), payload, None)?;
        debug!("added module {}", id);
        Ok(id)
    }

    /// Remove a module with its lessons, files and questions.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_module(&mut self, module: &NodeId) -> DomainResult<usize> {
        let idx = self.module_idx(module)?;
        let removed = self.arena.remove_subtree(idx);
        debug!("removed module {} ({} nodes)", module, removed);
        Ok(removed)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_lesson(&mut self, module: &NodeId) -> DomainResult<NodeId> {
        let parent = self.module_idx(module)?;
        let id = self.ids.next_id();
        self.arena.insert_node(
            id.clone(),
            NodePayload::Lesson(LessonData::default()),
            Some(parent),
        )?;
        Ok(id)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove_lesson(&mut self, module: &NodeId, lesson: &NodeId) -> DomainResult<usize> {
        let idx = self.lesson_idx(module, lesson)?;
        Ok(self.arena.remove_subtree(idx))
    }

    /// Append a multiple choice question with two empty options.
    #[instrument(level = "debug", skip(self))]
    pub fn add_assessment_question(&mut self, module: &NodeId) -> DomainResult<NodeId> {
        let parent = self.module_idx(module)?;
        let id = self.ids.next_id();
        self.arena.insert_node(
            id.clone(),
            NodePayload::Question(QuestionData::default()),
            Some(parent),
        )?;
        Ok(id)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove_assessment_question(
        &mut self,
        module: &NodeId,
        question: &NodeId,
    ) -> DomainResult<usize> {
        let idx = self.question_idx(module, question)?;
        Ok(self.arena.remove_subtree(idx))
    }

    /// Append an empty option; returns the new option count.
    #[instrument(level = "debug", skip(self))]
    pub fn add_question_option(
        &mut self,
        module: &NodeId,
        question: &NodeId,
    ) -> DomainResult<usize> {
        let q = self.question_mut(module, question)?;
        if q.kind == QuestionKind::TrueFalse {
            return Err(DomainError::OptionsUnsupported(question.clone()));
        }
        if q.options.len() >= MAX_OPTIONS {
            return Err(DomainError::OptionLimit {
                question: question.clone(),
                count: q.options.len(),
            });
        }
        q.options.push(String::new());
        Ok(q.options.len())
    }

    /// Remove an option by position; returns the removed value.
    ///
    /// The stored correct answer is left as is, even when it named the removed
    /// option. The validation pass reports the dangling answer.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_question_option(
        &mut self,
        module: &NodeId,
        question: &NodeId,
        index: usize,
    ) -> DomainResult<String> {
        let q = self.question_mut(module, question)?;
        if q.kind == QuestionKind::TrueFalse {
            return Err(DomainError::OptionsUnsupported(question.clone()));
        }
        if index >= q.options.len() {
            return Err(DomainError::OptionIndex {
                question: question.clone(),
                index,
                count: q.options.len(),
            });
        }
        if q.options.len() <= MIN_OPTIONS {
            return Err(DomainError::OptionLimit {
                question: question.clone(),
                count: q.options.len(),
            });
        }
        Ok(q.options.remove(index))
    }

    #[instrument(level = "debug", skip(self, value))]
    pub fn update_question_option(
        &mut self,
        module: &NodeId,
        question: &NodeId,
        index: usize,
        value: impl Into<String>,
    ) -> DomainResult<()> {
        let q = self.question_mut(module, question)?;
        let count = q.options.len();
        let slot = q.options.get_mut(index).ok_or_else(|| DomainError::OptionIndex {
            question: question.clone(),
            index,
            count,
        })?;
        *slot = value.into();
        Ok(())
    }

    /// Attach files to a lesson, admitting each one on its own.
    ///
    /// Rejected files are reported with their name and reason; accepted files are
    /// appended in input order. Ids for all accepted files are reserved before the
    /// first insert, so an id collision rejects the whole batch without changes.
    #[instrument(level = "debug", skip(self, descriptors))]
    pub fn add_complementary_files(
        &mut self,
        module: &NodeId,
        lesson: &NodeId,
        descriptors: Vec<FileDescriptor>,
    ) -> DomainResult<FileBatchReport> {
        let parent = self.lesson_idx(module, lesson)?;

        let mut report = FileBatchReport::default();
        let mut admitted = Vec::new();
        for descriptor in descriptors {
            match self.file_policy.admit(&descriptor) {
                Ok(media_type) => {
                    let data = FileData {
                        name: descriptor.name,
                        media_type,
                        size: descriptor.size,
                        handle: descriptor.handle,
                    };
                    admitted.push((self.ids.next_id(), data));
                }
                Err(reason) => {
                    warn!("rejected file {}: {}", descriptor.name, reason);
                    report.rejected.push(FileRejection {
                        file_name: descriptor.name,
                        reason,
                    });
                }
            }
        }

        for (i, (id, _)) in admitted.iter().enumerate() {
            let reused_in_batch = admitted[..i].iter().any(|(other, _)| other == id);
            if reused_in_batch || self.arena.contains(id) {
                return Err(DomainError::DuplicateId(id.clone()));
            }
        }
        for (id, data) in admitted {
            self.arena
                .insert_node(id.clone(), NodePayload::File(data), Some(parent))?;
            report.accepted.push(id);
        }

        debug!(
            "attached {} file(s), rejected {}",
            report.accepted.len(),
            report.rejected.len()
        );
        Ok(report)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove_complementary_file(
        &mut self,
        module: &NodeId,
        lesson: &NodeId,
        file: &NodeId,
    ) -> DomainResult<()> {
        let lesson_idx = self.lesson_idx(module, lesson)?;
        let idx = self.resolve(file, NodeKind::File, Some(lesson_idx))?;
        self.arena.remove_subtree(idx);
        Ok(())
    }

    /// Update one scalar field addressed by `path`.
    ///
    /// Switching a question to true/false drops its options; switching back to
    /// multiple choice seeds two empty options. The correct answer is never
    /// rewritten.
    #[instrument(level = "debug", skip(self, value))]
    pub fn set_field(&mut self, path: &FieldPath, value: FieldValue) -> DomainResult<()> {
        let expected = path.value_type();
        if value.value_type() != expected {
            return Err(DomainError::FieldType {
                path: path.to_string(),
                expected: expected.name(),
                actual: value.value_type().name(),
            });
        }

        match path {
            FieldPath::Course(field) => {
                set_course_field(&mut self.course, *field, value);
            }
            FieldPath::Module { module, field } => {
                let idx = self.module_idx(module)?;
                if let Some(NodePayload::Module(m)) = self.payload_mut(idx) {
                    set_module_field(m, *field, value);
                }
            }
            FieldPath::Lesson {
                module,
                lesson,
                field,
            } => {
                let idx = self.lesson_idx(module, lesson)?;
                if let Some(NodePayload::Lesson(l)) = self.payload_mut(idx) {
                    set_lesson_field(l, *field, value);
                }
            }
            FieldPath::Question {
                module,
                question,
                field,
            } => {
                let q = self.question_mut(module, question)?;
                set_question_field(q, *field, value);
            }
            FieldPath::QuestionOption {
                module,
                question,
                index,
            } => {
                if let FieldValue::Text(text) = value {
                    self.update_question_option(module, question, *index, text)?;
                }
            }
        }
        Ok(())
    }

    /// Apply an edit to a copy of this tree and return the copy.
    ///
    /// `self` is never modified; on error there is no new tree.
    pub fn apply(&self, edit: Edit) -> DomainResult<(CourseDraftTree, EditOutcome)> {
        let mut next = self.clone();
        let outcome = next.apply_in_place(edit)?;
        Ok((next, outcome))
    }

    /// Apply an edit in place; the tree is unchanged when it fails.
    pub fn apply_in_place(&mut self, edit: Edit) -> DomainResult<EditOutcome> {
        let outcome = match edit {
            Edit::SetField { path, value } => {
                self.set_field(&path, value)?;
                EditOutcome::Updated
            }
            Edit::AddModule => EditOutcome::Added(self.add_module()?),
            Edit::RemoveModule { module } => EditOutcome::Removed(self.remove_module(&module)?),
            Edit::AddLesson { module } => EditOutcome::Added(self.add_lesson(&module)?),
            Edit::RemoveLesson { module, lesson } => {
                EditOutcome::Removed(self.remove_lesson(&module, &lesson)?)
            }
            Edit::AddQuestion { module } => {
                EditOutcome::Added(self.add_assessment_question(&module)?)
            }
            Edit::RemoveQuestion { module, question } => {
                EditOutcome::Removed(self.remove_assessment_question(&module, &question)?)
            }
            Edit::AddOption { module, question } => EditOutcome::OptionAdded {
                count: self.add_question_option(&module, &question)?,
            },
            Edit::RemoveOption {
                module,
                question,
                index,
            } => EditOutcome::OptionRemoved(self.remove_question_option(
                &module, &question, index,
            )?),
            Edit::UpdateOption {
                module,
                question,
                index,
                value,
            } => {
                self.update_question_option(&module, &question, index, value)?;
                EditOutcome::Updated
            }
            Edit::AddFiles {
                module,
                lesson,
                files,
            } => EditOutcome::Files(self.add_complementary_files(&module, &lesson, files)?),
            Edit::RemoveFile {
                module,
                lesson,
                file,
            } => {
                self.remove_complementary_file(&module, &lesson, &file)?;
                EditOutcome::Removed(1)
            }
        };
        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Duplication
    // ------------------------------------------------------------------

    /// Seed a new draft from an existing course.
    ///
    /// The copy gets a fresh course id, `copy_marker` appended to its title and
    /// no expiration date. Descendant ids follow `policy`.
    #[instrument(level = "debug", skip(source, ids))]
    pub fn duplicate_from(
        source: &CourseDraftTree,
        ids: Arc<dyn IdGenerator>,
        policy: IdPolicy,
        copy_marker: &str,
    ) -> DomainResult<CourseDraftTree> {
        let mut copy = CourseDraftTree::new(ids)
            .with_file_policy(source.file_policy.clone())
            .with_default_passing_score(source.default_passing_score);
        copy.course = CourseFields {
            title: format!("{}{}", source.course.title, copy_marker),
            expiration_date: None,
            ..source.course.clone()
        };

        for &root in source.arena.roots() {
            copy.copy_subtree(&source.arena, root, None, policy)?;
        }
        debug!(
            "duplicated course {} into {} ({} nodes, {:?} ids)",
            source.id,
            copy.id,
            copy.node_count(),
            policy
        );
        Ok(copy)
    }

    fn copy_subtree(
        &mut self,
        source: &DraftArena,
        src_idx: Index,
        parent: Option<Index>,
        policy: IdPolicy,
    ) -> DomainResult<()> {
        let Some(node) = source.get_node(src_idx) else {
            return Ok(());
        };
        let id = match policy {
            IdPolicy::Regenerate => self.ids.next_id(),
            IdPolicy::Preserve => node.id.clone(),
        };
        let idx = self.arena.insert_node(id, node.payload.clone(), parent)?;
        for &child in &node.children {
            self.copy_subtree(source, child, Some(idx), policy)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Grading
    // ------------------------------------------------------------------

    /// Score learner responses against a module's assessment.
    pub fn grade(&self, module: &NodeId, responses: &[QuizResponse]) -> DomainResult<GradeReport> {
        let passing_score = self.module(module)?.assessment.passing_score;
        let questions = self.questions(module)?;
        grading::grade(module, &questions, passing_score, responses)
    }

    // ------------------------------------------------------------------
    // Restoring stored records (ids supplied by the caller)
    // ------------------------------------------------------------------

    pub(crate) fn set_course(&mut self, course: CourseFields) {
        self.course = course;
    }

    pub(crate) fn restore_module(&mut self, id: NodeId, data: ModuleData) -> DomainResult<()> {
        self.arena
            .insert_node(id, NodePayload::Module(data), None)
            .map(|_| ())
    }

    pub(crate) fn restore_lesson(
        &mut self,
        module: &NodeId,
        id: NodeId,
        data: LessonData,
    ) -> DomainResult<()> {
        let parent = self.module_idx(module)?;
        self.arena
            .insert_node(id, NodePayload::Lesson(data), Some(parent))
            .map(|_| ())
    }

    pub(crate) fn restore_question(
        &mut self,
        module: &NodeId,
        id: NodeId,
        data: QuestionData,
    ) -> DomainResult<()> {
        match data.kind {
            QuestionKind::MultipleChoice
                if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&data.options.len()) =>
            {
                return Err(DomainError::OptionLimit {
                    question: id,
                    count: data.options.len(),
                });
            }
            QuestionKind::TrueFalse if !data.options.is_empty() => {
                return Err(DomainError::OptionsUnsupported(id));
            }
            _ => {}
        }
        let parent = self.module_idx(module)?;
        self.arena
            .insert_node(id, NodePayload::Question(data), Some(parent))
            .map(|_| ())
    }

    pub(crate) fn restore_file(
        &mut self,
        module: &NodeId,
        lesson: &NodeId,
        id: NodeId,
        data: FileData,
    ) -> DomainResult<()> {
        let parent = self.lesson_idx(module, lesson)?;
        self.arena
            .insert_node(id, NodePayload::File(data), Some(parent))
            .map(|_| ())
    }

    // ------------------------------------------------------------------
    // Id resolution
    // ------------------------------------------------------------------

    /// Resolve `id` to a node of `kind`, optionally requiring a specific parent.
    fn resolve(&self, id: &NodeId, kind: NodeKind, parent: Option<Index>) -> DomainResult<Index> {
        self.arena
            .lookup(id)
            .filter(|&idx| {
                self.arena.get_node(idx).is_some_and(|node| {
                    node.payload.kind() == kind && (parent.is_none() || node.parent == parent)
                })
            })
            .ok_or_else(|| not_found(kind, id))
    }

    fn module_idx(&self, module: &NodeId) -> DomainResult<Index> {
        self.resolve(module, NodeKind::Module, None)
    }

    fn lesson_idx(&self, module: &NodeId, lesson: &NodeId) -> DomainResult<Index> {
        let parent = self.module_idx(module)?;
        self.resolve(lesson, NodeKind::Lesson, Some(parent))
    }

    fn question_idx(&self, module: &NodeId, question: &NodeId) -> DomainResult<Index> {
        let parent = self.module_idx(module)?;
        self.resolve(question, NodeKind::Question, Some(parent))
    }

    fn question_mut(
        &mut self,
        module: &NodeId,
        question: &NodeId,
    ) -> DomainResult<&mut QuestionData> {
        let idx = self.question_idx(module, question)?;
        match self.payload_mut(idx) {
            Some(NodePayload::Question(q)) => Ok(q),
            _ => Err(not_found(NodeKind::Question, question)),
        }
    }

    fn payload(&self, idx: Index) -> Option<&NodePayload> {
        self.arena.get_node(idx).map(|n| &n.payload)
    }

    fn payload_mut(&mut self, idx: Index) -> Option<&mut NodePayload> {
        self.arena.get_node_mut(idx).map(|n| &mut n.payload)
    }

    fn children(&self, idx: Index) -> impl Iterator<Item = &DraftNode> + '_ {
        self.arena
            .get_node(idx)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |&c| self.arena.get_node(c))
    }
}

fn not_found(kind: NodeKind, id: &NodeId) -> DomainError {
    DomainError::NotFound {
        kind,
        id: id.clone(),
    }
}

fn set_course_field(course: &mut CourseFields, field: CourseField, value: FieldValue) {
    match (field, value) {
        (CourseField::Title, FieldValue::Text(v)) => course.title = v,
        (CourseField::Description, FieldValue::Text(v)) => course.description = v,
        (CourseField::Duration, FieldValue::Text(v)) => course.duration = v,
        (CourseField::Thumbnail, FieldValue::Text(v)) => course.thumbnail = v,
        (CourseField::Category, FieldValue::Category(v)) => course.category = v,
        (CourseField::ExpirationDate, FieldValue::Date(v)) => course.expiration_date = v,
        (CourseField::HasEvaluativeActivity, FieldValue::Flag(v)) => {
            course.has_evaluative_activity = v
        }
        (CourseField::EvaluativeActivityDescription, FieldValue::Text(v)) => {
            course.evaluative_activity_description = v
        }
        _ => {}
    }
}

fn set_module_field(module: &mut ModuleData, field: ModuleField, value: FieldValue) {
    match (field, value) {
        (ModuleField::Title, FieldValue::Text(v)) => module.title = v,
        (ModuleField::Description, FieldValue::Text(v)) => module.description = v,
        (ModuleField::HasAssessment, FieldValue::Flag(v)) => module.has_assessment = v,
        (ModuleField::AssessmentTitle, FieldValue::Text(v)) => module.assessment.title = v,
        (ModuleField::AssessmentDescription, FieldValue::Text(v)) => {
            module.assessment.description = v
        }
        (ModuleField::PassingScore, FieldValue::Integer(v)) => {
            // out-of-range scores are kept and reported by validation
            module.assessment.passing_score =
                v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
        }
        _ => {}
    }
}

fn set_lesson_field(lesson: &mut LessonData, field: LessonField, value: FieldValue) {
    match (field, value) {
        (LessonField::Title, FieldValue::Text(v)) => lesson.title = v,
        (LessonField::Description, FieldValue::Text(v)) => lesson.description = v,
        (LessonField::Duration, FieldValue::Text(v)) => lesson.duration = v,
        (LessonField::VideoUrl, FieldValue::Text(v)) => lesson.video_url = v,
        (LessonField::Content, FieldValue::Text(v)) => lesson.content = v,
        _ => {}
    }
}

fn set_question_field(question: &mut QuestionData, field: QuestionField, value: FieldValue) {
    match (field, value) {
        (QuestionField::Prompt, FieldValue::Text(v)) => question.prompt = v,
        (QuestionField::CorrectAnswer, FieldValue::Text(v)) => question.correct_answer = v,
        (QuestionField::Kind, FieldValue::Kind(kind)) => {
            if kind == question.kind {
                return;
            }
            question.kind = kind;
            match kind {
                QuestionKind::TrueFalse => question.options.clear(),
                QuestionKind::MultipleChoice => {
                    question.options = vec![String::new(); MIN_OPTIONS];
                }
            }
        }
        _ => {}
    }
}
