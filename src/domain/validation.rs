//! Submission-boundary validation
//!
//! Runs over the whole draft and collects every violation in tree order instead
//! of stopping at the first one.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::domain::draft::CourseDraftTree;
use crate::domain::entities::{QuestionData, QuestionKind, MAX_OPTIONS, MIN_OPTIONS};
use crate::domain::ids::NodeId;
use crate::domain::path::{CourseField, FieldPath, LessonField, ModuleField, QuestionField};

/// One failed check: where it failed and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub reason: String,
}

impl Violation {
    fn new(path: impl ToString, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Validate against the current time.
pub fn validate(tree: &CourseDraftTree) -> Vec<Violation> {
    validate_at(tree, Utc::now())
}

/// Validate as if submitting at `now`.
pub fn validate_at(tree: &CourseDraftTree, now: DateTime<Utc>) -> Vec<Violation> {
    let mut violations = Vec::new();
    let course = tree.course();

    let required = [
        (CourseField::Title, &course.title, "course title is required"),
        (
            CourseField::Description,
            &course.description,
            "course description is required",
        ),
    ];
    for (field, value, reason) in required {
        if value.trim().is_empty() {
            violations.push(Violation::new(FieldPath::Course(field), reason));
        }
    }
    if course.category.is_none() {
        violations.push(Violation::new(
            FieldPath::Course(CourseField::Category),
            "course category is required",
        ));
    }

    if let Some(date) = course.expiration_date {
        // the date stands for midnight UTC at its start
        if date <= now.date_naive() {
            violations.push(Violation::new(
                FieldPath::Course(CourseField::ExpirationDate),
                "expiration date must be later than today",
            ));
        }
    }

    if course.has_evaluative_activity && course.evaluative_activity_description.trim().is_empty()
    {
        violations.push(Violation::new(
            FieldPath::Course(CourseField::EvaluativeActivityDescription),
            "evaluative activity description is required",
        ));
    }

    let modules: Vec<_> = tree.modules().collect();
    if modules.is_empty() {
        violations.push(Violation::new("modules", "at least one module is required"));
    }

    for (module_id, module) in modules {
        let module_path = |field| FieldPath::Module {
            module: module_id.clone(),
            field,
        };

        if module.title.trim().is_empty() {
            violations.push(Violation::new(
                module_path(ModuleField::Title),
                "module title is required",
            ));
        }

        if let Ok(lessons) = tree.lessons(module_id) {
            for (lesson_id, lesson) in lessons {
                if lesson.title.trim().is_empty() {
                    violations.push(Violation::new(
                        FieldPath::Lesson {
                            module: module_id.clone(),
                            lesson: lesson_id.clone(),
                            field: LessonField::Title,
                        },
                        "lesson title is required",
                    ));
                }
            }
        }

        if !(0..=100).contains(&module.assessment.passing_score) {
            violations.push(Violation::new(
                module_path(ModuleField::PassingScore),
                format!(
                    "passing score must be between 0 and 100, got {}",
                    module.assessment.passing_score
                ),
            ));
        }

        if !module.has_assessment {
            continue;
        }
        if module.assessment.title.trim().is_empty() {
            violations.push(Violation::new(
                module_path(ModuleField::AssessmentTitle),
                "assessment title is required",
            ));
        }
        if let Ok(questions) = tree.questions(module_id) {
            for (question_id, question) in questions {
                check_question(module_id, question_id, question, &mut violations);
            }
        }
    }

    debug!("validation found {} violation(s)", violations.len());
    violations
}

fn check_question(
    module: &NodeId,
    question_id: &NodeId,
    question: &QuestionData,
    violations: &mut Vec<Violation>,
) {
    let field_path = |field| FieldPath::Question {
        module: module.clone(),
        question: question_id.clone(),
        field,
    };
    let options_path = format!("modules/{}/questions/{}/options", module, question_id);

    if question.prompt.trim().is_empty() {
        violations.push(Violation::new(
            field_path(QuestionField::Prompt),
            "question text is required",
        ));
    }

    match question.kind {
        QuestionKind::MultipleChoice => {
            let count = question.options.len();
            if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&count) {
                violations.push(Violation::new(
                    &options_path,
                    format!(
                        "multiple choice needs {} to {} options, has {}",
                        MIN_OPTIONS, MAX_OPTIONS, count
                    ),
                ));
            }
            for (index, option) in question.options.iter().enumerate() {
                if option.trim().is_empty() {
                    violations.push(Violation::new(
                        FieldPath::QuestionOption {
                            module: module.clone(),
                            question: question_id.clone(),
                            index,
                        },
                        "option must not be empty",
                    ));
                }
            }
            if question.correct_answer.is_empty() {
                violations.push(Violation::new(
                    field_path(QuestionField::CorrectAnswer),
                    "correct answer is required",
                ));
            } else if !question.options.contains(&question.correct_answer) {
                violations.push(Violation::new(
                    field_path(QuestionField::CorrectAnswer),
                    format!(
                        "correct answer '{}' does not match any option",
                        question.correct_answer
                    ),
                ));
            }
        }
        QuestionKind::TrueFalse => {
            if !question.options.is_empty() {
                violations.push(Violation::new(
                    &options_path,
                    "true/false questions hold no options",
                ));
            }
            if !matches!(question.correct_answer.as_str(), "true" | "false") {
                violations.push(Violation::new(
                    field_path(QuestionField::CorrectAnswer),
                    "correct answer must be \"true\" or \"false\"",
                ));
            }
        }
    }
}
