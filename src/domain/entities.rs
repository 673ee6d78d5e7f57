//! Domain entities: payloads carried by the draft tree

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::files::{BinaryHandle, MediaType};

/// Fewest options a multiple choice question may hold.
pub const MIN_OPTIONS: usize = 2;
/// Most options a multiple choice question may hold.
pub const MAX_OPTIONS: usize = 5;
/// Passing score of a freshly added module assessment.
pub const DEFAULT_PASSING_SCORE: i32 = 70;

/// Course category offered by the authoring form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Programming,
    Design,
    Marketing,
    Business,
    Languages,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Programming,
        Category::Design,
        Category::Marketing,
        Category::Business,
        Category::Languages,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Programming => "programming",
            Category::Design => "design",
            Category::Marketing => "marketing",
            Category::Business => "business",
            Category::Languages => "languages",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Variant tag of an assessment question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::TrueFalse => "true_false",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "multiple_choice" => Ok(QuestionKind::MultipleChoice),
            "true_false" => Ok(QuestionKind::TrueFalse),
            other => Err(format!("unknown question type '{}'", other)),
        }
    }
}

/// Course-level scalar fields (the tree root).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFields {
    pub title: String,
    pub description: String,
    /// Free-form duration label, e.g. "10 hours"
    pub duration: String,
    /// Thumbnail URL or storage reference
    pub thumbnail: String,
    pub category: Option<Category>,
    pub expiration_date: Option<NaiveDate>,
    pub has_evaluative_activity: bool,
    pub evaluative_activity_description: String,
}

/// Assessment embedded in every module; questions live in the arena as module children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub title: String,
    pub description: String,
    /// Percentage in [0, 100], checked by the validation pass
    pub passing_score: i32,
}

impl Default for Assessment {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            passing_score: DEFAULT_PASSING_SCORE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleData {
    pub title: String,
    pub description: String,
    pub has_assessment: bool,
    pub assessment: Assessment,
}

impl ModuleData {
    pub fn with_passing_score(passing_score: i32) -> Self {
        Self {
            assessment: Assessment {
                passing_score,
                ..Assessment::default()
            },
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonData {
    pub title: String,
    pub description: String,
    /// Duration label as typed by the author
    pub duration: String,
    pub video_url: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionData {
    pub prompt: String,
    pub kind: QuestionKind,
    /// Empty for true/false questions
    pub options: Vec<String>,
    /// Option value for multiple choice, "true"/"false" otherwise; empty when unset
    pub correct_answer: String,
}

impl Default for QuestionData {
    /// Multiple choice with two empty options and no answer.
    fn default() -> Self {
        Self {
            prompt: String::new(),
            kind: QuestionKind::MultipleChoice,
            options: vec![String::new(); MIN_OPTIONS],
            correct_answer: String::new(),
        }
    }
}

/// Attached file; the handle is shared, never duplicated.
#[derive(Debug, Clone)]
pub struct FileData {
    pub name: String,
    pub media_type: MediaType,
    pub size: u64,
    pub handle: BinaryHandle,
}
