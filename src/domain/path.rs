//! Field addressing for `set_field`
//!
//! A `FieldPath` names one scalar field anywhere in the draft. Its string form is
//! used by the CLI and by validation reports:
//!
//! - `title`
//! - `modules/<module>/assessmentTitle`
//! - `modules/<module>/lessons/<lesson>/videoUrl`
//! - `modules/<module>/questions/<question>/correctAnswer`
//! - `modules/<module>/questions/<question>/options/<index>`

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::entities::{Category, QuestionKind};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::ids::NodeId;

/// Type of value a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Text,
    Flag,
    Integer,
    Date,
    Category,
    Kind,
}

impl ValueType {
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Text => "text",
            ValueType::Flag => "flag",
            ValueType::Integer => "integer",
            ValueType::Date => "date",
            ValueType::Category => "category",
            ValueType::Kind => "question type",
        }
    }
}

/// New value for a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Integer(i64),
    Date(Option<NaiveDate>),
    Category(Option<Category>),
    Kind(QuestionKind),
}

impl FieldValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            FieldValue::Text(_) => ValueType::Text,
            FieldValue::Flag(_) => ValueType::Flag,
            FieldValue::Integer(_) => ValueType::Integer,
            FieldValue::Date(_) => ValueType::Date,
            FieldValue::Category(_) => ValueType::Category,
            FieldValue::Kind(_) => ValueType::Kind,
        }
    }
}

macro_rules! field_keys {
    ($name:ident { $($variant:ident => $key:literal : $ty:ident),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn key(&self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            pub fn value_type(&self) -> ValueType {
                match self {
                    $($name::$variant => ValueType::$ty),+
                }
            }

            pub fn from_key(key: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|f| f.key() == key)
            }
        }
    };
}

field_keys!(CourseField {
    Title => "title": Text,
    Description => "description": Text,
    Duration => "duration": Text,
    Thumbnail => "thumbnail": Text,
    Category => "category": Category,
    ExpirationDate => "expirationDate": Date,
    HasEvaluativeActivity => "hasEvaluativeActivity": Flag,
    EvaluativeActivityDescription => "evaluativeActivityDescription": Text,
});

field_keys!(ModuleField {
    Title => "title": Text,
    Description => "description": Text,
    HasAssessment => "hasAssessment": Flag,
    AssessmentTitle => "assessmentTitle": Text,
    AssessmentDescription => "assessmentDescription": Text,
    PassingScore => "assessmentPassingScore": Integer,
});

field_keys!(LessonField {
    Title => "title": Text,
    Description => "description": Text,
    Duration => "duration": Text,
    VideoUrl => "videoUrl": Text,
    Content => "content": Text,
});

field_keys!(QuestionField {
    Prompt => "question": Text,
    Kind => "type": Kind,
    CorrectAnswer => "correctAnswer": Text,
});

/// Address of one scalar field in the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPath {
    Course(CourseField),
    Module {
        module: NodeId,
        field: ModuleField,
    },
    Lesson {
        module: NodeId,
        lesson: NodeId,
        field: LessonField,
    },
    Question {
        module: NodeId,
        question: NodeId,
        field: QuestionField,
    },
    QuestionOption {
        module: NodeId,
        question: NodeId,
        index: usize,
    },
}

impl FieldPath {
    pub fn value_type(&self) -> ValueType {
        match self {
            FieldPath::Course(f) => f.value_type(),
            FieldPath::Module { field, .. } => field.value_type(),
            FieldPath::Lesson { field, .. } => field.value_type(),
            FieldPath::Question { field, .. } => field.value_type(),
            FieldPath::QuestionOption { .. } => ValueType::Text,
        }
    }

    /// Parse a raw string (as typed on the command line) into a value of the
    /// type this field expects. Empty input clears optional fields.
    pub fn parse_value(&self, raw: &str) -> DomainResult<FieldValue> {
        let invalid = |message: String| DomainError::InvalidValue {
            path: self.to_string(),
            message,
        };
        let trimmed = raw.trim();
        match self.value_type() {
            ValueType::Text => Ok(FieldValue::Text(raw.to_string())),
            ValueType::Flag => trimmed
                .parse::<bool>()
                .map(FieldValue::Flag)
                .map_err(|_| invalid(format!("expected true or false, got '{}'", raw))),
            ValueType::Integer => trimmed
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|e| invalid(e.to_string())),
            ValueType::Date if trimmed.is_empty() => Ok(FieldValue::Date(None)),
            ValueType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(|d| FieldValue::Date(Some(d)))
                .map_err(|e| invalid(format!("expected YYYY-MM-DD: {}", e))),
            ValueType::Category if trimmed.is_empty() => Ok(FieldValue::Category(None)),
            ValueType::Category => trimmed
                .parse::<Category>()
                .map(|c| FieldValue::Category(Some(c)))
                .map_err(invalid),
            ValueType::Kind => trimmed
                .parse::<QuestionKind>()
                .map(FieldValue::Kind)
                .map_err(invalid),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Course(field) => f.write_str(field.key()),
            FieldPath::Module { module, field } => {
                write!(f, "modules/{}/{}", module, field.key())
            }
            FieldPath::Lesson {
                module,
                lesson,
                field,
            } => write!(f, "modules/{}/lessons/{}/{}", module, lesson, field.key()),
            FieldPath::Question {
                module,
                question,
                field,
            } => write!(
                f,
                "modules/{}/questions/{}/{}",
                module,
                question,
                field.key()
            ),
            FieldPath::QuestionOption {
                module,
                question,
                index,
            } => write!(f, "modules/{}/questions/{}/options/{}", module, question, index),
        }
    }
}

impl FromStr for FieldPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidPath(s.to_string());
        let parts: Vec<&str> = s.trim().trim_matches('/').split('/').collect();
        let path = match parts.as_slice() {
            [key] => FieldPath::Course(CourseField::from_key(key).ok_or_else(invalid)?),
            ["modules", module, key] => FieldPath::Module {
                module: NodeId::from(*module),
                field: ModuleField::from_key(key).ok_or_else(invalid)?,
            },
            ["modules", module, "lessons", lesson, key] => FieldPath::Lesson {
                module: NodeId::from(*module),
                lesson: NodeId::from(*lesson),
                field: LessonField::from_key(key).ok_or_else(invalid)?,
            },
            ["modules", module, "questions", question, "options", index] => {
                FieldPath::QuestionOption {
                    module: NodeId::from(*module),
                    question: NodeId::from(*question),
                    index: index.parse().map_err(|_| invalid())?,
                }
            }
            ["modules", module, "questions", question, key] => FieldPath::Question {
                module: NodeId::from(*module),
                question: NodeId::from(*question),
                field: QuestionField::from_key(key).ok_or_else(invalid)?,
            },
            _ => return Err(invalid()),
        };
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("title")]
    #[case("expirationDate")]
    #[case("modules/m-1/assessmentPassingScore")]
    #[case("modules/m-1/lessons/l-2/videoUrl")]
    #[case("modules/m-1/questions/q-3/correctAnswer")]
    #[case("modules/m-1/questions/q-3/options/4")]
    fn given_path_string_when_parsing_then_displays_identically(#[case] raw: &str) {
        let path: FieldPath = raw.parse().unwrap();
        assert_eq!(path.to_string(), raw);
    }

    #[rstest]
    #[case("nope")]
    #[case("modules/m-1")]
    #[case("modules/m-1/lessons/l-1/nope")]
    #[case("modules/m-1/questions/q-1/options/x")]
    #[case("lessons/l-1/title")]
    fn given_bad_path_when_parsing_then_invalid_path(#[case] raw: &str) {
        let err = raw.parse::<FieldPath>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidPath(_)));
    }

    #[test]
    fn given_typed_fields_when_parsing_values_then_matching_variants() {
        let date: FieldPath = "expirationDate".parse().unwrap();
        assert_eq!(
            date.parse_value("2030-01-31").unwrap(),
            FieldValue::Date(NaiveDate::from_ymd_opt(2030, 1, 31))
        );
        assert_eq!(date.parse_value("").unwrap(), FieldValue::Date(None));
        assert!(date.parse_value("31/01/2030").is_err());

        let score: FieldPath = "modules/m/assessmentPassingScore".parse().unwrap();
        assert_eq!(score.parse_value("85").unwrap(), FieldValue::Integer(85));

        let kind: FieldPath = "modules/m/questions/q/type".parse().unwrap();
        assert_eq!(
            kind.parse_value("true_false").unwrap(),
            FieldValue::Kind(QuestionKind::TrueFalse)
        );

        let flag: FieldPath = "hasEvaluativeActivity".parse().unwrap();
        assert!(flag.parse_value("yes").is_err());
    }
}
