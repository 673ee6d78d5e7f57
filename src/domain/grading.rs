//! Scoring learner responses against a module assessment

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::QuestionData;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::ids::NodeId;

/// One learner answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    pub question_id: NodeId,
    pub selected_answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    pub correct: usize,
    pub total: usize,
    /// Rounded percentage of correct answers
    pub score: u32,
    pub passed: bool,
}

/// Grade `responses` against `questions`.
///
/// Only the first response per question counts; responses to unknown questions
/// are ignored.
pub fn grade(
    module: &NodeId,
    questions: &[(&NodeId, &QuestionData)],
    passing_score: i32,
    responses: &[QuizResponse],
) -> DomainResult<GradeReport> {
    if questions.is_empty() {
        return Err(DomainError::EmptyAssessment(module.clone()));
    }

    let mut answers: HashMap<&NodeId, &str> = HashMap::new();
    for response in responses {
        answers
            .entry(&response.question_id)
            .or_insert(response.selected_answer.as_str());
    }

    let correct = questions
        .iter()
        .filter(|(id, q)| {
            answers
                .get(id)
                .is_some_and(|answer| !q.correct_answer.is_empty() && *answer == q.correct_answer)
        })
        .count();
    let total = questions.len();
    let score = (correct as f64 / total as f64 * 100.0).round() as u32;

    Ok(GradeReport {
        correct,
        total,
        score,
        passed: i64::from(score) >= i64::from(passing_score),
    })
}

/// Aggregate over graded attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptStats {
    pub total_attempts: usize,
    pub average_score: u32,
    /// Rounded percentage of passed attempts
    pub pass_rate: u32,
}

impl AttemptStats {
    pub fn from_reports(reports: &[GradeReport]) -> Self {
        if reports.is_empty() {
            return Self::default();
        }
        let n = reports.len() as f64;
        let total_score: u64 = reports.iter().map(|r| u64::from(r.score)).sum();
        let passed = reports.iter().filter(|r| r.passed).count();
        Self {
            total_attempts: reports.len(),
            average_score: (total_score as f64 / n).round() as u32,
            pass_rate: (passed as f64 / n * 100.0).round() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::QuestionKind;

    fn mc(answer: &str) -> QuestionData {
        QuestionData {
            prompt: "?".into(),
            kind: QuestionKind::MultipleChoice,
            options: vec!["A".into(), "B".into()],
            correct_answer: answer.into(),
        }
    }

    fn response(q: &str, a: &str) -> QuizResponse {
        QuizResponse {
            question_id: q.into(),
            selected_answer: a.into(),
        }
    }

    #[test]
    fn given_two_of_three_correct_when_grading_then_67_and_failed_at_70() {
        let (q1, q2, q3) = (NodeId::from("q1"), NodeId::from("q2"), NodeId::from("q3"));
        let (d1, d2, d3) = (mc("A"), mc("B"), mc("A"));
        let questions = vec![(&q1, &d1), (&q2, &d2), (&q3, &d3)];
        let responses = vec![response("q1", "A"), response("q2", "B"), response("q3", "B")];

        let report = grade(&"m".into(), &questions, 70, &responses).unwrap();

        assert_eq!(report.correct, 2);
        assert_eq!(report.total, 3);
        assert_eq!(report.score, 67);
        assert!(!report.passed);
    }

    #[test]
    fn given_repeated_and_unknown_responses_when_grading_then_first_answer_counts() {
        let q1 = NodeId::from("q1");
        let d1 = mc("A");
        let questions = vec![(&q1, &d1)];
        let responses = vec![
            response("q1", "B"),
            response("q1", "A"),
            response("ghost", "A"),
        ];

        let report = grade(&"m".into(), &questions, 0, &responses).unwrap();

        assert_eq!(report.correct, 0);
        assert!(report.passed);
    }

    #[test]
    fn given_no_questions_when_grading_then_empty_assessment() {
        let err = grade(&"m".into(), &[], 70, &[]).unwrap_err();
        assert_eq!(err, DomainError::EmptyAssessment("m".into()));
    }

    #[test]
    fn given_reports_when_aggregating_then_rounded_stats() {
        let reports = [
            GradeReport { correct: 1, total: 3, score: 33, passed: false },
            GradeReport { correct: 3, total: 3, score: 100, passed: true },
            GradeReport { correct: 2, total: 3, score: 67, passed: false },
        ];
        let stats = AttemptStats::from_reports(&reports);
        assert_eq!(stats.total_attempts, 3);
        assert_eq!(stats.average_score, 67);
        assert_eq!(stats.pass_rate, 33);
        assert_eq!(AttemptStats::from_reports(&[]), AttemptStats::default());
    }
}
