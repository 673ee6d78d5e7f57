//! Tests for submission-boundary validation

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use rstest::{fixture, rstest};

use coursedraft::domain::{validate, validate_at, CourseDraftTree, FieldPath, NodeId, SequentialIds};

fn set(tree: &mut CourseDraftTree, path: &str, raw: &str) {
    let path: FieldPath = path.parse().unwrap();
    let value = path.parse_value(raw).unwrap();
    tree.set_field(&path, value).unwrap();
}

fn paths(tree: &CourseDraftTree) -> Vec<String> {
    validate(tree).into_iter().map(|v| v.path).collect()
}

/// Course with one titled module holding one titled lesson.
#[fixture]
fn valid() -> (CourseDraftTree, NodeId) {
    let mut tree = CourseDraftTree::with_id("course".into(), Arc::new(SequentialIds::new("n")));
    set(&mut tree, "title", "Rust for Authors");
    set(&mut tree, "description", "Ownership, borrowing and beyond");
    set(&mut tree, "category", "programming");
    let module = tree.add_module().unwrap();
    set(&mut tree, &format!("modules/{}/title", module), "Basics");
    let lesson = tree.add_lesson(&module).unwrap();
    set(
        &mut tree,
        &format!("modules/{}/lessons/{}/title", module, lesson),
        "Hello",
    );
    (tree, module)
}

#[test]
fn given_empty_draft_when_validating_then_course_fields_and_modules_reported_in_order() {
    let tree = CourseDraftTree::with_id("c".into(), Arc::new(SequentialIds::new("n")));

    assert_eq!(
        paths(&tree),
        vec!["title", "description", "category", "modules"]
    );
}

#[rstest]
fn given_complete_draft_when_validating_then_no_violations(valid: (CourseDraftTree, NodeId)) {
    let (tree, _) = valid;
    assert!(validate(&tree).is_empty());
}

#[rstest]
fn given_evaluative_flag_without_description_when_validating_then_reported(
    valid: (CourseDraftTree, NodeId),
) {
    // Arrange
    let (mut tree, _) = valid;
    set(&mut tree, "hasEvaluativeActivity", "true");

    // Act
    let found = paths(&tree);

    // Assert
    assert_eq!(found, vec!["evaluativeActivityDescription"]);

    set(&mut tree, "evaluativeActivityDescription", "Write a crate");
    assert!(validate(&tree).is_empty());
}

#[rstest]
fn given_description_without_flag_when_validating_then_ignored(
    valid: (CourseDraftTree, NodeId),
) {
    let (mut tree, _) = valid;
    set(&mut tree, "evaluativeActivityDescription", "");
    set(&mut tree, "hasEvaluativeActivity", "false");

    assert!(validate(&tree).is_empty());
}

#[rstest]
fn given_assessment_with_answered_multiple_choice_when_validating_then_no_question_violations(
    valid: (CourseDraftTree, NodeId),
) {
    // Arrange
    let (mut tree, module) = valid;
    set(&mut tree, &format!("modules/{}/hasAssessment", module), "true");
    set(&mut tree, &format!("modules/{}/assessmentTitle", module), "Quiz");
    let q = tree.add_assessment_question(&module).unwrap();
    let base = format!("modules/{}/questions/{}", module, q);
    set(&mut tree, &format!("{}/question", base), "Which keyword moves?");
    set(&mut tree, &format!("{}/options/0", base), "move");
    set(&mut tree, &format!("{}/options/1", base), "borrow");
    set(&mut tree, &format!("{}/correctAnswer", base), "move");

    // Act
    let violations = validate(&tree);

    // Assert
    assert!(violations.is_empty(), "unexpected: {:?}", violations);
}

#[rstest]
fn given_incomplete_question_when_validating_then_every_gap_reported(
    valid: (CourseDraftTree, NodeId),
) {
    // Arrange
    let (mut tree, module) = valid;
    set(&mut tree, &format!("modules/{}/hasAssessment", module), "true");
    let q = tree.add_assessment_question(&module).unwrap();
    let base = format!("modules/{}/questions/{}", module, q);
    set(&mut tree, &format!("{}/options/0", base), "yes");
    set(&mut tree, &format!("{}/correctAnswer", base), "maybe");

    // Act
    let found = paths(&tree);

    // Assert
    assert_eq!(
        found,
        vec![
            format!("modules/{}/assessmentTitle", module),
            format!("{}/question", base),
            format!("{}/options/1", base),
            format!("{}/correctAnswer", base),
        ]
    );
}

#[rstest]
fn given_questions_with_assessment_disabled_when_validating_then_questions_skipped(
    valid: (CourseDraftTree, NodeId),
) {
    let (mut tree, module) = valid;
    tree.add_assessment_question(&module).unwrap();

    assert!(validate(&tree).is_empty());
}

#[rstest]
fn given_true_false_question_when_answer_not_boolean_then_reported(
    valid: (CourseDraftTree, NodeId),
) {
    // Arrange
    let (mut tree, module) = valid;
    set(&mut tree, &format!("modules/{}/hasAssessment", module), "true");
    set(&mut tree, &format!("modules/{}/assessmentTitle", module), "Quiz");
    let q = tree.add_assessment_question(&module).unwrap();
    let base = format!("modules/{}/questions/{}", module, q);
    set(&mut tree, &format!("{}/question", base), "Rust has a GC");
    set(&mut tree, &format!("{}/type", base), "true_false");

    // Act
    let missing = paths(&tree);
    set(&mut tree, &format!("{}/correctAnswer", base), "false");

    // Assert
    assert_eq!(missing, vec![format!("{}/correctAnswer", base)]);
    assert!(validate(&tree).is_empty());
}

#[rstest]
#[case(-1, false)]
#[case(0, true)]
#[case(100, true)]
#[case(101, false)]
fn given_passing_score_when_validating_then_range_checked(
    valid: (CourseDraftTree, NodeId),
    #[case] score: i64,
    #[case] accepted: bool,
) {
    let (mut tree, module) = valid;
    set(
        &mut tree,
        &format!("modules/{}/assessmentPassingScore", module),
        &score.to_string(),
    );

    assert_eq!(validate(&tree).is_empty(), accepted);
}

#[rstest]
#[case(-1, false)]
#[case(0, false)]
#[case(1, true)]
fn given_expiration_date_when_validating_then_must_be_after_today(
    valid: (CourseDraftTree, NodeId),
    #[case] offset_days: i64,
    #[case] accepted: bool,
) {
    // Arrange
    let (mut tree, _) = valid;
    let now = Utc.with_ymd_and_hms(2030, 6, 15, 9, 30, 0).unwrap();
    let date = (now + Duration::days(offset_days)).date_naive();
    set(&mut tree, "expirationDate", &date.format("%Y-%m-%d").to_string());

    // Act
    let violations = validate_at(&tree, now);

    // Assert
    if accepted {
        assert!(violations.is_empty(), "{:?}", violations);
    } else {
        assert_eq!(violations.len(), 1, "{:?}", violations);
        assert_eq!(violations[0].path, "expirationDate");
    }
}

#[rstest]
fn given_untitled_lessons_in_two_modules_when_validating_then_reported_in_tree_order(
    valid: (CourseDraftTree, NodeId),
) {
    // Arrange
    let (mut tree, first) = valid;
    let second = tree.add_module().unwrap();
    let late = tree.add_lesson(&second).unwrap();
    let early = tree.add_lesson(&first).unwrap();

    // Act
    let found = paths(&tree);

    // Assert
    assert_eq!(
        found,
        vec![
            format!("modules/{}/lessons/{}/title", first, early),
            format!("modules/{}/title", second),
            format!("modules/{}/lessons/{}/title", second, late),
        ]
    );
}
