//! Tests for seeding a new draft from an existing course

use std::sync::Arc;

use chrono::NaiveDate;
use rstest::{fixture, rstest};

use coursedraft::domain::{
    CourseDraftTree, FieldPath, FieldValue, IdPolicy, NodeId, SequentialIds,
};

fn set(tree: &mut CourseDraftTree, path: &str, raw: &str) {
    let path: FieldPath = path.parse().unwrap();
    let value = path.parse_value(raw).unwrap();
    tree.set_field(&path, value).unwrap();
}

/// Two modules; the first has a lesson and an assessment question.
#[fixture]
fn source() -> CourseDraftTree {
    let mut tree = CourseDraftTree::with_id("src".into(), Arc::new(SequentialIds::new("s")));
    set(&mut tree, "title", "Async Rust");
    set(&mut tree, "expirationDate", "2031-01-01");
    let first = tree.add_module().unwrap();
    set(&mut tree, &format!("modules/{}/title", first), "Futures");
    let lesson = tree.add_lesson(&first).unwrap();
    set(
        &mut tree,
        &format!("modules/{}/lessons/{}/title", first, lesson),
        "Polling",
    );
    let q = tree.add_assessment_question(&first).unwrap();
    set(
        &mut tree,
        &format!("modules/{}/questions/{}/options/0", first, q),
        "Pending",
    );
    let second = tree.add_module().unwrap();
    set(&mut tree, &format!("modules/{}/title", second), "Executors");
    tree
}

fn titles(tree: &CourseDraftTree) -> Vec<String> {
    tree.modules().map(|(_, m)| m.title.clone()).collect()
}

#[rstest]
fn given_source_when_duplicating_with_regenerate_then_content_copied_under_fresh_ids(
    source: CourseDraftTree,
) {
    // Act
    let copy = CourseDraftTree::duplicate_from(
        &source,
        Arc::new(SequentialIds::new("d")),
        IdPolicy::Regenerate,
        " (Copy)",
    )
    .unwrap();

    // Assert
    assert_eq!(copy.course().title, "Async Rust (Copy)");
    assert_eq!(copy.course().expiration_date, None);
    assert_ne!(copy.id(), source.id());
    assert_eq!(titles(&copy), vec!["Futures", "Executors"]);
    assert_eq!(copy.node_count(), source.node_count());

    let source_ids = source.module_ids();
    for id in copy.module_ids() {
        assert!(!source_ids.contains(&id));
    }

    let first = &copy.module_ids()[0];
    let (_, lesson) = copy.lessons(first).unwrap()[0];
    assert_eq!(lesson.title, "Polling");
    let (_, question) = copy.questions(first).unwrap()[0];
    assert_eq!(question.options[0], "Pending");
}

#[rstest]
fn given_source_when_duplicating_with_preserve_then_descendant_ids_kept(
    source: CourseDraftTree,
) {
    let copy = CourseDraftTree::duplicate_from(
        &source,
        Arc::new(SequentialIds::new("d")),
        IdPolicy::Preserve,
        " (Copy)",
    )
    .unwrap();

    assert_eq!(copy.module_ids(), source.module_ids());
    assert_eq!(copy.id(), &NodeId::from("d-1"));
}

#[rstest]
fn given_duplicate_when_editing_copy_then_source_unchanged(source: CourseDraftTree) {
    // Arrange
    let mut copy = CourseDraftTree::duplicate_from(
        &source,
        Arc::new(SequentialIds::new("d")),
        IdPolicy::Preserve,
        "",
    )
    .unwrap();
    let first = copy.module_ids()[0].clone();

    // Act
    copy.remove_module(&first).unwrap();
    copy.set_field(
        &FieldPath::Course(coursedraft::domain::CourseField::Title),
        FieldValue::Text("Changed".into()),
    )
    .unwrap();

    // Assert
    assert_eq!(source.course().title, "Async Rust");
    assert_eq!(titles(&source), vec!["Futures", "Executors"]);
    assert!(source.contains(&first));
    assert_eq!(
        source.course().expiration_date,
        NaiveDate::from_ymd_opt(2031, 1, 1)
    );
}
