//! Tests for complementary-file admission on lessons

use std::sync::Arc;

use bytes::Bytes;
use rstest::rstest;

use coursedraft::domain::{
    format_file_size, CourseDraftTree, DomainError, FileDescriptor, FilePolicy, MediaType,
    NodeId, RejectionReason, SequentialIds, MAX_FILE_SIZE,
};

fn draft_with_lesson() -> (CourseDraftTree, NodeId, NodeId) {
    let mut tree = CourseDraftTree::with_id("course".into(), Arc::new(SequentialIds::new("n")));
    let module = tree.add_module().unwrap();
    let lesson = tree.add_lesson(&module).unwrap();
    (tree, module, lesson)
}

fn descriptor(name: &str, mime: &str, size: u64) -> FileDescriptor {
    FileDescriptor {
        name: name.to_string(),
        media_type: mime.to_string(),
        size,
        handle: coursedraft::domain::BinaryHandle::Detached,
    }
}

#[test]
fn given_mixed_batch_when_attaching_then_valid_files_appended_in_order_and_rest_reported() {
    // Arrange
    let (mut tree, module, lesson) = draft_with_lesson();
    let batch = vec![
        descriptor("slides.pdf", "application/pdf", 2_000),
        descriptor("script.exe", "application/x-msdownload", 10),
        descriptor("photo.png", "image/png", 500),
        descriptor("video.pdf", "application/pdf", MAX_FILE_SIZE + 1),
        descriptor("notes.docx", MediaType::Docx.mime(), 42),
    ];

    // Act
    let report = tree
        .add_complementary_files(&module, &lesson, batch)
        .unwrap();

    // Assert
    let names: Vec<_> = tree
        .files(&module, &lesson)
        .unwrap()
        .into_iter()
        .map(|(_, f)| f.name.clone())
        .collect();
    assert_eq!(names, vec!["slides.pdf", "photo.png", "notes.docx"]);
    assert_eq!(report.accepted.len(), 3);
    assert!(!report.is_complete());

    let rejected: Vec<_> = report
        .rejected
        .iter()
        .map(|r| (r.file_name.as_str(), r.reason.clone()))
        .collect();
    assert_eq!(
        rejected,
        vec![
            (
                "script.exe",
                RejectionReason::DisallowedType("application/x-msdownload".into())
            ),
            (
                "video.pdf",
                RejectionReason::TooLarge {
                    size: MAX_FILE_SIZE + 1,
                    limit: MAX_FILE_SIZE
                }
            ),
        ]
    );
}

#[test]
fn given_missing_lesson_when_attaching_then_not_found_and_nothing_appended() {
    let (mut tree, module, _) = draft_with_lesson();
    let before = tree.node_count();

    let err = tree
        .add_complementary_files(
            &module,
            &"ghost".into(),
            vec![descriptor("a.pdf", "application/pdf", 1)],
        )
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { .. }));
    assert_eq!(tree.node_count(), before);
}

#[test]
fn given_in_memory_content_when_attaching_then_handle_shares_buffer() {
    // Arrange
    let (mut tree, module, lesson) = draft_with_lesson();
    let content = Bytes::from_static(b"%PDF-1.7 minimal");
    let file = FileDescriptor::from_bytes("tiny.pdf", "application/pdf", content.clone());

    // Act
    let report = tree
        .add_complementary_files(&module, &lesson, vec![file])
        .unwrap();

    // Assert
    assert!(report.is_complete());
    let files = tree.files(&module, &lesson).unwrap();
    let (_, stored) = files[0];
    assert_eq!(stored.size, content.len() as u64);
    match &stored.handle {
        coursedraft::domain::BinaryHandle::Memory(bytes) => {
            assert_eq!(bytes.as_ptr(), content.as_ptr())
        }
        other => panic!("expected memory handle, got {:?}", other),
    }
}

#[test]
fn given_narrow_policy_when_attaching_then_policy_applies() {
    // Arrange
    let (tree, module, lesson) = draft_with_lesson();
    let mut tree = tree.with_file_policy(FilePolicy {
        max_size_bytes: 100,
        allowed: vec![MediaType::Png],
    });

    // Act
    let report = tree
        .add_complementary_files(
            &module,
            &lesson,
            vec![
                descriptor("a.png", "image/png", 100),
                descriptor("b.png", "image/png", 101),
                descriptor("c.pdf", "application/pdf", 1),
            ],
        )
        .unwrap();

    // Assert
    assert_eq!(report.accepted.len(), 1);
    assert_eq!(report.rejected[0].file_name, "b.png");
    assert_eq!(report.rejected[1].file_name, "c.pdf");
}

#[test]
fn given_attached_file_when_removing_then_gone_and_others_kept() {
    let (mut tree, module, lesson) = draft_with_lesson();
    let report = tree
        .add_complementary_files(
            &module,
            &lesson,
            vec![
                descriptor("a.pdf", "application/pdf", 1),
                descriptor("b.pdf", "application/pdf", 1),
            ],
        )
        .unwrap();

    tree.remove_complementary_file(&module, &lesson, &report.accepted[0])
        .unwrap();

    let remaining = tree.files(&module, &lesson).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].0, &report.accepted[1]);
}

#[rstest]
#[case(0, "0 Bytes")]
#[case(512, "512 Bytes")]
#[case(1536, "1.5 KB")]
#[case(10 * 1024 * 1024, "10 MB")]
#[case(1_234_567, "1.18 MB")]
fn given_byte_counts_when_formatting_then_human_readable(#[case] bytes: u64, #[case] expected: &str) {
    assert_eq!(format_file_size(bytes), expected);
}
