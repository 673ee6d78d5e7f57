//! Tests for layered settings: local overlay semantics and derived policies

use std::fs;

use rstest::rstest;
use tempfile::TempDir;

use coursedraft::application::ApplicationError;
use coursedraft::config::{local_config_path, Settings};
use coursedraft::domain::{IdPolicy, MediaType};

fn write_local(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = local_config_path(dir.path());
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_local_file_with_negation_when_merging_then_union_minus_negated() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_local(
        &temp,
        r#"
[uploads]
allowed_types = ["!application/msword", "!image/jpeg"]
max_file_size = 2048
"#,
    );

    // Act
    let settings = Settings::default().with_local_file(&path).unwrap();

    // Assert
    assert_eq!(settings.uploads.max_file_size, 2048);
    assert!(!settings
        .uploads
        .allowed_types
        .contains(&"application/msword".to_string()));
    let policy = settings.uploads.file_policy().unwrap();
    assert_eq!(policy.max_size_bytes, 2048);
    assert_eq!(policy.allowed.len(), 3);
    assert!(!policy.allowed.contains(&MediaType::Jpeg));
    assert!(policy.allowed.contains(&MediaType::Pdf));
}

#[test]
fn given_local_draft_section_when_merging_then_scalars_override() {
    let temp = TempDir::new().unwrap();
    let path = write_local(
        &temp,
        r#"
[draft]
copy_marker = " - copia"
duplicate_ids = "preserve"

[payload]
default_instructor = "Staff"
"#,
    );

    let settings = Settings::default().with_local_file(&path).unwrap();

    assert_eq!(settings.draft.copy_marker, " - copia");
    assert_eq!(settings.draft.duplicate_ids, IdPolicy::Preserve);
    assert_eq!(settings.draft.default_passing_score, 70);
    assert_eq!(settings.payload.default_instructor, "Staff");
    assert_eq!(settings.payload.default_duration, "60");
}

#[test]
fn given_missing_local_file_when_merging_then_unchanged() {
    let temp = TempDir::new().unwrap();

    let settings = Settings::default()
        .with_local_file(&local_config_path(temp.path()))
        .unwrap();

    assert_eq!(settings, Settings::default());
}

#[rstest]
#[case("[uploads\nmax_file_size = 1")]
#[case("[uploads]\nmax_file_size = \"big\"")]
fn given_malformed_local_file_when_merging_then_config_error(#[case] content: &str) {
    let temp = TempDir::new().unwrap();
    let path = write_local(&temp, content);

    let err = Settings::default().with_local_file(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_unknown_type_added_locally_when_deriving_policy_then_config_error() {
    let temp = TempDir::new().unwrap();
    let path = write_local(&temp, "[uploads]\nallowed_types = [\"text/plain\"]\n");

    let settings = Settings::default().with_local_file(&path).unwrap();

    assert!(matches!(
        settings.uploads.file_policy(),
        Err(ApplicationError::Config { .. })
    ));
}

#[test]
fn given_effective_settings_when_rendering_then_toml_reparses() {
    let settings = Settings::default();

    let rendered = settings.to_toml().unwrap();
    let reparsed: Settings = toml::from_str(&rendered).unwrap();

    assert_eq!(reparsed, settings);
}
