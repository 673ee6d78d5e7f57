//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/coursedraft/coursedraft.toml`
//! 3. Local config: `<dir>/.coursedraft.toml` (usually the working directory)
//! 4. Environment variables: `COURSEDRAFT_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{FilePolicy, IdPolicy, MediaType, DEFAULT_PASSING_SCORE, MAX_FILE_SIZE};

/// Attachment admission settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UploadConfig {
    /// Per-file ceiling in bytes
    pub max_file_size: u64,
    /// Allowed MIME types
    pub allowed_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            allowed_types: MediaType::ALL.iter().map(|t| t.mime().to_string()).collect(),
        }
    }
}

/// Raw upload config for intermediate parsing (arrays are Option to detect "not specified").
///
/// Used during layered config merging to distinguish between:
/// - `None` → field not specified, inherit from base
/// - `Some([])` → explicit empty array
/// - `Some([...])` → explicit values to merge
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawUploadConfig {
    pub max_file_size: Option<u64>,
    pub allowed_types: Option<Vec<String>>,
}

impl UploadConfig {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
    /// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for item in overlay {
            if let Some(negated) = item.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(item.clone());
            }
        }

        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Local overlay: scalars win if set, arrays union with negation.
    pub fn merge(&self, overlay: &RawUploadConfig) -> Self {
        Self {
            max_file_size: overlay.max_file_size.unwrap_or(self.max_file_size),
            allowed_types: overlay
                .allowed_types
                .as_ref()
                .map(|o| Self::merge_array(&self.allowed_types, o))
                .unwrap_or_else(|| self.allowed_types.clone()),
        }
    }

    /// Global overlay: arrays REPLACE the defaults instead of extending them.
    pub fn apply_global(&self, global: &RawUploadConfig) -> Self {
        Self {
            max_file_size: global.max_file_size.unwrap_or(self.max_file_size),
            allowed_types: global
                .allowed_types
                .clone()
                .unwrap_or_else(|| self.allowed_types.clone()),
        }
    }

    /// Admission policy for the draft tree; unknown MIME types are a config error.
    pub fn file_policy(&self) -> Result<FilePolicy, ApplicationError> {
        let allowed = self
            .allowed_types
            .iter()
            .map(|t| {
                t.parse::<MediaType>()
                    .map_err(|message| ApplicationError::Config { message })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FilePolicy {
            max_size_bytes: self.max_file_size,
            allowed,
        })
    }
}

/// Draft editing and duplication settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DraftConfig {
    /// Appended to the title of a duplicated course
    pub copy_marker: String,
    pub default_passing_score: i32,
    pub duplicate_ids: IdPolicy,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            copy_marker: " (Copy)".to_string(),
            default_passing_score: DEFAULT_PASSING_SCORE,
            duplicate_ids: IdPolicy::Regenerate,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDraftConfig {
    pub copy_marker: Option<String>,
    pub default_passing_score: Option<i32>,
    pub duplicate_ids: Option<IdPolicy>,
}

impl DraftConfig {
    fn overlay(&self, raw: &RawDraftConfig) -> Self {
        Self {
            copy_marker: raw
                .copy_marker
                .clone()
                .unwrap_or_else(|| self.copy_marker.clone()),
            default_passing_score: raw
                .default_passing_score
                .unwrap_or(self.default_passing_score),
            duplicate_ids: raw.duplicate_ids.unwrap_or(self.duplicate_ids),
        }
    }
}

/// Fallbacks used when flattening a draft into the submission payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PayloadConfig {
    pub placeholder_thumbnail: String,
    pub default_duration: String,
    pub default_instructor: String,
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            placeholder_thumbnail: "/placeholder.svg".to_string(),
            default_duration: "60".to_string(),
            default_instructor: "Professor".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawPayloadConfig {
    pub placeholder_thumbnail: Option<String>,
    pub default_duration: Option<String>,
    pub default_instructor: Option<String>,
}

impl PayloadConfig {
    fn overlay(&self, raw: &RawPayloadConfig) -> Self {
        let pick = |v: &Option<String>, base: &String| v.clone().unwrap_or_else(|| base.clone());
        Self {
            placeholder_thumbnail: pick(&raw.placeholder_thumbnail, &self.placeholder_thumbnail),
            default_duration: pick(&raw.default_duration, &self.default_duration),
            default_instructor: pick(&raw.default_instructor, &self.default_instructor),
        }
    }
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub fixtures_dir: Option<PathBuf>,
    pub uploads: RawUploadConfig,
    pub draft: RawDraftConfig,
    pub payload: RawPayloadConfig,
}

/// Unified configuration for coursedraft.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Directory of course documents served by the fixture store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixtures_dir: Option<PathBuf>,
    pub uploads: UploadConfig,
    pub draft: DraftConfig,
    pub payload: PayloadConfig,
}

/// Get the XDG config directory for coursedraft.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "coursedraft").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("coursedraft.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".coursedraft.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand `~`, `$VAR` and `${VAR}` in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(dir) = &self.fixtures_dir {
            let raw = dir.to_string_lossy();
            let expanded = shellexpand::full(raw.as_ref())
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            self.fixtures_dir = Some(PathBuf::from(expanded));
        }
    }

    /// Local overlay with union semantics for arrays.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            fixtures_dir: overlay
                .fixtures_dir
                .clone()
                .or_else(|| self.fixtures_dir.clone()),
            uploads: self.uploads.merge(&overlay.uploads),
            draft: self.draft.overlay(&overlay.draft),
            payload: self.payload.overlay(&overlay.payload),
        }
    }

    /// Global overlay with REPLACE semantics for arrays.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            fixtures_dir: global
                .fixtures_dir
                .clone()
                .or_else(|| self.fixtures_dir.clone()),
            uploads: self.uploads.apply_global(&global.uploads),
            draft: self.draft.overlay(&global.draft),
            payload: self.payload.overlay(&global.payload),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE (global defines the real baseline)
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE (explicit user override)
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(dir) = local_dir {
            current = current.with_local_file(&local_config_path(dir))?;
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Merge a local config file if it exists.
    pub fn with_local_file(self, path: &Path) -> Result<Self, ApplicationError> {
        if !path.exists() {
            return Ok(self);
        }
        debug!("loading local config {}", path.display());
        let raw = load_raw_settings(path)?;
        Ok(self.merge_with(&raw))
    }

    /// Apply COURSEDRAFT_* environment variables as explicit overrides.
    ///
    /// Nested keys use `__`, e.g. `COURSEDRAFT_UPLOADS__MAX_FILE_SIZE`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("COURSEDRAFT")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("uploads.allowed_types")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("fixtures_dir") {
            settings.fixtures_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get::<u64>("uploads.max_file_size") {
            settings.uploads.max_file_size = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("uploads.allowed_types") {
            settings.uploads.allowed_types = val;
        }
        if let Ok(val) = config.get_string("draft.copy_marker") {
            settings.draft.copy_marker = val;
        }
        if let Ok(val) = config.get::<i32>("draft.default_passing_score") {
            settings.draft.default_passing_score = val;
        }
        if let Ok(val) = config.get_string("draft.duplicate_ids") {
            settings.draft.duplicate_ids = match val.as_str() {
                "preserve" => IdPolicy::Preserve,
                "regenerate" => IdPolicy::Regenerate,
                other => {
                    return Err(ApplicationError::Config {
                        message: format!("unknown duplicate_ids policy '{}'", other),
                    })
                }
            };
        }
        if let Ok(val) = config.get_string("payload.placeholder_thumbnail") {
            settings.payload.placeholder_thumbnail = val;
        }
        if let Ok(val) = config.get_string("payload.default_duration") {
            settings.payload.default_duration = val;
        }
        if let Ok(val) = config.get_string("payload.default_instructor") {
            settings.payload.default_instructor = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# coursedraft configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/coursedraft/coursedraft.toml  (defines your baseline)
#   Local:  ./.coursedraft.toml                     (per-directory additions)
#   Env:    COURSEDRAFT_* environment variables     (explicit overrides)
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global.
#   Use "!item" in local config to REMOVE an inherited item:
#     allowed_types = ["!application/msword"]

# Directory of course documents available for duplication
# fixtures_dir = "~/courses"

[uploads]
# Per-file size ceiling in bytes (10 MiB)
# max_file_size = 10485760

# Allowed attachment types
# allowed_types = ["application/pdf", "image/jpeg", "image/png"]

[draft]
# Suffix appended to the title of a duplicated course
# copy_marker = " (Copy)"

# Passing score of newly added module assessments
# default_passing_score = 70

# Ids of duplicated modules, lessons, questions and files: "regenerate" or "preserve"
# duplicate_ids = "regenerate"

[payload]
# placeholder_thumbnail = "/placeholder.svg"
# default_duration = "60"
# default_instructor = "Professor"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn given_defaults_when_building_file_policy_then_all_types_and_10_mib() {
        let policy = UploadConfig::default().file_policy().unwrap();
        assert_eq!(policy, FilePolicy::default());
    }

    #[test]
    fn given_unknown_mime_when_building_file_policy_then_config_error() {
        let uploads = UploadConfig {
            max_file_size: 1,
            allowed_types: strings(&["text/plain"]),
        };
        let err = uploads.file_policy().unwrap_err();
        assert!(matches!(err, ApplicationError::Config { .. }));
    }

    #[test]
    fn test_merge_array_negation() {
        let base = strings(&["a", "b"]);
        let result = UploadConfig::merge_array(&base, &strings(&["!a", "c", "b"]));
        assert_eq!(result, strings(&["b", "c"]));
    }

    #[test]
    fn test_merge_array_empty_overlay() {
        let base = strings(&["a"]);
        assert_eq!(UploadConfig::merge_array(&base, &[]), base);
    }

    #[test]
    fn test_apply_global_replaces_arrays() {
        let base = UploadConfig::default();
        let global = RawUploadConfig {
            max_file_size: None,
            allowed_types: Some(strings(&["application/pdf"])),
        };

        let result = base.apply_global(&global);

        assert_eq!(result.allowed_types, strings(&["application/pdf"]));
        assert_eq!(result.max_file_size, MAX_FILE_SIZE);
    }

    #[test]
    fn given_tilde_in_fixtures_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            fixtures_dir: Some(PathBuf::from("~/courses")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let dir = settings.fixtures_dir.unwrap();
        assert!(dir.to_string_lossy().starts_with(&home));
    }

    #[test]
    fn given_template_when_parsing_then_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.fixtures_dir.is_none());
        assert!(raw.uploads.allowed_types.is_none());
    }
}
