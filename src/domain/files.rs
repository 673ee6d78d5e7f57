//! Complementary-file admission: allowed media types and the size ceiling

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::domain::ids::NodeId;

/// Default per-file ceiling: 10 MiB.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Media types accepted as lesson attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "application/pdf")]
    Pdf,
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "application/msword")]
    Doc,
    #[serde(rename = "application/vnd.openxmlformats-officedocument.wordprocessingml.document")]
    Docx,
}

impl MediaType {
    pub const ALL: [MediaType; 5] = [
        MediaType::Pdf,
        MediaType::Jpeg,
        MediaType::Png,
        MediaType::Doc,
        MediaType::Docx,
    ];

    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Doc => "application/msword",
            MediaType::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim();
        Self::ALL.iter().copied().find(|t| t.mime() == mime)
    }

    /// Guess the media type from a filename extension (case-insensitive).
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(MediaType::Pdf),
            "jpg" | "jpeg" => Some(MediaType::Jpeg),
            "png" => Some(MediaType::Png),
            "doc" => Some(MediaType::Doc),
            "docx" => Some(MediaType::Docx),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_mime(s).ok_or_else(|| format!("unsupported media type '{}'", s))
    }
}

/// Raw content of an attachment, held by reference until upload.
///
/// Cloning a `Memory` handle bumps a reference count; the bytes are never copied.
#[derive(Debug, Clone)]
pub enum BinaryHandle {
    Memory(Bytes),
    Path(PathBuf),
    /// Metadata-only record whose content lives with the backend
    Detached,
}

impl BinaryHandle {
    pub fn path(&self) -> Option<&Path> {
        match self {
            BinaryHandle::Path(p) => Some(p),
            _ => None,
        }
    }
}

/// A file offered for attachment, before admission.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub name: String,
    /// Declared MIME type as reported by the picker
    pub media_type: String,
    pub size: u64,
    pub handle: BinaryHandle,
}

impl FileDescriptor {
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        content: Bytes,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            size: content.len() as u64,
            handle: BinaryHandle::Memory(content),
        }
    }
}

/// Why a single file was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    DisallowedType(String),
    TooLarge { size: u64, limit: u64 },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::DisallowedType(t) => {
                write!(f, "type '{}' is not allowed (PDF, JPEG, PNG, Word)", t)
            }
            RejectionReason::TooLarge { size, limit } => write!(
                f,
                "size {} exceeds the {} limit",
                format_file_size(*size),
                format_file_size(*limit)
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRejection {
    pub file_name: String,
    pub reason: RejectionReason,
}

impl fmt::Display for FileRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file_name, self.reason)
    }
}

/// Per-file outcome of an attachment batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileBatchReport {
    /// Ids of appended files, in input order
    pub accepted: Vec<NodeId>,
    pub rejected: Vec<FileRejection>,
}

impl FileBatchReport {
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Admission rules applied when files are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePolicy {
    pub max_size_bytes: u64,
    pub allowed: Vec<MediaType>,
}

impl Default for FilePolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: MAX_FILE_SIZE,
            allowed: MediaType::ALL.to_vec(),
        }
    }
}

impl FilePolicy {
    /// Check one descriptor; the type is checked before the size.
    pub fn admit(&self, descriptor: &FileDescriptor) -> Result<MediaType, RejectionReason> {
        let media_type = MediaType::from_mime(&descriptor.media_type)
            .filter(|t| self.allowed.contains(t))
            .ok_or_else(|| RejectionReason::DisallowedType(descriptor.media_type.clone()))?;
        if descriptor.size > self.max_size_bytes {
            return Err(RejectionReason::TooLarge {
                size: descriptor.size,
                limit: self.max_size_bytes,
            });
        }
        Ok(media_type)
    }
}

/// Human-readable size with base 1024 and at most two decimals: `1.5 KB`, `10 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    let mut scaled = bytes;
    while scaled >= 1024 && unit < UNITS.len() - 1 {
        scaled /= 1024;
        unit += 1;
    }
    let value = bytes as f64 / 1024f64.powi(unit as i32);
    let rendered = format!("{:.2}", value);
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", rendered, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_all_media_types_when_round_tripping_mime_then_stable() {
        for t in MediaType::ALL {
            assert_eq!(MediaType::from_mime(t.mime()), Some(t));
        }
        assert_eq!(MediaType::from_mime("text/plain"), None);
    }

    #[test]
    fn given_extensions_when_guessing_then_case_insensitive() {
        assert_eq!(MediaType::from_extension(Path::new("a.PDF")), Some(MediaType::Pdf));
        assert_eq!(MediaType::from_extension(Path::new("a.jpg")), Some(MediaType::Jpeg));
        assert_eq!(MediaType::from_extension(Path::new("a.txt")), None);
        assert_eq!(MediaType::from_extension(Path::new("noext")), None);
    }

    #[test]
    fn given_policy_when_type_and_size_both_bad_then_type_reported() {
        let policy = FilePolicy::default();
        let d = FileDescriptor {
            name: "big.exe".into(),
            media_type: "application/x-msdownload".into(),
            size: MAX_FILE_SIZE + 1,
            handle: BinaryHandle::Detached,
        };
        assert_eq!(
            policy.admit(&d),
            Err(RejectionReason::DisallowedType("application/x-msdownload".into()))
        );
    }

    #[test]
    fn given_file_exactly_at_limit_when_admitting_then_accepted() {
        let policy = FilePolicy::default();
        let d = FileDescriptor {
            name: "ok.pdf".into(),
            media_type: "application/pdf".into(),
            size: MAX_FILE_SIZE,
            handle: BinaryHandle::Detached,
        };
        assert_eq!(policy.admit(&d), Ok(MediaType::Pdf));
    }

    #[test]
    fn given_too_large_reason_when_displayed_then_human_sizes() {
        let reason = RejectionReason::TooLarge {
            size: 11 * 1024 * 1024,
            limit: MAX_FILE_SIZE,
        };
        assert_eq!(reason.to_string(), "size 11 MB exceeds the 10 MB limit");
    }
}
