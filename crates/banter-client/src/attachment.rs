//! Attachment policy and staging.
//!
//! Files picked in the composer are checked here before they can be
//! sent. Validation is synchronous and side-effect free, so a rejected
//! batch costs nothing but the error message.

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::message::{AttachmentMeta, OutgoingAttachment};

/// Limits applied to files staged for a single message
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentPolicy {
    /// Maximum number of attachments per message
    /// Default: 10
    pub max_files: usize,

    /// Maximum size of a single file, in bytes
    /// Default: 25 MiB
    pub max_file_size: u64,

    /// Accepted MIME patterns; a `type/*` entry matches the whole family
    pub allowed_mime_patterns: Vec<String>,

    /// Accepted file extensions (lowercase, no dot), used as a fallback
    /// when the MIME guess is too generic to match a pattern
    pub allowed_extensions: Vec<String>,
}

impl Default for AttachmentPolicy {
    fn default() -> Self {
        Self {
            max_files: 10,
            max_file_size: 25 * 1024 * 1024,
            allowed_mime_patterns: vec![
                "image/*".to_string(),
                "video/*".to_string(),
                "audio/*".to_string(),
                "text/*".to_string(),
                "application/pdf".to_string(),
                "application/zip".to_string(),
            ],
            allowed_extensions: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "gif".to_string(),
                "webp".to_string(),
                "mp4".to_string(),
                "webm".to_string(),
                "mov".to_string(),
                "mp3".to_string(),
                "wav".to_string(),
                "ogg".to_string(),
                "txt".to_string(),
                "md".to_string(),
                "csv".to_string(),
                "pdf".to_string(),
                "zip".to_string(),
            ],
        }
    }
}

/// Why a batch of staged files was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachmentError {
    /// Batch would exceed the per-message file count
    #[error("too many attachments: {count} (max {max})")]
    TooMany { count: usize, max: usize },

    /// A single file over the size cap
    #[error("{name} is too large: {size} bytes (max {max})")]
    TooLarge { name: String, size: u64, max: u64 },

    /// Neither the MIME type nor the extension is on the allowlist
    #[error("{name} has an unsupported type ({mime})")]
    UnsupportedType { name: String, mime: String },
}

impl AttachmentPolicy {
    /// Check a MIME type against the allowed patterns
    pub fn allows_mime(&self, mime: &str) -> bool {
        self.allowed_mime_patterns.iter().any(|pattern| {
            match pattern.strip_suffix("/*") {
                Some(family) => mime
                    .split_once('/')
                    .is_some_and(|(m_family, _)| m_family == family),
                None => pattern == mime,
            }
        })
    }

    /// Check a file extension (case-insensitive) against the allowlist
    pub fn allows_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.allowed_extensions.iter().any(|e| *e == ext)
    }

    /// Validate candidate files against the policy.
    ///
    /// `staged` counts files already on the composer, so the count limit
    /// covers the whole message, not just this batch. The first
    /// violation is returned and the batch is rejected as a unit.
    pub fn validate(
        &self,
        staged: usize,
        candidates: &[AttachmentMeta],
    ) -> Result<(), AttachmentError> {
        let count = staged + candidates.len();
        if count > self.max_files {
            return Err(AttachmentError::TooMany {
                count,
                max: self.max_files,
            });
        }

        for meta in candidates {
            if meta.size > self.max_file_size {
                return Err(AttachmentError::TooLarge {
                    name: meta.name.clone(),
                    size: meta.size,
                    max: self.max_file_size,
                });
            }

            let ext = meta.name.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
            if !self.allows_mime(&meta.mime_type) && !self.allows_extension(ext) {
                return Err(AttachmentError::UnsupportedType {
                    name: meta.name.clone(),
                    mime: meta.mime_type.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Guess a MIME type from a file extension
pub fn guess_mime_type(ext: &str) -> String {
    match ext.to_lowercase().as_str() {
        // Text
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        // Documents and archives
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Stage a file from disk: read its metadata and guess a MIME type.
///
/// Does not read the file contents; the store does that at send time.
pub fn stage_file(path: &Path) -> io::Result<OutgoingAttachment> {
    let metadata = std::fs::metadata(path)?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string();
    let mime_type = path
        .extension()
        .and_then(|e| e.to_str())
        .map(guess_mime_type)
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok(OutgoingAttachment {
        meta: AttachmentMeta {
            name,
            size: metadata.len(),
            mime_type,
        },
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str, size: u64, mime: &str) -> AttachmentMeta {
        AttachmentMeta {
            name: name.to_string(),
            size,
            mime_type: mime.to_string(),
        }
    }

    #[test]
    fn test_valid_batch_passes() {
        let policy = AttachmentPolicy::default();
        let batch = vec![
            meta("photo.png", 1024, "image/png"),
            meta("notes.txt", 200, "text/plain"),
            meta("paper.pdf", 500_000, "application/pdf"),
        ];

        assert_eq!(policy.validate(0, &batch), Ok(()));
    }

    #[test]
    fn test_too_many_counts_already_staged() {
        let policy = AttachmentPolicy {
            max_files: 3,
            ..Default::default()
        };
        let batch = vec![
            meta("a.png", 1, "image/png"),
            meta("b.png", 1, "image/png"),
        ];

        // 2 staged + 2 new = 4 > 3
        assert_eq!(
            policy.validate(2, &batch),
            Err(AttachmentError::TooMany { count: 4, max: 3 })
        );
        // 1 staged + 2 new = 3, exactly at the cap
        assert_eq!(policy.validate(1, &batch), Ok(()));
    }

    #[test]
    fn test_oversized_file_rejected() {
        let policy = AttachmentPolicy {
            max_file_size: 1000,
            ..Default::default()
        };
        let batch = vec![meta("big.png", 1001, "image/png")];

        assert_eq!(
            policy.validate(0, &batch),
            Err(AttachmentError::TooLarge {
                name: "big.png".to_string(),
                size: 1001,
                max: 1000,
            })
        );
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let policy = AttachmentPolicy::default();
        let batch = vec![meta("tool.exe", 10, "application/x-msdownload")];

        assert_eq!(
            policy.validate(0, &batch),
            Err(AttachmentError::UnsupportedType {
                name: "tool.exe".to_string(),
                mime: "application/x-msdownload".to_string(),
            })
        );
    }

    #[test]
    fn test_wildcard_matches_family() {
        let policy = AttachmentPolicy::default();

        assert!(policy.allows_mime("image/png"));
        assert!(policy.allows_mime("image/x-obscure"));
        assert!(policy.allows_mime("application/pdf"));
        assert!(!policy.allows_mime("application/x-msdownload"));
        assert!(!policy.allows_mime("imagepng"));
    }

    #[test]
    fn test_extension_fallback_for_generic_mime() {
        let policy = AttachmentPolicy::default();
        // MIME guess came back generic, but the extension is allowed
        let batch = vec![meta("clip.MOV", 10, "application/octet-stream")];

        assert_eq!(policy.validate(0, &batch), Ok(()));
    }

    #[test]
    fn test_no_extension_falls_back_to_mime() {
        let policy = AttachmentPolicy::default();

        assert_eq!(
            policy.validate(0, &[meta("README", 10, "text/plain")]),
            Ok(())
        );
        assert_eq!(
            policy.validate(0, &[meta("blob", 10, "application/octet-stream")]),
            Err(AttachmentError::UnsupportedType {
                name: "blob".to_string(),
                mime: "application/octet-stream".to_string(),
            })
        );
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("png"), "image/png");
        assert_eq!(guess_mime_type("JPG"), "image/jpeg");
        assert_eq!(guess_mime_type("md"), "text/markdown");
        assert_eq!(guess_mime_type("weird"), "application/octet-stream");
    }

    #[test]
    fn test_stage_file_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, b"hello there").unwrap();

        let staged = stage_file(&path).unwrap();
        assert_eq!(staged.meta.name, "hello.txt");
        assert_eq!(staged.meta.size, 11);
        assert_eq!(staged.meta.mime_type, "text/plain");
        assert_eq!(staged.path, path);
    }

    #[test]
    fn test_stage_file_missing() {
        let err = stage_file(Path::new("/nonexistent/nope.txt"));
        assert!(err.is_err());
    }
}
