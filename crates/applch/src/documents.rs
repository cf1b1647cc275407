//! Applicant folder scanning and document classification.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

const PDF_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];
const TEXT_EXTENSIONS: &[&str] = &["txt", "md"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// PDF and word-processor documents, sent as file attachments.
    Pdf,
    Image,
    /// Plain text, inlined into the prompt body.
    Text,
}

impl DocumentKind {
    /// Classify by file extension, case-insensitively.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        let extension = extension.as_str();

        if PDF_EXTENSIONS.contains(&extension) {
            Some(Self::Pdf)
        } else if IMAGE_EXTENSIONS.contains(&extension) {
            Some(Self::Image)
        } else if TEXT_EXTENSIONS.contains(&extension) {
            Some(Self::Text)
        } else {
            None
        }
    }
}

/// A recognised file from an applicant folder, read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub kind: DocumentKind,
    pub name: String,
    pub path: PathBuf,
    pub data: Vec<u8>,
}

impl SourceDocument {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

/// Read every recognised document in `folder`, ordered by file name.
///
/// A folder that cannot be listed yields no documents; entries that cannot be
/// read are skipped. Both cases are logged.
pub fn scan_folder(folder: &Path) -> Vec<SourceDocument> {
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(folder = %folder.display(), error = %err, "unable to read applicant folder");
            return Vec::new();
        }
    };

    let mut candidates: Vec<(String, PathBuf, DocumentKind)> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            let kind = DocumentKind::from_file_name(&name)?;
            Some((name, entry.path(), kind))
        })
        .collect();
    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    candidates
        .into_iter()
        .filter_map(|(name, path, kind)| match fs::read(&path) {
            Ok(data) => Some(SourceDocument {
                kind,
                name,
                path,
                data,
            }),
            Err(err) => {
                warn!(file = %path.display(), error = %err, "unable to read document");
                None
            }
        })
        .collect()
}

/// Mime type used when attaching a document. Anything that is not PDF, PNG or
/// WEBP is sent as JPEG.
pub fn mime_type(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn classifies_known_extensions() {
        assert_eq!(DocumentKind::from_file_name("cv.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_file_name("cv.docx"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_file_name("photo.JPeG"), Some(DocumentKind::Image));
        assert_eq!(DocumentKind::from_file_name("notes.md"), Some(DocumentKind::Text));
        assert_eq!(DocumentKind::from_file_name("archive.zip"), None);
        assert_eq!(DocumentKind::from_file_name("README"), None);
    }

    #[test]
    fn mime_type_defaults_to_jpeg() {
        assert_eq!(mime_type("a.pdf"), "application/pdf");
        assert_eq!(mime_type("a.PNG"), "image/png");
        assert_eq!(mime_type("a.webp"), "image/webp");
        assert_eq!(mime_type("a.jpg"), "image/jpeg");
        assert_eq!(mime_type("a.gif"), "image/jpeg");
    }

    #[test]
    fn scan_reads_recognised_files_in_name_order() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("b-resume.pdf"), b"%PDF").expect("pdf");
        fs::write(dir.path().join("a-notes.txt"), b"hello").expect("txt");
        fs::write(dir.path().join("ignored.zip"), b"zip").expect("zip");
        fs::create_dir(dir.path().join("nested.md")).expect("dir");

        let docs = scan_folder(dir.path());

        let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a-notes.txt", "b-resume.pdf"]);
        assert_eq!(docs[0].kind, DocumentKind::Text);
        assert_eq!(docs[0].text(), "hello");
        assert_eq!(docs[1].data, b"%PDF");
    }

    #[test]
    fn missing_folder_yields_nothing() {
        let dir = TempDir::new().expect("tempdir");
        assert!(scan_folder(&dir.path().join("absent")).is_empty());
    }
}
