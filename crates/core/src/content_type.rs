//! Extension-based content-type classification.
//!
//! Only the extension of the final path segment is consulted; file contents are never sniffed.
//! Matching is case-sensitive, so `report.PDF` is served as `text/plain`.

use crate::constants::DEFAULT_CONTENT_TYPE;

/// How a result file is presented to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Pdf,
    Html,
    Jpeg,
    Png,
    Svg,
    /// Anything else: csv, tsv, txt, md, notebooks, unknown extensions.
    PlainText,
}

impl ContentKind {
    /// Classifies a file by the extension of `file_name`.
    ///
    /// The extension is the text after the last `.`, ignoring a leading dot, so `.bashrc` and
    /// `Makefile` both have no extension.
    pub fn from_file_name(file_name: &str) -> Self {
        match extension(file_name) {
            Some("pdf") => ContentKind::Pdf,
            Some("html") => ContentKind::Html,
            Some("jpeg") => ContentKind::Jpeg,
            Some("png") => ContentKind::Png,
            Some("svg") => ContentKind::Svg,
            _ => ContentKind::PlainText,
        }
    }

    /// MIME type sent with the file.
    pub fn content_type(&self) -> &'static str {
        match self {
            ContentKind::Pdf => "application/pdf",
            ContentKind::Html => "text/html",
            ContentKind::Jpeg => "image/jpeg",
            ContentKind::Png => "image/png",
            ContentKind::Svg => "image/svg+xml",
            ContentKind::PlainText => DEFAULT_CONTENT_TYPE,
        }
    }

    /// Binary kinds are delivered as raw bytes; the rest are decoded as UTF-8 text.
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            ContentKind::Pdf | ContentKind::Jpeg | ContentKind::Png | ContentKind::Svg
        )
    }
}

fn extension(file_name: &str) -> Option<&str> {
    let stem_start = file_name.len() - file_name.trim_start_matches('.').len();
    let name = &file_name[stem_start..];
    name.rfind('.').map(|idx| &name[idx + 1..])
}
