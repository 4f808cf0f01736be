use std::path::PathBuf;

/// Fatal upstream failures. Anything in here aborts the import before any
/// output is written; recoverable problems are reported as warnings instead.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("source document not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("failed to read source document: {0}")]
    SourceRead(std::io::Error),
    #[error("failed to open document container: {0}")]
    Archive(zip::result::ZipError),
    #[error("document part missing from container: {0}")]
    MissingPart(String),
    #[error("failed to read document part {part}: {source}")]
    PartRead {
        part: String,
        #[source]
        source: std::io::Error,
    },
    #[error("document part {part} is not valid UTF-8: {source}")]
    PartEncoding {
        part: String,
        #[source]
        source: std::str::Utf8Error,
    },
    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("invalid pattern in parsing config ({field}): {source}")]
    InvalidPattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
}
