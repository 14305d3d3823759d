//! Error types for the I/O collaborators. The in-memory sorting model never
//! fails; it reports missing things with `Option` and `bool`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Cannot open archive {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Not a readable zip archive: {0}")]
    Read(#[from] zip::result::ZipError),
    #[error("Cannot extract {name}: {source}")]
    Extract {
        name: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One failed export step. The display text is what ends up in the report.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Source file missing: {0}")]
    SourceMissing(PathBuf),
    #[error("Cannot copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot write rotated copy of {from}: {source}")]
    Rotate {
        from: PathBuf,
        source: image::ImageError,
    },
    #[error("Cannot delete {path}: {source}")]
    Delete {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Target directory {path} is unusable: {source}")]
    TargetDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;
pub type ExportResult<T> = std::result::Result<T, ExportError>;
