use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsError {
    /// Nothing under `root` matched the keyword.
    #[error("cannot locate file(s) containing keyword \"{keyword}\" in {}", .root.display())]
    NoMatch { keyword: String, root: PathBuf },
    /// Archive unpacked to nothing.
    #[error("archive {} contained no files", .archive.display())]
    EmptyArchive { archive: PathBuf },
    #[error("unsupported archive name: {}", .path.display())]
    UnsupportedName { path: PathBuf },
    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FsError>;
