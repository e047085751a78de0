//! File-system helpers: keyword search over directory trees and archive extraction (gzip, zip, tar.gz).

pub mod archive;
pub mod error;
pub mod search;

pub use archive::{gunzip, untar, unzip, Extracted};
pub use error::FsError;
pub use search::{file_age, find_most_recent, look_for_dirs, look_for_files};
