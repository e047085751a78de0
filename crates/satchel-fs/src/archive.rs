use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use flate2::read::GzDecoder;
use regex::Regex;
use tar::Archive;
use tracing::{debug, info, instrument};
use zip::ZipArchive;

use crate::{
    error::{FsError, Result},
    search::look_for_files,
};

/// `(n)` copy counters left behind by downloads and duplicate saves.
static COPY_COUNTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\d*\)").expect("copy counter pattern is valid"));

/// What an archive unpacked to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    File(PathBuf),
    Files(Vec<PathBuf>),
}

/// Decompress `name.ext.gz` to `name.ext` beside it, then delete the archive.
#[instrument(skip_all, fields(source = %source.as_ref().display()))]
pub fn gunzip(source: impl AsRef<Path>) -> Result<PathBuf> {
    let source = source.as_ref();
    let is_gz = source
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    if !is_gz {
        return Err(FsError::UnsupportedName {
            path: source.to_path_buf(),
        });
    }
    let dest = source.with_extension("");

    let mut decoder = GzDecoder::new(File::open(source)?);
    let mut out = File::create(&dest)?;
    io::copy(&mut decoder, &mut out)?;

    fs::remove_file(source)?;
    info!(dest = %dest.display(), "decompressed");
    Ok(dest)
}

/// Extract a `.zip` into a sibling directory named after the archive, then
/// delete the archive.
///
/// The directory name drops ` - Copy` and `(n)` markers, so `data - Copy (2).zip`
/// extracts into `data/`.
#[instrument(skip_all, fields(source = %source.as_ref().display()))]
pub fn unzip(source: impl AsRef<Path>) -> Result<Extracted> {
    let source = source.as_ref();
    let dest = extraction_dir(source, &[".zip"])?;
    debug!(dest = %dest.display(), "extracting");

    {
        let mut archive = ZipArchive::new(File::open(source)?)?;
        archive.extract(&dest)?;
    }
    fs::remove_file(source)?;
    collect(source, &dest)
}

/// Unpack a `.tar.gz`/`.tgz` the same way [`unzip`] handles a zip.
#[instrument(skip_all, fields(source = %source.as_ref().display()))]
pub fn untar(source: impl AsRef<Path>) -> Result<Extracted> {
    let source = source.as_ref();
    let dest = extraction_dir(source, &[".tar.gz", ".tgz"])?;
    debug!(dest = %dest.display(), "unpacking");

    {
        let mut archive = Archive::new(GzDecoder::new(File::open(source)?));
        archive.unpack(&dest)?;
    }
    fs::remove_file(source)?;
    collect(source, &dest)
}

fn extraction_dir(source: &Path, suffixes: &[&str]) -> Result<PathBuf> {
    let name = archive_stem(source, suffixes).ok_or_else(|| FsError::UnsupportedName {
        path: source.to_path_buf(),
    })?;
    Ok(source.with_file_name(clean_name(&name)))
}

fn collect(source: &Path, dest: &Path) -> Result<Extracted> {
    let mut files = look_for_files(dest, "");
    match files.len() {
        0 => Err(FsError::EmptyArchive {
            archive: source.to_path_buf(),
        }),
        1 => Ok(Extracted::File(files.remove(0))),
        _ => Ok(Extracted::Files(files)),
    }
}

fn archive_stem(path: &Path, suffixes: &[&str]) -> Option<String> {
    let file_name = path.file_name()?.to_string_lossy();
    let lower = file_name.to_ascii_lowercase();
    suffixes
        .iter()
        .find(|suffix| lower.ends_with(*suffix))
        .map(|suffix| file_name[..file_name.len() - suffix.len()].to_string())
}

fn clean_name(stem: &str) -> String {
    let without_copy = stem.replace(" - Copy", "");
    COPY_COUNTER
        .replace_all(&without_copy, "")
        .trim()
        .to_string()
}
