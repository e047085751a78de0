use std::path::{Path, PathBuf};

use color_eyre::{eyre::WrapErr, Result};
use satchel_fs::Extracted;

/// Matches for `satchel find`: every match, or just the newest file with `latest`.
pub fn find(dir: &Path, keyword: &str, dirs: bool, latest: bool) -> Result<Vec<PathBuf>> {
    if latest {
        let newest = satchel_fs::find_most_recent(dir, keyword)?;
        return Ok(vec![newest]);
    }
    let found = if dirs {
        satchel_fs::look_for_dirs(dir, keyword)
    } else {
        satchel_fs::look_for_files(dir, keyword)
    };
    Ok(found)
}

/// Human-readable age, e.g. `3d 4h 12m`.
pub fn age(path: &Path) -> Result<String> {
    let age = satchel_fs::file_age(path)
        .wrap_err_with(|| format!("cannot read age of {}", path.display()))?;
    Ok(format_age(age))
}

fn format_age(age: chrono::Duration) -> String {
    let sign = if age < chrono::Duration::zero() { "-" } else { "" };
    let age = age.abs();
    format!(
        "{sign}{}d {}h {}m",
        age.num_days(),
        age.num_hours() % 24,
        age.num_minutes() % 60
    )
}

pub fn unzip(source: &Path) -> Result<Vec<PathBuf>> {
    let extracted = satchel_fs::unzip(source)
        .wrap_err_with(|| format!("cannot extract {}", source.display()))?;
    Ok(listing(extracted))
}

pub fn untar(source: &Path) -> Result<Vec<PathBuf>> {
    let extracted = satchel_fs::untar(source)
        .wrap_err_with(|| format!("cannot unpack {}", source.display()))?;
    Ok(listing(extracted))
}

fn listing(extracted: Extracted) -> Vec<PathBuf> {
    match extracted {
        Extracted::File(file) => vec![file],
        Extracted::Files(files) => files,
    }
}
