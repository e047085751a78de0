use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{FsError, Result};

/// Files under `root` (recursively) whose name contains `keyword`.
///
/// Directory contents are listed before the directory itself. Unreadable entries
/// are skipped; a missing `root` yields nothing.
pub fn look_for_files(root: impl AsRef<Path>, keyword: &str) -> Vec<PathBuf> {
    walk(root.as_ref(), keyword, |entry| entry.file_type().is_file())
}

/// Directories under `root` (not `root` itself) whose name contains `keyword`.
pub fn look_for_dirs(root: impl AsRef<Path>, keyword: &str) -> Vec<PathBuf> {
    walk(root.as_ref(), keyword, |entry| entry.file_type().is_dir())
}

fn walk(root: &Path, keyword: &str, keep: impl Fn(&walkdir::DirEntry) -> bool) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(root = %root.display(), "skipping unreadable entry: {err}");
                continue;
            }
        };
        if keep(&entry) && entry.file_name().to_string_lossy().contains(keyword) {
            found.push(entry.into_path());
        }
    }
    found
}

/// The matching file under `root` with the newest creation time.
pub fn find_most_recent(root: impl AsRef<Path>, keyword: &str) -> Result<PathBuf> {
    let root = root.as_ref();
    look_for_files(root, keyword)
        .into_iter()
        .filter_map(|path| created_at(&path).ok().map(|at| (at, path)))
        .max_by_key(|(at, _)| *at)
        .map(|(_, path)| path)
        .ok_or_else(|| FsError::NoMatch {
            keyword: keyword.to_string(),
            root: root.to_path_buf(),
        })
}

/// Time from the file's creation to the start of today (local time).
pub fn file_age(path: impl AsRef<Path>) -> Result<Duration> {
    let created = created_at(path.as_ref())?;
    Ok(age_on(created, Local::now().date_naive()))
}

fn age_on(created: SystemTime, today: NaiveDate) -> Duration {
    let created = DateTime::<Local>::from(created).naive_local();
    today.and_time(NaiveTime::MIN) - created
}

/// Creation time where the platform records one, modification time otherwise.
fn created_at(path: &Path) -> Result<SystemTime> {
    let meta = fs::metadata(path)?;
    Ok(meta.created().or_else(|_| meta.modified())?)
}

#[cfg(test)]
mod tests {
    use std::{fs, thread, time::Duration as StdDuration};

    use super::*;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("reports").join("2024");
        fs::create_dir_all(&nested).expect("mkdir");
        fs::write(dir.path().join("report-jan.csv"), "a").expect("write");
        fs::write(nested.join("report-feb.csv"), "b").expect("write");
        fs::write(nested.join("notes.txt"), "c").expect("write");
        dir
    }

    #[test]
    fn finds_files_by_keyword_recursively() {
        let dir = tree();
        let mut found = look_for_files(dir.path(), "report");
        found.sort();

        assert_eq!(
            found,
            vec![
                dir.path().join("report-jan.csv"),
                dir.path().join("reports").join("2024").join("report-feb.csv"),
            ]
        );
    }

    #[test]
    fn empty_keyword_matches_everything() {
        let dir = tree();
        assert_eq!(look_for_files(dir.path(), "").len(), 3);
    }

    #[test]
    fn finds_dirs_contents_first() {
        let dir = tree();
        let found = look_for_dirs(dir.path(), "");
        assert_eq!(
            found,
            vec![
                dir.path().join("reports").join("2024"),
                dir.path().join("reports"),
            ]
        );
    }

    #[test]
    fn missing_root_finds_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(look_for_files(dir.path().join("absent"), "").is_empty());
    }

    #[test]
    fn most_recent_picks_newest_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("log-1.txt"), "old").expect("write");
        thread::sleep(StdDuration::from_millis(50));
        fs::write(dir.path().join("log-2.txt"), "new").expect("write");

        let newest = find_most_recent(dir.path(), "log").expect("newest");
        assert_eq!(newest, dir.path().join("log-2.txt"));
    }

    #[test]
    fn most_recent_without_match_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = find_most_recent(dir.path(), "zzz").expect_err("no match");
        assert!(matches!(err, FsError::NoMatch { .. }));
    }

    #[test]
    fn age_counts_from_creation_to_midnight() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).expect("date");
        let created = today
            .pred_opt()
            .expect("yesterday")
            .and_hms_opt(18, 0, 0)
            .expect("time")
            .and_local_timezone(Local)
            .single()
            .expect("unambiguous local time");

        assert_eq!(age_on(created.into(), today), Duration::hours(6));
    }
}
