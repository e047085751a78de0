use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

/// A file stem already carrying a `(n)` suffix, e.g. `report(3)`.
static NUMBERED_STEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<base>.*)\((?P<n>[0-9]*)\)$").expect("numbered stem pattern is valid")
});

/// Next free numbered variant of `path`: `report.txt` → `report(1).txt`,
/// `report(1).txt` → `report(2).txt`, skipping any candidate that already exists
/// (file, directory or dangling symlink).
///
/// `path` itself is never returned, whether or not it exists.
pub fn resolve_path_collision(path: impl AsRef<Path>) -> PathBuf {
    let mut candidate = bump(path.as_ref());
    while occupied(&candidate) {
        candidate = bump(&candidate);
    }
    candidate
}

pub(crate) fn occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

fn bump(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (base, n) = match NUMBERED_STEM.captures(&stem) {
        Some(caps) => (caps["base"].to_string(), increment(&caps["n"])),
        None => (stem, "1".to_string()),
    };

    let mut name = format!("{base}({n})");
    if let Some(ext) = path.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    path.with_file_name(name)
}

/// Add one to a decimal digit string of any length; `""` counts as zero.
fn increment(digits: &str) -> String {
    let mut out = digits.as_bytes().to_vec();
    for byte in out.iter_mut().rev() {
        if *byte == b'9' {
            *byte = b'0';
        } else {
            *byte += 1;
            return String::from_utf8_lossy(&out).into_owned();
        }
    }
    // all nines (or empty): carry into a new leading digit
    out.insert(0, b'1');
    String::from_utf8_lossy(&out).into_owned()
}
