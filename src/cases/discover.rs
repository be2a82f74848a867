//! Discovery of case files on disk.

use super::CaseError;
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Case files grouped by the directory that contains them.
pub type CaseFiles = BTreeMap<PathBuf, Vec<PathBuf>>;

/// Finds case files under `root`, grouped by parent directory.
///
/// `root` may be a directory, searched recursively, or a single file. Only
/// files whose extension matches one of `extensions` (compared
/// case-insensitively, with the leading dot) are returned; an empty list
/// accepts every file. Files within a directory are sorted by path.
///
/// Symlinks are followed. A link back into a directory already being walked
/// is reported once and not descended into, so each file appears once.
///
/// # Returns
///
/// `Err(CaseError::MissingRoot)` if `root` does not exist. Entries that
/// cannot be read are logged and skipped.
pub fn discover_case_files(root: &Path, extensions: &[String]) -> Result<CaseFiles, CaseError> {
    if !root.exists() {
        return Err(CaseError::MissingRoot(root.to_path_buf()));
    }

    let extensions: Vec<String> = extensions.iter().map(|e| e.to_ascii_lowercase()).collect();
    let mut files = CaseFiles::new();

    let mut builder = WalkBuilder::new(root);
    builder.standard_filters(false).hidden(true).follow_links(true);

    for entry in builder.build() {
        match entry {
            Ok(entry) if entry.path().is_file() => add_file(entry.path(), &extensions, &mut files),
            Ok(_) => {}
            Err(e) => warn!(root = %root.display(), error = %e, "skipping case path"),
        }
    }

    for group in files.values_mut() {
        group.sort();
        group.dedup();
    }

    Ok(files)
}

fn add_file(path: &Path, extensions: &[String], files: &mut CaseFiles) {
    if !extensions.is_empty() && !extensions.contains(&dotted_extension(path)) {
        return;
    }

    let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
    files.entry(parent).or_default().push(path.to_path_buf());
}

fn dotted_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}
