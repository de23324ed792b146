use log::{debug, warn};

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::master::io_common::{infer_group, simplify_file_name};

/// A workbook found under the root directory.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Trimmed.
    pub group: String,
}

impl SourceFile {
    pub fn new(path: PathBuf) -> SourceFile {
        let group = infer_group(&path).trim().to_string();
        SourceFile { path, group }
    }
}

/// True for the names of result workbooks: `*resultado*.xlsx`, in any case.
/// Office lock files (`~$...`) are not workbooks.
pub fn is_result_file_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    !name.starts_with("~$") && lower.ends_with(".xlsx") && lower.contains("resultado")
}

fn resolve(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Finds all the result workbooks under `root`, recursively.
///
/// Files reached twice (through links) are reported once, under the path that
/// comes first in the walk. The `exclude` file, if any, is never reported. The
/// result is sorted by path, ignoring case.
pub fn find_result_files(root: &Path, exclude: Option<&Path>) -> Vec<PathBuf> {
    let excluded: Option<PathBuf> = exclude.map(resolve);
    let mut seen: HashSet<PathBuf> = HashSet::new();

    let mut files: Vec<PathBuf> = Vec::new();
    // Sorted walk: of two paths to the same file, the first by name is kept.
    for entry in walkdir::WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("find_result_files: skipping entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if !is_result_file_name(&entry.file_name().to_string_lossy()) {
            continue;
        }
        let resolved = resolve(entry.path());
        if excluded.as_ref() == Some(&resolved) {
            debug!(
                "find_result_files: skipping output file {:?}",
                entry.path().display()
            );
            continue;
        }
        if seen.insert(resolved) {
            files.push(entry.into_path());
        } else {
            debug!(
                "find_result_files: duplicate {:?}",
                simplify_file_name(entry.path())
            );
        }
    }

    files.sort_by_key(|p| p.to_string_lossy().to_lowercase());
    files
}

pub fn find_sources(root: &Path, exclude: Option<&Path>) -> Vec<SourceFile> {
    find_result_files(root, exclude)
        .into_iter()
        .map(SourceFile::new)
        .collect()
}
