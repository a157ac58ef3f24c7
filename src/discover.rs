//! File discovery: a deterministic walk over the requested roots.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSIONS: &[&str] = &["tsx", "jsx"];

const SKIP_DIRS: &[&str] = &["node_modules", ".next", ".git", "dist", "build", "coverage"];

fn matches_ext(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|want| want == e))
}

fn skip_dir(name: &str) -> bool {
    name.starts_with('.') || SKIP_DIRS.contains(&name)
}

/// Collect candidate files under `roots`. Explicit file arguments are
/// taken as-is; directories are walked recursively, filtered by
/// extension. Output is sorted so runs are reproducible.
pub fn discover(roots: &[PathBuf], extensions: &[String]) -> io::Result<Vec<PathBuf>> {
    let mut found: Vec<PathBuf> = Vec::new();
    for root in roots {
        if root.is_file() {
            found.push(root.clone());
            continue;
        }
        let mut pending: Vec<PathBuf> = vec![root.clone()];
        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                let path = entry.path();
                let file_type = entry.file_type()?;
                if file_type.is_dir() {
                    let name = entry.file_name();
                    if skip_dir(&name.to_string_lossy()) {
                        continue;
                    }
                    pending.push(path);
                } else if file_type.is_file() && matches_ext(&path, extensions) {
                    found.push(path);
                }
            }
        }
    }
    found.sort();
    found.dedup();
    Ok(found)
}
