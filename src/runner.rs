//! Per-file runner: drives the full pipeline over many files with a
//! plain worker pool. Fragments never share state, so workers only meet
//! at the index counter and the report sink.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use log::{debug, warn};
use memmap2::{Mmap, MmapOptions};

use crate::cosmetic::cosmetic_pass;
use crate::pipeline::repair_fragment;
use crate::types::{CosmeticCounts, FileReport, RunOptions, RunSummary};

enum InputData {
    Owned(Vec<u8>),
    Mapped { _file: File, mmap: Mmap },
}

impl InputData {
    fn as_bytes(&self) -> &[u8] {
        match self {
            InputData::Owned(v) => v.as_slice(),
            InputData::Mapped { mmap, .. } => mmap.as_ref(),
        }
    }
}

fn read_file(path: &Path) -> io::Result<InputData> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(InputData::Owned(Vec::new()));
    }
    let mmap = unsafe { MmapOptions::new().map(&file)? };
    Ok(InputData::Mapped { _file: file, mmap })
}

/// Replace `path` atomically: write a sibling temp file, then rename it
/// over the original.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    let tmp = path.with_file_name(format!("{file_name}.jsxmend.{}", process::id()));
    fs::write(&tmp, data)?;
    match fs::rename(&tmp, path) {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

fn repair_file(path: &Path, opt: &RunOptions) -> io::Result<FileReport> {
    let input = read_file(path)?;
    let original = String::from_utf8_lossy(input.as_bytes()).into_owned();
    drop(input);

    let (text, cosmetic_fixes) = if opt.cosmetic {
        cosmetic_pass(&original)
    } else {
        (original.clone(), CosmeticCounts::default())
    };
    let outcome = repair_fragment(&text, &opt.repair);

    let changed = outcome.repaired_text != original;
    if changed && opt.write {
        write_atomic(path, outcome.repaired_text.as_bytes())?;
    }
    debug!(
        "{}: {} ({} edits, {} cosmetic fixes)",
        path.display(),
        outcome.status,
        outcome.edits_applied,
        cosmetic_fixes.total()
    );
    Ok(FileReport {
        path: path.to_path_buf(),
        status: outcome.status,
        edits_applied: outcome.edits_applied,
        cosmetic_fixes: cosmetic_fixes.total(),
        issues_remaining: outcome.issues_remaining,
        converged: outcome.converged,
        changed,
        error: None,
    })
}

fn process_file(path: &Path, opt: &RunOptions) -> FileReport {
    match repair_file(path, opt) {
        Ok(report) => report,
        Err(e) => {
            warn!("{}: {e}", path.display());
            FileReport::io_error(path, e.to_string())
        }
    }
}

fn summarize(reports: Vec<FileReport>) -> RunSummary {
    let mut summary = RunSummary {
        files_scanned: reports.len(),
        ..RunSummary::default()
    };
    for r in &reports {
        if r.changed {
            summary.files_changed += 1;
        }
        summary.edits_applied += r.edits_applied;
        summary.cosmetic_fixes += r.cosmetic_fixes;
        if r.error.is_some() {
            summary.files_errored += 1;
        } else if !r.converged {
            summary.files_not_converged += 1;
        }
    }
    summary.reports = reports;
    summary
}

/// Process every file with `opt.jobs` workers pulling from a shared
/// index. Reports come back sorted by path regardless of completion
/// order.
pub fn run(paths: &[PathBuf], opt: &RunOptions) -> RunSummary {
    if paths.is_empty() {
        return RunSummary::default();
    }
    let next_idx = AtomicUsize::new(0usize);
    let reports: Mutex<Vec<FileReport>> = Mutex::new(Vec::with_capacity(paths.len()));
    let workers = opt.jobs.max(1).min(paths.len());

    std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            handles.push(scope.spawn(|| -> Result<(), String> {
                loop {
                    let idx = next_idx.fetch_add(1, Ordering::Relaxed);
                    if idx >= paths.len() {
                        return Ok(());
                    }
                    let report = process_file(&paths[idx], opt);
                    let mut sink = reports.lock().map_err(|_| "mutex poisoned".to_string())?;
                    sink.push(report);
                }
            }));
        }
        for handle in handles {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("worker stopped: {e}"),
                Err(_) => warn!("worker panicked"),
            }
        }
    });

    let mut reports = match reports.into_inner() {
        Ok(v) => v,
        Err(poisoned) => poisoned.into_inner(),
    };
    reports.sort_by(|a, b| a.path.cmp(&b.path));
    summarize(reports)
}
