use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;

use jsxmend::cosmetic::cosmetic_pass;
use jsxmend::discover::{discover, DEFAULT_EXTENSIONS};
use jsxmend::pipeline::repair_fragment;
use jsxmend::runner;
use jsxmend::types::{Issue, RepairOptions, RunOptions, RunSummary};

/// Structural repair for broken JSX fragments.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Files or directories to process (default: current directory)
    paths: Vec<PathBuf>,

    /// Report issues without writing any file
    #[arg(long)]
    check: bool,

    /// Read one fragment from stdin, write the repaired text to stdout
    #[arg(long)]
    stdin: bool,

    /// Emit a JSON report instead of the human summary
    #[arg(long)]
    json: bool,

    /// Worker threads (default: available parallelism)
    #[arg(long)]
    jobs: Option<usize>,

    /// Repair passes per fragment before giving up
    #[arg(long, default_value_t = 3)]
    max_passes: usize,

    /// File extensions scanned inside directories
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()))]
    ext: Vec<String>,

    /// Replace the default void-tag set
    #[arg(long, value_delimiter = ',')]
    void: Option<Vec<String>>,

    /// Skip the cosmetic fixer pass
    #[arg(long)]
    no_cosmetic: bool,
}

fn describe_issue(issue: &Issue) -> String {
    fn tag(name: &Option<String>) -> String {
        match name {
            Some(n) => n.clone(),
            None => String::new(),
        }
    }
    match issue {
        Issue::UnterminatedTag { position } => {
            format!("unterminated tag opening at byte {position}")
        }
        Issue::UnexpectedClose { name, position } => {
            format!("unexpected </{}> at byte {position}", tag(name))
        }
        Issue::MismatchedClose {
            found,
            expected,
            expected_opened_at,
            position,
            ..
        } => format!(
            "mismatched </{}> at byte {position}, expected </{}> for tag opened at byte {expected_opened_at}",
            tag(found),
            tag(expected)
        ),
        Issue::UnclosedAtEnd { name, opened_at } => {
            format!("unclosed <{}> opened at byte {opened_at}", tag(name))
        }
    }
}

fn repair_options(cli: &Cli) -> RepairOptions {
    let mut opt = RepairOptions {
        max_passes: cli.max_passes,
        ..RepairOptions::default()
    };
    if let Some(names) = &cli.void {
        opt.void_tags = names.iter().cloned().collect();
    }
    opt
}

fn run_stdin(cli: &Cli) -> i32 {
    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("failed to read stdin: {e}");
        return 2;
    }
    let text = if cli.no_cosmetic {
        buf
    } else {
        cosmetic_pass(&buf).0
    };
    let outcome = repair_fragment(&text, &repair_options(cli));
    print!("{}", outcome.repaired_text);
    for issue in &outcome.issues_remaining {
        eprintln!("{}", describe_issue(issue));
    }
    if outcome.converged {
        0
    } else {
        1
    }
}

fn print_human(summary: &RunSummary, check: bool) {
    let total = summary.files_scanned;
    for (i, r) in summary.reports.iter().enumerate() {
        let n = i + 1;
        let path = r.path.display();
        if let Some(err) = &r.error {
            println!("✗ {path}: {err}");
        } else if !r.converged {
            println!(
                "✗ {path}: not converged ({} issues remaining) ({n}/{total})",
                r.issues_remaining.len()
            );
        } else if r.changed {
            let verb = if check { "needs fixes" } else { "fixed" };
            println!(
                "✓ {path}: {verb} ({} edits, {} cosmetic fixes) ({n}/{total})",
                r.edits_applied, r.cosmetic_fixes
            );
        } else {
            println!("✓ {path}: no changes needed ({n}/{total})");
        }
    }

    println!();
    println!("Completed processing {total} files");
    let flagged: Vec<_> = summary
        .reports
        .iter()
        .filter(|r| r.error.is_some() || !r.converged)
        .collect();
    if !flagged.is_empty() {
        println!("{} files need manual review:", flagged.len());
        for r in flagged {
            let why = r
                .error
                .clone()
                .unwrap_or_else(|| format!("{} issues remaining", r.issues_remaining.len()));
            println!("  - {}: {why}", r.path.display());
        }
    }
}

pub fn run() -> i32 {
    env_logger::init();
    let cli = Cli::parse();

    if cli.stdin {
        return run_stdin(&cli);
    }

    let roots = if cli.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cli.paths.clone()
    };
    let files = match discover(&roots, &cli.ext) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("discovery failed: {e}");
            return 2;
        }
    };
    if files.is_empty() {
        eprintln!("no matching files");
        return 0;
    }

    let jobs = cli
        .jobs
        .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1));
    let opt = RunOptions {
        repair: repair_options(&cli),
        cosmetic: !cli.no_cosmetic,
        write: !cli.check,
        jobs,
    };
    let summary = runner::run(&files, &opt);

    if cli.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("failed to serialize report: {e}");
                return 2;
            }
        }
    } else {
        print_human(&summary, cli.check);
    }

    if summary.files_errored > 0 {
        2
    } else if summary.files_not_converged > 0 {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use jsxmend::runner::write_atomic;

    fn tmp_file_path(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        let uniq = std::process::id();
        p.push(format!("jsxmend_{uniq}_{name}"));
        p
    }

    #[test]
    fn atomic_write_replaces_contents() {
        let path = tmp_file_path("atomic_test.tsx");
        std::fs::write(&path, b"<div>old</div>").expect("write temp file");

        write_atomic(&path, b"<div>new</div>").expect("atomic write");
        let back = std::fs::read(&path).expect("read back");
        assert_eq!(back, b"<div>new</div>");

        let dir = path.parent().expect("temp dir").to_path_buf();
        let stem = path
            .file_name()
            .expect("file name")
            .to_string_lossy()
            .into_owned();
        let leftover = std::fs::read_dir(dir)
            .expect("list temp dir")
            .filter_map(|e| e.ok())
            .any(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                name.starts_with(&stem) && name.contains(".jsxmend.")
            });
        assert!(!leftover, "temp file should be renamed away");

        let _ = std::fs::remove_file(&path);
    }
}
