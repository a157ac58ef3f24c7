//! Repair orchestrator: tokenize → verify → synthesize → apply, repeated
//! to a fixed point under a bounded pass count.

use log::debug;

use crate::synth::{apply_edits, synthesize};
use crate::tokenizer::scan;
use crate::types::{FixCounts, Issue, RepairOptions, RepairOutcome};
use crate::verifier::verify;

/// One tokenize+verify pass, no repair.
pub fn scan_fragment(text: &str, opt: &RepairOptions) -> Vec<Issue> {
    verify(&scan(text, opt), opt)
}

/// Repair a fragment until no repairable issue remains, the repairable
/// issue count stops shrinking, or the pass bound is hit. Unrepairable
/// issues (unexpected closes, unterminated openings) never block
/// convergence; they are carried in `issues_remaining`.
pub fn repair_fragment(text: &str, opt: &RepairOptions) -> RepairOutcome {
    let mut current = text.to_string();
    let mut edits_applied = 0usize;
    let mut fixed = FixCounts::default();
    let mut prev_repairable: Option<usize> = None;
    let mut passes = 0usize;

    loop {
        let issues = scan_fragment(&current, opt);
        let repairable = issues.iter().filter(|i| i.is_repairable()).count();

        if repairable == 0 {
            let status = if edits_applied > 0 {
                "repaired"
            } else if issues.is_empty() {
                "clean"
            } else {
                "partial"
            };
            return RepairOutcome {
                status: status.to_string(),
                repaired_text: current,
                issues_remaining: issues,
                edits_applied,
                converged: true,
                passes,
                fixed,
            };
        }

        if passes >= opt.max_passes || prev_repairable.is_some_and(|p| repairable >= p) {
            debug!("stopping after {passes} passes with {repairable} repairable issues left");
            return RepairOutcome {
                status: "exhausted".to_string(),
                repaired_text: current,
                issues_remaining: issues,
                edits_applied,
                converged: false,
                passes,
                fixed,
            };
        }

        for issue in &issues {
            match issue {
                Issue::MismatchedClose { .. } => fixed.mismatched_close += 1,
                Issue::UnclosedAtEnd { .. } => fixed.unclosed_at_end += 1,
                _ => {}
            }
        }
        let edits = synthesize(&current, &issues);
        debug!(
            "pass {}: {} issues, {} insertions",
            passes + 1,
            issues.len(),
            edits.len()
        );
        current = apply_edits(&current, &edits);
        edits_applied += edits.len();
        prev_repairable = Some(repairable);
        passes += 1;
    }
}
