//! Stack-based nesting verifier. The open-frame stack is the single
//! source of truth for what is currently open; its order is exactly the
//! order in which open tags were seen, innermost last.

use std::collections::HashSet;

use crate::types::{Issue, OpenFrame, RepairOptions, TagToken, TagTokenKind, TokenScan};

/// The standard HTML void-element list. These never require a close,
/// with or without a trailing `/`.
pub const DEFAULT_VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub fn default_void_tags() -> HashSet<String> {
    DEFAULT_VOID_TAGS.iter().map(|s| s.to_string()).collect()
}

fn handle_close(stack: &mut Vec<OpenFrame>, issues: &mut Vec<Issue>, tok: &TagToken) {
    let want = tok.name.as_deref();
    if stack.last().is_some_and(|f| f.name.as_deref() == want) {
        stack.pop();
        return;
    }

    // Nearest enclosing frame with this name wins; fragment closes only
    // match fragment frames.
    match stack.iter().rposition(|f| f.name.as_deref() == want) {
        None => issues.push(Issue::UnexpectedClose {
            name: tok.name.clone(),
            position: tok.start,
        }),
        Some(idx) => {
            // Frames above the match were never closed; schedule them for
            // synthetic closure, innermost first.
            let unclosed: Vec<OpenFrame> = stack.drain(idx + 1..).rev().collect();
            let top = unclosed[0].clone();
            issues.push(Issue::MismatchedClose {
                found: tok.name.clone(),
                expected: top.name,
                expected_opened_at: top.opened_at,
                position: tok.start,
                unclosed,
            });
            stack.pop();
        }
    }
}

/// Replay the token sequence against the stack and report every balance
/// issue in source order, with unclosed-at-end frames last (innermost to
/// outermost).
pub fn verify(scan: &TokenScan, opt: &RepairOptions) -> Vec<Issue> {
    let mut stack: Vec<OpenFrame> = Vec::new();
    let mut issues: Vec<Issue> = Vec::new();

    for tok in &scan.tokens {
        match tok.kind {
            TagTokenKind::Open => match &tok.name {
                Some(name) if opt.void_tags.contains(name) => {}
                _ => stack.push(OpenFrame {
                    name: tok.name.clone(),
                    opened_at: tok.start,
                }),
            },
            TagTokenKind::FragmentOpen => stack.push(OpenFrame {
                name: None,
                opened_at: tok.start,
            }),
            TagTokenKind::SelfClosing => {}
            TagTokenKind::Close | TagTokenKind::FragmentClose => {
                handle_close(&mut stack, &mut issues, tok)
            }
        }
    }
    while let Some(frame) = stack.pop() {
        issues.push(Issue::UnclosedAtEnd {
            name: frame.name,
            opened_at: frame.opened_at,
        });
    }

    merge_unterminated(issues, &scan.unterminated)
}

/// Weave tokenizer-level unterminated-tag diagnostics into the issue list
/// by position. Unclosed-at-end entries stay at the back.
fn merge_unterminated(issues: Vec<Issue>, unterminated: &[usize]) -> Vec<Issue> {
    if unterminated.is_empty() {
        return issues;
    }
    let mut merged = Vec::with_capacity(issues.len() + unterminated.len());
    let mut pending = unterminated.iter().copied().peekable();
    for issue in issues {
        let pos = match issue {
            Issue::UnclosedAtEnd { .. } => usize::MAX,
            ref other => other.position(),
        };
        while let Some(&u) = pending.peek() {
            if u > pos {
                break;
            }
            merged.push(Issue::UnterminatedTag { position: u });
            pending.next();
        }
        merged.push(issue);
    }
    for u in pending {
        merged.push(Issue::UnterminatedTag { position: u });
    }
    merged
}
