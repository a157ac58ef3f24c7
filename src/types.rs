use std::collections::HashSet;
use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagTokenKind {
    Open,
    Close,
    SelfClosing,
    FragmentOpen,
    FragmentClose,
}

/// One tag event in source order. `name` is absent for fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagToken {
    pub kind: TagTokenKind,
    pub name: Option<String>,
    pub start: usize,
    pub end: usize,
}

/// Output of one tokenizer pass. `unterminated` holds byte offsets of `<`
/// openings that never resolved to a `>` within the lookahead budget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenScan {
    pub tokens: Vec<TagToken>,
    pub unterminated: Vec<usize>,
}

/// Element of the verifier's stack. `name` is absent for fragment frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenFrame {
    pub name: Option<String>,
    pub opened_at: usize,
}

impl OpenFrame {
    pub fn closer(&self) -> String {
        match &self.name {
            Some(n) => format!("</{n}>"),
            None => "</>".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    UnterminatedTag {
        position: usize,
    },
    UnexpectedClose {
        name: Option<String>,
        position: usize,
    },
    MismatchedClose {
        found: Option<String>,
        expected: Option<String>,
        expected_opened_at: usize,
        position: usize,
        /// Frames discarded above the matched frame, innermost first.
        /// Each one gets a synthetic closer from the synthesizer.
        unclosed: Vec<OpenFrame>,
    },
    UnclosedAtEnd {
        name: Option<String>,
        opened_at: usize,
    },
}

impl Issue {
    pub fn position(&self) -> usize {
        match self {
            Issue::UnterminatedTag { position } => *position,
            Issue::UnexpectedClose { position, .. } => *position,
            Issue::MismatchedClose { position, .. } => *position,
            Issue::UnclosedAtEnd { opened_at, .. } => *opened_at,
        }
    }

    /// Whether the synthesizer can repair this issue by insertion.
    pub fn is_repairable(&self) -> bool {
        matches!(
            self,
            Issue::MismatchedClose { .. } | Issue::UnclosedAtEnd { .. }
        )
    }
}

/// A single insertion. The engine never deletes or moves existing bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edit {
    pub position: usize,
    pub insert: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOptions {
    /// Tag names that never require a matching close. Lowercase HTML
    /// names only; matching is case-sensitive because JSX is.
    pub void_tags: HashSet<String>,
    /// Repair passes before the orchestrator gives up.
    pub max_passes: usize,
    /// Lookahead budget in bytes when searching for a tag's closing `>`.
    pub max_tag_span: usize,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            void_tags: crate::verifier::default_void_tags(),
            max_passes: 3,
            max_tag_span: 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FixCounts {
    pub mismatched_close: usize,
    pub unclosed_at_end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairOutcome {
    /// clean | repaired | partial | exhausted
    pub status: String,
    pub repaired_text: String,
    pub issues_remaining: Vec<Issue>,
    pub edits_applied: usize,
    pub converged: bool,
    pub passes: usize,
    pub fixed: FixCounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CosmeticCounts {
    pub handler_case: usize,
    pub quote_style: usize,
    pub boolean_attr: usize,
    pub entity_unescape: usize,
}

impl CosmeticCounts {
    pub fn total(&self) -> usize {
        self.handler_case + self.quote_style + self.boolean_attr + self.entity_unescape
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub repair: RepairOptions,
    /// Run the cosmetic fixer pass before the structural engine.
    pub cosmetic: bool,
    /// Write changed files back (atomically). False in check mode.
    pub write: bool,
    pub jobs: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            repair: RepairOptions::default(),
            cosmetic: true,
            write: true,
            jobs: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// clean | repaired | partial | exhausted | error
    pub status: String,
    pub edits_applied: usize,
    pub cosmetic_fixes: usize,
    pub issues_remaining: Vec<Issue>,
    pub converged: bool,
    pub changed: bool,
    pub error: Option<String>,
}

impl FileReport {
    pub fn io_error(path: &std::path::Path, message: String) -> Self {
        Self {
            path: path.to_path_buf(),
            status: "error".to_string(),
            edits_applied: 0,
            cosmetic_fixes: 0,
            issues_remaining: Vec::new(),
            converged: false,
            changed: false,
            error: Some(message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub edits_applied: usize,
    pub cosmetic_fixes: usize,
    pub files_not_converged: usize,
    pub files_errored: usize,
    pub reports: Vec<FileReport>,
}

impl RunSummary {
    pub fn ok(&self) -> bool {
        self.files_not_converged == 0 && self.files_errored == 0
    }
}
