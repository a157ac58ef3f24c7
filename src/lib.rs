pub mod cosmetic;
pub mod discover;
pub mod pipeline;
pub mod runner;
pub mod synth;
pub mod tokenizer;
pub mod types;
pub mod verifier;

pub use pipeline::{repair_fragment, scan_fragment};
pub use types::{
    Edit, Issue, RepairOptions, RepairOutcome, RunOptions, RunSummary, TagToken, TagTokenKind,
};
