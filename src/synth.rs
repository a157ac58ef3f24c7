//! Repair synthesizer. Turns the issue list into insert-only edits and
//! applies them back to front so earlier offsets stay valid.

use crate::types::{Edit, Issue};

fn closer_for(name: &Option<String>) -> String {
    match name {
        Some(n) => format!("</{n}>"),
        None => "</>".to_string(),
    }
}

/// Compute the edit sequence for one pass. Edits come out position-sorted
/// ascending; edits sharing a position are listed in the order their text
/// must appear in the output.
pub fn synthesize(text: &str, issues: &[Issue]) -> Vec<Edit> {
    let mut edits: Vec<Edit> = Vec::new();
    for issue in issues {
        match issue {
            Issue::MismatchedClose {
                position, unclosed, ..
            } => {
                // One synthetic closer per discarded frame, innermost
                // first, immediately before the offending close tag.
                for frame in unclosed {
                    edits.push(Edit {
                        position: *position,
                        insert: frame.closer(),
                    });
                }
            }
            Issue::UnclosedAtEnd { name, .. } => edits.push(Edit {
                position: text.len(),
                insert: closer_for(name),
            }),
            // Extraneous closes and unterminated openings are reported,
            // never repaired: that would require deleting text.
            Issue::UnexpectedClose { .. } | Issue::UnterminatedTag { .. } => {}
        }
    }
    edits
}

/// Apply edits over the original text. Processing in descending offset
/// order keeps every remaining edit's position valid; edits sharing an
/// offset land in list order.
pub fn apply_edits(text: &str, edits: &[Edit]) -> String {
    let mut b: Vec<u8> = text.as_bytes().to_vec();
    for e in edits.iter().rev() {
        let at = e.position.min(b.len());
        let ins = e.insert.as_bytes();
        let mut out = Vec::with_capacity(b.len() + ins.len());
        out.extend_from_slice(&b[..at]);
        out.extend_from_slice(ins);
        out.extend_from_slice(&b[at..]);
        b = out;
    }
    String::from_utf8_lossy(&b).into_owned()
}
