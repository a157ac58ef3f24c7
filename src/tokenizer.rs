//! Single-pass tag tokenizer. Finds tag events in a fragment while
//! skipping string, template-literal and comment regions with a flat
//! (non-nesting) state machine.

use memchr::memchr;

use crate::types::{RepairOptions, TagToken, TagTokenKind, TokenScan};

#[inline]
fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\n' | b'\r' | b'\t')
}

#[inline]
fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

#[inline]
fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':')
}

/// A quote only opens a string when the last significant byte before it
/// reads as expression context. `it's` in tag text stays plain text,
/// `= '<div>'` is a string.
#[inline]
fn starts_string_after(last_sig: u8) -> bool {
    matches!(
        last_sig,
        0 | b'=' | b'(' | b'[' | b'{' | b',' | b':' | b';' | b'?' | b'!' | b'&' | b'|' | b'+'
            | b'-' | b'*' | b'/' | b'%' | b'<' | b'>' | b'~' | b'^'
    )
}

enum ReadTag {
    Token(TagToken, usize),
    NotATag,
    Unterminated,
}

/// Scan the tag body for its closing `>`. Quote-aware and brace-aware:
/// a `>` inside a quoted attribute value or a `{…}` attribute expression
/// does not terminate the tag. A bare `<` at depth zero means the tag
/// never closed.
fn read_tag(bytes: &[u8], start: usize, max_span: usize) -> ReadTag {
    let n = bytes.len();
    let mut i = start + 1;
    if i >= n {
        return ReadTag::NotATag;
    }

    let mut closing = false;
    if bytes[i] == b'/' {
        closing = true;
        i += 1;
    }
    if i < n && bytes[i] == b'>' {
        let kind = if closing {
            TagTokenKind::FragmentClose
        } else {
            TagTokenKind::FragmentOpen
        };
        let tok = TagToken {
            kind,
            name: None,
            start,
            end: i + 1,
        };
        return ReadTag::Token(tok, i + 1);
    }
    if i >= n || !is_name_start(bytes[i]) {
        return ReadTag::NotATag;
    }

    let name_start = i;
    while i < n && is_name_char(bytes[i]) {
        i += 1;
    }
    let name = String::from_utf8_lossy(&bytes[name_start..i]).into_owned();

    let limit = n.min(start.saturating_add(max_span));
    let mut quote: u8 = 0;
    let mut brace: usize = 0;
    let mut gt: Option<usize> = None;
    let mut j = i;
    while j < limit {
        let b = bytes[j];
        if quote != 0 {
            if b == quote {
                quote = 0;
            }
        } else {
            match b {
                b'"' | b'\'' | b'`' => quote = b,
                b'{' => brace += 1,
                b'}' => brace = brace.saturating_sub(1),
                b'>' if brace == 0 => {
                    gt = Some(j);
                    break;
                }
                b'<' if brace == 0 => return ReadTag::Unterminated,
                _ => {}
            }
        }
        j += 1;
    }
    let gt = match gt {
        Some(g) => g,
        None => return ReadTag::Unterminated,
    };

    let mut k = gt;
    while k > name_start && is_ws(bytes[k - 1]) {
        k -= 1;
    }
    let self_closing = k > name_start && bytes[k - 1] == b'/';

    let kind = if closing {
        TagTokenKind::Close
    } else if self_closing {
        TagTokenKind::SelfClosing
    } else {
        TagTokenKind::Open
    };
    let tok = TagToken {
        kind,
        name: Some(name),
        start,
        end: gt + 1,
    };
    ReadTag::Token(tok, gt + 1)
}

/// Skip a string or template literal starting at the quote `bytes[i]`.
/// `'…'` and `"…"` never span lines; backtick templates do. Returns the
/// index of the first byte after the region.
fn skip_string(bytes: &[u8], i: usize) -> usize {
    let quote = bytes[i];
    let n = bytes.len();
    let mut j = i + 1;
    let mut escape = false;
    while j < n {
        let b = bytes[j];
        if escape {
            escape = false;
        } else if b == b'\\' {
            escape = true;
        } else if b == quote {
            return j + 1;
        } else if b == b'\n' && quote != b'`' {
            return j;
        }
        j += 1;
    }
    n
}

fn skip_line_comment(bytes: &[u8], i: usize) -> usize {
    match memchr(b'\n', &bytes[i..]) {
        Some(rel) => i + rel + 1,
        None => bytes.len(),
    }
}

fn skip_block_comment(bytes: &[u8], i: usize) -> usize {
    let n = bytes.len();
    let mut j = i + 2;
    while j < n {
        match memchr(b'*', &bytes[j..]) {
            Some(rel) => {
                let star = j + rel;
                if star + 1 < n && bytes[star + 1] == b'/' {
                    return star + 2;
                }
                j = star + 1;
            }
            None => return n,
        }
    }
    n
}

/// Produce the ordered tag-event sequence for one fragment.
pub fn scan(text: &str, opt: &RepairOptions) -> TokenScan {
    let bytes = text.as_bytes();
    let mut out = TokenScan::default();
    let mut last_sig: u8 = 0;
    let mut i = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'"' | b'\'' | b'`' if starts_string_after(last_sig) => {
                i = skip_string(bytes, i);
                last_sig = b;
                continue;
            }
            b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'/' => {
                i = skip_line_comment(bytes, i);
                continue;
            }
            b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'*' => {
                i = skip_block_comment(bytes, i);
                continue;
            }
            b'<' => match read_tag(bytes, i, opt.max_tag_span) {
                ReadTag::Token(tok, next) => {
                    out.tokens.push(tok);
                    i = next;
                    last_sig = b'>';
                    continue;
                }
                ReadTag::NotATag => {}
                ReadTag::Unterminated => out.unterminated.push(i),
            },
            _ => {}
        }
        if !is_ws(b) {
            last_sig = b;
        }
        i += 1;
    }
    out
}
