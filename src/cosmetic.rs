//! Cosmetic fixers: narrow, idempotent text substitutions that run
//! independently of the structural engine and never touch tag nesting.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::types::CosmeticCounts;

fn handler_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(on[a-z]+)=").unwrap())
}

fn quote_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\b(className|style|id|src|href|alt|title|placeholder|type|name|value|role|target|rel|key|htmlFor|aria-[a-z-]+|data-[a-z0-9-]+)='([^'\n]*)'",
        )
        .unwrap()
    })
}

fn boolean_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"\b(disabled|checked|selected|readonly|readOnly|required|multiple|autoFocus|autoPlay|controls|loop|muted|open|hidden)(?:="true"|='true'|=\{true\})"#,
        )
        .unwrap()
    })
}

fn attr_expr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"=\{([^{}\n]*)\}").unwrap())
}

fn camel_case_handler(lower: &str) -> Option<&'static str> {
    let fixed = match lower {
        "onclick" => "onClick",
        "onchange" => "onChange",
        "onsubmit" => "onSubmit",
        "onblur" => "onBlur",
        "onfocus" => "onFocus",
        "oninput" => "onInput",
        "onkeydown" => "onKeyDown",
        "onkeyup" => "onKeyUp",
        "onkeypress" => "onKeyPress",
        "onmouseenter" => "onMouseEnter",
        "onmouseleave" => "onMouseLeave",
        "onmousedown" => "onMouseDown",
        "onmouseup" => "onMouseUp",
        "onmouseover" => "onMouseOver",
        "onmouseout" => "onMouseOut",
        "onscroll" => "onScroll",
        "ondoubleclick" => "onDoubleClick",
        "ontouchstart" => "onTouchStart",
        "ontouchmove" => "onTouchMove",
        "ontouchend" => "onTouchEnd",
        "ondragstart" => "onDragStart",
        "ondragover" => "onDragOver",
        "ondrop" => "onDrop",
        "onload" => "onLoad",
        "onerror" => "onError",
        _ => return None,
    };
    Some(fixed)
}

/// `onclick=` → `onClick=` for the common React handlers. Camel-cased
/// output no longer matches the all-lowercase pattern.
fn canonicalize_handlers(text: &str) -> (String, usize) {
    let mut count = 0usize;
    let out = handler_re().replace_all(text, |caps: &Captures| match camel_case_handler(&caps[1]) {
        Some(fixed) => {
            count += 1;
            format!("{fixed}=")
        }
        None => caps[0].to_string(),
    });
    (out.into_owned(), count)
}

/// `className='x'` → `className="x"` when the value holds no double
/// quote.
fn normalize_attr_quotes(text: &str) -> (String, usize) {
    let mut count = 0usize;
    let out = quote_attr_re().replace_all(text, |caps: &Captures| {
        let value = &caps[2];
        if value.contains('"') {
            caps[0].to_string()
        } else {
            count += 1;
            format!("{}=\"{}\"", &caps[1], value)
        }
    });
    (out.into_owned(), count)
}

/// `disabled="true"` / `checked={true}` → bare attribute.
fn simplify_boolean_attrs(text: &str) -> (String, usize) {
    let mut count = 0usize;
    let out = boolean_attr_re().replace_all(text, |caps: &Captures| {
        count += 1;
        caps[1].to_string()
    });
    (out.into_owned(), count)
}

/// Decode quote entities inside `={…}` attribute expressions. `&lt;` and
/// `&gt;` are deliberately left alone: decoding them could mint new tag
/// characters.
fn unescape_expr_entities(text: &str) -> (String, usize) {
    let mut count = 0usize;
    let out = attr_expr_re().replace_all(text, |caps: &Captures| {
        let inner = &caps[1];
        if !inner.contains('&') {
            return caps[0].to_string();
        }
        let hits = inner.matches("&quot;").count()
            + inner.matches("&#39;").count()
            + inner.matches("&apos;").count();
        if hits == 0 {
            return caps[0].to_string();
        }
        count += hits;
        let decoded = inner
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&apos;", "'");
        format!("={{{decoded}}}")
    });
    (out.into_owned(), count)
}

/// Run the whole fixer catalog once. Every fixer is idempotent, so the
/// pass as a whole is too.
pub fn cosmetic_pass(text: &str) -> (String, CosmeticCounts) {
    let mut counts = CosmeticCounts::default();

    let (text, n) = canonicalize_handlers(text);
    counts.handler_case = n;

    let (text, n) = normalize_attr_quotes(&text);
    counts.quote_style = n;

    let (text, n) = simplify_boolean_attrs(&text);
    counts.boolean_attr = n;

    let (text, n) = unescape_expr_entities(&text);
    counts.entity_unescape = n;

    (text, counts)
}
