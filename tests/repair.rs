use jsxmend::pipeline::repair_fragment;
use jsxmend::types::{Issue, RepairOptions};

fn repair(text: &str) -> jsxmend::types::RepairOutcome {
    repair_fragment(text, &RepairOptions::default())
}

/// The repaired text must contain the original as a character
/// subsequence: the engine only ever inserts.
fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut hay = haystack.chars();
    needle.chars().all(|c| hay.any(|h| h == c))
}

#[test]
fn simple_unclosed_inner_tag() {
    let out = repair("<div><span>hi</div>");
    assert_eq!(out.repaired_text, "<div><span>hi</span></div>");
    assert_eq!(out.status, "repaired");
    assert!(out.converged);
    assert_eq!(out.edits_applied, 1);
    assert_eq!(out.fixed.mismatched_close, 1);
    assert!(out.issues_remaining.is_empty());
}

#[test]
fn trailing_unclosed_list_items() {
    let out = repair("<ul><li>a<li>b</ul>");
    assert_eq!(out.repaired_text, "<ul><li>a<li>b</li></li></ul>");
    assert!(out.converged);
    assert_eq!(out.edits_applied, 2);
}

#[test]
fn extraneous_close_is_reported_but_never_deleted() {
    let out = repair("<p>text</p></p>");
    assert_eq!(out.repaired_text, "<p>text</p></p>");
    assert_eq!(out.status, "partial");
    assert!(out.converged);
    assert_eq!(out.edits_applied, 0);
    assert_eq!(
        out.issues_remaining,
        vec![Issue::UnexpectedClose {
            name: Some("p".to_string()),
            position: 11,
        }]
    );
}

#[test]
fn nested_fragments_balance() {
    let out = repair("<>a<>b</></>");
    assert_eq!(out.status, "clean");
    assert_eq!(out.edits_applied, 0);
    assert!(out.issues_remaining.is_empty());
}

#[test]
fn dangling_fragment_is_closed() {
    let out = repair("<>a");
    assert_eq!(out.repaired_text, "<>a</>");
    assert!(out.converged);
}

#[test]
fn unclosed_frames_append_closers_innermost_first() {
    let out = repair("<a><b><c>x");
    assert_eq!(out.repaired_text, "<a><b><c>x</c></b></a>");
    assert!(out.converged);
    assert_eq!(out.edits_applied, 3);
    assert_eq!(out.fixed.unclosed_at_end, 3);
}

#[test]
fn non_convergent_input_stops_within_the_pass_bound() {
    // The appended closer lands inside an unterminated string region, so
    // every pass rediscovers the same unclosed frame.
    let out = repair("<a>x ='");
    assert!(!out.converged);
    assert_eq!(out.status, "exhausted");
    assert!(out.passes <= RepairOptions::default().max_passes);
    assert_eq!(out.repaired_text, "<a>x ='</a>");
    assert_eq!(out.edits_applied, 1);
    assert_eq!(out.issues_remaining.len(), 1);
}

#[test]
fn zero_pass_budget_returns_the_input_unchanged() {
    let opt = RepairOptions {
        max_passes: 0,
        ..RepairOptions::default()
    };
    let out = repair_fragment("<div><span>hi</div>", &opt);
    assert!(!out.converged);
    assert_eq!(out.status, "exhausted");
    assert_eq!(out.repaired_text, "<div><span>hi</div>");
    assert_eq!(out.edits_applied, 0);
}

#[test]
fn converging_inputs_reach_zero_issues_within_the_pass_bound() {
    // Several independent problems in one fragment: a mismatched close
    // and two dangling frames after it.
    let input = "<section><div><span>a</div><p>b<em>c</section>";
    let out = repair(input);
    assert!(out.converged);
    assert!(out.passes <= RepairOptions::default().max_passes);
    assert!(out.issues_remaining.is_empty());
    assert!(repair(&out.repaired_text).issues_remaining.is_empty());
}

#[test]
fn repair_is_idempotent_once_converged() {
    for input in ["<div><span>hi</div>", "<ul><li>a<li>b</ul>", "<a><b><c>x"] {
        let first = repair(input);
        assert!(first.converged, "input {input:?} should converge");
        let second = repair(&first.repaired_text);
        assert_eq!(second.edits_applied, 0, "input {input:?} not idempotent");
        assert_eq!(second.repaired_text, first.repaired_text);
    }
}

#[test]
fn repairs_only_insert() {
    for input in ["<div><span>hi</div>", "<ul><li>a<li>b</ul>", "<a><b><c>x"] {
        let out = repair(input);
        assert!(
            is_subsequence(input, &out.repaired_text),
            "original text must survive as a subsequence of {:?}",
            out.repaired_text
        );
    }
}

#[test]
fn void_tags_survive_the_pipeline_untouched() {
    for input in ["<div><br></div>", "<div><br/><img></div>"] {
        let out = repair(input);
        assert_eq!(out.status, "clean");
        assert_eq!(out.repaired_text, input);
    }
}

#[test]
fn mixed_source_fragment() {
    let input = concat!(
        "const Card = () => (\n",
        "  <div className=\"card\">\n",
        "    <h2>Title</h2>\n",
        "    <p>Some text\n",
        "  </div>\n",
        ");\n",
    );
    let out = repair(input);
    assert!(out.converged);
    assert!(out.repaired_text.contains("</p></div>"));
    assert!(is_subsequence(input, &out.repaired_text));

    let again = repair(&out.repaired_text);
    assert_eq!(again.edits_applied, 0);
}

#[test]
fn custom_void_set_is_honored() {
    let mut opt = RepairOptions::default();
    opt.void_tags.insert("li".to_string());
    let out = repair_fragment("<ul><li>a<li>b</ul>", &opt);
    assert_eq!(out.status, "clean");
    assert_eq!(out.repaired_text, "<ul><li>a<li>b</ul>");
}
