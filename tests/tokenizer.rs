use jsxmend::tokenizer::scan;
use jsxmend::types::{RepairOptions, TagTokenKind};

fn kinds(text: &str) -> Vec<(TagTokenKind, Option<String>)> {
    scan(text, &RepairOptions::default())
        .tokens
        .into_iter()
        .map(|t| (t.kind, t.name))
        .collect()
}

fn name(s: &str) -> Option<String> {
    Some(s.to_string())
}

#[test]
fn open_and_close() {
    assert_eq!(
        kinds(r#"<div className="x">hi</div>"#),
        vec![
            (TagTokenKind::Open, name("div")),
            (TagTokenKind::Close, name("div")),
        ]
    );
}

#[test]
fn self_closing_variants() {
    assert_eq!(kinds("<br/>"), vec![(TagTokenKind::SelfClosing, name("br"))]);
    assert_eq!(
        kinds("<Spinner size={2} />"),
        vec![(TagTokenKind::SelfClosing, name("Spinner"))]
    );
}

#[test]
fn fragments() {
    assert_eq!(
        kinds("<>a</>"),
        vec![
            (TagTokenKind::FragmentOpen, None),
            (TagTokenKind::FragmentClose, None),
        ]
    );
}

#[test]
fn gt_inside_quoted_attribute_does_not_end_tag() {
    assert_eq!(
        kinds(r#"<div title="a > b">x</div>"#),
        vec![
            (TagTokenKind::Open, name("div")),
            (TagTokenKind::Close, name("div")),
        ]
    );
}

#[test]
fn arrow_inside_attribute_expression_does_not_end_tag() {
    assert_eq!(
        kinds("<button onClick={() => go()}>x</button>"),
        vec![
            (TagTokenKind::Open, name("button")),
            (TagTokenKind::Close, name("button")),
        ]
    );
}

#[test]
fn comments_are_skipped() {
    assert_eq!(kinds("// <div>\nlet x = 1;"), vec![]);
    assert_eq!(kinds("/* <div><span> */"), vec![]);
    assert_eq!(
        kinds("<p>{/* <b> */}x</p>"),
        vec![
            (TagTokenKind::Open, name("p")),
            (TagTokenKind::Close, name("p")),
        ]
    );
}

#[test]
fn string_literals_are_skipped() {
    assert_eq!(kinds(r#"const s = "<div>";"#), vec![]);
    assert_eq!(kinds("const t = `<div></div>`;"), vec![]);
    assert_eq!(kinds("const u = '<br/>';"), vec![]);
}

#[test]
fn apostrophe_in_tag_text_is_not_a_string() {
    assert_eq!(
        kinds("<p>it's fine</p>"),
        vec![
            (TagTokenKind::Open, name("p")),
            (TagTokenKind::Close, name("p")),
        ]
    );
}

#[test]
fn comparison_operators_are_not_tags() {
    assert_eq!(kinds("if (a < b) { go(); }"), vec![]);
    assert_eq!(kinds("a <3 && b > 1"), vec![]);
}

#[test]
fn token_spans_are_byte_offsets() {
    let scan = scan("<a><b/></a>", &RepairOptions::default());
    let spans: Vec<(usize, usize)> = scan.tokens.iter().map(|t| (t.start, t.end)).collect();
    assert_eq!(spans, vec![(0, 3), (3, 7), (7, 11)]);
}

#[test]
fn unterminated_opening_is_reported_not_dropped() {
    let scan = scan(r#"<div className="x""#, &RepairOptions::default());
    assert!(scan.tokens.is_empty());
    assert_eq!(scan.unterminated, vec![0]);
}

#[test]
fn scanning_resumes_after_unterminated_tag() {
    let scan = scan("<div <span>x</span>", &RepairOptions::default());
    assert_eq!(scan.unterminated, vec![0]);
    let names: Vec<Option<String>> = scan.tokens.iter().map(|t| t.name.clone()).collect();
    assert_eq!(names, vec![name("span"), name("span")]);
}

#[test]
fn lookahead_budget_bounds_the_tag_scan() {
    let opt = RepairOptions {
        max_tag_span: 8,
        ..RepairOptions::default()
    };
    let scan = scan("<div aaaaaaaaaaaaaaaa>x", &opt);
    assert!(scan.tokens.is_empty());
    assert_eq!(scan.unterminated, vec![0]);
}
