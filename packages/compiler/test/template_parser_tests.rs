//! Tests for the template parser.

use partial_compiler::ml_parser::defaults::InterpolationConfig;
use partial_compiler::template::{
    parse_template, LexerRange, ParseTemplateOptions, TemplateSource, TmplAstNode,
};

fn parse_ok(
    code: &str,
    options: ParseTemplateOptions,
) -> Vec<TmplAstNode> {
    let template = parse_template(code, "/app.html", options);
    assert!(template.errors.is_empty(), "parse errors: {:?}", template.errors);
    template.nodes
}

#[test]
fn test_parses_nested_elements_and_text() {
    let nodes = parse_ok("<div><span>hi</span></div>", ParseTemplateOptions::default());
    assert_eq!(nodes.len(), 1);
    let div = match &nodes[0] {
        TmplAstNode::Element(el) => el,
        other => panic!("expected an element, got {other:?}"),
    };
    assert_eq!(div.name, "div");
    let span = match &div.children[0] {
        TmplAstNode::Element(el) => el,
        other => panic!("expected an element, got {other:?}"),
    };
    assert_eq!(span.name, "span");
    match &span.children[0] {
        TmplAstNode::Text(text) => assert_eq!(text.value, "hi"),
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn test_parses_attributes() {
    let nodes = parse_ok(
        "<input type=\"text\" disabled value=unquoted>",
        ParseTemplateOptions::default(),
    );
    let input = match &nodes[0] {
        TmplAstNode::Element(el) => el,
        other => panic!("expected an element, got {other:?}"),
    };
    assert_eq!(input.attributes.len(), 3);
    assert_eq!(input.attributes[0].name, "type");
    assert_eq!(input.attributes[0].value, "text");
    assert_eq!(input.attributes[1].name, "disabled");
    assert_eq!(input.attributes[1].value, "");
    assert_eq!(input.attributes[2].name, "value");
    assert_eq!(input.attributes[2].value, "unquoted");
}

#[test]
fn test_splits_interpolations_out_of_text() {
    let nodes = parse_ok("a {{ x }} b", ParseTemplateOptions::default());
    assert_eq!(nodes.len(), 3);
    match (&nodes[0], &nodes[1], &nodes[2]) {
        (
            TmplAstNode::Text(before),
            TmplAstNode::BoundText(bound),
            TmplAstNode::Text(after),
        ) => {
            assert_eq!(before.value, "a ");
            assert_eq!(bound.value, "x");
            assert_eq!(after.value, " b");
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn test_parses_non_ascii_text() {
    let nodes = parse_ok("<p>été</p>", ParseTemplateOptions::default());
    let p = match &nodes[0] {
        TmplAstNode::Element(el) => el,
        other => panic!("expected an element, got {other:?}"),
    };
    match &p.children[0] {
        TmplAstNode::Text(text) => assert_eq!(text.value, "été"),
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn test_parses_non_ascii_bare_text_with_interpolation() {
    let nodes = parse_ok("été {{ x }}", ParseTemplateOptions::default());
    match (&nodes[0], &nodes[1]) {
        (TmplAstNode::Text(text), TmplAstNode::BoundText(bound)) => {
            assert_eq!(text.value, "été ");
            assert_eq!(bound.value, "x");
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn test_custom_interpolation_markers() {
    let options = ParseTemplateOptions {
        interpolation_config: Some(InterpolationConfig::new("[[".to_string(), "]]".to_string())),
        ..Default::default()
    };
    let nodes = parse_ok("[[ title ]]", options);
    match &nodes[0] {
        TmplAstNode::BoundText(bound) => assert_eq!(bound.value, "title"),
        other => panic!("expected bound text, got {other:?}"),
    }
}

#[test]
fn test_whitespace_removal_is_the_default() {
    let nodes = parse_ok("<div>\n  <b>x</b>\n</div>", ParseTemplateOptions::default());
    let div = match &nodes[0] {
        TmplAstNode::Element(el) => el,
        other => panic!("expected an element, got {other:?}"),
    };
    // Whitespace-only text between the tags is dropped.
    assert_eq!(div.children.len(), 1);

    let options = ParseTemplateOptions { preserve_whitespaces: true, ..Default::default() };
    let nodes = parse_ok("<div>\n  <b>x</b>\n</div>", options);
    let div = match &nodes[0] {
        TmplAstNode::Element(el) => el,
        other => panic!("expected an element, got {other:?}"),
    };
    assert_eq!(div.children.len(), 3);
}

#[test]
fn test_void_and_self_closing_elements() {
    let nodes = parse_ok("<br><img src=\"x.png\"><custom-el/>", ParseTemplateOptions::default());
    assert_eq!(nodes.len(), 3);
    for node in &nodes {
        match node {
            TmplAstNode::Element(el) => assert!(el.children.is_empty()),
            other => panic!("expected an element, got {other:?}"),
        }
    }
}

#[test]
fn test_collects_ng_content_selectors() {
    let template = parse_template(
        "<ng-content select=\"[slot]\"></ng-content><div><ng-content></ng-content></div>",
        "/app.html",
        ParseTemplateOptions::default(),
    );
    assert!(template.errors.is_empty());
    assert_eq!(template.ng_content_selectors, vec!["[slot]".to_string(), "*".to_string()]);
}

#[test]
fn test_escaped_string_mode_unescapes_before_parsing() {
    let options = ParseTemplateOptions { escaped_string: true, ..Default::default() };
    let template = parse_template("<h1>\\n{{ x }}\\n</h1>", "/app.js", options);
    assert!(template.errors.is_empty());
    assert_eq!(
        template.template,
        TemplateSource::String("<h1>\n{{ x }}\n</h1>".to_string())
    );
}

#[test]
fn test_range_offsets_spans_into_the_enclosing_file() {
    let code = "var tpl = '<b>x</b>';";
    let options = ParseTemplateOptions {
        range: Some(LexerRange {
            start_pos: 11,
            start_line: 0,
            start_col: 11,
            end_pos: 19,
        }),
        ..Default::default()
    };
    let template = parse_template(code, "/app.js", options);
    assert!(template.errors.is_empty());
    let el_span = template.nodes[0].source_span();
    assert_eq!(el_span.start.offset, 11);
    assert_eq!(el_span.end.offset, 19);
    assert_eq!(el_span.text(), "<b>x</b>");
}

#[test]
fn test_unexpected_closing_tag_is_reported() {
    let template = parse_template("<div></span></div>", "/app.html", ParseTemplateOptions::default());
    assert_eq!(template.errors.len(), 1);
    assert_eq!(template.errors[0].msg, "Unexpected closing tag \"</span>\"");
}

#[test]
fn test_unclosed_element_is_reported() {
    let template = parse_template("<div><span></div>", "/app.html", ParseTemplateOptions::default());
    assert_eq!(template.errors.len(), 1);
    assert_eq!(template.errors[0].msg, "Element \"span\" is never closed");
}

#[test]
fn test_unexpected_end_of_template_is_reported() {
    let template = parse_template("<div>", "/app.html", ParseTemplateOptions::default());
    assert_eq!(template.errors.len(), 1);
    assert_eq!(
        template.errors[0].msg,
        "Unexpected end of template, expected closing tag \"</div>\""
    );
}

#[test]
fn test_unterminated_interpolation_is_reported() {
    let template = parse_template("{{ x", "/app.html", ParseTemplateOptions::default());
    assert_eq!(template.errors.len(), 1);
    assert_eq!(
        template.errors[0].msg,
        "Unterminated interpolation, expected closing marker \"}}\""
    );
}

#[test]
fn test_icu_line_ending_normalization() {
    let options = ParseTemplateOptions {
        i18n_normalize_line_endings_in_icus: true,
        ..Default::default()
    };
    let template = parse_template("<div>a\r\nb</div>", "/app.html", options);
    assert!(template.errors.is_empty());
    assert_eq!(
        template.template,
        TemplateSource::String("<div>a\nb</div>".to_string())
    );
}
