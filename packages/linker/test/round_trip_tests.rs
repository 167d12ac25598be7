//! Declare-then-link round trips: metadata compiled into a
//! `ɵɵngDeclareComponent()` declaration must survive being re-parsed and
//! linked back into `R3ComponentMetadata`.

mod common;

use common::{declaration_fixture, TestHost};

use indexmap::IndexMap;

use partial_compiler::core::{ChangeDetectionStrategy, ViewEncapsulation};
use partial_compiler::ml_parser::defaults::{default_interpolation_config, InterpolationConfig};
use partial_compiler::output::output_ast as o;
use partial_compiler::output::printer::emit_expression;
use partial_compiler::render3::partial::component::compile_declare_component_from_metadata;
use partial_compiler::render3::util::R3Reference;
use partial_compiler::render3::view::api::{
    DeclarationListEmitMode, R3ComponentMetadata, R3ComponentTemplate, R3UsedDirectiveMetadata,
};
use partial_compiler::template::{parse_template, ParseTemplateOptions, ParsedTemplate, TmplAstNode};
use partial_linker::ast_value::AstValue;
use partial_linker::file_linker::LinkerOptions;
use partial_linker::partial_linkers::partial_component_linker_1::PartialComponentLinkerV1;

fn parse_inline(text: &str, interpolation: Option<InterpolationConfig>) -> ParsedTemplate {
    let template = parse_template(
        text,
        "/app.ts",
        ParseTemplateOptions {
            interpolation_config: interpolation,
            is_inline: true,
            ..ParseTemplateOptions::default()
        },
    );
    assert!(template.errors.is_empty(), "template errors: {:?}", template.errors);
    template
}

fn component_meta(template: &ParsedTemplate) -> R3ComponentMetadata {
    R3ComponentMetadata {
        name: "MyCmp".to_string(),
        type_: R3Reference::plain(o::variable("MyCmp")),
        selector: Some("my-cmp".to_string()),
        template: R3ComponentTemplate {
            nodes: template.nodes.clone(),
            ng_content_selectors: template.ng_content_selectors.clone(),
        },
        directives: vec![],
        pipes: IndexMap::new(),
        declaration_list_emit_mode: DeclarationListEmitMode::Direct,
        styles: vec![],
        encapsulation: ViewEncapsulation::Emulated,
        interpolation: default_interpolation_config(),
        change_detection: ChangeDetectionStrategy::Default,
        view_providers: None,
        animations: None,
        relative_context_file_path: "/app.ts".to_string(),
        i18n_use_external_ids: false,
    }
}

/// Converts the declaration expression into a host AST and links it back.
fn link_back(declared: &o::Expression) -> R3ComponentMetadata {
    let (decl, code) = declaration_fixture(declared);
    let host = TestHost;
    let options = LinkerOptions::default();
    let linker = PartialComponentLinkerV1::new(&options, "/app.js", &code, None);
    let meta_obj = AstValue::new(decl, &host).get_object().unwrap();
    linker.to_r3_component_meta(&meta_obj).unwrap()
}

fn element_children(node: &TmplAstNode) -> &[TmplAstNode] {
    match node {
        TmplAstNode::Element(el) => &el.children,
        other => panic!("expected an element, got {other:?}"),
    }
}

#[test]
fn test_full_metadata_survives_declare_then_link() {
    let template = parse_inline("<h1>Hi {{ name }}</h1>", None);
    let mut meta = component_meta(&template);
    meta.styles = vec!["h1 { font-weight: bold; }".to_string()];
    meta.directives.push(R3UsedDirectiveMetadata {
        type_: o::variable("MyDir"),
        selector: "[my-dir]".to_string(),
        inputs: vec!["value".to_string()],
        outputs: vec!["changed".to_string()],
        export_as: Some(vec!["myDir".to_string()]),
    });
    meta.pipes.insert("first".to_string(), o::variable("FirstPipe"));
    meta.pipes.insert("second".to_string(), o::variable("SecondPipe"));
    meta.encapsulation = ViewEncapsulation::ShadowDom;
    meta.change_detection = ChangeDetectionStrategy::OnPush;

    let declared = compile_declare_component_from_metadata(&meta, &template).expression;
    let linked = link_back(&declared);

    assert_eq!(linked.name, "MyCmp");
    assert_eq!(linked.selector.as_deref(), Some("my-cmp"));
    assert_eq!(linked.styles, meta.styles);
    assert_eq!(linked.encapsulation, ViewEncapsulation::ShadowDom);
    assert_eq!(linked.change_detection, ChangeDetectionStrategy::OnPush);
    assert_eq!(linked.declaration_list_emit_mode, DeclarationListEmitMode::Direct);

    assert_eq!(linked.directives.len(), 1);
    let directive = &linked.directives[0];
    assert_eq!(emit_expression(&directive.type_), "MyDir");
    assert_eq!(directive.selector, "[my-dir]");
    assert_eq!(directive.inputs, vec!["value".to_string()]);
    assert_eq!(directive.outputs, vec!["changed".to_string()]);
    assert_eq!(directive.export_as, Some(vec!["myDir".to_string()]));

    let pipe_names: Vec<&String> = linked.pipes.keys().collect();
    assert_eq!(pipe_names, vec!["first", "second"]);
    assert_eq!(emit_expression(&linked.pipes["first"]), "FirstPipe");

    // The template structure survives re-parsing from the declaration.
    let children = element_children(&linked.template.nodes[0]);
    match (&children[0], &children[1]) {
        (TmplAstNode::Text(text), TmplAstNode::BoundText(bound)) => {
            assert_eq!(text.value, "Hi ");
            assert_eq!(bound.value, "name");
        }
        other => panic!("unexpected template children: {other:?}"),
    }
}

#[test]
fn test_closure_mode_round_trip_unwraps_forward_refs() {
    let template = parse_inline("<div my-dir>{{ x | myPipe }}</div>", None);
    let mut meta = component_meta(&template);
    meta.directives.push(R3UsedDirectiveMetadata {
        type_: o::variable("MyDir"),
        selector: "[my-dir]".to_string(),
        inputs: vec![],
        outputs: vec![],
        export_as: None,
    });
    meta.pipes.insert("myPipe".to_string(), o::variable("MyPipe"));
    meta.declaration_list_emit_mode = DeclarationListEmitMode::Closure;

    let declared = compile_declare_component_from_metadata(&meta, &template).expression;
    let declared_code = emit_expression(&declared);
    assert!(
        declared_code.contains("i0.forwardRef(() => MyDir)"),
        "got: {declared_code}"
    );
    assert!(
        declared_code.contains("i0.forwardRef(() => MyPipe)"),
        "got: {declared_code}"
    );

    let linked = link_back(&declared);
    assert_eq!(linked.declaration_list_emit_mode, DeclarationListEmitMode::Closure);
    assert_eq!(emit_expression(&linked.directives[0].type_), "MyDir");
    assert_eq!(emit_expression(&linked.pipes["myPipe"]), "MyPipe");
}

#[test]
fn test_defaults_round_trip_unchanged() {
    let template = parse_inline("<div></div>", None);
    let meta = component_meta(&template);

    let declared = compile_declare_component_from_metadata(&meta, &template).expression;
    let declared_code = emit_expression(&declared);
    for absent in ["styles", "directives", "pipes", "encapsulation", "changeDetection"] {
        assert!(!declared_code.contains(absent), "{absent} in: {declared_code}");
    }

    let linked = link_back(&declared);
    assert_eq!(linked.encapsulation, ViewEncapsulation::Emulated);
    assert_eq!(linked.change_detection, ChangeDetectionStrategy::Default);
    assert_eq!(linked.interpolation, default_interpolation_config());
    assert!(linked.styles.is_empty());
    assert!(linked.directives.is_empty());
    assert!(linked.pipes.is_empty());
    assert!(linked.view_providers.is_none());
    assert!(linked.animations.is_none());
}

#[test]
fn test_custom_interpolation_round_trip() {
    let interpolation = InterpolationConfig::new("<%".to_string(), "%>".to_string());
    let template = parse_inline("<p><% x %></p>", Some(interpolation.clone()));
    let mut meta = component_meta(&template);
    meta.interpolation = interpolation.clone();

    let declared = compile_declare_component_from_metadata(&meta, &template).expression;
    let linked = link_back(&declared);

    assert_eq!(linked.interpolation, interpolation);
    let children = element_children(&linked.template.nodes[0]);
    match &children[0] {
        TmplAstNode::BoundText(bound) => assert_eq!(bound.value, "x"),
        other => panic!("expected a bound text node, got {other:?}"),
    }
}

#[test]
fn test_opaque_passthrough_survives_the_round_trip() {
    let template = parse_inline("<div></div>", None);
    let mut meta = component_meta(&template);
    meta.view_providers = Some(o::raw_code("[{ provide: TOKEN, useValue: 1 }]"));
    meta.animations = Some(o::raw_code("[trigger]"));

    let declared = compile_declare_component_from_metadata(&meta, &template).expression;
    let linked = link_back(&declared);

    assert_eq!(
        linked.view_providers.map(|vp| emit_expression(&vp)),
        Some("[{ provide: TOKEN, useValue: 1 }]".to_string())
    );
    assert_eq!(
        linked.animations.map(|a| emit_expression(&a)),
        Some("[trigger]".to_string())
    );
}
