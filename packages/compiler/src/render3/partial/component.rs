//! Render3 Partial Component Compilation
//!
//! Corresponds to packages/compiler/src/render3/partial/component.ts:
//! gathers the declaration fields of a component into a `DefinitionMap`
//! whose shape the partial linker can reconstruct from.

use crate::core::{ChangeDetectionStrategy, ViewEncapsulation};
use crate::output::output_ast as o;
use crate::parse_util::{ParseLocation, ParseSourceFile, ParseSourceSpan};
use crate::render3::r3_identifiers::Identifiers as R3;
use crate::render3::util::{generate_forward_ref, R3CompiledExpression};
use crate::render3::view::api::{DeclarationListEmitMode, R3ComponentMetadata};
use crate::render3::view::util::DefinitionMap;
use crate::template::{ParsedTemplate, TemplateSource};

use super::util::{to_optional_literal_array, to_optional_literal_map};
use super::{COMPILER_VERSION, MINIMUM_PARTIAL_LINKER_VERSION};

/// Compile a component declaration defined by the `R3ComponentMetadata`.
pub fn compile_declare_component_from_metadata(
    meta: &R3ComponentMetadata,
    template: &ParsedTemplate,
) -> R3CompiledExpression {
    let definition_map = create_component_definition_map(meta, template);
    let expression = o::import_expr(R3::declare_component())
        .call_fn(vec![o::Expression::LiteralMap(definition_map.to_literal_map())]);
    R3CompiledExpression::new(expression, vec![])
}

/// Gathers the declaration fields for a component into a `DefinitionMap`.
/// Insertion order here is the emitted field order; re-linking depends on it
/// being deterministic.
pub fn create_component_definition_map(
    meta: &R3ComponentMetadata,
    template: &ParsedTemplate,
) -> DefinitionMap {
    let mut definition_map = DefinitionMap::new();

    definition_map.set("minVersion", Some(o::literal(MINIMUM_PARTIAL_LINKER_VERSION)));
    definition_map.set("version", Some(o::literal(COMPILER_VERSION)));
    definition_map.set("type", Some(meta.type_.value.clone()));
    definition_map.set(
        "selector",
        meta.selector.as_ref().map(|s| o::literal(s.clone())),
    );

    definition_map.set("template", Some(get_template_expression(template)));
    if template.is_inline {
        definition_map.set("isInline", Some(o::literal(true)));
    }

    definition_map.set(
        "styles",
        to_optional_literal_array(&meta.styles, |s| o::literal(s.clone())),
    );
    definition_map.set("directives", compile_used_directive_metadata(meta));
    definition_map.set("pipes", compile_used_pipe_metadata(meta));
    definition_map.set("viewProviders", meta.view_providers.clone());
    definition_map.set("animations", meta.animations.clone());

    if meta.change_detection != ChangeDetectionStrategy::Default {
        definition_map.set(
            "changeDetection",
            Some(
                o::import_expr(R3::change_detection_strategy())
                    .prop(meta.change_detection.symbol_name()),
            ),
        );
    }
    if meta.encapsulation != ViewEncapsulation::Emulated {
        definition_map.set(
            "encapsulation",
            Some(o::import_expr(R3::view_encapsulation()).prop(meta.encapsulation.symbol_name())),
        );
    }
    if !meta.interpolation.is_default() {
        definition_map.set(
            "interpolation",
            Some(o::literal_arr(vec![
                o::literal(meta.interpolation.start.clone()),
                o::literal(meta.interpolation.end.clone()),
            ])),
        );
    }

    if template.preserve_whitespaces {
        definition_map.set("preserveWhitespaces", Some(o::literal(true)));
    }

    definition_map
}

fn get_template_expression(template: &ParsedTemplate) -> o::Expression {
    match &template.template {
        TemplateSource::String(contents) => {
            if template.is_inline {
                // The template is inline but not a simple literal, so give up
                // on source-mapping it and emit a plain literal.
                o::literal(contents.clone())
            } else {
                // The template is external so we must synthesize an expression
                // node with the appropriate source span.
                let file =
                    ParseSourceFile::new(contents.clone(), template.template_url.clone());
                let start = ParseLocation::new(file.clone(), 0, 0, 0);
                let end = compute_end_location(file, contents);
                let span = ParseSourceSpan::new(start, end);
                o::literal_with_span(contents.clone(), Some(span))
            }
        }
        // The template is inline so the original expression node is reused.
        TemplateSource::Expression(expr) => expr.clone(),
    }
}

/// End location of `contents` within `file`: line index is the number of
/// newlines, column is the distance from the last newline to the end.
pub fn compute_end_location(file: ParseSourceFile, contents: &str) -> ParseLocation {
    let length = contents.len();
    let mut last_line_start = 0usize;
    let mut line = 0usize;

    while let Some(idx) = contents[last_line_start..].find('\n') {
        last_line_start = last_line_start + idx + 1;
        line += 1;
    }

    ParseLocation::new(file, length, line, length - last_line_start)
}

/// Compiles the used directives into an array literal of definition maps,
/// or `None` when the component uses no directives.
fn compile_used_directive_metadata(meta: &R3ComponentMetadata) -> Option<o::Expression> {
    let wrap_type = type_wrapper(meta.declaration_list_emit_mode);

    to_optional_literal_array(&meta.directives, |directive| {
        let mut dir_meta = DefinitionMap::new();
        dir_meta.set("type", Some(wrap_type(directive.type_.clone())));
        dir_meta.set("selector", Some(o::literal(directive.selector.clone())));
        dir_meta.set(
            "inputs",
            to_optional_literal_array(&directive.inputs, |s| o::literal(s.clone())),
        );
        dir_meta.set(
            "outputs",
            to_optional_literal_array(&directive.outputs, |s| o::literal(s.clone())),
        );
        dir_meta.set(
            "exportAs",
            directive
                .export_as
                .as_deref()
                .and_then(|e| to_optional_literal_array(e, |s| o::literal(s.clone()))),
        );
        o::Expression::LiteralMap(dir_meta.to_literal_map())
    })
}

/// Compiles the used pipes into an object literal keyed by pipe name, or
/// `None` when the component uses no pipes.
fn compile_used_pipe_metadata(meta: &R3ComponentMetadata) -> Option<o::Expression> {
    let wrap_type = type_wrapper(meta.declaration_list_emit_mode);
    to_optional_literal_map(&meta.pipes, |pipe| wrap_type(pipe.clone()))
}

fn type_wrapper(mode: DeclarationListEmitMode) -> fn(o::Expression) -> o::Expression {
    match mode {
        DeclarationListEmitMode::Direct => |expr| expr,
        DeclarationListEmitMode::Closure => generate_forward_ref,
    }
}
