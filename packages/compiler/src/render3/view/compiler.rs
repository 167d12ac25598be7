//! Render3 View Compiler
//!
//! Turns fully resolved component metadata into the runtime
//! `i0.ɵɵdefineComponent({...})` definition expression. Template instruction
//! generation is reduced to a stub body; the definition shape (selectors,
//! decls/vars, dependencies, styles, flags) is complete.

use crate::constant_pool::ConstantPool;
use crate::core::{ChangeDetectionStrategy, ViewEncapsulation};
use crate::output::output_ast as o;
use crate::render3::r3_identifiers::Identifiers as R3;
use crate::render3::util::R3CompiledExpression;
use crate::template::TmplAstNode;

use super::api::{DeclarationListEmitMode, R3ComponentMetadata};
use super::util::DefinitionMap;

pub fn compile_component_from_metadata(
    meta: &R3ComponentMetadata,
    constant_pool: &mut ConstantPool,
) -> R3CompiledExpression {
    let mut definition_map = DefinitionMap::new();

    definition_map.set("type", Some(meta.type_.value.clone()));

    if let Some(selector) = &meta.selector {
        definition_map.set("selectors", Some(compile_selectors(selector)));
    }

    if !meta.template.ng_content_selectors.is_empty() {
        let selectors = o::literal_arr(
            meta.template
                .ng_content_selectors
                .iter()
                .map(|s| o::literal(s.clone()))
                .collect(),
        );
        definition_map.set(
            "ngContentSelectors",
            Some(constant_pool.get_const_literal(selectors, true)),
        );
    }

    definition_map.set(
        "decls",
        Some(o::literal(count_decls(&meta.template.nodes) as f64)),
    );
    definition_map.set(
        "vars",
        Some(o::literal(count_vars(&meta.template.nodes) as f64)),
    );

    definition_map.set(
        "template",
        Some(o::Expression::Fn(o::FunctionExpr {
            name: Some(format!("{}_Template", meta.name)),
            params: vec![
                o::FnParam { name: "rf".to_string() },
                o::FnParam { name: "ctx".to_string() },
            ],
            statements: vec![],
        })),
    );

    if let Some(dependencies) = compile_declaration_list(meta) {
        definition_map.set("dependencies", Some(dependencies));
    }

    if !meta.styles.is_empty() {
        let styles = o::literal_arr(meta.styles.iter().map(|s| o::literal(s.clone())).collect());
        definition_map.set("styles", Some(constant_pool.get_const_literal(styles, true)));
    }

    if meta.encapsulation != ViewEncapsulation::Emulated {
        definition_map.set(
            "encapsulation",
            Some(o::literal(meta.encapsulation.runtime_value())),
        );
    }

    if meta.change_detection != ChangeDetectionStrategy::Default {
        definition_map.set(
            "changeDetection",
            Some(o::literal(meta.change_detection.runtime_value())),
        );
    }

    let expression = o::import_expr(R3::define_component())
        .call_fn(vec![o::Expression::LiteralMap(definition_map.to_literal_map())]);
    R3CompiledExpression::new(expression, vec![])
}

/// Emits the Ivy selector-list form, e.g. `[["my-cmp"], ["other"]]`.
fn compile_selectors(selector: &str) -> o::Expression {
    let groups: Vec<o::Expression> = selector
        .split(',')
        .map(|part| o::literal_arr(vec![o::literal(part.trim())]))
        .collect();
    o::literal_arr(groups)
}

/// The combined directive and pipe dependency list, honoring the emit mode.
fn compile_declaration_list(meta: &R3ComponentMetadata) -> Option<o::Expression> {
    let mut types: Vec<o::Expression> = meta.directives.iter().map(|d| d.type_.clone()).collect();
    types.extend(meta.pipes.values().cloned());
    if types.is_empty() {
        return None;
    }
    let list = o::literal_arr(types);
    match meta.declaration_list_emit_mode {
        DeclarationListEmitMode::Direct => Some(list),
        DeclarationListEmitMode::Closure => Some(o::Expression::ArrowFn(o::ArrowFunctionExpr {
            params: vec![],
            body: o::ArrowFunctionBody::Expression(Box::new(list)),
        })),
    }
}

fn count_decls(nodes: &[TmplAstNode]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            TmplAstNode::Element(el) => 1 + count_decls(&el.children),
            _ => 1,
        })
        .sum()
}

fn count_vars(nodes: &[TmplAstNode]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            TmplAstNode::Element(el) => count_vars(&el.children),
            TmplAstNode::BoundText(_) => 1,
            _ => 0,
        })
        .sum()
}
