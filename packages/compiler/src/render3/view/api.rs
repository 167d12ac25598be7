//! Render3 View API
//!
//! Corresponds to packages/compiler/src/render3/view/api.ts (subset):
//! the fully resolved component metadata consumed by code generation and by
//! the declare emitter. Inside the linker this is only ever derived from a
//! partial declaration plus a parsed template.

use indexmap::IndexMap;

use crate::core::{ChangeDetectionStrategy, ViewEncapsulation};
use crate::ml_parser::defaults::InterpolationConfig;
use crate::output::output_ast::Expression;
use crate::render3::util::R3Reference;
use crate::template::TmplAstNode;

/// How the `dependencies` array of a definition is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeclarationListEmitMode {
    /// `dependencies: [MyDir]` — every type can be referenced directly.
    #[default]
    Direct,
    /// `dependencies: () => [MyDir]` — at least one type is forward-declared,
    /// so the whole list resolves lazily.
    Closure,
}

/// A directive used in the component's template.
#[derive(Debug, Clone, PartialEq)]
pub struct R3UsedDirectiveMetadata {
    pub type_: Expression,
    pub selector: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub export_as: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct R3ComponentTemplate {
    pub nodes: Vec<TmplAstNode>,
    pub ng_content_selectors: Vec<String>,
}

/// Fully resolved component metadata used for code generation.
#[derive(Debug, Clone)]
pub struct R3ComponentMetadata {
    /// Name of the component class.
    pub name: String,
    pub type_: R3Reference,
    pub selector: Option<String>,
    pub template: R3ComponentTemplate,
    pub directives: Vec<R3UsedDirectiveMetadata>,
    /// Pipe name to type reference. Kept in insertion order so emission is
    /// deterministic.
    pub pipes: IndexMap<String, Expression>,
    pub declaration_list_emit_mode: DeclarationListEmitMode,
    pub styles: Vec<String>,
    pub encapsulation: ViewEncapsulation,
    pub interpolation: InterpolationConfig,
    pub change_detection: ChangeDetectionStrategy,
    pub view_providers: Option<Expression>,
    pub animations: Option<Expression>,
    pub relative_context_file_path: String,
    pub i18n_use_external_ids: bool,
}
