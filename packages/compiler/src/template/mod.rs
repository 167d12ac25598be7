//! Template Parsing
//!
//! The template-parser collaborator of the declare emitter and the partial
//! linker: consumes template text plus parse options, produces nodes,
//! `ng-content` selectors and diagnostics.

pub mod ast;
mod parser;

use crate::ml_parser::defaults::InterpolationConfig;
use crate::output::output_ast as o;
use crate::parse_util::ParseError;

pub use ast::*;

/// Character range of the template text within its enclosing source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LexerRange {
    pub start_pos: usize,
    pub start_line: usize,
    pub start_col: usize,
    pub end_pos: usize,
}

/// Options that configure a single `parse_template` call.
#[derive(Debug, Clone, Default)]
pub struct ParseTemplateOptions {
    /// The template text is a source-escaped string and must be unescaped
    /// before parsing.
    pub escaped_string: bool,
    /// Interpolation markers; `None` means the default `{{`/`}}` pair.
    pub interpolation_config: Option<InterpolationConfig>,
    /// Where the template text sits inside the enclosing source file.
    pub range: Option<LexerRange>,
    pub enable_i18n_legacy_message_id_format: bool,
    pub preserve_whitespaces: bool,
    /// Normalize `\r\n` to `\n` so ICU message ids are stable.
    pub i18n_normalize_line_endings_in_icus: bool,
    pub is_inline: bool,
}

/// How the template was written down in the component source.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateSource {
    String(String),
    /// An inline template defined by something other than a simple string
    /// literal; the expression is carried through for re-emission.
    Expression(o::Expression),
}

/// The product of one `parse_template` call. Never mutated after parsing.
#[derive(Debug, Clone)]
pub struct ParsedTemplate {
    pub nodes: Vec<TmplAstNode>,
    pub ng_content_selectors: Vec<String>,
    pub errors: Vec<ParseError>,
    pub preserve_whitespaces: bool,
    pub is_inline: bool,
    pub template: TemplateSource,
    pub template_url: String,
}

/// Parses template text into a `ParsedTemplate`. Malformed markup is
/// reported through `ParsedTemplate::errors`; this function does not fail.
pub fn parse_template(
    code: &str,
    template_url: &str,
    options: ParseTemplateOptions,
) -> ParsedTemplate {
    parser::parse(code, template_url, options)
}
