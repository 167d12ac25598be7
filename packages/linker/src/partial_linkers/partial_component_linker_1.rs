//! Version 1 Component Linker
//!
//! Processes `ɵɵngDeclareComponent()` metadata objects: reconstructs the full
//! component metadata (template, directive and pipe usage, flags) and compiles
//! it into a runtime definition expression.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use partial_compiler::constant_pool::ConstantPool;
use partial_compiler::core::{ChangeDetectionStrategy, ViewEncapsulation};
use partial_compiler::ml_parser::defaults::{default_interpolation_config, InterpolationConfig};
use partial_compiler::output::output_ast as o;
use partial_compiler::render3::util::R3Reference;
use partial_compiler::render3::view::api::{
    DeclarationListEmitMode, R3ComponentMetadata, R3ComponentTemplate, R3UsedDirectiveMetadata,
};
use partial_compiler::render3::view::compiler::compile_component_from_metadata;
use partial_compiler::template::{parse_template, LexerRange, ParseTemplateOptions};

use crate::ast::{AstHost, AstNode, Range};
use crate::ast_value::{AstObject, AstValue};
use crate::error::FatalLinkerError;
use crate::file_linker::LinkerOptions;
use crate::partial_linkers::partial_linker::PartialLinker;
use crate::source_file::SourceFile;

/// Matches paths whose extension marks them as host source files rather than
/// template files.
static HOST_SOURCE_EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[jt]s$").unwrap());

/// A `PartialLinker` for declarations emitted in format version 1.
pub struct PartialComponentLinkerV1<'a> {
    options: &'a LinkerOptions,
    source_url: &'a str,
    code: &'a str,
    source_file: Option<&'a SourceFile>,
}

/// The template text handed to the template parser, with its origin.
struct TemplateInfo {
    code: String,
    source_url: String,
    range: Range,
    is_escaped: bool,
}

impl<'a> PartialComponentLinkerV1<'a> {
    pub fn new(
        options: &'a LinkerOptions,
        source_url: &'a str,
        code: &'a str,
        source_file: Option<&'a SourceFile>,
    ) -> Self {
        PartialComponentLinkerV1 {
            options,
            source_url,
            code,
            source_file,
        }
    }

    /// Derives the full `R3ComponentMetadata` from the declaration object.
    pub fn to_r3_component_meta<TExpression: AstNode, H: AstHost<TExpression>>(
        &self,
        meta_obj: &AstObject<'_, TExpression, H>,
    ) -> Result<R3ComponentMetadata, FatalLinkerError> {
        let interpolation = parse_interpolation_config(meta_obj)?;
        let template_source = meta_obj.get_value("template")?;
        let is_inline = if meta_obj.has("isInline") {
            meta_obj.get_boolean("isInline")?
        } else {
            false
        };
        let template_info = self.get_template_info(&template_source, is_inline)?;

        // Inline templates cannot preserve external CRLF semantics, so line
        // endings inside ICUs are always normalized for them.
        let i18n_normalize_line_endings_in_icus =
            is_inline || self.options.i18n_normalize_line_endings_in_icus;

        let template = parse_template(
            &template_info.code,
            &template_info.source_url,
            ParseTemplateOptions {
                escaped_string: template_info.is_escaped,
                interpolation_config: Some(interpolation.clone()),
                range: Some(LexerRange {
                    start_pos: template_info.range.start_pos,
                    start_line: template_info.range.start_line,
                    start_col: template_info.range.start_col,
                    end_pos: template_info.range.end_pos,
                }),
                enable_i18n_legacy_message_id_format: self
                    .options
                    .enable_i18n_legacy_message_id_format,
                preserve_whitespaces: if meta_obj.has("preserveWhitespaces") {
                    meta_obj.get_boolean("preserveWhitespaces")?
                } else {
                    false
                },
                i18n_normalize_line_endings_in_icus,
                is_inline,
            },
        );
        if !template.errors.is_empty() {
            let errors = template
                .errors
                .iter()
                .map(|err| err.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(FatalLinkerError::from_node(
                meta_obj.host,
                &template_source.node,
                format!("Errors found in the template:\n{errors}"),
            ));
        }

        let mut declaration_list_emit_mode = DeclarationListEmitMode::Direct;

        let mut directives = Vec::new();
        if meta_obj.has("directives") {
            for directive in meta_obj.get_array("directives")? {
                let directive_obj = directive.get_object()?;
                let type_value = directive_obj.get_value("type")?;
                let selector = directive_obj.get_string("selector")?;

                let type_expr = match extract_forward_ref(&type_value)? {
                    Some(forward_ref_type) => {
                        declaration_list_emit_mode = DeclarationListEmitMode::Closure;
                        forward_ref_type
                    }
                    None => type_value.get_opaque(),
                };

                directives.push(R3UsedDirectiveMetadata {
                    type_: type_expr,
                    selector,
                    inputs: if directive_obj.has("inputs") {
                        string_array(&directive_obj, "inputs")?
                    } else {
                        vec![]
                    },
                    outputs: if directive_obj.has("outputs") {
                        string_array(&directive_obj, "outputs")?
                    } else {
                        vec![]
                    },
                    export_as: if directive_obj.has("exportAs") {
                        Some(string_array(&directive_obj, "exportAs")?)
                    } else {
                        None
                    },
                });
            }
        }

        let mut pipes: IndexMap<String, o::Expression> = IndexMap::new();
        if meta_obj.has("pipes") {
            pipes = meta_obj.get_object("pipes")?.to_map(|pipe| {
                match extract_forward_ref(&pipe)? {
                    Some(forward_ref_type) => {
                        declaration_list_emit_mode = DeclarationListEmitMode::Closure;
                        Ok(forward_ref_type)
                    }
                    None => Ok(pipe.get_opaque()),
                }
            })?;
        }

        let type_value = meta_obj.get_value("type")?;
        let name = type_value.get_symbol_name().ok_or_else(|| {
            FatalLinkerError::from_node(
                meta_obj.host,
                &type_value.node,
                "Unsupported type, its name could not be determined",
            )
        })?;

        Ok(R3ComponentMetadata {
            name,
            type_: R3Reference::plain(type_value.get_opaque()),
            selector: if meta_obj.has("selector") {
                Some(meta_obj.get_string("selector")?)
            } else {
                None
            },
            template: R3ComponentTemplate {
                nodes: template.nodes,
                ng_content_selectors: template.ng_content_selectors,
            },
            directives,
            pipes,
            declaration_list_emit_mode,
            styles: if meta_obj.has("styles") {
                string_array(meta_obj, "styles")?
            } else {
                vec![]
            },
            encapsulation: if meta_obj.has("encapsulation") {
                parse_encapsulation(&meta_obj.get_value("encapsulation")?)?
            } else {
                ViewEncapsulation::Emulated
            },
            interpolation,
            change_detection: if meta_obj.has("changeDetection") {
                parse_change_detection_strategy(&meta_obj.get_value("changeDetection")?)?
            } else {
                ChangeDetectionStrategy::Default
            },
            view_providers: if meta_obj.has("viewProviders") {
                Some(meta_obj.get_opaque("viewProviders")?)
            } else {
                None
            },
            animations: if meta_obj.has("animations") {
                Some(meta_obj.get_opaque("animations")?)
            } else {
                None
            },
            relative_context_file_path: self.source_url.to_string(),
            i18n_use_external_ids: self.options.i18n_use_external_ids,
        })
    }

    /// Resolves the template text: the original external file recovered via
    /// source-mapping when possible, otherwise the quoted literal embedded in
    /// the declaration.
    fn get_template_info<TExpression: AstNode, H: AstHost<TExpression>>(
        &self,
        template_node: &AstValue<'_, TExpression, H>,
        is_inline: bool,
    ) -> Result<TemplateInfo, FatalLinkerError> {
        let range = template_node.get_range()?;

        if !is_inline {
            if let Some(external) = self.try_external_template(&range) {
                return Ok(external);
            }
        }

        self.template_from_partial_code(template_node, &range)
    }

    fn try_external_template(&self, range: &Range) -> Option<TemplateInfo> {
        let source_file = self.source_file?;
        let pos = source_file.get_original_location(range.start_line, range.start_col)?;

        // Only accept an original location that is an external template file:
        // a different file than the current one, not a host source file, and
        // covering the whole file from its very start.
        if pos.file == self.source_url
            || HOST_SOURCE_EXTENSION.is_match(&pos.file)
            || pos.line != 0
            || pos.column != 0
        {
            return None;
        }

        let contents = source_file.source_contents(&pos.file)?;
        Some(TemplateInfo {
            code: contents.to_string(),
            source_url: pos.file,
            range: Range {
                start_pos: 0,
                start_line: 0,
                start_col: 0,
                end_pos: contents.len(),
            },
            is_escaped: false,
        })
    }

    /// The template literal in the declaration must be wrapped in matching
    /// quotes; the effective range strips exactly one character on each side.
    fn template_from_partial_code<TExpression: AstNode, H: AstHost<TExpression>>(
        &self,
        template_node: &AstValue<'_, TExpression, H>,
        range: &Range,
    ) -> Result<TemplateInfo, FatalLinkerError> {
        let bytes = self.code.as_bytes();
        // The opening and closing quote must be two distinct characters.
        let quoted = range.start_pos + 2 <= range.end_pos
            && range.end_pos <= bytes.len()
            && matches!(bytes[range.start_pos], b'"' | b'\'' | b'`')
            && bytes[range.start_pos] == bytes[range.end_pos - 1];
        if !quoted {
            return Err(FatalLinkerError::from_node(
                template_node.host,
                &template_node.node,
                format!(
                    "Expected the template string to be wrapped in quotes but got: {}",
                    &self.code[range.start_pos.min(self.code.len())
                        ..range.end_pos.min(self.code.len())]
                ),
            ));
        }
        Ok(TemplateInfo {
            code: self.code.to_string(),
            source_url: self.source_url.to_string(),
            range: Range {
                start_pos: range.start_pos + 1,
                start_line: range.start_line,
                start_col: range.start_col + 1,
                end_pos: range.end_pos - 1,
            },
            is_escaped: true,
        })
    }
}

impl<'a, TExpression: AstNode, H: AstHost<TExpression>> PartialLinker<TExpression, H>
    for PartialComponentLinkerV1<'a>
{
    fn link_partial_declaration(
        &self,
        constant_pool: &mut ConstantPool,
        meta_obj: &AstObject<'_, TExpression, H>,
    ) -> Result<o::Expression, FatalLinkerError> {
        let meta = self.to_r3_component_meta(meta_obj)?;
        let def = compile_component_from_metadata(&meta, constant_pool);
        Ok(def.expression)
    }
}

fn string_array<TExpression: AstNode, H: AstHost<TExpression>>(
    obj: &AstObject<'_, TExpression, H>,
    key: &str,
) -> Result<Vec<String>, FatalLinkerError> {
    obj.get_array(key)?
        .iter()
        .map(|entry| entry.get_string())
        .collect()
}

/// Extracts the interpolation markers, defaulting to `{{`/`}}`.
fn parse_interpolation_config<TExpression: AstNode, H: AstHost<TExpression>>(
    meta_obj: &AstObject<'_, TExpression, H>,
) -> Result<InterpolationConfig, FatalLinkerError> {
    if !meta_obj.has("interpolation") {
        return Ok(default_interpolation_config());
    }

    let interpolation_expr = meta_obj.get_value("interpolation")?;
    let values = interpolation_expr
        .get_array()?
        .iter()
        .map(|entry| entry.get_string())
        .collect::<Result<Vec<_>, _>>()?;
    if values.len() != 2 {
        return Err(FatalLinkerError::from_node(
            interpolation_expr.host,
            &interpolation_expr.node,
            "Unsupported interpolation config, expected an array containing exactly two strings",
        ));
    }
    Ok(InterpolationConfig::new(
        values[0].clone(),
        values[1].clone(),
    ))
}

/// Determines the `ViewEncapsulation` mode from the value's symbol name.
fn parse_encapsulation<TExpression: AstNode, H: AstHost<TExpression>>(
    encapsulation: &AstValue<'_, TExpression, H>,
) -> Result<ViewEncapsulation, FatalLinkerError> {
    let symbol_name = encapsulation.get_symbol_name().ok_or_else(|| {
        FatalLinkerError::from_node(
            encapsulation.host,
            &encapsulation.node,
            "Expected encapsulation to have a symbol name",
        )
    })?;
    ViewEncapsulation::from_symbol_name(&symbol_name).ok_or_else(|| {
        FatalLinkerError::from_node(
            encapsulation.host,
            &encapsulation.node,
            "Unsupported encapsulation",
        )
    })
}

/// Determines the `ChangeDetectionStrategy` from the value's symbol name.
fn parse_change_detection_strategy<TExpression: AstNode, H: AstHost<TExpression>>(
    strategy: &AstValue<'_, TExpression, H>,
) -> Result<ChangeDetectionStrategy, FatalLinkerError> {
    let symbol_name = strategy.get_symbol_name().ok_or_else(|| {
        FatalLinkerError::from_node(
            strategy.host,
            &strategy.node,
            "Expected change detection strategy to have a symbol name",
        )
    })?;
    ChangeDetectionStrategy::from_symbol_name(&symbol_name).ok_or_else(|| {
        FatalLinkerError::from_node(
            strategy.host,
            &strategy.node,
            "Unsupported change detection strategy",
        )
    })
}

/// Extracts the type reference from a `forwardRef(() => T)` call. Returns
/// `None` when the expression is not a call at all; any call that deviates
/// from the exact `forwardRef` shape is a hard error.
fn extract_forward_ref<TExpression: AstNode, H: AstHost<TExpression>>(
    expr: &AstValue<'_, TExpression, H>,
) -> Result<Option<o::Expression>, FatalLinkerError> {
    if !expr.is_call_expression() {
        return Ok(None);
    }

    let callee = expr.get_callee()?;
    if callee.get_symbol_name().as_deref() != Some("forwardRef") {
        return Err(FatalLinkerError::from_node(
            callee.host,
            &callee.node,
            "Unsupported directive type, expected forwardRef or a type reference",
        ));
    }

    let args = expr.get_arguments()?;
    if args.len() != 1 {
        return Err(FatalLinkerError::from_node(
            expr.host,
            &expr.node,
            "Unsupported forwardRef call, expected a single argument",
        ));
    }

    let wrapper_fn = &args[0];
    if !wrapper_fn.is_function() {
        return Err(FatalLinkerError::from_node(
            wrapper_fn.host,
            &wrapper_fn.node,
            "Unsupported forwardRef call, expected a function argument",
        ));
    }
    if !wrapper_fn.get_function_parameters()?.is_empty() {
        return Err(FatalLinkerError::from_node(
            wrapper_fn.host,
            &wrapper_fn.node,
            "Unsupported forwardRef call, expected a function with no parameters",
        ));
    }

    Ok(Some(wrapper_fn.get_function_return_value()?.get_opaque()))
}
