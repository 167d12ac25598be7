//! FileLinker Implementation
//!
//! Orchestrates linking for a single generated file: recognizes partial
//! declaration calls, selects the version-appropriate linker, and links each
//! declaration with its own constant pool. Declarations are independent, so
//! the batch entry point fans them out across worker threads.

use rayon::prelude::*;

use partial_compiler::constant_pool::ConstantPool;
use partial_compiler::output::output_ast as o;

use crate::ast::{AstHost, AstNode};
use crate::ast_value::AstValue;
use crate::error::FatalLinkerError;
use crate::partial_linkers::partial_linker_selector::PartialLinkerSelector;
use crate::source_file::SourceFile;

/// Options controlling how declarations are linked.
#[derive(Debug, Clone)]
pub struct LinkerOptions {
    /// Normalize `\r\n` to `\n` inside ICU messages of external templates.
    pub i18n_normalize_line_endings_in_icus: bool,
    /// Render legacy message ids alongside the current format.
    pub enable_i18n_legacy_message_id_format: bool,
    /// Use externally provided ids for i18n messages.
    pub i18n_use_external_ids: bool,
}

impl Default for LinkerOptions {
    fn default() -> Self {
        LinkerOptions {
            i18n_normalize_line_endings_in_icus: false,
            enable_i18n_legacy_message_id_format: true,
            i18n_use_external_ids: false,
        }
    }
}

/// One partial declaration call found in the file: the callee name plus its
/// argument expressions.
#[derive(Debug, Clone)]
pub struct DeclarationCall<TExpression> {
    pub name: String,
    pub args: Vec<TExpression>,
}

/// The product of linking one declaration: the definition expression plus the
/// constant statements its pool accumulated.
#[derive(Debug, Clone)]
pub struct LinkedDefinition {
    pub expression: o::Expression,
    pub constant_statements: Vec<o::Statement>,
}

pub struct FileLinker<'a, TExpression: AstNode, H: AstHost<TExpression>> {
    host: &'a H,
    options: LinkerOptions,
    source_url: String,
    code: String,
    source_file: Option<SourceFile>,
    _expression: std::marker::PhantomData<TExpression>,
}

impl<'a, TExpression: AstNode, H: AstHost<TExpression>> FileLinker<'a, TExpression, H> {
    pub fn new(
        host: &'a H,
        options: LinkerOptions,
        source_url: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        FileLinker {
            host,
            options,
            source_url: source_url.into(),
            code: code.into(),
            source_file: None,
            _expression: std::marker::PhantomData,
        }
    }

    /// Attaches the decoded source map of the file being linked, enabling
    /// external-template recovery.
    pub fn set_source_file(&mut self, source_file: SourceFile) {
        self.source_file = Some(source_file);
    }

    /// Returns true if a call to `name` is a partial declaration this linker
    /// can process.
    pub fn is_partial_declaration(&self, name: &str) -> bool {
        self.selector().supports_declaration(name)
    }

    /// Links a single partial declaration call. The metadata object is the
    /// call's first argument; its `minVersion` field selects the linker
    /// implementation.
    pub fn link_partial_declaration(
        &self,
        name: &str,
        args: &[TExpression],
    ) -> Result<LinkedDefinition, FatalLinkerError> {
        let meta_node = args.first().ok_or_else(|| {
            FatalLinkerError::new(
                format!("{name}()"),
                "Expected the declaration to have a metadata object argument",
            )
        })?;
        let meta_obj = AstValue::new(meta_node.clone(), self.host).get_object()?;
        let min_version = meta_obj.get_string("minVersion")?;

        let selector = self.selector();
        let linker = selector
            .get_linker(name, &min_version)
            .map_err(|msg| FatalLinkerError::from_node(self.host, meta_node, msg))?;

        let mut constant_pool = ConstantPool::new();
        let expression = linker.link_partial_declaration(&mut constant_pool, &meta_obj)?;
        Ok(LinkedDefinition {
            expression,
            constant_statements: constant_pool.statements,
        })
    }

    /// Links every declaration of a compilation unit. Declarations share no
    /// mutable state, so they are processed in parallel; one failing
    /// declaration never aborts its siblings.
    pub fn link_declarations(
        &self,
        calls: &[DeclarationCall<TExpression>],
    ) -> Vec<Result<LinkedDefinition, FatalLinkerError>>
    where
        TExpression: Send + Sync,
        H: Sync,
    {
        calls
            .par_iter()
            .map(|call| self.link_partial_declaration(&call.name, &call.args))
            .collect()
    }

    fn selector(&self) -> PartialLinkerSelector<'_, TExpression, H> {
        PartialLinkerSelector::new(
            &self.options,
            &self.source_url,
            &self.code,
            self.source_file.as_ref(),
        )
    }
}
