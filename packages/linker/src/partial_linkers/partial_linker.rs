use partial_compiler::constant_pool::ConstantPool;
use partial_compiler::output::output_ast as o;

use crate::ast::{AstHost, AstNode};
use crate::ast_value::AstObject;
use crate::error::FatalLinkerError;

/// Trait implemented by every version-specific partial linker.
pub trait PartialLinker<TExpression: AstNode, H: AstHost<TExpression>> {
    /// Links a partial declaration metadata object to a full definition
    /// expression. Shared constants are interned into `constant_pool`.
    fn link_partial_declaration(
        &self,
        constant_pool: &mut ConstantPool,
        meta_obj: &AstObject<'_, TExpression, H>,
    ) -> Result<o::Expression, FatalLinkerError>;
}
