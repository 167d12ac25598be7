//! Render3 Utilities
//!
//! Corresponds to packages/compiler/src/render3/util.ts (subset).

use super::r3_identifiers::Identifiers;
use crate::output::output_ast::{
    ArrowFunctionBody, ArrowFunctionExpr, Expression, Statement, import_expr,
};

/// Reference to a type, used both as a runtime value and in type positions.
#[derive(Debug, Clone, PartialEq)]
pub struct R3Reference {
    pub value: Expression,
    pub type_expr: Expression,
}

impl R3Reference {
    pub fn new(value: Expression, type_expr: Expression) -> Self {
        R3Reference { value, type_expr }
    }

    /// A reference whose value and type positions are the same expression.
    pub fn plain(expr: Expression) -> Self {
        R3Reference {
            value: expr.clone(),
            type_expr: expr,
        }
    }
}

/// Result of compiling a render3 code unit.
#[derive(Debug, Clone)]
pub struct R3CompiledExpression {
    pub expression: Expression,
    pub statements: Vec<Statement>,
}

impl R3CompiledExpression {
    pub fn new(expression: Expression, statements: Vec<Statement>) -> Self {
        R3CompiledExpression {
            expression,
            statements,
        }
    }
}

/// Wraps `expr` in the lazy-resolution form:
/// ```ts
/// forwardRef(() => expr)
/// ```
pub fn generate_forward_ref(expr: Expression) -> Expression {
    let arrow_fn = Expression::ArrowFn(ArrowFunctionExpr {
        params: vec![],
        body: ArrowFunctionBody::Expression(Box::new(expr)),
    });
    import_expr(Identifiers::forward_ref()).call_fn(vec![arrow_fn])
}
