//! Constant Pool
//!
//! Corresponds to packages/compiler/src/constant_pool.ts.
//!
//! The pool reuses identical literals between definitions: the second time a
//! literal is requested it is hoisted into a shared `_c<N>` constant and both
//! call sites read the variable instead.

use crate::output::output_ast as o;
use crate::output::printer::emit_expression;
use std::collections::HashMap;

const CONSTANT_PREFIX: &str = "_c";

/// Strings shorter than this are cheaper inline than pooled.
const POOL_INCLUSION_LENGTH_THRESHOLD_FOR_STRINGS: usize = 50;

#[derive(Debug, Clone)]
struct FixupExpression {
    resolved: o::Expression,
    shared: bool,
}

#[derive(Debug, Default)]
pub struct ConstantPool {
    pub statements: Vec<o::Statement>,
    literals: HashMap<String, FixupExpression>,
    next_name_index: u32,
}

impl ConstantPool {
    pub fn new() -> Self {
        ConstantPool {
            statements: Vec::new(),
            literals: HashMap::new(),
            next_name_index: 0,
        }
    }

    pub fn get_const_literal(&mut self, literal: o::Expression, force_shared: bool) -> o::Expression {
        if self.is_simple_literal(&literal) && !force_shared {
            return literal;
        }

        let key = emit_expression(&literal);

        if let Some(fixup) = self.literals.get(&key) {
            if fixup.shared {
                return fixup.resolved.clone();
            }
            // Seen before but not yet shared: hoist it now.
            let name = self.fresh_name();
            self.statements.push(o::Statement::DeclareVar(o::DeclareVarStmt {
                name: name.clone(),
                value: Some(Box::new(literal)),
                modifiers: o::StmtModifier::Final,
            }));
            let resolved = o::variable(name);
            self.literals.insert(
                key,
                FixupExpression {
                    resolved: resolved.clone(),
                    shared: true,
                },
            );
            return resolved;
        }

        if force_shared {
            let name = self.fresh_name();
            self.statements.push(o::Statement::DeclareVar(o::DeclareVarStmt {
                name: name.clone(),
                value: Some(Box::new(literal)),
                modifiers: o::StmtModifier::Final,
            }));
            let resolved = o::variable(name);
            self.literals.insert(
                key,
                FixupExpression {
                    resolved: resolved.clone(),
                    shared: true,
                },
            );
            return resolved;
        }

        self.literals.insert(
            key,
            FixupExpression {
                resolved: literal.clone(),
                shared: false,
            },
        );
        literal
    }

    fn is_simple_literal(&self, expr: &o::Expression) -> bool {
        match expr {
            o::Expression::Literal(lit) => match &lit.value {
                o::LiteralValue::String(s) => {
                    s.len() < POOL_INCLUSION_LENGTH_THRESHOLD_FOR_STRINGS
                }
                _ => true,
            },
            _ => false,
        }
    }

    fn fresh_name(&mut self) -> String {
        let name = format!("{}{}", CONSTANT_PREFIX, self.next_name_index);
        self.next_name_index += 1;
        name
    }
}
