//! Output AST
//!
//! Corresponds to packages/compiler/src/output/output_ast.ts (subset needed
//! by definition emission and partial declarations).

use crate::parse_util::ParseSourceSpan;

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::String(value.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::String(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Number(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Bool(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub value: LiteralValue,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadVarExpr {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadPropExpr {
    pub receiver: Box<Expression>,
    pub name: String,
}

/// A symbol imported from a runtime module, e.g. `i0.ɵɵdefineComponent`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalReference {
    pub module_name: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalExpr {
    pub value: ExternalReference,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvokeFunctionExpr {
    pub fn_: Box<Expression>,
    pub args: Vec<Expression>,
    pub pure: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnParam {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowFunctionBody {
    Expression(Box<Expression>),
    Statements(Vec<Statement>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunctionExpr {
    pub params: Vec<FnParam>,
    pub body: ArrowFunctionBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub name: Option<String>,
    pub params: Vec<FnParam>,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralArrayExpr {
    pub entries: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralMapEntry {
    pub key: String,
    pub value: Box<Expression>,
    pub quoted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralMapExpr {
    pub entries: Vec<LiteralMapEntry>,
}

/// Source text captured verbatim from a host AST node. This is the opaque
/// passthrough variant: the linker never interprets it and the printer
/// re-emits it untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCodeExpr {
    pub code: String,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    ReadVar(ReadVarExpr),
    ReadProp(ReadPropExpr),
    Literal(LiteralExpr),
    LiteralArray(LiteralArrayExpr),
    LiteralMap(LiteralMapExpr),
    External(ExternalExpr),
    InvokeFn(InvokeFunctionExpr),
    ArrowFn(ArrowFunctionExpr),
    Fn(FunctionExpr),
    RawCode(RawCodeExpr),
}

impl Expression {
    /// Builds a property read on this expression.
    pub fn prop(self, name: impl Into<String>) -> Expression {
        Expression::ReadProp(ReadPropExpr {
            receiver: Box::new(self),
            name: name.into(),
        })
    }

    /// Builds a call of this expression with the given arguments.
    pub fn call_fn(self, args: Vec<Expression>) -> Expression {
        Expression::InvokeFn(InvokeFunctionExpr {
            fn_: Box::new(self),
            args,
            pure: false,
        })
    }

    pub fn source_span(&self) -> Option<&ParseSourceSpan> {
        match self {
            Expression::Literal(e) => e.source_span.as_ref(),
            Expression::RawCode(e) => e.source_span.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtModifier {
    None,
    Final,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclareVarStmt {
    pub name: String,
    pub value: Option<Box<Expression>>,
    pub modifiers: StmtModifier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    DeclareVar(DeclareVarStmt),
    Return(ReturnStatement),
}

pub fn literal(value: impl Into<LiteralValue>) -> Expression {
    Expression::Literal(LiteralExpr {
        value: value.into(),
        source_span: None,
    })
}

pub fn literal_with_span(
    value: impl Into<LiteralValue>,
    source_span: Option<ParseSourceSpan>,
) -> Expression {
    Expression::Literal(LiteralExpr {
        value: value.into(),
        source_span,
    })
}

pub fn literal_arr(entries: Vec<Expression>) -> Expression {
    Expression::LiteralArray(LiteralArrayExpr { entries })
}

pub fn literal_map(entries: Vec<LiteralMapEntry>) -> Expression {
    Expression::LiteralMap(LiteralMapExpr { entries })
}

pub fn variable(name: impl Into<String>) -> Expression {
    Expression::ReadVar(ReadVarExpr { name: name.into() })
}

pub fn import_expr(reference: ExternalReference) -> Expression {
    Expression::External(ExternalExpr { value: reference })
}

pub fn raw_code(code: impl Into<String>) -> Expression {
    Expression::RawCode(RawCodeExpr {
        code: code.into(),
        source_span: None,
    })
}
