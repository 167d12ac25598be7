//! Output Printer
//!
//! A compact emitter that turns output AST nodes into deterministic
//! JavaScript-shaped source text. The partial declaration emitter relies on
//! this when serializing definition maps into generated files; tests use it
//! to assert on emitted shapes.

use super::output_ast::{
    ArrowFunctionBody, Expression, LiteralValue, Statement, StmtModifier,
};

/// The local alias every emitted file uses for the runtime module import.
const RUNTIME_ALIAS: &str = "i0";

pub fn emit_expression(expr: &Expression) -> String {
    match expr {
        Expression::ReadVar(e) => e.name.clone(),
        Expression::ReadProp(e) => format!("{}.{}", emit_expression(&e.receiver), e.name),
        Expression::Literal(e) => emit_literal_value(&e.value),
        Expression::LiteralArray(e) => {
            let entries: Vec<String> = e.entries.iter().map(emit_expression).collect();
            format!("[{}]", entries.join(", "))
        }
        Expression::LiteralMap(e) => {
            if e.entries.is_empty() {
                return "{}".to_string();
            }
            let entries: Vec<String> = e
                .entries
                .iter()
                .map(|entry| {
                    let key = if entry.quoted {
                        format!("\"{}\"", escape_string(&entry.key))
                    } else {
                        entry.key.clone()
                    };
                    format!("{}: {}", key, emit_expression(&entry.value))
                })
                .collect();
            format!("{{ {} }}", entries.join(", "))
        }
        Expression::External(e) => match (&e.value.module_name, &e.value.name) {
            (Some(_), Some(name)) => format!("{}.{}", RUNTIME_ALIAS, name),
            (Some(_), None) => RUNTIME_ALIAS.to_string(),
            (None, Some(name)) => name.clone(),
            (None, None) => RUNTIME_ALIAS.to_string(),
        },
        Expression::InvokeFn(e) => {
            let args: Vec<String> = e.args.iter().map(emit_expression).collect();
            format!("{}({})", emit_expression(&e.fn_), args.join(", "))
        }
        Expression::ArrowFn(e) => {
            let params: Vec<String> = e.params.iter().map(|p| p.name.clone()).collect();
            match &e.body {
                ArrowFunctionBody::Expression(body) => {
                    format!("({}) => {}", params.join(", "), emit_expression(body))
                }
                ArrowFunctionBody::Statements(stmts) => {
                    format!("({}) => {{ {} }}", params.join(", "), emit_statements(stmts))
                }
            }
        }
        Expression::Fn(e) => {
            let params: Vec<String> = e.params.iter().map(|p| p.name.clone()).collect();
            let name = e.name.as_deref().unwrap_or("");
            let sep = if name.is_empty() { "" } else { " " };
            format!(
                "function{}{}({}) {{ {} }}",
                sep,
                name,
                params.join(", "),
                emit_statements(&e.statements)
            )
        }
        Expression::RawCode(e) => e.code.clone(),
    }
}

pub fn emit_statement(stmt: &Statement) -> String {
    match stmt {
        Statement::DeclareVar(s) => {
            let keyword = match s.modifiers {
                StmtModifier::Final => "const",
                StmtModifier::None => "var",
            };
            match &s.value {
                Some(value) => format!("{} {} = {};", keyword, s.name, emit_expression(value)),
                None => format!("{} {};", keyword, s.name),
            }
        }
        Statement::Return(s) => format!("return {};", emit_expression(&s.value)),
    }
}

fn emit_statements(stmts: &[Statement]) -> String {
    stmts
        .iter()
        .map(emit_statement)
        .collect::<Vec<_>>()
        .join(" ")
}

fn emit_literal_value(value: &LiteralValue) -> String {
    match value {
        LiteralValue::String(s) => format!("\"{}\"", escape_string(s)),
        LiteralValue::Number(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        LiteralValue::Bool(b) => b.to_string(),
        LiteralValue::Null => "null".to_string(),
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}
