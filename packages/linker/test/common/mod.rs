//! A minimal host AST used to exercise the linker without a real JavaScript
//! parser. Nodes carry just enough structure for the `AstHost` probes; string
//! literals additionally carry their range in the enclosing fixture code.

use partial_compiler::output::output_ast as o;
use partial_linker::ast::{AstHost, AstNode, Range};

#[derive(Debug, Clone, PartialEq)]
pub enum TestExpr {
    Str { value: String, range: Range },
    Num(f64),
    Bool(bool),
    Null,
    /// An identifier, possibly a dotted path like `i0.ViewEncapsulation.None`.
    Ident(String),
    Array(Vec<TestExpr>),
    Object(Vec<(String, TestExpr)>),
    Call { callee: Box<TestExpr>, args: Vec<TestExpr> },
    Function { params: Vec<TestExpr>, ret: Box<TestExpr> },
}

impl AstNode for TestExpr {}

pub fn str(value: &str) -> TestExpr {
    TestExpr::Str {
        value: value.to_string(),
        range: Range::default(),
    }
}

pub fn ident(name: &str) -> TestExpr {
    TestExpr::Ident(name.to_string())
}

pub fn obj(entries: Vec<(&str, TestExpr)>) -> TestExpr {
    TestExpr::Object(
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect(),
    )
}

pub fn forward_ref(target: &str) -> TestExpr {
    TestExpr::Call {
        callee: Box::new(ident("forwardRef")),
        args: vec![TestExpr::Function {
            params: vec![],
            ret: Box::new(ident(target)),
        }],
    }
}

#[derive(Debug, Default)]
pub struct TestHost;

impl TestHost {
    fn type_error(&self, expected: &str, node: &TestExpr) -> String {
        format!("Expected {expected} but got: {}", self.print_node(node))
    }
}

impl AstHost<TestExpr> for TestHost {
    fn get_symbol_name(&self, node: &TestExpr) -> Option<String> {
        match node {
            TestExpr::Ident(name) => {
                Some(name.rsplit('.').next().unwrap_or(name).to_string())
            }
            _ => None,
        }
    }

    fn is_string_literal(&self, node: &TestExpr) -> bool {
        matches!(node, TestExpr::Str { .. })
    }

    fn parse_string_literal(&self, node: &TestExpr) -> Result<String, String> {
        match node {
            TestExpr::Str { value, .. } => Ok(value.clone()),
            _ => Err(self.type_error("a string literal", node)),
        }
    }

    fn is_numeric_literal(&self, node: &TestExpr) -> bool {
        matches!(node, TestExpr::Num(_))
    }

    fn parse_numeric_literal(&self, node: &TestExpr) -> Result<f64, String> {
        match node {
            TestExpr::Num(value) => Ok(*value),
            _ => Err(self.type_error("a numeric literal", node)),
        }
    }

    fn is_boolean_literal(&self, node: &TestExpr) -> bool {
        matches!(node, TestExpr::Bool(_))
    }

    fn parse_boolean_literal(&self, node: &TestExpr) -> Result<bool, String> {
        match node {
            TestExpr::Bool(value) => Ok(*value),
            _ => Err(self.type_error("a boolean literal", node)),
        }
    }

    fn is_null(&self, node: &TestExpr) -> bool {
        matches!(node, TestExpr::Null)
    }

    fn is_array_literal(&self, node: &TestExpr) -> bool {
        matches!(node, TestExpr::Array(_))
    }

    fn parse_array_literal(&self, node: &TestExpr) -> Result<Vec<TestExpr>, String> {
        match node {
            TestExpr::Array(items) => Ok(items.clone()),
            _ => Err(self.type_error("an array literal", node)),
        }
    }

    fn is_object_literal(&self, node: &TestExpr) -> bool {
        matches!(node, TestExpr::Object(_))
    }

    fn parse_object_literal(&self, node: &TestExpr) -> Result<Vec<(String, TestExpr)>, String> {
        match node {
            TestExpr::Object(entries) => Ok(entries.clone()),
            _ => Err(self.type_error("an object literal", node)),
        }
    }

    fn is_function_expression(&self, node: &TestExpr) -> bool {
        matches!(node, TestExpr::Function { .. })
    }

    fn parse_return_value(&self, node: &TestExpr) -> Result<TestExpr, String> {
        match node {
            TestExpr::Function { ret, .. } => Ok((**ret).clone()),
            _ => Err(self.type_error("a function", node)),
        }
    }

    fn parse_parameters(&self, node: &TestExpr) -> Result<Vec<TestExpr>, String> {
        match node {
            TestExpr::Function { params, .. } => Ok(params.clone()),
            _ => Err(self.type_error("a function", node)),
        }
    }

    fn is_call_expression(&self, node: &TestExpr) -> bool {
        matches!(node, TestExpr::Call { .. })
    }

    fn parse_callee(&self, node: &TestExpr) -> Result<TestExpr, String> {
        match node {
            TestExpr::Call { callee, .. } => Ok((**callee).clone()),
            _ => Err(self.type_error("a call expression", node)),
        }
    }

    fn parse_arguments(&self, node: &TestExpr) -> Result<Vec<TestExpr>, String> {
        match node {
            TestExpr::Call { args, .. } => Ok(args.clone()),
            _ => Err(self.type_error("a call expression", node)),
        }
    }

    fn get_range(&self, node: &TestExpr) -> Result<Range, String> {
        match node {
            TestExpr::Str { range, .. } => Ok(*range),
            _ => Ok(Range::default()),
        }
    }

    fn print_node(&self, node: &TestExpr) -> String {
        match node {
            TestExpr::Str { value, .. } => format!("'{}'", escape_js(value)),
            TestExpr::Num(value) => {
                if value.fract() == 0.0 {
                    format!("{}", *value as i64)
                } else {
                    format!("{value}")
                }
            }
            TestExpr::Bool(value) => value.to_string(),
            TestExpr::Null => "null".to_string(),
            TestExpr::Ident(name) => name.clone(),
            TestExpr::Array(items) => {
                let items: Vec<String> = items.iter().map(|item| self.print_node(item)).collect();
                format!("[{}]", items.join(", "))
            }
            TestExpr::Object(entries) => {
                let entries: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, self.print_node(value)))
                    .collect();
                format!("{{ {} }}", entries.join(", "))
            }
            TestExpr::Call { callee, args } => {
                let args: Vec<String> = args.iter().map(|arg| self.print_node(arg)).collect();
                format!("{}({})", self.print_node(callee), args.join(", "))
            }
            TestExpr::Function { params, ret } => {
                let params: Vec<String> =
                    params.iter().map(|param| self.print_node(param)).collect();
                format!("({}) => {}", params.join(", "), self.print_node(ret))
            }
        }
    }
}

pub fn escape_js(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Builds a single-quoted template literal node plus the fixture "file" text
/// it points into, so quoted-literal extraction has real offsets to work
/// against.
pub fn template_literal(text: &str) -> (TestExpr, String) {
    let code = format!("'{}'", escape_js(text));
    let node = TestExpr::Str {
        value: text.to_string(),
        range: Range {
            start_pos: 0,
            start_line: 0,
            start_col: 0,
            end_pos: code.len(),
        },
    };
    (node, code)
}

/// Converts an emitted output expression back into a host AST node, the way a
/// generated file would be re-parsed before linking.
pub fn from_output(expr: &o::Expression) -> TestExpr {
    match expr {
        o::Expression::Literal(lit) => match &lit.value {
            o::LiteralValue::String(value) => str(value),
            o::LiteralValue::Number(value) => TestExpr::Num(*value),
            o::LiteralValue::Bool(value) => TestExpr::Bool(*value),
            o::LiteralValue::Null => TestExpr::Null,
        },
        o::Expression::LiteralArray(array) => {
            TestExpr::Array(array.entries.iter().map(from_output).collect())
        }
        o::Expression::LiteralMap(map) => TestExpr::Object(
            map.entries
                .iter()
                .map(|entry| (entry.key.clone(), from_output(&entry.value)))
                .collect(),
        ),
        o::Expression::ReadVar(var) => ident(&var.name),
        o::Expression::ReadProp(prop) => {
            let receiver = from_output(&prop.receiver);
            match receiver {
                TestExpr::Ident(path) => ident(&format!("{}.{}", path, prop.name)),
                other => TestExpr::Call {
                    callee: Box::new(other),
                    args: vec![],
                },
            }
        }
        o::Expression::External(external) => match &external.value.name {
            Some(name) => ident(&format!("i0.{name}")),
            None => ident("i0"),
        },
        o::Expression::InvokeFn(call) => TestExpr::Call {
            callee: Box::new(from_output(&call.fn_)),
            args: call.args.iter().map(from_output).collect(),
        },
        o::Expression::ArrowFn(arrow) => match &arrow.body {
            o::ArrowFunctionBody::Expression(body) => TestExpr::Function {
                params: vec![],
                ret: Box::new(from_output(body)),
            },
            o::ArrowFunctionBody::Statements(_) => TestExpr::Null,
        },
        o::Expression::Fn(function) => {
            let ret = function.statements.iter().find_map(|stmt| match stmt {
                o::Statement::Return(ret) => Some(from_output(&ret.value)),
                _ => None,
            });
            TestExpr::Function {
                params: vec![],
                ret: Box::new(ret.unwrap_or(TestExpr::Null)),
            }
        }
        o::Expression::RawCode(raw) => ident(&raw.code),
    }
}

/// Converts an emitted `i0.ɵɵngDeclareComponent({...})` expression into a
/// linkable host node plus fixture code, patching the template literal's
/// range to point at the fixture text.
pub fn declaration_fixture(declared: &o::Expression) -> (TestExpr, String) {
    let map = match declared {
        o::Expression::InvokeFn(call) => match &call.args[0] {
            o::Expression::LiteralMap(map) => map,
            other => panic!("expected a metadata object argument, got {other:?}"),
        },
        other => panic!("expected a declaration call, got {other:?}"),
    };

    let mut code = String::new();
    let entries = map
        .entries
        .iter()
        .map(|entry| {
            let value = if entry.key == "template" {
                match entry.value.as_ref() {
                    o::Expression::Literal(o::LiteralExpr {
                        value: o::LiteralValue::String(text),
                        ..
                    }) => {
                        let (node, fixture_code) = template_literal(text);
                        code = fixture_code;
                        node
                    }
                    other => from_output(other),
                }
            } else {
                from_output(&entry.value)
            };
            (entry.key.clone(), value)
        })
        .collect();

    (TestExpr::Object(entries), code)
}
