//! Typed AST Value Accessors
//!
//! `AstValue` and `AstObject` wrap an opaque host expression node and expose
//! typed extraction. Every accessor that can fail returns a
//! `FatalLinkerError` carrying the printed node and its source range, so
//! callers never have to reconstruct error context.

use indexmap::IndexMap;

use partial_compiler::output::output_ast as o;

use crate::ast::{AstHost, AstNode, Range};
use crate::error::FatalLinkerError;

/// A typed, read-only view over a single host expression node.
pub struct AstValue<'a, TExpression: AstNode, H: AstHost<TExpression>> {
    pub node: TExpression,
    pub host: &'a H,
}

impl<'a, TExpression: AstNode, H: AstHost<TExpression>> Clone for AstValue<'a, TExpression, H> {
    fn clone(&self) -> Self {
        AstValue {
            node: self.node.clone(),
            host: self.host,
        }
    }
}

impl<'a, TExpression: AstNode, H: AstHost<TExpression>> AstValue<'a, TExpression, H> {
    pub fn new(node: TExpression, host: &'a H) -> Self {
        AstValue { node, host }
    }

    fn upgrade(&self, message: String) -> FatalLinkerError {
        FatalLinkerError::from_node(self.host, &self.node, message)
    }

    /// The name of the symbol this node refers to, or `None` if it is not a
    /// symbol.
    pub fn get_symbol_name(&self) -> Option<String> {
        self.host.get_symbol_name(&self.node)
    }

    pub fn is_string(&self) -> bool {
        self.host.is_string_literal(&self.node)
    }

    pub fn get_string(&self) -> Result<String, FatalLinkerError> {
        self.host
            .parse_string_literal(&self.node)
            .map_err(|msg| self.upgrade(msg))
    }

    pub fn is_number(&self) -> bool {
        self.host.is_numeric_literal(&self.node)
    }

    pub fn get_number(&self) -> Result<f64, FatalLinkerError> {
        self.host
            .parse_numeric_literal(&self.node)
            .map_err(|msg| self.upgrade(msg))
    }

    pub fn is_boolean(&self) -> bool {
        self.host.is_boolean_literal(&self.node)
    }

    pub fn get_boolean(&self) -> Result<bool, FatalLinkerError> {
        self.host
            .parse_boolean_literal(&self.node)
            .map_err(|msg| self.upgrade(msg))
    }

    pub fn is_null(&self) -> bool {
        self.host.is_null(&self.node)
    }

    pub fn is_array(&self) -> bool {
        self.host.is_array_literal(&self.node)
    }

    pub fn get_array(&self) -> Result<Vec<AstValue<'a, TExpression, H>>, FatalLinkerError> {
        let items = self
            .host
            .parse_array_literal(&self.node)
            .map_err(|msg| self.upgrade(msg))?;
        Ok(items
            .into_iter()
            .map(|node| AstValue::new(node, self.host))
            .collect())
    }

    pub fn is_object(&self) -> bool {
        self.host.is_object_literal(&self.node)
    }

    pub fn get_object(&self) -> Result<AstObject<'a, TExpression, H>, FatalLinkerError> {
        let entries = self
            .host
            .parse_object_literal(&self.node)
            .map_err(|msg| self.upgrade(msg))?;
        Ok(AstObject {
            entries: entries.into_iter().collect(),
            node: self.node.clone(),
            host: self.host,
        })
    }

    pub fn is_function(&self) -> bool {
        self.host.is_function_expression(&self.node)
    }

    /// The value a function expression evaluates to: the expression of its
    /// single `return` statement.
    pub fn get_function_return_value(&self) -> Result<AstValue<'a, TExpression, H>, FatalLinkerError> {
        let ret = self
            .host
            .parse_return_value(&self.node)
            .map_err(|msg| self.upgrade(msg))?;
        Ok(AstValue::new(ret, self.host))
    }

    pub fn get_function_parameters(
        &self,
    ) -> Result<Vec<AstValue<'a, TExpression, H>>, FatalLinkerError> {
        let params = self
            .host
            .parse_parameters(&self.node)
            .map_err(|msg| self.upgrade(msg))?;
        Ok(params
            .into_iter()
            .map(|node| AstValue::new(node, self.host))
            .collect())
    }

    pub fn is_call_expression(&self) -> bool {
        self.host.is_call_expression(&self.node)
    }

    pub fn get_callee(&self) -> Result<AstValue<'a, TExpression, H>, FatalLinkerError> {
        let callee = self
            .host
            .parse_callee(&self.node)
            .map_err(|msg| self.upgrade(msg))?;
        Ok(AstValue::new(callee, self.host))
    }

    pub fn get_arguments(&self) -> Result<Vec<AstValue<'a, TExpression, H>>, FatalLinkerError> {
        let args = self
            .host
            .parse_arguments(&self.node)
            .map_err(|msg| self.upgrade(msg))?;
        Ok(args
            .into_iter()
            .map(|node| AstValue::new(node, self.host))
            .collect())
    }

    pub fn get_range(&self) -> Result<Range, FatalLinkerError> {
        self.host
            .get_range(&self.node)
            .map_err(|msg| self.upgrade(msg))
    }

    /// Passes the node through untouched, as verbatim source text to be
    /// re-emitted by the printer.
    pub fn get_opaque(&self) -> o::Expression {
        o::Expression::RawCode(o::RawCodeExpr {
            code: self.host.print_node(&self.node),
            source_span: None,
        })
    }

    pub fn print(&self) -> String {
        self.host.print_node(&self.node)
    }
}

/// A typed view over an object-literal host node. Entries keep source order.
pub struct AstObject<'a, TExpression: AstNode, H: AstHost<TExpression>> {
    entries: IndexMap<String, TExpression>,
    node: TExpression,
    pub host: &'a H,
}

impl<'a, TExpression: AstNode, H: AstHost<TExpression>> AstObject<'a, TExpression, H> {
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get_value(&self, key: &str) -> Result<AstValue<'a, TExpression, H>, FatalLinkerError> {
        match self.entries.get(key) {
            Some(node) => Ok(AstValue::new(node.clone(), self.host)),
            None => Err(FatalLinkerError::from_node(
                self.host,
                &self.node,
                format!("Expected property '{key}' to be present"),
            )),
        }
    }

    pub fn get_string(&self, key: &str) -> Result<String, FatalLinkerError> {
        self.get_value(key)?.get_string()
    }

    pub fn get_boolean(&self, key: &str) -> Result<bool, FatalLinkerError> {
        self.get_value(key)?.get_boolean()
    }

    pub fn get_number(&self, key: &str) -> Result<f64, FatalLinkerError> {
        self.get_value(key)?.get_number()
    }

    pub fn get_array(
        &self,
        key: &str,
    ) -> Result<Vec<AstValue<'a, TExpression, H>>, FatalLinkerError> {
        self.get_value(key)?.get_array()
    }

    pub fn get_object(&self, key: &str) -> Result<AstObject<'a, TExpression, H>, FatalLinkerError> {
        self.get_value(key)?.get_object()
    }

    /// The named property as an opaque passthrough expression.
    pub fn get_opaque(&self, key: &str) -> Result<o::Expression, FatalLinkerError> {
        Ok(self.get_value(key)?.get_opaque())
    }

    /// Maps each entry through `mapper`, preserving source order.
    pub fn to_map<U, F>(&self, mut mapper: F) -> Result<IndexMap<String, U>, FatalLinkerError>
    where
        F: FnMut(AstValue<'a, TExpression, H>) -> Result<U, FatalLinkerError>,
    {
        self.entries
            .iter()
            .map(|(key, node)| {
                let value = mapper(AstValue::new(node.clone(), self.host))?;
                Ok((key.clone(), value))
            })
            .collect()
    }
}
