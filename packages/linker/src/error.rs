//! Linker Errors

use thiserror::Error;

use crate::ast::{AstHost, AstNode, Range};

/// An error that occurred during linking, fatal to the declaration being
/// linked but never to the rest of the batch. Carries the printed form of the
/// offending node and, when the host can provide one, its source range.
#[derive(Debug, Clone, Error)]
#[error("{message} (in `{node}`)")]
pub struct FatalLinkerError {
    pub message: String,
    pub node: String,
    pub range: Option<Range>,
}

impl FatalLinkerError {
    pub fn new(node: impl Into<String>, message: impl Into<String>) -> Self {
        FatalLinkerError {
            message: message.into(),
            node: node.into(),
            range: None,
        }
    }

    /// Builds an error with node context captured through the host.
    pub fn from_node<TExpression: AstNode, H: AstHost<TExpression>>(
        host: &H,
        node: &TExpression,
        message: impl Into<String>,
    ) -> Self {
        FatalLinkerError {
            message: message.into(),
            node: host.print_node(node),
            range: host.get_range(node).ok(),
        }
    }
}
