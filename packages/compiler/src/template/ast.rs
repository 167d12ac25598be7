//! Template AST
//!
//! A render3-style template AST: the nodes the declare emitter and the
//! linker exchange after parsing a component template.

use crate::parse_util::ParseSourceSpan;

#[derive(Debug, Clone, PartialEq)]
pub enum TmplAstNode {
    Element(TmplAstElement),
    Text(TmplAstText),
    BoundText(TmplAstBoundText),
    Content(TmplAstContent),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TmplAstElement {
    pub name: String,
    pub attributes: Vec<TmplAstTextAttribute>,
    pub children: Vec<TmplAstNode>,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TmplAstTextAttribute {
    pub name: String,
    pub value: String,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TmplAstText {
    pub value: String,
    pub source_span: ParseSourceSpan,
}

/// A text run containing one interpolated expression, e.g. `{{ title }}`.
#[derive(Debug, Clone, PartialEq)]
pub struct TmplAstBoundText {
    pub value: String,
    pub source_span: ParseSourceSpan,
}

/// An `<ng-content>` content-projection slot.
#[derive(Debug, Clone, PartialEq)]
pub struct TmplAstContent {
    pub selector: String,
    pub source_span: ParseSourceSpan,
}

impl TmplAstNode {
    pub fn source_span(&self) -> &ParseSourceSpan {
        match self {
            TmplAstNode::Element(n) => &n.source_span,
            TmplAstNode::Text(n) => &n.source_span,
            TmplAstNode::BoundText(n) => &n.source_span,
            TmplAstNode::Content(n) => &n.source_span,
        }
    }
}
