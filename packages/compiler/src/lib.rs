//! Declare-mode component compiler core.
//!
//! Hosts the output AST, the template parser, and the partial (declare)
//! emitter that serializes resolved component metadata into the versioned
//! `ɵɵngDeclareComponent()` literal form that the linker package consumes.

pub mod constant_pool;
pub mod core;
pub mod ml_parser;
pub mod output;
pub mod parse_util;
pub mod render3;
pub mod template;
