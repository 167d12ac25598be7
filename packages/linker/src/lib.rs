//! Partial declaration linker.
//!
//! Consumes the versioned `ɵɵngDeclareComponent()` metadata objects produced
//! by the declare-mode compiler and links them into full runtime definition
//! expressions. The host AST is abstracted behind `AstHost`, so the linker
//! can run over any expression tree the surrounding tooling provides.

pub mod ast;
pub mod ast_value;
pub mod error;
pub mod file_linker;
pub mod partial_linkers;
pub mod source_file;
