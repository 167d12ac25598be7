//! Render3 Partial Compilation
//!
//! Corresponds to packages/compiler/src/render3/partial (component subset):
//! serializes resolved component metadata back into the versioned
//! `ɵɵngDeclareComponent()` partial-declaration form.

pub mod component;
pub mod util;

/// The earliest linker format version able to consume declarations emitted
/// by this compiler.
pub const MINIMUM_PARTIAL_LINKER_VERSION: &str = "12.0.0";

/// The version recorded in emitted declarations.
pub const COMPILER_VERSION: &str = env!("CARGO_PKG_VERSION");
