//! Partial Linkers
//!
//! One linker implementation per declaration format version, selected by the
//! declaration's `minVersion` field. New format versions are supported by
//! registering a new implementation, never by changing an existing one.

pub mod partial_component_linker_1;
pub mod partial_linker;
pub mod partial_linker_selector;
