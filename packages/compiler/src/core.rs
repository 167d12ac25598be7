//! Core Enums
//!
//! Corresponds to packages/compiler/src/core.ts (subset used by the
//! declare emitter and the partial linker).

/// Strategy used to encapsulate a component's styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewEncapsulation {
    #[default]
    Emulated,
    None,
    ShadowDom,
}

impl ViewEncapsulation {
    /// Resolves an enum member from its symbol name, e.g. `"ShadowDom"`.
    pub fn from_symbol_name(name: &str) -> Option<Self> {
        match name {
            "Emulated" => Some(ViewEncapsulation::Emulated),
            "None" => Some(ViewEncapsulation::None),
            "ShadowDom" => Some(ViewEncapsulation::ShadowDom),
            _ => None,
        }
    }

    pub fn symbol_name(&self) -> &'static str {
        match self {
            ViewEncapsulation::Emulated => "Emulated",
            ViewEncapsulation::None => "None",
            ViewEncapsulation::ShadowDom => "ShadowDom",
        }
    }

    /// The numeric value baked into fully compiled definitions.
    pub fn runtime_value(&self) -> f64 {
        match self {
            ViewEncapsulation::Emulated => 0.0,
            ViewEncapsulation::None => 2.0,
            ViewEncapsulation::ShadowDom => 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeDetectionStrategy {
    OnPush,
    #[default]
    Default,
}

impl ChangeDetectionStrategy {
    pub fn from_symbol_name(name: &str) -> Option<Self> {
        match name {
            "OnPush" => Some(ChangeDetectionStrategy::OnPush),
            "Default" => Some(ChangeDetectionStrategy::Default),
            _ => None,
        }
    }

    pub fn symbol_name(&self) -> &'static str {
        match self {
            ChangeDetectionStrategy::OnPush => "OnPush",
            ChangeDetectionStrategy::Default => "Default",
        }
    }

    pub fn runtime_value(&self) -> f64 {
        match self {
            ChangeDetectionStrategy::OnPush => 0.0,
            ChangeDetectionStrategy::Default => 1.0,
        }
    }
}
