//! Render3 View Utilities
//!
//! Corresponds to packages/compiler/src/render3/view/util.ts (subset).

use crate::output::output_ast::{Expression, LiteralMapEntry, LiteralMapExpr};

/// A representation for an object literal used during codegen of definition
/// objects. Insertion order determines emitted field order.
#[derive(Debug, Clone, Default)]
pub struct DefinitionMap {
    pub values: Vec<DefinitionMapEntry>,
}

#[derive(Debug, Clone)]
pub struct DefinitionMapEntry {
    pub key: String,
    pub quoted: bool,
    pub value: Expression,
}

impl DefinitionMap {
    pub fn new() -> Self {
        DefinitionMap { values: vec![] }
    }

    /// Records a field; `None` means the field is omitted entirely.
    pub fn set(&mut self, key: &str, value: Option<Expression>) {
        if let Some(val) = value {
            if let Some(existing) = self.values.iter_mut().find(|v| v.key == key) {
                existing.value = val;
            } else {
                self.values.push(DefinitionMapEntry {
                    key: key.to_string(),
                    value: val,
                    quoted: false,
                });
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Expression> {
        self.values.iter().find(|v| v.key == key).map(|v| &v.value)
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.iter().any(|v| v.key == key)
    }

    pub fn to_literal_map(&self) -> LiteralMapExpr {
        let entries: Vec<LiteralMapEntry> = self
            .values
            .iter()
            .map(|entry| LiteralMapEntry {
                key: entry.key.clone(),
                value: Box::new(entry.value.clone()),
                quoted: entry.quoted,
            })
            .collect();
        LiteralMapExpr { entries }
    }
}
