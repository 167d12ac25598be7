//! Render3 Partial Compilation Utilities
//!
//! Corresponds to packages/compiler/src/render3/partial/util.ts (subset).

use indexmap::IndexMap;

use crate::output::output_ast::{Expression, LiteralMapEntry, literal_arr, literal_map};

/// Creates an array literal from the given values, mapping each through
/// `mapper`. Returns `None` when the input is empty: empty lists are omitted
/// from definition maps, never emitted as `[]`.
pub fn to_optional_literal_array<T, F>(values: &[T], mapper: F) -> Option<Expression>
where
    F: Fn(&T) -> Expression,
{
    if values.is_empty() {
        return None;
    }
    Some(literal_arr(values.iter().map(mapper).collect()))
}

/// Creates an object literal from the given map, mapping each value through
/// `mapper`. Returns `None` when the map is empty.
pub fn to_optional_literal_map<T, F>(object: &IndexMap<String, T>, mapper: F) -> Option<Expression>
where
    F: Fn(&T) -> Expression,
{
    if object.is_empty() {
        return None;
    }
    let entries: Vec<LiteralMapEntry> = object
        .iter()
        .map(|(key, value)| LiteralMapEntry {
            key: key.clone(),
            value: Box::new(mapper(value)),
            quoted: true,
        })
        .collect();
    Some(literal_map(entries))
}
