//! The whole-program symbolic summary (C1).

use std::collections::BTreeMap;

use serde_json::{json, Value as Json};

use super::function::SymbolicFunction;

/// The root of the serialized output: every function the driver visited,
/// keyed by qualified name.
///
/// A [`BTreeMap`] is used rather than a [`std::collections::HashMap`] so
/// that [`SymbolicProgram::to_json`] emits functions in a single
/// deterministic (lexicographic) order with no separate sort step, which is
/// what the determinism and round-trip properties in spec §8 require.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolicProgram {
    pub functions: BTreeMap<String, SymbolicFunction>,
}

impl SymbolicProgram {
    pub fn new() -> Self {
        SymbolicProgram::default()
    }

    pub fn insert(&mut self, function: SymbolicFunction) {
        self.functions.entry(function.name.clone()).or_insert(function);
    }

    pub fn to_json(&self) -> Json {
        json!({
            "functions": self
                .functions
                .values()
                .map(SymbolicFunction::to_json)
                .collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_seen_on_duplicate_name() {
        let mut program = SymbolicProgram::new();
        let mut first = SymbolicFunction::new("talker_main", "a.rs:1:1");
        first.relevant = true;
        let second = SymbolicFunction::new("talker_main", "b.rs:1:1");
        program.insert(first);
        program.insert(second);
        assert!(program.functions["talker_main"].relevant);
    }

    #[test]
    fn serialization_order_is_lexicographic() {
        let mut program = SymbolicProgram::new();
        program.insert(SymbolicFunction::new("zeta", "z.rs:1:1"));
        program.insert(SymbolicFunction::new("alpha", "a.rs:1:1"));
        let j = program.to_json();
        let names: Vec<_> = j["functions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
