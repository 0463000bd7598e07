//! The transition relation of a nondeterministic machine.

use crate::types::{Direction, Transition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single row of the transition relation, as found in definition files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRow {
    pub state: String,
    pub symbol: char,
    pub next_state: String,
    pub write: char,
    pub direction: Direction,
}

/// Immutable lookup from `(state, symbol)` to the ordered outcomes available there.
///
/// Several outcomes for one key encode nondeterminism. A missing key means no move is possible,
/// which is not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TransitionRow>", into = "Vec<TransitionRow>")]
pub struct TransitionTable {
    rules: HashMap<(String, char), Vec<Transition>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an outcome for `(state, symbol)`, after any already present.
    pub fn insert(&mut self, state: impl Into<String>, symbol: char, transition: Transition) {
        self.rules
            .entry((state.into(), symbol))
            .or_default()
            .push(transition);
    }

    /// Returns the outcomes for `(state, symbol)` in insertion order, or an empty slice.
    pub fn lookup(&self, state: &str, symbol: char) -> &[Transition] {
        // Tuple keys can't be borrowed as (&str, char), so the key is built per lookup.
        self.rules
            .get(&(state.to_string(), symbol))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct `(state, symbol)` keys.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Total number of outcomes across all keys.
    pub fn transition_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Flattens the table into rows, sorted by key so the output is deterministic.
    pub fn rows(&self) -> Vec<TransitionRow> {
        let mut keys: Vec<_> = self.rules.keys().collect();
        keys.sort();

        keys.into_iter()
            .flat_map(|key| {
                self.rules[key].iter().map(move |t| TransitionRow {
                    state: key.0.clone(),
                    symbol: key.1,
                    next_state: t.next_state.clone(),
                    write: t.write,
                    direction: t.direction,
                })
            })
            .collect()
    }
}

impl From<Vec<TransitionRow>> for TransitionTable {
    fn from(rows: Vec<TransitionRow>) -> Self {
        rows.into_iter().collect()
    }
}

impl From<TransitionTable> for Vec<TransitionRow> {
    fn from(table: TransitionTable) -> Self {
        table.rows()
    }
}

impl FromIterator<TransitionRow> for TransitionTable {
    fn from_iter<I: IntoIterator<Item = TransitionRow>>(iter: I) -> Self {
        let mut table = TransitionTable::new();
        for row in iter {
            table.insert(
                row.state,
                row.symbol,
                Transition::new(row.next_state, row.write, row.direction),
            );
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(state: &str, symbol: char, next: &str, write: char, dir: Direction) -> TransitionRow {
        TransitionRow {
            state: state.to_string(),
            symbol,
            next_state: next.to_string(),
            write,
            direction: dir,
        }
    }

    #[test]
    fn test_lookup_missing_key_is_empty() {
        let table = TransitionTable::new();
        assert!(table.lookup("q0", 'a').is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_lookup_preserves_insertion_order() {
        let table: TransitionTable = vec![
            row("q0", 'a', "q1", 'a', Direction::Right),
            row("q0", 'b', "q0", 'b', Direction::Right),
            row("q0", 'a', "q2", 'x', Direction::Stay),
        ]
        .into_iter()
        .collect();

        let outcomes = table.lookup("q0", 'a');
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0], Transition::new("q1", 'a', Direction::Right));
        assert_eq!(outcomes[1], Transition::new("q2", 'x', Direction::Stay));
        assert_eq!(table.len(), 2);
        assert_eq!(table.transition_count(), 3);
    }

    #[test]
    fn test_json_rows() {
        let json = r#"[
            {"state": "q0", "symbol": "a", "next_state": "q0", "write": "a", "direction": "Right"},
            {"state": "q0", "symbol": "_", "next_state": "qa", "write": "_", "direction": "Left"}
        ]"#;

        let table: TransitionTable = serde_json::from_str(json).unwrap();
        assert_eq!(
            table.lookup("q0", '_'),
            &[Transition::new("qa", '_', Direction::Left)]
        );

        let back = serde_json::to_string(&table).unwrap();
        let again: TransitionTable = serde_json::from_str(&back).unwrap();
        assert_eq!(table, again);
    }
}
