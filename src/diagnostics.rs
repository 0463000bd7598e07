//! The level-by-level configuration tree and the branching measure derived from it.

use crate::types::Configuration;

/// Append-only sequence of breadth-first levels. Level 0 holds the initial configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationTree {
    levels: Vec<Vec<Configuration>>,
}

impl ConfigurationTree {
    pub fn new(root: Configuration) -> Self {
        Self {
            levels: vec![vec![root]],
        }
    }

    pub fn push_level(&mut self, level: Vec<Configuration>) {
        self.levels.push(level);
    }

    /// The most recently appended level.
    pub fn frontier(&self) -> &[Configuration] {
        self.levels.last().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of levels so far.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Sum of configuration counts over all levels.
    pub fn total_configurations(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Average number of configurations per level, or 0 for an empty tree.
    ///
    /// A rough branching measure: the terminal level counts in the denominator like any other.
    pub fn nondeterminism_degree(&self) -> f64 {
        if self.levels.is_empty() {
            return 0.0;
        }
        self.total_configurations() as f64 / self.levels.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(state: &str) -> Configuration {
        Configuration::new("", state, "a")
    }

    #[test]
    fn test_empty_tree_degree_is_zero() {
        let tree = ConfigurationTree::default();
        assert!(tree.is_empty());
        assert_eq!(tree.nondeterminism_degree(), 0.0);
        assert!(tree.frontier().is_empty());
    }

    #[test]
    fn test_linear_tree_degree_is_one() {
        let mut tree = ConfigurationTree::new(config("q0"));
        tree.push_level(vec![config("q1")]);
        tree.push_level(vec![config("q2")]);

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.nondeterminism_degree(), 1.0);
        assert_eq!(tree.frontier(), &[config("q2")]);
    }

    #[test]
    fn test_branching_degree() {
        let mut tree = ConfigurationTree::new(config("q0"));
        tree.push_level(vec![config("q1"), config("q2")]);
        tree.push_level(vec![config("q3"), config("q4"), config("q5")]);

        assert_eq!(tree.total_configurations(), 6);
        assert_eq!(tree.nondeterminism_degree(), 2.0);
    }
}
