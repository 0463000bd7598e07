//! Tape rewriting: producing the successor of a configuration for a chosen transition.

use crate::types::{Configuration, Direction, Transition};

/// Applies `transition` to `config` and returns the successor configuration.
///
/// The symbol under the head is replaced by `transition.write`, then the head moves:
///
/// - `Right`: the written symbol joins the left segment; the head moves onto the next cell
///   (a fresh blank when the right segment was exhausted).
/// - `Left`: the last symbol of the left segment (or `blank` when there is none) moves in front
///   of the written symbol.
/// - `Stay`: the written symbol stays under the head.
///
/// The function is total: every configuration/transition pair has a successor.
pub fn apply(config: &Configuration, transition: &Transition, blank: char) -> Configuration {
    let rest = tail(&config.right);

    let (left, right) = match transition.direction {
        Direction::Right => {
            let mut left = config.left.clone();
            left.push(transition.write);
            (left, rest.to_string())
        }
        Direction::Left => {
            let mut left = config.left.clone();
            let under = left.pop().unwrap_or(blank);

            let mut right = String::with_capacity(config.right.len() + 2);
            right.push(under);
            right.push(transition.write);
            right.push_str(rest);
            (left, right)
        }
        Direction::Stay => {
            let mut right = String::with_capacity(config.right.len() + 1);
            right.push(transition.write);
            right.push_str(rest);
            (config.left.clone(), right)
        }
    };

    Configuration {
        left,
        state: transition.next_state.clone(),
        right,
    }
}

/// Everything after the first symbol, or `""` when there is none.
fn tail(segment: &str) -> &str {
    let mut chars = segment.chars();
    chars.next();
    chars.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BLANK: char = '_';

    fn t(direction: Direction) -> Transition {
        Transition::new("q1", 'x', direction)
    }

    /// Reads the whole tape back, padding the head cell with a blank when exhausted.
    fn tape_of(config: &Configuration) -> String {
        let mut tape = config.left.clone();
        if config.right.is_empty() {
            tape.push(BLANK);
        } else {
            tape.push_str(&config.right);
        }
        tape
    }

    #[test]
    fn test_move_right() {
        let next = apply(&Configuration::new("a", "q0", "bc"), &t(Direction::Right), BLANK);
        assert_eq!(next, Configuration::new("ax", "q1", "c"));
    }

    #[test]
    fn test_move_right_on_exhausted_tape() {
        let next = apply(&Configuration::new("ab", "q0", ""), &t(Direction::Right), BLANK);
        assert_eq!(next, Configuration::new("abx", "q1", ""));
    }

    #[test]
    fn test_move_left() {
        let next = apply(&Configuration::new("ab", "q0", "cd"), &t(Direction::Left), BLANK);
        assert_eq!(next, Configuration::new("a", "q1", "bxd"));
    }

    #[test]
    fn test_move_left_at_left_end() {
        let next = apply(&Configuration::new("", "q0", "cd"), &t(Direction::Left), BLANK);
        assert_eq!(next, Configuration::new("", "q1", "_xd"));
    }

    #[test]
    fn test_stay() {
        let next = apply(&Configuration::new("a", "q0", "bc"), &t(Direction::Stay), BLANK);
        assert_eq!(next, Configuration::new("a", "q1", "xc"));

        let next = apply(&Configuration::new("a", "q0", ""), &t(Direction::Stay), BLANK);
        assert_eq!(next, Configuration::new("a", "q1", "x"));
    }

    #[test]
    fn test_multibyte_symbols() {
        let transition = Transition::new("q1", 'é', Direction::Right);
        let next = apply(&Configuration::new("", "q0", "ßa"), &transition, BLANK);
        assert_eq!(next, Configuration::new("é", "q1", "a"));
    }

    proptest! {
        #[test]
        fn stay_overwrites_only_the_head_cell(left in "[ab]{0,6}", right in "[ab]{0,6}") {
            let config = Configuration::new(left.clone(), "q0", right.clone());
            let next = apply(&config, &t(Direction::Stay), BLANK);

            let mut expected: Vec<char> = tape_of(&config).chars().collect();
            expected[left.chars().count()] = 'x';

            prop_assert_eq!(tape_of(&next), expected.into_iter().collect::<String>());
            prop_assert_eq!(next.left.chars().count(), left.chars().count());
        }

        #[test]
        fn right_shifts_head_by_one(left in "[ab]{0,6}", right in "[ab]{1,6}") {
            let config = Configuration::new(left.clone(), "q0", right.clone());
            let next = apply(&config, &t(Direction::Right), BLANK);

            prop_assert_eq!(next.left.chars().count(), left.chars().count() + 1);
            prop_assert_eq!(format!("{}{}", next.left, next.right), format!("{}x{}", left, &right[1..]));
        }

        #[test]
        fn left_shifts_head_by_one(left in "[ab]{1,6}", right in "[ab]{1,6}") {
            let config = Configuration::new(left.clone(), "q0", right.clone());
            let next = apply(&config, &t(Direction::Left), BLANK);

            prop_assert_eq!(next.left.chars().count(), left.chars().count() - 1);
            prop_assert_eq!(format!("{}{}", next.left, next.right), format!("{}x{}", left, &right[1..]));
        }
    }
}
