//! Property-based tests for the parser combinator engine
//!
//! Tests invariants:
//! - A failed literal leaves the cursor untouched
//! - A literal with any single character changed never matches
//! - A failed sequence rolls back everything its earlier parts consumed
//! - `or` tries the second branch from the original position
//! - Integers and dice expressions read back what was written

use proptest::prelude::*;

use crate::core::models::DiceExpression;
use crate::ingestion::extractors::{parse_dice, parse_movement};
use crate::ingestion::parsing::{int, string, zip, Cursor};

// ============================================================================
// Strategies
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    "[a-z ,.0-9]{0,40}"
}

fn arb_literal() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn arb_sides() -> impl Strategy<Value = i32> {
    prop_oneof![Just(4), Just(6), Just(8), Just(10), Just(12), Just(20)]
}

// ============================================================================
// Atomicity
// ============================================================================

proptest! {
    #[test]
    fn prop_literal_is_atomic(input in arb_text(), literal in arb_literal()) {
        let buffer: Vec<char> = input.chars().collect();
        let mut cursor = Cursor::new(&buffer);

        match string(literal.clone()).parse(&mut cursor) {
            Some(matched) => {
                prop_assert!(input.starts_with(&literal));
                prop_assert_eq!(matched, literal.clone());
                prop_assert_eq!(cursor.position(), literal.chars().count());
            }
            None => {
                prop_assert!(!input.starts_with(&literal));
                prop_assert_eq!(cursor.position(), 0);
            }
        }
    }

    #[test]
    fn prop_mutated_literal_fails_without_consuming(
        literal in arb_literal(),
        index in any::<prop::sample::Index>(),
        replacement in proptest::char::range('a', 'z'),
        suffix in arb_text(),
    ) {
        let mut chars: Vec<char> = literal.chars().collect();
        let at = index.index(chars.len());
        prop_assume!(chars[at] != replacement);
        chars[at] = replacement;

        let input: Vec<char> = chars.into_iter().chain(suffix.chars()).collect();
        let mut cursor = Cursor::new(&input);

        prop_assert_eq!(string(literal).parse(&mut cursor), None);
        prop_assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn prop_failed_sequence_rolls_back(
        first in arb_literal(),
        second in arb_literal(),
        rest in arb_text(),
    ) {
        prop_assume!(!rest.starts_with(&second));
        let input = format!("{first}{rest}");
        let buffer: Vec<char> = input.chars().collect();
        let mut cursor = Cursor::new(&buffer);

        let parsed = zip(string(first), string(second)).parse(&mut cursor);

        prop_assert!(parsed.is_none());
        prop_assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn prop_or_retries_from_start(
        shared in arb_literal(),
        a in arb_literal(),
        b in arb_literal(),
    ) {
        prop_assume!(!b.starts_with(&a));
        let input = format!("{shared}{b}");
        let left = zip(string(shared.clone()), string(a)).map(|_| "left");
        let right = zip(string(shared), string(b)).map(|_| "right");

        prop_assert_eq!(left.or(right).run(&input), Some("right"));
    }
}

// ============================================================================
// Read-back
// ============================================================================

proptest! {
    #[test]
    fn prop_int_reads_back(n in 0i32..1_000_000, suffix in "[a-z ]{0,5}") {
        prop_assert_eq!(int().run(&format!("{n}{suffix}")), Some(n));
    }

    #[test]
    fn prop_dice_bounds(count in 1i32..20, sides in arb_sides(), modifier in -10i32..=10) {
        let text = match modifier {
            0 => format!("{count}d{sides}"),
            m if m > 0 => format!("{count}d{sides} + {m}"),
            m => format!("{count}d{sides} - {}", -m),
        };

        let expr = parse_dice(&text);
        prop_assert!(expr.is_some(), "failed to parse {}", text);
        let expr = expr.unwrap_or(DiceExpression::Number(0));
        prop_assert_eq!(expr.dice_count(), count);
        prop_assert_eq!(expr.minimum(), count + modifier);
        prop_assert_eq!(expr.maximum(), count * sides + modifier);
        prop_assert_eq!(expr.to_string(), text);
    }

    #[test]
    fn prop_movement_reads_back(walk in 5i32..200, fly in proptest::option::of(5i32..200)) {
        let text = match fly {
            Some(fly) => format!("{walk} ft., fly {fly} ft."),
            None => format!("{walk} ft."),
        };

        let movement = parse_movement(&text).unwrap_or_default();
        prop_assert_eq!(movement.len(), 1 + usize::from(fly.is_some()));
        prop_assert_eq!(movement.values().next().copied(), Some(walk));
    }
}
