//! Dice Expression Extractor
//!
//! Parses roll notation found in stat blocks and hit point fields:
//! - `1d6`, `d20`
//! - `2d6 + 3`, `1d6+1d4-1`
//! - `+5` (a bare modifier, meaning `1d20 + 5`)

use once_cell::sync::Lazy;

use crate::core::models::{DiceExpression, DiceOperator};
use crate::ingestion::parsing::{any, character, int, one_of, zip3, Located, Parser};

static DICE_EXPRESSION: Lazy<Parser<DiceExpression>> = Lazy::new(build_expression);

/// The dice expression grammar as a reusable parser.
pub fn dice_expression() -> Parser<DiceExpression> {
    DICE_EXPRESSION.clone()
}

/// Parse `text` from its start. Trailing text is ignored.
pub fn parse_dice(text: &str) -> Option<DiceExpression> {
    DICE_EXPRESSION.run(text)
}

/// Every expression in `text` that rolls at least one die, with its location.
pub fn find_dice(text: &str) -> Vec<Located<DiceExpression>> {
    dice_expression()
        .filter(|expr| expr.dice_count() > 0)
        .matches(text)
}

fn build_expression() -> Parser<DiceExpression> {
    let term = || dice().or(number());

    term()
        .followed_by(any(operator().followed_by(term())))
        .map(|(first, rest)| {
            rest.into_iter()
                .fold(first, |acc, (op, rhs)| DiceExpression::compound(acc, op, rhs))
        })
        .or(modifier())
}

fn dice() -> Parser<DiceExpression> {
    zip3(int().optional(), character('d'), int())
        .map(|(count, _, sides)| DiceExpression::dice(count.unwrap_or(1), sides))
}

fn number() -> Parser<DiceExpression> {
    int().map(DiceExpression::Number)
}

fn sign() -> Parser<DiceOperator> {
    one_of("+-").map(|c| {
        if c == '-' {
            DiceOperator::Subtract
        } else {
            DiceOperator::Add
        }
    })
}

fn operator() -> Parser<DiceOperator> {
    let spaces = || any(character(' '));
    zip3(spaces(), sign(), spaces()).map(|(_, op, _)| op)
}

fn modifier() -> Parser<DiceExpression> {
    sign()
        .followed_by(number())
        .map(|(op, n)| DiceExpression::compound(DiceExpression::dice(1, 20), op, n))
}
