use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiceOperator {
    Add,
    Subtract,
}

impl DiceOperator {
    fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
        }
    }
}

/// A dice roll such as `2d6 + 3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiceExpression {
    Dice { count: i32, sides: i32 },
    Number(i32),
    Compound(Box<DiceExpression>, DiceOperator, Box<DiceExpression>),
}

impl DiceExpression {
    pub fn dice(count: i32, sides: i32) -> Self {
        Self::Dice { count, sides }
    }

    pub fn compound(lhs: DiceExpression, op: DiceOperator, rhs: DiceExpression) -> Self {
        Self::Compound(Box::new(lhs), op, Box::new(rhs))
    }

    /// `self + rhs`, with zero terms dropped.
    pub fn plus(self, rhs: DiceExpression) -> Self {
        match (self, rhs) {
            (lhs, Self::Number(0)) | (lhs, Self::Dice { count: 0, .. }) => lhs,
            (Self::Number(0), rhs) | (Self::Dice { count: 0, .. }, rhs) => rhs,
            (Self::Number(a), Self::Number(b)) => Self::Number(a + b),
            (lhs, Self::Number(n)) if n < 0 => {
                Self::compound(lhs, DiceOperator::Subtract, Self::Number(-n))
            }
            (lhs, rhs) => Self::compound(lhs, DiceOperator::Add, rhs),
        }
    }

    /// Total number of dice rolled.
    pub fn dice_count(&self) -> i32 {
        match self {
            Self::Dice { count, .. } => *count,
            Self::Number(_) => 0,
            Self::Compound(lhs, _, rhs) => lhs.dice_count() + rhs.dice_count(),
        }
    }

    pub fn minimum(&self) -> i32 {
        match self {
            Self::Dice { count, .. } => *count,
            Self::Number(n) => *n,
            Self::Compound(lhs, DiceOperator::Add, rhs) => lhs.minimum() + rhs.minimum(),
            Self::Compound(lhs, DiceOperator::Subtract, rhs) => lhs.minimum() - rhs.maximum(),
        }
    }

    pub fn maximum(&self) -> i32 {
        match self {
            Self::Dice { count, sides } => count * sides,
            Self::Number(n) => *n,
            Self::Compound(lhs, DiceOperator::Add, rhs) => lhs.maximum() + rhs.maximum(),
            Self::Compound(lhs, DiceOperator::Subtract, rhs) => lhs.maximum() - rhs.minimum(),
        }
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dice { count, sides } => write!(f, "{count}d{sides}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Compound(lhs, op, rhs) => write!(f, "{lhs} {} {rhs}", op.symbol()),
        }
    }
}
