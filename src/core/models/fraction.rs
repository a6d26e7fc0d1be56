use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A challenge rating such as `1/4` or `17`.
///
/// Equality, ordering and hashing go by value, so `1/2 == 2/4`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Fraction {
    pub numerator: i32,
    pub denominator: i32,
}

impl Fraction {
    pub const ONE_EIGHTH: Fraction = Fraction::new(1, 8);
    pub const ONE_QUARTER: Fraction = Fraction::new(1, 4);
    pub const HALF: Fraction = Fraction::new(1, 2);

    pub const fn new(numerator: i32, denominator: i32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub const fn integer(value: i32) -> Self {
        Self::new(value, 1)
    }

    pub fn as_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Numerator and denominator with a positive denominator.
    fn signed(&self) -> (i64, i64) {
        let (n, d) = (i64::from(self.numerator), i64::from(self.denominator));
        if d < 0 {
            (-n, -d)
        } else {
            (n, d)
        }
    }

    /// Lowest terms, with a positive denominator.
    fn reduced(&self) -> (i64, i64) {
        let (n, d) = self.signed();
        match gcd(n.abs(), d) {
            0 => (n, d),
            g => (n / g, d / g),
        }
    }
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid fraction: {0:?}")]
pub struct ParseFractionError(pub String);

impl FromStr for Fraction {
    type Err = ParseFractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseFractionError(s.to_string());
        let s = s.trim();
        match s.split_once('/') {
            Some((n, d)) => {
                let numerator = n.trim().parse().map_err(|_| err())?;
                let denominator: i32 = d.trim().parse().map_err(|_| err())?;
                if denominator == 0 {
                    return Err(err());
                }
                Ok(Self::new(numerator, denominator))
            }
            None => s.parse().map(Self::integer).map_err(|_| err()),
        }
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = self.signed();
        let (c, d) = other.signed();
        (a * d).cmp(&(c * b))
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fraction {}

impl Hash for Fraction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.reduced().hash(state);
    }
}
