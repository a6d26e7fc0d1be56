//! Backtracking Parser Combinators
//!
//! A `Parser<A>` is an immutable, cheaply clonable function value from a
//! [`Cursor`] to `Option<A>`. Success advances the cursor, failure yields
//! `None`. Composite parsers built here honour the atomic-attempt contract:
//! when they fail, the cursor is back where it was before they ran.

use std::fmt::Debug;
use std::ops::Range;
use std::sync::Arc;

use super::cursor::Cursor;

type ParseFn<A> = dyn Fn(&mut Cursor<'_>) -> Option<A> + Send + Sync;

/// A reusable, stateless parser producing values of type `A`.
pub struct Parser<A> {
    parse: Arc<ParseFn<A>>,
}

impl<A> Clone for Parser<A> {
    fn clone(&self) -> Self {
        Self {
            parse: Arc::clone(&self.parse),
        }
    }
}

/// A parsed value together with the half-open character range it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located<V> {
    pub value: V,
    pub range: Range<usize>,
}

impl<A: 'static> Parser<A> {
    /// Wrap a raw parse function.
    pub fn new(f: impl Fn(&mut Cursor<'_>) -> Option<A> + Send + Sync + 'static) -> Self {
        Self { parse: Arc::new(f) }
    }

    /// Run the parser against the cursor's current position.
    pub fn parse(&self, input: &mut Cursor<'_>) -> Option<A> {
        (self.parse)(input)
    }

    /// Run the parser from the start of `text`. Trailing input is allowed.
    pub fn run(&self, text: &str) -> Option<A> {
        let buffer: Vec<char> = text.chars().collect();
        let mut cursor = Cursor::new(&buffer);
        self.parse(&mut cursor)
    }

    /// Every non-overlapping match in `text`, skipping unmatched input in between.
    pub fn matches(&self, text: &str) -> Vec<Located<A>> {
        any(self.clone().with_range().skipping_any_before().map(|(value, range)| Located { value, range }))
            .run(text)
            .unwrap_or_default()
    }

    /// Restore the cursor when the parser fails.
    pub fn attempt(self) -> Self {
        Parser::new(move |input| {
            let start = input.position();
            let result = self.parse(input);
            if result.is_none() {
                input.set_position(start);
            }
            result
        })
    }

    /// Transform a successful value. Cannot fail.
    pub fn map<B: 'static>(self, transform: impl Fn(A) -> B + Send + Sync + 'static) -> Parser<B> {
        Parser::new(move |input| self.parse(input).map(&transform))
    }

    /// Transform a successful value, allowing the transform to reject it.
    /// A rejection rolls the cursor back like any other failure.
    pub fn flat_map<B: 'static>(
        self,
        transform: impl Fn(A) -> Option<B> + Send + Sync + 'static,
    ) -> Parser<B> {
        Parser::new(move |input| self.parse(input).and_then(&transform)).attempt()
    }

    /// Keep the value only if `predicate` holds.
    pub fn filter(self, predicate: impl Fn(&A) -> bool + Send + Sync + 'static) -> Parser<A> {
        self.flat_map(move |a| if predicate(&a) { Some(a) } else { None })
    }

    /// Ordered alternation: the first parser that succeeds wins.
    pub fn or(self, other: Parser<A>) -> Parser<A> {
        Parser::new(move |input| {
            let start = input.position();
            if let Some(a) = self.parse(input) {
                return Some(a);
            }
            input.set_position(start);
            other.parse(input)
        })
        .attempt()
    }

    /// Sequence two parsers. Fails as a whole when either fails.
    pub fn followed_by<B: 'static>(self, next: Parser<B>) -> Parser<(A, B)> {
        Parser::new(move |input| {
            let a = self.parse(input)?;
            let b = next.parse(input)?;
            Some((a, b))
        })
        .attempt()
    }

    /// Never fails. Yields `None` without consuming input when the inner parser fails.
    pub fn optional(self) -> Parser<Option<A>> {
        let inner = self.attempt();
        Parser::new(move |input| Some(inner.parse(input)))
    }

    /// Consume an optional `surrounding` match on either side.
    pub fn trimming<B: 'static>(self, surrounding: Parser<B>) -> Parser<A> {
        zip3(surrounding.clone().optional(), self, surrounding.optional()).map(|(_, a, _)| a)
    }

    /// Skip input until this parser matches, discarding the skipped prefix.
    pub fn skipping_any_before(self) -> Parser<A> {
        skip_until(self).map(|(_, a)| a)
    }

    /// Pair the value with the half-open range of characters it consumed.
    pub fn with_range(self) -> Parser<(A, Range<usize>)> {
        Parser::new(move |input| {
            let start = input.position();
            let value = self.parse(input)?;
            Some((value, start..input.position()))
        })
    }

    pub fn located(self) -> Parser<Located<A>> {
        self.with_range().map(|(value, range)| Located { value, range })
    }

    /// Discard the value.
    pub fn ignored(self) -> Parser<()> {
        self.map(|_| ())
    }
}

impl<A: Debug + 'static> Parser<A> {
    /// Trace every invocation in debug builds. No behavioural effect.
    #[cfg(debug_assertions)]
    pub fn log(self, id: &'static str) -> Parser<A> {
        Parser::new(move |input| {
            let start = input.position();
            let result = self.parse(input);
            match &result {
                Some(value) => tracing::trace!(
                    parser = id,
                    position = start,
                    consumed = %input.slice(start..input.position()),
                    value = ?value,
                    "parsed"
                ),
                None => tracing::trace!(
                    parser = id,
                    position = start,
                    remainder = %input.remainder(),
                    "failed"
                ),
            }
            result
        })
    }

    #[cfg(not(debug_assertions))]
    pub fn log(self, _id: &'static str) -> Parser<A> {
        self
    }
}

impl Parser<Vec<char>> {
    pub fn joined(self) -> Parser<String> {
        self.map(|chars| chars.into_iter().collect())
    }
}

impl Parser<Vec<String>> {
    pub fn joined(self) -> Parser<String> {
        self.map(|parts| parts.concat())
    }
}

// ============================================================================
// Repetition and search
// ============================================================================

/// Zero or more repetitions. Always succeeds.
///
/// Stops after an element that succeeds without consuming input.
pub fn any<A: 'static>(element: Parser<A>) -> Parser<Vec<A>> {
    let element = element.attempt();
    Parser::new(move |input| {
        let mut items = Vec::new();
        loop {
            let before = input.position();
            match element.parse(input) {
                Some(item) => {
                    items.push(item);
                    if input.position() == before {
                        break;
                    }
                }
                None => break,
            }
        }
        Some(items)
    })
}

/// One or more repetitions.
pub fn one_or_more<A: 'static>(element: Parser<A>) -> Parser<Vec<A>> {
    any(element).filter(|items| !items.is_empty())
}

/// Elements separated by `separator` and closed by `terminator`.
///
/// A separator that is not followed by another element is left unconsumed
/// so the terminator can see it.
pub fn many<E: 'static, D: 'static, T: 'static>(
    element: Parser<E>,
    separator: Parser<D>,
    terminator: Parser<T>,
) -> Parser<Vec<E>> {
    let element = element.attempt();
    let separator = separator.attempt();
    Parser::new(move |input| {
        let mut items = Vec::new();
        let mut previous = input.position();
        loop {
            match element.parse(input) {
                Some(item) => items.push(item),
                None => {
                    input.set_position(previous);
                    break;
                }
            }
            previous = input.position();
            if separator.parse(input).is_none() {
                break;
            }
        }
        terminator.parse(input)?;
        Some(items)
    })
    .attempt()
}

/// Consume input up to and including the first place `target` matches.
///
/// Returns the skipped prefix and the target's value. Fails without
/// consuming if the target never matches.
pub fn skip_until<A: 'static>(target: Parser<A>) -> Parser<(String, A)> {
    let target = target.attempt();
    Parser::new(move |input| {
        let start = input.position();
        let mut offset = start;
        loop {
            input.set_position(offset);
            if let Some(value) = target.parse(input) {
                return Some((input.slice(start..offset), value));
            }
            if offset >= input.end() {
                input.set_position(start);
                return None;
            }
            offset += 1;
        }
    })
}

/// Ordered alternation over any number of parsers.
pub fn choice<A: 'static>(alternatives: Vec<Parser<A>>) -> Parser<A> {
    Parser::new(move |input| {
        let start = input.position();
        for alternative in &alternatives {
            if let Some(a) = alternative.parse(input) {
                return Some(a);
            }
            input.set_position(start);
        }
        None
    })
}

// ============================================================================
// Sequencing
// ============================================================================

macro_rules! zip_n {
    ($(#[$doc:meta])* $name:ident => $($p:ident: $t:ident),+) => {
        $(#[$doc])*
        pub fn $name<$($t: 'static),+>($($p: Parser<$t>),+) -> Parser<($($t,)+)> {
            Parser::new(move |input| Some(($($p.parse(input)?,)+))).attempt()
        }
    };
}

zip_n!(
    /// Sequence two parsers into a pair.
    zip => a: A, b: B
);
zip_n!(zip3 => a: A, b: B, c: C);
zip_n!(zip4 => a: A, b: B, c: C, d: D);
zip_n!(zip5 => a: A, b: B, c: C, d: D, e: E);
zip_n!(zip6 => a: A, b: B, c: C, d: D, e: E, f: F);
zip_n!(zip7 => a: A, b: B, c: C, d: D, e: E, f: F, g: G);
