//! Property-based tests for the content tree
//!
//! Tests invariants:
//! - Appending never leaves two adjacent strings in a compound
//! - Appending preserves all text in order
//! - Appending is associative: (a + b) + c == a + (b + c)
//! - Building from a document keeps the same invariant for every record

use proptest::prelude::*;

use crate::ingestion::xml::{ContentTreeBuilder, DocumentElement, ElementContent};

// ============================================================================
// Strategies
// ============================================================================

#[derive(Debug, Clone)]
enum Piece {
    Text(String),
    Element(String),
}

impl Piece {
    fn content(&self) -> ElementContent {
        match self {
            Piece::Text(s) => ElementContent::String(s.clone()),
            Piece::Element(name) => ElementContent::Element(name.clone(), None),
        }
    }
}

fn arb_piece() -> impl Strategy<Value = Piece> {
    prop_oneof![
        3 => "[a-z ]{1,6}".prop_map(Piece::Text),
        1 => "[a-z]{1,4}".prop_map(Piece::Element),
    ]
}

/// Arbitrary content, including nested elements and compounds.
fn arb_content() -> impl Strategy<Value = ElementContent> {
    let leaf = prop_oneof![
        3 => "[a-z ]{0,4}".prop_map(ElementContent::String),
        1 => "[a-z]{1,3}".prop_map(|name| ElementContent::Element(name, None)),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            ("[a-z]{1,3}", inner.clone())
                .prop_map(|(name, content)| ElementContent::Element(name, Some(Box::new(content)))),
            prop::collection::vec(inner, 0..4).prop_map(ElementContent::Compound),
        ]
    })
}

fn merged(mut lhs: ElementContent, rhs: ElementContent) -> ElementContent {
    lhs.append(rhs);
    lhs
}

fn canonical(content: &ElementContent) -> bool {
    match content {
        ElementContent::Compound(items) => {
            items.windows(2).all(|pair| {
                !matches!(pair, [ElementContent::String(_), ElementContent::String(_)])
            }) && items.iter().all(canonical)
        }
        ElementContent::Element(_, Some(inner)) => canonical(inner),
        _ => true,
    }
}

fn text_of(content: &ElementContent) -> String {
    match content {
        ElementContent::String(s) => s.clone(),
        ElementContent::Element(_, inner) => inner.as_deref().map(text_of).unwrap_or_default(),
        ElementContent::Compound(items) => items.iter().map(text_of).collect(),
    }
}

fn build(pieces: &[Piece]) -> ElementContent {
    let mut iter = pieces.iter();
    let mut content = match iter.next() {
        Some(first) => first.content(),
        None => ElementContent::Compound(Vec::new()),
    };
    for piece in iter {
        content.append(piece.content());
    }
    content
}

// ============================================================================
// Append
// ============================================================================

proptest! {
    #[test]
    fn prop_append_is_canonical(pieces in prop::collection::vec(arb_piece(), 0..30)) {
        prop_assert!(canonical(&build(&pieces)));
    }

    #[test]
    fn prop_append_preserves_text(pieces in prop::collection::vec(arb_piece(), 0..30)) {
        let expected: String = pieces
            .iter()
            .filter_map(|p| match p {
                Piece::Text(s) => Some(s.as_str()),
                Piece::Element(_) => None,
            })
            .collect();

        prop_assert_eq!(text_of(&build(&pieces)), expected);
    }

    #[test]
    fn prop_append_split_point_is_irrelevant(
        pieces in prop::collection::vec(arb_piece(), 1..20),
        split in any::<prop::sample::Index>(),
    ) {
        let at = split.index(pieces.len());
        let (head, tail) = pieces.split_at(at);

        let mut content = build(head);
        for piece in tail {
            content.append(piece.content());
        }

        let whole = build(&pieces);
        prop_assert_eq!(text_of(&content), text_of(&whole));
        prop_assert!(canonical(&content));
    }
}

proptest! {
    #[test]
    fn prop_append_is_associative(a in arb_content(), b in arb_content(), c in arb_content()) {
        let left = merged(merged(a.clone(), b.clone()), c.clone());
        let right = merged(a, merged(b, c));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn prop_appending_strings_concatenates(a in "[a-z ]{0,8}", b in "[a-z ]{0,8}") {
        let content = merged(ElementContent::String(a.clone()), ElementContent::String(b.clone()));
        prop_assert_eq!(content, ElementContent::String(a + &b));
    }
}

// ============================================================================
// Builder
// ============================================================================

proptest! {
    #[test]
    fn prop_built_records_are_canonical(
        runs in prop::collection::vec(prop::collection::vec("[a-z]{1,5}", 1..4), 1..5),
    ) {
        // each run is split across several character events inside one <text>
        let mut builder = ContentTreeBuilder::new([DocumentElement::MONSTER]);
        builder.start_element("compendium").unwrap();
        builder.start_element("monster").unwrap();
        for run in &runs {
            builder.start_element("trait").unwrap();
            builder.start_element("text").unwrap();
            for chunk in run {
                builder.characters(chunk);
            }
            builder.end_element("text").unwrap();
            builder.end_element("trait").unwrap();
        }
        builder.end_element("monster").unwrap();
        builder.end_element("compendium").unwrap();
        builder.finish().unwrap();

        let (element, content) = builder.pop_completed().unwrap();
        prop_assert_eq!(element, DocumentElement::MONSTER);
        prop_assert!(canonical(&content));
        prop_assert_eq!(text_of(&content), runs.concat().concat());
    }
}
