//! Content Tree
//!
//! The string/element/compound tree accumulated for each recognized element
//! while streaming through an XML document, plus path-based lookups used by
//! the record converters.

use serde::Serialize;

/// A step in a nested element path, e.g. `trait` → `name`.
pub trait ElementPath {
    /// Tag name of this step.
    fn element_name(&self) -> &'static str;

    /// The next step down, if any.
    fn inner(&self) -> Option<&dyn ElementPath>;

    /// Tag name of the deepest step.
    fn leaf_name(&self) -> &'static str {
        match self.inner() {
            Some(inner) => inner.leaf_name(),
            None => self.element_name(),
        }
    }
}

/// Accumulated content of one element.
///
/// Invariant: a `Compound` never holds two adjacent `String` nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ElementContent {
    String(String),
    Element(String, Option<Box<ElementContent>>),
    Compound(Vec<ElementContent>),
}

impl ElementContent {
    /// Append `content`, merging adjacent strings.
    ///
    /// A `Compound` is appended item by item, so appending is associative.
    pub fn append(&mut self, content: ElementContent) {
        if let ElementContent::Compound(items) = content {
            for item in items {
                self.append(item);
            }
            return;
        }

        let current = std::mem::replace(self, ElementContent::Compound(Vec::new()));
        *self = match (current, content) {
            (ElementContent::String(lhs), ElementContent::String(rhs)) => {
                ElementContent::String(lhs + &rhs)
            }
            (ElementContent::Compound(mut items), content) => {
                let merged = match (items.last_mut(), &content) {
                    (Some(ElementContent::String(lhs)), ElementContent::String(rhs)) => {
                        lhs.push_str(rhs);
                        true
                    }
                    _ => false,
                };
                if !merged {
                    items.push(content);
                }
                ElementContent::Compound(items)
            }
            (current, content) => ElementContent::Compound(vec![current, content]),
        }
    }

    /// The text of a plain string node.
    pub fn string_value(&self) -> Option<&str> {
        match self {
            ElementContent::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn int_value(&self) -> Option<i32> {
        self.string_value().and_then(|s| s.trim().parse().ok())
    }

    fn as_content_list(&self) -> &[ElementContent] {
        match self {
            ElementContent::Compound(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    /// Direct children named `name` that have content.
    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ElementContent> + 'a {
        self.as_content_list().iter().filter_map(move |item| match item {
            ElementContent::Element(n, Some(content)) if n == name => Some(content.as_ref()),
            _ => None,
        })
    }

    /// Content of the first element matching `path`, following it down level by level.
    pub fn first(&self, path: &dyn ElementPath) -> Option<&ElementContent> {
        let found = self.children_named(path.element_name()).next()?;
        match path.inner() {
            Some(inner) => found.first(inner),
            None => Some(found),
        }
    }

    /// Content of every element matching `path`, in document order.
    pub fn all(&self, path: &dyn ElementPath) -> Vec<&ElementContent> {
        self.children_named(path.element_name())
            .flat_map(|found| match path.inner() {
                Some(inner) => found.all(inner),
                None => vec![found],
            })
            .collect()
    }

    /// Shorthand for the trimmed, non-empty string value at `path`.
    pub fn text(&self, path: &dyn ElementPath) -> Option<&str> {
        self.first(path)
            .and_then(ElementContent::string_value)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Step(&'static str, Option<Box<Step>>);

    impl ElementPath for Step {
        fn element_name(&self) -> &'static str {
            self.0
        }
        fn inner(&self) -> Option<&dyn ElementPath> {
            self.1.as_deref().map(|s| s as &dyn ElementPath)
        }
    }

    fn s(text: &str) -> ElementContent {
        ElementContent::String(text.to_string())
    }

    fn el(name: &str, content: ElementContent) -> ElementContent {
        ElementContent::Element(name.to_string(), Some(Box::new(content)))
    }

    #[test]
    fn test_append_merges_strings() {
        let mut content = s("Goblin");
        content.append(s(" Boss"));
        assert_eq!(content, s("Goblin Boss"));
    }

    #[test]
    fn test_append_merges_trailing_string_in_compound() {
        let mut content = el("name", s("x"));
        content.append(s("a"));
        content.append(s("b"));
        assert_eq!(content, ElementContent::Compound(vec![el("name", s("x")), s("ab")]));
    }

    #[test]
    fn test_append_compound_splices_items() {
        let mut content = s("a");
        content.append(ElementContent::Compound(vec![s("b"), el("x", s("1")), s("c")]));
        assert_eq!(content, ElementContent::Compound(vec![s("ab"), el("x", s("1")), s("c")]));

        let mut content = s("a");
        content.append(ElementContent::Compound(Vec::new()));
        assert_eq!(content, s("a"));
    }

    #[test]
    fn test_append_elements_build_compound() {
        let mut content = el("name", s("Goblin"));
        content.append(el("size", s("S")));
        content.append(el("ac", s("15")));
        assert_eq!(content.as_content_list().len(), 3);
    }

    #[test]
    fn test_first_and_all() {
        let mut monster = el("name", s("Goblin"));
        monster.append(el("trait", el("name", s("Nimble Escape"))));
        monster.append(el("trait", el("name", s("Sneaky"))));

        let trait_name = Step("trait", Some(Box::new(Step("name", None))));
        assert_eq!(monster.text(&trait_name), Some("Nimble Escape"));

        let names: Vec<_> = monster
            .all(&trait_name)
            .into_iter()
            .filter_map(ElementContent::string_value)
            .collect();
        assert_eq!(names, vec!["Nimble Escape", "Sneaky"]);

        assert_eq!(monster.text(&Step("name", None)), Some("Goblin"));
        assert!(monster.first(&Step("cr", None)).is_none());
    }

    #[test]
    fn test_first_skips_empty_elements() {
        let mut content = ElementContent::Element("text".into(), None);
        content.append(el("text", s("second")));
        assert_eq!(content.text(&Step("text", None)), Some("second"));
    }

    #[test]
    fn test_leaf_name() {
        let path = Step("monster", Some(Box::new(Step("trait", Some(Box::new(Step("name", None)))))));
        assert_eq!(path.leaf_name(), "name");
    }

    #[test]
    fn test_int_value() {
        assert_eq!(s(" 14 ").int_value(), Some(14));
        assert_eq!(s("fourteen").int_value(), None);
    }
}
