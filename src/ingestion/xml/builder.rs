//! Content-Tree Builder
//!
//! Consumes element-start / characters / element-end events and rebuilds the
//! content of every recognized element. Elements outside the document schema
//! are tracked on a name stack so that anything nested inside them is ignored
//! as well. Designated output elements (e.g. monster records) are handed out
//! as completed units instead of being folded into their parent.

use std::collections::{HashMap, HashSet, VecDeque};

use thiserror::Error;

use super::content::{ElementContent, ElementPath};
use super::document::DocumentElement;
use super::events::XmlEvent;
use crate::config::IngestConfig;

/// Structural failures. Any of these means the document does not follow the
/// expected schema and must be rejected as a whole.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeBuildError {
    #[error("unexpected closing element </{found}>, expected </{expected}>")]
    UnexpectedEnd { expected: String, found: String },

    #[error("closing element </{0}> with no open element")]
    NoOpenElement(String),

    #[error("unrecognized elements nested {depth} deep (limit {limit})")]
    UnrecognizedTooDeep { depth: usize, limit: usize },

    #[error("malformed XML: {0}")]
    Xml(String),

    #[error("document has no <{}> element", DocumentElement::CONTAINER)]
    MissingContainer,

    #[error("element <{0}> was never closed")]
    UnclosedElement(String),
}

pub type Result<T> = std::result::Result<T, TreeBuildError>;

/// A completed output element and its accumulated content.
pub type CompletedElement = (DocumentElement, ElementContent);

pub struct ContentTreeBuilder {
    current: Option<DocumentElement>,
    unrecognized: Vec<String>,
    content: HashMap<DocumentElement, ElementContent>,
    output_elements: HashSet<DocumentElement>,
    completed: VecDeque<CompletedElement>,
    trim_whitespace: bool,
    max_unrecognized_depth: usize,
    saw_container: bool,
}

impl ContentTreeBuilder {
    pub fn new(output_elements: impl IntoIterator<Item = DocumentElement>) -> Self {
        Self::with_config(output_elements, &IngestConfig::default())
    }

    pub fn with_config(
        output_elements: impl IntoIterator<Item = DocumentElement>,
        config: &IngestConfig,
    ) -> Self {
        Self {
            current: None,
            unrecognized: Vec::new(),
            content: HashMap::new(),
            output_elements: output_elements.into_iter().collect(),
            completed: VecDeque::new(),
            trim_whitespace: config.trim_whitespace,
            max_unrecognized_depth: config.max_unrecognized_depth,
            saw_container: false,
        }
    }

    pub fn handle(&mut self, event: XmlEvent) -> Result<()> {
        match event {
            XmlEvent::StartElement(name) => self.start_element(&name),
            XmlEvent::Characters(text) => {
                self.characters(&text);
                Ok(())
            }
            XmlEvent::EndElement(name) => self.end_element(&name),
        }
    }

    pub fn start_element(&mut self, name: &str) -> Result<()> {
        if self.unrecognized.is_empty() {
            match self.current {
                Some(current) => {
                    if let Some(child) = current.child(name) {
                        self.current = Some(child);
                        return Ok(());
                    }
                }
                None if name == DocumentElement::CONTAINER => {
                    self.current = Some(DocumentElement::container());
                    self.saw_container = true;
                    return Ok(());
                }
                None => {}
            }
        }

        self.unrecognized.push(name.to_string());
        if self.unrecognized.len() > self.max_unrecognized_depth {
            return Err(TreeBuildError::UnrecognizedTooDeep {
                depth: self.unrecognized.len(),
                limit: self.max_unrecognized_depth,
            });
        }
        Ok(())
    }

    pub fn characters(&mut self, text: &str) {
        if !self.unrecognized.is_empty() {
            return;
        }
        let Some(current) = self.current else {
            return;
        };

        let text = if self.trim_whitespace { text.trim() } else { text };
        if text.is_empty() {
            return;
        }

        let node = ElementContent::String(text.to_string());
        match self.content.get_mut(&current) {
            Some(existing) => existing.append(node),
            None => {
                self.content.insert(current, node);
            }
        }
    }

    pub fn end_element(&mut self, name: &str) -> Result<()> {
        if let Some(open) = self.unrecognized.last() {
            if open != name {
                return Err(TreeBuildError::UnexpectedEnd {
                    expected: open.clone(),
                    found: name.to_string(),
                });
            }
            self.unrecognized.pop();
            return Ok(());
        }

        let current = self
            .current
            .ok_or_else(|| TreeBuildError::NoOpenElement(name.to_string()))?;
        if current.leaf_name() != name {
            return Err(TreeBuildError::UnexpectedEnd {
                expected: current.leaf_name().to_string(),
                found: name.to_string(),
            });
        }

        let content = self.content.remove(&current);
        let parent = current.parent();

        if self.output_elements.contains(&current) {
            self.completed.push_back((
                current,
                content.unwrap_or_else(|| ElementContent::Compound(Vec::new())),
            ));
        } else if let Some(parent) = parent {
            let node = ElementContent::Element(name.to_string(), content.map(Box::new));
            match self.content.get_mut(&parent) {
                Some(existing) => existing.append(node),
                None => {
                    self.content.insert(parent, node);
                }
            }
        }

        self.current = parent;
        Ok(())
    }

    /// Next completed output element, in document order.
    pub fn pop_completed(&mut self) -> Option<CompletedElement> {
        self.completed.pop_front()
    }

    /// Validate the end-of-document state.
    pub fn finish(&self) -> Result<()> {
        if let Some(open) = self.unrecognized.last() {
            return Err(TreeBuildError::UnclosedElement(open.clone()));
        }
        if let Some(current) = self.current {
            return Err(TreeBuildError::UnclosedElement(current.leaf_name().to_string()));
        }
        if !self.saw_container {
            return Err(TreeBuildError::MissingContainer);
        }
        Ok(())
    }
}
