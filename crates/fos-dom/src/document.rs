//! Document - High-level document API

use std::collections::HashMap;

use crate::{CssStyleSheet, DomError, DomResult, DomTree, NodeId};

/// HTML Document
///
/// Owns the tree plus the CSSOM sheets of its `<style>` elements. A sheet is
/// created on first access and survives the element being detached.
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    sheets: HashMap<NodeId, CssStyleSheet>,
}

impl Document {
    /// Create a document with `<html>`, `<head>` and `<body>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        // Create basic document structure
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            sheets: HashMap::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Create a detached element with the given attributes
    pub fn create_element(&mut self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.tree.create_element(tag);
        if let Some(element) = self.tree.get_mut(id).and_then(|n| n.as_element_mut()) {
            for (name, value) in attrs {
                element.set_attr(name, *value);
            }
        }
        id
    }

    /// CSSOM sheet of a `<style>` element, if one was created
    pub fn style_sheet(&self, style: NodeId) -> Option<&CssStyleSheet> {
        self.sheets.get(&style)
    }

    /// CSSOM sheet of a `<style>` element, created on first access
    pub fn style_sheet_mut(&mut self, style: NodeId) -> DomResult<&mut CssStyleSheet> {
        let element = self.tree.element(style).ok_or(DomError::NotAnElement(style))?;
        if !element.is("style") {
            return Err(DomError::NotAnElement(style));
        }
        Ok(self.sheets.entry(style).or_default())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_structure() {
        let doc = Document::default();
        assert_eq!(doc.url(), "about:blank");
        assert_eq!(doc.tree.parent(doc.head()), Some(doc.document_element()));
        assert_eq!(doc.tree.parent(doc.body()), Some(doc.document_element()));
        assert_eq!(doc.tree.root_node(doc.body()), doc.root());
        assert_eq!(doc.tree.children(doc.root()).collect::<Vec<_>>(), vec![doc.document_element()]);
        assert_eq!(
            doc.tree.children(doc.document_element()).collect::<Vec<_>>(),
            vec![doc.head(), doc.body()]
        );
    }

    #[test]
    fn test_style_sheet_only_on_style_elements() {
        let mut doc = Document::default();
        let style = doc.create_element("style", &[("data-styled", "active")]);
        let div = doc.create_element("div", &[]);

        assert_eq!(doc.tree.get_attribute(style, "data-styled"), Some("active"));
        assert!(doc.style_sheet(style).is_none());

        doc.style_sheet_mut(style).unwrap().insert_rule(".a{}", 0).unwrap();
        assert_eq!(doc.style_sheet(style).map(|s| s.len()), Some(1));
        assert_eq!(doc.style_sheet_mut(div).err(), Some(DomError::NotAnElement(div)));
    }
}
