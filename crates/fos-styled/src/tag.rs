//! Flat rule stores
//!
//! Three interchangeable ways of holding an ordered list of rule strings:
//! a plain buffer for the server, text nodes inside a `<style>` element,
//! and the element's live CSSOM sheet.

use fos_dom::NodeId;

use crate::config::SheetOptions;
use crate::context::{SharedDocument, StyleContext};
use crate::dom::make_style_tag;

/// Ordered rule storage addressed by absolute rule index
pub trait Tag: std::fmt::Debug {
    /// Insert `rule` at `index`. Returns false if the store rejected it.
    fn insert_rule(&mut self, index: usize, rule: &str) -> bool;

    fn delete_rule(&mut self, index: usize);

    /// Rule text at `index`, empty if out of range
    fn get_rule(&self, index: usize) -> String;

    /// Number of stored rules
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delete `count` rules starting at `index`
    fn delete_range(&mut self, index: usize, count: usize) {
        for _ in 0..count {
            self.delete_rule(index);
        }
    }
}

/// Buffer-backed store used on the server or without a document
#[derive(Debug, Default)]
pub struct VirtualTag {
    rules: Vec<String>,
}

impl VirtualTag {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tag for VirtualTag {
    fn insert_rule(&mut self, index: usize, rule: &str) -> bool {
        if index > self.rules.len() {
            return false;
        }
        self.rules.insert(index, rule.to_string());
        true
    }

    fn delete_rule(&mut self, index: usize) {
        if index < self.rules.len() {
            self.rules.remove(index);
        }
    }

    fn get_rule(&self, index: usize) -> String {
        self.rules.get(index).cloned().unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.rules.len()
    }
}

/// One text node per rule inside an active `<style>` element
#[derive(Debug)]
pub struct TextTag {
    document: SharedDocument,
    element: NodeId,
    length: usize,
}

impl TextTag {
    pub fn new(document: SharedDocument, element: NodeId) -> Self {
        Self { document, element, length: 0 }
    }

    pub fn element(&self) -> NodeId {
        self.element
    }
}

impl Tag for TextTag {
    fn insert_rule(&mut self, index: usize, rule: &str) -> bool {
        if index > self.length {
            return false;
        }

        let mut document = self.document.borrow_mut();
        let reference = document.tree.child_at(self.element, index);
        let node = document.tree.create_text(rule);
        match document.tree.insert_before(self.element, node, reference) {
            Ok(_) => {
                self.length += 1;
                true
            }
            Err(err) => {
                tracing::warn!(%err, "text tag rejected rule");
                false
            }
        }
    }

    fn delete_rule(&mut self, index: usize) {
        if index >= self.length {
            return;
        }
        let mut document = self.document.borrow_mut();
        if let Some(node) = document.tree.child_at(self.element, index) {
            if document.tree.remove_child(self.element, node).is_ok() {
                self.length -= 1;
            }
        }
    }

    fn get_rule(&self, index: usize) -> String {
        if index >= self.length {
            return String::new();
        }
        let document = self.document.borrow();
        document.tree
            .child_at(self.element, index)
            .map(|node| document.tree.text_content(node))
            .unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.length
    }
}

/// The live CSSOM sheet of an active `<style>` element
#[derive(Debug)]
pub struct CssomTag {
    document: SharedDocument,
    element: NodeId,
}

impl CssomTag {
    pub fn new(document: SharedDocument, element: NodeId) -> Self {
        Self { document, element }
    }

    pub fn element(&self) -> NodeId {
        self.element
    }
}

impl Tag for CssomTag {
    fn insert_rule(&mut self, index: usize, rule: &str) -> bool {
        let mut document = self.document.borrow_mut();
        let inserted = document.style_sheet_mut(self.element)
            .and_then(|sheet| sheet.insert_rule(rule, index));
        match inserted {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(%err, "CSSOM rejected rule");
                false
            }
        }
    }

    fn delete_rule(&mut self, index: usize) {
        let mut document = self.document.borrow_mut();
        let deleted = document.style_sheet_mut(self.element)
            .and_then(|sheet| sheet.delete_rule(index));
        if let Err(err) = deleted {
            tracing::debug!(%err, "CSSOM delete failed");
        }
    }

    fn get_rule(&self, index: usize) -> String {
        self.document.borrow()
            .style_sheet(self.element)
            .and_then(|sheet| sheet.rule(index))
            .map(str::to_string)
            .unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.document.borrow()
            .style_sheet(self.element)
            .map_or(0, |sheet| sheet.len())
    }
}

/// Pick the store for `options`
///
/// Server sheets, and any sheet whose context has no document, get a
/// [`VirtualTag`]. Client sheets mount a fresh active `<style>` element.
pub fn make_tag(context: &StyleContext, options: &SheetOptions) -> Box<dyn Tag> {
    let document = match context.document() {
        Some(document) if !options.is_server => document,
        _ => return Box::new(VirtualTag::new()),
    };

    let element = make_style_tag(
        &mut document.borrow_mut(),
        options.target,
        options.nonce.as_deref(),
    );
    match element {
        Ok(element) if options.use_cssom_injection => {
            Box::new(CssomTag::new(document.clone(), element))
        }
        Ok(element) => Box::new(TextTag::new(document.clone(), element)),
        Err(err) => {
            tracing::warn!(%err, "could not mount style tag, falling back to a virtual tag");
            Box::new(VirtualTag::new())
        }
    }
}
