//! Server Style Sheet
//!
//! Collects rules during a server render and emits them as `<style>` markup
//! the client can rehydrate from.

use fos_dom::{Document, NodeId};

use crate::config::SheetOptions;
use crate::context::StyleContext;
use crate::sheet::StyleSheet;
use crate::{StyledError, SC_ATTR, SC_ATTR_VERSION, SC_VERSION};

/// Server-side collector around a server-mode [`StyleSheet`]
#[derive(Debug)]
pub struct ServerStyleSheet {
    instance: StyleSheet,
    sealed: bool,
}

impl ServerStyleSheet {
    pub fn new(context: &StyleContext) -> Self {
        Self::with_options(context, SheetOptions::server())
    }

    /// Collector with custom options; server mode is always forced on
    pub fn with_options(context: &StyleContext, options: SheetOptions) -> Self {
        let options = SheetOptions { is_server: true, ..options };
        Self {
            instance: StyleSheet::new(context, options),
            sealed: false,
        }
    }

    pub fn instance(&self) -> &StyleSheet {
        &self.instance
    }

    pub fn instance_mut(&mut self) -> &mut StyleSheet {
        &mut self.instance
    }

    /// Run `render` against the collecting sheet
    pub fn collect_styles<R>(&mut self, render: impl FnOnce(&mut StyleSheet) -> R) -> Result<R, StyledError> {
        if self.sealed {
            return Err(StyledError::Sealed);
        }
        Ok(render(&mut self.instance))
    }

    /// Forbid further collection
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    fn attributes(&self) -> Vec<(&str, &str)> {
        let mut attrs = Vec::with_capacity(3);
        if let Some(nonce) = self.instance.options().nonce.as_deref() {
            attrs.push(("nonce", nonce));
        }
        attrs.push((SC_ATTR, "true"));
        attrs.push((SC_ATTR_VERSION, SC_VERSION));
        attrs
    }

    fn style_tag(&self, css: &str) -> String {
        if css.is_empty() {
            return String::new();
        }
        let attrs = self
            .attributes()
            .iter()
            .map(|(name, value)| format!("{name}=\"{value}\""))
            .collect::<Vec<_>>()
            .join(" ");
        format!("<style {attrs}>{css}</style>")
    }

    /// Markup for every collected rule, empty if there are none
    pub fn get_style_tags(&self) -> String {
        self.style_tag(&self.instance.serialize())
    }

    /// The same container as [`get_style_tags`](Self::get_style_tags), as a
    /// detached element of `document`
    pub fn get_style_element(&self, document: &mut Document) -> Result<NodeId, StyledError> {
        let attrs = self.attributes();
        let style = document.create_element("style", &attrs);
        document.tree.set_text_content(style, &self.instance.serialize())?;
        Ok(style)
    }

    /// Emit the rules collected since the previous chunk
    ///
    /// Names stay registered, so rules emitted once are skipped by later
    /// render passes.
    pub fn emit_css_chunk(&mut self) -> String {
        let html = self.get_style_tags();
        self.instance.clear_surface();
        tracing::trace!(bytes = html.len(), "emitted css chunk");
        html
    }
}
