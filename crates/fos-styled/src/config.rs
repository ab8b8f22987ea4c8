//! Sheet Configuration

use fos_dom::NodeId;
use serde::{Deserialize, Serialize};

use crate::StyledError;

/// Where a sheet mounts its rules and looks for server-rendered markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// A shadow root, used as the surface directly
    ShadowRoot(NodeId),
    /// An element; its surface is the shadow root it lives in, or the document
    Element(NodeId),
}

impl Target {
    pub fn node(self) -> NodeId {
        match self {
            Target::ShadowRoot(node) | Target::Element(node) => node,
        }
    }
}

/// Sheet configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SheetOptions {
    /// Server mode: rules go to a text buffer and are never rehydrated
    pub is_server: bool,

    /// Insert through the CSSOM instead of text nodes (client only)
    #[serde(rename = "useCSSOMInjection")]
    pub use_cssom_injection: bool,

    /// Mount target; `None` means the document `<head>`
    #[serde(skip)]
    pub target: Option<Target>,

    /// Nonce written onto every emitted `<style>` element
    pub nonce: Option<String>,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            is_server: false,
            use_cssom_injection: true,
            target: None,
            nonce: None,
        }
    }
}

impl SheetOptions {
    /// Options for a server-rendering sheet
    pub fn server() -> Self {
        Self {
            is_server: true,
            ..Self::default()
        }
    }

    /// Load options from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, StyledError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }
}

/// Partial options applied by [`StyleSheet::reconfigure`](crate::StyleSheet::reconfigure)
///
/// Only fields that are set override the current options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetOptionsPatch {
    pub is_server: Option<bool>,
    pub use_cssom_injection: Option<bool>,
    pub target: Option<Option<Target>>,
    pub nonce: Option<Option<String>>,
}

impl SheetOptionsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn server(mut self, is_server: bool) -> Self {
        self.is_server = Some(is_server);
        self
    }

    pub fn cssom_injection(mut self, enabled: bool) -> Self {
        self.use_cssom_injection = Some(enabled);
        self
    }

    pub fn target(mut self, target: Option<Target>) -> Self {
        self.target = Some(target);
        self
    }

    pub fn nonce(mut self, nonce: Option<String>) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Merge onto `base`
    pub fn apply(&self, base: &SheetOptions) -> SheetOptions {
        SheetOptions {
            is_server: self.is_server.unwrap_or(base.is_server),
            use_cssom_injection: self.use_cssom_injection.unwrap_or(base.use_cssom_injection),
            target: self.target.unwrap_or(base.target),
            nonce: self.nonce.clone().unwrap_or_else(|| base.nonce.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SheetOptions::default();
        assert!(!options.is_server);
        assert!(options.use_cssom_injection);
        assert!(SheetOptions::server().is_server);
    }

    #[test]
    fn test_from_json() {
        let options = SheetOptions::from_json(r#"{"isServer": true, "nonce": "abc"}"#).unwrap();
        assert!(options.is_server);
        assert!(options.use_cssom_injection);
        assert_eq!(options.nonce.as_deref(), Some("abc"));

        let options = SheetOptions::from_json(r#"{"useCSSOMInjection": false}"#).unwrap();
        assert!(!options.use_cssom_injection);

        assert!(matches!(SheetOptions::from_json("{"), Err(StyledError::Config(_))));
    }

    #[test]
    fn test_patch_merges() {
        let base = SheetOptions {
            nonce: Some("n".to_string()),
            ..SheetOptions::server()
        };
        let patched = SheetOptionsPatch::new().cssom_injection(false).apply(&base);
        assert!(patched.is_server);
        assert!(!patched.use_cssom_injection);
        assert_eq!(patched.nonce.as_deref(), Some("n"));

        let cleared = SheetOptionsPatch::new().nonce(None).apply(&base);
        assert_eq!(cleared.nonce, None);
    }
}
