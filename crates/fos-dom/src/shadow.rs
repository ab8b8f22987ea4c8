//! Shadow DOM
//!
//! Shadow roots are separate subtrees hanging off a host element. They are
//! not children of the host, so tree walks from the document never see them.

use crate::{DomError, DomResult, DomTree, Node, NodeId};

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

impl DomTree {
    /// Attach a shadow root to `host`
    pub fn attach_shadow(&mut self, host: NodeId, mode: ShadowRootMode) -> DomResult<NodeId> {
        let element = self.get(host)
            .ok_or(DomError::InvalidNode(host))?
            .as_element()
            .ok_or(DomError::NotAnElement(host))?;
        if element.shadow_root.is_some() {
            return Err(DomError::HierarchyRequest);
        }

        let root = self.alloc(Node::shadow_root(host, mode));
        if let Some(element) = self.get_mut(host).and_then(Node::as_element_mut) {
            element.shadow_root = Some(root);
        }
        Ok(root)
    }

    /// Shadow root attached to `host`
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.element(host)?.shadow_root
    }

    /// Host element of a shadow root
    pub fn shadow_host(&self, root: NodeId) -> Option<NodeId> {
        self.get(root)?.as_shadow_root().map(|s| s.host)
    }

    pub fn is_shadow_root(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(Node::is_shadow_root)
    }
}
