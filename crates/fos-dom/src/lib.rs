//! fOS DOM - Document Object Model
//!
//! Arena DOM tree used as the style surface: elements with attributes,
//! text nodes, shadow roots and CSSOM rule lists on `<style>` elements.

mod node;
mod tree;
mod document;
mod shadow;
mod cssom;

pub use node::{Node, NodeData, ElementData, TextData, Attribute, ShadowRootData};
pub use tree::{DomTree, Children};
pub use document::Document;
pub use shadow::ShadowRootMode;
pub use cssom::CssStyleSheet;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// No node
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Index {index} is out of bounds for a rule list of length {length}")]
    IndexSize { index: usize, length: usize },
    #[error("Failed to parse the rule: {rule}")]
    Syntax { rule: String },
    #[error("Node {0:?} does not exist")]
    InvalidNode(NodeId),
    #[error("Node {0:?} is not an element")]
    NotAnElement(NodeId),
    #[error("Hierarchy request error")]
    HierarchyRequest,
}
