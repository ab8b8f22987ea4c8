//! Style Context
//!
//! Process-lifetime state shared by every sheet: the group registry, the
//! document (absent on the server) and the one-shot rehydration latches.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use fos_dom::Document;

use crate::dom::Surface;
use crate::registry::GroupRegistry;

/// Document handle shared between sheets and the embedding layer
pub type SharedDocument = Rc<RefCell<Document>>;

struct ContextInner {
    registry: GroupRegistry,
    document: Option<SharedDocument>,
    rehydrated: RefCell<HashSet<Surface>>,
}

/// Cheap-to-clone handle to the shared styling state
#[derive(Clone)]
pub struct StyleContext {
    inner: Rc<ContextInner>,
}

impl StyleContext {
    fn with_document(document: Option<SharedDocument>) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                registry: GroupRegistry::new(),
                document,
                rehydrated: RefCell::new(HashSet::new()),
            }),
        }
    }

    /// Context without a document, as on a server
    pub fn server() -> Self {
        Self::with_document(None)
    }

    /// Context bound to a live document
    pub fn browser(document: SharedDocument) -> Self {
        Self::with_document(Some(document))
    }

    pub fn registry(&self) -> &GroupRegistry {
        &self.inner.registry
    }

    pub fn document(&self) -> Option<&SharedDocument> {
        self.inner.document.as_ref()
    }

    /// Whether a document is available
    pub fn is_browser(&self) -> bool {
        self.inner.document.is_some()
    }

    /// Claim the rehydration latch of `surface`. Returns true only the first time.
    pub fn claim_rehydration(&self, surface: Surface) -> bool {
        self.inner.rehydrated.borrow_mut().insert(surface)
    }

    pub fn ptr_eq(&self, other: &StyleContext) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for StyleContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleContext")
            .field("registry", &self.inner.registry)
            .field("browser", &self.is_browser())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_is_one_shot_per_surface() {
        let context = StyleContext::browser(Rc::new(RefCell::new(Document::default())));
        assert!(context.is_browser());
        assert!(context.claim_rehydration(Surface::Document));
        assert!(!context.claim_rehydration(Surface::Document));
    }

    #[test]
    fn test_clones_share_registry() {
        let context = StyleContext::server();
        let other = context.clone();
        let group = context.registry().group_for_id("shared");
        assert_eq!(other.registry().group_for_id("shared"), group);
        assert!(context.ptr_eq(&other));
        assert!(!context.is_browser());
    }
}
