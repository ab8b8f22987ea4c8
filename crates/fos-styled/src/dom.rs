//! Document glue: surfaces, style containers and global style tags

use fos_dom::{Document, DomResult, NodeId};

use crate::config::Target;
use crate::{SC_ATTR, SC_ATTR_ACTIVE, SC_ATTR_VERSION, SC_GLOBAL_ATTR, SC_VERSION};

/// The container a sheet rehydrates from: the document or one shadow root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Document,
    ShadowRoot(NodeId),
}

/// Resolve the surface for a mount target
pub fn resolve_surface(document: &Document, target: Option<Target>) -> Surface {
    match target {
        None => Surface::Document,
        Some(Target::ShadowRoot(root)) => Surface::ShadowRoot(root),
        Some(Target::Element(element)) => {
            let root = document.tree.root_node(element);
            if document.tree.is_shadow_root(root) {
                Surface::ShadowRoot(root)
            } else {
                Surface::Document
            }
        }
    }
}

/// Node whose subtree is searched for `surface`
pub(crate) fn surface_root(document: &Document, surface: Surface) -> NodeId {
    match surface {
        Surface::Document => document.root(),
        Surface::ShadowRoot(root) => root,
    }
}

/// Server-rendered containers under `surface` that have not been claimed yet
pub(crate) fn rehydration_containers(document: &Document, surface: Surface) -> Vec<NodeId> {
    let root = surface_root(document, surface);
    document.tree.query_all(root, |e| {
        e.is("style")
            && e.get_attr(SC_ATTR_VERSION) == Some(SC_VERSION)
            && e.get_attr(SC_ATTR).is_some_and(|value| value != SC_ATTR_ACTIVE)
    })
}

fn find_last_style_tag(document: &Document, parent: NodeId) -> Option<NodeId> {
    document.tree
        .children(parent)
        .filter(|&child| {
            document.tree.element(child).is_some_and(|e| e.is("style") && e.has_attr(SC_ATTR))
        })
        .last()
}

/// Create an active `<style>` container in `target` (default `<head>`)
///
/// It is placed right after the last existing styled container of that
/// parent so sheets created later keep cascading after earlier ones.
pub fn make_style_tag(
    document: &mut Document,
    target: Option<Target>,
    nonce: Option<&str>,
) -> DomResult<NodeId> {
    let parent = target.map_or(document.head(), Target::node);

    let mut attrs = vec![(SC_ATTR, SC_ATTR_ACTIVE), (SC_ATTR_VERSION, SC_VERSION)];
    if let Some(nonce) = nonce {
        attrs.push(("nonce", nonce));
    }
    let style = document.create_element("style", &attrs);

    let next = find_last_style_tag(document, parent).and_then(|prev| document.tree.next_sibling(prev));
    document.tree.insert_before(parent, style, next)?;

    tracing::debug!(?parent, "created active style tag");
    Ok(style)
}

/// Detach every `style[data-styled-global="id"]` on the target's surface
///
/// Returns how many elements were removed.
pub fn remove_global_style_tag(document: &mut Document, id: &str, target: Option<Target>) -> usize {
    let surface = resolve_surface(document, target);
    let root = surface_root(document, surface);
    let tags = document.tree.query_all(root, |e| {
        e.is("style") && e.get_attr(SC_GLOBAL_ATTR) == Some(id)
    });

    tags.into_iter().filter(|&tag| document.tree.detach(tag)).count()
}
