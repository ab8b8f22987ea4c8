//! Style Sheet
//!
//! The controller owning one grouped tag, the per-id name (fingerprint)
//! cache and the shared global-style instance counters.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexSet;

use crate::config::{SheetOptions, SheetOptionsPatch};
use crate::context::StyleContext;
use crate::dom::{resolve_surface, Surface};
use crate::grouped_tag::GroupedTag;
use crate::registry::Group;
use crate::rehydration::{output_sheet, rehydrate_sheet};
use crate::tag::make_tag;

/// Names known per component id, in registration order
pub(crate) type NamesMap = HashMap<String, IndexSet<String>>;

/// Instance counters per global style id
type InstanceCounters = Rc<RefCell<HashMap<String, u32>>>;

/// Main stylesheet logic for insertion, caching and stringification
pub struct StyleSheet {
    context: StyleContext,
    options: SheetOptions,
    server: bool,
    names: NamesMap,
    instances: InstanceCounters,
    tag: Option<GroupedTag>,
}

impl StyleSheet {
    /// Create a sheet
    ///
    /// The first client sheet created for a surface rehydrates any
    /// server-rendered markup on it before returning.
    pub fn new(context: &StyleContext, options: SheetOptions) -> Self {
        let mut sheet = Self::from_parts(
            context.clone(),
            options,
            Rc::new(RefCell::new(HashMap::new())),
            NamesMap::new(),
        );

        if let Some(surface) = sheet.client_surface() {
            if context.claim_rehydration(surface) {
                rehydrate_sheet(&mut sheet);
            }
        }
        sheet
    }

    fn from_parts(
        context: StyleContext,
        options: SheetOptions,
        instances: InstanceCounters,
        names: NamesMap,
    ) -> Self {
        Self {
            server: options.is_server,
            context,
            options,
            names,
            instances,
            tag: None,
        }
    }

    /// Resolved surface, for client sheets with a document
    fn client_surface(&self) -> Option<Surface> {
        if self.server {
            return None;
        }
        let document = self.context.document()?;
        Some(resolve_surface(&document.borrow(), self.options.target))
    }

    /// Register `id` to give it a group
    pub fn register_id(&self, id: &str) -> Group {
        self.context.registry().group_for_id(id)
    }

    pub fn context(&self) -> &StyleContext {
        &self.context
    }

    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    pub fn is_server(&self) -> bool {
        self.server
    }

    /// Rehydrate from the resolved surface again (client sheets only)
    pub fn rehydrate(&mut self) {
        if !self.server && self.context.is_browser() {
            rehydrate_sheet(self);
        }
    }

    /// A new sheet with merged options
    ///
    /// Instance counters are always shared; names are copied when
    /// `keep_fingerprints` is set. A client result rehydrates before it is
    /// returned when its surface latch is still unclaimed, or when it moved
    /// to another surface than this sheet's.
    pub fn reconfigure(&self, patch: &SheetOptionsPatch, keep_fingerprints: bool) -> StyleSheet {
        let names = if keep_fingerprints {
            self.names.clone()
        } else {
            NamesMap::new()
        };
        let mut sheet = Self::from_parts(
            self.context.clone(),
            patch.apply(&self.options),
            Rc::clone(&self.instances),
            names,
        );

        if let Some(next) = sheet.client_surface() {
            let first = self.context.claim_rehydration(next);
            let moved = self.client_surface().is_some_and(|previous| previous != next);
            if first || moved {
                tracing::debug!(?next, first, moved, "rehydrating reconfigured sheet");
                rehydrate_sheet(&mut sheet);
            }
        }
        sheet
    }

    /// Bump and return the instance counter of `id`
    pub fn allocate_instance(&mut self, id: &str) -> u32 {
        let mut instances = self.instances.borrow_mut();
        let counter = instances.entry(id.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Lazily create the grouped tag
    pub fn get_tag(&mut self) -> &mut GroupedTag {
        let Self { tag, context, options, .. } = self;
        tag.get_or_insert_with(|| GroupedTag::new(make_tag(context, options)))
    }

    /// The grouped tag, if it was created
    pub fn tag(&self) -> Option<&GroupedTag> {
        self.tag.as_ref()
    }

    /// Whether `name` is known for `id`
    pub fn has_fingerprint(&self, id: &str, name: &str) -> bool {
        self.names.get(id).is_some_and(|names| names.contains(name))
    }

    /// Mark `name` as known for `id`, giving `id` a group if it had none
    pub fn register_fingerprint(&mut self, id: &str, name: &str) {
        self.context.registry().group_for_id(id);

        match self.names.get_mut(id) {
            Some(names) => {
                names.insert(name.to_string());
            }
            None => {
                self.names.insert(id.to_string(), IndexSet::from([name.to_string()]));
            }
        }
    }

    /// Insert rules into the group of `id`, registering `name`
    pub fn insert_rules<S: AsRef<str>>(&mut self, id: &str, name: &str, rules: &[S]) {
        self.register_fingerprint(id, name);
        let group = self.context.registry().group_for_id(id);
        self.get_tag().insert_rules(group, rules);
    }

    /// Forget every name of `id`
    pub fn clear_fingerprints(&mut self, id: &str) {
        if let Some(names) = self.names.get_mut(id) {
            names.clear();
        }
    }

    /// Delete every rule of `id`, and its names with them
    pub fn clear_rules(&mut self, id: &str) {
        let group = self.context.registry().group_for_id(id);
        self.get_tag().clear_group(group);
        self.clear_fingerprints(id);
    }

    /// Drop the whole tag but keep names
    ///
    /// Used between server output passes: later passes skip rules whose
    /// names were already emitted and only produce new ones.
    pub fn clear_surface(&mut self) {
        self.tag = None;
    }

    /// Names of `id` in registration order
    pub fn fingerprints(&self, id: &str) -> Option<&IndexSet<String>> {
        self.names.get(id)
    }

    /// Text of the group of `id`
    pub fn group_text(&self, id: &str) -> String {
        let group = self.context.registry().group_for_id(id);
        self.tag.as_ref().map(|tag| tag.get_group(group)).unwrap_or_default()
    }

    /// Serialize the sheet into the rehydratable text form
    pub fn serialize(&self) -> String {
        output_sheet(self)
    }
}

impl fmt::Display for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&output_sheet(self))
    }
}

impl fmt::Debug for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleSheet")
            .field("options", &self.options)
            .field("server", &self.server)
            .field("names", &self.names)
            .field("tag", &self.tag)
            .finish()
    }
}
