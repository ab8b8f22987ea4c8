//! Group Registry
//!
//! Bidirectional map from component ids to the group index their rules live
//! in. Groups are handed out monotonically starting at 1 and are never
//! reused; group 0 is reserved as the "ignore" sentinel of the wire format.

use std::cell::RefCell;
use std::collections::HashMap;

/// Index of a component's rule group
pub type Group = usize;

/// Highest group the registry and grouped tags accept
pub const MAX_GROUP: Group = 1 << 30;

#[derive(Debug)]
struct Allocations {
    by_id: HashMap<Box<str>, Group>,
    by_group: HashMap<Group, Box<str>>,
    next_free: Group,
}

impl Default for Allocations {
    fn default() -> Self {
        Self {
            by_id: HashMap::new(),
            by_group: HashMap::new(),
            next_free: 1,
        }
    }
}

impl Allocations {
    /// Both maps are only written here
    fn bind(&mut self, id: &str, group: Group) {
        self.by_id.insert(id.into(), group);
        self.by_group.insert(group, id.into());
    }
}

/// Id <-> group allocator shared by every sheet of one [`StyleContext`](crate::StyleContext)
#[derive(Debug, Default)]
pub struct GroupRegistry {
    inner: RefCell<Allocations>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group for `id`, allocating the next free one on first use
    pub fn group_for_id(&self, id: &str) -> Group {
        let mut inner = self.inner.borrow_mut();
        if let Some(&group) = inner.by_id.get(id) {
            return group;
        }

        while inner.by_group.contains_key(&inner.next_free) {
            inner.next_free += 1;
        }
        let group = inner.next_free;
        inner.next_free += 1;
        inner.bind(id, group);
        group
    }

    /// Id bound to `group`, if any
    pub fn id_for_group(&self, group: Group) -> Option<String> {
        self.inner.borrow().by_group.get(&group).map(|id| id.to_string())
    }

    /// Bind `id` to `group`, overwriting any previous binding
    ///
    /// Last write wins: an id forced onto a second group keeps its old reverse
    /// entry, and nothing is reported. Groups above [`MAX_GROUP`] are ignored.
    pub fn set_group_for_id(&self, id: &str, group: Group) {
        let Some(next) = group.checked_add(1).filter(|_| group <= MAX_GROUP) else {
            tracing::warn!(id, group, "forced group out of range, ignored");
            return;
        };
        let mut inner = self.inner.borrow_mut();
        inner.next_free = inner.next_free.max(next);
        inner.bind(id, group);
        tracing::trace!(id, group, "forced group assignment");
    }

    /// Number of ids with a group
    pub fn len(&self) -> usize {
        self.inner.borrow().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every allocation. Test harnesses only.
    pub fn reset(&self) {
        *self.inner.borrow_mut() = Allocations::default();
    }
}
