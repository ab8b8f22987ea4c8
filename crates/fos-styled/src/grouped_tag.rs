//! Grouped Tag
//!
//! Splits a flat [`Tag`] into per-group segments. Only the rule count of each
//! group is stored; a group's first rule index is the sum of the sizes of all
//! lower groups, so clearing a group never requires fixing up offsets.

use std::collections::BTreeMap;

use crate::registry::{Group, MAX_GROUP};
use crate::tag::Tag;
use crate::SPLITTER;

/// Segment-addressable view over a rule store
#[derive(Debug)]
pub struct GroupedTag {
    /// Rule count per group ever inserted into, sparse
    group_sizes: BTreeMap<Group, usize>,
    tag: Box<dyn Tag>,
}

impl GroupedTag {
    pub fn new(tag: Box<dyn Tag>) -> Self {
        Self {
            group_sizes: BTreeMap::new(),
            tag,
        }
    }

    /// Absolute index of the first rule of `group`
    pub fn index_of_group(&self, group: Group) -> usize {
        self.group_sizes.range(..group).map(|(_, size)| size).sum()
    }

    /// Append `rules` to the end of `group`
    ///
    /// Rules the underlying store rejects are skipped and not counted.
    /// Groups above [`MAX_GROUP`] are ignored.
    pub fn insert_rules<S: AsRef<str>>(&mut self, group: Group, rules: &[S]) {
        if group > MAX_GROUP {
            tracing::warn!(group, "group out of range, rules ignored");
            return;
        }

        let mut index = self.index_of_group(group) + self.group_size(group);
        let size = self.group_sizes.entry(group).or_insert(0);
        for rule in rules {
            if self.tag.insert_rule(index, rule.as_ref()) {
                *size += 1;
                index += 1;
            }
        }
    }

    /// Delete every rule of `group`, leaving the slot in place
    pub fn clear_group(&mut self, group: Group) {
        let count = self.group_size(group);
        if count == 0 {
            return;
        }
        let start = self.index_of_group(group);
        self.group_sizes.insert(group, 0);
        self.tag.delete_range(start, count);
    }

    /// Text of `group`, each rule followed by [`SPLITTER`]
    pub fn get_group(&self, group: Group) -> String {
        let count = self.group_size(group);
        if count == 0 {
            return String::new();
        }

        let start = self.index_of_group(group);
        let mut css = String::new();
        for index in start..start + count {
            css.push_str(&self.tag.get_rule(index));
            css.push_str(SPLITTER);
        }
        css
    }

    /// Number of rules in `group`
    pub fn group_size(&self, group: Group) -> usize {
        self.group_sizes.get(&group).copied().unwrap_or(0)
    }

    /// Groups ever inserted into, ascending
    pub fn groups(&self) -> impl Iterator<Item = Group> + '_ {
        self.group_sizes.keys().copied()
    }

    /// One past the highest group ever inserted into
    pub fn len(&self) -> usize {
        self.group_sizes.last_key_value().map_or(0, |(&group, _)| group + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.group_sizes.is_empty()
    }

    /// Number of groups currently holding rules
    pub fn non_empty_groups(&self) -> usize {
        self.group_sizes.values().filter(|&&size| size > 0).count()
    }

    /// The underlying flat store
    pub fn tag(&self) -> &dyn Tag {
        self.tag.as_ref()
    }
}
