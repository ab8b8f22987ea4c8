//! Global styles
//!
//! Every mounted instance of a global style owns its own group, keyed by
//! the component id followed by the instance number.

use fos_dom::Document;

use crate::config::Target;
use crate::dom::remove_global_style_tag;
use crate::sheet::StyleSheet;

const GLOBAL_PREFIX: &str = "sc-global-";

/// A global style component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalStyle {
    component_id: String,
}

impl GlobalStyle {
    pub fn new(hash: &str) -> Self {
        Self {
            component_id: format!("{GLOBAL_PREFIX}{hash}"),
        }
    }

    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    /// Id of the group owned by `instance`
    pub fn instance_id(&self, instance: u32) -> String {
        format!("{}{instance}", self.component_id)
    }

    /// Take the next instance number from the sheet's shared counters
    pub fn allocate_instance(&self, sheet: &mut StyleSheet) -> u32 {
        sheet.allocate_instance(&self.component_id)
    }

    /// Replace the rules of `instance`, named after its instance id
    ///
    /// Instances past the second register their id before anything else.
    pub fn render_styles<S: AsRef<str>>(&self, instance: u32, rules: &[S], sheet: &mut StyleSheet) {
        let id = self.instance_id(instance);
        if instance > 2 {
            sheet.register_id(&id);
        }
        sheet.clear_rules(&id);
        sheet.insert_rules(&id, &id, rules);
    }

    pub fn remove_styles(&self, instance: u32, sheet: &mut StyleSheet) {
        sheet.clear_rules(&self.instance_id(instance));
    }

    /// Rules of `instance` as text, for inline server emission
    pub fn render_inline(&self, instance: u32, sheet: &StyleSheet) -> String {
        sheet.group_text(&self.instance_id(instance))
    }

    /// Detach this component's inline `<style>` elements from the target's surface
    pub fn remove_style_tags(&self, document: &mut Document, target: Option<Target>) -> usize {
        remove_global_style_tag(document, &self.component_id, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetOptions;
    use crate::context::StyleContext;

    fn server_sheet() -> StyleSheet {
        StyleSheet::new(&StyleContext::server(), SheetOptions::server())
    }

    #[test]
    fn test_instances_get_separate_groups() {
        let mut sheet = server_sheet();
        let global = GlobalStyle::new("abc");
        assert_eq!(global.component_id(), "sc-global-abc");

        let first = global.allocate_instance(&mut sheet);
        let second = global.allocate_instance(&mut sheet);
        assert_eq!((first, second), (1, 2));

        global.render_styles(first, &["body{margin:0;}"], &mut sheet);
        global.render_styles(second, &["html{color:red;}"], &mut sheet);
        assert_eq!(global.render_inline(first, &sheet), "body{margin:0;}/*!sc*/\n");
        assert_eq!(global.render_inline(second, &sheet), "html{color:red;}/*!sc*/\n");
        assert!(sheet.has_fingerprint("sc-global-abc1", "sc-global-abc1"));
    }

    #[test]
    fn test_render_always_replaces_previous_rules() {
        let mut sheet = server_sheet();
        let global = GlobalStyle::new("abc");
        let instance = global.allocate_instance(&mut sheet);

        global.render_styles(instance, &["body{margin:0;}"], &mut sheet);
        global.render_styles(instance, &["body{margin:0;}"], &mut sheet);
        assert_eq!(global.render_inline(instance, &sheet), "body{margin:0;}/*!sc*/\n");

        global.render_styles(instance, &["body{margin:1px;}"], &mut sheet);
        assert_eq!(global.render_inline(instance, &sheet), "body{margin:1px;}/*!sc*/\n");

        global.remove_styles(instance, &mut sheet);
        assert_eq!(global.render_inline(instance, &sheet), "");
        assert!(!sheet.has_fingerprint(&global.instance_id(instance), &global.instance_id(instance)));
    }

    #[test]
    fn test_groups_follow_render_order() {
        let mut sheet = server_sheet();
        let global = GlobalStyle::new("abc");
        for _ in 0..3 {
            global.allocate_instance(&mut sheet);
        }

        global.render_styles(3, &[".third{}"], &mut sheet);
        let third = sheet.register_id(&global.instance_id(3));
        global.render_styles(1, &[".first{}"], &mut sheet);
        assert!(sheet.register_id(&global.instance_id(1)) > third);
        assert_eq!(global.render_inline(3, &sheet), ".third{}/*!sc*/\n");
    }

    #[test]
    fn test_remove_style_tags() {
        let mut document = Document::default();
        let global = GlobalStyle::new("abc");
        let head = document.head();
        let style = document.create_element("style", &[(crate::SC_GLOBAL_ATTR, "sc-global-abc")]);
        document.tree.append_child(head, style).unwrap();

        assert_eq!(global.remove_style_tags(&mut document, None), 1);
        assert_eq!(document.tree.child_count(head), 0);
    }
}
