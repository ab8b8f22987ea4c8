//! Rehydration
//!
//! The text form a sheet is transmitted in. For every non-empty group, in
//! ascending group order, the output holds the group's rules followed by a
//! marker rule recording the group, its id and its names:
//!
//! ```text
//! .a {}/*!sc*/
//! data-styled.g11[id="idA"]{content:"nameA,"}/*!sc*/
//! ```
//!
//! Rehydration splits the text on [`SPLITTER`], collects rules until it
//! reaches a marker, then inserts the collected rules into the marker's group.

use fos_dom::NodeId;

use crate::dom::{rehydration_containers, resolve_surface};
use crate::registry::{Group, MAX_GROUP};
use crate::sheet::StyleSheet;
use crate::{SC_ATTR, SPLITTER};

/// A parsed marker rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker<'a> {
    pub group: Group,
    pub id: &'a str,
    /// Comma-terminated name list
    pub content: &'a str,
}

impl<'a> Marker<'a> {
    /// Non-empty names listed in the marker
    pub fn names(&self) -> impl Iterator<Item = &'a str> {
        self.content.split(',').filter(|name| !name.is_empty())
    }
}

/// Encode the marker rule of one group
pub fn encode_marker<'a>(group: Group, id: &str, names: impl IntoIterator<Item = &'a str>) -> String {
    let mut content = String::new();
    for name in names.into_iter().filter(|name| !name.is_empty()) {
        content.push_str(name);
        content.push(',');
    }
    format!("{SC_ATTR}.g{group}[id=\"{id}\"]{{content:\"{content}\"}}")
}

/// Parse a marker rule
///
/// Accepts `data-styled.g<digits>[id="<word chars or ->"]`, then takes the
/// first quoted string on the same line as the name list. A missing closing
/// quote ends the list at the end of input. Groups above [`MAX_GROUP`] are
/// not markers.
pub fn parse_marker(part: &str) -> Option<Marker<'_>> {
    let rest = part.strip_prefix(SC_ATTR)?.strip_prefix(".g")?;

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let group = rest[..digits].parse::<Group>().ok().filter(|&group| group <= MAX_GROUP)?;

    let rest = rest[digits..].strip_prefix("[id=\"")?;
    let id_len = rest
        .bytes()
        .take_while(|&b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        .count();
    if id_len == 0 {
        return None;
    }
    let id = &rest[..id_len];
    let rest = rest[id_len..].strip_prefix("\"]")?;

    let open = rest.find(|c: char| c == '"' || c == '\n')?;
    if rest.as_bytes()[open] != b'"' {
        return None;
    }
    let content = &rest[open + 1..];
    let content = content.find('"').map_or(content, |close| &content[..close]);

    Some(Marker { group, id, content })
}

/// Serialize `sheet`
pub fn output_sheet(sheet: &StyleSheet) -> String {
    let Some(tag) = sheet.tag() else {
        return String::new();
    };
    let registry = sheet.context().registry();

    let mut css = String::new();
    for group in tag.groups() {
        let Some(id) = registry.id_for_group(group) else {
            continue;
        };
        let Some(names) = sheet.fingerprints(&id).filter(|names| !names.is_empty()) else {
            continue;
        };

        let rules = tag.get_group(group);
        if rules.is_empty() {
            continue;
        }

        css.push_str(&rules);
        css.push_str(&encode_marker(group, &id, names.iter().map(String::as_str)));
        css.push_str(SPLITTER);
    }
    css
}

/// Rehydrate `sheet` from previously emitted text
///
/// Returns the number of markers applied (group 0 markers are skipped).
/// Rules that are not followed by a marker are dropped.
pub fn rehydrate_sheet_from_text(sheet: &mut StyleSheet, text: &str) -> usize {
    let mut rules: Vec<&str> = Vec::new();
    let mut groups = 0;

    for part in text.split(SPLITTER) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let Some(marker) = parse_marker(part) else {
            rules.push(part);
            continue;
        };

        if marker.group != 0 {
            sheet.context().registry().set_group_for_id(marker.id, marker.group);
            for name in marker.names() {
                sheet.register_fingerprint(marker.id, name);
            }
            sheet.get_tag().insert_rules(marker.group, rules.as_slice());
            groups += 1;
        }
        rules.clear();
    }

    if !rules.is_empty() {
        tracing::debug!(dropped = rules.len(), "rules without a trailing marker were dropped");
    }
    groups
}

/// Rehydrate `sheet` from every unclaimed container on its surface
///
/// Each container is detached once its text has been read. Sheets without
/// a document have nothing to rehydrate from.
pub fn rehydrate_sheet(sheet: &mut StyleSheet) {
    let Some(document) = sheet.context().document().cloned() else {
        return;
    };

    let containers: Vec<(NodeId, String)> = {
        let document = document.borrow();
        let surface = resolve_surface(&document, sheet.options().target);
        rehydration_containers(&document, surface)
            .into_iter()
            .map(|node| (node, document.tree.text_content(node)))
            .collect()
    };

    let mut groups = 0;
    for (node, text) in &containers {
        groups += rehydrate_sheet_from_text(sheet, text);
        document.borrow_mut().tree.detach(*node);
    }

    tracing::debug!(containers = containers.len(), groups, "rehydrated sheet");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetOptions;
    use crate::context::StyleContext;

    #[test]
    fn test_encode_marker() {
        assert_eq!(
            encode_marker(11, "idA", ["nameA", "", "nameB"]),
            r#"data-styled.g11[id="idA"]{content:"nameA,nameB,"}"#
        );
        assert_eq!(
            encode_marker(3, "empty", std::iter::empty()),
            r#"data-styled.g3[id="empty"]{content:""}"#
        );
    }

    #[test]
    fn test_parse_marker() {
        let marker = parse_marker(r#"data-styled.g11[id="idA"]{content:"nameA,nameB,"}"#).unwrap();
        assert_eq!(marker.group, 11);
        assert_eq!(marker.id, "idA");
        assert_eq!(marker.names().collect::<Vec<_>>(), vec!["nameA", "nameB"]);

        let empty = parse_marker(r#"data-styled.g33[id="empty"]{content:""}"#).unwrap();
        assert_eq!(empty.names().count(), 0);
    }

    #[test]
    fn test_parse_marker_rejects_rules() {
        assert_eq!(parse_marker(".a {}"), None);
        assert_eq!(parse_marker(r#"data-styled.gx[id="a"]{content:""}"#), None);
        assert_eq!(parse_marker(r#"data-styled.g1[id="a b"]{content:""}"#), None);
        assert_eq!(parse_marker(r#"data-styled.g1[id="a"]{}"#), None);
        assert_eq!(parse_marker("data-styled.g1[id=\"a\"]\n{content:\"x\"}"), None);
    }

    #[test]
    fn test_parse_marker_unterminated_content() {
        let marker = parse_marker(r#"data-styled.g2[id="a"]{content:"x,y"#).unwrap();
        assert_eq!(marker.content, "x,y");
    }

    #[test]
    fn test_rehydrate_from_text() {
        let mut sheet = StyleSheet::new(&StyleContext::server(), SheetOptions::server());
        let text = "\n  .a {}/*!sc*/\n  data-styled.g11[id=\"idA\"]{content:\"nameA,\"}/*!sc*/\n  \
                    data-styled.g33[id=\"empty\"]{content:\"\"}/*!sc*/\n";

        assert_eq!(rehydrate_sheet_from_text(&mut sheet, text), 2);

        let registry = sheet.context().registry();
        assert_eq!(registry.id_for_group(11).as_deref(), Some("idA"));
        assert_eq!(registry.id_for_group(33).as_deref(), Some("empty"));
        assert!(sheet.has_fingerprint("idA", "nameA"));
        assert!(!sheet.has_fingerprint("empty", "empty"));

        let tag = sheet.tag().unwrap();
        assert_eq!(tag.get_group(11), ".a {}/*!sc*/\n");
        assert_eq!(tag.get_group(33), "");
        assert_eq!(tag.tag().len(), 1);
    }

    #[test]
    fn test_group_zero_is_ignored() {
        let mut sheet = StyleSheet::new(&StyleContext::server(), SheetOptions::server());
        let text = ".skip {}/*!sc*/\ndata-styled.g0[id=\"zero\"]{content:\"n,\"}/*!sc*/\n\
                    .keep {}/*!sc*/\ndata-styled.g4[id=\"four\"]{content:\"m,\"}/*!sc*/\n";

        assert_eq!(rehydrate_sheet_from_text(&mut sheet, text), 1);
        assert!(!sheet.has_fingerprint("zero", "n"));
        assert_eq!(sheet.context().registry().id_for_group(0), None);
        assert_eq!(sheet.tag().map(|t| t.get_group(4)), Some(".keep {}/*!sc*/\n".to_string()));
    }

    #[test]
    fn test_trailing_rules_are_dropped() {
        let mut sheet = StyleSheet::new(&StyleContext::server(), SheetOptions::server());
        let text = ".a {}/*!sc*/\ndata-styled.g1[id=\"a\"]{content:\"x,\"}/*!sc*/\n.orphan {}/*!sc*/\n";

        assert_eq!(rehydrate_sheet_from_text(&mut sheet, text), 1);
        assert_eq!(sheet.tag().map(|t| t.tag().len()), Some(1));
    }

    #[test]
    fn test_parse_marker_bounds_group() {
        let edge = format!("data-styled.g{MAX_GROUP}[id=\"a\"]{{content:\"x,\"}}");
        assert_eq!(parse_marker(&edge).map(|m| m.group), Some(MAX_GROUP));

        let past = format!("data-styled.g{}[id=\"a\"]{{content:\"x,\"}}", MAX_GROUP + 1);
        assert_eq!(parse_marker(&past), None);
        assert_eq!(parse_marker(r#"data-styled.g99999999999999999999999[id="a"]{content:"x,"}"#), None);
    }

    #[test]
    fn test_out_of_range_markers_degrade() {
        for group in ["18446744073709551615", "2305843009213693951", "1073741825"] {
            let mut sheet = StyleSheet::new(&StyleContext::server(), SheetOptions::server());
            let text = format!(".a{{}}/*!sc*/\ndata-styled.g{group}[id=\"a\"]{{content:\"x,\"}}/*!sc*/\n");

            assert_eq!(rehydrate_sheet_from_text(&mut sheet, &text), 0);
            assert!(!sheet.has_fingerprint("a", "x"));
            assert!(sheet.context().registry().is_empty());
            assert!(sheet.tag().is_none());
        }
    }

    #[test]
    fn test_marker_at_max_group_restores() {
        let mut sheet = StyleSheet::new(&StyleContext::server(), SheetOptions::server());
        let text = format!(".a{{}}/*!sc*/\ndata-styled.g{MAX_GROUP}[id=\"a\"]{{content:\"x,\"}}/*!sc*/\n");

        assert_eq!(rehydrate_sheet_from_text(&mut sheet, &text), 1);
        assert!(sheet.has_fingerprint("a", "x"));
        assert_eq!(sheet.tag().map(|t| t.get_group(MAX_GROUP)), Some(".a{}/*!sc*/\n".to_string()));
        assert_eq!(sheet.serialize(), text);
    }

    #[test]
    fn test_output_skips_groups_without_names() {
        let mut sheet = StyleSheet::new(&StyleContext::server(), SheetOptions::server());
        sheet.insert_rules("named", "n", &[".named {}"]);
        sheet.insert_rules("unnamed", "u", &[".unnamed {}"]);
        sheet.clear_fingerprints("unnamed");

        assert_eq!(
            output_sheet(&sheet),
            ".named {}/*!sc*/\ndata-styled.g1[id=\"named\"]{content:\"n,\"}/*!sc*/\n"
        );
    }
}
