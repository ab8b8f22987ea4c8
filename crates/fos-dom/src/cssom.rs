//! CSSOM rule lists
//!
//! The live rule list behind a `<style>` element. Rules are kept as text;
//! `insert_rule` only performs the structural check a browser would reject
//! outright (unbalanced blocks, missing prelude), it does not parse CSS.

use crate::{DomError, DomResult};

/// Live stylesheet of a `<style>` element
#[derive(Debug, Clone, Default)]
pub struct CssStyleSheet {
    rules: Vec<String>,
}

impl CssStyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `rule` at `index`, returning the index on success
    pub fn insert_rule(&mut self, rule: &str, index: usize) -> DomResult<usize> {
        if index > self.rules.len() {
            return Err(DomError::IndexSize { index, length: self.rules.len() });
        }
        if !is_well_formed(rule) {
            return Err(DomError::Syntax { rule: rule.to_string() });
        }
        self.rules.insert(index, rule.trim().to_string());
        Ok(index)
    }

    pub fn delete_rule(&mut self, index: usize) -> DomResult<()> {
        if index >= self.rules.len() {
            return Err(DomError::IndexSize { index, length: self.rules.len() });
        }
        self.rules.remove(index);
        Ok(())
    }

    /// Serialized rule text
    pub fn css_rules(&self) -> &[String] {
        &self.rules
    }

    pub fn rule(&self, index: usize) -> Option<&str> {
        self.rules.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// A statement at-rule (`@import ...;`) or `prelude { ... }` with balanced braces
fn is_well_formed(rule: &str) -> bool {
    let rule = rule.trim();
    if rule.is_empty() {
        return false;
    }
    if rule.starts_with('@') && rule.ends_with(';') && !rule.contains('{') {
        return true;
    }

    match rule.find('{') {
        Some(0) | None => return false,
        Some(_) => {}
    }
    if !rule.ends_with('}') {
        return false;
    }

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in rule.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    depth == 0 && quote.is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_delete() {
        let mut sheet = CssStyleSheet::new();
        sheet.insert_rule(".b{color:blue;}", 0).unwrap();
        sheet.insert_rule(".a{color:red;}", 0).unwrap();
        assert_eq!(sheet.css_rules(), &[".a{color:red;}", ".b{color:blue;}"]);

        sheet.delete_rule(0).unwrap();
        assert_eq!(sheet.rule(0), Some(".b{color:blue;}"));
        assert_eq!(sheet.delete_rule(5), Err(DomError::IndexSize { index: 5, length: 1 }));
    }

    #[test]
    fn test_index_past_end() {
        let mut sheet = CssStyleSheet::new();
        assert_eq!(
            sheet.insert_rule(".a{}", 1),
            Err(DomError::IndexSize { index: 1, length: 0 })
        );
    }

    #[test]
    fn test_rejects_malformed_rules() {
        let mut sheet = CssStyleSheet::new();
        assert!(sheet.insert_rule("", 0).is_err());
        assert!(sheet.insert_rule("{color:red}", 0).is_err());
        assert!(sheet.insert_rule(".a{color:red", 0).is_err());
        assert!(sheet.insert_rule(".a}{", 0).is_err());
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_accepts_nested_and_statement_rules() {
        let mut sheet = CssStyleSheet::new();
        sheet.insert_rule("@media (max-width:100px){.a{color:red;}}", 0).unwrap();
        sheet.insert_rule("@import url(\"x.css\");", 1).unwrap();
        sheet.insert_rule(".q::after{content:\"}\";}", 2).unwrap();
        assert_eq!(sheet.len(), 3);
    }
}
