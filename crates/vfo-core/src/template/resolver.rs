//! Merge-tag resolution.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

fn merge_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("merge tag pattern is valid"))
}

/// Replaces every `{{identifier}}` in `template` with `vars[identifier]`.
///
/// Unknown identifiers resolve to an empty string. Resolution is a single
/// pass: values that themselves contain `{{...}}` are not expanded again.
pub fn resolve(template: &str, vars: &HashMap<String, String>) -> String {
    merge_tag_pattern()
        .replace_all(template, |caps: &Captures| {
            vars.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// Lists the distinct merge-tag identifiers used in `template`, in order of
/// first appearance.
pub fn merge_tags(template: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for caps in merge_tag_pattern().captures_iter(template) {
        let tag = &caps[1];
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}
