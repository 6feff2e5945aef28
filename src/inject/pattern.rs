//! Rule-based preload injection.
//!
//! Every output file is tested against the configured rules in order; the
//! first matching rule produces one link. Links are either spliced into the
//! head tag list or rendered over a placeholder in finished html.

use std::borrow::Cow;

use crate::config::Rule;
use crate::tag::{Attributes, HtmlTag, render_all};

/// Build the link for `file_name` from the first matching rule.
///
/// Defaults are `href = file_name` and `rel = "preload"`. Rule attributes
/// are layered on top: a default the rule also sets takes the rule's
/// position and value, so `href = "alt.css"` redirects the hint and
/// `href = false` drops it. Returns `None` when no rule matches or when
/// every attribute ends up suppressed.
pub fn generate_link(rules: &[Rule], file_name: &str) -> Option<HtmlTag> {
    let rule = rules.iter().find(|r| r.matches(file_name))?;

    let mut attrs = Attributes::new();
    if !rule.attributes.contains("href") {
        attrs.set("href", file_name);
    }
    if !rule.attributes.contains("rel") {
        attrs.set("rel", "preload");
    }
    for (name, value) in rule.attributes.iter() {
        attrs.set(name, value.clone());
    }

    attrs.has_rendered().then(|| HtmlTag::preload_link(attrs))
}

/// Links for every file that matches some rule, in file order.
pub fn collect_links<'a>(rules: &[Rule], files: impl IntoIterator<Item = &'a str>) -> Vec<HtmlTag> {
    files
        .into_iter()
        .filter_map(|file| generate_link(rules, file))
        .collect()
}

/// Replace the first `placeholder` in `html` with rendered links.
///
/// Documents without the placeholder come back untouched, which is how a
/// template opts out of injection.
pub fn inject_into_html<'a>(html: &'a str, placeholder: &str, links: &[HtmlTag]) -> Cow<'a, str> {
    if placeholder.is_empty() || !html.contains(placeholder) {
        return Cow::Borrowed(html);
    }
    Cow::Owned(html.replacen(placeholder, &render_all(links), 1))
}

/// Splice links before the first `<link>` in head, or at the front.
pub fn inject_into_head(head: &mut Vec<HtmlTag>, links: Vec<HtmlTag>) {
    let index = head.iter().position(|t| t.is("link")).unwrap_or(0);
    head.splice(index..index, links);
}
