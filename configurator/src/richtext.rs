//! Rich-text preparation
//!
//! Catalog descriptions are sometimes stored double-escaped: the real markup
//! is entity-escaped and wrapped in editor tags (`<p>&lt;b&gt;x&lt;/b&gt;</p>`).
//! Inside the escaped span (first `&lt;` to last `&gt;`) literal tags are
//! stripped and the escaped markup restored; markup outside it is kept as is.
//! The result goes to the external sanitizer, which is not part of this crate.

/// Entities restored from escaped markup; `&amp;` must come last
const ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&#x27;", "'"),
    ("&nbsp;", " "),
    ("&amp;", "&"),
];

/// Remove literal `<...>` tags, keeping the text between them
fn strip_tags(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_tag = false;
    for c in raw.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn unescape(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, ch)| acc.replace(entity, ch))
}

/// Prepare a description for sanitizing and display
///
/// Plain strings (no escaped markup) pass through unchanged.
pub fn prepare_rich_text(raw: &str) -> String {
    let Some(start) = raw.find("&lt;") else {
        return raw.to_string();
    };
    let end = raw
        .rfind("&gt;")
        .filter(|&pos| pos > start)
        .map_or(raw.len(), |pos| pos + "&gt;".len());

    let (head, rest) = raw.split_at(start);
    let (span, tail) = rest.split_at(end - start);
    format!("{}{}{}", head, unescape(&strip_tags(span)), tail)
}
