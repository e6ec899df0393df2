//! String-level escaping for callers that need markup-safe text

use std::collections::HashMap;
use std::fmt::Display;

use lsw_dom::escape_text;

/// Escape every markup-significant character in `raw`
pub fn sanitize_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    escape_text(raw, &mut out);
    out
}

/// Substitute `{{ key }}` placeholders with escaped values.
///
/// Whitespace inside the braces is ignored. Placeholders without a value and
/// unterminated `{{` are copied through unchanged.
pub fn create_template<I, K, V>(template: &str, data: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Display,
{
    let values: HashMap<String, String> = data
        .into_iter()
        .map(|(k, v)| (k.into(), sanitize_html(&v.to_string())))
        .collect();

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = after[..end].trim();
        match values.get(key) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}
