//! Element kinds the renderer is allowed to construct

/// HTML elements that may be created from application code.
///
/// Script-bearing and embedding elements (`script`, `style`, `iframe`,
/// `object`, `embed`, `template`) are absent on purpose.
pub const KNOWN_TAGS: &[&str] = &[
    // Sections and grouping
    "div", "span", "section", "article", "aside", "header", "footer", "main", "nav",
    "p", "blockquote", "pre", "hr", "br", "figure", "figcaption",
    // Headings
    "h1", "h2", "h3", "h4", "h5", "h6",
    // Text-level
    "a", "strong", "em", "b", "i", "u", "small", "code", "mark", "sub", "sup", "abbr", "time",
    // Lists
    "ul", "ol", "li", "dl", "dt", "dd",
    // Tables
    "table", "caption", "thead", "tbody", "tfoot", "tr", "th", "td", "colgroup", "col",
    // Forms
    "form", "label", "input", "button", "select", "option", "optgroup", "textarea",
    "fieldset", "legend", "progress", "meter", "output",
    // Media
    "img", "picture", "source", "canvas", "svg",
    // Interactive
    "details", "summary", "dialog",
];

/// Check whether `tag` (case-insensitive) is on the allow-list
pub fn is_known_tag(tag: &str) -> bool {
    KNOWN_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}
