//! Inline style (`element.style`)

/// Ordered inline style declarations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssStyleDeclaration {
    properties: Vec<(String, String)>,
}

impl CssStyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Set one property. Accepts `fontSize` as well as `font-size`; an empty
    /// value removes the property.
    pub fn set_property(&mut self, name: &str, value: &str) {
        let name = to_kebab_case(name.trim());
        let value = value.trim();
        if name.is_empty() {
            return;
        }
        if value.is_empty() {
            self.remove_property(&name);
            return;
        }
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.properties.push((name, value.to_string())),
        }
    }

    pub fn get_property_value(&self, name: &str) -> Option<&str> {
        let name = to_kebab_case(name);
        self.properties
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove_property(&mut self, name: &str) -> Option<String> {
        let name = to_kebab_case(name);
        let index = self.properties.iter().position(|(n, _)| *n == name)?;
        Some(self.properties.remove(index).1)
    }

    /// Replace every declaration from a `cssText` string
    pub fn set_css_text(&mut self, text: &str) {
        self.properties.clear();
        for decl in text.split(';') {
            if let Some((name, value)) = decl.split_once(':') {
                self.set_property(name, value);
            }
        }
    }

    /// Serialized `cssText`
    pub fn css_text(&self) -> String {
        self.properties
            .iter()
            .map(|(n, v)| format!("{n}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

fn to_kebab_case(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_property() {
        let mut style = CssStyleDeclaration::new();
        style.set_property("fontSize", "18px");
        assert_eq!(style.get_property_value("font-size"), Some("18px"));
        assert_eq!(style.css_text(), "font-size: 18px;");
    }

    #[test]
    fn test_css_text_round_trip_replaces() {
        let mut style = CssStyleDeclaration::new();
        style.set_property("color", "blue");
        style.set_css_text("color: red; margin : 0 ;; bogus");
        assert_eq!(style.len(), 2);
        assert_eq!(style.get_property_value("color"), Some("red"));
        assert_eq!(style.get_property_value("margin"), Some("0"));
    }

    #[test]
    fn test_empty_value_removes() {
        let mut style = CssStyleDeclaration::new();
        style.set_property("color", "red");
        style.set_property("color", "");
        assert!(style.is_empty());
    }

    #[test]
    fn test_custom_property_kept_verbatim() {
        let mut style = CssStyleDeclaration::new();
        style.set_property("--accentColor", "gold");
        assert_eq!(style.get_property_value("--accentColor"), Some("gold"));
    }
}
