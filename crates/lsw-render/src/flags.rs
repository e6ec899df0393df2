//! Open error report list shown in the flag dialog

use lsw_dom::NodeId;

use crate::{Attributes, OpenFlag, RenderResult, SecureDom};

impl SecureDom {
    pub fn render_open_flags(&mut self, container: NodeId, flags: &[OpenFlag]) -> RenderResult<()> {
        if flags.is_empty() {
            self.set_empty_state(container, Some("No open reports."))?;
            return Ok(());
        }

        self.build(|dom| {
            let mut entries = Vec::with_capacity(flags.len());
            for flag in flags {
                let entry = dom.create_element("div", &Attributes::class("border-b border-slate-700 py-2"), None)?;
                let title = dom.create_element("p", &Attributes::class("font-semibold"), Some(&flag.title()))?;
                let reason = dom.create_element("p", &Attributes::class("text-xs text-gray-400"), Some(&flag.reason))?;
                dom.append_content(entry, [title, reason])?;
                entries.push(entry);
            }
            dom.replace_content(container, entries)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_flags() {
        let mut dom = SecureDom::default();
        let list = dom.create_element("div", &Attributes::new().id("open-flags-list"), None).unwrap();
        dom.set_loading_state(list, Some("Loading open reports...")).unwrap();

        let flags = [
            OpenFlag {
                item_type: "Question".into(),
                item_name: Some("Q7".into()),
                flagged_item_id: 7,
                reason: "Wrong <answer>".into(),
            },
            OpenFlag {
                item_type: "Story".into(),
                item_name: None,
                flagged_item_id: 3,
                reason: String::new(),
            },
        ];
        dom.render_open_flags(list, &flags).unwrap();

        let entries = dom.children(list);
        assert_eq!(entries.len(), 2);
        assert_eq!(dom.text_content(entries[0]), "Question: Q7Wrong <answer>");
        assert_eq!(dom.text_content(entries[1]), "Story: ID: 3");
        // empty reason leaves the paragraph childless
        let reason = dom.children(entries[1])[1];
        assert!(dom.children(reason).is_empty());
    }

    #[test]
    fn test_no_open_flags() {
        let mut dom = SecureDom::default();
        let list = dom.create_element("div", &Attributes::new(), None).unwrap();
        dom.render_open_flags(list, &[]).unwrap();
        assert_eq!(dom.text_content(list), "No open reports.");
    }
}
