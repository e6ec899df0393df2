//! Dashboard views built on the secure renderer

use std::time::Duration;

use lsw_dom::NodeId;

use crate::{Attributes, Curriculum, DashboardUser, RenderResult, SecureDom, Topic};

const CELL_CLASS: &str = "border border-slate-600 px-4 py-2";

/// How long info and success messages stay up
pub const MESSAGE_AUTO_HIDE: Duration = Duration::from_secs(5);

/// Status message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl MessageKind {
    fn text_class(self) -> &'static str {
        match self {
            Self::Info => "text-blue-400",
            Self::Success => "text-green-400",
            Self::Warning => "text-yellow-400",
            Self::Error => "text-red-400",
        }
    }

    /// Info and success messages hide themselves
    pub fn auto_hide(self) -> Option<Duration> {
        matches!(self, Self::Info | Self::Success).then_some(MESSAGE_AUTO_HIDE)
    }
}

/// A message placed by [`SecureDom::show_message`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShownMessage {
    pub node: NodeId,
    /// When set, the caller should dismiss the message after this long
    pub auto_hide: Option<Duration>,
}

impl SecureDom {
    pub fn display_error(&mut self, container: NodeId, message: &str) -> RenderResult<NodeId> {
        self.set_error_state(container, Some(message))
    }

    pub fn display_loading(&mut self, container: NodeId, message: Option<&str>) -> RenderResult<NodeId> {
        self.set_loading_state(container, message)
    }

    pub fn display_curriculums(&mut self, container: NodeId, curriculums: &[Curriculum]) -> RenderResult<()> {
        if curriculums.is_empty() {
            self.set_empty_state(container, Some("No curriculums available"))?;
            return Ok(());
        }

        self.build(|dom| {
            let mut items = Vec::with_capacity(curriculums.len());
            for curriculum in curriculums {
                let attrs = Attributes::class("curriculum-item p-4 border rounded").data("curriculum-id", curriculum.id)?;
                items.push(dom.create_element("div", &attrs, Some(&curriculum.name))?);
            }
            dom.replace_content(container, items)
        })
    }

    pub fn display_topics(&mut self, container: NodeId, topics: &[Topic]) -> RenderResult<()> {
        if topics.is_empty() {
            self.set_empty_state(container, Some("No topics found"))?;
            return Ok(());
        }

        self.build(|dom| {
            let grid = dom.create_element("div", &Attributes::class("topics-grid grid gap-4"), None)?;
            for topic in topics {
                let card = dom.create_element(
                    "div",
                    &Attributes::class("topic-card bg-slate-800 p-4 rounded-lg border border-slate-700")
                        .data("topic-id", topic.id)?,
                    None,
                )?;
                let title = dom.create_element(
                    "h3",
                    &Attributes::class("text-lg font-semibold text-white mb-2"),
                    Some(&topic.name),
                )?;
                let description = topic
                    .description
                    .as_deref()
                    .filter(|d| !d.is_empty())
                    .unwrap_or("No description available");
                let description = dom.create_element("p", &Attributes::class("text-gray-400 text-sm"), Some(description))?;
                let button = dom.create_element(
                    "button",
                    &Attributes::class("mt-3 bg-yellow-400 text-slate-900 px-4 py-2 rounded hover:bg-yellow-300 transition")
                        .data("action", "view-topic")?
                        .data("topic-id", topic.id)?,
                    Some("View Topic"),
                )?;
                dom.append_content(card, [title, description, button])?;
                dom.append_content(grid, [card])?;
            }
            dom.replace_content(container, [grid])
        })
    }

    pub fn display_users(&mut self, container: NodeId, users: &[DashboardUser]) -> RenderResult<()> {
        if users.is_empty() {
            self.set_empty_state(container, Some("No users found"))?;
            return Ok(());
        }

        self.build(|dom| {
            let table = dom.create_element("table", &Attributes::class("w-full table-auto border-collapse"), None)?;
            let tbody = dom.create_element("tbody", &Attributes::new(), None)?;

            let header = dom.create_element("tr", &Attributes::class("bg-slate-700"), None)?;
            for label in ["Username", "Email", "Type", "Actions"] {
                let th = dom.create_element("th", &Attributes::class("border border-slate-600 px-4 py-2 text-left"), Some(label))?;
                dom.append_content(header, [th])?;
            }
            dom.append_content(tbody, [header])?;

            for user in users {
                let row = dom.create_element("tr", &Attributes::class("hover:bg-slate-800").data("user-id", user.id)?, None)?;
                let username = dom.create_element("td", &Attributes::class(CELL_CLASS), Some(&user.username))?;
                let email = dom.create_element("td", &Attributes::class(CELL_CLASS), Some(&user.email))?;
                let kind = dom.create_element("td", &Attributes::class(CELL_CLASS), Some(&user.usertype))?;
                let actions = dom.create_element("td", &Attributes::class(CELL_CLASS), None)?;

                let edit = dom.create_element(
                    "button",
                    &Attributes::class("bg-blue-500 text-white px-3 py-1 rounded text-sm mr-2 hover:bg-blue-600")
                        .data("action", "edit-user")?
                        .data("user-id", user.id)?,
                    Some("Edit"),
                )?;
                let delete = dom.create_element(
                    "button",
                    &Attributes::class("bg-red-500 text-white px-3 py-1 rounded text-sm hover:bg-red-600")
                        .data("action", "delete-user")?
                        .data("user-id", user.id)?,
                    Some("Delete"),
                )?;

                dom.append_content(actions, [edit, delete])?;
                dom.append_content(row, [username, email, kind, actions])?;
                dom.append_content(tbody, [row])?;
            }

            dom.append_content(table, [tbody])?;
            dom.replace_content(container, [table])
        })
    }

    /// Replace the container's content with a status message
    pub fn show_message(&mut self, container: NodeId, message: &str, kind: MessageKind) -> RenderResult<ShownMessage> {
        let class = format!("message {} text-center p-4", kind.text_class());
        self.build(|dom| {
            let node = dom.create_element("div", &Attributes::class(&class), Some(message))?;
            dom.replace_content(container, [node])?;
            Ok(ShownMessage { node, auto_hide: kind.auto_hide() })
        })
    }

    /// Remove a message if it is still shown in `container`
    pub fn dismiss_message(&mut self, container: NodeId, message: &ShownMessage) -> RenderResult<bool> {
        if !self.is_child(container, message.node) {
            return Ok(false);
        }
        self.remove(message.node)?;
        Ok(true)
    }
}
