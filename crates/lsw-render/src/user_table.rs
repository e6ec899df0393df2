//! Admin user table rows and filtering

use std::str::FromStr;

use lsw_dom::NodeId;

use crate::{Attributes, RenderResult, SecureDom, UserRecord};

const CELL: &str = "px-6 py-4";
const BUTTON: &str = "font-semibold py-1 px-3 text-sm rounded-full";
const DISABLED: &str = "opacity-50 cursor-not-allowed";

/// Column selected in the filter dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterColumn {
    #[default]
    All,
    Id,
    Username,
    Email,
    UserType,
    ParentUsername,
    CreatedOn,
    SubscriptionDaysLeft,
}

/// Filter column name not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter column: {0}")]
pub struct UnknownColumn(pub String);

impl FromStr for FilterColumn {
    type Err = UnknownColumn;

    /// Accepts the `<select>` option values (`all`, `ID`, `Username`, ...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "all" | "All" | "" => Self::All,
            "ID" | "id" => Self::Id,
            "Username" | "username" => Self::Username,
            "Email" | "email" => Self::Email,
            "UserType" | "usertype" => Self::UserType,
            "ParentUsername" | "parent" => Self::ParentUsername,
            "CreatedOn" | "created" => Self::CreatedOn,
            "SubscriptionDaysLeft" | "subscription" => Self::SubscriptionDaysLeft,
            other => return Err(UnknownColumn(other.to_string())),
        })
    }
}

impl FilterColumn {
    const SEARCHED_BY_ALL: [FilterColumn; 6] = [
        Self::Id,
        Self::Username,
        Self::Email,
        Self::UserType,
        Self::ParentUsername,
        Self::SubscriptionDaysLeft,
    ];

    /// Lower-cased searchable value of this column
    fn value_of(self, user: &UserRecord) -> String {
        let value = match self {
            Self::All => return String::new(),
            Self::Id => user.id.to_string(),
            Self::Username => user.username.clone(),
            Self::Email => user.email.clone().unwrap_or_default(),
            Self::UserType => user.user_type.clone().unwrap_or_default(),
            Self::ParentUsername => user.parent_username.clone().unwrap_or_default(),
            Self::CreatedOn => user.created_on.clone().unwrap_or_default(),
            Self::SubscriptionDaysLeft => user
                .subscription_days_left
                .map(|d| d.to_string())
                .unwrap_or_default(),
        };
        value.to_lowercase()
    }
}

/// Text filter over the loaded user list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub query: String,
    pub column: FilterColumn,
}

impl UserFilter {
    pub fn new(query: &str, column: FilterColumn) -> Self {
        Self { query: query.to_string(), column }
    }

    /// Case-insensitive substring match; a blank query matches everything
    pub fn matches(&self, user: &UserRecord) -> bool {
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        match self.column {
            FilterColumn::All => FilterColumn::SEARCHED_BY_ALL
                .iter()
                .any(|column| column.value_of(user).contains(&query)),
            column => column.value_of(user).contains(&query),
        }
    }

    pub fn apply<'a>(&self, users: &'a [UserRecord]) -> Vec<&'a UserRecord> {
        users.iter().filter(|u| self.matches(u)).collect()
    }
}

impl SecureDom {
    /// Render one row per user into `tbody`, replacing what was there
    pub fn render_user_rows<'a, I>(&mut self, tbody: NodeId, users: I) -> RenderResult<()>
    where
        I: IntoIterator<Item = &'a UserRecord>,
    {
        let users: Vec<&UserRecord> = users.into_iter().collect();
        if users.is_empty() {
            self.set_empty_state(tbody, Some("No users found."))?;
            return Ok(());
        }

        self.build(|dom| {
            let mut rows = Vec::with_capacity(users.len());
            for user in users {
                rows.push(dom.user_row(user)?);
            }
            tracing::debug!(rows = rows.len(), "rendered user table");
            dom.replace_content(tbody, rows)
        })
    }

    fn user_row(&mut self, user: &UserRecord) -> RenderResult<NodeId> {
        let admin = user.is_admin();
        let row = self.create_element("tr", &Attributes::class("border-b border-slate-700 hover:bg-slate-700/50"), None)?;

        let cell = Attributes::class(CELL);
        let id = self.create_element("td", &cell, Some(&user.id.to_string()))?;
        let username = self.create_element("td", &Attributes::class("px-6 py-4 font-medium"), Some(&user.username))?;
        let email = self.create_element("td", &cell, Some(user.email.as_deref().unwrap_or("N/A")))?;

        let type_cell = self.create_element("td", &cell, None)?;
        let badge_colour = if admin {
            "bg-red-500/20 text-red-300"
        } else if user.is_parent() {
            "bg-blue-500/20 text-blue-300"
        } else {
            "bg-green-500/20 text-green-300"
        };
        let badge = self.create_element(
            "span",
            &Attributes::class(&format!("px-2 py-1 text-xs font-semibold rounded-full {badge_colour}")),
            user.user_type.as_deref(),
        )?;
        self.append_content(type_cell, [badge])?;

        let parent = self.create_element("td", &cell, Some(user.parent_username.as_deref().unwrap_or("N/A")))?;
        let created = self.create_element("td", &cell, Some(&user.created_date()))?;
        let subscription = self.create_element("td", &cell, Some(&user.subscription_label()))?;

        let actions = self.create_element("td", &Attributes::class("px-6 py-4 text-center flex justify-center space-x-2"), None)?;
        let locked = if admin { DISABLED } else { "" };
        let edit = self.create_element(
            "button",
            &Attributes::class(&format!("edit-user-btn bg-blue-800 text-white {BUTTON} hover:bg-blue-700 {locked}"))
                .data("userid", user.id)?,
            Some("Edit"),
        )?;
        let delete = self.create_element(
            "button",
            &Attributes::class(&format!("delete-user-btn bg-red-800 text-white {BUTTON} hover:bg-red-700 {locked}"))
                .data("userid", user.id)?
                .data("username", &user.username)?,
            Some("Delete"),
        )?;
        if admin {
            for button in [edit, delete] {
                if let Some(elem) = self.element_mut(button) {
                    elem.set_disabled(true)?;
                }
            }
        }
        self.append_content(actions, [edit, delete])?;

        if !admin {
            let renew = self.create_element(
                "button",
                &Attributes::class(&format!("renew-sub-btn bg-green-800 text-white {BUTTON} hover:bg-green-700"))
                    .data("userid", user.id)?,
                Some("Renew"),
            )?;
            self.append_content(actions, [renew])?;
        }

        self.append_content(row, [id, username, email, type_cell, parent, created, subscription, actions])?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, name: &str, kind: &str) -> UserRecord {
        UserRecord {
            id,
            username: name.to_string(),
            email: Some(format!("{name}@example.com")),
            user_type: Some(kind.to_string()),
            parent_username: None,
            created_on: Some("2024-03-01T10:00:00".to_string()),
            subscription_days_left: Some(12),
        }
    }

    #[test]
    fn test_filter_column_parse() {
        assert_eq!("all".parse::<FilterColumn>(), Ok(FilterColumn::All));
        assert_eq!("ParentUsername".parse::<FilterColumn>(), Ok(FilterColumn::ParentUsername));
        assert_eq!("Password".parse::<FilterColumn>(), Err(UnknownColumn("Password".into())));
    }

    #[test]
    fn test_filter_all_columns() {
        let users = vec![user(1, "Alice", "Student"), user(22, "bob", "Parent")];

        assert_eq!(UserFilter::new("  ", FilterColumn::All).apply(&users).len(), 2);
        assert_eq!(UserFilter::new("ALICE", FilterColumn::All).apply(&users)[0].id, 1);
        assert_eq!(UserFilter::new("parent", FilterColumn::All).apply(&users)[0].id, 22);
        assert_eq!(UserFilter::new("22", FilterColumn::All).apply(&users).len(), 1);
        // CreatedOn is only searchable when picked explicitly
        assert!(UserFilter::new("2024", FilterColumn::All).apply(&users).is_empty());
        assert_eq!(UserFilter::new("2024", FilterColumn::CreatedOn).apply(&users).len(), 2);
    }

    #[test]
    fn test_filter_single_column_missing_value() {
        let mut u = user(5, "carl", "Student");
        u.email = None;
        assert!(!UserFilter::new("example", FilterColumn::Email).matches(&u));
        assert!(UserFilter::new("carl", FilterColumn::Username).matches(&u));
        assert!(!UserFilter::new("carl", FilterColumn::Email).matches(&u));
    }

    #[test]
    fn test_rows_for_admin_and_student() {
        let mut dom = SecureDom::default();
        let tbody = dom.create_element("tbody", &Attributes::new(), None).unwrap();
        let users = vec![user(1, "root", "Admin"), user(2, "<img src=x>", "Student")];
        dom.render_user_rows(tbody, &users).unwrap();

        let rows = dom.children(tbody);
        assert_eq!(rows.len(), 2);

        let admin_actions = *dom.children(rows[0]).last().unwrap();
        let admin_buttons = dom.children(admin_actions);
        assert_eq!(admin_buttons.len(), 2);
        assert!(admin_buttons.iter().all(|b| dom.element(*b).unwrap().is_disabled()));

        let student_cells = dom.children(rows[1]);
        assert_eq!(student_cells.len(), 8);
        assert_eq!(dom.text_content(student_cells[1]), "<img src=x>");
        assert_eq!(dom.text_content(student_cells[4]), "N/A");
        assert_eq!(dom.text_content(student_cells[5]), "2024-03-01");
        assert_eq!(dom.text_content(student_cells[6]), "12 days");
        assert_eq!(dom.children(student_cells[7]).len(), 3);
        assert!(!dom.inner_html(tbody).contains("<img"));
    }

    #[test]
    fn test_empty_rows() {
        let mut dom = SecureDom::default();
        let tbody = dom.create_element("tbody", &Attributes::new(), None).unwrap();
        dom.render_user_rows(tbody, &[]).unwrap();
        assert_eq!(dom.text_content(tbody), "No users found.");
    }

    #[test]
    fn test_rows_into_removed_body_leak_nothing() {
        let mut dom = SecureDom::default();
        let tbody = dom.create_element("tbody", &Attributes::new(), None).unwrap();
        dom.remove(tbody).unwrap();
        let before = dom.tree().len();

        let users = vec![user(1, "root", "Admin"), user(2, "kid", "Student")];
        assert!(dom.render_user_rows(tbody, &users).is_err());
        assert_eq!(dom.tree().len(), before);
    }
}
