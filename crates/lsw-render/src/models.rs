//! JSON shapes consumed by the widgets

use serde::{Deserialize, Serialize};

/// Curriculum entry on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curriculum {
    pub id: i64,
    pub name: String,
}

/// Topic card on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Compact user row on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub usertype: String,
}

/// Row of `/api/admin/all-users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
    #[serde(rename = "UserType", default)]
    pub user_type: Option<String>,
    #[serde(rename = "ParentUsername", default)]
    pub parent_username: Option<String>,
    #[serde(rename = "CreatedOn", default)]
    pub created_on: Option<String>,
    #[serde(rename = "SubscriptionDaysLeft", default)]
    pub subscription_days_left: Option<i64>,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        self.user_type.as_deref() == Some("Admin")
    }

    pub fn is_parent(&self) -> bool {
        self.user_type.as_deref() == Some("Parent")
    }

    /// `N days`, or `None` without a subscription
    pub fn subscription_label(&self) -> String {
        match self.subscription_days_left {
            Some(days) => format!("{days} days"),
            None => "None".to_string(),
        }
    }

    /// Date part of `CreatedOn`.
    ///
    /// Handles ISO timestamps (`2024-03-01T10:00:00`) and HTTP dates
    /// (`Fri, 01 Mar 2024 10:00:00 GMT`); anything else is shown as given.
    pub fn created_date(&self) -> String {
        let Some(raw) = self.created_on.as_deref().map(str::trim) else {
            return String::new();
        };
        let bytes = raw.as_bytes();
        if bytes.len() >= 10 && bytes[4] == b'-' && bytes[7] == b'-' {
            return raw.get(..10).unwrap_or(raw).to_string();
        }
        if let Some((_, rest)) = raw.split_once(", ") {
            let parts: Vec<&str> = rest.split_whitespace().take(3).collect();
            if parts.len() == 3 {
                return parts.join(" ");
            }
        }
        raw.to_string()
    }
}

/// Row of `/api/open-flags`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenFlag {
    #[serde(rename = "ItemType")]
    pub item_type: String,
    #[serde(rename = "ItemName", default)]
    pub item_name: Option<String>,
    #[serde(rename = "FlaggedItemID")]
    pub flagged_item_id: i64,
    #[serde(rename = "Reason", default)]
    pub reason: String,
}

impl OpenFlag {
    /// `"<type>: <name>"`, falling back to the item id
    pub fn title(&self) -> String {
        match self.item_name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => format!("{}: {}", self.item_type, name),
            None => format!("{}: ID: {}", self.item_type, self.flagged_item_id),
        }
    }
}
