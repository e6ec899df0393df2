//! Polled admin user table

use lsw_net::{BearerClient, NetError, SessionStore, Transport};
use lsw_render::{NodeId, RenderResult, SecureDom, UserFilter, UserRecord};
use serde::Deserialize;
use serde_json::Value;

pub const USERS_ENDPOINT: &str = "/api/admin/all-users";
pub const USERS_VERSION_ENDPOINT: &str = "/api/admin/users-version";

const LOADING_TEXT: &str = "Loading...";
const ERROR_TEXT: &str = "Error loading users.";

#[derive(Deserialize)]
struct VersionPayload {
    #[serde(default)]
    version: Value,
}

/// Keeps the user table body in sync with the server.
///
/// The server exposes a cheap version stamp; the full list is only fetched
/// when the stamp moves or a refresh is forced.
#[derive(Debug)]
pub struct UserTableController {
    tbody: NodeId,
    version: Option<Value>,
    payload: Option<String>,
    users: Vec<UserRecord>,
    filter: UserFilter,
}

impl UserTableController {
    pub fn new(tbody: NodeId) -> Self {
        Self {
            tbody,
            version: None,
            payload: None,
            users: Vec::new(),
            filter: UserFilter::default(),
        }
    }

    pub fn tbody(&self) -> NodeId {
        self.tbody
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn filter(&self) -> &UserFilter {
        &self.filter
    }

    pub fn version(&self) -> Option<&Value> {
        self.version.as_ref()
    }

    /// Reload the table if the server's version stamp changed.
    ///
    /// Returns whether a reload happened. A failed version check is logged
    /// and leaves the table untouched.
    pub async fn refresh_if_changed<T, S>(&mut self, client: &BearerClient<T, S>, dom: &mut SecureDom) -> RenderResult<bool>
    where
        T: Transport,
        S: SessionStore,
    {
        let version = match client.get_json::<VersionPayload>(USERS_VERSION_ENDPOINT).await {
            Ok(payload) => payload.version,
            Err(e) => {
                tracing::error!("Version check error: {}", e);
                return Ok(false);
            }
        };

        if self.version.as_ref() == Some(&version) {
            return Ok(false);
        }
        tracing::debug!(%version, "user list version changed");
        self.version = Some(version);
        self.force_refresh(client, dom).await?;
        Ok(true)
    }

    /// Fetch the full user list and render it through the current filter
    pub async fn force_refresh<T, S>(&mut self, client: &BearerClient<T, S>, dom: &mut SecureDom) -> RenderResult<()>
    where
        T: Transport,
        S: SessionStore,
    {
        dom.set_loading_state(self.tbody, Some(LOADING_TEXT))?;

        let payload = match self.fetch_users(client).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Fetch users error: {}", e);
                dom.set_error_state(self.tbody, Some(ERROR_TEXT))?;
                return Ok(());
            }
        };

        let text = payload.to_string();
        if self.payload.as_deref() != Some(text.as_str()) {
            let users = match payload {
                Value::Array(_) => match serde_json::from_value::<Vec<UserRecord>>(payload) {
                    Ok(users) => users,
                    Err(e) => {
                        tracing::error!("Fetch users error: {}", e);
                        dom.set_error_state(self.tbody, Some(ERROR_TEXT))?;
                        return Ok(());
                    }
                },
                _ => Vec::new(),
            };
            self.users = users;
            self.payload = Some(text);
        }
        self.render(dom)
    }

    async fn fetch_users<T, S>(&self, client: &BearerClient<T, S>) -> Result<Value, NetError>
    where
        T: Transport,
        S: SessionStore,
    {
        client.get_json(USERS_ENDPOINT).await
    }

    /// Change the filter and re-render from the loaded users
    pub fn set_filter(&mut self, filter: UserFilter, dom: &mut SecureDom) -> RenderResult<()> {
        self.filter = filter;
        self.render(dom)
    }

    fn render(&self, dom: &mut SecureDom) -> RenderResult<()> {
        dom.render_user_rows(self.tbody, self.filter.apply(&self.users))
    }
}
