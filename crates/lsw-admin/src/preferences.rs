//! Theme and font-size preferences

use lsw_net::{BearerClient, SessionStore, Transport, PREFERENCES_ENDPOINT};
use lsw_render::{NodeId, SecureDom};
use serde::Deserialize;

const DARK_MODE_KEY: &str = "darkMode";
const FONT_SIZE_KEY: &str = "fontSize";
const LIGHT_CLASS: &str = "light";

/// Body font size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    /// Anything other than `small` or `large` is medium
    pub fn parse(value: &str) -> Self {
        match value {
            "small" => FontSize::Small,
            "large" => FontSize::Large,
            _ => FontSize::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            FontSize::Small => "14px",
            FontSize::Medium => "16px",
            FontSize::Large => "18px",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub dark_mode: bool,
    pub font_size: FontSize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreferencesPayload {
    #[serde(default)]
    dark_mode: bool,
    font_size: Option<String>,
}

/// Applies the user's display preferences to the page body
#[derive(Debug, Clone, Copy)]
pub struct PreferencesController {
    body: NodeId,
}

impl PreferencesController {
    pub fn new(body: NodeId) -> Self {
        Self { body }
    }

    /// Light theme up front unless the session already says dark
    pub fn apply_initial<S: SessionStore>(&self, session: &S, dom: &mut SecureDom) {
        let dark = session.session_value(DARK_MODE_KEY).is_some_and(|v| v == "true");
        if !dark {
            self.set_light(dom, true);
        }
    }

    /// Preferences cached in the session, if both values are present
    pub fn cached<S: SessionStore>(session: &S) -> Option<Preferences> {
        let dark = session.session_value(DARK_MODE_KEY)?;
        let size = session.session_value(FONT_SIZE_KEY)?;
        Some(Preferences {
            dark_mode: dark == "true",
            font_size: FontSize::parse(&size),
        })
    }

    /// Resolve preferences from the session cache or the server.
    ///
    /// Fetched values are cached in the session. Any failure falls back to
    /// the defaults (light theme, medium text).
    pub async fn load<T, S>(&self, client: &BearerClient<T, S>) -> Preferences
    where
        T: Transport,
        S: SessionStore,
    {
        if let Some(prefs) = Self::cached(client.session()) {
            return prefs;
        }

        match client.get_json::<PreferencesPayload>(PREFERENCES_ENDPOINT).await {
            Ok(payload) => {
                let prefs = Preferences {
                    dark_mode: payload.dark_mode,
                    font_size: payload.font_size.as_deref().map(FontSize::parse).unwrap_or_default(),
                };
                let session = client.session();
                session.set_session_value(DARK_MODE_KEY, if prefs.dark_mode { "true" } else { "false" });
                session.set_session_value(FONT_SIZE_KEY, prefs.font_size.as_str());
                prefs
            }
            Err(e) => {
                tracing::debug!("Using default preferences: {}", e);
                Preferences::default()
            }
        }
    }

    pub fn apply(&self, prefs: Preferences, dom: &mut SecureDom) {
        self.set_light(dom, !prefs.dark_mode);
        if let Some(body) = dom.element_mut(self.body) {
            body.style.set_property("font-size", prefs.font_size.css());
        }
    }

    /// [`load`](Self::load) then [`apply`](Self::apply)
    pub async fn sync<T, S>(&self, client: &BearerClient<T, S>, dom: &mut SecureDom) -> Preferences
    where
        T: Transport,
        S: SessionStore,
    {
        let prefs = self.load(client).await;
        self.apply(prefs, dom);
        prefs
    }

    fn set_light(&self, dom: &mut SecureDom, light: bool) {
        if let Some(body) = dom.element_mut(self.body) {
            body.classes.toggle(LIGHT_CLASS, Some(light));
        }
    }
}
