//! Page error reporter button

use lsw_net::{CsrfClient, Request, RequestOptions, Transport};
use lsw_render::{Attributes, NodeId, RenderResult, SecureDom};
use serde::{Deserialize, Serialize};

pub const CONFIG_ENDPOINT: &str = "/api/config";
pub const FLAG_ENDPOINT: &str = "/api/flag-page-error";
pub const FLAG_BUTTON_ID: &str = "flag-error-btn";

/// Pages where the reporter never shows
pub const LOGIN_PAGES: [&str; 4] = [
    "/signin.h",
    "/student-login.html",
    "/parent-login.html",
    "/admin-login.html",
];

const SUBMITTED: &str = "Thank you! Your report has been submitted.";
const SUBMIT_FAILED: &str = "Error submitting report.";
const UNREACHABLE: &str = "Could not submit flag. Please try again later.";

const BUTTON_CLASS: &str =
    "fixed bottom-4 right-4 bg-red-600 text-white px-4 py-2 rounded-full shadow-lg hover:bg-red-500 z-50";

/// Body of a page error report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagReport {
    pub user_id: Option<i64>,
    pub page_path: String,
    pub description: String,
}

#[derive(Deserialize)]
struct ConfigPayload {
    #[serde(rename = "showFlagReporter", default)]
    show_flag_reporter: bool,
}

#[derive(Deserialize)]
struct SubmitReply {
    message: Option<String>,
    status: Option<String>,
}

/// "Flag Error" button and report submission
#[derive(Debug, Default)]
pub struct FlagReporter {
    enabled: Option<bool>,
    user_id: Option<i64>,
}

impl FlagReporter {
    pub fn new(user_id: Option<i64>) -> Self {
        Self { enabled: None, user_id }
    }

    /// Use a known setting instead of asking the server
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn is_login_page(path: &str) -> bool {
        LOGIN_PAGES.contains(&path)
    }

    /// Whether the site configuration turns the reporter on.
    ///
    /// Any failure counts as disabled and is not cached; a successful answer
    /// is.
    pub async fn enabled<T: Transport>(&mut self, client: &CsrfClient<T>) -> bool {
        if let Some(enabled) = self.enabled {
            return enabled;
        }

        let response = match client.transport().send(Request::get(CONFIG_ENDPOINT)).await {
            Ok(response) if response.ok() => response,
            Ok(response) => {
                tracing::debug!(status = response.status(), "flag reporter config unavailable");
                return false;
            }
            Err(e) => {
                tracing::debug!("flag reporter config unavailable: {}", e);
                return false;
            }
        };
        match response.json::<ConfigPayload>() {
            Ok(config) => {
                self.enabled = Some(config.show_flag_reporter);
                config.show_flag_reporter
            }
            Err(_) => false,
        }
    }

    /// Add the button to the page body when allowed on this page.
    ///
    /// Returns the button node, or `None` when the reporter stays hidden.
    pub async fn mount<T: Transport>(&mut self, client: &CsrfClient<T>, dom: &mut SecureDom) -> RenderResult<Option<NodeId>> {
        if Self::is_login_page(dom.document().path()) {
            return Ok(None);
        }
        if !self.enabled(client).await {
            return Ok(None);
        }

        let body = dom.document().body();
        let button = dom.create_element(
            "button",
            &Attributes::new().id(FLAG_BUTTON_ID).class_name(BUTTON_CLASS),
            Some("Flag Error"),
        )?;
        dom.append_content(body, [button])?;
        Ok(Some(button))
    }

    pub fn report(&self, page_path: &str, description: &str) -> FlagReport {
        FlagReport {
            user_id: self.user_id,
            page_path: page_path.to_string(),
            description: description.trim().to_string(),
        }
    }

    /// Submit a report and return the message to show the user
    pub async fn submit<T: Transport>(&self, client: &CsrfClient<T>, page_path: &str, description: &str) -> String {
        let report = self.report(page_path, description);
        let response = match client.post(FLAG_ENDPOINT, Some(&report), RequestOptions::new()).await {
            Ok(outcome) => outcome.into_response(),
            Err(e) => {
                tracing::warn!("Flag submission failed: {}", e);
                return UNREACHABLE.to_string();
            }
        };

        match response.json::<SubmitReply>() {
            Ok(SubmitReply { message: Some(message), .. }) => message,
            Ok(SubmitReply { status, .. }) if status.as_deref() == Some("success") => SUBMITTED.to_string(),
            Ok(_) => SUBMIT_FAILED.to_string(),
            Err(_) => UNREACHABLE.to_string(),
        }
    }
}
