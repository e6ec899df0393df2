//! Logic Stories admin shell
//!
//! Page controllers wiring [`lsw_net`] clients to [`lsw_render`] widgets:
//! the polled user table, the theme preferences and the page error reporter.

mod flag_reporter;
mod preferences;
mod session;
mod users;

pub use flag_reporter::{
    FlagReport, FlagReporter, CONFIG_ENDPOINT, FLAG_BUTTON_ID, FLAG_ENDPOINT, LOGIN_PAGES,
};
pub use preferences::{FontSize, Preferences, PreferencesController};
pub use session::{signin_redirect, SIGNIN_PAGE};
pub use users::{UserTableController, USERS_ENDPOINT, USERS_VERSION_ENDPOINT};

/// Admin shell error
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error(transparent)]
    Net(#[from] lsw_net::NetError),

    #[error(transparent)]
    Render(#[from] lsw_render::RenderError),

    #[error(transparent)]
    Dom(#[from] lsw_dom::DomError),
}

pub type AdminResult<T> = Result<T, AdminError>;
