//! Logic Stories networking
//!
//! [`CsrfClient`] attaches the server-issued anti-forgery token to every
//! request and retries exactly once when the server rejects it.
//! [`BearerClient`] is the session-token wrapper used by the admin pages.
//! Both talk to the network through a [`Transport`].

mod bearer;
mod config;
mod csrf;
mod request;
mod response;
mod transport;

pub use bearer::{BearerClient, MemorySessionStore, SessionCheck, SessionStore, PREFERENCES_ENDPOINT, TOKEN_KEY};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use csrf::{CsrfClient, RequestOutcome, TokenState, MAX_TOKEN_RETRIES};
pub use request::{Credentials, Method, Request, RequestOptions};
pub use response::Response;
pub use transport::{ReqwestTransport, Transport};

/// Network error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetError {
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Could not encode request body: {0}")]
    Serialize(String),

    #[error("Could not decode response body: {0}")]
    Decode(String),

    #[error("CSRF token fetch failed: {0}")]
    TokenFetchFailed(String),

    #[error("Authentication expired")]
    AuthenticationExpired,
}
