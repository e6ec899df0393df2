//! Session-token (Bearer) requests used by the admin pages

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;

use crate::request::set_header;
use crate::{Credentials, NetError, Request, RequestOptions, Response, Transport};

/// Storage key holding the session token
pub const TOKEN_KEY: &str = "token";

/// Cheap authenticated endpoint used to check the session
pub const PREFERENCES_ENDPOINT: &str = "/api/preferences/current";

/// Where the session token and cached session values live
pub trait SessionStore: Send + Sync {
    fn auth_token(&self) -> Option<String>;
    fn session_value(&self, key: &str) -> Option<String>;
    fn set_session_value(&self, key: &str, value: &str);
    /// Drop the token and every cached session value
    fn clear(&self);
}

/// In-process [`SessionStore`]
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.set_session_value(TOKEN_KEY, token);
        store
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn auth_token(&self) -> Option<String> {
        self.values().get(TOKEN_KEY).filter(|t| !t.is_empty()).cloned()
    }

    fn session_value(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    fn set_session_value(&self, key: &str, value: &str) {
        self.values().insert(key.to_string(), value.to_string());
    }

    fn clear(&self) {
        self.values().clear();
    }
}

/// Outcome of [`BearerClient::validate_session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCheck {
    NoToken,
    Valid,
    Expired,
    /// The check failed for another reason; the session is left alone
    Unreachable,
}

/// Client attaching `Authorization: Bearer <token>` from a session store
#[derive(Debug)]
pub struct BearerClient<T, S> {
    transport: T,
    session: S,
}

impl<T: Transport, S: SessionStore> BearerClient<T, S> {
    pub fn new(transport: T, session: S) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Send a request with the session token.
    ///
    /// A 401 while a token was sent clears the session and returns
    /// [`NetError::AuthenticationExpired`]. Other statuses are returned as-is.
    pub async fn fetch(&self, url: &str, options: RequestOptions) -> Result<Response, NetError> {
        let token = self.session.auth_token();

        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        for (name, value) in &options.headers {
            set_header(&mut headers, name, value);
        }
        if let Some(token) = &token {
            set_header(&mut headers, "Authorization", &format!("Bearer {token}"));
        }

        let request = Request {
            method: options.method,
            url: url.to_string(),
            headers,
            body: options.body,
            credentials: Credentials::SameOrigin,
        };
        tracing::debug!("{} {} (token: {})", request.method.as_str(), url, token.is_some());

        let response = self.transport.send(request).await?;
        if response.status() == 401 && token.is_some() {
            tracing::warn!("Session expired, clearing stored credentials");
            self.session.clear();
            return Err(NetError::AuthenticationExpired);
        }
        Ok(response)
    }

    /// GET `url` and decode a 2xx JSON body
    pub async fn get_json<D: DeserializeOwned>(&self, url: &str) -> Result<D, NetError> {
        self.fetch(url, RequestOptions::new()).await?.error_for_status()?.json()
    }

    /// Probe the session against the preferences endpoint
    pub async fn validate_session(&self) -> SessionCheck {
        if self.session.auth_token().is_none() {
            return SessionCheck::NoToken;
        }
        match self.fetch(PREFERENCES_ENDPOINT, RequestOptions::new()).await {
            Ok(response) if response.ok() => SessionCheck::Valid,
            Ok(_) => SessionCheck::Unreachable,
            Err(NetError::AuthenticationExpired) => SessionCheck::Expired,
            Err(e) => {
                tracing::debug!("Session check failed: {}", e);
                SessionCheck::Unreachable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemorySessionStore::with_token("t0k");
        store.set_session_value("darkMode", "true");
        assert_eq!(store.auth_token().as_deref(), Some("t0k"));
        assert_eq!(store.session_value("darkMode").as_deref(), Some("true"));

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.auth_token(), None);
    }

    #[test]
    fn test_empty_token_is_no_token() {
        let store = MemorySessionStore::with_token("");
        assert_eq!(store.auth_token(), None);
    }
}
