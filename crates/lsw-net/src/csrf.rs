//! CSRF-protected request client

use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::request::set_header;
use crate::{ClientConfig, Credentials, Method, NetError, Request, RequestOptions, Response, Transport};

/// Retries allowed after the server rejects the token
pub const MAX_TOKEN_RETRIES: u32 = 1;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Token slot state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TokenState {
    #[default]
    Empty,
    Fetching,
    Valid(String),
}

impl TokenState {
    pub fn token(&self) -> Option<&str> {
        match self {
            TokenState::Valid(token) => Some(token),
            _ => None,
        }
    }
}

/// Result of a request that reached the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Any response other than a rejected token
    Completed(Response),
    /// The server kept returning 403 after a token refresh
    Exhausted(Response),
}

impl RequestOutcome {
    pub fn response(&self) -> &Response {
        match self {
            RequestOutcome::Completed(r) | RequestOutcome::Exhausted(r) => r,
        }
    }

    pub fn into_response(self) -> Response {
        match self {
            RequestOutcome::Completed(r) | RequestOutcome::Exhausted(r) => r,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, RequestOutcome::Exhausted(_))
    }
}

#[derive(Deserialize)]
struct TokenPayload {
    csrf_token: String,
}

/// Request client that carries the server's anti-forgery token.
///
/// The token is fetched lazily before the first request and refreshed once
/// whenever the server answers 403. The slot lock is only held for reads and
/// writes, never across a network call, so concurrent refreshes may race and
/// the last one wins.
#[derive(Debug)]
pub struct CsrfClient<T> {
    transport: T,
    config: ClientConfig,
    token: Mutex<TokenState>,
}

impl<T: Transport> CsrfClient<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            token: Mutex::new(TokenState::Empty),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn slot(&self) -> MutexGuard<'_, TokenState> {
        // A poisoned slot still holds a usable state
        self.token.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current slot state
    pub fn state(&self) -> TokenState {
        self.slot().clone()
    }

    /// Current token, if one is held
    pub fn token(&self) -> Option<String> {
        self.slot().token().map(str::to_string)
    }

    /// Headers to attach to a protected request; empty without a token
    pub fn headers(&self) -> Vec<(String, String)> {
        match self.token() {
            Some(token) => vec![(self.config.token_header.clone(), token)],
            None => Vec::new(),
        }
    }

    /// Fetch a fresh token. Failures are logged and leave the slot empty.
    pub async fn refresh_token(&self) -> Option<String> {
        *self.slot() = TokenState::Fetching;

        match self.fetch_token().await {
            Ok(token) => {
                tracing::debug!("CSRF token refreshed");
                *self.slot() = TokenState::Valid(token.clone());
                Some(token)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch CSRF token: {}", e);
                *self.slot() = TokenState::Empty;
                None
            }
        }
    }

    async fn fetch_token(&self) -> Result<String, NetError> {
        let request = Request::get(&self.config.token_endpoint).with_credentials(Credentials::SameOrigin);
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| NetError::TokenFetchFailed(e.to_string()))?;
        if !response.ok() {
            return Err(NetError::TokenFetchFailed(format!("status {}", response.status())));
        }
        let payload: TokenPayload = response
            .json()
            .map_err(|e| NetError::TokenFetchFailed(e.to_string()))?;
        Ok(payload.csrf_token)
    }

    fn build_request(&self, url: &str, options: &RequestOptions) -> Request {
        let mut headers = vec![("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string())];
        for (name, value) in self.headers() {
            set_header(&mut headers, &name, &value);
        }
        for (name, value) in &options.headers {
            set_header(&mut headers, name, value);
        }

        Request {
            method: options.method,
            url: url.to_string(),
            headers,
            body: options.body.clone(),
            credentials: Credentials::SameOrigin,
        }
    }

    /// Send a request with the token attached.
    ///
    /// A 403 triggers one token refresh and an identical resend; a second 403
    /// comes back as [`RequestOutcome::Exhausted`]. Network errors are not
    /// retried.
    pub async fn secure_request(&self, url: &str, options: RequestOptions) -> Result<RequestOutcome, NetError> {
        if self.token().is_none() {
            self.refresh_token().await;
        }

        let mut attempt = 0;
        loop {
            let request = self.build_request(url, &options);
            let response = match self.transport.send(request).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!("Request to {} failed: {}", url, e);
                    return Err(e);
                }
            };

            if response.status() != 403 {
                return Ok(RequestOutcome::Completed(response));
            }
            if attempt >= MAX_TOKEN_RETRIES {
                tracing::warn!("{} still rejected after token refresh", url);
                return Ok(RequestOutcome::Exhausted(response));
            }

            tracing::debug!("403 from {}, refreshing CSRF token", url);
            attempt += 1;
            self.refresh_token().await;
        }
    }

    /// [`secure_request`](Self::secure_request) returning the bare response
    pub async fn secure_fetch(&self, url: &str, options: RequestOptions) -> Result<Response, NetError> {
        self.secure_request(url, options).await.map(RequestOutcome::into_response)
    }

    // The verb helpers keep the caller's headers and only pin the method,
    // plus the body when `data` is given.

    pub async fn get(&self, url: &str, options: RequestOptions) -> Result<RequestOutcome, NetError> {
        self.secure_request(url, options.method(Method::Get)).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        url: &str,
        data: Option<&B>,
        options: RequestOptions,
    ) -> Result<RequestOutcome, NetError> {
        self.secure_request(url, with_json(options.method(Method::Post), data)?).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        url: &str,
        data: Option<&B>,
        options: RequestOptions,
    ) -> Result<RequestOutcome, NetError> {
        self.secure_request(url, with_json(options.method(Method::Put), data)?).await
    }

    pub async fn delete(&self, url: &str, options: RequestOptions) -> Result<RequestOutcome, NetError> {
        self.secure_request(url, options.method(Method::Delete)).await
    }
}

fn with_json<B: Serialize + ?Sized>(options: RequestOptions, data: Option<&B>) -> Result<RequestOptions, NetError> {
    match data {
        Some(data) => options.json(data),
        None => Ok(options),
    }
}
