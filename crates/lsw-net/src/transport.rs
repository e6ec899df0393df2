//! Transports
//!
//! The request clients are generic over [`Transport`] so a page session can
//! run against the real server ([`ReqwestTransport`]) or a scripted one.

use std::future::Future;
use std::sync::Arc;

use url::Url;

use crate::{ClientConfig, Credentials, Method, NetError, Request, Response};

/// Sends one request and returns the response or a network-level failure
pub trait Transport: Send + Sync {
    fn send(&self, request: Request) -> impl Future<Output = Result<Response, NetError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(&self, request: Request) -> impl Future<Output = Result<Response, NetError>> + Send {
        (**self).send(request)
    }
}

/// reqwest-backed transport.
///
/// The blocking client runs on smol's blocking pool, so awaiting a request
/// only suspends the calling task. Cookies are kept in a jar bound to the
/// configured origin; requests whose credentials mode excludes them go out
/// through a second client without a jar.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    base: Url,
    with_cookies: reqwest::blocking::Client,
    without_cookies: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, NetError> {
        let base = Url::parse(&config.base_url).map_err(|e| NetError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        Ok(Self {
            base,
            with_cookies: build_client(config, true)?,
            without_cookies: build_client(config, false)?,
        })
    }

    /// Resolve a request URL against the base origin
    pub fn resolve(&self, url: &str) -> Result<Url, NetError> {
        self.base.join(url).map_err(|e| NetError::InvalidUrl(format!("{url}: {e}")))
    }

    fn client_for(&self, url: &Url, credentials: Credentials) -> &reqwest::blocking::Client {
        let send_cookies = match credentials {
            Credentials::Omit => false,
            Credentials::SameOrigin => url.origin() == self.base.origin(),
            Credentials::Include => true,
        };
        if send_cookies {
            &self.with_cookies
        } else {
            &self.without_cookies
        }
    }
}

fn build_client(config: &ClientConfig, cookies: bool) -> Result<reqwest::blocking::Client, NetError> {
    let redirects = if config.max_redirects == 0 {
        reqwest::redirect::Policy::none()
    } else {
        reqwest::redirect::Policy::limited(config.max_redirects)
    };
    reqwest::blocking::Client::builder()
        .user_agent(&config.user_agent)
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .redirect(redirects)
        .cookie_store(cookies)
        .build()
        .map_err(|e| NetError::Network(e.to_string()))
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Patch => reqwest::Method::PATCH,
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<Response, NetError> {
        let url = self.resolve(&request.url)?;
        let client = self.client_for(&url, request.credentials).clone();
        tracing::info!("HTTP {} {}", request.method.as_str(), url);

        smol::unblock(move || {
            let mut builder = client.request(reqwest_method(request.method), url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().map_err(|e| NetError::Network(e.to_string()))?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
                .collect();
            let body = response.bytes().map_err(|e| NetError::Network(e.to_string()))?.to_vec();
            Ok(Response::new(status, headers, body))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_paths() {
        let config = ClientConfig::builder().base_url("https://stories.example.com").build();
        let transport = ReqwestTransport::new(&config).unwrap();
        assert_eq!(
            transport.resolve("/api/csrf-token").unwrap().as_str(),
            "https://stories.example.com/api/csrf-token"
        );
        assert_eq!(
            transport.resolve("https://cdn.example.com/x").unwrap().as_str(),
            "https://cdn.example.com/x"
        );
    }

    #[test]
    fn test_resolve_under_subdirectory_base() {
        let config = ClientConfig::builder().base_url("https://h/app/").build();
        let transport = ReqwestTransport::new(&config).unwrap();
        assert_eq!(transport.resolve("api/x").unwrap().as_str(), "https://h/app/api/x");
        assert_eq!(transport.resolve("/api/x").unwrap().as_str(), "https://h/api/x");
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig::builder().base_url("not a url").build();
        assert!(matches!(ReqwestTransport::new(&config), Err(NetError::InvalidUrl(_))));
    }

    #[test]
    fn test_cookie_client_selection() {
        let config = ClientConfig::builder().base_url("https://stories.example.com").build();
        let transport = ReqwestTransport::new(&config).unwrap();
        let same = transport.resolve("/api/x").unwrap();
        let other = transport.resolve("https://evil.example.net/").unwrap();

        let jar = &transport.with_cookies as *const _;
        assert_eq!(transport.client_for(&same, Credentials::SameOrigin) as *const _, jar);
        assert_ne!(transport.client_for(&other, Credentials::SameOrigin) as *const _, jar);
        assert_ne!(transport.client_for(&same, Credentials::Omit) as *const _, jar);
        assert_eq!(transport.client_for(&other, Credentials::Include) as *const _, jar);
    }
}
