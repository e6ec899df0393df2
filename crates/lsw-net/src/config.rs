//! Client configuration

use std::time::Duration;

/// Settings shared by the request clients and the reqwest transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin the relative API paths resolve against
    pub base_url: String,
    /// Token endpoint, relative to `base_url`
    pub token_endpoint: String,
    /// Header carrying the token
    pub token_header: String,
    /// User agent string
    pub user_agent: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Request timeout
    pub request_timeout: Duration,
    /// Max redirects to follow (0 = disable)
    pub max_redirects: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".into(),
            token_endpoint: "/api/csrf-token".into(),
            token_header: "X-CSRF-Token".into(),
            user_agent: concat!("lsw-client/", env!("CARGO_PKG_VERSION")).into(),
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
            max_redirects: 10,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Defaults overridden by `LSW_BASE_URL`, `LSW_USER_AGENT` and
    /// `LSW_TIMEOUT_SECS`. Unparsable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut builder = Self::builder();
        if let Ok(url) = std::env::var("LSW_BASE_URL") {
            builder = builder.base_url(&url);
        }
        if let Ok(ua) = std::env::var("LSW_USER_AGENT") {
            builder = builder.user_agent(&ua);
        }
        if let Ok(secs) = std::env::var("LSW_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => builder = builder.request_timeout(Duration::from_secs(secs)),
                Err(_) => tracing::warn!(value = %secs, "ignoring invalid LSW_TIMEOUT_SECS"),
            }
        }
        builder.build()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base that relative request paths are joined onto. A trailing slash is
    /// significant: `https://h/app/` keeps `app` as a directory.
    pub fn base_url(mut self, url: &str) -> Self {
        self.config.base_url = url.to_string();
        self
    }

    pub fn token_endpoint(mut self, path: &str) -> Self {
        self.config.token_endpoint = path.to_string();
        self
    }

    pub fn token_header(mut self, name: &str) -> Self {
        self.config.token_header = name.to_string();
        self
    }

    pub fn user_agent(mut self, ua: &str) -> Self {
        self.config.user_agent = ua.to_string();
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config.max_redirects = max;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
