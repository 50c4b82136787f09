//! Client configuration.
//!
//! `ClientConfig` is a plain builder. Nothing here reads the environment;
//! callers decide where the API key comes from.

use std::sync::Arc;

use crate::model::Blog;
use crate::observer::RequestObserver;

/// Production endpoint of the service.
pub const DEFAULT_BASE_URL: &str = "https://rest.akismet.com/1.1/";

/// User agent sent when none is configured, e.g.
/// `Rust (linux/x86_64) | akismet-core/0.1.0`.
pub fn default_user_agent() -> String {
    format!(
        "Rust ({}/{}) | akismet-core/{}",
        std::env::consts::OS,
        std::env::consts::ARCH,
        env!("CARGO_PKG_VERSION")
    )
}

/// Settings for an `AkismetClient`.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub blog: Blog,
    /// Adds `is_test=1` to every request.
    pub test_mode: bool,
    pub user_agent: String,
    pub base_url: String,
    pub observer: Option<Arc<dyn RequestObserver + Send + Sync>>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, blog: Blog) -> Self {
        Self {
            api_key: api_key.into(),
            blog,
            test_mode: false,
            user_agent: default_user_agent(),
            base_url: DEFAULT_BASE_URL.to_string(),
            observer: None,
        }
    }

    pub fn test_mode(mut self, enabled: bool) -> Self {
        self.test_mode = enabled;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn observer(mut self, observer: Arc<dyn RequestObserver + Send + Sync>) -> Self {
        self.observer = Some(observer);
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("blog", &self.blog)
            .field("test_mode", &self.test_mode)
            .field("user_agent", &self.user_agent)
            .field("base_url", &self.base_url)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;

    fn blog() -> Blog {
        Blog::new(Url::parse("https://blog.example.com/").unwrap())
    }

    #[test]
    fn defaults_target_production() {
        let config = ClientConfig::new("abc123", blog());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.test_mode);
        assert!(config.observer.is_none());
        assert!(config.user_agent.starts_with("Rust ("));
        assert!(config.user_agent.ends_with(concat!("akismet-core/", env!("CARGO_PKG_VERSION"))));
    }

    #[test]
    fn debug_output_hides_the_key() {
        let config = ClientConfig::new("super-secret", blog());
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
