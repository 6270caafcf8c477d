use url::{Origin, Url};

use crate::{
    config::ProxyConfig,
    foundation::error::{PhototagError, PhototagResult},
};

/// Pure URL rewriting applied to every external URL before it is loaded.
pub trait UrlResolver {
    /// Map `url` to the URL that should actually be loaded.
    fn resolve(&self, url: &str) -> String;
}

impl<F> UrlResolver for F
where
    F: Fn(&str) -> String,
{
    fn resolve(&self, url: &str) -> String {
        self(url)
    }
}

/// Loads every URL as given.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityResolver;

impl UrlResolver for IdentityResolver {
    fn resolve(&self, url: &str) -> String {
        url.to_string()
    }
}

/// Routes cross-origin `http(s)` URLs through a proxy endpoint as `?url=<original>`.
///
/// Relative URLs and URLs sharing the page origin pass through unchanged. Without a page origin
/// every absolute `http(s)` URL counts as cross-origin.
#[derive(Clone, Debug)]
pub struct ProxyResolver {
    endpoint: Url,
    page_origin: Option<Origin>,
}

impl ProxyResolver {
    /// Build a resolver from an endpoint and optional page origin.
    pub fn new(endpoint: &str, page_origin: Option<&str>) -> PhototagResult<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| PhototagError::validation(format!("invalid proxy endpoint: {e}")))?;
        let page_origin = page_origin
            .map(|o| {
                Url::parse(o)
                    .map(|u| u.origin())
                    .map_err(|e| PhototagError::validation(format!("invalid page origin: {e}")))
            })
            .transpose()?;
        Ok(Self {
            endpoint,
            page_origin,
        })
    }

    /// Build a resolver from the config's proxy section.
    pub fn from_config(cfg: &ProxyConfig) -> PhototagResult<Self> {
        Self::new(&cfg.endpoint, cfg.page_origin.as_deref())
    }

    fn is_cross_origin(&self, url: &Url) -> bool {
        match &self.page_origin {
            Some(origin) => url.origin() != *origin,
            None => true,
        }
    }
}

impl UrlResolver for ProxyResolver {
    fn resolve(&self, url: &str) -> String {
        let Ok(parsed) = Url::parse(url) else {
            return url.to_string();
        };
        if !matches!(parsed.scheme(), "http" | "https") || !self.is_cross_origin(&parsed) {
            return url.to_string();
        }

        let mut proxied = self.endpoint.clone();
        proxied.query_pairs_mut().append_pair("url", url);
        proxied.into()
    }
}

/// Resolver selected by the config: a [`ProxyResolver`] when a proxy is configured.
pub fn resolver_for(proxy: Option<&ProxyConfig>) -> PhototagResult<Box<dyn UrlResolver>> {
    match proxy {
        Some(cfg) => Ok(Box::new(ProxyResolver::from_config(cfg)?)),
        None => Ok(Box::new(IdentityResolver)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolve.rs"]
mod tests;
