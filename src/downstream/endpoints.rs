//! Resolved downstream URLs.

use url::Url;

use crate::config::DownstreamConfig;

/// Absolute URLs for each downstream route, computed once at startup.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: String,
    pub predict: Url,
    pub batch: Url,
    pub status: Url,
}

impl Endpoints {
    pub fn from_config(config: &DownstreamConfig) -> Result<Self, url::ParseError> {
        let base = config.base_url.trim().trim_end_matches('/').to_string();
        // Concatenate instead of `Url::join`, which would drop any path
        // prefix already present on the base.
        let resolve = |path: &str| Url::parse(&format!("{base}{path}"));

        Ok(Self {
            predict: resolve(&config.predict.path)?,
            batch: resolve(&config.batch.path)?,
            status: resolve(&config.status_path)?,
            base,
        })
    }

    /// The configured base address, without a trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }
}
