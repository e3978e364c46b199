//! Link classification.
//!
//! Decides whether a link names a local document, a reachable remote
//! document, or nothing usable. Remote links are checked with a single GET.

use crate::config::expand_tilde;
use crate::error::Result;
use crate::types::Target;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

/// Classifies entry links into [`Target`]s.
#[derive(Clone)]
pub struct LinkClassifier {
    http: Client,
}

impl LinkClassifier {
    /// Create a classifier whose probe gives up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bibler/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// Classify a link.
    ///
    /// An existing regular file wins; anything else must be an `http(s)` URL
    /// that answers a GET with a 2xx status.
    pub async fn classify(&self, link: &str) -> Target {
        let path = expand_tilde(Path::new(link));
        if path.is_file() {
            return Target::Local { path };
        }

        let url = match url::Url::parse(link) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            Ok(url) => {
                return invalid(link, format!("unsupported scheme '{}'", url.scheme()));
            }
            Err(_) => return invalid(link, "no such file".to_string()),
        };

        tracing::debug!("Probing {}", url);
        match self.http.get(url.clone()).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!("Probe of {} answered {}", url, response.status());
                Target::Remote {
                    url: link.to_string(),
                }
            }
            Ok(response) => {
                tracing::warn!("Probe of {} answered {}", url, response.status());
                invalid(link, format!("HTTP {}", response.status().as_u16()))
            }
            Err(e) => {
                tracing::warn!("Probe of {} failed: {}", url, e);
                let reason = if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    "request failed".to_string()
                };
                invalid(link, reason)
            }
        }
    }
}

fn invalid(link: &str, reason: String) -> Target {
    Target::Invalid {
        link: link.to_string(),
        reason,
    }
}
