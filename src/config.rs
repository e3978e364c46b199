//! Configuration for bibler.
//!
//! Settings come from a TOML file, then environment overrides:
//!
//! ```toml
//! bibliography = "~/library.bib"
//! missing_file_exit_code = 0
//! max_selection_attempts = 3
//! probe_timeout_secs = 10
//! search_url = "https://scholar.google.com/scholar"
//!
//! [pdf_viewer]
//! program = "evince"
//! args = []
//!
//! [web_viewer]
//! program = "firefox"
//! args = ["--new-tab"]
//! ```
//!
//! The file is looked up at `--config`, then `$BIBLER_CONFIG`, then
//! `<config dir>/bibler/config.toml`. `BIBLER_FILE`, `BIBLER_PDF_VIEWER` and
//! `BIBLER_WEB_VIEWER` override the matching settings.

use crate::error::{BiblerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// An external program plus fixed leading arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ViewerCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for ViewerCommand {
    fn default() -> Self {
        Self::new(default_opener())
    }
}

/// Runtime configuration, passed explicitly to the session and its parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bibliography used when `--file` is not given.
    pub bibliography: PathBuf,
    /// Viewer for local documents.
    pub pdf_viewer: ViewerCommand,
    /// Viewer for remote documents and search pages.
    pub web_viewer: ViewerCommand,
    /// Exit status when the bibliography file is missing.
    pub missing_file_exit_code: i32,
    /// How many times an invalid selection is re-prompted before giving up.
    pub max_selection_attempts: u32,
    /// Timeout for the link existence probe.
    pub probe_timeout_secs: u64,
    /// Base URL of the fallback search for entries without a link.
    pub search_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bibliography: default_bibliography(),
            pdf_viewer: ViewerCommand::default(),
            web_viewer: ViewerCommand::default(),
            missing_file_exit_code: 0,
            max_selection_attempts: 3,
            probe_timeout_secs: 10,
            search_url: "https://scholar.google.com/scholar".to_string(),
        }
    }
}

impl Config {
    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.bibliography = expand_tilde(&config.bibliography);
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BiblerError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Resolve the config from an explicit path, the environment, or defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match find_config_file(explicit) {
            Some(path) => {
                tracing::info!("Using config file: {}", path.display());
                Self::load(&path)?
            }
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply `BIBLER_*` overrides using the given variable lookup.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(file) = var("BIBLER_FILE").filter(|v| !v.is_empty()) {
            self.bibliography = expand_tilde(Path::new(&file));
        }
        if let Some(program) = var("BIBLER_PDF_VIEWER").filter(|v| !v.is_empty()) {
            self.pdf_viewer = ViewerCommand::new(program);
        }
        if let Some(program) = var("BIBLER_WEB_VIEWER").filter(|v| !v.is_empty()) {
            self.web_viewer = ViewerCommand::new(program);
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.pdf_viewer.program.is_empty() || self.web_viewer.program.is_empty() {
            return Err(BiblerError::Config(
                "viewer program cannot be empty".to_string(),
            ));
        }
        if self.max_selection_attempts == 0 {
            return Err(BiblerError::Config(
                "max_selection_attempts must be at least 1".to_string(),
            ));
        }
        if self.probe_timeout_secs == 0 {
            return Err(BiblerError::Config(
                "probe_timeout_secs must be at least 1".to_string(),
            ));
        }
        url::Url::parse(&self.search_url)
            .map_err(|e| BiblerError::Config(format!("invalid search_url: {}", e)))?;
        Ok(())
    }
}

fn find_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var("BIBLER_CONFIG") {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dirs::config_dir()
        .map(|dir| dir.join("bibler").join("config.toml"))
        .filter(|path| path.is_file())
}

fn default_bibliography() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("library.bib")
}

fn default_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.missing_file_exit_code, 0);
        assert_eq!(config.max_selection_attempts, 3);
        assert_eq!(config.probe_timeout(), Duration::from_secs(10));
        assert!(config.bibliography.ends_with("library.bib"));
    }

    #[test]
    fn test_from_toml_partial() {
        let config = Config::from_toml(
            r#"
            bibliography = "/data/refs.bib"
            missing_file_exit_code = 2

            [pdf_viewer]
            program = "evince"
            "#,
        )
        .unwrap();
        assert_eq!(config.bibliography, PathBuf::from("/data/refs.bib"));
        assert_eq!(config.missing_file_exit_code, 2);
        assert_eq!(config.pdf_viewer, ViewerCommand::new("evince"));
        assert_eq!(config.web_viewer, ViewerCommand::default());
        assert_eq!(config.max_selection_attempts, 3);
    }

    #[test]
    fn test_from_toml_viewer_args() {
        let config = Config::from_toml(
            r#"
            [web_viewer]
            program = "firefox"
            args = ["--new-tab"]
            "#,
        )
        .unwrap();
        assert_eq!(
            config.web_viewer,
            ViewerCommand::new("firefox").with_args(["--new-tab"])
        );
    }

    #[test]
    fn test_from_toml_invalid() {
        let err = Config::from_toml("bibliography = [").unwrap_err();
        assert!(matches!(err, BiblerError::Toml(_)));
    }

    #[test]
    fn test_from_toml_rejects_zero_attempts() {
        let err = Config::from_toml("max_selection_attempts = 0").unwrap_err();
        assert!(matches!(err, BiblerError::Config(_)));
    }

    #[test]
    fn test_load_nonexistent() {
        let err = Config::load(Path::new("/nonexistent/bibler.toml")).unwrap_err();
        assert!(matches!(err, BiblerError::Config(_)));
    }

    #[test]
    fn test_apply_env() {
        let vars: HashMap<&str, &str> = [
            ("BIBLER_FILE", "/srv/papers.bib"),
            ("BIBLER_PDF_VIEWER", "zathura"),
            ("BIBLER_WEB_VIEWER", ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.bibliography, PathBuf::from("/srv/papers.bib"));
        assert_eq!(config.pdf_viewer.program, "zathura");
        assert_eq!(config.web_viewer, ViewerCommand::default());
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde(Path::new("/abs/x.bib")), PathBuf::from("/abs/x.bib"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/x.bib")), home.join("x.bib"));
        }
    }
}
