//! Viewer dispatch.
//!
//! Viewers are started directly from an argument list, never through a shell,
//! and are not waited on.

use crate::config::{Config, ViewerCommand};
use crate::error::{BiblerError, Result};
use crate::types::{Launched, Target, ViewerKind};
use std::process::{Command, Stdio};

/// Starts external programs.
pub trait Launcher {
    fn launch(&self, program: &str, args: &[String]) -> std::io::Result<()>;
}

/// Spawns a detached child process and drops its handle.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&self, program: &str, args: &[String]) -> std::io::Result<()> {
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .spawn()
            .map(|_child| ())
    }
}

/// Routes classified targets to the configured viewers.
pub struct Dispatcher {
    pdf_viewer: ViewerCommand,
    web_viewer: ViewerCommand,
    launcher: Box<dyn Launcher>,
}

impl Dispatcher {
    pub fn new(config: &Config) -> Self {
        Self::with_launcher(config, Box::new(ProcessLauncher))
    }

    pub fn with_launcher(config: &Config, launcher: Box<dyn Launcher>) -> Self {
        Self {
            pdf_viewer: config.pdf_viewer.clone(),
            web_viewer: config.web_viewer.clone(),
            launcher,
        }
    }

    /// Open `target` in the matching viewer.
    ///
    /// Invalid targets are rejected without starting anything.
    pub fn dispatch(&self, target: &Target) -> Result<Launched> {
        let (viewer, command, location) = match target {
            Target::Local { path } => (
                ViewerKind::Document,
                &self.pdf_viewer,
                path.display().to_string(),
            ),
            Target::Remote { url } | Target::Search { url } => {
                (ViewerKind::Web, &self.web_viewer, url.clone())
            }
            Target::Invalid { link, reason } => {
                return Err(BiblerError::InvalidTarget {
                    link: link.clone(),
                    reason: reason.clone(),
                });
            }
        };

        let mut args = command.args.clone();
        args.push(location);

        tracing::info!("Opening with {}: {} {:?}", viewer, command.program, args);
        self.launcher
            .launch(&command.program, &args)
            .map_err(|source| BiblerError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        Ok(Launched {
            viewer,
            program: command.program.clone(),
            args,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingLauncher;
    use super::*;
    use std::path::PathBuf;

    fn config() -> Config {
        Config {
            pdf_viewer: ViewerCommand::new("evince"),
            web_viewer: ViewerCommand::new("firefox").with_args(["--new-tab"]),
            ..Config::default()
        }
    }

    #[test]
    fn test_dispatch_local_uses_pdf_viewer() {
        let launcher = RecordingLauncher::default();
        let dispatcher = Dispatcher::with_launcher(&config(), Box::new(launcher.clone()));

        let launched = dispatcher
            .dispatch(&Target::Local {
                path: PathBuf::from("/tmp/doe2020.pdf"),
            })
            .unwrap();
        assert_eq!(launched.viewer, ViewerKind::Document);
        assert_eq!(
            launcher.calls(),
            vec![("evince".to_string(), vec!["/tmp/doe2020.pdf".to_string()])]
        );
    }

    #[test]
    fn test_dispatch_remote_uses_web_viewer_with_args() {
        let launcher = RecordingLauncher::default();
        let dispatcher = Dispatcher::with_launcher(&config(), Box::new(launcher.clone()));

        let launched = dispatcher
            .dispatch(&Target::Remote {
                url: "https://example.com/doe2020.pdf".to_string(),
            })
            .unwrap();
        assert_eq!(launched.viewer, ViewerKind::Web);
        assert_eq!(launched.program, "firefox");
        assert_eq!(
            launcher.calls(),
            vec![(
                "firefox".to_string(),
                vec![
                    "--new-tab".to_string(),
                    "https://example.com/doe2020.pdf".to_string()
                ]
            )]
        );
    }

    #[test]
    fn test_dispatch_passes_metacharacters_verbatim() {
        let launcher = RecordingLauncher::default();
        let dispatcher = Dispatcher::with_launcher(&config(), Box::new(launcher.clone()));
        let nasty = "/tmp/a; rm -rf ~ $(id).pdf";

        dispatcher
            .dispatch(&Target::Local {
                path: PathBuf::from(nasty),
            })
            .unwrap();
        assert_eq!(launcher.calls()[0].1, vec![nasty.to_string()]);
    }

    #[test]
    fn test_dispatch_invalid_never_launches() {
        let launcher = RecordingLauncher::default();
        let dispatcher = Dispatcher::with_launcher(&config(), Box::new(launcher.clone()));

        let err = dispatcher
            .dispatch(&Target::Invalid {
                link: "nowhere".to_string(),
                reason: "no such file".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, BiblerError::InvalidTarget { .. }));
        assert!(launcher.calls().is_empty());
    }

    #[test]
    fn test_dispatch_reports_spawn_failure() {
        let launcher = RecordingLauncher {
            fail: true,
            ..Default::default()
        };
        let dispatcher = Dispatcher::with_launcher(&config(), Box::new(launcher));

        let err = dispatcher
            .dispatch(&Target::Search {
                url: "https://scholar.google.com/scholar?q=%22Foo%22".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, BiblerError::Spawn { ref program, .. } if program == "firefox"));
    }

    #[test]
    fn test_process_launcher_missing_program() {
        let err = ProcessLauncher
            .launch("bibler-no-such-viewer-xyz", &["x".to_string()])
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
