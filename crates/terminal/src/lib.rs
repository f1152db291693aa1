//! Terminal processes bound to a code viewport
//!
//! A debug adapter may ask the front end to run the debuggee in a terminal (the DAP
//! `runInTerminal` reverse request). This crate spawns that process and hands back a
//! [`Terminal`] handle. Launching again while the previous terminal is still running reuses it.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use eyre::WrapErr;
use nix::{
    sys::signal::{self, Signal},
    unistd::Pid,
};
use serde::{Deserialize, Serialize};

mod ready;

/// Identifier of the editor window a terminal belongs to
pub type ViewportId = u64;

/// Default timeout for waiting for a terminal to print its ready marker
pub const READY_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a terminal gets to exit after SIGTERM before it is killed
const TERMINATE_GRACE: Duration = Duration::from_millis(500);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TerminalKind {
    #[default]
    Integrated,
    External,
}

/// Arguments for launching a terminal, matching the DAP `runInTerminal` request
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TerminalConfig {
    #[serde(default)]
    pub kind: TerminalKind,
    pub title: Option<String>,
    pub cwd: PathBuf,
    /// Program followed by its arguments
    pub args: Vec<String>,
    /// Environment overrides; a `null` value removes the variable
    #[serde(default)]
    pub env: HashMap<String, Option<String>>,
    /// Text the process prints on stdout once it is ready for input
    #[serde(default)]
    pub ready_marker: Option<String>,
    /// How long to wait for `ready_marker`, in milliseconds
    #[serde(default)]
    pub ready_timeout_ms: Option<u64>,
}

impl TerminalConfig {
    pub fn new(cwd: impl Into<PathBuf>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            cwd: cwd.into(),
            args: args.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// How long [`launch`] blocks waiting for `ready_marker`
    pub fn ready_timeout(&self) -> Duration {
        self.ready_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(READY_TIMEOUT)
    }

    fn title(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.args.first().cloned())
            .unwrap_or_else(|| "terminal".to_string())
    }
}

/// A running terminal process
#[derive(Debug)]
pub struct Terminal {
    child: Child,
    viewport: ViewportId,
    title: String,
    kind: TerminalKind,
}

impl Terminal {
    /// Process id of the terminal's child process
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    pub fn viewport(&self) -> ViewportId {
        self.viewport
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> TerminalKind {
        self.kind
    }

    pub fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    #[tracing::instrument(skip(self), fields(pid = self.pid(), title = %self.title))]
    fn terminate(&mut self) {
        if !self.is_alive() {
            let _ = self.child.wait();
            return;
        }

        tracing::debug!("terminating terminal");
        match i32::try_from(self.child.id()) {
            Ok(pid) => {
                if let Err(e) = signal::kill(Pid::from_raw(pid), Signal::SIGTERM) {
                    tracing::warn!(error = %e, "could not signal terminal process");
                }

                let deadline = Instant::now() + TERMINATE_GRACE;
                while Instant::now() < deadline {
                    if !self.is_alive() {
                        let _ = self.child.wait();
                        tracing::debug!("terminal exited");
                        return;
                    }
                    thread::sleep(Duration::from_millis(10));
                }
            }
            Err(e) => tracing::warn!(error = %e, "process id does not fit a pid, killing"),
        }

        match self.child.kill() {
            Ok(_) => {
                let _ = self.child.wait();
                tracing::debug!("terminal killed");
            }
            Err(e) => tracing::warn!(error = %e, "could not kill terminal process"),
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// Launch a terminal for `viewport`, reusing `existing` while it is still running.
///
/// With a `ready_marker` set this blocks until the process prints it, for at most
/// [`TerminalConfig::ready_timeout`].
#[tracing::instrument(skip(config, existing), fields(args = ?config.args, cwd = %config.cwd.display()))]
pub fn launch(
    config: &TerminalConfig,
    viewport: ViewportId,
    existing: Option<Terminal>,
) -> eyre::Result<Terminal> {
    if let Some(mut terminal) = existing {
        if terminal.is_alive() {
            tracing::debug!(pid = terminal.pid(), "reusing running terminal");
            return Ok(terminal);
        }
        tracing::debug!(pid = terminal.pid(), "previous terminal has exited");
    }

    let (program, args) = config
        .args
        .split_first()
        .ok_or_else(|| eyre::eyre!("no program given for terminal"))?;
    let program = resolve_program(program, &config.cwd)?;

    let mut command = Command::new(&program);
    command
        .args(args)
        .current_dir(&config.cwd)
        .stdin(Stdio::null());
    for (key, value) in &config.env {
        match value {
            Some(value) => {
                command.env(key, value);
            }
            None => {
                command.env_remove(key);
            }
        }
    }
    if config.ready_marker.is_some() {
        command.stdout(Stdio::piped());
    } else {
        command.stdout(Stdio::null());
    }

    let mut child = command
        .spawn()
        .wrap_err_with(|| format!("spawning terminal process {}", program.display()))?;
    tracing::debug!(pid = child.id(), kind = ?config.kind, "terminal started");

    if let Some(marker) = &config.ready_marker {
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| eyre::eyre!("terminal stdout was not captured"))?;
        if let Err(e) = ready::wait_for_marker(stdout, marker, config.ready_timeout(), &mut child) {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e).wrap_err("waiting for terminal readiness");
        }
        tracing::debug!("terminal ready");
    }

    Ok(Terminal {
        child,
        viewport,
        title: config.title(),
        kind: config.kind,
    })
}

fn resolve_program(program: &str, cwd: &Path) -> eyre::Result<PathBuf> {
    let path = Path::new(program);
    if path.components().count() > 1 {
        return Ok(cwd.join(path));
    }
    which::which(program).map_err(|_| eyre::eyre!("{program} not found in PATH"))
}

#[cfg(test)]
mod tests {
    use std::io::IsTerminal;

    use tracing_subscriber::EnvFilter;

    use super::*;

    fn init_test_logger() {
        let in_ci = std::env::var("CI")
            .map(|val| val == "true")
            .unwrap_or(false);

        if std::io::stderr().is_terminal() || in_ci {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .try_init();
        } else {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .json()
                .try_init();
        }
    }

    fn sleeper() -> TerminalConfig {
        TerminalConfig::new(std::env::temp_dir(), ["sleep", "60"])
    }

    #[test]
    fn launches_process() -> eyre::Result<()> {
        init_test_logger();

        let mut terminal = launch(&sleeper(), 1000, None)?;

        assert!(terminal.is_alive());
        assert_eq!(terminal.viewport(), 1000);
        assert_eq!(terminal.title(), "sleep");
        assert_eq!(terminal.kind(), TerminalKind::Integrated);
        Ok(())
    }

    #[test]
    fn reuses_running_terminal() -> eyre::Result<()> {
        init_test_logger();

        let first = launch(&sleeper(), 1000, None)?;
        let pid = first.pid();

        let second = launch(&sleeper(), 1000, Some(first))?;
        assert_eq!(second.pid(), pid);
        Ok(())
    }

    #[test]
    fn replaces_exited_terminal() -> eyre::Result<()> {
        init_test_logger();

        let config = TerminalConfig::new(std::env::temp_dir(), ["true"]);
        let mut first = launch(&config, 1000, None)?;
        let pid = first.pid();
        let _ = first.child.wait();
        assert!(!first.is_alive());

        let second = launch(&sleeper(), 1000, Some(first))?;
        assert_ne!(second.pid(), pid);
        Ok(())
    }

    #[test]
    fn waits_for_ready_marker() -> eyre::Result<()> {
        init_test_logger();

        let mut config = TerminalConfig::new(
            std::env::temp_dir(),
            ["sh", "-c", "echo \"listening on $PORT\"; sleep 60"],
        );
        config.env.insert("PORT".to_string(), Some("5678".to_string()));
        config.ready_marker = Some("listening on 5678".to_string());
        config.title = Some("debuggee".to_string());

        let mut terminal = launch(&config, 7, None)?;
        assert!(terminal.is_alive());
        assert_eq!(terminal.title(), "debuggee");
        Ok(())
    }

    #[test]
    fn ready_wait_is_bounded_by_config() {
        init_test_logger();

        let mut config = sleeper();
        config.ready_marker = Some("never printed".to_string());
        config.ready_timeout_ms = Some(200);
        assert_eq!(config.ready_timeout(), Duration::from_millis(200));

        let started = Instant::now();
        let message = format!("{:#}", launch(&config, 1, None).unwrap_err());
        assert!(started.elapsed() < READY_TIMEOUT, "waited {:?}", started.elapsed());
        assert!(message.contains("timed out"), "got: {message}");
    }

    #[test]
    fn missing_program() {
        init_test_logger();

        let config = TerminalConfig::new(std::env::temp_dir(), ["definitely-not-a-real-program-xyz"]);
        let message = launch(&config, 1, None).unwrap_err().to_string();
        assert!(message.contains("not found in PATH"), "got: {message}");
    }

    #[test]
    fn empty_args() {
        let config = TerminalConfig::new(std::env::temp_dir(), Vec::<String>::new());
        assert!(launch(&config, 1, None).is_err());
    }

    #[test]
    fn terminate_on_drop() -> eyre::Result<()> {
        init_test_logger();

        let terminal = launch(&sleeper(), 1, None)?;
        let pid = Pid::from_raw(i32::try_from(terminal.pid())?);
        drop(terminal);

        // the process has been reaped, so signalling it must fail
        assert!(signal::kill(pid, None).is_err());
        Ok(())
    }

    #[test]
    fn deserialize_run_in_terminal_arguments() {
        let config: TerminalConfig = serde_json::from_str(
            r#"{
                "kind": "external",
                "title": "Python Debug Console",
                "cwd": "/tmp",
                "args": ["python3", "main.py"],
                "env": {"PYTHONUNBUFFERED": "1", "VIRTUAL_ENV": null}
            }"#,
        )
        .unwrap();

        assert_eq!(config.kind, TerminalKind::External);
        assert_eq!(config.args, vec!["python3", "main.py"]);
        assert_eq!(config.env.get("VIRTUAL_ENV"), Some(&None));
        assert_eq!(config.ready_marker, None);
        assert_eq!(config.ready_timeout(), READY_TIMEOUT);

        let config: TerminalConfig = serde_json::from_str(
            r#"{"cwd": "/tmp", "args": ["dlv"], "readyMarker": "API server", "readyTimeoutMs": 1500}"#,
        )
        .unwrap();
        assert_eq!(config.ready_timeout(), Duration::from_millis(1500));
    }
}
