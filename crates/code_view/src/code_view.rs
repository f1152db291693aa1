use eyre::WrapErr;
use terminal::{Terminal, TerminalConfig};

use crate::{
    config::Config,
    host::{SignRegistry, ViewportHost},
    marker::MarkerTracker,
    signs::MarkerDefinitionRegistry,
    toolbar::SESSION_TOOLBAR,
    types::{SourceLocation, StackFrame},
    viewport,
};

/// Keeps one editor window in step with the debuggee's current frame
///
/// The window shows the file of the current frame with the cursor on the execution point,
/// and a program counter sign marks that line.
pub struct CodeView<H> {
    host: H,
    config: Config,
    registry: MarkerDefinitionRegistry,
    marker: MarkerTracker,
    current_frame: Option<StackFrame>,
    current_syntax: Option<String>,
    terminal: Option<Terminal>,
}

impl<H> CodeView<H>
where
    H: ViewportHost + SignRegistry,
{
    #[tracing::instrument(skip(host, config), fields(viewport = host.viewport()))]
    pub fn new(mut host: H, config: Config) -> Self {
        if config.toolbar && host.is_valid() && host.supports_toolbar() {
            tracing::debug!("installing session toolbar");
            host.install_toolbar(&SESSION_TOOLBAR);
        }

        let mut registry = MarkerDefinitionRegistry::new();
        registry.ensure_defined(&mut host, &config.program_counter);
        registry.ensure_defined(&mut host, &config.program_counter_on_breakpoint);

        // placement ids are only unique per registry, so each viewport gets its own group
        let group = format!("{}{}", config.sign_group, host.viewport());
        let marker = MarkerTracker::new(group);
        Self {
            host,
            config,
            registry,
            marker,
            current_frame: None,
            current_syntax: None,
            terminal: None,
        }
    }

    /// Show `frame` in the code window.
    ///
    /// Returns `true` if the window now shows the frame. `false` means the frame has no
    /// source path, the window has been closed, or the file could not be shown. Only the first
    /// case forgets the current frame and removes the program counter.
    #[tracing::instrument(skip(self, frame), fields(frame_id = frame.map(|f| f.id)))]
    pub fn set_current_frame(&mut self, frame: Option<&StackFrame>) -> bool {
        let Some(frame) = frame else {
            tracing::debug!("no frame");
            self.undisplay(true);
            return false;
        };

        let Some(location) = SourceLocation::from_frame(frame) else {
            tracing::debug!("frame has no source path");
            self.undisplay(true);
            return false;
        };

        self.current_frame = Some(frame.clone());

        if !self.host.is_valid() {
            tracing::debug!("code window no longer exists");
            return false;
        }

        if let Err(e) = viewport::navigate(&mut self.host, &location) {
            tracing::error!(
                error = %e,
                path = %location.path.display(),
                line = frame.line,
                column = frame.column,
                "unable to show frame"
            );
            return false;
        }

        let sign = if self.host.has_breakpoint(&location.path, location.line) {
            &self.config.program_counter_on_breakpoint.name
        } else {
            &self.config.program_counter.name
        };
        self.marker.place(
            &mut self.host,
            &mut self.registry,
            sign,
            &location.path,
            location.line,
        );

        self.current_syntax = self.host.syntax();
        tracing::debug!(syntax = ?self.current_syntax, "frame displayed");
        true
    }

    /// Remove the program counter, also forgetting the current frame if `clear_frame` is set
    pub fn undisplay(&mut self, clear_frame: bool) {
        if clear_frame {
            self.current_frame = None;
        }
        self.marker.remove(&mut self.host);
    }

    /// Forget everything about the session: program counter, current frame and syntax
    #[tracing::instrument(skip(self))]
    pub fn clear(&mut self) {
        self.undisplay(true);
        self.current_syntax = None;
    }

    /// Alias of [`CodeView::clear`], called when the debug session is reset
    pub fn reset(&mut self) {
        self.clear();
    }

    /// Run a terminal in the context of the code window, returning its process id.
    ///
    /// The terminal from a previous call is reused while it is still running. When
    /// `config.ready_marker` is set this blocks until the marker is printed or
    /// [`TerminalConfig::ready_timeout`] passes.
    pub fn launch_terminal(&mut self, config: &TerminalConfig) -> eyre::Result<u32> {
        let existing = self.terminal.take();
        let terminal = terminal::launch(config, self.host.viewport(), existing)
            .wrap_err("launching terminal")?;
        let pid = terminal.pid();
        self.terminal = Some(terminal);
        Ok(pid)
    }

    pub fn current_frame(&self) -> Option<&StackFrame> {
        self.current_frame.as_ref()
    }

    /// Syntax of the file shown for the last displayed frame
    pub fn current_syntax(&self) -> Option<&str> {
        self.current_syntax.as_deref()
    }

    /// Placement id of the program counter sign, if it is shown
    pub fn program_counter(&self) -> Option<crate::signs::SignId> {
        self.marker.current()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
