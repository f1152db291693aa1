//! Replay recorded session events against a headless code view
//!
//! Input is JSON lines, one session event per line:
//!
//! ```text
//! {"event": "frame", "frame": {"source": {"path": "/tmp/a.py"}, "line": 10, "column": 5}}
//! {"event": "clear"}
//! ```
//!
//! After each event one JSON status line describing the code window is written out.

use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use code_view::{CodeView, MemoryHost, SignId, StackFrame, ViewportHost};
use eyre::WrapErr;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The debuggee stopped, or the user selected another frame
    Frame {
        #[serde(default)]
        frame: Option<StackFrame>,
    },
    Clear,
    Reset,
    /// The user closed the code window
    Close,
    Reopen,
}

/// State of the code window after an event
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Result of showing a frame, only set for frame events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displayed: Option<bool>,
    pub path: Option<PathBuf>,
    /// 1-based line and 0-based column
    pub cursor: Option<(usize, usize)>,
    pub marker: Option<SignId>,
    pub syntax: Option<String>,
    pub frame_line: Option<usize>,
}

impl Status {
    fn of(view: &CodeView<MemoryHost>, displayed: Option<bool>) -> Self {
        let host = view.host();
        let path = host.current_file().map(|p| p.to_path_buf());
        Self {
            displayed,
            cursor: path.as_ref().map(|_| host.cursor()),
            path,
            marker: view.program_counter(),
            syntax: view.current_syntax().map(ToString::to_string),
            frame_line: view.current_frame().map(|frame| frame.line),
        }
    }
}

/// Apply one event to `view`
#[tracing::instrument(skip(view))]
pub fn apply(view: &mut CodeView<MemoryHost>, event: &SessionEvent) -> Status {
    let displayed = match event {
        SessionEvent::Frame { frame } => Some(view.set_current_frame(frame.as_ref())),
        SessionEvent::Clear => {
            view.clear();
            None
        }
        SessionEvent::Reset => {
            view.reset();
            None
        }
        SessionEvent::Close => {
            view.host_mut().close();
            None
        }
        SessionEvent::Reopen => {
            view.host_mut().reopen();
            None
        }
    };

    if displayed == Some(false) {
        tracing::warn!(
            viewport = view.host().viewport(),
            "frame could not be shown in the code window"
        );
    }
    Status::of(view, displayed)
}

/// Replay every event read from `input`, writing a status line for each to `output`.
///
/// Blank lines are skipped. Returns the number of events applied.
pub fn run(
    view: &mut CodeView<MemoryHost>,
    input: impl BufRead,
    mut output: impl Write,
) -> eyre::Result<usize> {
    let mut applied = 0;
    for (i, line) in input.lines().enumerate() {
        let line = line.wrap_err("reading event")?;
        if line.trim().is_empty() {
            continue;
        }

        let event: SessionEvent = serde_json::from_str(&line)
            .wrap_err_with(|| format!("parsing event on line {}", i + 1))?;
        let status = apply(view, &event);

        serde_json::to_writer(&mut output, &status).wrap_err("serialising status")?;
        writeln!(output).wrap_err("writing status")?;
        applied += 1;
    }
    Ok(applied)
}
