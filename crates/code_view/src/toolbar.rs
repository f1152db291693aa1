use serde::{Deserialize, Serialize};

/// Session control exposed on the code window toolbar
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionCommand {
    Stop,
    Continue,
    Pause,
    StepOver,
    StepInto,
    StepOut,
    Restart,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarButton {
    pub label: &'static str,
    pub command: SessionCommand,
}

impl ToolbarButton {
    const fn new(label: &'static str, command: SessionCommand) -> Self {
        Self { label, command }
    }
}

pub const SESSION_TOOLBAR: [ToolbarButton; 8] = [
    ToolbarButton::new("■ Stop", SessionCommand::Stop),
    ToolbarButton::new("▶ Cont", SessionCommand::Continue),
    ToolbarButton::new("▷ Pause", SessionCommand::Pause),
    ToolbarButton::new("↷ Next", SessionCommand::StepOver),
    ToolbarButton::new("→ Step", SessionCommand::StepInto),
    ToolbarButton::new("← Out", SessionCommand::StepOut),
    ToolbarButton::new("⟲:", SessionCommand::Restart),
    ToolbarButton::new("✕", SessionCommand::Reset),
];
