//! Keeps the editor's code window on the debuggee's current frame
//!
//! A [`CodeView`] is handed stack frames by the debug session. For each one it opens the
//! frame's file in its window, moves the cursor to the execution point, and keeps a single
//! program counter sign on that line. The editor itself is reached through the
//! [`ViewportHost`] and [`SignRegistry`] traits.
mod code_view;
pub mod config;
pub mod error;
pub mod host;
mod marker;
pub mod memory;
pub mod signs;
pub mod toolbar;
pub mod types;
mod viewport;

pub use code_view::CodeView;
pub use config::Config;
pub use error::{NavigationError, OpenFileError, PositionError};
pub use host::{HostEvent, SignRegistry, ViewportHost, ViewportId};
pub use memory::MemoryHost;
pub use signs::{MarkerDefinitionRegistry, SignDefinition, SignId, SignPlacement};
pub use terminal::{Terminal, TerminalConfig, TerminalKind};
pub use types::{Source, SourceLocation, StackFrame};
