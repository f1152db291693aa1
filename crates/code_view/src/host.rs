//! The editor capabilities a [`CodeView`](crate::CodeView) needs.
//!
//! A code view drives exactly one editor window (the managed viewport). Everything it does to
//! that window goes through [`ViewportHost`], and everything it does with signs goes through
//! [`SignRegistry`], so the logic runs the same against a real editor or [`MemoryHost`].
//!
//! [`MemoryHost`]: crate::memory::MemoryHost

use std::path::Path;

pub use terminal::ViewportId;

use crate::{
    error::{OpenFileError, PositionError},
    signs::{SignDefinition, SignId, SignPlacement},
    toolbar::ToolbarButton,
};

/// Host-wide notifications raised by the code view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The managed viewport was moved to a new frame
    JumpedToFrame,
}

pub trait ViewportHost {
    /// Identifier of the managed viewport
    fn viewport(&self) -> ViewportId;

    /// Whether the managed viewport still exists
    fn is_valid(&self) -> bool;

    /// Make the managed viewport the current one
    fn focus(&mut self);

    /// Show `path` in the managed viewport, leaving other viewports alone
    fn open_file(&mut self, path: &Path) -> Result<(), OpenFileError>;

    /// Move the cursor; `line` is 1-based and `column` 0-based
    fn set_cursor(&mut self, line: usize, column: usize) -> Result<(), PositionError>;

    /// Syntax of the buffer shown in the managed viewport
    fn syntax(&self) -> Option<String>;

    fn raise(&mut self, event: HostEvent);

    fn supports_toolbar(&self) -> bool {
        false
    }

    fn install_toolbar(&mut self, _buttons: &[ToolbarButton]) {}
}

pub trait SignRegistry {
    fn is_defined(&self, name: &str) -> bool;

    fn define(&mut self, definition: &SignDefinition);

    fn place(&mut self, placement: &SignPlacement);

    fn unplace(&mut self, id: SignId, group: &str);

    /// Whether a breakpoint sign is shown on `line` of `path`
    fn has_breakpoint(&self, _path: &Path, _line: usize) -> bool {
        false
    }
}

impl<T> ViewportHost for &mut T
where
    T: ViewportHost + ?Sized,
{
    fn viewport(&self) -> ViewportId {
        (**self).viewport()
    }

    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }

    fn focus(&mut self) {
        (**self).focus()
    }

    fn open_file(&mut self, path: &Path) -> Result<(), OpenFileError> {
        (**self).open_file(path)
    }

    fn set_cursor(&mut self, line: usize, column: usize) -> Result<(), PositionError> {
        (**self).set_cursor(line, column)
    }

    fn syntax(&self) -> Option<String> {
        (**self).syntax()
    }

    fn raise(&mut self, event: HostEvent) {
        (**self).raise(event)
    }

    fn supports_toolbar(&self) -> bool {
        (**self).supports_toolbar()
    }

    fn install_toolbar(&mut self, buttons: &[ToolbarButton]) {
        (**self).install_toolbar(buttons)
    }
}

impl<T> SignRegistry for &mut T
where
    T: SignRegistry + ?Sized,
{
    fn is_defined(&self, name: &str) -> bool {
        (**self).is_defined(name)
    }

    fn define(&mut self, definition: &SignDefinition) {
        (**self).define(definition)
    }

    fn place(&mut self, placement: &SignPlacement) {
        (**self).place(placement)
    }

    fn unplace(&mut self, id: SignId, group: &str) {
        (**self).unplace(id, group)
    }

    fn has_breakpoint(&self, path: &Path, line: usize) -> bool {
        (**self).has_breakpoint(path, line)
    }
}
