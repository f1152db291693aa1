//! In-memory editor host
//!
//! [`MemoryHost`] behaves like a single editor window: it reads real files from disk, keeps a
//! cursor, stores sign definitions and placements, and records the events raised against it.
//! It backs headless runs and tests.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::{Path, PathBuf},
};

use crossbeam_channel::{Receiver, Sender};

use crate::{
    error::{OpenFileError, PositionError},
    host::{HostEvent, SignRegistry, ViewportHost, ViewportId},
    signs::{SignDefinition, SignId, SignPlacement},
    toolbar::ToolbarButton,
};

#[derive(Debug, Clone)]
struct Buffer {
    path: PathBuf,
    lines: Vec<String>,
    syntax: Option<String>,
}

#[derive(Debug)]
pub struct MemoryHost {
    viewport: ViewportId,
    valid: bool,
    focused: bool,
    toolbar_supported: bool,
    toolbar: Vec<ToolbarButton>,
    buffer: Option<Buffer>,
    cursor: (usize, usize),

    definitions: HashMap<String, SignDefinition>,
    definition_counts: HashMap<String, usize>,
    // keyed by (group, id)
    placements: BTreeMap<(String, SignId), SignPlacement>,
    breakpoints: HashSet<(PathBuf, usize)>,

    events: Vec<HostEvent>,
    subscribers: Vec<Sender<HostEvent>>,
}

impl MemoryHost {
    pub fn new(viewport: ViewportId) -> Self {
        Self {
            viewport,
            valid: true,
            focused: false,
            toolbar_supported: false,
            toolbar: Vec::new(),
            buffer: None,
            cursor: (1, 0),
            definitions: HashMap::new(),
            definition_counts: HashMap::new(),
            placements: BTreeMap::new(),
            breakpoints: HashSet::new(),
            events: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    /// Pretend the host can show a per-window toolbar
    pub fn with_toolbar(mut self) -> Self {
        self.toolbar_supported = true;
        self
    }

    /// Close the window. Every later operation sees an invalid viewport.
    pub fn close(&mut self) {
        self.valid = false;
        self.focused = false;
    }

    pub fn reopen(&mut self) {
        self.valid = true;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.buffer.as_ref().map(|buffer| buffer.path.as_path())
    }

    /// Cursor position as (1-based line, 0-based column)
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn toolbar(&self) -> &[ToolbarButton] {
        &self.toolbar
    }

    pub fn definition(&self, name: &str) -> Option<&SignDefinition> {
        self.definitions.get(name)
    }

    /// How many times `name` has been defined
    pub fn definition_count(&self, name: &str) -> usize {
        self.definition_counts.get(name).copied().unwrap_or(0)
    }

    pub fn placed_signs(&self) -> Vec<&SignPlacement> {
        self.placements.values().collect()
    }

    pub fn add_breakpoint(&mut self, path: impl Into<PathBuf>, line: usize) {
        self.breakpoints.insert((path.into(), line));
    }

    /// Every event raised so far, oldest first
    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Receive events raised from now on
    pub fn subscribe(&mut self) -> Receiver<HostEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }
}

impl ViewportHost for MemoryHost {
    fn viewport(&self) -> ViewportId {
        self.viewport
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn focus(&mut self) {
        if self.valid {
            self.focused = true;
        }
    }

    fn open_file(&mut self, path: &Path) -> Result<(), OpenFileError> {
        if !self.valid {
            return Err(OpenFileError::Host("window is closed".to_string()));
        }
        if self.current_file() == Some(path) {
            return Ok(());
        }

        let contents = std::fs::read_to_string(path)?;
        self.buffer = Some(Buffer {
            path: path.to_path_buf(),
            lines: contents.lines().map(ToString::to_string).collect(),
            syntax: syntax_for_path(path).map(ToString::to_string),
        });
        self.cursor = (1, 0);
        Ok(())
    }

    fn set_cursor(&mut self, line: usize, column: usize) -> Result<(), PositionError> {
        let buffer = self.buffer.as_ref().ok_or(PositionError::NoBuffer)?;
        if line == 0 || line > buffer.lines.len() {
            return Err(PositionError::LineOutOfRange {
                line,
                line_count: buffer.lines.len(),
            });
        }

        // like most editors, clamp the column to the end of the line
        let width = buffer.lines[line - 1].chars().count();
        self.cursor = (line, column.min(width.saturating_sub(1)));
        Ok(())
    }

    fn syntax(&self) -> Option<String> {
        self.buffer.as_ref().and_then(|buffer| buffer.syntax.clone())
    }

    fn raise(&mut self, event: HostEvent) {
        self.events.push(event);
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    fn supports_toolbar(&self) -> bool {
        self.toolbar_supported
    }

    fn install_toolbar(&mut self, buttons: &[ToolbarButton]) {
        self.toolbar = buttons.to_vec();
    }
}

impl SignRegistry for MemoryHost {
    fn is_defined(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    fn define(&mut self, definition: &SignDefinition) {
        *self
            .definition_counts
            .entry(definition.name.clone())
            .or_default() += 1;
        self.definitions
            .insert(definition.name.clone(), definition.clone());
    }

    fn place(&mut self, placement: &SignPlacement) {
        self.placements.insert(
            (placement.group.clone(), placement.id),
            placement.clone(),
        );
    }

    fn unplace(&mut self, id: SignId, group: &str) {
        self.placements.remove(&(group.to_string(), id));
    }

    fn has_breakpoint(&self, path: &Path, line: usize) -> bool {
        self.breakpoints.contains(&(path.to_path_buf(), line))
    }
}

/// Guess a syntax name from a file extension
pub fn syntax_for_path(path: &Path) -> Option<&'static str> {
    let syntax = match path.extension()?.to_str()? {
        "py" => "python",
        "rs" => "rust",
        "go" => "go",
        "c" | "h" => "c",
        "cc" | "cpp" | "cxx" | "hpp" => "cpp",
        "js" | "mjs" => "javascript",
        "ts" => "typescript",
        "java" => "java",
        "lua" => "lua",
        "rb" => "ruby",
        "sh" => "sh",
        _ => return None,
    };
    Some(syntax)
}
