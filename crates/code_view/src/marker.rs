use std::path::Path;

use crate::{
    host::SignRegistry,
    signs::{MarkerDefinitionRegistry, SignId, SignPlacement},
};

/// Owns the single program counter sign of a code view
#[derive(Debug)]
pub(crate) struct MarkerTracker {
    group: String,
    placed: Option<SignId>,
}

impl MarkerTracker {
    pub(crate) fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            placed: None,
        }
    }

    pub(crate) fn current(&self) -> Option<SignId> {
        self.placed
    }

    /// Replace the current sign with a `name` sign at `path:line`
    pub(crate) fn place<R>(
        &mut self,
        host: &mut R,
        registry: &mut MarkerDefinitionRegistry,
        name: &str,
        path: &Path,
        line: usize,
    ) -> SignId
    where
        R: SignRegistry + ?Sized,
    {
        self.remove(host);

        let id = registry.next_id();
        host.place(&SignPlacement {
            id,
            group: self.group.clone(),
            name: name.to_string(),
            path: path.to_path_buf(),
            line,
        });
        tracing::debug!(id, name, path = %path.display(), line, "placed program counter");
        self.placed = Some(id);
        id
    }

    /// Remove the sign if one is placed. Returns whether anything was removed.
    pub(crate) fn remove<R>(&mut self, host: &mut R) -> bool
    where
        R: SignRegistry + ?Sized,
    {
        match self.placed.take() {
            Some(id) => {
                host.unplace(id, &self.group);
                tracing::debug!(id, "removed program counter");
                true
            }
            None => false,
        }
    }
}
