//! Sign (marker) definitions and placement ids.

use std::{collections::HashSet, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::host::SignRegistry;

/// Identifier of a single sign placement within a sign group
pub type SignId = u64;

pub const PROGRAM_COUNTER: &str = "DapPC";
pub const PROGRAM_COUNTER_ON_BREAKPOINT: &str = "DapPCBP";

/// How a kind of sign is drawn
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SignDefinition {
    pub name: String,
    /// Glyph shown in the sign column
    pub text: String,
    /// Glyph used when the sign column is only one cell wide for double-width text
    pub double_text: String,
    /// Highlight group for the glyph
    pub texthl: String,
    /// Highlight group for the whole line
    pub linehl: String,
}

impl SignDefinition {
    pub fn program_counter() -> Self {
        Self {
            name: PROGRAM_COUNTER.to_string(),
            text: "▶".to_string(),
            double_text: "▶".to_string(),
            texthl: "MatchParen".to_string(),
            linehl: "CursorLine".to_string(),
        }
    }

    pub fn program_counter_on_breakpoint() -> Self {
        Self {
            name: PROGRAM_COUNTER_ON_BREAKPOINT.to_string(),
            text: "●▶".to_string(),
            double_text: "▷".to_string(),
            texthl: "MatchParen".to_string(),
            linehl: "CursorLine".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignPlacement {
    pub id: SignId,
    pub group: String,
    pub name: String,
    pub path: PathBuf,
    pub line: usize,
}

/// Tracks which sign kinds this code view has made sure exist, and hands out placement ids.
///
/// Every code view owns its registry so ids never leak between views.
#[derive(Debug)]
pub struct MarkerDefinitionRegistry {
    defined: HashSet<String>,
    next_sign_id: SignId,
}

impl Default for MarkerDefinitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerDefinitionRegistry {
    pub fn new() -> Self {
        Self {
            defined: HashSet::new(),
            next_sign_id: 1,
        }
    }

    /// Define `definition` with the host unless it already exists there.
    ///
    /// Returns `true` if the definition was registered by this call.
    #[tracing::instrument(skip(self, host, definition), fields(name = %definition.name))]
    pub fn ensure_defined<R>(&mut self, host: &mut R, definition: &SignDefinition) -> bool
    where
        R: SignRegistry + ?Sized,
    {
        if self.defined.contains(&definition.name) {
            return false;
        }

        let registered = if host.is_defined(&definition.name) {
            tracing::trace!("sign already defined by host");
            false
        } else {
            tracing::debug!("defining sign");
            host.define(definition);
            true
        };

        self.defined.insert(definition.name.clone());
        registered
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.defined.contains(name)
    }

    pub fn next_id(&mut self) -> SignId {
        let id = self.next_sign_id;
        self.next_sign_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryHost;

    #[test]
    fn defines_once() {
        let mut host = MemoryHost::new(1);
        let mut registry = MarkerDefinitionRegistry::new();
        let definition = SignDefinition::program_counter();

        assert!(registry.ensure_defined(&mut host, &definition));
        assert!(!registry.ensure_defined(&mut host, &definition));
        assert!(registry.is_defined(PROGRAM_COUNTER));
        assert_eq!(host.definition_count(PROGRAM_COUNTER), 1);
    }

    #[test]
    fn respects_existing_host_definition() {
        let mut host = MemoryHost::new(1);
        let definition = SignDefinition::program_counter_on_breakpoint();

        let mut first = MarkerDefinitionRegistry::new();
        assert!(first.ensure_defined(&mut host, &definition));

        let mut second = MarkerDefinitionRegistry::new();
        assert!(!second.ensure_defined(&mut host, &definition));
        assert!(second.is_defined(PROGRAM_COUNTER_ON_BREAKPOINT));
        assert_eq!(host.definition_count(PROGRAM_COUNTER_ON_BREAKPOINT), 1);
    }

    #[test]
    fn ids_are_per_registry() {
        let mut a = MarkerDefinitionRegistry::new();
        let mut b = MarkerDefinitionRegistry::new();

        assert_eq!(a.next_id(), 1);
        assert_eq!(a.next_id(), 2);
        assert_eq!(b.next_id(), 1);
    }
}
