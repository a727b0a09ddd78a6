//! Top-level navigation between screens.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::screens::Screen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    Elections,
    Library,
    Token,
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Elections => "Elections",
            Self::Library => "Library",
            Self::Token => "Token",
        })
    }
}

/// Holds the registered screens and which one is active.
///
/// Leaving a screen resets it, so coming back always starts from an idle
/// attempt and an empty form.
#[derive(Default)]
pub struct ViewSwitcher {
    screens: HashMap<ScreenId, Arc<dyn Screen>>,
    active: Option<ScreenId>,
}

impl fmt::Debug for ViewSwitcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewSwitcher")
            .field("screens", &self.screens.keys().collect::<Vec<_>>())
            .field("active", &self.active)
            .finish()
    }
}

impl ViewSwitcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: ScreenId, screen: Arc<dyn Screen>) {
        self.screens.insert(id, screen);
    }

    pub fn active(&self) -> Option<ScreenId> {
        self.active
    }

    pub fn screen(&self, id: ScreenId) -> Option<&Arc<dyn Screen>> {
        self.screens.get(&id)
    }

    /// Activates `id`. Returns `false` if no such screen is registered.
    pub fn switch_to(&mut self, id: ScreenId) -> bool {
        let Some(entering) = self.screens.get(&id) else {
            return false;
        };
        if self.active == Some(id) {
            return true;
        }
        if let Some(leaving) = self.active.and_then(|prev| self.screens.get(&prev)) {
            leaving.reset();
        }
        entering.reset();
        debug!(from = ?self.active, to = %id, "switching screen");
        self.active = Some(id);
        true
    }
}
