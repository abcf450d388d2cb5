//! Promotional specials.
//!
//! The list lives in memory and is replaced wholesale on every publish;
//! there is no per-item editing. A restart reverts to the seed file.

use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use terp_haus_core::Special;
use tracing::{info, warn};

/// Body accepted by the publish endpoint and the seed file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialsDocument {
    #[serde(default)]
    pub items: Vec<Special>,
}

/// One step of the display rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationSlot {
    /// Special shown at this step; `None` when nothing is published.
    pub current: Option<Special>,
    pub index: usize,
    pub next_index: usize,
    pub count: usize,
}

/// Shared handle to the current specials list.
///
/// Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct SpecialsStore {
    items: Arc<RwLock<Vec<Special>>>,
}

impl SpecialsStore {
    #[must_use]
    pub fn new(items: Vec<Special>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    /// Load the seed file, starting empty if it is missing or unreadable.
    #[must_use]
    pub fn from_seed_file(path: &Path) -> Self {
        let document = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| {
                serde_json::from_str::<SpecialsDocument>(&raw).map_err(|e| e.to_string())
            });

        match document {
            Ok(document) => {
                info!(path = %path.display(), count = document.items.len(), "Loaded specials seed");
                Self::new(document.items)
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "Could not load specials seed, starting empty");
                Self::default()
            }
        }
    }

    /// Snapshot of the current list.
    #[must_use]
    pub fn list(&self) -> Vec<Special> {
        match self.items.read() {
            Ok(items) => items.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the whole list.
    pub fn replace(&self, items: Vec<Special>) {
        let count = items.len();
        match self.items.write() {
            Ok(mut guard) => *guard = items,
            Err(poisoned) => *poisoned.into_inner() = items,
        }
        info!(count, "Specials replaced");
    }

    /// The special to show at step `index`, and the step after it.
    ///
    /// Steps wrap around the list; an empty list always yields step 0.
    #[must_use]
    pub fn rotation(&self, index: usize) -> RotationSlot {
        let items = self.list();
        let count = items.len();
        let index = if count == 0 { 0 } else { index % count };
        RotationSlot {
            current: items.get(index).cloned(),
            index,
            next_index: (index + 1) % count.max(1),
            count,
        }
    }
}
