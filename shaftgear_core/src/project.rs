//! # Project Data Structures
//!
//! The `Project` struct is the root container for a set of shaft and gear
//! calculations. Projects serialize to `.sgp` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job id, timestamps)
//! ├── settings: DesignSettings (deflection limit, hollow search, default material)
//! └── items: HashMap<Uuid, CalculationItem> (all calculations)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use shaftgear_core::project::Project;
//!
//! let project = Project::new("Jane Engineer", "26-042");
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("26-042"));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{CalculationItem, CalculationOutcome};
use crate::errors::CalcResult;
use crate::settings::DesignSettings;

/// Current schema version for .sgp files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
///
/// Items are stored in a flat UUID-keyed map; use [`Project::items_by_label`]
/// for a stable display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub meta: ProjectMetadata,

    /// Settings applied to every item when the project is evaluated
    #[serde(default)]
    pub settings: DesignSettings,

    pub items: HashMap<Uuid, CalculationItem>,
}

impl Project {
    /// Create a new empty project with default settings.
    ///
    /// ```rust
    /// use shaftgear_core::project::Project;
    ///
    /// let project = Project::new("John Doe", "26-001");
    /// assert_eq!(project.meta.engineer, "John Doe");
    /// assert_eq!(project.item_count(), 0);
    /// ```
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                created: now,
                modified: now,
            },
            settings: DesignSettings::default(),
            items: HashMap::new(),
        }
    }

    /// Add a calculation item to the project.
    ///
    /// Returns the UUID assigned to the item.
    pub fn add_item(&mut self, item: CalculationItem) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(id, item);
        self.touch();
        id
    }

    /// Remove a calculation item by UUID.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<CalculationItem> {
        let item = self.items.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    pub fn get_item(&self, id: &Uuid) -> Option<&CalculationItem> {
        self.items.get(id)
    }

    /// Mutable access marks the project as modified when the item exists.
    pub fn get_item_mut(&mut self, id: &Uuid) -> Option<&mut CalculationItem> {
        if self.items.contains_key(id) {
            self.meta.modified = Utc::now();
            self.items.get_mut(id)
        } else {
            None
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Items ordered by label, then by id
    pub fn items_by_label(&self) -> Vec<(&Uuid, &CalculationItem)> {
        let mut items: Vec<_> = self.items.iter().collect();
        items.sort_by(|a, b| a.1.label().cmp(b.1.label()).then(a.0.cmp(b.0)));
        items
    }

    /// Evaluate every item with the project settings, in label order.
    ///
    /// One failing item does not stop the others.
    pub fn evaluate_all(&self) -> Vec<(Uuid, CalcResult<CalculationOutcome>)> {
        self.items_by_label()
            .into_iter()
            .map(|(id, item)| {
                let outcome = item.evaluate(&self.settings);
                if let Err(e) = &outcome {
                    tracing::warn!(%id, label = item.label(), error = %e, "project item failed");
                }
                (*id, outcome)
            })
            .collect()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}
