//! Group flat control rows into component / control-family sets.
//!
//! # Architecture
//!
//! ```text
//! CSV Input (flat rows)              →  Grouped Output
//! ┌────────────────────────────┐       ┌──────────────────────────┐
//! │ AU-4, AWS prod             │       │ (AWS, AU)                │
//! │ AU-9, AWS                  │  →    │   satisfies: [AU-4, AU-9]│
//! │ AC-2, GitLab               │       ├──────────────────────────┤
//! └────────────────────────────┘       │ (GitLab, AC)             │
//!                                      │   satisfies: [AC-2]      │
//!                                      └──────────────────────────┘
//! ```
//!
//! Groups keep first-seen order and records keep row order, so the same
//! input always produces the same files with the same content.

use std::collections::HashMap;

use crate::models::ControlRecord;

/// Controls of one component within one control family.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentFamilyGroup {
    pub component: String,
    pub family: String,
    /// Display name of the family; currently the family key itself
    pub family_name: String,
    pub controls: Vec<ControlRecord>,
}

impl ComponentFamilyGroup {
    fn new(component: String, family: String) -> Self {
        Self {
            component,
            family_name: family.clone(),
            family,
            controls: Vec::new(),
        }
    }

    /// `<family>-<name>.yaml`, spaces in the name replaced by underscores.
    pub fn file_name(&self) -> String {
        format!("{}-{}.yaml", self.family, self.family_name.replace(' ', "_"))
    }
}

/// Accumulates records per (component, family) in arrival order.
#[derive(Debug, Default)]
pub struct ControlAggregator {
    groups: Vec<ComponentFamilyGroup>,
    index: HashMap<(String, String), usize>,
}

impl ControlAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to its group, creating the group on first sight.
    ///
    /// Duplicate control identifiers are kept as separate entries.
    pub fn add(&mut self, component: &str, family: &str, record: ControlRecord) {
        let key = (component.to_string(), family.to_string());
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.groups.len();
                self.groups
                    .push(ComponentFamilyGroup::new(key.0.clone(), key.1.clone()));
                self.index.insert(key, slot);
                slot
            }
        };
        self.groups[slot].controls.push(record);
    }

    pub fn groups(&self) -> &[ComponentFamilyGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Distinct components in first-seen order.
    pub fn components(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for group in &self.groups {
            if !seen.contains(&group.component.as_str()) {
                seen.push(group.component.as_str());
            }
        }
        seen
    }

    pub fn into_groups(self) -> Vec<ComponentFamilyGroup> {
        self.groups
    }
}

impl FromIterator<(String, String, ControlRecord)> for ControlAggregator {
    fn from_iter<I: IntoIterator<Item = (String, String, ControlRecord)>>(iter: I) -> Self {
        let mut aggregator = Self::new();
        for (component, family, record) in iter {
            aggregator.add(&component, &family, record);
        }
        aggregator
    }
}
