//! OpenControl document models.
//!
//! Each struct serializes to one YAML document (or part of one). Field order
//! here is the key order in the generated files, so it must not change.

use serde::{Deserialize, Serialize};

/// One control implementation, an entry of a family file's `satisfies` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlRecord {
    pub control_key: String,
    pub control_family: String,
    pub control_key_part: Option<String>,
    pub standard_key: String,
    pub covered_by: Vec<String>,
    pub evidence: Vec<String>,
    pub implementation_status: String,
    pub narrative: Vec<NarrativePart>,
}

/// A block of narrative text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativePart {
    pub text: String,
}

/// `components/<component>/<family>-<name>.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyDocument {
    pub name: String,
    pub family: String,
    pub documentation_complete: bool,
    pub schema_version: String,
    pub satisfies: Vec<ControlRecord>,
}

/// `components/<component>/component.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDocument {
    pub name: String,
    pub documentation_complete: bool,
    pub schema_version: String,
    /// Family file names, sorted
    pub satisfies: Vec<String>,
}

/// Root `opencontrol.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenControlDocument {
    pub schema_version: String,
    pub name: String,
    pub metadata: Metadata,
    /// `./components/<dir>` references, sorted
    pub components: Vec<String>,
    pub standards: Vec<String>,
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_id: Option<String>,
    pub description: String,
    pub organization: Organization,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    pub abbreviation: String,
}
