//! Conversion settings.
//!
//! Everything the converter needs to know about the input layout and the
//! generated repository lives in one immutable [`ConversionConfig`] that is
//! handed to [`crate::transform::pipeline::convert_file`]. The CLI builds it
//! from flags and environment variables on top of [`ConversionConfig::default`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the generated OpenControl repository.
pub const DEFAULT_OUTPUT_ROOT: &str = "outputs/opencontrol";

/// Components picked out of multi-valued "System Element" cells, in priority order.
pub const DEFAULT_COMPONENT_ALIASES: &[&str] = &[
    "AWS",
    "Nessus",
    "CACE (ELK)",
    "SonarQube",
    "ADFS",
    "GitLab",
    "CISO",
];

/// Header names of the columns read from the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    /// Control identifier, e.g. `AU-04.1` (required)
    pub control: String,
    /// Control part (optional column)
    pub control_part: String,
    /// Responsible system element (required)
    pub component: String,
    /// Implementation narrative (required)
    pub narrative: String,
    /// Test artifacts used as evidence (optional column)
    pub evidence: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            control: "Control".to_string(),
            control_part: "Control Part".to_string(),
            component: "System Element".to_string(),
            narrative: "Remediation Plan".to_string(),
            evidence: "Test Artifact (NIST 800-53A)".to_string(),
        }
    }
}

impl ColumnNames {
    /// Columns that must be present in the header row.
    pub fn required(&self) -> [&str; 3] {
        [
            self.control.as_str(),
            self.component.as_str(),
            self.narrative.as_str(),
        ]
    }
}

/// System description written into `opencontrol.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemMetadata {
    pub name: String,
    pub organization_name: String,
    pub abbreviation: String,
    pub description: String,
    pub authorization_id: Option<String>,
    pub repository: Option<String>,
}

impl Default for SystemMetadata {
    fn default() -> Self {
        Self {
            name: "MySystem".to_string(),
            organization_name: "MyOrg".to_string(),
            abbreviation: String::new(),
            description: "My shiny new IT system".to_string(),
            authorization_id: None,
            repository: None,
        }
    }
}

/// Settings for one conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    pub columns: ColumnNames,

    /// Substrings that collapse a component cell to a single name (first match wins)
    pub component_aliases: Vec<String>,

    /// Label used when the component cell is empty
    pub unidentified_component: String,

    /// Family used for control identifiers without a `XX-` prefix
    pub unparsed_family: String,

    pub standard_key: String,
    pub implementation_status: String,

    /// `schema_version` of component and family files
    pub schema_version: String,

    /// `schema_version` of `opencontrol.yaml`
    pub manifest_schema_version: String,

    /// Split the evidence cell on this string (whole cell when unset)
    pub evidence_delimiter: Option<String>,

    /// Stop after this many data rows
    pub row_limit: Option<usize>,

    /// Force a CSV delimiter instead of detecting it
    pub delimiter: Option<u8>,

    pub output_root: PathBuf,

    pub system: SystemMetadata,

    /// Entries of the `standards` list in `opencontrol.yaml`
    pub standards: Vec<String>,

    /// Entries of the `certifications` list in `opencontrol.yaml`
    pub certifications: Vec<String>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            component_aliases: DEFAULT_COMPONENT_ALIASES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            unidentified_component: "unidentified component".to_string(),
            unparsed_family: "Other".to_string(),
            standard_key: "NIST SP 800-53 Revision 4".to_string(),
            implementation_status: "Not Implemented".to_string(),
            schema_version: "3.0.0".to_string(),
            manifest_schema_version: "1.0.0".to_string(),
            evidence_delimiter: None,
            row_limit: None,
            delimiter: None,
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            system: SystemMetadata::default(),
            standards: Vec::new(),
            certifications: Vec::new(),
        }
    }
}

impl ConversionConfig {
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    pub fn with_row_limit(mut self, limit: Option<usize>) -> Self {
        self.row_limit = limit;
        self
    }

    pub fn with_delimiter(mut self, delimiter: Option<u8>) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_evidence_delimiter(mut self, delimiter: Option<String>) -> Self {
        self.evidence_delimiter = delimiter.filter(|d| !d.is_empty());
        self
    }

    pub fn with_system(mut self, system: SystemMetadata) -> Self {
        self.system = system;
        self
    }

    /// `<root>/components`
    pub fn components_dir(&self) -> PathBuf {
        self.output_root.join("components")
    }

    /// `<root>/opencontrol.yaml`
    pub fn manifest_path(&self) -> PathBuf {
        self.output_root.join("opencontrol.yaml")
    }
}
