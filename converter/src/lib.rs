//! # csv2opencontrol - security-control CSV exports to OpenControl YAML
//!
//! Reads a CSV export of control implementations and writes an OpenControl
//! repository: one YAML file per (component, control family), a
//! `component.yaml` per component and a root `opencontrol.yaml`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Transform  │────▶│   Writer    │
//! │ (CSV / TSV) │     │  (auto-enc) │     │  (group by  │     │ (YAML tree) │
//! └─────────────┘     └─────────────┘     │ comp, fam.) │     └─────────────┘
//!                                         └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use csv2opencontrol::{convert_file, ConversionConfig, RunLog};
//!
//! let summary = convert_file("controls.csv".as_ref(), &ConversionConfig::default(), &mut RunLog::new())?;
//! println!("{} components", summary.components.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Conversion settings
//! - [`models`] - OpenControl documents
//! - [`parser`] - CSV loading with auto-detection
//! - [`transform`] - Normalization, grouping, and pipeline
//! - [`writer`] - YAML tree output
//! - [`report`] - Run log

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Loading
pub mod parser;

// Transformation
pub mod transform;

// Output
pub mod report;
pub mod writer;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{
    ControlKeyError, CsvError, CsvResult, PipelineError, PipelineResult, WriteError, WriteResult,
};

// =============================================================================
// Re-exports - Config & Models
// =============================================================================

pub use config::{ColumnNames, ConversionConfig, SystemMetadata};
pub use models::{
    ComponentDocument, ControlRecord, FamilyDocument, Metadata, NarrativePart,
    OpenControlDocument, Organization,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{decode_content, detect_delimiter, detect_encoding, load_bytes, load_csv_file, LoadedCsv, Row};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    cleanup_text, control_family, convert_file, convert_rows, group_rows, normalize_row,
    resolve_component, split_evidence, ComponentFamilyGroup, ControlAggregator,
    ConversionSummary, NormalizedRow,
};

// =============================================================================
// Re-exports - Output
// =============================================================================

pub use report::{LogEntry, LogLevel, RunLog};
pub use writer::{
    clean_components_dir, component_dir_name, write_component_tree, write_manifest,
    CleanupOutcome, TreeSummary,
};
