//! Transformation module.
//!
//! This module handles CSV row to OpenControl transformation:
//! - Normalize: component aliases, control families, control records
//! - Text: narrative cleanup for YAML block scalars
//! - Grouper: flat rows to (component, family) groups
//! - Pipeline: main conversion pipeline

pub mod grouper;
pub mod normalize;
pub mod pipeline;
pub mod text;

pub use grouper::{ComponentFamilyGroup, ControlAggregator};
pub use normalize::{control_family, normalize_row, resolve_component, split_evidence, NormalizedRow};
pub use pipeline::*;
pub use text::cleanup_text;
