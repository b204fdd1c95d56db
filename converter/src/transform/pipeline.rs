//! High-level pipeline API for CSV to OpenControl conversion.
//!
//! Combines every step: loading, normalization, grouping, and writing.
//!
//! # Example
//!
//! ```rust,ignore
//! use csv2opencontrol::{convert_file, ConversionConfig, RunLog};
//! use std::path::Path;
//!
//! let config = ConversionConfig::default().with_output_root("outputs/my_system");
//! let mut log = RunLog::new();
//! let summary = convert_file(Path::new("controls.csv"), &config, &mut log)?;
//! println!("Wrote {} family files", summary.family_files.len());
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::grouper::ControlAggregator;
use super::normalize::normalize_row;
use crate::config::ConversionConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::parser::{load_csv_file, Row};
use crate::report::{LogEntry, RunLog};
use crate::writer::{clean_components_dir, write_component_tree, write_manifest, CleanupOutcome};

/// Result of a conversion run
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    /// Data rows read from the input
    pub rows: usize,

    /// Number of (component, family) groups
    pub groups: usize,

    /// Sorted `./components/<dir>` references
    pub components: Vec<String>,

    /// Rows with a malformed control identifier
    pub warnings: usize,

    pub family_files: Vec<PathBuf>,
    pub component_files: Vec<PathBuf>,
    pub manifest: PathBuf,
}

/// Convert a CSV export into an OpenControl repository.
///
/// 1. Checks the input exists
/// 2. Loads rows (encoding and delimiter auto-detected)
/// 3. Normalizes and groups them by component and control family
/// 4. Replaces `<root>/components` with freshly written files
/// 5. Writes `<root>/opencontrol.yaml`
pub fn convert_file(
    path: &Path,
    config: &ConversionConfig,
    log: &mut RunLog,
) -> PipelineResult<ConversionSummary> {
    if !path.exists() {
        return Err(PipelineError::InputNotFound(path.to_path_buf()));
    }

    log.info(format!("📖 Reading {}", path.display()));
    let loaded = load_csv_file(path, &config.columns, config.delimiter, config.row_limit)?;
    log.success(format!("Detected encoding: {}", loaded.encoding));
    log.success(format!(
        "Detected separator: '{}'",
        format_delimiter(loaded.delimiter)
    ));
    log.success(format!("Read {} rows", loaded.rows.len()));
    if let Some(limit) = config.row_limit {
        if loaded.rows.len() == limit {
            log.warning(format!("Stopped after the first {} rows", limit));
        }
    }

    convert_rows(&loaded.rows, config, log)
}

/// Convert already-loaded rows; see [`convert_file`].
pub fn convert_rows(
    rows: &[Row],
    config: &ConversionConfig,
    log: &mut RunLog,
) -> PipelineResult<ConversionSummary> {
    if rows.is_empty() {
        log.warning("No control rows; writing an empty repository");
    }

    log.info("📦 Grouping controls by component and family...");
    let aggregator = group_rows(rows, config, log);
    let warnings = log.warnings().filter(|e| e.row.is_some()).count();
    log.success(format!(
        "{} groups across {} components",
        aggregator.len(),
        aggregator.components().len()
    ));

    let components_dir = config.components_dir();
    match clean_components_dir(&components_dir) {
        CleanupOutcome::Removed => {
            log.info(format!("Removed previous {}", components_dir.display()))
        }
        CleanupOutcome::NotFound => log.warning(format!(
            "Nothing to remove at {}",
            components_dir.display()
        )),
        CleanupOutcome::Failed(e) => log.error(format!(
            "Could not remove {}: {} (continuing)",
            components_dir.display(),
            e
        )),
    }

    log.info("📝 Writing component files...");
    let groups = aggregator.into_groups();
    let tree = write_component_tree(&groups, config, log)?;
    log.success(format!(
        "Wrote {} family files and {} component files",
        tree.family_files.len(),
        tree.component_files.len()
    ));

    let manifest = write_manifest(tree.component_refs.clone(), config)?;
    log.success(format!("Wrote {}", manifest.display()));

    Ok(ConversionSummary {
        rows: rows.len(),
        groups: groups.len(),
        components: tree.component_refs,
        warnings,
        family_files: tree.family_files,
        component_files: tree.component_files,
        manifest,
    })
}

/// Normalize every row into the aggregator, logging malformed identifiers.
pub fn group_rows(rows: &[Row], config: &ConversionConfig, log: &mut RunLog) -> ControlAggregator {
    let mut aggregator = ControlAggregator::new();
    for row in rows {
        let normalized = normalize_row(row, config);
        if let Some(anomaly) = &normalized.anomaly {
            log.log(
                LogEntry::warning(format!(
                    "{}; filed under family '{}'",
                    anomaly, normalized.family
                ))
                .with_row(row.number),
            );
        }
        aggregator.add(&normalized.component, &normalized.family, normalized.record);
    }
    aggregator
}

/// Format delimiter for display
fn format_delimiter(d: u8) -> &'static str {
    match d {
        b';' => ";",
        b',' => ",",
        b'\t' => "TAB",
        b'|' => "|",
        _ => "?",
    }
}
