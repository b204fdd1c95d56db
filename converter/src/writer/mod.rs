//! OpenControl repository writer.
//!
//! Output layout under the configured root:
//!
//! ```text
//! opencontrol.yaml
//! components/<component-dir>/component.yaml
//! components/<component-dir>/<family>-<name>.yaml
//! ```

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::ConversionConfig;
use crate::error::{WriteError, WriteResult};
use crate::models::{ComponentDocument, FamilyDocument, Metadata, OpenControlDocument, Organization};
use crate::report::RunLog;
use crate::transform::grouper::ComponentFamilyGroup;

/// What happened to the previous `components/` tree.
#[derive(Debug)]
pub enum CleanupOutcome {
    Removed,
    NotFound,
    Failed(io::Error),
}

/// Files produced by [`write_component_tree`].
#[derive(Debug, Clone, Default)]
pub struct TreeSummary {
    pub family_files: Vec<PathBuf>,
    pub component_files: Vec<PathBuf>,
    /// `./components/<dir>` entries, sorted and deduplicated
    pub component_refs: Vec<String>,
}

/// Directory name of a component: spaces become hyphens, empty becomes `Other`.
pub fn component_dir_name(component: &str) -> String {
    if component.is_empty() {
        "Other".to_string()
    } else {
        component.replace(' ', "-")
    }
}

/// Remove a previous components tree.
///
/// Never fails the run: the caller logs `NotFound` and `Failed` and goes on.
pub fn clean_components_dir(dir: &Path) -> CleanupOutcome {
    match fs::remove_dir_all(dir) {
        Ok(()) => CleanupOutcome::Removed,
        Err(e) if e.kind() == io::ErrorKind::NotFound => CleanupOutcome::NotFound,
        Err(e) => CleanupOutcome::Failed(e),
    }
}

/// Serialize `doc` as YAML to `path`, creating parent directories.
pub fn write_yaml<T: Serialize>(path: &Path, doc: &T) -> WriteResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let content = serde_yaml::to_string(doc).map_err(|source| WriteError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, content).map_err(|source| WriteError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Sorted, deduplicated `./components/<dir>` references for the manifest.
pub fn component_refs(groups: &[ComponentFamilyGroup]) -> Vec<String> {
    let mut refs: Vec<String> = groups
        .iter()
        .map(|g| format!("./components/{}", component_dir_name(&g.component)))
        .collect();
    refs.sort();
    refs.dedup();
    refs
}

/// Write one file per (component, family) group, then one `component.yaml`
/// per component listing its family files in sorted order.
pub fn write_component_tree(
    groups: &[ComponentFamilyGroup],
    config: &ConversionConfig,
    log: &mut RunLog,
) -> WriteResult<TreeSummary> {
    let components_dir = config.components_dir();
    let mut summary = TreeSummary::default();

    // component name -> family file names, in first-seen order
    let mut families_by_component: Vec<(&str, Vec<String>)> = Vec::new();

    for group in groups {
        let file_name = group.file_name();
        let path = components_dir
            .join(component_dir_name(&group.component))
            .join(&file_name);

        let doc = FamilyDocument {
            name: group.component.clone(),
            family: group.family_name.clone(),
            documentation_complete: false,
            schema_version: config.schema_version.clone(),
            satisfies: group.controls.clone(),
        };
        write_yaml(&path, &doc)?;
        log.info(format!(
            "{} ({} controls)",
            path.display(),
            group.controls.len()
        ));
        summary.family_files.push(path);

        match families_by_component
            .iter_mut()
            .find(|(name, _)| *name == group.component)
        {
            Some((_, files)) => files.push(file_name),
            None => families_by_component.push((group.component.as_str(), vec![file_name])),
        }
    }

    for (component, mut files) in families_by_component {
        files.sort();
        let path = components_dir
            .join(component_dir_name(component))
            .join("component.yaml");

        let doc = ComponentDocument {
            name: component.to_string(),
            documentation_complete: false,
            schema_version: config.schema_version.clone(),
            satisfies: files,
        };
        write_yaml(&path, &doc)?;
        summary.component_files.push(path);
    }

    summary.component_refs = component_refs(groups);
    Ok(summary)
}

/// Build the root `opencontrol.yaml` document.
pub fn build_manifest(component_refs: Vec<String>, config: &ConversionConfig) -> OpenControlDocument {
    let system = &config.system;
    OpenControlDocument {
        schema_version: config.manifest_schema_version.clone(),
        name: system.name.clone(),
        metadata: Metadata {
            authorization_id: system.authorization_id.clone(),
            description: system.description.clone(),
            organization: Organization {
                name: system.organization_name.clone(),
                abbreviation: system.abbreviation.clone(),
            },
            repository: system.repository.clone(),
        },
        components: component_refs,
        standards: config.standards.clone(),
        certifications: config.certifications.clone(),
    }
}

/// Write `opencontrol.yaml` at the output root and return its path.
pub fn write_manifest(component_refs: Vec<String>, config: &ConversionConfig) -> WriteResult<PathBuf> {
    let path = config.manifest_path();
    write_yaml(&path, &build_manifest(component_refs, config))?;
    Ok(path)
}
