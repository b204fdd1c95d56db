//! Row normalization: component names, control families, control records.

use crate::config::ConversionConfig;
use crate::error::ControlKeyError;
use crate::models::{ControlRecord, NarrativePart};
use crate::parser::Row;

use super::text::cleanup_text;

/// A row turned into its group key and control record.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub component: String,
    pub family: String,
    pub record: ControlRecord,
    /// Set when the control identifier yielded no family and the fallback was used
    pub anomaly: Option<ControlKeyError>,
}

/// Collapse a component cell onto a known alias.
///
/// The first alias contained in `raw` wins. An empty result becomes the
/// `unidentified` label. No other whitespace or case normalization is done.
pub fn resolve_component(raw: &str, aliases: &[String], unidentified: &str) -> String {
    let resolved = aliases
        .iter()
        .find(|alias| !alias.is_empty() && raw.contains(alias.as_str()))
        .map(String::as_str)
        .unwrap_or(raw);

    if resolved.is_empty() {
        unidentified.to_string()
    } else {
        resolved.to_string()
    }
}

/// Control family of an identifier: everything before the first `-`.
///
/// `"AU-04.1"` gives `"AU"`.
pub fn control_family(control_key: &str) -> Result<&str, ControlKeyError> {
    if control_key.is_empty() {
        return Err(ControlKeyError::Empty);
    }
    match control_key.split_once('-') {
        Some(("", _)) => Err(ControlKeyError::EmptyFamily(control_key.to_string())),
        Some((family, _)) => Ok(family),
        None => Err(ControlKeyError::MissingDelimiter(control_key.to_string())),
    }
}

/// Split an evidence cell into entries.
///
/// Without a delimiter the cell is passed through as the single entry.
/// Pieces are kept verbatim, untrimmed and including empty ones.
pub fn split_evidence(text: &str, delimiter: Option<&str>) -> Vec<String> {
    match delimiter {
        Some(d) if !d.is_empty() => text.split(d).map(String::from).collect(),
        _ => vec![text.to_string()],
    }
}

/// Normalize one CSV row. Every row yields exactly one record.
pub fn normalize_row(row: &Row, config: &ConversionConfig) -> NormalizedRow {
    let columns = &config.columns;

    let component = resolve_component(
        row.text(&columns.component),
        &config.component_aliases,
        &config.unidentified_component,
    );

    let control_key = row.text(&columns.control).trim().to_string();
    let (family, anomaly) = match control_family(&control_key) {
        Ok(family) => (family.to_string(), None),
        Err(err) => (config.unparsed_family.clone(), Some(err)),
    };

    let control_key_part = row
        .get(&columns.control_part)
        .map(|part| part.trim().to_string());

    // no evidence column, no evidence
    let evidence = row
        .get(&columns.evidence)
        .map(|cell| split_evidence(cell, config.evidence_delimiter.as_deref()))
        .unwrap_or_default();

    let record = ControlRecord {
        control_key,
        control_family: family.clone(),
        control_key_part,
        standard_key: config.standard_key.clone(),
        covered_by: Vec::new(),
        evidence,
        implementation_status: config.implementation_status.clone(),
        narrative: vec![NarrativePart {
            text: cleanup_text(row.text(&columns.narrative)),
        }],
    };

    NormalizedRow {
        component,
        family,
        record,
        anomaly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases() -> Vec<String> {
        ConversionConfig::default().component_aliases
    }

    fn row(control: &str, component: &str, narrative: &str) -> Row {
        Row::from_pairs(
            1,
            [
                ("Control", control),
                ("System Element", component),
                ("Remediation Plan", narrative),
            ],
        )
    }

    #[test]
    fn test_alias_substring_collapses() {
        assert_eq!(resolve_component("AWS EC2 instance", &aliases(), "none"), "AWS");
        assert_eq!(resolve_component("Logs in CACE (ELK) stack", &aliases(), "none"), "CACE (ELK)");
    }

    #[test]
    fn test_first_alias_wins() {
        assert_eq!(resolve_component("GitLab on AWS", &aliases(), "none"), "AWS");
    }

    #[test]
    fn test_unknown_component_passes_through() {
        assert_eq!(resolve_component(" Postgres ", &aliases(), "none"), " Postgres ");
        assert_eq!(resolve_component("aws", &aliases(), "none"), "aws");
    }

    #[test]
    fn test_empty_component_uses_fallback() {
        assert_eq!(
            resolve_component("", &aliases(), "unidentified component"),
            "unidentified component"
        );
    }

    #[test]
    fn test_control_family() {
        assert_eq!(control_family("AU-04.1"), Ok("AU"));
        assert_eq!(control_family("AC-2-1"), Ok("AC"));
        assert_eq!(control_family("SI-"), Ok("SI"));
    }

    #[test]
    fn test_control_family_reconstructs_identifier() {
        for id in ["AU-4", "AC-2(1)", "IA-05.1", "PM-1-a"] {
            let family = control_family(id).unwrap();
            let (_, rest) = id.split_once('-').unwrap();
            assert_eq!(format!("{}-{}", family, rest), id);
        }
    }

    #[test]
    fn test_malformed_control_identifiers() {
        assert_eq!(control_family(""), Err(ControlKeyError::Empty));
        assert_eq!(
            control_family("AU04"),
            Err(ControlKeyError::MissingDelimiter("AU04".to_string()))
        );
        assert_eq!(
            control_family("-4"),
            Err(ControlKeyError::EmptyFamily("-4".to_string()))
        );
    }

    #[test]
    fn test_split_evidence() {
        assert_eq!(split_evidence("a.log", None), vec!["a.log"]);
        assert_eq!(split_evidence("a.log; b.log", Some(";")), vec!["a.log", " b.log"]);
        assert_eq!(split_evidence("a;b;", Some(";")), vec!["a", "b", ""]);
        assert_eq!(split_evidence("a;b", None), vec!["a;b"]);
        assert_eq!(split_evidence(" a.log ", None), vec![" a.log "]);
        assert_eq!(split_evidence("", None), vec![""]);
    }

    #[test]
    fn test_evidence_column_passed_through() {
        let config = ConversionConfig::default();
        let present = Row::from_pairs(
            1,
            [("Control", "AU-4"), ("Test Artifact (NIST 800-53A)", "")],
        );
        assert_eq!(normalize_row(&present, &config).record.evidence, vec![""]);

        let absent = Row::from_pairs(1, [("Control", "AU-4")]);
        assert!(normalize_row(&absent, &config).record.evidence.is_empty());
    }

    #[test]
    fn test_normalize_row() {
        let config = ConversionConfig::default();
        let normalized = normalize_row(&row(" AU-4 ", "AWS prod", "Logs retained.  "), &config);

        assert_eq!(normalized.component, "AWS");
        assert_eq!(normalized.family, "AU");
        assert!(normalized.anomaly.is_none());

        let record = normalized.record;
        assert_eq!(record.control_key, "AU-4");
        assert_eq!(record.control_family, "AU");
        assert_eq!(record.control_key_part, None);
        assert_eq!(record.standard_key, "NIST SP 800-53 Revision 4");
        assert_eq!(record.implementation_status, "Not Implemented");
        assert!(record.covered_by.is_empty());
        assert!(record.evidence.is_empty());
        assert_eq!(record.narrative[0].text, "Logs retained.\n");
    }

    #[test]
    fn test_control_part_trimmed() {
        let config = ConversionConfig::default();
        let row = Row::from_pairs(1, [("Control", "AC-2"), ("Control Part", "  (a) ")]);
        let normalized = normalize_row(&row, &config);
        assert_eq!(normalized.record.control_key_part.as_deref(), Some("(a)"));
    }

    #[test]
    fn test_blank_control_part_is_empty_not_null() {
        let config = ConversionConfig::default();
        let blank = Row::from_pairs(1, [("Control", "AC-2"), ("Control Part", "   ")]);
        assert_eq!(normalize_row(&blank, &config).record.control_key_part.as_deref(), Some(""));

        let absent = Row::from_pairs(1, [("Control", "AC-2")]);
        assert_eq!(normalize_row(&absent, &config).record.control_key_part, None);
    }

    #[test]
    fn test_malformed_identifier_uses_fallback_family() {
        let config = ConversionConfig::default();
        let normalized = normalize_row(&row("AU04", "", "x"), &config);

        assert_eq!(normalized.family, "Other");
        assert_eq!(normalized.record.control_family, "Other");
        assert_eq!(normalized.record.control_key, "AU04");
        assert_eq!(normalized.component, "unidentified component");
        assert!(matches!(normalized.anomaly, Some(ControlKeyError::MissingDelimiter(_))));
    }
}
