//! Column rendering policy.
//!
//! Pure classification of cell values into the display forms the presentation
//! layer styles: severity tiers for percentage and correlation columns, badges
//! for flag columns, parsed hyperlink entries for work/reference columns.
//! Nothing here draws anything; the contract is the classification itself.

use crate::table::columns::ColumnRole;
use crate::table::CellValue;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Severity tier of a percentage column value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PercentTier {
    /// 75% and above
    High,
    /// 50% to 75%
    Medium,
    /// Below 50%
    Low,
}

/// Buckets a percentage into its severity tier. Bounds are inclusive at the
/// bottom of each tier.
pub fn percent_tier(value: f64) -> PercentTier {
    if value >= 75.0 {
        PercentTier::High
    } else if value >= 50.0 {
        PercentTier::Medium
    } else {
        PercentTier::Low
    }
}

/// Strength tier of a correlation coefficient, independent of the percentage
/// tiers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CorrelationTier {
    /// 0.8 and above
    VeryStrong,
    /// 0.6 to 0.8
    Strong,
    /// 0.4 to 0.6
    Moderate,
    /// Below 0.4
    Weak,
}

/// Buckets a correlation coefficient into its strength tier.
pub fn correlation_tier(value: f64) -> CorrelationTier {
    if value >= 0.8 {
        CorrelationTier::VeryStrong
    } else if value >= 0.6 {
        CorrelationTier::Strong
    } else if value >= 0.4 {
        CorrelationTier::Moderate
    } else {
        CorrelationTier::Weak
    }
}

/// One entry of a work/reference cell: a label and, when the entry carried a
/// recognized URL, the link target.
#[derive(Clone, Debug, PartialEq)]
pub struct Reference {
    /// Display label
    pub label: String,
    /// Link target, present only when the bracketed part parsed as a URL
    pub url: Option<Url>,
}

/// Pattern for one reference entry: `<label> [<url>]`.
fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.*?)\s*\[([^\]]+)\]$").expect("Regex literal"))
}

/// Parses a work/reference cell into its entries.
///
/// Entries are semicolon-separated. An entry matching `<label> [<url>]` whose
/// bracketed part parses as an absolute URL becomes a hyperlink; everything
/// else stays plain text with the whole entry as its label.
pub fn parse_references(text: &str) -> Vec<Reference> {
    text.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            if let Some(captures) = reference_pattern().captures(entry) {
                let label = captures[1].trim().to_owned();
                if let Ok(url) = Url::parse(captures[2].trim()) {
                    let label = if label.is_empty() { url.to_string() } else { label };
                    return Reference { label, url: Some(url) };
                }
            }
            Reference {
                label: entry.to_owned(),
                url: None,
            }
        })
        .collect()
}

/// Display form of a cell, derived from its column role and value.
#[derive(Clone, Debug, PartialEq)]
pub enum CellDisplay {
    /// Clickable model name
    Model { name: String },
    /// Flag badge, on when the value parses truthy
    Badge { on: bool },
    /// Percentage with its severity tier
    Percent { value: f64, tier: PercentTier },
    /// Correlation coefficient with its strength tier
    Correlation { value: f64, tier: CorrelationTier },
    /// Parsed work/reference entries
    References(Vec<Reference>),
    /// Plain text
    Text(String),
}

/// Classifies a cell for display.
///
/// Percentage cells fall back to 0 when the value has no numeric reading, so
/// a table missing the column still renders instead of erroring. Correlation
/// cells without a numeric reading degrade to plain text.
pub fn render(role: ColumnRole, value: &CellValue) -> CellDisplay {
    match role {
        ColumnRole::Model => CellDisplay::Model {
            name: value.to_string(),
        },
        ColumnRole::Flag => CellDisplay::Badge {
            on: value.is_truthy(),
        },
        ColumnRole::Percent => {
            let value = value.as_number().unwrap_or(0.0);
            CellDisplay::Percent {
                value,
                tier: percent_tier(value),
            }
        }
        ColumnRole::Correlation => match value.as_number() {
            Some(value) => CellDisplay::Correlation {
                value,
                tier: correlation_tier(value),
            },
            None => CellDisplay::Text(value.to_string()),
        },
        ColumnRole::References => CellDisplay::References(parse_references(&value.to_string())),
        ColumnRole::Plain => CellDisplay::Text(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_tiers_are_inclusive_at_bounds() {
        assert_eq!(percent_tier(75.0), PercentTier::High);
        assert_eq!(percent_tier(74.99), PercentTier::Medium);
        assert_eq!(percent_tier(50.0), PercentTier::Medium);
        assert_eq!(percent_tier(49.99), PercentTier::Low);
        assert_eq!(percent_tier(0.0), PercentTier::Low);
    }

    #[test]
    fn correlation_tiers_are_inclusive_at_bounds() {
        assert_eq!(correlation_tier(0.8), CorrelationTier::VeryStrong);
        assert_eq!(correlation_tier(0.79), CorrelationTier::Strong);
        assert_eq!(correlation_tier(0.6), CorrelationTier::Strong);
        assert_eq!(correlation_tier(0.4), CorrelationTier::Moderate);
        assert_eq!(correlation_tier(0.39), CorrelationTier::Weak);
    }

    #[test]
    fn references_parse_labels_and_urls() {
        let entries = parse_references(
            "Smith 2020 [https://example.org/paper]; plain note; Lee [not a url]",
        );
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].label, "Smith 2020");
        assert_eq!(
            entries[0].url.as_ref().map(Url::as_str),
            Some("https://example.org/paper")
        );
        assert_eq!(entries[1].label, "plain note");
        assert!(entries[1].url.is_none());
        assert_eq!(entries[2].label, "Lee [not a url]");
        assert!(entries[2].url.is_none());
    }

    #[test]
    fn empty_reference_cells_parse_to_nothing() {
        assert!(parse_references("").is_empty());
        assert!(parse_references(" ; ; ").is_empty());
    }

    #[test]
    fn missing_percent_column_renders_as_zero() {
        let display = render(ColumnRole::Percent, &CellValue::Empty);
        assert_eq!(
            display,
            CellDisplay::Percent {
                value: 0.0,
                tier: PercentTier::Low
            }
        );
    }

    #[test]
    fn flag_cells_render_as_badges() {
        assert_eq!(
            render(ColumnRole::Flag, &CellValue::Text("Sí".to_owned())),
            CellDisplay::Badge { on: true }
        );
        assert_eq!(
            render(ColumnRole::Flag, &CellValue::Text("no".to_owned())),
            CellDisplay::Badge { on: false }
        );
    }
}
