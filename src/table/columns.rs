//! Header resolution and column roles.
//!
//! Source spreadsheets name the same column many ways ("% correct answers",
//! "% aciertos", "Aciertos %"). Each table schema maps a canonical key to an
//! ordered list of accepted synonyms; resolution canonicalizes the actual
//! headers once per table load and matches synonyms in order. When nothing
//! matches, the first synonym literal stands in as the column name; reads
//! through it yield empty values, never an error.

use crate::text::canonical_key;
use std::collections::HashMap;

/// How the presentation layer treats a column.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColumnRole {
    /// Model identity: clickable, raises a selection instead of navigating
    Model,
    /// Boolean-like flag rendered as a badge
    Flag,
    /// Percentage bucketed into three severity tiers
    Percent,
    /// Correlation coefficient bucketed into four tiers
    Correlation,
    /// Semicolon-separated `label [url]` reference entries
    References,
    /// Everything else
    Plain,
}

/// One column of a schema: canonical key, accepted synonyms, role.
#[derive(Debug)]
pub struct ColumnSpec {
    /// Canonical key the rest of the crate uses to address the column
    pub key: &'static str,
    /// Accepted header spellings, most specific first
    pub synonyms: &'static [&'static str],
    /// Presentation role
    pub role: ColumnRole,
}

/// A table schema: the known columns plus which of them drive interaction.
#[derive(Debug)]
pub struct Schema {
    /// Schema name, for diagnostics
    pub name: &'static str,
    /// Known columns in display order
    pub columns: &'static [ColumnSpec],
    /// Canonical key of the flag column hosting the subset toggle
    pub toggle_column: Option<&'static str>,
    /// Canonical keys reported alongside the model name on selection
    pub selection_aux: &'static [&'static str],
}

/// Benchmark summary: one row per evaluated model.
pub const MODEL_SUMMARY: Schema = Schema {
    name: "model-summary",
    columns: &[
        ColumnSpec { key: "model", synonyms: &["model"], role: ColumnRole::Model },
        ColumnSpec { key: "ft", synonyms: &["ft"], role: ColumnRole::Flag },
        ColumnSpec { key: "method", synonyms: &["method", "metodo", "método"], role: ColumnRole::Plain },
        ColumnSpec { key: "questions", synonyms: &["questions", "preguntas", "n"], role: ColumnRole::Plain },
        ColumnSpec {
            key: "pct_correct",
            synonyms: &[
                "% correct answers",
                "% aciertos",
                "aciertos %",
                "porcentaje aciertos",
                "correct answers",
            ],
            role: ColumnRole::Percent,
        },
        ColumnSpec {
            key: "pct_score",
            synonyms: &[
                "% corrected score",
                "% puntuación corregida",
                "% puntuacion corregida",
                "puntuacion %",
                "corrected score",
            ],
            role: ColumnRole::Percent,
        },
        ColumnSpec { key: "no_doubt", synonyms: &["no doubt", "nodoubt", "doubt"], role: ColumnRole::Flag },
        ColumnSpec { key: "logprobs", synonyms: &["logprobs", "log probs", "logprobabilities"], role: ColumnRole::Flag },
    ],
    toggle_column: Some("ft"),
    selection_aux: &["logprobs", "no_doubt"],
};

/// Per-model responses: one row per evaluated question.
pub const MODEL_RESPONSES: Schema = Schema {
    name: "model-responses",
    columns: &[
        ColumnSpec { key: "custom_id", synonyms: &["customid", "custom id", "id"], role: ColumnRole::Plain },
        ColumnSpec {
            key: "answer",
            synonyms: &["respuesta modelo", "respuestamodelo", "model response", "answer"],
            role: ColumnRole::Plain,
        },
        ColumnSpec {
            key: "letter_logprob",
            synonyms: &["logprob letra", "logprobletra", "letter logprob"],
            role: ColumnRole::Plain,
        },
        ColumnSpec {
            key: "top_logprobs",
            synonyms: &["top logprobs", "toplogprobs", "top_logprobs"],
            role: ColumnRole::Plain,
        },
        ColumnSpec {
            key: "expected",
            synonyms: &["respuesta real", "respuestareal", "correct answer", "real answer"],
            role: ColumnRole::Plain,
        },
        ColumnSpec { key: "correct", synonyms: &["acierto", "correct", "success", "hit"], role: ColumnRole::Flag },
        ColumnSpec {
            key: "full_response",
            synonyms: &["respuesta completa", "respuestacompleta", "full response", "complete response"],
            role: ColumnRole::Plain,
        },
    ],
    toggle_column: Some("correct"),
    selection_aux: &[],
};

/// Psycholinguistics benchmark rows: correlation scores against human data.
pub const PSYCHOLINGUISTIC_BENCHMARKS: Schema = Schema {
    name: "psycholinguistic-benchmarks",
    columns: &[
        ColumnSpec { key: "model", synonyms: &["model", "modelo"], role: ColumnRole::Model },
        ColumnSpec { key: "ft", synonyms: &["ft"], role: ColumnRole::Flag },
        ColumnSpec { key: "task", synonyms: &["task", "tarea", "benchmark"], role: ColumnRole::Plain },
        ColumnSpec { key: "items", synonyms: &["items", "n", "stimuli"], role: ColumnRole::Plain },
        ColumnSpec { key: "r", synonyms: &["r", "ρ", "rho", "correlation"], role: ColumnRole::Correlation },
        ColumnSpec {
            key: "work",
            synonyms: &["work/reference", "work", "reference", "referencia", "obra"],
            role: ColumnRole::References,
        },
    ],
    toggle_column: Some("ft"),
    selection_aux: &[],
};

/// The outcome of resolving a schema against a table's actual headers.
#[derive(Debug)]
pub struct Columns {
    resolved: Vec<(&'static str, String, ColumnRole)>,
    toggle: Option<String>,
    selection_aux: Vec<(&'static str, String)>,
}

impl Schema {
    /// Resolves the schema against a table's headers.
    ///
    /// Every known column ends up addressable: by its matched header when a
    /// synonym canonicalizes to an actual header, or by the first synonym
    /// literal otherwise. The fallback may name a column no row carries;
    /// reading through it yields empty values.
    ///
    /// # Arguments
    /// * `headers` - The table's headers, in display order
    pub fn resolve(&self, headers: &[String]) -> Columns {
        let mut index = HashMap::<String, &String>::new();
        for header in headers {
            index.insert(canonical_key(header), header);
        }

        let resolved: Vec<(&'static str, String, ColumnRole)> = self
            .columns
            .iter()
            .map(|spec| {
                let header = spec
                    .synonyms
                    .iter()
                    .find_map(|synonym| index.get(&canonical_key(synonym)))
                    .map(|header| (*header).to_owned())
                    .unwrap_or_else(|| spec.synonyms[0].to_owned());
                (spec.key, header, spec.role)
            })
            .collect();

        let header_of = |key: &str| {
            resolved
                .iter()
                .find(|(candidate, _, _)| *candidate == key)
                .map(|(_, header, _)| header.to_owned())
        };
        let toggle = self.toggle_column.and_then(|key| header_of(key));
        let selection_aux = self
            .selection_aux
            .iter()
            .filter_map(|key| header_of(key).map(|header| (*key, header)))
            .collect();

        Columns {
            resolved,
            toggle,
            selection_aux,
        }
    }
}

impl Columns {
    /// The actual (or fallback) header for a canonical key.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.resolved
            .iter()
            .find(|(candidate, _, _)| *candidate == key)
            .map(|(_, header, _)| header.as_str())
    }

    /// The role of a column, looked up by its actual header name.
    /// Headers outside the schema are plain.
    pub fn role(&self, header: &str) -> ColumnRole {
        self.resolved
            .iter()
            .find(|(_, candidate, _)| candidate == header)
            .map(|(_, _, role)| *role)
            .unwrap_or(ColumnRole::Plain)
    }

    /// Header of the model-identity column, when the schema has one.
    pub fn model_header(&self) -> Option<&str> {
        self.resolved
            .iter()
            .find(|(_, _, role)| *role == ColumnRole::Model)
            .map(|(_, header, _)| header.as_str())
    }

    /// Header of the flag column hosting the subset toggle.
    pub fn toggle_header(&self) -> Option<&str> {
        self.toggle.as_deref()
    }

    /// `(canonical key, header)` pairs reported on model selection.
    pub fn selection_aux(&self) -> &[(&'static str, String)] {
        &self.selection_aux
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_owned()).collect()
    }

    #[test]
    fn synonyms_match_across_accents_and_case() {
        let columns = MODEL_SUMMARY.resolve(&headers(&[
            "Model",
            "FT",
            "Método",
            "Preguntas",
            "% Aciertos",
            "% Puntuación Corregida",
            "No Doubt",
            "Logprobs",
        ]));
        assert_eq!(columns.header("model"), Some("Model"));
        assert_eq!(columns.header("method"), Some("Método"));
        assert_eq!(columns.header("questions"), Some("Preguntas"));
        assert_eq!(columns.header("pct_correct"), Some("% Aciertos"));
        assert_eq!(columns.header("pct_score"), Some("% Puntuación Corregida"));
        assert_eq!(columns.toggle_header(), Some("FT"));
    }

    #[test]
    fn unmatched_columns_fall_back_to_first_synonym() {
        let columns = MODEL_SUMMARY.resolve(&headers(&["Model", "FT"]));
        assert_eq!(columns.header("questions"), Some("questions"));
        assert_eq!(columns.header("pct_correct"), Some("% correct answers"));
    }

    #[test]
    fn greek_correlation_header_resolves() {
        let columns = PSYCHOLINGUISTIC_BENCHMARKS.resolve(&headers(&["Modelo", "Task", "ρ", "Work/Reference"]));
        assert_eq!(columns.header("r"), Some("ρ"));
        assert_eq!(columns.header("work"), Some("Work/Reference"));
        assert_eq!(columns.model_header(), Some("Modelo"));
    }

    #[test]
    fn roles_look_up_by_actual_header() {
        let columns = MODEL_SUMMARY.resolve(&headers(&["Model", "FT", "% Aciertos"]));
        assert_eq!(columns.role("Model"), ColumnRole::Model);
        assert_eq!(columns.role("FT"), ColumnRole::Flag);
        assert_eq!(columns.role("% Aciertos"), ColumnRole::Percent);
        assert_eq!(columns.role("Unknown"), ColumnRole::Plain);
    }

    #[test]
    fn selection_aux_resolves_to_headers() {
        let columns = MODEL_SUMMARY.resolve(&headers(&["Model", "No Doubt", "Logprobs"]));
        let aux = columns.selection_aux();
        assert_eq!(aux.len(), 2);
        assert_eq!(aux[0], ("logprobs", "Logprobs".to_owned()));
        assert_eq!(aux[1], ("no_doubt", "No Doubt".to_owned()));
    }
}
