//! Text normalization utilities shared by the global filter and the header
//! synonym resolver. All matching in the crate is case-, accent- and
//! punctuation-insensitive; these helpers define that equivalence exactly once.

/// Folds a lower-case Latin character with a diacritic to its base letter.
/// Characters outside the covered range pass through unchanged.
fn fold_diacritic(character: char) -> char {
    match character {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'ñ' => 'n',
        'ç' => 'c',
        _ => character,
    }
}

/// Normalizes text for substring matching: lower-case, diacritics folded,
/// everything outside `[a-z0-9]` removed.
///
/// # Arguments
/// * `text` - Text to normalize
/// * `keep_spaces` - Whether whitespace survives normalization (used for the
///   filter input, which is split into tokens afterwards)
pub fn normalize(text: &str, keep_spaces: bool) -> String {
    text.to_lowercase()
        .chars()
        .map(fold_diacritic)
        .filter(|character| {
            character.is_ascii_alphanumeric() || (keep_spaces && character.is_whitespace())
        })
        .collect()
}

/// Canonical form of a column header used for synonym matching.
///
/// Headers that normalize to nothing (for example a single Greek letter) fall
/// back to their trimmed lower-case form so they can still be matched exactly.
pub fn canonical_key(header: &str) -> String {
    let canonical = normalize(header, false);
    if canonical.is_empty() {
        header.trim().to_lowercase()
    } else {
        canonical
    }
}

/// Splits filter text into normalized search tokens. Empty tokens are
/// discarded; an empty result means the filter accepts every row.
pub fn search_tokens(filter: &str) -> Vec<String> {
    normalize(filter, true)
        .split_whitespace()
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Accepted spellings for a truthy flag cell, compared case-insensitively.
const TRUTHY_TOKENS: &[&str] = &["yes", "sí", "si", "true", "1"];

/// Permissive boolean parse used by flag columns and the subset toggle.
pub fn is_truthy_token(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    TRUTHY_TOKENS.contains(&value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_case_and_accents() {
        assert_eq!(normalize("Núm.9", true), "num9");
        assert_eq!(normalize("% Puntuación Corregida", false), "puntuacioncorregida");
    }

    #[test]
    fn normalize_keeps_spaces_only_on_request() {
        assert_eq!(normalize("gpt 4 mini", true), "gpt 4 mini");
        assert_eq!(normalize("gpt 4 mini", false), "gpt4mini");
    }

    #[test]
    fn canonical_key_falls_back_for_non_latin_headers() {
        assert_eq!(canonical_key("% Aciertos"), "aciertos");
        assert_eq!(canonical_key(" ρ "), "ρ");
    }

    #[test]
    fn search_tokens_discards_empty_tokens() {
        assert_eq!(search_tokens("  GPT   mini "), vec!["gpt", "mini"]);
        assert!(search_tokens("  ¿? ").is_empty());
        assert!(search_tokens("").is_empty());
    }

    #[test]
    fn truthy_tokens_cover_both_languages() {
        for value in ["Yes", "sí", "SI", "true", "1"] {
            assert!(is_truthy_token(value), "{value} should parse truthy");
        }
        for value in ["no", "false", "0", "", "2", "yess"] {
            assert!(!is_truthy_token(value), "{value} should parse falsy");
        }
    }
}
