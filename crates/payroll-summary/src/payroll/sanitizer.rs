use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Dropped outright. The hyphen is handled separately as a word separator.
const PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

static DISALLOWED: OnceLock<Regex> = OnceLock::new();
static LATIN_LETTER: OnceLock<Regex> = OnceLock::new();

fn disallowed() -> &'static Regex {
    DISALLOWED.get_or_init(|| Regex::new("[^a-zA-Z0-9 ]").expect("static pattern compiles"))
}

fn latin_letter() -> &'static Regex {
    LATIN_LETTER.get_or_init(|| Regex::new("[A-Za-z]").expect("static pattern compiles"))
}

/// Reduces a free-text rubric label (or an employee name) to the key used for
/// dictionary lookups: lowercase ASCII letters, digits and single spaces.
///
/// ```
/// use payroll_summary::payroll::sanitize_item;
///
/// assert_eq!(sanitize_item("Auxílio-Alimentação!!"), "auxilio alimentacao");
/// ```
pub fn sanitize_item(label: &str) -> String {
    let lowered = label.to_lowercase();

    let unaccented: String = lowered
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .nfc()
        .collect();

    let unpunctuated: String = unaccented
        .chars()
        .filter(|c| !PUNCTUATION.contains(c))
        .map(|c| if c == '-' { ' ' } else { c })
        .collect();

    let cleaned = disallowed().replace_all(&unpunctuated, "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A label with no Latin letter at all (only digits, codes or symbols) can't
/// be disambiguated.
pub fn is_inconsistent(label: &str) -> bool {
    !latin_letter().is_match(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_punctuation_and_symbols() {
        assert_eq!(sanitize_item("Auxílio-Alimentação!!"), "auxilio alimentacao");
        assert_eq!(sanitize_item("àção"), "acao");
        assert_eq!(
            sanitize_item("  GRATIFICAÇÃO   Natalina (13º)  "),
            "gratificacao natalina 13"
        );
        assert_eq!(
            sanitize_item("Abono de Permanência; art. 40"),
            "abono de permanencia art 40"
        );
        assert_eq!(sanitize_item("Férias\t1/3"), "ferias13");
    }

    #[test]
    fn sanitizing_twice_is_a_no_op() {
        let labels = [
            "Auxílio-Alimentação!!",
            "  Subsídio -- Membro  ",
            "VPNI / Quintos",
            "R$ 1.234,56",
            "ÇÃÕ ÉÜ",
            "",
            "***",
        ];

        for label in labels {
            let once = sanitize_item(label);
            assert_eq!(sanitize_item(&once), once, "label {label:?}");
        }
    }

    #[test]
    fn labels_without_latin_letters_are_inconsistent() {
        assert!(is_inconsistent("0001"));
        assert!(is_inconsistent("12.345-6"));
        assert!(is_inconsistent("***"));
        assert!(is_inconsistent(""));
        assert!(!is_inconsistent("13º salário"));
        assert!(!is_inconsistent("A"));
    }
}
