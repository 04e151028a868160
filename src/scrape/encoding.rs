//! Repair of UTF-8 Spanish text that was decoded as Latin-1/CP1252
//!
//! Only a fixed table of sequences is rewritten. Text that legitimately
//! contains one of these sequences is altered too; that is accepted.

/// Corrupted sequence and its intended character
const REPLACEMENTS: &[(&str, &str)] = &[
    ("Ã¡", "á"),
    ("Ã©", "é"),
    ("Ã\u{ad}", "í"),
    ("Ã³", "ó"),
    ("Ãº", "ú"),
    ("Ã‘", "Ñ"),
    ("Ã±", "ñ"),
    ("Â¿", "¿"),
    ("Â¡", "¡"),
    ("Ã¼", "ü"),
];

/// Replace every known mis-encoded sequence with its correct character
pub fn fix_spanish_chars(text: &str) -> String {
    REPLACEMENTS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| {
            if acc.contains(from) {
                acc.replace(from, to)
            } else {
                acc
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixes_vowels() {
        assert_eq!(fix_spanish_chars("Ã¡Ã©Ã\u{ad}Ã³Ãº"), "áéíóú");
    }

    #[test]
    fn test_fixes_punctuation_and_enye() {
        assert_eq!(
            fix_spanish_chars("Â¿QuÃ© pasÃ³, seÃ±or? Â¡AÃ‘O!"),
            "¿Qué pasó, señor? ¡AÑO!"
        );
        assert_eq!(fix_spanish_chars("pingÃ¼ino"), "pingüino");
    }

    #[test]
    fn test_second_pass_is_noop_once_repaired() {
        let once = fix_spanish_chars("canciÃ³n Ã±");
        assert_eq!(fix_spanish_chars(&once), once);
    }

    #[test]
    fn test_plain_text_untouched() {
        let vtt = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHola";
        assert_eq!(fix_spanish_chars(vtt), vtt);
    }
}
