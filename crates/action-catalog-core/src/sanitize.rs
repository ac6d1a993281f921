//! Allow-list sanitizer for free-text manifest fields.

/// Drop every character that is not a letter, digit or whitespace.
///
/// Whitespace is kept exactly where it was: nothing is trimmed or collapsed.
pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_drops_punctuation() {
        assert_eq!(sanitize("Abc$%#6- ZZpp"), "Abc6 ZZpp");
    }

    #[test]
    fn test_sanitize_empty() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_sanitize_keeps_whitespace_runs() {
        assert_eq!(sanitize("  a\t&&  b \n"), "  a\t  b \n");
    }

    #[test]
    fn test_sanitize_lossy_punctuation() {
        assert_eq!(
            sanitize("Andreas Dukstad & Arne Kristian Jansen"),
            "Andreas Dukstad  Arne Kristian Jansen"
        );
        assert_eq!(
            sanitize("Looks for the action.yml/yaml files, in a GitHub org."),
            "Looks for the actionymlyaml files in a GitHub org"
        );
    }

    #[test]
    fn test_sanitize_keeps_non_latin_letters() {
        assert_eq!(sanitize("Größe: 東京!"), "Größe 東京");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = ["Abc$%#6- ZZpp", "test \"name\"", "x.y/z", "  spaced  out "];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn test_sanitize_output_is_ordered_subset() {
        let input = "a-b_c d!e";
        let output = sanitize(input);
        assert!(output.chars().count() <= input.chars().count());
        assert!(output
            .chars()
            .all(|c| c.is_alphanumeric() || c.is_whitespace()));
        assert_eq!(output, "abc de");
    }
}
