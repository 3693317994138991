use log::trace;

/// Parses the leading integer of `input` the way lenient form parsing does:
/// leading whitespace and one sign are accepted, parsing stops at the first
/// non-digit. Returns `None` when no digit is found. Saturates on overflow.
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(10) else { break };
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(d as i64);
    }

    if !seen_digit {
        trace!("No leading integer in {:?}", input);
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Singular or plural count line, e.g. `1 note` / `3 notes`.
pub fn count_label(count: usize) -> String {
    format!("{} note{}", count, if count == 1 { "" } else { "s" })
}

// Removes the HTML comment lines of the editor template
pub fn strip_editor_comments(content: &str) -> String {
    let mut in_comment = false;
    content
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if in_comment {
                in_comment = !trimmed.ends_with("-->");
                return false;
            }
            if trimmed.starts_with("<!--") {
                in_comment = !trimmed.ends_with("-->");
                return false;
            }
            true
        })
        .collect::<Vec<&str>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("25"), Some(25));
        assert_eq!(parse_leading_int("  +8 min"), Some(8));
        assert_eq!(parse_leading_int("-5"), Some(-5));
        assert_eq!(parse_leading_int("3.9"), Some(3));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn test_count_label() {
        assert_eq!(count_label(0), "0 notes");
        assert_eq!(count_label(1), "1 note");
        assert_eq!(count_label(2), "2 notes");
    }

    #[test]
    fn test_strip_editor_comments() {
        let raw = "<!--\nWrite below.\n-->\n\nFirst line\n<!-- inline -->\nSecond line\n";
        assert_eq!(strip_editor_comments(raw), "First line\nSecond line");
    }
}
