//! As-you-type display formatting for Pakistani phone numbers.
//!
//! Formatting never judges validity: partial or malformed input renders
//! partially formatted, and the digits typed are always preserved.

const COUNTRY_CODE: &str = "92";
const GROUP_LEN: usize = 4;

pub fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// `92…` renders as `+92 XXX-XXXXXXX`; anything else as `XXXX-XXXXXXX`.
pub fn format_phone(raw: &str) -> String {
    let digits = digits(raw);
    if let Some(national) = digits.strip_prefix(COUNTRY_CODE) {
        return format_international(national);
    }
    group_after(&digits, GROUP_LEN)
}

/// Formats `raw` and maps a caret at char offset `cursor` so that it stays
/// after the same number of digits.
pub fn format_phone_with_cursor(raw: &str, cursor: usize) -> (String, usize) {
    let digits_before = raw
        .chars()
        .take(cursor)
        .filter(char::is_ascii_digit)
        .count();
    let formatted = format_phone(raw);
    let caret = caret_after_digits(&formatted, digits_before);
    (formatted, caret)
}

fn format_international(national: &str) -> String {
    let mut out = String::from("+");
    out.push_str(COUNTRY_CODE);
    if national.is_empty() {
        return out;
    }
    out.push(' ');
    let split = national.len().min(3);
    out.push_str(&national[..split]);
    if national.len() > split {
        out.push('-');
        out.push_str(&national[split..]);
    }
    out
}

fn group_after(digits: &str, len: usize) -> String {
    if digits.len() <= len {
        return digits.to_string();
    }
    format!("{}-{}", &digits[..len], &digits[len..])
}

fn caret_after_digits(formatted: &str, count: usize) -> usize {
    if count == 0 {
        return formatted
            .chars()
            .position(|ch| ch.is_ascii_digit())
            .unwrap_or(formatted.chars().count());
    }
    let mut seen = 0;
    for (index, ch) in formatted.chars().enumerate() {
        if ch.is_ascii_digit() {
            seen += 1;
            if seen == count {
                return index + 1;
            }
        }
    }
    formatted.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_prefix_family() {
        assert_eq!(format_phone("923001234567"), "+92 300-1234567");
        assert_eq!(format_phone("+92 300 1234567"), "+92 300-1234567");
        assert_eq!(format_phone("03001234567"), "0300-1234567");
        assert_eq!(format_phone("3001234567"), "3001-234567");
    }

    #[test]
    fn partial_input_renders_partially() {
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone("9"), "9");
        assert_eq!(format_phone("92"), "+92");
        assert_eq!(format_phone("923"), "+92 3");
        assert_eq!(format_phone("92300"), "+92 300");
        assert_eq!(format_phone("923001"), "+92 300-1");
        assert_eq!(format_phone("0300"), "0300");
        assert_eq!(format_phone("03001"), "0300-1");
        assert_eq!(format_phone("abc"), "");
    }

    #[test]
    fn formatting_is_deterministic_and_keeps_every_digit() {
        let samples = [
            "923001234567",
            "03001234567",
            "0092 300 1234567",
            "12345",
            "0300-1234567-999",
            "+92 (300) 12-34-567",
        ];
        for raw in samples {
            let once = format_phone(raw);
            assert_eq!(once, format_phone(raw));
            assert_eq!(digits(&once), digits(raw), "digits changed for {raw}");
        }
    }

    #[test]
    fn reformatting_formatted_output_is_stable() {
        for raw in ["923001234567", "03001234567", "12345678"] {
            let once = format_phone(raw);
            assert_eq!(format_phone(&once), once);
        }
    }

    #[test]
    fn caret_follows_typed_digit_at_group_boundary() {
        // Typing the fifth digit pushes a hyphen in front of it.
        let (value, caret) = format_phone_with_cursor("03001", 5);
        assert_eq!(value, "0300-1");
        assert_eq!(caret, 6);
    }

    #[test]
    fn caret_survives_mid_string_edit() {
        // Digit inserted after "0300-1" in "0300-1234567".
        let (value, caret) = format_phone_with_cursor("0300-19234567", 7);
        assert_eq!(value, "0300-19234567");
        assert_eq!(caret, 7);

        // Deleting the hyphen keeps the caret behind the fourth digit.
        let (value, caret) = format_phone_with_cursor("03001234567", 4);
        assert_eq!(value, "0300-1234567");
        assert_eq!(caret, 4);
    }

    #[test]
    fn caret_skips_country_prefix() {
        let (value, caret) = format_phone_with_cursor("923", 3);
        assert_eq!(value, "+92 3");
        assert_eq!(caret, 5);

        let (value, caret) = format_phone_with_cursor("923", 0);
        assert_eq!(value, "+92 3");
        assert_eq!(caret, 1);
    }
}
