//! PII masking rules applied to free-text log values.

/// Email → first two characters + `***@domain`. Digit strings of length
/// ≥7 → first three + `****` + last four. Anything else passes through.
pub fn mask(value: &str) -> String {
    if let Some((local, domain)) = value.split_once('@') {
        if !local.is_empty() && !domain.is_empty() {
            return mask_email(local, domain);
        }
    }
    if value.len() >= 7 && value.chars().all(|c| c.is_ascii_digit()) {
        return mask_digits(value);
    }
    value.to_string()
}

fn mask_email(local: &str, domain: &str) -> String {
    let prefix: String = local.chars().take(2).collect();
    format!("{prefix}***@{domain}")
}

fn mask_digits(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let head: String = chars.iter().take(3).collect();
    let tail: String = chars.iter().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("{head}****{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_email_addresses() {
        assert_eq!(mask("jsmith@example.com"), "js***@example.com");
    }

    #[test]
    fn masks_long_digit_strings() {
        assert_eq!(mask("5551234567"), "555****4567");
    }

    #[test]
    fn leaves_short_digit_strings_and_other_text_alone() {
        assert_eq!(mask("12345"), "12345");
        assert_eq!(mask("hello"), "hello");
    }
}
