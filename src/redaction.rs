//! Sensitive-data redaction
//!
//! Message bodies can carry card numbers, national IDs and one-time codes.
//! Before a body is persisted to the log store it is run through an ordered
//! table of `(pattern, replacement)` rules. The order matters: each rule is
//! applied to the output of the previous one, so broader patterns come
//! first. Masked output contains no digits, which makes redaction
//! idempotent.
//!
//! Also provides [`mask_phone`] for log lines, which keeps only the last
//! four digits visible.

use once_cell::sync::Lazy;
use regex::Regex;

/// One redaction rule: a pattern to find and the literal that replaces it.
#[derive(Debug, Clone)]
pub struct RedactionRule {
    pattern: Regex,
    replacement: String,
}

impl RedactionRule {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    pub fn apply(&self, message: &str) -> String {
        self.pattern
            .replace_all(message, self.replacement.as_str())
            .into_owned()
    }
}

static DEFAULT_RULES: Lazy<Vec<RedactionRule>> = Lazy::new(|| {
    vec![
        // Credit card numbers (16 digits, optionally separated)
        RedactionRule::new(
            r"\b\d{4}[- ]?\d{4}[- ]?\d{4}[- ]?\d{4}\b",
            "**** **** **** ****",
        )
        .expect("valid credit card pattern"),
        // National ID numbers (10 digits)
        RedactionRule::new(r"\b\d{10}\b", "**** **** **").expect("valid national id pattern"),
        // OTP codes (4 digits)
        RedactionRule::new(r"\b\d{4}\b", "****").expect("valid 4-digit OTP pattern"),
        // OTP codes (6 digits)
        RedactionRule::new(r"\b\d{6}\b", "******").expect("valid 6-digit OTP pattern"),
    ]
});

/// The default rule table: card numbers, national IDs, OTP codes.
pub fn default_rules() -> Vec<RedactionRule> {
    DEFAULT_RULES.clone()
}

/// Apply each rule in sequence and return the masked message.
pub fn redact(message: &str, rules: &[RedactionRule]) -> String {
    let mut masked = message.to_string();
    for rule in rules {
        masked = rule.apply(&masked);
    }
    masked
}

/// Mask a phone number for log output, keeping the last four characters.
///
/// Counts characters, not bytes, so numbers written with non-ASCII digits
/// mask cleanly.
pub fn mask_phone(phone: &str) -> String {
    let total = phone.chars().count();
    if total <= 4 {
        return "*".repeat(total);
    }

    let visible = 4;
    let masked_count = total - visible;
    let last_digits: String = phone.chars().skip(masked_count).collect();

    if phone.starts_with('+') {
        format!("+{}{}", "*".repeat(masked_count - 1), last_digits)
    } else {
        format!("{}{}", "*".repeat(masked_count), last_digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_card_numbers() {
        let masked = redact("Your card number is 1234 5678 9012 3456.", &default_rules());
        assert_eq!(masked, "Your card number is **** **** **** ****.");
    }

    #[test]
    fn masks_national_ids_and_otp_codes() {
        let masked = redact(
            "ID 1234567890, code 123456 and pin 4321",
            &default_rules(),
        );
        assert_eq!(masked, "ID **** **** **, code ****** and pin ****");
    }

    #[test]
    fn redaction_is_idempotent_on_masked_text() {
        let rules = default_rules();
        let once = redact("Your OTP is 123456", &rules);
        let twice = redact(&once, &rules);
        assert_eq!(once, twice);
    }

    #[test]
    fn custom_rules_apply_in_order() {
        let rules = vec![
            RedactionRule::new(r"\d{6}", "SIX").unwrap(),
            RedactionRule::new(r"\d{4}", "FOUR").unwrap(),
        ];
        assert_eq!(redact("123456 and 1234", &rules), "SIX and FOUR");
    }

    #[test]
    fn mask_phone_keeps_last_four_digits() {
        assert_eq!(mask_phone("+1234567890"), "+******7890");
        assert_eq!(mask_phone("1234567890"), "******7890");
        assert_eq!(mask_phone("123"), "***");
    }

    #[test]
    fn mask_phone_handles_multibyte_digits() {
        // Persian digits are two bytes each; masking must count characters.
        assert_eq!(mask_phone("1234\u{06F5}678"), "****\u{06F5}678");
        assert_eq!(
            mask_phone("\u{06F0}\u{06F9}\u{06F1}\u{06F2}\u{06F3}\u{06F4}\u{06F5}"),
            "***\u{06F2}\u{06F3}\u{06F4}\u{06F5}"
        );
        assert_eq!(mask_phone("\u{06F1}\u{06F2}\u{06F3}"), "***");
    }
}
