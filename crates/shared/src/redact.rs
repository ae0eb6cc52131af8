//! PII redaction for log output
//!
//! Message bodies written by students routinely contain contact details and
//! identifiers. Anything derived from user text must pass through
//! [`sanitize_for_logging`] before it reaches a log line.

use std::sync::OnceLock;

use regex::Regex;

/// Patterns in application order; more specific patterns run first so that,
/// for example, a credit card number is not partially consumed as a phone.
const PII_PATTERNS: &[(&str, &str)] = &[
    ("CREDIT_CARD", r"\b\d{4}[-.\s]?\d{4}[-.\s]?\d{4}[-.\s]?\d{4}\b"),
    ("SSN", r"\b\d{3}[-.\s]?\d{2}[-.\s]?\d{4}\b"),
    (
        "STUDENT_ID",
        r"\bstudent\s*(?:id|number|#|no\.?)?(?:\s*(?:is|:|\.)?)?\s*\d{7,10}\b",
    ),
    ("EMAIL", r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}"),
    ("IP_ADDRESS", r"\b(?:\d{1,3}\.){3}\d{1,3}\b"),
    (
        "DOB",
        r"\b(?:dob|date\s*of\s*birth|birthday)[:.\s]*\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b",
    ),
    ("PHONE", r"(?:\+?1[-.\s]?)?(?:\(?\d{3}\)?[-.\s]?)?\d{3}[-.\s]?\d{4}\b"),
];

fn compiled_patterns() -> &'static [(String, Regex)] {
    static PATTERNS: OnceLock<Vec<(String, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        PII_PATTERNS
            .iter()
            .filter_map(|(label, pattern)| {
                Regex::new(&format!("(?i){}", pattern))
                    .ok()
                    .map(|re| (format!("[{}]", label), re))
            })
            .collect()
    })
}

/// Replace emails, phone numbers, SSNs, card numbers, student ids, IP
/// addresses and dates of birth with placeholders such as `[EMAIL]`.
pub fn sanitize_for_logging(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    compiled_patterns()
        .iter()
        .fold(text.to_string(), |acc, (placeholder, re)| {
            re.replace_all(&acc, placeholder.as_str()).into_owned()
        })
}

/// Redacted prefix of `text` of at most `max_chars` characters.
pub fn preview(text: &str, max_chars: usize) -> String {
    let sanitized = sanitize_for_logging(text);
    if sanitized.chars().count() <= max_chars {
        return sanitized;
    }
    let mut truncated: String = sanitized.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(compiled_patterns().len(), PII_PATTERNS.len());
    }

    #[test]
    fn test_email_and_phone() {
        assert_eq!(
            sanitize_for_logging("Contact john@email.com or 555-123-4567"),
            "Contact [EMAIL] or [PHONE]"
        );
    }

    #[test]
    fn test_card_number_is_not_split_into_phones() {
        assert_eq!(
            sanitize_for_logging("card 4111 1111 1111 1111 was charged"),
            "card [CREDIT_CARD] was charged"
        );
    }

    #[test]
    fn test_student_id_and_ip() {
        let out = sanitize_for_logging("My Student ID is 12345678, logging in from 10.0.0.12");
        assert!(out.contains("[STUDENT_ID]"), "{}", out);
        assert!(out.contains("[IP_ADDRESS]"), "{}", out);
        assert!(!out.contains("12345678"));
    }

    #[test]
    fn test_date_of_birth() {
        let out = sanitize_for_logging("DOB: 04/12/1999");
        assert_eq!(out, "[DOB]");
    }

    #[test]
    fn test_plain_text_untouched() {
        let text = "Canvas will not load my course page";
        assert_eq!(sanitize_for_logging(text), text);
        assert_eq!(sanitize_for_logging(""), "");
    }

    #[test]
    fn test_preview_truncates_after_redaction() {
        assert_eq!(preview("write to a@b.co now", 7), "write t...");
        assert_eq!(preview("a@b.co", 10), "[EMAIL]");
    }
}
