//! Field validators for the registration wizard.

use std::sync::LazyLock;

use regex::Regex;

/// One name token: an uppercase Ukrainian Cyrillic letter followed by
/// lowercase letters, with apostrophes and hyphens permitted mid-token.
static NAME_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[А-ЯІЇЄҐ][а-яіїєґ’'-]+$").unwrap()
});

/// Ukrainian mobile number: optional `+380`/`380`/`38` country prefix, then
/// a literal `0` and exactly nine digits.
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\+?38)?0\d{9}$").unwrap()
});

/// A full name is at least two whitespace-separated tokens, each a valid
/// Cyrillic name token.
pub fn is_valid_name(text: &str) -> bool {
    let parts: Vec<&str> = text.split_whitespace().collect();
    parts.len() >= 2 && parts.iter().all(|part| NAME_TOKEN.is_match(part))
}

pub fn is_valid_phone(text: &str) -> bool {
    PHONE.is_match(text.trim())
}

/// Parse the number of children to register; must be a positive integer.
pub fn parse_child_count(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok().filter(|count| *count > 0)
}

/// Parse a child's age; must be an integer in `[5, 16]`.
pub fn parse_age(text: &str) -> Option<u8> {
    text.trim().parse::<u8>().ok().filter(|age| (5..=16).contains(age))
}

/// Special needs / allergies note: any content up to 100 characters after
/// trimming. Returns the trimmed text when acceptable.
pub fn normalize_needs(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (trimmed.chars().count() <= 100).then(|| trimmed.to_string())
}
