//! Internal helpers for input validation and normalisation.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation enforces the same invariants.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, Money, ResultEngine};

/// Trim `value` and check its length (in chars) is within `min..=max`.
pub(crate) fn normalize_text(value: &str, label: &str, min: usize, max: usize) -> ResultEngine<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < min || len > max {
        return Err(EngineError::InvalidInput(if len == 0 {
            format!("{label} must not be empty")
        } else {
            format!("{label} must be between {min} and {max} characters long")
        }));
    }
    Ok(trimmed.to_string())
}

/// Like [`normalize_text`] but treats an empty value as absent.
pub(crate) fn normalize_optional_text(
    value: Option<&str>,
    label: &str,
    min: usize,
    max: usize,
) -> ResultEngine<Option<String>> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => normalize_text(value, label, min, max).map(Some),
        None => Ok(None),
    }
}

/// Usernames are NFKC-normalized so visually identical names collide.
pub(crate) fn normalize_username(value: &str) -> ResultEngine<String> {
    let normalized: String = value.trim().nfkc().collect();
    if normalized.chars().any(char::is_whitespace) {
        return Err(EngineError::InvalidInput(
            "username must not contain spaces".to_string(),
        ));
    }
    normalize_text(&normalized, "username", 1, 64)
}

/// Emails are compared lowercase.
pub(crate) fn normalize_email(value: &str) -> ResultEngine<String> {
    let email = value.trim().to_lowercase();
    let invalid = || EngineError::InvalidInput(format!("invalid email: {}", value.trim()));

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }
    Ok(email)
}

/// Accept only absolute `http(s)` URLs.
pub(crate) fn normalize_url(value: &str, label: &str) -> ResultEngine<String> {
    let url = value.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !url.chars().any(char::is_whitespace) => {
            Ok(url.to_string())
        }
        _ => Err(EngineError::InvalidInput(format!(
            "{label} must be an http(s) URL"
        ))),
    }
}

pub(crate) fn normalize_password(value: &str) -> ResultEngine<&str> {
    if value.is_empty() {
        return Err(EngineError::InvalidInput(
            "password must not be empty".to_string(),
        ));
    }
    Ok(value)
}

pub(crate) fn require_positive(amount: Money, label: &str) -> ResultEngine<Money> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(format!("{label} must be > 0")));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_trimmed_and_bounded() {
        assert_eq!(normalize_text("  Bike ", "name", 1, 250).unwrap(), "Bike");
        assert!(normalize_text("   ", "name", 1, 250).is_err());
        assert!(normalize_text(&"x".repeat(251), "name", 1, 250).is_err());
        assert!(normalize_text("a", "about", 2, 200).is_err());
    }

    #[test]
    fn optional_text_collapses_blank() {
        assert_eq!(normalize_optional_text(Some("  "), "about", 2, 200).unwrap(), None);
        assert_eq!(normalize_optional_text(None, "about", 2, 200).unwrap(), None);
        assert_eq!(
            normalize_optional_text(Some(" hi "), "about", 2, 200).unwrap(),
            Some("hi".to_string())
        );
    }

    #[test]
    fn username_is_nfkc_normalized() {
        assert_eq!(normalize_username("ｊｏｈｎ").unwrap(), "john");
        assert!(normalize_username("john doe").is_err());
        assert!(normalize_username("").is_err());
    }

    #[test]
    fn email_shape() {
        assert_eq!(normalize_email(" Ann@Example.COM ").unwrap(), "ann@example.com");
        assert!(normalize_email("ann").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("ann@example").is_err());
        assert!(normalize_email("ann@@example.com").is_err());
    }

    #[test]
    fn urls_must_be_http() {
        assert!(normalize_url("https://example.com/a.png", "image").is_ok());
        assert!(normalize_url("http://example.com", "link").is_ok());
        assert!(normalize_url("ftp://example.com", "link").is_err());
        assert!(normalize_url("https://", "link").is_err());
    }

    #[test]
    fn amounts_must_be_positive() {
        assert!(require_positive(Money::new(1), "price").is_ok());
        assert!(require_positive(Money::ZERO, "price").is_err());
        assert!(require_positive(Money::new(-5), "price").is_err());
    }
}
