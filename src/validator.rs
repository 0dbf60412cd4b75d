//! Syntactic email validation run before any network call.

use std::sync::LazyLock;

use regex::Regex;

/// Longest local part accepted (RFC 5321 §4.5.3.1.1).
pub const MAX_LOCAL_LEN: usize = 64;
/// Longest domain accepted.
pub const MAX_DOMAIN_LEN: usize = 255;

// Atom characters on the left, dot-separated LDH labels on the right.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is a valid regex")
});

/// Returns `true` when `email` has a `local@domain` shape within the length
/// ceilings. Callers are expected to trim surrounding whitespace first.
pub fn is_valid_email(email: &str) -> bool {
    if !EMAIL_PATTERN.is_match(email) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }

    local.len() <= MAX_LOCAL_LEN && domain.len() <= MAX_DOMAIN_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        for email in [
            "a@b.co",
            "maria.silva@seuestudio.ai",
            "first+tag@sub.example.com",
            "o'neil@example.org",
            "user_name-1@my-domain.io",
            "localhost@localhost",
        ] {
            assert!(is_valid_email(email), "{email} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in [
            "",
            "plainaddress",
            "@example.com",
            "user@",
            "user@@example.com",
            "user@exa mple.com",
            "user@-example.com",
            "user@example-.com",
            "user@example..com",
            "user@.example.com",
            "us er@example.com",
            " a@b.co",
            "a@b.co ",
            "ünicode@example.com",
        ] {
            assert!(!is_valid_email(email), "{email:?} should be invalid");
        }
    }

    #[test]
    fn local_part_ceiling() {
        let at_limit = format!("{}@example.com", "a".repeat(MAX_LOCAL_LEN));
        let over_limit = format!("{}@example.com", "a".repeat(MAX_LOCAL_LEN + 1));
        assert!(is_valid_email(&at_limit));
        assert!(!is_valid_email(&over_limit));
    }

    #[test]
    fn domain_ceiling() {
        // Labels of 63 characters keep every label within the pattern, so
        // only the overall length decides.
        let label = "b".repeat(63);
        let domain_255 = format!("{label}.{label}.{label}.{}", "c".repeat(63));
        assert_eq!(domain_255.len(), 255);
        assert!(is_valid_email(&format!("a@{domain_255}")));

        let domain_256 = format!("{label}.{label}.{label}.{}", "c".repeat(62) + ".d");
        assert_eq!(domain_256.len(), 256);
        assert!(!is_valid_email(&format!("a@{domain_256}")));
    }

    #[test]
    fn label_longer_than_63_is_rejected() {
        let email = format!("a@{}.com", "b".repeat(64));
        assert!(!is_valid_email(&email));
    }
}
