//! Email address and subject sanitization.

/// Strip CR/LF characters (header-injection prevention) and trim
/// surrounding whitespace from an email address.
///
/// Idempotent: applying it twice yields the same output.
pub fn sanitize_email(input: &str) -> String {
    input.replace(['\r', '\n'], "").trim().to_string()
}

/// Maximum subject length after sanitization; a conventional header-length
/// safety margin (RFC 5322 line limit).
pub const MAX_SUBJECT_LENGTH: usize = 998;

/// Strip CR/LF, trim whitespace, and truncate the subject to
/// [`MAX_SUBJECT_LENGTH`] characters.
///
/// Idempotent. The trailing trim runs after truncation, since cutting at
/// the length cap can land on interior whitespace.
pub fn sanitize_subject(input: &str) -> String {
    let cleaned = input.replace(['\r', '\n'], "");
    let truncated: String = cleaned.trim().chars().take(MAX_SUBJECT_LENGTH).collect();
    truncated.trim_end().to_string()
}

/// Lightweight email shape-check, used by every pre-flight validation.
///
/// Accepts when splitting on `@` yields exactly two parts, the local part
/// is non-empty, and the domain contains at least one `.` with every
/// dot-separated label non-empty.
///
/// This is intentionally permissive and not RFC 5322-complete: it accepts
/// some technically-invalid addresses (consecutive dots in the local part)
/// and rejects some valid ones (quoted local parts). The API performs the
/// authoritative validation server-side.
///
/// # Examples
///
/// ```
/// use metigan::sanitize::is_valid_email;
///
/// assert!(is_valid_email("a@b.co"));
/// assert!(!is_valid_email("no-at-sign"));
/// assert!(!is_valid_email("a@b"));
/// assert!(!is_valid_email("a@@b.co"));
/// ```
pub fn is_valid_email(input: &str) -> bool {
    let mut parts = input.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };

    if local.is_empty() {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Extract the bare address from a `"Display Name <addr@example.com>"`
/// form: the content inside the first `<...>` pair when present, else the
/// whole trimmed string.
///
/// # Examples
///
/// ```
/// use metigan::sanitize::extract_address;
///
/// assert_eq!(extract_address("Ada <ada@example.com>"), "ada@example.com");
/// assert_eq!(extract_address("ada@example.com"), "ada@example.com");
/// ```
pub fn extract_address(input: &str) -> &str {
    if let Some(open) = input.find('<') {
        if let Some(len) = input[open + 1..].find('>') {
            return input[open + 1..open + 1 + len].trim();
        }
    }
    input.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_sanitize_email_strips_crlf() {
        assert_eq!(sanitize_email("a@b.co\r\nBcc: evil@x.co"), "a@b.coBcc: evil@x.co");
        assert_eq!(sanitize_email("  a@b.co  "), "a@b.co");
    }

    #[test]
    fn test_sanitize_email_idempotent() {
        let inputs = ["a@b.co", " a@b.co\r\n", "weird\rvalue\n "];
        for input in inputs {
            let once = sanitize_email(input);
            assert_eq!(sanitize_email(&once), once);
            assert!(!once.contains('\r'));
            assert!(!once.contains('\n'));
        }
    }

    #[test]
    fn test_sanitize_subject_truncates() {
        let long: String = "x".repeat(2000);
        let out = sanitize_subject(&long);
        assert_eq!(out.chars().count(), MAX_SUBJECT_LENGTH);
    }

    #[test]
    fn test_sanitize_subject_idempotent() {
        let input = format!("  Order\r\n update {}", "y".repeat(1200));
        let once = sanitize_subject(&input);
        assert_eq!(sanitize_subject(&once), once);
        assert!(!once.contains('\n'));
    }

    #[test]
    fn test_sanitize_subject_idempotent_when_cut_lands_on_whitespace() {
        // Truncation at the cap lands exactly on the interior space.
        let input = format!("{} x", "a".repeat(MAX_SUBJECT_LENGTH - 1));
        let once = sanitize_subject(&input);
        assert_eq!(sanitize_subject(&once), once);
        assert!(!once.ends_with(' '));
        assert_eq!(once.chars().count(), MAX_SUBJECT_LENGTH - 1);
    }

    #[rstest]
    #[case("a@b.co", true)]
    #[case("user.name+tag@sub.domain.io", true)]
    #[case("a..b@c.co", true)] // permissive by design
    #[case("no-at-sign", false)]
    #[case("a@b", false)] // missing TLD dot
    #[case("a@@b.co", false)]
    #[case("@b.co", false)]
    #[case("a@.co", false)]
    #[case("a@b.", false)]
    #[case("a@b..co", false)]
    #[case("", false)]
    fn test_email_shape(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_email(input), expected, "{input:?}");
    }

    #[test]
    fn test_extract_address_display_name() {
        assert_eq!(extract_address("Ada Lovelace <ada@example.com>"), "ada@example.com");
        assert_eq!(extract_address("<ada@example.com>"), "ada@example.com");
        // first pair wins
        assert_eq!(extract_address("A <a@x.co> B <b@y.co>"), "a@x.co");
    }

    #[test]
    fn test_extract_address_bare() {
        assert_eq!(extract_address("  ada@example.com "), "ada@example.com");
        // unterminated bracket falls back to the whole string
        assert_eq!(extract_address("Ada <ada@example.com"), "Ada <ada@example.com");
    }
}
