use once_cell::sync::Lazy;
use regex::Regex;

/// Input validation utilities for the blog service.

// Compile regex patterns once at startup
static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    // This regex is hardcoded and validated - it is a compile-time constant in practice
    Regex::new(r"^[a-zA-Z0-9_-]{3,32}$")
        .expect("hardcoded username regex is invalid - fix source code")
});

/// Passwords rejected outright no matter what else they contain.
static COMMON_PASSWORDS: &[&str] = &[
    "password", "password1", "passw0rd", "12345678", "123456789", "1234567890",
    "qwerty123", "qwertyuiop", "iloveyou", "letmein", "welcome1", "admin123",
    "sunshine", "princess", "football", "baseball", "superman", "trustno1",
    "dragon123", "monkey123",
];

/// Validate that a submitted field has content after trimming whitespace.
pub fn validate_required(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Validate username format (3-32 characters, alphanumeric with - and _)
pub fn validate_username(username: &str) -> bool {
    USERNAME_REGEX.is_match(username)
}

/// Minimum password length check.
pub fn password_long_enough(password: &str) -> bool {
    password.chars().count() >= 8
}

/// Passwords made only of digits are rejected.
pub fn password_entirely_numeric(password: &str) -> bool {
    !password.is_empty() && password.chars().all(|c| c.is_ascii_digit())
}

/// Membership in the common-password list, case-insensitive.
pub fn password_too_common(password: &str) -> bool {
    let lowered = password.to_lowercase();
    COMMON_PASSWORDS.contains(&lowered.as_str())
}

/// A password equal to the username, or containing/contained by it, is too
/// guessable. Containment only counts for usernames of 4+ characters so a
/// short handle like "al" does not poison every password with those letters.
pub fn password_similar_to_username(password: &str, username: &str) -> bool {
    if username.is_empty() {
        return false;
    }
    let pw = password.to_lowercase();
    let name = username.to_lowercase();
    if pw == name {
        return true;
    }
    name.len() >= 4 && (pw.contains(&name) || name.contains(&pw))
}

/// Run the full password policy. Returns every failure message so the caller
/// can surface them all at once, like a form re-render would.
pub fn password_policy(password: &str, username: &str) -> Vec<&'static str> {
    let mut failures = Vec::new();

    if !password_long_enough(password) {
        failures.push("This password is too short. It must contain at least 8 characters.");
    }
    if password_entirely_numeric(password) {
        failures.push("This password is entirely numeric.");
    }
    if password_too_common(password) {
        failures.push("This password is too common.");
    }
    if password_similar_to_username(password, username) {
        failures.push("The password is too similar to the username.");
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_username() {
        assert!(validate_username("john_doe"));
        assert!(validate_username("user-123"));
        assert!(validate_username("abc"));
    }

    #[test]
    fn test_invalid_username() {
        assert!(!validate_username("ab")); // Too short
        assert!(!validate_username(&"a".repeat(33))); // Too long
        assert!(!validate_username("user@name")); // Invalid character
        assert!(!validate_username("user name")); // Whitespace
    }

    #[test]
    fn test_required_fields() {
        assert!(validate_required("hello"));
        assert!(!validate_required(""));
        assert!(!validate_required("   \t\n"));
    }

    #[test]
    fn test_password_length() {
        assert!(password_long_enough("eight ch"));
        assert!(!password_long_enough("seven c"));
    }

    #[test]
    fn test_entirely_numeric() {
        assert!(password_entirely_numeric("8675309867"));
        assert!(!password_entirely_numeric("867530nine"));
        assert!(!password_entirely_numeric(""));
    }

    #[test]
    fn test_common_passwords() {
        assert!(password_too_common("password1"));
        assert!(password_too_common("PASSWORD1"));
        assert!(!password_too_common("obscure-horse-stapler"));
    }

    #[test]
    fn test_similarity_to_username() {
        assert!(password_similar_to_username("alice", "Alice"));
        assert!(password_similar_to_username("alice2024", "alice"));
        assert!(password_similar_to_username("al", "alice")); // username contains password
        assert!(!password_similar_to_username("unrelated-pw", "alice"));
        // Short usernames only match exactly
        assert!(!password_similar_to_username("albatross9", "al"));
        assert!(password_similar_to_username("al", "al"));
    }

    #[test]
    fn test_password_policy_collects_all_failures() {
        let failures = password_policy("1234567", "");
        assert_eq!(failures.len(), 2); // too short and entirely numeric

        let failures = password_policy("correct-horse-battery", "someone");
        assert!(failures.is_empty());
    }

    #[test]
    fn test_password_policy_rejects_username_echo() {
        let failures = password_policy("mallory-von-doom", "mallory-von-doom");
        assert_eq!(
            failures,
            vec!["The password is too similar to the username."]
        );
    }
}
