/// Input validators
/// Features:
/// 1. Email format and length checks for account creation and updates
/// 2. Chirp length limit
/// 3. Profanity filtering of chirp bodies

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
pub const MAX_CHIRP_LENGTH: usize = 140;
const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const CENSOR: &str = "****";

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).expect("email regex is valid");
}

/// Validates an email address and returns it trimmed
pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()));
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Checks the length limit and returns the body with profanity censored
pub fn validate_chirp(body: &str) -> Result<String, ValidationError> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ValidationError::TooLong("chirp".to_string(), MAX_CHIRP_LENGTH));
    }

    Ok(clean_chirp(body))
}

/// Replace profane words with `****`.
///
/// Words are split on single spaces and compared case-insensitively; a word
/// with punctuation attached (`"Sharbert!"`) is left alone.
pub fn clean_chirp(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            if PROFANE_WORDS.contains(&lowered.as_str()) {
                CENSOR
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        let valid = vec!["walt@breakingbad.com", "user.name+tag@example.co.uk"];
        for email in valid {
            assert!(is_valid_email(email).is_ok(), "Should accept {}", email);
        }
        assert_eq!(
            is_valid_email("  walt@breakingbad.com ").unwrap(),
            "walt@breakingbad.com"
        );
    }

    #[test]
    fn test_invalid_emails() {
        let invalid = vec!["", "notanemail", "user@", "@example.com", "user@@example.com"];
        for email in invalid {
            assert!(is_valid_email(email).is_err(), "Should reject {:?}", email);
        }
    }

    #[test]
    fn test_profanity_is_censored() {
        assert_eq!(
            clean_chirp("This is a kerfuffle opinion I need to share with the world"),
            "This is a **** opinion I need to share with the world"
        );
        assert_eq!(clean_chirp("Sharbert and FORNAX"), "**** and ****");
    }

    #[test]
    fn test_punctuation_is_not_stripped() {
        assert_eq!(clean_chirp("Sharbert! is fine"), "Sharbert! is fine");
    }

    #[test]
    fn test_chirp_length_limit() {
        let exact = "a".repeat(MAX_CHIRP_LENGTH);
        assert!(validate_chirp(&exact).is_ok());

        let too_long = "a".repeat(MAX_CHIRP_LENGTH + 1);
        assert!(matches!(
            validate_chirp(&too_long),
            Err(ValidationError::TooLong(_, MAX_CHIRP_LENGTH))
        ));
    }
}
