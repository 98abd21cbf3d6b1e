//! Form validation: required fields and the password policy.

use super::error::{AppError, Result};

/// Minimum number of characters accepted by the password policy.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Length from which a password earns the extra strength point.
const LONG_PASSWORD_LEN: usize = 12;

/// Qualitative password strength shown during registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Fair,
    Good,
    Strong,
}

impl PasswordStrength {
    /// Map a 0..=4 score to a label.
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            0 | 1 => Self::Weak,
            2 => Self::Fair,
            3 => Self::Good,
            _ => Self::Strong,
        }
    }
}

impl std::fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weak => write!(f, "weak"),
            Self::Fair => write!(f, "fair"),
            Self::Good => write!(f, "good"),
            Self::Strong => write!(f, "strong"),
        }
    }
}

/// Fail with `MissingField` when `value` is blank.
///
/// # Errors
/// Returns `AppError::MissingField` for empty or whitespace-only input.
pub fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::MissingField { field });
    }
    Ok(())
}

/// Rules of the password policy that `password` does not meet.
#[must_use]
pub fn unmet_password_rules(password: &str) -> Vec<&'static str> {
    let mut unmet = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LEN {
        unmet.push("at least 8 characters");
    }
    if !password.chars().any(char::is_lowercase) {
        unmet.push("a lowercase letter");
    }
    if !password.chars().any(char::is_uppercase) {
        unmet.push("an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        unmet.push("a digit");
    }
    if !password.chars().any(is_symbol) {
        unmet.push("a symbol");
    }

    unmet
}

/// Check `password` against the policy.
///
/// # Errors
/// Returns `AppError::WeakPassword` listing every unmet rule.
pub fn check_password_policy(password: &str) -> Result<()> {
    let unmet = unmet_password_rules(password);
    if unmet.is_empty() {
        Ok(())
    } else {
        Err(AppError::WeakPassword { unmet })
    }
}

/// Check that the confirmation repeats the password.
///
/// # Errors
/// Returns `AppError::PasswordMismatch` when they differ.
pub fn check_confirmation(password: &str, confirmation: &str) -> Result<()> {
    if password == confirmation {
        Ok(())
    } else {
        Err(AppError::PasswordMismatch)
    }
}

/// Score a password from 0 to 4.
#[must_use]
pub fn password_score(password: &str) -> u8 {
    let len = password.chars().count();
    let mut score = 0u8;

    if len >= MIN_PASSWORD_LEN {
        score += 1;
    }
    if password.chars().any(char::is_lowercase) && password.chars().any(char::is_uppercase) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(is_symbol) {
        score += 1;
    }
    if len >= LONG_PASSWORD_LEN {
        score += 1;
    }

    score.min(4)
}

#[must_use]
pub fn password_strength(password: &str) -> PasswordStrength {
    PasswordStrength::from_score(password_score(password))
}

fn is_symbol(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert!(require("Email", "a@b.c").is_ok());
        assert!(matches!(
            require("Email", "   "),
            Err(AppError::MissingField { field: "Email" })
        ));
    }

    #[test]
    fn test_policy_accepts_complete_password() {
        assert!(check_password_policy("Podium#2024").is_ok());
    }

    #[test]
    fn test_policy_lists_every_unmet_rule() {
        let unmet = unmet_password_rules("abc");
        assert_eq!(
            unmet,
            vec![
                "at least 8 characters",
                "an uppercase letter",
                "a digit",
                "a symbol"
            ]
        );
        assert!(matches!(
            check_password_policy("abc"),
            Err(AppError::WeakPassword { .. })
        ));
    }

    #[test]
    fn test_confirmation() {
        assert!(check_confirmation("Same#1234", "Same#1234").is_ok());
        assert!(matches!(
            check_confirmation("Same#1234", "Other#1234"),
            Err(AppError::PasswordMismatch)
        ));
    }

    #[test]
    fn test_password_strength() {
        assert_eq!(password_strength(""), PasswordStrength::Weak);
        assert_eq!(password_strength("abcdefgh"), PasswordStrength::Weak);
        assert_eq!(password_strength("Abcdefgh"), PasswordStrength::Fair);
        assert_eq!(password_strength("Abcdefg1"), PasswordStrength::Good);
        assert_eq!(password_strength("Abcdefg1!"), PasswordStrength::Strong);
        assert_eq!(password_score("Abcdefg1!xyz"), 4);
    }
}
