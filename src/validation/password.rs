//! Password policy driven by the company configuration

use crate::constants::{PASSWORD_LENGTH_FLOOR, PASSWORD_SPECIAL_CHARS};
use crate::models::ConfigurationSettings;

use super::{fields, FieldErrors};

pub const MSG_TOO_SHORT: &str = "Password does not meet minimum length requirements";
pub const MSG_UPPERCASE: &str = "Password must contain at least one uppercase letter";
pub const MSG_NUMBER: &str = "Password must contain at least one number";
pub const MSG_SPECIAL: &str = "Password must contain at least one special character";
pub const MSG_CONFIRMATION: &str = "Password does not match confirmation";
pub const MSG_FALLBACK_TOO_SHORT: &str = "Password must be at least 6 characters long";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_numbers: bool,
    pub require_special_chars: bool,
    /// Set when the configuration could not be loaded
    fallback: bool,
}

impl PasswordPolicy {
    pub fn from_settings(settings: &ConfigurationSettings) -> Self {
        let configured = usize::try_from(settings.password_min_length).unwrap_or(0);
        Self {
            min_length: configured.max(PASSWORD_LENGTH_FLOOR),
            require_uppercase: settings.password_require_uppercase,
            require_numbers: settings.password_require_numbers,
            require_special_chars: settings.password_require_special_chars,
            fallback: false,
        }
    }

    /// Policy used when the configuration is unavailable
    pub fn fallback() -> Self {
        Self {
            min_length: PASSWORD_LENGTH_FLOOR,
            require_uppercase: false,
            require_numbers: false,
            require_special_chars: false,
            fallback: true,
        }
    }

    /// Messages for every rule `password` breaks
    pub fn violations(&self, password: &str) -> Vec<&'static str> {
        let mut violations = Vec::new();

        if password.chars().count() < self.min_length {
            violations.push(if self.fallback {
                MSG_FALLBACK_TOO_SHORT
            } else {
                MSG_TOO_SHORT
            });
        }
        if self.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            violations.push(MSG_UPPERCASE);
        }
        if self.require_numbers && !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push(MSG_NUMBER);
        }
        if self.require_special_chars && !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
            violations.push(MSG_SPECIAL);
        }

        violations
    }

    /// Presence, confirmation and policy checks for a new password
    pub fn check(&self, password: &str, confirmation: &str) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require(fields::PASSWORD, password, "Password");
        if password != confirmation {
            errors.add(fields::PASSWORD, MSG_CONFIRMATION);
        }
        for violation in self.violations(password) {
            errors.add(fields::PASSWORD, violation);
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(min: i32, upper: bool, digits: bool, special: bool) -> PasswordPolicy {
        let settings = ConfigurationSettings {
            password_min_length: min,
            password_require_uppercase: upper,
            password_require_numbers: digits,
            password_require_special_chars: special,
            ..ConfigurationSettings::default()
        };
        PasswordPolicy::from_settings(&settings)
    }

    #[test]
    fn test_length_floor_is_six() {
        let lenient = policy(2, false, false, false);
        assert_eq!(lenient.min_length, 6);
        assert_eq!(lenient.violations("abcde"), vec![MSG_TOO_SHORT]);
        assert!(lenient.violations("abcdef").is_empty());
    }

    #[test]
    fn test_character_classes() {
        let strict = policy(8, true, true, true);
        assert!(strict.violations("Abcdefg1!").is_empty());
        assert_eq!(strict.violations("abcdefg1!"), vec![MSG_UPPERCASE]);
        assert_eq!(strict.violations("Abcdefgh!"), vec![MSG_NUMBER]);
        assert_eq!(strict.violations("Abcdefgh1"), vec![MSG_SPECIAL]);
    }

    #[test]
    fn test_toggled_off_classes_are_ignored() {
        let relaxed = policy(8, false, false, false);
        assert!(relaxed.violations("abcdefgh").is_empty());
    }

    #[test]
    fn test_fallback_message() {
        let fallback = PasswordPolicy::fallback();
        assert_eq!(fallback.violations("abc"), vec![MSG_FALLBACK_TOO_SHORT]);
        assert!(fallback.violations("abcdef").is_empty());
    }

    #[test]
    fn test_confirmation_mismatch() {
        let errors = policy(6, false, false, false).check("secret1", "secret2");
        assert_eq!(errors.get(fields::PASSWORD), [MSG_CONFIRMATION.to_string()]);
    }
}
