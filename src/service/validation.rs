//! Request input validation. Failures surface as `AppError::Validation` (422).

use crate::error::AppError;

const MAX_TITLE_LENGTH: usize = 200;

/// Minimal email shape check: one '@' with something on both sides.
pub fn require_email(value: &str) -> Result<(), AppError> {
    let Some((local, domain)) = value.split_once('@') else {
        return Err(AppError::Validation("email must be a valid address".into()));
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(AppError::Validation("email must be a valid address".into()));
    }
    Ok(())
}

pub fn require_title(value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".into()));
    }
    if value.len() > MAX_TITLE_LENGTH {
        return Err(AppError::Validation(format!(
            "title must be at most {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_email() {
        assert!(require_email("alice@x.com").is_ok());
    }

    #[test]
    fn rejects_missing_at() {
        assert!(require_email("alice.x.com").is_err());
        assert!(require_email("@x.com").is_err());
        assert!(require_email("alice@").is_err());
        assert!(require_email("a@b@c").is_err());
    }

    #[test]
    fn rejects_blank_title() {
        assert!(require_title("  ").is_err());
        assert!(require_title("Hi").is_ok());
    }

    #[test]
    fn rejects_oversized_title() {
        let long = "x".repeat(MAX_TITLE_LENGTH + 1);
        assert!(require_title(&long).is_err());
    }
}
