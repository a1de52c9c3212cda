//! Input validation rules.
//!
//! Every check runs, so a failing input reports all of its invalid fields at
//! once rather than only the first.

use validator::ValidateEmail;

use crate::domain::{NewUser, PostDraft};
use crate::error::{DomainError, FieldError};

/// Minimum length, in characters, for passwords, titles and contents.
pub const MIN_TEXT_LENGTH: usize = 5;

fn is_long_enough(value: &str) -> bool {
    !value.is_empty() && value.chars().count() >= MIN_TEXT_LENGTH
}

/// Email syntax plus a top-level domain: `a@localhost` and `a@x` are
/// rejected, `a@x.com` is not.
fn is_valid_email(email: &str) -> bool {
    if !email.validate_email() {
        return false;
    }
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };
    match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty()
                && tld.chars().count() >= 2
                && tld.chars().all(char::is_alphabetic)
        }
        None => false,
    }
}

fn finish(errors: Vec<FieldError>) -> Result<(), DomainError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(errors))
    }
}

/// Validate a registration request.
pub fn validate_new_user(input: &NewUser) -> Result<(), DomainError> {
    let mut errors = Vec::new();
    if !is_valid_email(&input.email) {
        errors.push(FieldError::new("email", "E-mail is invalid"));
    }
    if !is_long_enough(&input.password) {
        errors.push(FieldError::new("password", "Password is invalid"));
    }
    finish(errors)
}

/// Validate the editable fields of a post.
pub fn validate_post(draft: &PostDraft) -> Result<(), DomainError> {
    let mut errors = Vec::new();
    if !is_long_enough(&draft.title) {
        errors.push(FieldError::new("title", "Title is invalid"));
    }
    if !is_long_enough(&draft.content) {
        errors.push(FieldError::new("content", "Content is invalid"));
    }
    finish(errors)
}
