//! Input validation utilities

use common::{FieldErrors, Role};
use regex::Regex;
use std::sync::OnceLock;

use crate::models::{
    ChangePasswordRequest, SignupRequest, UpdateProfileRequest, UpdateUser, User, normalize_email,
};

pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PASSWORD_MAX_LENGTH: usize = 16;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() > 150 {
        return Err("Username must be at most 150 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX.get_or_init(|| {
        Regex::new(r"^[\w.@+-]+$").expect("Failed to compile username regex")
    });

    if !regex.is_match(username) {
        return Err(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .to_string(),
        );
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Enter a valid email address.".to_string());
    }

    Ok(())
}

/// Validate password strength
///
/// Reports the first rule the password breaks.
pub fn validate_password(password: &str) -> Result<(), String> {
    let length = password.chars().count();

    if length < PASSWORD_MIN_LENGTH {
        return Err(format!(
            "Password must be at least {} characters long.",
            PASSWORD_MIN_LENGTH
        ));
    }

    if length > PASSWORD_MAX_LENGTH {
        return Err(format!(
            "Password must be at most {} characters long.",
            PASSWORD_MAX_LENGTH
        ));
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_special = false;

    for c in password.chars() {
        if c.is_ascii_uppercase() {
            has_upper = true;
        } else if c.is_ascii_lowercase() {
            has_lower = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else if !c.is_alphanumeric() {
            has_special = true;
        }
    }

    if !has_upper {
        return Err("Password must contain at least one uppercase letter.".to_string());
    }

    if !has_lower {
        return Err("Password must contain at least one lowercase letter.".to_string());
    }

    if !has_digit {
        return Err("Password must contain at least one number.".to_string());
    }

    if !has_special {
        return Err("Password must contain at least one special character.".to_string());
    }

    Ok(())
}

/// A signup payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSignup {
    pub email: String,
    pub role: Role,
    pub password: String,
}

/// Validate a signup payload, collecting every field error.
pub fn validate_signup(payload: &SignupRequest) -> Result<ValidSignup, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = errors
        .required("email", payload.email.as_deref())
        .map(normalize_email);
    if let Some(email) = &email {
        errors.check("email", validate_email(email));
    }

    let role = match errors.required("role", payload.role.as_deref()) {
        Some(raw) => match raw.parse::<Role>() {
            Ok(role) if role.is_self_assignable() => Some(role),
            Ok(_) => {
                errors.add("role", format!("\"{}\" is not a valid choice.", raw));
                None
            }
            Err(message) => {
                errors.add("role", message);
                None
            }
        },
        None => None,
    };

    let password = errors.required("password", payload.password.as_deref());
    if let Some(password) = password {
        errors.check("password", validate_password(password));
    }
    let password2 = errors.required("password2", payload.password2.as_deref());

    if let (Some(password), Some(password2)) = (password, password2) {
        if errors.is_empty() && password != password2 {
            errors.add("password2", "Passwords do not match.");
        }
    }

    match (email, role, password) {
        (Some(email), Some(role), Some(password)) => errors.finish(ValidSignup {
            email,
            role,
            password: password.to_string(),
        }),
        _ => Err(errors),
    }
}

/// Validate an update of the caller's own account.
///
/// The role can never change; the username only changes for superusers.
pub fn validate_profile_update(
    payload: &UpdateProfileRequest,
    current: &User,
) -> Result<UpdateUser, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut update = UpdateUser::default();

    if let Some(raw_role) = payload.role.as_deref() {
        match raw_role.parse::<Role>() {
            Ok(role) if role == current.role => {}
            Ok(_) => errors.add("role", "The user role cannot be changed after creation."),
            Err(message) => errors.add("role", message),
        }
    }

    if let Some(email) = payload.email.as_deref() {
        let email = normalize_email(email);
        errors.check("email", validate_email(&email));
        if email != current.email {
            update.email = Some(email);
        }
    }

    if let Some(username) = payload.username.as_deref() {
        if username != current.username {
            if current.is_superuser {
                errors.check("username", validate_username(username));
                update.username = Some(username.to_string());
            } else {
                errors.add("username", "The username cannot be changed.");
            }
        }
    }

    errors.finish(update)
}

/// Validate a password change. `old_password_matches` checks the current password.
///
/// Returns the new password.
pub fn validate_change_password(
    payload: &ChangePasswordRequest,
    old_password_matches: impl FnOnce(&str) -> bool,
) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();

    let old_password = errors.required("old_password", payload.old_password.as_deref());
    let new_password = errors.required("new_password", payload.new_password.as_deref());
    if let Some(new_password) = new_password {
        errors.check("new_password", validate_password(new_password));
    }
    let new_password2 = errors.required("new_password2", payload.new_password2.as_deref());

    if !errors.is_empty() {
        return Err(errors);
    }

    let (Some(old_password), Some(new_password), Some(new_password2)) =
        (old_password, new_password, new_password2)
    else {
        return Err(errors);
    };

    if !old_password_matches(old_password) {
        return Err(FieldErrors::single(
            "old_password",
            "Old password is incorrect.",
        ));
    }

    if new_password != new_password2 {
        return Err(FieldErrors::single(
            "new_password2",
            "New passwords do not match.",
        ));
    }

    Ok(new_password.to_string())
}
