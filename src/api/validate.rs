use std::collections::HashMap;

use crate::error::ApiError;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 50;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_RATING: f64 = 10.0;

/// Collects per-field messages and turns them into one validation error
#[derive(Debug, Default)]
pub struct Validator {
    errors: HashMap<String, String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless `ok`; the first message per field wins
    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.errors
                .entry(field.to_string())
                .or_insert_with(|| message.to_string());
        }
        self
    }

    pub fn required(&mut self, value: Option<&str>, field: &str) -> &mut Self {
        let present = value.map(|v| !v.trim().is_empty()).unwrap_or(false);
        self.check(present, field, &format!("{} is required", field))
    }

    pub fn username(&mut self, value: Option<&str>) -> &mut Self {
        match value.map(str::trim) {
            None | Some("") => self.check(false, "username", "username is required"),
            Some(name) => {
                let len = name.chars().count();
                self.check(
                    (MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len),
                    "username",
                    "username must be between 3 and 50 characters",
                )
            }
        }
    }

    pub fn email(&mut self, value: Option<&str>) -> &mut Self {
        match value.map(str::trim) {
            None | Some("") => self.check(false, "email", "email is required"),
            Some(email) => self.check(is_valid_email(email), "email", "Invalid email format"),
        }
    }

    pub fn password(&mut self, value: Option<&str>) -> &mut Self {
        match value {
            None | Some("") => self.check(false, "password", "password is required"),
            Some(password) => self.check(
                password.chars().count() >= MIN_PASSWORD_LEN,
                "password",
                "password must be at least 6 characters",
            ),
        }
    }

    pub fn rating(&mut self, value: Option<f64>) -> &mut Self {
        match value {
            None => self,
            Some(rating) => self.check(
                rating.is_finite() && (0.0..=MAX_RATING).contains(&rating),
                "rating",
                "rating must be between 0 and 10",
            ),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(&mut self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(ApiError::validation_error(
            "Invalid input data",
            Some(std::mem::take(&mut self.errors)),
        ))
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `local@domain.tld` with no whitespace and a dotted domain
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}
