//! Input validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

use super::{AppError, AppResult};

/// Model numbers are opaque catalogue strings, usually digits
static MODEL_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._/-]*$").unwrap());

/// Australian Business Number: 11 digits
static ABN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{11}$").unwrap());

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Validate a department name
pub fn validate_department_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && trimmed.len() == name.len() && name.len() <= 100
}

/// Validate a manufacturer name
pub fn validate_manufacturer(manufacturer: &str) -> bool {
    !manufacturer.trim().is_empty() && manufacturer.len() <= 100
}

/// Validate a model number
pub fn validate_model_number(model_number: &str) -> bool {
    model_number.len() <= 64 && MODEL_NUMBER_REGEX.is_match(model_number)
}

/// Validate a service ABN
pub fn validate_abn(abn: &str) -> bool {
    ABN_REGEX.is_match(abn)
}

/// Validate an email address (shape only)
pub fn validate_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Validate a row identifier
pub fn validate_id(id: i64) -> bool {
    id > 0
}

pub fn ensure_id(what: &str, id: i64) -> AppResult<()> {
    if validate_id(id) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Invalid {} id: {}", what, id)))
    }
}

pub fn ensure_department_name(name: &str) -> AppResult<()> {
    if validate_department_name(name) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Invalid department name: {:?}", name)))
    }
}

/// Check a manufacturer/model-number pair
pub fn ensure_model_key(manufacturer: &str, model_number: &str) -> AppResult<()> {
    if !validate_manufacturer(manufacturer) {
        return Err(AppError::BadRequest(format!(
            "Invalid manufacturer: {:?}",
            manufacturer
        )));
    }
    if !validate_model_number(model_number) {
        return Err(AppError::BadRequest(format!(
            "Invalid model number: {:?}",
            model_number
        )));
    }
    Ok(())
}
