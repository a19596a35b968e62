//! Common validation utilities.

use validator::ValidationError;

/// Maximum length of a client first or last name (matches the column size).
pub const MAX_NAME_LENGTH: usize = 64;

/// Maximum length of a client email (matches the column size).
pub const MAX_EMAIL_LENGTH: usize = 128;

/// Maximum length of a phone number (matches the column size).
pub const MAX_PHONE_NUMBER_LENGTH: usize = 30;

lazy_static::lazy_static! {
    static ref PHONE_NUMBER_REGEX: regex::Regex = regex::Regex::new(r"^[0-9]+$").unwrap();
}

/// Validates that a phone number consists of digits only and fits the column.
pub fn validate_phone_number(phone_number: &str) -> Result<(), ValidationError> {
    if !PHONE_NUMBER_REGEX.is_match(phone_number) {
        let mut err = ValidationError::new("phone_number_format");
        err.message = Some("Phone number must contain digits only".into());
        return Err(err);
    }

    if phone_number.len() > MAX_PHONE_NUMBER_LENGTH {
        let mut err = ValidationError::new("phone_number_length");
        err.message = Some(
            format!("Phone number must be at most {MAX_PHONE_NUMBER_LENGTH} digits").into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Validates a client first or last name: not blank and within the column size.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    validate_not_blank(name)?;
    validate_max_chars(name, MAX_NAME_LENGTH, "name_length", "Name")
}

/// Validates a client email: not blank and within the column size.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    validate_not_blank(email)?;
    validate_max_chars(email, MAX_EMAIL_LENGTH, "email_length", "Email")
}

/// Validates every number of a phone list.
pub fn validate_phone_numbers(phone_numbers: &[String]) -> Result<(), ValidationError> {
    phone_numbers
        .iter()
        .try_for_each(|phone_number| validate_phone_number(phone_number))
}

fn validate_max_chars(
    value: &str,
    max: usize,
    code: &'static str,
    label: &str,
) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        let mut err = ValidationError::new(code);
        err.message = Some(format!("{label} must be at most {max} characters").into());
        return Err(err);
    }
    Ok(())
}

/// Validates that a required text field is not empty or whitespace only.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be empty".into());
        Err(err)
    } else {
        Ok(())
    }
}
