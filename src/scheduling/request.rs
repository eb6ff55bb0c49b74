//! Field checks applied to a booking request before any calendar work.

use std::sync::LazyLock;

use regex::Regex;

use super::error::ValidationError;
use super::models::BookingRequest;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

/// Which scheduling path a request takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Manual { date: String, time: String },
    Automatic,
}

pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && EMAIL_RE.is_match(&email.to_lowercase())
}

/// Strip separators and the international prefix. Returns the digits and
/// whether a `+` or `00` prefix was present, or `None` if anything other
/// than digits and separators remains.
fn normalize_phone(phone: &str) -> Option<(String, bool)> {
    let compact: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')' | '\t'))
        .collect();

    let (digits, international) = if let Some(rest) = compact.strip_prefix('+') {
        (rest, true)
    } else if let Some(rest) = compact.strip_prefix("00") {
        (rest, true)
    } else {
        (compact.as_str(), false)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((digits.to_string(), international))
}

/// Ten local digits, or 8 to 15 digits led by a non-zero country code.
pub fn is_valid_phone(phone: &str) -> bool {
    let Some((digits, international)) = normalize_phone(phone) else {
        return false;
    };
    let with_country_code = (8..=15).contains(&digits.len()) && !digits.starts_with('0');
    if international {
        with_country_code
    } else {
        digits.len() == 10 || with_country_code
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(())
}

/// Validate the fields the engine depends on and decide the path.
pub fn validate(request: &BookingRequest) -> Result<Mode, ValidationError> {
    let client = &request.client;

    require("clientName", &client.client_name)?;
    require("lawyerId", &request.lawyer_id)?;
    if !is_valid_email(&client.client_email) {
        return Err(ValidationError::new(
            "clientEmail",
            format!("{:?} is not a valid email address", client.client_email),
        ));
    }
    if !is_valid_phone(&client.client_phone) {
        return Err(ValidationError::new(
            "clientPhone",
            format!("{:?} is not a valid phone number", client.client_phone),
        ));
    }
    require("location", &request.location)?;

    match (request.manual_date(), request.manual_time()) {
        (Some(date), Some(time)) => Ok(Mode::Manual {
            date: date.to_string(),
            time: time.to_string(),
        }),
        (None, None) => Ok(Mode::Automatic),
        (Some(_), None) => Err(ValidationError::new(
            "appointmentTime",
            "is required when appointmentDate is set",
        )),
        (None, Some(_)) => Err(ValidationError::new(
            "appointmentDate",
            "is required when appointmentTime is set",
        )),
    }
}
