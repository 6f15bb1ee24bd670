//! Presentation-layer validation.
//!
//! The backend enforces every invariant again; these checks exist so bad
//! input is rejected before a request is issued, with the same messages
//! the forms showed.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_TITLE_LEN: usize = 20;
pub const MAX_DESCRIPTION_LEN: usize = 100;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("please enter a valid email")]
    InvalidEmail,
    #[error("passwords must be 8 or more characters")]
    PasswordTooShort,
    #[error("amount must be a positive number")]
    AmountNotPositive,
    #[error("select at least one member to split with")]
    NoSplitters,
    #[error("title must be at most 20 characters")]
    TitleTooLong,
    #[error("description must be at most 100 characters")]
    DescriptionTooLong,
    #[error("start time must be in the future")]
    StartNotInFuture,
    #[error("start time must be before end time")]
    StartNotBeforeEnd,
    #[error("start and end must be on the same day")]
    NotSameDay,
    #[error("unrecognized timestamp: {0}")]
    BadTimestamp(String),
}

pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::AmountNotPositive);
    }
    Ok(())
}

pub fn validate_event_title(title: &str) -> Result<(), ValidationError> {
    require("title", title)?;
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(())
}

pub fn validate_event_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(())
}

/// Accepts the timestamp shapes the forms produced: RFC 3339 or a naive
/// `YYYY-MM-DDTHH:MM[:SS]`, with a space tolerated in place of the `T`.
pub fn parse_event_time(input: &str) -> Result<NaiveDateTime, ValidationError> {
    let s = input.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    Err(ValidationError::BadTimestamp(input.to_string()))
}

/// Event scheduling rules: strictly future start (a start equal to `now`
/// is rejected), start before end, both on the same calendar day.
pub fn validate_event_times(
    start: NaiveDateTime,
    end: NaiveDateTime,
    now: NaiveDateTime,
) -> Result<(), ValidationError> {
    if start <= now {
        return Err(ValidationError::StartNotInFuture);
    }
    if start >= end {
        return Err(ValidationError::StartNotBeforeEnd);
    }
    if start.date() != end.date() {
        return Err(ValidationError::NotSameDay);
    }
    Ok(())
}
