//! Input validation
//!
//! Centralized limits and checks for the reservation write paths. All of
//! these run before any storage write; a failed check costs nothing.

use shared::{AppError, AppResult};
use validator::ValidateEmail;

// ── Text length limits ──────────────────────────────────────────────

/// Guest names
pub const MAX_NAME_LEN: usize = 200;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Phone numbers
pub const MAX_PHONE_LEN: usize = 32;

/// Special requests / notes
pub const MAX_NOTE_LEN: usize = 500;

// ── Window / party checks ───────────────────────────────────────────

/// Longest bookable window. No sitting spans a full service day; anything
/// longer is a client bug or a hostile payload.
pub const MAX_WINDOW_HOURS: i64 = 12;

const MAX_WINDOW_MS: i64 = MAX_WINDOW_HOURS * 60 * 60 * 1000;

/// Validate `end > start`, the window length, and that the start is not
/// in the past
pub fn validate_window(start: i64, end: i64, now_ms: i64) -> AppResult<()> {
    if end <= start {
        return Err(AppError::invalid_time(
            "Reservation end must be after start",
        ));
    }
    if end.saturating_sub(start) > MAX_WINDOW_MS {
        return Err(AppError::invalid_time(format!(
            "Reservation window exceeds {} hours",
            MAX_WINDOW_HOURS
        )));
    }
    if start < now_ms {
        return Err(AppError::past_time(
            "Reservation start must not be in the past",
        ));
    }
    Ok(())
}

/// Validate party size against the tenant's configured maximum
pub fn validate_party_size(party_size: i32, max: i32) -> AppResult<()> {
    if party_size < 1 || party_size > max {
        return Err(AppError::validation(format!(
            "Party size must be between 1 and {}, got {}",
            max, party_size
        ))
        .with_detail("field", "partySize"));
    }
    Ok(())
}

// ── Guest detail checks ─────────────────────────────────────────────

/// Validate guest name/email/phone and optional special requests
pub fn validate_guest(
    name: &str,
    email: &str,
    phone: &str,
    special_requests: Option<&str>,
) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Guest name must not be empty")
            .with_detail("field", "guestName"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "Guest name is too long ({} chars, max {})",
            name.len(),
            MAX_NAME_LEN
        ))
        .with_detail("field", "guestName"));
    }

    if email.len() > MAX_EMAIL_LEN || !email.validate_email() {
        return Err(AppError::validation(format!("Invalid email address: {}", email))
            .with_detail("field", "guestEmail"));
    }

    validate_phone(phone)?;

    if let Some(notes) = special_requests
        && notes.len() > MAX_NOTE_LEN
    {
        return Err(AppError::validation(format!(
            "Special requests too long ({} chars, max {})",
            notes.len(),
            MAX_NOTE_LEN
        ))
        .with_detail("field", "specialRequests"));
    }

    Ok(())
}

/// Basic phone format check: 7–15 digits, optional +, common separators
fn validate_phone(phone: &str) -> AppResult<()> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    let well_formed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));

    if phone.len() > MAX_PHONE_LEN || digits < 7 || digits > 15 || !well_formed {
        return Err(AppError::validation(format!("Invalid phone number: {}", phone))
            .with_detail("field", "guestPhone"));
    }
    Ok(())
}
