// Input validation for event creation
//
// Every rule is checked and every violation collected, so the caller can
// report the full set in one response. Size limits are hard limits, not
// configurable.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::event::{is_free, is_offline, Event, EventDraft, EventStatus, ValidatedEvent};

// =============================================================================
// Input Size Limits
// =============================================================================

/// Maximum size for event name field.
pub const MAX_EVENT_NAME_BYTES: usize = 255;

/// Maximum size for event description field.
pub const MAX_EVENT_DESCRIPTION_BYTES: usize = 10 * 1024; // 10 KB

/// Maximum size for event location field.
pub const MAX_EVENT_LOCATION_BYTES: usize = 1024; // 1 KB

/// Maximum number of enrollments an event may accept.
pub const MAX_LIMIT_OF_ENROLLMENT: i32 = 1_000_000;

// =============================================================================
// Violation codes
// =============================================================================

pub const CODE_REQUIRED: &str = "required";
pub const CODE_BLANK: &str = "blank";
pub const CODE_TOO_LONG: &str = "too_long";
pub const CODE_NEGATIVE: &str = "negative";
pub const CODE_TOO_LARGE: &str = "too_large";
pub const CODE_SERVER_COMPUTED: &str = "server_computed";
pub const CODE_BEFORE_BEGIN_ENROLLMENT: &str = "before_begin_enrollment";
pub const CODE_BEFORE_CLOSE_ENROLLMENT: &str = "before_close_enrollment";
pub const CODE_BEFORE_BEGIN_EVENT: &str = "before_begin_event";
pub const CODE_EXCEEDS_MAX_PRICE: &str = "exceeds_max_price";

// =============================================================================
// Errors
// =============================================================================

/// A single rule violation on one input field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct FieldError {
    /// JSON field name, e.g. `basePrice`
    pub field: String,
    /// Stable machine-readable code, e.g. `exceeds_max_price`
    pub code: String,
    pub message: String,
}

/// All violations found for one input
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, code: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            code: code.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Whether any violation with `code` was recorded for `field`
    pub fn has(&self, field: &str, code: &str) -> bool {
        self.errors
            .iter()
            .any(|e| e.field == field && e.code == code)
    }

    /// `Ok(value)` when nothing was recorded, otherwise `Err(self)`
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

// =============================================================================
// Event validator
// =============================================================================

/// The four timestamps of an event
#[derive(Debug, Clone, Copy)]
struct Schedule {
    begin_enrollment: NaiveDateTime,
    close_enrollment: NaiveDateTime,
    begin_event: NaiveDateTime,
    end_event: NaiveDateTime,
}

/// Validates event creation requests and computes derived fields
#[derive(Debug, Clone, Copy, Default)]
pub struct EventValidator;

impl EventValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a creation request.
    ///
    /// On success the returned event has `free`, `offline` computed and
    /// `event_status` set to DRAFT.
    pub fn validate(&self, draft: EventDraft) -> Result<ValidatedEvent, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        reject_server_computed(&mut errors, &draft);

        let name = required_text(&mut errors, "name", draft.name, MAX_EVENT_NAME_BYTES);
        let description = required_text(
            &mut errors,
            "description",
            draft.description,
            MAX_EVENT_DESCRIPTION_BYTES,
        );

        let location = match draft.location {
            Some(location) => {
                check_len(&mut errors, "location", &location, MAX_EVENT_LOCATION_BYTES);
                Some(location)
            }
            None => {
                errors.add("location", CODE_REQUIRED, "location is required");
                None
            }
        };

        let begin_enrollment = required(
            &mut errors,
            "beginEnrollmentDateTime",
            draft.begin_enrollment_date_time,
        );
        let close_enrollment = required(
            &mut errors,
            "closeEnrollmentDateTime",
            draft.close_enrollment_date_time,
        );
        let begin_event = required(
            &mut errors,
            "beginEventDateTime",
            draft.begin_event_date_time,
        );
        let end_event = required(&mut errors, "endEventDateTime", draft.end_event_date_time);
        check_schedule(
            &mut errors,
            begin_enrollment,
            close_enrollment,
            begin_event,
            end_event,
        );

        let base_price = required(&mut errors, "basePrice", draft.base_price);
        let max_price = required(&mut errors, "maxPrice", draft.max_price);
        let limit_of_enrollment = required(&mut errors, "limitOfEnrollment", draft.limit_of_enrollment);
        check_amounts(&mut errors, base_price, max_price, limit_of_enrollment);

        let schedule = match (begin_enrollment, close_enrollment, begin_event, end_event) {
            (Some(begin_enrollment), Some(close_enrollment), Some(begin_event), Some(end_event)) => {
                Some(Schedule {
                    begin_enrollment,
                    close_enrollment,
                    begin_event,
                    end_event,
                })
            }
            _ => None,
        };

        match (
            name,
            description,
            location,
            schedule,
            base_price,
            max_price,
            limit_of_enrollment,
        ) {
            (
                Some(name),
                Some(description),
                Some(location),
                Some(schedule),
                Some(base_price),
                Some(max_price),
                Some(limit_of_enrollment),
            ) if errors.is_empty() => {
                let offline = is_offline(Some(&location));
                Ok(ValidatedEvent {
                    name,
                    description,
                    begin_enrollment_date_time: schedule.begin_enrollment,
                    close_enrollment_date_time: schedule.close_enrollment,
                    begin_event_date_time: schedule.begin_event,
                    end_event_date_time: schedule.end_event,
                    location: Some(location),
                    base_price,
                    max_price,
                    limit_of_enrollment,
                    free: is_free(base_price, max_price),
                    offline,
                    event_status: EventStatus::Draft,
                })
            }
            _ => {
                tracing::debug!(violations = errors.len(), "Event draft rejected: {}", errors);
                Err(errors)
            }
        }
    }

    /// Re-check a stored event against the same schedule, price and size
    /// rules. Derived fields are checked for consistency with the stored ones.
    pub fn check_event(&self, event: &Event) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if event.name.trim().is_empty() {
            errors.add("name", CODE_BLANK, "name must not be blank");
        }
        check_len(&mut errors, "name", &event.name, MAX_EVENT_NAME_BYTES);
        if event.description.trim().is_empty() {
            errors.add("description", CODE_BLANK, "description must not be blank");
        }
        check_len(
            &mut errors,
            "description",
            &event.description,
            MAX_EVENT_DESCRIPTION_BYTES,
        );
        if let Some(location) = &event.location {
            check_len(&mut errors, "location", location, MAX_EVENT_LOCATION_BYTES);
        }
        check_schedule(
            &mut errors,
            Some(event.begin_enrollment_date_time),
            Some(event.close_enrollment_date_time),
            Some(event.begin_event_date_time),
            Some(event.end_event_date_time),
        );
        check_amounts(
            &mut errors,
            Some(event.base_price),
            Some(event.max_price),
            Some(event.limit_of_enrollment),
        );

        if event.free != is_free(event.base_price, event.max_price) {
            errors.add("free", CODE_SERVER_COMPUTED, "free does not match prices");
        }
        if event.offline != is_offline(event.location.as_deref()) {
            errors.add("offline", CODE_SERVER_COMPUTED, "offline does not match location");
        }

        errors.into_result(())
    }
}

fn reject_server_computed(errors: &mut ValidationErrors, draft: &EventDraft) {
    let present = [
        ("id", draft.id.is_some()),
        ("free", draft.free.is_some()),
        ("offline", draft.offline.is_some()),
        ("eventStatus", draft.event_status.is_some()),
    ];
    for (field, is_present) in present {
        if is_present {
            errors.add(
                field,
                CODE_SERVER_COMPUTED,
                format!("{} is computed by the server and must not be supplied", field),
            );
        }
    }
}

fn required<T>(errors: &mut ValidationErrors, field: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        errors.add(field, CODE_REQUIRED, format!("{} is required", field));
    }
    value
}

fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
    max_bytes: usize,
) -> Option<String> {
    let value = required(errors, field, value)?;
    if value.trim().is_empty() {
        errors.add(field, CODE_BLANK, format!("{} must not be blank", field));
    }
    check_len(errors, field, &value, max_bytes);
    Some(value)
}

fn check_len(errors: &mut ValidationErrors, field: &str, value: &str, max_bytes: usize) {
    if value.len() > max_bytes {
        tracing::warn!(
            "Event {} exceeds limit: {} bytes (max: {})",
            field,
            value.len(),
            max_bytes
        );
        errors.add(
            field,
            CODE_TOO_LONG,
            format!("{} must be at most {} bytes", field, max_bytes),
        );
    }
}

/// Only timestamps that are present take part in the ordering checks
fn check_schedule(
    errors: &mut ValidationErrors,
    begin_enrollment: Option<NaiveDateTime>,
    close_enrollment: Option<NaiveDateTime>,
    begin_event: Option<NaiveDateTime>,
    end_event: Option<NaiveDateTime>,
) {
    if let (Some(begin), Some(close)) = (begin_enrollment, close_enrollment) {
        if close < begin {
            errors.add(
                "closeEnrollmentDateTime",
                CODE_BEFORE_BEGIN_ENROLLMENT,
                "closeEnrollmentDateTime must not be before beginEnrollmentDateTime",
            );
        }
    }
    if let (Some(begin_enrollment), Some(begin_event)) = (begin_enrollment, begin_event) {
        if begin_event < begin_enrollment {
            errors.add(
                "beginEventDateTime",
                CODE_BEFORE_BEGIN_ENROLLMENT,
                "beginEventDateTime must not be before beginEnrollmentDateTime",
            );
        }
    }
    if let (Some(close), Some(end)) = (close_enrollment, end_event) {
        if end < close {
            errors.add(
                "endEventDateTime",
                CODE_BEFORE_CLOSE_ENROLLMENT,
                "endEventDateTime must not be before closeEnrollmentDateTime",
            );
        }
    }
    if let (Some(begin), Some(end)) = (begin_event, end_event) {
        if end < begin {
            errors.add(
                "endEventDateTime",
                CODE_BEFORE_BEGIN_EVENT,
                "endEventDateTime must not be before beginEventDateTime",
            );
        }
    }
}

fn check_amounts(
    errors: &mut ValidationErrors,
    base_price: Option<i32>,
    max_price: Option<i32>,
    limit_of_enrollment: Option<i32>,
) {
    for (field, value) in [
        ("basePrice", base_price),
        ("maxPrice", max_price),
        ("limitOfEnrollment", limit_of_enrollment),
    ] {
        if value.is_some_and(|v| v < 0) {
            errors.add(field, CODE_NEGATIVE, format!("{} must not be negative", field));
        }
    }

    if limit_of_enrollment.is_some_and(|v| v > MAX_LIMIT_OF_ENROLLMENT) {
        errors.add(
            "limitOfEnrollment",
            CODE_TOO_LARGE,
            format!("limitOfEnrollment must be at most {}", MAX_LIMIT_OF_ENROLLMENT),
        );
    }

    // maxPrice 0 means no upper bound
    if let (Some(base), Some(max)) = (base_price, max_price) {
        if max > 0 && base > max {
            errors.add(
                "basePrice",
                CODE_EXCEEDS_MAX_PRICE,
                "basePrice must not be greater than maxPrice",
            );
        }
    }
}
