// Event domain types
//
// An event has an enrollment window, an occurrence window and pricing.
// `free`, `offline` and `event_status` are computed by the server and are
// never accepted from the caller.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Event lifecycle status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Draft,
    Published,
    BeganEnrollment,
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Draft => write!(f, "DRAFT"),
            EventStatus::Published => write!(f, "PUBLISHED"),
            EventStatus::BeganEnrollment => write!(f, "BEGAN_ENROLLMENT"),
        }
    }
}

impl From<&str> for EventStatus {
    fn from(s: &str) -> Self {
        match s {
            "PUBLISHED" => EventStatus::Published,
            "BEGAN_ENROLLMENT" => EventStatus::BeganEnrollment,
            _ => EventStatus::Draft,
        }
    }
}

/// `true` when neither a base nor a max price is charged
pub fn is_free(base_price: i32, max_price: i32) -> bool {
    base_price == 0 && max_price == 0
}

/// `true` when the event happens at a physical location
pub fn is_offline(location: Option<&str>) -> bool {
    location.is_some_and(|l| !l.trim().is_empty())
}

/// Stored event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2021-01-20T18:47:00"))]
    pub begin_enrollment_date_time: NaiveDateTime,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2021-01-21T18:47:00"))]
    pub close_enrollment_date_time: NaiveDateTime,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2021-01-22T18:47:00"))]
    pub begin_event_date_time: NaiveDateTime,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2021-01-23T18:47:00"))]
    pub end_event_date_time: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub base_price: i32,
    pub max_price: i32,
    pub limit_of_enrollment: i32,
    pub free: bool,
    pub offline: bool,
    pub event_status: EventStatus,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Recompute `free` and `offline` from the stored fields.
    /// Running it on an event that is already consistent changes nothing.
    pub fn update_derived(&mut self) {
        self.free = is_free(self.base_price, self.max_price);
        self.offline = is_offline(self.location.as_deref());
    }
}

/// Inbound representation of an event creation request.
///
/// Every field is optional so that missing values are reported as validation
/// errors instead of failing deserialization. `id`, `free`, `offline` and
/// `event_status` exist only so their presence can be rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EventDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(example = "Spring"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(example = "Rest API Development with Spring"))]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "local_date_time::deserialize_option"
    )]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "2021-01-20T18:47:00"))]
    pub begin_enrollment_date_time: Option<NaiveDateTime>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "local_date_time::deserialize_option"
    )]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "2021-01-21T18:47:00"))]
    pub close_enrollment_date_time: Option<NaiveDateTime>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "local_date_time::deserialize_option"
    )]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "2021-01-22T18:47:00"))]
    pub begin_event_date_time: Option<NaiveDateTime>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "local_date_time::deserialize_option"
    )]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "2021-01-23T18:47:00"))]
    pub end_event_date_time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(example = "경기도 안양시 범계"))]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(example = 100))]
    pub base_price: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(example = 200))]
    pub max_price: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(example = 200))]
    pub limit_of_enrollment: Option<i32>,

    // Server-computed, rejected when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_status: Option<EventStatus>,
}

/// Event that passed validation and carries its derived fields,
/// waiting for an id from storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEvent {
    pub name: String,
    pub description: String,
    pub begin_enrollment_date_time: NaiveDateTime,
    pub close_enrollment_date_time: NaiveDateTime,
    pub begin_event_date_time: NaiveDateTime,
    pub end_event_date_time: NaiveDateTime,
    pub location: Option<String>,
    pub base_price: i32,
    pub max_price: i32,
    pub limit_of_enrollment: i32,
    pub free: bool,
    pub offline: bool,
    pub event_status: EventStatus,
}

impl ValidatedEvent {
    /// Attach identity and creation time
    pub fn into_event(self, id: Uuid, created_at: DateTime<Utc>) -> Event {
        Event {
            id,
            name: self.name,
            description: self.description,
            begin_enrollment_date_time: self.begin_enrollment_date_time,
            close_enrollment_date_time: self.close_enrollment_date_time,
            begin_event_date_time: self.begin_event_date_time,
            end_event_date_time: self.end_event_date_time,
            location: self.location,
            base_price: self.base_price,
            max_price: self.max_price,
            limit_of_enrollment: self.limit_of_enrollment,
            free: self.free,
            offline: self.offline,
            event_status: self.event_status,
            created_at,
        }
    }
}

/// Zone-less ISO-8601 date-times as sent by clients.
/// Seconds and fractions are optional: `2021-01-20T18:47` and
/// `2021-01-20T18:47:00.000` name the same instant.
pub mod local_date_time {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer};

    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| {
                parse(&raw).ok_or_else(|| {
                    de::Error::custom(format!(
                        "invalid date-time `{}`, expected YYYY-MM-DDTHH:MM[:SS]",
                        raw
                    ))
                })
            })
            .transpose()
    }
}
