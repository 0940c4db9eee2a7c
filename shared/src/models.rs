use serde::{Serialize, Deserialize};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Wire format for all vote timestamps: ISO-8601 UTC with a literal `Z`,
/// no fractional seconds, no offset variants.
pub const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(value, TIMESTAMP_FORMAT).map(|dt| dt.assume_utc())
}

pub fn format_timestamp(value: OffsetDateTime) -> Result<String, time::error::Format> {
    value.to_offset(time::UtcOffset::UTC).format(TIMESTAMP_FORMAT)
}

/// Serde adapter keeping `Vote::timestamp` in the strict wire format in
/// both directions.
pub mod timestamp_format {
    use serde::{de, ser, Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;

    pub fn serialize<S: Serializer>(
        value: &OffsetDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let formatted = super::format_timestamp(*value).map_err(ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<OffsetDateTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        super::parse_timestamp(&value).map_err(de::Error::custom)
    }
}

/// One accepted ballot record. `id` is assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vote {
    pub id: i64,
    pub voter_id: String,
    pub candidate: String,
    pub location: String,
    #[serde(with = "timestamp_format")]
    pub timestamp: OffsetDateTime,
    pub biometric_hash: String,
}

/// Incoming submission body. The timestamp stays a string until the
/// submission path parses it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRequest {
    pub voter_id: String,
    pub candidate: String,
    pub location: String,
    pub timestamp: String,
    pub biometric_hash: String,
}

/// Payload shared by `GET /get_votes` and the real-time push.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteSnapshot {
    pub total_votes: i64,
    pub votes: Vec<Vote>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
