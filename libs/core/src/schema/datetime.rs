use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time, UtcOffset};

use super::{SchemaError, SchemaErrorCode};

/// `start_time` on create/update media buy accepts the literal `"asap"` in
/// addition to a timezone-aware instant; every other datetime field in the
/// protocol is always [`OffsetDateTime`].
///
/// Serializes to and parses from a plain wire string (`"asap"` or an RFC3339
/// timestamp) rather than deriving serde directly, since serde's untagged
/// enums can't mix a unit variant with a `#[serde(with = ..)]` payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StartTime {
    Asap,
    At(OffsetDateTime),
}

impl StartTime {
    pub fn parse(raw: &str, field: &str) -> Result<Self, SchemaError> {
        if raw.eq_ignore_ascii_case("asap") {
            return Ok(StartTime::Asap);
        }
        parse_offset_datetime(raw, field).map(StartTime::At)
    }
}

impl Serialize for StartTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            StartTime::Asap => serializer.serialize_str("asap"),
            StartTime::At(dt) => serializer.serialize_str(&to_rfc3339(*dt)),
        }
    }
}

impl<'de> Deserialize<'de> for StartTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        StartTime::parse(&raw, "start_time").map_err(serde::de::Error::custom)
    }
}

/// Parses a strict, offset-bearing ISO-8601 datetime. Naive ("floating")
/// datetimes without a UTC offset are rejected — the original implementation
/// silently treated them as UTC, which produced wrong delivery windows for
/// callers sending local time; this crate rejects them with a message citing
/// the field name rather than guessing.
pub fn parse_offset_datetime(raw: &str, field: &str) -> Result<OffsetDateTime, SchemaError> {
    OffsetDateTime::parse(raw, &Rfc3339).map_err(|_| {
        SchemaError::new(
            SchemaErrorCode::InvalidDatetime,
            format!(
                "field '{field}' must be an ISO-8601 datetime with an explicit UTC offset (got '{raw}')"
            ),
        )
        .with_field(field.to_string())
    })
}

/// Legacy `start_date`/`end_date` are date-only (`YYYY-MM-DD`); promoted to
/// UTC midnight on the corresponding `start_time`/`end_time` field.
pub fn date_only_to_utc_midnight(raw: &str, field: &str) -> Result<OffsetDateTime, SchemaError> {
    let fmt = format_description!("[year]-[month]-[day]");
    let date = Date::parse(raw, &fmt).map_err(|_| {
        SchemaError::new(
            SchemaErrorCode::InvalidDatetime,
            format!("field '{field}' must be a date in YYYY-MM-DD form (got '{raw}')"),
        )
        .with_field(field.to_string())
    })?;
    Ok(OffsetDateTime::new_in_offset(
        date,
        Time::MIDNIGHT,
        UtcOffset::UTC,
    ))
}

pub fn to_rfc3339(dt: OffsetDateTime) -> String {
    dt.to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .unwrap_or_else(|_| dt.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asap_is_case_insensitive() {
        assert_eq!(StartTime::parse("ASAP", "start_time").unwrap(), StartTime::Asap);
        assert_eq!(StartTime::parse("asap", "start_time").unwrap(), StartTime::Asap);
    }

    #[test]
    fn offset_datetime_required() {
        let err = parse_offset_datetime("2026-01-01T00:00:00", "start_time").unwrap_err();
        assert_eq!(err.field.as_deref(), Some("start_time"));
    }

    #[test]
    fn accepts_explicit_offset() {
        assert!(parse_offset_datetime("2026-01-01T00:00:00Z", "start_time").is_ok());
        assert!(parse_offset_datetime("2026-01-01T00:00:00+02:00", "start_time").is_ok());
    }

    #[test]
    fn legacy_date_promotes_to_utc_midnight() {
        let dt = date_only_to_utc_midnight("2026-03-01", "start_date").unwrap();
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.offset(), UtcOffset::UTC);
    }
}
