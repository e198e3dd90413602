//! Paste record, API payloads, and request validation.

use crate::error::AppError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Paste row persisted in the record store.
///
/// Everything except `current_views` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteRecord {
    pub id: String,
    pub content: String,
    pub created_at_ms: i64,
    pub ttl_seconds: Option<u64>,
    pub max_views: Option<u64>,
    pub current_views: u64,
}

impl PasteRecord {
    /// Build a fresh record with a zero view counter.
    ///
    /// # Arguments
    /// - `id`: Identifier assigned by the caller.
    /// - `paste`: Validated creation input.
    /// - `created_at_ms`: Creation time in epoch milliseconds.
    ///
    /// # Returns
    /// A new [`PasteRecord`].
    pub fn new(id: String, paste: NewPaste, created_at_ms: i64) -> Self {
        Self {
            id,
            content: paste.content,
            created_at_ms,
            ttl_seconds: paste.ttl_seconds,
            max_views: paste.max_views,
            current_views: 0,
        }
    }

    /// Absolute expiry in epoch milliseconds, saturating at `i64::MAX`.
    ///
    /// # Returns
    /// `None` when the record has no time limit.
    pub fn expires_at_ms(&self) -> Option<i64> {
        self.ttl_seconds.map(|ttl| {
            i64::try_from(ttl)
                .ok()
                .and_then(|ttl| ttl.checked_mul(1000))
                .and_then(|ttl_ms| self.created_at_ms.checked_add(ttl_ms))
                .unwrap_or(i64::MAX)
        })
    }

    /// Whether the time budget has elapsed at `now_ms`.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expires_at_ms()
            .map(|expires_at| now_ms >= expires_at)
            .unwrap_or(false)
    }

    /// Whether the record has already been served `max_views` times.
    pub fn views_exhausted(&self) -> bool {
        self.max_views
            .map(|max_views| self.current_views >= max_views)
            .unwrap_or(false)
    }

    /// Whether the counter has gone past the limit (only reachable via a lost update).
    pub fn views_overrun(&self) -> bool {
        self.max_views
            .map(|max_views| self.current_views > max_views)
            .unwrap_or(false)
    }

    /// Views left after the current counter, clamped at zero.
    ///
    /// # Returns
    /// `None` when views are unlimited.
    pub fn remaining_views(&self) -> Option<u64> {
        self.max_views
            .map(|max_views| max_views.saturating_sub(self.current_views))
    }

    /// Expiry as a UTC timestamp, clamped to the latest representable instant.
    ///
    /// # Returns
    /// `None` when the record has no time limit.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at_ms().map(|expires_at_ms| {
            DateTime::<Utc>::from_timestamp_millis(expires_at_ms).unwrap_or(DateTime::<Utc>::MAX_UTC)
        })
    }
}

/// Validated creation input handed to the lifecycle manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaste {
    pub content: String,
    pub ttl_seconds: Option<u64>,
    pub max_views: Option<u64>,
}

impl NewPaste {
    /// Creation input with no time or view limit.
    pub fn unlimited(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ttl_seconds: None,
            max_views: None,
        }
    }

    /// Attach a time limit in seconds.
    pub fn with_ttl_seconds(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = Some(ttl_seconds);
        self
    }

    /// Attach a view limit.
    pub fn with_max_views(mut self, max_views: u64) -> Self {
        self.max_views = Some(max_views);
        self
    }
}

/// A limit field as sent by the client, before range checks.
///
/// Any JSON number without a fractional part counts as an integer, so `2.0`
/// is accepted. Every other value is kept as [`LimitInput::NotInteger`] and
/// rejected by [`CreatePasteRequest::validate`] with the field's own message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitInput {
    Integer(i64),
    NotInteger,
}

struct LimitVisitor;

impl<'de> Visitor<'de> for LimitVisitor {
    type Value = LimitInput;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<LimitInput, E> {
        Ok(LimitInput::Integer(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<LimitInput, E> {
        Ok(LimitInput::Integer(i64::try_from(value).unwrap_or(i64::MAX)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<LimitInput, E> {
        // `as` saturates; NaN and infinities have a NaN fraction and fall through.
        if value.fract() == 0.0 {
            Ok(LimitInput::Integer(value as i64))
        } else {
            Ok(LimitInput::NotInteger)
        }
    }

    fn visit_bool<E: de::Error>(self, _value: bool) -> Result<LimitInput, E> {
        Ok(LimitInput::NotInteger)
    }

    fn visit_str<E: de::Error>(self, _value: &str) -> Result<LimitInput, E> {
        Ok(LimitInput::NotInteger)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<LimitInput, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(LimitInput::NotInteger)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<LimitInput, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(LimitInput::NotInteger)
    }
}

impl<'de> Deserialize<'de> for LimitInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LimitVisitor)
    }
}

/// Request payload for creating a paste.
///
/// Limits are decoded leniently so bad values reach
/// [`CreatePasteRequest::validate`] instead of failing deserialization with
/// a less useful message. `null` and a missing field both mean "no limit".
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePasteRequest {
    #[serde(default)]
    pub content: String,
    pub ttl_seconds: Option<LimitInput>,
    pub max_views: Option<LimitInput>,
}

fn positive_limit(value: Option<LimitInput>, field: &str) -> Result<Option<u64>, AppError> {
    match value {
        None => Ok(None),
        Some(LimitInput::Integer(value)) if value >= 1 => Ok(Some(value as u64)),
        Some(_) => Err(AppError::BadRequest(format!(
            "{} must be an integer >= 1",
            field
        ))),
    }
}

impl CreatePasteRequest {
    /// Check field shapes and ranges.
    ///
    /// # Returns
    /// The validated [`NewPaste`].
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] naming the first offending field.
    pub fn validate(self) -> Result<NewPaste, AppError> {
        if self.content.is_empty() {
            return Err(AppError::BadRequest(
                "Content must be a non-empty string".to_string(),
            ));
        }
        let ttl_seconds = positive_limit(self.ttl_seconds, "ttl_seconds")?;
        let max_views = positive_limit(self.max_views, "max_views")?;
        Ok(NewPaste {
            content: self.content,
            ttl_seconds,
            max_views,
        })
    }
}

/// Response payload for a created paste.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatePasteResponse {
    pub id: String,
    pub url: String,
}

/// Paste content plus derived limits, returned by a successful retrieval.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PasteView {
    pub content: String,
    pub remaining_views: Option<u64>,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&PasteRecord> for PasteView {
    fn from(value: &PasteRecord) -> Self {
        Self {
            content: value.content.clone(),
            remaining_views: value.remaining_views(),
            expires_at: value.expires_at(),
        }
    }
}

// `2024-01-01T00:00:00.000Z`: fixed millisecond precision with a `Z` suffix.
fn serialize_iso_millis<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(at) => serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => serializer.serialize_none(),
    }
}
