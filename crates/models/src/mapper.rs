//! Conversions between storage records, domain users and outward views.
//!
//! All functions are pure. Views are one-way: nothing here turns a
//! [`UserResponse`] or [`UserClaims`] back into a [`User`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

use crate::errors::ModelError;
use crate::user::{User, UserClaims, UserRecord, UserResponse};

/// Map a storage record onto a domain user.
///
/// Fails with [`ModelError::Malformed`] when a column is absent or blank, or
/// when `created_at` is not a recognised ISO-8601 form.
pub fn record_to_domain(record: &UserRecord) -> Result<User, ModelError> {
    let id = required(&record.user_id, "user_id")?;
    let name = required(&record.user_name, "user_name")?;
    let email = required(&record.email_address, "email_address")?;
    let created_at = parse_timestamp(required(&record.created_at, "created_at")?)?;
    Ok(User { id: id.to_string(), name: name.to_string(), email: email.to_string(), created_at })
}

pub fn domain_to_view(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.clone(),
        display_name: user.display_name(),
        email: user.email.clone(),
        member_since: user.member_since(),
    }
}

pub fn domain_to_claim(user: &User) -> UserClaims {
    UserClaims { sub: user.id.clone(), email: user.email.clone() }
}

/// Lazy record-to-view conversion over a borrowed slice.
///
/// Each call to [`ViewBatch::iter`] converts from scratch.
#[derive(Clone, Copy, Debug)]
pub struct ViewBatch<'a> {
    records: &'a [UserRecord],
}

impl<'a> ViewBatch<'a> {
    pub fn new(records: &'a [UserRecord]) -> Self { Self { records } }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = Result<UserResponse, ModelError>> + 'a {
        self.records.iter().map(|r| record_to_domain(r).map(|u| domain_to_view(&u)))
    }
}

impl<'a> IntoIterator for &ViewBatch<'a> {
    type Item = Result<UserResponse, ModelError>;
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter { Box::new(self.iter()) }
}

pub fn records_to_views(records: &[UserRecord]) -> impl Iterator<Item = Result<UserResponse, ModelError>> + '_ {
    ViewBatch::new(records).iter()
}

fn required<'r>(value: &'r Option<String>, field: &str) -> Result<&'r str, ModelError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => {
            debug!(field, "record field missing");
            Err(ModelError::missing(field))
        }
    }
}

/// Accepts RFC 3339, a naive date-time (taken as UTC) or a bare date.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ModelError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Some(naive) = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0)) {
        return Ok(naive.and_utc());
    }
    Err(ModelError::Malformed(format!("unparseable timestamp `{}`", raw)))
}
