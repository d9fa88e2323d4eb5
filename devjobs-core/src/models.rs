//! Records returned by the DevJobs backend

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Placeholder shown for any optional field the backend left out.
pub const NOT_AVAILABLE: &str = "N/A";

/// Records that can key an item view.
pub trait Identified {
    fn key(&self) -> String;
}

/// Job identifier. The backend sends `pk` as a number; fixtures and newer
/// endpoints send `id`, sometimes as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(JobId(s)),
            Value::Number(n) => Ok(JobId(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "job id must be a string or number, got {}",
                other
            ))),
        }
    }
}

impl Serialize for JobId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0.parse::<i64>() {
            Ok(n) => serializer.serialize_i64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

/// Accepts `"250000"`, `250000` or `250000.5` for free-form numeric fields.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// A null or missing string reads as empty.
fn text_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A posted job, as consumed by the listing pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(alias = "pk")]
    pub id: JobId,
    #[serde(default, deserialize_with = "text_or_null")]
    pub title: String,
    #[serde(default, deserialize_with = "text_or_null")]
    pub company_name: String,
    #[serde(default)]
    pub users_applied: Option<u32>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub experience_level: Option<String>,
    #[serde(default, alias = "expected_salary", deserialize_with = "text_or_number")]
    pub salary: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl Job {
    /// Application count; a missing or null count is zero.
    pub fn applications(&self) -> u32 {
        self.users_applied.unwrap_or(0)
    }

    /// `created_date` in a readable local form, falling back to the raw value.
    pub fn posted(&self) -> String {
        match self.created_date.as_deref() {
            Some(raw) => format_timestamp(raw),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    /// "city, state, country" from whichever parts are present.
    pub fn location(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.city, &self.state, &self.country]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .filter(|p| !p.trim().is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

impl Identified for Job {
    fn key(&self) -> String {
        self.id.to_string()
    }
}

fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

/// A collection payload.
///
/// The pages start from an empty object placeholder rather than an empty
/// array, and some endpoints answer `{}` when there is nothing to list, so a
/// non-array payload is kept as [`Listing::Placeholder`] instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Placeholder,
    Items(Vec<T>),
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Listing::Placeholder
    }
}

impl<T> Listing<T> {
    /// Element count; the placeholder counts as zero.
    pub fn len(&self) -> usize {
        match self {
            Listing::Placeholder => 0,
            Listing::Items(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Listing::Placeholder => <&[T]>::default().iter(),
            Listing::Items(items) => items.iter(),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Placeholder => Vec::new(),
            Listing::Items(items) => items,
        }
    }
}

impl<T> From<Vec<T>> for Listing<T> {
    fn from(items: Vec<T>) -> Self {
        Listing::Items(items)
    }
}

impl<'de, T> Deserialize<'de> for Listing<T>
where
    T: serde::de::DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(values) => values
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<T>, _>>()
                .map(Listing::Items)
                .map_err(serde::de::Error::custom),
            _ => Ok(Listing::Placeholder),
        }
    }
}

impl<T: Serialize> Serialize for Listing<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Listing::Placeholder => serializer.collect_seq(std::iter::empty::<&T>()),
            Listing::Items(items) => items.serialize(serializer),
        }
    }
}

/// Employer dashboard counters. Each list is absent until the backend has
/// something to report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_jobs_posted: Option<Listing<Value>>,
    #[serde(default)]
    pub active_jobs: Option<Listing<Value>>,
    #[serde(default)]
    pub expired_jobs: Option<Listing<Value>>,
}

impl DashboardSummary {
    pub fn total_jobs_posted(&self) -> Option<usize> {
        self.total_jobs_posted.as_ref().map(Listing::len)
    }

    pub fn active_jobs(&self) -> Option<usize> {
        self.active_jobs.as_ref().map(Listing::len)
    }

    pub fn expired_jobs(&self) -> Option<usize> {
        self.expired_jobs.as_ref().map(Listing::len)
    }
}

/// Token returned by login and registration (`{"key": "..."}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub key: String,
}

/// Which side of the board an account is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    #[default]
    JobSeeker,
    Employer,
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKind::JobSeeker => write!(f, "job seeker"),
            AccountKind::Employer => write!(f, "employer"),
        }
    }
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub kind: AccountKind,
    #[serde(default)]
    pub username: Option<String>,
}

impl Session {
    pub fn new(token: AuthToken, kind: AccountKind) -> Self {
        Self {
            token: token.key,
            kind,
            username: None,
        }
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("Token {}", self.token)
    }
}

/// Account record from `auth/user/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicUserProfile {
    #[serde(default)]
    pub pk: Option<u64>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Full job-seeker profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin_profile: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub stack_dev_role: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub experience_level: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub salary: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default, alias = "CV")]
    pub cv: Option<String>,
}

/// `value` or `N/A` when absent or blank.
pub fn or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_AVAILABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn job_accepts_pk_or_id() {
        let from_pk: Job = serde_json::from_value(json!({"pk": 7, "title": "Dev"})).unwrap();
        let from_id: Job = serde_json::from_value(json!({"id": "7", "title": "Dev"})).unwrap();
        assert_eq!(from_pk.id, from_id.id);
        assert_eq!(from_pk.key(), "7");
    }

    #[test]
    fn missing_counts_and_optionals() {
        let job: Job = serde_json::from_value(json!({
            "id": 1,
            "title": "Engineer",
            "users_applied": null,
            "salary": 250000
        }))
        .unwrap();
        assert_eq!(job.applications(), 0);
        assert_eq!(job.salary.as_deref(), Some("250000"));
        assert_eq!(job.duration, None);
        assert_eq!(job.posted(), NOT_AVAILABLE);
        assert_eq!(job.location(), None);
    }

    #[test]
    fn listing_from_array_and_object() {
        let items: Listing<Job> =
            serde_json::from_value(json!([{"id": 1, "title": "Engineer"}])).unwrap();
        assert_eq!(items.len(), 1);

        let placeholder: Listing<Job> = serde_json::from_value(json!({})).unwrap();
        assert_eq!(placeholder, Listing::Placeholder);
        assert!(placeholder.is_empty());
        assert_eq!(placeholder.iter().count(), 0);
    }

    #[test]
    fn null_title_keeps_the_listing() {
        let items: Listing<Job> = serde_json::from_value(json!([
            {"id": 1, "title": null, "company_name": null},
            {"id": 2, "title": "Engineer"},
            {"id": 3}
        ]))
        .unwrap();
        let jobs = items.into_vec();
        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[0].title, "");
        assert_eq!(jobs[1].title, "Engineer");
        assert_eq!(jobs[2].company_name, "");
    }

    #[test]
    fn listing_rejects_malformed_items() {
        let result: Result<Listing<Job>, _> = serde_json::from_value(json!([{"title": 3}]));
        assert!(result.is_err());
    }

    #[test]
    fn timestamp_formats() {
        assert_eq!(format_timestamp("2024-01-01"), "2024-01-01");
        assert_eq!(format_timestamp("2024-01-01T10:30:00Z"), "2024-01-01 10:30");
        assert_eq!(format_timestamp("2024-01-01T10:30:00.123456"), "2024-01-01 10:30");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn dashboard_counts_distinguish_absent_from_empty() {
        let summary: DashboardSummary = serde_json::from_value(json!({
            "total_jobs_posted": [{"id": 1}, {"id": 2}],
            "active_jobs": []
        }))
        .unwrap();
        assert_eq!(summary.total_jobs_posted(), Some(2));
        assert_eq!(summary.active_jobs(), Some(0));
        assert_eq!(summary.expired_jobs(), None);
    }

    #[test]
    fn or_na_fallback() {
        assert_eq!(or_na(Some("Lagos")), "Lagos");
        assert_eq!(or_na(Some("  ")), NOT_AVAILABLE);
        assert_eq!(or_na(None), NOT_AVAILABLE);
    }
}
