//! Bug service data models
//!
//! This module contains type definitions for bug service requests and responses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque identifier assigned by the service.
///
/// Some deployments use numeric ids, others strings; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BugId {
    Number(u64),
    Text(String),
}

impl fmt::Display for BugId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BugId::Number(n) => write!(f, "{}", n),
            BugId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for BugId {
    fn from(value: u64) -> Self {
        BugId::Number(value)
    }
}

/// Only canonical decimal text becomes `Number`, so `"007"` and `"+5"` keep their spelling
impl From<&str> for BugId {
    fn from(value: &str) -> Self {
        match value.parse::<u64>() {
            Ok(n) if n.to_string() == value => BugId::Number(n),
            _ => BugId::Text(value.to_string()),
        }
    }
}

impl From<String> for BugId {
    fn from(value: String) -> Self {
        BugId::from(value.as_str())
    }
}

/// Priority tier assigned by the prediction service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// All tiers, most urgent first
    pub const ALL: [Priority; 4] = [Priority::Critical, Priority::High, Priority::Medium, Priority::Low];

    /// Parse a label case-insensitively; unknown labels yield `None`
    pub fn from_label(label: &str) -> Option<Priority> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(label))
    }

    /// Sort rank: critical=4, high=3, medium=2, low=1
    pub fn rank(self) -> u8 {
        match self {
            Priority::Critical => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    /// Lowercase wire label
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::from_label(s).ok_or_else(|| format!("Unknown priority: {}", s))
    }
}

/// Application area a bug was reported against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BugModule {
    Authentication,
    Database,
    #[serde(rename = "API")]
    Api,
    Frontend,
    Backend,
    Payment,
    Notification,
    Other,
}

impl BugModule {
    pub const ALL: [BugModule; 8] = [
        BugModule::Authentication,
        BugModule::Database,
        BugModule::Api,
        BugModule::Frontend,
        BugModule::Backend,
        BugModule::Payment,
        BugModule::Notification,
        BugModule::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BugModule::Authentication => "Authentication",
            BugModule::Database => "Database",
            BugModule::Api => "API",
            BugModule::Frontend => "Frontend",
            BugModule::Backend => "Backend",
            BugModule::Payment => "Payment",
            BugModule::Notification => "Notification",
            BugModule::Other => "Other",
        }
    }
}

impl fmt::Display for BugModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BugModule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BugModule::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown module: {}", s.trim()))
    }
}

/// How often the bug reproduces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Always,
    Often,
    Sometimes,
    Rarely,
    Once,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::Always,
        Frequency::Often,
        Frequency::Sometimes,
        Frequency::Rarely,
        Frequency::Once,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Always => "Always",
            Frequency::Often => "Often",
            Frequency::Sometimes => "Sometimes",
            Frequency::Rarely => "Rarely",
            Frequency::Once => "Once",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Frequency::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown frequency: {}", s.trim()))
    }
}

/// Kind of user who hit the bug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    #[serde(rename = "End User")]
    EndUser,
    Developer,
    Admin,
    Tester,
    Support,
}

impl UserType {
    pub const ALL: [UserType; 5] = [
        UserType::EndUser,
        UserType::Developer,
        UserType::Admin,
        UserType::Tester,
        UserType::Support,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UserType::EndUser => "End User",
            UserType::Developer => "Developer",
            UserType::Admin => "Admin",
            UserType::Tester => "Tester",
            UserType::Support => "Support",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "end_user" and "end-user" are accepted for command-line convenience
        let normalized = s.trim().replace(['_', '-'], " ");
        UserType::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| format!("Unknown user type: {}", s.trim()))
    }
}

/// Treat `null` the same as a missing field
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A bug report as stored and listed by the service.
///
/// Records from the wire are tolerated when incomplete: missing or null text
/// fields become empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BugRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BugId>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub module: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub frequency: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,

    /// Raw label from the service; may be absent or unrecognized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl BugRecord {
    /// Confidence as a rounded percentage
    pub fn confidence_percent(&self) -> Option<u32> {
        self.confidence.map(confidence_percent)
    }

    /// The recognized priority tier, if any
    pub fn priority_tier(&self) -> Option<Priority> {
        self.priority.as_deref().and_then(Priority::from_label)
    }

    /// Sort rank of the priority; 0 when missing or unrecognized
    pub fn priority_rank(&self) -> u8 {
        self.priority_tier().map_or(0, Priority::rank)
    }
}

/// Validated payload for `POST /predict`.
///
/// Carries no id, priority or confidence; those come from the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BugSubmission {
    pub title: String,
    pub description: String,
    pub module: BugModule,
    pub frequency: Frequency,
    pub user_type: UserType,
    /// Sent as an empty string when no logs were provided
    #[serde(default)]
    pub logs: String,
}

impl BugSubmission {
    /// Annotate the submission with the service's prediction
    pub fn into_record(self, prediction: Prediction) -> BugRecord {
        BugRecord {
            id: None,
            title: self.title,
            description: self.description,
            module: self.module.to_string(),
            frequency: self.frequency.to_string(),
            user_type: self.user_type.to_string(),
            logs: if self.logs.is_empty() { None } else { Some(self.logs) },
            priority: Some(prediction.priority),
            confidence: prediction.confidence,
        }
    }
}

/// Response of `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub priority: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Prediction {
    /// The recognized priority tier, if any
    pub fn tier(&self) -> Option<Priority> {
        Priority::from_label(&self.priority)
    }

    /// Confidence as a rounded percentage
    pub fn confidence_percent(&self) -> Option<u32> {
        self.confidence.map(confidence_percent)
    }
}

/// Rounded percentage for a 0..1 confidence, clamped to 0..=100
pub fn confidence_percent(confidence: f64) -> u32 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// Response of `GET /bugs`: either a bare array or `{ "bugs": [...] }`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BugListResponse {
    Bare(Vec<BugRecord>),
    Wrapped {
        #[serde(default)]
        bugs: Vec<BugRecord>,
    },
}

impl BugListResponse {
    pub fn into_bugs(self) -> Vec<BugRecord> {
        match self {
            BugListResponse::Bare(bugs) => bugs,
            BugListResponse::Wrapped { bugs } => bugs,
        }
    }
}

/// Response of `GET /health`; the payload shape is up to the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HealthStatus(pub serde_json::Value);

impl HealthStatus {
    /// The `status` field, or the payload itself when it is a bare string
    pub fn status(&self) -> Option<&str> {
        match &self.0 {
            serde_json::Value::String(s) => Some(s),
            other => other.get("status").and_then(|s| s.as_str()),
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status() {
            Some(status) => f.write_str(status),
            None => write!(f, "{}", self.0),
        }
    }
}
