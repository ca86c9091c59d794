use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;
use std::fmt;

// ============ CRM Models ============

/// Pipeline stage of a contact.
///
/// The backend may send stages this crate does not know about; those are
/// kept verbatim in [`ContactStatus::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContactStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Proposal,
    Won,
    Lost,
    Other(String),
}

impl ContactStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Contacted => "contacted",
            ContactStatus::Qualified => "qualified",
            ContactStatus::Proposal => "proposal",
            ContactStatus::Won => "won",
            ContactStatus::Lost => "lost",
            ContactStatus::Other(s) => s,
        }
    }
}

impl From<String> for ContactStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "new" => ContactStatus::New,
            "contacted" => ContactStatus::Contacted,
            "qualified" => ContactStatus::Qualified,
            "proposal" => ContactStatus::Proposal,
            "won" => ContactStatus::Won,
            "lost" => ContactStatus::Lost,
            _ => ContactStatus::Other(s),
        }
    }
}

impl From<ContactStatus> for String {
    fn from(status: ContactStatus) -> Self {
        match status {
            ContactStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CRM contact as exchanged with the Twenty backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default)]
    pub status: ContactStatus,
    /// Deal value in dollars. Whole amounts stay integers on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a contact that does not exist yet.
///
/// Fields outside the known set are forwarded untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ContactStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl NewContact {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }
}

// ============ Analytics Models ============

/// Point-in-time aggregate of CRM metrics.
///
/// Counts and percentages are taken as supplied; nothing checks that they
/// add up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_contacts: u64,
    pub qualified_leads: u64,
    pub pipeline_value: Number,
    /// Percent, e.g. `12.4`.
    pub conversion_rate: f64,
    /// Month-over-month growth in percent.
    pub monthly_growth: f64,
    #[serde(default)]
    pub top_sources: Vec<SourceBreakdown>,
}

/// Lead count for one acquisition channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceBreakdown {
    pub source: String,
    pub count: u64,
    pub percentage: f64,
}

impl SourceBreakdown {
    pub fn new(source: &str, count: u64, percentage: f64) -> Self {
        Self {
            source: source.to_string(),
            count,
            percentage,
        }
    }
}

// ============ Project Models ============

/// Kind of work a Huly task represents, read from `custom_fields.task_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    SeoAudit,
    SocialAudit,
    TechnicalAudit,
    ContentAnalysis,
    StrategyReport,
    CampaignManagement,
    ClientRelationship,
    AnalyticsReport,
    ContentCreation,
}

impl TaskType {
    /// The audit and report types counted in a progress summary.
    pub const SPECIALTIES: [TaskType; 5] = [
        TaskType::SeoAudit,
        TaskType::SocialAudit,
        TaskType::TechnicalAudit,
        TaskType::ContentAnalysis,
        TaskType::StrategyReport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::SeoAudit => "seo_audit",
            TaskType::SocialAudit => "social_audit",
            TaskType::TechnicalAudit => "technical_audit",
            TaskType::ContentAnalysis => "content_analysis",
            TaskType::StrategyReport => "strategy_report",
            TaskType::CampaignManagement => "campaign_management",
            TaskType::ClientRelationship => "client_relationship",
            TaskType::AnalyticsReport => "analytics_report",
            TaskType::ContentCreation => "content_creation",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads `custom_fields.<key>` from a Huly project or task as a string.
pub fn custom_field<'a>(record: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    record.get("custom_fields")?.get(key)?.as_str()
}

/// Progress of one Huly project, computed from the project and its tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectProgress {
    pub project_id: String,
    pub project_name: Option<String>,
    pub brand: String,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub in_progress_tasks: usize,
    pub pending_tasks: usize,
    /// Completed share in percent, one decimal; `0` for a project with no tasks.
    pub progress_percentage: f64,
    pub client_url: Option<String>,
    pub last_updated: DateTime<Utc>,
    /// Task count per specialty, keyed by the wire name of the type.
    pub tiny_sumo_specialties: BTreeMap<String, usize>,
    /// `custom_fields.custom_tool` of every task that names one, in task order.
    pub custom_tools_used: Vec<String>,
}

impl ProjectProgress {
    pub fn from_tasks(
        project_id: &str,
        project: &serde_json::Value,
        tasks: &[serde_json::Value],
        now: DateTime<Utc>,
    ) -> Self {
        let with_status =
            |status: &str| tasks.iter().filter(|t| t["status"] == status).count();
        let completed_tasks = with_status("completed");

        let progress_percentage = if tasks.is_empty() {
            0.0
        } else {
            (completed_tasks as f64 / tasks.len() as f64 * 1000.0).round() / 10.0
        };

        let tiny_sumo_specialties = TaskType::SPECIALTIES
            .iter()
            .map(|kind| {
                let count = tasks
                    .iter()
                    .filter(|t| custom_field(t, "task_type") == Some(kind.as_str()))
                    .count();
                (kind.as_str().to_string(), count)
            })
            .collect();

        Self {
            project_id: project_id.to_string(),
            project_name: project["name"].as_str().map(str::to_string),
            brand: "tiny_sumo".to_string(),
            total_tasks: tasks.len(),
            completed_tasks,
            in_progress_tasks: with_status("in_progress"),
            pending_tasks: with_status("pending"),
            progress_percentage,
            client_url: custom_field(project, "client_url").map(str::to_string),
            last_updated: now,
            tiny_sumo_specialties,
            custom_tools_used: tasks
                .iter()
                .filter_map(|t| custom_field(t, "custom_tool"))
                .filter(|tool| !tool.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

// ============ API Response Models ============

/// Envelope returned by the dashboard API for client-backed data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse {
    pub data: serde_json::Value,
    /// `true` when `data` is local fallback data rather than the backend's.
    pub fallback: bool,
}

/// Result of the "Sync with Twenty" action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    pub synced: bool,
    pub fallback: bool,
    pub count: usize,
}
