//! Local data served when the Twenty backend cannot be reached.

use crate::models::{AnalyticsSnapshot, Contact, ContactStatus, NewContact, SourceBreakdown};
use chrono::{DateTime, Utc};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

/// The two demo contacts, stamped with `now`.
pub fn contacts(now: DateTime<Utc>) -> Vec<Contact> {
    vec![
        Contact {
            id: "1".to_string(),
            name: "John Smith".to_string(),
            email: "john@techcorp.com".to_string(),
            company: Some("TechCorp Solutions".to_string()),
            status: ContactStatus::Qualified,
            value: Some(Number::from(15000u64)),
            source: Some("website".to_string()),
            phone: Some("+1-555-0123".to_string()),
            position: Some("CTO".to_string()),
            created_at: now,
            updated_at: now,
        },
        Contact {
            id: "2".to_string(),
            name: "Sarah Johnson".to_string(),
            email: "sarah@startup.com".to_string(),
            company: Some("StartupCo".to_string()),
            status: ContactStatus::Proposal,
            value: Some(Number::from(25000u64)),
            source: Some("referral".to_string()),
            phone: Some("+1-555-0124".to_string()),
            position: Some("CEO".to_string()),
            created_at: now,
            updated_at: now,
        },
    ]
}

/// The demo analytics snapshot.
pub fn analytics() -> AnalyticsSnapshot {
    AnalyticsSnapshot {
        total_contacts: 156,
        qualified_leads: 23,
        pipeline_value: Number::from(125000u64),
        conversion_rate: 12.4,
        monthly_growth: 8.5,
        top_sources: vec![
            SourceBreakdown::new("website", 45, 28.8),
            SourceBreakdown::new("referral", 32, 20.5),
            SourceBreakdown::new("cold-call", 28, 17.9),
            SourceBreakdown::new("social-media", 24, 15.4),
            SourceBreakdown::new("other", 27, 17.3),
        ],
    }
}

/// Builds the record returned when a create could not reach the backend.
///
/// Every input field is kept; `id`, `createdAt` and `updatedAt` are set
/// locally. The id is a random UUID v4, so collisions between offline
/// records are negligible but not checked.
pub fn synthesize_contact(input: &NewContact, now: DateTime<Utc>) -> Value {
    let mut record = match serde_json::to_value(input) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    let stamp = to_payload(&now);

    record.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    record.insert("createdAt".to_string(), stamp.clone());
    record.insert("updatedAt".to_string(), stamp);

    Value::Object(record)
}

/// Serializes fallback data into the payload shape the client hands out.
pub(crate) fn to_payload<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        tracing::error!("Failed to serialize fallback data: {}", e);
        Value::Null
    })
}
