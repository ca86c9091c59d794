//! Static demo data for the campaign and overview views.
//!
//! None of this goes through the Twenty client.

use serde::{Deserialize, Serialize};

/// A marketing campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    /// Channel, e.g. "email", "social", "content", "event".
    #[serde(rename = "type")]
    pub campaign_type: String,
    /// Lifecycle state, e.g. "active" or "draft".
    pub status: String,
    pub budget: u64,
    pub spent: u64,
    pub leads: u64,
    pub conversions: u64,
}

impl Campaign {
    fn new(
        id: &str,
        name: &str,
        campaign_type: &str,
        status: &str,
        (budget, spent, leads, conversions): (u64, u64, u64, u64),
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            campaign_type: campaign_type.to_string(),
            status: status.to_string(),
            budget,
            spent,
            leads,
            conversions,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    /// Conversions per lead in percent, rounded to one decimal.
    /// Zero when there are no leads yet.
    pub fn conversion_rate(&self) -> f64 {
        if self.leads == 0 {
            return 0.0;
        }
        let rate = self.conversions as f64 / self.leads as f64 * 100.0;
        (rate * 10.0).round() / 10.0
    }
}

/// Campaign with its derived conversion rate, as served by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignView {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub conversion_rate: f64,
}

/// Totals across all campaigns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    pub total_budget: u64,
    pub total_spent: u64,
    pub active_campaigns: usize,
    pub total_leads: u64,
}

impl CampaignSummary {
    pub fn from_campaigns(campaigns: &[Campaign]) -> Self {
        Self {
            total_budget: campaigns.iter().map(|c| c.budget).sum(),
            total_spent: campaigns.iter().map(|c| c.spent).sum(),
            active_campaigns: campaigns.iter().filter(|c| c.is_active()).count(),
            total_leads: campaigns.iter().map(|c| c.leads).sum(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignsResponse {
    pub summary: CampaignSummary,
    pub campaigns: Vec<CampaignView>,
}

pub fn campaigns() -> Vec<Campaign> {
    vec![
        Campaign::new("1", "Q1 Email Newsletter", "email", "active", (5000, 3200, 45, 8)),
        Campaign::new("2", "LinkedIn Lead Generation", "social", "active", (3000, 1800, 32, 5)),
        Campaign::new("3", "Content Marketing Push", "content", "draft", (2000, 0, 0, 0)),
    ]
}

pub fn campaigns_response() -> CampaignsResponse {
    let campaigns = campaigns();
    CampaignsResponse {
        summary: CampaignSummary::from_campaigns(&campaigns),
        campaigns: campaigns
            .into_iter()
            .map(|campaign| CampaignView {
                conversion_rate: campaign.conversion_rate(),
                campaign,
            })
            .collect(),
    }
}

/// Headline metric on the overview page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatCard {
    pub label: String,
    pub value: String,
    pub change: String,
    pub positive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickAction {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub stats: Vec<StatCard>,
    pub quick_actions: Vec<QuickAction>,
}

pub fn overview() -> Overview {
    let stat = |label: &str, value: &str, change: &str, positive: bool| StatCard {
        label: label.to_string(),
        value: value.to_string(),
        change: change.to_string(),
        positive,
    };
    let action = |id: &str, name: &str| QuickAction {
        id: id.to_string(),
        name: name.to_string(),
    };

    Overview {
        stats: vec![
            stat("Total Leads", "1,247", "+12%", true),
            stat("Active Projects", "23", "+5%", true),
            stat("Monthly Revenue", "$45,280", "+8%", true),
            stat("Conversion Rate", "12.4%", "-2%", false),
        ],
        quick_actions: vec![
            action("new-lead", "New Lead"),
            action("sync-twenty", "Sync Twenty"),
            action("view-analytics", "Analytics"),
            action("export-data", "Export"),
        ],
    }
}
