//! Policy card click tracking service
//!
//! Parses and validates RecordClick bodies, stamps the click time and
//! writes through [`ClickStore`]. Also serves the aggregated counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use ts_rs::TS;

use crate::errors::{HandbookError, Result};
use crate::storage::{ClickCounter, ClickStore, NewClick};

use super::TS_EXPORT_PATH;

// ============ Request/Response DTOs ============

/// RecordClick body; property names are matched like the browser widget sends them
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordClickRequest {
    #[serde(default, alias = "PolicyId", alias = "policyID")]
    pub policy_id: Option<i64>,
    #[serde(default, alias = "PolicyTitle")]
    pub policy_title: Option<String>,
}

/// Request metadata captured alongside a click
#[derive(Debug, Clone, Default)]
pub struct ClickContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A validated click, ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidClick {
    pub policy_id: i32,
    pub policy_title: Option<String>,
}

/// One entry of GetClickCounts
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct ClickCountResponse {
    pub policy_id: i32,
    pub policy_title: String,
    pub click_count: i32,
    pub first_clicked: DateTime<Utc>,
    pub last_clicked: DateTime<Utc>,
}

impl From<ClickCounter> for ClickCountResponse {
    fn from(model: ClickCounter) -> Self {
        Self {
            policy_id: model.policy_id,
            policy_title: model.policy_title,
            click_count: model.click_count,
            first_clicked: model.first_clicked,
            last_clicked: model.last_clicked,
        }
    }
}

// ============ ClickTrackingService Implementation ============

#[derive(Clone)]
pub struct ClickTrackingService {
    store: ClickStore,
}

impl ClickTrackingService {
    pub fn new(store: ClickStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ClickStore {
        &self.store
    }

    /// Parse and validate a raw RecordClick body
    ///
    /// An empty body or a JSON `null` is "missing"; anything that is not a
    /// JSON object of the expected shape is "invalid".
    pub fn parse_request(body: &[u8]) -> Result<ValidClick> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(HandbookError::validation("Missing request body"));
        }

        let request: Option<RecordClickRequest> = serde_json::from_slice(body)
            .map_err(|e| HandbookError::validation(format!("Invalid request body: {}", e)))?;
        let request = request.ok_or_else(|| HandbookError::validation("Missing request body"))?;

        let policy_id = request
            .policy_id
            .filter(|id| *id > 0)
            .and_then(|id| i32::try_from(id).ok())
            .ok_or_else(|| HandbookError::validation("Invalid policy ID"))?;

        Ok(ValidClick {
            policy_id,
            policy_title: request.policy_title,
        })
    }

    /// Validate and record one click
    pub async fn record_click(&self, body: &[u8], context: ClickContext) -> Result<ValidClick> {
        let click = Self::parse_request(body).inspect_err(|e| {
            debug!("Rejected RecordClick request: {}", e.message());
        })?;

        self.record(click.clone(), context, Utc::now()).await?;
        Ok(click)
    }

    /// Record an already validated click at `clicked_at`
    pub async fn record(
        &self,
        click: ValidClick,
        context: ClickContext,
        clicked_at: DateTime<Utc>,
    ) -> Result<()> {
        let new_click = NewClick {
            policy_id: click.policy_id,
            policy_title: click.policy_title.clone(),
            clicked_at,
            ip_address: context.ip_address,
            user_agent: context.user_agent,
        };

        match self.store.record_click(new_click).await {
            Ok(()) => {
                info!(
                    "Recorded click for policy {}: {}",
                    click.policy_id,
                    click.policy_title.as_deref().unwrap_or("")
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    "Error recording policy click for PolicyId {}: {}",
                    click.policy_id, e
                );
                Err(e)
            }
        }
    }

    /// All counters, most clicked first
    pub async fn click_counts(&self) -> Result<Vec<ClickCountResponse>> {
        let counters = self.store.click_counts().await.inspect_err(|e| {
            error!("Error retrieving policy click counts: {}", e);
        })?;
        Ok(counters.into_iter().map(ClickCountResponse::from).collect())
    }
}
