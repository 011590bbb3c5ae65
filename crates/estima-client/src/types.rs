//! Wire payloads for the proposal workflow API.
//!
//! Decoding is deliberately tolerant: the backend assembles these objects
//! from LLM output and omits fields freely, so everything optional defaults
//! instead of failing the whole poll.

use estima_core::session::WorkflowStatus;
use estima_core::sheet::EstimateSheet;
use estima_core::SuggestedEstimate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartResponse {
    pub workflow_id: String,
}

/// One snapshot of the workflow's queryable state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub extracted_data: Option<serde_json::Value>,
    #[serde(default)]
    pub final_proposal: Option<String>,
    /// Suggested hours may arrive as floats from the estimator.
    #[serde(default)]
    pub suggested_hours: Option<BTreeMap<String, BTreeMap<String, f64>>>,
    #[serde(default)]
    pub suggested_stages: Option<Vec<String>>,
    #[serde(default)]
    pub suggested_roles: Option<Vec<String>>,
}

impl StatusResponse {
    #[must_use]
    pub fn workflow_status(&self) -> WorkflowStatus {
        WorkflowStatus::from(self.status.clone())
    }

    /// The suggestion payload, when the workflow has produced one. Fractional
    /// or negative hour values coerce to non-negative integers the same way
    /// form input does.
    #[must_use]
    pub fn suggested(&self) -> Option<SuggestedEstimate> {
        let stages = self.suggested_stages.clone()?;
        let roles = self.suggested_roles.clone()?;
        let hours = self
            .suggested_hours
            .as_ref()
            .map(|rows| {
                rows.iter()
                    .map(|(stage, row)| {
                        let row = row
                            .iter()
                            .map(|(role, raw)| (role.clone(), coerce_hours(*raw)))
                            .collect();
                        (stage.clone(), row)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(SuggestedEstimate {
            stages,
            roles,
            hours,
        })
    }
}

fn coerce_hours(raw: f64) -> u32 {
    if raw.is_finite() && raw > 0.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            raw.min(f64::from(u32::MAX)) as u32
        }
    } else {
        0
    }
}

/// The approval signal: edited extraction data plus the final estimate
/// snapshot, `{updated_data, budget: {stage: {role: hours}}, rates}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalRequest {
    pub updated_data: serde_json::Value,
    pub budget: BTreeMap<String, BTreeMap<String, u32>>,
    pub rates: BTreeMap<String, i64>,
}

impl ApprovalRequest {
    #[must_use]
    pub fn new(updated_data: serde_json::Value, sheet: &EstimateSheet) -> Self {
        Self {
            updated_data,
            budget: sheet.budget_matrix(),
            rates: sheet.rate_map(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadRequest {
    pub text: String,
}
