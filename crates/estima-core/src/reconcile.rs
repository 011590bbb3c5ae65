//! One-time seeding of the estimate sheet from server-suggested defaults.
//!
//! The AI-suggested matrix is a starting point, not an authority: the sheet
//! adopts it verbatim on the first reconciliation and the user mutates it
//! from there. The suggested snapshot is kept around so the UI can show a
//! signed per-cell delta between "still the AI's guess" and "human edit".

use crate::model::{RateTable, StageList};
use crate::money::Money;
use crate::sheet::EstimateSheet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default rate assigned to suggested roles the lookup table does not know.
pub const FALLBACK_RATE: Money = Money::from_units(2500);

/// Static default-rate lookup, keyed by case-folded role name. Mirrors the
/// staffing roles the backend suggests out of the box.
const DEFAULT_RATES: &[(&str, i64)] = &[
    ("менеджер", 2500),
    ("ml-инженер", 3500),
    ("frontend", 3000),
    ("backend", 3000),
    ("дизайнер", 2800),
    ("аналитик", 2800),
    ("devops", 3200),
    ("qa", 2000),
    ("тестировщик", 2000),
];

/// The server's suggestion payload: stage list, role list, and a sparse
/// stage → role → hours matrix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedEstimate {
    #[serde(default)]
    pub stages: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub hours: BTreeMap<String, BTreeMap<String, u32>>,
}

impl SuggestedEstimate {
    #[must_use]
    pub fn hours_for(&self, stage: &str, role: &str) -> u32 {
        self.hours
            .get(stage.trim())
            .and_then(|row| row.get(role.trim()))
            .copied()
            .unwrap_or(0)
    }
}

/// Resolve the initial rate for a suggested role: config override first,
/// then the static table, then [`FALLBACK_RATE`].
#[must_use]
pub fn default_rate(role: &str, overrides: &BTreeMap<String, Money>) -> Money {
    let key = role.trim().to_lowercase();
    if let Some(rate) = overrides.get(&key) {
        return *rate;
    }
    DEFAULT_RATES
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(FALLBACK_RATE, |(_, units)| Money::from_units(*units))
}

/// Seed the sheet from the suggestion payload.
///
/// Returns `false` (no-op) when the sheet already has stages or roles; the
/// process is idempotent per workflow instance; only a fresh session gets a
/// fresh reconciliation. On success the matrix covers the full Cartesian
/// product of the adopted lists (missing suggestions read as 0) and the
/// modification tracker is all-false.
pub fn reconcile(
    sheet: &mut EstimateSheet,
    suggested: &SuggestedEstimate,
    rate_overrides: &BTreeMap<String, Money>,
) -> bool {
    if !sheet.is_unset() {
        tracing::debug!("sheet already seeded; skipping reconciliation");
        return false;
    }

    let mut rates = RateTable::default();
    for role in &suggested.roles {
        rates.insert(role, default_rate(role, rate_overrides));
    }

    let mut stages = StageList::default();
    for stage in &suggested.stages {
        stages.push(stage);
    }

    let hours: BTreeMap<String, BTreeMap<String, u32>> = stages
        .iter()
        .map(|stage| {
            let row = rates
                .names()
                .map(|role| (role.to_string(), suggested.hours_for(stage, role)))
                .collect();
            (stage.to_string(), row)
        })
        .collect();

    tracing::info!(
        stages = stages.len(),
        roles = rates.len(),
        "adopted suggested estimate"
    );
    sheet.seed(rates, stages, hours);
    true
}

/// A nonzero signed difference between the current matrix and the suggested
/// one for a single cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellDelta {
    pub stage: String,
    pub role: String,
    /// `current - suggested`; positive means the human raised the estimate.
    pub delta: i64,
}

/// Signed per-cell delta for one cell.
#[must_use]
pub fn cell_delta(
    sheet: &EstimateSheet,
    suggested: &SuggestedEstimate,
    stage: &str,
    role: &str,
) -> i64 {
    i64::from(sheet.hours(stage, role)) - i64::from(suggested.hours_for(stage, role))
}

/// All nonzero deltas, in stage order then role order.
#[must_use]
pub fn deltas(sheet: &EstimateSheet, suggested: &SuggestedEstimate) -> Vec<CellDelta> {
    let mut out = Vec::new();
    for stage in sheet.stages().iter() {
        for role in sheet.rates().names() {
            let delta = cell_delta(sheet, suggested, stage, role);
            if delta != 0 {
                out.push(CellDelta {
                    stage: stage.to_string(),
                    role: role.to_string(),
                    delta,
                });
            }
        }
    }
    out
}
