//! The estimate sheet: hour matrix, modification tracker, and per-stage
//! risk coefficients, mutated in place by user actions.
//!
//! All mutations follow a "never crash on bad input" contract: invalid or
//! duplicate input makes the operation a silent no-op (the caller may still
//! surface a message), and numeric input is coerced rather than rejected.

use crate::model::{RateTable, StageList};
use crate::money::{Money, Risk};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Stage × role effort grid plus the rate table and stage order it hangs off.
///
/// Invariant: every hour-matrix and tracker entry references a live stage and
/// a live role; deletes cascade synchronously.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateSheet {
    rates: RateTable,
    stages: StageList,
    /// stage → role → hours. Absent entries read as zero.
    hours: BTreeMap<String, BTreeMap<String, u32>>,
    /// Cells the user has explicitly edited (vs. still the AI suggestion).
    /// Display emphasis only; never affects totals.
    modified: BTreeMap<String, BTreeSet<String>>,
    /// Per-stage risk coefficient; absent reads as ×1.0.
    risk: BTreeMap<String, Risk>,
}

impl EstimateSheet {
    /// Coerce free-form numeric input the way a form field does: parse as a
    /// (possibly fractional, possibly signed) number, floor negatives and
    /// garbage to zero, truncate fractions.
    #[must_use]
    pub fn coerce_hours(raw: &str) -> u32 {
        let value: f64 = raw.trim().parse().unwrap_or(0.0);
        if value.is_finite() && value > 0.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                value.min(f64::from(u32::MAX)) as u32
            }
        } else {
            0
        }
    }

    /// Add a role with the given rate and a zero-hour cell for every
    /// existing stage. No-op when the name is empty or duplicate.
    pub fn add_role(&mut self, name: &str, rate: Money) -> bool {
        if !self.rates.insert(name, rate.floor_zero()) {
            return false;
        }
        let name = name.trim();
        for row in self.hours.values_mut() {
            row.insert(name.to_string(), 0);
        }
        tracing::debug!(role = name, "role added");
        true
    }

    /// Remove a role and purge its column from the matrix and tracker.
    pub fn remove_role(&mut self, name: &str) -> bool {
        if !self.rates.remove(name) {
            return false;
        }
        let name = name.trim();
        for row in self.hours.values_mut() {
            row.remove(name);
        }
        for row in self.modified.values_mut() {
            row.remove(name);
        }
        tracing::debug!(role = name, "role removed");
        true
    }

    /// Append a stage with a zero-hour cell for every existing role.
    /// No-op when the name is empty or duplicate.
    pub fn add_stage(&mut self, name: &str) -> bool {
        if !self.stages.push(name) {
            return false;
        }
        let name = name.trim();
        let row: BTreeMap<String, u32> = self
            .rates
            .names()
            .map(|role| (role.to_string(), 0))
            .collect();
        self.hours.insert(name.to_string(), row);
        tracing::debug!(stage = name, "stage added");
        true
    }

    /// Remove a stage and purge its row from the matrix, tracker, and risk
    /// map.
    pub fn remove_stage(&mut self, name: &str) -> bool {
        if !self.stages.remove(name) {
            return false;
        }
        let name = name.trim();
        self.hours.remove(name);
        self.modified.remove(name);
        self.risk.remove(name);
        tracing::debug!(stage = name, "stage removed");
        true
    }

    /// Write an hour cell and mark it user-modified. No-op when the stage or
    /// role does not exist; the UI creates rows/columns before edits.
    pub fn set_hours(&mut self, stage: &str, role: &str, hours: u32) -> bool {
        let stage = stage.trim();
        let role = role.trim();
        if !self.stages.contains(stage) || !self.rates.contains(role) {
            return false;
        }
        self.hours
            .entry(stage.to_string())
            .or_default()
            .insert(role.to_string(), hours);
        self.modified
            .entry(stage.to_string())
            .or_default()
            .insert(role.to_string());
        true
    }

    /// Update an hourly rate. Existing hour cells are untouched.
    pub fn set_rate(&mut self, role: &str, rate: Money) -> bool {
        self.rates.set_rate(role, rate.floor_zero())
    }

    /// Set the risk coefficient of a stage (already clamped by [`Risk`]).
    pub fn set_risk(&mut self, stage: &str, risk: Risk) -> bool {
        let stage = stage.trim();
        if !self.stages.contains(stage) {
            return false;
        }
        if risk.is_baseline() {
            self.risk.remove(stage);
        } else {
            self.risk.insert(stage.to_string(), risk);
        }
        true
    }

    #[must_use]
    pub fn hours(&self, stage: &str, role: &str) -> u32 {
        self.hours
            .get(stage.trim())
            .and_then(|row| row.get(role.trim()))
            .copied()
            .unwrap_or(0)
    }

    /// Whether the user has explicitly edited this cell (vs. the value still
    /// being the AI suggestion).
    #[must_use]
    pub fn is_modified(&self, stage: &str, role: &str) -> bool {
        self.modified
            .get(stage.trim())
            .is_some_and(|row| row.contains(role.trim()))
    }

    #[must_use]
    pub fn risk(&self, stage: &str) -> Risk {
        self.risk.get(stage.trim()).copied().unwrap_or_default()
    }

    #[must_use]
    pub const fn rates(&self) -> &RateTable {
        &self.rates
    }

    #[must_use]
    pub const fn stages(&self) -> &StageList {
        &self.stages
    }

    /// `true` before reconciliation has seeded anything and before any
    /// manual edits.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.rates.is_empty() && self.stages.is_empty()
    }

    /// Seed the sheet wholesale. Used by reconciliation only; resets the
    /// modification tracker (nothing is user-edited yet).
    pub(crate) fn seed(
        &mut self,
        rates: RateTable,
        stages: StageList,
        hours: BTreeMap<String, BTreeMap<String, u32>>,
    ) {
        self.rates = rates;
        self.stages = stages;
        self.hours = hours;
        self.modified.clear();
        self.risk.clear();
    }

    /// The full matrix in wire shape: `{stage: {role: hours}}`, every live
    /// (stage, role) pair present.
    #[must_use]
    pub fn budget_matrix(&self) -> BTreeMap<String, BTreeMap<String, u32>> {
        self.stages
            .iter()
            .map(|stage| {
                let row = self
                    .rates
                    .names()
                    .map(|role| (role.to_string(), self.hours(stage, role)))
                    .collect();
                (stage.to_string(), row)
            })
            .collect()
    }

    /// Rates in wire shape: `{role: whole-unit rate}`.
    #[must_use]
    pub fn rate_map(&self) -> BTreeMap<String, i64> {
        self.rates
            .iter()
            .map(|role| (role.name.clone(), role.rate.whole_units()))
            .collect()
    }
}
