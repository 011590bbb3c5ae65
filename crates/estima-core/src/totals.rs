//! Derived totals over the estimate sheet.
//!
//! Pure and deterministic: recompute after any mutation; there is no cache
//! to invalidate. All sums are exact integer arithmetic (hours as integers,
//! money as cents), so totals are independent of iteration order.

use crate::money::Money;
use crate::sheet::EstimateSheet;
use serde::Serialize;
use std::collections::BTreeMap;

/// Every derived figure the report views need, computed in one pass:
///
/// - `role_hours[r] = Σ_s hours[s][r]`, `role_cost[r] = role_hours[r] × rate[r]`
/// - `stage_hours[s] = Σ_r hours[s][r]`, `stage_cost[s] = Σ_r hours[s][r] × rate[r]`
/// - `stage_cost_with_risk[s] = stage_cost[s] × risk[s]`
/// - grand totals over stages, with and without risk.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub role_hours: BTreeMap<String, u64>,
    pub role_cost: BTreeMap<String, Money>,
    pub stage_hours: BTreeMap<String, u64>,
    pub stage_cost: BTreeMap<String, Money>,
    pub stage_cost_with_risk: BTreeMap<String, Money>,
    pub total_hours: u64,
    pub total_cost: Money,
    pub total_cost_with_risk: Money,
}

/// Compute all totals for the sheet.
#[must_use]
pub fn compute(sheet: &EstimateSheet) -> Totals {
    let mut totals = Totals::default();

    for role in sheet.rates().names() {
        totals.role_hours.insert(role.to_string(), 0);
        totals.role_cost.insert(role.to_string(), Money::ZERO);
    }

    for stage in sheet.stages().iter() {
        let mut stage_hours = 0_u64;
        let mut stage_cost = Money::ZERO;

        for role in sheet.rates().iter() {
            let hours = sheet.hours(stage, &role.name);
            let cost = role.rate.times_hours(hours);

            stage_hours += u64::from(hours);
            stage_cost += cost;

            if let Some(entry) = totals.role_hours.get_mut(&role.name) {
                *entry += u64::from(hours);
            }
            if let Some(entry) = totals.role_cost.get_mut(&role.name) {
                *entry += cost;
            }
        }

        let with_risk = stage_cost.with_risk(sheet.risk(stage));
        totals.stage_hours.insert(stage.to_string(), stage_hours);
        totals.stage_cost.insert(stage.to_string(), stage_cost);
        totals
            .stage_cost_with_risk
            .insert(stage.to_string(), with_risk);

        totals.total_hours += stage_hours;
        totals.total_cost += stage_cost;
        totals.total_cost_with_risk += with_risk;
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::compute;
    use crate::money::{Money, Risk};
    use crate::sheet::EstimateSheet;

    /// Roles {A: 2000, B: 3000}, stages {S1, S2},
    /// matrix S1.A=10, S1.B=5, S2.A=0, S2.B=8.
    fn scenario_sheet() -> EstimateSheet {
        let mut sheet = EstimateSheet::default();
        sheet.add_role("A", Money::from_units(2000));
        sheet.add_role("B", Money::from_units(3000));
        sheet.add_stage("S1");
        sheet.add_stage("S2");
        sheet.set_hours("S1", "A", 10);
        sheet.set_hours("S1", "B", 5);
        sheet.set_hours("S2", "B", 8);
        sheet
    }

    #[test]
    fn reference_scenario() {
        let totals = compute(&scenario_sheet());

        assert_eq!(totals.role_hours["A"], 10);
        assert_eq!(totals.role_hours["B"], 13);
        assert_eq!(totals.stage_hours["S1"], 15);
        assert_eq!(totals.stage_hours["S2"], 8);
        assert_eq!(totals.total_hours, 23);
        // 10*2000 + 5*3000 + 0*2000 + 8*3000 = 59000
        assert_eq!(totals.total_cost, Money::from_units(59_000));
        // No risk set anywhere: with-risk totals coincide.
        assert_eq!(totals.total_cost_with_risk, totals.total_cost);
    }

    #[test]
    fn reference_scenario_with_risk() {
        let mut sheet = scenario_sheet();
        sheet.set_risk("S1", Risk::from_coefficient(1.5));
        let totals = compute(&sheet);

        // (20000 + 15000) * 1.5 = 52500, S2 unchanged at 24000.
        assert_eq!(totals.stage_cost_with_risk["S1"], Money::from_units(52_500));
        assert_eq!(totals.stage_cost_with_risk["S2"], Money::from_units(24_000));
        assert_eq!(totals.total_cost_with_risk, Money::from_units(76_500));
        // Risk never touches hours.
        assert_eq!(totals.total_hours, 23);
    }

    #[test]
    fn removing_a_role_drops_its_outputs_without_touching_others() {
        let mut sheet = scenario_sheet();
        sheet.remove_role("A");
        let totals = compute(&sheet);

        assert!(!totals.role_hours.contains_key("A"));
        assert!(!totals.role_cost.contains_key("A"));
        assert_eq!(totals.role_hours["B"], 13);
        assert_eq!(totals.role_cost["B"], Money::from_units(39_000));
        assert_eq!(totals.total_hours, 13);
    }

    #[test]
    fn empty_sheet_yields_zero_totals() {
        let totals = compute(&EstimateSheet::default());
        assert_eq!(totals.total_hours, 0);
        assert_eq!(totals.total_cost, Money::ZERO);
        assert!(totals.role_hours.is_empty());
        assert!(totals.stage_hours.is_empty());
    }

    #[test]
    fn roles_without_hours_still_appear_with_zeroes() {
        let mut sheet = EstimateSheet::default();
        sheet.add_role("Idle", Money::from_units(5000));
        sheet.add_stage("S1");
        let totals = compute(&sheet);
        assert_eq!(totals.role_hours["Idle"], 0);
        assert_eq!(totals.role_cost["Idle"], Money::ZERO);
    }
}

#[cfg(test)]
mod props {
    use super::compute;
    use crate::money::{Money, Risk};
    use crate::sheet::EstimateSheet;
    use proptest::prelude::*;

    fn arb_sheet() -> impl Strategy<Value = (EstimateSheet, Vec<(usize, usize, u32)>)> {
        // Small grids keep the total within u64/i64 range by construction.
        (1_usize..5, 1_usize..5).prop_flat_map(|(n_stages, n_roles)| {
            let cells = proptest::collection::vec(
                (0..n_stages, 0..n_roles, 0_u32..500),
                0..(n_stages * n_roles),
            );
            let rates = proptest::collection::vec(0_i64..10_000, n_roles);
            (Just(n_stages), rates, cells).prop_map(|(n_stages, rates, cells)| {
                let mut sheet = EstimateSheet::default();
                for (i, rate) in rates.iter().enumerate() {
                    sheet.add_role(&format!("R{i}"), Money::from_units(*rate));
                }
                for s in 0..n_stages {
                    sheet.add_stage(&format!("S{s}"));
                }
                for &(s, r, h) in &cells {
                    sheet.set_hours(&format!("S{s}"), &format!("R{r}"), h);
                }
                (sheet, cells)
            })
        })
    }

    proptest! {
        #[test]
        fn total_hours_equals_sum_of_cells((sheet, _) in arb_sheet()) {
            let totals = compute(&sheet);
            let mut by_cells = 0_u64;
            for stage in sheet.stages().iter() {
                for role in sheet.rates().names() {
                    by_cells += u64::from(sheet.hours(stage, role));
                }
            }
            prop_assert_eq!(totals.total_hours, by_cells);

            let by_roles: u64 = totals.role_hours.values().sum();
            let by_stages: u64 = totals.stage_hours.values().sum();
            prop_assert_eq!(by_roles, by_cells);
            prop_assert_eq!(by_stages, by_cells);
        }

        #[test]
        fn baseline_risk_never_changes_cost((mut sheet, _) in arb_sheet()) {
            for stage in sheet.stages().iter().map(String::from).collect::<Vec<_>>() {
                sheet.set_risk(&stage, Risk::BASELINE);
            }
            let totals = compute(&sheet);
            prop_assert_eq!(totals.total_cost_with_risk, totals.total_cost);
        }

        #[test]
        fn risk_multiplication_is_exact_cents((mut sheet, _) in arb_sheet(), tenths in 10_u8..=20) {
            for stage in sheet.stages().iter().map(String::from).collect::<Vec<_>>() {
                sheet.set_risk(&stage, Risk::from_coefficient(f64::from(tenths) / 10.0));
            }
            let totals = compute(&sheet);
            // Whole-unit rates mean every stage cost is a multiple of 100
            // cents, so cents * tenths is divisible by 10 and the integer
            // division in risk application never truncates.
            let mut expected = 0_i64;
            for stage in sheet.stages().iter() {
                let cents = totals.stage_cost[stage].cents();
                prop_assert_eq!((cents * i64::from(tenths)) % 10, 0);
                expected += cents * i64::from(tenths) / 10;
            }
            prop_assert_eq!(totals.total_cost_with_risk.cents(), expected);
        }
    }
}
