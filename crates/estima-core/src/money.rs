//! Exact money and risk-coefficient arithmetic.
//!
//! Currency totals are summed many times over a stage × role grid, so they
//! are kept in integer minor units (cents) end to end. Hourly rates enter
//! the system as whole currency units, which makes every cost a multiple of
//! 100 cents, and that in turn makes risk multiplication (tenths) exact.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// An amount of money in integer cents.
///
/// Serializes as raw cents; convert with [`Money::whole_units`] when a wire
/// format or display wants whole currency units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);

    /// Build from whole currency units (e.g. an hourly rate of 2500).
    #[must_use]
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Whole currency units, truncating any cent remainder.
    #[must_use]
    pub const fn whole_units(self) -> i64 {
        self.0 / 100
    }

    /// Floor at zero. Rates may not be negative.
    #[must_use]
    pub const fn floor_zero(self) -> Self {
        if self.0 < 0 { Self::ZERO } else { self }
    }

    /// Cost of `hours` at this hourly rate.
    #[must_use]
    pub const fn times_hours(self, hours: u32) -> Self {
        Self(self.0 * hours as i64)
    }

    /// Apply a risk coefficient.
    ///
    /// Exact whenever the amount is a multiple of 100 cents, which holds for
    /// every cost derived from whole-unit hourly rates.
    #[must_use]
    pub const fn with_risk(self, risk: Risk) -> Self {
        Self(self.0 * risk.tenths() as i64 / 10)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = self.0 / 100;
        let cents = (self.0 % 100).abs();
        if cents == 0 {
            write!(f, "{units}")
        } else {
            write!(f, "{units}.{cents:02}")
        }
    }
}

/// Per-stage cost multiplier in `[1.0, 2.0]`, step `0.1`.
///
/// Stored as integer tenths (`10` = ×1.0 … `20` = ×2.0) so that applying it
/// to cent-denominated cost stays in integer arithmetic. Values outside the
/// range clamp on construction and on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Risk(u8);

impl Risk {
    pub const BASELINE: Self = Self(10);
    pub const MAX: Self = Self(20);

    /// Clamp an arbitrary coefficient to the valid range, rounding to the
    /// nearest tenth. Non-finite input falls back to the baseline.
    #[must_use]
    pub fn from_coefficient(value: f64) -> Self {
        if !value.is_finite() {
            return Self::BASELINE;
        }
        let tenths = (value * 10.0).round().clamp(10.0, 20.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self(tenths as u8)
    }

    #[must_use]
    pub const fn tenths(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn coefficient(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    /// `true` for the default ×1.0 multiplier.
    #[must_use]
    pub const fn is_baseline(self) -> bool {
        self.0 == 10
    }
}

impl Default for Risk {
    fn default() -> Self {
        Self::BASELINE
    }
}

impl From<f64> for Risk {
    fn from(value: f64) -> Self {
        Self::from_coefficient(value)
    }
}

impl From<Risk> for f64 {
    fn from(risk: Risk) -> Self {
        risk.coefficient()
    }
}

impl fmt::Display for Risk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\u{d7}{:.1}", self.coefficient())
    }
}

#[cfg(test)]
mod tests {
    use super::{Money, Risk};

    #[test]
    fn money_units_roundtrip() {
        let rate = Money::from_units(2500);
        assert_eq!(rate.cents(), 250_000);
        assert_eq!(rate.whole_units(), 2500);
        assert_eq!(rate.to_string(), "2500");
    }

    #[test]
    fn cost_arithmetic_is_exact() {
        let rate = Money::from_units(3000);
        let cost = rate.times_hours(13);
        assert_eq!(cost.whole_units(), 39_000);

        // 39000 × 1.3 = 50700, no drift.
        let risky = cost.with_risk(Risk::from_coefficient(1.3));
        assert_eq!(risky.whole_units(), 50_700);
        assert_eq!(risky.cents() % 100, 0);
    }

    #[test]
    fn baseline_risk_is_identity() {
        let cost = Money::from_units(333);
        assert_eq!(cost.with_risk(Risk::BASELINE), cost);
    }

    #[test]
    fn risk_clamps_and_rounds() {
        assert_eq!(Risk::from_coefficient(0.5), Risk::BASELINE);
        assert_eq!(Risk::from_coefficient(3.0), Risk::MAX);
        assert_eq!(Risk::from_coefficient(1.25).tenths(), 13);
        assert_eq!(Risk::from_coefficient(f64::NAN), Risk::BASELINE);
    }

    #[test]
    fn risk_display_matches_ui_chip() {
        assert_eq!(Risk::from_coefficient(1.5).to_string(), "\u{d7}1.5");
    }

    #[test]
    fn money_sum_over_iterator() {
        let total: Money = [Money::from_units(1), Money::from_units(2)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_units(3));
    }

    #[test]
    fn money_display_with_cents() {
        assert_eq!(Money::from_cents(1050).to_string(), "10.50");
    }
}
