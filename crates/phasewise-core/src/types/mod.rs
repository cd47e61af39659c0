//! # Core Type Definitions
//!
//! This module contains the shared value types of the Phasewise engine:
//! - Identifiers (`ProjectId`, `ItemId`)
//! - Integer percentages (`Percent`)
//! - Fixed-point money and quantities (`Amount`)
//! - Error types (`PhasewiseError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Use saturating arithmetic so malformed input can never overflow
//! - Round half-up, matching how the dashboard has always displayed figures

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a project in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub u32);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a record inside a section (task, goal, risk, ...).
///
/// Ids are opaque strings. Seeded records use short ids such as `"m1"`,
/// generated ones use `"{prefix}-{unix_millis}"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    /// Create a new item id.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// =============================================================================
// PERCENT
// =============================================================================

/// A completion percentage, always within `0..=100`.
///
/// Values above 100 are clamped on construction, so a `Percent` that exists
/// is always valid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(from = "u32", into = "u8")]
pub struct Percent(u8);

impl Percent {
    /// 0%.
    pub const ZERO: Percent = Percent(0);

    /// 100%.
    pub const FULL: Percent = Percent(100);

    /// Create a percentage, clamping anything above 100.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        if value > 100 { Self(100) } else { Self(value) }
    }

    /// Round-half-up of `100 * completed / total`; 0 when `total` is 0.
    ///
    /// Integer-only equivalent of `Math.round(completed / total * 100)`
    /// for non-negative inputs.
    #[must_use]
    pub fn ratio(completed: usize, total: usize) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        let completed = (completed.min(total)) as u64;
        let total = total as u64;
        let rounded = (completed.saturating_mul(200).saturating_add(total)) / total.saturating_mul(2);
        Self::new(rounded.min(100) as u8)
    }

    /// Round-half-up mean of the given percentages; 0 for an empty input.
    #[must_use]
    pub fn mean(values: impl IntoIterator<Item = Percent>) -> Self {
        let (sum, count) = values
            .into_iter()
            .fold((0u64, 0u64), |(sum, count), p| (sum + p.0 as u64, count + 1));
        if count == 0 {
            return Self::ZERO;
        }
        Self::new(((sum * 2 + count) / (count * 2)).min(100) as u8)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether this is exactly 100%.
    #[must_use]
    pub const fn is_full(self) -> bool {
        self.0 == 100
    }
}

impl From<u32> for Percent {
    fn from(value: u32) -> Self {
        Self::new(value.min(100) as u8)
    }
}

impl From<Percent> for u8 {
    fn from(p: Percent) -> Self {
        p.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// =============================================================================
// AMOUNT (fixed-point, two fractional digits)
// =============================================================================

/// A decimal amount stored as hundredths in an `i64`.
///
/// Used for budget amounts, KPI targets and impact metric values. Parsing
/// is lenient: malformed text becomes zero instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

impl Amount {
    /// Zero.
    pub const ZERO: Amount = Amount(0);

    /// Create from a whole number of units.
    #[must_use]
    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(100))
    }

    /// Create from raw hundredths.
    #[must_use]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    /// Raw hundredths.
    #[must_use]
    pub const fn hundredths(self) -> i64 {
        self.0
    }

    /// Saturating addition.
    #[must_use]
    pub const fn saturating_add(self, other: Amount) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Parse with `parseFloat`-like leniency.
    ///
    /// Leading whitespace is skipped, an optional sign, digits and a
    /// fractional part are read, and anything after the numeric prefix is
    /// ignored. Text without a numeric prefix parses as zero. Digits past
    /// the hundredths round half-up.
    #[must_use]
    pub fn parse_lenient(text: &str) -> Self {
        let mut chars = text.trim_start().chars().peekable();

        let negative = match chars.peek() {
            Some('-') => {
                chars.next();
                true
            }
            Some('+') => {
                chars.next();
                false
            }
            _ => false,
        };

        let mut units: i64 = 0;
        let mut seen_digit = false;
        while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
            units = units.saturating_mul(10).saturating_add(d as i64);
            seen_digit = true;
            chars.next();
        }

        let mut fraction: i64 = 0;
        if chars.peek() == Some(&'.') {
            chars.next();
            let mut position = 0;
            while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                seen_digit = true;
                match position {
                    0 => fraction += d as i64 * 10,
                    1 => fraction += d as i64,
                    2 if d >= 5 => fraction += 1,
                    _ => {}
                }
                position += 1;
                chars.next();
            }
        }

        if !seen_digit {
            return Self::ZERO;
        }

        let magnitude = units.saturating_mul(100).saturating_add(fraction);
        Self(if negative { -magnitude } else { magnitude })
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Amount::saturating_add)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or numeric text")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Ok(Amount::from_units(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount::from_units(i64::try_from(v).unwrap_or(i64::MAX)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        // Through text: keeps the conversion integer-only.
        Ok(Amount::parse_lenient(&v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Ok(Amount::parse_lenient(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Amount, E> {
        Ok(Amount::ZERO)
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Amount, E> {
        Ok(Amount::ZERO)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Phasewise engine.
///
/// Editor operations never fail for an unknown item id; that is a no-op.
/// These errors surface at the boundaries: raw id lookups, rehydration,
/// export and configuration.
#[derive(Debug, Error)]
pub enum PhasewiseError {
    /// No phase has the given numeric id (valid ids are 1 through 6).
    #[error("Phase not found: {0}")]
    PhaseNotFound(u8),

    /// No project has the given id.
    #[error("Project not found: {0}")]
    ProjectNotFound(u32),

    /// The phase has no section with the given key.
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    /// Concept note generation failed.
    #[error("Export failed: {0}")]
    ExportFailed(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// A configuration value was invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for PhasewiseError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_clamps_above_hundred() {
        assert_eq!(Percent::new(250).value(), 100);
        assert_eq!(Percent::from(1000u32).value(), 100);
    }

    #[test]
    fn percent_ratio_rounds_half_up() {
        assert_eq!(Percent::ratio(1, 3).value(), 33);
        assert_eq!(Percent::ratio(2, 3).value(), 67);
        assert_eq!(Percent::ratio(1, 8).value(), 13); // 12.5 -> 13
        assert_eq!(Percent::ratio(0, 0).value(), 0);
        assert_eq!(Percent::ratio(4, 4).value(), 100);
    }

    #[test]
    fn percent_mean_matches_rounded_average() {
        let values = [100, 50, 0, 0, 0, 0].map(Percent::new);
        assert_eq!(Percent::mean(values).value(), 25);
        assert_eq!(Percent::mean([]).value(), 0);
    }

    #[test]
    fn amount_parses_like_parse_float() {
        assert_eq!(Amount::parse_lenient("100"), Amount::from_units(100));
        assert_eq!(Amount::parse_lenient("abc"), Amount::ZERO);
        assert_eq!(Amount::parse_lenient(""), Amount::ZERO);
        assert_eq!(Amount::parse_lenient("12abc"), Amount::from_units(12));
        assert_eq!(Amount::parse_lenient("  7.5"), Amount::from_hundredths(750));
        assert_eq!(Amount::parse_lenient("-3.125"), Amount::from_hundredths(-313));
        assert_eq!(Amount::parse_lenient(".25"), Amount::from_hundredths(25));
        assert_eq!(Amount::parse_lenient("-"), Amount::ZERO);
    }

    #[test]
    fn amount_display_has_two_decimals() {
        assert_eq!(Amount::from_hundredths(12345).to_string(), "123.45");
        assert_eq!(Amount::from_hundredths(-5).to_string(), "-0.05");
    }

    #[test]
    fn amount_deserializes_numbers_and_text() {
        let values: Vec<Amount> =
            serde_json::from_str(r#"[100, "abc", 2.5, "40", null]"#).expect("parse");
        assert_eq!(
            values,
            vec![
                Amount::from_units(100),
                Amount::ZERO,
                Amount::from_hundredths(250),
                Amount::from_units(40),
                Amount::ZERO,
            ]
        );
    }

    #[test]
    fn amount_sum_saturates() {
        let total: Amount = [Amount::from_hundredths(i64::MAX), Amount::from_units(1)]
            .into_iter()
            .sum();
        assert_eq!(total.hundredths(), i64::MAX);
    }
}
