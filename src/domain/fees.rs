//! Fee schedules: named percentage deductions for one customer/channel.
//!
//! Labels are not interpreted here; the pricing engine only sums rates.
//! Spreadsheet columns arrive as text with `%` signs and thousands
//! separators, so normalization lives next to the schedule type.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Raw fee cell that could not be normalized into a percentage.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unparsable fee rate: {raw:?}")]
pub struct RateParseError {
    pub raw: String,
}

/// Normalize a textual fee cell into a percent rate.
///
/// Strips `,` and `%`, trims whitespace, then parses as a decimal number.
/// Percent units are preserved: `"3.5%"` normalizes to `3.5`, never `0.035`.
///
/// # Errors
/// Returns [`RateParseError`] when the cleaned text is not a number.
pub fn parse_rate(raw: &str) -> Result<Decimal, RateParseError> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '%').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(RateParseError {
            raw: raw.to_string(),
        });
    }
    Decimal::from_str_canonical(cleaned).map_err(|_| RateParseError {
        raw: raw.to_string(),
    })
}

/// Lenient variant of [`parse_rate`] for spreadsheet ingestion edges:
/// unparsable cells normalize to 0, matching how the upstream sheets have
/// always been read. API request bodies use the strict variant instead.
pub fn parse_rate_or_zero(raw: &str) -> Decimal {
    parse_rate(raw).unwrap_or_else(|_| Decimal::zero())
}

/// Named percentage deductions applicable to one customer/channel.
///
/// Ordered by label so that serialization and totals are deterministic.
/// Zero or more entries; rates are percent units (3.5 means 3.5%).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule(BTreeMap<String, Decimal>);

impl FeeSchedule {
    /// Create an empty schedule.
    pub fn new() -> Self {
        FeeSchedule(BTreeMap::new())
    }

    /// Set the rate for a label, replacing any prior value.
    pub fn set(&mut self, label: impl Into<String>, rate: Decimal) {
        self.0.insert(label.into(), rate);
    }

    /// Builder-style [`FeeSchedule::set`].
    pub fn with(mut self, label: impl Into<String>, rate: Decimal) -> Self {
        self.set(label, rate);
        self
    }

    /// Rate for a label, if present.
    pub fn get(&self, label: &str) -> Option<Decimal> {
        self.0.get(label).copied()
    }

    /// Number of fee entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the schedule has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over (label, rate) pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(label, rate)| (label.as_str(), *rate))
    }

    /// Sum of all rates, in percent units.
    pub fn total_percent(&self) -> Decimal {
        self.0
            .values()
            .fold(Decimal::zero(), |acc, rate| acc + *rate)
    }

    /// Copy of the schedule without the given labels.
    ///
    /// Used for optional fee items the operator has not opted into.
    pub fn without(&self, labels: &[String]) -> Self {
        FeeSchedule(
            self.0
                .iter()
                .filter(|(label, _)| !labels.iter().any(|l| l == *label))
                .map(|(label, rate)| (label.clone(), *rate))
                .collect(),
        )
    }

    /// First entry with a negative rate, if any.
    ///
    /// Negative deductions are data-entry errors and must be rejected
    /// before any price is derived from the schedule.
    pub fn first_negative(&self) -> Option<(&str, Decimal)> {
        self.iter().find(|(_, rate)| rate.is_negative())
    }
}

impl FromIterator<(String, Decimal)> for FeeSchedule {
    fn from_iter<T: IntoIterator<Item = (String, Decimal)>>(iter: T) -> Self {
        FeeSchedule(iter.into_iter().collect())
    }
}
