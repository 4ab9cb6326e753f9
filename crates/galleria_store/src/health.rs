//! Storage usage reporting.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// How close the snapshot is to its budget.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HealthStatus {
    /// Below 80% of budget
    Good,
    /// From 80% up to 90% of budget
    Caution,
    /// At or above 90% of budget
    Warning,
}

impl HealthStatus {
    /// Classify `size_bytes` against `budget_bytes`.
    ///
    /// ```
    /// use galleria_store::HealthStatus;
    ///
    /// assert_eq!(HealthStatus::classify(79, 100), HealthStatus::Good);
    /// assert_eq!(HealthStatus::classify(80, 100), HealthStatus::Caution);
    /// assert_eq!(HealthStatus::classify(90, 100), HealthStatus::Warning);
    /// ```
    pub fn classify(size_bytes: u64, budget_bytes: u64) -> Self {
        if budget_bytes == 0 {
            return Self::Warning;
        }
        // Integer percent thresholds: size/budget >= 0.9  <=>  size * 10 >= budget * 9
        let size = u128::from(size_bytes);
        let budget = u128::from(budget_bytes);
        if size * 10 >= budget * 9 {
            Self::Warning
        } else if size * 10 >= budget * 8 {
            Self::Caution
        } else {
            Self::Good
        }
    }
}

/// Usage snapshot returned by `LocalStore::health_check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct StorageHealth {
    size_bytes: u64,
    item_count: usize,
    budget_bytes: u64,
    status: HealthStatus,
}

impl StorageHealth {
    /// Report for a serialized snapshot of `size_bytes` holding `item_count` records.
    pub fn new(size_bytes: u64, item_count: usize, budget_bytes: u64) -> Self {
        Self {
            size_bytes,
            item_count,
            budget_bytes,
            status: HealthStatus::classify(size_bytes, budget_bytes),
        }
    }

    /// Share of the budget in use, in percent.
    pub fn percent_used(&self) -> f64 {
        if self.budget_bytes == 0 {
            return 100.0;
        }
        self.size_bytes as f64 / self.budget_bytes as f64 * 100.0
    }
}
