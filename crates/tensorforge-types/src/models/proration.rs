//! Mid-cycle plan-change arithmetic results.

use serde::{Deserialize, Serialize};

/// Cost delta of switching plans partway through a billing period.
///
/// All amounts are minor currency units (INR paise). Computed fresh per
/// request; only the resulting charge or deferral is persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProrationBreakdown {
    /// Whole days between now and the period end, floored at 0.
    pub days_remaining: i64,
    /// Unused credit on the current plan for the remaining days.
    pub unused_amount: i64,
    /// The new plan's price for the same billing interval.
    pub new_price: i64,
    /// `new_price - unused_amount`, floored at 0.
    pub prorated_amount: i64,
    /// Whether the new plan costs more than the current one.
    pub is_upgrade: bool,
}

impl ProrationBreakdown {
    /// True when the unused credit exceeds the new price — the raw delta is
    /// negative and the caller must treat the change as a downgrade with
    /// credit, not a zero-amount charge.
    pub fn is_credit(&self) -> bool {
        self.unused_amount > self.new_price
    }
}
