//! Mid-cycle plan-change arithmetic.
//!
//! An upgrade is charged now for the difference between the new price and the
//! unused credit on the current plan; a downgrade produces a credit and takes
//! effect at the period end. Whether a leftover credit is refunded, carried
//! forward, or forfeited is a product decision the caller owns — this module
//! only reports the numbers.

use chrono::{DateTime, Utc};

use tensorforge_types::{BillingError, PlanKey, ProrationBreakdown, Subscription};

/// Compute the proration for switching from a plan priced `current_price` to
/// one priced `new_price` (both minor units, same billing interval), given
/// the current period bounds.
pub fn compute(
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
    now: DateTime<Utc>,
    current_price: i64,
    new_price: i64,
) -> ProrationBreakdown {
    let total_days = (period_end - period_start).num_days().max(1);
    let days_remaining = (period_end - now).num_days().max(0);

    let unused_amount =
        ((days_remaining as f64 / total_days as f64) * current_price as f64).round() as i64;
    let prorated_amount = (new_price - unused_amount).max(0);

    ProrationBreakdown {
        days_remaining,
        unused_amount,
        new_price,
        prorated_amount,
        is_upgrade: new_price > current_price,
    }
}

/// Proration for moving an existing subscription onto `new_plan`, keeping its
/// billing interval. Prices come from the catalog.
pub fn for_plan_change(
    subscription: &Subscription,
    new_plan: PlanKey,
    now: DateTime<Utc>,
) -> Result<ProrationBreakdown, BillingError> {
    let current_price = chargeable_price(subscription.plan_key, subscription.billing_interval)?;
    let new_price = chargeable_price(new_plan, subscription.billing_interval)?;

    Ok(compute(
        subscription.current_period_start,
        subscription.current_period_end,
        now,
        current_price,
        new_price,
    ))
}

/// Price for proration purposes: Free is a valid zero-cost endpoint of a plan
/// change; Enterprise never moves through self-serve.
fn chargeable_price(
    plan: PlanKey,
    interval: tensorforge_types::BillingInterval,
) -> Result<i64, BillingError> {
    match plan {
        PlanKey::Free => Ok(0),
        PlanKey::Enterprise => {
            Err(BillingError::PlanNotPurchasable { plan: plan.as_str().to_string() })
        }
        other => other
            .price_paise(interval)
            .ok_or_else(|| BillingError::PlanNotPurchasable { plan: other.as_str().to_string() }),
    }
}
