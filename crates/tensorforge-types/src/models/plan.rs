//! Plan catalog: product tiers and billing intervals.
//!
//! Prices are minor currency units (INR paise) and live here rather than in
//! the database — the catalog is small, versioned with the code, and the
//! desktop clients ship a matching copy.

use serde::{Deserialize, Serialize};

/// Product tier of the Tensorforge desktop suite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlanKey {
    Free,
    DataPro,
    TrainPro,
    DeployPro,
    Enterprise,
}

/// Billing cycle length.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BillingInterval {
    Monthly,
    Yearly,
}

impl PlanKey {
    /// All recognized plan keys, in catalog order.
    pub const ALL: [PlanKey; 5] = [
        PlanKey::Free,
        PlanKey::DataPro,
        PlanKey::TrainPro,
        PlanKey::DeployPro,
        PlanKey::Enterprise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::DataPro => "data_pro",
            Self::TrainPro => "train_pro",
            Self::DeployPro => "deploy_pro",
            Self::Enterprise => "enterprise",
        }
    }

    /// Parse a wire-format plan key (snake_case).
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == s)
    }

    /// Whether this plan can be bought through the self-serve checkout.
    ///
    /// Free has no charge; Enterprise goes through sales.
    pub fn is_purchasable(&self) -> bool {
        !matches!(self, Self::Free | Self::Enterprise)
    }

    /// Price in INR paise for the given interval, `None` for non-purchasable
    /// tiers.
    pub fn price_paise(&self, interval: BillingInterval) -> Option<i64> {
        let monthly = match self {
            Self::Free | Self::Enterprise => return None,
            Self::DataPro => 79_900,
            Self::TrainPro => 149_900,
            Self::DeployPro => 249_900,
        };
        Some(match interval {
            // Yearly is ten months' price: two months free
            BillingInterval::Monthly => monthly,
            BillingInterval::Yearly => monthly * 10,
        })
    }

    /// Identifier of the matching plan registered with the payment provider.
    pub fn provider_plan_id(&self, interval: BillingInterval) -> String {
        format!("plan_tf_{}_{}", self.as_str(), interval.as_str())
    }
}

impl BillingInterval {
    pub const ALL: [BillingInterval; 2] = [BillingInterval::Monthly, BillingInterval::Yearly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|i| i.as_str() == s)
    }

    /// Nominal period length in days, used for proration denominators when a
    /// subscription record lacks explicit period bounds.
    pub fn nominal_days(&self) -> i64 {
        match self {
            Self::Monthly => 30,
            Self::Yearly => 365,
        }
    }
}

impl std::fmt::Display for PlanKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
