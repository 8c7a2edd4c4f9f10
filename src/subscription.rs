use serde::{Deserialize, Serialize};

use crate::config::PREMIUM_STATUSES;

/// Subscription tier as reported by the account service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Plus,
    Trial,
    #[default]
    #[serde(other)]
    Free,
}

impl SubscriptionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionStatus::Free => "free",
            SubscriptionStatus::Plus => "plus",
            SubscriptionStatus::Trial => "trial",
        }
    }

    pub fn is_premium(self) -> bool {
        is_feature_unlocked(self.as_str())
    }
}

/// Static allow-list check on the raw status string.
pub fn is_feature_unlocked(status: &str) -> bool {
    PREMIUM_STATUSES.contains(&status)
}
