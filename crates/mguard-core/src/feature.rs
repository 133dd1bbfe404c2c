//! # Blockable Feature Identifiers
//!
//! The marketing features a blocked gate can switch off. Blocked sets are
//! `BTreeSet<Feature>` everywhere so message rendering and JSON output are
//! deterministic.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::MguardError;

/// A marketing feature that a failing gate may block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// One-off promotional sends to a segment.
    Promotions,
    /// Store-wide broadcast sends.
    Broadcasts,
    /// Paid acquisition campaigns.
    PaidCampaigns,
    /// Offer A/B experiments.
    OfferTests,
}

impl Feature {
    /// Returns the snake_case string identifier for this feature.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Promotions => "promotions",
            Self::Broadcasts => "broadcasts",
            Self::PaidCampaigns => "paid_campaigns",
            Self::OfferTests => "offer_tests",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = MguardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "promotions" => Ok(Self::Promotions),
            "broadcasts" => Ok(Self::Broadcasts),
            "paid_campaigns" => Ok(Self::PaidCampaigns),
            "offer_tests" => Ok(Self::OfferTests),
            other => Err(MguardError::Validation(format!("unknown feature: {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_as_str_roundtrip() {
        for f in [
            Feature::Promotions,
            Feature::Broadcasts,
            Feature::PaidCampaigns,
            Feature::OfferTests,
        ] {
            assert_eq!(f.as_str().parse::<Feature>().unwrap(), f);
        }
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("sms".parse::<Feature>().is_err());
        assert!("".parse::<Feature>().is_err());
    }

    #[test]
    fn test_set_ordering_is_deterministic() {
        let set: BTreeSet<Feature> = [Feature::Promotions, Feature::Broadcasts].into();
        let names: Vec<&str> = set.iter().map(Feature::as_str).collect();
        // BTreeSet iterates in variant declaration order.
        assert_eq!(names, vec!["promotions", "broadcasts"]);
    }

    #[test]
    fn test_serde_format() {
        assert_eq!(
            serde_json::to_string(&Feature::PaidCampaigns).unwrap(),
            "\"paid_campaigns\""
        );
    }
}
