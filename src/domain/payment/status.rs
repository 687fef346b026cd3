//! Canonical payment status and the provider-status normalizer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical four-state payment model all providers normalize into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Database/text representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }

    /// Parses the canonical text form produced by [`as_str`](Self::as_str).
    ///
    /// For provider vocabulary use [`map_provider_status`] instead.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(PaymentStatus::Pending),
            "paid" => Some(PaymentStatus::Paid),
            "failed" => Some(PaymentStatus::Failed),
            "refunded" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a provider status string to the canonical model.
///
/// Total function: unrecognized vocabulary (including the providers'
/// `wait_*` intermediate states) maps to `Pending`, never an error.
pub fn map_provider_status(raw: &str) -> PaymentStatus {
    match raw {
        "success" | "sandbox" => PaymentStatus::Paid,
        "failure" | "error" | "expired" => PaymentStatus::Failed,
        "reversed" => PaymentStatus::Refunded,
        _ => PaymentStatus::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn success_states_map_to_paid() {
        assert_eq!(map_provider_status("success"), PaymentStatus::Paid);
        assert_eq!(map_provider_status("sandbox"), PaymentStatus::Paid);
    }

    #[test]
    fn failure_states_map_to_failed() {
        assert_eq!(map_provider_status("failure"), PaymentStatus::Failed);
        assert_eq!(map_provider_status("error"), PaymentStatus::Failed);
        assert_eq!(map_provider_status("expired"), PaymentStatus::Failed);
    }

    #[test]
    fn reversed_maps_to_refunded() {
        assert_eq!(map_provider_status("reversed"), PaymentStatus::Refunded);
    }

    #[test]
    fn intermediate_states_map_to_pending() {
        assert_eq!(map_provider_status("processing"), PaymentStatus::Pending);
        assert_eq!(map_provider_status("wait_secure"), PaymentStatus::Pending);
        assert_eq!(map_provider_status("wait_accept"), PaymentStatus::Pending);
        assert_eq!(map_provider_status("hold"), PaymentStatus::Pending);
        assert_eq!(map_provider_status("created"), PaymentStatus::Pending);
    }

    #[test]
    fn unknown_vocabulary_maps_to_pending() {
        assert_eq!(map_provider_status(""), PaymentStatus::Pending);
        assert_eq!(map_provider_status("SUCCESS"), PaymentStatus::Pending);
        assert_eq!(map_provider_status("definitely-new"), PaymentStatus::Pending);
    }

    #[test]
    fn parse_inverts_as_str() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(PaymentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PaymentStatus::parse("success"), None);
    }

    proptest! {
        #[test]
        fn normalizer_is_total(raw in ".*") {
            // Must not panic and must land in one of the four states.
            let status = map_provider_status(&raw);
            prop_assert!(matches!(
                status,
                PaymentStatus::Pending
                    | PaymentStatus::Paid
                    | PaymentStatus::Failed
                    | PaymentStatus::Refunded
            ));
        }
    }
}
