// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call dispatch: default-profile resolution and call placement.
//!
//! Dispatch resolves the agent's default provider profile fresh on every
//! call, so a profile change mid-session takes effect on the next dial.

use std::sync::Arc;

use tracing::{debug, info};

use dialflow_core::types::{CallReceipt, CustomerRecord};
use dialflow_core::{DialflowError, TelephonyGateway};

/// Places one outbound call per queue advance.
#[derive(Clone)]
pub struct CallDispatcher {
    gateway: Arc<dyn TelephonyGateway + Send + Sync>,
}

impl CallDispatcher {
    pub fn new(gateway: Arc<dyn TelephonyGateway + Send + Sync>) -> Self {
        Self { gateway }
    }

    /// Dials the record's first phone number through the default profile.
    ///
    /// Errors:
    /// - [`DialflowError::NoDefaultProvider`] when no profile carries the
    ///   default flag; fatal to the session.
    /// - [`DialflowError::CallRequest`] when the listing or placement request
    ///   fails; the session continues past this record.
    pub async fn dial(&self, record: &CustomerRecord) -> Result<CallReceipt, DialflowError> {
        let profiles = self.gateway.list_profiles().await?;
        debug!(profiles = profiles.len(), "resolved provider profiles");

        let Some(default) = profiles.iter().find(|p| p.is_default) else {
            return Err(DialflowError::NoDefaultProvider);
        };

        // Queue admission guarantees at least one number.
        let Some(phone) = record.phone_numbers.first() else {
            return Err(DialflowError::Internal(format!(
                "record {} reached dispatch without a phone number",
                record.id
            )));
        };

        let receipt = self
            .gateway
            .place_call(&default.id, default.kind.integration_code(), phone)
            .await?;

        info!(
            customer = %record.id,
            profile = %default.id,
            provider = %default.kind,
            call = %receipt.call_id,
            "call placed"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialflow_core::types::ProviderKind;
    use dialflow_test_utils::fixtures::{customer, profile};
    use dialflow_test_utils::MockTelephony;

    #[tokio::test]
    async fn dial_uses_default_profile_and_first_number() {
        let gateway = Arc::new(MockTelephony::with_profiles(vec![
            profile("p1", ProviderKind::Twilio, false),
            profile("p2", ProviderKind::RingCentral, true),
        ]));
        let dispatcher = CallDispatcher::new(gateway.clone());

        let record = customer("cus_1", &["+15550100", "+15550199"]);
        dispatcher.dial(&record).await.unwrap();

        let calls = gateway.placed_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].profile_id, "p2");
        assert_eq!(calls[0].integration_code, 5);
        assert_eq!(calls[0].phone_number, "+15550100");
    }

    #[tokio::test]
    async fn missing_default_flag_is_fatal() {
        let gateway = Arc::new(MockTelephony::with_profiles(vec![profile(
            "p1",
            ProviderKind::Plivo,
            false,
        )]));
        let dispatcher = CallDispatcher::new(gateway.clone());

        let err = dispatcher
            .dial(&customer("cus_1", &["+15550100"]))
            .await
            .unwrap_err();
        assert!(matches!(err, DialflowError::NoDefaultProvider));
        assert_eq!(gateway.placed_count().await, 0);
    }

    #[tokio::test]
    async fn empty_profile_list_is_fatal() {
        let gateway = Arc::new(MockTelephony::new());
        let dispatcher = CallDispatcher::new(gateway);

        let err = dispatcher
            .dial(&customer("cus_1", &["+15550100"]))
            .await
            .unwrap_err();
        assert!(matches!(err, DialflowError::NoDefaultProvider));
    }

    #[tokio::test]
    async fn placement_rejection_surfaces_as_call_request() {
        let gateway = Arc::new(MockTelephony::with_profiles(vec![profile(
            "p1",
            ProviderKind::Twilio,
            true,
        )]));
        gateway.fail_placements(true);
        let dispatcher = CallDispatcher::new(gateway);

        let err = dispatcher
            .dial(&customer("cus_1", &["+15550100"]))
            .await
            .unwrap_err();
        assert!(matches!(err, DialflowError::CallRequest { .. }));
    }
}
