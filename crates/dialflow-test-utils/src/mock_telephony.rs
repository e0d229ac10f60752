// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock call gateway for deterministic testing.
//!
//! `MockTelephony` implements `TelephonyGateway` with a scripted profile
//! list and records every placement so tests can assert on exactly which
//! calls the engine dispatched.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use dialflow_core::types::{CallProviderProfile, CallReceipt};
use dialflow_core::{DialflowError, TelephonyGateway};

/// A single call placement captured by [`MockTelephony`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCall {
    pub profile_id: String,
    pub integration_code: u16,
    pub phone_number: String,
}

/// A mock call gateway with a scripted profile list.
///
/// Every successful placement is appended to an internal log; failure
/// switches let tests exercise the non-fatal dispatch error path.
pub struct MockTelephony {
    profiles: Mutex<Vec<CallProviderProfile>>,
    placed: Mutex<Vec<PlacedCall>>,
    fail_placements: AtomicBool,
    fail_profile_listing: AtomicBool,
}

impl MockTelephony {
    /// Create a mock gateway with the given profiles.
    pub fn with_profiles(profiles: Vec<CallProviderProfile>) -> Self {
        Self {
            profiles: Mutex::new(profiles),
            placed: Mutex::new(Vec::new()),
            fail_placements: AtomicBool::new(false),
            fail_profile_listing: AtomicBool::new(false),
        }
    }

    /// Create a mock gateway with no profiles configured.
    pub fn new() -> Self {
        Self::with_profiles(Vec::new())
    }

    /// Make every subsequent `place_call` fail with a call-request error.
    pub fn fail_placements(&self, fail: bool) {
        self.fail_placements.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `list_profiles` fail with a call-request error.
    pub fn fail_profile_listing(&self, fail: bool) {
        self.fail_profile_listing.store(fail, Ordering::SeqCst);
    }

    /// All placements recorded so far, in dispatch order.
    pub async fn placed_calls(&self) -> Vec<PlacedCall> {
        self.placed.lock().await.clone()
    }

    /// Number of placements recorded so far.
    pub async fn placed_count(&self) -> usize {
        self.placed.lock().await.len()
    }
}

impl Default for MockTelephony {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TelephonyGateway for MockTelephony {
    async fn list_profiles(&self) -> Result<Vec<CallProviderProfile>, DialflowError> {
        if self.fail_profile_listing.load(Ordering::SeqCst) {
            return Err(DialflowError::CallRequest {
                message: "scripted profile listing failure".into(),
                source: None,
            });
        }
        Ok(self.profiles.lock().await.clone())
    }

    async fn place_call(
        &self,
        profile_id: &str,
        integration_code: u16,
        phone_number: &str,
    ) -> Result<CallReceipt, DialflowError> {
        if self.fail_placements.load(Ordering::SeqCst) {
            return Err(DialflowError::CallRequest {
                message: "scripted placement failure".into(),
                source: None,
            });
        }
        let mut placed = self.placed.lock().await;
        placed.push(PlacedCall {
            profile_id: profile_id.to_string(),
            integration_code,
            phone_number: phone_number.to_string(),
        });
        Ok(CallReceipt {
            call_id: format!("mock-call-{}", placed.len()),
            provider_profile_id: profile_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::profile;
    use dialflow_core::types::ProviderKind;

    #[tokio::test]
    async fn placements_are_recorded_in_order() {
        let gateway = MockTelephony::with_profiles(vec![profile(
            "p1",
            ProviderKind::Twilio,
            true,
        )]);
        gateway.place_call("p1", 1, "+15550100").await.unwrap();
        gateway.place_call("p1", 1, "+15550101").await.unwrap();

        let calls = gateway.placed_calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].phone_number, "+15550100");
        assert_eq!(calls[1].phone_number, "+15550101");
    }

    #[tokio::test]
    async fn failure_switch_rejects_placements_without_recording() {
        let gateway = MockTelephony::new();
        gateway.fail_placements(true);
        assert!(gateway.place_call("p1", 1, "+15550100").await.is_err());
        assert_eq!(gateway.placed_count().await, 0);
    }
}
