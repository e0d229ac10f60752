// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telephony gateway trait for the call-provider backend.

use async_trait::async_trait;

use crate::error::DialflowError;
use crate::types::{CallProviderProfile, CallReceipt};

/// Adapter for the outbound-call provider API.
#[async_trait]
pub trait TelephonyGateway: Send + Sync {
    /// Lists the agent's configured provider profiles.
    async fn list_profiles(&self) -> Result<Vec<CallProviderProfile>, DialflowError>;

    /// Submits a call request for `phone_number` through the given profile.
    ///
    /// `integration_code` is the numeric code from the fixed provider-kind
    /// lookup table. Fails with [`DialflowError::CallRequest`] on rejection.
    async fn place_call(
        &self,
        profile_id: &str,
        integration_code: u16,
        phone_number: &str,
    ) -> Result<CallReceipt, DialflowError>;
}
