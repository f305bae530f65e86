//! # Payment Gateway
//!
//! The pluggable payment-authorization seam.
//!
//! ## Why a Trait?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Payment Gateway Seam                                  │
//! │                                                                         │
//! │  BookingCheckout ──► PaymentGateway::authorize(request)                 │
//! │                            │                                            │
//! │              ┌─────────────┴─────────────┐                              │
//! │              ▼                           ▼                              │
//! │     SimulatedGateway              (a real gateway, later)               │
//! │     fixed delay,                  can decline, can time out             │
//! │     always authorizes                                                   │
//! │                                                                         │
//! │  The state machine never knows which one it is talking to. The         │
//! │  default stub reproduces the storefront's observed behavior: a         │
//! │  fixed artificial delay and unconditional success, no cancellation     │
//! │  once authorization begins, no timeout/retry semantics.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use safar_core::{Money, OrderKind, PaymentMethod};

// =============================================================================
// Request / Response
// =============================================================================

/// What the state machine hands the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationRequest {
    pub order_kind: OrderKind,
    /// Human number of the record being paid for.
    pub number: String,
    pub method: PaymentMethod,
    pub amount: Money,
    /// User-supplied reference for non-cash methods.
    pub transaction_id: Option<String>,
}

/// A successful authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    /// Gateway-side reference for the authorization.
    pub reference: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub authorized_at: DateTime<Utc>,
}

/// Why an authorization did not go through.
///
/// The simulated gateway never produces one of these; the variants exist
/// so a real gateway can be substituted without touching the state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclineReason {
    #[error("payment declined: {0}")]
    Declined(String),

    #[error("payment gateway timed out")]
    Timeout,
}

// =============================================================================
// Gateway Trait
// =============================================================================

/// The authorization seam between checkout and the payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn authorize(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<Confirmation, DeclineReason>;
}

// =============================================================================
// Simulated Gateway
// =============================================================================

/// The default stub: waits a fixed delay, then authorizes unconditionally.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    pub fn new(delay: Duration) -> Self {
        SimulatedGateway { delay }
    }

    /// Zero-delay variant for tests.
    pub fn instant() -> Self {
        SimulatedGateway {
            delay: Duration::ZERO,
        }
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        SimulatedGateway {
            delay: Duration::from_millis(2000),
        }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn authorize(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<Confirmation, DeclineReason> {
        debug!(number = %request.number, amount = %request.amount, "Simulating gateway authorization");
        tokio::time::sleep(self.delay).await;
        Ok(Confirmation {
            reference: format!("SIM-{}", Uuid::new_v4()),
            authorized_at: Utc::now(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AuthorizationRequest {
        AuthorizationRequest {
            order_kind: OrderKind::Property,
            number: "STY-2506-0001".to_string(),
            method: PaymentMethod::Upi,
            amount: Money::from_rupees(3360),
            transaction_id: Some("UPI123".to_string()),
        }
    }

    #[tokio::test]
    async fn test_simulated_gateway_always_authorizes() {
        let gateway = SimulatedGateway::instant();
        let confirmation = gateway.authorize(&request()).await.unwrap();
        assert!(confirmation.reference.starts_with("SIM-"));
    }

    #[tokio::test]
    async fn test_simulated_gateway_waits_its_delay() {
        let gateway = SimulatedGateway::new(Duration::from_millis(50));
        let started = std::time::Instant::now();
        gateway.authorize(&request()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
