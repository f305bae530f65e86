//! # Engine Configuration
//!
//! Defaults overridable through `SAFAR_*` environment variables.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`SAFAR_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read-only after initialization, so no mutex needed.

use serde::{Deserialize, Serialize};

use safar_core::{Money, DELIVERY_ESTIMATE_DAYS};

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Store name (shown on confirmations and the tracking page).
    pub store_name: String,

    /// Currency code (ISO 4217).
    pub currency_code: String,

    /// Currency symbol (for display).
    pub currency_symbol: String,

    /// Simulated gateway delay in milliseconds.
    pub gateway_delay_ms: u64,

    /// Days after placement used for the retail delivery estimate.
    pub delivery_estimate_days: i64,
}

impl Default for EngineConfig {
    /// Defaults suitable for development.
    fn default() -> Self {
        EngineConfig {
            store_name: "Safar Himalaya".to_string(),
            currency_code: "INR".to_string(),
            currency_symbol: "₹".to_string(),
            gateway_delay_ms: 2000,
            delivery_estimate_days: DELIVERY_ESTIMATE_DAYS,
        }
    }
}

impl EngineConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `SAFAR_STORE_NAME`: Override store name
    /// - `SAFAR_CURRENCY_CODE` / `SAFAR_CURRENCY_SYMBOL`: Currency display
    /// - `SAFAR_GATEWAY_DELAY_MS`: Simulated gateway delay
    /// - `SAFAR_DELIVERY_DAYS`: Retail delivery estimate
    pub fn from_env() -> Self {
        let mut config = EngineConfig::default();

        if let Ok(name) = std::env::var("SAFAR_STORE_NAME") {
            config.store_name = name;
        }
        if let Ok(code) = std::env::var("SAFAR_CURRENCY_CODE") {
            config.currency_code = code;
        }
        if let Ok(symbol) = std::env::var("SAFAR_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }
        if let Ok(delay) = std::env::var("SAFAR_GATEWAY_DELAY_MS") {
            if let Ok(ms) = delay.parse::<u64>() {
                config.gateway_delay_ms = ms;
            }
        }
        if let Ok(days) = std::env::var("SAFAR_DELIVERY_DAYS") {
            if let Ok(days) = days.parse::<i64>() {
                config.delivery_estimate_days = days;
            }
        }

        config
    }

    /// Formats an amount with the configured symbol.
    ///
    /// Debug/log convenience; the frontend owns real locale formatting.
    pub fn format_currency(&self, amount: Money) -> String {
        format!("{}{}", self.currency_symbol, amount.rupees())
    }
}
