// ============================================================================
// Environment Configuration
// Account parameters and matching policies for one simulation run
// ============================================================================

use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Stop Activation Policy
// ============================================================================

/// When a freshly triggered stop order may execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopActivation {
    /// Check the limit condition on the same tick the stop price is crossed
    #[default]
    SameTick,

    /// Activate on the crossing tick, execute no earlier than the next one
    NextTick,
}

// ============================================================================
// Pending Order Policy
// ============================================================================

/// What happens to orders whose execution keeps getting rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PendingPolicy {
    /// Retry on every tick until the order settles or is cancelled
    #[default]
    RetryForever,

    /// Drop the order from the book after this many rejected attempts
    ExpireAfter(u32),
}

impl PendingPolicy {
    /// Whether an order with `rejections` failed attempts should be dropped
    pub fn should_expire(&self, rejections: u32) -> bool {
        match self {
            PendingPolicy::RetryForever => false,
            PendingPolicy::ExpireAfter(limit) => rejections >= *limit,
        }
    }
}

// ============================================================================
// Complete Environment Configuration
// ============================================================================

/// Everything needed to construct a simulation environment
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnvironmentConfig {
    /// The traded security (e.g., "ETHUSD")
    pub security: String,

    /// Cash available at the start of the run
    pub initial_budget: Decimal,

    /// Units of the security held at the start of the run
    pub initial_volume: Decimal,

    /// Fractional fee charged on both sides, in [0, 1)
    pub fee_rate: Decimal,

    pub stop_activation: StopActivation,

    pub pending_policy: PendingPolicy,
}

impl EnvironmentConfig {
    /// Create a new configuration with required parameters
    pub fn new(
        security: String,
        initial_budget: Decimal,
        initial_volume: Decimal,
        fee_rate: Decimal,
    ) -> Self {
        Self {
            security,
            initial_budget,
            initial_volume,
            fee_rate,
            stop_activation: StopActivation::default(),
            pending_policy: PendingPolicy::default(),
        }
    }

    /// Builder method: Set starting budget
    pub fn with_budget(mut self, budget: Decimal) -> Self {
        self.initial_budget = budget;
        self
    }

    /// Builder method: Set starting held volume
    pub fn with_volume(mut self, volume: Decimal) -> Self {
        self.initial_volume = volume;
        self
    }

    /// Builder method: Set transaction fee rate
    pub fn with_fee_rate(mut self, fee_rate: Decimal) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    /// Builder method: Set stop activation policy
    pub fn with_stop_activation(mut self, policy: StopActivation) -> Self {
        self.stop_activation = policy;
        self
    }

    /// Builder method: Set pending order policy
    pub fn with_pending_policy(mut self, policy: PendingPolicy) -> Self {
        self.pending_policy = policy;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.security.is_empty() {
            return Err("Security cannot be empty".to_string());
        }

        if self.initial_budget < Decimal::ZERO {
            return Err("Initial budget cannot be negative".to_string());
        }

        if self.initial_volume < Decimal::ZERO {
            return Err("Initial volume cannot be negative".to_string());
        }

        if self.fee_rate < Decimal::ZERO || self.fee_rate >= Decimal::ONE {
            return Err("Fee rate must be in [0, 1)".to_string());
        }

        if self.pending_policy == PendingPolicy::ExpireAfter(0) {
            return Err("Pending expiry must allow at least one attempt".to_string());
        }

        Ok(())
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl EnvironmentConfig {
    /// Cash-only account without fees
    pub fn frictionless(security: String, budget: Decimal) -> Self {
        Self::new(security, budget, Decimal::ZERO, Decimal::ZERO)
    }
}
