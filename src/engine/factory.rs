// ============================================================================
// Simulation Factory
// Creates simulation environments with proper configuration
// ============================================================================

use crate::domain::config::{EnvironmentConfig, PendingPolicy, StopActivation};
use crate::engine::SimulationEnvironment;
use crate::errors::EnvironmentError;
use crate::interfaces::EventHandler;
use rust_decimal::Decimal;
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a simulation environment from configuration
///
/// # Arguments
/// * `config` - Account parameters and matching policies
/// * `event_handler` - Handler receiving order lifecycle events
///
/// # Returns
/// * `Result<SimulationEnvironment, EnvironmentError>` - Ready-to-run environment or error
///
/// # Example
/// ```
/// use backtest_engine::prelude::*;
/// use backtest_engine::engine::factory::create_from_config;
/// use rust_decimal::Decimal;
/// use std::sync::Arc;
///
/// let config = EnvironmentConfig::frictionless("ETHUSD".to_string(), Decimal::from(1000));
/// let env = create_from_config(config, Arc::new(NoOpEventHandler)).unwrap();
/// assert_eq!(env.account().budget(), Decimal::from(1000));
/// ```
pub fn create_from_config(
    config: EnvironmentConfig,
    event_handler: Arc<dyn EventHandler>,
) -> Result<SimulationEnvironment, EnvironmentError> {
    SimulationEnvironment::new(&config, event_handler)
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for creating simulation environments with fluent API
///
/// # Example
/// ```
/// use backtest_engine::prelude::*;
/// use backtest_engine::engine::factory::SimulationBuilder;
/// use rust_decimal::Decimal;
/// use std::sync::Arc;
///
/// let env = SimulationBuilder::new("SOL")
///     .with_budget(Decimal::from(1000))
///     .with_volume(Decimal::from(50))
///     .with_fee_rate(Decimal::new(5, 3))
///     .next_tick_stops()
///     .expire_pending_after(10)
///     .build(Arc::new(NoOpEventHandler))
///     .unwrap();
///
/// assert_eq!(env.account().held_volume(), Decimal::from(50));
/// ```
pub struct SimulationBuilder {
    config: EnvironmentConfig,
}

impl SimulationBuilder {
    /// Create a new builder for the specified security
    pub fn new(security: impl Into<String>) -> Self {
        Self {
            config: EnvironmentConfig::frictionless(security.into(), Decimal::ZERO),
        }
    }

    // ========================================================================
    // Account Configuration
    // ========================================================================

    /// Set starting budget
    pub fn with_budget(mut self, budget: Decimal) -> Self {
        self.config.initial_budget = budget;
        self
    }

    /// Set starting held volume
    pub fn with_volume(mut self, volume: Decimal) -> Self {
        self.config.initial_volume = volume;
        self
    }

    /// Set fee rate charged on both sides
    pub fn with_fee_rate(mut self, fee_rate: Decimal) -> Self {
        self.config.fee_rate = fee_rate;
        self
    }

    // ========================================================================
    // Matching Policy Configuration
    // ========================================================================

    /// Stops may execute on the tick that triggers them (default)
    pub fn same_tick_stops(mut self) -> Self {
        self.config.stop_activation = StopActivation::SameTick;
        self
    }

    /// Stops execute no earlier than the tick after they trigger
    pub fn next_tick_stops(mut self) -> Self {
        self.config.stop_activation = StopActivation::NextTick;
        self
    }

    /// Retry rejected orders on every tick (default)
    pub fn retry_pending_forever(mut self) -> Self {
        self.config.pending_policy = PendingPolicy::RetryForever;
        self
    }

    /// Drop orders after `attempts` rejected executions
    pub fn expire_pending_after(mut self, attempts: u32) -> Self {
        self.config.pending_policy = PendingPolicy::ExpireAfter(attempts);
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the simulation environment
    pub fn build(
        self,
        event_handler: Arc<dyn EventHandler>,
    ) -> Result<SimulationEnvironment, EnvironmentError> {
        create_from_config(self.config, event_handler)
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &EnvironmentConfig {
        &self.config
    }
}
