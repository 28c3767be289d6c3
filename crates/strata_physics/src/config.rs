//! Physics configuration

use serde::{Deserialize, Serialize};

/// Physics world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Enable sleeping for inactive bodies
    pub sleeping_enabled: bool,

    /// Seconds a body must stay below both sleep tolerances before sleeping
    pub time_to_sleep: f32,

    /// Linear velocity threshold for sleeping (m/s)
    pub linear_sleep_tolerance: f32,

    /// Angular velocity threshold for sleeping (rad/s)
    pub angular_sleep_tolerance: f32,

    /// Clear force and torque accumulators after each integration step
    pub auto_clear_forces: bool,

    /// Amount broadphase proxies are fattened by, so small movements do not
    /// resubmit every frame
    pub broadphase_expand: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            sleeping_enabled: true,
            time_to_sleep: 0.2,
            linear_sleep_tolerance: 0.01,
            angular_sleep_tolerance: 2.0f32.to_radians(),
            auto_clear_forces: true,
            broadphase_expand: 0.1,
        }
    }
}

impl PhysicsConfig {
    /// Configuration with sleeping disabled (every dynamic body simulates
    /// every tick)
    pub fn no_sleep() -> Self {
        Self {
            sleeping_enabled: false,
            ..Default::default()
        }
    }

    /// Set the sleep timer
    pub fn with_time_to_sleep(mut self, seconds: f32) -> Self {
        self.time_to_sleep = seconds;
        self
    }

    /// Set the sleep velocity tolerances
    pub fn with_sleep_tolerances(mut self, linear: f32, angular: f32) -> Self {
        self.linear_sleep_tolerance = linear;
        self.angular_sleep_tolerance = angular;
        self
    }

    /// Set the broadphase fattening margin
    pub fn with_broadphase_expand(mut self, margin: f32) -> Self {
        self.broadphase_expand = margin;
        self
    }
}
