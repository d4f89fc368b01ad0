use crate::error::{Result, SimError};
use crate::particle::{Bounds, DEFAULT_SPEED, MAX_SPEED};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Interactive limits for the tick interval (milliseconds)
const MIN_TICK_INTERVAL_MS: u64 = 10;
const MAX_TICK_INTERVAL_MS: u64 = 1000;

/// Upper bound for `max_radius`
pub const MAX_RADIUS: u32 = 100_000;

/// Every tunable of a run, with the classic values as defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    // === Container ===
    /// Container width in pixels
    pub width: u32,
    /// Container height in pixels
    pub height: u32,

    // === Population ===
    /// Number of particles, fixed for the lifetime of a run
    pub particle_count: usize,
    /// Radius every particle starts with
    pub initial_radius: u32,

    // === Motion ===
    /// Step length per tick
    pub speed: u32,
    /// Wall-clock time between ticks
    pub tick_interval_ms: u64,

    // === Radius control ===
    pub min_radius: u32,
    pub max_radius: u32,
    /// Amount one grow/shrink command changes the radius by
    pub radius_step: u32,

    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 850,
            particle_count: 1500,
            initial_radius: 8,
            speed: DEFAULT_SPEED,
            tick_interval_ms: 50,
            min_radius: 5,
            max_radius: 50,
            radius_step: 1,
            seed: None,
        }
    }
}

impl SimulationSettings {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Distance from every wall an initial position keeps
    pub fn spawn_margin(&self) -> u32 {
        self.initial_radius.saturating_mul(4)
    }

    /// Reject settings that cannot produce a valid run
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(SimError::InvalidSettings(msg)) };

        if self.width == 0 || self.height == 0 {
            return invalid(format!(
                "container must be non-empty, got {}x{}",
                self.width, self.height
            ));
        }
        if self.speed == 0 || self.speed > MAX_SPEED {
            return invalid(format!(
                "speed must be in [1, {}], got {}",
                MAX_SPEED, self.speed
            ));
        }
        if self.tick_interval_ms == 0 {
            return invalid("tick interval must be at least 1 ms".to_string());
        }
        if self.radius_step == 0 {
            return invalid("radius step must be at least 1".to_string());
        }
        if self.max_radius > MAX_RADIUS {
            return invalid(format!(
                "max radius {} exceeds {}",
                self.max_radius, MAX_RADIUS
            ));
        }
        if self.min_radius > self.max_radius {
            return invalid(format!(
                "min radius {} exceeds max radius {}",
                self.min_radius, self.max_radius
            ));
        }
        if self.initial_radius < self.min_radius || self.initial_radius > self.max_radius {
            return invalid(format!(
                "initial radius {} outside [{}, {}]",
                self.initial_radius, self.min_radius, self.max_radius
            ));
        }

        // Placement range [4r, dim - 4r) must be non-empty on both axes
        let margin = self.spawn_margin() as u64;
        for (axis, dim) in [("width", self.width), ("height", self.height)] {
            if 2 * margin >= dim as u64 {
                return invalid(format!(
                    "{} {} leaves no room to place particles of radius {}",
                    axis, dim, self.initial_radius
                ));
            }
        }

        Ok(())
    }

    /// Adjust tick interval within bounds
    pub fn adjust_tick_interval(&mut self, delta_ms: i64) {
        let new_val = (self.tick_interval_ms as i64 + delta_ms)
            .clamp(MIN_TICK_INTERVAL_MS as i64, MAX_TICK_INTERVAL_MS as i64);
        self.tick_interval_ms = new_val as u64;
    }

    /// Adjust radius step within bounds
    pub fn adjust_radius_step(&mut self, delta: i32) {
        let max_step = self.max_radius.saturating_sub(self.min_radius).max(1) as i64;
        self.radius_step = (self.radius_step as i64 + delta as i64).clamp(1, max_step) as u32;
    }
}
