use crate::color::Rgb;
use crate::rng::RngPolicy;
use serde::{Deserialize, Serialize};

/// Distance traveled per tick when no other speed is configured
pub const DEFAULT_SPEED: u32 = 10;

/// Largest accepted step length; larger values jump the whole container anyway
pub const MAX_SPEED: u32 = 10_000;

/// Reflecting rectangle with its top-left corner at the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Integer displacement applied every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Velocity {
    pub dx: i32,
    pub dy: i32,
}

impl Velocity {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn length_sq(&self) -> i64 {
        let (dx, dy) = (self.dx as i64, self.dy as i64);
        dx * dx + dy * dy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Running,
    Paused,
}

impl RunState {
    pub fn toggled(self) -> Self {
        match self {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RunState::Running => "RUNNING",
            RunState::Paused => "PAUSED",
        }
    }
}

/// Axis-aligned square around a particle, edges included
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    #[inline]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }
}

/// A circle moving in a straight line at constant speed, reflecting off the
/// container walls.
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub velocity: Velocity,
    pub run_state: RunState,
    pub color: Rgb,
    speed: u32,
}

impl Particle {
    /// Create a particle with an explicit velocity (no randomness involved)
    pub fn new(x: f64, y: f64, radius: f64, velocity: Velocity, color: Rgb) -> Self {
        Self {
            x,
            y,
            radius,
            velocity,
            run_state: RunState::Running,
            color,
            speed: DEFAULT_SPEED,
        }
    }

    /// Create a particle heading in a random direction at the given speed
    pub fn spawn<R: RngPolicy + ?Sized>(
        x: f64,
        y: f64,
        radius: f64,
        color: Rgb,
        speed: u32,
        rng: &mut R,
    ) -> Self {
        let mut particle = Self {
            speed,
            ..Self::new(x, y, radius, Velocity::default(), color)
        };
        particle.randomize_direction(rng);
        particle
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Move one tick, reflecting off any wall the move would cross.
    pub fn advance(&mut self, bounds: Bounds) {
        if !self.is_running() {
            return;
        }

        let width = bounds.width as f64;
        let height = bounds.height as f64;
        let r = self.radius;

        // Reflect against the tentative target so the bounce lands this tick
        let tentative_x = self.x + self.velocity.dx as f64;
        if tentative_x + r >= width || tentative_x - r < 0.0 {
            self.velocity.dx = -self.velocity.dx;
        }
        let tentative_y = self.y + self.velocity.dy as f64;
        if tentative_y + r >= height || tentative_y - r < 0.0 {
            self.velocity.dy = -self.velocity.dy;
        }

        let mut next_x = self.x + self.velocity.dx as f64;
        let mut next_y = self.y + self.velocity.dy as f64;

        // Pull back inside; never skipped or particles drift out for good
        if next_x < r {
            next_x = r;
        }
        if next_y < r {
            next_y = r;
        }
        if next_x + r > width {
            next_x = width - r;
        }
        if next_y + r > height {
            next_y = height - r;
        }

        self.x = next_x;
        self.y = next_y;
    }

    /// Pick a new heading whose step length is at most `speed`.
    ///
    /// `dx` is drawn from `[1, speed]` and `dy` is the truncated remainder of
    /// the Pythagorean triangle, then each is negated with probability 1/2.
    /// Truncation means the step can be slightly shorter than `speed`.
    pub fn randomize_direction<R: RngPolicy + ?Sized>(&mut self, rng: &mut R) {
        let speed = self.speed as i64;
        let dx = rng.int_in(1, speed + 1);
        let dy = ((speed * speed - dx * dx) as f64).sqrt() as i64;

        let dx = if rng.coin() { -dx } else { dx };
        let dy = if rng.coin() { -dy } else { dy };

        self.velocity = Velocity::new(dx as i32, dy as i32);
        debug_assert!(self.velocity.length_sq() <= speed * speed);
    }

    /// Callers enforce the allowed radius range.
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    pub fn toggle_run_state(&mut self) {
        self.run_state = self.run_state.toggled();
    }

    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            min_x: self.x - self.radius,
            min_y: self.y - self.radius,
            max_x: self.x + self.radius,
            max_y: self.y + self.radius,
        }
    }

    /// Bounding-square overlap, not circle distance: diagonal neighbors
    /// whose circles do not touch still count.
    #[inline]
    pub fn overlaps(&self, other: &Particle) -> bool {
        self.bounding_box().intersects(&other.bounding_box())
    }
}
