use crate::color::Rgb;
use crate::error::Result;
use crate::particle::{Bounds, Particle, RunState};
use crate::rng::{self, RngPolicy};
use crate::settings::SimulationSettings;
use rand::rngs::StdRng;

/// Outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Number of overlapping pairs found after the advance pass
    pub collisions: usize,
}

/// Collision simulation state
pub struct CollisionSimulation<R: RngPolicy = StdRng> {
    bounds: Bounds,
    particles: Vec<Particle>,
    /// Current radius shared by every particle
    radius: u32,
    pub settings: SimulationSettings,
    pub ticks: u64,
    pub last_report: TickReport,
    pub total_collisions: u64,
    rng: R,
}

impl CollisionSimulation<StdRng> {
    /// Build a population from the settings, seeding the generator from
    /// `settings.seed` when one is given.
    pub fn new(settings: SimulationSettings) -> Result<Self> {
        let rng = rng::seeded(settings.seed);
        Self::with_rng(settings, rng)
    }
}

impl<R: RngPolicy> CollisionSimulation<R> {
    /// Validate the settings, then place `particle_count` particles at
    /// random at least four radii away from every wall.
    pub fn with_rng(settings: SimulationSettings, mut rng: R) -> Result<Self> {
        settings.validate()?;

        let particles = spawn_population(&settings, &mut rng);
        log::info!(
            "Spawned {} particles (radius {}) in {}x{} container",
            particles.len(),
            settings.initial_radius,
            settings.width,
            settings.height
        );

        Ok(Self {
            bounds: settings.bounds(),
            particles,
            radius: settings.initial_radius,
            settings,
            ticks: 0,
            last_report: TickReport::default(),
            total_collisions: 0,
            rng,
        })
    }

    /// Wrap an existing population (positions and velocities as given)
    #[cfg(test)]
    pub fn from_particles(
        settings: SimulationSettings,
        particles: Vec<Particle>,
        rng: R,
    ) -> Self {
        let radius = particles
            .first()
            .map(|p| p.radius.round() as u32)
            .unwrap_or(settings.initial_radius);
        Self {
            bounds: settings.bounds(),
            particles,
            radius,
            settings,
            ticks: 0,
            last_report: TickReport::default(),
            total_collisions: 0,
            rng,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Run state of the population, read from the first particle
    pub fn run_state(&self) -> RunState {
        self.particles
            .first()
            .map(|p| p.run_state)
            .unwrap_or_default()
    }

    pub fn is_paused(&self) -> bool {
        self.run_state() == RunState::Paused
    }

    /// Advance every particle, then re-randomize both members of every
    /// overlapping pair.
    pub fn tick(&mut self) -> TickReport {
        let bounds = self.bounds;
        for particle in &mut self.particles {
            particle.advance(bounds);
            assert!(
                particle.x.is_finite() && particle.y.is_finite(),
                "particle left the number line: ({}, {})",
                particle.x,
                particle.y
            );
        }

        // Paused particles still take part: they keep turning while overlapping
        let mut collisions = 0;
        let n = self.particles.len();
        for i in 0..n {
            for j in (i + 1)..n {
                if self.particles[i].overlaps(&self.particles[j]) {
                    self.particles[i].randomize_direction(&mut self.rng);
                    self.particles[j].randomize_direction(&mut self.rng);
                    collisions += 1;
                }
            }
        }

        let report = TickReport { collisions };
        self.ticks += 1;
        self.total_collisions += collisions as u64;
        self.last_report = report;
        log::trace!("tick {}: {} overlapping pairs", self.ticks, collisions);
        report
    }

    /// Set every particle's radius at once
    pub fn set_radius(&mut self, radius: u32) {
        self.radius = radius;
        for particle in &mut self.particles {
            particle.set_radius(radius as f64);
        }
    }

    /// Shrink by one radius step unless that would drop below the minimum.
    /// Returns whether the radius changed.
    pub fn shrink_radius(&mut self) -> bool {
        let step = self.settings.radius_step;
        match self.radius.checked_sub(step) {
            Some(r) if r >= self.settings.min_radius => {
                self.set_radius(r);
                log::debug!("Radius shrunk to {}", r);
                true
            }
            _ => false,
        }
    }

    /// Grow by one radius step unless that would exceed the maximum.
    /// Returns whether the radius changed.
    pub fn grow_radius(&mut self) -> bool {
        let r = self.radius.saturating_add(self.settings.radius_step);
        if r <= self.settings.max_radius {
            self.set_radius(r);
            log::debug!("Radius grown to {}", r);
            true
        } else {
            false
        }
    }

    /// Flip run/pause on every particle
    pub fn toggle_run_state(&mut self) {
        for particle in &mut self.particles {
            particle.toggle_run_state();
        }
        log::debug!("Run state now {}", self.run_state().name());
    }

    /// Replace the population with a fresh one drawn from the same settings
    pub fn reset(&mut self) {
        self.particles = spawn_population(&self.settings, &mut self.rng);
        self.radius = self.settings.initial_radius;
        self.ticks = 0;
        self.total_collisions = 0;
        self.last_report = TickReport::default();
        log::info!("Simulation reset with {} particles", self.particles.len());
    }

    /// Mean overlapping pairs per tick since the start of the run
    pub fn mean_collisions(&self) -> f64 {
        if self.ticks == 0 {
            0.0
        } else {
            self.total_collisions as f64 / self.ticks as f64
        }
    }
}

/// Draw positions, colors and headings for a whole population.
/// Settings must already be validated.
fn spawn_population<R: RngPolicy>(settings: &SimulationSettings, rng: &mut R) -> Vec<Particle> {
    let margin = settings.spawn_margin() as i64;
    let radius = settings.initial_radius as f64;
    let (width, height) = (settings.width as i64, settings.height as i64);

    let mut particles = Vec::with_capacity(settings.particle_count);
    for _ in 0..settings.particle_count {
        let x = rng.int_in(margin, width - margin);
        let y = rng.int_in(margin, height - margin);
        let color = Rgb::random_dark(rng);
        particles.push(Particle::spawn(
            x as f64,
            y as f64,
            radius,
            color,
            settings.speed,
            rng,
        ));
    }
    particles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::particle::Velocity;
    use crate::rng::ScriptedRng;

    fn small_settings(count: usize) -> SimulationSettings {
        SimulationSettings {
            width: 100,
            height: 100,
            particle_count: count,
            initial_radius: 10,
            seed: Some(1),
            ..Default::default()
        }
    }

    fn still(x: f64, y: f64, dx: i32, dy: i32) -> Particle {
        Particle::new(x, y, 10.0, Velocity::new(dx, dy), Rgb::default())
    }

    #[test]
    fn test_initial_placement_respects_margin() {
        let settings = SimulationSettings {
            seed: Some(99),
            ..Default::default()
        };
        let sim = CollisionSimulation::new(settings).unwrap();
        assert_eq!(sim.len(), 1500);
        for p in sim.particles() {
            assert!(p.x >= 32.0 && p.x < 1200.0 - 32.0);
            assert!(p.y >= 32.0 && p.y < 850.0 - 32.0);
            assert_eq!(p.x.fract(), 0.0);
            assert_eq!(p.radius, 8.0);
            assert!(p.velocity.length_sq() <= 100 && p.velocity.dx != 0);
            assert!(p.color.r < 128 && p.color.g < 128 && p.color.b < 128);
            assert!(p.is_running());
        }
    }

    #[test]
    fn test_initialization_draw_order() {
        // x, y, r, g, b, dx magnitude, then the two sign coins
        let rng = ScriptedRng::new(&[45, 50, 1, 2, 3, 6], &[false, true]);
        let sim = CollisionSimulation::with_rng(small_settings(1), rng).unwrap();
        let p = &sim.particles()[0];
        assert_eq!((p.x, p.y), (45.0, 50.0));
        assert_eq!(p.color, Rgb::new(1, 2, 3));
        assert_eq!(p.velocity, Velocity::new(6, -8));
    }

    #[test]
    fn test_degenerate_settings_fail_fast() {
        let settings = SimulationSettings {
            width: 60,
            initial_radius: 8,
            ..small_settings(10)
        };
        let result = CollisionSimulation::new(settings);
        assert!(matches!(result, Err(SimError::InvalidSettings(_))));
    }

    #[test]
    fn test_oversized_speed_fails_fast() {
        let settings = SimulationSettings {
            speed: 50_000,
            particle_count: 5,
            ..Default::default()
        };
        let result = CollisionSimulation::new(settings);
        assert!(matches!(result, Err(SimError::InvalidSettings(_))));
    }

    #[test]
    fn test_max_speed_spawns() {
        let settings = SimulationSettings {
            speed: crate::particle::MAX_SPEED,
            particle_count: 5,
            seed: Some(4),
            ..Default::default()
        };
        let max = crate::particle::MAX_SPEED as i64;
        let sim = CollisionSimulation::new(settings).unwrap();
        for p in sim.particles() {
            assert!(p.velocity.length_sq() <= max * max);
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let settings = SimulationSettings {
            particle_count: 200,
            seed: Some(1234),
            ..Default::default()
        };
        let mut a = CollisionSimulation::new(settings.clone()).unwrap();
        let mut b = CollisionSimulation::new(settings).unwrap();
        for _ in 0..20 {
            assert_eq!(a.tick(), b.tick());
        }
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!((pa.x, pa.y), (pb.x, pb.y));
            assert_eq!(pa.velocity, pb.velocity);
        }
    }

    #[test]
    fn test_overlapping_pair_both_rerandomized() {
        let particles = vec![still(40.0, 50.0, 1, 0), still(60.0, 50.0, -1, 0)];
        // Pair: first gets dx 6 (+,+), second gets dx 8 (-,-)
        let rng = ScriptedRng::new(&[6, 8], &[false, false, true, true]);
        let mut sim = CollisionSimulation::from_particles(small_settings(2), particles, rng);

        let report = sim.tick();
        assert_eq!(report.collisions, 1);
        assert_eq!(sim.particles()[0].velocity, Velocity::new(6, 8));
        assert_eq!(sim.particles()[1].velocity, Velocity::new(-8, -6));
        // Positions come from the advance pass only
        assert_eq!(sim.particles()[0].x, 41.0);
        assert_eq!(sim.particles()[1].x, 59.0);
        assert!(sim.rng.is_exhausted());
    }

    #[test]
    fn test_particle_in_two_pairs_rerandomized_twice() {
        let particles = vec![
            still(20.0, 50.0, 0, 1),
            still(50.0, 50.0, 0, 1),
            still(35.0, 50.0, 0, 1),
        ];
        // Pairs (0,2) and (1,2) overlap; (0,1) are 30 apart and do not
        let rng = ScriptedRng::new(
            &[1, 2, 3, 4],
            &[false, false, false, false, false, false, false, false],
        );
        let mut sim = CollisionSimulation::from_particles(small_settings(3), particles, rng);

        let report = sim.tick();
        assert_eq!(report.collisions, 2);
        assert_eq!(sim.particles()[0].velocity, Velocity::new(1, 9));
        assert_eq!(sim.particles()[1].velocity, Velocity::new(3, 9));
        // Third particle re-randomized once per pair; the last draw wins
        assert_eq!(sim.particles()[2].velocity, Velocity::new(4, 9));
        assert!(sim.rng.is_exhausted());
    }

    #[test]
    fn test_scan_uses_post_advance_positions() {
        // Squares 22 apart before the move, 20 apart (touching) after it
        let particles = vec![still(39.0, 50.0, 1, 0), still(61.0, 50.0, -1, 0)];
        let rng = ScriptedRng::new(&[10, 10], &[false, false, false, false]);
        let mut sim = CollisionSimulation::from_particles(small_settings(2), particles, rng);

        assert_eq!(sim.tick().collisions, 1);
    }

    #[test]
    fn test_separated_particles_untouched() {
        let particles = vec![still(20.0, 20.0, 1, 0), still(70.0, 70.0, -1, 0)];
        let rng = ScriptedRng::new(&[], &[]);
        let mut sim = CollisionSimulation::from_particles(small_settings(2), particles, rng);

        assert_eq!(sim.tick().collisions, 0);
        assert_eq!(sim.particles()[0].velocity, Velocity::new(1, 0));
        assert_eq!(sim.particles()[1].velocity, Velocity::new(-1, 0));
    }

    #[test]
    fn test_paused_particles_still_scanned() {
        let particles = vec![still(45.0, 50.0, 1, 0), still(55.0, 50.0, -1, 0)];
        let rng = ScriptedRng::new(&[10, 10], &[false, false, true, false]);
        let mut sim = CollisionSimulation::from_particles(small_settings(2), particles, rng);
        sim.toggle_run_state();
        assert!(sim.is_paused());

        assert_eq!(sim.tick().collisions, 1);
        assert_eq!(sim.particles()[0].x, 45.0);
        assert_eq!(sim.particles()[1].velocity, Velocity::new(-10, 0));
    }

    #[test]
    fn test_population_stable_and_contained() {
        let settings = SimulationSettings {
            particle_count: 300,
            seed: Some(77),
            ..Default::default()
        };
        let mut sim = CollisionSimulation::new(settings).unwrap();
        let colors: Vec<Rgb> = sim.particles().iter().map(|p| p.color).collect();

        for step in 0..200 {
            if step == 50 {
                for _ in 0..10 {
                    sim.grow_radius();
                }
            }
            sim.tick();
            assert_eq!(sim.len(), 300);
            let r = sim.radius() as f64;
            for p in sim.particles() {
                assert!(p.x >= r && p.x <= 1200.0 - r);
                assert!(p.y >= r && p.y <= 850.0 - r);
                assert!(p.velocity.length_sq() <= 100);
            }
        }

        // Identity by index: colors never move between slots
        let after: Vec<Rgb> = sim.particles().iter().map(|p| p.color).collect();
        assert_eq!(colors, after);
        assert_eq!(sim.ticks, 200);
    }

    #[test]
    fn test_radius_clamped_to_bounds() {
        let mut sim = CollisionSimulation::new(small_settings(5)).unwrap();
        sim.settings.min_radius = 5;
        sim.settings.max_radius = 50;

        for _ in 0..100 {
            sim.shrink_radius();
        }
        assert_eq!(sim.radius(), 5);
        assert!(!sim.shrink_radius());
        assert!(sim.particles().iter().all(|p| p.radius == 5.0));

        for _ in 0..100 {
            sim.grow_radius();
        }
        assert_eq!(sim.radius(), 50);
        assert!(!sim.grow_radius());
        assert!(sim.particles().iter().all(|p| p.radius == 50.0));
    }

    #[test]
    fn test_toggle_run_state_broadcast() {
        let mut sim = CollisionSimulation::new(small_settings(4)).unwrap();
        sim.toggle_run_state();
        assert!(sim.particles().iter().all(|p| !p.is_running()));
        sim.toggle_run_state();
        assert!(sim.particles().iter().all(|p| p.is_running()));
    }

    #[test]
    fn test_reset_restores_initial_radius() {
        let mut sim = CollisionSimulation::new(small_settings(4)).unwrap();
        sim.tick();
        sim.shrink_radius();
        sim.reset();
        assert_eq!(sim.radius(), 10);
        assert_eq!(sim.ticks, 0);
        assert_eq!(sim.len(), 4);
    }

    #[test]
    fn test_empty_population_ticks() {
        let mut sim = CollisionSimulation::new(small_settings(0)).unwrap();
        assert!(sim.is_empty());
        assert_eq!(sim.tick().collisions, 0);
        assert_eq!(sim.mean_collisions(), 0.0);
    }
}
