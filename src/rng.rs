use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the uniform draws the simulation needs.
///
/// Placement, colors and direction changes all go through this trait so a
/// run can be replayed from a seed, or scripted exactly in tests.
pub trait RngPolicy {
    /// Uniform integer in `[low, high)`
    fn int_in(&mut self, low: i64, high: i64) -> i64;

    /// Fair coin flip
    fn coin(&mut self) -> bool;
}

impl RngPolicy for StdRng {
    fn int_in(&mut self, low: i64, high: i64) -> i64 {
        self.gen_range(low..high)
    }

    fn coin(&mut self) -> bool {
        self.gen_bool(0.5)
    }
}

/// Build the engine's generator: reproducible when a seed is given, entropy-seeded otherwise
pub fn seeded(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Replays a fixed script of draws. Panics when the script runs dry or a
/// scripted integer falls outside the requested range.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedRng {
    ints: std::collections::VecDeque<i64>,
    coins: std::collections::VecDeque<bool>,
}

#[cfg(test)]
impl ScriptedRng {
    pub fn new(ints: &[i64], coins: &[bool]) -> Self {
        Self {
            ints: ints.iter().copied().collect(),
            coins: coins.iter().copied().collect(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.ints.is_empty() && self.coins.is_empty()
    }
}

#[cfg(test)]
impl RngPolicy for ScriptedRng {
    fn int_in(&mut self, low: i64, high: i64) -> i64 {
        let value = self.ints.pop_front().expect("script ran out of integers");
        assert!(
            (low..high).contains(&value),
            "scripted {} outside [{}, {})",
            value,
            low,
            high
        );
        value
    }

    fn coin(&mut self) -> bool {
        self.coins.pop_front().expect("script ran out of coin flips")
    }
}
