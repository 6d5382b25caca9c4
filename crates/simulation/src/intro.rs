//! Intro choreography that precedes steady-state foam.
//!
//! Two pinned hero fluctuations start at opposite horizontal edges and close
//! in on the center, shedding small particle fluctuations as they go. When they
//! have merged the page content is revealed (exactly once), the heroes hold at
//! full amplitude for a while, and finally they are released into the ordinary
//! grow/fade lifecycle.
//!
//! ```text
//! Approaching -> Merging -> Revealing -> Holding -> Steady
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ValueRange;
use crate::fluctuation::{FluctuationId, FluctuationParams, FluctuationPool, Phase};
use crate::sim_rng::FoamRng;
use crate::viewport::GridDims;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    /// Hero movement per tick while approaching (grid units).
    pub approach_step: f32,
    /// Hero movement per tick while merging (grid units).
    pub merge_step: f32,
    /// Gap (fraction of columns) below which approaching becomes merging.
    pub approach_threshold: f32,
    /// Gap (fraction of columns) below which merging becomes revealing.
    pub merge_threshold: f32,
    /// Approach targets sit this fraction of columns either side of center.
    pub approach_target_offset: f32,
    /// Merge targets sit this fraction of columns either side of center.
    pub merge_target_offset: f32,
    pub hold_frames: u32,
    /// Per-hero, per-tick probability of shedding a particle.
    pub particle_chance: f32,
    /// Particles land within this many grid units of their hero.
    pub particle_offset: f32,
    pub particle_amplitude: ValueRange,
    pub particle_sigma: ValueRange,
    pub particle_speed: ValueRange,
    pub hero_amplitude: f32,
    pub hero_sigma: f32,
    pub hero_speed: f32,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            approach_step: 0.25,
            merge_step: 0.08,
            approach_threshold: 0.35,
            merge_threshold: 0.08,
            approach_target_offset: 0.1,
            merge_target_offset: 0.02,
            hold_frames: 150,
            particle_chance: 0.15,
            particle_offset: 1.5,
            particle_amplitude: ValueRange::new(10.0, 25.0),
            particle_sigma: ValueRange::new(0.8, 1.5),
            particle_speed: ValueRange::new(0.02, 0.04),
            hero_amplitude: 120.0,
            hero_sigma: 3.0,
            hero_speed: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntroPhase {
    Approaching,
    Merging,
    Revealing,
    Holding,
    Steady,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Hero {
    id: FluctuationId,
    approach_target: f32,
    merge_target: f32,
}

/// What a single intro step produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntroStep {
    /// The reveal side effect must fire now.
    pub reveal: bool,
}

#[derive(Debug, Clone)]
pub struct IntroSequence {
    config: IntroConfig,
    phase: IntroPhase,
    heroes: [Hero; 2],
    hold_elapsed: u32,
    revealed: bool,
    history: Vec<IntroPhase>,
}

impl IntroSequence {
    /// Insert the two heroes into `pool`. `None` when the pool cannot hold both.
    pub fn begin(config: IntroConfig, pool: &mut FluctuationPool, dims: GridDims) -> Option<Self> {
        if pool.capacity().saturating_sub(pool.len()) < 2 {
            return None;
        }
        let columns = dims.columns as f32;
        let z = dims.rows as f32 / 2.0;
        let params = FluctuationParams {
            max_amplitude: config.hero_amplitude,
            sigma: config.hero_sigma,
            speed: config.hero_speed,
            noise_scale: 1.0,
        };
        let left = pool.spawn_at(0.0, z, params, true)?;
        let right = pool.spawn_at(columns - 1.0, z, params, true)?;
        let heroes = hero_targets(&config, [left, right], dims);
        Some(Self {
            config,
            phase: IntroPhase::Approaching,
            heroes,
            hold_elapsed: 0,
            revealed: false,
            history: vec![IntroPhase::Approaching],
        })
    }

    pub fn config(&self) -> &IntroConfig {
        &self.config
    }

    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    pub fn is_steady(&self) -> bool {
        self.phase == IntroPhase::Steady
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    /// Every phase entered so far, in order.
    pub fn history(&self) -> &[IntroPhase] {
        &self.history
    }

    pub fn hero_ids(&self) -> [FluctuationId; 2] {
        [self.heroes[0].id, self.heroes[1].id]
    }

    /// Horizontal distance between the heroes, if both are still alive.
    pub fn gap(&self, pool: &FluctuationPool) -> Option<f32> {
        let left = pool.get(self.heroes[0].id)?;
        let right = pool.get(self.heroes[1].id)?;
        Some((right.x - left.x).abs())
    }

    /// Advance the choreography one tick. Runs before the pool ages.
    pub fn step(
        &mut self,
        pool: &mut FluctuationPool,
        dims: GridDims,
        rng: &mut FoamRng,
    ) -> IntroStep {
        if self.is_steady() {
            return IntroStep::default();
        }
        if self.gap(pool).is_none() {
            return IntroStep {
                reveal: self.finish(pool),
            };
        }
        self.pin_heroes(pool);

        let columns = dims.columns as f32;
        let mut step = IntroStep::default();
        match self.phase {
            IntroPhase::Approaching => {
                self.move_heroes(pool, self.config.approach_step, |h| h.approach_target);
                self.shed_particles(pool, dims, rng);
                if self.gap_below(pool, self.config.approach_threshold * columns) {
                    self.enter(IntroPhase::Merging);
                }
            }
            IntroPhase::Merging => {
                self.move_heroes(pool, self.config.merge_step, |h| h.merge_target);
                if self.gap_below(pool, self.config.merge_threshold * columns) {
                    self.enter(IntroPhase::Revealing);
                    step.reveal = self.reveal(pool);
                }
            }
            IntroPhase::Revealing => {
                step.reveal = self.reveal(pool);
            }
            IntroPhase::Holding => {
                self.hold_elapsed += 1;
                if self.hold_elapsed >= self.config.hold_frames {
                    self.release(pool);
                }
            }
            IntroPhase::Steady => {}
        }
        step
    }

    /// Follow a grid reallocation: hero positions are mapped proportionally
    /// into the new grid and their targets re-derived, so the gap thresholds
    /// (fractions of the current column count) stay reachable.
    pub fn rescale(&mut self, pool: &mut FluctuationPool, from: GridDims, to: GridDims) {
        let sx = span(to.columns) / span(from.columns);
        let sz = span(to.rows) / span(from.rows);
        for hero in &self.heroes {
            if let Some(f) = pool.get_mut(hero.id) {
                f.x = (f.x * sx).clamp(0.0, span(to.columns));
                f.z = (f.z * sz).clamp(0.0, span(to.rows));
            }
        }
        self.heroes = hero_targets(&self.config, self.hero_ids(), to);
    }

    /// Jump straight to steady state. Returns `true` when the reveal had not
    /// fired yet and must fire now.
    pub fn finish(&mut self, pool: &mut FluctuationPool) -> bool {
        if self.is_steady() {
            return false;
        }
        let reveal = !self.revealed;
        self.revealed = true;
        self.release(pool);
        reveal
    }

    fn enter(&mut self, phase: IntroPhase) {
        bevy::log::debug!("Intro: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.history.push(phase);
    }

    fn gap_below(&self, pool: &FluctuationPool, threshold: f32) -> bool {
        self.gap(pool).is_some_and(|gap| gap < threshold)
    }

    fn pin_heroes(&self, pool: &mut FluctuationPool) {
        for hero in &self.heroes {
            if let Some(f) = pool.get_mut(hero.id) {
                f.pinned = true;
                f.phase = Phase::Growing;
                f.amplitude = f.amplitude.min(f.max_amplitude);
            }
        }
    }

    fn move_heroes(&self, pool: &mut FluctuationPool, step: f32, target: impl Fn(&Hero) -> f32) {
        for hero in &self.heroes {
            if let Some(f) = pool.get_mut(hero.id) {
                let delta = target(hero) - f.x;
                f.x += delta.clamp(-step, step);
            }
        }
    }

    fn shed_particles(&self, pool: &mut FluctuationPool, dims: GridDims, rng: &mut FoamRng) {
        let max_x = (dims.columns as f32 - 1.0).max(0.0);
        let max_z = (dims.rows as f32 - 1.0).max(0.0);
        let offset = self.config.particle_offset.abs();
        for hero in &self.heroes {
            if !rng.chance(self.config.particle_chance) {
                continue;
            }
            let Some((hx, hz)) = pool.get(hero.id).map(|f| (f.x, f.z)) else {
                continue;
            };
            let (dx, dz) = if offset > 0.0 {
                (
                    rng.0.gen_range(-offset..=offset),
                    rng.0.gen_range(-offset..=offset),
                )
            } else {
                (0.0, 0.0)
            };
            let params = FluctuationParams::from_ranges(
                self.config.particle_amplitude,
                self.config.particle_sigma,
                self.config.particle_speed,
                1.0,
                rng,
            );
            pool.spawn_at(
                (hx + dx).clamp(0.0, max_x),
                (hz + dz).clamp(0.0, max_z),
                params,
                false,
            );
        }
    }

    /// Saturate the heroes and fire the reveal once, then hold.
    fn reveal(&mut self, pool: &mut FluctuationPool) -> bool {
        for hero in &self.heroes {
            if let Some(f) = pool.get_mut(hero.id) {
                f.saturate();
            }
        }
        let fire = !self.revealed;
        self.revealed = true;
        self.enter(IntroPhase::Holding);
        fire
    }

    fn release(&mut self, pool: &mut FluctuationPool) {
        for hero in &self.heroes {
            if let Some(f) = pool.get_mut(hero.id) {
                f.pinned = false;
            }
        }
        self.enter(IntroPhase::Steady);
    }
}

/// Largest grid coordinate along an axis of `cells` cells, never zero.
fn span(cells: usize) -> f32 {
    (cells as f32 - 1.0).max(1.0)
}

fn hero_targets(config: &IntroConfig, ids: [FluctuationId; 2], dims: GridDims) -> [Hero; 2] {
    let columns = dims.columns as f32;
    let center = (columns - 1.0) / 2.0;
    [
        Hero {
            id: ids[0],
            approach_target: center - config.approach_target_offset * columns,
            merge_target: center - config.merge_target_offset * columns,
        },
        Hero {
            id: ids[1],
            approach_target: center + config.approach_target_offset * columns,
            merge_target: center + config.merge_target_offset * columns,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until_steady(
        seq: &mut IntroSequence,
        pool: &mut FluctuationPool,
        dims: GridDims,
        rng: &mut FoamRng,
    ) -> u32 {
        let mut reveals = 0;
        for _ in 0..10_000 {
            if seq.step(pool, dims, rng).reveal {
                reveals += 1;
            }
            pool.tick(0.7);
            if seq.is_steady() {
                break;
            }
        }
        reveals
    }

    #[test]
    fn test_begin_places_heroes_at_edges() {
        let dims = GridDims::new(50, 25);
        let mut pool = FluctuationPool::new(8);
        let seq = IntroSequence::begin(IntroConfig::default(), &mut pool, dims).unwrap();
        let [l, r] = seq.hero_ids();
        assert_eq!(pool.get(l).unwrap().x, 0.0);
        assert_eq!(pool.get(r).unwrap().x, 49.0);
        assert!(pool.get(l).unwrap().pinned);
        assert_eq!(seq.phase(), IntroPhase::Approaching);
    }

    #[test]
    fn test_rescale_keeps_intro_reachable_after_shrink() {
        let wide = GridDims::new(40, 23);
        let narrow = GridDims::new(20, 23);
        let mut pool = FluctuationPool::new(8);
        let mut rng = FoamRng::from_seed_u64(9);
        let mut seq = IntroSequence::begin(IntroConfig::default(), &mut pool, wide).unwrap();
        for _ in 0..2 {
            seq.step(&mut pool, wide, &mut rng);
            pool.tick(0.7);
        }
        seq.rescale(&mut pool, wide, narrow);
        let [l, r] = seq.hero_ids();
        assert!(pool.get(l).unwrap().x >= 0.0);
        assert!(pool.get(r).unwrap().x <= 19.0);

        let reveals = run_until_steady(&mut seq, &mut pool, narrow, &mut rng);
        assert_eq!(reveals, 1);
        assert!(seq.is_steady());
    }

    #[test]
    fn test_begin_needs_room_for_both_heroes() {
        let mut pool = FluctuationPool::new(1);
        let seq = IntroSequence::begin(IntroConfig::default(), &mut pool, GridDims::new(10, 10));
        assert!(seq.is_none());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_phases_strictly_sequential_and_reveal_once() {
        let dims = GridDims::new(50, 25);
        let mut pool = FluctuationPool::new(8);
        let mut rng = FoamRng::from_seed_u64(3);
        let mut seq = IntroSequence::begin(IntroConfig::default(), &mut pool, dims).unwrap();
        let reveals = run_until_steady(&mut seq, &mut pool, dims, &mut rng);
        assert_eq!(reveals, 1);
        assert!(seq.revealed());
        assert_eq!(
            seq.history(),
            &[
                IntroPhase::Approaching,
                IntroPhase::Merging,
                IntroPhase::Revealing,
                IntroPhase::Holding,
                IntroPhase::Steady,
            ]
        );
        // Further steps are inert.
        for _ in 0..10 {
            assert!(!seq.step(&mut pool, dims, &mut rng).reveal);
        }
    }

    #[test]
    fn test_heroes_monotonically_approach_targets() {
        let dims = GridDims::new(50, 25);
        let mut pool = FluctuationPool::new(8);
        let mut rng = FoamRng::from_seed_u64(4);
        let mut seq = IntroSequence::begin(IntroConfig::default(), &mut pool, dims).unwrap();
        let mut last_gap = seq.gap(&pool).unwrap();
        while matches!(seq.phase(), IntroPhase::Approaching | IntroPhase::Merging) {
            seq.step(&mut pool, dims, &mut rng);
            pool.tick(0.7);
            let gap = seq.gap(&pool).unwrap();
            assert!(gap <= last_gap, "gap grew from {} to {}", last_gap, gap);
            last_gap = gap;
        }
        assert!(last_gap < 0.08 * 50.0);
    }

    #[test]
    fn test_heroes_pinned_until_steady() {
        let dims = GridDims::new(50, 25);
        let mut pool = FluctuationPool::new(8);
        let mut rng = FoamRng::from_seed_u64(5);
        let mut seq = IntroSequence::begin(IntroConfig::default(), &mut pool, dims).unwrap();
        let ids = seq.hero_ids();
        loop {
            seq.step(&mut pool, dims, &mut rng);
            if seq.is_steady() {
                break;
            }
            pool.tick(0.7);
            for id in ids {
                let f = pool.get(id).expect("hero must survive the intro");
                assert_eq!(f.phase, Phase::Growing);
                assert!(f.amplitude <= f.max_amplitude);
            }
        }
        for id in ids {
            assert!(!pool.get(id).unwrap().pinned);
        }
    }

    #[test]
    fn test_reveal_saturates_heroes_and_holds() {
        let dims = GridDims::new(50, 25);
        let mut pool = FluctuationPool::new(8);
        let mut rng = FoamRng::from_seed_u64(6);
        let config = IntroConfig {
            hold_frames: 5,
            ..Default::default()
        };
        let mut seq = IntroSequence::begin(config, &mut pool, dims).unwrap();
        while seq.phase() != IntroPhase::Holding {
            seq.step(&mut pool, dims, &mut rng);
            if seq.phase() == IntroPhase::Holding {
                for id in seq.hero_ids() {
                    let f = pool.get(id).unwrap();
                    assert_eq!(f.amplitude, f.max_amplitude);
                }
            }
            pool.tick(0.7);
        }
        for _ in 0..4 {
            seq.step(&mut pool, dims, &mut rng);
            assert_eq!(seq.phase(), IntroPhase::Holding);
        }
        seq.step(&mut pool, dims, &mut rng);
        assert_eq!(seq.phase(), IntroPhase::Steady);
    }

    #[test]
    fn test_particles_respect_pool_capacity() {
        let dims = GridDims::new(50, 25);
        let mut pool = FluctuationPool::new(4);
        let mut rng = FoamRng::from_seed_u64(7);
        let config = IntroConfig {
            particle_chance: 1.0,
            ..Default::default()
        };
        let mut seq = IntroSequence::begin(config, &mut pool, dims).unwrap();
        for _ in 0..50 {
            seq.step(&mut pool, dims, &mut rng);
            assert!(pool.len() <= 4);
        }
    }

    #[test]
    fn test_finish_fires_reveal_only_if_pending() {
        let dims = GridDims::new(50, 25);
        let mut pool = FluctuationPool::new(8);
        let mut seq = IntroSequence::begin(IntroConfig::default(), &mut pool, dims).unwrap();
        assert!(seq.finish(&mut pool));
        assert!(seq.is_steady());
        assert!(!seq.finish(&mut pool));
    }

    #[test]
    fn test_lost_heroes_end_intro() {
        let dims = GridDims::new(50, 25);
        let mut pool = FluctuationPool::new(8);
        let mut rng = FoamRng::from_seed_u64(8);
        let mut seq = IntroSequence::begin(IntroConfig::default(), &mut pool, dims).unwrap();
        pool.reset(8);
        assert!(seq.step(&mut pool, dims, &mut rng).reveal);
        assert!(seq.is_steady());
    }

    #[test]
    fn test_single_column_grid_completes() {
        let dims = GridDims::new(1, 1);
        let mut pool = FluctuationPool::new(8);
        let mut rng = FoamRng::from_seed_u64(9);
        let mut seq = IntroSequence::begin(IntroConfig::default(), &mut pool, dims).unwrap();
        let reveals = run_until_steady(&mut seq, &mut pool, dims, &mut rng);
        assert_eq!(reveals, 1);
        assert!(seq.is_steady());
    }
}
