//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the simulation
//! produces identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! The fleet simulation must replay identically from the same commands.
//! Sources of non-determinism include:
//!
//! - **Map iteration order**: Rust's default hasher is randomized.
//!   The registry keeps everything in `BTreeMap`s and ticks in name order.
//!
//! - **Float accumulation**: Positions are `f64`. The same operations in
//!   the same order give the same bits on one machine, so hashes compare
//!   raw bit patterns rather than rounded values.
//!
//! - **System randomness**: The simulation has none.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual behaviours (transport, raids, patrols)
//! 2. **Property tests**: Random inputs must still produce deterministic outputs
//! 3. **Parallel tests**: Running N simulations in parallel all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use fleet_core::simulation::Simulation;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial simulation state
/// * `step` - Function to advance simulation by one tick
/// * `hash` - Function to compute state hash
///
/// # Example
///
/// ```
/// use fleet_test_utils::determinism::verify_determinism;
/// use fleet_test_utils::fixtures::transport_scenario;
///
/// let result = verify_determinism(
///     3,
///     50,
///     transport_scenario,
///     |sim| {
///         sim.tick();
///     },
///     |sim| sim.state_hash(),
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..ticks {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Run a [`Simulation`] twice from the same setup and compare final hashes.
pub fn verify_simulation_determinism<F>(setup_fn: F, num_ticks: u64) -> bool
where
    F: Fn() -> Simulation,
{
    verify_determinism(
        2,
        num_ticks,
        &setup_fn,
        |sim| {
            sim.tick();
        },
        Simulation::state_hash,
    )
    .is_deterministic
}

/// Run N simulations on scoped threads and collect final hashes.
///
/// # Panics
///
/// Panics if a simulation thread panics.
pub fn run_parallel_simulations<F>(setup_fn: F, num_sims: usize, num_ticks: u64) -> DeterminismResult
where
    F: Fn() -> Simulation + Sync,
{
    let hashes: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..num_sims)
            .map(|_| {
                s.spawn(|| {
                    let mut sim = setup_fn();
                    for _ in 0..num_ticks {
                        sim.tick();
                    }
                    sim.state_hash()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("simulation thread panicked"))
            .collect()
    });

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    DeterminismResult {
        is_deterministic,
        hashes,
        ticks: num_ticks,
    }
}

/// Compare two simulation runs tick-by-tick, finding first divergence.
///
/// # Returns
///
/// `None` if simulations are deterministic, `Some(tick)` if they diverge
/// at that tick.
pub fn find_first_divergence<F>(setup_fn: F, num_ticks: u64) -> Option<u64>
where
    F: Fn() -> Simulation,
{
    let mut sim1 = setup_fn();
    let mut sim2 = setup_fn();

    if sim1.state_hash() != sim2.state_hash() {
        return Some(0);
    }

    for tick in 1..=num_ticks {
        sim1.tick();
        sim2.tick();

        if sim1.state_hash() != sim2.state_hash() {
            return Some(tick);
        }
    }

    None
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for fleet inputs.
pub mod strategies {
    use fleet_core::agents::Rank;
    use fleet_core::math::{Point, Vec2, SCALE};
    use fleet_core::spaceship::ShipClass;
    use proptest::prelude::*;

    /// A coordinate in display units, snapped to a 1/1000 grid.
    ///
    /// Range: -50 to 50.
    pub fn arb_coordinate() -> impl Strategy<Value = f64> {
        (-50_000i32..50_000i32).prop_map(|n| f64::from(n) / SCALE)
    }

    /// A point in simulation units.
    pub fn arb_point() -> impl Strategy<Value = Point> {
        (arb_coordinate(), arb_coordinate()).prop_map(|(x, y)| Vec2::scaled(x, y))
    }

    /// A falcon speed in simulation units per tick.
    pub fn arb_speed() -> impl Strategy<Value = f64> {
        (1u32..10_000u32).prop_map(f64::from)
    }

    /// A compass bearing in degrees, including values past a full turn.
    pub fn arb_angle() -> impl Strategy<Value = f64> {
        (0u32..720u32).prop_map(f64::from)
    }

    /// Any crew rank.
    pub fn arb_rank() -> impl Strategy<Value = Rank> {
        prop_oneof![
            Just(Rank::Shipman),
            Just(Rank::Commander),
            Just(Rank::Admiral),
        ]
    }

    /// Any spaceship class.
    pub fn arb_ship_class() -> impl Strategy<Value = ShipClass> {
        prop_oneof![
            Just(ShipClass::Shuttle),
            Just(ShipClass::Bomber),
            Just(ShipClass::Destroyer),
            Just(ShipClass::Falcon),
        ]
    }

    /// Station stock and production rate.
    pub fn arb_station_stock() -> impl Strategy<Value = (u64, u64)> {
        (0u64..100u64, 0u64..10u64)
    }

    /// Health values within the fleet cap.
    pub fn arb_health() -> impl Strategy<Value = u32> {
        1u32..=20u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        at, busy_fleet, crewed_simulation, patrol_scenario, raid_scenario, rocket_scenario,
        transport_scenario,
    };
    use proptest::prelude::*;

    #[test]
    fn test_verify_determinism_simple() {
        let result = verify_determinism(3, 100, || 0u64, |n| *n += 1, |n| *n);

        assert!(result.is_deterministic);
        assert_eq!(result.hashes, vec![100, 100, 100]);
    }

    #[test]
    fn test_unique_hashes_dedups() {
        let result = DeterminismResult {
            is_deterministic: false,
            hashes: vec![3, 1, 3],
            ticks: 1,
        };
        assert_eq!(result.unique_hashes(), vec![1, 3]);
    }

    #[test]
    #[should_panic(expected = "non-deterministic")]
    fn test_assert_deterministic_panics_on_mismatch() {
        let runs = std::cell::Cell::new(0u64);
        verify_determinism(2, 1, || 0u64, |_| {}, |_| {
            runs.set(runs.get() + 1);
            compute_hash(&runs.get())
        })
        .assert_deterministic();
    }

    #[test]
    fn test_empty_simulation_determinism() {
        assert!(verify_simulation_determinism(Simulation::new, 100));
    }

    #[test]
    fn test_scenarios_are_deterministic() {
        assert!(verify_simulation_determinism(transport_scenario, 50));
        assert!(verify_simulation_determinism(raid_scenario, 50));
        assert!(verify_simulation_determinism(patrol_scenario, 50));
        assert!(verify_simulation_determinism(rocket_scenario, 10));
    }

    #[test]
    fn test_find_divergence_on_deterministic_sim() {
        assert!(find_first_divergence(raid_scenario, 100).is_none());
    }

    #[test]
    fn test_parallel_busy_fleets_match() {
        let result = run_parallel_simulations(|| busy_fleet(6), 4, 60);
        result.assert_deterministic();
        assert_eq!(result.hashes.len(), 4);
    }

    #[test]
    fn test_hash_changes_with_state() {
        let mut sim = transport_scenario();
        let before = sim.state_hash();
        sim.tick();
        assert_ne!(before, sim.state_hash());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_falcon_flight_is_deterministic(
            start in strategies::arb_point(),
            angle in strategies::arb_angle(),
            speed in strategies::arb_speed(),
        ) {
            let setup = || {
                let mut sim = crewed_simulation();
                sim.create_falcon("Raptor", start).unwrap();
                sim.set_course("Raptor", angle, Some(speed)).unwrap();
                sim
            };
            prop_assert!(verify_simulation_determinism(setup, 40));
        }

        #[test]
        fn prop_transport_is_deterministic(
            (crystals, rate) in strategies::arb_station_stock(),
            x in strategies::arb_coordinate(),
        ) {
            let setup = || {
                let mut sim = crewed_simulation();
                sim.create_space_station("Mir", at(x, 0.0), crystals, rate).unwrap();
                sim.create_fortress_star("DS", at(0.0, 3.0), 0).unwrap();
                sim.create_shuttle("Mule", "Kirk", at(0.0, 0.0)).unwrap();
                sim.start_transport("Mule", "Mir", "DS").unwrap();
                sim
            };
            prop_assert!(verify_simulation_determinism(setup, 60));
        }
    }

    #[test]
    #[ignore = "Long-running stress test"]
    fn stress_test_parallel_many_simulations() {
        run_parallel_simulations(|| busy_fleet(100), 8, 1000).assert_deterministic();
    }
}
