//! The per-turn orchestrator.
//!
//! [`TurnEngine::run_turn`] drives one full turn against the external
//! game engine: `Sense → RefreshGlobalFields → ClearCache →
//! DecisionLoop`, where each loop iteration runs healer decisions first,
//! then every other class, then the cross-agent coordination passes,
//! then the auction, then re-senses — until a full pass commits nothing
//! new or the defensive iteration cap is hit.

use crate::auction::Auction;
use crate::behavior;
use crate::config::{ConfigError, EngineConfig};
use crate::coordination;
use crate::fields::GlobalFields;
use crate::kernels::KernelSet;
use crate::metrics::TurnMetrics;
use indexmap::IndexMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skirm_core::{AgentClass, AgentId, Cell, GameEngine, Side, WorldSnapshot};
use skirm_field::FieldCache;
use skirm_path::Pathfinder;
use std::time::Instant;

/// How much work the remaining turn time allows.
///
/// Polled between agents, never preemptively: a search that has started
/// always finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TimeMode {
    /// Plenty of time: full decisions.
    Full,
    /// Low: skip search-driven movement, keep cheap actions.
    SkipSearch,
    /// Very low: mandatory minimal actions only.
    Minimal,
}

/// The tactical decision engine for one game.
///
/// Owns every piece of per-turn state — fields, cache, pathfinder,
/// auction, RNG — as plain members, so engines can be constructed
/// independently per test or per game with no shared statics.
pub struct TurnEngine {
    pub(crate) config: EngineConfig,
    pub(crate) kernels: KernelSet,
    pub(crate) fields: GlobalFields,
    pub(crate) cache: FieldCache,
    pub(crate) pathfinder: Pathfinder,
    pub(crate) auction: Auction,
    pub(crate) rng: ChaCha8Rng,
    /// Boarding claims for this turn: unit → transport.
    pub(crate) boarding: IndexMap<AgentId, AgentId>,
    /// Enemy positions captured at the first sense; combat targets keep
    /// a faint pull toward them even with no enemy in sight.
    pub(crate) enemy_origins: Vec<Cell>,
    /// Number of enemy origins reachable over terrain from our side,
    /// probed once at the first sense.
    pub(crate) connectivity: Option<u32>,
    /// The previous auction's cutoff score; free-action bar.
    pub(crate) cutoff_score: f64,
    pub(crate) metrics: TurnMetrics,
    sensed: bool,
}

impl TurnEngine {
    /// Build an engine for a `width × height` map.
    pub fn new(config: EngineConfig, width: u32, height: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        let kernels = KernelSet::from_profiles(&config.profiles);
        let fields = GlobalFields::new(width, height)?;
        let pathfinder = Pathfinder::new(width, height)?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            kernels,
            fields,
            cache: FieldCache::new(),
            pathfinder,
            auction: Auction::new(),
            rng,
            boarding: IndexMap::new(),
            enemy_origins: Vec::new(),
            connectivity: None,
            cutoff_score: 0.0,
            metrics: TurnMetrics::default(),
            sensed: false,
        })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Metrics from the most recent turn.
    pub fn metrics(&self) -> &TurnMetrics {
        &self.metrics
    }

    /// The bar a free action must clear while the pool is saving up —
    /// the score of the first candidate the last auction could not
    /// afford, or zero.
    pub fn cutoff_score(&self) -> f64 {
        self.cutoff_score
    }

    /// How many enemy origins were reachable over bare terrain at the
    /// first sense. `None` before the first turn.
    pub fn connectivity(&self) -> Option<u32> {
        self.connectivity
    }

    /// Drive one complete turn. The caller owns the turn-advance
    /// handshake ([`GameEngine::end_turn`]) and calls it after this
    /// returns.
    pub fn run_turn<E: GameEngine>(&mut self, game: &mut E) -> TurnMetrics {
        self.metrics = TurnMetrics::default();
        let hits_before = self.cache.hits();
        let misses_before = self.cache.misses();

        // Sense.
        let mut snap = game.snapshot();
        assert!(
            snap.map.width == self.pathfinder.width()
                && snap.map.height == self.pathfinder.height(),
            "snapshot map {}x{} does not match engine {}x{}",
            snap.map.width,
            snap.map.height,
            self.pathfinder.width(),
            self.pathfinder.height(),
        );
        if !self.sensed {
            self.first_sense(&snap);
            self.sensed = true;
        }

        // Refresh global fields, then clear the per-turn cache exactly
        // once, before any decision.
        let refresh_start = Instant::now();
        self.fields.refresh(&snap, &self.kernels);
        self.metrics.field_refresh = refresh_start.elapsed();
        self.cache.clear();
        // Boarding claims persist across turns (stale ones are dropped
        // inside the assignment); refresh them before anyone moves so
        // attractors shape this turn's very first searches.
        if self.time_mode(game) == TimeMode::Full {
            coordination::assign_boarding(self, &snap);
        }

        // Decision loop: iterate to a fixed point, capped defensively.
        let loop_start = Instant::now();
        let mut passes = 0;
        loop {
            passes += 1;
            let mut committed = self.decision_pass(game, &mut snap);
            match self.time_mode(game) {
                TimeMode::Full => {
                    committed |= coordination::support_pairing(self, game, &snap);
                    coordination::assign_boarding(self, &snap);
                }
                TimeMode::SkipSearch => {
                    committed |= coordination::support_pairing(self, game, &snap);
                }
                TimeMode::Minimal => {}
            }

            let auction_start = Instant::now();
            let outcome = self.auction.run(game);
            self.metrics.auction += auction_start.elapsed();
            self.metrics.executed += outcome.executed;
            self.metrics.deferred += outcome.deferred;
            self.metrics.dropped += outcome.dropped;
            self.cutoff_score = self.auction.cutoff_score().unwrap_or(0.0);
            committed |= outcome.executed > 0;

            // Re-sense before deciding whether anything is left to do.
            snap = game.snapshot();
            if !committed || passes >= self.config.max_decision_passes {
                break;
            }
        }
        self.metrics.passes = passes;
        self.metrics.decisions = loop_start
            .elapsed()
            .checked_sub(self.metrics.auction)
            .unwrap_or_default();
        self.metrics.cache_hits = self.cache.hits() - hits_before;
        self.metrics.cache_misses = self.cache.misses() - misses_before;
        self.metrics.clone()
    }

    /// One pass over every friendly agent, healers strictly first so
    /// heal targeting reflects pre-movement positions for the pass.
    fn decision_pass<E: GameEngine>(&mut self, game: &mut E, snap: &mut WorldSnapshot) -> bool {
        let healers: Vec<AgentId> = snap
            .side(Side::Friendly)
            .filter(|a| a.class == AgentClass::Healer)
            .map(|a| a.id)
            .collect();
        let rest: Vec<AgentId> = snap
            .side(Side::Friendly)
            .filter(|a| a.class != AgentClass::Healer)
            .map(|a| a.id)
            .collect();

        let mut committed = false;
        for id in healers.into_iter().chain(rest) {
            let mode = self.time_mode(game);
            if behavior::decide(self, game, snap, id, mode) {
                committed = true;
                // Anything may have moved, died, or boarded: re-sense
                // before the next agent reads positions.
                *snap = game.snapshot();
            }
        }
        committed
    }

    fn time_mode<E: GameEngine>(&self, game: &E) -> TimeMode {
        let left = game.time_remaining_ms();
        if left < self.config.critical_time_ms {
            TimeMode::Minimal
        } else if left < self.config.low_time_ms {
            TimeMode::SkipSearch
        } else {
            TimeMode::Full
        }
    }

    /// One-time work at the first sense: remember enemy origins and
    /// probe how many of them are reachable over bare terrain.
    fn first_sense(&mut self, snap: &WorldSnapshot) {
        self.enemy_origins = snap
            .side(Side::Enemy)
            .filter_map(|a| a.pos)
            .collect();

        let terrain = skirm_field::Field::from_fn(snap.map.width, snap.map.height, |cell| {
            if snap.map.passable_at(cell) {
                1.0
            } else {
                f64::INFINITY
            }
        })
        .expect("snapshot dims already validated");

        let Some(home) = snap.side(Side::Friendly).find_map(|a| a.pos) else {
            return;
        };
        let origins = self.enemy_origins.clone();
        let reachable = origins
            .iter()
            .filter(|&&origin| self.pathfinder.reach(home, origin, &terrain).is_some())
            .count() as u32;
        self.connectivity = Some(reachable);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_fails_construction() {
        let config = EngineConfig {
            max_decision_passes: 0,
            ..Default::default()
        };
        assert!(TurnEngine::new(config, 10, 10).is_err());
    }

    #[test]
    fn invalid_map_fails_construction() {
        assert!(matches!(
            TurnEngine::new(EngineConfig::default(), 0, 10),
            Err(ConfigError::InvalidMap(_))
        ));
    }
}
