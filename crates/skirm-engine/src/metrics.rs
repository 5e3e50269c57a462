//! Per-turn performance and activity counters.

use std::fmt;
use std::time::Duration;

/// What one [`run_turn`](crate::TurnEngine::run_turn) did and what it
/// cost.
///
/// The embedding session layer decides what to do with these — print
/// them, aggregate them, or drop them. Nothing in the engine reads them
/// back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnMetrics {
    /// Wall time rebuilding the global fields from the snapshot.
    pub field_refresh: Duration,
    /// Wall time inside agent decision passes (searches included).
    pub decisions: Duration,
    /// Wall time resolving the auction.
    pub auction: Duration,
    /// Decision-loop iterations executed.
    pub passes: u32,
    /// Value searches run.
    pub searches: u32,
    /// Cells expanded across all searches.
    pub cells_expanded: u64,
    /// Field-cache lookups served from the store this turn.
    pub cache_hits: u64,
    /// Field-cache lookups that computed a new field this turn.
    pub cache_misses: u64,
    /// Moves committed.
    pub moves: u32,
    /// Attacks and heals committed.
    pub strikes: u32,
    /// Auction candidates executed.
    pub executed: u32,
    /// Auction candidates deferred for lack of budget.
    pub deferred: u32,
    /// Auction candidates dropped because their legality lapsed.
    pub dropped: u32,
}

impl fmt::Display for TurnMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "passes={} searches={} expanded={} cache={}h/{}m \
             moves={} strikes={} auction={}x/{}d/{}i \
             refresh={:.1}ms decide={:.1}ms resolve={:.1}ms",
            self.passes,
            self.searches,
            self.cells_expanded,
            self.cache_hits,
            self.cache_misses,
            self.moves,
            self.strikes,
            self.executed,
            self.deferred,
            self.dropped,
            self.field_refresh.as_secs_f64() * 1000.0,
            self.decisions.as_secs_f64() * 1000.0,
            self.auction.as_secs_f64() * 1000.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_single_line() {
        let m = TurnMetrics {
            passes: 2,
            searches: 14,
            ..Default::default()
        };
        let s = m.to_string();
        assert!(!s.contains('\n'));
        assert!(s.contains("passes=2"));
        assert!(s.contains("searches=14"));
    }
}
