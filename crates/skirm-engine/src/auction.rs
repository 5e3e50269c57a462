//! The turn-scoped, budget-constrained greedy action allocator.
//!
//! Agents never spend the shared resource pool directly. During their
//! decision pass they submit [`Candidate`]s — scored, costed, tiered
//! actions — and at the end of the pass the auction sorts and walks the
//! list, executing what the budget allows. Every executed action goes
//! back through the game engine's legality re-check, so a candidate
//! whose preconditions lapsed mid-turn silently does nothing.

use rand::Rng;
use skirm_core::{Action, GameEngine};

/// One proposed resource-consuming (or free) action.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Desirability. Candidates with score ≤ 0 never execute.
    pub score: f64,
    /// Resource units consumed on execution. Zero-cost candidates are
    /// exempt from budget exhaustion.
    pub cost: u32,
    /// Priority tier; higher tiers always resolve first, regardless of
    /// score.
    pub priority: u8,
    /// Random tie-break token, drawn at submission. Prevents systematic
    /// bias among equal-score candidates while keeping the sort total
    /// and the turn reproducible under a fixed seed.
    pub tie: u64,
    /// The deferred action itself — a plain tagged value, inspectable
    /// and replayable without engine side effects.
    pub action: Action,
}

/// What the auction needs from its executor: a live budget and an
/// execute-with-recheck primitive. Every [`GameEngine`] is a sink.
pub trait AuctionSink {
    /// Resource units still available right now.
    fn budget(&self) -> u32;

    /// Execute if still legal; report whether anything happened.
    fn execute(&mut self, action: &Action) -> bool;
}

impl<E: GameEngine> AuctionSink for E {
    fn budget(&self) -> u32 {
        self.resources()
    }

    fn execute(&mut self, action: &Action) -> bool {
        GameEngine::execute(self, action)
    }
}

/// Tally of one auction resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AuctionOutcome {
    /// Candidates whose effect ran.
    pub executed: u32,
    /// Candidates skipped for lack of budget — deferred, not failed;
    /// agents resubmit next turn.
    pub deferred: u32,
    /// Candidates whose legality lapsed between submission and
    /// execution. Dropped silently, no retry this turn.
    pub dropped: u32,
}

/// The turn-global candidate list and its resolution pass.
#[derive(Debug, Default)]
pub struct Auction {
    candidates: Vec<Candidate>,
    cutoff: Option<f64>,
}

impl Auction {
    /// Create an empty auction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a candidate, drawing its tie-break token from `rng`.
    pub fn submit(
        &mut self,
        score: f64,
        cost: u32,
        priority: u8,
        action: Action,
        rng: &mut impl Rng,
    ) {
        self.candidates.push(Candidate {
            score,
            cost,
            priority,
            tie: rng.random(),
            action,
        });
    }

    /// Pending candidates, in submission order. For inspection and tests.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Number of pending candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The score of the first candidate the budget could not cover in
    /// the most recent [`run`](Self::run), if any. Other logic uses this
    /// as the bar a free action must clear to be worth taking while the
    /// pool is saving up.
    pub fn cutoff_score(&self) -> Option<f64> {
        self.cutoff
    }

    /// Resolve the queued candidates against `sink` and clear the list.
    ///
    /// Walk order: priority tier descending, then score descending, then
    /// the random tie token. Candidates with score ≤ 0 are skipped
    /// outright. The first candidate whose cost exceeds the remaining
    /// budget flips the exhaustion flag and records the cutoff score;
    /// from then on every nonzero-cost candidate is skipped for this
    /// turn, while zero-cost candidates continue to execute normally.
    pub fn run(&mut self, sink: &mut impl AuctionSink) -> AuctionOutcome {
        let mut order: Vec<&Candidate> = self.candidates.iter().collect();
        order.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| b.score.total_cmp(&a.score))
                .then_with(|| b.tie.cmp(&a.tie))
        });

        let mut outcome = AuctionOutcome::default();
        let mut exhausted = false;
        let mut cutoff = None;

        for cand in order {
            if cand.score <= 0.0 {
                continue;
            }
            if exhausted && cand.cost > 0 {
                outcome.deferred += 1;
                continue;
            }
            if cand.cost > sink.budget() {
                exhausted = true;
                if cutoff.is_none() {
                    cutoff = Some(cand.score);
                }
                outcome.deferred += 1;
                continue;
            }
            if sink.execute(&cand.action) {
                outcome.executed += 1;
            } else {
                outcome.dropped += 1;
            }
        }

        self.candidates.clear();
        self.cutoff = cutoff;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use skirm_core::{AgentId, Cell};

    /// Sink with a fixed per-cost budget, charging on execution.
    struct LedgerSink {
        budget: u32,
        costs: Vec<(Action, u32)>,
        executed: Vec<Action>,
        refuse: Vec<Action>,
    }

    impl LedgerSink {
        fn new(budget: u32) -> Self {
            Self {
                budget,
                costs: Vec::new(),
                executed: Vec::new(),
                refuse: Vec::new(),
            }
        }
    }

    impl AuctionSink for LedgerSink {
        fn budget(&self) -> u32 {
            self.budget
        }

        fn execute(&mut self, action: &Action) -> bool {
            if self.refuse.contains(action) {
                return false;
            }
            let cost = self
                .costs
                .iter()
                .find(|(a, _)| a == action)
                .map_or(0, |(_, c)| *c);
            self.budget -= cost;
            self.executed.push(*action);
            true
        }
    }

    fn move_to(id: u32, x: i32) -> Action {
        Action::Move {
            agent: AgentId(id),
            to: Cell::new(x, 0),
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn ordering_scenario_with_exhausted_budget() {
        // (pri=2, score=5, cost=10), (pri=2, score=3, cost=0),
        // (pri=1, score=100, cost=0) with budget 5: the cost-10
        // candidate is unaffordable and sets the cutoff to 5; the
        // same-tier free candidate still executes; the lower-tier free
        // candidate executes afterward.
        let mut auction = Auction::new();
        let mut r = rng();
        auction.submit(5.0, 10, 2, move_to(1, 1), &mut r);
        auction.submit(3.0, 0, 2, move_to(2, 2), &mut r);
        auction.submit(100.0, 0, 1, move_to(3, 3), &mut r);

        let mut sink = LedgerSink::new(5);
        let outcome = auction.run(&mut sink);

        assert_eq!(sink.executed, vec![move_to(2, 2), move_to(3, 3)]);
        assert_eq!(outcome.executed, 2);
        assert_eq!(outcome.deferred, 1);
        assert_eq!(auction.cutoff_score(), Some(5.0));
        assert!(auction.is_empty(), "candidate list clears after the pass");
    }

    #[test]
    fn exhaustion_poisons_later_affordable_costed_candidates() {
        // After the first unaffordable candidate, even an affordable
        // nonzero-cost candidate is skipped — the budget is considered
        // committed for the turn.
        let mut auction = Auction::new();
        let mut r = rng();
        auction.submit(9.0, 100, 2, move_to(1, 1), &mut r);
        auction.submit(8.0, 1, 2, move_to(2, 2), &mut r);

        let mut sink = LedgerSink::new(50);
        let outcome = auction.run(&mut sink);
        assert!(sink.executed.is_empty());
        assert_eq!(outcome.deferred, 2);
        assert_eq!(auction.cutoff_score(), Some(9.0));
    }

    #[test]
    fn nonpositive_scores_never_execute_and_never_set_cutoff() {
        let mut auction = Auction::new();
        let mut r = rng();
        auction.submit(0.0, 0, 3, move_to(1, 1), &mut r);
        auction.submit(-4.0, 1000, 3, move_to(2, 2), &mut r);
        auction.submit(1.0, 0, 0, move_to(3, 3), &mut r);

        let mut sink = LedgerSink::new(0);
        let outcome = auction.run(&mut sink);
        assert_eq!(sink.executed, vec![move_to(3, 3)]);
        assert_eq!(outcome.deferred, 0);
        assert_eq!(auction.cutoff_score(), None);
    }

    #[test]
    fn removing_nonpositive_candidates_changes_nothing() {
        let submit_all = |auction: &mut Auction, include_junk: bool| {
            let mut r = rng();
            auction.submit(5.0, 2, 2, move_to(1, 1), &mut r);
            if include_junk {
                auction.submit(-1.0, 0, 2, move_to(9, 9), &mut r);
                auction.submit(0.0, 3, 1, move_to(8, 8), &mut r);
            }
            auction.submit(4.0, 3, 1, move_to(2, 2), &mut r);
            auction.submit(2.0, 0, 1, move_to(3, 3), &mut r);
        };

        let mut with_junk = Auction::new();
        submit_all(&mut with_junk, true);
        let mut sink_a = LedgerSink::new(4);
        sink_a.costs = vec![(move_to(1, 1), 2), (move_to(2, 2), 3)];
        with_junk.run(&mut sink_a);

        let mut without = Auction::new();
        submit_all(&mut without, false);
        let mut sink_b = LedgerSink::new(4);
        sink_b.costs = vec![(move_to(1, 1), 2), (move_to(2, 2), 3)];
        without.run(&mut sink_b);

        assert_eq!(sink_a.executed, sink_b.executed);
    }

    #[test]
    fn budget_recharges_between_costed_executions() {
        // Executing a costed candidate shrinks the live budget the next
        // candidate sees.
        let mut auction = Auction::new();
        let mut r = rng();
        auction.submit(9.0, 3, 2, move_to(1, 1), &mut r);
        auction.submit(8.0, 3, 2, move_to(2, 2), &mut r);
        auction.submit(7.0, 3, 2, move_to(3, 3), &mut r);

        let mut sink = LedgerSink::new(7);
        sink.costs = vec![(move_to(1, 1), 3), (move_to(2, 2), 3), (move_to(3, 3), 3)];
        let outcome = auction.run(&mut sink);

        assert_eq!(sink.executed, vec![move_to(1, 1), move_to(2, 2)]);
        assert_eq!(outcome.deferred, 1);
        assert_eq!(auction.cutoff_score(), Some(7.0));
    }

    #[test]
    fn lapsed_legality_drops_silently() {
        let mut auction = Auction::new();
        let mut r = rng();
        auction.submit(5.0, 0, 1, move_to(1, 1), &mut r);
        auction.submit(4.0, 0, 1, move_to(2, 2), &mut r);

        let mut sink = LedgerSink::new(0);
        sink.refuse = vec![move_to(1, 1)];
        let outcome = auction.run(&mut sink);
        assert_eq!(sink.executed, vec![move_to(2, 2)]);
        assert_eq!(outcome.dropped, 1);
        assert_eq!(outcome.executed, 1);
    }

    #[test]
    fn priority_beats_score() {
        let mut auction = Auction::new();
        let mut r = rng();
        auction.submit(1.0, 0, 2, move_to(1, 1), &mut r);
        auction.submit(1000.0, 0, 1, move_to(2, 2), &mut r);

        let mut sink = LedgerSink::new(0);
        auction.run(&mut sink);
        assert_eq!(sink.executed, vec![move_to(1, 1), move_to(2, 2)]);
    }

    #[test]
    fn equal_candidates_resolve_by_tie_token_deterministically() {
        let run_once = || {
            let mut auction = Auction::new();
            let mut r = rng();
            auction.submit(5.0, 0, 1, move_to(1, 1), &mut r);
            auction.submit(5.0, 0, 1, move_to(2, 2), &mut r);
            let mut sink = LedgerSink::new(0);
            auction.run(&mut sink);
            sink.executed
        };
        assert_eq!(run_once(), run_once(), "same seed, same order");
    }
}
