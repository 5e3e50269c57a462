//! The [`GameEngine`] collaborator trait.

use crate::action::Action;
use crate::id::AgentId;
use crate::snapshot::{AgentState, WorldSnapshot};

/// The external game engine the decision core drives.
///
/// The core owns no game state of its own: it senses snapshots, asks
/// legality questions, executes actions, and hands the turn back. The
/// session/network layer that actually talks to a game server implements
/// this trait; tests use the scripted mock from `skirm-test-utils`.
///
/// # Staleness contract
///
/// Any mutating call ([`execute`](Self::execute)) can change or destroy
/// agents observed earlier in the turn. Callers must re-fetch affected
/// state ([`snapshot`](Self::snapshot) or [`agent`](Self::agent)) before
/// reading it again. A lookup on a dead id returns `None`; that is a
/// normal outcome, never an error.
pub trait GameEngine {
    /// Current visible world state. Cheap enough to call after every
    /// mutation.
    fn snapshot(&self) -> WorldSnapshot;

    /// Current state of one agent, or `None` if it no longer exists.
    fn agent(&self, id: AgentId) -> Option<AgentState>;

    /// The shared resource pool available for costed actions right now.
    fn resources(&self) -> u32;

    /// Wall-clock milliseconds remaining before the turn deadline.
    fn time_remaining_ms(&self) -> u32;

    /// Whether `action` would be legal if executed immediately.
    fn legal(&self, action: &Action) -> bool;

    /// Execute `action` if it is legal *right now*, re-checking the
    /// legality predicate first. Returns whether anything happened.
    /// An action whose legality lapsed since it was proposed silently
    /// does nothing — no retry within the turn.
    fn execute(&mut self, action: &Action) -> bool;

    /// Commit the turn and block until the next turn's snapshot is
    /// ready.
    fn end_turn(&mut self);
}
