//! The tagged action vocabulary.
//!
//! Agents never call into the game engine with captured closures; every
//! deferred action is a plain tagged value (verb + ids + coordinates) so
//! the auction and its tests can inspect, sort, and replay actions
//! without triggering engine side effects. Execution always goes through
//! [`GameEngine::execute`](crate::GameEngine::execute), which re-checks
//! legality against current state immediately before acting.

use crate::agent::AgentClass;
use crate::cell::Cell;
use crate::id::AgentId;

/// A single action verb, bound to the agent performing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Step one cell toward `to` (must be 8-adjacent to the agent).
    Move {
        /// The moving agent.
        agent: AgentId,
        /// The destination cell.
        to: Cell,
    },
    /// Attack another agent within range.
    Attack {
        /// The attacker.
        agent: AgentId,
        /// The victim.
        target: AgentId,
    },
    /// Restore health to a friendly agent within range.
    Heal {
        /// The healer.
        agent: AgentId,
        /// The patient.
        target: AgentId,
    },
    /// Reset a friendly attacker's spent cooldowns (support ability).
    Boost {
        /// The boosting healer.
        agent: AgentId,
        /// The attacker whose cooldowns are reset.
        target: AgentId,
    },
    /// Collect ore from a cell adjacent to (or under) the agent.
    Harvest {
        /// The harvesting worker.
        agent: AgentId,
        /// The cell to harvest from.
        at: Cell,
    },
    /// Produce a new unit inside a factory.
    Produce {
        /// The producing factory.
        agent: AgentId,
        /// The class of unit to produce.
        class: AgentClass,
    },
    /// Place a structure blueprint on an adjacent cell.
    Blueprint {
        /// The worker placing the blueprint.
        agent: AgentId,
        /// The structure class to found.
        class: AgentClass,
        /// The cell to place it on.
        at: Cell,
    },
    /// Advance construction of an adjacent blueprint.
    Build {
        /// The building worker.
        agent: AgentId,
        /// The blueprint under construction.
        site: AgentId,
    },
    /// Restore health to an adjacent finished structure.
    Repair {
        /// The repairing worker.
        agent: AgentId,
        /// The structure to repair.
        site: AgentId,
    },
    /// Spawn a copy of the worker on an adjacent cell.
    Replicate {
        /// The replicating worker.
        agent: AgentId,
        /// The cell for the copy.
        to: Cell,
    },
    /// Enter an adjacent friendly structure's garrison.
    Board {
        /// The boarding agent.
        agent: AgentId,
        /// The structure to enter.
        transport: AgentId,
    },
    /// Release the front garrisoned unit onto an adjacent cell.
    Unload {
        /// The structure unloading.
        agent: AgentId,
        /// The cell to release onto.
        to: Cell,
    },
    /// Depart with the current garrison toward a landing cell.
    Launch {
        /// The departing transport.
        agent: AgentId,
        /// The landing cell.
        to: Cell,
    },
    /// Fire the long-range strike at a cell (Ranger ability).
    Strike {
        /// The striking ranger.
        agent: AgentId,
        /// The cell to hit.
        at: Cell,
    },
}

impl Action {
    /// The agent performing this action.
    pub fn actor(&self) -> AgentId {
        match *self {
            Action::Move { agent, .. }
            | Action::Attack { agent, .. }
            | Action::Heal { agent, .. }
            | Action::Boost { agent, .. }
            | Action::Harvest { agent, .. }
            | Action::Produce { agent, .. }
            | Action::Blueprint { agent, .. }
            | Action::Build { agent, .. }
            | Action::Repair { agent, .. }
            | Action::Replicate { agent, .. }
            | Action::Board { agent, .. }
            | Action::Unload { agent, .. }
            | Action::Launch { agent, .. }
            | Action::Strike { agent, .. } => agent,
        }
    }
}
