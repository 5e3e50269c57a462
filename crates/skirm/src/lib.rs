//! Skirm: a tactical decision engine for turn-based multi-agent
//! simulations.
//!
//! This is the top-level facade crate re-exporting the public API from
//! the Skirm sub-crates. For most users, adding `skirm` as a single
//! dependency is sufficient.
//!
//! Each discrete turn, the engine decides — for potentially hundreds of
//! agents on a bounded 2D grid — where to move, what to attack, and
//! which of several competing resource-consuming actions to take,
//! within a strict wall-clock budget. The spatial machinery that makes
//! this tractable: influence [`Field`](field::Field)s stamped with
//! [`Kernel`](field::Kernel)s, a value-maximizing
//! [`Pathfinder`](path::Pathfinder), a per-turn
//! [`FieldCache`](field::FieldCache), and a greedy budget
//! [`Auction`](engine::Auction), all driven by the
//! [`TurnEngine`](engine::TurnEngine) orchestrator against a
//! [`GameEngine`](types::GameEngine) collaborator.
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `skirm-core` | IDs, cells, classes, actions, snapshots, the engine trait |
//! | [`field`] | `skirm-field` | Grid fields, stamp kernels, the per-turn cache |
//! | [`path`] | `skirm-path` | The weighted-grid value search |
//! | [`engine`] | `skirm-engine` | Turn orchestration, behaviors, the auction |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, identifiers, and the collaborator trait (`skirm-core`).
pub use skirm_core as types;

/// Grid fields, kernels, and the per-turn cache (`skirm-field`).
pub use skirm_field as field;

/// The weighted-grid value search (`skirm-path`).
pub use skirm_path as path;

/// Turn orchestration, decision behaviors, and the auction
/// (`skirm-engine`).
pub use skirm_engine as engine;

/// Common imports for typical Skirm usage.
///
/// ```rust
/// use skirm::prelude::*;
///
/// let config = EngineConfig::default();
/// let engine = TurnEngine::new(config, 32, 32).unwrap();
/// assert_eq!(engine.cutoff_score(), 0.0);
/// ```
pub mod prelude {
    pub use skirm_core::{
        Action, AgentClass, AgentId, AgentState, Cell, ClassProfiles, GameEngine, MapSnapshot,
        Side, Turn, WorldSnapshot,
    };
    pub use skirm_engine::{
        Auction, AuctionOutcome, Candidate, ConfigError, EngineConfig, TurnEngine, TurnMetrics,
    };
    pub use skirm_field::{CacheKey, Field, FieldCache, FieldKind, Kernel};
    pub use skirm_path::{Pathfinder, Route, BLOCKED};
}
