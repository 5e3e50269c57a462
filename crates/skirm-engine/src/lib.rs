//! Turn orchestration for the Skirm tactical decision engine.
//!
//! [`TurnEngine`] drives the per-turn pipeline against an external
//! [`GameEngine`](skirm_core::GameEngine): sense the world, refresh the
//! global influence fields, clear the per-turn field cache, run every
//! agent's decision pass (healers first), run the cross-agent
//! coordination passes, resolve the action [`Auction`], and iterate to a
//! fixed point — all single-threaded and strictly turn-sequential.
//!
//! Per-class decision behaviors live in [`behavior`]; they are driven by
//! the [`ClassProfiles`](skirm_core::ClassProfiles) configuration tables
//! and the kernel set, not by per-class code paths in the orchestrator.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod auction;
pub(crate) mod behavior;
pub mod config;
pub(crate) mod coordination;
pub mod fields;
pub mod kernels;
pub mod metrics;
pub mod turn;

pub use auction::{Auction, AuctionOutcome, AuctionSink, Candidate};
pub use config::{ConfigError, EngineConfig};
pub use fields::GlobalFields;
pub use kernels::KernelSet;
pub use metrics::TurnMetrics;
pub use turn::TurnEngine;
