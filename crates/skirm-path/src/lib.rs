//! Weighted-grid search for the Skirm decision engine.
//!
//! One 8-connected Dijkstra core drives three entry points on
//! [`Pathfinder`]:
//!
//! - [`distances`](Pathfinder::distances) — accumulated cost to every
//!   reachable cell.
//! - [`reach`](Pathfinder::reach) — cost to one goal cell, early-exiting
//!   as soon as the goal is settled.
//! - [`seek`](Pathfinder::seek) — the value-maximizing search: find the
//!   reachable cell with the best value-per-accumulated-cost ratio and
//!   the path to it. This is every agent's movement decision.
//!
//! Scratch buffers are owned per instance and recycled across
//! invocations with a generation counter, so repeated searches cost
//! O(cells touched), not O(map size).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod pathfinder;

pub use pathfinder::{Pathfinder, Route, BLOCKED};
